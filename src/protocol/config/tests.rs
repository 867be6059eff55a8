//! Bitrate table and filter forwarding tests.
use super::*;
use crate::error::ControllerFault;
use crate::protocol::test_support::MockController;

#[test]
/// The preset table follows the LAWICEL S0..S8 order.
fn test_preset_table() {
    let expected = [
        10_000, 20_000, 50_000, 100_000, 125_000, 250_000, 500_000, 800_000, 1_000_000,
    ];
    for (index, bps) in expected.iter().enumerate() {
        let bitrate = Bitrate::from_index(index as u8).expect("index inside table");
        assert_eq!(bitrate.bits_per_second(), *bps);
    }
    assert_eq!(Bitrate::from_index(9), None);
    assert_eq!(Bitrate::from_index(0xF), None);
}

#[test]
/// An out-of-range preset leaves the previous setting untouched.
fn test_invalid_preset_keeps_setting() {
    let mut config = BitrateConfig::new(BitrateSetting::Preset(Bitrate::Kbps500));
    assert_eq!(config.set_preset(9), Err(ErrorKind::InvalidCommand));
    assert_eq!(config.current(), BitrateSetting::Preset(Bitrate::Kbps500));

    assert_eq!(config.set_preset(4), Ok(Bitrate::Kbps125));
    assert_eq!(config.current(), BitrateSetting::Preset(Bitrate::Kbps125));

    config.set_raw(0x03, 0x1C);
    assert_eq!(
        config.current(),
        BitrateSetting::Raw {
            btr0: 0x03,
            btr1: 0x1C
        }
    );
}

#[test]
/// Filter values reach the controller verbatim.
fn test_filter_forwarded() {
    let mut controller = MockController::new();
    let mut filter = FilterConfig::new();
    assert_eq!(filter.mask(), DEFAULT_ACCEPTANCE_MASK);

    filter.set_code(&mut controller, 0x1234_5678).unwrap();
    filter.set_mask(&mut controller, 0x0000_07FF).unwrap();

    assert_eq!(controller.filter_codes, [0x1234_5678]);
    assert_eq!(controller.filter_masks, [0x0000_07FF]);
    assert_eq!(filter.code(), 0x1234_5678);
    assert_eq!(filter.mask(), 0x0000_07FF);
}

#[test]
/// A refused filter surfaces the controller fault and is not stored.
fn test_filter_refused() {
    let mut controller = MockController::new();
    controller.filter_result = Err(ControllerFault::Filter);
    let mut filter = FilterConfig::new();

    assert_eq!(
        filter.set_code(&mut controller, 0xAA),
        Err(ErrorKind::Controller(ControllerFault::Filter))
    );
    assert_eq!(filter.code(), 0);
}
