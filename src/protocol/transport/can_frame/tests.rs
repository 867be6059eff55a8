//! Unit tests for `CanFrame` construction and accessors.
use super::*;
use embedded_can::Frame;

#[test]
/// Standard data frame keeps id and payload.
fn test_standard_data_frame() {
    let frame = CanFrame::standard(0x123, &[0xAA, 0xBB]).expect("valid frame");
    assert!(!frame.is_extended());
    assert!(!frame.is_remote());
    assert_eq!(frame.raw_id(), 0x123);
    assert_eq!(frame.dlc(), 2);
    assert_eq!(frame.data(), &[0xAA, 0xBB]);
}

#[test]
/// Identifiers outside their width are refused.
fn test_identifier_width() {
    assert!(CanFrame::standard(0x800, &[]).is_none());
    assert!(CanFrame::standard(0x7FF, &[]).is_some());
    assert!(CanFrame::extended(0x2000_0000, &[]).is_none());
    assert!(CanFrame::extended(0x1FFF_FFFF, &[]).is_some());
}

#[test]
/// More than eight bytes never fit.
fn test_payload_bound() {
    assert!(CanFrame::standard(1, &[0; 9]).is_none());
    assert!(CanFrame::new_remote_frame(StandardId::ZERO, 9).is_none());
}

#[test]
/// Remote frames carry a length but expose no payload.
fn test_remote_frame_has_no_data() {
    let id = ExtendedId::new(0x1234).unwrap();
    let frame = <CanFrame as Frame>::new_remote(id, 4).unwrap();
    assert!(frame.is_remote_frame());
    assert!(frame.is_extended());
    assert_eq!(Frame::dlc(&frame), 4);
    assert!(Frame::data(&frame).is_empty());
}
