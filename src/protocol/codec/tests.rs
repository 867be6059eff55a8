//! Frame codec tests: grammar edge cases and wire formatting.
use super::*;
use crate::core::CR;

#[test]
/// The documented example command decodes to id 0x123, two bytes.
fn test_parse_standard_data_frame() {
    let frame = parse_transmit(b"t1232AABB").expect("valid command");
    assert!(!frame.is_extended());
    assert!(!frame.is_remote());
    assert_eq!(frame.raw_id(), 0x123);
    assert_eq!(frame.data(), &[0xAA, 0xBB]);
}

#[test]
fn test_parse_extended_frame_lower_case_hex() {
    let frame = parse_transmit(b"T1abcdef08deadbeefcafebabe").expect("valid command");
    assert!(frame.is_extended());
    assert_eq!(frame.raw_id(), 0x1ABC_DEF0);
    assert_eq!(
        frame.data(),
        &[0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE, 0xBA, 0xBE]
    );
}

#[test]
/// Remote variants take a length but no payload digits.
fn test_parse_remote_frames() {
    let frame = parse_transmit(b"r7FF8").expect("valid command");
    assert!(frame.is_remote());
    assert_eq!(frame.dlc(), 8);
    assert!(frame.data().is_empty());

    let frame = parse_transmit(b"R000001230").expect("valid command");
    assert!(frame.is_remote() && frame.is_extended());
    assert_eq!(frame.raw_id(), 0x123);

    // Payload digits after a remote header are surplus.
    assert_eq!(parse_transmit(b"r1232AABB"), Err(ErrorKind::InvalidCommand));
}

#[test]
/// Payload digit count must match the dlc exactly.
fn test_parse_length_mismatch() {
    assert_eq!(parse_transmit(b"t1232AA"), Err(ErrorKind::InvalidCommand));
    assert_eq!(parse_transmit(b"t1232AABBC"), Err(ErrorKind::InvalidCommand));
    assert_eq!(parse_transmit(b"t1231"), Err(ErrorKind::InvalidCommand));
    assert_eq!(parse_transmit(b"t123"), Err(ErrorKind::InvalidCommand));
}

#[test]
/// A dlc above 8 exceeds the payload width.
fn test_parse_dlc_overflow() {
    assert_eq!(
        parse_transmit(b"t1239AABBCCDDEEFF001122"),
        Err(ErrorKind::BufferOverflow)
    );
    assert_eq!(parse_transmit(b"r123F"), Err(ErrorKind::BufferOverflow));
    assert_eq!(
        parse_transmit(b"T1234567880011223344556677889"),
        Err(ErrorKind::BufferOverflow)
    );
}

#[test]
/// Identifiers wider than their format are grammar errors.
fn test_parse_id_out_of_range() {
    assert_eq!(parse_transmit(b"t8000"), Err(ErrorKind::InvalidCommand));
    assert_eq!(parse_transmit(b"T200000000"), Err(ErrorKind::InvalidCommand));
    assert_eq!(parse_transmit(b"tXYZ0"), Err(ErrorKind::InvalidCommand));
}

#[test]
/// Outgoing lines are upper-case and zero-padded.
fn test_create_transmit_format() {
    let frame = CanFrame::standard(0x00A, &[0x01, 0xfe]).unwrap();
    let line = create_transmit(&frame, None).unwrap();
    assert_eq!(line.as_bytes(), b"t00A201FE\r");

    let frame = CanFrame::extended(0x0000_0ABC, &[]).unwrap();
    let line = create_transmit(&frame, None).unwrap();
    assert_eq!(line.as_bytes(), b"T00000ABC0\r");
}

#[test]
/// The timestamp sits between payload and CR.
fn test_create_transmit_with_timestamp() {
    let frame = CanFrame::standard(0x123, &[0xAA, 0xBB]).unwrap();
    let line = create_transmit(&frame, Some(12345)).unwrap();
    assert_eq!(line.as_bytes(), b"t1232AABB3039\r");
}

#[test]
/// The longest possible line still fits the reply buffer.
fn test_create_transmit_largest_line() {
    let frame = CanFrame::extended(0x1FFF_FFFF, &[0xFF; 8]).unwrap();
    let line = create_transmit(&frame, Some(59_999)).unwrap();
    assert_eq!(line.len(), 1 + 8 + 1 + 16 + 4 + 1);
    assert_eq!(line.as_bytes().last(), Some(&CR));
}

#[test]
/// Standard frames survive both directions for every length.
fn test_standard_frames_round_trip() {
    let payload = [0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77];
    for id in [0x000u16, 0x001, 0x123, 0x7FF] {
        for len in 0..=CAN_MAX_DLEN {
            let frame = CanFrame::standard(id, &payload[..len]).unwrap();
            let line = create_transmit(&frame, None).unwrap();
            let body = &line.as_bytes()[..line.len() - 1];
            assert_eq!(parse_transmit(body), Ok(frame));
        }
    }
}

#[test]
/// Host lines survive decode then encode; only hex case is normalised.
fn test_host_lines_round_trip() {
    let cases: [(&[u8], &[u8]); 6] = [
        (b"t1a32aabbcc", b"t1A32AABBCC\r"),
        (b"t0000", b"t0000\r"),
        (b"T1abcdef02cafe", b"T1ABCDEF02CAFE\r"),
        (b"T1FFFFFFF8ffeeddccbbaa9988", b"T1FFFFFFF8FFEEDDCCBBAA9988\r"),
        (b"r7df8", b"r7DF8\r"),
        (b"R000001230", b"R000001230\r"),
    ];
    for (host, expected) in cases {
        let frame = parse_transmit(host).unwrap();
        let line = create_transmit(&frame, None).unwrap();
        assert_eq!(line.as_bytes(), expected, "{:?}", host);
    }
}
