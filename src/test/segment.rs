use crate::packet::{build_packet, parse_segment, BuildOptions, PayloadPolicy};
use crate::test::support::{server_segment, CLIENT, CLIENT_PORT, SERVER, SERVER_PORT};

#[test]
fn parses_addresses_ports_and_sequence_state() {
    let buf = build_packet(&server_segment(1000, 2000, b"data"), &BuildOptions::default()).expect("build");
    let seg = parse_segment(&buf, PayloadPolicy::HeaderLength).expect("parsed");
    assert_eq!(seg.src, SERVER);
    assert_eq!(seg.dst, CLIENT);
    assert_eq!(seg.src_port, SERVER_PORT);
    assert_eq!(seg.dst_port, CLIENT_PORT);
    assert_eq!(seg.seq, 1000);
    assert_eq!(seg.ack, 2000);
    assert_eq!(seg.payload_len, 4);
}

#[test]
fn empty_payload_is_skipped() {
    let buf = build_packet(&server_segment(1, 2, b""), &BuildOptions::default()).expect("build");
    assert_eq!(parse_segment(&buf, PayloadPolicy::HeaderLength), None);
}

#[test]
fn fixed_marker_policy_skips_twelve_more_bytes() {
    let opts = BuildOptions::default();
    let short = build_packet(&server_segment(1, 2, &[0u8; 12]), &opts).expect("build");
    assert_eq!(parse_segment(&short, PayloadPolicy::FixedMarker), None);
    assert!(parse_segment(&short, PayloadPolicy::HeaderLength).is_some());

    let long = build_packet(&server_segment(1, 2, &[0u8; 13]), &opts).expect("build");
    let seg = parse_segment(&long, PayloadPolicy::FixedMarker).expect("parsed");
    assert_eq!(seg.payload_len, 1);
}

#[test]
fn header_length_policy_honours_tcp_options() {
    // data offset 8 words: 12 bytes of options, 3 bytes of payload
    let mut buf = build_packet(&server_segment(1, 2, &[0u8; 15]), &BuildOptions::default()).expect("build");
    buf[20 + 12] = 0x80;
    let seg = parse_segment(&buf, PayloadPolicy::HeaderLength).expect("parsed");
    assert_eq!(seg.payload_len, 3);
}

#[test]
fn non_tcp_and_malformed_input_is_skipped() {
    let good = build_packet(&server_segment(1, 2, b"abc"), &BuildOptions::default()).expect("build");

    let mut udp = good.clone();
    udp[9] = 17;
    assert_eq!(parse_segment(&udp, PayloadPolicy::HeaderLength), None);

    let mut v6 = good.clone();
    v6[0] = 0x65;
    assert_eq!(parse_segment(&v6, PayloadPolicy::HeaderLength), None);

    let mut bad_ihl = good.clone();
    bad_ihl[0] = 0x44;
    assert_eq!(parse_segment(&bad_ihl, PayloadPolicy::HeaderLength), None);

    // later fragment: fragment offset 185 * 8 bytes, MF clear
    let mut fragment = good.clone();
    fragment[6..8].copy_from_slice(&185u16.to_be_bytes());
    assert_eq!(parse_segment(&fragment, PayloadPolicy::HeaderLength), None);

    // first fragment (MF set, offset 0) still carries the TCP header
    let mut first_fragment = good.clone();
    first_fragment[6..8].copy_from_slice(&0x2000u16.to_be_bytes());
    assert!(parse_segment(&first_fragment, PayloadPolicy::HeaderLength).is_some());

    let mut bad_offset = good.clone();
    bad_offset[32] = 0x30;
    assert_eq!(parse_segment(&bad_offset, PayloadPolicy::HeaderLength), None);

    for cut in 0..40 {
        assert_eq!(parse_segment(&good[..cut], PayloadPolicy::HeaderLength), None, "cut={cut}");
    }
}

#[test]
fn total_length_shorter_than_headers_is_skipped() {
    let mut buf = build_packet(&server_segment(1, 2, b"abc"), &BuildOptions::default()).expect("build");
    buf[2..4].copy_from_slice(&30u16.to_be_bytes());
    assert_eq!(parse_segment(&buf, PayloadPolicy::HeaderLength), None);
}
