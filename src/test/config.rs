use std::time::Duration;

use crate::config::DisruptConfig;
use crate::packet::PayloadPolicy;

#[test]
fn defaults_match_documented_values() {
    let cfg = DisruptConfig::default();
    assert_eq!(cfg.command, "\r\n");
    assert_eq!(cfg.inter_packet_delay(), Duration::from_secs(1));
    assert_eq!(cfg.early_threshold, 100);
    assert_eq!(cfg.payload_policy, PayloadPolicy::HeaderLength);

    let opts = cfg.build_options();
    assert_eq!((opts.ttl, opts.window, opts.ident, opts.max_len), (64, 65535, 0, 1500));
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let raw = r#"{ "command": "exit\r\n", "payload_policy": "fixed_marker", "ttl": 128 }"#;
    let cfg = DisruptConfig::from_json(raw).expect("parse config");
    assert_eq!(cfg.command, "exit\r\n");
    assert_eq!(cfg.payload_policy, PayloadPolicy::FixedMarker);
    assert_eq!(cfg.ttl, 128);
    assert_eq!(cfg.early_threshold, 100);
    assert_eq!(cfg.inter_packet_delay_ms, 1_000);
}

#[test]
fn empty_object_is_default() {
    assert_eq!(DisruptConfig::from_json("{}").expect("parse"), DisruptConfig::default());
}

#[test]
fn unknown_policy_is_rejected() {
    assert!(DisruptConfig::from_json(r#"{ "payload_policy": "guess" }"#).is_err());
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join(format!("tcp-disrupt-missing-{}.json", std::process::id()));
    match DisruptConfig::load(&path) {
        Err(crate::config::ConfigError::Io { .. }) => {}
        other => panic!("expected Io error, got {other:?}"),
    }
}
