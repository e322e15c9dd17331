use loadgen_common::config::{ConfigProfile, LoadConfig, DEFAULT_CONCURRENCY, DEFAULT_VIRTUAL_HOST};
use loadgen_common::LoadgenError;

#[test]
fn defaults_match_documented_values() {
    let cfg = LoadConfig::default();
    assert_eq!(cfg.virtual_host, DEFAULT_VIRTUAL_HOST);
    assert_eq!(cfg.duration_secs, 300);
    assert_eq!(cfg.concurrency, DEFAULT_CONCURRENCY);
    assert_eq!(cfg.model, "TinyLlama/TinyLlama-1.1B-Chat-v1.0");
    assert_eq!(cfg.max_tokens, 50);
    assert_eq!(cfg.prompt, "In one sentence, what is machine learning?");
    assert!(cfg.metrics_addr.is_none());
}

#[test]
fn endpoint_targets_chat_completions() {
    let cfg = LoadConfig { elb_host: "gw.example.com:8080".into(), ..LoadConfig::default() };
    assert_eq!(cfg.endpoint(), "http://gw.example.com:8080/v1/chat/completions");
}

#[test]
fn profile_overrides_only_present_fields() {
    let profile = ConfigProfile::parse("duration: 12\nmodel: other/model\n").unwrap();
    let cfg = LoadConfig::from_profile(profile);
    assert_eq!(cfg.duration_secs, 12);
    assert_eq!(cfg.model, "other/model");
    assert_eq!(cfg.concurrency, DEFAULT_CONCURRENCY);
}

#[test]
fn empty_profile_is_defaults() {
    let profile = ConfigProfile::parse("").unwrap();
    assert_eq!(LoadConfig::from_profile(profile), LoadConfig::default());
}

#[test]
fn unknown_profile_key_is_rejected() {
    let err = ConfigProfile::parse("durration: 5\n").unwrap_err();
    assert!(matches!(err, LoadgenError::Yaml(_)));
}

#[test]
fn missing_profile_file_is_config_error() {
    let err = ConfigProfile::load(std::path::Path::new("/nonexistent/loadgen.yaml")).unwrap_err();
    assert!(matches!(err, LoadgenError::Config(_)));
}

#[test]
fn blank_host_fails_validation() {
    let cfg = LoadConfig { elb_host: "  ".into(), ..LoadConfig::default() };
    assert!(cfg.validate().is_err());
    assert!(LoadConfig::default().validate().is_ok());
}
