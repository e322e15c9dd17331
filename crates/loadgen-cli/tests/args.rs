use std::io::Write;

use clap::Parser;
use loadgen_cli::Cli;
use loadgen_common::config::LoadConfig;

#[test]
fn no_flags_gives_defaults() {
    let cfg = Cli::try_parse_from(["inference-traffic"]).unwrap().resolve().unwrap();
    assert_eq!(cfg, LoadConfig::default());
}

#[test]
fn flags_override_defaults() {
    let cli = Cli::try_parse_from([
        "inference-traffic",
        "--elb-host", "gw.local:9000",
        "--virtual-host", "other.llm.local",
        "--duration", "60",
        "--concurrency", "12",
        "--model", "m",
        "--max-tokens", "8",
        "--prompt", "hi",
        "--metrics-addr", "127.0.0.1:9464",
    ])
    .unwrap();
    let cfg = cli.resolve().unwrap();
    assert_eq!(cfg.endpoint(), "http://gw.local:9000/v1/chat/completions");
    assert_eq!(cfg.virtual_host, "other.llm.local");
    assert_eq!(cfg.duration_secs, 60);
    assert_eq!(cfg.concurrency, 12);
    assert_eq!(cfg.model, "m");
    assert_eq!(cfg.max_tokens, 8);
    assert_eq!(cfg.prompt, "hi");
    assert_eq!(cfg.metrics_addr, Some("127.0.0.1:9464".parse().unwrap()));
}

#[test]
fn non_numeric_duration_is_a_usage_error() {
    let err = Cli::try_parse_from(["inference-traffic", "--duration", "soon"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[test]
fn flags_override_profile() {
    let path = std::env::temp_dir().join(format!("loadgen-profile-{}.yaml", std::process::id()));
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "duration: 7\nconcurrency: 3\nprompt: from profile").unwrap();
    drop(f);

    let cli = Cli::try_parse_from([
        "inference-traffic",
        "--config", path.to_str().unwrap(),
        "--concurrency", "9",
    ])
    .unwrap();
    let cfg = cli.resolve().unwrap();
    assert_eq!(cfg.duration_secs, 7);
    assert_eq!(cfg.concurrency, 9);
    assert_eq!(cfg.prompt, "from profile");
    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_profile_fails_before_running() {
    let cli = Cli::try_parse_from(["inference-traffic", "--config", "/nonexistent/profile.yaml"]).unwrap();
    assert!(cli.resolve().is_err());
}

#[test]
fn negative_counts_are_usage_errors() {
    let err = Cli::try_parse_from(["inference-traffic", "--duration=-5"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    let err = Cli::try_parse_from(["inference-traffic", "--concurrency=-1"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[test]
fn largest_duration_is_accepted() {
    let cfg = Cli::try_parse_from(["inference-traffic", "--duration", "18446744073709551615"])
        .unwrap()
        .resolve()
        .unwrap();
    assert_eq!(cfg.duration_secs, u64::MAX);
}
