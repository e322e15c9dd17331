use clap::Parser;
use loadgen_cli::Cli;

// Environment is process-wide, so every env-dependent assertion lives in this one test.
#[test]
fn environment_sits_between_flags_and_defaults() {
    std::env::set_var("ELB_HOST", "env-gw.local");
    std::env::set_var("DURATION", "42");
    std::env::set_var("CONCURRENCY", "5");
    std::env::set_var("MODEL", "env/model");
    std::env::set_var("MAX_TOKENS", "17");
    std::env::set_var("VIRTUAL_HOST", "env.llm.local");

    let cfg = Cli::try_parse_from(["inference-traffic"]).unwrap().resolve().unwrap();
    assert_eq!(cfg.elb_host, "env-gw.local");
    assert_eq!(cfg.duration_secs, 42);
    assert_eq!(cfg.concurrency, 5);
    assert_eq!(cfg.model, "env/model");
    assert_eq!(cfg.max_tokens, 17);
    assert_eq!(cfg.virtual_host, "env.llm.local");

    let cfg = Cli::try_parse_from(["inference-traffic", "--duration", "3", "--model", "flag/model"])
        .unwrap()
        .resolve()
        .unwrap();
    assert_eq!(cfg.duration_secs, 3);
    assert_eq!(cfg.model, "flag/model");
    assert_eq!(cfg.concurrency, 5);

    std::env::set_var("DURATION", "not-a-number");
    assert!(Cli::try_parse_from(["inference-traffic"]).is_err());
}
