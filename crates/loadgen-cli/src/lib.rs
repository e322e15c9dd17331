//! Command-line surface of the inference traffic generator.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use loadgen_common::config::{ConfigProfile, LoadConfig};
use loadgen_common::Result;

/// Flags win over environment variables, which win over the optional YAML
/// profile, which wins over built-in defaults.
#[derive(Parser, Debug, Clone)]
#[command(name = "inference-traffic", version, about = "Inference pool load test via the gateway")]
pub struct Cli {
    /// Gateway ELB hostname
    #[arg(long, env = "ELB_HOST")]
    pub elb_host: Option<String>,

    /// Host header for the inference route
    #[arg(long, env = "VIRTUAL_HOST")]
    pub virtual_host: Option<String>,

    /// Test duration in seconds
    #[arg(long, env = "DURATION")]
    pub duration: Option<u64>,

    /// Number of concurrent workers
    #[arg(long, env = "CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Model name for the request payload
    #[arg(long, env = "MODEL")]
    pub model: Option<String>,

    /// Max tokens per response
    #[arg(long, env = "MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// Prompt to send in each request
    #[arg(long)]
    pub prompt: Option<String>,

    /// YAML profile with defaults for any of the above
    #[arg(long, env = "LOADGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Serve client-side Prometheus metrics on this address during the run
    #[arg(long, env = "METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,
}

impl Cli {
    pub fn resolve(self) -> Result<LoadConfig> {
        let profile = match &self.config {
            Some(path) => ConfigProfile::load(path)?,
            None => ConfigProfile::default(),
        };
        let mut cfg = LoadConfig::from_profile(profile);
        if let Some(v) = self.elb_host { cfg.elb_host = v; }
        if let Some(v) = self.virtual_host { cfg.virtual_host = v; }
        if let Some(v) = self.duration { cfg.duration_secs = v; }
        if let Some(v) = self.concurrency { cfg.concurrency = v; }
        if let Some(v) = self.model { cfg.model = v; }
        if let Some(v) = self.max_tokens { cfg.max_tokens = v; }
        if let Some(v) = self.prompt { cfg.prompt = v; }
        if let Some(v) = self.metrics_addr { cfg.metrics_addr = Some(v); }
        cfg.validate()?;
        Ok(cfg)
    }
}
