pub type Result<T> = core::result::Result<T, LoadgenError>;

#[derive(thiserror::Error, Debug)]
pub enum LoadgenError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config profile: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("payload encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub mod config {
    use serde::Deserialize;
    use std::net::SocketAddr;
    use std::path::Path;
    use std::time::Duration;

    use crate::{LoadgenError, Result};

    pub const DEFAULT_ELB_HOST: &str =
        "k8s-nginxgat-llmgatew-bda66d5efd-8abb027b3d9f5051.elb.us-east-1.amazonaws.com";
    pub const DEFAULT_VIRTUAL_HOST: &str = "inference.llm.local";
    pub const DEFAULT_DURATION_SECS: u64 = 300;
    pub const DEFAULT_CONCURRENCY: usize = 24;
    pub const DEFAULT_MODEL: &str = "TinyLlama/TinyLlama-1.1B-Chat-v1.0";
    pub const DEFAULT_MAX_TOKENS: u32 = 50;
    pub const DEFAULT_PROMPT: &str = "In one sentence, what is machine learning?";

    pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

    /// Fully resolved settings for one load test run.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LoadConfig {
        pub elb_host: String,
        pub virtual_host: String,
        pub duration_secs: u64,
        pub concurrency: usize,
        pub model: String,
        pub max_tokens: u32,
        pub prompt: String,
        pub metrics_addr: Option<SocketAddr>,
    }

    impl Default for LoadConfig {
        fn default() -> Self {
            Self {
                elb_host: DEFAULT_ELB_HOST.into(),
                virtual_host: DEFAULT_VIRTUAL_HOST.into(),
                duration_secs: DEFAULT_DURATION_SECS,
                concurrency: DEFAULT_CONCURRENCY,
                model: DEFAULT_MODEL.into(),
                max_tokens: DEFAULT_MAX_TOKENS,
                prompt: DEFAULT_PROMPT.into(),
                metrics_addr: None,
            }
        }
    }

    impl LoadConfig {
        pub fn endpoint(&self) -> String {
            format!("http://{}{}", self.elb_host, CHAT_COMPLETIONS_PATH)
        }

        pub fn duration(&self) -> Duration {
            Duration::from_secs(self.duration_secs)
        }

        /// Layers a profile over the built-in defaults.
        pub fn from_profile(profile: ConfigProfile) -> Self {
            let mut cfg = Self::default();
            if let Some(v) = profile.elb_host { cfg.elb_host = v; }
            if let Some(v) = profile.virtual_host { cfg.virtual_host = v; }
            if let Some(v) = profile.duration { cfg.duration_secs = v; }
            if let Some(v) = profile.concurrency { cfg.concurrency = v; }
            if let Some(v) = profile.model { cfg.model = v; }
            if let Some(v) = profile.max_tokens { cfg.max_tokens = v; }
            if let Some(v) = profile.prompt { cfg.prompt = v; }
            if let Some(v) = profile.metrics_addr { cfg.metrics_addr = Some(v); }
            cfg
        }

        pub fn validate(&self) -> Result<()> {
            if self.elb_host.trim().is_empty() {
                return Err(LoadgenError::Config("elb host must not be empty".into()));
            }
            if self.virtual_host.trim().is_empty() {
                return Err(LoadgenError::Config("virtual host must not be empty".into()));
            }
            Ok(())
        }
    }

    /// Optional YAML profile; every field may be omitted.
    #[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
    #[serde(default, deny_unknown_fields)]
    pub struct ConfigProfile {
        pub elb_host: Option<String>,
        pub virtual_host: Option<String>,
        pub duration: Option<u64>,
        pub concurrency: Option<usize>,
        pub model: Option<String>,
        pub max_tokens: Option<u32>,
        pub prompt: Option<String>,
        pub metrics_addr: Option<SocketAddr>,
    }

    impl ConfigProfile {
        pub fn parse(text: &str) -> Result<Self> {
            if text.trim().is_empty() {
                return Ok(Self::default());
            }
            Ok(serde_yaml::from_str(text)?)
        }

        pub fn load(path: &Path) -> Result<Self> {
            let text = std::fs::read_to_string(path).map_err(|e| {
                LoadgenError::Config(format!("cannot read profile {}: {}", path.display(), e))
            })?;
            Self::parse(&text)
        }
    }
}
