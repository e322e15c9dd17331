use std::future::Future;
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, HOST};

use loadgen_common::{LoadgenError, Result};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const WARMUP_TIMEOUT: Duration = Duration::from_secs(60);

/// Outcome of one request. Transport failures carry status 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    pub status: u16,
    pub elapsed: Duration,
}

impl Exchange {
    pub const TRANSPORT_FAILURE: u16 = 0;

    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

/// Issues one request and never fails; errors are folded into [`Exchange::status`].
pub trait RequestSender: Send + Sync {
    fn send(&self, timeout: Duration) -> impl Future<Output = Exchange> + Send;
}

pub struct HttpSender {
    client: reqwest::Client,
    endpoint: String,
    payload: Bytes,
    headers: HeaderMap,
}

impl HttpSender {
    pub fn new(endpoint: impl Into<String>, virtual_host: &str, payload: Bytes) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let host = HeaderValue::from_str(virtual_host)
            .map_err(|e| LoadgenError::Config(format!("invalid virtual host {:?}: {}", virtual_host, e)))?;
        headers.insert(HOST, host);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, endpoint: endpoint.into(), payload, headers })
    }

    async fn exchange(&self, timeout: Duration) -> std::result::Result<u16, reqwest::Error> {
        let resp = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .body(self.payload.clone())
            .timeout(timeout)
            .send()
            .await?;
        let status = resp.status().as_u16();
        resp.bytes().await?;
        Ok(status)
    }
}

impl RequestSender for HttpSender {
    fn send(&self, timeout: Duration) -> impl Future<Output = Exchange> + Send {
        async move {
            let t0 = Instant::now();
            let status = match self.exchange(timeout).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::debug!(target: "sender", endpoint = %self.endpoint, error = %e, "transport failure");
                    Exchange::TRANSPORT_FAILURE
                }
            };
            Exchange { status, elapsed: t0.elapsed() }
        }
    }
}
