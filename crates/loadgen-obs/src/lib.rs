//! Client-side load metrics and an optional Prometheus exporter

use std::net::SocketAddr;

use axum::{response::IntoResponse, routing::get, Router};
use once_cell::sync::Lazy;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, TextEncoder};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("loadgen_requests_total", "Requests issued by load workers, by outcome"),
        &["outcome"],
    )
    .expect("valid metric definition")
});

pub static REQUEST_LATENCY: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("loadgen_request_latency_seconds", "Latency of successful requests")
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .expect("valid metric definition")
});

pub static ACTIVE_WORKERS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("loadgen_active_workers", "Workers currently issuing requests").expect("valid metric definition")
});

static REGISTERED: Lazy<()> = Lazy::new(|| {
    let registry = prometheus::default_registry();
    let collectors: [Box<dyn prometheus::core::Collector>; 3] = [
        Box::new(REQUESTS_TOTAL.clone()),
        Box::new(REQUEST_LATENCY.clone()),
        Box::new(ACTIVE_WORKERS.clone()),
    ];
    for collector in collectors {
        if let Err(e) = registry.register(collector) {
            tracing::warn!(target: "obs", error = %e, "metric registration failed");
        }
    }
});

/// Registers the load metrics with the default registry. Safe to call repeatedly.
pub fn init() {
    Lazy::force(&REGISTERED);
}

pub fn observe_success(latency_secs: f64) {
    REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
    REQUEST_LATENCY.observe(latency_secs);
}

pub fn observe_error() {
    REQUESTS_TOTAL.with_label_values(&["error"]).inc();
}

/// Renders every metric in the default registry in the text exposition format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::warn!(target: "obs", error = %e, "metric encoding failed");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

async fn metrics() -> impl IntoResponse {
    ([("content-type", TextEncoder::new().format_type().to_string())], render())
}

pub fn router() -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/metrics", get(metrics))
}

/// Binds the exporter and serves it in the background until the handle is aborted.
pub async fn spawn_exporter(addr: SocketAddr) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
    init();
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tracing::info!(target: "obs", "metrics exporter listening on http://{}", local);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router()).await {
            tracing::error!(target: "obs", error = %e, "metrics exporter failed");
        }
    });
    Ok((local, handle))
}
