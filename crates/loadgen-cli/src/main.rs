use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use loadgen_cli::Cli;
use loadgen_core::report::Console;
use loadgen_core::LoadTest;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let config = match Cli::parse().resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return Err(e.into());
        }
    };
    loadgen_obs::init();
    let exporter = match config.metrics_addr {
        Some(addr) => Some(
            loadgen_obs::spawn_exporter(addr)
                .await
                .with_context(|| format!("binding metrics exporter on {}", addr))?,
        ),
        None => None,
    };

    let test = LoadTest::from_config(config, Console::stdout())?;
    let outcome = test.run().await;

    if let Some((addr, handle)) = exporter {
        tracing::info!("stopping metrics exporter on {}", addr);
        handle.abort();
    }
    tracing::info!(exit_code = outcome.verdict.exit_code(), "exiting");
    Ok(ExitCode::from(outcome.verdict.exit_code() as u8))
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );

    #[cfg(feature = "otel")]
    if let Ok(endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        use opentelemetry_otlp::WithExportConfig;

        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(opentelemetry_otlp::new_exporter().tonic().with_endpoint(endpoint))
            .install_simple()
            .ok();
        if let Some(tracer) = tracer {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .with(tracing_opentelemetry::OpenTelemetryLayer::new(tracer))
                .init();
            return;
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
