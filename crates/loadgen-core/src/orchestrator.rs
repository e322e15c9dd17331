use std::sync::Arc;
use std::time::Instant;

use loadgen_common::config::LoadConfig;
use loadgen_common::Result;

use crate::payload::make_payload;
use crate::report::{self, Console};
use crate::sender::{Exchange, HttpSender, RequestSender, WARMUP_TIMEOUT};
use crate::stats::{Stats, StatsSnapshot};
use crate::worker::{deadline_after, worker_loop, WorkerContext};

/// Pass/fail decision of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub const MAX_ERROR_RATE: f64 = 0.1;

    /// Passes only when errors are strictly below 10% of the total, so a run
    /// with no requests at all fails.
    pub fn from_counts(ok: u64, err: u64) -> Self {
        let total = ok + err;
        if (err as f64) < total as f64 * Self::MAX_ERROR_RATE { Verdict::Pass } else { Verdict::Fail }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub warmup: Exchange,
    pub snapshot: StatsSnapshot,
    pub verdict: Verdict,
}

pub struct LoadTest<S> {
    config: LoadConfig,
    sender: Arc<S>,
    console: Console,
}

impl LoadTest<HttpSender> {
    /// Builds the payload and HTTP sender described by `config`.
    pub fn from_config(config: LoadConfig, console: Console) -> Result<Self> {
        let payload = make_payload(&config.model, &config.prompt, config.max_tokens)?;
        let sender = HttpSender::new(config.endpoint(), &config.virtual_host, payload)?;
        Ok(Self::new(config, sender, console))
    }
}

impl<S: RequestSender + 'static> LoadTest<S> {
    pub fn new(config: LoadConfig, sender: S, console: Console) -> Self {
        Self { config, sender: Arc::new(sender), console }
    }

    pub async fn run(&self) -> RunOutcome {
        let cfg = &self.config;
        tracing::info!(
            target: "loadtest",
            endpoint = %cfg.endpoint(),
            virtual_host = %cfg.virtual_host,
            duration_secs = cfg.duration_secs,
            concurrency = cfg.concurrency,
            "starting load test"
        );
        self.console.line(&report::banner(cfg));
        self.console.line("");

        let warmup = self.warm_up().await;

        let stats = Stats::new();
        let ctx = WorkerContext {
            deadline: deadline_after(stats.start_time(), cfg.duration()),
            duration: cfg.duration(),
            stats: stats.clone(),
            console: self.console.clone(),
        };

        self.console.line(&report::starting_line(cfg.concurrency, cfg.duration_secs));
        let mut handles = Vec::with_capacity(cfg.concurrency);
        for worker_id in 0..cfg.concurrency {
            let sender = self.sender.clone();
            let ctx = ctx.clone();
            handles.push(tokio::spawn(async move { worker_loop(worker_id, sender.as_ref(), &ctx).await }));
        }
        for (worker_id, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(sent) => tracing::debug!(target: "loadtest", worker_id, sent, "worker joined"),
                Err(e) => tracing::error!(target: "loadtest", worker_id, error = %e, "worker task failed"),
            }
        }

        let snapshot = stats.snapshot_at(Instant::now());
        self.console.line("");
        self.console.line(&report::final_summary(&snapshot, cfg.concurrency));

        let verdict = Verdict::from_counts(snapshot.ok, snapshot.err);
        tracing::info!(
            target: "loadtest",
            total = snapshot.total(),
            ok = snapshot.ok,
            err = snapshot.err,
            ?verdict,
            "load test finished"
        );
        RunOutcome { warmup, snapshot, verdict }
    }

    async fn warm_up(&self) -> Exchange {
        self.console.print("  Warm-up request... ");
        let exchange = self.sender.send(WARMUP_TIMEOUT).await;
        self.console.line(&report::warmup_result(&exchange));
        self.console.line("");
        if !exchange.is_success() {
            tracing::warn!(target: "loadtest", status = exchange.status, "warm-up request failed, proceeding anyway");
        }
        exchange
    }
}
