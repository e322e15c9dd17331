use std::time::{Duration, Instant};

use crate::report::{progress_line, Console};
use crate::sender::{RequestSender, REQUEST_TIMEOUT};
use crate::stats::Stats;

/// A progress line is printed whenever the global total lands on a multiple of this.
pub const PROGRESS_EVERY: u64 = 50;

/// Used when the requested duration does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `start + duration`, clamped instead of overflowing for huge durations.
pub fn deadline_after(start: Instant, duration: Duration) -> Instant {
    start
        .checked_add(duration)
        .or_else(|| start.checked_add(FAR_FUTURE))
        .unwrap_or(start)
}

/// State shared read-only by every worker of one run.
#[derive(Clone)]
pub struct WorkerContext {
    pub stats: Stats,
    pub deadline: Instant,
    pub duration: Duration,
    pub console: Console,
}

struct ActiveWorker;

impl ActiveWorker {
    fn enter() -> Self {
        loadgen_obs::ACTIVE_WORKERS.inc();
        Self
    }
}

impl Drop for ActiveWorker {
    fn drop(&mut self) { loadgen_obs::ACTIVE_WORKERS.dec(); }
}

/// Sends requests back to back until the deadline passes; returns how many this worker issued.
pub async fn worker_loop<S: RequestSender>(worker_id: usize, sender: &S, ctx: &WorkerContext) -> u64 {
    let _active = ActiveWorker::enter();
    let mut sent = 0u64;
    while Instant::now() < ctx.deadline {
        let exchange = sender.send(REQUEST_TIMEOUT).await;
        sent += 1;
        let total = if exchange.is_success() {
            loadgen_obs::observe_success(exchange.elapsed.as_secs_f64());
            ctx.stats.record_success(exchange.elapsed)
        } else {
            loadgen_obs::observe_error();
            ctx.stats.record_error()
        };

        if total > 0 && total % PROGRESS_EVERY == 0 {
            let snapshot = ctx.stats.snapshot();
            ctx.console.line(&progress_line(&snapshot, ctx.duration.as_secs()));
        }
    }
    sent
}
