use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Thread-safe request counters shared by every worker.
#[derive(Clone)]
pub struct Stats {
    inner: Arc<Mutex<StatsInner>>,
}

struct StatsInner {
    start_time: Instant,
    ok: u64,
    err: u64,
    latency_sum: Duration,
    latency_min: Option<Duration>,
    latency_max: Duration,
}

impl Default for Stats {
    fn default() -> Self { Self::new() }
}

impl Stats {
    pub fn new() -> Self { Self::started_at(Instant::now()) }

    pub fn started_at(start_time: Instant) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StatsInner {
                start_time,
                ok: 0,
                err: 0,
                latency_sum: Duration::ZERO,
                latency_min: None,
                latency_max: Duration::ZERO,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StatsInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start_time(&self) -> Instant { self.lock().start_time }

    /// Records a 2xx exchange and returns the new total.
    pub fn record_success(&self, latency: Duration) -> u64 {
        let mut inner = self.lock();
        inner.ok += 1;
        inner.latency_sum += latency;
        inner.latency_min = Some(inner.latency_min.map_or(latency, |m| m.min(latency)));
        inner.latency_max = inner.latency_max.max(latency);
        inner.ok + inner.err
    }

    /// Records a failed exchange and returns the new total.
    pub fn record_error(&self) -> u64 {
        let mut inner = self.lock();
        inner.err += 1;
        inner.ok + inner.err
    }

    /// Consistent view of all counters with elapsed time fixed at capture.
    pub fn snapshot(&self) -> StatsSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> StatsSnapshot {
        let inner = self.lock();
        StatsSnapshot {
            ok: inner.ok,
            err: inner.err,
            latency_sum: inner.latency_sum,
            latency_min: inner.latency_min,
            latency_max: inner.latency_max,
            elapsed: now.saturating_duration_since(inner.start_time),
        }
    }

    pub fn ok_count(&self) -> u64 { self.lock().ok }
    pub fn err_count(&self) -> u64 { self.lock().err }
    pub fn total(&self) -> u64 { self.snapshot().total() }
    pub fn elapsed(&self) -> Duration { self.snapshot().elapsed }
    pub fn rps(&self) -> f64 { self.snapshot().rps() }
    pub fn avg_latency_ms(&self) -> f64 { self.snapshot().avg_latency_ms() }
    pub fn min_latency(&self) -> Option<Duration> { self.snapshot().min_latency() }
    pub fn max_latency(&self) -> Option<Duration> { self.snapshot().max_latency() }
    pub fn summary(&self) -> String { self.snapshot().summary() }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub ok: u64,
    pub err: u64,
    pub latency_sum: Duration,
    pub latency_min: Option<Duration>,
    pub latency_max: Duration,
    pub elapsed: Duration,
}

impl StatsSnapshot {
    pub fn total(&self) -> u64 { self.ok + self.err }

    pub fn rps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.total() as f64 / secs } else { 0.0 }
    }

    pub fn avg_latency_ms(&self) -> f64 {
        if self.ok == 0 {
            return 0.0;
        }
        self.latency_sum.as_secs_f64() / self.ok as f64 * 1000.0
    }

    /// `None` until the first success.
    pub fn min_latency(&self) -> Option<Duration> { self.latency_min }

    pub fn max_latency(&self) -> Option<Duration> {
        (self.ok > 0).then_some(self.latency_max)
    }

    pub fn success_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.ok as f64 / total as f64 * 100.0)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ok, {} err, {:.1} req/s, avg {:.0}ms",
            self.ok,
            self.err,
            self.rps(),
            self.avg_latency_ms()
        )
    }
}
