//! Console output: banner, warm-up result, progress lines and the final summary.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use loadgen_common::config::{LoadConfig, CHAT_COMPLETIONS_PATH};

use crate::sender::Exchange;
use crate::stats::StatsSnapshot;

const RULE_WIDTH: usize = 52;

/// Line-oriented sink shared by the orchestrator and every worker.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Arc::new(Mutex::new(Box::new(out))) }
    }

    pub fn stdout() -> Self { Self::new(io::stdout()) }

    /// Console writing into an in-memory buffer, for inspection after a run.
    pub fn capture() -> (Self, CaptureBuffer) {
        let buf = CaptureBuffer::default();
        (Self::new(buf.clone()), buf)
    }

    /// Writes without a trailing newline and flushes.
    pub fn print(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    pub fn line(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }
}

#[derive(Clone, Default)]
pub struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

impl CaptureBuffer {
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

fn rule() -> String { "=".repeat(RULE_WIDTH) }

fn millis(d: Duration) -> f64 { d.as_secs_f64() * 1000.0 }

pub fn banner(config: &LoadConfig) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "{}", rule());
    let _ = writeln!(s, "  Inference Pool Traffic Generator");
    let _ = writeln!(s, "{}", rule());
    let _ = writeln!(s, "  ELB:         {}", config.elb_host);
    let _ = writeln!(s, "  Host Header: {}", config.virtual_host);
    let _ = writeln!(s, "  Endpoint:    POST {}", CHAT_COMPLETIONS_PATH);
    let _ = writeln!(s, "  Model:       {}", config.model);
    let _ = writeln!(s, "  Max Tokens:  {}", config.max_tokens);
    let _ = writeln!(s, "  Duration:    {}s", config.duration_secs);
    let _ = writeln!(s, "  Concurrency: {} workers", config.concurrency);
    let _ = write!(s, "{}", rule());
    s
}

/// Result text printed after `Warm-up request...`; failures get a second warning line.
pub fn warmup_result(exchange: &Exchange) -> String {
    if exchange.is_success() {
        format!("OK ({}, {:.0}ms)", exchange.status, millis(exchange.elapsed))
    } else {
        format!(
            "FAILED (status={}, {:.0}ms)\n  WARNING: Warm-up request failed. Proceeding anyway...",
            exchange.status,
            millis(exchange.elapsed)
        )
    }
}

pub fn starting_line(concurrency: usize, duration_secs: u64) -> String {
    format!("  [{:>3}s] Starting {} workers for {}s...", 0, concurrency, duration_secs)
}

pub fn progress_line(snapshot: &StatsSnapshot, duration_secs: u64) -> String {
    let elapsed = snapshot.elapsed.as_secs();
    let remaining = duration_secs.saturating_sub(elapsed);
    format!("  [{:>3}s] {} | {}s remaining", elapsed, snapshot.summary(), remaining)
}

pub fn final_summary(snapshot: &StatsSnapshot, concurrency: usize) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "{}", rule());
    let _ = writeln!(s, "  Inference Traffic \u{2014} Final Summary");
    let _ = writeln!(s, "{}", rule());
    let _ = writeln!(s, "  Duration:    {:.0}s", snapshot.elapsed.as_secs_f64());
    let _ = writeln!(s, "  Concurrency: {}", concurrency);
    let _ = writeln!(s, "  Total:       {}", snapshot.total());
    let _ = writeln!(s, "  Success:     {}", snapshot.ok);
    let _ = writeln!(s, "  Errors:      {}", snapshot.err);
    if let (Some(min), Some(max)) = (snapshot.min_latency(), snapshot.max_latency()) {
        let _ = writeln!(s, "  Avg RPS:     {:.2}", snapshot.rps());
        let _ = writeln!(s, "  Avg Latency: {:.0}ms", snapshot.avg_latency_ms());
        let _ = writeln!(s, "  Min Latency: {:.0}ms", millis(min));
        let _ = writeln!(s, "  Max Latency: {:.0}ms", millis(max));
    }
    if let Some(rate) = snapshot.success_rate() {
        let _ = writeln!(s, "  Success Rate:{:.1}%", rate);
    }
    let _ = write!(s, "{}", rule());
    s
}
