//! Sustained chat-completion load against an inference gateway

pub mod payload;
pub mod stats;
pub mod sender;
pub mod worker;
pub mod report;
pub mod orchestrator;

pub use orchestrator::{LoadTest, RunOutcome, Verdict};
pub use sender::{Exchange, HttpSender, RequestSender};
pub use stats::{Stats, StatsSnapshot};
