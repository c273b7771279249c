// Certificate Watch Pipeline
//
// This module turns the raw certificate stream into operator-facing output:
// - Classifies each certificate against the monitor, highlight and alert tiers
// - Sends push notifications for alert-tier matches
// - Writes one record per monitored certificate to the console and the log file
// - Records decode and stream errors without ever stopping the loop

pub mod alerts;
pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod sink;
pub mod stats;

// Re-export commonly used types
pub use alerts::{Alert, AlertChannel, AlertManager, PushoverChannel};
pub use classifier::{Action, classify, format_domains};
pub use config::{AlertsConfig, OutputConfig, PushoverConfig, StreamConfig, WatchConfig};
pub use dispatcher::Dispatcher;
pub use sink::{LogSink, Record, RecordSink, Severity};
pub use stats::{Stats, StatsTracker};
