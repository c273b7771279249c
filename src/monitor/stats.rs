// Pipeline Statistics Tracker
//
// Counts what the dispatcher did with every item it consumed

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::info;

/// Statistics for the classification pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Certificate messages taken from the source
    pub events_received: u64,
    /// Messages that could not be decoded
    pub decode_errors: u64,
    /// Events dropped by the monitor gate
    pub events_dropped: u64,
    /// Events that passed the gate and were logged
    pub events_logged: u64,
    /// Logged events with a highlighted domain
    pub events_highlighted: u64,
    /// Notifications delivered
    pub alerts_sent: u64,
    /// Notifications that failed
    pub alerts_failed: u64,
    /// Errors received on the source error stream
    pub source_errors: u64,
    /// Records the sink failed to write
    pub sink_errors: u64,
    /// Start time
    #[serde(skip)]
    pub start_time: Option<Instant>,
    /// Total processing time in seconds
    pub processing_time_secs: u64,
}

/// Thread-safe statistics tracker
#[derive(Clone)]
pub struct StatsTracker {
    stats: Arc<Mutex<Stats>>,
}

impl StatsTracker {
    /// Create a new statistics tracker
    pub fn new() -> Self {
        let stats = Stats {
            start_time: Some(Instant::now()),
            ..Default::default()
        };

        Self {
            stats: Arc::new(Mutex::new(stats)),
        }
    }

    fn update(&self, f: impl FnOnce(&mut Stats)) {
        if let Ok(mut stats) = self.stats.lock() {
            f(&mut stats);
        }
    }

    pub fn increment_received(&self) {
        self.update(|s| s.events_received += 1);
    }

    pub fn increment_decode_errors(&self) {
        self.update(|s| s.decode_errors += 1);
    }

    pub fn increment_dropped(&self) {
        self.update(|s| s.events_dropped += 1);
    }

    /// Count a logged event, and whether it was highlighted
    pub fn increment_logged(&self, highlighted: bool) {
        self.update(|s| {
            s.events_logged += 1;
            if highlighted {
                s.events_highlighted += 1;
            }
        });
    }

    pub fn increment_alerts_sent(&self) {
        self.update(|s| s.alerts_sent += 1);
    }

    pub fn increment_alerts_failed(&self) {
        self.update(|s| s.alerts_failed += 1);
    }

    pub fn increment_source_errors(&self) {
        self.update(|s| s.source_errors += 1);
    }

    pub fn increment_sink_errors(&self) {
        self.update(|s| s.sink_errors += 1);
    }

    /// Get current statistics snapshot
    pub fn get_snapshot(&self) -> Stats {
        if let Ok(mut stats) = self.stats.lock() {
            if let Some(start_time) = stats.start_time {
                stats.processing_time_secs = start_time.elapsed().as_secs();
            }

            stats.clone()
        } else {
            Stats::default()
        }
    }

    /// Get processing rate (certificates per second)
    pub fn get_processing_rate(&self) -> f64 {
        if let Ok(stats) = self.stats.lock()
            && let Some(start_time) = stats.start_time
        {
            let elapsed = start_time.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                return stats.events_received as f64 / elapsed;
            }
        }
        0.0
    }

    /// Log a one-line summary
    pub fn log_stats(&self) {
        let snapshot = self.get_snapshot();
        info!(
            "Stats: {} received ({:.1}/s), {} dropped, {} logged ({} highlighted), {} alerts sent, {} alerts failed, {} decode errors, {} stream errors",
            snapshot.events_received,
            self.get_processing_rate(),
            snapshot.events_dropped,
            snapshot.events_logged,
            snapshot.events_highlighted,
            snapshot.alerts_sent,
            snapshot.alerts_failed,
            snapshot.decode_errors,
            snapshot.source_errors,
        );
    }

    /// Log a summary every `period` until the returned task is aborted
    pub fn spawn_reporter(&self, period: Duration) -> JoinHandle<()> {
        let stats = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // the first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                stats.log_stats();
            }
        })
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
