// Event Dispatcher - The stream-consuming loop
//
// Takes one item at a time from the source, classifies certificate events,
// delivers alerts and writes records. Nothing here is fatal: every failure is
// recorded and the loop moves on to the next item.

use crate::ct_logs::{CertificateEvent, EventStreams, Incoming};
use crate::error::WatchError;
use crate::keywords::KeywordSet;
use crate::monitor::alerts::{Alert, AlertManager};
use crate::monitor::classifier::{Action, classify, format_domains};
use crate::monitor::sink::{RecordSink, Severity};
use crate::monitor::stats::StatsTracker;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Single-consumer dispatcher owning the record sink
pub struct Dispatcher<S: RecordSink> {
    keywords: Arc<KeywordSet>,
    sink: S,
    alerts: AlertManager,
    stats: StatsTracker,
}

impl<S: RecordSink> Dispatcher<S> {
    pub fn new(keywords: Arc<KeywordSet>, sink: S, alerts: AlertManager) -> Self {
        Self {
            keywords,
            sink,
            alerts,
            stats: StatsTracker::new(),
        }
    }

    /// Shared handle to the pipeline counters
    pub fn stats(&self) -> StatsTracker {
        self.stats.clone()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Consume the source until it closes or `shutdown` completes
    ///
    /// Shutdown is only observed between items; an item already taken is always
    /// processed to completion.
    pub async fn run<F>(&mut self, mut streams: EventStreams, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping dispatcher");
                    break;
                }
                item = streams.next() => match item {
                    Some(Incoming::Event(message)) => {
                        self.handle_message(&message).await;
                    }
                    Some(Incoming::Error(err)) => self.handle_source_error(&err),
                    None => {
                        warn!("Certificate source closed");
                        break;
                    }
                },
            }
        }

        self.sync();
        self.stats.log_stats();
    }

    /// Decode and process one raw message
    ///
    /// Returns `None` when the message could not be decoded.
    pub async fn handle_message(&mut self, message: &Value) -> Option<Action> {
        self.stats.increment_received();

        match CertificateEvent::from_message(message) {
            Ok(event) => Some(self.handle_event(&event).await),
            Err(e) => {
                self.stats.increment_decode_errors();
                self.record(
                    Severity::Error,
                    &format!("Error decoding certificate event, skipping: {}", e),
                );
                self.sync();
                None
            }
        }
    }

    /// Classify one event, deliver its alerts and write its record
    pub async fn handle_event(&mut self, event: &CertificateEvent) -> Action {
        let action = classify(event, &self.keywords);

        let Some(severity) = action.severity() else {
            self.stats.increment_dropped();
            return action;
        };

        debug!(
            "Monitored certificate {:?} (source: {}, index: {:?})",
            event.primary_subject,
            event.log_source.as_deref().unwrap_or("unknown"),
            event.cert_index
        );

        for domain in &action.alerted_domains {
            self.send_alert(domain, &event.all_domains).await;
        }

        self.record(severity, &format_domains(&event.all_domains));
        self.sync();
        self.stats.increment_logged(action.highlighted);

        action
    }

    /// Record an error from the source's error stream
    pub fn handle_source_error(&mut self, err: &WatchError) {
        self.stats.increment_source_errors();
        self.record(Severity::Error, &format!("Certificate stream error: {}", err));
        self.sync();
    }

    async fn send_alert(&mut self, domain: &str, all_domains: &[String]) {
        if self.alerts.is_empty() {
            debug!("No alert channels configured, skipping alert for {}", domain);
            return;
        }

        let alert = Alert::new_certificate(domain, all_domains);

        for (channel, result) in self.alerts.deliver(&alert).await {
            match result {
                Ok(()) => {
                    self.stats.increment_alerts_sent();
                    info!("Alert sent via {}: {}", channel, alert.message);
                }
                Err(e) => {
                    self.stats.increment_alerts_failed();
                    self.record(
                        Severity::Error,
                        &format!("Failed to send alert for {} via {}: {}", domain, channel, e),
                    );
                }
            }
        }
    }

    fn record(&mut self, severity: Severity, message: &str) {
        if let Err(e) = self.sink.append(severity, message) {
            self.stats.increment_sink_errors();
            error!("Failed to write {} record: {}", severity, e);
        }
    }

    fn sync(&mut self) {
        if let Err(e) = self.sink.sync() {
            self.stats.increment_sink_errors();
            error!("Failed to sync record log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::KeywordList;
    use serde_json::json;

    #[derive(Default)]
    struct MemorySink {
        records: Vec<(Severity, String)>,
        syncs: usize,
    }

    impl RecordSink for MemorySink {
        fn append(&mut self, severity: Severity, message: &str) -> crate::error::Result<()> {
            self.records.push((severity, message.to_string()));
            Ok(())
        }

        fn sync(&mut self) -> crate::error::Result<()> {
            self.syncs += 1;
            Ok(())
        }
    }

    fn dispatcher(monitor: &[&str], highlight: &[&str]) -> Dispatcher<MemorySink> {
        let keywords = KeywordSet::new(
            KeywordList::new(monitor).unwrap(),
            KeywordList::new(highlight).unwrap(),
            KeywordList::empty(),
        );
        Dispatcher::new(Arc::new(keywords), MemorySink::default(), AlertManager::new())
    }

    #[tokio::test]
    async fn test_dropped_event_writes_nothing() {
        let mut d = dispatcher(&["^brand"], &[]);
        let action = d
            .handle_event(&CertificateEvent::new("other.test", vec!["other.test".into()]))
            .await;

        assert!(!action.monitored);
        assert!(d.sink().records.is_empty());
        assert_eq!(d.sink().syncs, 0);
        assert_eq!(d.stats().get_snapshot().events_dropped, 1);
    }

    #[tokio::test]
    async fn test_logged_event_syncs() {
        let mut d = dispatcher(&[".*"], &["shop"]);
        d.handle_event(&CertificateEvent::new("shop.test", vec!["shop.test".into()]))
            .await;

        assert_eq!(d.sink().records, vec![(Severity::Critical, "[shop.test]".to_string())]);
        assert_eq!(d.sink().syncs, 1);
    }

    #[tokio::test]
    async fn test_undecodable_message() {
        let mut d = dispatcher(&[".*"], &[]);
        let action = d.handle_message(&json!({ "message_type": "certificate_update" })).await;

        assert!(action.is_none());
        assert_eq!(d.sink().records.len(), 1);
        assert_eq!(d.sink().records[0].0, Severity::Error);
        assert_eq!(d.stats().get_snapshot().decode_errors, 1);
    }

    #[tokio::test]
    async fn test_source_error_recorded() {
        let mut d = dispatcher(&[".*"], &[]);
        d.handle_source_error(&WatchError::Other("connection reset".to_string()));

        let (severity, message) = &d.sink().records[0];
        assert_eq!(*severity, Severity::Error);
        assert!(message.contains("connection reset"));
    }
}
