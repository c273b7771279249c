// Alert System - Push notifications for alert-tier matches

pub mod channels;
pub mod pushover;

use crate::Result;
use crate::monitor::config::AlertsConfig;
use chrono::{DateTime, Utc};
use futures::future::join_all;

pub use channels::AlertChannel;
pub use pushover::PushoverChannel;

/// Alert message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Domain that triggered the alert
    pub domain: String,
    /// Every domain on the certificate, space separated
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    /// Alert for a newly issued certificate covering `domain`
    pub fn new_certificate(domain: &str, all_domains: &[String]) -> Self {
        Self {
            domain: domain.to_string(),
            title: all_domains.join(" "),
            message: format!("New TLS certificate for {}", domain),
            timestamp: Utc::now(),
        }
    }

    /// Alert used to exercise channels
    pub fn test() -> Self {
        Self {
            domain: "test.example.com".to_string(),
            title: "certwatch test alert".to_string(),
            message: "Test alert from certwatch".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Alert manager - fans one alert out to every configured channel
#[derive(Default)]
pub struct AlertManager {
    channels: Vec<Box<dyn AlertChannel>>,
}

impl AlertManager {
    /// Create an alert manager with no channels
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from configuration
    pub fn from_config(config: &AlertsConfig) -> Result<Self> {
        let mut manager = Self::new();

        if let Some(ref pushover_config) = config.pushover
            && pushover_config.enabled
        {
            let channel = PushoverChannel::new(pushover_config.clone())?;
            manager.add_channel(Box::new(channel));
        }

        Ok(manager)
    }

    /// Add an alert channel
    pub fn add_channel(&mut self, channel: Box<dyn AlertChannel>) {
        self.channels.push(channel);
    }

    /// Deliver an alert through every channel concurrently
    ///
    /// Returns one outcome per channel. Failures are independent: one channel
    /// failing never prevents delivery through the others.
    pub async fn deliver(&self, alert: &Alert) -> Vec<(String, Result<()>)> {
        let tasks = self.channels.iter().map(|channel| async move {
            let result = channel.send_alert(alert).await;
            (channel.channel_name().to_string(), result)
        });

        join_all(tasks).await
    }

    /// Get channel count
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Check credentials and send a test alert through every channel
    pub async fn test_channels(&self) -> Vec<(String, Result<()>)> {
        let mut results = Vec::new();
        let test_alert = Alert::test();

        for channel in &self.channels {
            let result = match channel.test_connection().await {
                Ok(()) => channel.send_alert(&test_alert).await,
                Err(e) => Err(e),
            };
            results.push((channel.channel_name().to_string(), result));
        }

        results
    }
}
