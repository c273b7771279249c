// Pushover Alert Channel - Push notifications through the Pushover API

use crate::Result;
use crate::error::WatchError;
use crate::monitor::alerts::{Alert, AlertChannel};
use crate::monitor::config::PushoverConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Pushover message endpoint
pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Pushover user/group key validation endpoint
pub const PUSHOVER_VALIDATE_URL: &str = "https://api.pushover.net/1/users/validate.json";

/// Pushover caps titles at 250 characters
const MAX_TITLE_CHARS: usize = 250;

/// Pushover caps messages at 1024 characters
const MAX_MESSAGE_CHARS: usize = 1024;

/// Pushover API response body
#[derive(Debug, Deserialize)]
struct PushoverResponse {
    status: i64,
    #[serde(default)]
    errors: Vec<String>,
}

/// Pushover alert channel
pub struct PushoverChannel {
    config: PushoverConfig,
    client: reqwest::Client,
}

impl PushoverChannel {
    /// Create new Pushover channel
    pub fn new(config: PushoverConfig) -> Result<Self> {
        if config.token.trim().is_empty() || config.user.trim().is_empty() {
            return Err(WatchError::ConfigError {
                message: "Pushover requires both an application token and a user key".to_string(),
            }
            .into());
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Form fields for one alert
    fn form_params(&self, alert: &Alert) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("token", self.config.token.clone()),
            ("user", self.config.user.clone()),
            ("title", truncate_chars(&alert.title, MAX_TITLE_CHARS)),
            ("message", truncate_chars(&alert.message, MAX_MESSAGE_CHARS)),
            ("timestamp", alert.timestamp.timestamp().to_string()),
        ];

        if let Some(ref device) = self.config.device {
            params.push(("device", device.clone()));
        }
        if let Some(priority) = self.config.priority {
            params.push(("priority", priority.to_string()));
        }

        params
    }

    /// Post a form and check both the HTTP status and the API status field
    async fn post_form(&self, url: &str, params: &[(&'static str, String)]) -> Result<()> {
        let response = self.client.post(url).form(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: Option<PushoverResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let details = parsed
                .map(|r| r.errors.join("; "))
                .filter(|e| !e.is_empty())
                .unwrap_or(body);
            return Err(WatchError::HttpError {
                status: status.as_u16(),
                details,
            }
            .into());
        }

        match parsed {
            Some(r) if r.status == 1 => Ok(()),
            Some(r) => Err(WatchError::NotificationRejected {
                channel: self.channel_name().to_string(),
                details: r.errors.join("; "),
            }
            .into()),
            None => Err(WatchError::NotificationRejected {
                channel: self.channel_name().to_string(),
                details: format!("unexpected response body: {}", body),
            }
            .into()),
        }
    }
}

#[async_trait]
impl AlertChannel for PushoverChannel {
    async fn send_alert(&self, alert: &Alert) -> Result<()> {
        let params = self.form_params(alert);
        self.post_form(&self.config.api_url, &params).await
    }

    fn channel_name(&self) -> &str {
        "pushover"
    }

    async fn test_connection(&self) -> Result<()> {
        let mut params = vec![
            ("token", self.config.token.clone()),
            ("user", self.config.user.clone()),
        ];
        if let Some(ref device) = self.config.device {
            params.push(("device", device.clone()));
        }

        self.post_form(&self.config.validate_url, &params).await
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
