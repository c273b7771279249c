// Certstream Message Parser
//
// Decodes certstream JSON messages into certificate events

use super::Result;
use crate::error::WatchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message type certstream uses for keep-alive frames
pub const HEARTBEAT_MESSAGE_TYPE: &str = "heartbeat";

/// One observed certificate issuance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateEvent {
    /// Subject Common Name (empty when absent)
    pub primary_subject: String,
    /// Every domain covered by the certificate, in feed order
    pub all_domains: Vec<String>,
    /// Name of the CT log the entry came from
    pub log_source: Option<String>,
    /// Entry index in that log
    pub cert_index: Option<u64>,
}

impl CertificateEvent {
    /// Create an event from a subject and domain list
    pub fn new(primary_subject: impl Into<String>, all_domains: Vec<String>) -> Self {
        Self {
            primary_subject: primary_subject.into(),
            all_domains,
            log_source: None,
            cert_index: None,
        }
    }

    /// Decode a certstream `certificate_update` message
    ///
    /// A missing or non-string subject CN decodes as empty. A missing or
    /// non-string-array `all_domains` makes the whole message undecodable.
    pub fn from_message(message: &Value) -> Result<Self> {
        let primary_subject = message
            .pointer("/data/leaf_cert/subject/CN")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let domains_value = message
            .pointer("/data/leaf_cert/all_domains")
            .ok_or_else(|| WatchError::DecodeError {
                message: "missing data.leaf_cert.all_domains".to_string(),
            })?;

        let all_domains = Vec::<String>::deserialize(domains_value).map_err(|e| {
            WatchError::DecodeError {
                message: format!("invalid data.leaf_cert.all_domains: {}", e),
            }
        })?;

        let log_source = message
            .pointer("/data/source/name")
            .and_then(Value::as_str)
            .map(str::to_string);

        let cert_index = message.pointer("/data/cert_index").and_then(Value::as_u64);

        Ok(Self {
            primary_subject,
            all_domains,
            log_source,
            cert_index,
        })
    }
}

/// Returns true for certstream keep-alive messages
pub fn is_heartbeat(message: &Value) -> bool {
    message.get("message_type").and_then(Value::as_str) == Some(HEARTBEAT_MESSAGE_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn certificate_update(cn: Value, all_domains: Value) -> Value {
        json!({
            "message_type": "certificate_update",
            "data": {
                "update_type": "X509LogEntry",
                "cert_index": 712345,
                "leaf_cert": {
                    "subject": { "CN": cn, "O": null },
                    "all_domains": all_domains,
                },
                "source": { "name": "Google 'Argon2025h1' log", "url": "https://ct.googleapis.com/logs/us1/argon2025h1/" }
            }
        })
    }

    #[test]
    fn test_decode_certificate_update() {
        let msg = certificate_update(json!("example.com"), json!(["example.com", "www.example.com"]));
        let event = CertificateEvent::from_message(&msg).unwrap();

        assert_eq!(event.primary_subject, "example.com");
        assert_eq!(event.all_domains, vec!["example.com", "www.example.com"]);
        assert_eq!(event.cert_index, Some(712345));
        assert_eq!(event.log_source.as_deref(), Some("Google 'Argon2025h1' log"));
    }

    #[test]
    fn test_missing_subject_decodes_empty() {
        let msg = certificate_update(Value::Null, json!(["a.test"]));
        let event = CertificateEvent::from_message(&msg).unwrap();
        assert_eq!(event.primary_subject, "");
        assert_eq!(event.all_domains, vec!["a.test"]);
    }

    #[test]
    fn test_missing_domains_is_decode_error() {
        let msg = json!({ "message_type": "certificate_update", "data": { "leaf_cert": { "subject": { "CN": "x" } } } });
        let err = CertificateEvent::from_message(&msg).unwrap_err();
        assert!(matches!(err, WatchError::DecodeError { .. }));
    }

    #[test]
    fn test_non_string_domain_is_decode_error() {
        let msg = certificate_update(json!("x.test"), json!(["x.test", 42]));
        assert!(CertificateEvent::from_message(&msg).is_err());

        let msg = certificate_update(json!("x.test"), json!("x.test"));
        assert!(CertificateEvent::from_message(&msg).is_err());
    }

    #[test]
    fn test_heartbeat_detection() {
        assert!(is_heartbeat(&json!({ "message_type": "heartbeat", "timestamp": 1.0 })));
        assert!(!is_heartbeat(&certificate_update(json!("a"), json!(["a"]))));
        assert!(!is_heartbeat(&json!({})));
    }
}
