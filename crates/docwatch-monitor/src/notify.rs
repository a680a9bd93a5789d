//! Cycle-result notification.
//!
//! The notifier is a collaborator at the edge of the pipeline: failures are
//! logged and never fail the cycle.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::MonitorError;

/// Receives the final status text and whether it changed this cycle.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, status: &str, changed: bool) -> Result<(), MonitorError>;
}

/// Writes the outcome to the log. The default when no webhook is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, status: &str, changed: bool) -> Result<(), MonitorError> {
        if changed {
            tracing::warn!(status, "STATUS HAS CHANGED");
        } else {
            tracing::info!(status, "status unchanged from last check");
        }
        Ok(())
    }
}

/// Posts `{"status": ..., "changed": ...}` to a configured webhook.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// # Errors
    ///
    /// Returns [`MonitorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, status: &str, changed: bool) -> Result<(), MonitorError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({
                "status": status,
                "changed": changed,
            }))
            .send()
            .await?;

        let code = response.status();
        if !code.is_success() {
            return Err(MonitorError::Notify {
                reason: format!("webhook returned HTTP {code}"),
            });
        }
        Ok(())
    }
}
