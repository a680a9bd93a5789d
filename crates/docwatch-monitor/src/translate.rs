//! Best-effort language normalization.
//!
//! Translation is never load-bearing: every caller falls back to the
//! untranslated text when the service misbehaves, so the status keeps
//! flowing in its source language rather than the cycle failing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::MonitorError;

/// Translates status text into the configured target language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, MonitorError>;
}

/// Pass-through translator for setups that want the source language as-is.
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, text: &str) -> Result<String, MonitorError> {
        Ok(text.to_string())
    }
}

/// Client for a Google-Translate-style endpoint
/// (`?client=gtx&sl=..&tl=..&dt=t&q=..`). The response is a nested JSON
/// array whose first element holds `[translated, original, ...]` segments.
pub struct HttpTranslator {
    client: Client,
    url: String,
    source_lang: String,
    target_lang: String,
}

impl HttpTranslator {
    /// # Errors
    ///
    /// Returns [`MonitorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        url: &str,
        source_lang: &str,
        target_lang: &str,
        timeout_secs: u64,
    ) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str) -> Result<String, MonitorError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source_lang.as_str()),
                ("tl", self.target_lang.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body: Value = response.json().await?;
        parse_translation(&body).ok_or_else(|| MonitorError::Translate {
            reason: "unexpected response shape from translation endpoint".to_string(),
        })
    }
}

/// Joins the translated segments from the endpoint's nested-array payload.
/// Returns `None` when the payload does not have the expected shape or
/// yields no text.
fn parse_translation(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let mut out = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            out.push_str(part);
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
