//! Page content sources.
//!
//! [`PageSource`] is the primary source of page markup for a record lookup;
//! [`FallbackFetcher`] is the secondary, direct status endpoint tried when
//! the primary page yields nothing usable. Both are trait boundaries so the
//! pipeline can be exercised against canned fixtures without a live portal.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::MonitorError;
use crate::retry::retry_with_backoff;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "uk-UA,uk;q=0.9,en-US;q=0.8,en;q=0.7";

/// Supplies raw page markup for a record lookup.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, record_code: &str) -> Result<Vec<u8>, MonitorError>;
}

/// Secondary direct retrieval of the same status content.
#[async_trait]
pub trait FallbackFetcher: Send + Sync {
    async fn fetch_direct(&self, record_code: &str) -> Result<Vec<u8>, MonitorError>;
}

/// HTTP-backed primary source: fetches the portal's status page for a
/// record code, retrying transient failures with back-off.
pub struct HttpPageSource {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpPageSource {
    /// Creates a source with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries,
            backoff_base_secs,
        })
    }

    fn page_url(&self, record_code: &str) -> Result<String, MonitorError> {
        build_url(&self.base_url, "/", record_code)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, record_code: &str) -> Result<Vec<u8>, MonitorError> {
        let url = self.page_url(record_code)?;
        retry_with_backoff(
            self.max_retries,
            self.backoff_base_secs.saturating_mul(1_000),
            || {
                let url = url.clone();
                async move {
                    let response = self
                        .client
                        .get(&url)
                        .header(reqwest::header::ACCEPT, ACCEPT_HTML)
                        .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
                        .header(reqwest::header::CACHE_CONTROL, "no-cache")
                        .send()
                        .await?;

                    let status = response.status();
                    if !status.is_success() {
                        return Err(MonitorError::UnexpectedStatus {
                            status: status.as_u16(),
                            url,
                        });
                    }
                    Ok(response.bytes().await?.to_vec())
                }
            },
        )
        .await
    }
}

/// HTTP-backed fallback: calls the portal's direct status endpoint with
/// AJAX-style headers. A single attempt, no retries; the fallback itself
/// is the retry.
pub struct HttpFallbackFetcher {
    client: Client,
    base_url: String,
    status_path: String,
}

impl HttpFallbackFetcher {
    /// # Errors
    ///
    /// Returns [`MonitorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        status_path: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            status_path: status_path.to_string(),
        })
    }

    fn status_url(&self, record_code: &str) -> Result<String, MonitorError> {
        build_url(&self.base_url, &self.status_path, record_code)
    }
}

#[async_trait]
impl FallbackFetcher for HttpFallbackFetcher {
    async fn fetch_direct(&self, record_code: &str) -> Result<Vec<u8>, MonitorError> {
        let url = self.status_url(record_code)?;
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(reqwest::header::REFERER, format!("{}/", self.base_url))
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Builds `{base}{path}?sessionId={record_code}` with proper encoding.
fn build_url(base: &str, path: &str, record_code: &str) -> Result<String, MonitorError> {
    let joined = format!("{base}{path}");
    let mut url = reqwest::Url::parse(&joined).map_err(|e| MonitorError::InvalidUrl {
        url: joined.clone(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut().append_pair("sessionId", record_code);
    Ok(url.to_string())
}
