use async_trait::async_trait;
use dashlet_application::ports::ExternalConfigSource;
use dashlet_domain::{DocumentFormat, DomainError};
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;

const USER_AGENT: &str = concat!("Dashlet/", env!("CARGO_PKG_VERSION"), " (config-watch)");
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the external document over HTTP(S).
///
/// Every request carries a `t=<millis>` query parameter and `no-cache`
/// headers so intermediaries never serve a stale copy.
pub struct HttpConfigSource {
    url: String,
    client: reqwest::Client,
}

impl HttpConfigSource {
    pub fn new(url: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Fetch(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    fn cache_busted_url(&self) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}t={}",
            self.url,
            separator,
            chrono::Utc::now().timestamp_millis()
        )
    }

    fn format_for(&self, content_type: Option<&str>) -> DocumentFormat {
        content_type
            .and_then(DocumentFormat::from_content_type)
            .unwrap_or_else(|| DocumentFormat::from_path(&self.url))
    }
}

#[async_trait]
impl ExternalConfigSource for HttpConfigSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Value, DomainError> {
        let response = self
            .client
            .get(self.cache_busted_url())
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| DomainError::Fetch(format!("fetch error for {}: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(DomainError::Fetch(format!(
                "HTTP {} for {}",
                response.status().as_u16(),
                self.url
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Fetch(format!("read error for {}: {}", self.url, e)))?;

        self.format_for(content_type.as_deref()).parse(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
