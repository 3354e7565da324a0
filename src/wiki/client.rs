// src/wiki/client.rs
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{header, StatusCode};

use crate::extractors::{parse_tables, RawTable};
use crate::utils::error::WikiError;
use crate::utils::html_debug;
use crate::wiki::models::page_url;
use crate::wiki::PageSource;

// Wikipedia asks API and page clients to identify themselves.
const WIKI_USER_AGENT: &str = "monthly_number_ones/0.1 (weekly number-one chart compiler)";
const WIKI_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 100;

/// Fetches rendered Wikipedia articles, one request at a time.
pub struct WikiClient {
    client: reqwest::Client,
    request_delay: Duration,
    debug_dir: Option<PathBuf>, // Raw pages are saved here when set
}

impl WikiClient {
    pub fn new(request_delay: Duration, debug_dir: Option<PathBuf>) -> Result<Self, WikiError> {
        let client = reqwest::Client::builder()
            .user_agent(WIKI_USER_AGENT)
            .timeout(Duration::from_secs(WIKI_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, request_delay, debug_dir })
    }

    /// Downloads the article with the given title and returns its HTML.
    pub async fn fetch_page(&self, title: &str) -> Result<String, WikiError> {
        let url = page_url(title);
        tracing::debug!("Downloading page from: {}", url);

        // Fixed delay before every request keeps the pressure on Wikipedia low.
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
            .send()
            .await?;

        if let Some(err) = status_error(response.status(), &url) {
            return Err(err);
        }

        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);

        if let Some(dir) = &self.debug_dir {
            match html_debug::save_annotated_page(dir, title, &body) {
                Ok(path) => tracing::info!("Saved debug page to: {}", path.display()),
                Err(e) => tracing::warn!("Failed to save debug page for '{}': {}", title, e),
            }
        }

        Ok(body)
    }
}

/// Maps a non-2xx status to the error the fallback chain reports; `None` on success.
fn status_error(status: StatusCode, url: &str) -> Option<WikiError> {
    if status.is_success() {
        return None;
    }
    if status == StatusCode::NOT_FOUND {
        tracing::debug!("Received 404 Not Found for URL: {}", url);
        return Some(WikiError::PageNotFound(url.to_string()));
    }
    if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN {
        tracing::warn!("Received {} - check User-Agent and request delay.", status);
        return Some(WikiError::RateLimited);
    }
    tracing::warn!("HTTP error status: {} for URL: {}", status, url);
    Some(WikiError::Http(status))
}

impl PageSource for WikiClient {
    async fn fetch_tables(&self, title: &str) -> Result<Vec<RawTable>, WikiError> {
        let html = self.fetch_page(title).await?;
        Ok(parse_tables(&html))
    }
}
