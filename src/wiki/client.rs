// src/wiki/client.rs
use std::time::Duration;

use reqwest::header;

use crate::utils::error::FetchError;
use crate::utils::urls::encode_page_id;

// The wiki sits behind a shared department host that rejects obvious bots,
// so requests carry ordinary browser headers.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,zh-TW;q=0.8";

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF_MS: u64 = 1_000;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the DokuWiki installation.
///
/// Holds the site base URL and a politeness delay applied after every
/// successful fetch, so successive page requests never hammer the host.
pub struct WikiClient {
    http: reqwest::Client,
    base_url: String,
    request_delay: Duration,
}

impl WikiClient {
    pub fn new(base_url: &str, request_delay_ms: u64) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_delay: Duration::from_millis(request_delay_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of a wiki page, with the id percent-encoded except for the
    /// namespace colon DokuWiki expects verbatim.
    pub fn page_url(&self, page_id: &str) -> String {
        format!("{}/doku.php?id={}", self.base_url, encode_page_id(page_id))
    }

    /// Fetches a page's rendered HTML, retrying transient failures with
    /// exponential backoff (1s, 2s) before giving up.
    ///
    /// Callers treat an exhausted fetch as a degraded topic, not a fatal
    /// error, so the scrape keeps going with whatever pages did arrive.
    pub async fn fetch_page(&self, page_id: &str) -> Result<String, FetchError> {
        let url = self.page_url(page_id);

        for attempt in 1..=MAX_ATTEMPTS {
            match self.fetch_once(&url).await {
                Ok(body) => {
                    // Politeness delay between successive page fetches.
                    tokio::time::sleep(self.request_delay).await;
                    return Ok(body);
                }
                Err(e) => {
                    tracing::warn!(
                        "Attempt {}/{} for page '{}' failed: {}",
                        attempt,
                        MAX_ATTEMPTS,
                        page_id,
                        e
                    );
                    if attempt < MAX_ATTEMPTS {
                        let backoff =
                            Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt - 1));
                        tracing::debug!("Backing off {:.1}s before retry", backoff.as_secs_f64());
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            page_id: page_id.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!("Fetching: {}", url);

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, ACCEPT)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP error status: {} for URL: {}", status, url);
            return Err(FetchError::Http(status));
        }

        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_encodes_id_but_keeps_namespace_colon() {
        let client = WikiClient::new("https://sbl.csie.org/JuanLab/", 0).unwrap();
        assert_eq!(
            client.page_url("members:start"),
            "https://sbl.csie.org/JuanLab/doku.php?id=members:start"
        );
        assert_eq!(
            client.page_url("PI:Hsueh-Fen Juan"),
            "https://sbl.csie.org/JuanLab/doku.php?id=PI:Hsueh-Fen%20Juan"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = WikiClient::new("https://sbl.csie.org/JuanLab///", 0).unwrap();
        assert_eq!(client.base_url(), "https://sbl.csie.org/JuanLab");
    }
}
