//! reqwest-backed [`PageFetcher`].
//!
//! Sends every request with the fixed header set from [`FetchConfig`].
//! Non-success statuses are turned into [`ScrapeError::Status`].

use crate::{FetchConfig, PageFetcher, ScrapeError};

/// Fetches pages over HTTP with a fixed request identity.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose client sends the configured headers by default.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Parse`] if a header name or value is invalid,
    /// or [`ScrapeError::Http`] if the client cannot be built.
    pub fn new(config: &FetchConfig) -> Result<Self, ScrapeError> {
        let mut header_map = reqwest::header::HeaderMap::new();
        for (key, value) in &config.headers {
            let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ScrapeError::Parse(format!("invalid header name '{key}': {e}")))?;
            let val = reqwest::header::HeaderValue::from_str(value)
                .map_err(|e| ScrapeError::Parse(format!("invalid header value '{value}': {e}")))?;
            header_map.insert(name, val);
        }
        let client = reqwest::Client::builder()
            .default_headers(header_map)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ScrapeError::MissingUrl);
        }

        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        log::debug!("Fetched {} bytes from {url}", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_header_name() {
        let config = FetchConfig::new().with_header("Bad Header", "x");
        assert!(matches!(
            HttpFetcher::new(&config),
            Err(ScrapeError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn blank_url_is_rejected_before_any_request() {
        let fetcher = HttpFetcher::new(&FetchConfig::new()).unwrap();
        let result = fetcher.fetch_page("  ").await;
        assert!(matches!(result, Err(ScrapeError::MissingUrl)));
    }
}
