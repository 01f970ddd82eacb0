#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Page fetching and markup text extraction.
//!
//! Provides the [`PageFetcher`] trait, the reqwest-backed [`http::HttpFetcher`]
//! implementation, and helpers in [`html`] for pulling plain text out of a
//! page's content container.
//!
//! This crate knows nothing about episodes or transcripts. It fetches raw
//! markup and hands it back to the caller.

pub mod html;
pub mod http;

use std::collections::BTreeMap;

/// Errors that can occur while fetching or reading a page.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// The requested URL.
        url: String,
        /// The response status code.
        status: u16,
    },

    /// A fetch was attempted without a URL.
    #[error("No URL to fetch")]
    MissingUrl,

    /// A URL could not be parsed or joined.
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL or href.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// Parsing the response body failed.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Request identity shared by every fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    /// HTTP headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl FetchConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an HTTP header to include in requests.
    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Adds every header from `headers`.
    #[must_use]
    pub fn with_headers<'a>(
        mut self,
        headers: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        for (key, value) in headers {
            self = self.with_header(key, value);
        }
        self
    }
}

/// Retrieves raw markup for a URL.
///
/// Implementations perform exactly one request per call. There is no
/// caching, retry or backoff at this layer.
pub trait PageFetcher: Send + Sync {
    /// Fetches the page at `url` and returns its body.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::MissingUrl`] for a blank URL, or any
    /// transport/status error from the underlying client.
    fn fetch_page(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<String, ScrapeError>> + Send;
}

/// Joins `href` onto `base`, trimming surrounding whitespace from the href.
///
/// Absolute hrefs replace the base entirely.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidUrl`] if either part cannot be parsed.
pub fn join_url(base: &str, href: &str) -> Result<String, ScrapeError> {
    let href = href.trim();
    let base_url = reqwest::Url::parse(base).map_err(|e| ScrapeError::InvalidUrl {
        url: base.to_owned(),
        message: e.to_string(),
    })?;
    base_url
        .join(href)
        .map(|url| url.to_string())
        .map_err(|e| ScrapeError::InvalidUrl {
            url: href.to_owned(),
            message: e.to_string(),
        })
}
