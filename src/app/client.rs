//! Synchronous HTTP client for page and asset requests
//!
//! All requests carry a spoofed browser `User-Agent` and stream their
//! response bodies; nothing is buffered beyond the caller's chunk size.
//! Execution is single-threaded throughout: every read blocks the calling
//! thread.

use url::Url;

use crate::constants::http;
use crate::errors::SourceError;

use super::source::{ChunkSource, HttpChunkSource};

/// Opens streamed chunk sources for URLs.
///
/// Entities depend on this seam rather than on a concrete client so that
/// tests can substitute call-counting stubs.
pub trait SourceOpener {
    fn open(&self, url: &str) -> Result<Box<dyn ChunkSource>, SourceError>;
}

/// Blocking HTTP client configured for Imgur scraping
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    /// Creates a client with the default user agent and timeouts
    pub fn new() -> Result<Self, SourceError> {
        Self::with_user_agent(http::USER_AGENT)
    }

    /// Creates a client with a custom user agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(http::DEFAULT_TIMEOUT)
            .connect_timeout(http::CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl SourceOpener for HttpClient {
    fn open(&self, url: &str) -> Result<Box<dyn ChunkSource>, SourceError> {
        let parsed = Url::parse(url).map_err(|e| SourceError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self.client.get(parsed).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        tracing::debug!("opened streamed response for {}", url);
        Ok(Box::new(HttpChunkSource::new(response)))
    }
}
