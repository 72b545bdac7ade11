//! Error types for imgur_fetcher
//!
//! This module defines the error taxonomy for all components of the
//! application. Errors are designed to be actionable: each one identifies
//! the failing resource and the kind of failure without exposing partial
//! stack traces to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Transport-level errors raised while opening or reading a response
#[derive(Error, Debug)]
pub enum SourceError {
    /// Connection-level failure during a request or mid-transfer
    #[error("connection failed: {reason}")]
    Connection { reason: String },

    /// Server returned a non-success status code
    #[error("server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Invalid URL
    #[error("invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl From<reqwest::Error> for SourceError {
    fn from(error: reqwest::Error) -> Self {
        SourceError::Connection {
            reason: error.to_string(),
        }
    }
}

/// Metadata scraping and entity construction errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Input does not match the identifier grammar; raised before any
    /// network call and never retried
    #[error("invalid identifier {identifier:?}: expected one or more word characters")]
    InvalidIdentifier { identifier: String },

    /// A required metadata key was absent after a successful fetch
    #[error("incomplete metadata for {identifier:?}: missing {key}")]
    MetadataIncomplete { identifier: String, key: String },

    /// A present metadata value could not be parsed into its expected shape
    #[error("malformed metadata for {identifier:?}: {key} = {value:?}")]
    MalformedMetadata {
        identifier: String,
        key: String,
        value: String,
    },

    /// The underlying tokenizer could not decode the document
    #[error("markup parse failure: {reason}")]
    ParseFailure { reason: String },

    /// Transport failure while fetching a page
    #[error(transparent)]
    Connection(#[from] SourceError),

    /// Album metadata still unobtainable after one retry; terminal
    #[error("album {identifier:?} unavailable after retry")]
    InvalidAlbum {
        identifier: String,
        #[source]
        source: Box<FetchError>,
    },
}

/// Asset download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Transport failure while reading the asset stream
    #[error(transparent)]
    Source(#[from] SourceError),

    /// I/O failure while writing to the output sink
    #[error("failed writing to output")]
    Sink(#[from] std::io::Error),
}

impl DownloadError {
    /// Whether the batch driving loop should treat this failure as a
    /// retry signal rather than a terminal item failure
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, DownloadError::Source(SourceError::Connection { .. }))
    }
}

/// Filename template errors
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Pattern references a token that is unknown or unavailable for
    /// the entity being named
    #[error("unknown or unavailable template token {token:?}")]
    UnknownToken { token: String },

    /// Pattern contains an unterminated `{` placeholder
    #[error("unterminated template token starting at byte {position}")]
    Unterminated { position: usize },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// I/O error reading configuration
    #[error("I/O error reading configuration")]
    Io(#[from] std::io::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Metadata scraping error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Asset download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Filename template error
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("{message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Whether the batch driving loop may retry the failed operation.
    ///
    /// Only connection-level failures qualify, whether they struck during
    /// the metadata fetch or the asset transfer. Everything else reflects
    /// a state a retry cannot fix.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Download(e) => e.is_connection_failure(),
            AppError::Fetch(FetchError::Connection(SourceError::Connection { .. })) => true,
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "fetch",
            AppError::Download(_) => "download",
            AppError::Template(_) => "template",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;
