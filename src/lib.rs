//! Imgur Fetcher Library
//!
//! A Rust library for downloading Imgur images and albums together with
//! their page metadata. Pages are scraped incrementally while they stream,
//! so an image's metadata costs one chunk of HTML in the common case, and
//! assets are copied in chunks with live progress reporting.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(DEFAULT_CHUNK_SIZE, 1024);
        assert!(USER_AGENT.contains("Firefox"));
        assert_eq!(CONTAINER_MARKER, "post-image-container");
    }

    #[test]
    fn test_error_types() {
        let fetch_error = errors::FetchError::InvalidIdentifier {
            identifier: "bad id".to_string(),
        };
        let app_error = AppError::Fetch(fetch_error);

        assert_eq!(app_error.category(), "fetch");
        assert!(!app_error.is_retryable());
    }
}
