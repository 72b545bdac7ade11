//! Application constants for imgur_fetcher
//!
//! Centralizes all constants used throughout the application, organized by
//! functional domain.

use std::time::Duration;

/// Imgur endpoint URLs
pub mod endpoints {
    /// Single-image page URL, one `{}` slot for the image identifier
    pub const IMAGE_PAGE: &str = "https://imgur.com/{}";

    /// Album listing page URL, one `{}` slot for the album identifier.
    /// The blog layout keeps every image container in the initial markup.
    pub const ALBUM_PAGE: &str = "https://imgur.com/a/{}/layout/blog";

    /// Asset URL, one `{}` slot for the image identifier. The literal
    /// `.png` is arbitrary: the CDN returns the asset regardless of the
    /// declared extension, and the real extension comes from metadata.
    pub const ASSET: &str = "https://i.imgur.com/{}.png";

    /// Expand a one-slot endpoint template
    pub fn expand(template: &str, identifier: &str) -> String {
        template.replacen("{}", identifier, 1)
    }
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Spoofed browser user agent; Imgur serves a different (meta-free)
    /// page to clients that identify as scripts
    pub const USER_AGENT: &str = "Mozilla/5.0 Firefox/48.0";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Markup constants for the scraping specializations
pub mod markup {
    /// Class-attribute substring marking an album image container `div`
    pub const CONTAINER_MARKER: &str = "post-image-container";

    /// Meta keys backing the derived entity properties
    pub const TITLE_KEY: &str = "og:title";
    pub const URL_KEY: &str = "og:url";
    pub const WIDTH_KEY: &str = "og:image:width";
    pub const HEIGHT_KEY: &str = "og:image:height";
    pub const IMAGE_URL_KEY: &str = "twitter:image";
    pub const AUTHOR_KEY: &str = "article:author";
    pub const COPYRIGHT_KEY: &str = "copyright";
    pub const DESCRIPTION_KEY: &str = "description";
    pub const KEYWORDS_KEY: &str = "keywords";
}

/// File operation and naming constants
pub mod files {
    /// Chunk size for page streaming and asset downloads (1 KiB)
    pub const DEFAULT_CHUNK_SIZE: usize = 1024;

    /// Default filename pattern for single images
    pub const DEFAULT_IMAGE_PATTERN: &str = "{tag}.{ext}";

    /// Default filename pattern for album items
    pub const DEFAULT_ALBUM_PATTERN: &str = "{index}_{tag}.{ext}";

    /// Default zero-padding width for the album `{index}` token
    pub const DEFAULT_INDEX_WIDTH: usize = 3;

    /// Side-car metadata file suffix (appended to the album identifier)
    pub const SIDECAR_SUFFIX: &str = ".json";
}

// Re-export commonly used constants for convenience
pub use files::DEFAULT_CHUNK_SIZE;
pub use http::USER_AGENT;
pub use markup::CONTAINER_MARKER;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_expansion() {
        assert_eq!(
            endpoints::expand(endpoints::IMAGE_PAGE, "abc123"),
            "https://imgur.com/abc123"
        );
        assert_eq!(
            endpoints::expand(endpoints::ALBUM_PAGE, "xyz"),
            "https://imgur.com/a/xyz/layout/blog"
        );
        assert_eq!(
            endpoints::expand(endpoints::ASSET, "abc123"),
            "https://i.imgur.com/abc123.png"
        );
    }
}
