//! Album entity: ordered image identifiers plus album metadata
//!
//! An album fetch makes one full pass over the blog-layout listing page,
//! collecting the album's head metadata and the marker containers' `id`
//! attributes in display order. A failed parse is retried exactly once
//! before surfacing as `InvalidAlbum`.

use std::fmt;

use crate::constants::{endpoints, markup};
use crate::errors::{FetchError, FetchResult};

use super::client::SourceOpener;
use super::image::Image;
use super::models::MetaMap;
use super::parser::album_page::ContainerIdExtractor;
use super::validate::{describe_entity, validate_identifier, validate_required, Accessor};

/// One Imgur album, its frozen metadata, and its image display order
#[derive(Debug, Clone)]
pub struct Album {
    tag: String,
    meta: MetaMap,
    image_ids: Vec<String>,
}

const REQUIRED: [(&str, Accessor<Album>); 1] =
    [("title", |album: &Album| album.title().map(|_| ()))];

impl Album {
    /// Fetch and validate one album by identifier.
    ///
    /// The identifier grammar is checked before any network call. A
    /// connection, markup, or incomplete-metadata failure is retried once
    /// internally; a second failure surfaces as `InvalidAlbum` wrapping it.
    pub fn fetch(
        opener: &dyn SourceOpener,
        identifier: &str,
        chunk_size: usize,
    ) -> FetchResult<Self> {
        let tag = validate_identifier(identifier)?;
        match Self::fetch_once(opener, &tag, chunk_size) {
            Ok(album) => Ok(album),
            Err(first) if Self::is_retry_worthy(&first) => {
                tracing::warn!("album {} parse failed ({}), retrying once", tag, first);
                Self::fetch_once(opener, &tag, chunk_size).map_err(|second| {
                    FetchError::InvalidAlbum {
                        identifier: tag.clone(),
                        source: Box::new(second),
                    }
                })
            }
            Err(other) => Err(other),
        }
    }

    fn fetch_once(opener: &dyn SourceOpener, tag: &str, chunk_size: usize) -> FetchResult<Self> {
        let url = endpoints::expand(endpoints::ALBUM_PAGE, tag);
        tracing::debug!("fetching album listing from {}", url);

        let mut source = opener.open(&url)?;
        let page = ContainerIdExtractor::new().collect_all(&mut *source, chunk_size)?;

        let album = Self {
            tag: tag.to_string(),
            meta: page.meta,
            image_ids: page.image_ids,
        };
        validate_required(&album, &REQUIRED)?;
        Ok(album)
    }

    fn is_retry_worthy(error: &FetchError) -> bool {
        matches!(
            error,
            FetchError::Connection(_)
                | FetchError::ParseFailure { .. }
                | FetchError::MetadataIncomplete { .. }
        )
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Album title
    pub fn title(&self) -> FetchResult<&str> {
        self.meta
            .get(markup::TITLE_KEY)
            .ok_or_else(|| FetchError::MetadataIncomplete {
                identifier: self.tag.clone(),
                key: markup::TITLE_KEY.to_string(),
            })
    }

    /// Image identifiers in display order
    pub fn image_ids(&self) -> &[String] {
        &self.image_ids
    }

    /// Lazily construct one `Image` per identifier, in display order.
    ///
    /// Each element is fetched only when the iterator reaches it, and a
    /// failure for one identifier does not affect its siblings.
    pub fn images<'a>(
        &'a self,
        opener: &'a dyn SourceOpener,
        chunk_size: usize,
    ) -> impl Iterator<Item = FetchResult<Image>> + 'a {
        self.image_ids
            .iter()
            .map(move |id| Image::fetch(opener, id, chunk_size))
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", describe_entity("album", &self.tag, self.title().ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::source::testing::{FlakySource, MemorySource};
    use crate::app::source::ChunkSource;
    use crate::errors::SourceError;
    use std::cell::RefCell;

    const ALBUM_PAGE: &str = concat!(
        "<html><head><meta property=\"og:title\" content=\"Trip\"></head><body>",
        "<div class=\"post-image-container\" id=\"abc123\"></div>",
        "<div class=\"post-image-container\" id=\"def456\"></div>",
        "</body></html>"
    );

    /// Opener whose first `failures` opened streams die mid-transfer
    struct FlakyOpener {
        body: String,
        failing_opens: RefCell<usize>,
        opens: RefCell<usize>,
    }

    impl FlakyOpener {
        fn new(body: impl Into<String>, failing_opens: usize) -> Self {
            Self {
                body: body.into(),
                failing_opens: RefCell::new(failing_opens),
                opens: RefCell::new(0),
            }
        }

        fn open_count(&self) -> usize {
            *self.opens.borrow()
        }
    }

    impl SourceOpener for FlakyOpener {
        fn open(&self, _url: &str) -> Result<Box<dyn ChunkSource>, SourceError> {
            *self.opens.borrow_mut() += 1;
            let mut failing = self.failing_opens.borrow_mut();
            if *failing > 0 {
                *failing -= 1;
                Ok(Box::new(FlakySource::new(self.body.as_bytes().to_vec(), 1)))
            } else {
                Ok(Box::new(MemorySource::new(self.body.as_bytes().to_vec())))
            }
        }
    }

    #[test]
    fn test_fetch_collects_ids_and_metadata() {
        let opener = FlakyOpener::new(ALBUM_PAGE, 0);
        let album = Album::fetch(&opener, "alb", 64).unwrap();
        assert_eq!(album.tag(), "alb");
        assert_eq!(album.title().unwrap(), "Trip");
        assert_eq!(album.image_ids(), ["abc123", "def456"]);
        assert_eq!(opener.open_count(), 1);
    }

    #[test]
    fn test_invalid_identifier_makes_no_network_call() {
        let opener = FlakyOpener::new(ALBUM_PAGE, 0);
        let result = Album::fetch(&opener, "bad id", 64);
        assert!(matches!(result, Err(FetchError::InvalidIdentifier { .. })));
        assert_eq!(opener.open_count(), 0);
    }

    #[test]
    fn test_connection_failure_is_retried_once() {
        let opener = FlakyOpener::new(ALBUM_PAGE, 1);
        let album = Album::fetch(&opener, "alb", 64).unwrap();
        assert_eq!(album.image_ids().len(), 2);
        assert_eq!(opener.open_count(), 2);
    }

    #[test]
    fn test_second_failure_is_invalid_album() {
        let opener = FlakyOpener::new(ALBUM_PAGE, 2);
        let result = Album::fetch(&opener, "alb", 64);
        match result {
            Err(FetchError::InvalidAlbum { identifier, source }) => {
                assert_eq!(identifier, "alb");
                assert!(matches!(*source, FetchError::Connection(_)));
            }
            other => panic!("expected InvalidAlbum, got {:?}", other),
        }
        assert_eq!(opener.open_count(), 2);
    }

    #[test]
    fn test_missing_album_title_is_retried_then_invalid() {
        let opener = FlakyOpener::new("<html><head></head><body></body></html>", 0);
        let result = Album::fetch(&opener, "alb", 64);
        assert!(matches!(result, Err(FetchError::InvalidAlbum { .. })));
        assert_eq!(opener.open_count(), 2);
    }

    #[test]
    fn test_images_iterator_is_lazy() {
        let opener = FlakyOpener::new(ALBUM_PAGE, 0);
        let album = Album::fetch(&opener, "alb", 64).unwrap();
        let opens_after_album = opener.open_count();

        let iterator = album.images(&opener, 64);
        assert_eq!(opener.open_count(), opens_after_album);

        // Driving the iterator performs one fetch per identifier. The
        // canned album body lacks image metadata, so each fetch fails on
        // its own without affecting the others.
        let results: Vec<_> = iterator.collect();
        assert_eq!(results.len(), 2);
        assert_eq!(opener.open_count(), opens_after_album + 2);
        for result in results {
            assert!(matches!(
                result,
                Err(FetchError::MetadataIncomplete { .. })
            ));
        }
    }
}
