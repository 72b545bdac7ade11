//! Album page scraping: container identifiers plus page metadata
//!
//! Album listings embed one marker `div` per image; their `id` attributes
//! are the image identifiers, and their document order is the album's
//! display order. The album's own metadata lives in the same page head, so
//! a single full pass collects both. There is no early exit: album pages
//! are comparatively small and the marker can appear anywhere in the body.

use crate::constants::markup;
use crate::errors::FetchResult;

use super::super::models::{AttrPair, MetaMap};
use super::super::source::ChunkSource;
use super::{collect_meta_pair, TagHandlers, TagStackParser};

/// Everything scraped from one album page
#[derive(Debug, Default)]
pub struct AlbumPage {
    pub meta: MetaMap,
    /// Image identifiers in document order; never reordered or deduplicated
    pub image_ids: Vec<String>,
}

fn on_div_start(page: &mut AlbumPage, attrs: &[AttrPair]) {
    let is_container = attrs
        .iter()
        .find(|a| a.name == "class")
        .map(|a| a.value.contains(markup::CONTAINER_MARKER))
        .unwrap_or(false);
    if !is_container {
        return;
    }
    if let Some(id) = attrs.iter().find(|a| a.name == "id") {
        page.image_ids.push(id.value.clone());
    }
}

/// Streaming extractor for album pages
pub struct ContainerIdExtractor {
    parser: TagStackParser<AlbumPage>,
}

impl ContainerIdExtractor {
    pub fn new() -> Self {
        let handlers = TagHandlers::new()
            .on_start("meta", |page: &mut AlbumPage, attrs| {
                collect_meta_pair(&mut page.meta, attrs);
            })
            .on_start("div", on_div_start);
        Self {
            parser: TagStackParser::new(AlbumPage::default(), handlers),
        }
    }

    /// Consume the entire response and return the scraped page
    pub fn collect_all(
        mut self,
        source: &mut dyn ChunkSource,
        chunk_size: usize,
    ) -> FetchResult<AlbumPage> {
        while let Some(chunk) = source.next_chunk(chunk_size)? {
            self.parser.feed(&chunk)?;
        }
        self.parser.finish()
    }
}

impl Default for ContainerIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}
