//! Head-region `meta` tag collection
//!
//! Collects `name|property` → `content` pairs from `meta` elements and
//! stops consuming input the moment the head region ends. Head-only
//! documents can be megabytes of body; the early exit guarantees none of
//! that body is ever requested from the source.

use crate::errors::FetchResult;

use super::super::models::MetaMap;
use super::super::source::ChunkSource;
use super::{collect_meta_pair, TagHandlers, TagStackParser};

#[derive(Default)]
struct MetaState {
    map: MetaMap,
    head_done: bool,
}

/// Streaming collector for document-head metadata
pub struct MetaCollector {
    parser: TagStackParser<MetaState>,
}

impl MetaCollector {
    pub fn new() -> Self {
        let handlers = TagHandlers::new()
            .on_start("meta", |state: &mut MetaState, attrs| {
                collect_meta_pair(&mut state.map, attrs);
            })
            .on_end("head", |state: &mut MetaState| {
                state.head_done = true;
            });
        Self {
            parser: TagStackParser::new(MetaState::default(), handlers),
        }
    }

    /// Whether the head-complete signal has fired
    pub fn head_done(&self) -> bool {
        self.parser.state().head_done
    }

    /// Pull chunks of `chunk_size` bytes from the source and feed them to
    /// the dispatcher until either the head region completes or the source
    /// is exhausted. Returns the frozen metadata map.
    ///
    /// The head-complete signal is checked before every pull, so the
    /// source is never asked for a chunk after `</head>` was observed.
    pub fn collect_all(
        mut self,
        source: &mut dyn ChunkSource,
        chunk_size: usize,
    ) -> FetchResult<MetaMap> {
        loop {
            if self.head_done() {
                tracing::debug!("head region complete, abandoning response stream");
                return Ok(self.parser.into_state().map);
            }
            match source.next_chunk(chunk_size)? {
                Some(chunk) => self.parser.feed(&chunk)?,
                None => return Ok(self.parser.finish()?.map),
            }
        }
    }
}

impl Default for MetaCollector {
    fn default() -> Self {
        Self::new()
    }
}
