//! Incremental tag-stack dispatch over an HTML tokenizer
//!
//! The dispatcher consumes tokenizer events (start tag, character data,
//! end tag) produced by feeding raw byte chunks to html5ever and invokes
//! handlers keyed by tag name. Only *handled* tags are tracked: a start
//! tag with a registered handler is pushed onto the stack, an end tag with
//! a registered handler pops exactly one entry without verifying that the
//! popped name matches. The stack therefore never reflects true document
//! nesting, only the nesting of handled tags; nested same-named handled
//! tags are unsupported.
//!
//! Parsing may be abandoned mid-stream by ceasing to feed chunks; no
//! handler fires for a tag that never completes. Malformed-markup recovery
//! is the tokenizer's job (it follows the HTML5 recovery algorithm and its
//! recoverable diagnostics are logged at trace level); bytes that are not
//! UTF-8 at all are the one unrecoverable parse failure.

pub mod album_page;
pub mod meta;

use html5ever::buffer_queue::BufferQueue;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

use crate::errors::{FetchError, FetchResult};

use super::models::{AttrPair, MetaMap};

/// Start-tag handler: receives the attribute list in encounter order
pub type StartHandler<S> = fn(&mut S, &[AttrPair]);

/// Character-data handler for the tag currently on top of the stack
pub type DataHandler<S> = fn(&mut S, &str);

/// End-tag handler
pub type EndHandler<S> = fn(&mut S);

/// Explicit tag-to-handler tables, built once per specialization.
///
/// The registered tag sets are plain ordered lists, so they are statically
/// enumerable and testable in isolation.
pub struct TagHandlers<S> {
    start: Vec<(&'static str, StartHandler<S>)>,
    data: Vec<(&'static str, DataHandler<S>)>,
    end: Vec<(&'static str, EndHandler<S>)>,
}

impl<S> TagHandlers<S> {
    pub fn new() -> Self {
        Self {
            start: Vec::new(),
            data: Vec::new(),
            end: Vec::new(),
        }
    }

    pub fn on_start(mut self, tag: &'static str, handler: StartHandler<S>) -> Self {
        self.start.push((tag, handler));
        self
    }

    pub fn on_data(mut self, tag: &'static str, handler: DataHandler<S>) -> Self {
        self.data.push((tag, handler));
        self
    }

    pub fn on_end(mut self, tag: &'static str, handler: EndHandler<S>) -> Self {
        self.end.push((tag, handler));
        self
    }

    fn start_for(&self, tag: &str) -> Option<StartHandler<S>> {
        self.start.iter().find(|(t, _)| *t == tag).map(|(_, h)| *h)
    }

    fn data_for(&self, tag: &str) -> Option<DataHandler<S>> {
        self.data.iter().find(|(t, _)| *t == tag).map(|(_, h)| *h)
    }

    fn end_for(&self, tag: &str) -> Option<EndHandler<S>> {
        self.end.iter().find(|(t, _)| *t == tag).map(|(_, h)| *h)
    }
}

impl<S> Default for TagHandlers<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Token sink dispatching tokenizer events to the registered handlers
struct TagDispatcher<S> {
    handlers: TagHandlers<S>,
    stack: Vec<String>,
    state: S,
}

impl<S> TokenSink for TagDispatcher<S> {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                let name: &str = &tag.name;
                match tag.kind {
                    TagKind::StartTag => {
                        if let Some(handler) = self.handlers.start_for(name) {
                            let attrs: Vec<AttrPair> = tag
                                .attrs
                                .iter()
                                .map(|a| AttrPair::new(&*a.name.local, &*a.value))
                                .collect();
                            handler(&mut self.state, &attrs);
                            self.stack.push(name.to_string());
                        }
                        // Raw-text elements must switch the tokenizer state
                        // or their contents would be tokenized as markup.
                        match name {
                            "script" => return TokenSinkResult::RawData(RawKind::ScriptData),
                            "style" => return TokenSinkResult::RawData(RawKind::Rawtext),
                            "title" | "textarea" => {
                                return TokenSinkResult::RawData(RawKind::Rcdata)
                            }
                            _ => {}
                        }
                    }
                    TagKind::EndTag => {
                        if let Some(handler) = self.handlers.end_for(name) {
                            handler(&mut self.state);
                            self.stack.pop();
                        }
                    }
                }
            }
            Token::CharacterTokens(data) => {
                if let Some(top) = self.stack.last() {
                    if let Some(handler) = self.handlers.data_for(top) {
                        handler(&mut self.state, &data);
                    }
                }
            }
            Token::ParseError(message) => {
                // Recoverable per the HTML5 algorithm; real-world pages
                // trip these constantly.
                tracing::trace!("tokenizer diagnostic: {}", message);
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Carry-over UTF-8 decoder for byte chunks split at arbitrary boundaries
#[derive(Default)]
struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    /// Decode as much of `pending + chunk` as is valid, holding back a
    /// trailing incomplete sequence for the next chunk
    fn decode(&mut self, chunk: &[u8]) -> FetchResult<String> {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        match std::str::from_utf8(&bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(e) => {
                let valid = e.valid_up_to();
                if e.error_len().is_some() {
                    return Err(FetchError::ParseFailure {
                        reason: format!("invalid utf-8 at byte {} of chunk", valid),
                    });
                }
                // Incomplete trailing sequence; keep it for the next chunk.
                self.pending = bytes[valid..].to_vec();
                let text = std::str::from_utf8(&bytes[..valid])
                    .unwrap_or_default()
                    .to_string();
                Ok(text)
            }
        }
    }

    fn finish(&mut self) -> FetchResult<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(FetchError::ParseFailure {
                reason: "document ends with a truncated utf-8 sequence".to_string(),
            })
        }
    }
}

/// Chunk-fed tokenizer plus dispatcher, generic over the handler state
pub struct TagStackParser<S> {
    tokenizer: Tokenizer<TagDispatcher<S>>,
    input: BufferQueue,
    decoder: Utf8Carry,
}

impl<S> TagStackParser<S> {
    pub fn new(state: S, handlers: TagHandlers<S>) -> Self {
        let dispatcher = TagDispatcher {
            handlers,
            stack: Vec::new(),
            state,
        };
        Self {
            tokenizer: Tokenizer::new(dispatcher, TokenizerOpts::default()),
            input: BufferQueue::new(),
            decoder: Utf8Carry::default(),
        }
    }

    /// Feed one raw byte chunk to the tokenizer
    pub fn feed(&mut self, chunk: &[u8]) -> FetchResult<()> {
        let text = self.decoder.decode(chunk)?;
        if !text.is_empty() {
            self.input.push_back(StrTendril::from_slice(&text));
            let _ = self.tokenizer.feed(&mut self.input);
        }
        Ok(())
    }

    /// Observe the handler state mid-stream
    pub fn state(&self) -> &S {
        &self.tokenizer.sink.state
    }

    /// Abandon parsing and take the state without finalizing the
    /// tokenizer; used by the early-exit scrape
    pub fn into_state(self) -> S {
        self.tokenizer.sink.state
    }

    /// Finalize the tokenizer at end of input and take the state
    pub fn finish(mut self) -> FetchResult<S> {
        self.decoder.finish()?;
        let _ = self.tokenizer.feed(&mut self.input);
        self.tokenizer.end();
        Ok(self.tokenizer.sink.state)
    }
}

/// Shared `meta` start handler: pair the first `name`/`property`
/// occurrence with the `content` attribute and store under the
/// lower-cased key. Empty names or values are treated as absent.
pub(crate) fn collect_meta_pair(map: &mut MetaMap, attrs: &[AttrPair]) {
    let mut name: Option<&str> = None;
    let mut content: Option<&str> = None;

    for pair in attrs {
        match pair.name.as_str() {
            "name" | "property" => {
                if name.is_none() && !pair.value.is_empty() {
                    name = Some(&pair.value);
                }
            }
            "content" => {
                if content.is_none() && !pair.value.is_empty() {
                    content = Some(&pair.value);
                }
            }
            _ => {}
        }
    }

    if let (Some(name), Some(content)) = (name, content) {
        map.insert(name, content);
    }
}
