//! Byte-chunk sources for streamed responses
//!
//! A [`ChunkSource`] wraps an open response and yields byte chunks on
//! demand. Sources may be abandoned mid-stream (simply stop requesting
//! chunks and drop them) without error; the head-only page scrape relies
//! on this to avoid downloading megabytes of body.

use std::io::Read;

use crate::errors::SourceError;

/// On-demand byte chunk supplier over an open response
pub trait ChunkSource {
    /// Total byte length declared by the response, if any
    fn total_len(&self) -> Option<u64>;

    /// Pull the next chunk of at most `size` bytes.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. A short chunk
    /// does not imply exhaustion; only `None` does.
    fn next_chunk(&mut self, size: usize) -> Result<Option<Vec<u8>>, SourceError>;
}

impl<T: ChunkSource + ?Sized> ChunkSource for Box<T> {
    fn total_len(&self) -> Option<u64> {
        (**self).total_len()
    }

    fn next_chunk(&mut self, size: usize) -> Result<Option<Vec<u8>>, SourceError> {
        (**self).next_chunk(size)
    }
}

/// Chunk source over a blocking HTTP response body
pub struct HttpChunkSource {
    response: reqwest::blocking::Response,
    total_len: Option<u64>,
    exhausted: bool,
}

impl HttpChunkSource {
    pub fn new(response: reqwest::blocking::Response) -> Self {
        let total_len = response.content_length();
        Self {
            response,
            total_len,
            exhausted: false,
        }
    }
}

impl ChunkSource for HttpChunkSource {
    fn total_len(&self) -> Option<u64> {
        self.total_len
    }

    fn next_chunk(&mut self, size: usize) -> Result<Option<Vec<u8>>, SourceError> {
        if self.exhausted {
            return Ok(None);
        }

        // Fill up to `size` bytes; the body reader may return short reads
        // at packet boundaries.
        let mut chunk = vec![0u8; size];
        let mut filled = 0;
        while filled < size {
            match self.response.read(&mut chunk[filled..]) {
                Ok(0) => {
                    self.exhausted = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) => {
                    self.exhausted = true;
                    return Err(SourceError::Connection {
                        reason: e.to_string(),
                    });
                }
            }
        }

        if filled == 0 {
            return Ok(None);
        }
        chunk.truncate(filled);
        Ok(Some(chunk))
    }
}
