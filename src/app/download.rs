//! Chunked asset download with a lazy progress sequence
//!
//! Copies bytes from a chunk source into a writable sink, yielding one
//! progress fraction per chunk written. The sequence is single-pass and
//! non-restartable. When the response declares a total length the
//! fractions climb monotonically to exactly 1.0; when it does not, every
//! element is the constant 1.0, an indeterminate-progress signal that
//! callers must not mistake for completion.
//!
//! Interruption between chunks aborts the process without any atomic-write
//! discipline: an interrupted download leaves truncated content on disk.
//! That is an accepted risk of the design, surfaced here rather than
//! papered over.

use std::io::Write;

use crate::errors::{DownloadError, DownloadResult};

use super::source::ChunkSource;

/// Pull-based byte copier emitting one progress fraction per chunk.
///
/// Producing an element *is* the act of writing the next chunk; there is
/// no separate producer. Fully draining the iterator with
/// [`Downloader::drain_with`] (or by exhausting it manually) flushes the
/// sink if ownership was transferred via [`Downloader::owning_sink`].
/// Stopping early leaves the sink unflushed; [`Downloader::into_sink`]
/// hands it back to the caller, who is then responsible for closing it.
pub struct Downloader<S: ChunkSource, W: Write> {
    source: S,
    sink: W,
    chunk_size: usize,
    total_len: Option<u64>,
    written: u64,
    owns_sink: bool,
    finished: bool,
}

impl<S: ChunkSource, W: Write> Downloader<S, W> {
    pub fn new(source: S, sink: W, chunk_size: usize) -> Self {
        let total_len = source.total_len();
        Self {
            source,
            sink,
            chunk_size,
            total_len,
            written: 0,
            owns_sink: false,
            finished: false,
        }
    }

    /// Transfer sink ownership to the downloader: fully consuming the
    /// progress sequence flushes and closes the sink
    pub fn owning_sink(mut self) -> Self {
        self.owns_sink = true;
        self
    }

    /// Bytes written so far
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Abandon the transfer and take the sink back, unflushed
    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Drain the whole progress sequence, reporting each fraction.
    ///
    /// This is the convenience driver that guarantees the transfer
    /// completes and the owned sink is flushed.
    pub fn drain_with(mut self, mut on_progress: impl FnMut(f64)) -> DownloadResult<u64> {
        while let Some(progress) = self.next() {
            on_progress(progress?);
        }
        Ok(self.written)
    }

    fn fraction(&self) -> f64 {
        match self.total_len {
            // Not clamped: a lying server can push this past 1.0.
            Some(total) if total > 0 => self.written as f64 / total as f64,
            _ => 1.0,
        }
    }
}

impl<S: ChunkSource, W: Write> Iterator for Downloader<S, W> {
    type Item = DownloadResult<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let chunk = match self.source.next_chunk(self.chunk_size) {
            Ok(Some(chunk)) => chunk,
            Ok(None) => {
                self.finished = true;
                if self.owns_sink {
                    if let Err(e) = self.sink.flush() {
                        return Some(Err(DownloadError::Sink(e)));
                    }
                }
                tracing::debug!("transfer complete: {} bytes", self.written);
                return None;
            }
            Err(e) => {
                self.finished = true;
                return Some(Err(DownloadError::Source(e)));
            }
        };

        if let Err(e) = self.sink.write_all(&chunk) {
            self.finished = true;
            return Some(Err(DownloadError::Sink(e)));
        }
        self.written += chunk.len() as u64;
        Some(Ok(self.fraction()))
    }
}
