//! Prelude module for the Imgur fetcher library
//!
//! Re-exports the most commonly used items from the library so typical
//! usage needs a single `use imgur_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use imgur_fetcher::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let client = HttpClient::new().map_err(|e| AppError::generic(e.to_string()))?;
//!     let image = Image::fetch(&client, "abc123", DEFAULT_CHUNK_SIZE)?;
//!     println!("{}", image);
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components
pub use crate::app::{
    Album, BatchObserver, BatchOptions, BatchOutcome, ChunkSource, Downloader, HttpClient, Image,
    MetaMap, Resolution, SourceOpener, run_batch,
};

// Commonly used constants
pub use crate::constants::{CONTAINER_MARKER, DEFAULT_CHUNK_SIZE, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
