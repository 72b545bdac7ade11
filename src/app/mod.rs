//! Core application logic for the Imgur fetcher
//!
//! This module contains the main application components: the chunked HTTP
//! source, the streaming tag-stack parser with its metadata and album-page
//! collectors, the image and album entities, the chunked downloader, and
//! the batch retry loop that drives album downloads.
//!
//! # Examples
//!
//! ```rust,no_run
//! use imgur_fetcher::app::{HttpClient, Image, SourceOpener};
//! use imgur_fetcher::constants::DEFAULT_CHUNK_SIZE;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let image = Image::fetch(&client, "abc123", DEFAULT_CHUNK_SIZE)?;
//!
//! println!("{} ({})", image, image.resolution()?);
//! let asset = client.open(&image.asset_url())?;
//! # Ok(())
//! # }
//! ```

pub mod album;
pub mod batch;
pub mod client;
pub mod download;
pub mod image;
pub mod models;
pub mod parser;
pub mod source;
pub mod validate;

// Re-export main public API
pub use album::Album;
pub use batch::{run_batch, BatchObserver, BatchOptions, BatchOutcome, ItemState, NullObserver};
pub use client::{HttpClient, SourceOpener};
pub use download::Downloader;
pub use image::Image;
pub use models::{AttrPair, MetaMap, Resolution};
pub use parser::album_page::{AlbumPage, ContainerIdExtractor};
pub use parser::meta::MetaCollector;
pub use parser::TagStackParser;
pub use source::{ChunkSource, HttpChunkSource};
pub use validate::validate_identifier;
