//! Command-line interface components
//!
//! This module contains CLI-specific code for the Imgur fetcher,
//! including argument parsing, filename templates, progress display, and
//! the command handlers themselves.

pub mod args;
pub mod commands;
pub mod progress;
pub mod template;

pub use args::{AlbumArgs, Cli, Commands, GlobalArgs, ImageArgs};
pub use commands::{handle_album, handle_image};
pub use progress::{ProgressMode, ProgressRenderer};
pub use template::render;
