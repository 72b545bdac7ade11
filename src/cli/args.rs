//! Command-line argument parsing
//!
//! This module defines the CLI structure using clap derive macros,
//! providing subcommands for fetching single images and whole albums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Imgur fetcher - download images and albums with their metadata
#[derive(Parser, Debug)]
#[command(
    name = "imgur_fetcher",
    version,
    about = "Download Imgur images and albums by identifier",
    long_about = "Fetches image and album pages, scrapes their metadata from the page head, \
and downloads the backing assets in chunks with live progress. Album downloads retry \
connection failures per item and never abort the whole batch for one bad image."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download one or more single images
    Image(ImageArgs),

    /// Download a whole album
    Album(AlbumArgs),
}

/// Arguments for the image command
#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    /// Image identifiers to download
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Filename pattern (tokens: {tag} {title} {author} {x} {y} {ext})
    #[arg(short, long, value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Write a metadata sidecar JSON file next to each image
    #[arg(long)]
    pub sidecar: bool,

    /// Plain line-per-file output instead of progress bars
    #[arg(long)]
    pub plain: bool,
}

/// Arguments for the album command
#[derive(Args, Debug, Clone)]
pub struct AlbumArgs {
    /// Album identifier
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Filename pattern (tokens: {index} {tag} {title} {author} {x} {y} {ext})
    #[arg(short, long, value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// First 1-based item index to download
    #[arg(long, value_name = "N")]
    pub start: Option<usize>,

    /// Last 1-based item index to download
    #[arg(long, value_name = "N")]
    pub end: Option<usize>,

    /// Zero-padding width of the {index} token
    #[arg(long, value_name = "WIDTH")]
    pub index_width: Option<usize>,

    /// Write an album metadata sidecar JSON file
    #[arg(long)]
    pub sidecar: bool,

    /// Plain line-per-file output instead of progress bars
    #[arg(long)]
    pub plain: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

impl AlbumArgs {
    /// Check argument consistency before any network activity
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(format!(
                    "--start ({}) must not exceed --end ({})",
                    start, end
                ));
            }
        }
        if self.start == Some(0) || self.end == Some(0) {
            return Err("item indices are 1-based; 0 is not a valid bound".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album_args(start: Option<usize>, end: Option<usize>) -> AlbumArgs {
        AlbumArgs {
            id: "alb".to_string(),
            output: None,
            pattern: None,
            start,
            end,
            index_width: None,
            sidecar: false,
            plain: false,
        }
    }

    #[test]
    fn test_cli_parsing_image() {
        let cli = Cli::try_parse_from(["imgur_fetcher", "image", "abc123", "def456"]).unwrap();
        match cli.command {
            Commands::Image(args) => assert_eq!(args.ids, ["abc123", "def456"]),
            _ => panic!("expected image command"),
        }
    }

    #[test]
    fn test_cli_parsing_album_with_bounds() {
        let cli = Cli::try_parse_from([
            "imgur_fetcher",
            "album",
            "xyz",
            "--start",
            "2",
            "--end",
            "5",
            "--sidecar",
        ])
        .unwrap();
        match cli.command {
            Commands::Album(args) => {
                assert_eq!(args.id, "xyz");
                assert_eq!(args.start, Some(2));
                assert_eq!(args.end, Some(5));
                assert!(args.sidecar);
            }
            _ => panic!("expected album command"),
        }
    }

    #[test]
    fn test_image_requires_at_least_one_id() {
        assert!(Cli::try_parse_from(["imgur_fetcher", "image"]).is_err());
    }

    #[test]
    fn test_album_bounds_validation() {
        assert!(album_args(Some(2), Some(5)).validate().is_ok());
        assert!(album_args(None, None).validate().is_ok());
        assert!(album_args(Some(5), Some(2)).validate().is_err());
        assert!(album_args(Some(0), None).validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut cli = Cli::try_parse_from(["imgur_fetcher", "image", "abc"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::WARN);

        cli.global.verbose = true;
        assert_eq!(cli.log_level(), tracing::Level::INFO);

        cli.global.very_verbose = true;
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);

        cli.global.quiet = true;
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
    }
}
