//! Imgur fetcher CLI application
//!
//! Command-line interface for downloading Imgur images and albums with
//! their metadata. Features streamed metadata scraping, chunked downloads
//! with live progress, and per-item retry for album batches.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use imgur_fetcher::cli::{handle_album, handle_image, Cli, Commands};
use imgur_fetcher::config::AppConfig;
use imgur_fetcher::errors::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(&cli);

    info!("imgur_fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(cli.global.config.as_deref())?;

    match cli.command {
        Commands::Image(args) => {
            info!("executing image command");
            handle_image(args, &config)
        }
        Commands::Album(args) => {
            info!("executing album command");
            handle_album(args, &config)
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("imgur_fetcher={}", log_level).parse().unwrap());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
