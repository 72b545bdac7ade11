//! Command handlers for the CLI
//!
//! Each handler owns the full lifecycle of its command: argument
//! validation, entity fetching, filename rendering, and the download
//! itself. Identifier validation happens for every requested item before
//! the first network call, so a typo in the last argument cannot waste a
//! half-finished session.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::app::batch::{run_batch, BatchObserver, BatchOptions};
use crate::app::{Album, Downloader, HttpClient, Image, SourceOpener};
use crate::config::AppConfig;
use crate::constants::files;
use crate::errors::{AppError, DownloadError, FetchError, Result};

use super::args::{AlbumArgs, ImageArgs};
use super::progress::{ProgressMode, ProgressRenderer};
use super::template::{index_token, render};

/// Handle the image command: fetch and download each requested image
pub fn handle_image(args: ImageArgs, config: &AppConfig) -> Result<()> {
    for id in &args.ids {
        crate::app::validate_identifier(id).map_err(AppError::Fetch)?;
    }

    let pattern = args
        .pattern
        .as_deref()
        .unwrap_or(&config.naming.image_pattern);
    let out_dir = output_dir(args.output.as_deref(), config)?;
    let chunk_size = config.download.chunk_size;
    let client = HttpClient::with_user_agent(&config.http.user_agent)
        .map_err(|e| AppError::Fetch(FetchError::Connection(e)))?;

    let mut renderer = ProgressRenderer::new(ProgressMode::detect(args.plain));
    let mut failures: Vec<(String, AppError)> = Vec::new();

    for (position, id) in args.ids.iter().enumerate() {
        renderer.item_started(position + 1, args.ids.len(), id);
        match download_image(&client, id, pattern, &out_dir, chunk_size, args.sidecar, None, &mut renderer) {
            Ok(bytes) => renderer.item_done(id, bytes),
            Err(error) => {
                renderer.item_failed(id, &error);
                failures.push((id.clone(), error));
            }
        }
    }

    summarize(args.ids.len() - failures.len(), 0, &failures)
}

/// Handle the album command: fetch the listing, then drive the batch loop
pub fn handle_album(args: AlbumArgs, config: &AppConfig) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let pattern = args
        .pattern
        .as_deref()
        .unwrap_or(&config.naming.album_pattern);
    let index_width = args.index_width.unwrap_or(config.naming.index_width);
    let out_dir = output_dir(args.output.as_deref(), config)?;
    let chunk_size = config.download.chunk_size;
    let client = HttpClient::with_user_agent(&config.http.user_agent)
        .map_err(|e| AppError::Fetch(FetchError::Connection(e)))?;

    let album = Album::fetch(&client, &args.id, chunk_size)?;
    info!("{}: {} images", album, album.image_ids().len());
    println!("{} ({} images)", album, album.image_ids().len());

    if args.sidecar {
        write_album_sidecar(&album, &out_dir)?;
    }

    let options = BatchOptions {
        start: args.start,
        end: args.end,
    };
    let mut renderer = ProgressRenderer::new(ProgressMode::detect(args.plain));

    let outcome = run_batch(
        album.image_ids(),
        &options,
        &mut renderer,
        |index, id, observer| {
            let index = index_token(index, index_width);
            download_image(
                &client,
                id,
                pattern,
                &out_dir,
                chunk_size,
                false,
                Some(index),
                observer,
            )
        },
    );

    summarize(outcome.completed, outcome.skipped, &outcome.failed)
}

/// One full image attempt: metadata fetch, filename render, asset transfer.
///
/// Recreating the output file on every attempt truncates whatever a
/// previous interrupted transfer left behind.
#[allow(clippy::too_many_arguments)]
fn download_image(
    client: &HttpClient,
    id: &str,
    pattern: &str,
    out_dir: &Path,
    chunk_size: usize,
    sidecar: bool,
    index: Option<String>,
    observer: &mut dyn BatchObserver,
) -> std::result::Result<u64, AppError> {
    let image = Image::fetch(client, id, chunk_size)?;

    let mut tokens = image_tokens(&image)?;
    if let Some(index) = index {
        tokens.push(("index", index));
    }
    let path = out_dir.join(render(pattern, &tokens)?);

    if sidecar {
        write_image_sidecar(&image, &path)?;
    }

    let sink = File::create(&path)?;
    let source = client.open(&image.asset_url()).map_err(DownloadError::Source)?;
    let bytes = Downloader::new(source, sink, chunk_size)
        .owning_sink()
        .drain_with(|fraction| observer.item_progress(fraction))?;

    info!("wrote {} ({} bytes)", path.display(), bytes);
    Ok(bytes)
}

/// Substitution table for one image's filename tokens.
///
/// `author` is only present when the page declares one, so a pattern
/// referencing `{author}` fails as an unknown token for authorless pages
/// instead of silently rendering an empty string.
fn image_tokens(image: &Image) -> std::result::Result<Vec<(&'static str, String)>, AppError> {
    let resolution = image.resolution().map_err(AppError::Fetch)?;
    let mut tokens = vec![
        ("tag", image.tag().to_string()),
        ("title", image.title().map_err(AppError::Fetch)?.to_string()),
        ("x", resolution.x.to_string()),
        ("y", resolution.y.to_string()),
        ("ext", image.extension().map_err(AppError::Fetch)?.to_string()),
    ];
    if let Some(author) = image.author() {
        tokens.push(("author", author.to_string()));
    }
    Ok(tokens)
}

/// Write the image's scraped metadata next to its asset file
fn write_image_sidecar(image: &Image, asset_path: &Path) -> Result<()> {
    let sidecar_path = sidecar_path_for(asset_path);
    let document = serde_json::json!({
        "tag": image.tag(),
        "title": image.title().map_err(AppError::Fetch)?,
        "url": image.url().map_err(AppError::Fetch)?,
        "resolution": {
            "x": image.resolution().map_err(AppError::Fetch)?.x,
            "y": image.resolution().map_err(AppError::Fetch)?.y,
        },
        "author": image.author(),
        "copyright": image.copyright(),
        "description": image.description(),
        "keywords": image.keywords(),
    });
    let file = File::create(&sidecar_path)?;
    serde_json::to_writer_pretty(file, &document).map_err(std::io::Error::from)?;
    info!("wrote sidecar {}", sidecar_path.display());
    Ok(())
}

/// Write the album's metadata into `<tag>.json` in the output directory
fn write_album_sidecar(album: &Album, out_dir: &Path) -> Result<()> {
    let path = out_dir.join(format!("{}{}", album.tag(), files::SIDECAR_SUFFIX));
    let document = serde_json::json!({
        "tag": album.tag(),
        "title": album.title().map_err(AppError::Fetch)?,
        "image_ids": album.image_ids(),
    });
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(file, &document).map_err(std::io::Error::from)?;
    info!("wrote sidecar {}", path.display());
    Ok(())
}

/// Sidecar filename: the asset filename with `.json` appended
fn sidecar_path_for(asset_path: &Path) -> PathBuf {
    let mut name = asset_path.as_os_str().to_os_string();
    name.push(files::SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Resolve and create the session's output directory
fn output_dir(cli_override: Option<&Path>, config: &AppConfig) -> Result<PathBuf> {
    let dir = cli_override
        .map(Path::to_path_buf)
        .or_else(|| config.download.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Print the session summary and fold failures into the exit status
fn summarize(completed: usize, skipped: usize, failures: &[(String, AppError)]) -> Result<()> {
    if skipped > 0 {
        println!("{} downloaded, {} skipped, {} failed", completed, skipped, failures.len());
    } else {
        println!("{} downloaded, {} failed", completed, failures.len());
    }
    for (id, error) in failures {
        eprintln!("  {}: {}", id, error);
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(AppError::generic(format!(
            "{} download(s) failed",
            failures.len()
        )))
    }
}
