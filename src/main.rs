use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use music_meta::cache::{spawn_janitor, FragmentCache};
use music_meta::{CatalogClient, Config, MetadataResolver};

#[derive(Parser, Debug)]
#[command(version, about = "Resolve artwork and share URLs for a song")]
struct CliArgs {
    /// Artist name.
    #[arg(required_unless_present = "batch")]
    artist: Option<String>,

    /// Album name.
    #[arg(required_unless_present = "batch")]
    album: Option<String>,

    /// Song title.
    #[arg(required_unless_present = "batch")]
    song: Option<String>,

    /// Read tab-separated `artist<TAB>album<TAB>song` lines from stdin and
    /// resolve them concurrently against one shared cache.
    #[arg(long, conflicts_with_all = ["artist", "album", "song"])]
    batch: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct Triple {
    artist: String,
    album: String,
    song: String,
}

fn parse_line(line: &str) -> Option<Triple> {
    let mut parts = line.split('\t');
    let triple = Triple {
        artist: parts.next()?.to_string(),
        album: parts.next()?.to_string(),
        song: parts.next()?.to_string(),
    };
    parts.next().is_none().then_some(triple)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializar logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("music_meta=debug".parse()?),
        )
        .init();

    let args = CliArgs::parse();

    let config = Config::load().context("invalid configuration")?;
    info!("🎵 music-meta v{}", env!("CARGO_PKG_VERSION"));
    info!("{}", config.summary());

    let cache = Arc::new(FragmentCache::new());
    let janitor = spawn_janitor(cache.clone(), config.cache_cleanup_interval);

    let client = CatalogClient::new(
        config.search_base_url.clone(),
        config.http_timeout,
        &config.user_agent,
    )
    .context("failed to build HTTP client")?;
    let resolver = MetadataResolver::with_ttl(client, cache, config.cache_ttl);

    let result = if args.batch {
        run_batch(&resolver, config.resolve_concurrency).await
    } else {
        let (Some(artist), Some(album), Some(song)) = (args.artist, args.album, args.song) else {
            anyhow::bail!("artist, album and song are required");
        };
        let metadata = resolver
            .resolve(&artist, &album, &song)
            .await
            .with_context(|| format!("failed to resolve {artist} - {song}"))?;
        print_json(&metadata)
    };

    janitor.abort();
    result
}

async fn run_batch(resolver: &MetadataResolver<CatalogClient>, concurrency: usize) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut triples = Vec::new();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Some(triple) => triples.push(triple),
            None => error!(line = %line, "expected artist, album and song separated by tabs"),
        }
    }

    info!("📋 resolving {} songs", triples.len());

    let mut results = stream::iter(triples)
        .map(|triple| async move {
            let resolved = resolver
                .resolve(&triple.artist, &triple.album, &triple.song)
                .await;
            (triple, resolved)
        })
        .buffer_unordered(concurrency);

    let mut failures = 0usize;
    while let Some((triple, resolved)) = results.next().await {
        match resolved {
            Ok(metadata) => print_json(&serde_json::json!({
                "artist": triple.artist,
                "album": triple.album,
                "song": triple.song,
                "metadata": metadata,
            }))?,
            Err(err) => {
                failures += 1;
                error!(artist = %triple.artist, song = %triple.song, error = %err, "resolution failed");
            }
        }
    }

    let stats = resolver.cache().stats();
    info!(
        failures,
        album_artwork = stats.album_artwork,
        share_url = stats.share_url,
        artist_artwork = stats.artist_artwork,
        "✅ batch finished"
    );
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
