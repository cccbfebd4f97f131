//! # Cache Module
//!
//! Fragment cache for resolved song metadata.
//!
//! Three namespaces share one [`FragmentCache`]:
//!
//! - **Album artwork**, keyed by [`LookupKey`]
//! - **Share URL** (together with the track id), keyed by [`LookupKey`]
//! - **Artist artwork**, keyed by [`ArtistKey`]
//!
//! The two song-level namespaces always come from the same song search and
//! are written together. Artist artwork lives on its own schedule.
//!
//! Entries expire after the TTL they were written with. There is no size
//! bound; expired entries are dropped on read and by the janitor task started
//! with [`spawn_janitor`].
//!
//! ```rust,no_run
//! use music_meta::cache::FragmentCache;
//! use music_meta::keys::ArtistKey;
//! use std::time::Duration;
//!
//! let cache = FragmentCache::new();
//! let key = ArtistKey::new("Example Artist");
//! cache.set_artist_artwork(key.clone(), "https://img/512x512.jpg".to_string(), Duration::from_secs(3600));
//! assert!(cache.artist_artwork(&key).is_some());
//! ```

pub mod ttl_cache;

use crate::keys::{ArtistKey, LookupKey};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::debug;
use ttl_cache::TtlCache;

/// Share URL entry. The track id rides along so a full cache hit can
/// reproduce the complete result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CachedShare {
    pub track_id: String,
    pub share_url: String,
}

/// Live entry counts per namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub album_artwork: usize,
    pub share_url: usize,
    pub artist_artwork: usize,
}

/// Process-wide fragment store, created once at startup and shared via `Arc`.
#[derive(Debug, Clone, Default)]
pub struct FragmentCache {
    album_artwork: TtlCache<LookupKey, String>,
    share_url: TtlCache<LookupKey, CachedShare>,
    artist_artwork: TtlCache<ArtistKey, String>,
}

impl FragmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn album_artwork(&self, key: &LookupKey) -> Option<String> {
        self.album_artwork.get(key)
    }

    pub fn set_album_artwork(&self, key: LookupKey, url: String, ttl: Duration) {
        self.album_artwork.set(key, url, ttl);
    }

    pub fn share_url(&self, key: &LookupKey) -> Option<CachedShare> {
        self.share_url.get(key)
    }

    pub fn set_share_url(&self, key: LookupKey, share: CachedShare, ttl: Duration) {
        self.share_url.set(key, share, ttl);
    }

    pub fn artist_artwork(&self, key: &ArtistKey) -> Option<String> {
        self.artist_artwork.get(key)
    }

    pub fn set_artist_artwork(&self, key: ArtistKey, url: String, ttl: Duration) {
        self.artist_artwork.set(key, url, ttl);
    }

    /// Remaining lifetime of each fragment touched by a resolution:
    /// `(album_artwork, share_url, artist_artwork)`.
    pub fn remaining_ttls(
        &self,
        key: &LookupKey,
        artist: &ArtistKey,
    ) -> (Option<Duration>, Option<Duration>, Option<Duration>) {
        (
            self.album_artwork.remaining_ttl(key),
            self.share_url.remaining_ttl(key),
            self.artist_artwork.remaining_ttl(artist),
        )
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            album_artwork: self.album_artwork.len(),
            share_url: self.share_url.len(),
            artist_artwork: self.artist_artwork.len(),
        }
    }

    /// Sweeps every namespace and returns how many entries were dropped.
    pub fn purge_expired(&self) -> usize {
        self.album_artwork.cleanup_expired()
            + self.share_url.cleanup_expired()
            + self.artist_artwork.cleanup_expired()
    }
}

/// Runs [`FragmentCache::purge_expired`] every `interval` until the task is
/// aborted or the runtime shuts down.
pub fn spawn_janitor(cache: Arc<FragmentCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // El primer tick es inmediato
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = cache.purge_expired();
            if removed > 0 {
                debug!(removed, "🧹 fragment cache sweep");
            }
        }
    })
}
