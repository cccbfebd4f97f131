//! # Metadata Resolver
//!
//! Merges cached and freshly fetched fragments for an (artist, album, song)
//! triple.
//!
//! ## Resolution rules
//!
//! - All three fragments cached: return them, no remote call, no write.
//! - The song fragment (album artwork + share URL) counts as cached only when
//!   both halves are present. Otherwise a full song search replaces both.
//! - A failed song search fails the whole resolution and writes nothing.
//! - A failed artist search degrades to empty artist artwork. The empty value
//!   is not cached, so the next call searches again.
//! - Any other outcome writes every fragment back with a fresh TTL, including
//!   the ones that were reused from the cache.

use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

use crate::cache::{CachedShare, FragmentCache};
use crate::error::Result;
use crate::keys::{ArtistKey, LookupKey};
use crate::sources::{MetadataSource, SongFragment};

/// Default lifetime of every cached fragment.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Display metadata for one song.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMetadata {
    pub track_id: String,
    pub album_artwork_url: String,
    pub artist_artwork_url: String,
    pub share_url: String,
}

pub struct MetadataResolver<S> {
    source: S,
    cache: Arc<FragmentCache>,
    ttl: Duration,
}

impl<S: MetadataSource> MetadataResolver<S> {
    pub fn new(source: S, cache: Arc<FragmentCache>) -> Self {
        Self::with_ttl(source, cache, DEFAULT_TTL)
    }

    pub fn with_ttl(source: S, cache: Arc<FragmentCache>, ttl: Duration) -> Self {
        Self { source, cache, ttl }
    }

    pub fn cache(&self) -> &Arc<FragmentCache> {
        &self.cache
    }

    pub async fn resolve(&self, artist: &str, album: &str, song: &str) -> Result<ResolvedMetadata> {
        let key = LookupKey::new(artist, album, song);
        let artist_key = ArtistKey::new(artist);

        let album_artwork = self.cache.album_artwork(&key);
        let share = self.cache.share_url(&key);
        let cached_artist_artwork = self.cache.artist_artwork(&artist_key);

        let cached_song = match (album_artwork, share) {
            (Some(album_artwork_url), Some(share)) => Some(SongFragment {
                track_id: share.track_id,
                album_artwork_url,
                share_url: share.share_url,
            }),
            _ => None,
        };

        if let (Some(song), Some(artist_artwork_url)) = (&cached_song, &cached_artist_artwork) {
            debug!(%key, "got song info from cache");
            return Ok(merge(song.clone(), artist_artwork_url.clone()));
        }

        let song_fragment = match cached_song {
            Some(song) => song,
            None => {
                debug!(song, %key, "getting song metadata from api");
                self.source.lookup_song(&key).await?
            }
        };

        let artist_artwork = match cached_artist_artwork {
            Some(url) => Some(url),
            None => {
                debug!(artist, "getting artist artwork from api");
                match self.source.lookup_artist(&artist_key).await {
                    Ok(url) => Some(url),
                    Err(err) => {
                        warn!(artist, error = %err, "artist artwork lookup failed");
                        None
                    }
                }
            }
        };

        self.cache
            .set_album_artwork(key.clone(), song_fragment.album_artwork_url.clone(), self.ttl);
        self.cache.set_share_url(
            key,
            CachedShare {
                track_id: song_fragment.track_id.clone(),
                share_url: song_fragment.share_url.clone(),
            },
            self.ttl,
        );
        if let Some(url) = &artist_artwork {
            self.cache.set_artist_artwork(artist_key, url.clone(), self.ttl);
        }

        Ok(merge(song_fragment, artist_artwork.unwrap_or_default()))
    }
}

fn merge(song: SongFragment, artist_artwork_url: String) -> ResolvedMetadata {
    ResolvedMetadata {
        track_id: song.track_id,
        album_artwork_url: song.album_artwork_url,
        artist_artwork_url,
        share_url: song.share_url,
    }
}
