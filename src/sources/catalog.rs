use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{sized_artwork, MetadataSource, SongFragment};
use crate::error::{LookupError, Result};
use crate::keys::{ArtistKey, LookupKey};

pub const DEFAULT_BASE_URL: &str = "https://itunes.apple.com/search";

#[derive(Debug, Deserialize)]
struct SongSearchResponse {
    #[serde(default)]
    songs: ResourceSet,
}

#[derive(Debug, Deserialize)]
struct ArtistSearchResponse {
    #[serde(default)]
    artists: ResourceSet,
}

#[derive(Debug, Default, Deserialize)]
struct ResourceSet {
    #[serde(default)]
    data: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    id: Option<String>,
    #[serde(default)]
    attributes: Attributes,
}

#[derive(Debug, Default, Deserialize)]
struct Attributes {
    url: Option<String>,
    #[serde(default)]
    artwork: Artwork,
}

#[derive(Debug, Default, Deserialize)]
struct Artwork {
    url: Option<String>,
}

/// Cliente HTTP para el endpoint de búsqueda del catálogo.
///
/// Every lookup is a single `GET <base>?types=<kind>&limit=1&term=<key>`.
/// There is no retry; the first failure is returned to the caller.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(base_url: Url, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The key is already query-escaped, so it is appended as-is.
    fn search_url(&self, kind: &str, term: &str) -> String {
        format!("{}?types={}&limit=1&term={}", self.base_url, kind, term)
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "🔍 catalog search");
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        decode_response(status, body)
    }
}

fn decode_response<T: DeserializeOwned>(status: u16, body: String) -> Result<T> {
    if !(200..300).contains(&status) {
        return Err(LookupError::Remote { status, body });
    }

    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(source) => Err(LookupError::Decode { source, body }),
    }
}

fn song_fragment(response: SongSearchResponse) -> SongFragment {
    match response.songs.data.into_iter().next() {
        Some(song) => SongFragment {
            track_id: song.id.unwrap_or_default(),
            album_artwork_url: sized_artwork(&song.attributes.artwork.url.unwrap_or_default()),
            share_url: song.attributes.url.unwrap_or_default(),
        },
        None => SongFragment::default(),
    }
}

fn artist_artwork(response: ArtistSearchResponse) -> String {
    response
        .artists
        .data
        .into_iter()
        .next()
        .map(|artist| sized_artwork(&artist.attributes.artwork.url.unwrap_or_default()))
        .unwrap_or_default()
}

#[async_trait]
impl MetadataSource for CatalogClient {
    async fn lookup_song(&self, key: &LookupKey) -> Result<SongFragment> {
        let url = self.search_url("songs", key.as_str());
        let response: SongSearchResponse = self.get(&url).await?;
        Ok(song_fragment(response))
    }

    async fn lookup_artist(&self, key: &ArtistKey) -> Result<String> {
        let url = self.search_url("artists", key.as_str());
        let response: ArtistSearchResponse = self.get(&url).await?;
        Ok(artist_artwork(response))
    }
}
