pub mod catalog;

use crate::error::Result;
use crate::keys::{ArtistKey, LookupKey};
use async_trait::async_trait;

pub use catalog::CatalogClient;

/// Edge length substituted into artwork URL templates.
pub const ARTWORK_SIZE: &str = "512";

/// Trait común para las fuentes de metadata remotas
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Song search, at most one match. No match is an all-empty fragment.
    async fn lookup_song(&self, key: &LookupKey) -> Result<SongFragment>;

    /// Artist search, at most one match. No match is an empty string.
    async fn lookup_artist(&self, key: &ArtistKey) -> Result<String>;
}

/// Result of a song search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFragment {
    pub track_id: String,
    pub album_artwork_url: String,
    pub share_url: String,
}

/// Replaces the `{w}` and `{h}` placeholders of an artwork template with
/// [`ARTWORK_SIZE`]. Only the first occurrence of each is replaced.
pub fn sized_artwork(template: &str) -> String {
    template
        .replacen("{w}", ARTWORK_SIZE, 1)
        .replacen("{h}", ARTWORK_SIZE, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artwork_placeholders() {
        assert_eq!(
            sized_artwork("https://img.example/a/{w}x{h}bb.jpg"),
            "https://img.example/a/512x512bb.jpg"
        );
        assert_eq!(sized_artwork("https://img.example/plain.jpg"), "https://img.example/plain.jpg");
        assert_eq!(sized_artwork(""), "");
        assert_eq!(sized_artwork("{w}x{h}/{w}"), "512x512/{w}");
    }
}
