//! Cache and query keys derived from the (artist, album, song) triple.
//!
//! Both keys are already query-escaped (`application/x-www-form-urlencoded`,
//! so a space becomes `+`) and are used verbatim as the search `term`.
//! The song key joins its parts with a plain space and does not escape the
//! boundaries between them: `("a b", "c", "d")` and `("a", "b c", "d")`
//! produce the same key.

use std::fmt;
use url::form_urlencoded;

fn query_escape(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

/// Song-level key built from artist, album and song.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey(String);

impl LookupKey {
    pub fn new(artist: &str, album: &str, song: &str) -> Self {
        Self(query_escape(&[artist, album, song].join(" ")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Artist-level key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtistKey(String);

impl ArtistKey {
    pub fn new(artist: &str) -> Self {
        Self(query_escape(artist))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtistKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_key_escapes_and_joins() {
        let key = LookupKey::new("Artist A", "Album B", "Song C");
        assert_eq!(key.as_str(), "Artist+A+Album+B+Song+C");

        let key = LookupKey::new("AC/DC", "Back in Black", "Hells Bells & more");
        assert_eq!(key.as_str(), "AC%2FDC+Back+in+Black+Hells+Bells+%26+more");
    }

    #[test]
    fn lookup_key_collides_on_shifted_spaces() {
        assert_eq!(
            LookupKey::new("a b", "c", "d"),
            LookupKey::new("a", "b c", "d")
        );
        assert_ne!(
            LookupKey::new("a", "b", "c"),
            LookupKey::new("a", "b", "C")
        );
    }

    #[test]
    fn artist_key_escapes_name_only() {
        assert_eq!(ArtistKey::new("Sigur Rós").as_str(), "Sigur+R%C3%B3s");
        assert_eq!(ArtistKey::new("Sigur Rós").to_string(), "Sigur+R%C3%B3s");
    }
}
