//! Resolves display metadata (track id, album artwork, artist artwork and
//! share URL) for an (artist, album, song) triple from a remote search API,
//! caching album-level and artist-level fragments independently.

pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
pub mod resolver;
pub mod sources;

pub use cache::FragmentCache;
pub use config::Config;
pub use error::LookupError;
pub use resolver::{MetadataResolver, ResolvedMetadata};
pub use sources::{CatalogClient, MetadataSource};
