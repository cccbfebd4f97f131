use thiserror::Error;

/// Failure of a single remote search call.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a status outside `200..300`.
    #[error("request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    /// The body was not JSON of the expected shape.
    #[error("{source}: {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, LookupError>;
