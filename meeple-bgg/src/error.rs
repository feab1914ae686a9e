use meeple_core::{FeedError, PollError, StatsError};

/// Failure of the underlying HTTP transport (connection, TLS, timeout).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Errors that can occur while enriching games.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// Network failure; never retried
    #[error("Transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    /// The provider kept answering "still processing" until retries ran out
    #[error("BoardGameGeek still processing {url} after {attempts} attempts")]
    RateLimited { url: String, attempts: u32 },

    #[error("Unexpected HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Feed decode error: {0}")]
    Feed(#[from] FeedError),

    #[error("Statistics extraction failed: {0}")]
    Stats(#[from] StatsError),

    #[error("Player poll error: {0}")]
    Poll(#[from] PollError),

    /// Every item of a pipeline run failed
    #[error("No games could be enriched ({attempted} attempted)")]
    NothingEnriched { attempted: usize },

    #[error("Collection for {owner:?} is empty")]
    EmptyCollection { owner: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EnrichError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
