use thiserror::Error;

/// Errors that can occur while decoding a BoardGameGeek XML feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// A numeric attribute could not be parsed
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// The thing feed contained no `<item>` element
    #[error("Feed contains no item")]
    MissingItem,

    /// The provider answered with an `<errors>` document (e.g. unknown username)
    #[error("Provider error: {0}")]
    Provider(String),
}

impl FeedError {
    pub fn invalid_number(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            field,
            value: value.into(),
        }
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}

/// Errors that can occur while scraping statistics out of a game page.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Marker {0:?} not found in page")]
    MarkerNotFound(&'static str),

    #[error("No object start found after preload marker")]
    ObjectStartNotFound,

    #[error("Failed to decode preload JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while reading the suggested player count poll.
#[derive(Debug, Error)]
pub enum PollError {
    /// A row label was not an integer (after stripping a trailing `+`)
    #[error("Invalid player count label {0:?}")]
    InvalidPlayerCount(String),

    /// A row did not carry the best / recommended / not recommended tallies
    #[error("Poll row {label:?} has {tallies} vote tallies, expected 3")]
    MalformedRow { label: String, tallies: usize },
}

/// Caller input outside the accepted range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoundsError {
    #[error("Player count must be between {min} and {max}, got {actual}")]
    PlayerCount { min: u32, max: u32, actual: u32 },

    #[error("Owner name must be between {min} and {max} characters, got {actual}")]
    OwnerName { min: usize, max: usize, actual: usize },
}
