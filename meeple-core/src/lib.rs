pub mod bounds;
pub mod error;
pub mod feed;
pub mod model;
pub mod poll;
pub mod stats;
pub mod suggest;

pub use bounds::{validate_owner_name, validate_player_count};
pub use error::{BoundsError, FeedError, PollError, StatsError};
pub use feed::{parse_collection, parse_thing};
pub use model::{
    Collection, CollectionItem, GameMetadata, GameName, GameRecord, GameStats,
    PlayerCountBreakdown, Poll, PollRow, Suitability, VoteTally,
};
pub use poll::{PlayerCountLabel, PollResult, SUGGESTED_PLAYERS_POLL, breakdown, classify};
pub use stats::{PRELOAD_MARKER, extract_stats};
pub use suggest::Suggestions;
