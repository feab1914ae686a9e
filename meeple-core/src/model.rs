use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One game owned by a collection owner, as listed in the collection feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionItem {
    /// BoardGameGeek object id (opaque; only ever echoed back into URLs)
    pub object_id: String,
}

impl CollectionItem {
    pub fn new(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
        }
    }
}

/// A decoded collection feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub items: Vec<CollectionItem>,
}

impl Collection {
    /// Object ids in feed order.
    pub fn object_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.object_id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A `<name>` entry on a thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameName {
    pub value: String,
    /// "primary" or "alternate"
    pub kind: String,
}

/// A single `<result>` inside a poll row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTally {
    pub value: String,
    pub num_votes: u32,
}

/// A `<results>` block. Tallies keep the order the feed lists them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollRow {
    /// The `numplayers` attribute, e.g. "3" or "6+". Absent on polls that
    /// are not keyed by player count.
    pub label: Option<String>,
    pub tallies: Vec<VoteTally>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub name: String,
    pub total_votes: u32,
    pub rows: Vec<PollRow>,
}

/// Decoded thing feed for a single game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameMetadata {
    pub names: Vec<GameName>,
    pub description: Option<String>,
    pub min_players: u32,
    pub max_players: u32,
    pub polls: Vec<Poll>,
}

impl GameMetadata {
    /// First name whose kind is "primary".
    pub fn primary_name(&self) -> Option<&str> {
        self.names
            .iter()
            .find(|n| n.kind == "primary")
            .map(|n| n.value.as_str())
    }

    pub fn poll(&self, name: &str) -> Option<&Poll> {
        self.polls.iter().find(|p| p.name == name)
    }
}

/// Community statistics scraped from the game page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    /// Average user rating
    pub average: f64,
    /// Average complexity weight (1-5)
    pub avg_weight: f64,
    /// Bayesian-adjusted rating used for the geek ranking
    pub bayes_average: f64,
    /// Number of users who rated the game
    pub users_rated: u32,
}

/// How well a game plays at a given player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suitability {
    Best,
    Recommended,
    Unsuitable,
}

impl Suitability {
    pub fn is_best(&self) -> bool {
        matches!(self, Self::Best)
    }

    pub fn is_recommended(&self) -> bool {
        matches!(self, Self::Recommended)
    }
}

impl std::fmt::Display for Suitability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Best => write!(f, "best"),
            Self::Recommended => write!(f, "recommended"),
            Self::Unsuitable => write!(f, "not suitable"),
        }
    }
}

/// Every player count the community votes Best or Recommended for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCountBreakdown {
    pub best: Vec<u32>,
    pub recommended: Vec<u32>,
}

/// The enriched result for one collection item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub name: Option<String>,
    pub min_players: u32,
    pub max_players: u32,
    /// The player count `suitability` was computed for
    pub player_count: u32,
    pub suitability: Suitability,
    pub breakdown: PlayerCountBreakdown,
    pub stats: GameStats,
    pub fetched_at: DateTime<Utc>,
}

impl GameRecord {
    pub fn is_best(&self) -> bool {
        self.suitability.is_best()
    }

    pub fn is_recommended(&self) -> bool {
        self.suitability.is_recommended()
    }

    /// Name for display, falling back to the object id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
