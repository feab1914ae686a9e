use crate::model::{GameRecord, Suitability};

/// Enriched records partitioned by how well they play at one player count.
///
/// Each list keeps the order of the records it was built from.
#[derive(Debug, Clone)]
pub struct Suggestions<'a> {
    pub player_count: u32,
    pub best: Vec<&'a GameRecord>,
    pub recommended: Vec<&'a GameRecord>,
    pub unsuitable: Vec<&'a GameRecord>,
}

impl<'a> Suggestions<'a> {
    pub fn from_records(player_count: u32, records: &'a [GameRecord]) -> Self {
        let mut suggestions = Self {
            player_count,
            best: Vec::new(),
            recommended: Vec::new(),
            unsuitable: Vec::new(),
        };
        for record in records {
            match record.suitability {
                Suitability::Best => suggestions.best.push(record),
                Suitability::Recommended => suggestions.recommended.push(record),
                Suitability::Unsuitable => suggestions.unsuitable.push(record),
            }
        }
        suggestions
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty() && self.recommended.is_empty()
    }
}
