pub(crate) mod config;
pub(crate) mod game;
pub(crate) mod suggest;

use meeple_core::GameRecord;

/// "2, 3, 4" or "none".
pub(crate) fn format_counts(counts: &[u32]) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line summary of a record: name, rating and weight.
pub(crate) fn format_record(record: &GameRecord) -> String {
    format!(
        "{} (rating {:.1}, weight {:.2}, {}-{} players)",
        record.display_name(),
        record.stats.average,
        record.stats.avg_weight,
        record.min_players,
        record.max_players,
    )
}
