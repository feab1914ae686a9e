//! Player count recommendations from the "suggested number of players" poll.
//!
//! Each poll row carries three tallies in fixed order: Best, Recommended and
//! Not Recommended. A row only counts when Best + Recommended outvotes Not
//! Recommended; among counting rows, Best wins only on a strict majority
//! over Recommended.

use crate::error::PollError;
use crate::model::{PlayerCountBreakdown, Poll, PollRow, Suitability};

/// Name of the poll keyed by player count.
pub const SUGGESTED_PLAYERS_POLL: &str = "suggested_numplayers";

/// Suffix the feed uses for an open-ended row ("6+").
const OR_MORE_MARKER: char = '+';

/// A parsed row label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCountLabel {
    pub count: u32,
    pub or_more: bool,
}

impl PlayerCountLabel {
    pub fn parse(label: &str) -> Result<Self, PollError> {
        let or_more = label.ends_with(OR_MORE_MARKER);
        let digits = label.strip_suffix(OR_MORE_MARKER).unwrap_or(label);
        let count = digits
            .parse()
            .map_err(|_| PollError::InvalidPlayerCount(label.to_string()))?;
        Ok(Self { count, or_more })
    }

    /// Whether this row speaks for `target` players.
    ///
    /// An open-ended row "k+" is taken to cover any target up to twice its
    /// count; other rows only match exactly.
    pub fn matches(&self, target: u32) -> bool {
        if self.or_more {
            self.count.saturating_mul(2) >= target
        } else {
            self.count == target
        }
    }
}

/// One typed row of the suggested player count poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResult {
    pub label: String,
    pub best: u32,
    pub recommended: u32,
    pub not_recommended: u32,
}

impl PollResult {
    pub fn new(label: impl Into<String>, best: u32, recommended: u32, not_recommended: u32) -> Self {
        Self {
            label: label.into(),
            best,
            recommended,
            not_recommended,
        }
    }

    /// Read the positional tallies of a feed row.
    pub fn from_row(row: &PollRow) -> Result<Self, PollError> {
        let label = row.label.clone().unwrap_or_default();
        match row.tallies.as_slice() {
            [best, recommended, not_recommended] => Ok(Self {
                label,
                best: best.num_votes,
                recommended: recommended.num_votes,
                not_recommended: not_recommended.num_votes,
            }),
            other => Err(PollError::MalformedRow {
                label,
                tallies: other.len(),
            }),
        }
    }

    /// Best/Recommended verdict for this row, or `None` when the row is
    /// outvoted by Not Recommended.
    pub fn verdict(&self) -> Option<Suitability> {
        // Tallies can be as large as u32::MAX, so sum in u64.
        let support = u64::from(self.best) + u64::from(self.recommended);
        if support <= u64::from(self.not_recommended) {
            return None;
        }
        if self.best > self.recommended {
            Some(Suitability::Best)
        } else {
            Some(Suitability::Recommended)
        }
    }
}

fn player_poll(polls: &[Poll]) -> Option<&Poll> {
    polls.iter().find(|p| p.name == SUGGESTED_PLAYERS_POLL)
}

/// Classify how well a game plays with `target` players.
///
/// Rows are read in feed order and the first row that both counts and
/// matches `target` decides. The feed lists rows by ascending player count,
/// so an open-ended row is only reached after every exact row. A label that
/// is not a number fails the whole classification, even on rows that would
/// otherwise be skipped.
pub fn classify(polls: &[Poll], target: u32) -> Result<Suitability, PollError> {
    let Some(poll) = player_poll(polls) else {
        return Ok(Suitability::Unsuitable);
    };

    for row in &poll.rows {
        let result = PollResult::from_row(row)?;
        let label = PlayerCountLabel::parse(&result.label)?;

        let Some(verdict) = result.verdict() else {
            continue;
        };
        if label.matches(target) {
            return Ok(verdict);
        }
    }

    Ok(Suitability::Unsuitable)
}

/// Every player count voted Best or Recommended, ascending.
///
/// An open-ended "k+" row is recorded as k + 1.
pub fn breakdown(polls: &[Poll]) -> Result<PlayerCountBreakdown, PollError> {
    let mut out = PlayerCountBreakdown::default();
    let Some(poll) = player_poll(polls) else {
        return Ok(out);
    };

    for row in &poll.rows {
        let result = PollResult::from_row(row)?;
        let label = PlayerCountLabel::parse(&result.label)?;
        let count = if label.or_more {
            label.count.saturating_add(1)
        } else {
            label.count
        };

        match result.verdict() {
            Some(Suitability::Best) => out.best.push(count),
            Some(_) => out.recommended.push(count),
            None => {}
        }
    }

    out.best.sort_unstable();
    out.best.dedup();
    out.recommended.sort_unstable();
    out.recommended.dedup();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VoteTally;

    fn row(label: &str, best: u32, rec: u32, nay: u32) -> PollRow {
        PollRow {
            label: Some(label.to_string()),
            tallies: vec![
                VoteTally {
                    value: "Best".to_string(),
                    num_votes: best,
                },
                VoteTally {
                    value: "Recommended".to_string(),
                    num_votes: rec,
                },
                VoteTally {
                    value: "Not Recommended".to_string(),
                    num_votes: nay,
                },
            ],
        }
    }

    fn players_poll(rows: Vec<PollRow>) -> Vec<Poll> {
        vec![Poll {
            name: SUGGESTED_PLAYERS_POLL.to_string(),
            total_votes: 0,
            rows,
        }]
    }

    #[test]
    fn test_verdict_with_huge_tallies() {
        assert_eq!(
            PollResult::new("3", u32::MAX, 1, 0).verdict(),
            Some(Suitability::Best)
        );
        assert_eq!(
            PollResult::new("3", u32::MAX, u32::MAX, u32::MAX).verdict(),
            Some(Suitability::Recommended)
        );
        assert_eq!(PollResult::new("3", 1, 0, u32::MAX).verdict(), None);
    }

    #[test]
    fn test_classify_with_huge_tallies() {
        let polls = players_poll(vec![row("3", u32::MAX, 1, 0)]);
        assert_eq!(classify(&polls, 3).unwrap(), Suitability::Best);
        assert_eq!(breakdown(&polls).unwrap().best, vec![3]);
    }

    #[test]
    fn test_label_parse() {
        assert_eq!(
            PlayerCountLabel::parse("6+").unwrap(),
            PlayerCountLabel {
                count: 6,
                or_more: true
            }
        );
        assert_eq!(
            PlayerCountLabel::parse("3").unwrap(),
            PlayerCountLabel {
                count: 3,
                or_more: false
            }
        );
        assert!(PlayerCountLabel::parse("three").is_err());
        assert!(PlayerCountLabel::parse("").is_err());
        assert!(PlayerCountLabel::parse("+").is_err());
    }

    #[test]
    fn test_tie_is_recommended() {
        let polls = players_poll(vec![row("3", 5, 5, 0)]);
        assert_eq!(classify(&polls, 3).unwrap(), Suitability::Recommended);
    }

    #[test]
    fn test_strict_majority_is_best() {
        let polls = players_poll(vec![row("3", 6, 5, 0)]);
        assert_eq!(classify(&polls, 3).unwrap(), Suitability::Best);
    }

    #[test]
    fn test_vote_floor_skips_row() {
        let polls = players_poll(vec![row("2", 2, 1, 3)]);
        assert_eq!(classify(&polls, 2).unwrap(), Suitability::Unsuitable);
        assert_eq!(PollResult::new("2", 2, 1, 3).verdict(), None);
    }

    #[test]
    fn test_open_range_matching() {
        let polls = players_poll(vec![row("6+", 10, 0, 0)]);
        assert_eq!(classify(&polls, 12).unwrap(), Suitability::Best);
        assert_eq!(classify(&polls, 13).unwrap(), Suitability::Unsuitable);
    }

    #[test]
    fn test_first_match_wins_in_feed_order() {
        let polls = players_poll(vec![row("4+", 0, 9, 0), row("4", 9, 0, 0)]);
        assert_eq!(classify(&polls, 4).unwrap(), Suitability::Recommended);
    }

    #[test]
    fn test_skipped_row_falls_through_to_open_range() {
        let polls = players_poll(vec![row("5", 0, 1, 20), row("4+", 3, 2, 1)]);
        assert_eq!(classify(&polls, 5).unwrap(), Suitability::Best);
    }

    #[test]
    fn test_classification_is_exclusive() {
        let rows = vec![
            row("1", 0, 3, 40),
            row("2", 12, 30, 4),
            row("3", 40, 12, 1),
            row("4", 20, 20, 2),
            row("4+", 1, 1, 30),
        ];
        let polls = players_poll(rows);
        for target in 1..=10 {
            let s = classify(&polls, target).unwrap();
            assert!(!(s.is_best() && s.is_recommended()));
        }
        assert!(classify(&polls, 3).unwrap().is_best());
        assert!(classify(&polls, 2).unwrap().is_recommended());
    }

    #[test]
    fn test_missing_poll_is_unsuitable() {
        let polls = vec![Poll {
            name: "suggested_playerage".to_string(),
            total_votes: 10,
            rows: vec![],
        }];
        assert_eq!(classify(&polls, 2).unwrap(), Suitability::Unsuitable);
        assert_eq!(classify(&[], 2).unwrap(), Suitability::Unsuitable);
    }

    #[test]
    fn test_bad_label_fails_even_when_outvoted() {
        let polls = players_poll(vec![row("x", 0, 0, 10), row("2", 5, 0, 0)]);
        assert!(matches!(
            classify(&polls, 2),
            Err(PollError::InvalidPlayerCount(_))
        ));
    }

    #[test]
    fn test_malformed_row() {
        let mut bad = row("2", 1, 1, 1);
        bad.tallies.pop();
        let polls = players_poll(vec![bad]);
        assert!(matches!(
            classify(&polls, 2),
            Err(PollError::MalformedRow { tallies: 2, .. })
        ));
    }

    #[test]
    fn test_breakdown() {
        let polls = players_poll(vec![
            row("1", 0, 1, 30),
            row("2", 5, 20, 2),
            row("3", 30, 10, 0),
            row("4", 25, 10, 3),
            row("4+", 1, 3, 2),
        ]);
        let b = breakdown(&polls).unwrap();
        assert_eq!(b.best, vec![3, 4]);
        assert_eq!(b.recommended, vec![2, 5]);
    }
}
