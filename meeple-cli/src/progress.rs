//! Progress display for a pipeline run.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use meeple_bgg::EnrichEvent;

/// A single bar tracking how many games have finished.
pub struct EnrichProgress {
    pb: ProgressBar,
    /// Games started but not yet finished
    pending: usize,
}

impl EnrichProgress {
    /// When `hidden` is true nothing is drawn.
    pub fn new(hidden: bool, msg: impl Into<String>) -> Self {
        let pb = if hidden {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                    .expect("static pattern")
                    .tick_chars("/-\\|"),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };
        pb.set_message(msg.into());
        Self { pb, pending: 0 }
    }

    pub fn handle(&mut self, event: EnrichEvent) {
        match event {
            EnrichEvent::CollectionLoaded { owner, total } => {
                self.pb
                    .set_message(format!("{} owns {} games", owner, total));
            }
            EnrichEvent::Started { total } => {
                self.pb.set_length(total as u64);
                self.pb.set_position(0);
                if let Ok(style) =
                    ProgressStyle::with_template("  {spinner:.cyan} [{pos}/{len}] {msg}")
                {
                    self.pb.set_style(style.tick_chars("/-\\|"));
                }
            }
            EnrichEvent::GameStarted { id, .. } => {
                self.pending += 1;
                self.pb
                    .set_message(format!("Looking up {} ({} pending)", id, self.pending));
            }
            EnrichEvent::GameEnriched { id, name, .. } => {
                self.finish_one();
                self.pb.set_message(format!(
                    "{} ({} pending)",
                    name.unwrap_or(id),
                    self.pending
                ));
            }
            EnrichEvent::GameFailed { id, .. } => {
                self.finish_one();
                self.pb
                    .set_message(format!("{} failed ({} pending)", id, self.pending));
            }
            EnrichEvent::Done { .. } => {
                self.pending = 0;
                self.pb.set_message("Done");
            }
        }
    }

    fn finish_one(&mut self) {
        self.pending = self.pending.saturating_sub(1);
        self.pb.inc(1);
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_pending_and_finished_games() {
        let mut progress = EnrichProgress::new(true, "Fetching");
        progress.handle(EnrichEvent::Started { total: 3 });
        for (index, id) in ["1", "2", "3"].into_iter().enumerate() {
            progress.handle(EnrichEvent::GameStarted {
                index,
                id: id.to_string(),
            });
        }
        assert_eq!(progress.pending, 3);
        assert_eq!(progress.pb.message(), "Looking up 3 (3 pending)");

        progress.handle(EnrichEvent::GameEnriched {
            index: 0,
            id: "1".to_string(),
            name: Some("Azul".to_string()),
        });
        progress.handle(EnrichEvent::GameFailed {
            index: 1,
            id: "2".to_string(),
            reason: "timeout".to_string(),
        });
        assert_eq!(progress.pending, 1);
        assert_eq!(progress.pb.position(), 2);
        assert_eq!(progress.pb.message(), "2 failed (1 pending)");
    }
}
