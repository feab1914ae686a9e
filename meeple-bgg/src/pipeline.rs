use futures::future::join_all;
use meeple_core::GameRecord;
use tokio::sync::mpsc;

use crate::enrich::GameEnricher;
use crate::error::EnrichError;
use crate::events::EnrichEvent;
use crate::http::HttpFetch;

/// A game that could not be enriched.
#[derive(Debug)]
pub struct ItemFailure {
    /// Position of the id in the input
    pub index: usize,
    pub id: String,
    pub error: EnrichError,
}

/// Outcome of a pipeline run that enriched at least one game.
#[derive(Debug, Default)]
pub struct EnrichReport {
    /// Successful records, in input order
    pub records: Vec<GameRecord>,
    /// Failed items, in input order
    pub failures: Vec<ItemFailure>,
}

/// Tagged result of one game's enrichment.
enum ItemOutcome {
    Enriched(GameRecord),
    Failed(EnrichError),
}

/// Enriches every game of a collection concurrently.
///
/// One future per id is driven at once with no concurrency cap, no
/// cancellation and no pipeline-level timeout; a failed game is reported
/// and left out while the rest complete.
pub struct CollectionEnrichmentPipeline<F> {
    enricher: GameEnricher<F>,
}

impl<F: HttpFetch> CollectionEnrichmentPipeline<F> {
    pub fn new(enricher: GameEnricher<F>) -> Self {
        Self { enricher }
    }

    pub fn enricher(&self) -> &GameEnricher<F> {
        &self.enricher
    }

    /// Enrich `ids` for `player_count` players, returning the successes in
    /// input order.
    pub async fn enrich_all(
        &self,
        ids: &[String],
        player_count: u32,
    ) -> Result<Vec<GameRecord>, EnrichError> {
        let (events, _) = mpsc::unbounded_channel();
        let report = self
            .enrich_all_with_events(ids, player_count, events)
            .await?;
        Ok(report.records)
    }

    /// Like [`enrich_all`](Self::enrich_all), also streaming progress and
    /// returning the per-item failures.
    ///
    /// Fails with [`EnrichError::NothingEnriched`] when ids were given and
    /// none succeeded.
    pub async fn enrich_all_with_events(
        &self,
        ids: &[String],
        player_count: u32,
        events: mpsc::UnboundedSender<EnrichEvent>,
    ) -> Result<EnrichReport, EnrichError> {
        let total = ids.len();
        let _ = events.send(EnrichEvent::Started { total });

        let tasks = ids.iter().enumerate().map(|(index, id)| {
            let events = events.clone();
            async move {
                let _ = events.send(EnrichEvent::GameStarted {
                    index,
                    id: id.clone(),
                });
                match self.enricher.enrich(id, player_count).await {
                    Ok(record) => {
                        let _ = events.send(EnrichEvent::GameEnriched {
                            index,
                            id: id.clone(),
                            name: record.name.clone(),
                        });
                        ItemOutcome::Enriched(record)
                    }
                    Err(error) => {
                        log::debug!("Unable to enrich game {}: {}", id, error);
                        let _ = events.send(EnrichEvent::GameFailed {
                            index,
                            id: id.clone(),
                            reason: error.to_string(),
                        });
                        ItemOutcome::Failed(error)
                    }
                }
            }
        });

        // One slot per input position; join_all fills slot i from future i.
        let slots: Vec<ItemOutcome> = join_all(tasks).await;

        let mut report = EnrichReport::default();
        for (index, (outcome, id)) in slots.into_iter().zip(ids).enumerate() {
            match outcome {
                ItemOutcome::Enriched(record) => report.records.push(record),
                ItemOutcome::Failed(error) => report.failures.push(ItemFailure {
                    index,
                    id: id.clone(),
                    error,
                }),
            }
        }

        let _ = events.send(EnrichEvent::Done {
            enriched: report.records.len(),
            failed: report.failures.len(),
        });

        if total > 0 && report.records.is_empty() {
            return Err(EnrichError::NothingEnriched { attempted: total });
        }
        Ok(report)
    }

    /// Fetch `owner`'s collection and enrich every game in it.
    pub async fn suggest_for_owner(
        &self,
        owner: &str,
        player_count: u32,
        events: mpsc::UnboundedSender<EnrichEvent>,
    ) -> Result<EnrichReport, EnrichError> {
        let collection = self.enricher.fetch_collection(owner).await?;
        if collection.is_empty() {
            return Err(EnrichError::EmptyCollection {
                owner: owner.to_string(),
            });
        }
        let _ = events.send(EnrichEvent::CollectionLoaded {
            owner: owner.to_string(),
            total: collection.items.len(),
        });

        let ids = collection.object_ids();
        self.enrich_all_with_events(&ids, player_count, events)
            .await
    }
}
