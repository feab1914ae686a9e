use chrono::Utc;
use meeple_core::{Collection, GameRecord, breakdown, classify, extract_stats, parse_collection, parse_thing};
use url::Url;

use crate::error::EnrichError;
use crate::fetcher::RateLimitedFetcher;
use crate::http::HttpFetch;
use crate::urls::BggUrls;

/// Turns a single object id into a [`GameRecord`].
///
/// The stages run in order (thing feed, poll classification, game page,
/// statistics) and the first failure aborts the game.
pub struct GameEnricher<F> {
    fetcher: RateLimitedFetcher<F>,
    urls: BggUrls,
}

impl<F: HttpFetch> GameEnricher<F> {
    pub fn new(fetcher: RateLimitedFetcher<F>, urls: BggUrls) -> Self {
        Self { fetcher, urls }
    }

    pub fn fetcher(&self) -> &RateLimitedFetcher<F> {
        &self.fetcher
    }

    pub fn urls(&self) -> &BggUrls {
        &self.urls
    }

    /// GET `url`, treating anything but 200 as an error.
    async fn fetch_body(&self, url: Url) -> Result<Vec<u8>, EnrichError> {
        let resp = self.fetcher.fetch(url.as_str()).await?;
        if !resp.is_ok() {
            return Err(EnrichError::Status {
                url: url.to_string(),
                status: resp.status,
            });
        }
        Ok(resp.body)
    }

    pub async fn enrich(&self, id: &str, player_count: u32) -> Result<GameRecord, EnrichError> {
        let thing = self.fetch_body(self.urls.thing(id)).await?;
        let metadata = parse_thing(&thing)?;

        let name = metadata.primary_name().map(str::to_string);
        if name.is_none() {
            log::debug!("Game {} has no primary name", id);
        }

        let suitability = classify(&metadata.polls, player_count)?;
        let breakdown = breakdown(&metadata.polls)?;

        let page = self.fetch_body(self.urls.game_page(id)).await?;
        let stats = extract_stats(&page)?;

        log::debug!(
            "Enriched {} ({}): {} for {} players",
            id,
            name.as_deref().unwrap_or("unnamed"),
            suitability,
            player_count
        );

        Ok(GameRecord {
            id: id.to_string(),
            name,
            min_players: metadata.min_players,
            max_players: metadata.max_players,
            player_count,
            suitability,
            breakdown,
            stats,
            fetched_at: Utc::now(),
        })
    }

    /// Fetch and decode the games `owner` owns.
    pub async fn fetch_collection(&self, owner: &str) -> Result<Collection, EnrichError> {
        let body = self.fetch_body(self.urls.collection(owner)).await?;
        let collection = parse_collection(&body)?;
        log::info!(
            "Collection for {} lists {} games",
            owner,
            collection.items.len()
        );
        Ok(collection)
    }
}
