pub mod enrich;
pub mod error;
pub mod events;
pub mod fetcher;
pub mod http;
pub mod pipeline;
pub mod settings;
pub mod urls;

pub use enrich::GameEnricher;
pub use error::{EnrichError, TransportError};
pub use events::{EnrichEvent, run_with_events};
pub use fetcher::{PROCESSING_STATUS, RateLimitedFetcher, RetryPolicy};
pub use http::{FetchResponse, HttpFetch, ReqwestFetcher};
pub use pipeline::{CollectionEnrichmentPipeline, EnrichReport, ItemFailure};
pub use settings::{
    BggSettings, RetrySettings, SettingSource, SettingSources, Settings, setting_sources,
    settings_path,
};
pub use urls::{BggUrls, DEFAULT_BASE_URL};

/// Build a pipeline that talks to BoardGameGeek over HTTP using `settings`.
pub fn create_pipeline(
    settings: &Settings,
) -> Result<CollectionEnrichmentPipeline<ReqwestFetcher>, EnrichError> {
    let urls = BggUrls::new(&settings.bgg.base_url)?;
    let http = ReqwestFetcher::new(&settings.bgg)?;
    let fetcher = RateLimitedFetcher::new(http, settings.retry_policy());
    log::debug!(
        "Using {} (up to {} retries while processing)",
        urls.base(),
        settings.retry.max_retries
    );
    Ok(CollectionEnrichmentPipeline::new(GameEnricher::new(
        fetcher, urls,
    )))
}
