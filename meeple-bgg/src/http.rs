use std::time::Duration;

use crate::error::{EnrichError, TransportError};
use crate::settings::BggSettings;

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// The transport seam: one GET, no retries, no status interpretation.
#[allow(async_fn_in_trait)]
pub trait HttpFetch {
    async fn get(&self, url: &str) -> Result<FetchResponse, TransportError>;
}

impl<T: HttpFetch> HttpFetch for &T {
    async fn get(&self, url: &str) -> Result<FetchResponse, TransportError> {
        (**self).get(url).await
    }
}

/// [`HttpFetch`] over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    http: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: &BggSettings) -> Result<Self, EnrichError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| EnrichError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        Ok(FetchResponse {
            status,
            body: body.to_vec(),
        })
    }
}
