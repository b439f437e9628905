use anyhow::Result;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use trip_analytics::fetch::auth::{ApiKey, UrlParam};
use trip_analytics::fetch::{BasicClient, HttpClient, fetch_bytes};
use trip_analytics::parser::{TripRecord, parse_trips, screen_trips};

use crate::services::trip_source::TripSource;

/// Fetches a trip snapshot from a Socrata open-data resource.
pub struct SocrataClient {
    resource_url: String,
    http: Box<dyn HttpClient>,
}

impl SocrataClient {
    /// Builds a client for `resource_url`, optionally sending an application
    /// token and capping the number of rows returned.
    pub fn new(resource_url: String, app_token: Option<&str>, row_limit: Option<u32>) -> Result<Self> {
        let mut http: Box<dyn HttpClient> = Box::new(BasicClient::with_timeouts(
            Duration::from_secs(120),
            Duration::from_secs(10),
        )?);

        if let Some(token) = app_token {
            http = Box::new(ApiKey::app_token(http, token)?);
        }
        if let Some(limit) = row_limit {
            http = Box::new(UrlParam::row_limit(http, limit));
        }

        Ok(Self { resource_url, http })
    }
}

#[async_trait]
impl TripSource for SocrataClient {
    fn describe(&self) -> String {
        self.resource_url.clone()
    }

    #[tracing::instrument(skip(self), fields(url = %self.resource_url))]
    async fn load_trips(&self) -> Result<Vec<TripRecord>> {
        let started = Instant::now();
        let bytes = fetch_bytes(&self.http, &self.resource_url).await?;

        let elapsed = started.elapsed();
        if elapsed.as_secs() > 15 {
            warn!(elapsed_secs = elapsed.as_secs(), "Dataset fetch was slow");
        }
        debug!(bytes = bytes.len(), "Dataset bytes received, parsing");

        Ok(screen_trips(parse_trips(&bytes)?))
    }
}
