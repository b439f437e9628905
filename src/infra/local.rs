use anyhow::{Context, Result};
use async_trait::async_trait;
use trip_analytics::parser::{TripRecord, parse_trips, screen_trips};

use crate::services::trip_source::TripSource;

/// Reads a snapshot previously saved as a JSON array.
pub struct LocalFile {
    path: String,
}

impl LocalFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TripSource for LocalFile {
    fn describe(&self) -> String {
        self.path.clone()
    }

    #[tracing::instrument(skip(self), fields(path = %self.path))]
    async fn load_trips(&self) -> Result<Vec<TripRecord>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read '{}'", self.path))?;
        Ok(screen_trips(parse_trips(&bytes)?))
    }
}
