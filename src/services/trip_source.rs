//! Trait for loading trip snapshots.

use anyhow::Result;
use trip_analytics::parser::TripRecord;

/// Abstraction over where a trip snapshot comes from (HTTP endpoint, local file).
///
/// Implementations hand back the fully materialized, screened snapshot.
#[async_trait::async_trait]
pub trait TripSource: Send + Sync {
    /// Human-readable origin, for logging.
    fn describe(&self) -> String;

    /// Loads every trip the source offers.
    async fn load_trips(&self) -> Result<Vec<TripRecord>>;
}
