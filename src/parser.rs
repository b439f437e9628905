//! JSON decoding of trip snapshots.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::analyzers::utility::to_number;

/// One taxi-trip observation.
///
/// Fields are kept exactly as the dataset delivered them (number, string,
/// `null`, ...) in their original order; the aggregates decide how to read
/// each one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripRecord(Map<String, Value>);

impl TripRecord {
    /// Returns the raw value of `field`, or `None` if the record lacks it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Iterates over `(field, value)` pairs in source order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sets `field` to `value`, returning the updated record.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }
}

impl From<Map<String, Value>> for TripRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for TripRecord {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(anyhow::anyhow!("trip record must be a JSON object, got {}", other)),
        }
    }
}

/// Decodes a JSON array of trip objects.
///
/// # Errors
///
/// Returns an error if the bytes are not a JSON array of objects.
pub fn parse_trips(bytes: &[u8]) -> Result<Vec<TripRecord>> {
    let trips: Vec<TripRecord> =
        serde_json::from_slice(bytes).context("Failed to decode trip snapshot")?;
    debug!(count = trips.len(), "Decoded trip snapshot");
    Ok(trips)
}

/// Drops trips whose `trip_seconds` or `trip_miles` cannot be coerced to a
/// number.
///
/// Coercion is strict (see [`to_number`]): a missing field or trailing text
/// drops the trip, while `null` and empty strings coerce to zero and survive.
/// Later aggregates still apply their own filtering.
pub fn screen_trips(trips: Vec<TripRecord>) -> Vec<TripRecord> {
    let before = trips.len();
    let kept: Vec<TripRecord> = trips
        .into_iter()
        .filter(|t| {
            !to_number(t.get("trip_seconds")).is_nan() && !to_number(t.get("trip_miles")).is_nan()
        })
        .collect();
    debug!(kept = kept.len(), dropped = before - kept.len(), "Screened trips");
    kept
}
