use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

use crate::analyzers::utility::{is_valid, parse_float, parse_int};
use crate::parser::TripRecord;

/// Population size the averages are divided by unless configured otherwise.
pub const DEFAULT_SUMMARY_DENOMINATOR: u64 = 200_000;

/// Headline statistics for a trip snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// The denominator the averages were divided by.
    pub total_count: u64,
    /// Trips with valid duration, distance and fare.
    pub valid_count: usize,

    pub average_duration: Option<f64>,
    pub average_distance: Option<f64>,
    pub average_fare: Option<f64>,
}

impl SummaryStats {
    /// Sums duration, distance and fare over trips where all three are valid
    /// and divides each sum by `denominator`.
    ///
    /// The denominator is shared by the three averages and is not the number
    /// of valid trips. Averages are `None` when no trip is valid or when the
    /// quotient is not finite (zero denominator).
    pub fn from_records(records: &[TripRecord], denominator: u64) -> Self {
        let mut s = SummaryStats {
            total_count: denominator,
            ..Default::default()
        };

        let mut duration_sum = 0.0;
        let mut distance_sum = 0.0;
        let mut fare_sum = 0.0;

        for r in records {
            let duration = parse_int(r.get("trip_seconds"));
            let distance = parse_float(r.get("trip_miles"));
            let fare = parse_float(r.get("fare"));

            if !(is_valid(duration) && is_valid(distance) && is_valid(fare)) {
                continue;
            }

            s.valid_count += 1;
            duration_sum += duration;
            distance_sum += distance;
            fare_sum += fare;
        }

        if s.valid_count == 0 {
            return s;
        }

        let d = denominator as f64;
        s.average_duration = Self::finite(duration_sum / d);
        s.average_distance = Self::finite(distance_sum / d);
        s.average_fare = Self::finite(fare_sum / d);

        s
    }

    fn finite(x: f64) -> Option<f64> {
        x.is_finite().then_some(x)
    }
}

/// Runtime representation of a non-null field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    Number,
    String,
    Boolean,
    Object,
}

impl TypeTag {
    /// Tag for `value`, or `None` for `null`. Arrays count as objects.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(TypeTag::Boolean),
            Value::Number(_) => Some(TypeTag::Number),
            Value::String(_) => Some(TypeTag::String),
            Value::Array(_) | Value::Object(_) => Some(TypeTag::Object),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
            TypeTag::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Observed types and null count for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldProfile {
    pub field_name: String,
    /// Every type seen for the field. More than one tag (say `number` and
    /// `string`) means the source mixes representations.
    pub observed_types: BTreeSet<TypeTag>,
    pub null_count: usize,
}

impl FieldProfile {
    fn new(field_name: &str) -> Self {
        Self {
            field_name: field_name.to_string(),
            observed_types: BTreeSet::new(),
            null_count: 0,
        }
    }
}

/// Profiles every field that appears in at least one record, in
/// first-appearance order.
///
/// A field that is present but `null` adds to `null_count`; a present
/// non-null value adds its [`TypeTag`]. Records that lack the field
/// contribute nothing to it.
pub fn profile_fields(records: &[TripRecord]) -> Vec<FieldProfile> {
    let mut profiles: IndexMap<&str, FieldProfile> = IndexMap::new();

    for r in records {
        for (field, value) in r.fields() {
            let profile = profiles
                .entry(field)
                .or_insert_with(|| FieldProfile::new(field));

            match TypeTag::of(value) {
                Some(tag) => {
                    profile.observed_types.insert(tag);
                }
                None => profile.null_count += 1,
            }
        }
    }

    profiles.into_values().collect()
}
