//! Data types produced by the aggregation pipeline.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::stats::{FieldProfile, SummaryStats};

/// Group aggregates keyed by group name, in first-appearance order.
///
/// Serializes as a JSON object whose keys keep that order.
pub type GroupMap<T> = IndexMap<String, T>;

/// Folds `items` into one accumulator per key.
///
/// Each accumulator is moved through `step` by value, so the fold never
/// mutates an accumulator in place.
pub fn fold_groups<T, I, K, F>(items: I, key: K, step: F) -> GroupMap<T>
where
    T: Default,
    I: IntoIterator,
    K: Fn(&I::Item) -> String,
    F: Fn(T, &I::Item) -> T,
{
    let mut groups = GroupMap::new();
    for item in items {
        let slot: &mut T = groups.entry(key(&item)).or_default();
        *slot = step(std::mem::take(slot), &item);
    }
    groups
}

/// Average fare for one payment type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTypeAggregate {
    pub trip_count: usize,
    pub valid_fare_count: usize,
    /// Zero when no member trip had a valid fare.
    pub average_fare: f64,
}

/// Trip volume, duration and revenue for one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAggregate {
    pub trip_count: usize,
    /// NaN (serialized as `null`) when any member duration failed to parse.
    pub total_trip_duration: f64,
    /// Display form of [`total_fare_revenue`](Self::total_fare_revenue), two decimals.
    pub total_fare: String,
    pub total_fare_revenue: f64,
    pub average_trip_duration: f64,
}

/// Direction of a company ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankCriterion {
    /// Highest total fare first.
    Top,
    /// Lowest total fare first.
    Bottom,
}

/// Ordered group keys selected by a [`RankCriterion`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub criterion: RankCriterion,
    pub ordered_keys: Vec<String>,
}

/// Square matrix of Pearson coefficients over a list of fields.
///
/// Values are kept at full precision; undefined coefficients are NaN and
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    pub fields: Vec<String>,
    pub row_count: usize,
    pub values: Vec<Vec<f64>>,
}

/// One slice of the cash-trips-by-company breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyShare {
    pub name: String,
    pub value: usize,
}

/// Trip counts per calendar year of `trip_start_timestamp`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCounts {
    pub by_year: BTreeMap<i32, usize>,
    pub unparsed: usize,
}

/// Duration/fare/distance projection of one trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionPoint {
    pub trip_duration: f64,
    pub fare: f64,
    pub trip_distance: f64,
}

/// Total/extras/miles projection of one trip, indexed by input position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalPoint {
    pub trip_index: usize,
    pub trip_total: f64,
    pub extras: f64,
    pub trip_miles: f64,
}

/// Count-based breakdowns for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionReport {
    pub payment_type_counts: GroupMap<usize>,
    pub cash_trips_by_company: Vec<CompanyShare>,
    pub mean_trip_total_by_community_area: GroupMap<f64>,
    pub trips_by_year: YearCounts,
}

/// Every aggregate computed from one trip snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripReport {
    pub record_count: usize,
    pub summary: SummaryStats,
    pub field_profiles: Vec<FieldProfile>,
    pub correlation: CorrelationMatrix,
    pub payment_types: GroupMap<PaymentTypeAggregate>,
    pub company_analysis: GroupMap<CompanyAggregate>,
    pub top_companies: Ranking,
    pub bottom_companies: Ranking,
    pub distribution: DistributionReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_preserves_first_appearance_order() {
        let words = ["b", "a", "b", "c", "a", "b"];
        let counts: GroupMap<usize> = fold_groups(words, |w| w.to_string(), |n, _| n + 1);

        let keys: Vec<_> = counts.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(counts.get("b"), Some(&3));
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get("c"), Some(&1));
        assert_eq!(counts.get("z"), None);
    }

    #[test]
    fn test_group_map_serializes_in_order() {
        let counts: GroupMap<usize> =
            fold_groups(["zeta", "alpha", "zeta"], |w| w.to_string(), |n, _| n + 1);

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"zeta":2,"alpha":1}"#);
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let matrix = CorrelationMatrix {
            fields: vec!["fare".to_string()],
            row_count: 1,
            values: vec![vec![f64::NAN]],
        };

        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(json, r#"{"fields":["fare"],"rowCount":1,"values":[[null]]}"#);
    }

    #[test]
    fn test_rank_criterion_serde() {
        assert_eq!(serde_json::to_string(&RankCriterion::Top).unwrap(), r#""top""#);
        let parsed: RankCriterion = serde_json::from_str(r#""bottom""#).unwrap();
        assert_eq!(parsed, RankCriterion::Bottom);
    }
}
