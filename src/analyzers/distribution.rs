//! Count and projection breakdowns that feed the trip charts.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::debug;

use std::cmp::Ordering;

use crate::analyzers::types::{
    CompanyShare, DistributionPoint, DistributionReport, GroupMap, TotalPoint, YearCounts,
    fold_groups,
};
use crate::analyzers::utility::{group_key, mean, parse_float, parse_int};
use crate::parser::TripRecord;

/// Companies shown as their own slice in the cash breakdown.
const CASH_SLICES: usize = 5;
/// Companies considered at all in the cash breakdown.
const CASH_CONSIDERED: usize = 10;

/// Builds every breakdown in one report.
pub fn distribution_report(records: &[TripRecord]) -> DistributionReport {
    DistributionReport {
        payment_type_counts: payment_type_counts(records),
        cash_trips_by_company: cash_trips_by_company(records),
        mean_trip_total_by_community_area: mean_trip_total_by_community_area(records),
        trips_by_year: trips_by_year(records),
    }
}

/// Number of trips per exact `payment_type` value.
pub fn payment_type_counts(records: &[TripRecord]) -> GroupMap<usize> {
    fold_groups(
        records,
        |r| group_key(r.get("payment_type")),
        |n: usize, _| n + 1,
    )
}

/// Cash trips per company, as chart slices.
///
/// Companies are sorted by cash-trip count (stable, descending). The first
/// five become slices. When there are more than five companies an extra
/// `Other Companies (m)` slice follows, where `m` is the number of remaining
/// companies and the value sums only those ranked sixth to tenth.
pub fn cash_trips_by_company(records: &[TripRecord]) -> Vec<CompanyShare> {
    let counts: GroupMap<usize> = fold_groups(
        records
            .iter()
            .filter(|r| r.get("payment_type").and_then(Value::as_str) == Some("Cash")),
        |r| group_key(r.get("company")),
        |n: usize, _| n + 1,
    );

    let mut sorted: Vec<(&str, usize)> = counts.iter().map(|(k, n)| (k.as_str(), *n)).collect();
    sorted.sort_by(|(_, a), (_, b)| b.cmp(a));

    let mut shares: Vec<CompanyShare> = sorted
        .iter()
        .take(CASH_SLICES)
        .map(|(name, value)| CompanyShare {
            name: name.to_string(),
            value: *value,
        })
        .collect();

    if sorted.len() > CASH_SLICES {
        let other: usize = sorted
            .iter()
            .take(CASH_CONSIDERED)
            .skip(CASH_SLICES)
            .map(|(_, n)| n)
            .sum();
        shares.push(CompanyShare {
            name: format!("Other Companies ({})", sorted.len() - CASH_SLICES),
            value: other,
        });
    }

    shares
}

/// Mean `trip_total` per `pickup_community_area`.
///
/// Every member trip is averaged, so one unparsable total makes the area's
/// mean NaN. Areas with a whole-number key come first in ascending numeric
/// order, followed by any other keys in first-appearance order.
pub fn mean_trip_total_by_community_area(records: &[TripRecord]) -> GroupMap<f64> {
    let totals: GroupMap<Vec<f64>> = fold_groups(
        records,
        |r| group_key(r.get("pickup_community_area")),
        |mut totals: Vec<f64>, r| {
            totals.push(parse_float(r.get("trip_total")));
            totals
        },
    );

    let mut means: GroupMap<f64> = totals
        .into_iter()
        .map(|(area, totals)| (area, mean(&totals)))
        .collect();
    means.sort_by(|a, _, b, _| area_order(a, b));
    means
}

/// Canonical whole-number keys (`"8"`, not `"08"`) sort numerically ahead
/// of everything else; the rest keep their relative order.
fn area_order(a: &str, b: &str) -> Ordering {
    match (area_number(a), area_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn area_number(key: &str) -> Option<u32> {
    key.parse::<u32>()
        .ok()
        .filter(|n| n.to_string() == key)
}

/// Trips per calendar year of `trip_start_timestamp`, ascending by year.
pub fn trips_by_year(records: &[TripRecord]) -> YearCounts {
    let mut counts = YearCounts::default();

    for r in records {
        match r
            .get("trip_start_timestamp")
            .and_then(Value::as_str)
            .and_then(parse_year)
        {
            Some(year) => *counts.by_year.entry(year).or_default() += 1,
            None => counts.unparsed += 1,
        }
    }

    debug!(
        years = counts.by_year.len(),
        unparsed = counts.unparsed,
        "Counted trips by year"
    );
    counts
}

/// Year of an RFC 3339, naive ISO-8601 or plain date timestamp.
fn parse_year(s: &str) -> Option<i32> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.year());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.year());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(|d| d.year())
}

/// Duration/fare/distance projection of every trip, invalid values as NaN.
pub fn distribution_points(records: &[TripRecord]) -> Vec<DistributionPoint> {
    records
        .iter()
        .map(|r| DistributionPoint {
            trip_duration: parse_int(r.get("trip_seconds")),
            fare: parse_float(r.get("fare")),
            trip_distance: parse_float(r.get("trip_miles")),
        })
        .collect()
}

/// Total/extras/miles projection of every trip, invalid values as NaN.
pub fn total_points(records: &[TripRecord]) -> Vec<TotalPoint> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| TotalPoint {
            trip_index: i,
            trip_total: parse_float(r.get("trip_total")),
            extras: parse_float(r.get("extras")),
            trip_miles: parse_float(r.get("trip_miles")),
        })
        .collect()
}
