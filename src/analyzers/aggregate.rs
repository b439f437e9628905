use crate::analyzers::types::{CompanyAggregate, GroupMap, PaymentTypeAggregate, fold_groups};
use crate::analyzers::utility::{fixed2, group_key, is_valid, parse_float, parse_int};
use crate::parser::TripRecord;
use tracing::debug;

#[derive(Debug, Default)]
struct FareAccumulator {
    trips: usize,
    fare_sum: f64,
    valid_fares: usize,
}

impl FareAccumulator {
    fn add(self, record: &TripRecord) -> Self {
        let fare = parse_float(record.get("fare"));
        if is_valid(fare) {
            Self {
                trips: self.trips + 1,
                fare_sum: self.fare_sum + fare,
                valid_fares: self.valid_fares + 1,
            }
        } else {
            Self {
                trips: self.trips + 1,
                ..self
            }
        }
    }
}

#[derive(Debug, Default)]
struct CompanyAccumulator {
    trip_count: usize,
    total_trip_duration: f64,
    /// `None` until a member trip contributes a valid fare.
    total_fare: Option<f64>,
}

impl CompanyAccumulator {
    fn add(self, record: &TripRecord) -> Self {
        let fare = parse_float(record.get("fare"));
        let total_fare = if is_valid(fare) {
            Some(self.total_fare.unwrap_or(0.0) + fare)
        } else {
            self.total_fare
        };

        Self {
            trip_count: self.trip_count + 1,
            total_trip_duration: self.total_trip_duration + parse_int(record.get("trip_seconds")),
            total_fare,
        }
    }
}

/// Average fare per exact `payment_type` value.
///
/// Only valid fares are averaged. A payment type whose trips carry no valid
/// fare reports an average of `0.0`, not an undefined value.
pub fn group_by_payment_type(records: &[TripRecord]) -> GroupMap<PaymentTypeAggregate> {
    let groups = fold_groups(
        records,
        |r| group_key(r.get("payment_type")),
        |acc: FareAccumulator, r| acc.add(r),
    );
    debug!(groups = groups.len(), "Grouped trips by payment type");

    groups
        .into_iter()
        .map(|(key, acc)| {
            let average_fare = if acc.valid_fares > 0 {
                acc.fare_sum / acc.valid_fares as f64
            } else {
                0.0
            };
            let aggregate = PaymentTypeAggregate {
                trip_count: acc.trips,
                valid_fare_count: acc.valid_fares,
                average_fare,
            };
            (key, aggregate)
        })
        .collect()
}

/// Trip count, duration and fare revenue per exact `company` value.
///
/// Every trip counts toward `trip_count` and adds its integer duration (an
/// unparsable duration turns the company's duration totals into NaN). Only
/// valid fares add to revenue, and a company with no valid fare at all is
/// removed from the result.
pub fn group_by_company(records: &[TripRecord]) -> GroupMap<CompanyAggregate> {
    let groups = fold_groups(
        records,
        |r| group_key(r.get("company")),
        |acc: CompanyAccumulator, r| acc.add(r),
    );
    let before = groups.len();

    let companies: GroupMap<CompanyAggregate> = groups
        .into_iter()
        .filter_map(|(name, acc)| {
            let revenue = acc.total_fare?;
            let aggregate = CompanyAggregate {
                trip_count: acc.trip_count,
                total_trip_duration: acc.total_trip_duration,
                total_fare: fixed2(revenue),
                total_fare_revenue: revenue,
                average_trip_duration: acc.total_trip_duration / acc.trip_count as f64,
            };
            Some((name, aggregate))
        })
        .collect();

    debug!(
        groups = companies.len(),
        pruned = before - companies.len(),
        "Grouped trips by company"
    );
    companies
}
