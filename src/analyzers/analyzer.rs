use tracing::{debug, info};

use crate::analyzers::aggregate::{group_by_company, group_by_payment_type};
use crate::analyzers::correlation::{DEFAULT_FIELDS, correlation_matrix};
use crate::analyzers::distribution::distribution_report;
use crate::analyzers::ranking::rank_groups;
use crate::analyzers::types::{RankCriterion, TripReport};
use crate::config::EngineConfig;
use crate::parser::TripRecord;
use crate::stats::{SummaryStats, profile_fields};

/// Computes every aggregate over one trip snapshot.
///
/// Nothing is cached between calls; the same snapshot always produces the
/// same report.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn analyze(records: &[TripRecord], config: &EngineConfig) -> TripReport {
    let summary = SummaryStats::from_records(records, config.summary_denominator);
    debug!(valid = summary.valid_count, "Summary computed");

    let field_profiles = profile_fields(records);
    let correlation = correlation_matrix(records, DEFAULT_FIELDS);
    let payment_types = group_by_payment_type(records);
    let company_analysis = group_by_company(records);

    let top_companies = rank_groups(&company_analysis, RankCriterion::Top, config.rank_width);
    let bottom_companies =
        rank_groups(&company_analysis, RankCriterion::Bottom, config.rank_width);

    let distribution = distribution_report(records);

    info!(
        fields = field_profiles.len(),
        correlated_rows = correlation.row_count,
        payment_types = payment_types.len(),
        companies = company_analysis.len(),
        "Trip analysis complete"
    );

    TripReport {
        record_count: records.len(),
        summary,
        field_profiles,
        correlation,
        payment_types,
        company_analysis,
        top_companies,
        bottom_companies,
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_empty_snapshot() {
        let report = analyze(&[], &EngineConfig::default());

        assert_eq!(report.record_count, 0);
        assert_eq!(report.summary.average_fare, None);
        assert!(report.field_profiles.is_empty());
        assert!(report.correlation.is_empty());
        assert!(report.payment_types.is_empty());
        assert!(report.company_analysis.is_empty());
        assert!(report.top_companies.ordered_keys.is_empty());
        assert!(report.distribution.cash_trips_by_company.is_empty());
    }

    #[test]
    fn test_analyze_respects_config() {
        let records: Vec<TripRecord> = ["A", "B", "C", "D"]
            .iter()
            .enumerate()
            .map(|(i, c)| {
                TripRecord::default()
                    .with("company", *c)
                    .with("payment_type", "Cash")
                    .with("trip_seconds", "100")
                    .with("trip_miles", "1.0")
                    .with("fare", format!("{}", i + 1))
            })
            .collect();
        let config = EngineConfig {
            summary_denominator: 4,
            rank_width: 2,
            ..Default::default()
        };

        let report = analyze(&records, &config);

        assert_eq!(report.summary.total_count, 4);
        assert_eq!(report.summary.average_duration, Some(100.0));
        assert_eq!(report.summary.average_fare, Some(2.5));
        assert_eq!(report.top_companies.ordered_keys, vec!["D", "C"]);
        assert_eq!(report.bottom_companies.ordered_keys, vec!["A", "B"]);
        assert_eq!(report.payment_types.get("Cash").unwrap().average_fare, 2.5);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let records = vec![
            TripRecord::default()
                .with("company", "X")
                .with("trip_seconds", "bad")
                .with("fare", "1.5")
                .with("tips", "0"),
            TripRecord::default()
                .with("company", "Y")
                .with("trip_seconds", "300")
                .with("fare", "9.75"),
        ];
        let config = EngineConfig::default();

        let first = serde_json::to_string(&analyze(&records, &config)).unwrap();
        let second = serde_json::to_string(&analyze(&records, &config)).unwrap();

        assert_eq!(first, second);
    }
}
