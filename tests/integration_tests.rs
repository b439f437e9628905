use trip_analytics::analyzers::analyzer::analyze;
use trip_analytics::analyzers::types::RankCriterion;
use trip_analytics::config::EngineConfig;
use trip_analytics::parser::{parse_trips, screen_trips};
use trip_analytics::stats::TypeTag;

fn sample_trips() -> Vec<trip_analytics::parser::TripRecord> {
    let bytes = include_bytes!("fixtures/sample_trips.json");
    let trips = parse_trips(bytes).expect("Failed to parse trips");
    screen_trips(trips)
}

#[test]
fn test_full_pipeline() {
    let trips = sample_trips();
    // "fast" is not a number; null survives screening.
    assert_eq!(trips.len(), 9);

    let config = EngineConfig {
        summary_denominator: 7,
        ..Default::default()
    };
    let report = analyze(&trips, &config);

    assert_eq!(report.record_count, 9);

    // Seven trips have valid duration, distance and fare (a6 has a null fare,
    // a10 a null duration).
    assert_eq!(report.summary.valid_count, 7);
    let fare = report.summary.average_fare.unwrap();
    assert!((fare - 146.25 / 7.0).abs() < 1e-9);

    // a6's "Ghost Cab" never had a valid fare.
    assert!(!report.company_analysis.contains_key("Ghost Cab"));
    let sun = report.company_analysis.get("Sun Taxi").unwrap();
    assert_eq!(sun.trip_count, 3);
    assert_eq!(sun.total_fare, "41.75");
    assert!(sun.total_trip_duration.is_nan());

    assert_eq!(report.top_companies.criterion, RankCriterion::Top);
    assert_eq!(
        report.top_companies.ordered_keys,
        vec!["City Service", "Sun Taxi", "Taxi Affiliation Services", "Flash Cab"]
    );
    assert_eq!(report.bottom_companies.ordered_keys[0], "Flash Cab");

    let cash = report.payment_types.get("Cash").unwrap();
    assert_eq!(cash.trip_count, 4);
    assert!((cash.average_fare - (7.0 + 14.0 + 3.25) / 3.0).abs() < 1e-9);

    let fare_profile = report
        .field_profiles
        .iter()
        .find(|p| p.field_name == "fare")
        .unwrap();
    assert!(fare_profile.observed_types.contains(&TypeTag::Number));
    assert!(fare_profile.observed_types.contains(&TypeTag::String));
    assert_eq!(fare_profile.null_count, 1);

    // a6 (null fare) and a10 (null duration) drop out of the correlation.
    assert_eq!(report.correlation.row_count, 7);
    assert_eq!(report.correlation.rounded("fare", "fare"), Some(1.0));
    let r = report.correlation.get("trip_distance", "fare").unwrap();
    assert!(r > 0.9 && r <= 1.0);

    assert_eq!(report.distribution.trips_by_year.by_year.get(&2023), Some(&8));
    assert_eq!(report.distribution.trips_by_year.by_year.get(&2022), Some(&1));
    assert_eq!(report.distribution.payment_type_counts.get("Cash"), Some(&4));
}

#[test]
fn test_report_json_field_names() {
    let report = analyze(&sample_trips(), &EngineConfig::default());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["summary"]["totalCount"], 200_000);
    assert!(json["summary"]["averageDuration"].is_number());
    assert_eq!(json["companyAnalysis"]["Flash Cab"]["tripCount"], 3);
    assert_eq!(json["companyAnalysis"]["Flash Cab"]["totalFare"], "26.75");
    assert!(json["paymentTypes"]["Mobile"]["averageFare"].is_number());
    assert_eq!(json["topCompanies"]["criterion"], "top");
}
