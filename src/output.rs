//! Output formatting and persistence for trip reports.
//!
//! Supports log rendering, JSON files (optionally gzip-compressed), and CSV
//! point files.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::TripReport;
use crate::analyzers::utility::fixed2;
use csv::WriterBuilder;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &TripReport) {
    debug!("{:#?}", report);
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs the headline numbers of a report the way they are displayed:
/// two decimals, absent averages omitted.
pub fn print_summary(report: &TripReport) {
    let s = &report.summary;
    info!(total_trips = s.total_count, valid_trips = s.valid_count, "Summary");
    for (label, value) in [
        ("Average trip duration (seconds)", s.average_duration),
        ("Average trip distance (miles)", s.average_distance),
        ("Average fare ($)", s.average_fare),
    ] {
        if let Some(v) = value {
            info!("{label}: {}", fixed2(v));
        }
    }
}

/// Writes `value` as pretty JSON to `path`, gzip-compressed when `gzip` is set.
pub fn write_json(path: &str, value: &impl Serialize, gzip: bool) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    let file = File::create(path).with_context(|| format!("Failed to create '{path}'"))?;
    let mut writer = BufWriter::new(file);

    if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&body)?;
        writer.write_all(&encoder.finish()?)?;
    } else {
        writer.write_all(&body)?;
    }
    writer.flush()?;

    debug!(path, gzip, bytes = body.len(), "Wrote JSON output");
    Ok(())
}

/// Writes serializable rows to a CSV file at `path`, header first.
///
/// Undefined numbers are written as `NaN`.
pub fn write_points<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create '{path}'"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path, rows = rows.len(), "Wrote CSV output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::analyzer::analyze;
    use crate::analyzers::types::DistributionPoint;
    use crate::config::EngineConfig;
    use flate2::read::GzDecoder;
    use std::env;
    use std::fs;
    use std::io::Read;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        let report = analyze(&[], &EngineConfig::default());
        print_pretty(&report);
        print_summary(&report);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let report = analyze(&[], &EngineConfig::default());
        print_json(&report).unwrap();
    }

    #[test]
    fn test_write_json_plain() {
        let path = temp_path("trip_analytics_test_report.json");
        let _ = fs::remove_file(&path);

        let report = analyze(&[], &EngineConfig::default());
        write_json(&path, &report, false).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["recordCount"], 0);
        assert_eq!(json["summary"]["totalCount"], 200_000);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_gzip() {
        let path = temp_path("trip_analytics_test_report.json.gz");
        let _ = fs::remove_file(&path);

        write_json(&path, &serde_json::json!({"fare": 1.5}), true).unwrap();

        let mut decoded = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(json["fare"], 1.5);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_points_header_and_rows() {
        let path = temp_path("trip_analytics_test_points.csv");
        let _ = fs::remove_file(&path);

        let rows = vec![
            DistributionPoint {
                trip_duration: 600.0,
                fare: 10.0,
                trip_distance: 2.5,
            },
            DistributionPoint {
                trip_duration: 60.0,
                fare: f64::NAN,
                trip_distance: 0.4,
            },
        ];
        write_points(&path, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "trip_duration,fare,trip_distance");
        assert!(lines[2].contains("NaN"));

        fs::remove_file(&path).unwrap();
    }
}
