//! Pairwise Pearson correlation over numeric trip fields.

use tracing::debug;

use crate::analyzers::types::CorrelationMatrix;
use crate::analyzers::utility::{is_valid, parse_float, parse_int, round2};
use crate::parser::TripRecord;

/// How a column is read before it takes part in the correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Int,
    Float,
}

/// A named numeric projection of one source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericField {
    pub name: &'static str,
    pub column: &'static str,
    pub mode: ParseMode,
}

impl NumericField {
    pub const fn new(name: &'static str, column: &'static str, mode: ParseMode) -> Self {
        Self { name, column, mode }
    }

    fn read(&self, record: &TripRecord) -> f64 {
        let value = record.get(self.column);
        match self.mode {
            ParseMode::Int => parse_int(value),
            ParseMode::Float => parse_float(value),
        }
    }
}

/// Fields correlated in the default report.
pub static DEFAULT_FIELDS: &[NumericField] = &[
    NumericField::new("trip_duration", "trip_seconds", ParseMode::Int),
    NumericField::new("trip_distance", "trip_miles", ParseMode::Float),
    NumericField::new("fare", "fare", ParseMode::Float),
    NumericField::new("tips", "tips", ParseMode::Float),
    NumericField::new("tolls", "tolls", ParseMode::Float),
    NumericField::new("extras", "extras", ParseMode::Float),
];

/// Looks up a default field by its name (`fare`) or its source column
/// (`trip_seconds`).
pub fn field_by_name(name: &str) -> Option<NumericField> {
    DEFAULT_FIELDS
        .iter()
        .find(|f| f.name == name || f.column == name)
        .copied()
}

/// Computes the Pearson correlation matrix over `fields`.
///
/// A record takes part only if every requested field is valid, so all cells
/// share one row set. When no record survives the matrix is empty. The upper
/// triangle is computed and mirrored.
pub fn correlation_matrix(records: &[TripRecord], fields: &[NumericField]) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = {
        let mut columns = vec![Vec::new(); fields.len()];
        for r in records {
            let row: Vec<f64> = fields.iter().map(|f| f.read(r)).collect();
            if row.iter().all(|v| is_valid(*v)) {
                for (col, v) in columns.iter_mut().zip(row) {
                    col.push(v);
                }
            }
        }
        columns
    };

    let row_count = columns.first().map_or(0, Vec::len);
    debug!(
        fields = fields.len(),
        rows = row_count,
        dropped = records.len() - row_count,
        "Computing correlation matrix"
    );

    if row_count == 0 {
        return CorrelationMatrix {
            fields: Vec::new(),
            row_count: 0,
            values: Vec::new(),
        };
    }

    let k = fields.len();
    let mut values = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        for j in i..k {
            let r = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        fields: fields.iter().map(|f| f.name.to_string()).collect(),
        row_count,
        values,
    }
}

/// Pearson correlation coefficient of two equal-length series.
///
/// Returns NaN when the series are empty or either has zero variance.
/// Rounding noise past ±1 is clamped.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return f64::NAN;
    }

    let (x, y) = (&x[..n], &y[..n]);
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let n = n as f64;
    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 {
        return f64::NAN;
    }

    (numerator / denominator).clamp(-1.0, 1.0)
}

impl CorrelationMatrix {
    fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// Full-precision coefficient for `(a, b)`; `None` if either field is
    /// unknown or the coefficient is undefined.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let (i, j) = (self.position(a)?, self.position(b)?);
        let r = self.values[i][j];
        (!r.is_nan()).then_some(r)
    }

    /// Coefficient rounded to two decimals for display.
    pub fn rounded(&self, a: &str, b: &str) -> Option<f64> {
        self.get(a, b).map(round2)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
