//! Numeric parsing contract and small arithmetic helpers shared by every
//! aggregate.
//!
//! Trip fields arrive as JSON numbers, numeric-looking strings, free text or
//! `null`. Every aggregate reads them through the functions below so that a
//! value is either a number or `f64::NAN`; callers decide with [`is_valid`]
//! whether a value takes part in arithmetic.

use serde_json::Value;

/// Parses a field the way a lenient float reader does: numbers pass through,
/// strings yield their longest leading decimal literal (`"2.5 mi"` → 2.5),
/// everything else is NaN.
pub fn parse_float(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_float_str(s),
        _ => f64::NAN,
    }
}

/// Parses a field as an integer: numbers are truncated toward zero, strings
/// yield their leading run of decimal digits (`"12.7"` → 12), everything
/// else is NaN.
pub fn parse_int(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(f64::trunc).unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_int_str(s),
        _ => f64::NAN,
    }
}

/// Strict whole-value numeric coercion.
///
/// Unlike [`parse_float`], trailing garbage makes the result NaN, while
/// `null`, empty strings and booleans coerce to numbers. Only the loader's
/// screening step uses this.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return 0.0;
            }
            if let Some(inf) = parse_infinity(s) {
                return inf;
            }
            match scan_decimal(s) {
                Some(len) if len == s.len() => s.parse().unwrap_or(f64::NAN),
                _ => f64::NAN,
            }
        }
        Some(_) => f64::NAN,
    }
}

/// A parsed value takes part in arithmetic only when it is finite.
pub fn is_valid(x: f64) -> bool {
    x.is_finite()
}

/// Stringifies a categorical field into a group key.
///
/// Missing fields and `null` get distinct keys (`"undefined"` and `"null"`)
/// so that they form their own groups instead of disappearing.
pub fn group_key(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(|f| f.to_string()).unwrap_or_default()
            }
        }
        Some(Value::Object(_)) => "[object Object]".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Mean of `values`, propagating NaN; an empty slice averages to 0.
pub fn mean(values: &[f64]) -> f64 {
    match values.len() {
        0 => 0.0,
        n => values.iter().sum::<f64>() / n as f64,
    }
}

/// Rounds to two decimal places, exact halves away from zero.
pub fn round2(x: f64) -> f64 {
    fixed2(x).parse().unwrap_or(x)
}

/// Formats with exactly two decimals.
///
/// Rounds the exact binary value, so `1.005` (stored just below the half)
/// gives `"1.00"` while a true half such as `0.125` goes away from zero to
/// `"0.13"`. NaN renders as `"NaN"` and infinities as `"Infinity"`.
pub fn fixed2(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let digits = if is_exact_half_cent(x.abs()) {
        // magnitude * 100 is exact here, so the ceiling is the tie rounded up
        let cents = (x.abs() * 100.0).ceil() as u64;
        format!("{}.{:02}", cents / 100, cents % 100)
    } else {
        format!("{:.2}", x.abs())
    };

    if x < 0.0 { format!("-{digits}") } else { digits }
}

/// True when `magnitude` lies exactly halfway between two cents.
///
/// Such values are odd multiples of 1/8. Beyond 1e13 the cent arithmetic in
/// [`fixed2`] is no longer exact, so those fall back to the formatter.
fn is_exact_half_cent(magnitude: f64) -> bool {
    let eighths = magnitude * 8.0;
    magnitude < 1e13 && eighths.fract() == 0.0 && eighths % 2.0 == 1.0
}

fn parse_float_str(s: &str) -> f64 {
    let s = s.trim_start();
    if let Some(inf) = parse_infinity_prefix(s) {
        return inf;
    }
    match scan_decimal(s) {
        Some(len) => s[..len].parse().unwrap_or(f64::NAN),
        None => f64::NAN,
    }
}

fn parse_int_str(s: &str) -> f64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut seen = false;
    let mut acc = 0.0f64;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        acc = acc * 10.0 + f64::from(b - b'0');
    }

    match (seen, negative) {
        (false, _) => f64::NAN,
        (true, true) => -acc,
        (true, false) => acc,
    }
}

fn parse_infinity(s: &str) -> Option<f64> {
    match s {
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

fn parse_infinity_prefix(s: &str) -> Option<f64> {
    if s.starts_with("Infinity") || s.starts_with("+Infinity") {
        Some(f64::INFINITY)
    } else if s.starts_with("-Infinity") {
        Some(f64::NEG_INFINITY)
    } else {
        None
    }
}

/// Length of the longest prefix of `s` matching
/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`.
fn scan_decimal(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            i = j;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    Some(i)
}
