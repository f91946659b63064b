//! FILENAME: crosstab-engine/src/format.rs
//! Display formatting for dimension values and aggregated sums.

use crate::definition::ScalarValue;

/// Formats a dimension value for display. Text passes through unchanged.
pub fn format_value(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Text(s) => s.clone(),
        ScalarValue::Number(n) => format_number(*n),
    }
}

/// Formats a number with the shortest representation that round-trips.
/// Integral values carry no fractional part (`3`, not `3.0`). Magnitudes of
/// `1e21` and above, or below `1e-6`, use exponent notation with an explicit
/// sign (`1e+21`, `1.5e-7`), so labels and path ids match the ones the web
/// host derives for the same values.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // Negative zero displays as zero.
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        return exponent_notation(n);
    }
    format!("{}", n)
}

/// `1e21` -> `1e+21`, `1.5e-7` -> `1.5e-7`.
fn exponent_notation(n: f64) -> String {
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}
