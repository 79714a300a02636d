// Utility helpers for parsing and grouping numbers.
//
// API payloads carry counts as JSON numbers, as plain strings and sometimes
// as strings with thousands separators. Everything numeric funnels through
// `parse_f64_safe` so the formatters and the trend builder agree on what
// "parseable" means.
use num_format::{CustomFormat, Grouping, ToFormattedString};
use once_cell::sync::Lazy;
use serde_json::Value;

/// Indian digit grouping (`12,34,567`), the grouping used for every
/// ungrouped number on screen.
static INDIAN: Lazy<CustomFormat> = Lazy::new(|| {
    CustomFormat::builder()
        .grouping(Grouping::Indian)
        .separator(",")
        .minus_sign("-")
        .build()
        .unwrap_or_default()
});

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in upstream exports (commas, spaces).
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters other than the
///   exponent marker, so `"1e5"` parses while `"inf"` and `"NaN"` do not.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric view of a raw JSON value: numbers as-is, strings via
/// [`parse_f64_safe`], everything else `None`.
pub fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_f64_safe(Some(s)),
        _ => None,
    }
}

/// Display text of a raw JSON value without quoting strings.
pub fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Round to `digits` fraction digits with ties going away from zero
/// (`1.25` to one digit is `1.3`). Plain `{:.N}` formatting rounds ties to
/// even, so every display path rounds through here first.
pub fn round_half_away(n: f64, digits: i32) -> f64 {
    // Above 2^53 every f64 is already an integer.
    if !n.is_finite() || n.abs() >= 9_007_199_254_740_992.0 {
        return n;
    }
    let scale = 10f64.powi(digits);
    (n * scale).round() / scale
}

/// Render `n` the way an en-IN locale renders a plain number: Indian digit
/// grouping, at most three fraction digits, trailing zeros dropped.
pub fn group_indian(n: f64) -> String {
    let neg = n < 0.0;
    let s = format!("{:.3}", round_half_away(n.abs(), 3));
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), ""));
    // Past u128 the digits are printed ungrouped rather than lost.
    let mut res = match int_part.parse::<u128>() {
        Ok(v) => v.to_formatted_string(&*INDIAN),
        Err(_) => int_part.to_string(),
    };
    let frac = frac_part.trim_end_matches('0');
    if !frac.is_empty() {
        res.push('.');
        res.push_str(frac);
    }
    // -0.0004 rounds to zero; do not print "-0".
    if neg && res != "0" {
        format!("-{}", res)
    } else {
        res
    }
}

/// Integer rendering with Indian grouping, used for counts in messages.
pub fn format_int(n: i64) -> String {
    n.to_formatted_string(&*INDIAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("1500", Some(1500.0))]
    #[case(" 1,23,456 ", Some(123456.0))]
    #[case("12.5", Some(12.5))]
    #[case("-40", Some(-40.0))]
    #[case("", None)]
    #[case("n/a", None)]
    #[case("inf", None)]
    #[case("1.2.3", None)]
    #[case("1e5", Some(100000.0))]
    #[case("2.5E3", Some(2500.0))]
    #[case("NaN", None)]
    #[case("1e400", None)]
    #[case("e", None)]
    fn parses_forgiving_numbers(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_f64_safe(Some(input)), expected);
    }

    #[test]
    fn numeric_view_of_json() {
        assert_eq!(value_as_f64(&json!(42)), Some(42.0));
        assert_eq!(value_as_f64(&json!("4,200")), Some(4200.0));
        assert_eq!(value_as_f64(&json!(true)), None);
        assert_eq!(value_as_f64(&Value::Null), None);
    }

    #[rstest]
    #[case(500.0, "500")]
    #[case(0.0, "0")]
    #[case(999.5, "999.5")]
    #[case(12.3456, "12.346")]
    #[case(1234567.0, "12,34,567")]
    #[case(-250000.0, "-2,50,000")]
    #[case(-0.0001, "0")]
    #[case(0.0005, "0.001")]
    #[case(1e20, "10,00,00,00,00,00,00,00,00,000")]
    #[case(-1e20, "-10,00,00,00,00,00,00,00,00,000")]
    fn groups_the_indian_way(#[case] n: f64, #[case] expected: &str) {
        assert_eq!(group_indian(n), expected);
    }

    #[test]
    fn grouping_beyond_u128_keeps_every_digit() {
        let out = group_indian(1e40);
        assert!(out.starts_with("1000000000000000"), "{}", out);
        assert_eq!(out.len(), 41);
    }

    #[rstest]
    #[case(1.25, 1, 1.3)]
    #[case(1.125, 2, 1.13)]
    #[case(-2.25, 1, -2.3)]
    #[case(1.005, 2, 1.0)]
    fn ties_round_away_from_zero(#[case] n: f64, #[case] digits: i32, #[case] expected: f64) {
        assert_eq!(round_half_away(n, digits), expected);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[100.0, 300.0]), 200.0);
    }
}
