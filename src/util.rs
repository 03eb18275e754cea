// Parsing, descriptive-statistic and formatting helpers.
//
// Numeric coercion lives here so loader and normalizer agree on what a
// number looks like, and the stats stages share one mean/median/std.
use crate::table::Value;
use num_format::{Locale, ToFormattedString};

/// Classify one raw field from a delimited source.
///
/// - Trimmed text equal to a missing marker (or empty) is `Missing`.
/// - Trimmed text that parses as a non-NaN `f64` is `Number`.
/// - Anything else is kept verbatim as `Text`.
pub fn parse_cell(raw: &str, missing_markers: &[String]) -> Value {
    let s = raw.trim();
    if s.is_empty() || missing_markers.iter().any(|m| m == s) {
        return Value::Missing;
    }
    match s.parse::<f64>() {
        Ok(v) if !v.is_nan() => Value::Number(v),
        _ => Value::Text(raw.to_string()),
    }
}

/// Numeric coercion for text that should have been a number.
///
/// Trims whitespace and parses what is left as a plain `f64`. Text with
/// thousands separators, units or other decoration (`"1,000"`, `"12km"`) is
/// not a number and gives `None`, as does `NaN`.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Coerce a cell to a number: numbers pass through, text goes through
/// [`parse_f64_safe`], missing stays missing.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Missing => None,
        Value::Number(v) => Some(*v),
        Value::Text(s) => parse_f64_safe(Some(s)),
    }
}

pub fn average(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

/// Median of the values. Takes the vector by value so it can sort in place.
pub fn median(mut v: Vec<f64>) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    v.sort_by(f64::total_cmp);
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        Some(v[mid])
    } else {
        Some((v[mid - 1] + v[mid]) / 2.0)
    }
}

/// Sample standard deviation (n - 1 denominator); 0 for fewer than two values.
pub fn sample_std_dev(v: &[f64]) -> f64 {
    if v.len() < 2 {
        return 0.0;
    }
    let mean = v.iter().sum::<f64>() / v.len() as f64;
    let sq: f64 = v.iter().map(|x| (x - mean).powi(2)).sum();
    (sq / (v.len() - 1) as f64).sqrt()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale thousands separators, e.g. `1,234,567.89`.
    if !n.is_finite() {
        return n.to_string();
    }
    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let mut res = group_digits(int_part);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    // `-0.00` reads oddly in a report
    if n.is_sign_negative() && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

/// Insert the locale separator every three digits from the right.
fn group_digits(digits: &str) -> String {
    let sep = Locale::en.separator();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console messages, e.g. `20,433 rows loaded`.
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        vec!["".to_string(), "NA".to_string()]
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(" 42.5 ", &markers()), Value::Number(42.5));
        assert_eq!(parse_cell("NA", &markers()), Value::Missing);
        assert_eq!(parse_cell("   ", &markers()), Value::Missing);
        assert_eq!(parse_cell("NaN", &markers()), Value::text("NaN"));
        assert_eq!(parse_cell("NEAR BAY", &markers()), Value::text("NEAR BAY"));
    }

    #[test]
    fn test_parse_f64_safe() {
        assert_eq!(parse_f64_safe(Some("  7 ")), Some(7.0));
        assert_eq!(parse_f64_safe(Some("1.5e3")), Some(1500.0));
        assert_eq!(parse_f64_safe(Some("12,500.5")), None);
        assert_eq!(parse_f64_safe(Some("12km")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn test_coerce_f64() {
        assert_eq!(coerce_f64(&Value::Number(3.0)), Some(3.0));
        assert_eq!(coerce_f64(&Value::text(" 1000 ")), Some(1000.0));
        assert_eq!(coerce_f64(&Value::text("1,000")), None);
        assert_eq!(coerce_f64(&Value::text("far")), None);
        assert_eq!(coerce_f64(&Value::Missing), None);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(vec![]), None);
    }

    #[test]
    fn test_sample_std_dev() {
        assert_eq!(sample_std_dev(&[5.0]), 0.0);
        let sd = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((sd - 2.138089935299395).abs() < 1e-12);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1500.0, 0), "-1,500");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_int(20433usize), "20,433");
    }

    #[test]
    fn test_format_number_beyond_u64() {
        assert_eq!(format_number(2e19, 0), "20,000,000,000,000,000,000");
        assert_eq!(format_number(-2e19, 1), "-20,000,000,000,000,000,000.0");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1000.0, 0), "1,000");
    }
}
