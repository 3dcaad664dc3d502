use chrono::{Local, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Number, Value};

/// Fractional digits for money and PNL values.
pub const PNL_DIGITS: u32 = 4;
/// Fractional digits for strategy confidence.
pub const CONFIDENCE_DIGITS: u32 = 2;

const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Text of a raw JSON value as it appears in a table cell.
///
/// Numbers keep their shortest representation (`65000`, `0.01`), strings are
/// shown verbatim and `null` is blank.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(|f| f.to_string()).unwrap_or_default()
    }
}

/// Numeric coercion of a JSON value. Numeric strings are accepted, anything
/// that does not yield a finite number is `None`.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    n.filter(|f| f.is_finite())
}

/// Falsy values are `null`, `false`, `0`, `NaN` and the empty string.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Formats `value` with exactly `digits` fractional digits, rounding half away
/// from zero on the exact binary value (`1.2` -> `1.2000`, `-0.333333` -> `-0.3333`).
pub fn fixed(value: f64, digits: u32) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut rounded = exact.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(digits);
            rounded.to_string()
        }
        None => format!("{:.*}", digits as usize, value),
    }
}

/// Local time of day for a unix timestamp in (possibly fractional) seconds.
pub fn clock_time(epoch_seconds: f64) -> Option<String> {
    if !epoch_seconds.is_finite() {
        return None;
    }
    let whole = epoch_seconds.floor();
    let nanos = ((epoch_seconds - whole) * 1e9).min(999_999_999.0) as u32;
    Local
        .timestamp_opt(whole as i64, nanos)
        .single()
        .map(|t| t.format(CLOCK_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_pnl_digits() {
        assert_eq!(fixed(1.2, PNL_DIGITS), "1.2000");
        assert_eq!(fixed(-0.333333, PNL_DIGITS), "-0.3333");
        assert_eq!(fixed(12.5, PNL_DIGITS), "12.5000");
        assert_eq!(fixed(0.0, PNL_DIGITS), "0.0000");
        assert_eq!(fixed(65000.0, PNL_DIGITS), "65000.0000");
    }

    #[test]
    fn test_fixed_confidence_digits() {
        assert_eq!(fixed(0.876, CONFIDENCE_DIGITS), "0.88");
        assert_eq!(fixed(1.0, CONFIDENCE_DIGITS), "1.00");
        assert_eq!(fixed(0.125, CONFIDENCE_DIGITS), "0.13");
    }

    #[test]
    fn test_fixed_rounds_on_binary_value() {
        // 1.005 is stored as 1.00499999...
        assert_eq!(fixed(1.005, 2), "1.00");
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!(65000)), "65000");
        assert_eq!(display_value(&json!(65000.0)), "65000");
        assert_eq!(display_value(&json!(0.01)), "0.01");
        assert_eq!(display_value(&json!("long")), "long");
        assert_eq!(display_value(&json!(null)), "");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn test_as_number() {
        assert_eq!(as_number(&json!(1.5)), Some(1.5));
        assert_eq!(as_number(&json!(" 2.25 ")), Some(2.25));
        assert_eq!(as_number(&json!("abc")), None);
        assert_eq!(as_number(&json!("")), None);
        assert_eq!(as_number(&json!("NaN")), None);
        assert_eq!(as_number(&json!({"a": 1})), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!(2)));
        assert!(is_truthy(&json!("running")));
    }

    #[test]
    fn test_clock_time_shape() {
        let text = clock_time(1_700_000_000.75).unwrap();
        assert_eq!(text.len(), 8);
        assert_eq!(text.matches(':').count(), 2);
        assert!(clock_time(f64::NAN).is_none());
    }
}
