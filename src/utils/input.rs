//! Normalization of raw user input
//!
//! Custom durations arrive as whatever the user typed. Anything that does not
//! start with an integer collapses to 1 minute; clamping to the valid range is
//! left to the timer engine.

use serde_json::Value;

/// Parse the leading integer of a raw string, `parseInt` style.
///
/// Leading whitespace is skipped, an optional sign and a run of digits are
/// read, and the rest is ignored. Returns 1 when no digits are found.
pub fn parse_minutes(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() {
        return 1;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Interpret a JSON value sent as a custom duration.
///
/// Numbers are truncated toward zero, strings go through [`parse_minutes`],
/// and anything else (null, bool, objects) collapses to 1.
pub fn minutes_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(1),
        Value::String(s) => parse_minutes(s),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plain_integers() {
        assert_eq!(parse_minutes("45"), 45);
        assert_eq!(parse_minutes("  7"), 7);
        assert_eq!(parse_minutes("+3"), 3);
    }

    #[test]
    fn keeps_sign_for_engine_clamping() {
        assert_eq!(parse_minutes("-5"), -5);
        assert_eq!(parse_minutes("0"), 0);
    }

    #[test]
    fn ignores_trailing_garbage() {
        assert_eq!(parse_minutes("2.5"), 2);
        assert_eq!(parse_minutes("12abc"), 12);
    }

    #[test]
    fn non_numeric_collapses_to_one() {
        assert_eq!(parse_minutes(""), 1);
        assert_eq!(parse_minutes("abc"), 1);
        assert_eq!(parse_minutes("-"), 1);
        assert_eq!(parse_minutes("   "), 1);
    }

    #[test]
    fn huge_values_saturate() {
        assert_eq!(parse_minutes("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn json_values_are_normalized() {
        assert_eq!(minutes_from_value(&json!(15)), 15);
        assert_eq!(minutes_from_value(&json!(2.9)), 2);
        assert_eq!(minutes_from_value(&json!("40")), 40);
        assert_eq!(minutes_from_value(&json!(null)), 1);
        assert_eq!(minutes_from_value(&json!(true)), 1);
    }
}
