//! Lenient readers for loosely typed JSON request fields.

use serde_json::Value;

pub const DEFAULT_RECENT_LIMIT: i64 = 10;
pub const MAX_RECENT_LIMIT: i64 = 50;

/// Trimmed string, or `None` for non-strings and blank strings.
pub fn optional_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// A finite number, accepting numeric strings.
pub fn loose_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                text.parse::<f64>().ok()
            }
        }
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Truncated integer, kept only when strictly positive.
pub fn optional_positive_int(value: &Value) -> Option<i64> {
    let integer = loose_number(value)?.trunc();
    if integer >= 1.0 && integer <= i64::MAX as f64 {
        Some(integer as i64)
    } else {
        None
    }
}

/// Rounded star rating, kept only within 1..=5.
pub fn optional_rating(value: &Value) -> Option<i64> {
    let rounded = loose_number(value)?.round();
    (1.0..=5.0).contains(&rounded).then_some(rounded as i64)
}

/// `limit` query parameter: default 10, at most 50.
pub fn parse_limit(raw: Option<&str>) -> i64 {
    let Some(number) = raw.and_then(|raw| loose_number(&Value::String(raw.to_string()))) else {
        return DEFAULT_RECENT_LIMIT;
    };
    let integer = number.trunc();
    if integer < 1.0 {
        DEFAULT_RECENT_LIMIT
    } else if integer > MAX_RECENT_LIMIT as f64 {
        MAX_RECENT_LIMIT
    } else {
        integer as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_is_trimmed_and_blank_dropped() {
        assert_eq!(optional_text(&json!("  Vegan ")), Some("Vegan".to_string()));
        assert_eq!(optional_text(&json!("   ")), None);
        assert_eq!(optional_text(&json!(42)), None);
        assert_eq!(optional_text(&Value::Null), None);
    }

    #[test]
    fn positive_ints_accept_numeric_strings() {
        assert_eq!(optional_positive_int(&json!(7)), Some(7));
        assert_eq!(optional_positive_int(&json!("12")), Some(12));
        assert_eq!(optional_positive_int(&json!(" 4.9 ")), Some(4));
        assert_eq!(optional_positive_int(&json!(0)), None);
        assert_eq!(optional_positive_int(&json!(-3)), None);
        assert_eq!(optional_positive_int(&json!("")), None);
        assert_eq!(optional_positive_int(&json!("many")), None);
        assert_eq!(optional_positive_int(&json!(true)), None);
    }

    #[test]
    fn ratings_round_into_range() {
        assert_eq!(optional_rating(&json!(4.6)), Some(5));
        assert_eq!(optional_rating(&json!("3")), Some(3));
        assert_eq!(optional_rating(&json!(0.4)), None);
        assert_eq!(optional_rating(&json!(6)), None);
        assert_eq!(optional_rating(&Value::Null), None);
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(parse_limit(None), 10);
        assert_eq!(parse_limit(Some("")), 10);
        assert_eq!(parse_limit(Some("abc")), 10);
        assert_eq!(parse_limit(Some("0")), 10);
        assert_eq!(parse_limit(Some("5.8")), 5);
        assert_eq!(parse_limit(Some("500")), 50);
    }
}
