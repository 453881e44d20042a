//! Lenient readers for feed values whose JSON type drifts between releases.
//!
//! The feed has shipped `Publish` as `true`, `"true"`, and `"\"true\""`,
//! coordinates as numbers and as numeric strings, and prices with and
//! without currency formatting. Each reader here accepts every observed
//! form and returns `None` (or `false`) for anything else.

use serde_json::{Map, Value};

/// Returns the first present, non-null value among `keys`.
pub fn field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|v| !v.is_null())
}

/// `true` for JSON `true` and for the strings `true` / `"true"` in any case.
#[must_use]
pub fn bool_like(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().trim_matches('"').eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// A finite number from a JSON number or a numeric string.
#[must_use]
pub fn number_like(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Like [`number_like`], but also strips `$`, `,`, and spaces from strings.
#[must_use]
pub fn price_like(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        other => number_like(Some(other)),
    }
}

/// A trimmed, non-empty string. Numbers are rendered without a trailing
/// `.0` so that a year of `2023` reads the same either way.
#[must_use]
pub fn string_like(value: Option<&Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n
            .as_i64()
            .map_or_else(|| n.to_string(), |i| i.to_string()),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bool_like_accepts_observed_publish_forms() {
        assert!(bool_like(Some(&json!(true))));
        assert!(bool_like(Some(&json!("true"))));
        assert!(bool_like(Some(&json!("\"true\""))));
        assert!(bool_like(Some(&json!(" TRUE "))));
    }

    #[test]
    fn bool_like_rejects_everything_else() {
        assert!(!bool_like(None));
        assert!(!bool_like(Some(&json!(false))));
        assert!(!bool_like(Some(&json!("false"))));
        assert!(!bool_like(Some(&json!("yes"))));
        assert!(!bool_like(Some(&json!(1))));
    }

    #[test]
    fn number_like_parses_numbers_and_numeric_strings() {
        assert_eq!(number_like(Some(&json!(41.5))), Some(41.5));
        assert_eq!(number_like(Some(&json!(" -93.7 "))), Some(-93.7));
        assert_eq!(number_like(Some(&json!("north"))), None);
        assert_eq!(number_like(Some(&json!("NaN"))), None);
        assert_eq!(number_like(Some(&json!(null))), None);
    }

    #[test]
    fn price_like_strips_currency_formatting() {
        assert_eq!(price_like(Some(&json!("$650,000"))), Some(650_000.0));
        assert_eq!(price_like(Some(&json!(650_000))), Some(650_000.0));
        assert_eq!(price_like(Some(&json!("call for price"))), None);
    }

    #[test]
    fn string_like_renders_integers_without_fraction() {
        assert_eq!(string_like(Some(&json!(2023))), Some("2023".to_string()));
        assert_eq!(string_like(Some(&json!(" 2021 "))), Some("2021".to_string()));
        assert_eq!(string_like(Some(&json!("   "))), None);
        assert_eq!(string_like(Some(&json!(true))), None);
    }

    #[test]
    fn field_skips_nulls_and_tries_aliases_in_order() {
        let record = json!({"Latitude": null, "lat": 41.2});
        let map = record.as_object().unwrap();
        assert_eq!(field(map, &["Latitude", "lat"]), Some(&json!(41.2)));
        assert_eq!(field(map, &["Longitude", "lng"]), None);
    }
}
