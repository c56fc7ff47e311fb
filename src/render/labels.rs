//! Qualitative labels and filter value display.

use serde_json::Value;

/// Ten-bucket label table for attributes on the 100-1000 scale.
pub const LABEL_BUCKETS: [(i64, &str); 10] = [
    (100, "min"),
    (200, "lowest"),
    (300, "low"),
    (400, "below_average"),
    (500, "average"),
    (600, "above_average"),
    (700, "high"),
    (800, "very_high"),
    (900, "highest"),
    (1000, "max"),
];

/// Largest bucket whose threshold does not exceed `value`; `None` below
/// the scale.
pub fn attr_label(value: i64) -> Option<&'static str> {
    let mut label = None;
    for (threshold, name) in LABEL_BUCKETS {
        if value >= threshold {
            label = Some(name);
        } else {
            break;
        }
    }
    label
}

/// Sentinels the runtime substitutes with the current context's ids.
const CURRENT_SENTINELS: [&str; 5] = ["_id", "_settlement_id", "_place_id", "_faction_id", "_position_id"];

const SECOND_CHAR_PREFIX: &str = "_second_char";

/// Display form of one string filter value.
///
/// Context-id sentinels read as `current`, optionally scoped to the
/// second character; anything else passes through unchanged.
pub fn replace_value(value: &str) -> String {
    if let Some(rest) = value.strip_prefix(SECOND_CHAR_PREFIX) {
        if CURRENT_SENTINELS.contains(&rest) {
            return "second_char_current".to_string();
        }
    }
    if CURRENT_SENTINELS.contains(&value) {
        return "current".to_string();
    }
    value.to_string()
}

fn plain(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Display form of an arbitrary filter value: sentinel replacement for
/// strings, `_`-joined elements for lists, `key_value` pairs for mappings.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => replace_value(s),
        Value::Array(items) => items
            .iter()
            .map(plain)
            .collect::<Vec<_>>()
            .join("_"),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}_{}", replace_value(s)),
                other => format!("{k}_{}", plain(other)),
            })
            .collect::<Vec<_>>()
            .join("_"),
        other => plain(other),
    }
}

/// Display form of one place-filter condition. Keys addressing the place
/// id read as `place`; path separators flatten to single underscores.
pub fn place_filter_desc(key: &str, value: &Value) -> String {
    let key_part = if key.starts_with("id") {
        "place".to_string()
    } else {
        key.replace("__", "_")
    };
    format!("{key_part}_{}", display_value(value)).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attr_label_buckets() {
        assert_eq!(attr_label(500), Some("average"));
        assert_eq!(attr_label(1000), Some("max"));
        assert_eq!(attr_label(550), Some("average"));
        assert_eq!(attr_label(100), Some("min"));
        assert_eq!(attr_label(99), None);
        assert_eq!(attr_label(5000), Some("max"));
    }

    #[test]
    fn test_replace_sentinels() {
        assert_eq!(replace_value("_place_id"), "current");
        assert_eq!(replace_value("_second_char_faction_id"), "second_char_current");
        assert_eq!(replace_value("_second_char_unknown"), "_second_char_unknown");
        assert_eq!(replace_value("soldier"), "soldier");
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(display_value(&Value::Null), "null");
        assert_eq!(display_value(&json!(["a", "b", 3])), "a_b_3");
        assert_eq!(display_value(&json!({"beauty": "_id", "n": 2})), "beauty_current_n_2");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn test_place_filter_desc() {
        assert_eq!(place_filter_desc("id__or", &json!("_place_id")), "place_current");
        assert_eq!(place_filter_desc("safety__gte", &json!(500)), "safety_gte_500");
    }
}
