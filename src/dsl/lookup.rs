//! Lookup key decomposition.
//!
//! A lookup key has the shape `[relation__]*field[__op][__orN]`: zero or
//! more relation segments, a field name, an optional comparison operator
//! and an optional `__or` disambiguator. The disambiguator only keeps keys
//! unique inside one flat mapping; the runtime groups such conditions into
//! OR-clauses and this side never interprets the suffix shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{ForgeError, Result};

/// Comparison operator of one filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Exact,
    Ne,
    Gte,
    Gt,
    Lte,
    Lt,
    In,
    Nin,
    IsNull,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Exact => "exact",
            FilterOp::Ne => "ne",
            FilterOp::Gte => "gte",
            FilterOp::Gt => "gt",
            FilterOp::Lte => "lte",
            FilterOp::Lt => "lt",
            FilterOp::In => "in",
            FilterOp::Nin => "nin",
            FilterOp::IsNull => "isnull",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "exact" => FilterOp::Exact,
            "ne" => FilterOp::Ne,
            "gte" => FilterOp::Gte,
            "gt" => FilterOp::Gt,
            "lte" => FilterOp::Lte,
            "lt" => FilterOp::Lt,
            "in" => FilterOp::In,
            "nin" => FilterOp::Nin,
            "isnull" => FilterOp::IsNull,
            _ => return None,
        })
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decomposed form of one lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLookup {
    pub relation_path: Vec<String>,
    pub field: String,
    pub op: FilterOp,
}

/// `or`, optionally followed by a digit, a letter and a digit.
fn is_or_suffix(segment: &str) -> bool {
    let Some(rest) = segment.strip_prefix("or") else {
        return false;
    };
    let bytes = rest.as_bytes();
    let mut i = 0;
    if i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i].is_ascii_lowercase() {
        i += 1;
    }
    if i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i == bytes.len()
}

/// Decompose a lookup key into relation path, field name and operator.
///
/// The trailing `__or` disambiguator, when present, is stripped before
/// splitting. An operator segment may appear anywhere among the segments;
/// the first match wins and `exact` is assumed when none is present.
pub fn parse_filter(key: &str) -> Result<ParsedLookup> {
    let cleared = match key.rsplit_once("__") {
        Some((head, tail)) if is_or_suffix(tail) => head,
        _ => key,
    };

    let mut segments: Vec<&str> = cleared.split("__").collect();
    let mut op = FilterOp::Exact;
    if let Some(pos) = segments.iter().position(|s| FilterOp::parse(s).is_some()) {
        if let Some(found) = FilterOp::parse(segments[pos]) {
            op = found;
        }
        segments.remove(pos);
    }

    let Some(field) = segments.pop().filter(|s| !s.is_empty()) else {
        return Err(ForgeError::validation(format!(
            "lookup key has no field name: \"{key}\""
        )));
    };

    Ok(ParsedLookup {
        relation_path: segments.into_iter().map(str::to_string).collect(),
        field: field.to_string(),
        op,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_field() {
        let parsed = parse_filter("safety").unwrap();
        assert!(parsed.relation_path.is_empty());
        assert_eq!(parsed.field, "safety");
        assert_eq!(parsed.op, FilterOp::Exact);
    }

    #[test]
    fn test_relation_field_op() {
        let parsed = parse_filter("settlement__gold__lt").unwrap();
        assert_eq!(parsed.relation_path, vec!["settlement"]);
        assert_eq!(parsed.field, "gold");
        assert_eq!(parsed.op, FilterOp::Lt);
    }

    #[test]
    fn test_or_suffix_shapes_stripped() {
        for key in ["safety__gt__or", "safety__gt__or3", "safety__gt__ora", "safety__gt__or3a7"] {
            let parsed = parse_filter(key).unwrap();
            assert_eq!(parsed.field, "safety", "key: {key}");
            assert_eq!(parsed.op, FilterOp::Gt, "key: {key}");
        }
    }

    #[test]
    fn test_non_suffix_or_kept() {
        // "or" not in suffix position stays a normal segment
        let parsed = parse_filter("orchard__id").unwrap();
        assert_eq!(parsed.relation_path, vec!["orchard"]);
        assert_eq!(parsed.field, "id");
    }

    #[test]
    fn test_or_with_trailing_garbage_kept() {
        let parsed = parse_filter("field__order").unwrap();
        assert_eq!(parsed.relation_path, vec!["field"]);
        assert_eq!(parsed.field, "order");
    }

    #[test]
    fn test_isnull_operator() {
        let parsed = parse_filter("settlement__isnull").unwrap();
        assert!(parsed.relation_path.is_empty());
        assert_eq!(parsed.field, "settlement");
        assert_eq!(parsed.op, FilterOp::IsNull);
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(parse_filter("").is_err());
        assert!(parse_filter("gte").is_err());
    }

    proptest::proptest! {
        #[test]
        fn test_parse_recovers_components(
            relation in proptest::sample::select(vec!["settlement", "place", "position", "faction"]),
            field in proptest::sample::select(vec!["gold", "safety", "mood", "title"]),
            op in proptest::sample::select(vec!["ne", "gte", "gt", "lte", "lt", "in", "nin"]),
            or_n in proptest::option::of(0u8..10),
        ) {
            let mut key = format!("{relation}__{field}__{op}");
            if let Some(n) = or_n {
                key.push_str(&format!("__or{n}"));
            }
            let parsed = parse_filter(&key).unwrap();
            proptest::prop_assert_eq!(parsed.relation_path, vec![relation.to_string()]);
            proptest::prop_assert_eq!(parsed.field, field);
            proptest::prop_assert_eq!(parsed.op, FilterOp::parse(op).unwrap());
        }
    }
}
