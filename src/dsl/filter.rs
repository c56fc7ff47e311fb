//! Typed filter expressions.
//!
//! A [`FilterExpr`] is the parsed form of a flat filter mapping. Each entry
//! keeps its raw lookup key so serialization reproduces the stored JSON
//! byte-for-byte in key content and order, while validation and rendering
//! work on the decomposed parts.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::core::error::Result;
use crate::dsl::lookup::{parse_filter, FilterOp};

/// One lookup-key/value pair of a filter expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// The original lookup key, disambiguator included.
    pub raw: String,
    pub relation_path: Vec<String>,
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Condition {
    pub fn parse(raw: &str, value: Value) -> Result<Self> {
        let parsed = parse_filter(raw)?;
        Ok(Self {
            raw: raw.to_string(),
            relation_path: parsed.relation_path,
            field: parsed.field,
            op: parsed.op,
            value,
        })
    }

    /// Reverse-relation accessor keys are opaque to validation.
    pub fn is_reverse_accessor(&self) -> bool {
        self.raw.contains("_set")
    }
}

/// An ordered flat filter mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpr {
    pub conditions: Vec<Condition>,
}

impl FilterExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn get(&self, raw: &str) -> Option<&Value> {
        self.conditions
            .iter()
            .find(|c| c.raw == raw)
            .map(|c| &c.value)
    }

    /// Parse the raw JSON-object form. Non-object values are rejected.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Into::into)
    }

    pub fn insert(&mut self, raw: &str, value: Value) -> Result<()> {
        self.conditions.push(Condition::parse(raw, value)?);
        Ok(())
    }

    pub fn retain<F: FnMut(&Condition) -> bool>(&mut self, f: F) {
        self.conditions.retain(f);
    }
}

impl Serialize for FilterExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.conditions.len()))?;
        for condition in &self.conditions {
            map.serialize_entry(&condition.raw, &condition.value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FilterExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FilterVisitor;

        impl<'de> Visitor<'de> for FilterVisitor {
            type Value = FilterExpr;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a filter mapping of lookup keys to values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut conditions = Vec::new();
                while let Some((raw, value)) = access.next_entry::<String, Value>()? {
                    let condition =
                        Condition::parse(&raw, value).map_err(serde::de::Error::custom)?;
                    conditions.push(condition);
                }
                Ok(FilterExpr { conditions })
            }
        }

        deserializer.deserialize_map(FilterVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_preserves_keys_and_order() {
        let raw = json!({
            "gender": "female",
            "mood__gte": 500,
            "settlement__gold__lt": 200,
            "id__or": "_place_id",
            "id__or2": 7
        });
        let expr = FilterExpr::from_value(&raw).unwrap();
        assert_eq!(expr.conditions.len(), 5);
        assert_eq!(serde_json::to_value(&expr).unwrap(), raw);
    }

    #[test]
    fn test_decomposition() {
        let expr = FilterExpr::from_value(&json!({"settlement__gold__lt": 200})).unwrap();
        let condition = &expr.conditions[0];
        assert_eq!(condition.relation_path, vec!["settlement"]);
        assert_eq!(condition.field, "gold");
        assert_eq!(condition.op, FilterOp::Lt);
        assert_eq!(condition.value, json!(200));
    }

    #[test]
    fn test_reverse_accessor_flag() {
        let expr =
            FilterExpr::from_value(&json!({"place_owner_set__isnull": true, "mood": 500})).unwrap();
        assert!(expr.conditions[0].is_reverse_accessor());
        assert!(!expr.conditions[1].is_reverse_accessor());
    }
}
