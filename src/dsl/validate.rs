//! Schema validation of filter and modifier expressions.
//!
//! Every attribute name an expression references must resolve against the
//! owning entity's [`FieldSchema`]; relations must be addressed either as
//! a path head or through their raw id column, never by bare name. Strict
//! mode additionally checks integer literals against declared bounds.

use serde_json::Value;

use crate::core::error::{ForgeError, Result};
use crate::dsl::filter::FilterExpr;
use crate::dsl::modifier::{CharacterModifierExpr, ModifierBranch, ModifierExpr};
use crate::schema::FieldSchema;

/// Keys allowed in a need-modifier mapping.
pub const NEED_FIELDS: [&str; 4] = ["energy", "sleep", "mood", "health"];

/// Field names tolerated in filters even though no schema declares them.
const ALWAYS_EXCLUDED: [&str; 1] = ["relationship"];

/// Validate every condition of a flat filter expression against `schema`.
///
/// Reverse-accessor keys (`_set`) are skipped. A non-empty relation path
/// only has its head checked; nested segments belong to other schemas and
/// are resolved by the runtime. With `strict`, non-zero integer values
/// must fall inside declared `[min, max]` bounds when both are present.
pub fn validate_filter_fields(
    expr: &FilterExpr,
    schema: &FieldSchema,
    strict: bool,
    exclude: &[&str],
) -> Result<()> {
    for condition in &expr.conditions {
        if condition.is_reverse_accessor() {
            continue;
        }
        if let Some(relation) = condition.relation_path.first() {
            let Some(info) = schema.get(relation) else {
                return Err(ForgeError::validation(format!(
                    "relation not found: \"{relation}\""
                )));
            };
            if !info.is_model {
                return Err(ForgeError::validation(format!(
                    "relation is not a model: \"{relation}\""
                )));
            }
            continue;
        }

        let field = condition.field.as_str();
        let Some(info) = schema.get(field) else {
            if ALWAYS_EXCLUDED.contains(&field) || exclude.contains(&field) {
                continue;
            }
            return Err(ForgeError::validation(format!(
                "field not found: \"{field}\""
            )));
        };
        if info.is_model {
            return Err(ForgeError::validation(format!(
                "field is a model: \"{field}\", use \"{field}_id\""
            )));
        }

        if strict {
            let Some(v) = condition.value.as_i64().filter(|v| *v != 0) else {
                continue;
            };
            if let (Some(min), Some(max)) = (info.min, info.max) {
                if (v as f64) < min {
                    return Err(ForgeError::validation(format!(
                        "\"{field}\" must be at least {min}"
                    )));
                }
                if (v as f64) > max {
                    return Err(ForgeError::validation(format!(
                        "\"{field}\" must be at most {max}"
                    )));
                }
            }
        }
    }
    Ok(())
}

fn check_branch_fields(branch: &ModifierBranch, schema: &FieldSchema) -> Result<()> {
    for field in branch.referenced_fields() {
        // reverse accessors stay opaque here too
        if field.contains("_set") {
            continue;
        }
        let Some(info) = schema.get(field) else {
            if ALWAYS_EXCLUDED.contains(&field) {
                continue;
            }
            return Err(ForgeError::validation(format!(
                "field not found: \"{field}\""
            )));
        };
        if info.is_model {
            return Err(ForgeError::validation(format!(
                "field is a model: \"{field}\", use \"{field}_id\""
            )));
        }
    }
    Ok(())
}

/// Validate a sign-branched modifier's referenced fields (never strict).
pub fn validate_modifiers(expr: &ModifierExpr, schema: &FieldSchema) -> Result<()> {
    for branch in [&expr.positive, &expr.negative].into_iter().flatten() {
        check_branch_fields(branch, schema)?;
    }
    Ok(())
}

/// Validate a character modifier, descending through own/other.
pub fn validate_character_modifiers(
    expr: &CharacterModifierExpr,
    schema: &FieldSchema,
) -> Result<()> {
    for sides in [&expr.positive, &expr.negative].into_iter().flatten() {
        for branch in [&sides.own, &sides.other].into_iter().flatten() {
            check_branch_fields(branch, schema)?;
        }
    }
    Ok(())
}

/// Check that a flat mapping's keys form a subset of `allowed`, reporting
/// every offending key at once.
pub fn check_keys(data: &serde_json::Map<String, Value>, allowed: &[&str]) -> Result<()> {
    let mut wrong: Vec<&str> = data
        .keys()
        .map(String::as_str)
        .filter(|k| !allowed.contains(k))
        .collect();
    if wrong.is_empty() {
        return Ok(());
    }
    wrong.sort_unstable();
    Err(ForgeError::validation(format!(
        "wrong keys: {wrong:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::registry::schemas;
    use serde_json::json;

    fn filters(raw: Value) -> FilterExpr {
        FilterExpr::from_value(&raw).unwrap()
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = validate_filter_fields(
            &filters(json!({"unknown_field": 1})),
            &schemas().character,
            false,
            &[],
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown_field"));
    }

    #[test]
    fn test_bare_relation_rejected_id_column_accepted() {
        let schema = &schemas().character;
        assert!(validate_filter_fields(&filters(json!({"place": 5})), schema, false, &[]).is_err());
        assert!(
            validate_filter_fields(&filters(json!({"place_id": 5})), schema, false, &[]).is_ok()
        );
    }

    #[test]
    fn test_relation_path_head_checked() {
        let schema = &schemas().character;
        assert!(validate_filter_fields(
            &filters(json!({"settlement__gold__lt": 200})),
            schema,
            false,
            &[]
        )
        .is_ok());
        assert!(validate_filter_fields(
            &filters(json!({"nowhere__gold": 200})),
            schema,
            false,
            &[]
        )
        .is_err());
        // path head addressing a scalar is not a relation
        assert!(validate_filter_fields(
            &filters(json!({"mood__gold": 200})),
            schema,
            false,
            &[]
        )
        .is_err());
    }

    #[test]
    fn test_strict_bounds_inclusive() {
        let schema = &schemas().character;
        for v in [100, 1000] {
            assert!(
                validate_filter_fields(&filters(json!({"mood": v})), schema, true, &[]).is_ok()
            );
        }
        for v in [99, 1001] {
            assert!(
                validate_filter_fields(&filters(json!({"mood": v})), schema, true, &[]).is_err()
            );
        }
    }

    #[test]
    fn test_strict_ignores_non_integers_and_zero() {
        let schema = &schemas().character;
        let expr = filters(json!({"mood": 0, "gender": "female", "mood__gte": 50.5}));
        assert!(validate_filter_fields(&expr, schema, true, &[]).is_ok());
    }

    #[test]
    fn test_non_strict_ignores_ranges() {
        let schema = &schemas().character;
        assert!(
            validate_filter_fields(&filters(json!({"mood": 5000})), schema, false, &[]).is_ok()
        );
    }

    #[test]
    fn test_reverse_accessor_skipped() {
        let schema = &schemas().character;
        let expr = filters(json!({"place_owner_set__isnull": true}));
        assert!(validate_filter_fields(&expr, schema, false, &[]).is_ok());
    }

    #[test]
    fn test_exclude_list() {
        let schema = &schemas().place;
        let expr = filters(json!({"random": 0.4}));
        assert!(validate_filter_fields(&expr, schema, false, &["random"]).is_ok());
        assert!(validate_filter_fields(&expr, schema, false, &[]).is_err());
    }

    #[test]
    fn test_character_modifier_fields_checked() {
        let schema = &schemas().character;
        let ok: CharacterModifierExpr = serde_json::from_value(json!({
            "positive": {"other": {"max": ["sleep", "health"], "exact": "energy"}}
        }))
        .unwrap();
        assert!(validate_character_modifiers(&ok, schema).is_ok());

        let bad: CharacterModifierExpr = serde_json::from_value(json!({
            "negative": {"own": {"avg": ["charisma"]}}
        }))
        .unwrap();
        assert!(validate_character_modifiers(&bad, schema).is_err());
    }

    #[test]
    fn test_modifier_reverse_accessor_skipped() {
        let schema = &schemas().character;
        let expr: ModifierExpr = serde_json::from_value(json!({
            "positive": {"avg": ["place_owner_set"]}
        }))
        .unwrap();
        assert!(validate_modifiers(&expr, schema).is_ok());
    }

    #[test]
    fn test_plain_modifier_relation_rejected() {
        let schema = &schemas().place;
        let expr: ModifierExpr = serde_json::from_value(json!({
            "positive": {"max": ["settlement"]}
        }))
        .unwrap();
        assert!(validate_modifiers(&expr, schema).is_err());
    }

    #[test]
    fn test_check_keys_reports_all() {
        let data = json!({"energy": 1, "stamina": 2, "luck": 3});
        let Value::Object(map) = data else { unreachable!() };
        let err = check_keys(&map, &NEED_FIELDS).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("luck") && msg.contains("stamina"));
        assert!(!msg.contains("energy"));
    }
}
