//! Snapshot export for the game runtime.
//!
//! One self-describing JSON document per entity type, named after the
//! storage table, written with 4-space indentation. The document carries
//! everything a consumer needs to rebuild the relational structure from
//! raw ids: relation maps, reverse accessors, field classifications,
//! declared defaults and numeric ranges.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::core::error::{ForgeError, Result};
use crate::ops::population::update_population;
use crate::schema::entities::descriptors;
use crate::schema::{EntityDescriptor, FieldKind, ScalarKind};
use crate::store::ContentStore;

/// Bounds serialize as integers when whole, mirroring their declaration.
fn bound_value(bound: f64) -> Value {
    if bound.fract() == 0.0 {
        Value::from(bound as i64)
    } else {
        Value::from(bound)
    }
}

fn objects_map(store: &ContentStore, desc: &EntityDescriptor) -> Result<Map<String, Value>> {
    let mut objects = Map::new();
    for row in store.rows_json(desc.name)? {
        let id = row
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| ForgeError::Export(format!("{}: row without id", desc.name)))?;
        objects.insert(id.to_string(), row);
    }
    Ok(objects)
}

fn objects_fields(desc: &EntityDescriptor) -> Vec<String> {
    desc.fields
        .iter()
        .filter(|f| !f.is_many_to_many())
        .map(|f| f.column())
        .collect()
}

fn effects_fields(desc: &EntityDescriptor) -> Vec<&'static str> {
    desc.fields
        .iter()
        .filter(|f| f.scalar_kind() == Some(ScalarKind::Int) && f.name != "id")
        .map(|f| f.name)
        .collect()
}

fn attrs_ranges(store: &ContentStore, desc: &EntityDescriptor) -> Result<Value> {
    let mut ranges = Map::new();
    if store.rows_json(desc.name)?.is_empty() {
        return Ok(Value::Object(ranges));
    }
    for field in &desc.fields {
        if field.scalar_kind() != Some(ScalarKind::Int) {
            continue;
        }
        if let (Some(min), Some(max)) = (field.min, field.max) {
            ranges.insert(
                field.name.to_string(),
                json!({"min": bound_value(min), "max": bound_value(max)}),
            );
        }
    }
    Ok(Value::Object(ranges))
}

fn relation_maps(desc: &EntityDescriptor) -> (Map<String, Value>, Map<String, Value>) {
    let mut mtm = Map::new();
    let mut mto = Map::new();
    for field in &desc.fields {
        match &field.kind {
            FieldKind::Relation { target } => {
                mto.insert(
                    field.name.to_string(),
                    json!({"model": target, "from_id": field.column()}),
                );
            }
            FieldKind::ManyToMany {
                target,
                through,
                from_id,
                target_id,
            } => {
                mtm.insert(
                    field.name.to_string(),
                    json!({
                        "model": target,
                        "through": through,
                        "from_id": from_id,
                        "target_id": target_id
                    }),
                );
            }
            FieldKind::Scalar(_) => {}
        }
    }
    (mtm, mto)
}

/// Reverse one-to-many accessors: for every other entity holding a
/// foreign key at this one, `<related_name>_set` maps back to the holder
/// and its key column. Join tables stay hidden.
fn set_data(desc: &EntityDescriptor) -> Map<String, Value> {
    let mut sets = Map::new();
    for other in descriptors() {
        if other.is_join_table {
            continue;
        }
        for field in &other.fields {
            let FieldKind::Relation { target } = &field.kind else {
                continue;
            };
            if *target != desc.name {
                continue;
            }
            let accessor = field
                .related_name
                .map(str::to_string)
                .unwrap_or_else(|| other.name.to_lowercase());
            sets.insert(
                format!("{accessor}_set"),
                json!({"model": other.name, "target_id": field.column()}),
            );
        }
    }
    sets
}

fn defaults(desc: &EntityDescriptor) -> Map<String, Value> {
    let mut defaults = Map::new();
    for field in &desc.fields {
        if field.is_many_to_many() {
            continue;
        }
        match (&field.default, field.is_relation()) {
            (Some(value), _) => {
                defaults.insert(field.name.to_string(), value.clone());
            }
            (None, false) => {
                defaults.insert(field.name.to_string(), Value::Null);
            }
            (None, true) => {}
        }
    }
    defaults
}

fn time_fields(desc: &EntityDescriptor) -> Vec<String> {
    desc.fields
        .iter()
        .filter(|f| f.scalar_kind() == Some(ScalarKind::Time))
        .map(|f| f.column())
        .collect()
}

/// Full document for a concrete entity type.
fn build_document(store: &ContentStore, desc: &EntityDescriptor) -> Result<Value> {
    let (mtm, mto) = relation_maps(desc);
    Ok(json!({
        "name": desc.name,
        "mtm_data": mtm,
        "mto_data": mto,
        "set_data": set_data(desc),
        "time_fields": time_fields(desc),
        "objects": objects_map(store, desc)?,
        "objects_fields": objects_fields(desc),
        "objects_effects_fields": effects_fields(desc),
        "attrs_ranges": attrs_ranges(store, desc)?,
        "defaults": defaults(desc)
    }))
}

/// Reduced document for a many-to-many join table: raw rows and columns,
/// empty relational metadata.
fn build_join_document(store: &ContentStore, desc: &EntityDescriptor) -> Result<Value> {
    Ok(json!({
        "name": desc.name,
        "mtm_data": {},
        "mto_data": {},
        "set_data": {},
        "time_fields": [],
        "objects": objects_map(store, desc)?,
        "objects_fields": objects_fields(desc),
        "objects_effects_fields": [],
        "attrs_ranges": {},
        "defaults": {}
    }))
}

fn write_document(dir: &Path, desc: &EntityDescriptor, doc: &Value) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", desc.table));
    let file = File::create(&path)?;
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(file, formatter);
    doc.serialize(&mut serializer)?;
    Ok(path)
}

/// Export every entity type to `dir`, one file per storage table.
///
/// Place populations are recomputed first. Entity types are walked in
/// name order; a join table referenced from an owner's many-to-many map
/// gets its reduced document during the owner's turn, and a declared
/// through model later overwrites it with its full form.
pub fn export_all(store: &mut ContentStore, dir: &Path) -> Result<Vec<PathBuf>> {
    update_population(store);
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for desc in descriptors() {
        if desc.is_join_table {
            continue;
        }
        for field in &desc.fields {
            if let FieldKind::ManyToMany { through, .. } = &field.kind {
                let through_desc = crate::schema::entities::descriptor(through).ok_or_else(|| {
                    ForgeError::Export(format!("unknown join table: {through}"))
                })?;
                let doc = build_join_document(store, through_desc)?;
                written.push(write_document(dir, through_desc, &doc)?);
            }
        }
        let doc = build_document(store, desc)?;
        written.push(write_document(dir, desc, &doc)?);
        info!(table = desc.table, rows = store.rows_json(desc.name)?.len(), "exported");
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::entities::descriptor;

    #[test]
    fn test_objects_fields_use_id_columns() {
        let fields = objects_fields(descriptor("Character").unwrap());
        assert!(fields.contains(&"place_id".to_string()));
        assert!(fields.contains(&"gold".to_string()));
        assert!(!fields.contains(&"relationships".to_string()));
    }

    #[test]
    fn test_effects_fields_exclude_id_and_bools() {
        let fields = effects_fields(descriptor("Character").unwrap());
        assert!(fields.contains(&"mood"));
        assert!(fields.contains(&"gold"));
        assert!(!fields.contains(&"id"));
        assert!(!fields.contains(&"is_original"));
    }

    #[test]
    fn test_set_data_accessors() {
        let sets = set_data(descriptor("Character").unwrap());
        assert_eq!(
            sets.get("place_owner_set"),
            Some(&json!({"model": "Place", "target_id": "owner_id"}))
        );
        assert_eq!(
            sets.get("relationship_from_character_set"),
            Some(&json!({"model": "CharacterRelationship", "target_id": "from_character_id"}))
        );
        // auto join rows never surface as reverse accessors
        let settlement_sets = set_data(descriptor("SettlementPosition").unwrap());
        assert!(settlement_sets.keys().all(|k| !k.contains("positions")));
    }

    #[test]
    fn test_defaults_rules() {
        let map = defaults(descriptor("Character").unwrap());
        assert_eq!(map.get("faction"), Some(&json!(2)));
        assert_eq!(map.get("gold"), Some(&json!(100)));
        assert_eq!(map.get("id"), Some(&Value::Null));
        // relations without a declared default are skipped
        assert!(!map.contains_key("place"));
        assert!(!map.contains_key("relationships"));
    }

    #[test]
    fn test_time_fields() {
        let fields = time_fields(descriptor("PlanFilters").unwrap());
        assert_eq!(fields, vec!["time_from", "time_to", "time_min", "time_max"]);
    }

    #[test]
    fn test_mtm_map() {
        let (mtm, _) = relation_maps(descriptor("Settlement").unwrap());
        assert_eq!(
            mtm.get("positions"),
            Some(&json!({
                "model": "SettlementPosition",
                "through": "Settlement_positions",
                "from_id": "settlement_id",
                "target_id": "settlementposition_id"
            }))
        );
    }
}
