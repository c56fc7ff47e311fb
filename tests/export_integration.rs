//! Integration tests for the snapshot export
//!
//! A small world is exported end to end and the per-table documents are
//! checked for relation maps, recomputed populations, declared ranges
//! and defaults.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use planforge::export::export_all;
use planforge::model::{Character, Place};
use planforge::store::ContentStore;

fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("planforge_{tag}_{}", std::process::id()))
}

fn read_doc(dir: &Path, file: &str) -> Value {
    let content = fs::read_to_string(dir.join(file)).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_export_covers_every_table() {
    let mut store = ContentStore::new();
    let square = store
        .save_place(Place {
            title: "square".to_string(),
            ..Default::default()
        })
        .unwrap();
    store
        .save_place(Place {
            title: "alley".to_string(),
            ..Default::default()
        })
        .unwrap();
    store.save_character(Character {
        title: "mira".to_string(),
        place_id: Some(square),
        ..Default::default()
    });

    let dir = temp_dir("export_all");
    let written = export_all(&mut store, &dir).unwrap();

    let names: BTreeSet<String> = written
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 24);
    assert!(names.contains("main_character.json"));
    assert!(names.contains("main_place.json"));
    assert!(names.contains("main_settlement_positions.json"));

    let character = read_doc(&dir, "main_character.json");
    assert_eq!(character["name"], json!("Character"));
    assert_eq!(
        character["mto_data"]["place"],
        json!({"model": "Place", "from_id": "place_id"})
    );
    assert_eq!(
        character["mtm_data"]["relationships"]["through"],
        json!("CharacterRelationship")
    );
    assert_eq!(character["objects"]["1"]["place_id"], json!(square));
    assert_eq!(
        character["attrs_ranges"]["health"],
        json!({"min": 100, "max": 1000})
    );
    assert_eq!(character["defaults"]["faction"], json!(2));
    assert_eq!(character["defaults"]["gold"], json!(100));
    assert_eq!(character["defaults"]["id"], Value::Null);
    assert!(!character["defaults"]
        .as_object()
        .unwrap()
        .contains_key("place"));

    // populations recomputed before the dump
    let place = read_doc(&dir, "main_place.json");
    assert_eq!(place["objects"]["1"]["population"], json!(1));
    assert_eq!(place["objects"]["2"]["population"], json!(0));

    // attrs_ranges only materialize for non-empty tables
    let settlement = read_doc(&dir, "main_settlement.json");
    assert_eq!(settlement["attrs_ranges"], json!({}));

    // the auto-created join table keeps the reduced form
    let join = read_doc(&dir, "main_settlement_positions.json");
    assert_eq!(join["name"], json!("Settlement_positions"));
    assert_eq!(join["mtm_data"], json!({}));
    assert_eq!(join["set_data"], json!({}));
    assert_eq!(
        join["objects_fields"],
        json!(["id", "settlement_id", "settlementposition_id"])
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_declared_through_model_keeps_full_document() {
    let mut store = ContentStore::new();
    store.save_character(Character::default());

    let dir = temp_dir("export_through");
    export_all(&mut store, &dir).unwrap();

    // written reduced during Character's turn, then overwritten with the
    // full form when CharacterRelationship's own turn comes
    let doc = read_doc(&dir, "main_characterrelationship.json");
    assert_eq!(
        doc["mto_data"]["from_character"],
        json!({"model": "Character", "from_id": "from_character_id"})
    );
    assert_eq!(doc["defaults"]["value"], json!(500));

    fs::remove_dir_all(&dir).unwrap();
}
