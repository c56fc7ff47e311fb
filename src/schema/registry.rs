//! Flattened field lookup maps derived from the entity descriptors.
//!
//! The DSL validator does not care about full descriptors, only whether a
//! name resolves to a field, whether that field is itself a reference to
//! another entity, and what numeric bounds it declares. [`FieldSchema`]
//! flattens one descriptor into exactly that.

use std::sync::OnceLock;

use ahash::AHashMap;

use super::entities::descriptor;
use super::{EntityDescriptor, FieldKind};

/// Validation-relevant facts about one addressable field name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldInfo {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// True when the name addresses a related entity rather than a column.
    pub is_model: bool,
}

/// Field lookup map for one entity type.
///
/// A relation field contributes two entries: the bare name (addressing the
/// related entity, usable as a path segment) and the `<name>_id` column
/// (addressing the raw foreign key). Many-to-many fields contribute none;
/// they are reachable only through their join table.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub entity: &'static str,
    fields: AHashMap<String, FieldInfo>,
}

impl FieldSchema {
    pub fn build(desc: &EntityDescriptor) -> Self {
        let mut fields = AHashMap::new();
        for field in &desc.fields {
            match field.kind {
                FieldKind::Scalar(_) => {
                    fields.insert(
                        field.name.to_string(),
                        FieldInfo {
                            min: field.min,
                            max: field.max,
                            is_model: false,
                        },
                    );
                }
                FieldKind::Relation { .. } => {
                    fields.insert(
                        field.name.to_string(),
                        FieldInfo {
                            min: None,
                            max: None,
                            is_model: true,
                        },
                    );
                    fields.insert(
                        field.column(),
                        FieldInfo {
                            min: field.min,
                            max: field.max,
                            is_model: false,
                        },
                    );
                }
                FieldKind::ManyToMany { .. } => {}
            }
        }
        Self {
            entity: desc.name,
            fields,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// The schemas filter expressions are validated against, one per entity
/// type that can appear at the head of a lookup.
#[derive(Debug, Clone)]
pub struct SchemaSet {
    pub character: FieldSchema,
    pub place: FieldSchema,
    pub plan: FieldSchema,
    pub settlement: FieldSchema,
    pub position: FieldSchema,
}

impl SchemaSet {
    fn build() -> Self {
        let get = |name: &str| {
            // All five are declared in the descriptor tables.
            FieldSchema::build(descriptor(name).unwrap_or_else(|| {
                panic!("missing entity descriptor: {name}")
            }))
        };
        Self {
            character: get("Character"),
            place: get("Place"),
            plan: get("Plan"),
            settlement: get("Settlement"),
            position: get("SettlementPosition"),
        }
    }
}

static SCHEMAS: OnceLock<SchemaSet> = OnceLock::new();

/// Global schema set, built lazily from the descriptor tables.
pub fn schemas() -> &'static SchemaSet {
    SCHEMAS.get_or_init(SchemaSet::build)
}

/// Character attributes on the qualitative 100-1000 scale, in declaration
/// order. Drives attribute labelling and the relationship seeder.
pub fn character_ranged_attrs() -> Vec<&'static str> {
    let character = descriptor("Character").unwrap_or_else(|| unreachable!());
    character
        .fields
        .iter()
        .filter(|f| f.min == Some(100.0) && f.max == Some(1000.0))
        .map(|f| f.name)
        .collect()
}
