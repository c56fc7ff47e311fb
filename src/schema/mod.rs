//! Static schema description of the content model.
//!
//! Every entity type is declared once as an [`EntityDescriptor`]: a table of
//! fields with their kind (scalar, relation, many-to-many), numeric bounds,
//! and defaults. The DSL validator, the description renderer and the export
//! serializer all consume this one source of truth instead of introspecting
//! the store at runtime.

pub mod entities;
pub mod registry;

pub use registry::{schemas, FieldInfo, FieldSchema, SchemaSet};

use serde_json::Value;

/// Primitive kind of a scalar column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Str,
    Json,
    Time,
}

/// What a declared field is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    /// Many-to-one or one-to-one reference; stored as a raw `<name>_id` column
    Relation { target: &'static str },
    /// Many-to-many reference materialized through a join table
    ManyToMany {
        target: &'static str,
        through: &'static str,
        from_id: &'static str,
        target_id: &'static str,
    },
}

/// One declared field of an entity type
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Declared lower bound (0 for non-negative integer columns)
    pub min: Option<f64>,
    /// Declared upper bound
    pub max: Option<f64>,
    /// Declared default value; `None` means no default was declared
    pub default: Option<Value>,
    /// Reverse accessor name on the target entity, when one is declared
    pub related_name: Option<&'static str>,
}

impl FieldDef {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            min: None,
            max: None,
            default: None,
            related_name: None,
        }
    }

    /// The auto-assigned primary key column.
    pub fn id() -> Self {
        Self::new("id", FieldKind::Scalar(ScalarKind::Int))
    }

    pub fn bool(name: &'static str, default: bool) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarKind::Bool)).default(Value::Bool(default))
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarKind::Int))
    }

    /// Non-negative integer column (implicit lower bound of 0).
    pub fn uint(name: &'static str) -> Self {
        Self::int(name).min(0.0)
    }

    pub fn float(name: &'static str) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarKind::Float))
    }

    pub fn str(name: &'static str) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarKind::Str))
    }

    /// JSON blob column, defaulting to an empty mapping.
    pub fn json(name: &'static str) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarKind::Json)).default(Value::Object(Default::default()))
    }

    pub fn time(name: &'static str) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarKind::Time))
    }

    pub fn relation(name: &'static str, target: &'static str) -> Self {
        Self::new(name, FieldKind::Relation { target })
    }

    pub fn many_to_many(
        name: &'static str,
        target: &'static str,
        through: &'static str,
        from_id: &'static str,
        target_id: &'static str,
    ) -> Self {
        Self::new(
            name,
            FieldKind::ManyToMany {
                target,
                through,
                from_id,
                target_id,
            },
        )
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn bounds(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn related(mut self, name: &'static str) -> Self {
        self.related_name = Some(name);
        self
    }

    /// Persisted column name: relations store a raw `<name>_id` foreign key.
    pub fn column(&self) -> String {
        match self.kind {
            FieldKind::Relation { .. } => format!("{}_id", self.name),
            _ => self.name.to_string(),
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.kind, FieldKind::Relation { .. })
    }

    pub fn is_many_to_many(&self) -> bool {
        matches!(self.kind, FieldKind::ManyToMany { .. })
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self.kind {
            FieldKind::Scalar(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Declared shape of one entity type
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    /// Type name as the runtime knows it, e.g. `"Character"`
    pub name: &'static str,
    /// Storage table name; also the export file name
    pub table: &'static str,
    /// Auto-created join table of a many-to-many field (reduced export form)
    pub is_join_table: bool,
    pub fields: Vec<FieldDef>,
}

impl EntityDescriptor {
    pub fn new(name: &'static str, table: &'static str, fields: Vec<FieldDef>) -> Self {
        Self {
            name,
            table,
            is_join_table: false,
            fields,
        }
    }

    pub fn join(name: &'static str, table: &'static str, fields: Vec<FieldDef>) -> Self {
        Self {
            name,
            table,
            is_join_table: true,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
