//! The JSON filter/modifier expression language.
//!
//! Filter expressions are flat mappings whose keys encode a relation path,
//! a field name and a comparison operator (`"safety__gte"`,
//! `"settlement__gold__lt"`). Modifier expressions are nested mappings
//! keyed by sign (and, for character modifiers, by ownership) whose leaves
//! aggregate attribute names. Both are validated against the static schema
//! before a save is accepted; the external runtime interprets them.

pub mod filter;
pub mod lookup;
pub mod modifier;
pub mod validate;

pub use filter::{Condition, FilterExpr};
pub use lookup::{parse_filter, FilterOp, ParsedLookup};
pub use modifier::{CharacterModifierExpr, CharacterModifierSides, ModifierBranch, ModifierExpr};
pub use validate::{
    check_keys, validate_character_modifiers, validate_filter_fields, validate_modifiers,
    NEED_FIELDS,
};
