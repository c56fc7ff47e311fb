//! Typed modifier/effect expressions.
//!
//! Modifiers adjust a computed quantity from attribute values, aggregated
//! per branch: `max`/`min`/`avg` over lists of attributes plus a single
//! `exact` attribute. Plain modifiers branch on sign only; character
//! modifiers add an own/other level between sign and leaf.

use serde::{Deserialize, Serialize};

/// Leaf aggregation over attribute names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierBranch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub max: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub min: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub avg: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<String>,
}

impl ModifierBranch {
    pub fn is_empty(&self) -> bool {
        self.max.is_empty() && self.min.is_empty() && self.avg.is_empty() && self.exact.is_none()
    }

    /// Every attribute name the branch references, in max/min/avg/exact order.
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        self.max
            .iter()
            .chain(&self.min)
            .chain(&self.avg)
            .map(String::as_str)
            .chain(self.exact.as_deref())
    }
}

/// Sign-branched modifier for place, settlement and position modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierExpr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive: Option<ModifierBranch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<ModifierBranch>,
}

impl ModifierExpr {
    pub fn is_empty(&self) -> bool {
        self.positive.is_none() && self.negative.is_none()
    }
}

/// The own/other level of a character modifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterModifierSides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub own: Option<ModifierBranch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<ModifierBranch>,
}

/// Sign- and ownership-branched modifier for character modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterModifierExpr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive: Option<CharacterModifierSides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<CharacterModifierSides>,
}

impl CharacterModifierExpr {
    pub fn is_empty(&self) -> bool {
        self.positive.is_none() && self.negative.is_none()
    }
}
