//! World geography: places, settlements, transitions and positions.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::Id;
use crate::dsl::{validate_filter_fields, validate_modifiers, FilterExpr, ModifierExpr};
use crate::model::impl_row;
use crate::schema::SchemaSet;

/// A location characters occupy and move between.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    pub id: Id,
    pub title: String,
    pub name: String,
    pub is_locked: bool,
    pub place_type: String,
    pub settlement_id: Option<Id>,
    pub owner_id: Option<Id>,
    pub beauty: i64,
    pub fertility: i64,
    pub safety: i64,
    /// Derived: live character count, recomputed before export.
    pub population: u32,
    /// Character filters deciding who passes a locked place.
    pub lock_filters: FilterExpr,
}

impl Default for Place {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            name: String::new(),
            is_locked: false,
            place_type: "region".to_string(),
            settlement_id: None,
            owner_id: None,
            beauty: 500,
            fertility: 100,
            safety: 1000,
            population: 0,
            lock_filters: FilterExpr::new(),
        }
    }
}

impl_row!(Place, "Place");

impl Place {
    pub fn validate(&self, schemas: &SchemaSet) -> Result<()> {
        validate_filter_fields(&self.lock_filters, &schemas.character, true, &[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settlement {
    pub id: Id,
    pub title: String,
    pub gold: u32,
    pub is_positions_set_required: bool,
}

impl Default for Settlement {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            gold: 1000,
            is_positions_set_required: false,
        }
    }
}

impl_row!(Settlement, "Settlement");

/// Directed edge of the walkable place graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceTransition {
    pub id: Id,
    pub from_place_id: Id,
    pub to_place_id: Id,
    /// Kilometers.
    pub distance: f64,
}

impl Default for PlaceTransition {
    fn default() -> Self {
        Self {
            id: 0,
            from_place_id: 0,
            to_place_id: 0,
            distance: 1.0,
        }
    }
}

impl_row!(PlaceTransition, "PlaceTransition");

/// A role characters can hold within a settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementPosition {
    pub id: Id,
    pub is_voting: bool,
    pub title: String,
    pub name: String,
    pub name_female: String,
    pub description: String,
    pub character_filters: FilterExpr,
    pub points_mods: ModifierExpr,
    pub value: i64,
    pub min_number: u32,
    pub max_number: Option<u32>,
    /// Additional holders per population, 0.0-1.0.
    pub population_ratio: f64,
}

impl Default for SettlementPosition {
    fn default() -> Self {
        Self {
            id: 0,
            is_voting: false,
            title: String::new(),
            name: String::new(),
            name_female: String::new(),
            description: String::new(),
            character_filters: FilterExpr::new(),
            points_mods: ModifierExpr::default(),
            value: 500,
            min_number: 1,
            max_number: None,
            population_ratio: 0.0,
        }
    }
}

impl_row!(SettlementPosition, "SettlementPosition");

impl SettlementPosition {
    pub fn validate(&self, schemas: &SchemaSet) -> Result<()> {
        validate_filter_fields(&self.character_filters, &schemas.character, true, &[])?;
        validate_modifiers(&self.points_mods, &schemas.character)?;
        Ok(())
    }
}

/// Join row linking a settlement to one of its positions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementPositionLink {
    pub id: Id,
    pub settlement_id: Id,
    pub settlementposition_id: Id,
}

impl_row!(SettlementPositionLink, "Settlement_positions");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::registry::schemas;
    use serde_json::json;

    #[test]
    fn test_lock_filters_validated_against_characters() {
        let place = Place {
            lock_filters: FilterExpr::from_value(&json!({"id__or": 5, "place_id__or2": 9}))
                .unwrap(),
            ..Default::default()
        };
        assert!(place.validate(schemas()).is_ok());

        let bad = Place {
            lock_filters: FilterExpr::from_value(&json!({"sturdiness": 5})).unwrap(),
            ..Default::default()
        };
        assert!(bad.validate(schemas()).is_err());
    }

    #[test]
    fn test_position_filters_and_mods() {
        let position = SettlementPosition {
            character_filters: FilterExpr::from_value(&json!({"fighting__gte": 500})).unwrap(),
            points_mods: serde_json::from_value(json!({
                "positive": {"max": ["magic", "fighting"], "exact": "energy"}
            }))
            .unwrap(),
            ..Default::default()
        };
        assert!(position.validate(schemas()).is_ok());
    }
}
