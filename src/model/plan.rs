//! Plan system entities: plans, stages and their filter/effect payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::{ForgeError, Result};
use crate::core::types::{Id, TimeOfDay};
use crate::dsl::{
    check_keys, validate_character_modifiers, validate_filter_fields, validate_modifiers,
    CharacterModifierExpr, FilterExpr, ModifierExpr, NEED_FIELDS,
};
use crate::model::impl_row;
use crate::schema::SchemaSet;

/// Character-side filter payload: who a plan applies to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterDataFilters {
    pub id: Id,
    pub title: String,
    /// Interrupt the plan when the filters stop matching.
    pub is_interrupting: bool,
    pub filters: FilterExpr,
    pub plan_points_mods: CharacterModifierExpr,
    pub acceptance_points_base: CharacterModifierExpr,
    pub acceptance_points_mods: CharacterModifierExpr,
    pub faction_opinion_min: Option<i64>,
    pub faction_opinion_max: Option<i64>,
    pub relationships_min: Option<i64>,
    pub relationships_max: Option<i64>,
    pub acceptance_points_min: Option<i64>,
    pub acceptance_points_max: Option<i64>,
    pub acceptance_points_mod_value: Option<f64>,
}

impl_row!(CharacterDataFilters, "CharacterDataFilters");

impl CharacterDataFilters {
    pub fn validate(&self, schemas: &SchemaSet) -> Result<()> {
        validate_filter_fields(&self.filters, &schemas.character, false, &[])?;
        validate_character_modifiers(&self.plan_points_mods, &schemas.character)?;
        validate_character_modifiers(&self.acceptance_points_base, &schemas.character)?;
        validate_character_modifiers(&self.acceptance_points_mods, &schemas.character)?;
        Ok(())
    }
}

/// Character-side effect payload: what a finished stage applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterDataEffects {
    pub id: Id,
    pub title: String,
    pub effects: FilterExpr,
    pub effects_max: FilterExpr,
    pub effects_mods: CharacterModifierExpr,
    pub effects_mods_value: Option<f64>,
    pub effects_place_mods: ModifierExpr,
    pub settlement_effects: FilterExpr,
    pub settlement_effects_max: FilterExpr,
    pub place_settlement_effects: FilterExpr,
    pub place_settlement_effects_max: FilterExpr,
    pub needs_mods: Map<String, Value>,
    pub relationships_effects: Option<f64>,
    pub relationships_effects_max: Option<u32>,
    pub relationships_effects_min: Option<u32>,
}

impl_row!(CharacterDataEffects, "CharacterDataEffects");

impl CharacterDataEffects {
    pub fn validate(&self, schemas: &SchemaSet) -> Result<()> {
        if let (Some(min), Some(max)) = (self.relationships_effects_min, self.relationships_effects_max) {
            if min > max {
                return Err(ForgeError::validation(
                    "relationships_effects_min > relationships_effects_max",
                ));
            }
        }
        validate_filter_fields(&self.effects, &schemas.character, false, &[])?;
        validate_filter_fields(&self.effects_max, &schemas.character, true, &[])?;
        validate_character_modifiers(&self.effects_mods, &schemas.character)?;
        validate_modifiers(&self.effects_place_mods, &schemas.place)?;
        validate_filter_fields(&self.settlement_effects, &schemas.settlement, false, &[])?;
        validate_filter_fields(&self.settlement_effects_max, &schemas.settlement, false, &[])?;
        validate_filter_fields(&self.place_settlement_effects, &schemas.settlement, false, &[])?;
        validate_filter_fields(
            &self.place_settlement_effects_max,
            &schemas.settlement,
            false,
            &[],
        )?;
        check_keys(&self.needs_mods, &NEED_FIELDS)?;
        Ok(())
    }
}

/// Plan-selection filters, matched against Plan fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterDataPlanFilters {
    pub id: Id,
    pub title: String,
    pub filters: FilterExpr,
    /// More points, more chances.
    pub is_random_weighted: bool,
}

impl Default for CharacterDataPlanFilters {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            filters: FilterExpr::new(),
            is_random_weighted: false,
        }
    }
}

impl_row!(CharacterDataPlanFilters, "CharacterDataPlanFilters");

impl CharacterDataPlanFilters {
    pub fn validate(&self, schemas: &SchemaSet) -> Result<()> {
        validate_filter_fields(&self.filters, &schemas.plan, false, &[])
    }
}

/// A branching scripted interaction definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub id: Id,
    pub title: String,
    pub name: String,
    pub is_char_available: bool,
    pub is_player_available: bool,
    pub is_encounter: bool,
    /// Activates for every character on each location change.
    pub is_route: bool,
    pub is_ask_player: bool,
    pub is_always_pause: bool,
    pub is_first_pause: bool,
    pub is_second_pause: bool,
    pub is_break_second: bool,
    pub is_important_event: bool,
    pub is_ignore_event: bool,
    /// Pause before the next attempt, minutes.
    pub time_pause: Option<f64>,
    pub min_points: i64,
    pub on_finish_first: String,
    pub on_finish_second: String,
    pub event_desc: String,
    pub ask_player_desc: String,
    pub beginning_text: String,
    pub filters_id: Option<Id>,
    pub one_id: Id,
    pub two_id: Option<Id>,
    pub three_id: Option<Id>,
    pub four_id: Option<Id>,
    pub five_id: Option<Id>,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            name: String::new(),
            is_char_available: false,
            is_player_available: false,
            is_encounter: false,
            is_route: false,
            is_ask_player: true,
            is_always_pause: false,
            is_first_pause: true,
            is_second_pause: false,
            is_break_second: false,
            is_important_event: false,
            is_ignore_event: false,
            time_pause: None,
            min_points: 101,
            on_finish_first: "next_stage".to_string(),
            on_finish_second: String::new(),
            event_desc: String::new(),
            ask_player_desc: String::new(),
            beginning_text: String::new(),
            filters_id: None,
            one_id: 0,
            two_id: None,
            three_id: None,
            four_id: None,
            five_id: None,
        }
    }
}

impl_row!(Plan, "Plan");

impl Plan {
    /// Stage slots in play order.
    pub fn stage_ids(&self) -> [Option<Id>; 5] {
        [
            Some(self.one_id),
            self.two_id,
            self.three_id,
            self.four_id,
            self.five_id,
        ]
    }
}

/// One step of a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stage {
    pub id: Id,
    pub title: String,
    pub effects_id: Option<Id>,
    pub filters_id: Option<Id>,
    pub filters_plan_set_id: Option<Id>,
    pub filters_place_id: Option<Id>,
    pub lock_id: Option<Id>,
    /// Ignored when the stage is optional.
    pub plan_pause_id: Option<Id>,
    pub is_optional: bool,
    /// Pause minutes on failure; -1 disables the plan.
    pub time_pause: Option<f64>,
}

impl_row!(Stage, "Stage");

/// Group-forming filters of a plan or stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanFilters {
    pub id: Id,
    pub first_character_id: Option<Id>,
    pub second_character_id: Option<Id>,
    pub time_from: Option<TimeOfDay>,
    pub time_from_seconds: Option<u32>,
    pub time_to: Option<TimeOfDay>,
    pub time_to_seconds: Option<u32>,
    pub time_min: Option<TimeOfDay>,
    pub time_min_seconds: Option<u32>,
    pub time_max: Option<TimeOfDay>,
    pub time_max_seconds: Option<u32>,
    pub is_time_points: bool,
    /// Disable to keep the second character filter without forming a group.
    pub is_group: bool,
}

impl Default for PlanFilters {
    fn default() -> Self {
        Self {
            id: 0,
            first_character_id: None,
            second_character_id: None,
            time_from: None,
            time_from_seconds: None,
            time_to: None,
            time_to_seconds: None,
            time_min: None,
            time_min_seconds: None,
            time_max: None,
            time_max_seconds: None,
            is_time_points: false,
            is_group: true,
        }
    }
}

impl_row!(PlanFilters, "PlanFilters");

impl PlanFilters {
    /// Recompute the derived `*_seconds` columns from the time windows.
    pub fn derive_seconds(&mut self) {
        self.time_from_seconds = self.time_from.map(|t| t.as_seconds(0));
        self.time_to_seconds = self.time_to.map(|t| t.as_seconds(0));
        self.time_min_seconds = self.time_min.map(|t| t.as_seconds(0));
        self.time_max_seconds = self.time_max.map(|t| t.as_seconds(0));
    }
}

/// Up to five effect payloads applied in stage order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanEffectsSet {
    pub id: Id,
    pub title: String,
    pub one_id: Id,
    pub two_id: Option<Id>,
    pub three_id: Option<Id>,
    pub four_id: Option<Id>,
    pub five_id: Option<Id>,
}

impl_row!(PlanEffectsSet, "PlanEffectsSet");

/// Effect sets for both sides of an interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanEffects {
    pub id: Id,
    pub first_character_id: Option<Id>,
    pub second_character_id: Option<Id>,
    pub is_instant: bool,
}

impl_row!(PlanEffects, "PlanEffects");

/// Plan-selection filters for one side of an interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSetFilters {
    pub id: Id,
    pub first_character_id: Option<Id>,
    pub second_character_id: Option<Id>,
}

impl_row!(PlanSetFilters, "PlanSetFilters");

impl PlanSetFilters {
    pub fn validate(&self) -> Result<()> {
        match (self.first_character_id, self.second_character_id) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(ForgeError::validation("specify one character data")),
        }
    }
}

/// Where a stage may take place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanPlaceFilters {
    pub id: Id,
    pub title: String,
    pub is_random: bool,
    /// Overrides the distance penalty.
    pub is_nearest: bool,
    pub is_teleportation: bool,
    /// Points lost per kilometer.
    pub distance_penalty: Option<u32>,
    pub filters: FilterExpr,
    pub attrs_importance: FilterExpr,
    pub max_distance: Option<u32>,
}

impl Default for PlanPlaceFilters {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            is_random: false,
            is_nearest: false,
            is_teleportation: false,
            distance_penalty: Some(10),
            filters: FilterExpr::new(),
            attrs_importance: FilterExpr::new(),
            max_distance: None,
        }
    }
}

impl_row!(PlanPlaceFilters, "PlanPlaceFilters");

impl PlanPlaceFilters {
    pub fn validate(&self, schemas: &SchemaSet) -> Result<()> {
        validate_filter_fields(&self.filters, &schemas.place, true, &[])?;
        validate_filter_fields(&self.attrs_importance, &schemas.place, false, &["random"])?;
        if !self.attrs_importance.is_empty() {
            let total: f64 = self
                .attrs_importance
                .conditions
                .iter()
                .filter_map(|c| c.value.as_f64())
                .sum();
            if (total - 1.0).abs() > 1e-9 {
                return Err(ForgeError::validation(format!(
                    "wrong sum of values: \"{total}\""
                )));
            }
        }
        Ok(())
    }
}

/// Lock and unlock conditions a stage applies to its place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanLock {
    pub id: Id,
    pub title: String,
    pub close_filters: FilterExpr,
    pub open_filters: FilterExpr,
}

impl_row!(PlanLock, "PlanLock");

impl PlanLock {
    pub fn validate(&self, schemas: &SchemaSet) -> Result<()> {
        validate_filter_fields(&self.close_filters, &schemas.place, true, &[])?;
        validate_filter_fields(&self.open_filters, &schemas.place, true, &[])?;
        Ok(())
    }
}

/// Per-plan pause overrides, keyed by plan title.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanPause {
    pub id: Id,
    pub first: Map<String, Value>,
    pub second: Map<String, Value>,
}

impl_row!(PlanPause, "PlanPause");

impl PlanPause {
    /// Every key must name an existing plan title; values are minutes.
    pub fn validate(&self, plan_titles: &[&str]) -> Result<()> {
        for data in [&self.first, &self.second] {
            for (title, pause) in data {
                if !plan_titles.contains(&title.as_str()) {
                    return Err(ForgeError::validation(format!(
                        "plan not found: \"{title}\""
                    )));
                }
                if !pause.is_number() {
                    return Err(ForgeError::validation(format!("wrong value: \"{pause}\"")));
                }
            }
        }
        Ok(())
    }
}

/// Runtime progress of one plan instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanData {
    pub id: Id,
    pub plan_id: Id,
    pub plan_stage: String,
    pub first_character_id: Id,
    pub second_character_id: Option<Id>,
    pub first_previous_id: Option<Id>,
    pub second_previous_id: Option<Id>,
    pub first_route_id: Option<Id>,
    pub second_route_id: Option<Id>,
}

impl Default for PlanData {
    fn default() -> Self {
        Self {
            id: 0,
            plan_id: 0,
            plan_stage: "one".to_string(),
            first_character_id: 0,
            second_character_id: None,
            first_previous_id: None,
            second_previous_id: None,
            first_route_id: None,
            second_route_id: None,
        }
    }
}

impl_row!(PlanData, "PlanData");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::registry::schemas;
    use serde_json::json;

    #[test]
    fn test_plan_set_filters_exactly_one() {
        let mut filters = PlanSetFilters::default();
        assert!(filters.validate().is_err());
        filters.first_character_id = Some(1);
        assert!(filters.validate().is_ok());
        filters.second_character_id = Some(2);
        assert!(filters.validate().is_err());
    }

    #[test]
    fn test_derive_seconds() {
        let mut filters = PlanFilters {
            time_from: TimeOfDay::new(8, 0, 0),
            time_min_seconds: Some(600),
            ..Default::default()
        };
        filters.derive_seconds();
        assert_eq!(filters.time_from_seconds, Some(8 * 3600));
        assert_eq!(filters.time_min_seconds, None);
    }

    #[test]
    fn test_plan_pause_titles_checked() {
        let pause = PlanPause {
            first: serde_json::from_value(json!({"relax": 30})).unwrap(),
            ..Default::default()
        };
        assert!(pause.validate(&["relax", "talk"]).is_ok());
        assert!(pause.validate(&["talk"]).is_err());

        let bad_value = PlanPause {
            second: serde_json::from_value(json!({"talk": "soon"})).unwrap(),
            ..Default::default()
        };
        assert!(bad_value.validate(&["talk"]).is_err());
    }

    #[test]
    fn test_attrs_importance_sum() {
        let mut filters = PlanPlaceFilters {
            attrs_importance: FilterExpr::from_value(&json!({
                "beauty": 0.3, "fertility": 0.3, "safety": 0.4
            }))
            .unwrap(),
            ..Default::default()
        };
        assert!(filters.validate(schemas()).is_ok());

        filters.attrs_importance =
            FilterExpr::from_value(&json!({"beauty": 0.5, "safety": 0.4})).unwrap();
        assert!(filters.validate(schemas()).is_err());
    }

    #[test]
    fn test_effects_max_strict() {
        let effects = CharacterDataEffects {
            effects_max: FilterExpr::from_value(&json!({"energy": 300, "mood": 800})).unwrap(),
            ..Default::default()
        };
        assert!(effects.validate(schemas()).is_ok());

        let out_of_range = CharacterDataEffects {
            effects_max: FilterExpr::from_value(&json!({"energy": 1200})).unwrap(),
            ..Default::default()
        };
        assert!(out_of_range.validate(schemas()).is_err());
    }

    #[test]
    fn test_needs_mods_keys() {
        let effects = CharacterDataEffects {
            needs_mods: serde_json::from_value(json!({"energy": 1, "stamina": 1})).unwrap(),
            ..Default::default()
        };
        let err = effects.validate(schemas()).unwrap_err();
        assert!(err.to_string().contains("stamina"));
    }
}
