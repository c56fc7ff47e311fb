//! Per-entity description bodies.
//!
//! Each implementation mirrors what the authoring UI shows in list views:
//! an explicit title short-circuits everything, otherwise the description
//! is assembled from the entity's filter and modifier payloads.

use serde_json::Value;

use crate::model::{
    Character, CharacterDataEffects, CharacterDataFilters, CharacterDataPlanFilters,
    CharacterRelationship, EventLog, Faction, FactionRelationship, Place, PlaceTransition, Plan,
    PlanData, PlanEffects, PlanEffectsSet, PlanFilters, PlanLock, PlanPause, PlanPlaceFilters,
    PlanSetFilters, Row, Settlement, SettlementPosition, Stage,
};
use crate::render::labels::{attr_label, display_value, place_filter_desc};
use crate::render::mods::{describe_character_modifiers, describe_modifiers};
use crate::render::{label_with, Describe, LabelOptions};
use crate::schema::registry::character_ranged_attrs;
use crate::store::ContentStore;

const BARE: LabelOptions<'static> = LabelOptions {
    with_name: false,
    with_count: false,
    title: None,
};

fn plain(value: &Value) -> String {
    match value {
        Value::Null => "none".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn float_text(value: f64) -> String {
    format!("{value:?}")
}

impl Describe for CharacterDataFilters {
    fn describe_instance(&self, _store: &ContentStore) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        let ranged = character_ranged_attrs();
        let mut items = Vec::new();
        for condition in &self.filters.conditions {
            if condition.raw.starts_with("gender") {
                items.push(plain(&condition.value));
                continue;
            }
            let mut text = None;
            if condition.raw.split("__").any(|seg| ranged.iter().any(|a| *a == seg)) {
                if let Some(v) = condition.value.as_f64() {
                    text = attr_label(v.floor() as i64).map(str::to_string);
                }
            }
            let text = text.unwrap_or_else(|| match &condition.value {
                Value::Array(values) => values
                    .iter()
                    .map(plain)
                    .collect::<Vec<_>>()
                    .join("_"),
                Value::String(s) => s.strip_prefix('_').unwrap_or(s).to_string(),
                other => plain(other),
            });
            items.push(format!("{}_{}", condition.raw.replace("__", "_"), text));
        }
        if self.is_interrupting {
            items.push("is_interrupting".to_string());
        }
        items.join("__").to_lowercase()
    }
}

impl Describe for CharacterDataEffects {
    /// This type spaces its count suffix, unlike the shared framing.
    fn count_separator(&self) -> &'static str {
        " "
    }

    fn describe_instance(&self, _store: &ContentStore) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        let mut items = Vec::new();
        for effects in [
            &self.effects,
            &self.settlement_effects,
            &self.place_settlement_effects,
        ] {
            if effects.is_empty() {
                continue;
            }
            items.push(
                effects
                    .conditions
                    .iter()
                    .map(|c| format!("{}({})", c.raw, display_value(&c.value)))
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        if !self.effects_mods.is_empty() {
            items.push(describe_character_modifiers(&self.effects_mods, ", "));
        }
        if !self.effects_place_mods.is_empty() {
            items.push(describe_modifiers(&self.effects_place_mods, ", "));
        }
        if let Some(value) = self.relationships_effects.filter(|v| *v != 0.0) {
            let mut text = format!("relationships({}", float_text(value));
            if self.relationships_effects_min.is_some() || self.relationships_effects_max.is_some()
            {
                text.push_str(&format!(
                    ", {}-{}",
                    self.relationships_effects_min.unwrap_or(100),
                    self.relationships_effects_max.unwrap_or(1000)
                ));
            }
            text.push(')');
            items.push(text);
        }
        if !self.needs_mods.is_empty() {
            items.push(format!(
                "needs: {}",
                self.needs_mods
                    .iter()
                    .map(|(k, v)| format!("{}({})", k, plain(v)))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        items.join(", ")
    }
}

impl Describe for CharacterDataPlanFilters {
    fn describe_instance(&self, store: &ContentStore) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        let plan_title = |value: &Value| -> String {
            value
                .as_u64()
                .and_then(|id| store.plans.get(id as u32))
                .map(|plan| plan.title.clone())
                .unwrap_or_else(|| plain(value))
        };
        let mut items = Vec::new();
        for condition in &self.filters.conditions {
            match condition.raw.as_str() {
                "id" => items.push(plan_title(&condition.value)),
                "id__in" => {
                    if let Value::Array(ids) = &condition.value {
                        items.extend(ids.iter().map(plan_title));
                    }
                }
                "id__ne" => items.push(format!("any_except_{}", plain(&condition.value))),
                "id__nin" => {
                    let titles = match &condition.value {
                        Value::Array(ids) => {
                            ids.iter().map(plan_title).collect::<Vec<_>>().join("_")
                        }
                        other => plain(other),
                    };
                    items.push(format!("any_except_{titles}"));
                }
                raw => items.push(format!("{}_{}", raw, plain(&condition.value).to_lowercase())),
            }
        }
        let joined = items.join("__");
        if self.is_random_weighted {
            format!("{joined}, random points")
        } else {
            joined
        }
    }
}

impl Describe for Plan {
    fn describe_instance(&self, _store: &ContentStore) -> String {
        self.title.clone()
    }
}

fn stage_slot(store: &ContentStore, stage: &Stage, base: String, is_filters_slot: bool) -> String {
    let mut out = base;
    if stage.title.is_empty() {
        if !is_filters_slot && stage.filters_id.is_some() {
            out.push_str(", filters");
        }
        if stage.is_optional {
            out.push_str(", optional");
        }
        if stage.time_pause.filter(|t| *t != 0.0).is_some() {
            out.push_str(", time pause");
        }
    }
    out.push_str(&format!("({})", store.relation_count(Stage::TYPE, stage.id)));
    out
}

/// Stage description body, `None` when no payload slot is filled.
///
/// The effects slot wins; otherwise the first filled slot in
/// place-filters, lock, plan-set-filters, pause, filters order decides
/// the text.
pub(super) fn stage(store: &ContentStore, stage: &Stage) -> Option<String> {
    let title = (!stage.title.is_empty()).then_some(stage.title.as_str());

    if let Some(effects) = stage.effects_id.and_then(|id| store.plan_effects.get(id)) {
        let mut out = format!("{}({}): ", PlanEffects::TYPE, effects.id);
        match title {
            Some(t) => out.push_str(t),
            None => out.push_str(&effects.describe_instance(store)),
        }
        if title.is_none() {
            if stage.filters_plan_set_id.is_some() {
                out.push_str(", updatable");
            }
            if stage.filters_id.is_some() {
                out.push_str(", filtered");
            }
            if stage.is_optional {
                out.push_str(", optional");
            }
        }
        out.push_str(&format!("({})", store.relation_count(Stage::TYPE, stage.id)));
        return Some(out);
    }

    let named = LabelOptions {
        with_name: true,
        with_count: false,
        title,
    };
    if let Some(row) = stage
        .filters_place_id
        .and_then(|id| store.plan_place_filters.get(id))
    {
        return Some(stage_slot(store, stage, label_with(store, row, named), false));
    }
    if let Some(row) = stage.lock_id.and_then(|id| store.plan_locks.get(id)) {
        return Some(stage_slot(store, stage, label_with(store, row, named), false));
    }
    if let Some(row) = stage
        .filters_plan_set_id
        .and_then(|id| store.plan_set_filters.get(id))
    {
        return Some(stage_slot(store, stage, label_with(store, row, named), false));
    }
    if let Some(row) = stage.plan_pause_id.and_then(|id| store.plan_pauses.get(id)) {
        return Some(stage_slot(store, stage, label_with(store, row, named), false));
    }
    if let Some(row) = stage.filters_id.and_then(|id| store.plan_filters.get(id)) {
        return Some(stage_slot(store, stage, label_with(store, row, named), true));
    }
    None
}

impl Describe for Stage {
    fn describe_instance(&self, store: &ContentStore) -> String {
        stage(store, self).unwrap_or_else(|| "empty".to_string())
    }
}

impl Describe for PlanFilters {
    fn describe_instance(&self, store: &ContentStore) -> String {
        let mut items = Vec::new();
        let first = self
            .first_character_id
            .and_then(|id| store.character_data_filters.get(id));
        let second = self
            .second_character_id
            .and_then(|id| store.character_data_filters.get(id));
        if first.is_some() || second.is_some() {
            let mut pair = String::new();
            if let Some(row) = first {
                pair.push_str(&label_with(store, row, BARE));
            }
            if first.is_some() && second.is_some() {
                pair.push_str(if self.is_group { " > " } else { " | " });
            }
            if let Some(row) = second {
                pair.push_str(&label_with(store, row, BARE));
            }
            items.push(pair);
        }
        if let Some(t) = self.time_from {
            items.push(format!("from {t}"));
        }
        if let Some(t) = self.time_to {
            items.push(format!("to {t}"));
        }
        if let Some(t) = self.time_min {
            items.push(format!("min: {t}"));
        }
        if let Some(t) = self.time_max {
            items.push(format!("max: {t}"));
        }
        items.join(" ")
    }
}

impl Describe for PlanEffectsSet {
    fn describe_instance(&self, _store: &ContentStore) -> String {
        self.title.clone()
    }
}

impl Describe for PlanEffects {
    fn describe_instance(&self, store: &ContentStore) -> String {
        let first = self
            .first_character_id
            .and_then(|id| store.plan_effects_sets.get(id));
        let second = self
            .second_character_id
            .and_then(|id| store.plan_effects_sets.get(id));
        match (first, second) {
            (Some(first), Some(second)) => format!(
                "{} > {}",
                label_with(store, first, BARE),
                label_with(store, second, BARE)
            ),
            (Some(first), None) => label_with(store, first, BARE),
            (None, Some(second)) => format!("second: {}", label_with(store, second, BARE)),
            (None, None) => String::new(),
        }
    }
}

impl Describe for PlanSetFilters {
    fn describe_instance(&self, store: &ContentStore) -> String {
        let first = self
            .first_character_id
            .and_then(|id| store.character_data_plan_filters.get(id));
        let second = self
            .second_character_id
            .and_then(|id| store.character_data_plan_filters.get(id));
        let mut out = String::new();
        if let Some(row) = first {
            out.push_str(&label_with(store, row, BARE));
        }
        if let Some(row) = second {
            out.push_str(if first.is_some() { " > " } else { "second: " });
            out.push_str(&label_with(store, row, BARE));
        }
        if out.is_empty() {
            "empty".to_string()
        } else {
            out
        }
    }
}

impl Describe for PlanPlaceFilters {
    fn describe_instance(&self, _store: &ContentStore) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        let items: Vec<String> = self
            .filters
            .conditions
            .iter()
            .map(|c| place_filter_desc(&c.raw, &c.value))
            .collect();
        let mut out = items.join("__");
        if let Some(distance) = self.max_distance.filter(|d| *d != 0) {
            out.push_str(&format!(", {distance}km"));
        }
        if self.is_random {
            out.push_str(", random");
        }
        if self.is_nearest {
            out.push_str(", nearest");
        }
        if self.is_teleportation {
            out.push_str(", teleportation");
        }
        out
    }
}

impl Describe for PlanLock {
    fn describe_instance(&self, _store: &ContentStore) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        let mut items = Vec::new();
        for (name, filters) in [("lock", &self.close_filters), ("unlock", &self.open_filters)] {
            let parts: Vec<String> = filters
                .conditions
                .iter()
                .map(|c| place_filter_desc(&c.raw, &c.value))
                .collect();
            if !parts.is_empty() {
                items.push(format!("{}_{}", name, parts.join("_")));
            }
        }
        items.join(", ")
    }
}

impl Describe for PlanPause {
    fn describe_instance(&self, _store: &ContentStore) -> String {
        let mut items = Vec::new();
        for (data, letter) in [(&self.first, 'f'), (&self.second, 's')] {
            let parts: Vec<String> = data
                .iter()
                .map(|(title, pause)| format!("{}_{}", title, plain(pause)))
                .collect();
            if !parts.is_empty() {
                items.push(format!("{letter}: {}", parts.join("__")));
            }
        }
        items.join(", ")
    }
}

impl Describe for Character {
    fn describe_instance(&self, _store: &ContentStore) -> String {
        self.full_name()
    }
}

/// `H:MM:SS` with a day count prefix past 24 hours.
fn elapsed_text(seconds: u32) -> String {
    let days = seconds / 86_400;
    let rest = seconds % 86_400;
    let (h, m, s) = (rest / 3600, rest % 3600 / 60, rest % 60);
    if days == 1 {
        format!("1 day, {h}:{m:02}:{s:02}")
    } else if days > 1 {
        format!("{days} days, {h}:{m:02}:{s:02}")
    } else {
        format!("{h}:{m:02}:{s:02}")
    }
}

impl Describe for EventLog {
    fn describe_instance(&self, store: &ContentStore) -> String {
        let title = |id: Option<u32>| {
            id.and_then(|id| store.characters.get(id))
                .map(|c| c.title.clone())
                .unwrap_or_default()
        };
        let second = self
            .second_character_id
            .and_then(|id| store.characters.get(id))
            .map(|c| format!("({})", c.title))
            .unwrap_or_default();
        let plan = self
            .plan_id
            .and_then(|id| store.plans.get(id))
            .map(|p| p.title.clone())
            .unwrap_or_default();
        format!(
            "{}: {}{} - {}",
            elapsed_text(self.timestamp),
            title(self.first_character_id),
            second,
            plan
        )
    }
}

impl Describe for PlanData {
    fn describe_instance(&self, store: &ContentStore) -> String {
        let title = |id: u32| {
            store
                .characters
                .get(id)
                .map(|c| c.title.clone())
                .unwrap_or_default()
        };
        match self.second_character_id {
            Some(second) => format!("{} and {}", title(self.first_character_id), title(second)),
            None => title(self.first_character_id),
        }
    }
}

impl Describe for CharacterRelationship {
    fn describe_instance(&self, store: &ContentStore) -> String {
        let name = |id: u32| {
            store
                .characters
                .get(id)
                .map(Character::full_name)
                .unwrap_or_default()
        };
        format!(
            "Relation: {} > {} = {}",
            name(self.from_character_id),
            name(self.to_character_id),
            self.value
        )
    }
}

impl Describe for Faction {
    fn describe_instance(&self, _store: &ContentStore) -> String {
        self.title.clone()
    }
}

impl Describe for FactionRelationship {
    fn describe_instance(&self, store: &ContentStore) -> String {
        let title = |id: u32| {
            store
                .factions
                .get(id)
                .map(|f| f.title.clone())
                .unwrap_or_default()
        };
        format!(
            "Relation: {} > {} = {}",
            title(self.from_faction_id),
            title(self.to_faction_id),
            self.value
        )
    }
}

impl Describe for Place {
    fn describe_instance(&self, _store: &ContentStore) -> String {
        self.title.clone()
    }
}

impl Describe for Settlement {
    fn describe_instance(&self, _store: &ContentStore) -> String {
        self.title.clone()
    }
}

impl Describe for PlaceTransition {
    fn describe_instance(&self, store: &ContentStore) -> String {
        let name = |id: u32| {
            store
                .places
                .get(id)
                .map(|p| p.name.clone())
                .unwrap_or_default()
        };
        format!(
            "{} > {} | {} km",
            name(self.from_place_id),
            name(self.to_place_id),
            float_text(self.distance)
        )
    }
}

impl Describe for SettlementPosition {
    fn describe_instance(&self, _store: &ContentStore) -> String {
        self.title.clone()
    }
}
