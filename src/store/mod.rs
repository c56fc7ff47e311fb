//! The content store.
//!
//! One in-memory table per entity type, persisted as a single JSON
//! snapshot. Writes go through the `save_*`/`delete_*` methods: they run
//! the entity's save-time validation, apply relational side effects and
//! fire the post-write notification that invalidates the description
//! cache.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::config::config;
use crate::core::error::{ForgeError, Result};
use crate::core::types::Id;
use crate::model::{
    Character, CharacterDataEffects, CharacterDataFilters, CharacterDataPlanFilters,
    CharacterRelationship, EventLog, Faction, FactionRelationship, Place, PlaceTransition, Plan,
    PlanData, PlanEffects, PlanEffectsSet, PlanFilters, PlanLock, PlanPause, PlanPlaceFilters,
    PlanSetFilters, Row, Route, Settlement, SettlementPosition, SettlementPositionLink, Stage,
};
use crate::render::cache::{DescriptionCache, MemoryCache};
use crate::schema::entities::descriptors;
use crate::schema::registry::schemas;

/// Rows of one entity type with auto-assigned ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Table<T> {
    rows: BTreeMap<Id, T>,
    next_id: Id,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Row> Table<T> {
    /// Insert or replace a row. A zero id means a new row; it gets the
    /// next free id assigned.
    pub fn upsert(&mut self, mut row: T) -> Id {
        let id = if row.id() == 0 {
            let id = self.next_id;
            row.set_id(id);
            id
        } else {
            row.id()
        };
        self.next_id = self.next_id.max(id + 1);
        self.rows.insert(id, row);
        id
    }

    pub fn get(&self, id: Id) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub fn remove(&mut self, id: Id) -> Option<T> {
        self.rows.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// All authored content plus the shared description cache.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStore {
    pub character_data_filters: Table<CharacterDataFilters>,
    pub character_data_effects: Table<CharacterDataEffects>,
    pub character_data_plan_filters: Table<CharacterDataPlanFilters>,
    pub plans: Table<Plan>,
    pub stages: Table<Stage>,
    pub plan_filters: Table<PlanFilters>,
    pub plan_effects_sets: Table<PlanEffectsSet>,
    pub plan_effects: Table<PlanEffects>,
    pub plan_set_filters: Table<PlanSetFilters>,
    pub plan_place_filters: Table<PlanPlaceFilters>,
    pub plan_locks: Table<PlanLock>,
    pub plan_pauses: Table<PlanPause>,
    pub characters: Table<Character>,
    pub event_logs: Table<EventLog>,
    pub plan_data: Table<PlanData>,
    pub character_relationships: Table<CharacterRelationship>,
    pub factions: Table<Faction>,
    pub faction_relationships: Table<FactionRelationship>,
    pub routes: Table<Route>,
    pub places: Table<Place>,
    pub settlements: Table<Settlement>,
    pub settlement_positions: Table<SettlementPosition>,
    pub settlement_position_links: Table<SettlementPositionLink>,
    pub place_transitions: Table<PlaceTransition>,

    #[serde(skip)]
    descriptions: MemoryCache,
}

fn table_values<T: Serialize>(table: &Table<T>) -> Result<Vec<Value>> {
    table
        .rows
        .values()
        .map(|row| serde_json::to_value(row).map_err(Into::into))
        .collect()
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let store: Self = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "loaded store snapshot");
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        debug!(path = %path.display(), "saved store snapshot");
        Ok(())
    }

    pub fn descriptions(&self) -> &MemoryCache {
        &self.descriptions
    }

    /// Post-write hook: drop every cached description, then eagerly
    /// re-render stages so list views stay warm.
    pub fn notify_write(&self) {
        self.descriptions.clear();
        if config().warm_stage_descriptions {
            for stage in self.stages.iter() {
                crate::render::stage_description(self, stage);
            }
        }
    }

    /// Serialized rows of the named entity type, in id order.
    pub fn rows_json(&self, type_name: &str) -> Result<Vec<Value>> {
        match type_name {
            "CharacterDataFilters" => table_values(&self.character_data_filters),
            "CharacterDataEffects" => table_values(&self.character_data_effects),
            "CharacterDataPlanFilters" => table_values(&self.character_data_plan_filters),
            "Plan" => table_values(&self.plans),
            "Stage" => table_values(&self.stages),
            "PlanFilters" => table_values(&self.plan_filters),
            "PlanEffectsSet" => table_values(&self.plan_effects_sets),
            "PlanEffects" => table_values(&self.plan_effects),
            "PlanSetFilters" => table_values(&self.plan_set_filters),
            "PlanPlaceFilters" => table_values(&self.plan_place_filters),
            "PlanLock" => table_values(&self.plan_locks),
            "PlanPause" => table_values(&self.plan_pauses),
            "Character" => table_values(&self.characters),
            "EventLog" => table_values(&self.event_logs),
            "PlanData" => table_values(&self.plan_data),
            "CharacterRelationship" => table_values(&self.character_relationships),
            "Faction" => table_values(&self.factions),
            "FactionRelationship" => table_values(&self.faction_relationships),
            "Route" => table_values(&self.routes),
            "Place" => table_values(&self.places),
            "Settlement" => table_values(&self.settlements),
            "SettlementPosition" => table_values(&self.settlement_positions),
            "Settlement_positions" => table_values(&self.settlement_position_links),
            "PlaceTransition" => table_values(&self.place_transitions),
            other => Err(ForgeError::NotFound(format!("unknown entity type: {other}"))),
        }
    }

    /// Count of rows anywhere in the store holding a foreign key pointing
    /// at the given entity.
    pub fn relation_count(&self, type_name: &str, id: Id) -> usize {
        let id_value = Value::from(id);
        let mut count = 0;
        for desc in descriptors() {
            let columns: Vec<String> = desc
                .fields
                .iter()
                .filter(|f| {
                    matches!(&f.kind, crate::schema::FieldKind::Relation { target } if *target == type_name)
                })
                .map(|f| f.column())
                .collect();
            if columns.is_empty() {
                continue;
            }
            let Ok(rows) = self.rows_json(desc.name) else {
                continue;
            };
            for row in &rows {
                for column in &columns {
                    if row.get(column) == Some(&id_value) {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    pub fn plan_titles(&self) -> Vec<&str> {
        self.plans.iter().map(|p| p.title.as_str()).collect()
    }

    // Character writes keep place populations current.

    pub fn save_character(&mut self, character: Character) -> Id {
        let previous_place = self
            .characters
            .get(character.id())
            .and_then(|existing| existing.place_id);
        if previous_place != character.place_id {
            if let Some(place) = previous_place.and_then(|id| self.places.get_mut(id)) {
                place.population = place.population.saturating_sub(1);
            }
            if let Some(place) = character.place_id.and_then(|id| self.places.get_mut(id)) {
                place.population += 1;
            }
        }
        let id = self.characters.upsert(character);
        self.notify_write();
        id
    }

    pub fn delete_character(&mut self, id: Id) -> Option<Character> {
        let character = self.characters.remove(id)?;
        if let Some(place) = character.place_id.and_then(|id| self.places.get_mut(id)) {
            place.population = place.population.saturating_sub(1);
        }
        self.notify_write();
        Some(character)
    }

    pub fn save_place(&mut self, place: Place) -> Result<Id> {
        place.validate(schemas())?;
        let id = self.places.upsert(place);
        self.notify_write();
        Ok(id)
    }

    pub fn save_plan(&mut self, plan: Plan) -> Id {
        let id = self.plans.upsert(plan);
        self.notify_write();
        id
    }

    /// Delete a plan and scrub its id from every plan-selection filter's
    /// `id` and `id__in` conditions.
    pub fn delete_plan(&mut self, id: Id) -> Option<Plan> {
        let plan = self.plans.remove(id)?;
        let id_value = Value::from(id);
        for row in self.character_data_plan_filters.iter_mut() {
            row.filters
                .retain(|c| !(c.raw == "id" && c.value == id_value));
            for condition in row.filters.conditions.iter_mut() {
                if condition.raw == "id__in" {
                    if let Value::Array(items) = &mut condition.value {
                        items.retain(|v| *v != id_value);
                    }
                }
            }
        }
        self.notify_write();
        Some(plan)
    }

    pub fn save_stage(&mut self, stage: Stage) -> Id {
        let id = self.stages.upsert(stage);
        self.notify_write();
        id
    }

    pub fn save_character_data_filters(&mut self, row: CharacterDataFilters) -> Result<Id> {
        row.validate(schemas())?;
        let id = self.character_data_filters.upsert(row);
        self.notify_write();
        Ok(id)
    }

    pub fn save_character_data_effects(&mut self, row: CharacterDataEffects) -> Result<Id> {
        row.validate(schemas())?;
        let id = self.character_data_effects.upsert(row);
        self.notify_write();
        Ok(id)
    }

    pub fn save_character_data_plan_filters(
        &mut self,
        row: CharacterDataPlanFilters,
    ) -> Result<Id> {
        row.validate(schemas())?;
        let id = self.character_data_plan_filters.upsert(row);
        self.notify_write();
        Ok(id)
    }

    /// Derives the `*_seconds` columns before storing.
    pub fn save_plan_filters(&mut self, mut row: PlanFilters) -> Id {
        row.derive_seconds();
        let id = self.plan_filters.upsert(row);
        self.notify_write();
        id
    }

    pub fn save_plan_set_filters(&mut self, row: PlanSetFilters) -> Result<Id> {
        row.validate()?;
        let id = self.plan_set_filters.upsert(row);
        self.notify_write();
        Ok(id)
    }

    pub fn save_plan_place_filters(&mut self, row: PlanPlaceFilters) -> Result<Id> {
        row.validate(schemas())?;
        let id = self.plan_place_filters.upsert(row);
        self.notify_write();
        Ok(id)
    }

    pub fn save_plan_lock(&mut self, row: PlanLock) -> Result<Id> {
        row.validate(schemas())?;
        let id = self.plan_locks.upsert(row);
        self.notify_write();
        Ok(id)
    }

    pub fn save_plan_pause(&mut self, row: PlanPause) -> Result<Id> {
        row.validate(&self.plan_titles())?;
        let id = self.plan_pauses.upsert(row);
        self.notify_write();
        Ok(id)
    }

    pub fn save_settlement_position(&mut self, row: SettlementPosition) -> Result<Id> {
        row.validate(schemas())?;
        let id = self.settlement_positions.upsert(row);
        self.notify_write();
        Ok(id)
    }

    /// Store a transition together with its mirror edge. Each (from, to)
    /// pair exists at most once; both directions share one distance.
    pub fn upsert_transition(&mut self, transition: PlaceTransition) -> Id {
        let (from, to, distance) = (
            transition.from_place_id,
            transition.to_place_id,
            transition.distance,
        );
        let mut id = transition.id;
        if id == 0 {
            id = self
                .place_transitions
                .iter()
                .find(|t| t.from_place_id == from && t.to_place_id == to)
                .map(|t| t.id)
                .unwrap_or(0);
        }
        let id = self.place_transitions.upsert(PlaceTransition { id, ..transition });
        let mirror = self
            .place_transitions
            .iter()
            .find(|t| t.from_place_id == to && t.to_place_id == from)
            .map(|t| t.id);
        match mirror {
            Some(mirror_id) => {
                if let Some(existing) = self.place_transitions.get_mut(mirror_id) {
                    existing.distance = distance;
                }
            }
            None => {
                self.place_transitions.upsert(PlaceTransition {
                    id: 0,
                    from_place_id: to,
                    to_place_id: from,
                    distance,
                });
            }
        }
        self.notify_write();
        id
    }

    /// Delete a transition and its mirror edge.
    pub fn delete_transition(&mut self, id: Id) -> Option<PlaceTransition> {
        let transition = self.place_transitions.remove(id)?;
        let mirror = self
            .place_transitions
            .iter()
            .find(|t| {
                t.from_place_id == transition.to_place_id
                    && t.to_place_id == transition.from_place_id
            })
            .map(|t| t.id);
        if let Some(mirror_id) = mirror {
            self.place_transitions.remove(mirror_id);
        }
        self.notify_write();
        Some(transition)
    }

    /// Link a settlement to a position unless already linked.
    pub fn link_position(&mut self, settlement_id: Id, position_id: Id) -> Id {
        let existing = self
            .settlement_position_links
            .iter()
            .find(|l| l.settlement_id == settlement_id && l.settlementposition_id == position_id)
            .map(|l| l.id);
        if let Some(id) = existing {
            return id;
        }
        let id = self.settlement_position_links.upsert(SettlementPositionLink {
            id: 0,
            settlement_id,
            settlementposition_id: position_id,
        });
        self.notify_write();
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upsert_assigns_sequential_ids() {
        let mut table: Table<Faction> = Table::default();
        let a = table.upsert(Faction::default());
        let b = table.upsert(Faction::default());
        assert_eq!((a, b), (1, 2));
        assert_eq!(table.get(2).map(|f| f.id), Some(2));
    }

    #[test]
    fn test_upsert_with_explicit_id_bumps_counter() {
        let mut table: Table<Faction> = Table::default();
        table.upsert(Faction {
            id: 10,
            ..Default::default()
        });
        let next = table.upsert(Faction::default());
        assert_eq!(next, 11);
    }

    #[test]
    fn test_character_save_updates_population() {
        let mut store = ContentStore::new();
        let place = store
            .save_place(Place {
                title: "square".to_string(),
                ..Default::default()
            })
            .unwrap();
        let char_id = store.save_character(Character {
            title: "mira".to_string(),
            place_id: Some(place),
            ..Default::default()
        });
        assert_eq!(store.places.get(place).unwrap().population, 1);

        let mut character = store.characters.get(char_id).unwrap().clone();
        character.place_id = None;
        store.save_character(character);
        assert_eq!(store.places.get(place).unwrap().population, 0);
    }

    #[test]
    fn test_delete_plan_scrubs_filters() {
        let mut store = ContentStore::new();
        let stage = store.save_stage(Stage::default());
        let plan_id = store.save_plan(Plan {
            title: "relax".to_string(),
            one_id: stage,
            ..Default::default()
        });
        store
            .save_character_data_plan_filters(CharacterDataPlanFilters {
                filters: crate::dsl::FilterExpr::from_value(&json!({
                    "id": plan_id,
                    "id__in": [plan_id, 99],
                    "is_char_available": true
                }))
                .unwrap(),
                ..Default::default()
            })
            .unwrap();

        store.delete_plan(plan_id);
        let row = store.character_data_plan_filters.get(1).unwrap();
        assert_eq!(row.filters.get("id"), None);
        assert_eq!(row.filters.get("id__in"), Some(&json!([99])));
        assert_eq!(row.filters.get("is_char_available"), Some(&json!(true)));
    }

    #[test]
    fn test_transitions_mirrored() {
        let mut store = ContentStore::new();
        let a = store.save_place(Place::default()).unwrap();
        let b = store.save_place(Place::default()).unwrap();
        let id = store.upsert_transition(PlaceTransition {
            from_place_id: a,
            to_place_id: b,
            distance: 0.5,
            ..Default::default()
        });
        assert_eq!(store.place_transitions.len(), 2);

        let same = store.upsert_transition(PlaceTransition {
            from_place_id: a,
            to_place_id: b,
            distance: 0.7,
            ..Default::default()
        });
        assert_eq!(same, id);
        assert_eq!(store.place_transitions.len(), 2);
        assert!(store
            .place_transitions
            .iter()
            .all(|t| (t.distance - 0.7).abs() < f64::EPSILON));

        store.delete_transition(id);
        assert!(store
            .place_transitions
            .iter()
            .all(|t| !(t.from_place_id == a && t.to_place_id == b)));
    }

    #[test]
    fn test_relation_count() {
        let mut store = ContentStore::new();
        let place = store.save_place(Place::default()).unwrap();
        store.save_character(Character {
            place_id: Some(place),
            ..Default::default()
        });
        store.save_character(Character {
            place_id: Some(place),
            ..Default::default()
        });
        assert_eq!(store.relation_count("Place", place), 2);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut store = ContentStore::new();
        store.save_character(Character {
            title: "mira".to_string(),
            ..Default::default()
        });
        let json = serde_json::to_string(&store).unwrap();
        let restored: ContentStore = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.characters.len(), 1);
        assert_eq!(restored.characters.get(1).unwrap().title, "mira");
    }
}
