//! Declarative descriptor tables for every concrete entity type.
//!
//! Field order matches the persisted column order (primary key first, then
//! declaration order). Bounds mirror the store-enforced validators; the
//! 100-1000 range is the game's qualitative attribute scale.

use std::sync::OnceLock;

use serde_json::json;

use super::{EntityDescriptor, FieldDef};

fn character_data_filters() -> EntityDescriptor {
    EntityDescriptor::new(
        "CharacterDataFilters",
        "main_characterdatafilters",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::bool("is_interrupting", false),
            FieldDef::json("filters"),
            FieldDef::json("plan_points_mods"),
            FieldDef::json("acceptance_points_base"),
            FieldDef::json("acceptance_points_mods"),
            FieldDef::int("faction_opinion_min").bounds(100.0, 1000.0),
            FieldDef::int("faction_opinion_max").bounds(100.0, 1000.0),
            FieldDef::int("relationships_min").bounds(100.0, 1000.0),
            FieldDef::int("relationships_max").bounds(100.0, 1000.0),
            FieldDef::int("acceptance_points_min").bounds(100.0, 1000.0),
            FieldDef::int("acceptance_points_max").bounds(100.0, 1000.0),
            FieldDef::float("acceptance_points_mod_value").max(10.0),
        ],
    )
}

fn character_data_effects() -> EntityDescriptor {
    EntityDescriptor::new(
        "CharacterDataEffects",
        "main_characterdataeffects",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::json("effects"),
            FieldDef::json("effects_max"),
            FieldDef::json("effects_mods"),
            FieldDef::float("effects_mods_value").max(10.0),
            FieldDef::json("effects_place_mods"),
            FieldDef::json("settlement_effects"),
            FieldDef::json("settlement_effects_max"),
            FieldDef::json("place_settlement_effects"),
            FieldDef::json("place_settlement_effects_max"),
            FieldDef::json("needs_mods"),
            FieldDef::float("relationships_effects"),
            FieldDef::uint("relationships_effects_max"),
            FieldDef::uint("relationships_effects_min"),
        ],
    )
}

fn character_data_plan_filters() -> EntityDescriptor {
    EntityDescriptor::new(
        "CharacterDataPlanFilters",
        "main_characterdataplanfilters",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::json("filters"),
            FieldDef::bool("is_random_weighted", false),
        ],
    )
}

fn plan() -> EntityDescriptor {
    EntityDescriptor::new(
        "Plan",
        "main_plan",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::str("name"),
            FieldDef::bool("is_char_available", false),
            FieldDef::bool("is_player_available", false),
            FieldDef::bool("is_encounter", false),
            FieldDef::bool("is_route", false),
            FieldDef::bool("is_ask_player", true),
            FieldDef::bool("is_always_pause", false),
            FieldDef::bool("is_first_pause", true),
            FieldDef::bool("is_second_pause", false),
            FieldDef::bool("is_break_second", false),
            FieldDef::bool("is_important_event", false),
            FieldDef::bool("is_ignore_event", false),
            FieldDef::float("time_pause"),
            FieldDef::int("min_points")
                .bounds(100.0, 1000.0)
                .default(json!(101)),
            FieldDef::str("on_finish_first").default(json!("next_stage")),
            FieldDef::str("on_finish_second"),
            FieldDef::str("event_desc"),
            FieldDef::str("ask_player_desc"),
            FieldDef::str("beginning_text"),
            FieldDef::relation("filters", "PlanFilters").related("plan_filters"),
            FieldDef::relation("one", "Stage").related("stage_one"),
            FieldDef::relation("two", "Stage").related("stage_two"),
            FieldDef::relation("three", "Stage").related("stage_three"),
            FieldDef::relation("four", "Stage").related("stage_four"),
            FieldDef::relation("five", "Stage").related("stage_five"),
        ],
    )
}

fn stage() -> EntityDescriptor {
    EntityDescriptor::new(
        "Stage",
        "main_stage",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::relation("effects", "PlanEffects"),
            FieldDef::relation("filters", "PlanFilters"),
            FieldDef::relation("filters_plan_set", "PlanSetFilters"),
            FieldDef::relation("filters_place", "PlanPlaceFilters"),
            FieldDef::relation("lock", "PlanLock"),
            FieldDef::relation("plan_pause", "PlanPause"),
            FieldDef::bool("is_optional", false),
            FieldDef::float("time_pause"),
        ],
    )
}

fn plan_filters() -> EntityDescriptor {
    EntityDescriptor::new(
        "PlanFilters",
        "main_planfilters",
        vec![
            FieldDef::id(),
            FieldDef::relation("first_character", "CharacterDataFilters")
                .related("plan_filters_first_character"),
            FieldDef::relation("second_character", "CharacterDataFilters")
                .related("plan_filters_second_character"),
            FieldDef::time("time_from"),
            FieldDef::uint("time_from_seconds"),
            FieldDef::time("time_to"),
            FieldDef::uint("time_to_seconds"),
            FieldDef::time("time_min"),
            FieldDef::uint("time_min_seconds"),
            FieldDef::time("time_max"),
            FieldDef::uint("time_max_seconds"),
            FieldDef::bool("is_time_points", false),
            FieldDef::bool("is_group", true),
        ],
    )
}

fn plan_effects_set() -> EntityDescriptor {
    EntityDescriptor::new(
        "PlanEffectsSet",
        "main_planeffectsset",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::relation("one", "CharacterDataEffects").related("effects_set_one"),
            FieldDef::relation("two", "CharacterDataEffects").related("effects_set_two"),
            FieldDef::relation("three", "CharacterDataEffects").related("effects_set_three"),
            FieldDef::relation("four", "CharacterDataEffects").related("effects_set_four"),
            FieldDef::relation("five", "CharacterDataEffects").related("effects_set_five"),
        ],
    )
}

fn plan_effects() -> EntityDescriptor {
    EntityDescriptor::new(
        "PlanEffects",
        "main_planeffects",
        vec![
            FieldDef::id(),
            FieldDef::relation("first_character", "PlanEffectsSet")
                .related("plan_effects_set_first_character"),
            FieldDef::relation("second_character", "PlanEffectsSet")
                .related("plan_effects_set_second_character"),
            FieldDef::bool("is_instant", false),
        ],
    )
}

fn plan_set_filters() -> EntityDescriptor {
    EntityDescriptor::new(
        "PlanSetFilters",
        "main_plansetfilters",
        vec![
            FieldDef::id(),
            FieldDef::relation("first_character", "CharacterDataPlanFilters")
                .related("plan_filters_first"),
            FieldDef::relation("second_character", "CharacterDataPlanFilters")
                .related("plan_filters_second"),
        ],
    )
}

fn plan_place_filters() -> EntityDescriptor {
    EntityDescriptor::new(
        "PlanPlaceFilters",
        "main_planplacefilters",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::bool("is_random", false),
            FieldDef::bool("is_nearest", false),
            FieldDef::bool("is_teleportation", false),
            FieldDef::uint("distance_penalty").default(json!(10)),
            FieldDef::json("filters"),
            FieldDef::json("attrs_importance"),
            FieldDef::uint("max_distance"),
        ],
    )
}

fn plan_lock() -> EntityDescriptor {
    EntityDescriptor::new(
        "PlanLock",
        "main_planlock",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::json("close_filters"),
            FieldDef::json("open_filters"),
        ],
    )
}

fn plan_pause() -> EntityDescriptor {
    EntityDescriptor::new(
        "PlanPause",
        "main_planpause",
        vec![
            FieldDef::id(),
            FieldDef::json("first"),
            FieldDef::json("second"),
        ],
    )
}

fn character() -> EntityDescriptor {
    let attr = |name| FieldDef::int(name).bounds(100.0, 1000.0);
    EntityDescriptor::new(
        "Character",
        "main_character",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::bool("is_original", true),
            FieldDef::bool("is_chained", false),
            FieldDef::bool("is_clone", false),
            FieldDef::str("color_name").default(json!("FFFFFF")),
            FieldDef::str("first_name"),
            FieldDef::str("last_name"),
            FieldDef::str("gender").default(json!("male")),
            FieldDef::str("kind").default(json!("human")),
            FieldDef::str("skin_color").default(json!("white")),
            FieldDef::str("hair_color").default(json!("black")),
            FieldDef::str("hairstyle").default(json!("short")),
            FieldDef::str("bio"),
            FieldDef::relation("plan_data", "PlanData"),
            FieldDef::relation("place", "Place"),
            FieldDef::relation("settlement", "Settlement"),
            FieldDef::relation("position", "SettlementPosition"),
            FieldDef::relation("faction", "Faction").default(json!(2)),
            FieldDef::many_to_many(
                "relationships",
                "Character",
                "CharacterRelationship",
                "from_character_id",
                "to_character_id",
            ),
            FieldDef::uint("gold").default(json!(100)),
            attr("health").default(json!(1000)),
            attr("energy").default(json!(1000)),
            attr("sleep").default(json!(1000)),
            attr("mood").default(json!(500)),
            attr("fighting").default(json!(100)),
            attr("magic").default(json!(100)),
            attr("intelligence").default(json!(500)),
            attr("pride").default(json!(500)),
        ],
    )
}

fn event_log() -> EntityDescriptor {
    EntityDescriptor::new(
        "EventLog",
        "main_eventlog",
        vec![
            FieldDef::id(),
            FieldDef::bool("is_important", false),
            FieldDef::uint("timestamp"),
            FieldDef::relation("plan", "Plan"),
            FieldDef::relation("first_character", "Character").related("event_log_first_character"),
            FieldDef::relation("second_character", "Character")
                .related("event_log_second_character"),
            FieldDef::relation("place", "Place"),
        ],
    )
}

fn plan_data() -> EntityDescriptor {
    EntityDescriptor::new(
        "PlanData",
        "main_plandata",
        vec![
            FieldDef::id(),
            FieldDef::relation("plan", "Plan"),
            FieldDef::str("plan_stage").default(json!("one")),
            FieldDef::relation("first_character", "Character").related("plan_data_first_character"),
            FieldDef::relation("second_character", "Character")
                .related("plan_data_second_character"),
            FieldDef::relation("first_previous", "PlanData").related("plan_data_first_previous"),
            FieldDef::relation("second_previous", "PlanData").related("plan_data_second_previous"),
            FieldDef::relation("first_route", "Route").related("plan_data_first_route"),
            FieldDef::relation("second_route", "Route").related("plan_data_second_route"),
        ],
    )
}

fn character_relationship() -> EntityDescriptor {
    EntityDescriptor::new(
        "CharacterRelationship",
        "main_characterrelationship",
        vec![
            FieldDef::id(),
            FieldDef::relation("from_character", "Character")
                .related("relationship_from_character"),
            FieldDef::relation("to_character", "Character").related("relationship_to_character"),
            FieldDef::int("value").bounds(100.0, 1000.0).default(json!(500)),
        ],
    )
}

fn faction() -> EntityDescriptor {
    EntityDescriptor::new(
        "Faction",
        "main_faction",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::str("name"),
            FieldDef::many_to_many(
                "relationships",
                "Faction",
                "FactionRelationship",
                "from_faction_id",
                "to_faction_id",
            ),
        ],
    )
}

fn faction_relationship() -> EntityDescriptor {
    EntityDescriptor::new(
        "FactionRelationship",
        "main_factionrelationship",
        vec![
            FieldDef::id(),
            FieldDef::relation("from_faction", "Faction").related("relationship_from_faction"),
            FieldDef::relation("to_faction", "Faction").related("relationship_to_faction"),
            FieldDef::int("value").bounds(100.0, 1000.0).default(json!(500)),
        ],
    )
}

fn route() -> EntityDescriptor {
    EntityDescriptor::new(
        "Route",
        "main_route",
        vec![
            FieldDef::id(),
            FieldDef::relation("first_character", "Character").related("route_first_character"),
            FieldDef::relation("second_character", "Character").related("route_character_second"),
            FieldDef::relation("start_place", "Place").related("route_start_place"),
            FieldDef::bool("is_targeted", false),
            FieldDef::float("route_distance").default(json!(0.0)),
            FieldDef::float("distance_passed").default(json!(0.0)),
            FieldDef::json("places"),
            FieldDef::str("status").default(json!("in_progress")),
        ],
    )
}

fn place() -> EntityDescriptor {
    EntityDescriptor::new(
        "Place",
        "main_place",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::str("name"),
            FieldDef::bool("is_locked", false),
            FieldDef::str("place_type").default(json!("region")),
            FieldDef::relation("settlement", "Settlement"),
            FieldDef::relation("owner", "Character").related("place_owner"),
            FieldDef::int("beauty").bounds(100.0, 1000.0).default(json!(500)),
            FieldDef::int("fertility")
                .bounds(100.0, 1000.0)
                .default(json!(100)),
            FieldDef::int("safety").bounds(100.0, 1000.0).default(json!(1000)),
            FieldDef::uint("population").default(json!(0)),
            FieldDef::json("lock_filters"),
        ],
    )
}

fn settlement() -> EntityDescriptor {
    EntityDescriptor::new(
        "Settlement",
        "main_settlement",
        vec![
            FieldDef::id(),
            FieldDef::str("title"),
            FieldDef::uint("gold").default(json!(1000)),
            FieldDef::many_to_many(
                "positions",
                "SettlementPosition",
                "Settlement_positions",
                "settlement_id",
                "settlementposition_id",
            ),
            FieldDef::bool("is_positions_set_required", false),
        ],
    )
}

fn settlement_positions_join() -> EntityDescriptor {
    EntityDescriptor::join(
        "Settlement_positions",
        "main_settlement_positions",
        vec![
            FieldDef::id(),
            FieldDef::relation("settlement", "Settlement"),
            FieldDef::relation("settlementposition", "SettlementPosition"),
        ],
    )
}

fn place_transition() -> EntityDescriptor {
    EntityDescriptor::new(
        "PlaceTransition",
        "main_placetransition",
        vec![
            FieldDef::id(),
            FieldDef::relation("from_place", "Place").related("from_place"),
            FieldDef::relation("to_place", "Place").related("to_place"),
            FieldDef::float("distance").default(json!(1)),
        ],
    )
}

fn settlement_position() -> EntityDescriptor {
    EntityDescriptor::new(
        "SettlementPosition",
        "main_settlementposition",
        vec![
            FieldDef::id(),
            FieldDef::bool("is_voting", false),
            FieldDef::str("title"),
            FieldDef::str("name"),
            FieldDef::str("name_female"),
            FieldDef::str("description"),
            FieldDef::json("character_filters"),
            FieldDef::json("points_mods"),
            FieldDef::int("value").bounds(100.0, 1000.0).default(json!(500)),
            FieldDef::uint("min_number").default(json!(1)),
            FieldDef::uint("max_number"),
            FieldDef::float("population_ratio")
                .bounds(0.0, 1.0)
                .default(json!(0.0)),
        ],
    )
}

static DESCRIPTORS: OnceLock<Vec<EntityDescriptor>> = OnceLock::new();

/// All entity descriptors, sorted by type name (the export walks them in
/// this order so join-table documents land before their owners overwrite
/// them with the full form).
pub fn descriptors() -> &'static [EntityDescriptor] {
    DESCRIPTORS.get_or_init(|| {
        let mut all = vec![
            character_data_filters(),
            character_data_effects(),
            character_data_plan_filters(),
            plan(),
            stage(),
            plan_filters(),
            plan_effects_set(),
            plan_effects(),
            plan_set_filters(),
            plan_place_filters(),
            plan_lock(),
            plan_pause(),
            character(),
            event_log(),
            plan_data(),
            character_relationship(),
            faction(),
            faction_relationship(),
            route(),
            place(),
            settlement(),
            settlement_positions_join(),
            place_transition(),
            settlement_position(),
        ];
        all.sort_by_key(|d| d.name);
        all
    })
}

/// Look up a descriptor by entity type name.
pub fn descriptor(name: &str) -> Option<&'static EntityDescriptor> {
    descriptors().iter().find(|d| d.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_relation_targets_a_declared_entity() {
        for desc in descriptors() {
            for field in &desc.fields {
                if let crate::schema::FieldKind::Relation { target } = field.kind {
                    assert!(
                        descriptor(target).is_some(),
                        "{}.{} targets undeclared entity {}",
                        desc.name,
                        field.name,
                        target
                    );
                }
            }
        }
    }

    #[test]
    fn test_relation_columns_use_id_suffix() {
        let character = descriptor("Character").unwrap();
        assert_eq!(character.field("place").unwrap().column(), "place_id");
        assert_eq!(character.field("gold").unwrap().column(), "gold");
    }

    #[test]
    fn test_descriptors_sorted_by_name() {
        let names: Vec<_> = descriptors().iter().map(|d| d.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_character_attribute_bounds() {
        let character = descriptor("Character").unwrap();
        let health = character.field("health").unwrap();
        assert_eq!(health.min, Some(100.0));
        assert_eq!(health.max, Some(1000.0));
        let gold = character.field("gold").unwrap();
        assert_eq!(gold.min, Some(0.0));
        assert_eq!(gold.max, None);
    }
}
