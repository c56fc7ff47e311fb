//! Characters, factions and the event/route records that tie them together.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::Id;
use crate::model::impl_row;

/// An NPC or the player character.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub id: Id,
    pub title: String,
    pub is_original: bool,
    pub is_chained: bool,
    /// Clones never write back to their original.
    pub is_clone: bool,
    /// Dialog name color, hex without the hash.
    pub color_name: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub kind: String,
    pub skin_color: String,
    pub hair_color: String,
    pub hairstyle: String,
    pub bio: String,
    pub plan_data_id: Option<Id>,
    pub place_id: Option<Id>,
    pub settlement_id: Option<Id>,
    pub position_id: Option<Id>,
    pub faction_id: Id,
    pub gold: u32,
    pub health: i64,
    pub energy: i64,
    pub sleep: i64,
    pub mood: i64,
    pub fighting: i64,
    pub magic: i64,
    pub intelligence: i64,
    pub pride: i64,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            is_original: true,
            is_chained: false,
            is_clone: false,
            color_name: "FFFFFF".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            gender: "male".to_string(),
            kind: "human".to_string(),
            skin_color: "white".to_string(),
            hair_color: "black".to_string(),
            hairstyle: "short".to_string(),
            bio: String::new(),
            plan_data_id: None,
            place_id: None,
            settlement_id: None,
            position_id: None,
            faction_id: 2,
            gold: 100,
            health: 1000,
            energy: 1000,
            sleep: 1000,
            mood: 500,
            fighting: 100,
            magic: 100,
            intelligence: 500,
            pride: 500,
        }
    }
}

impl_row!(Character, "Character");

impl Character {
    /// Display name: first name, plus the last name when set.
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Directed opinion of one character about another.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRelationship {
    pub id: Id,
    pub from_character_id: Id,
    pub to_character_id: Id,
    pub value: i64,
}

impl Default for CharacterRelationship {
    fn default() -> Self {
        Self {
            id: 0,
            from_character_id: 0,
            to_character_id: 0,
            value: 500,
        }
    }
}

impl_row!(CharacterRelationship, "CharacterRelationship");

/// Timeline record of one executed plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventLog {
    pub id: Id,
    pub is_important: bool,
    /// Simulation seconds since world start.
    pub timestamp: u32,
    pub plan_id: Option<Id>,
    pub first_character_id: Option<Id>,
    pub second_character_id: Option<Id>,
    pub place_id: Option<Id>,
}

impl_row!(EventLog, "EventLog");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Faction {
    pub id: Id,
    pub title: String,
    pub name: String,
}

impl_row!(Faction, "Faction");

/// Directed opinion between factions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionRelationship {
    pub id: Id,
    pub from_faction_id: Id,
    pub to_faction_id: Id,
    pub value: i64,
}

impl Default for FactionRelationship {
    fn default() -> Self {
        Self {
            id: 0,
            from_faction_id: 0,
            to_faction_id: 0,
            value: 500,
        }
    }
}

impl_row!(FactionRelationship, "FactionRelationship");

/// A path one or two characters walk between places.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    pub id: Id,
    pub first_character_id: Id,
    pub second_character_id: Option<Id>,
    pub start_place_id: Option<Id>,
    /// Single viable destination; disables bypassing a locked place.
    pub is_targeted: bool,
    pub route_distance: f64,
    pub distance_passed: f64,
    pub places: Value,
    pub status: String,
}

impl Default for Route {
    fn default() -> Self {
        Self {
            id: 0,
            first_character_id: 0,
            second_character_id: None,
            start_place_id: None,
            is_targeted: false,
            route_distance: 0.0,
            distance_passed: 0.0,
            places: Value::Object(Default::default()),
            status: "in_progress".to_string(),
        }
    }
}

impl_row!(Route, "Route");
