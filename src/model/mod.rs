//! The content model: typed rows for every authored entity.
//!
//! Struct field names match the persisted column names (relations carry
//! the `_id` suffix), so a serialized row is exactly the stored and
//! exported object form. Defaults mirror the declared schema defaults.

pub mod character;
pub mod plan;
pub mod world;

pub use character::{
    Character, CharacterRelationship, EventLog, Faction, FactionRelationship, Route,
};
pub use plan::{
    CharacterDataEffects, CharacterDataFilters, CharacterDataPlanFilters, Plan, PlanData,
    PlanEffects, PlanEffectsSet, PlanFilters, PlanLock, PlanPause, PlanPlaceFilters,
    PlanSetFilters, Stage,
};
pub use world::{Place, PlaceTransition, Settlement, SettlementPosition, SettlementPositionLink};

use crate::core::types::Id;

/// A stored row of one entity type.
pub trait Row {
    /// Entity type name, matching the schema descriptor.
    const TYPE: &'static str;

    fn id(&self) -> Id;
    fn set_id(&mut self, id: Id);
}

macro_rules! impl_row {
    ($ty:ty, $name:literal) => {
        impl crate::model::Row for $ty {
            const TYPE: &'static str = $name;

            fn id(&self) -> crate::core::types::Id {
                self.id
            }

            fn set_id(&mut self, id: crate::core::types::Id) {
                self.id = id;
            }
        }
    };
}

pub(crate) use impl_row;
