//! Place population recompute.

use ahash::AHashMap;
use tracing::info;

use crate::core::types::Id;
use crate::store::ContentStore;

/// Set every place's population to its live character count.
pub fn update_population(store: &mut ContentStore) {
    let mut counts: AHashMap<Id, u32> = AHashMap::new();
    for character in store.characters.iter() {
        if let Some(place_id) = character.place_id {
            *counts.entry(place_id).or_default() += 1;
        }
    }
    for place in store.places.iter_mut() {
        place.population = counts.get(&place.id).copied().unwrap_or(0);
    }
    info!(places = store.places.len(), "updated populations");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Character, Place};

    #[test]
    fn test_populations_match_counts() {
        let mut store = ContentStore::new();
        let a = store.save_place(Place::default()).unwrap();
        let b = store
            .save_place(Place {
                population: 9,
                ..Default::default()
            })
            .unwrap();
        for _ in 0..3 {
            store.characters.upsert(Character {
                place_id: Some(a),
                ..Default::default()
            });
        }

        update_population(&mut store);
        assert_eq!(store.places.get(a).unwrap().population, 3);
        assert_eq!(store.places.get(b).unwrap().population, 0);
    }
}
