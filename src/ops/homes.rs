//! Home construction for un-housed characters.
//!
//! Each non-clone character without one gets a five-room compound (hallway,
//! living room, bedroom, dining, locked entrance) anchored to a street of
//! their settlement, or to a safe wilderness region when they have none.
//! All rooms connect through the hallway; only the owner or someone
//! already inside passes the entrance lock.

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;
use tracing::info;

use crate::core::error::{ForgeError, Result};
use crate::core::types::Id;
use crate::dsl::FilterExpr;
use crate::model::{Place, PlaceTransition};
use crate::store::ContentStore;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

struct Anchor {
    place_id: Id,
    distance: f64,
    title_base: String,
}

fn pick_anchor<R: Rng>(
    store: &ContentStore,
    rng: &mut R,
    char_title: &str,
    settlement_id: Option<Id>,
) -> Result<Anchor> {
    if let Some(settlement_id) = settlement_id {
        let streets: Vec<&Place> = store
            .places
            .iter()
            .filter(|p| p.settlement_id == Some(settlement_id) && p.place_type == "street")
            .collect();
        let street = streets.choose(rng).ok_or_else(|| {
            ForgeError::NotFound(format!("no street to anchor a home for \"{char_title}\""))
        })?;
        let settlement_title = store
            .settlements
            .get(settlement_id)
            .map(|s| s.title.clone())
            .unwrap_or_default();
        return Ok(Anchor {
            place_id: street.id,
            distance: round2(rng.gen_range(0.3..0.7)),
            title_base: format!("{char_title}_{settlement_title}"),
        });
    }

    let regions: Vec<&Place> = store
        .places
        .iter()
        .filter(|p| {
            p.safety >= 500
                && p.beauty >= 300
                && p.settlement_id.is_none()
                && p.place_type == "region"
        })
        .collect();
    let region = regions.choose(rng).ok_or_else(|| {
        ForgeError::NotFound(format!("no region to anchor a home for \"{char_title}\""))
    })?;
    Ok(Anchor {
        place_id: region.id,
        distance: round2(rng.gen_range(0.5..0.9)),
        title_base: format!("{char_title}_{}", region.title),
    })
}

/// Build homes for every character without one. Returns the number built.
pub fn build_homes<R: Rng>(store: &mut ContentStore, rng: &mut R) -> Result<usize> {
    let candidates: Vec<(Id, String, Option<Id>)> = store
        .characters
        .iter()
        .filter(|c| !c.is_clone)
        .map(|c| (c.id, c.title.clone(), c.settlement_id))
        .collect();

    let mut built = 0;
    for (char_id, char_title, settlement_id) in candidates {
        let has_home = store
            .places
            .iter()
            .any(|p| p.owner_id == Some(char_id) && p.place_type == "bedroom");
        if has_home {
            continue;
        }

        let anchor = pick_anchor(store, rng, &char_title, settlement_id)?;
        let room = |title_suffix: &str, name: &str, place_type: &str| Place {
            title: format!("{}_{title_suffix}", anchor.title_base),
            name: name.to_string(),
            place_type: place_type.to_string(),
            owner_id: Some(char_id),
            settlement_id,
            beauty: 600,
            fertility: 100,
            safety: 1000,
            ..Default::default()
        };

        let hallway = store.save_place(room("hallway", "Hallway", "hallway"))?;
        let living = store.save_place(room("living_room", "Living room", "living_room"))?;
        let bedroom = store.save_place(room("bedroom", "Bedroom", "bedroom"))?;
        let dining = store.save_place(room("dining", "Dining", "dining"))?;
        let entrance = store.save_place(Place {
            is_locked: true,
            lock_filters: FilterExpr::from_value(&json!({
                "id__or": char_id,
                "place_id__or": hallway
            }))?,
            ..room("entrance", "Entrance", "entrance")
        })?;

        store.upsert_transition(PlaceTransition {
            from_place_id: anchor.place_id,
            to_place_id: entrance,
            distance: anchor.distance,
            ..Default::default()
        });
        for place in [entrance, living, bedroom, dining] {
            store.upsert_transition(PlaceTransition {
                from_place_id: place,
                to_place_id: hallway,
                distance: round3(rng.gen_range(0.001..0.01)),
                ..Default::default()
            });
        }

        info!(character = %char_title, "built home");
        built += 1;
    }
    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Character;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn wilderness(store: &mut ContentStore) -> Id {
        store
            .save_place(Place {
                title: "green_vale".to_string(),
                place_type: "region".to_string(),
                safety: 800,
                beauty: 500,
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn test_builds_five_rooms_and_transitions() {
        let mut store = ContentStore::new();
        let region = wilderness(&mut store);
        store.characters.upsert(Character {
            title: "mira".to_string(),
            ..Default::default()
        });

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let built = build_homes(&mut store, &mut rng).unwrap();
        assert_eq!(built, 1);
        assert_eq!(store.places.len(), 6);

        let entrance = store
            .places
            .iter()
            .find(|p| p.place_type == "entrance")
            .unwrap();
        assert!(entrance.is_locked);
        assert_eq!(entrance.title, "mira_green_vale_entrance");
        assert_eq!(entrance.lock_filters.get("id__or"), Some(&json!(1)));

        // anchor edge plus four hallway spokes, both directions each
        assert_eq!(store.place_transitions.len(), 10);
        assert!(store
            .place_transitions
            .iter()
            .any(|t| t.from_place_id == region && (0.5..0.9).contains(&t.distance)));

        // second run finds the bedroom and builds nothing
        let built_again = build_homes(&mut store, &mut rng).unwrap();
        assert_eq!(built_again, 0);
    }

    #[test]
    fn test_no_anchor_is_an_error() {
        let mut store = ContentStore::new();
        store.characters.upsert(Character {
            title: "mira".to_string(),
            ..Default::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(build_homes(&mut store, &mut rng).is_err());
    }

    #[test]
    fn test_clones_skipped() {
        let mut store = ContentStore::new();
        wilderness(&mut store);
        store.characters.upsert(Character {
            title: "mira_clone".to_string(),
            is_clone: true,
            ..Default::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(build_homes(&mut store, &mut rng).unwrap(), 0);
    }
}
