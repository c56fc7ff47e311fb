//! Pairwise relationship seeding from character attributes.

use tracing::{debug, info};

use crate::model::CharacterRelationship;
use crate::store::ContentStore;

/// Opinion contribution of one attribute pair, in -500..500.
///
/// Both above the midpoint pulls together, both below bonds over shared
/// misery at a weaker rate, and a split pushes apart by the distance
/// between the two values. The second character's attribute weighs three
/// times the first's.
pub fn get_opinion(first: f64, second: f64) -> f64 {
    let opinion = if first > 500.0 && second > 500.0 {
        (first * 0.5 + second * 1.5) - 1000.0
    } else if first < 500.0 && second < 500.0 {
        1000.0 - (first * 0.5 + second * 1.5)
    } else if (first > 500.0 && second < 500.0) || (first < 500.0 && second > 500.0) {
        -(first - second).abs()
    } else {
        return 0.0;
    };
    opinion / 2.0
}

/// Recompute every directed relationship between original characters.
///
/// Opinions start at 500 and shift by intelligence and pride affinity,
/// clamped to the 100-1000 attribute scale. Existing rows only change
/// when the computed value differs. Returns (created, updated).
pub fn seed_relationships(store: &mut ContentStore) -> (usize, usize) {
    let characters: Vec<_> = store
        .characters
        .iter()
        .filter(|c| c.is_original)
        .map(|c| (c.id, c.intelligence as f64, c.pride as f64, c.title.clone()))
        .collect();

    let mut created = 0;
    let mut updated = 0;
    for (from_id, from_int, from_pride, from_title) in &characters {
        for (to_id, to_int, to_pride, to_title) in &characters {
            if from_id == to_id {
                continue;
            }

            let mut opinion = 500.0;
            opinion += get_opinion(*from_int, *to_int) * 0.2;
            opinion += get_opinion(*from_pride, *to_pride) * 0.2;
            let opinion = (opinion.clamp(100.0, 1000.0)).trunc() as i64;
            debug!(from = %from_title, to = %to_title, opinion, "seeded opinion");

            let existing = store
                .character_relationships
                .iter()
                .find(|r| r.from_character_id == *from_id && r.to_character_id == *to_id)
                .map(|r| (r.id, r.value));
            match existing {
                Some((_, value)) if value == opinion => {}
                Some((id, _)) => {
                    if let Some(row) = store.character_relationships.get_mut(id) {
                        row.value = opinion;
                    }
                    updated += 1;
                }
                None => {
                    store.character_relationships.upsert(CharacterRelationship {
                        id: 0,
                        from_character_id: *from_id,
                        to_character_id: *to_id,
                        value: opinion,
                    });
                    created += 1;
                }
            }
        }
    }

    info!(created, updated, "seeded relationships");
    store.notify_write();
    (created, updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Character;

    #[test]
    fn test_opinion_both_high() {
        // (800 * 0.5 + 900 * 1.5 - 1000) / 2
        assert_eq!(get_opinion(800.0, 900.0), 375.0);
    }

    #[test]
    fn test_opinion_both_low() {
        // (1000 - (200 * 0.5 + 300 * 1.5)) / 2
        assert_eq!(get_opinion(200.0, 300.0), 225.0);
    }

    #[test]
    fn test_opinion_split() {
        assert_eq!(get_opinion(800.0, 200.0), -300.0);
        assert_eq!(get_opinion(200.0, 800.0), -300.0);
    }

    #[test]
    fn test_opinion_midpoint_neutral() {
        assert_eq!(get_opinion(500.0, 900.0), 0.0);
        assert_eq!(get_opinion(300.0, 500.0), 0.0);
    }

    #[test]
    fn test_seed_creates_directed_pairs() {
        let mut store = ContentStore::new();
        for (intelligence, pride) in [(800, 800), (200, 200), (500, 500)] {
            store.characters.upsert(Character {
                intelligence,
                pride,
                ..Default::default()
            });
        }
        store.characters.upsert(Character {
            is_original: false,
            ..Default::default()
        });

        let (created, updated) = seed_relationships(&mut store);
        assert_eq!(created, 6);
        assert_eq!(updated, 0);

        // split pair: 500 + 2 * (-300 * 0.2) = 380
        let row = store
            .character_relationships
            .iter()
            .find(|r| r.from_character_id == 1 && r.to_character_id == 2)
            .unwrap();
        assert_eq!(row.value, 380);

        let rerun = seed_relationships(&mut store);
        assert_eq!(rerun, (0, 0));
    }
}
