// Target-pool assembly for round planning.

use std::collections::HashSet;

use draftswipe_core::config::DraftConfig;
use draftswipe_core::{PreferenceMap, Rating};

use crate::player::{by_points_desc, PlayerRecord};

/// Players worth planning around, in pool order.
///
/// 1. Every skill-position player rated at least "meh".
/// 2. If that is fewer than `min_target_pool`, unrated players are added by
///    fantasy points until the pool reaches the minimum.
/// 3. Unrated players at or above their position's elite cutoff are always
///    added.
///
/// Passed players never enter the pool.
pub fn assemble_target_pool<'a>(
    players: &'a [PlayerRecord],
    prefs: &PreferenceMap,
    draft: &DraftConfig,
) -> Vec<&'a PlayerRecord> {
    let skill = players.iter().filter(|p| p.position.is_skill());

    let mut pool: Vec<&PlayerRecord> = skill
        .clone()
        .filter(|p| prefs.get(&p.id).is_some_and(|r| r >= Rating::Meh))
        .collect();
    let mut included: HashSet<&'a str> = pool.iter().map(|&p| p.id.as_str()).collect();

    let mut unrated: Vec<&PlayerRecord> = skill.filter(|p| prefs.get(&p.id).is_none()).collect();
    unrated.sort_by(|a, b| by_points_desc(a, b));

    for &p in &unrated {
        if pool.len() >= draft.min_target_pool {
            break;
        }
        included.insert(p.id.as_str());
        pool.push(p);
    }

    for p in unrated {
        if p.fantasy_pts >= *draft.elite_cutoffs.get(p.position) && included.insert(p.id.as_str()) {
            pool.push(p);
        }
    }

    pool
}
