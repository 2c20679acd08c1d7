// Round-by-round draft plan.
//
// Maps the user's preferences onto every round of a snake draft. Each round
// scores the target pool around its estimated draft slot, keeps the best few
// players per relevant position, ranks those positions and then greedily
// "drafts" the top one so later rounds see the updated roster needs.

pub mod estimate;
pub mod pool;

use std::collections::{BTreeMap, HashMap, HashSet};

use draftswipe_core::config::Config;
use draftswipe_core::{PerPosition, Position, PreferenceMap, Rating, SKILL_POSITIONS};
use serde::Serialize;
use tracing::debug;

use crate::player::{round2, PlayerRecord};
use crate::tiers::{Tier, TierIndex};

use self::estimate::{estimate_rounds, snake_pick_number, EstimatedPlayer};
use self::pool::assemble_target_pool;

/// Players listed per recommendation.
pub const MAX_TARGETS: usize = 3;
/// Recommendations kept per round.
pub const MAX_RECOMMENDATIONS: usize = 4;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetPlayer {
    pub id: String,
    pub name: String,
    pub team: String,
    pub fantasy_pts: f64,
    pub vorp: f64,
    pub estimated_round: u32,
    pub rating: Option<Rating>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub position: Position,
    pub reason: String,
    /// Best candidates first, at most `MAX_TARGETS`.
    pub targets: Vec<TargetPlayer>,
    pub priority: f64,
    /// Quality label of the lead target's tier.
    pub tier: Option<String>,
    pub tier_break: bool,
    pub chasm: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTarget {
    pub round: u32,
    pub pick_number: usize,
    pub strategy: String,
    pub recommendations: Vec<Recommendation>,
}

// ---------------------------------------------------------------------------
// Round filters and scoring
// ---------------------------------------------------------------------------

/// Positions worth considering in a round given what has been drafted.
///
/// Through round 8: RB and WR always, TE from round 3 until one is drafted,
/// QB from round 5 until one is drafted. After round 8: all four.
pub fn relevant_positions(round: u32, drafted: &PerPosition<usize>) -> Vec<Position> {
    if round > 8 {
        return SKILL_POSITIONS.to_vec();
    }
    let mut positions = vec![Position::RunningBack, Position::WideReceiver];
    if round >= 3 && drafted.te == 0 {
        positions.push(Position::TightEnd);
    }
    if round >= 5 && drafted.qb == 0 {
        positions.push(Position::Quarterback);
    }
    positions
}

fn need_unmet(position: Position, drafted: &PerPosition<usize>, config: &Config) -> bool {
    drafted.get(position) < config.draft.starter_needs.get(position)
}

/// Candidate score for a player in a given round.
fn score_candidate(
    est: &EstimatedPlayer<'_>,
    round: u32,
    prefs: &PreferenceMap,
    drafted: &PerPosition<usize>,
    config: &Config,
) -> f64 {
    let w = &config.draft.weights;
    let league_size = config.league.league_size.max(1) as f64;
    let player = est.player;

    let mut score = prefs.weight(&player.id) as f64 * w.preference;
    score += (est.adp_equivalent / league_size - round as f64) * w.adp_value;
    if need_unmet(player.position, drafted, config) {
        score += w.need_bonus;
    }
    if round <= w.elite_max_round && player.fantasy_pts > w.elite_points {
        score += w.elite_bonus;
    }
    if round > est.estimated_round {
        score -= (round - est.estimated_round) as f64 * w.late_penalty;
    }
    let early = est.estimated_round.saturating_sub(round);
    if early > 1 {
        score -= early as f64 * w.reach_penalty;
    }
    round2(score)
}

// ---------------------------------------------------------------------------
// Tier context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct TierContext {
    label: Option<String>,
    /// The lead target is the last liked/loved player left in its tier.
    tier_break: bool,
    chasm: bool,
}

fn tier_context(
    player: &PlayerRecord,
    index: &TierIndex<'_>,
    prefs: &PreferenceMap,
    drafted_ids: &HashSet<String>,
) -> TierContext {
    let Some(tier) = index.tier_of(&player.id) else {
        return TierContext::default();
    };
    TierContext {
        label: Some(tier.label.clone()),
        tier_break: prefs.is_positive(&player.id) && is_last_liked(tier, player, prefs, drafted_ids),
        chasm: tier.chasm,
    }
}

fn is_last_liked(
    tier: &Tier,
    player: &PlayerRecord,
    prefs: &PreferenceMap,
    drafted_ids: &HashSet<String>,
) -> bool {
    !tier.players.iter().any(|other| {
        other.id != player.id && !drafted_ids.contains(&other.id) && prefs.is_positive(&other.id)
    })
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

fn preference_phrase(player: &PlayerRecord, rating: Option<Rating>) -> String {
    match rating {
        Some(Rating::Love) => format!("you love {}", player.name),
        Some(Rating::Like) => format!("you like {}", player.name),
        Some(Rating::Meh) => format!("{} is a fallback option", player.name),
        Some(Rating::Pass) => format!("you passed on {}", player.name),
        None => format!("{} is unrated but projects well", player.name),
    }
}

fn build_reason(
    round: u32,
    lead: &PlayerRecord,
    rating: Option<Rating>,
    ctx: &TierContext,
    need_open: bool,
) -> String {
    let pos = lead.position.display_str();
    let phase = if ctx.tier_break {
        let label = ctx.label.as_deref().unwrap_or("current");
        format!("Tier break: last of your targets in the {label} {pos} tier")
    } else if round <= 3 {
        format!("Early-round {pos} anchor")
    } else if round >= 11 {
        format!("Late-round {pos} depth")
    } else {
        format!("Mid-round {pos} value")
    };
    let need = if need_open {
        format!("fills a starting {pos} slot")
    } else {
        format!("starting {pos} need already met")
    };

    let mut reason = format!("{phase}: {}; {need}.", preference_phrase(lead, rating));
    if ctx.chasm {
        reason.push_str(" Steep drop-off after this tier.");
    }
    reason
}

fn build_strategy(
    round: u32,
    pick: usize,
    recommendations: &[Recommendation],
    drafted: &PerPosition<usize>,
    config: &Config,
) -> String {
    let Some(top) = recommendations.first() else {
        return format!("Round {round}: no targets project here; take the best player available.");
    };
    let pos = top.position.display_str();
    let name = top.targets.first().map(|t| t.name.as_str()).unwrap_or("the best available");
    let starters_set = SKILL_POSITIONS
        .iter()
        .all(|p| !need_unmet(*p, drafted, config));

    if starters_set {
        format!("Round {round}: starters are set; chase upside at {pos} with {name}.")
    } else if top.tier_break {
        format!("Round {round}: the {pos} tier is about to break; grab {name} at pick {pick}.")
    } else if round <= 3 {
        format!("Round {round}: build the core with a {pos}; {name} leads the board.")
    } else if round >= 12 {
        format!("Round {round}: depth and upside; {name} fits at {pos}.")
    } else {
        format!("Round {round}: lean {pos}; {name} is the best fit at pick {pick}.")
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Build the round-by-round plan.
///
/// League size, draft slot and the number of rounds come from
/// `config.league`. Exactly `rounds` entries are returned, in order, each
/// with a strategy line; rounds with no candidates have no recommendations.
pub fn generate_round_targets(
    players: &[PlayerRecord],
    prefs: &PreferenceMap,
    tiers: &BTreeMap<Position, Vec<Tier>>,
    config: &Config,
) -> Vec<RoundTarget> {
    let league_size = config.league.league_size;
    let window = config.draft.round_window;

    let pool = assemble_target_pool(players, prefs, &config.draft);
    let pool_ids: HashSet<&str> = pool.iter().map(|p| p.id.as_str()).collect();
    let candidates: Vec<EstimatedPlayer<'_>> = estimate_rounds(players, config)
        .into_iter()
        .filter(|est| pool_ids.contains(est.player.id.as_str()))
        .collect();
    let tier_index = TierIndex::new(tiers);

    debug!(
        "planning {} rounds from a pool of {} players ({} rated)",
        config.league.rounds,
        candidates.len(),
        prefs.len()
    );

    let mut drafted: PerPosition<usize> = PerPosition::default();
    let mut drafted_ids: HashSet<String> = HashSet::new();
    let mut plan = Vec::with_capacity(config.league.rounds as usize);

    for round in 1..=config.league.rounds {
        let pick_number = snake_pick_number(round, league_size, config.league.draft_slot);

        let in_window: Vec<&EstimatedPlayer<'_>> = candidates
            .iter()
            .filter(|est| !drafted_ids.contains(&est.player.id))
            .filter(|est| est.estimated_round.abs_diff(round) <= window)
            .collect();

        let mut scored_by_position: HashMap<Position, Vec<(f64, &EstimatedPlayer<'_>)>> =
            HashMap::new();
        for est in &in_window {
            let score = score_candidate(est, round, prefs, &drafted, config);
            scored_by_position
                .entry(est.player.position)
                .or_default()
                .push((score, *est));
        }

        let mut recommendations: Vec<(Recommendation, f64)> = Vec::new();
        for position in relevant_positions(round, &drafted) {
            let Some(mut scored) = scored_by_position.remove(&position) else {
                continue;
            };
            scored.sort_by(|a, b| {
                b.0.partial_cmp(&a.0)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| {
                        b.1.player
                            .fantasy_pts
                            .partial_cmp(&a.1.player.fantasy_pts)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .then_with(|| a.1.player.id.cmp(&b.1.player.id))
            });
            let window_count = scored.len();
            scored.truncate(MAX_TARGETS);

            let lead = scored[0].1.player;
            let lead_score = scored[0].0;
            let rating = prefs.get(&lead.id);
            let ctx = tier_context(lead, &tier_index, prefs, &drafted_ids);
            let need_open = need_unmet(position, &drafted, config);

            let w = &config.draft.weights;
            let mut priority = 0.0;
            if need_open {
                priority += w.need_bonus;
            }
            if ctx.tier_break {
                priority += w.tier_break_bonus;
            }
            if ctx.chasm {
                priority += w.chasm_bonus;
            }
            priority += match window_count {
                0..=3 => w.scarce_bonus,
                4..=6 => w.thin_bonus,
                _ => 0.0,
            };

            let targets = scored
                .iter()
                .map(|(score, est)| TargetPlayer {
                    id: est.player.id.clone(),
                    name: est.player.name.clone(),
                    team: est.player.team.clone(),
                    fantasy_pts: est.player.fantasy_pts,
                    vorp: est.player.vorp,
                    estimated_round: est.estimated_round,
                    rating: prefs.get(&est.player.id),
                    score: *score,
                })
                .collect();

            recommendations.push((
                Recommendation {
                    position,
                    reason: build_reason(round, lead, rating, &ctx, need_open),
                    targets,
                    priority,
                    tier: ctx.label.clone(),
                    tier_break: ctx.tier_break,
                    chasm: ctx.chasm,
                },
                lead_score,
            ));
        }

        recommendations.sort_by(|a, b| {
            b.0.priority
                .partial_cmp(&a.0.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
        });
        let recommendations: Vec<Recommendation> = recommendations
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|(rec, _)| rec)
            .collect();

        let strategy = build_strategy(round, pick_number, &recommendations, &drafted, config);

        if let Some(top) = recommendations.first() {
            *drafted.get_mut(top.position) += 1;
            if let Some(target) = top.targets.first() {
                drafted_ids.insert(target.id.clone());
            }
        }

        plan.push(RoundTarget {
            round,
            pick_number,
            strategy,
            recommendations,
        });
    }

    plan
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
