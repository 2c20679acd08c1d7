// Positional tier building.
//
// Players at a position are walked in VORP order and cut into tiers wherever
// value falls off a cliff, a tier grows too large, or a natural roster break
// is reached. Each tier gets summary statistics, a quality label, chasm
// detection and a draft recommendation shaped by the user's ratings.

use std::collections::{BTreeMap, HashMap};

use draftswipe_core::config::{Config, TierConfig};
use draftswipe_core::{Position, PreferenceMap, Rating};
use serde::Serialize;

use crate::draft_flow::estimate::round_span_label;
use crate::player::{by_vorp_desc, round2, PlayerRecord};

// ---------------------------------------------------------------------------
// Tier types
// ---------------------------------------------------------------------------

/// How strongly a tier should be targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TierPriority {
    Low,
    Medium,
    High,
}

/// Expected auction cost range for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: u32,
    pub avg: f64,
    pub max: u32,
}

/// Advice attached to a tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierRecommendation {
    pub priority: TierPriority,
    pub strategy: String,
    /// Round hint from the position-rank table, e.g. "Rounds 2-4".
    pub timing: String,
}

/// A contiguous block of similarly valued players at one position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tier {
    pub position: Position,
    /// 0-based tier number within the position.
    pub index: usize,
    pub label: String,
    /// Players in descending VORP order.
    pub players: Vec<PlayerRecord>,
    pub avg_vorp: f64,
    pub min_vorp: f64,
    pub max_vorp: f64,
    pub avg_points: f64,
    pub min_points: f64,
    pub max_points: f64,
    pub price: PriceRange,
    /// VORP drop from this tier's last player to the next tier's first.
    pub gap_to_next: Option<f64>,
    /// True when `gap_to_next` is at least `chasm_multiplier * cliff`.
    pub chasm: bool,
    /// True for the terminal tier of sub-basement players.
    pub basement: bool,
    pub liked_count: usize,
    pub loved_count: usize,
    pub recommendation: TierRecommendation,
}

impl Tier {
    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }
}

/// Quality labels by tier number. Tiers beyond the list reuse the last label.
fn quality_labels(position: Position) -> &'static [&'static str] {
    match position {
        Position::Quarterback => &["Elite", "QB1", "Low QB1", "QB2", "Streamer", "Backup"],
        Position::RunningBack => &[
            "Elite", "RB1", "High RB2", "Low RB2", "Flex", "Depth", "Handcuff",
        ],
        Position::WideReceiver => &[
            "Elite", "WR1", "High WR2", "Low WR2", "WR3", "Flex", "Depth",
        ],
        Position::TightEnd => &["Elite", "TE1", "Low TE1", "Streamer", "Backup"],
        Position::Kicker => &["Top K", "Solid K", "Streamer"],
        Position::Defense => &["Top DST", "Solid DST", "Streamer"],
    }
}

pub fn quality_label(position: Position, index: usize) -> &'static str {
    let labels = quality_labels(position);
    labels[index.min(labels.len() - 1)]
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Index range of one tier within a position's sorted player list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TierSpan {
    start: usize,
    end: usize,
    basement: bool,
}

/// Cut a VORP-sorted list into tier spans.
///
/// Rules, checked for each player after the first in the current tier:
/// 1. A player at or below the basement VORP ends the current tier, and that
///    player plus everything after forms one terminal tier.
/// 2. Once the tier holds `min_size` players, it breaks on a drop larger
///    than the cliff, on reaching `max_size`, or at a natural break index
///    after at least two tiers have already been emitted.
/// 3. Before `min_size`, only a chasm-sized drop
///    (`chasm_multiplier * cliff`) breaks the tier.
fn partition(position: Position, players: &[PlayerRecord], cfg: &TierConfig) -> Vec<TierSpan> {
    let min_size = *cfg.min_size.get(position);
    let max_size = *cfg.max_size.get(position);
    let cliff = *cfg.cliff.get(position);
    let chasm_drop = cliff * cfg.chasm_multiplier;
    let breaks = cfg.natural_breaks.get(position);

    let mut spans = Vec::new();
    let mut start = 0;

    for (i, player) in players.iter().enumerate() {
        if player.vorp <= cfg.basement_vorp {
            if i > start {
                spans.push(TierSpan { start, end: i, basement: false });
            }
            spans.push(TierSpan { start: i, end: players.len(), basement: true });
            return spans;
        }
        if i == start {
            continue;
        }

        let size = i - start;
        let drop = players[i - 1].vorp - player.vorp;
        let cut = if size >= min_size {
            drop > cliff || size >= max_size || (breaks.contains(&i) && spans.len() >= 2)
        } else {
            drop >= chasm_drop
        };

        if cut {
            spans.push(TierSpan { start, end: i, basement: false });
            start = i;
        }
    }

    if start < players.len() {
        spans.push(TierSpan { start, end: players.len(), basement: false });
    }
    spans
}

// ---------------------------------------------------------------------------
// Tier assembly
// ---------------------------------------------------------------------------

/// Build tiers for every position present in `players`.
///
/// Every player appears in exactly one tier. Within a position, tiers are in
/// descending value order: each tier's minimum VORP is at least the next
/// tier's maximum.
pub fn build_tiers(
    players: &[PlayerRecord],
    prefs: &PreferenceMap,
    config: &Config,
) -> BTreeMap<Position, Vec<Tier>> {
    let mut by_position: BTreeMap<Position, Vec<PlayerRecord>> = BTreeMap::new();
    for p in players {
        by_position.entry(p.position).or_default().push(p.clone());
    }

    by_position
        .into_iter()
        .map(|(position, mut group)| {
            group.sort_by(by_vorp_desc);
            (position, build_position_tiers(position, group, prefs, config))
        })
        .collect()
}

fn build_position_tiers(
    position: Position,
    sorted: Vec<PlayerRecord>,
    prefs: &PreferenceMap,
    config: &Config,
) -> Vec<Tier> {
    let spans = partition(position, &sorted, &config.tiers);
    let chasm_drop = config.tiers.cliff.get(position) * config.tiers.chasm_multiplier;

    let gaps: Vec<Option<f64>> = spans
        .iter()
        .enumerate()
        .map(|(k, span)| {
            spans
                .get(k + 1)
                .map(|next| round2(sorted[span.end - 1].vorp - sorted[next.start].vorp))
        })
        .collect();

    let mut remaining = sorted;
    let mut tiers = Vec::with_capacity(spans.len());
    // Spans are contiguous, so peel them off the front in order.
    for (index, span) in spans.iter().enumerate() {
        let rest = remaining.split_off(span.end - span.start);
        let members = std::mem::replace(&mut remaining, rest);

        let gap_to_next = gaps[index];
        let chasm = gap_to_next.is_some_and(|gap| gap >= chasm_drop);
        tiers.push(summarize(position, index, *span, members, gap_to_next, chasm, prefs, config));
    }
    tiers
}

#[allow(clippy::too_many_arguments)]
fn summarize(
    position: Position,
    index: usize,
    span: TierSpan,
    players: Vec<PlayerRecord>,
    gap_to_next: Option<f64>,
    chasm: bool,
    prefs: &PreferenceMap,
    config: &Config,
) -> Tier {
    let n = players.len().max(1) as f64;
    let vorps = players.iter().map(|p| p.vorp);
    let points = players.iter().map(|p| p.fantasy_pts);
    let prices = players.iter().map(|p| p.auction);

    let label = quality_label(position, index).to_string();
    let liked_count = players.iter().filter(|p| prefs.is_positive(&p.id)).count();
    let loved_count = players
        .iter()
        .filter(|p| prefs.get(&p.id) == Some(Rating::Love))
        .count();

    let timing = if span.basement {
        "Waiver wire".to_string()
    } else {
        round_span_label(position, span.start + 1, span.end, config)
    };
    let (priority, strategy) =
        recommend(position, index, &label, span.basement, chasm, liked_count);

    Tier {
        position,
        index,
        label,
        avg_vorp: round2(vorps.clone().sum::<f64>() / n),
        min_vorp: vorps.clone().fold(f64::INFINITY, f64::min),
        max_vorp: vorps.fold(f64::NEG_INFINITY, f64::max),
        avg_points: round2(points.clone().sum::<f64>() / n),
        min_points: points.clone().fold(f64::INFINITY, f64::min),
        max_points: points.fold(f64::NEG_INFINITY, f64::max),
        price: PriceRange {
            min: prices.clone().min().unwrap_or(0),
            avg: round2(prices.clone().map(f64::from).sum::<f64>() / n),
            max: prices.max().unwrap_or(0),
        },
        gap_to_next,
        chasm,
        basement: span.basement,
        liked_count,
        loved_count,
        recommendation: TierRecommendation {
            priority,
            strategy,
            timing,
        },
        players,
    }
}

fn recommend(
    position: Position,
    index: usize,
    label: &str,
    basement: bool,
    chasm: bool,
    liked: usize,
) -> (TierPriority, String) {
    let pos = position.display_str();
    if basement {
        return (
            TierPriority::Low,
            "Waiver-wire territory; don't spend a pick here.".to_string(),
        );
    }
    match (liked, chasm) {
        (0, true) => (
            TierPriority::Medium,
            format!("The {label} {pos} tier ends at a steep drop-off; rate these players before draft day."),
        ),
        (0, false) if index == 0 => (
            TierPriority::Medium,
            format!("No targets in the {label} {pos} tier yet; swipe through these players."),
        ),
        (0, false) => (
            TierPriority::Low,
            format!("No rated targets in the {label} {pos} tier; fine to let it pass."),
        ),
        (n, true) => (
            TierPriority::High,
            format!("{n} of your targets sit above a steep drop-off; secure one before the {label} {pos} tier empties."),
        ),
        (n, false) if index <= 1 => (
            TierPriority::High,
            format!("Top-of-board {label} {pos} tier with {n} of your targets; worth an early pick."),
        ),
        (n, false) => (
            TierPriority::Medium,
            format!("{n} liked players in the {label} {pos} tier; take one when the value lines up."),
        ),
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Player-id index over a set of tiers.
pub struct TierIndex<'a> {
    by_id: HashMap<&'a str, &'a Tier>,
}

impl<'a> TierIndex<'a> {
    pub fn new(tiers: &'a BTreeMap<Position, Vec<Tier>>) -> Self {
        let by_id = tiers
            .values()
            .flatten()
            .flat_map(|tier| tier.players.iter().map(move |p| (p.id.as_str(), tier)))
            .collect();
        TierIndex { by_id }
    }

    pub fn tier_of(&self, player_id: &str) -> Option<&'a Tier> {
        self.by_id.get(player_id).copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
