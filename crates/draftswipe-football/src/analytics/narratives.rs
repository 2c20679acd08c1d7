// Narrative insights built from aggregate preference stats.

use serde::Serialize;

use super::archetypes::GmArchetype;
use super::{AggregateStats, PlayerRef};

/// Players named as examples in a narrative.
const MAX_EXAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeKind {
    Personality,
    Strategy,
    Contrarian,
    RiskProfile,
}

/// Declared high-to-low so the derived ordering sorts high first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativePriority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub kind: NarrativeKind,
    pub priority: NarrativePriority,
    pub title: String,
    pub text: String,
    /// Names of players that illustrate the point.
    pub examples: Vec<String>,
}

fn names(players: &[PlayerRef]) -> Vec<String> {
    players.iter().take(MAX_EXAMPLES).map(|p| p.name.clone()).collect()
}

fn scope_phrase(stats: &AggregateStats) -> String {
    match stats.scope {
        Some(pos) => format!("{pos} "),
        None => String::new(),
    }
}

fn personality(stats: &AggregateStats, archetype: &GmArchetype) -> Narrative {
    if stats.distribution.rated == 0 {
        return Narrative {
            kind: NarrativeKind::Personality,
            priority: NarrativePriority::Medium,
            title: "No ratings yet".into(),
            text: format!(
                "Swipe through some {}players to build a draft profile.",
                scope_phrase(stats)
            ),
            examples: Vec::new(),
        };
    }
    Narrative {
        kind: NarrativeKind::Personality,
        priority: NarrativePriority::High,
        title: format!("{} {}", archetype.icon, archetype.name),
        text: format!(
            "{} Across {} rated {}players you loved {:.1}% and passed on {:.1}%.",
            archetype.description,
            stats.distribution.rated,
            scope_phrase(stats),
            stats.distribution.love_pct,
            stats.distribution.pass_pct
        ),
        examples: names(&stats.loved),
    }
}

fn strategy(stats: &AggregateStats) -> Option<Narrative> {
    if stats.elite_total() >= 3 {
        return Some(Narrative {
            kind: NarrativeKind::Strategy,
            priority: NarrativePriority::High,
            title: "Front-load the stars".into(),
            text: format!(
                "You like {} elite-scoring players; plan to spend early picks or big auction dollars on them.",
                stats.elite_total()
            ),
            examples: names(&stats.elite_players),
        });
    }
    if stats.cheap_likes.len() >= 3 {
        return Some(Narrative {
            kind: NarrativeKind::Strategy,
            priority: NarrativePriority::Medium,
            title: "Late-round value".into(),
            text: format!(
                "{} of your targets cost ${} or less; you can wait and still land them.",
                stats.cheap_likes.len(),
                stats.cheap_max_auction
            ),
            examples: names(&stats.cheap_likes),
        });
    }
    let team = stats.top_team.as_ref().filter(|t| t.liked >= 3)?;
    Some(Narrative {
        kind: NarrativeKind::Strategy,
        priority: NarrativePriority::Medium,
        title: format!("Stacking {}", team.team),
        text: format!(
            "{} of your liked players play for {}; a stack there raises your weekly ceiling.",
            team.liked, team.team
        ),
        examples: Vec::new(),
    })
}

fn contrarian(stats: &AggregateStats) -> Option<Narrative> {
    if stats.passed_elites.is_empty() {
        return None;
    }
    let n = stats.passed_elites.len();
    Some(Narrative {
        kind: NarrativeKind::Contrarian,
        priority: if n >= 2 {
            NarrativePriority::High
        } else {
            NarrativePriority::Medium
        },
        title: "Fading the consensus".into(),
        text: format!(
            "You passed on {n} elite-scoring {}player{}; others will draft them early, so your board thins out differently.",
            scope_phrase(stats),
            if n == 1 { "" } else { "s" }
        ),
        examples: names(&stats.passed_elites),
    })
}

fn risk_profile(stats: &AggregateStats) -> Option<Narrative> {
    if stats.rookie_likes.len() >= 2 {
        return Some(Narrative {
            kind: NarrativeKind::RiskProfile,
            priority: NarrativePriority::Medium,
            title: "High-variance board".into(),
            text: format!(
                "{} rookies are on your list; expect a wide range of outcomes.",
                stats.rookie_likes.len()
            ),
            examples: names(&stats.rookie_likes),
        });
    }
    if !stats.sleepers.is_empty() {
        return Some(Narrative {
            kind: NarrativeKind::RiskProfile,
            priority: NarrativePriority::Medium,
            title: "Sleeper radar".into(),
            text: "You love some players projected well below their position's average; they're cheap, but not safe.".into(),
            examples: names(&stats.sleepers),
        });
    }
    if stats.premium_likes.len() >= 3 {
        return Some(Narrative {
            kind: NarrativeKind::RiskProfile,
            priority: NarrativePriority::Medium,
            title: "Paying for certainty".into(),
            text: format!(
                "{} of your targets cost ${} or more; a safe floor, but little budget left for depth.",
                stats.premium_likes.len(),
                stats.premium_min_auction
            ),
            examples: names(&stats.premium_likes),
        });
    }
    None
}

/// Build narratives, ordered by priority and then by whether examples are
/// attached, and truncated to `count`.
pub fn generate_narratives(
    stats: &AggregateStats,
    archetype: &GmArchetype,
    count: usize,
) -> Vec<Narrative> {
    let mut narratives = vec![personality(stats, archetype)];
    narratives.extend(strategy(stats));
    narratives.extend(contrarian(stats));
    narratives.extend(risk_profile(stats));

    narratives.sort_by_key(|n| (n.priority, n.examples.is_empty()));
    narratives.truncate(count);
    narratives
}
