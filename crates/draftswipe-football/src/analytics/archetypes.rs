// GM archetype tables.
//
// Each table is an ordered list of predicates; the first match wins, so
// order encodes priority. Both tables fall back to the Balanced Builder.

use draftswipe_core::{PreferenceMap, Rating};
use serde::Serialize;

use super::AggregateStats;
use crate::player::PlayerRecord;

type Predicate = fn(&AggregateStats, &[PlayerRecord], &PreferenceMap) -> bool;

/// A behavioral classification of a user's ratings.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GmArchetype {
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    matches: Predicate,
}

impl GmArchetype {
    pub fn matches(&self, stats: &AggregateStats, roster: &[PlayerRecord], prefs: &PreferenceMap) -> bool {
        (self.matches)(stats, roster, prefs)
    }
}

impl PartialEq for GmArchetype {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

pub static BALANCED_BUILDER: GmArchetype = GmArchetype {
    name: "Balanced Builder",
    icon: "⚖️",
    description: "No single obsession: you spread your interest across positions and price points.",
    matches: |_, _, _| true,
};

/// First matching archetype in `table`, or the Balanced Builder.
pub fn classify(
    table: &'static [GmArchetype],
    stats: &AggregateStats,
    roster: &[PlayerRecord],
    prefs: &PreferenceMap,
) -> &'static GmArchetype {
    table
        .iter()
        .find(|a| a.matches(stats, roster, prefs))
        .unwrap_or(&BALANCED_BUILDER)
}

// ---------------------------------------------------------------------------
// Overall (cross-position) archetypes
// ---------------------------------------------------------------------------

pub static OVERALL_ARCHETYPES: &[GmArchetype] = &[
    GmArchetype {
        name: "Zero RB Zealot",
        icon: "🚫",
        description: "You load up on elite receivers and leave running back for later.",
        matches: |s, _, _| {
            s.elite_targets.rb == 0
                && s.elite_targets.wr >= 2
                && s.liked_by_position.wr >= 2 * s.liked_by_position.rb.max(1)
        },
    },
    GmArchetype {
        name: "RB Hoarder",
        icon: "🐂",
        description: "Running backs first, second and often third.",
        matches: |s, _, _| {
            s.liked_by_position.rb >= 5 && s.liked_by_position.rb >= 2 * s.liked_by_position.wr
        },
    },
    GmArchetype {
        name: "Elite TE Believer",
        icon: "🎯",
        description: "You'll pay up for a difference-maker at tight end.",
        matches: |s, _, _| s.elite_targets.te >= 2,
    },
    GmArchetype {
        name: "Rookie Fever",
        icon: "🌱",
        description: "Fresh faces excite you more than proven veterans.",
        matches: |s, _, _| {
            let liked = s.distribution.liked();
            s.rookie_likes.len() >= 3 && s.rookie_likes.len() * 3 >= liked
        },
    },
    GmArchetype {
        name: "Value Hunter",
        icon: "💰",
        description: "Bargains over big names: most of your targets come cheap.",
        matches: |s, _, _| s.cheap_likes.len() >= 5 && s.cheap_likes.len() > 2 * s.premium_likes.len(),
    },
    GmArchetype {
        name: "Stars & Scrubs",
        icon: "⭐",
        description: "A few premium stars surrounded by dollar fliers.",
        matches: |s, _, _| s.premium_likes.len() >= 3 && s.cheap_likes.len() >= 3,
    },
    GmArchetype {
        name: "Contrarian",
        icon: "🔄",
        description: "You fade consensus stars the rest of the room is chasing.",
        matches: |s, _, _| s.passed_elites.len() >= 3,
    },
    GmArchetype {
        name: "Team Stacker",
        icon: "🏟️",
        description: "You trust one offense to carry your roster.",
        matches: |s, _, _| s.top_team.as_ref().is_some_and(|t| t.liked >= 4),
    },
    GmArchetype {
        name: "Picky Drafter",
        icon: "🧐",
        description: "Hard to impress: most players get swiped away.",
        matches: |s, _, _| s.distribution.rated >= 10 && s.distribution.pass_pct >= 60.0,
    },
    GmArchetype {
        name: "Optimist",
        icon: "😄",
        description: "You see upside everywhere and like most of the board.",
        matches: |s, _, _| {
            s.distribution.rated >= 10 && s.distribution.love_pct + s.distribution.like_pct >= 70.0
        },
    },
];

// ---------------------------------------------------------------------------
// Position-specific archetypes
// ---------------------------------------------------------------------------

pub static POSITION_ARCHETYPES: &[GmArchetype] = &[
    GmArchetype {
        name: "Ceiling Chaser",
        icon: "🚀",
        description: "At this position you only want the top of the board.",
        matches: |s, _, _| {
            let elite = s.elite_total();
            elite >= 2 && elite * 2 >= s.distribution.liked()
        },
    },
    GmArchetype {
        name: "Youth Movement",
        icon: "🌱",
        description: "You're betting on rookies to break out here.",
        matches: |s, _, _| s.rookie_likes.len() >= 2,
    },
    GmArchetype {
        name: "Bargain Bin",
        icon: "🛒",
        description: "You'll wait and fill this spot with cheap upside.",
        matches: |s, _, _| s.cheap_likes.len() >= 3 && s.cheap_likes.len() > s.premium_likes.len(),
    },
    GmArchetype {
        name: "Top-Heavy",
        icon: "🏔️",
        description: "Premium names only; nothing cheap appeals to you here.",
        matches: |s, _, _| s.premium_likes.len() >= 2 && s.cheap_likes.is_empty(),
    },
    GmArchetype {
        name: "Sleeper Scout",
        icon: "🔍",
        description: "You love players the consensus ranks well below the pack.",
        matches: |s, _, _| s.sleepers.len() >= 2,
    },
    GmArchetype {
        name: "Tough Critic",
        icon: "🧊",
        description: "Few players at this position clear your bar.",
        matches: |s, roster, prefs| {
            let passes = roster
                .iter()
                .filter(|p| s.scope.map_or(true, |pos| p.position == pos))
                .filter(|p| prefs.get(&p.id) == Some(Rating::Pass))
                .count();
            s.distribution.rated >= 5 && passes * 2 >= s.distribution.rated
        },
    },
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate_stats;
    use crate::analytics::tests::player;
    use draftswipe_core::config::AnalyticsConfig;
    use draftswipe_core::Position;

    fn classify_overall(players: &[PlayerRecord], prefs: &PreferenceMap) -> &'static str {
        let stats = aggregate_stats(players, prefs, None, &AnalyticsConfig::default());
        classify(OVERALL_ARCHETYPES, &stats, players, prefs).name
    }

    fn classify_position(
        players: &[PlayerRecord],
        prefs: &PreferenceMap,
        pos: Position,
    ) -> &'static str {
        let stats = aggregate_stats(players, prefs, Some(pos), &AnalyticsConfig::default());
        classify(POSITION_ARCHETYPES, &stats, players, prefs).name
    }

    #[test]
    fn empty_preferences_fall_back() {
        let players = vec![player("a", Position::RunningBack, 250.0, 50)];
        assert_eq!(classify_overall(&players, &PreferenceMap::new()), "Balanced Builder");
        assert_eq!(
            classify_position(&players, &PreferenceMap::new(), Position::RunningBack),
            "Balanced Builder"
        );
    }

    #[test]
    fn zero_rb_when_only_elite_receivers_liked() {
        let players = vec![
            player("w1", Position::WideReceiver, 260.0, 45),
            player("w2", Position::WideReceiver, 240.0, 40),
            player("r1", Position::RunningBack, 250.0, 50),
        ];
        let mut prefs = PreferenceMap::new();
        prefs.set("w1", Rating::Love);
        prefs.set("w2", Rating::Like);
        prefs.set("r1", Rating::Pass);
        assert_eq!(classify_overall(&players, &prefs), "Zero RB Zealot");
    }

    #[test]
    fn order_decides_between_matching_archetypes() {
        // Five cheap liked RBs with nothing else: both RB Hoarder and Value
        // Hunter match, and RB Hoarder comes first.
        let players: Vec<PlayerRecord> = (0..5)
            .map(|i| player(&format!("r{i}"), Position::RunningBack, 100.0, 2))
            .collect();
        let mut prefs = PreferenceMap::new();
        for p in &players {
            prefs.set(p.id.clone(), Rating::Like);
        }
        let stats = aggregate_stats(&players, &prefs, None, &AnalyticsConfig::default());
        let matching: Vec<&str> = OVERALL_ARCHETYPES
            .iter()
            .filter(|a| a.matches(&stats, &players, &prefs))
            .map(|a| a.name)
            .collect();
        assert!(matching.contains(&"Value Hunter"));
        assert_eq!(classify_overall(&players, &prefs), "RB Hoarder");
    }

    #[test]
    fn picky_drafter_from_pass_share() {
        let players: Vec<PlayerRecord> = (0..10)
            .map(|i| player(&format!("w{i}"), Position::WideReceiver, 120.0, 10))
            .collect();
        let mut prefs = PreferenceMap::new();
        for (i, p) in players.iter().enumerate() {
            let rating = if i < 7 { Rating::Pass } else { Rating::Meh };
            prefs.set(p.id.clone(), rating);
        }
        assert_eq!(classify_overall(&players, &prefs), "Picky Drafter");
    }

    #[test]
    fn position_table_is_used_for_filters() {
        let mut players: Vec<PlayerRecord> = (0..3)
            .map(|i| player(&format!("t{i}"), Position::TightEnd, 80.0, 1))
            .collect();
        players.push(player("w", Position::WideReceiver, 210.0, 40));
        let mut prefs = PreferenceMap::new();
        for p in &players {
            prefs.set(p.id.clone(), Rating::Like);
        }
        assert_eq!(classify_position(&players, &prefs, Position::TightEnd), "Bargain Bin");
    }

    #[test]
    fn tough_critic_counts_passes_in_scope() {
        let players: Vec<PlayerRecord> = (0..6)
            .map(|i| player(&format!("q{i}"), Position::Quarterback, 200.0, 10))
            .collect();
        let mut prefs = PreferenceMap::new();
        for (i, p) in players.iter().enumerate() {
            let rating = if i < 3 { Rating::Pass } else { Rating::Meh };
            prefs.set(p.id.clone(), rating);
        }
        assert_eq!(
            classify_position(&players, &prefs, Position::Quarterback),
            "Tough Critic"
        );
    }
}
