// Football draft-prep pipeline: roster normalization, valuation, tiers,
// round-by-round plans and preference analytics.

pub mod analytics;
pub mod draft_flow;
pub mod normalize;
pub mod player;
pub mod tiers;
pub mod valuation;

pub use analytics::{analyze_preferences, PreferenceAnalysis};
pub use draft_flow::{generate_round_targets, RoundTarget};
pub use player::PlayerRecord;
pub use tiers::{build_tiers, Tier};
pub use valuation::{revaluate, valuate};
