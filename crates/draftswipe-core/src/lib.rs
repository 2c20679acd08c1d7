// Shared vocabulary for the draftswipe workspace: positions, ratings,
// configuration, and preference persistence.

pub mod config;
pub mod position;
pub mod preferences;
pub mod store;

pub use position::{PerPosition, Position, ALL_POSITIONS, SKILL_POSITIONS};
pub use preferences::{PreferenceMap, Rating};
