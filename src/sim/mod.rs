//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` per frame)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod bubble;
pub mod collision;
pub mod generation;
pub mod score;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{circle_bounds_overlap, detect};
pub use generation::{ObstacleGenerator, ObstacleGroup};
pub use score::award_passed_gaps;
pub use state::{
    Bubble, GameEvent, GamePhase, GameState, Gap, Obstacle, ObstacleKind, Pattern, TerminalReason,
    World,
};
pub use tick::tick;
