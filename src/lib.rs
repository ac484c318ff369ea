//! Fill the Air - an inflate-the-bubble arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bubble physics, generation, collisions, scoring)
//! - `session`: Start/playing/game-over state machine and collaborator events
//! - `tuning`: Data-driven game balance
//! - `persistence`: Best score storage
//! - `audio`: Sound cues driven by session events
//! - `platform`: Frame pacing and browser glue

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use persistence::{MemoryStore, PersistenceError, ScoreStore};
pub use session::GameSession;
pub use tuning::{Field, GenerationPolicy, SmallnessPolicy, Tuning, TuningError};

/// Game configuration constants
///
/// These are the defaults behind [`Tuning::refined`]; the `classic` preset
/// overrides the handful that differ.
pub mod consts {
    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Bubble sits at a fixed screen column; the world scrolls past it
    pub const BUBBLE_X: f32 = 100.0;
    pub const BUBBLE_START_RADIUS: f32 = 25.0;
    pub const BUBBLE_MIN_RADIUS: f32 = 8.0;
    pub const BUBBLE_MAX_RADIUS: f32 = 80.0;

    /// Per-tick radius change
    pub const GROWTH_RATE: f32 = 0.8;
    pub const SHRINK_RATE: f32 = 0.4;

    /// Per-tick velocity change (pixels/tick²)
    pub const BUOYANCY: f32 = 0.15;
    pub const GRAVITY: f32 = 0.12;
    /// Air resistance applied every tick
    pub const DRAG: f32 = 0.95;
    pub const MAX_VERTICAL_SPEED: f32 = 6.0;

    /// Obstacle layout
    pub const OBSTACLE_WIDTH: f32 = 30.0;
    pub const OBSTACLE_SPACING: f32 = 200.0;
    pub const MIN_OBSTACLE_HEIGHT: f32 = 40.0;
    /// Slack between the largest bubble and the smallest safe gap
    pub const GAP_SAFETY_MARGIN: f32 = 20.0;
    pub const GAP_MAX_HEIGHT: f32 = 300.0;

    /// Gap fit rules
    pub const TOO_SMALL_RADIUS: f32 = 12.0;
    pub const GAP_CLEARANCE: f32 = 5.0;

    /// Scrolling (pixels/tick)
    pub const SCROLL_START_SPEED: f32 = 2.0;
    pub const SCROLL_MAX_SPEED: f32 = 2.5;
    pub const SCROLL_RAMP: f32 = 0.0005;
    pub const SPAWN_LOOKAHEAD: f32 = 200.0;
    pub const PRUNE_MARGIN: f32 = 100.0;
    pub const INITIAL_WORLD_SPAN: f32 = 1000.0;

    /// Floating obstacles
    pub const FLOATING_CHANCE: f64 = 0.3;
    pub const FLOATING_OFFSET: f32 = 100.0;
    pub const FLOATING_WIDTH: f32 = 40.0;
    pub const FLOATING_HEIGHT: f32 = 20.0;

    pub const POINTS_PER_GAP: u32 = 10;

    /// Storage key for the persisted best score
    pub const BEST_SCORE_KEY: &str = "fillTheAirBest";
}
