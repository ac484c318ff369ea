//! Game state and core simulation types
//!
//! Everything the renderer reads each frame lives here and is serializable.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start signal
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalReason {
    PoppedOnObstacle,
    TooSmallForGap,
    TooBigForGap,
    FellOffBottom,
    /// Only reachable under `SmallnessPolicy::Pop`
    BubbleDisappeared,
}

impl TerminalReason {
    /// Reason text shown on the game-over screen
    pub fn message(&self) -> &'static str {
        match self {
            TerminalReason::PoppedOnObstacle => "Bubble popped on obstacle!",
            TerminalReason::TooSmallForGap => "Bubble too small - fell through gap!",
            TerminalReason::TooBigForGap => "Bubble too big for gap!",
            TerminalReason::FellOffBottom => "Bubble fell off the screen!",
            TerminalReason::BubbleDisappeared => "Bubble disappeared - too small!",
        }
    }
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Notifications for the audio and UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player started inflating
    GrowStarted,
    /// Player released (or the run ended mid-inflate)
    GrowStopped,
    /// Run ended
    Terminal(TerminalReason),
    /// Score or best score changed
    ScoreChanged { score: u32, best: u32 },
    /// A new best score was recorded at game over
    NewBest(u32),
}

/// The player's bubble. Stationary in screen-space; only `pos.y` moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub pos: Vec2,
    /// Only `vel.y` is ever non-zero
    pub vel: Vec2,
    pub radius: f32,
    pub growing: bool,
    pub disappeared: bool,
}

impl Bubble {
    /// Fresh bubble at the vertical centre of the field
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.bubble_x, tuning.field.height / 2.0),
            vel: Vec2::ZERO,
            radius: tuning.start_radius,
            growing: false,
            disappeared: false,
        }
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }
}

/// Obstacle behaviour class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Top or bottom half of a gap pair
    Blocking,
    /// Small free-standing block between pairs
    Floating,
}

/// Cosmetic surface pattern; read by the renderer only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    Plain,
    Striped,
    Dotted,
    Cracked,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::Plain,
        Pattern::Striped,
        Pattern::Dotted,
        Pattern::Cracked,
    ];
}

/// An axis-aligned obstacle in world-space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    pub pattern: Option<Pattern>,
}

impl Obstacle {
    /// Left edge after scrolling
    #[inline]
    pub fn screen_x(&self, scroll_offset: f32) -> f32 {
        self.x - scroll_offset
    }
}

/// The opening of an obstacle pair, in world-space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Set once the bubble has cleared the right edge
    pub passed: bool,
}

impl Gap {
    #[inline]
    pub fn screen_x(&self, scroll_offset: f32) -> f32 {
        self.x - scroll_offset
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Strictly inside the horizontal span (screen-space)
    pub fn spans_x(&self, screen_x: f32, scroll_offset: f32) -> bool {
        let left = self.screen_x(scroll_offset);
        screen_x > left && screen_x < left + self.width
    }

    /// Strictly inside the vertical span
    pub fn spans_y(&self, y: f32) -> bool {
        y > self.y && y < self.bottom()
    }
}

/// Scrolling world contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Total distance scrolled; never decreases
    pub scroll_offset: f32,
    pub scroll_speed: f32,
    /// World x of the most recently spawned group
    pub last_spawn_x: f32,
    /// Spawn order (left to right)
    pub obstacles: Vec<Obstacle>,
    /// Spawn order (left to right)
    pub gaps: Vec<Gap>,
}

impl World {
    /// Empty world at scroll zero
    pub fn empty(tuning: &Tuning) -> Self {
        Self {
            scroll_offset: 0.0,
            scroll_speed: tuning.scroll_start_speed,
            last_spawn_x: tuning.field.width,
            obstacles: Vec::new(),
            gaps: Vec::new(),
        }
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub bubble: Bubble,
    pub world: World,
    pub score: u32,
    pub best_score: u32,
    /// Ticks simulated in the current run
    pub time_ticks: u64,
    /// Reason for the most recent game over
    pub last_terminal: Option<TerminalReason>,
    /// Pending collaborator notifications (drained by the session owner)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// State before the first start signal
    pub fn new(tuning: &Tuning, best_score: u32) -> Self {
        Self {
            phase: GamePhase::Start,
            bubble: Bubble::new(tuning),
            world: World::empty(tuning),
            score: 0,
            best_score,
            time_ticks: 0,
            last_terminal: None,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn emit_score(&mut self) {
        self.emit(GameEvent::ScoreChanged {
            score: self.score,
            best: self.best_score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let tuning = Tuning::refined();
        let state = GameState::new(&tuning, 40);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0);
        assert_eq!(state.best_score, 40);
        assert_eq!(state.bubble.radius, tuning.start_radius);
        assert_eq!(state.bubble.pos, Vec2::new(100.0, 300.0));
        assert!(state.world.gaps.is_empty());
    }

    #[test]
    fn test_gap_spans_are_strict() {
        let gap = Gap {
            x: 200.0,
            y: 100.0,
            width: 30.0,
            height: 200.0,
            passed: false,
        };
        assert!(gap.spans_x(115.0, 100.0));
        assert!(!gap.spans_x(100.0, 100.0));
        assert!(!gap.spans_x(130.0, 100.0));
        assert!(gap.spans_y(200.0));
        assert!(!gap.spans_y(100.0));
        assert!(!gap.spans_y(300.0));
        assert_eq!(gap.center_y(), 200.0);
    }

    #[test]
    fn test_reason_messages() {
        assert_eq!(
            TerminalReason::TooBigForGap.to_string(),
            "Bubble too big for gap!"
        );
        assert_eq!(
            TerminalReason::FellOffBottom.message(),
            "Bubble fell off the screen!"
        );
    }

    #[test]
    fn test_snapshot_serializes_without_events() {
        let mut state = GameState::new(&Tuning::refined(), 0);
        state.emit(GameEvent::GrowStarted);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"phase\":\"Start\""));
        assert!(!json.contains("GrowStarted"));
    }
}
