//! Idle/demo player
//!
//! A simple controller that steers toward the next gap's centre while
//! keeping the radius inside that gap's fit window. Used by the headless
//! runner and attract mode; not a perfect player.

use super::state::{Gap, GameState};
use crate::tuning::Tuning;

/// Extra slack kept on both sides of the fit window
const RADIUS_SLACK: f32 = 4.0;

/// The first gap the bubble has not yet fully cleared
pub fn next_gap(state: &GameState) -> Option<&Gap> {
    let scroll = state.world.scroll_offset;
    let bubble = &state.bubble;
    state
        .world
        .gaps
        .iter()
        .find(|g| g.screen_x(scroll) + g.width + bubble.radius > bubble.pos.x)
}

/// Radius window that passes `gap` without tripping either fit rule
pub fn fit_window(gap: &Gap, tuning: &Tuning) -> (f32, f32) {
    let lower = (tuning.too_small_radius + RADIUS_SLACK).max(tuning.min_radius);
    let upper = ((gap.height - tuning.gap_clearance) / 2.0 - RADIUS_SLACK).min(tuning.max_radius);
    (lower, upper.max(lower))
}

/// Should the bubble be inflating this tick
pub fn wants_growth(state: &GameState, tuning: &Tuning) -> bool {
    let bubble = &state.bubble;

    // Never sink off the bottom
    if bubble.pos.y + bubble.radius > tuning.field.height - RADIUS_SLACK {
        return true;
    }

    let Some(gap) = next_gap(state) else {
        return bubble.pos.y > tuning.field.height / 2.0;
    };

    let (lower, upper) = fit_window(gap, tuning);
    if bubble.radius < lower {
        return true;
    }
    if bubble.radius > upper {
        return false;
    }
    bubble.pos.y > gap.center_y()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generation::ObstacleGenerator;
    use crate::sim::state::{GamePhase, World};
    use crate::sim::tick::tick;

    #[test]
    fn test_fit_window() {
        let tuning = Tuning::refined();
        let gap = Gap {
            x: 0.0,
            y: 100.0,
            width: 30.0,
            height: 205.0,
            passed: false,
        };
        // (200 / 2) - 4 = 96 is capped by max_radius
        assert_eq!(fit_window(&gap, &tuning), (16.0, 80.0));
    }

    #[test]
    fn test_grows_when_too_small() {
        let tuning = Tuning::refined();
        let mut generator = ObstacleGenerator::new(3);
        let mut state = GameState::new(&tuning, 0);
        state.world = World::initial(&tuning, &mut generator);
        state.bubble.radius = tuning.min_radius;
        state.bubble.pos.y = 10.0;
        assert!(wants_growth(&state, &tuning));
    }

    #[test]
    fn test_skips_cleared_gaps() {
        let tuning = Tuning::refined();
        let mut generator = ObstacleGenerator::new(3);
        let mut state = GameState::new(&tuning, 0);
        state.world = World::initial(&tuning, &mut generator);
        // First gap (x=400) is now well behind the bubble
        state.world.scroll_offset = 400.0;
        let gap = next_gap(&state).map(|g| g.x);
        assert_eq!(gap, Some(600.0));
    }

    #[test]
    fn test_autopilot_run_keeps_invariants() {
        for tuning in [Tuning::refined(), Tuning::classic()] {
            let mut generator = ObstacleGenerator::new(8);
            let mut state = GameState::new(&tuning, 0);
            state.phase = GamePhase::Playing;
            state.world = World::initial(&tuning, &mut generator);

            for _ in 0..3000 {
                state.bubble.growing = wants_growth(&state, &tuning);
                let ended = tick(&mut state, &tuning, &mut generator).is_some();
                assert!(state.bubble.radius >= tuning.min_radius);
                assert!(state.bubble.radius <= tuning.max_radius);
                assert_eq!(state.score % tuning.points_per_gap, 0);
                if ended {
                    break;
                }
            }
        }
    }
}
