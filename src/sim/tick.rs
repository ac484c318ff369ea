//! Fixed timestep simulation tick
//!
//! Pipeline per tick: integrate bubble, bottom check, scroll/spawn/prune,
//! collisions, scoring, difficulty ramp. Nothing is skipped or reordered.

use super::collision;
use super::generation::ObstacleGenerator;
use super::score::award_passed_gaps;
use super::state::{GameEvent, GamePhase, GameState, TerminalReason};
use crate::tuning::Tuning;

/// Advance a playing session by one tick.
///
/// Returns the terminal reason if this tick ended the run. Outside the
/// `Playing` phase this is a no-op. `tuning` must already be sanitized;
/// [`GameSession`](crate::GameSession) takes care of that.
pub fn tick(
    state: &mut GameState,
    tuning: &Tuning,
    generator: &mut ObstacleGenerator,
) -> Option<TerminalReason> {
    if state.phase != GamePhase::Playing {
        return None;
    }

    state.time_ticks += 1;

    if let Some(reason) = state.bubble.integrate(tuning) {
        return Some(end_run(state, reason));
    }

    if state.bubble.below_field(tuning) {
        return Some(end_run(state, TerminalReason::FellOffBottom));
    }

    state.world.advance(tuning, generator);

    if let Some(reason) = collision::detect(&state.bubble, &state.world, tuning) {
        return Some(end_run(state, reason));
    }

    let earned = award_passed_gaps(&mut state.world, state.bubble.pos.x, tuning.points_per_gap);
    if earned > 0 {
        state.score += earned;
        state.emit_score();
    }

    state.world.ramp_speed(tuning);

    None
}

/// Playing -> GameOver. Records the reason and any new best score.
pub fn end_run(state: &mut GameState, reason: TerminalReason) -> TerminalReason {
    state.phase = GamePhase::GameOver;
    state.last_terminal = Some(reason);

    if state.bubble.growing {
        state.bubble.growing = false;
        state.emit(GameEvent::GrowStopped);
    }
    state.emit(GameEvent::Terminal(reason));

    if state.score > state.best_score {
        state.best_score = state.score;
        state.emit(GameEvent::NewBest(state.best_score));
    }
    state.emit_score();

    log::info!(
        "Run over after {} ticks: {} (score {}, best {})",
        state.time_ticks,
        reason,
        state.score,
        state.best_score
    );
    reason
}
