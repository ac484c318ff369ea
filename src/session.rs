//! Session state machine
//!
//! Owns the simulation state for the lifetime of the program and mediates
//! every collaborator: control signals in, events and snapshots out, best
//! score through a [`ScoreStore`].
//!
//! Phases are strictly linear: `Start -> Playing` on [`GameSession::start`],
//! `Playing -> GameOver` on a terminal tick, `GameOver -> Playing` on
//! [`GameSession::restart`].

use crate::persistence::ScoreStore;
use crate::sim::{
    self, GameEvent, GamePhase, GameState, ObstacleGenerator, TerminalReason, World,
};
use crate::tuning::Tuning;

pub struct GameSession<S: ScoreStore> {
    tuning: Tuning,
    state: GameState,
    generator: ObstacleGenerator,
    store: S,
    /// Best score as last written to the store
    saved_best: u32,
    seed: u64,
    runs: u32,
}

impl<S: ScoreStore> GameSession<S> {
    /// New session in the `Start` phase. Tuning is sanitized; an unreadable
    /// store counts as a best score of zero.
    pub fn new(tuning: Tuning, store: S, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        let best = store.load().unwrap_or_else(|e| {
            log::warn!("Could not load best score, starting from 0: {}", e);
            0
        });

        let mut generator = ObstacleGenerator::new(seed);
        let mut state = GameState::new(&tuning, best);
        // Give the start screen something to draw
        state.world = World::initial(&tuning, &mut generator);
        state.emit_score();

        log::info!(
            "Session ready (seed {}, {} gaps, {} smallness, best {})",
            seed,
            tuning.generation.as_str(),
            tuning.smallness.as_str(),
            best
        );

        Self {
            tuning,
            state,
            generator,
            store,
            saved_best: best,
            seed,
            runs: 0,
        }
    }

    /// Start signal. Only honoured on the start screen.
    pub fn start(&mut self) -> bool {
        if self.state.phase != GamePhase::Start {
            log::debug!("Ignoring start in {:?}", self.state.phase);
            return false;
        }
        self.begin_run();
        true
    }

    /// Restart signal. Only honoured after game over.
    pub fn restart(&mut self) -> bool {
        if self.state.phase != GamePhase::GameOver {
            log::debug!("Ignoring restart in {:?}", self.state.phase);
            return false;
        }
        self.begin_run();
        true
    }

    /// Full re-initialisation of bubble, world and score; best score survives
    fn begin_run(&mut self) {
        let best = self.state.best_score;
        let pending = std::mem::take(&mut self.state.events);

        let mut state = GameState::new(&self.tuning, best);
        state.events = pending;
        state.world = World::initial(&self.tuning, &mut self.generator);
        state.phase = GamePhase::Playing;
        state.emit_score();
        self.state = state;

        self.runs += 1;
        log::info!("Run {} started", self.runs);
    }

    /// Grow-on / grow-off. Only the latest value matters at tick time.
    pub fn set_growing(&mut self, growing: bool) {
        if self.state.phase != GamePhase::Playing || self.state.bubble.growing == growing {
            return;
        }
        self.state.bubble.growing = growing;
        self.state.emit(if growing {
            GameEvent::GrowStarted
        } else {
            GameEvent::GrowStopped
        });
    }

    /// Run one frame of simulation. Returns the reason if the run ended.
    pub fn tick(&mut self) -> Option<TerminalReason> {
        let reason = sim::tick(&mut self.state, &self.tuning, &mut self.generator)?;
        self.persist_best();
        Some(reason)
    }

    fn persist_best(&mut self) {
        let best = self.state.best_score;
        if best <= self.saved_best {
            return;
        }
        match self.store.save(best) {
            Ok(()) => self.saved_best = best,
            Err(e) => log::warn!("Could not save best score {}: {}", best, e),
        }
    }

    /// Events raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Read-only snapshot for renderers
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn best_score(&self) -> u32 {
        self.state.best_score
    }

    /// Reason text for the game-over screen
    pub fn last_reason(&self) -> Option<&'static str> {
        self.state.last_terminal.map(|r| r.message())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs started so far
    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, PersistenceError};
    use crate::sim::autopilot;

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&self) -> Result<u32, PersistenceError> {
            Err(PersistenceError::Unavailable)
        }

        fn save(&mut self, _best: u32) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable)
        }
    }

    fn session() -> GameSession<MemoryStore> {
        GameSession::new(Tuning::refined(), MemoryStore::with_best(20), 7)
    }

    /// Tick until the run ends (the bubble always ends up somewhere fatal)
    fn run_to_end<S: ScoreStore>(session: &mut GameSession<S>) -> TerminalReason {
        for _ in 0..100_000 {
            if let Some(reason) = session.tick() {
                return reason;
            }
        }
        panic!("run never ended");
    }

    #[test]
    fn test_start_screen() {
        let session = session();
        assert_eq!(session.phase(), GamePhase::Start);
        assert_eq!(session.best_score(), 20);
        assert_eq!(session.score(), 0);
        assert!(!session.state().world.gaps.is_empty());
    }

    #[test]
    fn test_phase_transitions_are_linear() {
        let mut session = session();
        assert!(!session.restart());
        assert!(session.start());
        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(!session.start());
        assert!(!session.restart());

        run_to_end(&mut session);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(!session.start());
        assert!(session.restart());
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.runs(), 2);
    }

    #[test]
    fn test_ticks_do_nothing_before_start() {
        let mut session = session();
        let y0 = session.state().bubble.pos.y;
        for _ in 0..10 {
            assert_eq!(session.tick(), None);
        }
        assert_eq!(session.state().bubble.pos.y, y0);
        assert_eq!(session.state().world.scroll_offset, 0.0);
    }

    #[test]
    fn test_grow_signals() {
        let mut session = session();
        session.set_growing(true);
        assert!(!session.state().bubble.growing);

        session.start();
        session.drain_events();
        session.set_growing(true);
        session.set_growing(true);
        session.set_growing(false);
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::GrowStarted, GameEvent::GrowStopped]
        );
    }

    #[test]
    fn test_terminal_event_carries_reason() {
        let mut session = session();
        session.start();
        let reason = run_to_end(&mut session);
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::Terminal(reason)));
        assert_eq!(session.last_reason(), Some(reason.message()));
    }

    #[test]
    fn test_restart_resets_run_but_keeps_best() {
        let mut session = session();
        session.start();
        session.state.score = 90;
        session.state.bubble.radius = 60.0;
        run_to_end(&mut session);
        assert_eq!(session.best_score(), 90);

        session.restart();
        assert_eq!(session.score(), 0);
        assert_eq!(session.state().bubble.radius, session.tuning().start_radius);
        assert_eq!(session.state().bubble.vel.y, 0.0);
        assert_eq!(session.state().world.scroll_offset, 0.0);
        assert_eq!(session.state().time_ticks, 0);
        assert_eq!(session.best_score(), 90);
    }

    #[test]
    fn test_new_best_saved_once() {
        let mut session = session();
        session.start();
        session.state.score = 50;
        run_to_end(&mut session);
        assert_eq!(session.store().saves, 1);
        assert_eq!(session.store().load().unwrap(), 50);

        // Lower score: nothing written
        session.restart();
        session.state.score = 10;
        run_to_end(&mut session);
        assert_eq!(session.store().saves, 1);
        assert_eq!(session.best_score(), 50);
    }

    #[test]
    fn test_best_survives_new_session() {
        let mut first = session();
        first.start();
        first.state.score = 60;
        run_to_end(&mut first);

        let store = first.store().clone();
        let second = GameSession::new(Tuning::refined(), store, 8);
        assert_eq!(second.best_score(), 60);
    }

    #[test]
    fn test_broken_store_degrades() {
        let mut session = GameSession::new(Tuning::refined(), BrokenStore, 1);
        assert_eq!(session.best_score(), 0);
        session.start();
        session.state.score = 30;
        run_to_end(&mut session);
        // Kept in memory even though the write failed
        assert_eq!(session.best_score(), 30);
    }

    #[test]
    fn test_autopilot_session() {
        let mut session = GameSession::new(Tuning::refined(), MemoryStore::new(), 2024);
        session.start();
        for _ in 0..2000 {
            let grow = autopilot::wants_growth(session.state(), session.tuning());
            session.set_growing(grow);
            if session.tick().is_some() {
                break;
            }
        }
        let state = session.state();
        assert!(state.bubble.radius >= session.tuning().min_radius);
        assert!(state.bubble.radius <= session.tuning().max_radius);
        assert!(state.best_score >= state.score || state.phase == GamePhase::Playing);
    }

    #[test]
    fn test_huge_world_span_builds_quickly() {
        let tuning = Tuning::from_json(r#"{ "initial_world_span": 1e12 }"#).unwrap();
        let session = GameSession::new(tuning, MemoryStore::new(), 3);
        let world = &session.state().world;
        let max_groups = (session.tuning().initial_world_span / session.tuning().obstacle_spacing)
            as usize
            + 1;
        assert!(world.gaps.len() <= max_groups);
        assert_eq!(session.seed(), 3);
    }

    #[test]
    fn test_out_of_range_tuning_is_clamped() {
        let mut tuning = Tuning::refined();
        tuning.field.height = -10.0;
        let session = GameSession::new(tuning, MemoryStore::new(), 1);
        assert!(session.tuning().field.height >= session.tuning().safe_gap_min());
    }
}
