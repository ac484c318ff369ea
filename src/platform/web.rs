//! Browser glue: DOM overlays, pointer/touch input, animation frame loop
//!
//! Expected page elements (all optional except the canvas):
//! `#canvas`, `#start-screen`, `#start-btn`, `#game-over`, `#restart-btn`,
//! `#final-score`, `#game-over-reason`, `#hud-score`, `#hud-best`.
//! Drawing is delegated to `window.fillTheAirDraw(snapshot)` if the page
//! defines it.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

use super::FrameClock;
use crate::audio::AudioManager;
use crate::persistence::LocalStorageStore;
use crate::session::GameSession;
use crate::sim::{GameEvent, GamePhase};
use crate::tuning::Tuning;

#[wasm_bindgen(inline_js = "
    export function draw_frame(json) {
        if (typeof window.fillTheAirDraw === 'function') {
            window.fillTheAirDraw(JSON.parse(json));
        }
    }
")]
extern "C" {
    fn draw_frame(json: &str);
}

struct Game {
    session: GameSession<LocalStorageStore>,
    audio: AudioManager,
    clock: FrameClock,
}

impl Game {
    fn new(seed: u64) -> Self {
        Self {
            session: GameSession::new(Tuning::refined(), LocalStorageStore::new(), seed),
            audio: AudioManager::new(),
            clock: FrameClock::new(),
        }
    }

    fn frame(&mut self, time: f64, document: &Document) {
        for _ in 0..self.clock.advance(time) {
            if self.session.tick().is_some() {
                break;
            }
        }

        for event in self.session.drain_events() {
            self.audio.handle(&event);
            match event {
                GameEvent::ScoreChanged { score, best } => {
                    set_text(document, "hud-score", &score.to_string());
                    set_text(document, "hud-best", &best.to_string());
                }
                GameEvent::Terminal(reason) => {
                    set_text(document, "final-score", &self.session.score().to_string());
                    set_text(document, "game-over-reason", reason.message());
                    set_visible(document, "game-over", true);
                }
                GameEvent::NewBest(best) => log::info!("New best score: {}", best),
                GameEvent::GrowStarted | GameEvent::GrowStopped => {}
            }
        }

        match serde_json::to_string(self.session.state()) {
            Ok(json) => draw_frame(&json),
            Err(e) => log::error!("Snapshot serialization failed: {}", e),
        }
    }

    fn press(&mut self) {
        self.audio.resume();
        self.session.set_growing(true);
    }

    fn release(&mut self) {
        self.session.set_growing(false);
    }
}

fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn set_visible(document: &Document, id: &str, visible: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
    }
}

/// Wire the page up and start the loop
pub fn run() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = document
        .get_element_by_id("canvas")
        .ok_or_else(|| JsValue::from_str("no canvas"))?
        .dyn_into()?;

    let seed = js_sys::Date::now() as u64;
    let game = Rc::new(RefCell::new(Game::new(seed)));
    {
        let g = game.borrow();
        let field = g.session.tuning().field;
        canvas.set_width(field.width as u32);
        canvas.set_height(field.height as u32);
        set_text(&document, "hud-score", "0");
        set_text(&document, "hud-best", &g.session.best_score().to_string());
    }
    set_visible(&document, "start-screen", true);
    set_visible(&document, "game-over", false);

    setup_input_handlers(&canvas, game.clone())?;
    setup_buttons(&document, game.clone())?;
    request_animation_frame(game);

    log::info!("Fill the Air running (seed {})", seed);
    Ok(())
}

fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
    // Mouse
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().press();
        });
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    for name in ["mouseup", "mouseleave"] {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().release();
        });
        canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Touch
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            game.borrow_mut().press();
        });
        canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    for name in ["touchend", "touchcancel"] {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            game.borrow_mut().release();
        });
        canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
    if let Some(btn) = document.get_element_by_id("start-btn") {
        let game = game.clone();
        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut g = game.borrow_mut();
            g.audio.resume();
            if g.session.start() {
                g.clock.reset();
                set_visible(&document, "start-screen", false);
            }
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(btn) = document.get_element_by_id("restart-btn") {
        let document = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut g = game.borrow_mut();
            if g.session.phase() == GamePhase::GameOver && g.session.restart() {
                g.clock.reset();
                set_visible(&document, "game-over", false);
            }
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn request_animation_frame(game: Rc<RefCell<Game>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| game_loop(game, time));
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        game.borrow_mut().frame(time, &document);
    }
    request_animation_frame(game);
}
