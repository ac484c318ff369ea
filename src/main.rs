//! Fill the Air entry point
//!
//! On the web this wires the page up and starts the animation loop. Natively
//! it runs headless autopilot games, which is handy for balancing tuning
//! files:
//!
//! ```text
//! fill-the-air [--seed N] [--ticks N] [--runs N] [--classic]
//!              [--tuning PATH] [--best PATH]
//! ```

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Logger init failed: {e}")));
    }
    log::info!("Fill the Air starting...");
    fill_the_air::platform::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args = match native::Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{}", native::USAGE);
            std::process::exit(2);
        }
    };

    if let Err(msg) = native::run(&args) {
        eprintln!("error: {msg}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use fill_the_air::persistence::FileStore;
    use fill_the_air::sim::{GameEvent, autopilot};
    use fill_the_air::{GameSession, MemoryStore, ScoreStore, Tuning};

    pub const USAGE: &str = "usage: fill-the-air [--seed N] [--ticks N] [--runs N] [--classic] \
                             [--tuning PATH] [--best PATH]";

    #[derive(Debug, Clone, PartialEq)]
    pub struct Args {
        pub seed: u64,
        /// Per-run tick limit
        pub ticks: u64,
        pub runs: u32,
        pub classic: bool,
        pub tuning: Option<PathBuf>,
        pub best: Option<PathBuf>,
    }

    impl Default for Args {
        fn default() -> Self {
            Self {
                seed: 1,
                ticks: 36_000,
                runs: 1,
                classic: false,
                tuning: None,
                best: None,
            }
        }
    }

    impl Args {
        pub fn parse(mut iter: impl Iterator<Item = String>) -> Result<Self, String> {
            let mut args = Args::default();
            while let Some(flag) = iter.next() {
                let mut value = |name: &str| {
                    iter.next()
                        .ok_or_else(|| format!("missing value for {name}"))
                };
                match flag.as_str() {
                    "--seed" => args.seed = parse_num(&value("--seed")?, "--seed")?,
                    "--ticks" => args.ticks = parse_num(&value("--ticks")?, "--ticks")?,
                    "--runs" => args.runs = parse_num(&value("--runs")?, "--runs")?,
                    "--tuning" => args.tuning = Some(PathBuf::from(value("--tuning")?)),
                    "--best" => args.best = Some(PathBuf::from(value("--best")?)),
                    "--classic" => args.classic = true,
                    other => return Err(format!("unknown argument: {other}")),
                }
            }
            Ok(args)
        }

        fn tuning(&self) -> Result<Tuning, String> {
            match &self.tuning {
                Some(path) => Tuning::load(path).map_err(|e| e.to_string()),
                None if self.classic => Ok(Tuning::classic()),
                None => Ok(Tuning::refined()),
            }
        }
    }

    fn parse_num<T: std::str::FromStr>(raw: &str, flag: &str) -> Result<T, String> {
        raw.parse()
            .map_err(|_| format!("invalid value for {flag}: {raw}"))
    }

    pub fn run(args: &Args) -> Result<(), String> {
        let tuning = args.tuning()?;
        match &args.best {
            Some(path) => play(args, tuning, FileStore::new(path.clone())),
            None => play(args, tuning, MemoryStore::new()),
        }
        Ok(())
    }

    fn play<S: ScoreStore>(args: &Args, tuning: Tuning, store: S) {
        let mut session = GameSession::new(tuning, store, args.seed);

        for _ in 0..args.runs {
            let started = if session.runs() == 0 {
                session.start()
            } else {
                session.restart()
            };
            if !started {
                break;
            }

            let mut ticks = 0;
            let mut ended = None;
            while ticks < args.ticks && ended.is_none() {
                let grow = autopilot::wants_growth(session.state(), session.tuning());
                session.set_growing(grow);
                ticks += 1;
                ended = session.tick();
            }

            for event in session.drain_events() {
                match event {
                    GameEvent::NewBest(best) => log::info!("New best: {}", best),
                    GameEvent::Terminal(reason) => log::debug!("Terminal: {:?}", reason),
                    _ => {}
                }
            }

            println!(
                "run {:>3}: score {:>5} after {:>6} ticks ({})",
                session.runs(),
                session.score(),
                ticks,
                ended.map_or("time limit", |r| r.message())
            );

            if ended.is_none() {
                // Autopilot survived the whole budget; nothing left to restart from
                break;
            }
        }

        println!("seed {}: best {}", session.seed(), session.best_score());
    }

}
