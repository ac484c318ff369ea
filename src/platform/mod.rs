//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame pacing (fixed 60 Hz simulation under a variable display rate)
//! - Input events and DOM overlays (wasm32)

mod clock;
#[cfg(target_arch = "wasm32")]
mod web;

pub use clock::{FrameClock, MAX_SUBSTEPS, SIM_DT_MS};
#[cfg(target_arch = "wasm32")]
pub use web::run;
