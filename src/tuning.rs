//! Data-driven game balance
//!
//! Both historical revisions of the game are expressed as presets over the
//! same [`Tuning`] structure. Loaded from JSON on native builds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Smallest playfield width the simulation accepts
pub const MIN_FIELD_WIDTH: f32 = 100.0;
/// Largest playfield width; keeps world-space x well inside f32 precision
pub const MAX_FIELD_WIDTH: f32 = 10_000.0;
/// Opening stretch is at most this many field widths
pub const MAX_INITIAL_SPAN_FIELDS: f32 = 10.0;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How obstacle groups pick their gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GenerationPolicy {
    /// Gap height always fits a max-radius bubble plus the safety margin
    #[default]
    Safe,
    /// Gap position and height drawn from wide ranges; no fit guarantee
    Loose,
}

impl GenerationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationPolicy::Safe => "Safe",
            GenerationPolicy::Loose => "Loose",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "safe" => Some(GenerationPolicy::Safe),
            "loose" => Some(GenerationPolicy::Loose),
            _ => None,
        }
    }
}

/// What happens when the bubble shrinks to its minimum radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SmallnessPolicy {
    /// Minimum radius is a floor; smallness only matters inside a gap
    #[default]
    Floor,
    /// Reaching the minimum radius pops the bubble
    Pop,
}

impl SmallnessPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmallnessPolicy::Floor => "Floor",
            SmallnessPolicy::Pop => "Pop",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "floor" => Some(SmallnessPolicy::Floor),
            "pop" => Some(SmallnessPolicy::Pop),
            _ => None,
        }
    }
}

/// Playfield dimensions in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

/// Every balance constant the simulation reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field: Field,

    // === Bubble ===
    pub bubble_x: f32,
    pub start_radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub growth_rate: f32,
    pub shrink_rate: f32,
    pub buoyancy: f32,
    pub gravity: f32,
    pub drag: f32,
    pub max_vertical_speed: f32,
    /// Extra upward push per pixel of radius while growing (0 = off)
    pub extra_lift_per_radius: f32,
    /// Extra downward pull at minimum radius while shrinking (0 = off)
    pub extra_weight_near_min: f32,
    pub smallness: SmallnessPolicy,

    // === Generation ===
    pub generation: GenerationPolicy,
    pub obstacle_width: f32,
    pub obstacle_spacing: f32,
    pub min_obstacle_height: f32,
    pub gap_safety_margin: f32,
    pub gap_max_height: f32,
    pub loose_gap_min: f32,
    pub loose_gap_max: f32,
    pub loose_edge_margin: f32,
    /// Tag obstacles with cosmetic patterns for the renderer
    pub patterns: bool,
    pub floating_chance: f64,
    pub floating_offset: f32,
    pub floating_width: f32,
    pub floating_height: f32,

    // === Gap fit ===
    pub too_small_radius: f32,
    pub gap_clearance: f32,

    // === Scrolling ===
    pub scroll_start_speed: f32,
    pub scroll_max_speed: f32,
    pub scroll_ramp: f32,
    pub spawn_lookahead: f32,
    pub prune_margin: f32,
    pub initial_world_span: f32,

    pub points_per_gap: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::refined()
    }
}

impl Tuning {
    /// Second revision: guaranteed-safe gaps, size-dependent lift, no popping
    pub fn refined() -> Self {
        Self {
            field: Field::default(),

            bubble_x: BUBBLE_X,
            start_radius: BUBBLE_START_RADIUS,
            min_radius: BUBBLE_MIN_RADIUS,
            max_radius: BUBBLE_MAX_RADIUS,
            growth_rate: GROWTH_RATE,
            shrink_rate: SHRINK_RATE,
            buoyancy: BUOYANCY,
            gravity: GRAVITY,
            drag: DRAG,
            max_vertical_speed: MAX_VERTICAL_SPEED,
            extra_lift_per_radius: 0.002,
            extra_weight_near_min: 0.05,
            smallness: SmallnessPolicy::Floor,

            generation: GenerationPolicy::Safe,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_spacing: OBSTACLE_SPACING,
            min_obstacle_height: MIN_OBSTACLE_HEIGHT,
            gap_safety_margin: GAP_SAFETY_MARGIN,
            gap_max_height: GAP_MAX_HEIGHT,
            loose_gap_min: 140.0,
            loose_gap_max: 260.0,
            loose_edge_margin: 50.0,
            patterns: true,
            floating_chance: FLOATING_CHANCE,
            floating_offset: FLOATING_OFFSET,
            floating_width: FLOATING_WIDTH,
            floating_height: FLOATING_HEIGHT,

            too_small_radius: TOO_SMALL_RADIUS,
            gap_clearance: GAP_CLEARANCE,

            scroll_start_speed: SCROLL_START_SPEED,
            scroll_max_speed: SCROLL_MAX_SPEED,
            scroll_ramp: SCROLL_RAMP,
            spawn_lookahead: SPAWN_LOOKAHEAD,
            prune_margin: PRUNE_MARGIN,
            initial_world_span: INITIAL_WORLD_SPAN,

            points_per_gap: POINTS_PER_GAP,
        }
    }

    /// First revision: loose gaps, constant forces, bubble pops at minimum size
    pub fn classic() -> Self {
        Self {
            max_vertical_speed: 100.0, // effectively uncapped
            extra_lift_per_radius: 0.0,
            extra_weight_near_min: 0.0,
            smallness: SmallnessPolicy::Pop,
            generation: GenerationPolicy::Loose,
            patterns: false,
            too_small_radius: 20.0,
            ..Self::refined()
        }
    }

    /// Smallest gap the safe policy may generate
    pub fn safe_gap_min(&self) -> f32 {
        2.0 * self.max_radius + self.gap_safety_margin
    }

    /// Inclusive gap height range used by the safe policy
    pub fn safe_gap_range(&self) -> (f32, f32) {
        let min = self.safe_gap_min();
        (min, self.gap_max_height.max(min))
    }

    /// Clamp out-of-range values to the nearest playable setting
    pub fn sanitized(mut self) -> Self {
        self.min_radius = clamp_value("min_radius", self.min_radius, 1.0, f32::MAX);
        self.max_radius = clamp_value("max_radius", self.max_radius, self.min_radius, f32::MAX);
        self.start_radius = clamp_value(
            "start_radius",
            self.start_radius,
            self.min_radius,
            self.max_radius,
        );
        self.growth_rate = clamp_value("growth_rate", self.growth_rate, 0.0, f32::MAX);
        self.shrink_rate = clamp_value("shrink_rate", self.shrink_rate, 0.0, f32::MAX);
        self.buoyancy = clamp_value("buoyancy", self.buoyancy, 0.0, f32::MAX);
        self.gravity = clamp_value("gravity", self.gravity, 0.0, f32::MAX);
        self.drag = clamp_value("drag", self.drag, 0.0, 1.0);
        self.max_vertical_speed =
            clamp_value("max_vertical_speed", self.max_vertical_speed, 0.1, f32::MAX);

        self.obstacle_width = clamp_value("obstacle_width", self.obstacle_width, 1.0, f32::MAX);
        self.obstacle_spacing = clamp_value(
            "obstacle_spacing",
            self.obstacle_spacing,
            self.obstacle_width,
            f32::MAX,
        );
        self.min_obstacle_height =
            clamp_value("min_obstacle_height", self.min_obstacle_height, 0.0, f32::MAX);
        self.gap_safety_margin =
            clamp_value("gap_safety_margin", self.gap_safety_margin, 0.0, f32::MAX);
        self.loose_gap_min = clamp_value("loose_gap_min", self.loose_gap_min, 1.0, f32::MAX);
        self.loose_gap_max =
            clamp_value("loose_gap_max", self.loose_gap_max, self.loose_gap_min, f32::MAX);
        self.loose_edge_margin =
            clamp_value("loose_edge_margin", self.loose_edge_margin, 0.0, f32::MAX);
        self.floating_chance = if self.floating_chance.is_nan() {
            0.0
        } else {
            self.floating_chance.clamp(0.0, 1.0)
        };

        self.too_small_radius = clamp_value("too_small_radius", self.too_small_radius, 0.0, f32::MAX);
        self.gap_clearance = clamp_value("gap_clearance", self.gap_clearance, 0.0, f32::MAX);

        // One group spawns per tick at most, so the world may not outrun it
        self.scroll_start_speed = clamp_value(
            "scroll_start_speed",
            self.scroll_start_speed,
            0.0,
            self.obstacle_spacing,
        );
        self.scroll_max_speed = clamp_value(
            "scroll_max_speed",
            self.scroll_max_speed,
            self.scroll_start_speed,
            self.obstacle_spacing,
        );
        self.scroll_ramp = clamp_value("scroll_ramp", self.scroll_ramp, 0.0, f32::MAX);
        self.prune_margin = clamp_value("prune_margin", self.prune_margin, 0.0, f32::MAX);
        self.spawn_lookahead = clamp_value("spawn_lookahead", self.spawn_lookahead, 0.0, f32::MAX);

        // The field must hold the tallest gap the active policy can produce
        let min_height = match self.generation {
            GenerationPolicy::Safe => self.safe_gap_min() + 2.0 * self.min_obstacle_height,
            GenerationPolicy::Loose => self.loose_gap_max + 2.0 * self.loose_edge_margin,
        };
        self.field.width = clamp_value(
            "field.width",
            self.field.width,
            MIN_FIELD_WIDTH,
            MAX_FIELD_WIDTH,
        );
        self.initial_world_span = clamp_value(
            "initial_world_span",
            self.initial_world_span,
            0.0,
            self.field.width * MAX_INITIAL_SPAN_FIELDS,
        );
        self.field.height = clamp_value("field.height", self.field.height, min_height, f32::MAX);
        self.bubble_x = clamp_value("bubble_x", self.bubble_x, 0.0, self.field.width);

        self
    }

    /// Parse a (possibly partial) tuning document; missing keys keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load tuning from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }
}

fn clamp_value(name: &str, value: f32, lo: f32, hi: f32) -> f32 {
    let clamped = if value.is_nan() { lo } else { value.clamp(lo, hi) };
    if clamped != value {
        log::warn!("Tuning {} out of range ({}), using {}", name, value, clamped);
    }
    clamped
}
