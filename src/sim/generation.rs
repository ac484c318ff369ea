//! Procedural obstacle generation
//!
//! Each group is a blocking pair around one gap, plus an occasional
//! floating block. Layout and cosmetic draws come from separate streams so
//! patterns never perturb geometry.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Gap, Obstacle, ObstacleKind, Pattern};
use crate::tuning::{GenerationPolicy, Tuning};

/// Stream splitter for the cosmetic RNG
const COSMETIC_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// One spawn: obstacles plus exactly one gap, all at the same world x
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleGroup {
    pub obstacles: Vec<Obstacle>,
    pub gap: Gap,
}

/// Seeded generator for obstacle groups
#[derive(Debug, Clone)]
pub struct ObstacleGenerator {
    layout: Pcg32,
    cosmetic: Pcg32,
}

impl ObstacleGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            layout: Pcg32::seed_from_u64(seed),
            cosmetic: Pcg32::seed_from_u64(seed ^ COSMETIC_SEED_MIX),
        }
    }

    /// Build the group whose pair sits at world x.
    ///
    /// Expects a [`Tuning::sanitized`] tuning; an out-of-range floating chance
    /// trips a debug assertion and is clamped in release builds.
    pub fn generate(&mut self, x: f32, tuning: &Tuning) -> ObstacleGroup {
        let field_height = tuning.field.height;
        let (gap_y, gap_height) = match tuning.generation {
            GenerationPolicy::Safe => self.safe_gap(tuning),
            GenerationPolicy::Loose => self.loose_gap(tuning),
        };

        let mut obstacles = Vec::with_capacity(3);
        if gap_y > 0.0 {
            obstacles.push(self.obstacle(
                x,
                0.0,
                tuning.obstacle_width,
                gap_y,
                ObstacleKind::Blocking,
                tuning,
            ));
        }
        let gap_bottom = gap_y + gap_height;
        if gap_bottom < field_height {
            obstacles.push(self.obstacle(
                x,
                gap_bottom,
                tuning.obstacle_width,
                field_height - gap_bottom,
                ObstacleKind::Blocking,
                tuning,
            ));
        }

        debug_assert!(
            (0.0..=1.0).contains(&tuning.floating_chance),
            "floating_chance {} outside [0, 1]; sanitize the tuning first",
            tuning.floating_chance
        );
        let chance = if tuning.floating_chance.is_nan() {
            0.0
        } else {
            tuning.floating_chance.clamp(0.0, 1.0)
        };
        if self.layout.random_bool(chance) {
            let edge = tuning.floating_height;
            let span = (field_height - 2.0 * edge).max(0.0);
            let y = self.layout.random::<f32>() * span + edge;
            obstacles.push(self.obstacle(
                x + tuning.floating_offset,
                y,
                tuning.floating_width,
                tuning.floating_height,
                ObstacleKind::Floating,
                tuning,
            ));
        }

        ObstacleGroup {
            obstacles,
            gap: Gap {
                x,
                y: gap_y,
                width: tuning.obstacle_width,
                height: gap_height,
                passed: false,
            },
        }
    }

    /// Height from the guaranteed-fit range, position leaving room for both
    /// obstacles
    fn safe_gap(&mut self, tuning: &Tuning) -> (f32, f32) {
        let field_height = tuning.field.height;
        let min_obstacle = tuning.min_obstacle_height;
        let (gap_min, gap_max) = tuning.safe_gap_range();
        // Never exceed what still leaves both obstacles their minimum height,
        // but never drop below the fit guarantee either
        let fit_max = field_height - 2.0 * min_obstacle;
        let gap_max = gap_max.min(fit_max).max(gap_min);

        let gap_height = self.layout.random_range(gap_min..=gap_max);
        let y_max = (field_height - gap_height - min_obstacle).max(min_obstacle);
        let gap_y = self.layout.random_range(min_obstacle..=y_max);
        (gap_y, gap_height)
    }

    fn loose_gap(&mut self, tuning: &Tuning) -> (f32, f32) {
        let field_height = tuning.field.height;
        let edge = tuning.loose_edge_margin;
        let gap_height = if tuning.loose_gap_max > tuning.loose_gap_min {
            self.layout
                .random_range(tuning.loose_gap_min..tuning.loose_gap_max)
        } else {
            tuning.loose_gap_min
        };
        let span = (field_height - gap_height - 2.0 * edge).max(0.0);
        let gap_y = self.layout.random::<f32>() * span + edge;
        (gap_y, gap_height)
    }

    fn obstacle(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        kind: ObstacleKind,
        tuning: &Tuning,
    ) -> Obstacle {
        let pattern = tuning
            .patterns
            .then(|| Pattern::ALL[self.cosmetic.random_range(0..Pattern::ALL.len())]);
        Obstacle {
            x,
            y,
            width,
            height,
            kind,
            pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strip_patterns(group: &ObstacleGroup) -> ObstacleGroup {
        let mut group = group.clone();
        for obstacle in &mut group.obstacles {
            obstacle.pattern = None;
        }
        group
    }

    #[test]
    fn test_safe_gap_range_scenario() {
        let tuning = Tuning::refined();
        let mut generator = ObstacleGenerator::new(7);
        for i in 0..500 {
            let group = generator.generate(400.0 + i as f32 * 200.0, &tuning);
            assert!(group.gap.height >= 180.0, "gap {} too small", group.gap.height);
            assert!(group.gap.height <= 300.0, "gap {} too large", group.gap.height);
        }
    }

    #[test]
    fn test_pair_tiles_the_column() {
        let tuning = Tuning {
            floating_chance: 0.0,
            ..Tuning::refined()
        };
        let mut generator = ObstacleGenerator::new(99);
        let group = generator.generate(400.0, &tuning);

        assert_eq!(group.obstacles.len(), 2);
        let top = &group.obstacles[0];
        let bottom = &group.obstacles[1];
        assert_eq!(top.y, 0.0);
        assert_eq!(top.height, group.gap.y);
        assert_eq!(bottom.y, group.gap.bottom());
        assert!((bottom.y + bottom.height - tuning.field.height).abs() < 1e-3);
        assert!(group.obstacles.iter().all(|o| o.x == 400.0));
        assert_eq!(group.gap.x, 400.0);
        assert!(!group.gap.passed);
    }

    #[test]
    fn test_patterns_do_not_change_geometry() {
        let with = Tuning::refined();
        let without = Tuning {
            patterns: false,
            ..Tuning::refined()
        };
        let mut a = ObstacleGenerator::new(2024);
        let mut b = ObstacleGenerator::new(2024);
        for i in 0..50 {
            let x = 400.0 + i as f32 * 200.0;
            let ga = a.generate(x, &with);
            let gb = b.generate(x, &without);
            assert!(ga.obstacles.iter().all(|o| o.pattern.is_some()));
            assert!(gb.obstacles.iter().all(|o| o.pattern.is_none()));
            assert_eq!(strip_patterns(&ga), gb);
        }
    }

    #[test]
    fn test_loose_policy_can_undercut_safe_minimum() {
        let tuning = Tuning::classic();
        let mut generator = ObstacleGenerator::new(1);
        let heights: Vec<f32> = (0..200)
            .map(|i| generator.generate(i as f32 * 200.0, &tuning).gap.height)
            .collect();

        assert!(heights.iter().all(|h| (140.0..260.0).contains(h)));
        assert!(heights.iter().any(|&h| h < tuning.safe_gap_min()));
    }

    #[test]
    fn test_loose_gap_stays_off_edges() {
        let tuning = Tuning::classic();
        let mut generator = ObstacleGenerator::new(3);
        for i in 0..200 {
            let gap = generator.generate(i as f32 * 200.0, &tuning).gap;
            assert!(gap.y >= 50.0);
            assert!(gap.bottom() <= tuning.field.height - 50.0 + 1e-3);
        }
    }

    #[test]
    fn test_floating_obstacle() {
        let always = Tuning {
            floating_chance: 1.0,
            ..Tuning::refined()
        };
        let never = Tuning {
            floating_chance: 0.0,
            ..Tuning::refined()
        };
        let mut generator = ObstacleGenerator::new(5);

        let group = generator.generate(600.0, &always);
        let floating: Vec<_> = group
            .obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::Floating)
            .collect();
        assert_eq!(floating.len(), 1);
        assert_eq!(floating[0].x, 700.0);
        assert_eq!(floating[0].width, 40.0);
        assert_eq!(floating[0].height, 20.0);
        assert!(floating[0].y >= 20.0 && floating[0].y <= 580.0);

        let group = generator.generate(800.0, &never);
        assert!(group.obstacles.iter().all(|o| o.kind == ObstacleKind::Blocking));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "floating_chance")]
    fn test_unsanitized_floating_chance_asserts() {
        let tuning = Tuning {
            floating_chance: 1.5,
            ..Tuning::refined()
        };
        ObstacleGenerator::new(1).generate(600.0, &tuning);
    }

    #[test]
    fn test_sanitized_floating_chance_always_floats() {
        let tuning = Tuning {
            floating_chance: 1.5,
            ..Tuning::refined()
        }
        .sanitized();
        let group = ObstacleGenerator::new(1).generate(600.0, &tuning);
        assert!(group.obstacles.iter().any(|o| o.kind == ObstacleKind::Floating));
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::refined();
        let mut a = ObstacleGenerator::new(42);
        let mut b = ObstacleGenerator::new(42);
        for i in 0..20 {
            let x = i as f32 * 200.0;
            assert_eq!(a.generate(x, &tuning), b.generate(x, &tuning));
        }
    }

    proptest! {
        #[test]
        fn prop_safe_gap_always_fits_max_bubble(
            seed in any::<u64>(),
            height in 200.0f32..1200.0,
            max_radius in 20.0f32..120.0,
        ) {
            let mut tuning = Tuning::refined();
            tuning.field.height = height;
            tuning.max_radius = max_radius;
            let tuning = tuning.sanitized();
            let mut generator = ObstacleGenerator::new(seed);

            for i in 0..20 {
                let group = generator.generate(i as f32 * 200.0, &tuning);
                prop_assert!(group.gap.height >= 2.0 * tuning.max_radius + tuning.gap_safety_margin);
                prop_assert!(group.gap.y >= tuning.min_obstacle_height - 1e-3);
                prop_assert!(group.gap.bottom() <= tuning.field.height - tuning.min_obstacle_height + 1e-2);
                for obstacle in group.obstacles.iter().filter(|o| o.kind == ObstacleKind::Blocking) {
                    prop_assert!(obstacle.height >= tuning.min_obstacle_height - 1e-2);
                }
            }
        }
    }
}
