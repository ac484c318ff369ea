//! World scrolling, spawning and pruning

use super::generation::{ObstacleGenerator, ObstacleGroup};
use super::state::World;
use crate::tuning::Tuning;

impl World {
    /// Fresh world with the opening stretch of obstacle groups already placed
    pub fn initial(tuning: &Tuning, generator: &mut ObstacleGenerator) -> Self {
        let mut world = Self::empty(tuning);
        let start = tuning.field.width;
        let end = start + tuning.initial_world_span;

        let mut x = start;
        while x < end {
            world.push_group(generator.generate(x, tuning));
            world.last_spawn_x = x;
            x += tuning.obstacle_spacing;
        }
        log::debug!(
            "Initial world: {} gaps, last spawn at {}",
            world.gaps.len(),
            world.last_spawn_x
        );
        world
    }

    fn push_group(&mut self, group: ObstacleGroup) {
        self.obstacles.extend(group.obstacles);
        self.gaps.push(group.gap);
    }

    /// Scroll by the current speed, spawn ahead, prune behind
    pub fn advance(&mut self, tuning: &Tuning, generator: &mut ObstacleGenerator) {
        self.scroll_offset += self.scroll_speed;
        self.spawn_ahead(tuning, generator);
        self.prune_behind(tuning);
    }

    /// Spawn one group when the newest has come within the lookahead window
    pub fn spawn_ahead(&mut self, tuning: &Tuning, generator: &mut ObstacleGenerator) -> bool {
        if self.last_spawn_x - self.scroll_offset >= tuning.field.width + tuning.spawn_lookahead {
            return false;
        }
        self.last_spawn_x += tuning.obstacle_spacing;
        let group = generator.generate(self.last_spawn_x, tuning);
        log::debug!(
            "Spawned group at x={} (gap y={} h={})",
            self.last_spawn_x,
            group.gap.y,
            group.gap.height
        );
        self.push_group(group);
        true
    }

    /// Drop everything that has scrolled past the left margin; keeps order
    pub fn prune_behind(&mut self, tuning: &Tuning) {
        let scroll = self.scroll_offset;
        let margin = tuning.prune_margin;
        self.obstacles.retain(|o| o.screen_x(scroll) > -margin);
        self.gaps.retain(|g| g.screen_x(scroll) > -margin);
    }

    /// Difficulty ramp: speed creeps up to the cap
    pub fn ramp_speed(&mut self, tuning: &Tuning) {
        self.scroll_speed = (self.scroll_speed + tuning.scroll_ramp).min(tuning.scroll_max_speed);
    }
}
