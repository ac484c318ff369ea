//! Bubble force integration
//!
//! Growing inflates the bubble and pushes it up; releasing lets it shrink
//! and sink. One call per tick.

use super::state::{Bubble, TerminalReason};
use crate::tuning::{SmallnessPolicy, Tuning};

impl Bubble {
    /// Advance size, velocity and position by one tick.
    ///
    /// Returns `BubbleDisappeared` when the bubble hits its minimum radius
    /// under the pop policy. Falling off the bottom is left to the caller.
    pub fn integrate(&mut self, tuning: &Tuning) -> Option<TerminalReason> {
        if self.growing {
            self.radius = (self.radius + tuning.growth_rate).min(tuning.max_radius);
            // Bigger bubbles float harder
            self.vel.y -= tuning.buoyancy + tuning.extra_lift_per_radius * self.radius;
        } else {
            self.radius = (self.radius - tuning.shrink_rate).max(tuning.min_radius);
            self.vel.y += tuning.gravity + tuning.extra_weight_near_min * self.closeness_to_min(tuning);
        }

        self.vel.y = self
            .vel
            .y
            .clamp(-tuning.max_vertical_speed, tuning.max_vertical_speed);

        self.pos.y += self.vel.y;
        self.vel.y *= tuning.drag;

        // Ceiling stops upward motion only
        if self.top() < 0.0 {
            self.pos.y = self.radius;
            self.vel.y = self.vel.y.max(0.0);
        }

        if tuning.smallness == SmallnessPolicy::Pop && self.radius <= tuning.min_radius {
            self.disappeared = true;
            return Some(TerminalReason::BubbleDisappeared);
        }

        None
    }

    /// 1.0 at minimum radius, 0.0 at maximum
    fn closeness_to_min(&self, tuning: &Tuning) -> f32 {
        let span = tuning.max_radius - tuning.min_radius;
        if span <= f32::EPSILON {
            return 1.0;
        }
        (1.0 - (self.radius - tuning.min_radius) / span).clamp(0.0, 1.0)
    }

    /// True once the whole bubble is below the field
    pub fn below_field(&self, tuning: &Tuning) -> bool {
        self.top() > tuning.field.height
    }
}
