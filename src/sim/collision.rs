//! Collision and gap-fit detection
//!
//! Three checks, first hit wins: obstacle overlap, too small for the gap
//! the bubble is in, too big for it.

use glam::Vec2;

use super::state::{Bubble, Gap, Obstacle, TerminalReason, World};
use crate::tuning::Tuning;

/// Bounding square of a circle against an axis-aligned rectangle.
///
/// Strict inequalities: touching edges is not an overlap.
#[inline]
pub fn circle_bounds_overlap(center: Vec2, radius: f32, rect_min: Vec2, rect_size: Vec2) -> bool {
    let rect_max = rect_min + rect_size;
    center.x + radius > rect_min.x
        && center.x - radius < rect_max.x
        && center.y + radius > rect_min.y
        && center.y - radius < rect_max.y
}

/// Does the bubble overlap this obstacle at the given scroll offset
pub fn bubble_hits_obstacle(bubble: &Bubble, obstacle: &Obstacle, scroll_offset: f32) -> bool {
    circle_bounds_overlap(
        bubble.pos,
        bubble.radius,
        Vec2::new(obstacle.screen_x(scroll_offset), obstacle.y),
        Vec2::new(obstacle.width, obstacle.height),
    )
}

/// Gap-fit verdict for a bubble whose centre is inside `gap`
pub fn gap_fit(bubble: &Bubble, gap: &Gap, tuning: &Tuning) -> Option<TerminalReason> {
    if bubble.radius < tuning.too_small_radius {
        return Some(TerminalReason::TooSmallForGap);
    }
    if bubble.radius * 2.0 > gap.height - tuning.gap_clearance {
        return Some(TerminalReason::TooBigForGap);
    }
    None
}

/// Run every check against the current world
pub fn detect(bubble: &Bubble, world: &World, tuning: &Tuning) -> Option<TerminalReason> {
    let scroll = world.scroll_offset;

    if world
        .obstacles
        .iter()
        .any(|obstacle| bubble_hits_obstacle(bubble, obstacle, scroll))
    {
        return Some(TerminalReason::PoppedOnObstacle);
    }

    world
        .gaps
        .iter()
        .filter(|gap| gap.spans_x(bubble.pos.x, scroll) && gap.spans_y(bubble.pos.y))
        .find_map(|gap| gap_fit(bubble, gap, tuning))
}
