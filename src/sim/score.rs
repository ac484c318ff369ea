//! Gap-passage scoring

use super::state::World;

/// Mark every gap whose right edge is now behind `bubble_x` and return the
/// points earned. A gap scores at most once.
pub fn award_passed_gaps(world: &mut World, bubble_x: f32, points_per_gap: u32) -> u32 {
    let scroll = world.scroll_offset;
    let mut earned = 0;
    for gap in world.gaps.iter_mut().filter(|g| !g.passed) {
        if gap.screen_x(scroll) + gap.width < bubble_x {
            gap.passed = true;
            earned += points_per_gap;
        }
    }
    earned
}
