//! Collision and visibility checks
//!
//! Screen space, y grows downward. Edges that touch count as overlapping.

use super::column::Column;
use super::player::Player;
use crate::tuning::Tuning;

/// Do the player's and the column's horizontal extents overlap
#[inline]
pub fn overlaps_horizontally(player: &Player, column: &Column) -> bool {
    player.right() >= column.x && player.x() <= column.right()
}

/// Check whether the player hits a column
///
/// Only columns the player overlaps horizontally can collide. Inside that
/// band the player must be strictly within the opening; touching the block
/// above or below counts as a hit. A column without an opening is solid.
pub fn is_colliding(player: &Player, column: &Column) -> bool {
    if !overlaps_horizontally(player, column) {
        return false;
    }
    match column.gap {
        Some(gap) => player.y <= gap.upper || player.bottom() >= gap.lower,
        None => true,
    }
}

/// Has the player left the screen far enough to restart
pub fn is_out_of_view(player: &Player, tuning: &Tuning) -> bool {
    player.bottom() < tuning.out_of_view_top
        || player.y > tuning.viewport_height + tuning.out_of_view_bottom
}
