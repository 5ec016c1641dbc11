//! Obstacle columns
//!
//! A column is a vertical stack of square blocks with one two-block opening.
//! Columns are recycled: after leaving the viewport on the left they jump back
//! to the right and pick a new opening when they next enter.

use std::ops::RangeInclusive;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::MIN_COLUMN_COUNT;
use crate::tuning::Tuning;

/// Source of gap positions
///
/// The simulation never calls a global RNG; callers hand one of these in so
/// gap placement can be scripted.
pub trait GapSource {
    /// Pick uniformly from `range` (inclusive, never empty)
    fn pick(&mut self, range: RangeInclusive<u32>) -> u32;
}

impl GapSource for Pcg32 {
    fn pick(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.random_range(range)
    }
}

/// Valid gap start indices for a column of `count` blocks
///
/// The first and last slots are never used, so there is always at least one
/// block above and below the opening.
pub fn gap_index_range(count: u32) -> RangeInclusive<u32> {
    let count = count.max(MIN_COLUMN_COUNT);
    1..=count - 4
}

/// The opening in a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    /// Index of the first missing block
    pub index: u32,
    /// Bottom edge of the block above the opening
    pub upper: f32,
    /// Top edge of the block below the opening
    pub lower: f32,
}

/// A vertical stack of blocks moving left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Left edge
    pub x: f32,
    /// Top of the first block
    pub top: f32,
    pub edge: f32,
    /// Vertical space between blocks
    pub spacing: f32,
    pub count: u32,
    /// Leftward speed (px/tick)
    pub speed: f32,
    /// Needs a new gap (and scores) when it next enters the viewport
    pub fresh: bool,
    /// `None` until the column first enters the viewport
    pub gap: Option<Gap>,
}

impl Column {
    pub fn new(x: f32, tuning: &Tuning) -> Self {
        Self {
            x,
            top: tuning.column_top,
            edge: tuning.column_edge,
            spacing: tuning.column_spacing,
            count: tuning.column_count.max(MIN_COLUMN_COUNT),
            speed: tuning.column_speed,
            fresh: true,
            gap: None,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.edge
    }

    /// Has the left edge reached the visible area
    #[inline]
    pub fn in_view(&self, viewport_width: f32) -> bool {
        self.x <= viewport_width
    }

    /// y of block `i`'s top edge
    pub fn block_top(&self, i: u32) -> f32 {
        self.top + i as f32 * (self.edge + self.spacing)
    }

    /// Rect of block `i`
    pub fn block_bounds(&self, i: u32) -> Rect {
        Rect::new(self.x, self.block_top(i), self.edge, self.edge)
    }

    /// Is block `i` part of the opening
    pub fn is_gap_block(&self, i: u32) -> bool {
        self.gap
            .is_some_and(|gap| i == gap.index || i == gap.index + 1)
    }

    /// Height of the opening: two missing blocks and the three spaces around them
    pub fn gap_height(&self) -> f32 {
        2.0 * self.edge + 3.0 * self.spacing
    }

    /// Set the opening, clamped into the valid range, and recompute its bounds
    pub fn set_gap_index(&mut self, index: u32) {
        let range = gap_index_range(self.count);
        debug_assert!(
            range.contains(&index),
            "gap index {} outside {:?}",
            index,
            range
        );
        let index = index.clamp(*range.start(), *range.end());
        let upper = self.top + self.edge * index as f32 + self.spacing * (index - 1) as f32;
        let lower = upper + self.gap_height();
        self.gap = Some(Gap {
            index,
            upper,
            lower,
        });
    }

    /// Start a new cycle if the column just came into view
    ///
    /// Returns true exactly once per cycle; the caller scores it.
    pub fn enter_cycle<G: GapSource + ?Sized>(&mut self, viewport_width: f32, gaps: &mut G) -> bool {
        if !(self.fresh && self.in_view(viewport_width)) {
            return false;
        }
        self.fresh = false;
        let index = gaps.pick(gap_index_range(self.count));
        self.set_gap_index(index);
        true
    }

    /// Move left unless the world is frozen
    pub fn advance(&mut self, ended: bool) {
        if !ended {
            self.x -= self.speed;
        }
    }

    /// Send the column back to the right once it is fully off-screen left
    ///
    /// Returns true if it was moved.
    pub fn recycle(&mut self, restart_x: f32) -> bool {
        if self.right() >= 0.0 {
            return false;
        }
        self.x = restart_x;
        self.fresh = true;
        true
    }

    /// Back to a first-round start position
    pub fn reset(&mut self, x: f32) {
        self.x = x;
        self.fresh = true;
        self.gap = None;
    }
}
