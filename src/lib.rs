//! Gap Runner - a one-button arcade game
//!
//! Core modules:
//! - `sim`: Simulation (player physics, columns, collisions, game state)
//! - `renderer`: Drawing surface trait, quad batching and the WebGPU backend
//! - `platform`: Frame scheduling abstraction (headless and browser)
//! - `game`: Frame loop tying simulation, scheduler and renderer together
//! - `tuning`: Data-driven game parameters

pub mod game;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use game::FrameLoop;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// All per-tick values assume `REFERENCE_RATE_HZ`; see `Tuning::scaled_to_rate`.
pub mod consts {
    /// Frame rate the per-tick constants were tuned for
    pub const REFERENCE_RATE_HZ: f32 = 60.0;

    /// Default viewport (canvas) size in pixels
    pub const VIEWPORT_WIDTH: f32 = 480.0;
    pub const VIEWPORT_HEIGHT: f32 = 410.0;

    /// Player box defaults
    pub const PLAYER_EDGE: f32 = 40.0;
    /// Start position as a fraction of the viewport
    pub const PLAYER_START_X: f32 = 0.2;
    pub const PLAYER_START_Y: f32 = 0.3;
    /// Downward acceleration (px/tick²)
    pub const GRAVITY: f32 = 0.25;
    /// Velocity applied by a jump (px/tick, negative is up)
    pub const JUMP_VELOCITY: f32 = -4.5;

    /// Column defaults
    pub const COLUMN_EDGE: f32 = 40.0;
    /// y of the topmost block
    pub const COLUMN_TOP: f32 = 10.0;
    /// Vertical space between stacked blocks
    pub const COLUMN_SPACING: f32 = 10.0;
    /// Blocks per column (fits a 410px tall viewport)
    pub const COLUMN_COUNT: u32 = 8;
    /// Smallest count that leaves room for the gap plus a block above and below
    pub const MIN_COLUMN_COUNT: u32 = 5;
    /// Leftward speed (px/tick)
    pub const COLUMN_SPEED: f32 = 2.2;
    /// First-round start offsets, as multiples of viewport width
    pub const COLUMN_OFFSETS: [f32; 2] = [1.5, 2.25];
    /// Re-entry offset after a column leaves on the left
    pub const RECYCLE_OFFSET: f32 = 1.4;

    /// Out-of-view margins around the viewport
    pub const OUT_OF_VIEW_TOP: f32 = -10.0;
    pub const OUT_OF_VIEW_BOTTOM: f32 = 20.0;

    /// Outline width for player and blocks
    pub const LINE_WIDTH: f32 = 2.5;
    /// Inset between outline and fill
    pub const FILL_INSET: f32 = 2.0;
    /// Score text placement and font
    pub const SCORE_POS: (f32, f32) = (10.0, 30.0);
    pub const SCORE_FONT: &str = "24px sans-serif";
}

/// Axis-aligned rectangle in screen pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Shrink by `by` on every side
    pub fn inset(&self, by: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(by),
            size: (self.size - Vec2::splat(2.0 * by)).max(Vec2::ZERO),
        }
    }

    /// True if this rect covers `other` entirely
    pub fn covers(&self, other: &Rect) -> bool {
        self.min.cmple(other.min).all() && self.max().cmpge(other.max()).all()
    }
}
