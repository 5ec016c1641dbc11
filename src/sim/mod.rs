//! Simulation module
//!
//! All gameplay logic lives here. This module stays headless:
//! - One call to `tick` per frame at the tuned cadence
//! - Gap placement only through an injected `GapSource`
//! - Stable iteration order (columns in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod column;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{is_colliding, is_out_of_view, overlaps_horizontally};
pub use column::{Column, Gap, GapSource, gap_index_range};
pub use player::Player;
pub use state::{GameEvent, GameState, Phase};
pub use tick::{TickInput, autopilot_wants_jump, tick};
