//! Data-driven game parameters
//!
//! Defaults live in `crate::consts`. A tuning file only needs the fields it
//! changes; everything else falls back to the default.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game balance and layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Cadence the per-tick values below are expressed in
    pub frame_rate_hz: f32,

    // === Player ===
    pub player_edge: f32,
    /// Start position as a fraction of the viewport
    pub player_start_x: f32,
    pub player_start_y: f32,
    /// px/tick²
    pub gravity: f32,
    /// px/tick, negative is up
    pub jump_velocity: f32,

    // === Columns ===
    pub column_edge: f32,
    pub column_top: f32,
    pub column_spacing: f32,
    pub column_count: u32,
    /// px/tick, leftward
    pub column_speed: f32,
    /// First-round start offsets as multiples of viewport width
    pub column_offsets: Vec<f32>,
    /// Re-entry offset as a multiple of viewport width
    pub recycle_offset: f32,

    // === Out-of-view margins ===
    pub out_of_view_top: f32,
    pub out_of_view_bottom: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            frame_rate_hz: REFERENCE_RATE_HZ,

            player_edge: PLAYER_EDGE,
            player_start_x: PLAYER_START_X,
            player_start_y: PLAYER_START_Y,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,

            column_edge: COLUMN_EDGE,
            column_top: COLUMN_TOP,
            column_spacing: COLUMN_SPACING,
            column_count: COLUMN_COUNT,
            column_speed: COLUMN_SPEED,
            column_offsets: COLUMN_OFFSETS.to_vec(),
            recycle_offset: RECYCLE_OFFSET,

            out_of_view_top: OUT_OF_VIEW_TOP,
            out_of_view_bottom: OUT_OF_VIEW_BOTTOM,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::validated)
    }

    /// Repair values the simulation cannot run with
    pub fn validated(mut self) -> Self {
        let defaults = Tuning::default();

        if self.column_count < MIN_COLUMN_COUNT {
            log::warn!(
                "column_count {} leaves no room for a gap, using {}",
                self.column_count,
                MIN_COLUMN_COUNT
            );
            self.column_count = MIN_COLUMN_COUNT;
        }

        if self.column_offsets.is_empty() {
            log::warn!("No column offsets given, using defaults");
            self.column_offsets = defaults.column_offsets.clone();
        }

        for (name, value, fallback) in [
            ("viewport_width", &mut self.viewport_width, defaults.viewport_width),
            ("viewport_height", &mut self.viewport_height, defaults.viewport_height),
            ("frame_rate_hz", &mut self.frame_rate_hz, defaults.frame_rate_hz),
            ("player_edge", &mut self.player_edge, defaults.player_edge),
            ("column_edge", &mut self.column_edge, defaults.column_edge),
        ] {
            if !(*value > 0.0) {
                log::warn!("{} must be positive (got {}), using {}", name, value, fallback);
                *value = fallback;
            }
        }

        self
    }

    /// Rescale per-tick constants for a different frame rate
    ///
    /// Velocities scale linearly with tick length, accelerations quadratically.
    pub fn scaled_to_rate(&self, hz: f32) -> Self {
        if !(hz > 0.0) {
            log::warn!("Ignoring invalid frame rate {}", hz);
            return self.clone();
        }
        let ratio = self.frame_rate_hz / hz;
        Self {
            frame_rate_hz: hz,
            gravity: self.gravity * ratio * ratio,
            jump_velocity: self.jump_velocity * ratio,
            column_speed: self.column_speed * ratio,
            ..self.clone()
        }
    }

    /// Player spawn position (top-left corner)
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(
            self.viewport_width * self.player_start_x,
            self.viewport_height * self.player_start_y,
        )
    }

    /// First-round x of each column
    pub fn column_start_xs(&self) -> Vec<f32> {
        self.column_offsets
            .iter()
            .map(|offset| self.viewport_width * offset)
            .collect()
    }

    /// x a column jumps back to after leaving on the left
    pub fn recycle_x(&self) -> f32 {
        self.viewport_width * self.recycle_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_place_things_like_the_arcade_layout() {
        let tuning = Tuning::default();
        assert!(tuning.player_start().abs_diff_eq(Vec2::new(96.0, 123.0), 1e-3));
        assert_eq!(tuning.column_start_xs(), vec![720.0, 1080.0]);
        assert!((tuning.recycle_x() - 672.0).abs() < 0.001);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.5, "column_count": 10 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.column_count, 10);
        assert_eq!(tuning.jump_velocity, JUMP_VELOCITY);
        assert_eq!(tuning.column_offsets, COLUMN_OFFSETS.to_vec());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ gravity: }").is_err());
        assert!(Tuning::from_json(r#"{ "column_count": "eight" }"#).is_err());
    }

    #[test]
    fn test_validated_repairs_unplayable_values() {
        let tuning = Tuning {
            column_count: 3,
            column_offsets: Vec::new(),
            viewport_width: 0.0,
            player_edge: f32::NAN,
            ..Default::default()
        }
        .validated();

        assert_eq!(tuning.column_count, MIN_COLUMN_COUNT);
        assert_eq!(tuning.column_offsets, COLUMN_OFFSETS.to_vec());
        assert_eq!(tuning.viewport_width, VIEWPORT_WIDTH);
        assert_eq!(tuning.player_edge, PLAYER_EDGE);
    }

    #[test]
    fn test_scaled_to_rate_preserves_trajectory() {
        let base = Tuning::default();
        let fast = base.scaled_to_rate(120.0);

        assert_eq!(fast.frame_rate_hz, 120.0);
        assert!((fast.column_speed - 1.1).abs() < 1e-6);
        assert!((fast.jump_velocity + 2.25).abs() < 1e-6);
        assert!((fast.gravity - 0.0625).abs() < 1e-6);

        // One second of column travel is the same at both rates
        let travelled_60 = base.column_speed * 60.0;
        let travelled_120 = fast.column_speed * 120.0;
        assert!((travelled_60 - travelled_120).abs() < 1e-3);

        // Layout is untouched
        assert_eq!(fast.column_offsets, base.column_offsets);
        assert_eq!(fast.viewport_width, base.viewport_width);
    }

    #[test]
    fn test_scaled_to_invalid_rate_is_ignored() {
        let base = Tuning::default();
        assert_eq!(base.scaled_to_rate(0.0), base);
    }
}
