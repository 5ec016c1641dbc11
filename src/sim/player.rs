//! The player's box

use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::tuning::Tuning;

/// The falling/jumping box
///
/// `x` never changes after creation; only `y` and `vy` move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    x: f32,
    pub y: f32,
    pub vy: f32,
    pub edge: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let start = tuning.player_start();
        Self {
            x: start.x,
            y: start.y,
            vy: 0.0,
            edge: tuning.player_edge,
            gravity: tuning.gravity,
            jump_velocity: tuning.jump_velocity,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.edge
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.edge
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.edge, self.edge)
    }

    /// Apply one tick of gravity, then move
    pub fn integrate(&mut self) {
        self.vy += self.gravity;
        self.y += self.vy;
    }

    /// Replace the vertical velocity with the jump impulse
    pub fn jump(&mut self) {
        self.vy = self.jump_velocity;
    }

    /// Back to the spawn height, at rest
    pub fn respawn(&mut self, tuning: &Tuning) {
        self.y = tuning.player_start().y;
        self.vy = 0.0;
    }
}
