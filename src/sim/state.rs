//! Game state and core simulation types

use serde::{Deserialize, Serialize};

use super::column::Column;
use super::player::Player;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Columns scroll, jumps are accepted
    #[default]
    Running,
    /// Player hit a column: the world is frozen and the box falls out of view
    Ended,
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A column entered the viewport with a new gap and scored
    ColumnEntered { column: usize, gap_index: u32, score: u64 },
    /// The player hit a column
    Collided { column: usize, score: u64 },
    /// The player left the screen and a new round started
    Restarted { final_score: u64 },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Parameters the state was built from (used again on reset)
    pub tuning: Tuning,
    /// Columns scored this round
    pub score: u64,
    pub phase: Phase,
    pub player: Player,
    pub columns: Vec<Column>,
    /// Ticks since the state was created
    pub time_ticks: u64,
    /// Rounds played, including the current one
    pub round: u32,
}

impl GameState {
    /// Create a new game at the start of its first round
    pub fn new(tuning: Tuning) -> Self {
        let player = Player::new(&tuning);
        let columns = tuning
            .column_start_xs()
            .into_iter()
            .map(|x| Column::new(x, &tuning))
            .collect();

        Self {
            tuning,
            score: 0,
            phase: Phase::Running,
            player,
            columns,
            time_ticks: 0,
            round: 1,
        }
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    /// Jump if the player is still in control
    ///
    /// Returns whether the jump was applied.
    pub fn jump(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }
        self.player.jump();
        true
    }

    /// Stop the world; the player keeps whatever velocity it had
    pub fn end(&mut self) {
        self.phase = Phase::Ended;
    }

    /// Start a new round: score 0, player and columns back at their start
    pub fn reset(&mut self) {
        self.player.respawn(&self.tuning);
        for (column, x) in self.columns.iter_mut().zip(self.tuning.column_start_xs()) {
            column.reset(x);
        }
        self.score = 0;
        self.phase = Phase::Running;
        self.round += 1;
    }
}
