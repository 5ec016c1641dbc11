//! Per-frame simulation tick
//!
//! One call advances the game by one frame of the reference cadence.

use super::collision::{is_colliding, is_out_of_view};
use super::column::GapSource;
use super::state::{GameEvent, GameState, Phase};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump trigger (click/space)
    pub jump: bool,
    /// Idle/demo mode - autopilot presses jump
    pub idle_mode: bool,
}

/// Advance the game state by one tick
///
/// Order: pending jump, then for each column the entry check, recycle check
/// and advance; then player physics; then collisions; then the out-of-view
/// restart check.
pub fn tick<G: GapSource + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    gaps: &mut G,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    let wants_jump = input.jump || (input.idle_mode && autopilot_wants_jump(state));
    if wants_jump {
        state.jump();
    }

    let ended = state.is_ended();
    let viewport_width = state.tuning.viewport_width;
    let recycle_x = state.tuning.recycle_x();

    for (i, column) in state.columns.iter_mut().enumerate() {
        if column.enter_cycle(viewport_width, gaps) {
            state.score += 1;
            events.push(GameEvent::ColumnEntered {
                column: i,
                gap_index: column.gap.map_or(0, |gap| gap.index),
                score: state.score,
            });
        }
        column.recycle(recycle_x);
        column.advance(ended);
    }

    // Keeps falling after a crash
    state.player.integrate();

    if state.phase == Phase::Running {
        let hit = state
            .columns
            .iter()
            .position(|column| is_colliding(&state.player, column));
        if let Some(column) = hit {
            state.end();
            events.push(GameEvent::Collided {
                column,
                score: state.score,
            });
        }
    }

    if is_out_of_view(&state.player, &state.tuning) {
        let final_score = state.score;
        state.reset();
        events.push(GameEvent::Restarted { final_score });
    }

    events
}

/// Demo autopilot: jump while falling once the box sinks toward the bottom of
/// the next opening
pub fn autopilot_wants_jump(state: &GameState) -> bool {
    if state.is_ended() || state.player.vy < 0.0 {
        return false;
    }

    let player = &state.player;
    let next_gap = state
        .columns
        .iter()
        .filter(|column| column.right() >= player.x())
        .filter_map(|column| column.gap.map(|gap| (column.x, gap)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, gap)| gap);

    let floor = match next_gap {
        Some(gap) => gap.lower - state.tuning.column_spacing,
        None => state.tuning.viewport_height * 0.6,
    };
    player.bottom() >= floor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::column::tests::ScriptedGaps;
    use crate::tuning::Tuning;

    fn ticks_until(state: &GameState, x: f32, column: usize) -> usize {
        ((state.columns[column].x - x) / state.columns[column].speed).ceil() as usize
    }

    #[test]
    fn test_first_tick_applies_gravity_only() {
        let mut state = GameState::new(Tuning::default());
        let mut gaps = ScriptedGaps::new(&[2]);
        let y0 = state.player.y;

        let events = tick(&mut state, &TickInput::default(), &mut gaps);
        assert!(events.is_empty());
        assert_eq!(state.player.vy, 0.25);
        assert_eq!(state.player.y, y0 + 0.25);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, Phase::Running);
    }

    #[test]
    fn test_score_on_the_tick_a_column_enters() {
        let mut state = GameState::new(Tuning::default());
        let mut gaps = ScriptedGaps::new(&[2]);
        let width = state.tuning.viewport_width;
        // Keep the player hovering so it neither crashes nor falls out
        let hover = |state: &mut GameState| {
            state.player.y = 150.0;
            state.player.vy = 0.0;
        };

        let mut entered_at = None;
        for t in 1..=400 {
            hover(&mut state);
            let before = state.columns[0].x;
            let events = tick(&mut state, &TickInput::default(), &mut gaps);
            if before <= width {
                entered_at = Some(t);
                assert_eq!(state.score, 1);
                assert_eq!(
                    events,
                    vec![GameEvent::ColumnEntered {
                        column: 0,
                        gap_index: 2,
                        score: 1
                    }]
                );
                break;
            }
            assert_eq!(state.score, 0);
        }
        assert!(entered_at.is_some());
    }

    #[test]
    fn test_jump_input() {
        let mut state = GameState::new(Tuning::default());
        let mut gaps = ScriptedGaps::new(&[2]);
        let y0 = state.player.y;
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut gaps);
        assert_eq!(state.player.vy, -4.25);
        assert!(state.player.y < y0);
    }

    fn crash(state: &mut GameState, gaps: &mut ScriptedGaps) -> Vec<GameEvent> {
        // Put column 0 on top of the player with the opening far below it
        state.columns[0].x = state.player.x();
        state.columns[0].fresh = false;
        state.columns[0].set_gap_index(4);
        state.player.y = 20.0;
        state.player.vy = 1.5;
        tick(state, &TickInput::default(), gaps)
    }

    #[test]
    fn test_collision_ends_the_round() {
        let mut state = GameState::new(Tuning::default());
        let mut gaps = ScriptedGaps::new(&[2]);

        let events = crash(&mut state, &mut gaps);
        assert_eq!(state.phase, Phase::Ended);
        assert!(events.contains(&GameEvent::Collided {
            column: 0,
            score: 0
        }));
        // Velocity carries on from the impact
        assert_eq!(state.player.vy, 1.75);

        // Jumping does nothing now
        let vy = state.player.vy;
        let xs: Vec<f32> = state.columns.iter().map(|c| c.x).collect();
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, &mut gaps);
        assert!(events.is_empty());
        assert_eq!(state.player.vy, vy + 0.25);

        // Columns stopped moving
        let after: Vec<f32> = state.columns.iter().map(|c| c.x).collect();
        assert_eq!(xs, after);
    }

    #[test]
    fn test_ended_round_restarts_once_out_of_view() {
        let mut state = GameState::new(Tuning::default());
        let mut gaps = ScriptedGaps::new(&[2]);
        crash(&mut state, &mut gaps);
        state.score = 5;
        let limit = state.tuning.viewport_height + state.tuning.out_of_view_bottom;

        let mut restarted = false;
        for _ in 0..500 {
            let events = tick(&mut state, &TickInput::default(), &mut gaps);
            if let Some(event) = events.last() {
                assert_eq!(*event, GameEvent::Restarted { final_score: 5 });
                restarted = true;
                break;
            }
            assert_eq!(state.phase, Phase::Ended);
            assert!(state.player.y <= limit);
        }

        assert!(restarted);
        let fresh = GameState::new(Tuning::default());
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.player, fresh.player);
        let xs: Vec<f32> = state.columns.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![720.0, 1080.0]);
        assert!(state.columns.iter().all(|c| c.fresh));
    }

    #[test]
    fn test_falling_out_while_running_also_restarts() {
        let mut state = GameState::new(Tuning::default());
        let mut gaps = ScriptedGaps::new(&[2]);
        // Nothing on screen for the first ~110 ticks; the box just drops
        let mut restarts = 0;
        for _ in 0..ticks_until(&state, 480.0, 0) {
            for event in tick(&mut state, &TickInput::default(), &mut gaps) {
                if matches!(event, GameEvent::Restarted { .. }) {
                    restarts += 1;
                }
            }
        }
        assert!(restarts >= 1);
        assert_eq!(state.phase, Phase::Running);
    }

    #[test]
    fn test_score_counts_each_cycle_once() {
        let mut state = GameState::new(Tuning::default());
        let mut gaps = ScriptedGaps::new(&[1, 2, 3, 4]);
        let mut last_score = 0;
        let mut entries = 0;

        for _ in 0..2000 {
            // Keep the box parked where it never touches a column
            state.player.y = -30.0;
            state.player.vy = 0.0;
            state.columns.iter_mut().for_each(|c| {
                if c.x < 200.0 && c.x > 0.0 {
                    c.x = -c.edge - 1.0;
                }
            });
            for event in tick(&mut state, &TickInput::default(), &mut gaps) {
                if let GameEvent::ColumnEntered { score, .. } = event {
                    entries += 1;
                    assert_eq!(score, last_score + 1);
                    last_score = score;
                }
            }
            assert!(state.score >= last_score);
            assert_eq!(state.score, entries);
        }
        assert!(entries > 4);
    }

    #[test]
    fn test_autopilot_jumps_below_the_opening() {
        let mut state = GameState::new(Tuning::default());
        state.columns[0].x = 300.0;
        state.columns[0].set_gap_index(2);
        let gap = state.columns[0].gap.unwrap();

        state.player.vy = 1.0;
        state.player.y = gap.upper + 5.0;
        assert!(!autopilot_wants_jump(&state));

        state.player.y = gap.lower - state.player.edge;
        assert!(autopilot_wants_jump(&state));

        // Never while rising or after a crash
        state.player.vy = -1.0;
        assert!(!autopilot_wants_jump(&state));
        state.player.vy = 1.0;
        state.end();
        assert!(!autopilot_wants_jump(&state));
    }

    #[test]
    fn test_autopilot_clears_the_first_column() {
        let mut state = GameState::new(Tuning::default());
        let mut gaps = ScriptedGaps::new(&[3]);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        // Long enough for column 0 to enter and pass the player
        let ticks = ticks_until(&state, state.player.x() - 41.0, 0);
        for _ in 0..ticks {
            let events = tick(&mut state, &input, &mut gaps);
            assert!(
                !events
                    .iter()
                    .any(|e| matches!(e, GameEvent::Collided { .. } | GameEvent::Restarted { .. })),
                "autopilot crashed: {:?}",
                events
            );
        }
        assert!(state.score >= 1);
        assert_eq!(state.phase, Phase::Running);
    }
}
