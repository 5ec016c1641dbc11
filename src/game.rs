//! Frame loop
//!
//! Owns the game state and drives the simulation at a fixed tick rate
//! (`Tuning::frame_rate_hz`) from whatever cadence the display schedules
//! frames at, redrawing once per frame. Every frame first cancels whatever
//! request is still outstanding and then asks for the next one, so restarting
//! the loop can never leave two callbacks chained.

use crate::platform::Scheduler;
use crate::renderer::{Renderer, draw_scene};
use crate::sim::{GameEvent, GameState, GapSource, Phase, TickInput, tick};
use crate::tuning::Tuning;

/// Longest frame gap fed to the simulation (seconds)
const MAX_FRAME_DT: f64 = 0.1;
/// Cap on ticks per frame so a stall can't snowball
const MAX_SUBSTEPS: u32 = 8;
/// Slack for accumulated rounding when a frame lands right on a tick boundary
const STEP_EPSILON: f64 = 1e-6;

/// Game instance holding all state and its collaborators
pub struct FrameLoop<S: Scheduler, R: Renderer, G: GapSource> {
    state: GameState,
    input: TickInput,
    scheduler: S,
    renderer: R,
    gaps: G,
    pending: Option<S::Handle>,
    /// Timestamp of the previous frame (ms)
    last_time: Option<f64>,
    /// Unsimulated time (seconds)
    accumulator: f64,
    frames: u64,
    best_score: u64,
}

impl<S: Scheduler, R: Renderer, G: GapSource> FrameLoop<S, R, G> {
    pub fn new(tuning: Tuning, scheduler: S, renderer: R, gaps: G) -> Self {
        Self {
            state: GameState::new(tuning),
            input: TickInput::default(),
            scheduler,
            renderer,
            gaps,
            pending: None,
            last_time: None,
            accumulator: 0.0,
            frames: 0,
            best_score: 0,
        }
    }

    /// Begin a fresh game and run its first frame
    pub fn start(&mut self) {
        self.state = GameState::new(self.state.tuning.clone());
        self.input.jump = false;
        self.last_time = None;
        self.accumulator = 0.0;
        log::info!(
            "Game started ({}x{} viewport, {} columns, {} ticks/s)",
            self.state.tuning.viewport_width,
            self.state.tuning.viewport_height,
            self.state.columns.len(),
            self.state.tuning.frame_rate_hz
        );
        self.run_frame(None);
    }

    /// One scheduled frame at `time` (ms, as passed to a
    /// `requestAnimationFrame` callback): reschedule, tick, draw
    pub fn frame(&mut self, time: f64) {
        self.run_frame(Some(time));
    }

    /// Length of one simulation tick (seconds)
    pub fn tick_dt(&self) -> f64 {
        1.0 / self.state.tuning.frame_rate_hz as f64
    }

    fn run_frame(&mut self, time: Option<f64>) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_tick(handle);
        }
        self.pending = self.scheduler.request_tick();

        let step = self.tick_dt();
        // Without a previous timestamp the frame counts as exactly one tick
        let dt = match (self.last_time, time) {
            (Some(last), Some(now)) if now.is_finite() => {
                ((now - last) / 1000.0).clamp(0.0, MAX_FRAME_DT)
            }
            (Some(_), Some(_)) => 0.0,
            _ => step,
        };
        if let Some(now) = time.filter(|t| t.is_finite()) {
            self.last_time = Some(now);
        }
        self.update(dt);
        self.frames += 1;

        draw_scene(&self.state, &mut self.renderer);
        self.renderer.present();
    }

    /// Run as many fixed ticks as `dt` covers
    fn update(&mut self, dt: f64) {
        let step = self.tick_dt();
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator + STEP_EPSILON >= step && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            for event in tick(&mut self.state, &input, &mut self.gaps) {
                self.log_event(event);
            }
            self.accumulator -= step;
            substeps += 1;

            // One-shot
            self.input.jump = false;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of replaying it next frame
            self.accumulator = self.accumulator.min(step);
        }
        self.accumulator = self.accumulator.max(0.0);
    }

    fn log_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::ColumnEntered {
                column,
                gap_index,
                score,
            } => {
                log::debug!("Column {} entered with gap at {} (score {})", column, gap_index, score);
            }
            GameEvent::Collided { column, score } => {
                log::info!("Crashed into column {} with score {}", column, score);
            }
            GameEvent::Restarted { final_score } => {
                self.best_score = self.best_score.max(final_score);
                log::info!(
                    "Round over: score {} (best {}), round {} begins",
                    final_score,
                    self.best_score,
                    self.state.round
                );
            }
        }
    }

    /// Queue a jump for the next frame (ignored once the round has ended)
    pub fn trigger(&mut self) {
        if self.state.phase == Phase::Running {
            self.input.jump = true;
        }
    }

    pub fn toggle_idle(&mut self) {
        self.input.idle_mode = !self.input.idle_mode;
        log::info!("Idle mode: {}", self.input.idle_mode);
    }

    pub fn idle_mode(&self) -> bool {
        self.input.idle_mode
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Handle of the frame request currently outstanding
    pub fn pending(&self) -> Option<S::Handle> {
        self.pending
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Highest score of any finished round
    pub fn best_score(&self) -> u64 {
        self.best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualScheduler;
    use crate::renderer::QuadBatch;
    use crate::renderer::colors;
    use crate::sim::column::tests::ScriptedGaps;

    type TestLoop = FrameLoop<ManualScheduler, QuadBatch, ScriptedGaps>;

    fn new_loop() -> TestLoop {
        let tuning = Tuning::default();
        let batch = QuadBatch::new(tuning.viewport_width, tuning.viewport_height);
        FrameLoop::new(tuning, ManualScheduler::new(), batch, ScriptedGaps::new(&[2]))
    }

    /// 60 Hz display refresh (ms)
    const REFRESH_MS: f64 = 1000.0 / 60.0;

    /// Run one frame at `time` the way the browser would: only when one is due
    fn frame_at(game: &mut TestLoop, time: f64) {
        assert!(game.scheduler_mut().take_due().is_some(), "loop stalled");
        game.frame(time);
    }

    /// Run `n` frames on a 60 Hz display
    fn pump(game: &mut TestLoop, n: usize) {
        for _ in 0..n {
            let time = game.frames() as f64 * REFRESH_MS;
            frame_at(game, time);
        }
    }

    #[test]
    fn test_start_schedules_exactly_one_frame() {
        let mut game = new_loop();
        game.start();
        assert_eq!(game.scheduler().pending(), 1);
        assert_eq!(game.frames(), 1);

        pump(&mut game, 10);
        assert_eq!(game.scheduler().pending(), 1);
        assert_eq!(game.frames(), 11);
    }

    #[test]
    fn test_restarting_never_doubles_the_loop() {
        let mut game = new_loop();
        game.start();
        game.start();
        game.start();
        assert_eq!(game.scheduler().pending(), 1);
        assert_eq!(game.scheduler().cancelled(), 2);

        pump(&mut game, 5);
        assert_eq!(game.scheduler().pending(), 1);
    }

    #[test]
    fn test_trigger_is_one_shot() {
        let mut game = new_loop();
        game.start();
        game.trigger();
        pump(&mut game, 1);
        assert_eq!(game.state().player.vy, -4.25);

        pump(&mut game, 1);
        assert_eq!(game.state().player.vy, -4.0);
    }

    #[test]
    fn test_trigger_ignored_after_crash() {
        let mut game = new_loop();
        game.start();
        game.state_mut().end();
        game.state_mut().player.vy = 2.0;
        game.trigger();
        pump(&mut game, 1);
        assert_eq!(game.state().player.vy, 2.25);
    }

    #[test]
    fn test_each_frame_is_drawn() {
        let mut game = new_loop();
        game.start();
        // Player fill and outline plus the score digit
        let batch = game.renderer();
        let player_quads = batch
            .vertices()
            .chunks(6)
            .filter(|quad| quad[0].color == colors::PLAYER)
            .count();
        assert_eq!(player_quads, 1);
        assert!(batch.quad_count() >= 1 + 4 + 6);
    }

    #[test]
    fn test_crash_and_restart_updates_best_score() {
        let mut game = new_loop();
        game.start();
        {
            let state = game.state_mut();
            state.score = 3;
            state.columns[0].x = state.player.x();
            state.columns[0].fresh = false;
            state.columns[0].set_gap_index(4);
            state.player.y = 20.0;
        }
        pump(&mut game, 1);
        assert_eq!(game.state().phase, Phase::Ended);

        let mut frames = 0;
        while game.state().phase == Phase::Ended {
            pump(&mut game, 1);
            frames += 1;
            assert!(frames < 500, "never restarted");
        }
        assert_eq!(game.best_score(), 3);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.scheduler().pending(), 1);
    }

    #[test]
    fn test_two_half_length_frames_make_one_tick() {
        let mut game = new_loop();
        game.start();
        frame_at(&mut game, 1000.0);
        let ticks = game.state().time_ticks;
        let x = game.state().columns[0].x;

        frame_at(&mut game, 1000.0 + REFRESH_MS / 2.0);
        assert_eq!(game.state().time_ticks, ticks);
        assert_eq!(game.state().columns[0].x, x);
        assert_eq!(game.frames(), 3);

        frame_at(&mut game, 1000.0 + REFRESH_MS);
        assert_eq!(game.state().time_ticks, ticks + 1);
        assert!((game.state().columns[0].x - (x - 2.2)).abs() < 1e-4);
    }

    #[test]
    fn test_tick_rate_follows_tuning() {
        let tuning = Tuning::from_json(r#"{ "frame_rate_hz": 120 }"#).unwrap();
        let batch = QuadBatch::new(tuning.viewport_width, tuning.viewport_height);
        let mut game = FrameLoop::new(tuning, ManualScheduler::new(), batch, ScriptedGaps::new(&[2]));
        game.start();
        frame_at(&mut game, 0.0);
        assert_eq!(game.state().time_ticks, 2);

        // A 60 Hz refresh covers two 120 Hz ticks
        frame_at(&mut game, REFRESH_MS);
        assert_eq!(game.state().time_ticks, 4);
        assert!((game.state().player.vy - 4.0 * 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut game = new_loop();
        game.start();
        frame_at(&mut game, 0.0);
        let ticks = game.state().time_ticks;

        // Five seconds in the background only replays a tenth of a second
        frame_at(&mut game, 5000.0);
        assert_eq!(game.state().time_ticks, ticks + 6);
    }

    #[test]
    fn test_clock_going_backwards_runs_no_ticks() {
        let mut game = new_loop();
        game.start();
        frame_at(&mut game, 500.0);
        let ticks = game.state().time_ticks;

        frame_at(&mut game, 400.0);
        assert_eq!(game.state().time_ticks, ticks);
        assert_eq!(game.scheduler().pending(), 1);
    }

    #[test]
    fn test_toggle_idle() {
        let mut game = new_loop();
        assert!(!game.idle_mode());
        game.toggle_idle();
        assert!(game.idle_mode());
    }
}
