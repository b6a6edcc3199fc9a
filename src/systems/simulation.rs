//! Game simulation system
//!
//! Turns the variable frame rate of the window into fixed physics steps:
//! - Delta time calculation (capped)
//! - Fixed-step accumulator with a per-frame step limit
//! - Cursor motion delivered to one fixed step only
//! - Per-frame orchestrator update

use std::time::Instant;

use focus_game::{GameControl, GameError, Renderer};
use focus_input::{FrameTiming, InputSnapshot};

/// Longest frame the simulation will catch up on, in seconds
pub const MAX_FRAME_TIME: f32 = 0.25;

/// Manages the game simulation loop
pub struct SimulationSystem {
    last_frame: Instant,
    accumulator: f32,
    fixed_timestep: f32,
    max_steps_per_frame: u32,
    /// Cursor motion not yet consumed by a fixed step
    pending_cursor: (f64, f64),
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new(fixed_timestep: f32, max_steps_per_frame: u32) -> Self {
        Self {
            last_frame: Instant::now(),
            accumulator: 0.0,
            fixed_timestep,
            max_steps_per_frame: max_steps_per_frame.max(1),
            pending_cursor: (0.0, 0.0),
        }
    }

    /// Seconds since the previous call, capped at [`MAX_FRAME_TIME`]
    pub fn frame_time(&mut self) -> f32 {
        let now = Instant::now();
        let raw_dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        raw_dt.min(MAX_FRAME_TIME)
    }

    /// Add `dt` to the accumulator and return how many fixed steps to run
    ///
    /// When the step limit is hit the leftover time is discarded.
    pub fn consume_steps(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_TIME);
        let available = (self.accumulator / self.fixed_timestep) as u32;
        let steps = available.min(self.max_steps_per_frame);
        self.accumulator -= steps as f32 * self.fixed_timestep;
        if steps == self.max_steps_per_frame && self.accumulator >= self.fixed_timestep {
            log::debug!("Dropping {:.3}s of simulation time", self.accumulator);
            self.accumulator = 0.0;
        }
        steps
    }

    /// Run the fixed steps due this frame, then the frame update
    pub fn run_frame<R: Renderer>(
        &mut self,
        game: &mut GameControl<R>,
        input: &InputSnapshot,
        dt: f32,
    ) -> Result<(), GameError> {
        let (dx, dy) = input.cursor_delta();
        self.pending_cursor.0 += dx;
        self.pending_cursor.1 += dy;

        let steps = self.consume_steps(dt);
        let still = input.without_cursor_delta();
        for step in 0..steps {
            if step == 0 {
                let (dx, dy) = std::mem::take(&mut self.pending_cursor);
                game.fixed_update(&still.clone().with_cursor_delta(dx, dy), self.fixed_timestep)?;
            } else {
                game.fixed_update(&still, self.fixed_timestep)?;
            }
        }

        game.update(input, &FrameTiming::new(dt, self.fixed_timestep))
    }

    /// Time carried over to the next frame
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_accumulate_across_frames() {
        let mut sim = SimulationSystem::new(0.1, 8);
        assert_eq!(sim.consume_steps(0.05), 0);
        assert_eq!(sim.consume_steps(0.07), 1);
        assert!((sim.accumulator() - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_step_limit_drops_backlog() {
        let mut sim = SimulationSystem::new(0.01, 4);
        assert_eq!(sim.consume_steps(0.2), 4);
        assert_eq!(sim.accumulator(), 0.0);
    }

    #[test]
    fn test_frame_time_capped() {
        let mut sim = SimulationSystem::new(0.1, 8);
        assert_eq!(sim.consume_steps(10.0), 2);
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut sim = SimulationSystem::new(0.1, 8);
        assert_eq!(sim.consume_steps(-1.0), 0);
        assert_eq!(sim.accumulator(), 0.0);
    }

    #[test]
    fn test_default_construction() {
        let mut sim = SimulationSystem::default();
        assert!(sim.frame_time() < MAX_FRAME_TIME);
        assert!((sim.fixed_timestep() - 1.0 / 60.0).abs() < 1e-6);
    }
}
