use tracing::debug;

use super::{
    collision::MoveResult,
    components::{InputCmd, Player},
    systems,
};
use crate::world::grid::Grid;

/// Longest step the simulation will take in one frame (seconds).
pub const MAX_FRAME_DELTA: f32 = 0.25;
/// Seconds between two frame-time reports.
pub const REPORT_INTERVAL: f32 = 3.0;

/// Turns monotonic timestamps into frame deltas.
///
/// The first tick only primes the clock and yields `0`; later deltas are
/// clamped to `[0, MAX_FRAME_DELTA]` so a stall (window drag, debugger)
/// never teleports the player.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    prev: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now: f64) -> f32 {
        let Some(prev) = self.prev.replace(now) else {
            return 0.0;
        };
        let raw = (now - prev) as f32;
        let delta = raw.clamp(0.0, MAX_FRAME_DELTA);
        if delta != raw {
            debug!(raw, delta, "frame delta clamped");
        }
        delta
    }
}

/// Average frame time over a reporting window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub frames: u32,
    pub avg_ms: f32,
    pub fps: f32,
}

/// Accumulates frame deltas and hands out a [`FrameReport`] every
/// [`REPORT_INTERVAL`] seconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    frames: u32,
    elapsed: f32,
}

impl FrameStats {
    pub fn record(&mut self, delta: f32) -> Option<FrameReport> {
        self.frames += 1;
        self.elapsed += delta;
        if self.elapsed < REPORT_INTERVAL {
            return None;
        }
        let report = FrameReport {
            frames: self.frames,
            avg_ms: self.elapsed * 1000.0 / self.frames as f32,
            fps: self.frames as f32 / self.elapsed,
        };
        *self = Self::default();
        Some(report)
    }
}

/// All mutable game state, owned by the frame loop and passed by
/// reference into each system.
#[derive(Clone, Debug, Default)]
pub struct Simulation {
    pub player: Player,
    clock: FrameClock,
}

impl Simulation {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            clock: FrameClock::new(),
        }
    }

    /// Advance one frame at timestamp `now` (seconds, monotonic).
    /// Returns the delta used together with the movement outcome.
    pub fn step(&mut self, grid: &Grid, cmd: &InputCmd, now: f64) -> (f32, MoveResult) {
        let delta = self.clock.tick(now);
        let moved = systems::player_input(&mut self.player, grid, cmd, delta);
        (delta, moved)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn first_tick_is_zero_and_deltas_are_clamped() {
        let mut c = FrameClock::new();
        assert_eq!(c.tick(100.0), 0.0);
        assert!((c.tick(100.016) - 0.016).abs() < 1e-4);
        // stall
        assert_eq!(c.tick(105.0), MAX_FRAME_DELTA);
        // clock going backwards
        assert_eq!(c.tick(104.0), 0.0);
        assert!((c.tick(104.1) - 0.1).abs() < 1e-4);
    }

    #[test]
    fn stats_report_every_interval() {
        let mut s = FrameStats::default();
        let mut reports = Vec::new();
        for _ in 0..400 {
            if let Some(r) = s.record(0.01) {
                reports.push(r);
            }
        }
        // 400 × 10 ms = 4 s → one report after ~300 frames
        assert_eq!(reports.len(), 1);
        let r = reports[0];
        assert!((r.avg_ms - 10.0).abs() < 0.1);
        assert!((r.fps - 100.0).abs() < 1.0);
    }

    #[test]
    fn first_frame_does_not_move_the_player() {
        let grid = Grid::from_ascii(&["#####", "#...#", "#####"], 1, 0, 64.0).unwrap();
        let mut sim = Simulation::default();
        let cmd = InputCmd {
            forward: 1,
            ..InputCmd::default()
        };
        let (delta, _) = sim.step(&grid, &cmd, 42.0);
        assert_eq!(delta, 0.0);
        assert_eq!(sim.player.pos, vec2(1.5, 1.5));

        let (delta, _) = sim.step(&grid, &cmd, 42.1);
        assert!(delta > 0.0);
        assert!(sim.player.pos.x > 1.5);
    }
}
