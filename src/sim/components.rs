use bitflags::bitflags;
use glam::Vec2;
use thiserror::Error;
use tracing::warn;

use crate::world::{camera::Camera, grid::Grid};

pub const PLAYER_START: Vec2 = Vec2::new(1.5, 1.5);
pub const MOVE_SPEED: f32 = 2.5; // grid units / second
pub const ROTATION_SPEED: f32 = std::f32::consts::PI; // rad / second per mouse unit

#[derive(Error, Debug, PartialEq)]
pub enum SpawnError {
    #[error("spawn point ({x}, {y}) lies outside the {width}x{height} map")]
    OutOfBounds {
        x: f32,
        y: f32,
        width: usize,
        height: usize,
    },

    #[error("spawn point ({x}, {y}) is inside a wall")]
    InsideWall { x: f32, y: f32 },
}

/// The one thing that moves.  Owned by the frame loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Radians, kept in `[0, 2π)`.
    pub rotation: f32,
    pub speed: f32,
    pub rotation_speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            rotation: 0.0,
            speed: MOVE_SPEED,
            rotation_speed: ROTATION_SPEED,
        }
    }
}

impl Player {
    /// Place a default player at `pos`, refusing walls and the void.
    pub fn spawn(grid: &Grid, pos: Vec2, rotation: f32) -> Result<Self, SpawnError> {
        if !grid.contains(pos) {
            warn!(x = pos.x, y = pos.y, "spawn outside map");
            return Err(SpawnError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: grid.width(),
                height: grid.height(),
            });
        }
        if grid.is_solid_at(pos) {
            warn!(x = pos.x, y = pos.y, "spawn inside wall");
            return Err(SpawnError::InsideWall { x: pos.x, y: pos.y });
        }
        Ok(Self {
            pos,
            rotation: super::systems::normalize_rotation(rotation),
            ..Self::default()
        })
    }

    /// Unit view direction `(cos, sin)`.
    #[inline]
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }

    /// Pose snapshot for one frame of rendering.
    #[inline]
    pub fn camera(&self, plane_half_width: f32) -> Camera {
        Camera::new(self.pos, self.rotation, plane_half_width)
    }
}

bitflags! {
    /// One-shot key presses.  None of them touch movement or casting.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InputEvents: u8 {
        const TOGGLE_FULLSCREEN = 1 << 0; // F
        const TOGGLE_CURSOR     = 1 << 1; // E
        const TOGGLE_WALL_PASS  = 1 << 2; // G
        const QUIT              = 1 << 3; // Esc
    }
}

/// Input sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: i8, // -1 back, +1 forward
    pub strafe: i8,  // -1 left, +1 right
    pub mouse_dx: f32,
    pub events: InputEvents,
}

impl InputCmd {
    /// Build from held keys; opposite keys cancel.
    pub fn from_keys(fwd: bool, back: bool, right: bool, left: bool, mouse_dx: f32) -> Self {
        Self {
            forward: fwd as i8 - back as i8,
            strafe: right as i8 - left as i8,
            mouse_dx,
            events: InputEvents::empty(),
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn grid() -> Grid {
        Grid::from_ascii(&["#####", "#...#", "#.#.#", "#####"], 1, 0, 64.0).unwrap()
    }

    #[test]
    fn defaults_match_the_demo() {
        let p = Player::default();
        assert_eq!(p.pos, vec2(1.5, 1.5));
        assert_eq!(p.rotation, 0.0);
        assert!((p.speed - 2.5).abs() < 1e-6);
        assert!((p.direction() - vec2(1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn spawn_is_validated() {
        let g = grid();
        assert!(Player::spawn(&g, vec2(1.5, 1.5), 0.0).is_ok());
        assert_eq!(
            Player::spawn(&g, vec2(2.5, 2.5), 0.0),
            Err(SpawnError::InsideWall { x: 2.5, y: 2.5 })
        );
        assert!(matches!(
            Player::spawn(&g, vec2(-0.5, 1.5), 0.0),
            Err(SpawnError::OutOfBounds { .. })
        ));
        let p = Player::spawn(&g, vec2(3.5, 1.5), -1.0).unwrap();
        assert!((0.0..std::f32::consts::TAU).contains(&p.rotation));
    }

    #[test]
    fn opposite_keys_cancel() {
        let cmd = InputCmd::from_keys(true, true, false, true, 0.0);
        assert_eq!(cmd.forward, 0);
        assert_eq!(cmd.strafe, -1);
        assert!(cmd.events.is_empty());
    }
}
