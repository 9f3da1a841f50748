use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;

use super::collision::{MoveResult, PADDING, try_move};
use super::components::{InputCmd, Player};
use crate::world::grid::Grid;

/// Fold an angle into `[0, 2π)`.
///
/// One add/subtract of `2π` covers any per-frame turn; larger jumps fall
/// back to `rem_euclid`.
#[inline]
pub fn normalize_rotation(r: f32) -> f32 {
    let r = if r < 0.0 {
        r + TAU
    } else if r >= TAU {
        r - TAU
    } else {
        r
    };
    if (0.0..TAU).contains(&r) {
        return r;
    }
    let r = r.rem_euclid(TAU);
    // rem_euclid of a tiny negative value rounds to TAU itself
    if r >= TAU || !r.is_finite() { 0.0 } else { r }
}

/// Padding signs for the current facing, one per axis.
///
/// x is positive while looking into the right half-plane
/// (`r <= π/2` or `r > 3π/2`), y while looking "down" (`r < π`).
#[inline]
fn padding_for(rotation: f32) -> Vec2 {
    let x = if rotation <= FRAC_PI_2 || rotation > 3.0 * FRAC_PI_2 {
        PADDING
    } else {
        -PADDING
    };
    let y = if rotation < PI { PADDING } else { -PADDING };
    Vec2::new(x, y)
}

/// Apply one frame of input: turn, then walk, then strafe.
///
/// Forward and strafe are resolved one after the other, each axis
/// separately, so a diagonal push into a corner slides along whichever
/// axis is free.
pub fn player_input(player: &mut Player, grid: &Grid, cmd: &InputCmd, delta: f32) -> MoveResult {
    player.rotation =
        normalize_rotation(player.rotation + cmd.mouse_dx * player.rotation_speed * delta);

    let step = player.direction() * player.speed * delta;
    let pad = padding_for(player.rotation);

    let mut result = MoveResult {
        pos: player.pos,
        blocked_x: false,
        blocked_y: false,
    };

    if cmd.forward != 0 {
        let f = cmd.forward.signum() as f32;
        let r = try_move(grid, player.pos, step * f, pad * f);
        player.pos = r.pos;
        result.blocked_x |= r.blocked_x;
        result.blocked_y |= r.blocked_y;
    }
    if cmd.strafe != 0 {
        let s = cmd.strafe.signum() as f32;
        let r = try_move(grid, player.pos, step.perp() * s, pad.perp() * s);
        player.pos = r.pos;
        result.blocked_x |= r.blocked_x;
        result.blocked_y |= r.blocked_y;
    }

    result.pos = player.pos;
    result
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn room() -> Grid {
        let mut rows = vec!["##########".to_string()];
        rows.extend(std::iter::repeat_n("#........#".to_string(), 10));
        rows.push("##########".to_string());
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        Grid::from_ascii(&refs, 1, 0, 800.0).unwrap()
    }

    #[test]
    fn rotation_stays_in_range() {
        let g = room();
        let mut p = Player::default();
        let mut seed = 7u32;
        for _ in 0..10_000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let dx = ((seed >> 8) % 2001) as f32 - 1000.0;
            let cmd = InputCmd {
                mouse_dx: dx,
                ..InputCmd::default()
            };
            player_input(&mut p, &g, &cmd, 1.0 / 60.0);
            assert!((0.0..TAU).contains(&p.rotation), "{}", p.rotation);
        }
    }

    #[test]
    fn normalization_edges() {
        assert_eq!(normalize_rotation(0.0), 0.0);
        assert!((normalize_rotation(-0.5) - (TAU - 0.5)).abs() < 1e-6);
        assert!((normalize_rotation(TAU + 0.25) - 0.25).abs() < 1e-5);
        assert_eq!(normalize_rotation(TAU), 0.0);
        assert!((normalize_rotation(5.0 * TAU + 1.0) - 1.0).abs() < 1e-4);
        assert_eq!(normalize_rotation(-1e-9), 0.0);
        assert_eq!(normalize_rotation(f32::NAN), 0.0);
    }

    #[test]
    fn walks_forward_and_strafes_right() {
        let g = room();
        let mut p = Player {
            pos: vec2(5.5, 5.5),
            ..Player::default()
        };
        let cmd = InputCmd {
            forward: 1,
            ..InputCmd::default()
        };
        let r = player_input(&mut p, &g, &cmd, 0.1);
        assert!((p.pos - vec2(5.75, 5.5)).length() < 1e-5);
        assert!(!r.blocked());

        // facing +x, "right" is +y
        let cmd = InputCmd {
            strafe: 1,
            ..InputCmd::default()
        };
        player_input(&mut p, &g, &cmd, 0.1);
        assert!((p.pos - vec2(5.75, 5.75)).length() < 1e-5);
    }

    #[test]
    fn zero_delta_does_not_move() {
        let g = room();
        let mut p = Player::default();
        let cmd = InputCmd {
            forward: 1,
            strafe: -1,
            mouse_dx: 50.0,
            ..InputCmd::default()
        };
        player_input(&mut p, &g, &cmd, 0.0);
        assert_eq!(p, Player::default());
    }

    #[test]
    fn running_into_a_wall_stops_short() {
        let g = room();
        let mut p = Player {
            pos: vec2(8.5, 5.5),
            ..Player::default()
        };
        let cmd = InputCmd {
            forward: 1,
            ..InputCmd::default()
        };
        for _ in 0..100 {
            player_input(&mut p, &g, &cmd, 1.0 / 30.0);
        }
        assert!(p.pos.x < 9.0);
        assert!(p.pos.x > 8.5);
        assert!((p.pos.y - 5.5).abs() < 1e-6);
    }
}
