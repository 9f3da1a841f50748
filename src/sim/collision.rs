//! Axis-separated grid collision.
//!
//! The player is a point.  A move is first pushed `PADDING` further along
//! the direction of travel, resolved one axis at a time (x, then y using the
//! already-resolved x), and the padding is taken back off at the end.  An
//! axis whose padded target lands in a solid cell backs off by whole frame
//! steps until the cell is free.

use glam::Vec2;

use crate::world::grid::Grid;

/// Extra look-ahead keeping the player off exact cell edges.
pub const PADDING: f32 = 0.125;
/// Steps shorter than this cannot back out of a wall; the axis stays put.
pub const BACKOFF_EPSILON: f32 = 1e-6;
/// Upper bound on back-off iterations for one axis.
pub const MAX_BACKOFF: u32 = 4096;

/// What the caller gets back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveResult {
    pub pos: Vec2,
    pub blocked_x: bool,
    pub blocked_y: bool,
}

impl MoveResult {
    #[inline]
    pub fn blocked(&self) -> bool {
        self.blocked_x || self.blocked_y
    }
}

/// Move `start` by `delta`, padded by `pad` (same frame, same signs).
pub fn try_move(grid: &Grid, start: Vec2, delta: Vec2, pad: Vec2) -> MoveResult {
    let (x, blocked_x) = resolve_axis(
        start.x,
        delta.x,
        pad.x,
        grid.width(),
        |px| grid.is_solid(px.floor() as i32, start.y.floor() as i32),
    );
    let (y, blocked_y) = resolve_axis(
        start.y,
        delta.y,
        pad.y,
        grid.height(),
        |py| grid.is_solid(x.floor() as i32, py.floor() as i32),
    );
    MoveResult {
        pos: Vec2::new(x, y),
        blocked_x,
        blocked_y,
    }
}

/// One axis of [`try_move`].  `solid(v)` tests the cell at coordinate `v`
/// on this axis, with the other axis already fixed.
fn resolve_axis(
    start: f32,
    d: f32,
    pad: f32,
    extent: usize,
    solid: impl Fn(f32) -> bool,
) -> (f32, bool) {
    let target = start + d + pad;
    // leaving the map on either side: skip the axis
    if !(target >= 0.0 && target < extent as f32) {
        return (start, true);
    }

    let mut probe = target;
    let mut blocked = false;
    let mut tries = 0;
    while solid(probe) {
        if d.abs() < BACKOFF_EPSILON || tries >= MAX_BACKOFF {
            return (start, true);
        }
        probe -= d;
        tries += 1;
        blocked = true;
    }

    let end = probe - pad;
    if solid(end) || !(end >= 0.0 && end < extent as f32) {
        return (start, true);
    }
    (end, blocked)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
