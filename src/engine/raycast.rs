//! Grid DDA ray traversal.
//!
//! One ray per screen column: the ray starts in the player's cell and hops
//! from one grid line to the next, always crossing whichever axis is closer
//! along the ray, until it enters a cell with a non-zero wall id or runs out
//! of its depth-of-field budget.
//!
//! Distances are measured in units of the ray parameter `t`
//! (`impact = origin + dir * t`).  For column rays built as
//! `forward + plane * camera_x` that *is* the perpendicular distance to the
//! camera plane, which is what keeps walls from bulging at the screen edges.

use glam::{IVec2, Vec2};

use crate::world::{EMPTY, Grid, TextureId};

/// Brightness of faces hit while crossing an x boundary.
pub const SHADE_VERTICAL: f32 = 1.0;
/// Brightness of faces hit while crossing a y boundary.
pub const SHADE_HORIZONTAL: f32 = 0.75;
/// Direction components closer to zero than this never cross their axis.
pub const DIRECTION_EPSILON: f32 = 1e-6;
/// Floor for reported distances (a hit inside the origin cell).
pub const MIN_HIT_DISTANCE: f32 = 1e-4;

/// Which kind of grid line the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    /// An x boundary (a wall face parallel to the y axis).
    Vertical,
    /// A y boundary (a wall face parallel to the x axis).
    Horizontal,
}

impl Face {
    #[inline]
    pub fn shade(self) -> f32 {
        match self {
            Face::Vertical => SHADE_VERTICAL,
            Face::Horizontal => SHADE_HORIZONTAL,
        }
    }
}

/// Where rays start this frame: the pose split into cell + in-cell offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayOrigin {
    pub pos: Vec2,
    pub cell: IVec2,
    pub frac: Vec2,
}

impl RayOrigin {
    pub fn new(pos: Vec2) -> Self {
        let cell = Grid::cell_of(pos);
        Self {
            pos,
            cell,
            frac: pos - cell.as_vec2(),
        }
    }
}

/// Result of one successful cast.  A miss is `None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    pub texture: TextureId,
    /// Perpendicular (fisheye-corrected) distance, see module docs.
    pub distance: f32,
    /// Position along the hit face in `[0, 1)`.
    pub tex_offset: f32,
    pub shade: f32,
    pub face: Face,
    pub cell: IVec2,
    /// World-space impact point; only the debug overlays read it.
    pub impact: Vec2,
}

/// Per-axis DDA state.
#[derive(Clone, Copy, Debug)]
struct AxisWalk {
    delta: f32, // ray length to cross one full cell on this axis
    side: f32,  // accumulated length to the next boundary
    step: i32,
    active: bool,
}

impl AxisWalk {
    fn new(dir: f32, frac: f32) -> Self {
        if dir.abs() < DIRECTION_EPSILON {
            // axis-parallel ray: it never reaches a boundary on this axis
            return Self {
                delta: 0.0,
                side: 0.0,
                step: 0,
                active: false,
            };
        }
        let delta = (1.0 / dir).abs();
        let (step, to_edge) = if dir < 0.0 { (-1, frac) } else { (1, 1.0 - frac) };
        Self {
            delta,
            side: delta * to_edge,
            step,
            active: true,
        }
    }

    #[inline]
    fn advance(&mut self, cell: &mut i32) {
        self.side += self.delta;
        *cell += self.step;
    }
}

/// Cast one ray through `grid`.
///
/// At most `dof` cells are tested (the origin cell included); running out
/// of budget or leaving the map is a miss, never an error.
pub fn cast_ray(grid: &Grid, origin: &RayOrigin, dir: Vec2, dof: u32) -> Option<HitResult> {
    let mut x = AxisWalk::new(dir.x, origin.frac.x);
    let mut y = AxisWalk::new(dir.y, origin.frac.y);
    if !x.active && !y.active {
        return None;
    }

    let mut cell = origin.cell;
    let mut face = Face::Vertical;
    let mut stepped = false;
    let mut texture = EMPTY;

    for _ in 0..dof {
        let id = grid.wall(cell.x, cell.y);
        if id != EMPTY {
            texture = id;
            break;
        }
        let cross_x = match (x.active, y.active) {
            (true, true) => x.side < y.side,
            (active_x, _) => active_x,
        };
        if cross_x {
            x.advance(&mut cell.x);
            face = Face::Vertical;
        } else {
            y.advance(&mut cell.y);
            face = Face::Horizontal;
        }
        stepped = true;
    }

    if texture == EMPTY {
        return None;
    }

    // un-step the last crossing: `side` already points at the *next* line
    let distance = if !stepped {
        MIN_HIT_DISTANCE
    } else {
        match face {
            Face::Vertical => x.side - x.delta,
            Face::Horizontal => y.side - y.delta,
        }
        .max(MIN_HIT_DISTANCE)
    };

    let impact = origin.pos + dir * distance;
    let raw = match face {
        Face::Vertical => {
            let f = impact.y - cell.y as f32;
            if x.step > 0 { f } else { 1.0 - f }
        }
        Face::Horizontal => {
            let f = impact.x - cell.x as f32;
            if y.step < 0 { f } else { 1.0 - f }
        }
    };

    Some(HitResult {
        texture,
        distance,
        tex_offset: wrap_unit(raw),
        shade: face.shade(),
        face,
        cell,
        impact,
    })
}

/// Fold `v` into `[0, 1)`; `rem_euclid` alone can round up to exactly 1.
#[inline]
fn wrap_unit(v: f32) -> f32 {
    let f = v.rem_euclid(1.0);
    if f >= 1.0 { 0.0 } else { f }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
