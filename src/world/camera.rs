use glam::Vec2;

/// Per-frame view snapshot derived from the player pose.
///
/// * Only **yaw** is simulated – the view never tilts up/down.
/// * `Copy`: the frame driver captures one value before casting
///   and every column worker reads that same pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pos: Vec2,              // grid units
    yaw: f32,               // radians (0 = +x, growing towards +y)
    plane_half_width: f32,  // 1 / (2 tan(fov/2))
}

impl Camera {
    pub fn new(pos: Vec2, yaw: f32, plane_half_width: f32) -> Self {
        Self {
            pos,
            yaw,
            plane_half_width,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks.
    #[inline(always)]
    pub fn forward(self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        Vec2::new(c, s)
    }

    /// Unit vector pointing to the camera's right (grid y grows downward on
    /// screen, so this is `forward` rotated by +90°).
    #[inline(always)]
    pub fn right(self) -> Vec2 {
        self.forward().perp()
    }

    /// Camera-plane vector: `right` scaled to encode the field of view.
    #[inline(always)]
    pub fn plane(self) -> Vec2 {
        self.right() * self.plane_half_width
    }

    /// Ray through camera-space x in `[-1, 1)` (`-1` = left edge).
    #[inline]
    pub fn ray_dir(self, camera_x: f32) -> Vec2 {
        self.forward() + self.plane() * camera_x
    }

    /// Leftmost / rightmost ray directions, used by the floor caster.
    #[inline]
    pub fn plane_edges(self) -> (Vec2, Vec2) {
        let f = self.forward();
        let p = self.plane();
        (f - p, f + p)
    }
}

/// Half-width of the camera plane for a horizontal field of view.
///
/// ```text
/// half = 1 / (2 * tan(fov/2))
/// ```
#[inline]
pub fn plane_half_width(fov: f32) -> f32 {
    1.0 / (2.0 * (fov * 0.5).tan())
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
