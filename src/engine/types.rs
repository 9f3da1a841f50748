use tracing::debug;

use crate::world::plane_half_width;

pub const DEFAULT_WIDTH: usize = 1366;
pub const DEFAULT_HEIGHT: usize = 768;
pub const DEFAULT_DOF: u32 = 16;
pub const DEFAULT_FOV_DEG: f32 = 66.0;
pub const DEFAULT_SCALING: f32 = 0.25;

/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_h: f32, // pre-derived for speed
    pub half_w: f32, // pre-derived for speed
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            half_w: w as f32 * 0.5,
            half_h: h as f32 * 0.5,
        }
    }
}

/// User-facing view settings.  Only a resize event mutates them mid-run.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    pub width: usize,
    pub height: usize,
    /// Horizontal field of view, radians.
    pub fov: f32,
    /// Max cells a ray may visit before it is declared a miss.
    pub dof: u32,
    /// Rays per pixel column (`0.25` = one ray every four pixels).
    pub scaling: f32,
    /// Fixed ray count overriding `scaling`.
    pub columns: Option<usize>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fov: DEFAULT_FOV_DEG.to_radians(),
            dof: DEFAULT_DOF,
            scaling: DEFAULT_SCALING,
            columns: None,
        }
    }
}

/// Values derived from [`ViewConfig`] (and the yaw, for the angle start).
///
/// A cache, never a source of truth: [`Computed::recompute`] rebuilds it
/// from scratch, so calling it twice with the same inputs is a no-op.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Computed {
    pub columns: usize,
    pub rows: usize,
    pub viewport_half_height: f32,
    pub camera_plane_half_width: f32,
    pub column_angle_start: f32,
    pub column_angle_step: f32,
    pub column_pixel_width: f32,
    pub row_pixel_height: f32,
}

impl Computed {
    pub fn recompute(view: &ViewConfig, rotation: f32) -> Self {
        let width = view.width.max(1);
        let height = view.height.max(1);

        let columns = view
            .columns
            .map(|c| c.clamp(1, width))
            .unwrap_or_else(|| lanes(width, view.scaling));
        let rows = lanes(height, view.scaling);

        let computed = Self {
            columns,
            rows,
            viewport_half_height: height as f32 / 2.0,
            camera_plane_half_width: plane_half_width(view.fov),
            column_angle_step: view.fov / columns as f32,
            column_angle_start: rotation - view.fov / 2.0,
            column_pixel_width: width as f32 / columns as f32,
            row_pixel_height: height as f32 / rows as f32,
        };
        debug!(
            width,
            height,
            columns,
            rows,
            plane = computed.camera_plane_half_width,
            "view recomputed"
        );
        computed
    }

    /// Camera-space x in `[-1, 1)` for ray `n`.
    #[inline]
    pub fn camera_x(&self, n: usize) -> f32 {
        2.0 * (n as f32 / self.columns as f32) - 1.0
    }

    /// Absolute angle of ray `n`, wrapped into `[0, 2π)`.
    #[inline]
    pub fn column_angle(&self, n: usize) -> f32 {
        let a = self.column_angle_start + n as f32 * self.column_angle_step;
        a.rem_euclid(std::f32::consts::TAU)
    }
}

/// Number of rays (or scanlines) covering `pixels` at `scaling`, rounded up
/// so the last partial lane still gets one.
fn lanes(pixels: usize, scaling: f32) -> usize {
    let base = ((pixels as f32 * scaling) as usize).clamp(1, pixels);
    if pixels % base != 0 { base + 1 } else { base }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lanes_round_up() {
        let c = Computed::recompute(&ViewConfig::default(), 0.0);
        // 1366 * 0.25 = 341 rays, 1366 % 341 = 2 → one extra lane
        assert_eq!(c.columns, 342);
        // 768 * 0.25 = 192, divides evenly
        assert_eq!(c.rows, 192);
        assert!((c.row_pixel_height - 4.0).abs() < 1e-6);
        assert!((c.viewport_half_height - 384.0).abs() < 1e-6);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut view = ViewConfig::default();
        view.width = 800;
        view.height = 600;
        let a = Computed::recompute(&view, 1.0);
        let b = Computed::recompute(&view, 1.0);
        assert_eq!(a, b);
        assert_eq!(
            a.camera_plane_half_width.to_bits(),
            b.camera_plane_half_width.to_bits()
        );
        assert_eq!(a.column_angle_step.to_bits(), b.column_angle_step.to_bits());
    }

    #[test]
    fn fixed_ray_count_overrides_scaling() {
        let view = ViewConfig {
            width: 640,
            columns: Some(160),
            ..ViewConfig::default()
        };
        let c = Computed::recompute(&view, 0.0);
        assert_eq!(c.columns, 160);
        assert!((c.column_pixel_width - 4.0).abs() < 1e-6);
        assert!((c.camera_x(80)).abs() < 1e-6);
        assert!((c.camera_x(0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn column_angles_span_fov() {
        let view = ViewConfig::default();
        let c = Computed::recompute(&view, 0.0);
        let first = c.column_angle(0);
        // starts half a FOV to the left of yaw 0, wrapped
        assert!((first - (std::f32::consts::TAU - view.fov / 2.0)).abs() < 1e-4);
        let mid = c.column_angle(c.columns / 2);
        assert!(mid < 0.01 || mid > std::f32::consts::TAU - 0.01);
    }
}
