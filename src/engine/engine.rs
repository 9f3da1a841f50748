use rayon::prelude::*;

use crate::{
    engine::{
        planes::cast_planes,
        projection::{column_spans, project_column},
        raycast::{HitResult, RayOrigin, cast_ray},
        types::{Computed, Screen, ViewConfig},
    },
    renderer::{Column, DrawCall, Renderer, Rgba, Span},
    world::{
        camera::Camera,
        grid::Grid,
        texture::{TextureBank, colors},
    },
};

/// How wall pixels reach the frame buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WallPass {
    /// Walls become rectangles in the draw-call list.
    #[default]
    Spans,
    /// Walls are shaded per pixel from the column buffer.
    Columns,
}

impl WallPass {
    pub fn toggled(self) -> Self {
        match self {
            WallPass::Spans => WallPass::Columns,
            WallPass::Columns => WallPass::Spans,
        }
    }
}

pub struct Engine<R: Renderer> {
    pub renderer: R,
    pub grid: Grid,
    pub texture_bank: TextureBank,
    pub wall_pass: WallPass,
    view: ViewConfig,
    computed: Computed,
    screen: Screen,
    hits: Vec<Option<HitResult>>,
    columns: Vec<Column>,
    calls: Vec<DrawCall>,
}

impl<R: Renderer> Engine<R> {
    pub fn new(renderer: R, grid: Grid, texture_bank: TextureBank, view: ViewConfig) -> Self {
        let computed = Computed::recompute(&view, 0.0);
        let screen = Screen::new(view.width.max(1), view.height.max(1));
        Self {
            renderer,
            grid,
            texture_bank,
            wall_pass: WallPass::default(),
            hits: vec![None; computed.columns],
            columns: vec![Column::VOID; computed.columns],
            calls: Vec::new(),
            view,
            computed,
            screen,
        }
    }

    #[inline]
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    #[inline]
    pub fn computed(&self) -> &Computed {
        &self.computed
    }

    #[inline]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Results of the last [`cast_columns`](Self::cast_columns), one per ray.
    #[inline]
    pub fn hits(&self) -> &[Option<HitResult>] {
        &self.hits
    }

    /// Column buffer of the last cast, laid out for a fragment stage.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Draw calls of the last [`build_frame`](Self::build_frame).
    #[inline]
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Apply a new surface size.  Returns `false` when nothing changed.
    pub fn resize(&mut self, width: usize, height: usize, yaw: f32) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.view.width && height == self.view.height {
            return false;
        }
        self.view.width = width;
        self.view.height = height;
        self.computed = Computed::recompute(&self.view, yaw);
        self.screen = Screen::new(width, height);
        self.hits.resize(self.computed.columns, None);
        self.columns.resize(self.computed.columns, Column::VOID);
        true
    }

    /// Cast every column ray from one pose.
    ///
    /// `camera` is taken by value: all workers see the same snapshot even
    /// if the caller mutates the player right after.
    pub fn cast_columns(&mut self, camera: Camera) {
        self.computed.column_angle_start = camera.yaw() - self.view.fov * 0.5;

        let grid = &self.grid;
        let computed = self.computed;
        let screen = self.screen;
        let dof = self.view.dof;
        let origin = RayOrigin::new(camera.pos());

        self.hits
            .par_iter_mut()
            .zip(self.columns.par_iter_mut())
            .enumerate()
            .for_each(|(n, (hit, col))| {
                let dir = camera.ray_dir(computed.camera_x(n));
                *hit = cast_ray(grid, &origin, dir, dof);
                *col = project_column(hit.as_ref(), grid.max_wall_height(), &screen);
            });
    }

    /// Cast and turn the result into draw calls in painter's order:
    /// sky, then floor/ceiling rows, then wall slices (span pass only).
    pub fn build_frame(&mut self, camera: Camera) -> &[DrawCall] {
        self.cast_columns(camera);
        self.calls.clear();

        self.calls.push(DrawCall::Sky(Span {
            x: 0,
            y: 0,
            w: self.screen.w as i32,
            h: self.screen.half_h.ceil() as i32,
            color: self.sky_color(),
        }));

        cast_planes(
            &self.grid,
            &self.texture_bank,
            camera,
            &self.computed,
            &self.screen,
            &mut self.calls,
        );

        if self.wall_pass == WallPass::Spans {
            let cw = self.computed.column_pixel_width;
            for (n, col) in self.columns.iter().enumerate() {
                let x0 = (n as f32 * cw) as i32;
                let x1 = ((n + 1) as f32 * cw) as i32;
                let spans = column_spans(
                    col,
                    x0,
                    (x1 - x0).max(1),
                    &self.screen,
                    &self.texture_bank,
                );
                self.calls.extend(spans.into_iter().map(DrawCall::Wall));
            }
        }
        &self.calls
    }

    /// Build the frame and push it through the renderer.
    pub fn render_frame(&mut self, camera: Camera, submit: impl FnOnce(&[Rgba], usize, usize)) {
        self.build_frame(camera);

        self.renderer.begin_frame(self.screen.w, self.screen.h);
        for call in &self.calls {
            self.renderer.draw_span(call.span());
        }
        if self.wall_pass == WallPass::Columns {
            self.renderer.draw_columns(
                &self.columns,
                self.computed.column_pixel_width,
                &self.texture_bank,
            );
        }
        self.renderer.end_frame(submit);
    }

    #[inline]
    fn sky_color(&self) -> Rgba {
        self.texture_bank.color(colors::SKY)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Software;
    use crate::world::{
        camera::plane_half_width,
        texture::{Texture, shade},
    };
    use glam::vec2;

    const ROOM: [&str; 12] = [
        "##########",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "##########",
    ];

    fn engine(wall_pass: WallPass) -> Engine<Software> {
        let mut bank = TextureBank::default_with_checker();
        bank.insert(
            "WALL",
            Texture {
                name: "WALL".into(),
                w: 1,
                h: 1,
                pixels: vec![colors::GOLD],
            },
        )
        .unwrap();
        bank.insert(
            "FLAT",
            Texture {
                name: "FLAT".into(),
                w: 1,
                h: 1,
                pixels: vec![colors::GREEN],
            },
        )
        .unwrap();
        let grid = Grid::from_ascii(&ROOM, 1, 2, 80.0).unwrap();
        let view = ViewConfig {
            width: 64,
            height: 48,
            ..ViewConfig::default()
        };
        let mut e = Engine::new(Software::default(), grid, bank, view);
        e.wall_pass = wall_pass;
        e
    }

    fn camera(e: &Engine<Software>, pos: glam::Vec2, yaw: f32) -> Camera {
        Camera::new(pos, yaw, plane_half_width(e.view().fov))
    }

    #[test]
    fn one_record_per_column() {
        let mut e = engine(WallPass::Spans);
        let cam = camera(&e, vec2(1.5, 1.5), 0.0);
        e.cast_columns(cam);
        assert_eq!(e.hits().len(), e.computed().columns);
        assert_eq!(e.columns().len(), e.computed().columns);
        // closed room: every ray hits something
        assert!(e.hits().iter().all(Option::is_some));

        // centre ray of a 64 px view with 0.25 scaling: 16 columns, n = 8
        let centre = e.hits()[8].unwrap();
        assert_eq!(centre.texture, 1);
        assert!((centre.distance - 7.5).abs() < 1e-4);
    }

    #[test]
    fn parallel_cast_matches_single_rays() {
        let mut e = engine(WallPass::Spans);
        let cam = camera(&e, vec2(3.7, 6.2), 2.3);
        e.cast_columns(cam);
        let origin = RayOrigin::new(cam.pos());
        for (n, hit) in e.hits().iter().enumerate() {
            let dir = cam.ray_dir(e.computed().camera_x(n));
            assert_eq!(*hit, cast_ray(&e.grid, &origin, dir, e.view().dof));
        }
    }

    #[test]
    fn draw_calls_are_in_painters_order() {
        let mut e = engine(WallPass::Spans);
        let cam = camera(&e, vec2(5.0, 6.0), 1.0);
        let calls = e.build_frame(cam).to_vec();
        assert!(matches!(calls[0], DrawCall::Sky(_)));
        let first_wall = calls
            .iter()
            .position(|c| matches!(c, DrawCall::Wall(_)))
            .unwrap();
        assert!(calls[1..first_wall].iter().all(|c| matches!(c, DrawCall::Plane(_))));
        assert!(calls[first_wall..].iter().all(|c| matches!(c, DrawCall::Wall(_))));
    }

    #[test]
    fn column_pass_skips_wall_spans() {
        let mut e = engine(WallPass::Columns);
        let cam = camera(&e, vec2(5.0, 6.0), 1.0);
        let calls = e.build_frame(cam);
        assert!(!calls.iter().any(|c| matches!(c, DrawCall::Wall(_))));
    }

    #[test]
    fn both_passes_paint_the_wall_in_the_middle() {
        for pass in [WallPass::Spans, WallPass::Columns] {
            let mut e = engine(pass);
            let cam = camera(&e, vec2(1.5, 1.5), 0.0);
            let gold = e.texture_bank.color(colors::GOLD);
            let mut centre = 0;
            e.render_frame(cam, |fb, w, h| {
                assert_eq!(fb.len(), w * h);
                centre = fb[(h / 2) * w + w / 2];
            });
            // east wall is a vertical face: full brightness
            assert_eq!(centre, shade(gold, 1.0), "{pass:?}");
        }
    }

    #[test]
    fn resize_rebuilds_buffers_once() {
        let mut e = engine(WallPass::Spans);
        assert!(!e.resize(64, 48, 0.0));
        assert!(e.resize(128, 48, 0.0));
        assert_eq!(e.computed().columns, 32);
        assert_eq!(e.columns().len(), 32);
        assert_eq!(e.screen().w, 128);
        let before = *e.computed();
        assert!(!e.resize(128, 48, 0.0));
        assert_eq!(*e.computed(), before);
    }
}
