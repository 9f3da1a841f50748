use glam::Vec2;

use crate::{
    engine::types::{Computed, Screen},
    renderer::{DrawCall, Span},
    world::{
        camera::Camera,
        grid::{EMPTY, Grid},
        texture::{TextureBank, TextureId},
    },
};

/// Floor and ceiling by row casting.
///
/// Scanline `n` sits `pfh = half_h - n * row_h` pixels above the horizon;
/// the floor it shows lies at
///
/// ```text
/// dist = (max_wall_height / 2) / pfh
/// ```
///
/// which is where a wall of that projected half-height would stand, so the
/// floor meets the bottom of the walls.  The ceiling mirrors the floor around
/// the horizon, so one walk across the row samples both.  Ceiling id `0`
/// leaves the sky showing.
pub fn cast_planes(
    grid: &Grid,
    bank: &TextureBank,
    camera: Camera,
    computed: &Computed,
    screen: &Screen,
    out: &mut Vec<DrawCall>,
) {
    let columns = computed.columns;
    let cw = computed.column_pixel_width;
    let row_h = computed.row_pixel_height;
    let span_h = row_h.ceil() as i32;
    let half_wall = grid.max_wall_height() * 0.5;
    let (left, right) = camera.plane_edges();
    let pos = camera.pos();

    for n in 0..computed.rows {
        let y = n as f32 * row_h;
        let pfh = screen.half_h - y;
        if pfh <= 0.0 {
            break;
        }
        let dist = half_wall / pfh;
        let step = (right - left) * dist / columns as f32;
        let start = pos + left * dist;

        let ceil_y = y as i32;
        let floor_y = screen.h as i32 - ceil_y - span_h;

        let first = out.len();
        for c in 0..columns {
            let p = start + step * c as f32;
            let Some(tile) = grid.tile_at(p) else {
                continue;
            };
            if let Some(color) = sample(bank, tile.ceiling, p) {
                push_merged(out, first, column_span(c, cw, ceil_y, span_h, color));
            }
        }
        let first = out.len();
        for c in 0..columns {
            let p = start + step * c as f32;
            let Some(tile) = grid.tile_at(p) else {
                continue;
            };
            if let Some(color) = sample(bank, tile.floor, p) {
                push_merged(out, first, column_span(c, cw, floor_y, span_h, color));
            }
        }
    }
}

/// Pixel rectangle for column `c` of a row.
#[inline]
fn column_span(c: usize, cw: f32, y: i32, h: i32, color: u32) -> Span {
    let x0 = (c as f32 * cw) as i32;
    let x1 = ((c + 1) as f32 * cw) as i32;
    Span {
        x: x0,
        y,
        w: (x1 - x0).max(1),
        h,
        color,
    }
}

/// Nearest texel of plane texture `id` at world point `p`.
#[inline]
fn sample(bank: &TextureBank, id: TextureId, p: Vec2) -> Option<u32> {
    if id == EMPTY {
        return None;
    }
    let tex = bank.texture_or_missing(id);
    let f = p - p.floor();
    let tx = tex.column_for(f.x);
    let ty = ((f.y * tex.h as f32) as usize).min(tex.h - 1);
    tex.texel(tx, ty).map(|t| bank.color(t))
}

/// Append `span`, extending the previous span of the same row run instead
/// when it touches it and has the same colour.
#[inline]
fn push_merged(out: &mut Vec<DrawCall>, run_start: usize, span: Span) {
    if out.len() > run_start {
        if let Some(DrawCall::Plane(last)) = out.last_mut() {
            if last.color == span.color && last.x + last.w >= span.x {
                last.w = span.x + span.w - last.x;
                return;
            }
        }
    }
    out.push(DrawCall::Plane(span));
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::ViewConfig;
    use crate::world::{
        camera::plane_half_width,
        grid::Tile,
        texture::{Texture, colors},
    };
    use glam::vec2;

    fn flat(color: u8) -> Texture {
        Texture {
            name: "FLAT".into(),
            w: 1,
            h: 1,
            pixels: vec![color],
        }
    }

    fn bank() -> TextureBank {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("CEIL", flat(colors::GOLD)).unwrap();
        bank.insert("FLOOR", flat(colors::RED)).unwrap();
        bank
    }

    fn setup(ceiling: TextureId) -> (Grid, Camera, Computed, Screen) {
        let grid = Grid::new(10, 10, 20.0, vec![Tile::new(ceiling, 0, 2); 100]).unwrap();
        let view = ViewConfig {
            width: 40,
            height: 20,
            scaling: 0.5,
            columns: Some(10),
            ..ViewConfig::default()
        };
        let computed = Computed::recompute(&view, 0.0);
        let camera = Camera::new(vec2(5.0, 5.0), 0.0, plane_half_width(view.fov));
        (grid, camera, computed, Screen::new(40, 20))
    }

    #[test]
    fn rows_split_at_the_horizon() {
        let bank = bank();
        let (grid, camera, computed, screen) = setup(1);
        let mut out = Vec::new();
        cast_planes(&grid, &bank, camera, &computed, &screen, &mut out);
        assert!(!out.is_empty());

        let gold = bank.color(colors::GOLD);
        let red = bank.color(colors::RED);
        for call in &out {
            let DrawCall::Plane(s) = call else {
                panic!("unexpected {call:?}");
            };
            if s.y < 10 {
                assert_eq!(s.color, gold);
            } else {
                assert_eq!(s.color, red);
            }
        }

        // nearest row (one unit away) lies fully inside the map: one merged run
        let top: Vec<_> = out.iter().map(DrawCall::span).filter(|s| s.y == 0).collect();
        assert_eq!(top.len(), 1);
        assert_eq!((top[0].x, top[0].w), (0, 40));
        let bottom: Vec<_> = out.iter().map(DrawCall::span).filter(|s| s.y == 18).collect();
        assert_eq!(bottom.len(), 1);
        assert!(out.iter().all(|c| c.span().h == 2));
    }

    #[test]
    fn open_ceiling_leaves_the_sky() {
        let bank = bank();
        let (grid, camera, computed, screen) = setup(EMPTY);
        let mut out = Vec::new();
        cast_planes(&grid, &bank, camera, &computed, &screen, &mut out);
        assert!(!out.is_empty());
        assert!(out.iter().all(|c| c.span().y >= 10));
    }

    #[test]
    fn adjacent_runs_merge_only_on_equal_colour() {
        let mut out = vec![DrawCall::Plane(Span {
            x: 0,
            y: 0,
            w: 4,
            h: 2,
            color: 1,
        })];
        push_merged(&mut out, 0, Span { x: 4, y: 0, w: 4, h: 2, color: 1 });
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].span().w, 8);
        push_merged(&mut out, 0, Span { x: 8, y: 0, w: 4, h: 2, color: 2 });
        assert_eq!(out.len(), 2);
        // a new run never extends the previous one
        push_merged(&mut out, 2, Span { x: 12, y: 0, w: 4, h: 2, color: 2 });
        assert_eq!(out.len(), 3);
    }
}
