use smallvec::SmallVec;

use crate::{
    engine::{raycast::HitResult, types::Screen},
    renderer::{Column, Span},
    world::texture::{Texture, TextureBank, shade},
};

/// Wall slices of one column; textures rarely exceed a few dozen rows.
pub type ColumnSpans = SmallVec<[Span; 16]>;

/// Turn one cast into the per-column record.
///
/// ```text
/// line = max_wall_height / distance
/// ```
///
/// Columns taller than the viewport are clamped symmetrically; the amount
/// cut off each end goes into `line_offset` so sampling stays anchored.
pub fn project_column(hit: Option<&HitResult>, max_wall_height: f32, screen: &Screen) -> Column {
    let Some(hit) = hit else {
        return Column::VOID;
    };
    let line = max_wall_height / hit.distance;
    let view_h = screen.h as f32;
    let (line_height, line_offset) = if line > view_h {
        (view_h, (line - view_h) / 2.0)
    } else {
        (line, 0.0)
    };
    Column {
        texture_id: hit.texture as i32,
        brightness: hit.shade,
        line_height,
        line_offset,
        texture_column_offset: hit.tex_offset,
    }
}

/// Rasterise a column record into one rectangle per visible texture row.
///
/// Texel `i` of the sampled texture column starts at
/// `top + round(i * dot)` where `dot = full_height / tex.h`, and is
/// `ceil(dot)` pixels tall; rows entirely off screen are dropped and the
/// rest are clipped to the viewport.
pub fn column_spans(
    col: &Column,
    x: i32,
    width: i32,
    screen: &Screen,
    bank: &TextureBank,
) -> ColumnSpans {
    let mut out = ColumnSpans::new();
    let Some(id) = col.texture() else {
        return out;
    };
    let tex = bank.texture_or_missing(id);
    let full = col.full_height();
    if full <= 0.0 || width <= 0 {
        return out;
    }

    let dot = full / tex.h as f32;
    let dot_h = dot.ceil() as i32;
    let top = screen.half_h - full / 2.0;
    let tx = tex.column_for(col.texture_column_offset);

    for (ty, y) in texel_rows(tex, top, dot) {
        if y + dot_h <= 0 {
            continue;
        }
        if y >= screen.h as i32 {
            break;
        }
        let Some(texel) = tex.texel(tx, ty) else {
            continue;
        };
        let span = Span {
            x,
            y,
            w: width,
            h: dot_h,
            color: shade(bank.color(texel), col.brightness),
        };
        if let Some(s) = span.clipped(screen.w, screen.h) {
            out.push(s);
        }
    }
    out
}

/// `(texture row, screen y)` pairs for a column starting at `top`.
fn texel_rows(tex: &Texture, top: f32, dot: f32) -> impl Iterator<Item = (usize, i32)> {
    (0..tex.h).map(move |i| (i, (top + (i as f32 * dot).round()) as i32))
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
