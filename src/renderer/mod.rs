//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! Each frame it produces two things and hands them to a type that
//! implements [`Renderer`]:
//!
//! * a list of [`DrawCall`]s: solid rectangles, sky first, then floor and
//!   ceiling rows (row-major), then wall slices (column-major);
//! * a flat buffer of [`Column`] records, one per ray, for back-ends that
//!   shade walls per pixel instead (the "fragment stage").
//!
//! A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//! stay short.

use crate::world::texture::{TextureBank, TextureId};

pub use crate::world::texture::Rgba;

mod software;

pub use software::Software;

/// Axis-aligned screen rectangle filled with one colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub color: Rgba,
}

impl Span {
    /// Clip to a `width × height` surface; `None` when nothing is left.
    pub fn clipped(self, width: usize, height: usize) -> Option<Span> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + self.w).min(width as i32);
        let y1 = (self.y + self.h).min(height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Span {
            x: x0,
            y: y0,
            w: x1 - x0,
            h: y1 - y0,
            color: self.color,
        })
    }
}

/// One drawable primitive, in painter's order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCall {
    Sky(Span),
    Plane(Span),
    Wall(Span),
}

impl DrawCall {
    #[inline]
    pub fn span(&self) -> &Span {
        match self {
            DrawCall::Sky(s) | DrawCall::Plane(s) | DrawCall::Wall(s) => s,
        }
    }
}

/// Per-column wall record, laid out for a GPU storage buffer.
///
/// * `line_height`: drawn height in pixels, already clamped to the viewport.
/// * `line_offset`: pixels cut off the top (and bottom) of the unclamped
///   column; the sampler starts this far into the wall so the texture does
///   not re-scale as the camera closes in.
/// * `texture_id == 0`: the ray hit nothing, draw background.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Column {
    pub texture_id: i32,
    pub brightness: f32,
    pub line_height: f32,
    pub line_offset: f32,
    pub texture_column_offset: f32,
}

impl Column {
    pub const VOID: Column = Column {
        texture_id: 0,
        brightness: 0.0,
        line_height: 0.0,
        line_offset: 0.0,
        texture_column_offset: 0.0,
    };

    #[inline]
    pub fn texture(&self) -> Option<TextureId> {
        match self.texture_id {
            id if id > 0 && id <= TextureId::MAX as i32 => Some(id as TextureId),
            _ => None,
        }
    }

    /// Height of the wall before viewport clamping.
    #[inline]
    pub fn full_height(&self) -> f32 {
        self.line_height + 2.0 * self.line_offset
    }
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Fill one rectangle into the internal buffer.
    fn draw_span(&mut self, span: &Span);

    /// Shade wall pixels straight from the column buffer.
    ///
    /// `column_width` is the pixel width covered by one record.
    fn draw_columns(&mut self, columns: &[Column], column_width: f32, bank: &TextureBank);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, width: usize, height: usize, calls: &[DrawCall], submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        for c in calls {
            self.draw_span(c.span());
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_clipping() {
        let s = Span {
            x: -2,
            y: 3,
            w: 5,
            h: 10,
            color: 7,
        };
        let c = s.clipped(8, 8).unwrap();
        assert_eq!((c.x, c.y, c.w, c.h), (0, 3, 3, 5));
        assert!(
            Span {
                x: 9,
                ..s
            }
            .clipped(8, 8)
            .is_none()
        );
    }

    #[test]
    fn column_texture_handle() {
        assert_eq!(Column::VOID.texture(), None);
        let c = Column {
            texture_id: 3,
            line_height: 100.0,
            line_offset: 25.0,
            ..Column::default()
        };
        assert_eq!(c.texture(), Some(3));
        assert!((c.full_height() - 150.0).abs() < 1e-6);
        assert_eq!(std::mem::size_of::<Column>(), 20);
    }
}
