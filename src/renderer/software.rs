//! ---------------------------------------------------------------------------
//! Classic software (CPU) renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * Draw calls arrive already in painter's order (sky, planes, walls), so no
//!   depth buffer is needed.
//! * The column path (`draw_columns`, in `software/columns.rs`) is the CPU
//!   stand-in for a fragment shader reading the per-column buffer.
//! ---------------------------------------------------------------------------

use crate::{
    renderer::{Column, Renderer, Rgba, Span},
    world::texture::TextureBank,
};

mod columns;

/// Colour the frame is cleared to before anything is drawn.
pub const CLEAR_COLOR: Rgba = 0x00_00_00_00;

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Software {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read back one pixel (tests, screenshots).
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.scratch.get(y * self.width + x).copied()
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(CLEAR_COLOR);
    }

    fn draw_span(&mut self, span: &Span) {
        let Some(s) = span.clipped(self.width, self.height) else {
            return;
        };
        let (x0, x1) = (s.x as usize, (s.x + s.w) as usize);
        for y in s.y as usize..(s.y + s.h) as usize {
            let row = y * self.width;
            self.scratch[row + x0..row + x1].fill(s.color);
        }
    }

    fn draw_columns(&mut self, columns: &[Column], column_width: f32, bank: &TextureBank) {
        self.shade_columns(columns, column_width, bank);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCall, RendererExt};

    fn blue_span() -> DrawCall {
        DrawCall::Wall(Span {
            x: 1,
            y: 1,
            w: 2,
            h: 3,
            color: 0x00_00_00_FF,
        })
    }

    #[test]
    fn software_renders_span() {
        let mut sw = Software::default();
        let mut seen = 0;
        sw.draw_frame(8, 8, &[blue_span()], |fb, w, h| {
            assert_eq!((w, h), (8, 8));
            seen = fb.iter().filter(|&&px| px == 0x00_00_00_FF).count();
        });
        assert_eq!(seen, 6);
        assert_eq!(sw.pixel(1, 1), Some(0x00_00_00_FF));
        assert_eq!(sw.pixel(0, 0), Some(CLEAR_COLOR));
    }

    #[test]
    fn spans_outside_are_ignored() {
        let mut sw = Software::default();
        sw.begin_frame(4, 4);
        sw.draw_span(&Span {
            x: -10,
            y: 2,
            w: 5,
            h: 1,
            color: 1,
        });
        sw.draw_span(&Span {
            x: 3,
            y: 3,
            w: 50,
            h: 50,
            color: 2,
        });
        assert_eq!(sw.pixel(3, 3), Some(2));
        assert_eq!(sw.pixel(0, 2), Some(CLEAR_COLOR));
    }

    #[test]
    fn resize_reallocates() {
        let mut sw = Software::default();
        sw.begin_frame(4, 4);
        sw.begin_frame(6, 2);
        assert_eq!((sw.width(), sw.height()), (6, 2));
        assert_eq!(sw.pixel(5, 1), Some(CLEAR_COLOR));
        assert_eq!(sw.pixel(0, 2), None);
    }
}
