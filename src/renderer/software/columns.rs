use crate::renderer::{Column, software::Software};
use crate::world::texture::{TextureBank, shade};

impl Software {
    /// Per-pixel wall shading from the column buffer.
    ///
    /// Record `i` covers screen x `[i*cw, (i+1)*cw)`.  Inside the visible band
    /// the texture row is picked from the *unclamped* column height, so rows
    /// cut off by the viewport are skipped instead of squashed.
    pub(super) fn shade_columns(&mut self, columns: &[Column], cw: f32, bank: &TextureBank) {
        if self.width == 0 || self.height == 0 || cw <= 0.0 {
            return;
        }
        let half_h = self.height as f32 * 0.5;

        for (i, col) in columns.iter().enumerate() {
            let Some(id) = col.texture() else {
                continue;
            };
            let tex = bank.texture_or_missing(id);
            let full = col.full_height();
            if full <= 0.0 {
                continue;
            }

            let x0 = ((i as f32 * cw) as usize).min(self.width);
            let x1 = (((i + 1) as f32 * cw).ceil() as usize).min(self.width);
            let top = half_h - full * 0.5;
            let y0 = (half_h - col.line_height * 0.5).max(0.0) as usize;
            let y1 = ((half_h + col.line_height * 0.5).ceil() as usize).min(self.height);

            let tx = tex.column_for(col.texture_column_offset);
            for y in y0..y1 {
                let v = (y as f32 + 0.5 - top) / full;
                let ty = ((v * tex.h as f32) as usize).min(tex.h - 1);
                let Some(texel) = tex.texel(tx, ty) else {
                    continue;
                };
                let color = shade(bank.color(texel), col.brightness);
                let row = y * self.width;
                self.scratch[row + x0..row + x1].fill(color);
            }
        }
    }
}
