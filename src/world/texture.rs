// Format-agnostic repository of indexed textures.
// The grid and the renderer interact through `TextureId` only.

use std::collections::HashMap;

use std::ops::{Index, IndexMut};

/// Runtime handle for a texture in this bank; doubles as a grid cell id.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// Pixel format of resolved colours (0x00RRGGBB).
pub type Rgba = u32;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first, which lines up
/// with grid id 0 meaning "empty": a map id `n > 0` selects the n-th texture
/// inserted after the fallback.
pub const NO_TEXTURE: TextureId = 0;

/// Well-known palette slots used by the built-in data.
pub mod colors {
    pub const WHITE: u8 = 0;
    pub const GOLD: u8 = 1;
    pub const GREEN: u8 = 2;
    pub const RED: u8 = 3;
    pub const SKY: u8 = 4;
    pub const BLACK: u8 = 5;
    pub const LIGHT_GREY: u8 = 8;
    pub const DARK_GREY: u8 = 16;
}

/// CPU-side storage: one palette index per texel, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u8>,
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        let mut pix = vec![0u8; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 {
                    colors::LIGHT_GREY
                } else {
                    colors::DARK_GREY
                };
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            w: 8,
            h: 8,
            pixels: pix,
        }
    }
}

impl Texture {
    /// Texel at integer coordinates, bounds-checked.
    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.w || y >= self.h {
            return None;
        }
        self.pixels.get(y * self.w + x).copied()
    }

    /// Nearest-neighbour column for a face offset in `[0, 1)`.
    #[inline]
    pub fn column_for(&self, offset: f32) -> usize {
        ((offset * self.w as f32) as usize).min(self.w.saturating_sub(1))
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Pixel count does not match `w * h`.
    #[error("texture `{name}` is {w}x{h} but carries {got} texels")]
    BadSize {
        name: String,
        w: usize,
        h: usize,
        got: usize,
    },
}

#[derive(Clone)]
pub struct Palette(pub [Rgba; 256]);
impl Default for Palette {
    /// The handful of colours the built-in maps use.
    fn default() -> Self {
        let mut p = [0u32; 256];
        p[colors::WHITE as usize] = 0x00_FF_FF_FF;
        p[colors::GOLD as usize] = 0x00_FF_CB_00;
        p[colors::GREEN as usize] = 0x00_00_E4_30;
        p[colors::RED as usize] = 0x00_E6_29_37;
        p[colors::SKY as usize] = 0x00_00_79_F1;
        p[colors::BLACK as usize] = 0x00_00_00_00;
        p[colors::LIGHT_GREY as usize] = 0x00_A0_A0_A0;
        p[colors::DARK_GREY as usize] = 0x00_50_50_50;
        Palette(p)
    }
}
impl Index<usize> for Palette {
    type Output = Rgba;
    fn index(&self, idx: usize) -> &Rgba {
        &self.0[idx]
    }
}
impl IndexMut<usize> for Palette {
    fn index_mut(&mut self, idx: usize) -> &mut Rgba {
        &mut self.0[idx]
    }
}

/// Scale every channel of `color` by `brightness`, clamped per channel.
#[inline]
pub fn shade(color: Rgba, brightness: f32) -> Rgba {
    if brightness == 1.0 {
        return color;
    }
    let scale = |c: u32| ((c as f32 * brightness).clamp(0.0, 255.0)) as u32;
    let r = scale((color >> 16) & 0xFF);
    let g = scale((color >> 8) & 0xFF);
    let b = scale(color & 0xFF);
    (color & 0xFF_00_00_00) | (r << 16) | (g << 8) | b
}

/// A palette-indexed cache of textures.
///
/// * Does **not** know about files or GPUs; `mapfile` fills it.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the "missing" checkerboard.
#[derive(Clone)]
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
    palette: Palette,
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
            palette: Palette::default(),
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Resolve a texel (palette index) to a colour.
    #[inline]
    pub fn color(&self, texel: u8) -> Rgba {
        self.palette[texel as usize]
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of textures stored (including the "missing" one).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    /// Obtain the id for a *loaded* texture by name.
    /// Returns `None` if the name is unknown.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Like [`texture`](Self::texture) but unknown ids fall back to the
    /// checkerboard, so a bad id still draws something visible.
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data
            .get(id as usize)
            .unwrap_or(&self.data[NO_TEXTURE as usize])
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`) or the pixel
    ///   payload does not match the dimensions (`BadSize`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if tex.w == 0 || tex.h == 0 || tex.pixels.len() != tex.w * tex.h {
            return Err(TextureError::BadSize {
                name,
                w: tex.w,
                h: tex.h,
                got: tex.pixels.len(),
            });
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
