//! # Flat map / texture records
//!
//! Both files are little-endian, header first, payload inline:
//!
//! ```text
//! grid:    width:i32  height:i32  max_wall_height:f32  { ceiling:i32 wall:i32 floor:i32 } × w·h
//! texture: width:i32  height:i32  texel:i32 × w·h
//! ```
//!
//! Decoding works on a byte slice already in memory, so the payload length
//! can be checked against the header before anything is read.

use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::io::{self, Write};
use thiserror::Error;

use crate::world::{
    grid::{Grid, GridError, Tile},
    texture::{Texture, TextureError, TextureId},
};

/// Bytes in a grid header.
pub const GRID_HEADER: usize = 12;
/// Bytes per on-disk tile.
pub const TILE_SIZE: usize = 12;
/// Bytes in a texture header.
pub const TEXTURE_HEADER: usize = 8;
/// Bytes per on-disk texel.
pub const TEXEL_SIZE: usize = 4;

#[derive(Error, Debug)]
pub enum MapFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{what} has non-positive dimensions {width}x{height}")]
    BadDimensions {
        what: &'static str,
        width: i32,
        height: i32,
    },

    #[error("{what} payload is {got} bytes, header says {expected}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("cell ({x}, {y}) carries negative id {value}")]
    NegativeId { x: usize, y: usize, value: i32 },

    #[error("cell ({x}, {y}) id {value} does not fit a texture handle")]
    IdOutOfRange { x: usize, y: usize, value: i32 },

    #[error("texel {index} value {value} is not a palette index")]
    BadTexel { index: usize, value: i32 },

    #[error("map references texture {id} but only {loaded} are loaded")]
    UnknownTexture { id: TextureId, loaded: usize },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Validate a `width × height` header and return the element count.
fn dims(what: &'static str, width: i32, height: i32) -> Result<(usize, usize), MapFileError> {
    if width <= 0 || height <= 0 {
        return Err(MapFileError::BadDimensions {
            what,
            width,
            height,
        });
    }
    Ok((width as usize, height as usize))
}

fn expect_len(what: &'static str, bytes: &[u8], expected: usize) -> Result<(), MapFileError> {
    if bytes.len() != expected {
        return Err(MapFileError::SizeMismatch {
            what,
            expected,
            got: bytes.len(),
        });
    }
    Ok(())
}

fn cell_id(value: i32, x: usize, y: usize) -> Result<TextureId, MapFileError> {
    if value < 0 {
        return Err(MapFileError::NegativeId { x, y, value });
    }
    TextureId::try_from(value).map_err(|_| MapFileError::IdOutOfRange { x, y, value })
}

/*──────────────────────────────── grid ───────────────────────────────*/

pub fn parse_grid(bytes: &[u8]) -> Result<Grid, MapFileError> {
    if bytes.len() < GRID_HEADER {
        return Err(MapFileError::SizeMismatch {
            what: "grid",
            expected: GRID_HEADER,
            got: bytes.len(),
        });
    }
    let mut cur = bytes;
    let width = cur.read_i32::<LE>()?;
    let height = cur.read_i32::<LE>()?;
    let max_wall_height = cur.read_f32::<LE>()?;
    let (w, h) = dims("grid", width, height)?;

    let count = w.checked_mul(h).ok_or(MapFileError::BadDimensions {
        what: "grid",
        width,
        height,
    })?;
    expect_len(
        "grid",
        bytes,
        count.saturating_mul(TILE_SIZE).saturating_add(GRID_HEADER),
    )?;

    let mut cells = Vec::with_capacity(count);
    for i in 0..count {
        let (x, y) = (i % w, i / w);
        let ceiling = cell_id(cur.read_i32::<LE>()?, x, y)?;
        let wall = cell_id(cur.read_i32::<LE>()?, x, y)?;
        let floor = cell_id(cur.read_i32::<LE>()?, x, y)?;
        cells.push(Tile::new(ceiling, wall, floor));
    }
    Ok(Grid::new(w, h, max_wall_height, cells)?)
}

pub fn write_grid<W: Write>(out: &mut W, grid: &Grid) -> io::Result<()> {
    out.write_i32::<LE>(grid.width() as i32)?;
    out.write_i32::<LE>(grid.height() as i32)?;
    out.write_f32::<LE>(grid.max_wall_height())?;
    for t in grid.tiles() {
        out.write_i32::<LE>(t.ceiling as i32)?;
        out.write_i32::<LE>(t.wall as i32)?;
        out.write_i32::<LE>(t.floor as i32)?;
    }
    Ok(())
}

/*────────────────────────────── texture ──────────────────────────────*/

pub fn parse_texture(name: &str, bytes: &[u8]) -> Result<Texture, MapFileError> {
    if bytes.len() < TEXTURE_HEADER {
        return Err(MapFileError::SizeMismatch {
            what: "texture",
            expected: TEXTURE_HEADER,
            got: bytes.len(),
        });
    }
    let mut cur = bytes;
    let width = cur.read_i32::<LE>()?;
    let height = cur.read_i32::<LE>()?;
    let (w, h) = dims("texture", width, height)?;
    let count = w.checked_mul(h).ok_or(MapFileError::BadDimensions {
        what: "texture",
        width,
        height,
    })?;
    expect_len(
        "texture",
        bytes,
        count.saturating_mul(TEXEL_SIZE).saturating_add(TEXTURE_HEADER),
    )?;

    let mut pixels = Vec::with_capacity(count);
    for index in 0..count {
        let value = cur.read_i32::<LE>()?;
        let texel = u8::try_from(value).map_err(|_| MapFileError::BadTexel { index, value })?;
        pixels.push(texel);
    }
    Ok(Texture {
        name: name.to_owned(),
        w,
        h,
        pixels,
    })
}

pub fn write_texture<W: Write>(out: &mut W, tex: &Texture) -> io::Result<()> {
    out.write_i32::<LE>(tex.w as i32)?;
    out.write_i32::<LE>(tex.h as i32)?;
    for &p in &tex.pixels {
        out.write_i32::<LE>(p as i32)?;
    }
    Ok(())
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
