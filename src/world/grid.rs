use glam::{IVec2, Vec2, ivec2};
use thiserror::Error;

use crate::world::texture::TextureId;

/// Cell id meaning "nothing here": passable wall slot, open sky, no floor.
pub const EMPTY: TextureId = 0;

/// One map cell.  Every non-zero id indexes the texture bank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    pub ceiling: TextureId,
    pub wall: TextureId,
    pub floor: TextureId,
}

impl Tile {
    pub const fn new(ceiling: TextureId, wall: TextureId, floor: TextureId) -> Self {
        Self {
            ceiling,
            wall,
            floor,
        }
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.wall != EMPTY
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    BadDimensions { width: usize, height: usize },

    #[error("grid expects {expected} cells, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    #[error("max wall height must be a positive finite number, got {0}")]
    BadWallHeight(f32),
}

/// Axis-aligned tile map, row-major (`y * width + x`).
///
/// Immutable after construction; the renderer and the movement code only
/// ever borrow it, so it can be shared freely between column workers.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    max_wall_height: f32,
    cells: Vec<Tile>,
}

impl Grid {
    pub fn new(
        width: usize,
        height: usize,
        max_wall_height: f32,
        cells: Vec<Tile>,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(GridError::BadDimensions { width, height });
        }
        let expected = width * height;
        if cells.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                got: cells.len(),
            });
        }
        if !(max_wall_height.is_finite() && max_wall_height > 0.0) {
            return Err(GridError::BadWallHeight(max_wall_height));
        }
        Ok(Self {
            width,
            height,
            max_wall_height,
            cells,
        })
    }

    /// Build a grid from ASCII rows: `#` = wall `wall`, anything else open
    /// with the given plane ids.  Handy for tests and tiny built-in maps.
    pub fn from_ascii(
        rows: &[&str],
        wall: TextureId,
        planes: TextureId,
        max_wall_height: f32,
    ) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            if row.len() != width {
                return Err(GridError::SizeMismatch {
                    expected: width * height,
                    got: cells.len() + row.len(),
                });
            }
            cells.extend(row.bytes().map(|b| match b {
                b'#' => Tile::new(EMPTY, wall, EMPTY),
                _ => Tile::new(planes, EMPTY, planes),
            }));
        }
        Self::new(width, height, max_wall_height, cells)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// World-space height used to scale wall columns (`line = h / dist`).
    #[inline]
    pub fn max_wall_height(&self) -> f32 {
        self.max_wall_height
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.cells
    }

    /// Flat offset of cell `(x, y)`, or `None` when it lies outside the map.
    ///
    /// Both axes are checked individually so a column past the east edge can
    /// never wrap onto the next row; a `Some` offset always satisfies
    /// `0 <= offset < width * height`.
    #[inline]
    pub fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        let offset = y as usize * self.width + x as usize;
        debug_assert!(offset < self.cells.len());
        Some(offset)
    }

    #[inline]
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.offset(x, y).map(|o| &self.cells[o])
    }

    /// Tile under a continuous world position (floored, never truncated).
    #[inline]
    pub fn tile_at(&self, p: Vec2) -> Option<&Tile> {
        let c = Self::cell_of(p);
        self.tile(c.x, c.y)
    }

    /// Wall id at `(x, y)`; out-of-range cells read as [`EMPTY`].
    #[inline]
    pub fn wall(&self, x: i32, y: i32) -> TextureId {
        self.tile(x, y).map_or(EMPTY, |t| t.wall)
    }

    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.wall(x, y) != EMPTY
    }

    #[inline]
    pub fn is_solid_at(&self, p: Vec2) -> bool {
        let c = Self::cell_of(p);
        self.is_solid(c.x, c.y)
    }

    /// Integer cell containing `p`.
    #[inline]
    pub fn cell_of(p: Vec2) -> IVec2 {
        ivec2(p.x.floor() as i32, p.y.floor() as i32)
    }

    /// True when `p` lies inside `[0, width) × [0, height)`.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.contains_x(p.x) && self.contains_y(p.y)
    }

    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        x >= 0.0 && x < self.width as f32
    }

    #[inline]
    pub fn contains_y(&self, y: f32) -> bool {
        y >= 0.0 && y < self.height as f32
    }

    /// Every distinct non-zero id the map references (walls and planes).
    pub fn referenced_ids(&self) -> Vec<TextureId> {
        let mut ids: Vec<TextureId> = self
            .cells
            .iter()
            .flat_map(|t| [t.ceiling, t.wall, t.floor])
            .filter(|&id| id != EMPTY)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
