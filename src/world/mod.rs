pub mod camera;
pub mod grid;
pub mod texture;

pub use grid::{EMPTY, Grid, GridError, Tile};

pub use camera::{Camera, plane_half_width};

pub use texture::{NO_TEXTURE, Palette, Rgba, Texture, TextureBank, TextureError, TextureId, shade};
