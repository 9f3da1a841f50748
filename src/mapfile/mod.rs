//! Binary map and texture files.

mod loader;
mod raw;

pub use loader::{load_grid, load_texture, load_world, save_grid, save_texture, validate_ids};
pub use raw::{MapFileError, parse_grid, parse_texture, write_grid, write_texture};
