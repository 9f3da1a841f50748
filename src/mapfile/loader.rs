// ──────────────────────────────────────────────────────────────────────────
// mapfile/loader.rs
//
//  *   texture files  (in id order)  ──╮
//  *   grid file                        │  --->  Grid + populated TextureBank
//                                       ╯
// Every id the grid references must name a texture that is loaded.
// ──────────────────────────────────────────────────────────────────────────

use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};

use tracing::info;

use crate::{
    mapfile::raw::{MapFileError, parse_grid, parse_texture, write_grid, write_texture},
    world::{
        grid::Grid,
        texture::{Texture, TextureBank, TextureId},
    },
};

/// Read and decode one grid file.
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<Grid, MapFileError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let grid = parse_grid(&bytes)?;
    info!(
        path = %path.display(),
        width = grid.width(),
        height = grid.height(),
        max_wall_height = grid.max_wall_height(),
        "grid loaded"
    );
    Ok(grid)
}

/// Read one texture file into `bank`, named after the file stem.
pub fn load_texture<P: AsRef<Path>>(
    path: P,
    bank: &mut TextureBank,
) -> Result<TextureId, MapFileError> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_ascii_uppercase())
        .unwrap_or_default();
    let bytes = fs::read(path)?;
    let tex = parse_texture(&name, &bytes)?;
    let (w, h) = (tex.w, tex.h);
    let id = bank.insert(name.clone(), tex)?;
    info!(%name, id, w, h, "texture loaded");
    Ok(id)
}

/// Every non-zero id in `grid` must be a loaded texture.
pub fn validate_ids(grid: &Grid, bank: &TextureBank) -> Result<(), MapFileError> {
    match grid
        .referenced_ids()
        .into_iter()
        .find(|&id| id as usize >= bank.len())
    {
        Some(id) => Err(MapFileError::UnknownTexture {
            id,
            loaded: bank.len(),
        }),
        None => Ok(()),
    }
}

/// Load textures (file `n` becomes id `n + 1`), then the grid, then check
/// that the two agree.
pub fn load_world<P, T>(
    grid_path: P,
    texture_paths: &[T],
    bank: &mut TextureBank,
) -> Result<Grid, MapFileError>
where
    P: AsRef<Path>,
    T: AsRef<Path>,
{
    for p in texture_paths {
        load_texture(p, bank)?;
    }
    let grid = load_grid(grid_path)?;
    validate_ids(&grid, bank)?;
    Ok(grid)
}

pub fn save_grid<P: AsRef<Path>>(path: P, grid: &Grid) -> Result<(), MapFileError> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    write_grid(&mut out, grid)?;
    out.flush()?;
    Ok(())
}

pub fn save_texture<P: AsRef<Path>>(path: P, tex: &Texture) -> Result<(), MapFileError> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    write_texture(&mut out, tex)?;
    out.flush()?;
    Ok(())
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::texture::colors;

    fn smiley() -> Texture {
        Texture {
            name: "SMILEY".into(),
            w: 2,
            h: 2,
            pixels: vec![colors::WHITE, colors::GOLD, colors::GOLD, colors::WHITE],
        }
    }

    #[test]
    fn world_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let tex_path = dir.path().join("smiley.tex");
        let grid_path = dir.path().join("room.map");

        let grid = Grid::from_ascii(&["###", "#.#", "###"], 1, 0, 64.0).unwrap();
        save_texture(&tex_path, &smiley()).unwrap();
        save_grid(&grid_path, &grid).unwrap();

        let mut bank = TextureBank::default_with_checker();
        let loaded = load_world(&grid_path, &[&tex_path], &mut bank).unwrap();
        assert_eq!(loaded, grid);
        assert_eq!(bank.id("SMILEY"), Some(1));
        assert_eq!(bank.texture(1).unwrap().pixels, smiley().pixels);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let grid_path = dir.path().join("room.map");
        // wall id 1, plane id 2, but nothing loaded besides the fallback
        let grid = Grid::from_ascii(&["##", ".."], 1, 2, 64.0).unwrap();
        save_grid(&grid_path, &grid).unwrap();

        let mut bank = TextureBank::default_with_checker();
        let none: [&Path; 0] = [];
        let err = load_world(&grid_path, &none, &mut bank).unwrap_err();
        assert!(matches!(
            err,
            MapFileError::UnknownTexture { id: 1, loaded: 1 }
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_grid(dir.path().join("nope.map")).unwrap_err();
        assert!(matches!(err, MapFileError::Io(_)));
    }
}
