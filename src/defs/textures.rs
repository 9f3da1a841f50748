use crate::world::texture::{Texture, TextureBank, TextureError, colors};

/// 8×8 face, `1` = lit texel.
pub const SMILEY: [&str; 8] = [
    "01111111", //
    "11011011", //
    "11011011", //
    "11011011", //
    "11111111", //
    "10111101", //
    "11000011", //
    "11111111", //
];

/// Expand a `0/1` bitmap into palette indices.
pub fn two_tone(name: &str, rows: &[&str], off: u8, on: u8) -> Texture {
    let h = rows.len();
    let w = rows.first().map_or(0, |r| r.len());
    let pixels = rows
        .iter()
        .flat_map(|r| r.bytes())
        .map(|b| if b == b'1' { on } else { off })
        .collect();
    Texture {
        name: name.to_owned(),
        w,
        h,
        pixels,
    }
}

/// Bank with the built-in textures: id 1 walls (white/gold),
/// id 2 floors and ceilings (green/red).
pub fn default_bank() -> Result<TextureBank, TextureError> {
    let mut bank = TextureBank::default_with_checker();
    bank.insert(
        "SMILEY",
        two_tone("SMILEY", &SMILEY, colors::WHITE, colors::GOLD),
    )?;
    bank.insert(
        "SMILEY_FLAT",
        two_tone("SMILEY_FLAT", &SMILEY, colors::GREEN, colors::RED),
    )?;
    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::maps::{FLAT, WALL};

    #[test]
    fn ids_line_up_with_the_maps() {
        let bank = default_bank().unwrap();
        assert_eq!(bank.id("SMILEY"), Some(WALL));
        assert_eq!(bank.id("SMILEY_FLAT"), Some(FLAT));

        let wall = bank.texture(WALL).unwrap();
        assert_eq!((wall.w, wall.h), (8, 8));
        assert_eq!(wall.texel(0, 0), Some(colors::WHITE));
        assert_eq!(wall.texel(1, 0), Some(colors::GOLD));
        // left eye
        assert_eq!(wall.texel(2, 1), Some(colors::WHITE));

        let flat = bank.texture(FLAT).unwrap();
        assert_eq!(flat.texel(0, 0), Some(colors::GREEN));
        assert_eq!(flat.texel(7, 7), Some(colors::RED));
    }
}
