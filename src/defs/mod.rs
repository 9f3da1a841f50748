pub mod maps;
pub mod textures;

pub use self::{
    maps::{DEMO, FLAT, HALL, MapDef, WALL},
    textures::{SMILEY, default_bank, two_tone},
};

use once_cell::sync::Lazy;
use std::collections::HashMap;

static BUILTIN: &[&MapDef] = &[&DEMO, &HALL];

static BY_NAME: Lazy<HashMap<&'static str, &'static MapDef>> =
    Lazy::new(|| BUILTIN.iter().map(|def| (def.name, *def)).collect());

pub fn builtin_map(name: &str) -> Option<&'static MapDef> {
    BY_NAME.get(name).copied()
}

pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|def| def.name)
}
