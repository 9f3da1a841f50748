pub mod engine;
pub mod planes;
pub mod projection;
pub mod raycast;
pub mod types;

pub use engine::{Engine, WallPass};
pub use raycast::{Face, HitResult, RayOrigin, cast_ray};
pub use types::{Computed, Screen, ViewConfig};
