mod collision;
mod components;
mod systems;
mod tic;

pub use collision::{MoveResult, PADDING, try_move};
pub use components::{
    InputCmd, InputEvents, MOVE_SPEED, PLAYER_START, Player, ROTATION_SPEED, SpawnError,
};
pub use systems::{normalize_rotation, player_input};
pub use tic::{FrameClock, FrameReport, FrameStats, MAX_FRAME_DELTA, REPORT_INTERVAL, Simulation};
