//! First-person viewer.
//!
//! ```bash
//! cargo run --release -- --map hall --scaling 0.5
//! cargo run --release -- --map-file room.map --texture brick.tex --texture floor.tex
//! ```
//!
//! W/S walk, A/D strafe, ←/→ or the mouse (after `E`) turn.
//! `F` borderless window, `E` cursor capture, `G` wall pass, `Esc` quits.

use std::{path::PathBuf, time::Instant};

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

use recoil_rs::{
    defs, mapfile,
    engine::{
        Engine, ViewConfig, WallPass,
        types::{DEFAULT_DOF, DEFAULT_FOV_DEG, DEFAULT_HEIGHT, DEFAULT_SCALING, DEFAULT_WIDTH},
    },
    renderer::Software,
    sim::{FrameStats, InputCmd, InputEvents, PLAYER_START, Player, Simulation},
    world::{Grid, TextureBank},
};

const TITLE: &str = "RECOIL";
/// Mouse units per frame an arrow key is worth.
const KEY_TURN: f32 = 1.0;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Built-in map to play (`demo`, `hall`)
    #[arg(long, default_value = "demo")]
    map: String,

    /// Load the grid from a map file instead of a built-in map
    #[arg(long, value_name = "FILE")]
    map_file: Option<PathBuf>,

    /// Texture file for `--map-file`; repeat in id order (first = id 1)
    #[arg(long = "texture", value_name = "FILE")]
    textures: Vec<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Horizontal field of view, degrees
    #[arg(long, default_value_t = DEFAULT_FOV_DEG)]
    fov: f32,

    /// Cells a ray may visit before it gives up
    #[arg(long, default_value_t = DEFAULT_DOF)]
    dof: u32,

    /// Rays per pixel column
    #[arg(long, default_value_t = DEFAULT_SCALING)]
    scaling: f32,

    /// Fixed ray count (overrides `--scaling` horizontally)
    #[arg(long)]
    columns: Option<usize>,

    /// Start with per-pixel wall shading from the column buffer
    #[arg(long)]
    column_pass: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let opts = Opts::parse();

    let (grid, bank, spawn) = load_world(&opts)?;
    let player = Player::spawn(&grid, spawn, 0.0)?;
    let mut sim = Simulation::new(player);

    let view = ViewConfig {
        width: opts.width,
        height: opts.height,
        fov: opts.fov.to_radians(),
        dof: opts.dof,
        scaling: opts.scaling,
        columns: opts.columns,
    };
    let mut engine = Engine::new(Software::default(), grid, bank, view);
    if opts.column_pass {
        engine.wall_pass = WallPass::Columns;
    }
    info!(
        columns = engine.computed().columns,
        rows = engine.computed().rows,
        pass = ?engine.wall_pass,
        "engine ready"
    );

    let mut fullscreen = false;
    let mut captured = false;
    let mut last_mouse_x: Option<f32> = None;
    let mut win = open_window(opts.width, opts.height, fullscreen)?;

    // ────────────────── timing state ────────────────────────────────────
    let start = Instant::now();
    let mut stats = FrameStats::default();

    while win.is_open() {
        let t0 = Instant::now(); // ┌─ frame timer start

        /* --------------- one InputCmd per frame -------------------------- */
        let cmd = sample_input(&win, captured, &mut last_mouse_x);

        if cmd.events.contains(InputEvents::QUIT) {
            break;
        }
        if cmd.events.contains(InputEvents::TOGGLE_FULLSCREEN) {
            fullscreen = !fullscreen;
            let (w, h) = win.get_size();
            win = open_window(w, h, fullscreen)?;
            win.set_cursor_visibility(!captured);
            info!(fullscreen, "window recreated");
        }
        if cmd.events.contains(InputEvents::TOGGLE_CURSOR) {
            captured = !captured;
            win.set_cursor_visibility(!captured);
            last_mouse_x = None;
            info!(captured, "cursor capture");
        }
        if cmd.events.contains(InputEvents::TOGGLE_WALL_PASS) {
            engine.wall_pass = engine.wall_pass.toggled();
            info!(pass = ?engine.wall_pass, "wall pass switched");
        }

        /* --------------- resize, move, draw ------------------------------ */
        let (w, h) = win.get_size();
        engine.resize(w, h, sim.player.rotation);

        sim.step(&engine.grid, &cmd, start.elapsed().as_secs_f64());
        let camera = sim
            .player
            .camera(engine.computed().camera_plane_half_width);

        let mut shown = Ok(());
        engine.render_frame(camera, |fb, w, h| {
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;

        // ─────────── accumulate & report every ~3 s ────────────────────
        if let Some(r) = stats.record(t0.elapsed().as_secs_f32()) {
            info!(frames = r.frames, avg_ms = r.avg_ms, fps = r.fps, "frame timing");
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Grid, textures and spawn point from either a built-in map or files.
fn load_world(opts: &Opts) -> anyhow::Result<(Grid, TextureBank, Vec2)> {
    if let Some(path) = &opts.map_file {
        // without texture files the built-in ids 1 and 2 stay available
        let mut bank = if opts.textures.is_empty() {
            defs::default_bank()?
        } else {
            TextureBank::default_with_checker()
        };
        let grid = mapfile::load_world(path, &opts.textures, &mut bank)
            .with_context(|| format!("loading {}", path.display()))?;
        return Ok((grid, bank, PLAYER_START));
    }

    let def = defs::builtin_map(&opts.map).with_context(|| {
        let names: Vec<_> = defs::builtin_names().collect();
        format!("unknown map `{}` (built-in: {})", opts.map, names.join(", "))
    })?;
    let grid = def.build()?;
    let bank = defs::default_bank()?;
    mapfile::validate_ids(&grid, &bank)?;
    info!(map = def.name, width = grid.width(), height = grid.height(), "built-in map");
    Ok((grid, bank, def.spawn))
}

fn open_window(width: usize, height: usize, fullscreen: bool) -> anyhow::Result<Window> {
    let mut win = Window::new(
        TITLE,
        width.max(1),
        height.max(1),
        WindowOptions {
            resize: true,
            borderless: fullscreen,
            topmost: fullscreen,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(60);
    Ok(win)
}

fn sample_input(win: &Window, captured: bool, last_mouse_x: &mut Option<f32>) -> InputCmd {
    let down = |k| win.is_key_down(k);
    let pressed = |k| win.is_key_pressed(k, KeyRepeat::No);

    let mut cmd = InputCmd::from_keys(
        down(Key::W) || down(Key::Up),
        down(Key::S) || down(Key::Down),
        down(Key::D),
        down(Key::A),
        0.0,
    );

    /* turning: arrows always, mouse only while captured */
    if down(Key::Right) {
        cmd.mouse_dx += KEY_TURN;
    }
    if down(Key::Left) {
        cmd.mouse_dx -= KEY_TURN;
    }
    if captured {
        if let Some((x, _)) = win.get_mouse_pos(MouseMode::Pass) {
            if let Some(prev) = last_mouse_x.replace(x) {
                cmd.mouse_dx += x - prev;
            }
        }
    }

    cmd.events.set(InputEvents::TOGGLE_FULLSCREEN, pressed(Key::F));
    cmd.events.set(InputEvents::TOGGLE_CURSOR, pressed(Key::E));
    cmd.events.set(InputEvents::TOGGLE_WALL_PASS, pressed(Key::G));
    cmd.events.set(InputEvents::QUIT, down(Key::Escape));
    cmd
}
