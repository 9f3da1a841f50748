//! Minimal 2-D map viewer with a ray overlay.
//!
//! ```bash
//! cargo run --release --bin recoil_rs -- [map]
//! ```
//!
//! Same controls as the first-person viewer; every column ray is drawn
//! from the player to its impact point.

use clap::Parser;
use glam::Vec2;
use minifb::{Key, Window, WindowOptions};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use recoil_rs::{
    defs,
    engine::{Engine, ViewConfig},
    renderer::Software,
    sim::{InputCmd, Player, Simulation},
    world::{Grid, texture::colors},
};

const WIDTH: usize = 800;
const HEIGHT: usize = 800;

const FLOOR_COLOUR: u32 = 0x00_20_20_20;
const RAY_COLOUR: u32 = 0x00_E6_29_37;
const PLAYER_COLOUR: u32 = 0x00_00_E4_30;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Built-in map to show
    #[arg(default_value = "demo")]
    map: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // ─────────── parse CLI & load map ────────────
    let opts = Opts::parse();
    let def = defs::builtin_map(&opts.map)
        .ok_or_else(|| anyhow::anyhow!("unknown map `{}`", opts.map))?;
    let grid = def.build()?;
    let bank = defs::default_bank()?;
    info!(map = def.name, "top-down view");

    let mut sim = Simulation::new(Player::spawn(&grid, def.spawn, 0.0)?);

    // ─────────── map‑space → screen‑space transform ────────────
    let scale = (WIDTH as f32 / grid.width() as f32).min(HEIGHT as f32 / grid.height() as f32) * 0.9; // 10 % margin
    let offset = Vec2::new(
        (WIDTH as f32 - grid.width() as f32 * scale) / 2.0,
        (HEIGHT as f32 - grid.height() as f32 * scale) / 2.0,
    );
    let to_screen = |p: Vec2| -> (i32, i32) {
        let s = p * scale + offset;
        (s.x as i32, s.y as i32)
    };

    // rays are cast at the first-person default resolution
    let mut engine = Engine::new(Software::default(), grid, bank, ViewConfig::default());
    let wall_colour = engine.texture_bank.color(colors::GOLD);

    let mut buffer = vec![0u32; WIDTH * HEIGHT];
    let mut window = Window::new("RECOIL map", WIDTH, HEIGHT, WindowOptions::default())?;
    window.set_target_fps(60);
    let start = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let turn = window.is_key_down(Key::Right) as i8 - window.is_key_down(Key::Left) as i8;
        let mut cmd = InputCmd::from_keys(
            window.is_key_down(Key::W) || window.is_key_down(Key::Up),
            window.is_key_down(Key::S) || window.is_key_down(Key::Down),
            window.is_key_down(Key::D),
            window.is_key_down(Key::A),
            0.0,
        );
        cmd.mouse_dx = turn as f32;
        sim.step(&engine.grid, &cmd, start.elapsed().as_secs_f64());

        let camera = sim
            .player
            .camera(engine.computed().camera_plane_half_width);
        engine.cast_columns(camera);

        // ─────────── rasterise cells ────────────
        buffer.fill(0);
        draw_cells(&mut buffer, &engine.grid, scale, offset, wall_colour);

        // ─────────── rays & player ────────────
        let (px, py) = to_screen(camera.pos());
        for hit in engine.hits().iter().flatten() {
            let (hx, hy) = to_screen(hit.impact);
            draw_line(&mut buffer, WIDTH, HEIGHT, px, py, hx, hy, RAY_COLOUR);
        }
        fill_rect(&mut buffer, WIDTH, HEIGHT, px - 2, py - 2, 5, 5, PLAYER_COLOUR);

        window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
    }
    Ok(())
}

/// One filled square per cell, one pixel of gap between cells.
fn draw_cells(buf: &mut [u32], grid: &Grid, scale: f32, offset: Vec2, wall: u32) {
    let side = (scale as i32 - 1).max(1);
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let colour = if grid.is_solid(x, y) { wall } else { FLOOR_COLOUR };
            let sx = (x as f32 * scale + offset.x) as i32;
            let sy = (y as f32 * scale + offset.y) as i32;
            fill_rect(buf, WIDTH, HEIGHT, sx, sy, side, side, colour);
        }
    }
}

fn fill_rect(buf: &mut [u32], w: usize, h: usize, x: i32, y: i32, rw: i32, rh: i32, colour: u32) {
    let x0 = x.clamp(0, w as i32) as usize;
    let x1 = (x + rw).clamp(0, w as i32) as usize;
    let y0 = y.clamp(0, h as i32) as usize;
    let y1 = (y + rh).clamp(0, h as i32) as usize;
    for row in y0..y1 {
        buf[row * w + x0..row * w + x1].fill(colour);
    }
}

/// Integer Bresenham line‑drawing algorithm.
fn draw_line(
    buf: &mut [u32],
    w: usize,
    h: usize,
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    colour: u32,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if (0..w as i32).contains(&x0) && (0..h as i32).contains(&y0) {
            buf[y0 as usize * w + x0 as usize] = colour;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            if x0 == x1 {
                break;
            }
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            if y0 == y1 {
                break;
            }
            err += dx;
            y0 += sy;
        }
    }
}
