//! Playable viewer.
//!
//! ```bash
//! cargo run --release -- --assets ./assets --map e1m1.txt
//! cargo run --release -- --procedural
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use minifb::{Key, Window, WindowOptions};

use yawolf_rs::{
    assets::{self, Assets, procedural},
    config::Config,
    renderer::{RendererExt, Software},
    sim::{ChannelSink, FramePacer, Game, Intents},
    world::Map,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// TOML configuration (defaults to ./yawolf.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Asset directory, overrides `[assets] dir`
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Text map, overrides `[assets] map`
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    /// Paint textures and sprites in memory instead of loading them
    #[arg(long)]
    procedural: bool,

    /// Tick rate, overrides `[sim] tick_rate`
    #[arg(long, value_name = "HZ")]
    fps: Option<u32>,
}

/// Keyboard state → intents for this tick.
fn read_intents(win: &Window) -> Intents {
    const BINDINGS: [(&[Key], Intents); 7] = [
        (&[Key::W, Key::Up], Intents::FORWARD),
        (&[Key::S, Key::Down], Intents::BACK),
        (&[Key::A], Intents::STRAFE_LEFT),
        (&[Key::D], Intents::STRAFE_RIGHT),
        (&[Key::Left], Intents::TURN_LEFT),
        (&[Key::Right], Intents::TURN_RIGHT),
        (&[Key::Space, Key::LeftCtrl, Key::RightCtrl], Intents::SHOOT),
    ];

    BINDINGS
        .iter()
        .filter(|(keys, _)| keys.iter().any(|&k| win.is_key_down(k)))
        .fold(Intents::empty(), |acc, &(_, i)| acc | i)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // ─────────── configuration ───────────
    let args = Args::parse();
    let mut cfg = Config::load_or_default(args.config.as_deref())?;
    if let Some(dir) = args.assets {
        cfg.assets.dir = dir;
    }
    if let Some(map) = args.map {
        cfg.assets.map = Some(map);
    }
    if let Some(fps) = args.fps {
        cfg.sim.tick_rate = fps;
    }

    // ─────────── assets & level ──────────
    let assets = if args.procedural {
        log::info!("using procedural assets");
        let size = cfg.render.texture_size;
        Assets::assemble(procedural::raw(size), size).context("painting procedural assets")?
    } else {
        assets::load_assets(&cfg.assets.dir, cfg.render.texture_size)
            .with_context(|| format!("loading assets from {}", cfg.assets.dir.display()))?
    };
    let map = match &cfg.assets.map {
        Some(path) => assets::load_map(path)?,
        None => Map::builtin(),
    };
    assets.check_map(&map)?;
    assets.check_animations(&cfg.sim)?;
    let mut game = Game::new(map, cfg.sim.clone())?;

    let sound = ChannelSink::logging().context("starting the sound worker")?;
    let pacer = FramePacer::new(cfg.sim.tick_rate);
    let (w, h) = (cfg.render.width, cfg.render.height);
    let mut renderer = Software::new(cfg.render.clone());

    let mut win = Window::new("yawolf", w, h, WindowOptions::default())?;

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        let outcome = game.tick(read_intents(&win), &sound);
        if outcome.level_complete {
            log::info!("level complete after {} ticks", game.ticks());
        }

        let mut present = Ok(());
        renderer.draw_frame(w, h, &game, &assets, |fb, fw, fh| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            present = win.update_with_buffer(fb, fw, fh);
        });
        present?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            log::info!("avg render: {avg_ms:.2} ms ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }

        pacer.pace(t0.elapsed());
    }
    Ok(())
}
