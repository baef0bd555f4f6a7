//! Tank City headless runner
//!
//! Runs the simulation at 60 Hz for a number of frames with an autopilot
//! that keeps the player's gun firing, then prints the final frame as text.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec2;
use thiserror::Error;

use tank_city::consts::{FIELD_HEIGHT, FIELD_ORIGIN, FIELD_WIDTH, FRAME_DT, TILE_SIZE};
use tank_city::levels::LEVEL_1;
use tank_city::render::TankSprite;
use tank_city::sim::{BonusKind, Cell, Direction, Fraction, Game, Rect};
use tank_city::{Canvas, LevelError, Settings, SettingsError};

#[derive(Debug, Parser)]
#[command(name = "tank-city", version, about = "Headless Tank City simulation")]
struct CliArgs {
    /// Level file of 26 rows by 26 symbols; the bundled level when omitted
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,

    /// Gameplay settings JSON (missing fields keep their defaults)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Seed for AI and spawning
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Frames to simulate
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u64).range(1..))]
    frames: u64,

    /// Drop a random bonus on open ground every this many frames
    #[arg(long, value_name = "FRAMES", value_parser = clap::value_parser!(u64).range(1..))]
    bonus_every: Option<u64>,

    /// Step on synthetic frame times instead of the wall clock
    #[arg(long)]
    fast: bool,
}

#[derive(Debug, Error)]
enum RunError {
    #[error("cannot read level {path}: {source}")]
    LevelFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid level: {0}")]
    Level(#[from] LevelError),
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
}

fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), RunError> {
    let level = match &args.level {
        Some(path) => std::fs::read_to_string(path).map_err(|source| RunError::LevelFile {
            path: path.clone(),
            source,
        })?,
        None => LEVEL_1.to_string(),
    };
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut game = Game::new(&level, settings, args.seed)?;
    log::info!("Tank City running {} frames (seed {})", args.frames, args.seed);

    let frame = Duration::from_secs_f32(FRAME_DT);
    let start = Instant::now();
    for i in 0..args.frames {
        let due = start + frame.mul_f64(i as f64);
        let now = if args.fast {
            due
        } else {
            let wall = Instant::now();
            if wall < due {
                std::thread::sleep(due - wall);
            }
            Instant::now()
        };
        if args.bonus_every.is_some_and(|n| i > 0 && i % n == 0) {
            game.spawn_random_bonus();
        }
        game.fire();
        game.update_at(now);
    }

    let mut canvas = AsciiCanvas::new();
    game.render(&mut canvas);
    println!("{}", canvas);
    log::info!(
        "Finished after {} frames: score {}{}",
        game.frame,
        game.score,
        if game.is_game_over() { ", game over" } else { "" }
    );
    Ok(())
}

/// One character per terrain tile
struct AsciiCanvas {
    rows: Vec<Vec<char>>,
    banner: Option<&'static str>,
}

impl AsciiCanvas {
    fn new() -> Self {
        Self {
            rows: vec![vec!['.'; FIELD_WIDTH]; FIELD_HEIGHT],
            banner: None,
        }
    }

    fn tile_of(pos: Vec2) -> (i32, i32) {
        let local = (pos - FIELD_ORIGIN) / TILE_SIZE;
        (local.x.floor() as i32, local.y.floor() as i32)
    }

    fn put(&mut self, (col, row): (i32, i32), ch: char) {
        if col < 0 || row < 0 {
            return;
        }
        if let Some(slot) = self
            .rows
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
        {
            *slot = ch;
        }
    }

    /// Mark every tile the rectangle covers (right and bottom edges exclusive)
    fn fill(&mut self, rect: Rect, ch: char) {
        let (c0, r0) = Self::tile_of(Vec2::new(rect.x, rect.y));
        let (c1, r1) = Self::tile_of(Vec2::new(rect.right() - 0.5, rect.bottom() - 0.5));
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.put((col, row), ch);
            }
        }
    }
}

impl Canvas for AsciiCanvas {
    fn draw_cell(&mut self, rect: Rect, cell: Cell) {
        self.put(Self::tile_of(rect.center()), cell.symbol());
    }

    fn draw_tank(&mut self, sprite: &TankSprite) {
        let ch = match (sprite.fraction, sprite.spawn_frame.is_some()) {
            (_, true) => '*',
            (Fraction::Friend, false) => 'P',
            (Fraction::Enemy, false) => 'E',
        };
        self.fill(sprite.rect, ch);
    }

    fn draw_projectile(&mut self, rect: Rect, direction: Direction) {
        let ch = if direction.is_horizontal() { '-' } else { '|' };
        self.put(Self::tile_of(rect.center()), ch);
    }

    fn draw_bonus(&mut self, rect: Rect, _kind: BonusKind) {
        self.put(Self::tile_of(rect.center()), '+');
    }

    fn draw_base(&mut self, rect: Rect, broken: bool) {
        self.fill(rect, if broken { 'X' } else { 'H' });
    }

    fn draw_explosion(&mut self, center: Vec2, _frame: usize, _large: bool) {
        self.put(Self::tile_of(center), '#');
    }

    fn draw_score(&mut self, _pos: Vec2, _score: u32) {}

    fn draw_game_over(&mut self, _center: Vec2) {
        self.banner = Some("GAME OVER");
    }
}

impl std::fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}", row.iter().collect::<String>())?;
        }
        if let Some(banner) = self.banner {
            writeln!(f, "{:^width$}", banner, width = FIELD_WIDTH)?;
        }
        Ok(())
    }
}
