mod app;
mod canvas;
mod game;
mod levels;
mod render;
mod sprite;
mod terminal;

use app::{App, AppConfig};
use clap::Parser;
use levels::{LEVELS, Level, LevelError};
use sprite::DEFAULT_SEED;
use terminal::{FRAME_RATE, SurfaceConfig};

#[derive(Parser)]
#[command(name = "pixban")]
#[command(about = "A tiny Sokoban with procedurally generated pixel art", long_about = None)]
struct Args {
    /// Seed for the sprite noise
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Level to start on (1-indexed)
    #[arg(short, long, default_value_t = 1)]
    level: usize,

    /// Redraw rate in frames per second
    #[arg(long, default_value_t = FRAME_RATE)]
    fps: u32,

    /// Terminal cells per canvas pixel along each axis
    #[arg(short, long, default_value_t = 1)]
    scale: usize,

    /// Skip the instructions shown at startup
    #[arg(long, default_value = "false")]
    no_intro: bool,

    /// Print every level and exit
    #[arg(long, default_value = "false")]
    list_levels: bool,
}

/// Print every level in text form. Each listing is parsed back so the
/// printed text is known to load as the same level.
fn print_levels() -> Result<(), LevelError> {
    for (i, level) in LEVELS.iter().enumerate() {
        let text = level.to_string();
        if Level::from_text(&text)? != *level {
            return Err(format!("level {} does not survive its text form", i + 1).into());
        }
        println!(
            "Level {}/{} ({} targets):\n{}",
            i + 1,
            LEVELS.len(),
            level.target_count(),
            text
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.list_levels {
        if let Err(e) = print_levels() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Validate options
    if args.level == 0 || args.level > LEVELS.len() {
        eprintln!(
            "Error: level must be between 1 and {} (got {})",
            LEVELS.len(),
            args.level
        );
        std::process::exit(1);
    }

    if args.fps == 0 {
        eprintln!("Error: fps must be at least 1");
        std::process::exit(1);
    }

    if args.scale == 0 {
        eprintln!("Error: scale must be at least 1");
        std::process::exit(1);
    }

    let config = AppConfig {
        seed: args.seed,
        start_level: args.level - 1,
        show_intro: !args.no_intro,
    };
    let mut app = match App::start(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error starting game: {}", e);
            std::process::exit(1);
        }
    };

    let surface = SurfaceConfig {
        fps: args.fps,
        scale: args.scale,
    };
    if let Err(e) = terminal::run(&mut app, surface) {
        eprintln!("Error: terminal I/O failed: {}", e);
        std::process::exit(1);
    }

    app.end();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_levels() {
        assert!(print_levels().is_ok());
    }
}
