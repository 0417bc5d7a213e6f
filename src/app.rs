use crate::canvas::Canvas;
use crate::game::{Direction, GRID_SIZE, Game, TickOutcome};
use crate::levels::{LEVELS, LevelError};
use crate::render;
use crate::sprite::{Color, DEFAULT_SEED, SpriteSheet};
use log::{debug, trace};

/// Startup options for the game core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub seed: u64,
    /// 0-indexed level to begin with.
    pub start_level: usize,
    pub show_intro: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            seed: DEFAULT_SEED,
            start_level: 0,
            show_intro: true,
        }
    }
}

/// Player input understood by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Restart,
    Skip,
}

impl Command {
    /// Map a key to a command: W/A/S/D move, R restarts, N skips.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'w' => Some(Command::Move(Direction::Up)),
            'a' => Some(Command::Move(Direction::Left)),
            's' => Some(Command::Move(Direction::Down)),
            'd' => Some(Command::Move(Direction::Right)),
            'r' => Some(Command::Restart),
            'n' => Some(Command::Skip),
            _ => None,
        }
    }
}

/// One-off message for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Instructions,
    Congratulations,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::Instructions => "Welcome to Sokoban!",
            Notice::Congratulations => "You Won!",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            Notice::Instructions => {
                "Use W, A, S, D to move the character.\n\
                 Press R to restart the level if you get stuck.\n\
                 Press N to skip a level, Q to quit.\n\
                 \n\
                 The goal is to push all the boxes onto the blue dots."
            }
            Notice::Congratulations => {
                "Congratulations, you solved every level!\n\
                 \n\
                 Play starts over from the first level."
            }
        }
    }
}

/// Game core: sprites, canvas and puzzle state.
pub struct App {
    sprites: SpriteSheet,
    canvas: Canvas,
    game: Game,
    intro: Option<Notice>,
}

impl App {
    pub fn start(config: AppConfig) -> Result<Self, LevelError> {
        let sprites = SpriteSheet::from_seed(config.seed);

        let mut canvas = Canvas::for_grid(GRID_SIZE);
        canvas.clear(Color::BLACK);

        let game = Game::new(&LEVELS, config.start_level)?;
        debug!(
            "started with seed {} at level {}",
            config.seed,
            config.start_level + 1
        );

        Ok(App {
            sprites,
            canvas,
            game,
            intro: config.show_intro.then_some(Notice::Instructions),
        })
    }

    /// The instructions notice, if it has not been taken yet.
    pub fn take_intro(&mut self) -> Option<Notice> {
        self.intro.take()
    }

    /// Run one frame of game logic and redraw the canvas.
    pub fn tick(&mut self) -> Option<Notice> {
        let outcome = self.game.tick();
        render::compose(&self.game, &self.sprites, &mut self.canvas);
        match outcome {
            TickOutcome::GameComplete => Some(Notice::Congratulations),
            TickOutcome::Playing | TickOutcome::LevelComplete => None,
        }
    }

    pub fn on_key(&mut self, command: Command) {
        match command {
            Command::Move(dir) => {
                if self.game.attempt_move(dir) {
                    trace!("moved {}, player now at {}", dir, self.game.player());
                }
            }
            Command::Restart => self.game.restart_level(),
            Command::Skip => {
                self.game.skip_level();
            }
        }
    }

    /// Release the canvas and sprites.
    pub fn end(self) {
        debug!("shutting down at level {}", self.game.level_index() + 1);
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[cfg(test)]
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn title(&self) -> String {
        format!(
            "[Level {}/{}] Sokoban - {} moves",
            self.game.level_index() + 1,
            self.game.level_count(),
            self.game.moves()
        )
    }
}
