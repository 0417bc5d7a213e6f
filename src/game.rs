use crate::levels::{Level, LevelError};
use log::{debug, info, trace};
use std::fmt;

/// Number of cells along each side of the grid.
pub const GRID_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(pub u8, pub u8);

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// What currently occupies a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Ground,
    Wall,
    Box,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

/// Result of one game tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The current level is not solved yet.
    Playing,
    /// The level was solved and the next one has been loaded.
    LevelComplete,
    /// The last level was solved and play wrapped around to the first.
    GameComplete,
}

/// Puzzle state for one play session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    levels: Vec<Level>,
    current: usize,
    grid: [[Cell; GRID_SIZE]; GRID_SIZE],
    player: Position,
    moves: usize,
}

impl Game {
    /// Create a game over `levels`, starting at `start` (0-indexed).
    pub fn new(levels: &[Level], start: usize) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err("No levels to play".to_string().into());
        }
        if start >= levels.len() {
            return Err(format!(
                "level {} not found ({} levels available)",
                start + 1,
                levels.len()
            )
            .into());
        }
        for (i, level) in levels.iter().enumerate() {
            level.validate().map_err(|LevelError::InvalidLevel(msg)| {
                LevelError::InvalidLevel(format!("level {}: {}", i + 1, msg))
            })?;
        }

        let mut game = Game {
            levels: levels.to_vec(),
            current: start,
            grid: [[Cell::Ground; GRID_SIZE]; GRID_SIZE],
            player: levels[start].start,
            moves: 0,
        };
        game.restart_level();
        Ok(game)
    }

    /// A game consisting of a single level.
    #[cfg(test)]
    pub fn with_level(level: Level) -> Result<Self, LevelError> {
        Self::new(&[level], 0)
    }

    pub fn cell(&self, pos: Position) -> Cell {
        self.grid[pos.1 as usize][pos.0 as usize]
    }

    fn set_cell(&mut self, pos: Position, cell: Cell) {
        self.grid[pos.1 as usize][pos.0 as usize] = cell;
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn level(&self) -> &Level {
        &self.levels[self.current]
    }

    pub fn level_index(&self) -> usize {
        self.current
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Successful moves since the level was last (re)started.
    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn is_target(&self, pos: Position) -> bool {
        self.level().is_target(pos)
    }

    /// Step from `pos` in the given direction.
    /// Returns Some(new position) if it is within the grid, None otherwise.
    fn move_pos(pos: Position, dir: Direction) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let new_x = pos.0 as i32 + dx as i32;
        let new_y = pos.1 as i32 + dy as i32;

        if new_x >= 0 && new_y >= 0 && new_x < GRID_SIZE as i32 && new_y < GRID_SIZE as i32 {
            Some(Position(new_x as u8, new_y as u8))
        } else {
            None
        }
    }

    /// Move the player one cell, pushing a box if one is in the way.
    ///
    /// Blocked moves leave the game untouched. Returns whether the player moved.
    pub fn attempt_move(&mut self, dir: Direction) -> bool {
        let Some(next) = Self::move_pos(self.player, dir) else {
            trace!("move {} rejected: edge of grid", dir);
            return false;
        };

        match self.cell(next) {
            Cell::Ground => {}
            Cell::Box => {
                let far = match Self::move_pos(next, dir) {
                    Some(far) if self.cell(far) == Cell::Ground => far,
                    _ => {
                        trace!("push {} from {} rejected: box is blocked", dir, next);
                        return false;
                    }
                };
                self.set_cell(far, Cell::Box);
            }
            Cell::Wall | Cell::Player => {
                trace!("move {} rejected: {} is not free", dir, next);
                return false;
            }
        }

        self.set_cell(next, Cell::Player);
        self.set_cell(self.player, Cell::Ground);
        self.player = next;
        self.moves += 1;
        true
    }

    /// Rebuild the grid from the current level definition.
    pub fn restart_level(&mut self) {
        let level = self.levels[self.current];
        for y in 0..GRID_SIZE as u8 {
            for x in 0..GRID_SIZE as u8 {
                let pos = Position(x, y);
                let cell = if level.has_box(pos) {
                    Cell::Box
                } else if level.has_wall(pos) {
                    Cell::Wall
                } else {
                    Cell::Ground
                };
                self.set_cell(pos, cell);
            }
        }
        self.player = level.start;
        self.set_cell(self.player, Cell::Player);
        self.moves = 0;
        debug!("level {} (re)started", self.current + 1);
    }

    /// Move to the next level, staying on the last one if already there.
    pub fn advance_level(&mut self) {
        if self.current + 1 < self.levels.len() {
            self.current += 1;
        }
        self.restart_level();
    }

    /// Move to the next level. Does nothing on the last level.
    /// Returns whether the level changed.
    pub fn skip_level(&mut self) -> bool {
        if self.current + 1 >= self.levels.len() {
            debug!("skip ignored on the last level");
            return false;
        }
        self.current += 1;
        info!("skipped to level {}", self.current + 1);
        self.restart_level();
        true
    }

    /// Check if every target cell holds a box. A level without targets is
    /// always won.
    pub fn check_victory(&self) -> bool {
        let level = self.level();
        (0..GRID_SIZE as u8).all(|y| {
            (0..GRID_SIZE as u8).all(|x| {
                let pos = Position(x, y);
                !level.is_target(pos) || self.cell(pos) == Cell::Box
            })
        })
    }

    /// Advance the game by one frame.
    ///
    /// On victory the next level is loaded; after the last level play wraps
    /// around to the first.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.check_victory() {
            return TickOutcome::Playing;
        }

        info!(
            "level {} solved in {} moves",
            self.current + 1,
            self.moves
        );
        if self.current + 1 < self.levels.len() {
            self.advance_level();
            TickOutcome::LevelComplete
        } else {
            info!("all {} levels solved", self.levels.len());
            self.current = 0;
            self.restart_level();
            TickOutcome::GameComplete
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_SIZE as u8 {
            let mut line = String::new();
            for x in 0..GRID_SIZE as u8 {
                let pos = Position(x, y);
                let target = self.is_target(pos);
                let ch = match self.cell(pos) {
                    Cell::Player if target => '+',
                    Cell::Player => '@',
                    Cell::Box if target => '*',
                    Cell::Box => '$',
                    Cell::Wall => '#',
                    Cell::Ground if target => '.',
                    Cell::Ground => ' ',
                };
                line.push(ch);
            }
            // Trim trailing spaces to match the text input format
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
