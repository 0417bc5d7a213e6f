use crate::game::{GRID_SIZE, Position};
use std::fmt;

/// Error type for level construction and validation.
#[derive(Debug)]
pub enum LevelError {
    /// Invalid level content
    InvalidLevel(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::InvalidLevel(msg) => write!(f, "Invalid level: {}", msg),
        }
    }
}

impl std::error::Error for LevelError {}

impl From<String> for LevelError {
    fn from(err: String) -> Self {
        LevelError::InvalidLevel(err)
    }
}

/// Static definition of a level.
///
/// Each mask holds one byte per row; the most significant bit is column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub walls: [u8; GRID_SIZE],
    pub boxes: [u8; GRID_SIZE],
    pub targets: [u8; GRID_SIZE],
    pub start: Position,
}

#[inline]
fn mask_bit(x: u8) -> u8 {
    1 << (GRID_SIZE as u8 - 1 - x)
}

impl Level {
    pub fn has_wall(&self, pos: Position) -> bool {
        self.walls[pos.1 as usize] & mask_bit(pos.0) != 0
    }

    pub fn has_box(&self, pos: Position) -> bool {
        self.boxes[pos.1 as usize] & mask_bit(pos.0) != 0
    }

    pub fn is_target(&self, pos: Position) -> bool {
        self.targets[pos.1 as usize] & mask_bit(pos.0) != 0
    }

    pub fn target_count(&self) -> usize {
        self.targets.iter().map(|row| row.count_ones() as usize).sum()
    }

    /// Check that the level can be loaded into a grid without two occupants
    /// sharing a cell.
    pub fn validate(&self) -> Result<(), LevelError> {
        let Position(x, y) = self.start;
        if x as usize >= GRID_SIZE || y as usize >= GRID_SIZE {
            return Err(format!("player start {} is out of bounds", self.start).into());
        }
        if self.has_wall(self.start) {
            return Err(format!("player start {} is inside a wall", self.start).into());
        }
        if self.has_box(self.start) {
            return Err(format!("player start {} is on a box", self.start).into());
        }
        for (y, (walls, boxes)) in self.walls.iter().zip(&self.boxes).enumerate() {
            if walls & boxes != 0 {
                return Err(format!("row {} has a box inside a wall", y).into());
            }
        }
        Ok(())
    }

    /// Parse a level from text.
    ///
    /// Characters:
    /// - `#` = Wall
    /// - ` ` = Ground
    /// - `.` = Target
    /// - `$` = Box
    /// - `@` = Player
    /// - `*` = Box on target
    /// - `+` = Player on target
    ///
    /// Rows shorter than the grid are padded with ground. Box and target
    /// counts do not have to match.
    pub fn from_text(text: &str) -> Result<Self, LevelError> {
        let lines: Vec<&str> = text.lines().collect();

        if lines.is_empty() {
            return Err("Empty board".to_string().into());
        }
        if lines.len() > GRID_SIZE {
            return Err(format!(
                "Board height {} exceeds grid size {}",
                lines.len(),
                GRID_SIZE
            )
            .into());
        }

        let mut level = Level {
            walls: [0; GRID_SIZE],
            boxes: [0; GRID_SIZE],
            targets: [0; GRID_SIZE],
            start: Position(0, 0),
        };
        let mut player_pos = None;

        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() > GRID_SIZE {
                return Err(format!("Row {} exceeds grid size {}", y, GRID_SIZE).into());
            }
            for (x, ch) in line.chars().enumerate() {
                let bit = mask_bit(x as u8);
                match ch {
                    '#' => level.walls[y] |= bit,
                    ' ' => {}
                    '.' => level.targets[y] |= bit,
                    '$' => level.boxes[y] |= bit,
                    '*' => {
                        level.boxes[y] |= bit;
                        level.targets[y] |= bit;
                    }
                    '@' | '+' => {
                        if player_pos.is_some() {
                            return Err("Multiple players found".to_string().into());
                        }
                        player_pos = Some(Position(x as u8, y as u8));
                        if ch == '+' {
                            level.targets[y] |= bit;
                        }
                    }
                    _ => {
                        return Err(format!(
                            "Invalid character '{}' at position ({}, {})",
                            ch, x, y
                        )
                        .into());
                    }
                }
            }
        }

        level.start = player_pos.ok_or_else(|| "No player found on board".to_string())?;
        Ok(level)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_SIZE as u8 {
            let mut line = String::new();
            for x in 0..GRID_SIZE as u8 {
                let pos = Position(x, y);
                let target = self.is_target(pos);
                let ch = if pos == self.start {
                    if target { '+' } else { '@' }
                } else if self.has_box(pos) {
                    if target { '*' } else { '$' }
                } else if self.has_wall(pos) {
                    '#'
                } else if target {
                    '.'
                } else {
                    ' '
                };
                line.push(ch);
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// The six built-in levels, in play order.
#[rustfmt::skip]
pub const LEVELS: [Level; 6] = [
    Level {
        walls: [
            0b11111111, 0b10000001, 0b10000001, 0b10000001,
            0b10000001, 0b10000001, 0b10000001, 0b11111111,
        ],
        boxes: [
            0b00000000, 0b00000000, 0b00000000, 0b00000000,
            0b00000000, 0b00001000, 0b00000000, 0b00000000,
        ],
        targets: [
            0b00000000, 0b00000000, 0b00000000, 0b00000000,
            0b00000000, 0b00000100, 0b00000000, 0b00000000,
        ],
        start: Position(2, 2),
    },
    Level {
        walls: [
            0b01001100, 0b01001010, 0b01101100, 0b00000000,
            0b01101010, 0b01001010, 0b00100110, 0b01000010,
        ],
        boxes: [
            0b00000000, 0b00000000, 0b00000000, 0b00001000,
            0b00000100, 0b00000000, 0b00000000, 0b00000000,
        ],
        targets: [
            0b00000000, 0b00000000, 0b00000000, 0b00000000,
            0b00000000, 0b00000100, 0b00000000, 0b00000001,
        ],
        start: Position(0, 0),
    },
    Level {
        walls: [
            0b00111000, 0b00101000, 0b00101111, 0b11100001,
            0b10000111, 0b11110100, 0b00010100, 0b00011100,
        ],
        boxes: [
            0b00000000, 0b00000000, 0b00000000, 0b00010100,
            0b00010000, 0b00001000, 0b00000000, 0b00000000,
        ],
        targets: [
            0b00000000, 0b00010000, 0b00000000, 0b00000010,
            0b01000000, 0b00000000, 0b00001000, 0b00000000,
        ],
        start: Position(4, 4),
    },
    Level {
        walls: [
            0b00111110, 0b11100010, 0b10000010, 0b11100010,
            0b10110010, 0b10100011, 0b10000001, 0b10000001,
        ],
        boxes: [
            0b00000000, 0b00000000, 0b00010000, 0b00001000,
            0b00001000, 0b00000000, 0b01011100, 0b00000000,
        ],
        targets: [
            0b00000000, 0b00000000, 0b01000000, 0b00000100,
            0b01000000, 0b00001000, 0b00010010, 0b00001000,
        ],
        start: Position(2, 2),
    },
    Level {
        walls: [
            0b11111100, 0b10000100, 0b10000110, 0b10010011,
            0b11000000, 0b01000000, 0b01111111, 0b00000000,
        ],
        boxes: [
            0b00000000, 0b00000000, 0b00010000, 0b00100000,
            0b00001010, 0b00000000, 0b00000000, 0b00000000,
        ],
        targets: [
            0b00000000, 0b00000000, 0b00000000, 0b00001100,
            0b00001100, 0b00000000, 0b00000000, 0b00000000,
        ],
        start: Position(5, 3),
    },
    Level {
        walls: [
            0b11111111, 0b10000001, 0b10000001, 0b10000001,
            0b10000001, 0b10000001, 0b10000001, 0b11111111,
        ],
        boxes: [
            0b00000000, 0b00001000, 0b00001000, 0b00001000,
            0b00001000, 0b00001000, 0b00001000, 0b00000000,
        ],
        targets: [
            0b00000000, 0b00000010, 0b00000010, 0b00000010,
            0b00000010, 0b00000010, 0b00000010, 0b00000000,
        ],
        start: Position(2, 2),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_are_valid() {
        for (i, level) in LEVELS.iter().enumerate() {
            assert!(level.validate().is_ok(), "level {} is invalid", i + 1);
            assert!(level.target_count() > 0, "level {} has no targets", i + 1);
        }
    }

    #[test]
    fn test_mask_bit_order() {
        let level = &LEVELS[0];
        assert!(level.has_wall(Position(0, 0)));
        assert!(!level.has_wall(Position(1, 1)));
        assert!(level.has_box(Position(4, 5)));
        assert!(level.is_target(Position(5, 5)));
        assert!(!level.is_target(Position(4, 5)));
    }

    #[test]
    fn test_display_first_level() {
        let expected = "########\n\
                        #      #\n\
                        # @    #\n\
                        #      #\n\
                        #      #\n\
                        #   $. #\n\
                        #      #\n\
                        ########\n";
        assert_eq!(LEVELS[0].to_string(), expected);
    }

    #[test]
    fn test_from_text_matches_builtin() {
        for level in LEVELS.iter() {
            let parsed = Level::from_text(&level.to_string()).unwrap();
            assert_eq!(&parsed, level);
        }
    }

    #[test]
    fn test_from_text_short_rows() {
        let level = Level::from_text("#@$.\n  *\n +").unwrap_err();
        assert!(matches!(level, LevelError::InvalidLevel(_)));

        let level = Level::from_text("#@$.\n  *").unwrap();
        assert_eq!(level.start, Position(1, 0));
        assert!(level.has_wall(Position(0, 0)));
        assert!(level.has_box(Position(2, 1)));
        assert!(level.is_target(Position(2, 1)));
        assert_eq!(level.target_count(), 2);
        assert!(!level.has_wall(Position(7, 7)));
    }

    #[test]
    fn test_from_text_invalid() {
        assert!(Level::from_text("").is_err());
        assert!(Level::from_text("####\n#  #\n####").is_err());
        assert!(Level::from_text("#x@#").is_err());
        assert!(Level::from_text("#########\n@").is_err());
        assert!(Level::from_text("@\n\n\n\n\n\n\n\n ").is_err());
    }

    #[test]
    fn test_validate_rejects_overlaps() {
        let mut level = LEVELS[0];
        level.start = Position(0, 3);
        assert!(matches!(level.validate(), Err(LevelError::InvalidLevel(_))));

        let mut level = LEVELS[0];
        level.start = Position(4, 5);
        assert!(level.validate().is_err());

        let mut level = LEVELS[0];
        level.start = Position(8, 1);
        assert!(level.validate().is_err());

        let mut level = LEVELS[0];
        level.boxes[0] = 0b1000_0000;
        assert!(level.validate().is_err());
    }
}
