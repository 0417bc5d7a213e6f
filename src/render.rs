use crate::canvas::Canvas;
use crate::game::{Cell, GRID_SIZE, Game, Position};
use crate::sprite::{Sprite, SpriteSheet};

fn cell_sprite(sprites: &SpriteSheet, cell: Cell) -> &Sprite {
    match cell {
        Cell::Ground => &sprites.ground,
        Cell::Wall => &sprites.wall,
        Cell::Box => &sprites.crate_,
        Cell::Player => &sprites.player,
    }
}

/// Draw the whole grid into `canvas`.
///
/// Every cell gets its occupant's sprite; target cells additionally get the
/// filled marker when a box sits on them and the empty ring otherwise.
pub fn compose(game: &Game, sprites: &SpriteSheet, canvas: &mut Canvas) {
    for y in 0..GRID_SIZE as u8 {
        for x in 0..GRID_SIZE as u8 {
            let pos = Position(x, y);
            let cell = game.cell(pos);
            canvas.blit_tile(x as usize, y as usize, cell_sprite(sprites, cell));

            if game.is_target(pos) {
                let marker = if cell == Cell::Box {
                    &sprites.target_filled
                } else {
                    &sprites.target_empty
                };
                canvas.blit_tile(x as usize, y as usize, marker);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use crate::levels::Level;
    use crate::sprite::{Color, DEFAULT_SEED, GRID_RES};

    /// Flat sprites make the expected canvas colors easy to state.
    fn flat_sheet() -> SpriteSheet {
        SpriteSheet {
            ground: Sprite::new(Color::rgb(10, 10, 10)),
            wall: Sprite::new(Color::rgb(200, 200, 200)),
            player: Sprite::new(Color::rgb(255, 255, 255)),
            crate_: Sprite::new(Color::rgb(140, 100, 30)),
            target_empty: Sprite::new(Color::rgba(0, 0, 255, 0)),
            target_filled: Sprite::new(Color::rgb(0, 0, 255)),
        }
    }

    fn tile_color(canvas: &Canvas, x: usize, y: usize) -> Color {
        canvas.pixel(x * GRID_RES + 3, y * GRID_RES + 3)
    }

    #[test]
    fn test_compose_cells_and_targets() {
        let mut game = Game::with_level(Level::from_text("#@$. .").unwrap()).unwrap();
        let sheet = flat_sheet();
        let mut canvas = Canvas::for_grid(GRID_SIZE);

        compose(&game, &sheet, &mut canvas);
        assert_eq!(tile_color(&canvas, 0, 0), Color::rgb(200, 200, 200));
        assert_eq!(tile_color(&canvas, 1, 0), Color::rgb(255, 255, 255));
        assert_eq!(tile_color(&canvas, 2, 0), Color::rgb(140, 100, 30));
        // Empty target: transparent marker over ground.
        assert_eq!(tile_color(&canvas, 3, 0), Color::rgb(10, 10, 10));
        assert_eq!(tile_color(&canvas, 7, 7), Color::rgb(10, 10, 10));

        game.attempt_move(Direction::Right);
        compose(&game, &sheet, &mut canvas);
        assert_eq!(tile_color(&canvas, 1, 0), Color::rgb(10, 10, 10));
        assert_eq!(tile_color(&canvas, 3, 0), Color::rgb(0, 0, 255));
    }

    fn between(value: u8, from: u8, to: u8) -> bool {
        from.min(to) <= value && value <= from.max(to)
    }

    #[test]
    fn test_compose_keeps_opaque_pixels() {
        let game = Game::with_level(Level::from_text("#@$.").unwrap()).unwrap();
        let sheet = SpriteSheet::from_seed(DEFAULT_SEED);
        let mut canvas = Canvas::for_grid(GRID_SIZE);
        compose(&game, &sheet, &mut canvas);
        let first = canvas.clone();
        compose(&game, &sheet, &mut canvas);

        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let cell = game.cell(Position((x / GRID_RES) as u8, (y / GRID_RES) as u8));
                let src = cell_sprite(&sheet, cell).pixel(x % GRID_RES, y % GRID_RES);
                let (before, after) = (first.pixel(x, y), canvas.pixel(x, y));
                if src.a == 255 {
                    assert_eq!(after, before, "pixel ({}, {}) changed", x, y);
                } else {
                    // Brick and border details keep blending over the last frame.
                    assert!(between(after.r, before.r, src.r), "pixel ({}, {})", x, y);
                    assert!(between(after.g, before.g, src.g), "pixel ({}, {})", x, y);
                    assert!(between(after.b, before.b, src.b), "pixel ({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn test_compose_accumulates_translucent_detail() {
        let game = Game::with_level(Level::from_text("#@$.").unwrap()).unwrap();
        let sheet = SpriteSheet::from_seed(DEFAULT_SEED);
        let mut canvas = Canvas::for_grid(GRID_SIZE);

        // (0, 1) is a brick line in the wall tile.
        assert_eq!(sheet.wall.pixel(0, 1), Color::rgba(150, 160, 170, 100));
        compose(&game, &sheet, &mut canvas);
        assert_eq!(canvas.pixel(0, 1), Color::rgb(58, 62, 66));
        compose(&game, &sheet, &mut canvas);
        assert_eq!(canvas.pixel(0, 1), Color::rgb(94, 100, 106));

        // The player tile is opaque and does not drift.
        let player = canvas.pixel(GRID_RES + 3, 3);
        compose(&game, &sheet, &mut canvas);
        assert_eq!(canvas.pixel(GRID_RES + 3, 3), player);
    }
}
