use crate::sprite::{Color, GRID_RES, Sprite};

/// Frame buffer the tile sprites are composited into.
///
/// The canvas is always treated as opaque: blits only touch RGB.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Vec<Color>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            pixels: vec![Color::BLACK; width * height],
            width,
            height,
        }
    }

    /// A canvas holding `cells`x`cells` tiles.
    pub fn for_grid(cells: usize) -> Self {
        Self::new(cells * GRID_RES, cells * GRID_RES)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Blend `sprite` into the tile at (`grid_x`, `grid_y`).
    ///
    /// Panics if the tile lies outside the canvas.
    pub fn blit_tile(&mut self, grid_x: usize, grid_y: usize, sprite: &Sprite) {
        let left = grid_x * GRID_RES;
        let top = grid_y * GRID_RES;
        assert!(
            left + GRID_RES <= self.width && top + GRID_RES <= self.height,
            "tile ({}, {}) is outside the canvas",
            grid_x,
            grid_y
        );

        for y in 0..GRID_RES {
            let row = (top + y) * self.width + left;
            for x in 0..GRID_RES {
                let dst = &mut self.pixels[row + x];
                *dst = dst.blend(sprite.pixel(x, y));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let canvas = Canvas::for_grid(8);
        assert_eq!(canvas.width(), 64);
        assert_eq!(canvas.height(), 64);
        assert_eq!(canvas.pixel(63, 63), Color::BLACK);
    }

    #[test]
    fn test_blit_tile_bounds() {
        let mut canvas = Canvas::for_grid(4);
        let white = Sprite::new(Color::rgb(255, 255, 255));
        canvas.blit_tile(2, 1, &white);

        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let inside = (16..24).contains(&x) && (8..16).contains(&y);
                let expected = if inside {
                    Color::rgb(255, 255, 255)
                } else {
                    Color::BLACK
                };
                assert_eq!(canvas.pixel(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_blit_tile_blends_rgb_only() {
        let mut canvas = Canvas::for_grid(1);
        canvas.clear(Color::rgba(100, 100, 100, 7));

        canvas.blit_tile(0, 0, &Sprite::new(Color::rgba(255, 0, 0, 0)));
        assert_eq!(canvas.pixel(3, 3), Color::rgba(100, 100, 100, 7));

        canvas.blit_tile(0, 0, &Sprite::new(Color::rgba(200, 0, 50, 255)));
        assert_eq!(canvas.pixel(3, 3), Color::rgba(200, 0, 50, 7));
    }

    #[test]
    fn test_blit_tile_stacks() {
        let mut canvas = Canvas::for_grid(1);
        let mut base = Sprite::new(Color::rgb(0, 0, 200));
        base.stencil(Color::rgba(0, 0, 0, 0), &[0b1; GRID_RES]);
        canvas.blit_tile(0, 0, &base);

        // Transparent stencil pixels leave the black background alone.
        assert_eq!(canvas.pixel(0, 4), Color::BLACK);
        assert_eq!(canvas.pixel(1, 4), Color::rgb(0, 0, 200));
    }

    #[test]
    #[should_panic(expected = "outside the canvas")]
    fn test_blit_tile_out_of_range() {
        let mut canvas = Canvas::for_grid(2);
        canvas.blit_tile(2, 0, &Sprite::new(Color::BLACK));
    }
}
