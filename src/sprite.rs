use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Side length of a sprite in pixels.
pub const GRID_RES: usize = 8;

/// Seed used when none is given on the command line.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// All four channels set to `v`.
    pub const fn splat(v: u8) -> Self {
        Color {
            r: v,
            g: v,
            b: v,
            a: v,
        }
    }

    /// Blend the RGB channels of `self` toward `src` by `src.a / 255`.
    /// The alpha of `self` is kept.
    pub fn blend(self, src: Color) -> Color {
        Color {
            r: lerp_channel(self.r, src.r, src.a),
            g: lerp_channel(self.g, src.g, src.a),
            b: lerp_channel(self.b, src.b, src.a),
            a: self.a,
        }
    }
}

fn lerp_channel(from: u8, to: u8, factor: u8) -> u8 {
    let f = factor as f32 / 255.0;
    (from as f32 * (1.0 - f) + to as f32 * f) as u8
}

/// A square `GRID_RES`x`GRID_RES` bitmap for one tile kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pixels: [[Color; GRID_RES]; GRID_RES],
}

impl Sprite {
    pub fn new(color: Color) -> Self {
        Sprite {
            pixels: [[color; GRID_RES]; GRID_RES],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y][x]
    }

    pub fn fill(&mut self, color: Color) {
        for row in self.pixels.iter_mut() {
            row.fill(color);
        }
    }

    /// Overwrite every pixel whose bit is set in `rows` with `color`.
    ///
    /// `rows[y]` holds one bit per column, least significant bit first. The
    /// color's alpha is stored as-is so translucent details blend in when the
    /// sprite is blitted.
    pub fn stencil(&mut self, color: Color, rows: &[u8; GRID_RES]) {
        for (row, &bits) in self.pixels.iter_mut().zip(rows) {
            for (x, pixel) in row.iter_mut().enumerate() {
                if bits & (1 << x) != 0 {
                    *pixel = color;
                }
            }
        }
    }
}

/// Deterministic noise source for sprite generation.
pub struct TextureGenerator {
    rng: ChaCha8Rng,
}

impl TextureGenerator {
    pub fn new(seed: u64) -> Self {
        TextureGenerator {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Restart the stream from `seed`.
    #[cfg(test)]
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Fill `sprite` with speckled noise.
    ///
    /// Each pixel draws one byte `v`; every color channel becomes
    /// `max(floor, v * mask / 255)` and alpha is taken from `mask.a`.
    pub fn generate_noise(&mut self, sprite: &mut Sprite, floor: Color, mask: Color) {
        for row in sprite.pixels.iter_mut() {
            for pixel in row.iter_mut() {
                let v: u8 = self.rng.r#gen();
                *pixel = Color {
                    r: floor.r.max(scale(v, mask.r)),
                    g: floor.g.max(scale(v, mask.g)),
                    b: floor.b.max(scale(v, mask.b)),
                    a: mask.a,
                };
            }
        }
    }

    pub fn noise_sprite(&mut self, floor: Color, mask: Color) -> Sprite {
        let mut sprite = Sprite::new(Color::BLACK);
        self.generate_noise(&mut sprite, floor, mask);
        sprite
    }
}

fn scale(v: u8, mask: u8) -> u8 {
    (v as u16 * mask as u16 / 255) as u8
}

#[rustfmt::skip]
const BRICKS: [u8; GRID_RES] = [
    0b00000010, 0b11111111, 0b00100000, 0b11111111,
    0b00000010, 0b11111111, 0b00100000, 0b11111111,
];

#[rustfmt::skip]
const SILHOUETTE: [u8; GRID_RES] = [
    0b00011000, 0b00011000, 0b00111100, 0b01011010,
    0b01011010, 0b00011000, 0b00100100, 0b01000010,
];

#[rustfmt::skip]
const CRATE_BORDER: [u8; GRID_RES] = [
    0b00000000, 0b01111110, 0b01000010, 0b01000010,
    0b01000010, 0b01000010, 0b01111110, 0b00000000,
];

#[rustfmt::skip]
const TARGET_RING: [u8; GRID_RES] = [
    0b00000000, 0b00011000, 0b00100100, 0b01011010,
    0b01011010, 0b00100100, 0b00011000, 0b00000000,
];

/// The full set of tile sprites, generated once at startup.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub ground: Sprite,
    pub wall: Sprite,
    pub player: Sprite,
    pub crate_: Sprite,
    pub target_empty: Sprite,
    pub target_filled: Sprite,
}

impl SpriteSheet {
    /// Build every sprite from `tex`. The order of the noise draws is fixed,
    /// so a given seed always yields the same sheet.
    pub fn generate(tex: &mut TextureGenerator) -> Self {
        let ground = tex.noise_sprite(Color::splat(20), Color::rgb(40, 40, 40));

        let mut wall = tex.noise_sprite(Color::splat(100), Color::rgb(220, 225, 230));
        wall.stencil(Color::rgba(150, 160, 170, 100), &BRICKS);

        let mut player = ground.clone();
        player.stencil(Color::splat(255), &SILHOUETTE);

        let mut crate_ = tex.noise_sprite(Color::rgb(140, 100, 30), Color::rgb(180, 140, 70));
        crate_.stencil(Color::rgba(60, 50, 30, 100), &CRATE_BORDER);

        let target_filled = tex.noise_sprite(Color::rgb(0, 0, 100), Color::rgba(0, 140, 255, 150));

        let mut target_empty = Sprite::new(Color::BLACK);
        target_empty.fill(Color::splat(0));
        target_empty.stencil(Color::rgba(0, 140, 255, 100), &TARGET_RING);

        SpriteSheet {
            ground,
            wall,
            player,
            crate_,
            target_empty,
            target_filled,
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::generate(&mut TextureGenerator::new(seed))
    }
}
