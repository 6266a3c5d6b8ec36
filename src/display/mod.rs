//! Rendering contract between the game core and the platform.
//!
//! The core only ever talks to a `Surface` and resolves artwork through a
//! `SpriteSheet`.  No game logic is performed here; this module translates
//! pixel-space draw calls into whatever the platform draws with.

pub mod terminal;

use std::collections::HashMap;

use crossterm::style::Color;

use crate::error::{GameError, GameResult};
use crate::grid::{col_to_x, COLS, ROWS, X_OFFSET, Y_OFFSET};

pub use crate::collision::Bounds as Rect;

// ── Sprite keys ───────────────────────────────────────────────────────────────

pub const HAZARD_SPRITE: &str = "enemy-bug";
pub const PLAYER_SPRITE: &str = "char-boy";
pub const BONUS_SPRITE: &str = "gem-blue";
pub const WATER_TILE: &str = "water-block";
pub const STONE_TILE: &str = "stone-block";
pub const GRASS_TILE: &str = "grass-block";

/// Everything a session draws; load these before the first frame.
pub const GAME_SPRITES: &[&str] = &[
    HAZARD_SPRITE,
    PLAYER_SPRITE,
    BONUS_SPRITE,
    WATER_TILE,
    STONE_TILE,
    GRASS_TILE,
];

// ── Surface ───────────────────────────────────────────────────────────────────

/// A 2D drawing target addressed in canvas pixels.
pub trait Surface {
    /// Called once before any drawing in a frame.
    fn begin_frame(&mut self) -> GameResult<()> {
        Ok(())
    }

    /// Called once after all drawing in a frame.
    fn end_frame(&mut self) -> GameResult<()> {
        Ok(())
    }

    /// Draw the `src` region of `sprite` into the `dest` rectangle.
    fn draw_image(&mut self, sprite: &Sprite, src: Rect, dest: Rect) -> GameResult<()>;

    fn set_fill_color(&mut self, color: Color);

    fn fill_color(&self) -> Color;

    /// A CSS-style font description, e.g. `"bold 36px Impact"`.
    fn set_font(&mut self, font: &str);

    /// Draw `text` in the current fill colour and font.
    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> GameResult<()>;
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Resolved artwork.  The terminal draws glyph rows; spaces are transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub key: &'static str,
    pub glyphs: &'static [&'static str],
    pub color: Color,
}

/// Resolves logical sprite keys to loaded artwork.
#[derive(Clone, Debug, Default)]
pub struct SpriteSheet {
    sprites: HashMap<&'static str, Sprite>,
}

impl SpriteSheet {
    /// Load every key up front.  Fails on the first key with no artwork.
    pub fn load(keys: &[&str]) -> GameResult<Self> {
        let mut sprites = HashMap::new();
        for key in keys {
            let sprite =
                builtin_sprite(key).ok_or_else(|| GameError::UnknownSprite(key.to_string()))?;
            sprites.insert(sprite.key, sprite);
        }
        Ok(SpriteSheet { sprites })
    }

    pub fn get(&self, key: &str) -> GameResult<&Sprite> {
        self.sprites
            .get(key)
            .ok_or_else(|| GameError::UnknownSprite(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

fn glyph_sprite(key: &'static str, glyphs: &'static [&'static str], color: Color) -> Sprite {
    Sprite { key, glyphs, color }
}

// Each sprite is sized for the terminal cell mapping: ten cells per grid
// column, four per grid row.
fn builtin_sprite(key: &str) -> Option<Sprite> {
    let sprite = match key {
        HAZARD_SPRITE => glyph_sprite(
            HAZARD_SPRITE,
            &[
                "  ,-==-.  ",
                "=(o    o)>",
                "  `-==-'  ",
            ],
            Color::Red,
        ),
        PLAYER_SPRITE => glyph_sprite(
            PLAYER_SPRITE,
            &[
                " (^_^) ",
                " /|#|\\ ",
                "  / \\  ",
            ],
            Color::White,
        ),
        BONUS_SPRITE => glyph_sprite(BONUS_SPRITE, &[" /\\ ", "<  >", " \\/ "], Color::Cyan),
        WATER_TILE => glyph_sprite(
            WATER_TILE,
            &["≈≈≈≈≈≈≈≈≈≈", "~≈~≈~≈~≈~≈", "≈≈≈≈≈≈≈≈≈≈", "~≈~≈~≈~≈~≈"],
            Color::Blue,
        ),
        STONE_TILE => glyph_sprite(
            STONE_TILE,
            &["░░░░░░░░░│", "░░░░░░░░░│", "░░░░░░░░░│", "─────────┼"],
            Color::DarkGrey,
        ),
        GRASS_TILE => glyph_sprite(
            GRASS_TILE,
            &[",',',',','", "',',',',',", ",',',',','", "',',',',',"],
            Color::Green,
        ),
        _ => return None,
    };
    Some(sprite)
}

// ── Board ─────────────────────────────────────────────────────────────────────

/// Row tiles have a transparent band above their top face.
const TILE_FACE_OFFSET: f32 = 50.0;
const TILE_CROP: Rect = Rect {
    x: 0.0,
    y: TILE_FACE_OFFSET,
    width: X_OFFSET,
    height: Y_OFFSET,
};

fn tile_for_row(row: usize) -> &'static str {
    match row {
        0 => WATER_TILE,
        1..=3 => STONE_TILE,
        _ => GRASS_TILE,
    }
}

/// Draw the static background: water on top, stone lanes, grass at the bottom.
pub fn draw_board(surface: &mut dyn Surface, sprites: &SpriteSheet) -> GameResult<()> {
    for row in 0..ROWS {
        let tile = sprites.get(tile_for_row(row))?;
        for col in 0..COLS {
            let dest = Rect::new(
                col_to_x(col),
                row as f32 * Y_OFFSET + TILE_FACE_OFFSET,
                X_OFFSET,
                Y_OFFSET,
            );
            surface.draw_image(tile, TILE_CROP, dest)?;
        }
    }
    Ok(())
}
