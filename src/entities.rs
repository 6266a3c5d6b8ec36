//! On-grid characters: the shared `Entity` contract and its three variants.

use rand::{Rng, RngCore};

use crate::collision::Bounds;
use crate::display::{Rect, SpriteSheet, Surface, BONUS_SPRITE, HAZARD_SPRITE, PLAYER_SPRITE};
use crate::error::GameResult;
use crate::grid::{
    col_to_x, hazard_spawn_x, right_bound, row_to_y, start_col, start_row, BONUS_ROWS, COLS,
    HAZARD_ROWS, ROWS,
};

/// Pixels trimmed from each collision box (half per side) so transparent
/// sprite margins never register as a hit.
pub const COLLISION_BUFFER: f32 = 20.0;

pub const HAZARD_SPEED_MIN: f32 = 75.0;
pub const HAZARD_SPEED_MAX: f32 = 320.0;

// ── Entity contract ───────────────────────────────────────────────────────────

/// Anything that lives on the board and is driven once per frame.
pub trait Entity {
    /// Advance by `dt` seconds.  Only the entity's own state changes.
    fn update(&mut self, dt: f32, rng: &mut dyn RngCore);

    fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSheet) -> GameResult<()>;

    /// Top-left corner in canvas pixels.
    fn position(&self) -> (f32, f32);

    /// Width and height in canvas pixels.
    fn size(&self) -> (f32, f32);

    /// The inset box used for hit testing.
    fn collision_bounds(&self) -> Bounds {
        let (x, y) = self.position();
        let (w, h) = self.size();
        Bounds {
            x: x + COLLISION_BUFFER / 2.0,
            y: y + COLLISION_BUFFER / 2.0,
            width: w - COLLISION_BUFFER,
            height: h - COLLISION_BUFFER,
        }
    }
}

// ── Hazard ────────────────────────────────────────────────────────────────────

const HAZARD_WIDTH: f32 = 101.0;
const HAZARD_HEIGHT: f32 = 67.0;
const HAZARD_CROP: Rect = Rect {
    x: 0.0,
    y: 77.0,
    width: HAZARD_WIDTH,
    height: HAZARD_HEIGHT,
};

/// A bug crawling left to right along one of the stone lanes.
#[derive(Clone, Debug)]
pub struct Hazard {
    pub x: f32,
    pub y: f32,
    pub row: usize,
    /// Pixels per second.
    pub speed: f32,
}

impl Hazard {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut hazard = Hazard {
            x: 0.0,
            y: 0.0,
            row: HAZARD_ROWS.0,
            speed: HAZARD_SPEED_MIN,
        };
        hazard.reset(rng);
        hazard
    }

    /// Put the hazard back left of the board on a fresh lane and speed.
    /// The same object is reused; nothing is reallocated.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.row = rng.gen_range(HAZARD_ROWS.0..=HAZARD_ROWS.1);
        self.x = hazard_spawn_x();
        self.y = row_to_y(self.row);
        self.speed = rng.gen_range(HAZARD_SPEED_MIN..=HAZARD_SPEED_MAX);
    }
}

impl Entity for Hazard {
    fn update(&mut self, dt: f32, rng: &mut dyn RngCore) {
        self.x += dt * self.speed;
        if self.x > right_bound() {
            self.reset(rng);
        }
    }

    fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSheet) -> GameResult<()> {
        let sprite = sprites.get(HAZARD_SPRITE)?;
        let dest = Rect::new(self.x, self.y, HAZARD_WIDTH, HAZARD_HEIGHT);
        surface.draw_image(sprite, HAZARD_CROP, dest)
    }

    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn size(&self) -> (f32, f32) {
        (HAZARD_WIDTH, HAZARD_HEIGHT)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

const PLAYER_WIDTH: f32 = 67.0;
const PLAYER_HEIGHT: f32 = 76.0;
/// The character art is centred inside its 101 px tile.
const PLAYER_INSET_X: f32 = 17.0;
const PLAYER_CROP: Rect = Rect {
    x: 17.0,
    y: 63.0,
    width: PLAYER_WIDTH,
    height: PLAYER_HEIGHT,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Parse one of the four keyboard symbols.  Anything else is `None`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// The player steps one cell per key press; pixels follow the grid cell.
#[derive(Clone, Debug)]
pub struct Player {
    pub row: usize,
    pub col: usize,
    pub x: f32,
    pub y: f32,
    moves_enabled: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// A player parked at the start cell with movement disabled until a
    /// session begins.
    pub fn new() -> Self {
        let mut player = Player {
            row: 0,
            col: 0,
            x: 0.0,
            y: 0.0,
            moves_enabled: false,
        };
        player.reset();
        player
    }

    pub fn reset(&mut self) {
        self.row = start_row();
        self.col = start_col();
        self.sync_pixels();
    }

    pub fn enable_moves(&mut self, enabled: bool) {
        self.moves_enabled = enabled;
    }

    pub fn moves_enabled(&self) -> bool {
        self.moves_enabled
    }

    pub fn handle_input(&mut self, direction: Direction) {
        if !self.moves_enabled {
            return;
        }
        match direction {
            Direction::Up => self.row = self.row.saturating_sub(1),
            Direction::Down => self.row = (self.row + 1).min(ROWS - 1),
            Direction::Left => self.col = self.col.saturating_sub(1),
            Direction::Right => self.col = (self.col + 1).min(COLS - 1),
        }
    }

    fn sync_pixels(&mut self) {
        self.x = col_to_x(self.col);
        self.y = row_to_y(self.row);
    }
}

impl Entity for Player {
    fn update(&mut self, _dt: f32, _rng: &mut dyn RngCore) {
        self.sync_pixels();
    }

    fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSheet) -> GameResult<()> {
        let sprite = sprites.get(PLAYER_SPRITE)?;
        let (x, y) = self.position();
        let dest = Rect::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT);
        surface.draw_image(sprite, PLAYER_CROP, dest)
    }

    fn position(&self) -> (f32, f32) {
        (self.x + PLAYER_INSET_X, self.y)
    }

    fn size(&self) -> (f32, f32) {
        (PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

// ── Bonus item ────────────────────────────────────────────────────────────────

const BONUS_WIDTH: f32 = 50.0;
const BONUS_HEIGHT: f32 = 55.0;
const BONUS_INSET_X: f32 = 25.0;
const BONUS_INSET_Y: f32 = 30.0;
const BONUS_CROP: Rect = Rect {
    x: 0.0,
    y: 57.0,
    width: 101.0,
    height: 110.0,
};

/// A gem sitting still on a stone lane until collected or expired.
#[derive(Clone, Debug)]
pub struct BonusItem {
    /// Distinguishes successive spawns so a stale expiry never removes a
    /// newer gem.
    pub id: u64,
    pub row: usize,
    pub col: usize,
    pub x: f32,
    pub y: f32,
}

impl BonusItem {
    pub fn new(id: u64, rng: &mut impl Rng) -> Self {
        let row = rng.gen_range(BONUS_ROWS.0..=BONUS_ROWS.1);
        let col = rng.gen_range(0..COLS);
        BonusItem {
            id,
            row,
            col,
            x: col_to_x(col) + BONUS_INSET_X,
            y: row_to_y(row) + BONUS_INSET_Y,
        }
    }
}

impl Entity for BonusItem {
    fn update(&mut self, _dt: f32, _rng: &mut dyn RngCore) {}

    fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSheet) -> GameResult<()> {
        let sprite = sprites.get(BONUS_SPRITE)?;
        let dest = Rect::new(self.x, self.y, BONUS_WIDTH, BONUS_HEIGHT);
        surface.draw_image(sprite, BONUS_CROP, dest)
    }

    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn size(&self) -> (f32, f32) {
        (BONUS_WIDTH, BONUS_HEIGHT)
    }
}
