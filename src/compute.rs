//! Game logic: the scoreboard state machine and the world it drives.
//!
//! `GameWorld` is the single context the frame driver owns.  Every public
//! method mutates it in place; all randomness comes through an injected RNG
//! so callers control determinism (tests use a seeded one).

use std::time::Duration;

use crossterm::style::Color;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::collision::is_collision;
use crate::display::{SpriteSheet, Surface};
use crate::entities::{BonusItem, Direction, Entity, Hazard, Player};
use crate::error::GameResult;
use crate::grid::CANVAS_WIDTH;
use crate::scheduler::{Fired, Scheduler};

// ── Session tuning ────────────────────────────────────────────────────────────

pub const HAZARD_COUNT: usize = 7;
/// Seconds on the clock at the start of a session.
pub const GAME_DURATION: u32 = 60;

pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);
pub const WIN_FLASH: Duration = Duration::from_millis(1000);
pub const LOSE_FLASH: Duration = Duration::from_millis(1000);
pub const BONUS_FLASH: Duration = Duration::from_millis(500);
pub const BONUS_SPAWN_INTERVAL: Duration = Duration::from_secs(5);
pub const BONUS_VISIBLE: Duration = Duration::from_secs(3);

const NEUTRAL: Color = Color::White;
const ALERT: Color = Color::Red;

// ── States & timer events ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    WinFlash,
    LoseFlash,
    BonusFlash,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second off the clock.  Tagged with the session that started it.
    CountdownTick { session: u64 },
    BonusSpawn { session: u64 },
    ExpireBonus { id: u64 },
    ClearWon,
    ClearLost,
    ClearBonus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    Won,
    Bonus,
    Lost,
    GameOver,
}

impl Overlay {
    pub fn message(self) -> &'static str {
        match self {
            Overlay::Won => "You Won!",
            Overlay::Bonus => "Bonus!",
            Overlay::Lost => "You Lost!",
            Overlay::GameOver => "Game Over",
        }
    }

    fn color(self) -> Color {
        match self {
            Overlay::Won => Color::Yellow,
            Overlay::Bonus => Color::Cyan,
            Overlay::Lost | Overlay::GameOver => Color::Red,
        }
    }
}

// ── Scoreboard ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Scoreboard {
    /// Goals and gems add, hazard hits subtract; may go negative.
    pub score: i32,
    /// Seconds left in the session.
    pub time_left: u32,
    pub won: bool,
    pub lost: bool,
    pub bonus: bool,
    pub game_over: bool,
    pub running: bool,
    /// Bumped on every `start_game`.
    pub session: u64,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Scoreboard {
            score: 0,
            time_left: GAME_DURATION,
            won: false,
            lost: false,
            bonus: false,
            game_over: false,
            running: false,
            session: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.running {
            if self.won {
                Phase::WinFlash
            } else if self.lost {
                Phase::LoseFlash
            } else if self.bonus {
                Phase::BonusFlash
            } else {
                Phase::Running
            }
        } else if self.game_over {
            Phase::GameOver
        } else {
            Phase::Idle
        }
    }

    /// The one message to show this frame: won, then bonus, then lost, then
    /// game over (only while neither won nor lost is flashing).
    pub fn overlay(&self) -> Option<Overlay> {
        if self.won {
            Some(Overlay::Won)
        } else if self.bonus {
            Some(Overlay::Bonus)
        } else if self.lost {
            Some(Overlay::Lost)
        } else if self.game_over {
            Some(Overlay::GameOver)
        } else {
            None
        }
    }

    pub fn score_color(&self) -> Color {
        if self.score < 0 {
            ALERT
        } else {
            NEUTRAL
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) -> GameResult<()> {
        surface.set_font("bold 20px sans-serif");

        surface.set_fill_color(self.score_color());
        surface.fill_text(&format!("Score: {}", self.score), 5.0, 5.0)?;

        surface.set_fill_color(NEUTRAL);
        surface.fill_text(&format!("Time: {}", self.time_left), 400.0, 5.0)?;

        if let Some(overlay) = self.overlay() {
            let message = overlay.message();
            // Roughly centred; ~10 px per character at this size
            let x = CANVAS_WIDTH / 2.0 - message.chars().count() as f32 * 5.0;
            surface.set_font("bold 36px Impact");
            surface.set_fill_color(overlay.color());
            surface.fill_text(message, x, 290.0)?;
        }
        Ok(())
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Every active entity plus the scoreboard and its timers.
#[derive(Clone, Debug)]
pub struct GameWorld {
    pub player: Player,
    pub hazards: Vec<Hazard>,
    /// At most one gem is ever on the board.
    pub bonus: Option<BonusItem>,
    pub scoreboard: Scoreboard,
    scheduler: Scheduler<TimerEvent>,
    next_bonus_id: u64,
}

impl Default for GameWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl GameWorld {
    /// An idle world: player parked, no hazards, no timers.
    pub fn new() -> Self {
        GameWorld {
            player: Player::new(),
            hazards: Vec::new(),
            bonus: None,
            scoreboard: Scoreboard::new(),
            scheduler: Scheduler::new(),
            next_bonus_id: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.scoreboard.phase()
    }

    pub fn scheduler(&self) -> &Scheduler<TimerEvent> {
        &self.scheduler
    }

    // ── Session lifecycle ────────────────────────────────────────────────────

    /// Idle/GameOver → Running.  Ignored while a session is already running.
    pub fn start_game(&mut self, rng: &mut impl Rng) {
        if self.scoreboard.running {
            debug!(session = self.scoreboard.session, "start ignored, session already running");
            return;
        }

        let board = &mut self.scoreboard;
        board.session += 1;
        board.time_left = GAME_DURATION;
        board.game_over = false;
        board.running = true;
        let session = board.session;

        self.hazards = (0..HAZARD_COUNT).map(|_| Hazard::new(rng)).collect();
        self.player.enable_moves(true);

        self.scheduler.every(COUNTDOWN_TICK, TimerEvent::CountdownTick { session });
        self.scheduler.every(BONUS_SPAWN_INTERVAL, TimerEvent::BonusSpawn { session });

        info!(session, duration = GAME_DURATION, hazards = HAZARD_COUNT, "session started");
    }

    /// Running → GameOver.  Runs at most once per session.
    pub fn handle_game_over(&mut self) {
        if !self.scoreboard.running {
            return;
        }

        self.scoreboard.running = false;
        self.player.enable_moves(false);
        self.player.reset();
        self.hazards.clear();
        self.bonus = None;
        self.scoreboard.game_over = true;

        info!(
            session = self.scoreboard.session,
            score = self.scoreboard.score,
            "game over"
        );
    }

    /// GameOver → Idle: wipe the scoreboard for a fresh start.  Ignored while
    /// a session is running.
    pub fn return_to_idle(&mut self) {
        if self.scoreboard.running {
            return;
        }
        self.scoreboard = Scoreboard {
            session: self.scoreboard.session,
            ..Scoreboard::new()
        };
        debug!("returned to idle");
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, direction: Direction) {
        self.player.handle_input(direction);
    }

    /// Route a keyboard symbol; anything but the four directions is ignored.
    pub fn handle_key(&mut self, symbol: &str) {
        match Direction::from_symbol(symbol) {
            Some(direction) => self.handle_input(direction),
            None => trace!(symbol, "ignoring key"),
        }
    }

    // ── Per-frame ────────────────────────────────────────────────────────────

    /// Advance the world by `dt` seconds: due timers first, then every
    /// entity, then the win/lose/bonus checks.
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        self.run_timers(dt, rng);

        for entity in self.entities_mut() {
            entity.update(dt, &mut *rng);
        }

        self.update_game_state();
    }

    /// Draw every active entity, then the scoreboard on top.
    pub fn render(&self, surface: &mut dyn Surface, sprites: &SpriteSheet) -> GameResult<()> {
        for entity in self.entities() {
            entity.render(surface, sprites)?;
        }
        self.scoreboard.render(surface)
    }

    /// The scoreboard's per-frame transition check.  Only one outcome is
    /// applied per call: goal, else hazard hit, else gem pickup.
    pub fn update_game_state(&mut self) {
        if !self.scoreboard.running {
            return;
        }

        if self.player.row == 0 {
            self.on_goal();
            return;
        }

        let player_box = self.player.collision_bounds();

        let hit = self
            .hazards
            .iter()
            .any(|hazard| is_collision(&player_box, &hazard.collision_bounds()));
        if hit {
            self.on_hazard_hit();
            return;
        }

        let collected = self
            .bonus
            .as_ref()
            .is_some_and(|item| is_collision(&player_box, &item.collision_bounds()));
        if collected {
            self.on_bonus_collected();
        }
    }

    fn on_goal(&mut self) {
        self.scoreboard.score += 1;
        self.scoreboard.won = true;
        self.player.reset();
        self.player.enable_moves(false);
        self.scheduler.after(WIN_FLASH, TimerEvent::ClearWon);
        debug!(score = self.scoreboard.score, "goal reached");
    }

    fn on_hazard_hit(&mut self) {
        self.scoreboard.score -= 1;
        self.scoreboard.lost = true;
        self.player.reset();
        self.player.enable_moves(false);
        self.scheduler.after(LOSE_FLASH, TimerEvent::ClearLost);
        debug!(score = self.scoreboard.score, "hit by hazard");
    }

    fn on_bonus_collected(&mut self) {
        self.scoreboard.score += 1;
        self.scoreboard.bonus = true;
        self.bonus = None;
        self.scheduler.after(BONUS_FLASH, TimerEvent::ClearBonus);
        debug!(score = self.scoreboard.score, "bonus collected");
    }

    // ── Timers ───────────────────────────────────────────────────────────────

    fn run_timers(&mut self, dt: f32, rng: &mut impl Rng) {
        let step = Duration::try_from_secs_f32(dt).unwrap_or(Duration::ZERO);
        let until = self.scheduler.now() + step;

        while let Some(fired) = self.scheduler.pop_due(until) {
            self.on_timer(fired, rng);
        }
        self.scheduler.settle(until);
    }

    fn on_timer(&mut self, fired: Fired<TimerEvent>, rng: &mut impl Rng) {
        trace!(event = ?fired.event, at = ?fired.at, "timer fired");

        match fired.event {
            TimerEvent::CountdownTick { session } => {
                if !self.is_current(session) {
                    self.scheduler.cancel(fired.id);
                    return;
                }
                self.scoreboard.time_left = self.scoreboard.time_left.saturating_sub(1);
                if self.scoreboard.time_left == 0 {
                    self.scheduler.cancel(fired.id);
                    self.handle_game_over();
                }
            }
            TimerEvent::BonusSpawn { session } => {
                if !self.is_current(session) {
                    self.scheduler.cancel(fired.id);
                    if !self.scoreboard.running {
                        self.bonus = None;
                    }
                    return;
                }
                self.spawn_bonus(rng);
            }
            TimerEvent::ExpireBonus { id } => {
                if self.bonus.as_ref().is_some_and(|item| item.id == id) {
                    self.bonus = None;
                }
            }
            TimerEvent::ClearWon => {
                self.scoreboard.won = false;
                if self.scoreboard.running {
                    self.player.enable_moves(true);
                }
            }
            TimerEvent::ClearLost => {
                self.scoreboard.lost = false;
                if self.scoreboard.running {
                    self.player.enable_moves(true);
                }
            }
            TimerEvent::ClearBonus => self.scoreboard.bonus = false,
        }
    }

    /// Replace any unclaimed gem with a fresh one and arm its expiry.
    fn spawn_bonus(&mut self, rng: &mut impl Rng) {
        self.next_bonus_id += 1;
        let id = self.next_bonus_id;
        let item = BonusItem::new(id, rng);
        trace!(id, row = item.row, col = item.col, "bonus spawned");
        self.bonus = Some(item);
        self.scheduler.after(BONUS_VISIBLE, TimerEvent::ExpireBonus { id });
    }

    fn is_current(&self, session: u64) -> bool {
        self.scoreboard.running && self.scoreboard.session == session
    }

    // ── Entity views ─────────────────────────────────────────────────────────

    fn entities(&self) -> impl Iterator<Item = &dyn Entity> + '_ {
        self.hazards
            .iter()
            .map(|hazard| hazard as &dyn Entity)
            .chain(self.bonus.iter().map(|item| item as &dyn Entity))
            .chain(std::iter::once(&self.player as &dyn Entity))
    }

    fn entities_mut(&mut self) -> impl Iterator<Item = &mut dyn Entity> + '_ {
        self.hazards
            .iter_mut()
            .map(|hazard| hazard as &mut dyn Entity)
            .chain(self.bonus.iter_mut().map(|item| item as &mut dyn Entity))
            .chain(std::iter::once(&mut self.player as &mut dyn Entity))
    }
}
