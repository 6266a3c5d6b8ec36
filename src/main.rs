use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crossing_game::compute::{GameWorld, Phase};
use crossing_game::display::terminal::{canvas_cells, TerminalSurface};
use crossing_game::display::{draw_board, SpriteSheet, Surface, GAME_SPRITES};
use crossing_game::error::GameResult;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A stalled frame (e.g. the terminal was suspended) must not fast-forward
/// the clock by more than this.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

const LOG_ENV_VAR: &str = "CROSSING_GAME_LOG";

// ── Logging ───────────────────────────────────────────────────────────────────

fn log_path() -> PathBuf {
    std::env::var_os(LOG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("crossing_game.log"))
}

/// The terminal is in raw alternate-screen mode, so logs go to a file.
fn init_tracing() -> GameResult<()> {
    let file = File::create(log_path())?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("crossing_game=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

// ── Keyboard ──────────────────────────────────────────────────────────────────

/// Arrow keys and WASD map to the four direction symbols the game accepts.
fn direction_symbol(code: &KeyCode) -> Option<&'static str> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some("left"),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some("right"),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some("up"),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some("down"),
        _ => None,
    }
}

/// Moves act on release when the terminal reports it, on press otherwise.
fn move_trigger(keyboard_enhanced: bool) -> KeyEventKind {
    if keyboard_enhanced {
        KeyEventKind::Release
    } else {
        KeyEventKind::Press
    }
}

/// The direction symbol for a key event of the move-triggering kind.
fn move_symbol(ev: &KeyEvent, trigger: KeyEventKind) -> Option<&'static str> {
    if ev.kind != trigger {
        return None;
    }
    direction_symbol(&ev.code)
}

fn is_quit(code: &KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Play,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> GameResult<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "≈≈  CROSSING  ≈≈";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let lines: &[(&str, Color)] = &[
        ("Reach the water, dodge the bugs, grab the gems.", Color::White),
        ("Water +1   Gem +1   Bug -1", Color::DarkGrey),
        ("", Color::DarkGrey),
        ("[Enter] Play   [Q] Quit", Color::Yellow),
        ("← → ↑ ↓ / W A S D : Move", Color::DarkGrey),
    ];
    for (i, (line, color)) in lines.iter().enumerate() {
        let row = cy.saturating_sub(3) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(line.chars().count() as u16 / 2), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*line))?;
    }

    let (need_cols, need_rows) = canvas_cells();
    if width < need_cols || height < need_rows {
        let warning =
            format!("Terminal is {width}x{height}; {need_cols}x{need_rows} shows the whole board");
        out.queue(cursor::MoveTo(
            cx.saturating_sub(warning.chars().count() as u16 / 2),
            cy + 3,
        ))?;
        out.queue(style::SetForegroundColor(Color::Red))?;
        out.queue(Print(&warning))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let event = match rx.recv() {
            Ok(event) => event,
            // Keyboard reader is gone; no choice can ever arrive
            Err(_) => return Ok(MenuResult::Quit),
        };
        let Event::Key(key) = event else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => {
                return Ok(MenuResult::Play)
            }
            _ if is_quit(&key.code, key.modifiers) => return Ok(MenuResult::Quit),
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Moves fire on key release when the terminal reports release events
/// (keyboard-enhancement capable terminals), and on key press otherwise.
/// Quit and restart always act on press.
fn game_loop<W: Write>(
    surface: &mut TerminalSurface<W>,
    world: &mut GameWorld,
    sprites: &SpriteSheet,
    rx: &mpsc::Receiver<Event>,
    keyboard_enhanced: bool,
) -> GameResult<bool> {
    let mut rng = thread_rng();
    let trigger = move_trigger(keyboard_enhanced);

    world.start_game(&mut rng);
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            let Event::Key(key) = event else {
                continue;
            };

            if key.kind == KeyEventKind::Press {
                if is_quit(&key.code, key.modifiers) {
                    return Ok(true);
                }
                if matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R'))
                    && world.phase() == Phase::GameOver
                {
                    world.return_to_idle();
                    return Ok(false);
                }
            }

            if let Some(symbol) = move_symbol(&key, trigger) {
                world.handle_key(symbol);
            }
        }

        let dt = last_frame.elapsed().min(MAX_FRAME_DELTA).as_secs_f32();
        last_frame = Instant::now();
        world.update(dt, &mut rng);

        surface.begin_frame()?;
        draw_board(surface, sprites)?;
        world.render(surface, sprites)?;
        if world.phase() == Phase::GameOver {
            surface.set_font("16px sans-serif");
            surface.set_fill_color(Color::White);
            surface.fill_text("R - Play Again  Q - Quit", 140.0, 340.0)?;
        }
        surface.end_frame()?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> GameResult<()> {
    init_tracing()?;
    let sprites = SpriteSheet::load(GAME_SPRITES)?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events only from terminals that answer the
    // enhancement query; writing the flags succeeds everywhere.  The query
    // reads stdin, so it runs before the reader thread starts.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    info!(keyboard_enhanced, "terminal ready");

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(err) => {
                warn!(%err, "keyboard reader stopped");
                break;
            }
        }
    });

    let result = run(out, &sprites, &rx, keyboard_enhanced);

    // Always restore the terminal
    let mut out = stdout();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        error!(%err, "exiting on error");
    }
    result
}

fn run<W: Write>(
    out: W,
    sprites: &SpriteSheet,
    rx: &mpsc::Receiver<Event>,
    keyboard_enhanced: bool,
) -> GameResult<()> {
    let (width, height) = terminal::size()?;
    let mut surface = TerminalSurface::new(out, width, height);
    let mut world = GameWorld::new();

    loop {
        match show_menu(surface.get_mut(), rx)? {
            MenuResult::Quit => break,
            MenuResult::Play => {
                let quit = game_loop(&mut surface, &mut world, sprites, rx, keyboard_enhanced)?;
                if quit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }

    info!(score = world.scoreboard.score, "quit");
    Ok(())
}
