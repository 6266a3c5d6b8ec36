use crossing_game::compute::*;
use crossing_game::entities::*;
use crossing_game::grid::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn started_world(rng: &mut StdRng) -> GameWorld {
    let mut world = GameWorld::new();
    world.start_game(rng);
    world
}

/// Put a motionless hazard exactly on the player's current cell.
fn park_hazard_on_player(world: &mut GameWorld) {
    let row = world.player.row;
    world.hazards[0] = Hazard {
        x: col_to_x(world.player.col),
        y: row_to_y(row),
        row,
        speed: 0.0,
    };
}

fn gem_at(id: u64, row: usize, col: usize) -> BonusItem {
    BonusItem {
        id,
        row,
        col,
        x: col_to_x(col) + 25.0,
        y: row_to_y(row) + 30.0,
    }
}

// ── start_game ────────────────────────────────────────────────────────────────

#[test]
fn new_world_is_idle() {
    let world = GameWorld::new();
    assert_eq!(world.phase(), Phase::Idle);
    assert!(world.hazards.is_empty());
    assert!(world.bonus.is_none());
    assert!(world.scheduler().is_empty());
    assert_eq!(world.scoreboard.time_left, GAME_DURATION);
}

#[test]
fn start_game_spawns_exactly_seven_hazards() {
    let mut rng = seeded_rng();
    let world = started_world(&mut rng);
    assert_eq!(world.hazards.len(), HAZARD_COUNT);
    assert_eq!(world.hazards.len(), 7);
    assert_eq!(world.phase(), Phase::Running);
    assert!(world.player.moves_enabled());
    assert_eq!(world.scoreboard.time_left, GAME_DURATION);
    // countdown + bonus spawner
    assert_eq!(world.scheduler().len(), 2);
}

#[test]
fn start_game_while_running_is_ignored() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    world.start_game(&mut rng);
    assert_eq!(world.hazards.len(), HAZARD_COUNT);
    assert_eq!(world.scoreboard.session, 1);
    assert_eq!(world.scheduler().len(), 2);
}

#[test]
fn update_does_nothing_to_score_while_idle() {
    let mut rng = seeded_rng();
    let mut world = GameWorld::new();
    world.player.row = 0;
    world.update(0.016, &mut rng);
    assert_eq!(world.scoreboard.score, 0);
    assert!(!world.scoreboard.won);
}

// ── goal ──────────────────────────────────────────────────────────────────────

#[test]
fn reaching_water_scores_and_resets_in_same_update() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);

    world.player.row = 0;
    world.update(0.0, &mut rng);

    assert_eq!(world.scoreboard.score, 1);
    assert!(world.scoreboard.won);
    assert_eq!(world.player.row, ROWS - 1);
    assert_eq!(world.player.col, COLS / 2);
    assert!(!world.player.moves_enabled());
    assert_eq!(world.phase(), Phase::WinFlash);
}

#[test]
fn win_flash_clears_and_reenables_moves() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    world.player.row = 0;
    world.update(0.0, &mut rng);

    world.update(0.5, &mut rng);
    assert!(world.scoreboard.won);
    assert!(!world.player.moves_enabled());

    world.update(0.5, &mut rng);
    assert!(!world.scoreboard.won);
    assert!(world.player.moves_enabled());
    assert_eq!(world.phase(), Phase::Running);
    assert_eq!(world.scoreboard.score, 1);
}

#[test]
fn walking_to_water_through_handle_key() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    world.hazards.clear();

    for _ in 0..ROWS - 1 {
        world.handle_key("up");
        world.update(0.016, &mut rng);
    }

    assert_eq!(world.scoreboard.score, 1);
    assert_eq!(world.player.row, start_row());
}

// ── hazard hit ────────────────────────────────────────────────────────────────

#[test]
fn hazard_hit_costs_a_point_and_freezes_player() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);

    world.player.row = 2;
    world.player.col = 1;
    park_hazard_on_player(&mut world);
    world.update(0.0, &mut rng);

    assert_eq!(world.scoreboard.score, -1);
    assert!(world.scoreboard.lost);
    assert_eq!(world.phase(), Phase::LoseFlash);
    assert_eq!((world.player.row, world.player.col), (start_row(), start_col()));
    assert!(!world.player.moves_enabled());

    world.handle_key("up");
    assert_eq!(world.player.row, start_row());

    world.update(0.5, &mut rng);
    assert!(world.scoreboard.lost);
    assert!(!world.player.moves_enabled());

    world.update(0.5, &mut rng);
    assert!(!world.scoreboard.lost);
    assert!(world.player.moves_enabled());
}

#[test]
fn score_goes_negative_on_repeated_hits() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);

    for _ in 0..2 {
        world.player.row = 3;
        park_hazard_on_player(&mut world);
        world.update(0.0, &mut rng);
    }

    assert_eq!(world.scoreboard.score, -2);
}

#[test]
fn player_on_start_row_is_safe_from_hazards() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    for _ in 0..300 {
        world.update(0.1, &mut rng);
        if !world.scoreboard.running {
            break;
        }
    }
    assert_eq!(world.scoreboard.score, 0);
    assert!(!world.scoreboard.lost);
}

// ── bonus ─────────────────────────────────────────────────────────────────────

#[test]
fn collecting_gem_scores_without_freezing() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    world.hazards.clear();

    world.player.row = 1;
    world.player.col = 2;
    world.bonus = Some(gem_at(99, 1, 2));
    world.update(0.0, &mut rng);

    assert_eq!(world.scoreboard.score, 1);
    assert!(world.scoreboard.bonus);
    assert!(world.bonus.is_none());
    assert!(world.player.moves_enabled());
    assert_eq!(world.phase(), Phase::BonusFlash);
    // Player keeps its cell after a pickup
    assert_eq!(world.player.row, 1);

    world.update(0.5, &mut rng);
    assert!(!world.scoreboard.bonus);
}

#[test]
fn hazard_hit_takes_priority_over_gem() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);

    world.player.row = 1;
    world.player.col = 2;
    park_hazard_on_player(&mut world);
    world.bonus = Some(gem_at(99, 1, 2));
    world.update(0.0, &mut rng);

    assert_eq!(world.scoreboard.score, -1);
    assert!(world.scoreboard.lost);
    assert!(!world.scoreboard.bonus);
    assert!(world.bonus.is_some());
}

#[test]
fn gem_spawns_on_interval_and_expires() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    assert!(world.bonus.is_none());

    world.update(5.0, &mut rng);
    let first = world.bonus.clone().expect("gem after spawn interval");
    assert!((1..=2).contains(&first.row));

    world.update(2.9, &mut rng);
    assert!(world.bonus.is_some());

    world.update(0.1, &mut rng);
    assert!(world.bonus.is_none());

    world.update(2.0, &mut rng);
    let second = world.bonus.clone().expect("gem after second interval");
    assert_ne!(second.id, first.id);
}

#[test]
fn new_spawn_replaces_unclaimed_gem() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);

    world.update(4.0, &mut rng);
    world.bonus = Some(gem_at(500, 2, 0));
    world.update(1.0, &mut rng);

    let gem = world.bonus.clone().expect("fresh gem");
    assert_ne!(gem.id, 500);
}

// ── countdown & game over ─────────────────────────────────────────────────────

#[test]
fn countdown_ticks_once_per_second() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);

    world.update(0.999, &mut rng);
    assert_eq!(world.scoreboard.time_left, GAME_DURATION);
    world.update(0.001, &mut rng);
    assert_eq!(world.scoreboard.time_left, GAME_DURATION - 1);
    world.update(3.0, &mut rng);
    assert_eq!(world.scoreboard.time_left, GAME_DURATION - 4);
}

#[test]
fn countdown_reaching_zero_ends_session_once() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);

    for _ in 0..GAME_DURATION - 1 {
        world.update(1.0, &mut rng);
    }
    assert!(world.scoreboard.running);
    assert_eq!(world.scoreboard.time_left, 1);

    world.update(1.0, &mut rng);
    assert_eq!(world.scoreboard.time_left, 0);
    assert!(!world.scoreboard.running);
    assert!(world.scoreboard.game_over);
    assert_eq!(world.phase(), Phase::GameOver);
    assert!(world.hazards.is_empty());
    assert!(world.bonus.is_none());
    assert!(!world.player.moves_enabled());

    let score = world.scoreboard.score;
    for _ in 0..10 {
        world.update(1.0, &mut rng);
    }
    assert_eq!(world.scoreboard.time_left, 0);
    assert_eq!(world.scoreboard.score, score);
    assert!(world.scheduler().is_empty());
}

#[test]
fn handle_game_over_clears_entities() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    world.update(5.0, &mut rng);
    assert!(world.bonus.is_some());
    world.player.row = 3;

    world.handle_game_over();

    assert!(world.hazards.is_empty());
    assert!(world.bonus.is_none());
    assert!(world.scoreboard.game_over);
    assert!(!world.scoreboard.running);
    assert_eq!(world.player.row, start_row());
    assert!(!world.player.moves_enabled());

    world.handle_key("up");
    assert_eq!(world.player.row, start_row());
}

#[test]
fn handle_game_over_when_not_running_is_noop() {
    let mut world = GameWorld::new();
    world.handle_game_over();
    assert!(!world.scoreboard.game_over);
    assert_eq!(world.phase(), Phase::Idle);
}

#[test]
fn intervals_stop_within_one_tick_of_game_over() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    world.update(0.5, &mut rng);
    world.handle_game_over();

    // Both intervals are still queued until their next tick
    assert_eq!(world.scheduler().len(), 2);
    world.update(1.0, &mut rng);
    assert_eq!(world.scheduler().len(), 1);
    world.update(5.0, &mut rng);
    assert!(world.scheduler().is_empty());
    assert!(world.bonus.is_none());
}

#[test]
fn stale_spawn_tick_clears_leftover_gem_after_game_over() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    world.handle_game_over();

    world.bonus = Some(gem_at(99, 1, 0));
    world.update(4.0, &mut rng);
    assert!(world.bonus.is_some());

    world.update(1.0, &mut rng);
    assert!(world.bonus.is_none());
    assert!(world.scheduler().is_empty());
    assert_eq!(world.phase(), Phase::GameOver);
}

// ── restart ───────────────────────────────────────────────────────────────────

#[test]
fn fast_restart_does_not_double_tick() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    world.handle_game_over();
    world.start_game(&mut rng);
    assert_eq!(world.scoreboard.session, 2);

    world.update(1.0, &mut rng);
    assert_eq!(world.scoreboard.time_left, GAME_DURATION - 1);
    world.update(1.0, &mut rng);
    assert_eq!(world.scoreboard.time_left, GAME_DURATION - 2);
}

#[test]
fn restart_after_game_over_resets_timer_and_flag() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    world.player.row = 0;
    world.update(0.0, &mut rng);
    world.handle_game_over();

    world.start_game(&mut rng);
    assert!(!world.scoreboard.game_over);
    assert_eq!(world.scoreboard.time_left, GAME_DURATION);
    assert_eq!(world.hazards.len(), HAZARD_COUNT);
    // start_game carries the score over; return_to_idle is what clears it
    assert_eq!(world.scoreboard.score, 1);
}

#[test]
fn return_to_idle_wipes_scoreboard() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    world.player.row = 0;
    world.update(0.0, &mut rng);

    world.return_to_idle();
    assert_eq!(world.phase(), Phase::WinFlash);
    assert_eq!(world.scoreboard.score, 1);

    world.handle_game_over();
    world.return_to_idle();
    assert_eq!(world.phase(), Phase::Idle);
    assert_eq!(world.scoreboard.score, 0);
    assert!(!world.scoreboard.won);
    assert!(!world.scoreboard.game_over);
    assert_eq!(world.scoreboard.session, 1);
}

// ── input ─────────────────────────────────────────────────────────────────────

#[test]
fn unknown_keys_are_ignored() {
    let mut rng = seeded_rng();
    let mut world = started_world(&mut rng);
    let before = (world.player.row, world.player.col);
    world.handle_key("space");
    world.handle_key("enter");
    world.handle_key("");
    assert_eq!((world.player.row, world.player.col), before);

    world.handle_key("left");
    assert_eq!(world.player.col, before.1 - 1);
}
