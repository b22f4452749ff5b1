//! Dungeon Arena headless runner
//!
//! Generates levels for a seed and drives them with a simple autopilot,
//! logging what happens. Usage: `dungeon-arena [seed] [levels]`.
//! Set `DUNGEON_TUNING` to a JSON file to override balance values.

use glam::Vec2;

use dungeon_arena::Tuning;
use dungeon_arena::sim::{Body, GameEvent, Level, LevelPhase, PickupKind, TickInput, tick};

/// Give up on a level after this many ticks (60 Hz → 1 minute)
const MAX_TICKS_PER_LEVEL: u64 = 60 * 60;

/// Attack when an enemy center is this close
const AUTOPILOT_ATTACK_RADIUS: f32 = 60.0;

/// Run bookkeeping owned by the session, outside the simulation
#[derive(Debug, Default)]
struct Session {
    score: u64,
    levels_cleared: u32,
    enemies_killed: u32,
}

impl Session {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EnemyKilled { .. } => {
                self.enemies_killed += 1;
                self.score += 30;
            }
            GameEvent::PickupCollected { kind: PickupKind::Rupee, .. } => self.score += 10,
            GameEvent::PickupCollected { kind: PickupKind::Key, .. } => self.score += 50,
            GameEvent::DoorEntered => self.levels_cleared += 1,
            _ => {}
        }
    }
}

/// -1, 0 or 1 with a small dead zone
fn axis(v: f32) -> f32 {
    if v.abs() < 2.0 { 0.0 } else { v.signum() }
}

/// Head for the key, then the door, then swing at anything close
fn autopilot(level: &Level, tick_count: u64) -> TickInput {
    let player = level.player.bounds().center();

    let target = level
        .pickups
        .iter()
        .filter(|p| !p.collected)
        .min_by(|a, b| {
            let key_first = (a.kind != PickupKind::Key).cmp(&(b.kind != PickupKind::Key));
            key_first.then(
                a.pos
                    .distance(player)
                    .partial_cmp(&b.pos.distance(player))
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        })
        .map(|p| p.bounds().center())
        .unwrap_or_else(|| level.door.bounds().center());

    let to_target = target - player;
    // Wiggle perpendicular now and then to slide around walls
    let wiggle = if (tick_count / 40) % 3 == 0 {
        Vec2::new(axis(-to_target.y), axis(to_target.x))
    } else {
        Vec2::ZERO
    };
    let dir = Vec2::new(axis(to_target.x), axis(to_target.y)) + wiggle;

    let enemy_close = level
        .enemies
        .iter()
        .any(|e| e.alive && e.bounds().center().distance(player) < AUTOPILOT_ATTACK_RADIUS);

    TickInput {
        up: dir.y < -0.5,
        down: dir.y > 0.5,
        left: dir.x < -0.5,
        right: dir.x > 0.5,
        // Pulse the button so each swing gets a fresh press
        attack: enemy_close && tick_count % 2 == 0,
    }
}

fn load_tuning() -> Tuning {
    let Ok(path) = std::env::var("DUNGEON_TUNING") else {
        return Tuning::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Invalid tuning file {}: {} - using defaults", path, e);
                Tuning::default()
            }
        },
        Err(e) => {
            log::warn!("Could not read tuning file {}: {} - using defaults", path, e);
            Tuning::default()
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let levels: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);

    log::info!("Dungeon Arena starting with seed {} for {} levels", seed, levels);

    let tuning = load_tuning();
    let mut session = Session::default();
    let mut level = Level::new(1, seed, tuning);

    for _ in 0..levels {
        match serde_json::to_string(&level.walls) {
            Ok(json) => println!("level {} walls: {}", level.number, json),
            Err(e) => log::warn!("Could not serialize walls: {}", e),
        }

        while !level.is_finished() && level.time_ticks < MAX_TICKS_PER_LEVEL {
            let input = autopilot(&level, level.time_ticks);
            for event in tick(&mut level, &input) {
                log::debug!("tick {}: {:?}", level.time_ticks, event);
                session.record(&event);
            }
        }

        log::info!(
            "Level {} ended {:?} after {} ticks ({} enemies left, {} hearts)",
            level.number,
            level.phase,
            level.time_ticks,
            level.enemies_alive(),
            level.player.hearts
        );

        match level.phase {
            LevelPhase::Cleared => level = level.advance(),
            LevelPhase::Defeated => break,
            LevelPhase::Playing => {
                log::warn!("Level {} timed out", level.number);
                break;
            }
        }
    }

    println!(
        "score {} | levels cleared {} | enemies killed {}",
        session.score, session.levels_cleared, session.enemies_killed
    );
}
