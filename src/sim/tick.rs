//! Per-tick simulation
//!
//! Runs once per frame in a fixed order: player, then each enemy, then the
//! door, then interactions between them. The wall set is read-only here.

use serde::{Deserialize, Serialize};

use super::entity::{Body, EnemyKind, PickupKind};
use super::state::{Level, LevelPhase};

/// Held keys for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Attack button (an attack starts on the press edge)
    pub attack: bool,
}

/// Something the session controller may want to score or display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyHit { id: u32 },
    EnemyKilled { id: u32, kind: EnemyKind },
    PlayerHit { hearts_left: u8 },
    PlayerDefeated,
    PickupCollected { id: u32, kind: PickupKind },
    DoorOpened,
    DoorEntered,
}

/// Advance the level by one tick and report what happened
pub fn tick(level: &mut Level, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if level.is_finished() {
        return events;
    }

    level.time_ticks += 1;

    level.player.update(input, &level.walls, &level.tuning);

    let player_pos = level.player.pos;
    for enemy in &mut level.enemies {
        enemy.update(player_pos, &level.walls, &mut level.rng);
    }

    level.door.update();

    resolve_attacks(level, &mut events);
    resolve_contacts(level, &mut events);
    resolve_pickups(level, &mut events);

    if level.phase == LevelPhase::Playing && level.door.admits(&level.player) {
        level.phase = LevelPhase::Cleared;
        events.push(GameEvent::DoorEntered);
        log::info!("Level {} cleared at tick {}", level.number, level.time_ticks);
    }

    events
}

/// The current swing damages each living enemy it touches at most once
fn resolve_attacks(level: &mut Level, events: &mut Vec<GameEvent>) {
    let Some(hitbox) = level.player.attack_box(level.tuning.attack_range) else {
        return;
    };
    let swing = level.player.swing;

    for enemy in level.enemies.iter_mut().filter(|e| e.alive) {
        if enemy.last_swing_hit == Some(swing) || !enemy.collides_with(&hitbox) {
            continue;
        }
        enemy.last_swing_hit = Some(swing);
        if enemy.take_damage() {
            events.push(GameEvent::EnemyKilled {
                id: enemy.id,
                kind: enemy.kind,
            });
        } else {
            events.push(GameEvent::EnemyHit { id: enemy.id });
        }
    }
}

fn resolve_contacts(level: &mut Level, events: &mut Vec<GameEvent>) {
    let player_box = level.player.bounds();
    let touched = level
        .enemies
        .iter()
        .any(|e| e.alive && e.collides_with(&player_box));

    if touched && level.player.take_damage(&level.tuning) {
        events.push(GameEvent::PlayerHit {
            hearts_left: level.player.hearts,
        });
        if level.player.is_defeated() {
            level.phase = LevelPhase::Defeated;
            events.push(GameEvent::PlayerDefeated);
            log::info!("Player defeated on level {}", level.number);
        }
    }
}

fn resolve_pickups(level: &mut Level, events: &mut Vec<GameEvent>) {
    let player_box = level.player.bounds();
    for pickup in level.pickups.iter_mut().filter(|p| !p.collected) {
        if !pickup.collides_with(&player_box) {
            continue;
        }
        pickup.collected = true;
        events.push(GameEvent::PickupCollected {
            id: pickup.id,
            kind: pickup.kind,
        });
        if pickup.kind == PickupKind::Key && !level.door.open {
            level.door.open();
            events.push(GameEvent::DoorOpened);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::{Enemy, Pickup};
    use crate::sim::walls::border_walls;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Level with border walls only and nothing else in it
    fn empty_level() -> Level {
        let mut level = Level::new(1, 1, Tuning::default());
        level.walls = border_walls().into();
        level.enemies.clear();
        level.pickups.clear();
        level
    }

    fn parked_enemy(id: u32, pos: Vec2) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(id as u64);
        let mut enemy = Enemy::new(id, EnemyKind::Basic, pos, &Tuning::default(), &mut rng);
        enemy.speed = 0.0;
        enemy.direction_timer = 10_000;
        enemy
    }

    #[test]
    fn test_idle_tick_changes_nothing() {
        let mut level = empty_level();
        let start = level.player.pos;
        let events = tick(&mut level, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(level.player.pos, start);
        assert_eq!(level.time_ticks, 1);
    }

    #[test]
    fn test_attack_kills_enemy_once_per_swing() {
        let mut level = empty_level();
        level.player.pos = Vec2::new(300.0, 300.0);
        level.player.facing = crate::sim::entity::Facing::Right;
        let mut tank = parked_enemy(50, Vec2::new(340.0, 302.0));
        tank.kind = EnemyKind::Tank;
        tank.health = 2;
        level.enemies.push(tank);

        let attack = TickInput {
            attack: true,
            ..Default::default()
        };
        let events = tick(&mut level, &attack);
        assert_eq!(events, vec![GameEvent::EnemyHit { id: 50 }]);

        // Holding the button keeps the same swing: no further damage
        for _ in 0..5 {
            let events = tick(&mut level, &attack);
            assert!(!events.iter().any(|e| matches!(e, GameEvent::EnemyHit { .. })));
        }
        assert_eq!(level.enemies[0].health, 1);

        // Release, wait out the cooldown, swing again
        for _ in 0..level.tuning.attack_cooldown_ticks {
            tick(&mut level, &TickInput::default());
        }
        let events = tick(&mut level, &attack);
        assert!(events.contains(&GameEvent::EnemyKilled {
            id: 50,
            kind: EnemyKind::Tank
        }));
        assert!(!level.enemies[0].alive);
    }

    #[test]
    fn test_enemy_contact_costs_one_heart_then_invulnerable() {
        let mut level = empty_level();
        level.player.pos = Vec2::new(300.0, 300.0);
        level.enemies.push(parked_enemy(60, Vec2::new(310.0, 310.0)));

        let events = tick(&mut level, &TickInput::default());
        assert_eq!(events, vec![GameEvent::PlayerHit { hearts_left: 2 }]);

        let events = tick(&mut level, &TickInput::default());
        assert!(events.is_empty());
        assert!(level.player.invulnerable);
    }

    #[test]
    fn test_last_heart_defeats_player() {
        let mut level = empty_level();
        level.player.pos = Vec2::new(300.0, 300.0);
        level.player.hearts = 1;
        level.enemies.push(parked_enemy(61, Vec2::new(310.0, 310.0)));

        let events = tick(&mut level, &TickInput::default());
        assert!(events.contains(&GameEvent::PlayerDefeated));
        assert_eq!(level.phase, LevelPhase::Defeated);
        assert!(tick(&mut level, &TickInput::default()).is_empty());
    }

    #[test]
    fn test_key_opens_door_and_door_clears_level() {
        let mut level = empty_level();
        level.player.pos = Vec2::new(300.0, 300.0);
        level.pickups.push(Pickup::new(70, PickupKind::Key, Vec2::new(305.0, 305.0)));
        level.door.pos = Vec2::new(400.0, 300.0);

        let events = tick(&mut level, &TickInput::default());
        assert_eq!(
            events,
            vec![
                GameEvent::PickupCollected {
                    id: 70,
                    kind: PickupKind::Key
                },
                GameEvent::DoorOpened
            ]
        );
        assert!(level.door.open);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        let mut cleared = false;
        for _ in 0..40 {
            if tick(&mut level, &right).contains(&GameEvent::DoorEntered) {
                cleared = true;
                break;
            }
        }
        assert!(cleared);
        assert_eq!(level.phase, LevelPhase::Cleared);
    }

    #[test]
    fn test_closed_door_does_not_clear() {
        let mut level = empty_level();
        level.door.pos = level.player.pos;
        tick(&mut level, &TickInput::default());
        assert_eq!(level.phase, LevelPhase::Playing);
    }

    #[test]
    fn test_generated_level_runs_without_leaving_arena() {
        let mut level = Level::new(6, 2024, Tuning::default());
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        let down = TickInput {
            down: true,
            ..Default::default()
        };
        let up_left = TickInput {
            left: true,
            up: true,
            ..Default::default()
        };
        let inputs = [right, down, up_left];
        for t in 0..600 {
            tick(&mut level, &inputs[(t / 50) % inputs.len()]);
            if level.is_finished() {
                break;
            }
            assert!(!level.player.hits_any_wall(&level.walls));
            for enemy in level.enemies.iter().filter(|e| e.alive) {
                assert!(enemy.pos.x >= BORDER_THICKNESS);
                assert!(enemy.pos.y >= BORDER_THICKNESS);
                assert!(enemy.pos.x <= ARENA_WIDTH - BORDER_THICKNESS - ENEMY_SIZE);
                assert!(enemy.pos.y <= ARENA_HEIGHT - BORDER_THICKNESS - ENEMY_SIZE);
            }
        }
    }
}
