//! Entities and their per-tick movement
//!
//! Every entity shares the [`Body`] capability (a position plus a size that
//! can be tested against rectangles). Behavior lives in each type's own
//! update: the player follows input, enemies steer themselves, doors only
//! animate.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use super::rect::Rect;
use super::tick::TickInput;
use super::walls::Wall;
use crate::consts::*;
use crate::normalize_angle;
use crate::tuning::Tuning;

/// Anything with an axis-aligned footprint
pub trait Body {
    fn pos(&self) -> Vec2;
    fn size(&self) -> Vec2;

    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos(), self.size())
    }

    fn collides_with(&self, rect: &Rect) -> bool {
        self.bounds().intersects(rect)
    }

    /// True if the footprint overlaps any wall
    fn hits_any_wall(&self, walls: &[Wall]) -> bool {
        let bounds = self.bounds();
        walls.iter().any(|w| bounds.intersects(&w.rect))
    }
}

/// Direction the player last moved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// The input-driven player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Speed carried between levels (grows on level up)
    pub base_speed: f32,
    pub speed: f32,
    pub facing: Facing,
    pub moving: bool,
    pub hearts: u8,
    pub attacking: bool,
    pub attack_timer: u32,
    /// Incremented on each new attack so a swing hits an enemy only once
    pub swing: u32,
    pub invulnerable: bool,
    pub invulnerable_timer: u32,
    /// Attack button state last tick, for edge detection
    #[serde(skip)]
    attack_held: bool,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: Vec2::splat(PLAYER_SIZE),
            base_speed: tuning.player_speed,
            speed: tuning.player_speed,
            facing: Facing::Down,
            moving: false,
            hearts: tuning.starting_hearts,
            attacking: false,
            attack_timer: 0,
            swing: 0,
            invulnerable: false,
            invulnerable_timer: 0,
            attack_held: false,
        }
    }

    /// Advance timers, handle attack input, then move with wall rollback
    /// and clamp into the arena.
    pub fn update(&mut self, input: &TickInput, walls: &[Wall], tuning: &Tuning) {
        if self.invulnerable {
            self.invulnerable_timer = self.invulnerable_timer.saturating_sub(1);
            if self.invulnerable_timer == 0 {
                self.invulnerable = false;
            }
        }

        if self.attack_timer > 0 {
            self.attack_timer -= 1;
            if self.attack_timer == 0 {
                self.attacking = false;
            }
        }

        let attack_pressed = input.attack && !self.attack_held;
        self.attack_held = input.attack;
        if attack_pressed && !self.attacking && self.attack_timer == 0 {
            self.attacking = true;
            // A zero cooldown still lasts one tick
            self.attack_timer = tuning.attack_cooldown_ticks.max(1);
            self.swing = self.swing.wrapping_add(1);
        }

        let old_pos = self.pos;
        let mut step = Vec2::ZERO;
        self.moving = false;

        if input.up {
            step.y -= self.speed;
            self.facing = Facing::Up;
            self.moving = true;
        }
        if input.down {
            step.y += self.speed;
            self.facing = Facing::Down;
            self.moving = true;
        }
        if input.left {
            step.x -= self.speed;
            self.facing = Facing::Left;
            self.moving = true;
        }
        if input.right {
            step.x += self.speed;
            self.facing = Facing::Right;
            self.moving = true;
        }

        self.pos += step;
        if self.hits_any_wall(walls) {
            self.pos = old_pos;
        }

        let max = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT) - Vec2::splat(BORDER_THICKNESS) - self.size;
        self.pos = self.pos.clamp(Vec2::splat(BORDER_THICKNESS), max);
    }

    /// Take one heart of damage unless invulnerable. Returns true if applied.
    pub fn take_damage(&mut self, tuning: &Tuning) -> bool {
        if self.invulnerable {
            return false;
        }
        self.invulnerable = true;
        self.invulnerable_timer = tuning.invulnerable_ticks;
        self.hearts = self.hearts.saturating_sub(1);
        true
    }

    pub fn is_defeated(&self) -> bool {
        self.hearts == 0
    }

    pub fn heal(&mut self, hearts: u8, max_hearts: u8) {
        self.hearts = self.hearts.saturating_add(hearts).min(max_hearts);
    }

    /// Sword reach: the player box extended by `range` toward the facing direction
    pub fn attack_box(&self, range: f32) -> Option<Rect> {
        if !self.attacking {
            return None;
        }
        let mut hitbox = self.bounds();
        match self.facing {
            Facing::Up => {
                hitbox.y -= range;
                hitbox.height += range;
            }
            Facing::Down => hitbox.height += range,
            Facing::Left => {
                hitbox.x -= range;
                hitbox.width += range;
            }
            Facing::Right => hitbox.width += range,
        }
        Some(hitbox)
    }

    /// Speed bump for the next level, capped by tuning
    pub fn level_up(&mut self, tuning: &Tuning) {
        self.speed = (self.base_speed + tuning.speed_increment_per_level)
            .min(tuning.max_player_speed);
        self.base_speed = self.speed;
    }

    /// Move to a new level's start with timers cleared
    pub fn reset_for_level(&mut self, pos: Vec2) {
        self.pos = pos;
        self.facing = Facing::Down;
        self.moving = false;
        self.attacking = false;
        self.attack_timer = 0;
        self.invulnerable = false;
        self.invulnerable_timer = 0;
        self.attack_held = false;
    }
}

impl Body for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
}

impl EnemyKind {
    /// Pick a kind for a level: fast enemies from level 2, tanks from level 3
    pub fn roll<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Self {
        let roll: f32 = rng.random();
        if level >= 3 && roll < 0.2 {
            EnemyKind::Tank
        } else if level >= 2 && roll < 0.5 {
            EnemyKind::Fast
        } else {
            EnemyKind::Basic
        }
    }
}

/// An autonomous enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: u8,
    /// Heading in radians, normalized to [-π, π)
    pub direction: f32,
    /// Ticks until the next steering decision
    pub direction_timer: i32,
    pub alive: bool,
    pub hit_flash: u32,
    /// Player swing that last damaged this enemy
    pub last_swing_hit: Option<u32>,
}

impl Enemy {
    pub fn new<R: Rng + ?Sized>(
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let (speed, health) = match kind {
            EnemyKind::Basic => (tuning.basic_enemy_speed, 1),
            EnemyKind::Fast => (tuning.fast_enemy_speed, 1),
            EnemyKind::Tank => (tuning.basic_enemy_speed, tuning.tank_enemy_health.max(1)),
        };
        Self {
            id,
            kind,
            pos,
            size: Vec2::splat(ENEMY_SIZE),
            speed,
            health,
            direction: normalize_angle(rng.random_range(0.0..TAU)),
            direction_timer: 0,
            alive: true,
            hit_flash: 0,
            last_swing_hit: None,
        }
    }

    /// Velocity for the current heading
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.direction.cos(), self.direction.sin()) * self.speed
    }

    /// Steer, move, roll back on wall contact and bounce off the arena bounds
    pub fn update<R: Rng + ?Sized>(&mut self, player_pos: Vec2, walls: &[Wall], rng: &mut R) {
        if !self.alive {
            return;
        }

        self.direction_timer -= 1;
        if self.direction_timer <= 0 {
            if rng.random::<f32>() < ENEMY_CHASE_CHANCE {
                let to_player = player_pos - self.pos;
                self.direction = to_player.y.atan2(to_player.x);
            } else {
                self.direction = rng.random_range(0.0..TAU);
            }
            self.direction = normalize_angle(self.direction);
            self.direction_timer =
                rng.random_range(ENEMY_DIRECTION_HOLD_MIN..=ENEMY_DIRECTION_HOLD_MAX);
        }

        let old_pos = self.pos;
        self.pos += self.velocity();

        if self.hits_any_wall(walls) {
            self.pos = old_pos;
            self.direction = normalize_angle(rng.random_range(0.0..TAU));
            self.direction_timer = ENEMY_COLLISION_HOLD;
        }

        let max = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT) - Vec2::splat(BORDER_THICKNESS) - self.size;
        if self.pos.x < BORDER_THICKNESS || self.pos.x > max.x {
            self.pos.x = old_pos.x;
            self.direction = normalize_angle(PI - self.direction);
        }
        if self.pos.y < BORDER_THICKNESS || self.pos.y > max.y {
            self.pos.y = old_pos.y;
            self.direction = normalize_angle(-self.direction);
        }

        self.hit_flash = self.hit_flash.saturating_sub(1);
    }

    /// Returns true if this hit killed the enemy
    pub fn take_damage(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.hit_flash = ENEMY_HIT_FLASH_TICKS;
        if self.health == 0 {
            self.alive = false;
        }
        !self.alive
    }
}

impl Body for Enemy {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Level exit. Closed until the level key is collected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub pos: Vec2,
    pub size: Vec2,
    pub open: bool,
    /// Glow animation phase, cosmetic
    pub pulse_phase: f32,
}

impl Door {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(DOOR_SIZE),
            open: false,
            pulse_phase: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.pulse_phase = (self.pulse_phase + DOOR_PULSE_STEP) % TAU;
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Only an open door lets the player through
    pub fn admits(&self, player: &impl Body) -> bool {
        self.open && self.collides_with(&player.bounds())
    }
}

impl Body for Door {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Rupee,
    Key,
}

/// A collectible placed at level start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl Pickup {
    pub fn new(id: u32, kind: PickupKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size: Vec2::splat(PICKUP_SIZE),
            collected: false,
        }
    }
}

impl Body for Pickup {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}
