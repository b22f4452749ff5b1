//! Dungeon Arena - procedural room generation and spatial placement
//!
//! Core modules:
//! - `sim`: Deterministic simulation (wall layout, safe spawning, steering, level state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Arena dimensions (pixels, origin top-left, y down)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Thickness of the four border walls
    pub const BORDER_THICKNESS: f32 = 30.0;

    /// Logical placement grid cell size (pixels)
    pub const GRID_CELL_SIZE: i32 = 80;
    /// Interior wall candidates: min(level, MAX_COMPLEXITY) + BASE_INTERIOR_WALLS
    pub const MAX_COMPLEXITY: u32 = 8;
    pub const BASE_INTERIOR_WALLS: u32 = 3;
    /// Grid placements tried per wall candidate before it is dropped
    pub const WALL_PLACEMENT_ATTEMPTS: u32 = 30;
    /// Amount shaved off a wall's grid block so walls don't tile exactly
    pub const WALL_INSET: f32 = 30.0;
    /// Max random offset applied to a wall's top-left corner
    pub const WALL_JITTER: f32 = 20.0;
    /// Cosmetic texture offset range
    pub const WALL_TEXTURE_OFFSET_MAX: f32 = 100.0;

    /// Random samples tried by the safe position search
    pub const SAFE_SEARCH_ATTEMPTS: u32 = 300;
    /// Safe position candidates are sampled from [MIN, MAX) on each axis
    pub const SPAWN_REGION_MIN: Vec2 = Vec2::new(100.0, 100.0);
    pub const SPAWN_REGION_MAX: Vec2 = Vec2::new(700.0, 500.0);
    /// Minimum Euclidean distance from any avoid-position
    pub const AVOID_RADIUS: f32 = 100.0;
    /// Quadrant failsafe points, tried after the arena center
    pub const QUADRANT_FAILSAFES: [Vec2; 4] = [
        Vec2::new(150.0, 150.0),
        Vec2::new(650.0, 150.0),
        Vec2::new(150.0, 450.0),
        Vec2::new(650.0, 450.0),
    ];
    /// Returned unconditionally when every failsafe collides
    pub const EMERGENCY_SPAWN: Vec2 = Vec2::new(150.0, 150.0);

    /// Exit door slots, indexed by level % 3
    pub const DOOR_POSITIONS: [Vec2; 3] = [
        Vec2::new(720.0, 520.0),
        Vec2::new(720.0, 50.0),
        Vec2::new(50.0, 520.0),
    ];
    pub const DOOR_SIZE: f32 = 50.0;
    /// Door glow animation step per tick (radians)
    pub const DOOR_PULSE_STEP: f32 = 0.1;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 32.0;
    /// Player start, inside the reserved spawn block at the grid origin
    pub const PLAYER_START: Vec2 = Vec2::new(60.0, 60.0);

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 28.0;
    /// Ticks a hit enemy flashes white
    pub const ENEMY_HIT_FLASH_TICKS: u32 = 10;
    /// Direction hold range (ticks) after a steering decision
    pub const ENEMY_DIRECTION_HOLD_MIN: i32 = 60;
    pub const ENEMY_DIRECTION_HOLD_MAX: i32 = 120;
    /// Direction hold after bumping into a wall
    pub const ENEMY_COLLISION_HOLD: i32 = 30;
    /// Chance an enemy heads toward the player when re-steering
    pub const ENEMY_CHASE_CHANCE: f32 = 0.4;

    /// Pickup footprint (keys and rupees)
    pub const PICKUP_SIZE: f32 = 20.0;
    /// Clearance used when placing pickups and enemies
    pub const SPAWN_CLEARANCE: f32 = 50.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
