//! Deterministic simulation module
//!
//! All level logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Bounded searches (attempt counters, never wall-clock)
//! - Stable iteration order (border walls first, entities by ID)
//! - No rendering or input-polling dependencies

pub mod entity;
pub mod grid;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod walls;

pub use entity::{Body, Door, Enemy, EnemyKind, Facing, Pickup, PickupKind, Player};
pub use grid::{GridCell, OccupancyGrid};
pub use rect::{Rect, intersects, point_in_rect};
pub use spawn::{SpawnPoint, SpawnSource, door_position, failsafe_points, find_safe_position};
pub use state::{Level, LevelPhase, level_seed};
pub use tick::{GameEvent, TickInput, tick};
pub use walls::{Wall, WallKind, border_walls, generate_walls, playable_interior};
