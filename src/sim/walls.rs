//! Wall layout generation
//!
//! Each level gets the four border walls followed by a bounded, randomized
//! set of interior obstacles. Interior walls are placed on the occupancy grid
//! first and only then converted to jittered pixel rectangles, so two interior
//! walls can never overlap.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::OccupancyGrid;
use super::rect::Rect;
use crate::consts::*;

/// Wall category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallKind {
    Border,
    Interior,
}

/// An immutable obstacle for the lifetime of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
    pub kind: WallKind,
    /// Cosmetic only, never read by the simulation
    #[serde(default)]
    pub texture_offset: f32,
}

impl Wall {
    pub fn border(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            kind: WallKind::Border,
            texture_offset: 0.0,
        }
    }

    pub fn interior(rect: Rect, texture_offset: f32) -> Self {
        Self {
            rect,
            kind: WallKind::Interior,
            texture_offset,
        }
    }
}

/// Playable area inside the border
pub fn playable_interior() -> Rect {
    Rect::new(
        BORDER_THICKNESS,
        BORDER_THICKNESS,
        ARENA_WIDTH - 2.0 * BORDER_THICKNESS,
        ARENA_HEIGHT - 2.0 * BORDER_THICKNESS,
    )
}

/// The four arena walls: top, bottom, left, right
pub fn border_walls() -> [Wall; 4] {
    let t = BORDER_THICKNESS;
    [
        Wall::border(0.0, 0.0, ARENA_WIDTH, t),
        Wall::border(0.0, ARENA_HEIGHT - t, ARENA_WIDTH, t),
        Wall::border(0.0, 0.0, t, ARENA_HEIGHT),
        Wall::border(ARENA_WIDTH - t, 0.0, t, ARENA_HEIGHT),
    ]
}

/// Interior wall candidates for a level
#[inline]
pub fn interior_wall_candidates(level: u32) -> u32 {
    level.min(MAX_COMPLEXITY) + BASE_INTERIOR_WALLS
}

/// Generate the full wall set for a level. Border walls always come first.
pub fn generate_walls<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Vec<Wall> {
    let mut walls: Vec<Wall> = border_walls().into();
    let interior = generate_interior_walls(level, rng);
    log::info!(
        "Level {}: {} interior walls placed ({} candidates)",
        level,
        interior.len(),
        interior_wall_candidates(level)
    );
    walls.extend(interior);
    walls
}

fn generate_interior_walls<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Vec<Wall> {
    let interior = playable_interior();
    let mut grid = OccupancyGrid::with_reserved_zones(
        interior.width as i32,
        interior.height as i32,
        GRID_CELL_SIZE,
    );

    // Origins are drawn from [1, cols - 3] so a 3-cell wall still fits
    let (cols, rows) = (grid.cols(), grid.rows());
    if cols < 4 || rows < 4 {
        log::warn!("Grid {}x{} too small for interior walls", cols, rows);
        return Vec::new();
    }

    let candidates = interior_wall_candidates(level);
    let mut walls = Vec::with_capacity(candidates as usize);

    for candidate in 0..candidates {
        let horizontal = rng.random_bool(0.5);

        let mut placed = None;
        for _ in 0..WALL_PLACEMENT_ATTEMPTS {
            let gx = rng.random_range(0..cols - 3) + 1;
            let gy = rng.random_range(0..rows - 3) + 1;
            let length: i32 = rng.random_range(2..=3);
            let (gw, gh) = if horizontal { (length, 1) } else { (1, length) };

            // First fit wins
            if !grid.is_occupied(gx, gy, gw, gh) {
                grid.mark_occupied(gx, gy, gw, gh);
                placed = Some(block_to_wall(&grid, gx, gy, gw, gh, rng));
                break;
            }
        }

        match placed {
            Some(wall) => walls.push(wall),
            None => log::debug!(
                "Interior wall candidate {} dropped after {} attempts",
                candidate,
                WALL_PLACEMENT_ATTEMPTS
            ),
        }
    }

    walls
}

/// Shrink a reserved block by the inset and jitter its top-left corner.
/// Inset exceeds jitter, so the wall never leaves its block.
fn block_to_wall<R: Rng + ?Sized>(
    grid: &OccupancyGrid,
    gx: i32,
    gy: i32,
    gw: i32,
    gh: i32,
    rng: &mut R,
) -> Wall {
    let block = grid.block_rect(gx, gy, gw, gh);
    let x = block.x + rng.random_range(0.0..WALL_JITTER);
    let y = block.y + rng.random_range(0.0..WALL_JITTER);
    let rect = Rect::new(x, y, block.width - WALL_INSET, block.height - WALL_INSET);
    Wall::interior(rect, rng.random_range(0.0..WALL_TEXTURE_OFFSET_MAX))
}
