//! Coarse occupancy grid used while building a wall layout
//!
//! Cells are reserved for walls, the spawn corner, the center failsafe zone
//! and the door corners so none of them can overlap. The grid only lives for
//! the duration of one `generate_walls` call.

use std::collections::HashSet;

use super::rect::Rect;
use crate::consts::BORDER_THICKNESS;

/// A logical grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub gx: i32,
    pub gy: i32,
}

/// Set of reserved cells over the playable interior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    cell_size: i32,
    cols: i32,
    rows: i32,
    occupied: HashSet<GridCell>,
}

impl OccupancyGrid {
    /// Grid over a `width` x `height` playable interior (integer division)
    pub fn new(width: i32, height: i32, cell_size: i32) -> Self {
        let cell_size = cell_size.max(1);
        Self {
            cell_size,
            cols: (width / cell_size).max(0),
            rows: (height / cell_size).max(0),
            occupied: HashSet::new(),
        }
    }

    /// Grid with the default reserved zones already marked:
    /// spawn block at the origin, center failsafe block, and the three
    /// non-origin corners (door slots).
    pub fn with_reserved_zones(width: i32, height: i32, cell_size: i32) -> Self {
        let mut grid = Self::new(width, height, cell_size);
        let (cols, rows) = (grid.cols, grid.rows);

        grid.mark_occupied(0, 0, 2, 2);
        grid.mark_occupied(cols / 2 - 1, rows / 2 - 1, 2, 2);
        grid.mark_occupied(cols - 2, rows - 2, 2, 2);
        grid.mark_occupied(cols - 2, 0, 2, 2);
        grid.mark_occupied(0, rows - 2, 2, 2);
        grid
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of reserved cells
    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    /// True if any cell of the `w` x `h` block at (gx, gy) is reserved
    pub fn is_occupied(&self, gx: i32, gy: i32, w: i32, h: i32) -> bool {
        block_cells(gx, gy, w, h).any(|cell| self.occupied.contains(&cell))
    }

    /// Reserve every cell of the `w` x `h` block at (gx, gy). Idempotent.
    pub fn mark_occupied(&mut self, gx: i32, gy: i32, w: i32, h: i32) {
        self.occupied.extend(block_cells(gx, gy, w, h));
    }

    /// Pixel rectangle covered by a block, offset by the border
    pub fn block_rect(&self, gx: i32, gy: i32, w: i32, h: i32) -> Rect {
        let size = self.cell_size as f32;
        Rect::new(
            BORDER_THICKNESS + gx as f32 * size,
            BORDER_THICKNESS + gy as f32 * size,
            w as f32 * size,
            h as f32 * size,
        )
    }
}

fn block_cells(gx: i32, gy: i32, w: i32, h: i32) -> impl Iterator<Item = GridCell> {
    (0..w).flat_map(move |i| (0..h).map(move |j| GridCell { gx: gx + i, gy: gy + j }))
}
