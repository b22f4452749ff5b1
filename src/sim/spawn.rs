//! Safe spawn placement
//!
//! Finds a spot for an entity that keeps clear of every wall and of a set of
//! points to avoid. Random search runs on a fixed attempt budget; when it
//! runs dry the search falls back to a fixed ladder of failsafe points, and
//! finally to an emergency point so a caller always gets a position.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::{Rect, point_in_rect};
use super::walls::Wall;
use crate::consts::*;

/// How a spawn position was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnSource {
    /// Random search succeeded; `attempts` includes the accepted sample
    Search { attempts: u32 },
    /// Search exhausted; failsafe point `index` (0 = center) was wall-free
    Failsafe { index: usize },
    /// Every failsafe collided; clearance is not guaranteed
    Emergency,
}

/// A placement returned by [`find_safe_position`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub pos: Vec2,
    pub source: SpawnSource,
}

impl SpawnPoint {
    /// True unless the search had to fall back
    pub fn is_clear(&self) -> bool {
        matches!(self.source, SpawnSource::Search { .. })
    }
}

/// Failsafe ladder for an entity of `entity_size`: arena center first,
/// then the four quadrant points.
pub fn failsafe_points(entity_size: f32) -> [Vec2; 5] {
    let center = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0) - Vec2::splat(entity_size / 2.0);
    let [a, b, c, d] = QUADRANT_FAILSAFES;
    [center, a, b, c, d]
}

/// Find a placement for a square entity of `entity_size` that is at least
/// `min_distance` from every wall and `AVOID_RADIUS` from every avoid point.
pub fn find_safe_position<R: Rng + ?Sized>(
    rng: &mut R,
    walls: &[Wall],
    avoid: &[Vec2],
    min_distance: f32,
    entity_size: f32,
) -> SpawnPoint {
    for attempt in 1..=SAFE_SEARCH_ATTEMPTS {
        let candidate = Vec2::new(
            rng.random_range(SPAWN_REGION_MIN.x..SPAWN_REGION_MAX.x),
            rng.random_range(SPAWN_REGION_MIN.y..SPAWN_REGION_MAX.y),
        );

        if avoid.iter().any(|p| candidate.distance(*p) < AVOID_RADIUS) {
            continue;
        }
        if has_clearance(candidate, walls, min_distance, entity_size) {
            log::debug!(
                "Safe position ({:.0}, {:.0}) found after {} attempts",
                candidate.x,
                candidate.y,
                attempt
            );
            return SpawnPoint {
                pos: candidate,
                source: SpawnSource::Search { attempts: attempt },
            };
        }
    }

    log::warn!(
        "No safe position after {} attempts (entity size {}, clearance {}, {} avoid points)",
        SAFE_SEARCH_ATTEMPTS,
        entity_size,
        min_distance,
        avoid.len()
    );
    failsafe_position(walls, entity_size)
}

/// Full clearance test for a candidate top-left position
pub fn has_clearance(pos: Vec2, walls: &[Wall], min_distance: f32, entity_size: f32) -> bool {
    let entity_box = Rect::from_pos_size(pos, Vec2::splat(entity_size));
    let buffered_box = entity_box.expand(min_distance);
    let corners = entity_box.corners();

    walls.iter().all(|wall| {
        !entity_box.intersects(&wall.rect)
            && !buffered_box.intersects(&wall.rect)
            // Closed containment also catches corners resting on a wall edge
            && !corners.iter().any(|c| point_in_rect(*c, &wall.rect))
    })
}

/// Walk the failsafe ladder using the plain (unbuffered) wall test
pub fn failsafe_position(walls: &[Wall], entity_size: f32) -> SpawnPoint {
    let size = Vec2::splat(entity_size);
    let free = failsafe_points(entity_size).into_iter().enumerate().find(|(_, p)| {
        let bounds = Rect::from_pos_size(*p, size);
        !walls.iter().any(|w| bounds.intersects(&w.rect))
    });

    match free {
        Some((index, pos)) => {
            log::warn!("Using failsafe position {} at ({:.0}, {:.0})", index, pos.x, pos.y);
            SpawnPoint {
                pos,
                source: SpawnSource::Failsafe { index },
            }
        }
        None => {
            log::error!(
                "All failsafe positions blocked for entity size {}; using emergency position",
                entity_size
            );
            SpawnPoint {
                pos: EMERGENCY_SPAWN,
                source: SpawnSource::Emergency,
            }
        }
    }
}

/// Exit door slot for a level. Slots sit in grid corners the generator keeps clear.
pub fn door_position(level: u32) -> Vec2 {
    DOOR_POSITIONS[(level % DOOR_POSITIONS.len() as u32) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::walls::{border_walls, generate_walls};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn borders() -> Vec<Wall> {
        border_walls().into()
    }

    #[test]
    fn test_open_arena_search_succeeds() {
        let mut rng = Pcg32::seed_from_u64(1);
        let spot = find_safe_position(&mut rng, &borders(), &[], 50.0, 20.0);
        assert!(spot.is_clear());
        assert!(has_clearance(spot.pos, &borders(), 50.0, 20.0));
    }

    #[test]
    fn test_level_three_end_to_end() {
        let mut rng = Pcg32::seed_from_u64(99);
        let walls = generate_walls(3, &mut rng);
        let player_start = PLAYER_START;
        let spot = find_safe_position(&mut rng, &walls, &[player_start], 50.0, 20.0);

        let bounds = Rect::from_pos_size(spot.pos, Vec2::splat(20.0));
        assert!(walls.iter().all(|w| !bounds.intersects(&w.rect)));
        if spot.is_clear() {
            assert!(spot.pos.distance(player_start) >= AVOID_RADIUS);
        }
    }

    #[test]
    fn test_exhausted_search_uses_center_failsafe() {
        // Clearance this large always reaches a border wall
        let mut rng = Pcg32::seed_from_u64(3);
        let spot = find_safe_position(&mut rng, &borders(), &[], 1000.0, 20.0);
        assert_eq!(spot.source, SpawnSource::Failsafe { index: 0 });
        assert_eq!(spot.pos, Vec2::new(390.0, 290.0));
    }

    #[test]
    fn test_blocked_center_falls_through_ladder() {
        let mut walls = borders();
        walls.push(Wall::interior(Rect::new(350.0, 250.0, 100.0, 100.0), 0.0));
        walls.push(Wall::interior(Rect::new(140.0, 140.0, 20.0, 20.0), 0.0));

        let spot = failsafe_position(&walls, 20.0);
        assert_eq!(spot.source, SpawnSource::Failsafe { index: 2 });
        assert_eq!(spot.pos, Vec2::new(650.0, 150.0));
    }

    #[test]
    fn test_all_failsafes_blocked_returns_emergency() {
        let mut walls = borders();
        // Covers the entire sampling region and every failsafe point
        walls.push(Wall::interior(Rect::new(100.0, 100.0, 620.0, 420.0), 0.0));

        let mut rng = Pcg32::seed_from_u64(5);
        let spot = find_safe_position(&mut rng, &walls, &[], 10.0, 20.0);
        assert_eq!(spot.source, SpawnSource::Emergency);
        assert_eq!(spot.pos, EMERGENCY_SPAWN);
    }

    #[test]
    fn test_avoid_points_everywhere_forces_fallback() {
        let avoid: Vec<Vec2> = (0..8)
            .flat_map(|i| {
                (0..6).map(move |j| Vec2::new(100.0 + i as f32 * 90.0, 100.0 + j as f32 * 90.0))
            })
            .collect();
        let mut rng = Pcg32::seed_from_u64(11);
        let spot = find_safe_position(&mut rng, &borders(), &avoid, 10.0, 20.0);
        assert!(!spot.is_clear());
        assert!(failsafe_points(20.0).contains(&spot.pos));
    }

    #[test]
    fn test_corner_resting_on_wall_edge_is_rejected() {
        // Entity box touches the wall exactly: no AABB overlap, but a corner lies on the edge
        let walls = vec![Wall::interior(Rect::new(220.0, 200.0, 50.0, 50.0), 0.0)];
        assert!(!has_clearance(Vec2::new(200.0, 200.0), &walls, 0.0, 20.0));
        assert!(has_clearance(Vec2::new(199.0, 200.0), &walls, 0.0, 20.0));
    }

    #[test]
    fn test_door_positions_cycle() {
        assert_eq!(door_position(0), Vec2::new(720.0, 520.0));
        assert_eq!(door_position(1), Vec2::new(720.0, 50.0));
        assert_eq!(door_position(2), Vec2::new(50.0, 520.0));
        assert_eq!(door_position(3), door_position(0));
    }

    proptest! {
        #[test]
        fn successful_search_respects_clearance(
            seed in any::<u64>(),
            level in 0u32..12,
            clearance in 0.0f32..60.0,
            size in 10.0f32..40.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let walls = generate_walls(level, &mut rng);
            let avoid = [PLAYER_START, door_position(level)];
            let spot = find_safe_position(&mut rng, &walls, &avoid, clearance, size);

            let bounds = Rect::from_pos_size(spot.pos, Vec2::splat(size));
            match spot.source {
                SpawnSource::Search { attempts } => {
                    prop_assert!(attempts <= SAFE_SEARCH_ATTEMPTS);
                    prop_assert!(walls.iter().all(|w| !bounds.intersects(&w.rect)));
                    prop_assert!(avoid.iter().all(|p| spot.pos.distance(*p) >= AVOID_RADIUS));
                }
                SpawnSource::Failsafe { index } => {
                    prop_assert_eq!(spot.pos, failsafe_points(size)[index]);
                    prop_assert!(walls.iter().all(|w| !bounds.intersects(&w.rect)));
                }
                SpawnSource::Emergency => {
                    prop_assert_eq!(spot.pos, EMERGENCY_SPAWN);
                }
            }
        }
    }
}
