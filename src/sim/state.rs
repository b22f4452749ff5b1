//! Level state
//!
//! One self-contained arena: the wall set (immutable once generated), the
//! entities placed against it, and the seeded RNG that drives them.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Door, Enemy, EnemyKind, Pickup, PickupKind, Player};
use super::spawn::{door_position, find_safe_position};
use super::walls::{Wall, generate_walls};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Active gameplay
    Playing,
    /// Player walked through the open door
    Cleared,
    /// Player ran out of hearts
    Defeated,
}

/// Derive a level's RNG seed from the run seed
pub fn level_seed(run_seed: u64, level: u32) -> u64 {
    run_seed.wrapping_add((level as u64).wrapping_mul(2654435761))
}

/// Complete runtime state of one level
#[derive(Debug, Clone)]
pub struct Level {
    /// Level number (1-based in play, 0 allowed)
    pub number: u32,
    /// Run seed this level was derived from
    pub seed: u64,
    pub phase: LevelPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Border walls first, then interior walls
    pub walls: Vec<Wall>,
    pub player: Player,
    /// Sorted by id for deterministic iteration
    pub enemies: Vec<Enemy>,
    pub door: Door,
    pub pickups: Vec<Pickup>,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl Level {
    /// Generate a level with a fresh player
    pub fn new(number: u32, seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(PLAYER_START, &tuning);
        Self::with_player(number, seed, tuning, player)
    }

    /// Generate a level around an existing player (moved to the start point)
    pub fn with_player(number: u32, seed: u64, tuning: Tuning, mut player: Player) -> Self {
        let mut rng = Pcg32::seed_from_u64(level_seed(seed, number));
        let walls = generate_walls(number, &mut rng);
        player.reset_for_level(PLAYER_START);

        let mut level = Self {
            number,
            seed,
            phase: LevelPhase::Playing,
            time_ticks: 0,
            walls,
            player,
            enemies: Vec::new(),
            door: Door::new(door_position(number)),
            pickups: Vec::new(),
            tuning,
            rng,
            next_id: 1,
        };
        level.place_pickups();
        level.spawn_enemies();

        log::info!(
            "Level {} ready: {} walls, {} enemies, {} pickups",
            number,
            level.walls.len(),
            level.enemies.len(),
            level.pickups.len()
        );
        level
    }

    /// Build the next level, carrying the player over with a level-up and
    /// restored hearts.
    pub fn advance(&self) -> Self {
        let mut player = self.player.clone();
        player.level_up(&self.tuning);
        player.heal(self.tuning.hearts_restore_on_level, self.tuning.max_hearts);
        Self::with_player(self.number + 1, self.seed, self.tuning.clone(), player)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Key first, then rupees; each keeps its distance from the player start,
    /// the door and every pickup placed before it.
    fn place_pickups(&mut self) {
        let mut avoid: Vec<Vec2> = vec![PLAYER_START, self.door.pos];
        let kinds = std::iter::once(PickupKind::Key)
            .chain(std::iter::repeat_n(PickupKind::Rupee, self.tuning.rupees_per_level as usize));

        for kind in kinds {
            let spot = find_safe_position(
                &mut self.rng,
                &self.walls,
                &avoid,
                SPAWN_CLEARANCE,
                PICKUP_SIZE,
            );
            avoid.push(spot.pos);
            let id = self.next_entity_id();
            self.pickups.push(Pickup::new(id, kind, spot.pos));
        }
    }

    fn spawn_enemies(&mut self) {
        let count = self.tuning.enemy_count(self.number);
        for _ in 0..count {
            let kind = EnemyKind::roll(self.number, &mut self.rng);
            let spot = find_safe_position(
                &mut self.rng,
                &self.walls,
                &[PLAYER_START],
                SPAWN_CLEARANCE,
                ENEMY_SIZE,
            );
            let id = self.next_entity_id();
            let enemy = Enemy::new(id, kind, spot.pos, &self.tuning, &mut self.rng);
            self.enemies.push(enemy);
        }
    }

    /// Living enemies
    pub fn enemies_alive(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn is_finished(&self) -> bool {
        self.phase != LevelPhase::Playing
    }
}
