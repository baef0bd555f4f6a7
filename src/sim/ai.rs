//! Enemy AI: per-tank decision timers and the fleet spawner
//!
//! Every enemy tank is built together with its `TankAi`; the pair lives in
//! an `Enemy`. The AI only decides. Movement, collision and firing are
//! applied by the frame update from the returned `AiIntent`.

use std::time::Instant;

use glam::Vec2;
use rand::Rng;

use super::ActorId;
use super::field::Field;
use super::geometry::Direction;
use super::tank::{Fraction, Tank, TankColor, TankType};
use super::timer::Timer;
use crate::settings::{Settings, secs};

/// What an enemy wants to do this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiIntent {
    pub fire: bool,
    /// Step forward in the current direction
    pub advance: bool,
}

/// Decision timers for one enemy tank
#[derive(Debug, Clone)]
pub struct TankAi {
    fire_timer: Timer,
    direction_timer: Timer,
    spawn_timer: Timer,
    direction_delay: (f32, f32),
    want_to_fire: bool,
}

impl TankAi {
    pub fn new(settings: &Settings, rng: &mut impl Rng, now: Instant) -> Self {
        let lo = settings.ai_direction_min.min(settings.ai_direction_max);
        let hi = settings.ai_direction_max.max(settings.ai_direction_min);
        let mut ai = Self {
            fire_timer: Timer::armed(secs(settings.ai_fire_interval), now),
            direction_timer: Timer::armed(secs(lo), now),
            spawn_timer: Timer::armed(secs(settings.enemy_spawn_delay), now),
            direction_delay: (lo, hi),
            want_to_fire: false,
        };
        ai.reroll_direction_delay(rng);
        ai
    }

    fn reroll_direction_delay(&mut self, rng: &mut impl Rng) {
        let (lo, hi) = self.direction_delay;
        let delay = if hi > lo && hi.is_finite() {
            rng.random_range(lo..=hi)
        } else {
            lo
        };
        self.direction_timer.set_delay(secs(delay));
    }

    /// The tank's last move was rolled back; pick a new direction next update
    pub fn on_blocked(&mut self) {
        self.direction_timer.stop();
    }

    /// Run one decision step for `tank`.
    ///
    /// Resolves the spawning and hit states, polls the fire and direction
    /// timers, and returns what the tank should do this frame.
    pub fn update(
        &mut self,
        tank: &mut Tank,
        field: &Field,
        frozen: bool,
        rng: &mut impl Rng,
        now: Instant,
    ) -> AiIntent {
        if tank.is_spawning {
            if self.spawn_timer.tick(now) && spawn_area_clear(tank, field) {
                tank.is_spawning = false;
                self.fire_timer.start(now);
                self.direction_timer.start(now);
                log::debug!("Enemy {} ({:?}) active", tank.id, tank.tank_type());
            }
            return AiIntent::default();
        }

        if tank.hit {
            tank.hit = false;
            if tank.armor > 0 {
                tank.armor -= 1;
                tank.color = TankColor::Plain;
                log::debug!("Enemy {} armor down to {}", tank.id, tank.armor);
            } else {
                tank.to_destroy = true;
                return AiIntent::default();
            }
        }

        if self.fire_timer.tick(now) {
            self.want_to_fire = true;
            self.fire_timer.start(now);
        }

        if self.direction_timer.tick(now) {
            let direction = pick_direction(tank, field, rng);
            tank.set_direction(direction);
            self.reroll_direction_delay(rng);
            self.direction_timer.start(now);
        }

        if frozen {
            tank.stop();
            self.want_to_fire = false;
            return AiIntent::default();
        }

        AiIntent {
            fire: std::mem::take(&mut self.want_to_fire),
            advance: true,
        }
    }
}

/// Spawning tanks become solid only once nothing stands in their footprint
fn spawn_area_clear(tank: &Tank, field: &Field) -> bool {
    let rect = tank.bounding_rect();
    field.occupancy().test_rect(&rect, &[None, Some(tank.id)]) && !field.intersect_rect(&rect)
}

/// Random direction that does not lead straight off the field from the
/// tank's current cell
fn pick_direction(tank: &Tank, field: &Field, rng: &mut impl Rng) -> Direction {
    let (col, row) = field.terrain().cell_of(tank.position);
    let (last_col, last_row) = (field.width() as i32 - 1, field.height() as i32 - 1);
    let candidates: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| match d {
            Direction::Up => row > 1,
            Direction::Down => row < last_row,
            Direction::Left => col > 1,
            Direction::Right => col < last_col,
        })
        .collect();
    if candidates.is_empty() {
        return Direction::random(rng);
    }
    candidates[rng.random_range(0..candidates.len())]
}

/// An enemy tank and the AI driving it
#[derive(Debug, Clone)]
pub struct Enemy {
    pub tank: Tank,
    pub ai: TankAi,
}

#[derive(Debug, Clone)]
pub struct SpawnPoint {
    /// Center of a spawned tank
    pub position: Vec2,
    /// Tank still materializing here
    pub spawning: Option<ActorId>,
}

/// Enemy spawn scheduler, population cap and global freeze
#[derive(Debug, Clone)]
pub struct EnemyFleet {
    spawn_points: Vec<SpawnPoint>,
    spawn_timer: Timer,
    freeze_timer: Timer,
    enemy_types: Vec<TankType>,
    next_type: usize,
    max_enemies: usize,
    bonus_chance: f64,
    align_origin: Vec2,
}

impl EnemyFleet {
    pub fn new(
        spawn_points: impl IntoIterator<Item = Vec2>,
        align_origin: Vec2,
        settings: &Settings,
        now: Instant,
    ) -> Self {
        Self {
            spawn_points: spawn_points
                .into_iter()
                .map(|position| SpawnPoint {
                    position,
                    spawning: None,
                })
                .collect(),
            // Starts done so the first spawn happens on the first update
            spawn_timer: Timer::new(secs(settings.spawn_interval), now),
            freeze_timer: Timer::new(secs(settings.freeze_time), now),
            enemy_types: settings.enemy_types.clone(),
            next_type: 0,
            max_enemies: settings.max_enemies,
            bonus_chance: settings.bonus_carrier_chance,
            align_origin,
        }
    }

    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.spawn_points
    }

    /// Stop every enemy for the freeze duration (restarts a running freeze)
    pub fn freeze(&mut self, now: Instant) {
        log::debug!("Enemies frozen");
        self.freeze_timer.start(now);
    }

    pub fn is_frozen(&mut self, now: Instant) -> bool {
        !self.freeze_timer.tick(now)
    }

    /// Poll the spawn timer and spawn at most one enemy.
    ///
    /// `next_id` is consumed only when a tank is created.
    pub fn update(
        &mut self,
        enemies: &[Enemy],
        settings: &Settings,
        rng: &mut impl Rng,
        next_id: &mut ActorId,
        now: Instant,
    ) -> Option<Enemy> {
        if !self.spawn_timer.tick(now) {
            return None;
        }
        self.spawn_timer.start(now);
        self.try_to_spawn(enemies, settings, rng, next_id, now)
    }

    fn try_to_spawn(
        &mut self,
        enemies: &[Enemy],
        settings: &Settings,
        rng: &mut impl Rng,
        next_id: &mut ActorId,
        now: Instant,
    ) -> Option<Enemy> {
        for point in &mut self.spawn_points {
            if let Some(id) = point.spawning {
                let still_spawning = enemies
                    .iter()
                    .any(|e| e.tank.id == id && e.tank.is_spawning);
                if !still_spawning {
                    point.spawning = None;
                }
            }
        }

        if enemies.len() >= self.max_enemies {
            return None;
        }
        let free: Vec<usize> = (0..self.spawn_points.len())
            .filter(|&i| self.spawn_points[i].spawning.is_none())
            .collect();
        if free.is_empty() {
            return None;
        }
        let point = &mut self.spawn_points[free[rng.random_range(0..free.len())]];

        let tank_type = if self.enemy_types.is_empty() {
            TankType::EnemySimple
        } else {
            self.enemy_types[self.next_type % self.enemy_types.len()]
        };
        self.next_type += 1;

        let id = *next_id;
        *next_id += 1;
        let mut tank = Tank::new(
            id,
            Fraction::Enemy,
            tank_type,
            point.position,
            self.align_origin,
            secs(settings.fire_cooldown),
            now,
        );
        tank.set_direction(Direction::Down);
        tank.is_spawning = true;
        tank.is_bonus = rng.random::<f64>() < self.bonus_chance;
        point.spawning = Some(id);

        log::debug!(
            "Spawning enemy {} ({:?}{}) at {:?}",
            id,
            tank_type,
            if tank.is_bonus { ", bonus" } else { "" },
            point.position
        );

        Some(Enemy {
            tank,
            ai: TankAi::new(settings, rng, now),
        })
    }
}
