//! Tanks
//!
//! One struct covers the player and enemy tanks; `fraction` decides which
//! rules apply. Lifecycle flags:
//! - `is_spawning`: just created, cannot move, fire or be hit
//! - `hit`: struck by an enemy shot, resolved by the tank's AI next update
//! - `to_destroy`: removed from play at the end of the pass
//! - `shielded`: immune to shots until the shield timer runs out

use std::time::{Duration, Instant};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ActorId;
use super::geometry::{Direction, Rect};
use super::projectile::Power;
use super::timer::{Animator, Timer};
use crate::consts::*;
use crate::render::TankSprite;
use crate::settings::secs;
use crate::snap_to_step;

/// Allegiance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fraction {
    Friend,
    Enemy,
}

/// Paint job (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankColor {
    Yellow,
    Green,
    Purple,
    Plain,
}

/// Tank model: friendly upgrade levels and enemy classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankType {
    Level1,
    Level2,
    Level3,
    Level4,
    EnemySimple,
    EnemyFast,
    EnemyMiddle,
    EnemyHeavy,
}

impl TankType {
    pub const ALL: [TankType; 8] = [
        TankType::Level1,
        TankType::Level2,
        TankType::Level3,
        TankType::Level4,
        TankType::EnemySimple,
        TankType::EnemyFast,
        TankType::EnemyMiddle,
        TankType::EnemyHeavy,
    ];

    pub fn is_enemy(self) -> bool {
        matches!(
            self,
            TankType::EnemySimple | TankType::EnemyFast | TankType::EnemyMiddle | TankType::EnemyHeavy
        )
    }

    /// Next friendly upgrade level (saturates at level 4)
    pub fn next_level(self) -> TankType {
        match self {
            TankType::Level1 => TankType::Level2,
            TankType::Level2 => TankType::Level3,
            TankType::Level3 | TankType::Level4 => TankType::Level4,
            other => other,
        }
    }

    pub fn max_level(self) -> TankType {
        if self.is_enemy() { self } else { TankType::Level4 }
    }

    /// Following type in `ALL`, wrapping around
    pub fn next_in_cycle(self) -> TankType {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Movement speed in world units per frame
    pub fn speed(self) -> f32 {
        match self {
            TankType::EnemyFast => TANK_SPEED_FAST,
            _ => TANK_SPEED_NORMAL,
        }
    }

    /// Extra hits absorbed before destruction
    pub fn armor(self) -> u8 {
        match self {
            TankType::EnemyHeavy => 1,
            _ => 0,
        }
    }

    /// Points for destroying an enemy of this type
    pub fn score(self) -> u32 {
        match self {
            TankType::EnemySimple => 100,
            TankType::EnemyFast => 200,
            TankType::EnemyMiddle => 300,
            TankType::EnemyHeavy => 400,
            _ => 0,
        }
    }

    pub fn power(self) -> Power {
        if self == TankType::Level4 {
            Power::High
        } else {
            Power::Normal
        }
    }

    /// Paint for a freshly built tank of this type
    pub fn base_color(self, fraction: Fraction) -> TankColor {
        match (fraction, self) {
            (Fraction::Friend, _) => TankColor::Yellow,
            (Fraction::Enemy, TankType::EnemyHeavy) => TankColor::Green,
            (Fraction::Enemy, _) => TankColor::Plain,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tank {
    pub id: ActorId,
    pub fraction: Fraction,
    pub color: TankColor,
    tank_type: TankType,
    speed: f32,
    direction: Direction,
    pub position: Vec2,
    /// Position before the last move, for rollback
    pub old_position: Vec2,
    /// Half-tile aligned position ahead in the direction of travel
    finish_position: Vec2,
    /// Origin of the half-tile lattice used for alignment
    align_origin: Vec2,
    pub size: f32,
    pub moving: bool,
    pub is_spawning: bool,
    pub hit: bool,
    pub to_destroy: bool,
    /// Drops a bonus when destroyed
    pub is_bonus: bool,
    pub armor: u8,
    shielded: bool,
    shield_timer: Timer,
    fire_timer: Timer,
    move_animator: Animator,
    bonus_animator: Animator,
    shield_animator: Animator,
    spawn_animator: Animator,
}

impl Tank {
    pub fn new(
        id: ActorId,
        fraction: Fraction,
        tank_type: TankType,
        position: Vec2,
        align_origin: Vec2,
        fire_cooldown: Duration,
        now: Instant,
    ) -> Self {
        Self {
            id,
            fraction,
            color: tank_type.base_color(fraction),
            tank_type,
            speed: tank_type.speed(),
            direction: Direction::Up,
            position,
            old_position: position,
            finish_position: position,
            align_origin,
            size: TANK_SIZE,
            moving: false,
            is_spawning: false,
            hit: false,
            to_destroy: false,
            is_bonus: false,
            armor: tank_type.armor(),
            shielded: false,
            shield_timer: Timer::new(Duration::ZERO, now),
            fire_timer: Timer::new(fire_cooldown, now),
            move_animator: Animator::looping(secs(MOVE_ANIM_DELAY), 2, now),
            bonus_animator: Animator::looping(secs(BONUS_BLINK_DELAY), 2, now),
            shield_animator: Animator::looping(secs(SHIELD_ANIM_DELAY), 2, now),
            spawn_animator: Animator::looping(secs(SPAWN_ANIM_DELAY), SPAWN_ANIM_FRAMES, now),
        }
    }

    pub fn tank_type(&self) -> TankType {
        self.tank_type
    }

    /// Change model; speed and armor follow the type
    pub fn set_tank_type(&mut self, tank_type: TankType) {
        self.tank_type = tank_type;
        self.speed = tank_type.speed();
        self.armor = tank_type.armor();
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Turn, and pre-compute where the tank comes to rest along the new axis
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.finish_position = self.aligned(direction);
    }

    pub fn finish_position(&self) -> Vec2 {
        self.finish_position
    }

    /// Current position snapped to the half-tile lattice along the axis of
    /// `direction`, rounding toward `direction`
    pub fn aligned(&self, direction: Direction) -> Vec2 {
        let v = direction.vector();
        let mut p = self.position;
        if v.x != 0.0 {
            p.x = snap_to_step(p.x, self.align_origin.x, OCCUPANCY_STEP, v.x > 0.0);
        }
        if v.y != 0.0 {
            p.y = snap_to_step(p.y, self.align_origin.y, OCCUPANCY_STEP, v.y > 0.0);
        }
        p
    }

    pub fn rect_at(&self, position: Vec2) -> Rect {
        Rect::centered(position, Vec2::splat(self.size))
    }

    pub fn bounding_rect(&self) -> Rect {
        self.rect_at(self.position)
    }

    /// Where shots leave the tank
    pub fn gun_point(&self) -> Vec2 {
        self.position
    }

    pub fn check_hit(&self, point: Vec2) -> bool {
        self.bounding_rect().contains_point(point)
    }

    /// Teleport without a rollback history
    pub fn place(&mut self, position: Vec2) {
        self.position = position;
        self.old_position = position;
        self.finish_position = position;
    }

    pub fn remember_position(&mut self) {
        self.old_position = self.position;
    }

    /// Step one frame in `direction` (collision is the caller's job)
    pub fn move_tank(&mut self, direction: Direction) {
        self.remember_position();
        self.moving = true;
        self.direction = direction;
        self.position += direction.vector() * self.speed;
        self.finish_position = self.aligned(direction);
    }

    pub fn undo_move(&mut self) {
        self.position = self.old_position;
        self.finish_position = self.aligned(self.direction);
    }

    pub fn stop(&mut self) {
        self.moving = false;
    }

    /// Fire if the cooldown allows; restarts the cooldown on success
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if self.is_spawning {
            return false;
        }
        if self.fire_timer.tick(now) {
            self.fire_timer.start(now);
            return true;
        }
        false
    }

    pub fn fire_power(&self) -> Power {
        self.tank_type.power()
    }

    pub fn shielded(&self) -> bool {
        self.shielded
    }

    pub fn activate_shield(&mut self, duration: Duration, now: Instant) {
        self.shielded = true;
        self.shield_timer = Timer::armed(duration, now);
        self.shield_animator.reset(now);
    }

    pub fn clear_shield(&mut self) {
        self.shielded = false;
        self.shield_timer.stop();
    }

    /// Friendly upgrade by one level, or straight to the top level
    pub fn upgrade(&mut self, maximum: bool) {
        if self.fraction != Fraction::Friend {
            return;
        }
        let next = if maximum {
            self.tank_type.max_level()
        } else {
            self.tank_type.next_level()
        };
        if next != self.tank_type {
            log::debug!("Tank {} upgraded {:?} -> {:?}", self.id, self.tank_type, next);
            self.set_tank_type(next);
        }
    }

    /// Back to square one at `position`: base level, facing up, shielded
    pub fn respawn(&mut self, position: Vec2, shield: Duration, now: Instant) {
        self.set_tank_type(TankType::Level1);
        self.color = self.tank_type.base_color(self.fraction);
        self.place(position);
        self.direction = Direction::Up;
        self.moving = false;
        self.hit = false;
        self.to_destroy = false;
        self.activate_shield(shield, now);
    }

    /// Poll shield expiry and animation frames
    pub fn update(&mut self, now: Instant) {
        if self.shielded {
            if self.shield_timer.tick(now) {
                self.shielded = false;
            } else {
                self.shield_animator.poll(now);
            }
        }
        if self.moving {
            self.move_animator.poll(now);
        }
        if self.is_bonus {
            self.bonus_animator.poll(now);
        }
        if self.is_spawning {
            self.spawn_animator.poll(now);
        }
    }

    /// Color to draw: bonus carriers blink purple
    pub fn display_color(&self) -> TankColor {
        if self.is_bonus && self.bonus_animator.state() == 0 {
            TankColor::Purple
        } else {
            self.color
        }
    }

    pub fn sprite(&self) -> TankSprite {
        TankSprite {
            rect: self.bounding_rect(),
            fraction: self.fraction,
            tank_type: self.tank_type,
            color: self.display_color(),
            direction: self.direction,
            move_frame: self.move_animator.state(),
            shield_frame: self.shielded.then(|| self.shield_animator.state()),
            spawn_frame: self.is_spawning.then(|| self.spawn_animator.state()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank(now: Instant) -> Tank {
        Tank::new(
            1,
            Fraction::Friend,
            TankType::Level1,
            Vec2::new(32.0, 32.0),
            Vec2::ZERO,
            Duration::from_millis(500),
            now,
        )
    }

    #[test]
    fn test_move_and_undo() {
        let now = Instant::now();
        let mut t = tank(now);
        t.move_tank(Direction::Right);
        assert_eq!(t.position, Vec2::new(34.0, 32.0));
        assert!(t.moving);
        t.undo_move();
        assert_eq!(t.position, Vec2::new(32.0, 32.0));
    }

    #[test]
    fn test_finish_position_snaps_forward() {
        let now = Instant::now();
        let mut t = tank(now);
        t.place(Vec2::new(35.0, 33.0));
        t.set_direction(Direction::Right);
        assert_eq!(t.finish_position(), Vec2::new(40.0, 33.0));
        t.set_direction(Direction::Up);
        assert_eq!(t.finish_position(), Vec2::new(35.0, 32.0));
        assert_eq!(t.aligned(Direction::Left), Vec2::new(32.0, 33.0));
    }

    #[test]
    fn test_fire_cooldown() {
        let t0 = Instant::now();
        let mut t = tank(t0);
        assert!(t.try_fire(t0));
        assert!(!t.try_fire(t0 + Duration::from_millis(100)));
        assert!(t.try_fire(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn test_spawning_tank_cannot_fire() {
        let t0 = Instant::now();
        let mut t = tank(t0);
        t.is_spawning = true;
        assert!(!t.try_fire(t0));
    }

    #[test]
    fn test_shield_expires() {
        let t0 = Instant::now();
        let mut t = tank(t0);
        t.activate_shield(Duration::from_secs(3), t0);
        t.update(t0 + Duration::from_secs(1));
        assert!(t.shielded());
        assert!(t.sprite().shield_frame.is_some());
        t.update(t0 + Duration::from_secs(3));
        assert!(!t.shielded());
        assert!(t.sprite().shield_frame.is_none());
    }

    #[test]
    fn test_upgrade_levels() {
        let now = Instant::now();
        let mut t = tank(now);
        t.upgrade(false);
        assert_eq!(t.tank_type(), TankType::Level2);
        t.upgrade(true);
        assert_eq!(t.tank_type(), TankType::Level4);
        assert_eq!(t.fire_power(), Power::High);
        t.upgrade(false);
        assert_eq!(t.tank_type(), TankType::Level4);
    }

    #[test]
    fn test_enemy_never_upgrades() {
        let now = Instant::now();
        let mut t = tank(now);
        t.fraction = Fraction::Enemy;
        t.set_tank_type(TankType::EnemySimple);
        t.upgrade(true);
        assert_eq!(t.tank_type(), TankType::EnemySimple);
    }

    #[test]
    fn test_type_properties() {
        assert_eq!(TankType::EnemyFast.speed(), TANK_SPEED_FAST);
        assert_eq!(TankType::EnemyHeavy.armor(), 1);
        assert_eq!(TankType::EnemyMiddle.score(), 300);
        assert_eq!(TankType::EnemyHeavy.next_in_cycle(), TankType::Level1);
        assert_eq!(TankType::Level3.next_level(), TankType::Level4);
    }

    #[test]
    fn test_respawn_resets() {
        let t0 = Instant::now();
        let mut t = tank(t0);
        t.set_tank_type(TankType::Level3);
        t.set_direction(Direction::Left);
        t.respawn(Vec2::new(100.0, 100.0), Duration::from_secs(3), t0);
        assert_eq!(t.position, Vec2::new(100.0, 100.0));
        assert_eq!(t.tank_type(), TankType::Level1);
        assert_eq!(t.direction(), Direction::Up);
        assert!(t.shielded());
    }

    #[test]
    fn test_bonus_carrier_blinks() {
        let t0 = Instant::now();
        let mut t = tank(t0);
        t.is_bonus = true;
        assert_eq!(t.display_color(), TankColor::Purple);
        t.update(t0 + secs(BONUS_BLINK_DELAY));
        assert_eq!(t.display_color(), TankColor::Yellow);
    }
}
