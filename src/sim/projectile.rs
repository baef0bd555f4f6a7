//! Projectiles
//!
//! A projectile is a point moving along a cardinal direction. Its visual
//! width is approximated by two extra sample points offset perpendicular to
//! the direction of travel, so a shot grazing a tile corner still registers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ActorId;
use super::geometry::{Direction, Rect};
use super::tank::{Fraction, Tank};
use crate::consts::{PROJECTILE_SIZE, PROJECTILE_SPEED, PROJECTILE_SPREAD};

/// Shot strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Power {
    #[default]
    Normal,
    /// Destroys concrete
    High,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ActorId,
    pub pos: Vec2,
    /// Position before the last `advance`
    pub prev_pos: Vec2,
    pub direction: Direction,
    pub power: Power,
    /// Tank that fired the shot (never hit by it)
    pub sender: ActorId,
    /// Allegiance of the sender (no friendly fire)
    pub fraction: Fraction,
    /// Marked for removal at the end of the pass
    pub remove: bool,
}

impl Projectile {
    pub fn new(
        id: ActorId,
        pos: Vec2,
        direction: Direction,
        power: Power,
        sender: ActorId,
        fraction: Fraction,
    ) -> Self {
        Self {
            id,
            pos,
            prev_pos: pos,
            direction,
            power,
            sender,
            fraction,
            remove: false,
        }
    }

    /// Shot leaving the gun of `tank`
    pub fn fired_by(id: ActorId, tank: &Tank) -> Self {
        Self::new(
            id,
            tank.gun_point(),
            tank.direction(),
            tank.fire_power(),
            tank.id,
            tank.fraction,
        )
    }

    pub fn velocity(&self) -> Vec2 {
        self.direction.vector() * PROJECTILE_SPEED
    }

    pub fn advance(&mut self) {
        self.prev_pos = self.pos;
        self.pos += self.velocity();
    }

    /// Center plus one point on each side of the shot
    pub fn sample_points(&self) -> [Vec2; 3] {
        let side = self.direction.perpendicular() * PROJECTILE_SPREAD;
        [self.pos, self.pos + side, self.pos - side]
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(PROJECTILE_SIZE))
    }

    /// Area covered during the last `advance`
    pub fn swept_rect(&self) -> Rect {
        let half = PROJECTILE_SIZE / 2.0;
        let min = self.pos.min(self.prev_pos) - Vec2::splat(half);
        let max = self.pos.max(self.prev_pos) + Vec2::splat(half);
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut p = Projectile::new(1, Vec2::new(100.0, 100.0), Direction::Left, Power::Normal, 7, Fraction::Enemy);
        p.advance();
        assert_eq!(p.pos, Vec2::new(100.0 - PROJECTILE_SPEED, 100.0));
        assert_eq!(p.prev_pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_sample_points_are_perpendicular() {
        let p = Projectile::new(1, Vec2::new(50.0, 50.0), Direction::Up, Power::Normal, 7, Fraction::Friend);
        let [center, a, b] = p.sample_points();
        assert_eq!(center, p.pos);
        assert_eq!(a.y, 50.0);
        assert_eq!(b.y, 50.0);
        assert_eq!((a.x - b.x).abs(), PROJECTILE_SPREAD * 2.0);
    }

    #[test]
    fn test_swept_rect_covers_path() {
        let mut p = Projectile::new(1, Vec2::new(0.0, 0.0), Direction::Down, Power::Normal, 7, Fraction::Friend);
        p.advance();
        let r = p.swept_rect();
        assert!(r.contains_point(Vec2::new(0.0, 0.0)));
        assert!(r.contains_point(Vec2::new(0.0, PROJECTILE_SPEED)));
    }
}
