//! Axis-aligned geometry for the tile world
//!
//! Everything on the field is an axis-aligned box and moves along one of the
//! four cardinal directions, so this is all the geometry the game needs.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, half-open: `[x, x + w) x [y, y + h)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x / 2.0,
            y: center.y - size.y / 2.0,
            w: size.x,
            h: size.y,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// True if the interiors overlap (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

/// Cardinal direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Unit vector in screen space (y grows downward)
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Unit vector perpendicular to the direction of travel
    pub fn perpendicular(self) -> Vec2 {
        let v = self.vector();
        Vec2::new(-v.y, v.x)
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn random(rng: &mut impl Rng) -> Direction {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersects_excludes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_rect_contains_point_half_open() {
        let r = Rect::new(0.0, 0.0, 8.0, 8.0);
        assert!(r.contains_point(Vec2::ZERO));
        assert!(r.contains_point(Vec2::new(7.9, 7.9)));
        assert!(!r.contains_point(Vec2::new(8.0, 4.0)));
    }

    #[test]
    fn test_centered() {
        let r = Rect::centered(Vec2::new(20.0, 20.0), Vec2::splat(30.0));
        assert_eq!(r, Rect::new(5.0, 5.0, 30.0, 30.0));
        assert_eq!(r.center(), Vec2::new(20.0, 20.0));
    }

    #[test]
    fn test_direction_vectors() {
        for d in Direction::ALL {
            assert_eq!(d.vector() + d.opposite().vector(), Vec2::ZERO);
            assert_eq!(d.vector().dot(d.perpendicular()), 0.0);
        }
        assert!(Direction::Left.is_horizontal());
        assert!(!Direction::Up.is_horizontal());
    }
}
