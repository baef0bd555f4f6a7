//! Movement resolution and projectile targeting
//!
//! Tanks move by tentative step plus full rollback: the step is applied,
//! the new footprint is tested against the occupancy map and terrain, and
//! on any conflict the tank returns to where it was. There is no sliding.

use glam::Vec2;

use super::ActorId;
use super::field::Field;
use super::geometry::Direction;
use super::grid::OccupancyMap;
use super::projectile::Projectile;
use super::tank::Tank;

/// True if `tank` could stand at `position` without overlapping terrain
/// or any other actor's claimed cells
pub fn footprint_clear(tank: &Tank, position: Vec2, field: &Field) -> bool {
    let rect = tank.rect_at(position);
    field.occupancy().test_rect(&rect, &[None, Some(tank.id)]) && !field.intersect_rect(&rect)
}

/// Step `tank` one frame in `direction`.
///
/// On success the new footprint is claimed in the occupancy map so tanks
/// updated later in the frame see it. Returns false if the step was rolled
/// back.
pub fn try_move(tank: &mut Tank, direction: Direction, field: &mut Field) -> bool {
    tank.move_tank(direction);
    if !footprint_clear(tank, tank.position, field) {
        tank.undo_move();
        return false;
    }
    field
        .occupancy_mut()
        .fill_rect(&tank.bounding_rect(), Some(tank.id), true);
    true
}

/// Bring a tank that stopped moving to rest on the half-tile lattice.
///
/// Prefers the finish position ahead, then the boundary behind; stays put
/// if neither is clear.
pub fn settle(tank: &mut Tank, field: &mut Field) {
    tank.stop();
    let candidates = [tank.finish_position(), tank.aligned(tank.direction().opposite())];
    let Some(target) = candidates
        .into_iter()
        .find(|&p| footprint_clear(tank, p, field))
    else {
        return;
    };
    if target != tank.position {
        tank.remember_position();
        tank.position = target;
        field
            .occupancy_mut()
            .fill_rect(&tank.bounding_rect(), Some(tank.id), true);
    }
}

/// First actor other than the sender claiming a cell under any sample point
pub fn projectile_target(projectile: &Projectile, occupancy: &OccupancyMap) -> Option<ActorId> {
    projectile
        .sample_points()
        .into_iter()
        .filter_map(|p| occupancy.get_at(p))
        .find(|&id| id != projectile.sender)
}

/// True if any sample point lies inside the tank's exact footprint
pub fn projectile_hits_tank(projectile: &Projectile, tank: &Tank) -> bool {
    projectile
        .sample_points()
        .into_iter()
        .any(|p| tank.check_hit(p))
}

/// Mark shots from different senders that meet this frame.
///
/// Shots meet when they share an occupancy cell, or when they travel head-on
/// and their paths over the last step overlap (so they cannot pass through
/// each other between samples).
pub fn mark_projectile_collisions(projectiles: &mut [Projectile], occupancy: &OccupancyMap) {
    for i in 0..projectiles.len() {
        for j in (i + 1)..projectiles.len() {
            let (a, b) = (&projectiles[i], &projectiles[j]);
            if a.sender == b.sender {
                continue;
            }
            let same_cell = occupancy.cell_of(a.pos) == occupancy.cell_of(b.pos);
            let crossed = a.direction == b.direction.opposite()
                && a.swept_rect().intersects(&b.swept_rect());
            if same_cell || crossed {
                log::debug!("Projectiles {} and {} collided", a.id, b.id);
                projectiles[i].remove = true;
                projectiles[j].remove = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Cell, Fraction, Power, Rect, TankType};
    use std::time::{Duration, Instant};

    fn tank_at(id: ActorId, field: &Field, col: i32, row: i32) -> Tank {
        Tank::new(
            id,
            Fraction::Friend,
            TankType::Level1,
            field.corner(col, row),
            field.origin(),
            Duration::from_millis(500),
            Instant::now(),
        )
    }

    #[test]
    fn test_move_into_wall_rolls_back() {
        let mut field = Field::new(Vec2::ZERO);
        field.set_cell(3, 1, Cell::Concrete);
        // Centered on corner (2, 1): footprint spans x 17..47, one unit short of the wall
        let mut tank = tank_at(1, &field, 2, 1);
        let start = tank.position;
        assert!(!try_move(&mut tank, Direction::Right, &mut field));
        assert_eq!(tank.position, start);
        assert_eq!(tank.direction(), Direction::Right);
        for _ in 0..10 {
            try_move(&mut tank, Direction::Right, &mut field);
        }
        assert!(!field.intersect_rect(&tank.bounding_rect()));
        assert!(tank.bounding_rect().right() <= 48.0);
    }

    #[test]
    fn test_move_blocked_by_other_actor() {
        let mut field = Field::new(Vec2::ZERO);
        let mut tank = tank_at(1, &field, 2, 2);
        let other = tank_at(2, &field, 4, 2);
        field
            .occupancy_mut()
            .fill_rect(&other.bounding_rect(), Some(other.id), true);
        field
            .occupancy_mut()
            .fill_rect(&tank.bounding_rect(), Some(tank.id), true);
        let start = tank.position;
        assert!(!try_move(&mut tank, Direction::Right, &mut field));
        assert_eq!(tank.position, start);
        // Own cells never block
        assert!(try_move(&mut tank, Direction::Left, &mut field));
    }

    #[test]
    fn test_settle_prefers_finish_position() {
        let mut field = Field::new(Vec2::ZERO);
        let mut tank = tank_at(1, &field, 4, 4);
        tank.move_tank(Direction::Right);
        assert_eq!(tank.position.x, 66.0);
        settle(&mut tank, &mut field);
        assert_eq!(tank.position, Vec2::new(72.0, 64.0));
        assert!(!tank.moving);
    }

    #[test]
    fn test_settle_falls_back_behind() {
        let mut field = Field::new(Vec2::ZERO);
        let mut tank = tank_at(1, &field, 4, 4);
        tank.move_tank(Direction::Right);
        // Something claims the column only the forward position would cover
        let blocker = Rect::new(80.0, 56.0, 8.0, 16.0);
        field.occupancy_mut().fill_rect(&blocker, Some(9), true);
        settle(&mut tank, &mut field);
        assert_eq!(tank.position, Vec2::new(64.0, 64.0));
    }

    #[test]
    fn test_projectile_target_skips_sender() {
        let mut field = Field::new(Vec2::ZERO);
        let tank = tank_at(5, &field, 4, 4);
        field
            .occupancy_mut()
            .fill_rect(&tank.bounding_rect(), Some(5), true);
        let own = Projectile::new(1, tank.position, Direction::Up, Power::Normal, 5, Fraction::Friend);
        assert_eq!(projectile_target(&own, field.occupancy()), None);
        let hostile = Projectile::new(2, tank.position, Direction::Up, Power::Normal, 7, Fraction::Enemy);
        assert_eq!(projectile_target(&hostile, field.occupancy()), Some(5));
        assert!(projectile_hits_tank(&hostile, &tank));
    }

    #[test]
    fn test_head_on_projectiles_cancel() {
        let field = Field::new(Vec2::ZERO);
        let mut a = Projectile::new(1, Vec2::new(100.0, 100.0), Direction::Right, Power::Normal, 1, Fraction::Friend);
        let mut b = Projectile::new(2, Vec2::new(110.0, 100.0), Direction::Left, Power::Normal, 2, Fraction::Enemy);
        a.advance();
        b.advance();
        // Passed through each other: a at 108, b at 102
        let mut shots = vec![a, b];
        mark_projectile_collisions(&mut shots, field.occupancy());
        assert!(shots.iter().all(|p| p.remove));
    }

    #[test]
    fn test_same_sender_never_cancels() {
        let field = Field::new(Vec2::ZERO);
        let a = Projectile::new(1, Vec2::new(100.0, 100.0), Direction::Up, Power::Normal, 3, Fraction::Friend);
        let b = Projectile::new(2, Vec2::new(101.0, 101.0), Direction::Up, Power::Normal, 3, Fraction::Friend);
        let mut shots = vec![a, b];
        mark_projectile_collisions(&mut shots, field.occupancy());
        assert!(shots.iter().all(|p| !p.remove));
    }
}
