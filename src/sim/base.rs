//! The player's base and its temporary concrete wall

use std::time::{Duration, Instant};

use glam::Vec2;

use super::field::{Cell, Field};
use super::geometry::Rect;
use super::timer::{Animator, Timer};
use crate::consts::{BASE_SIZE, PROTECT_BLINK_DELAY};
use crate::settings::secs;

/// The eagle. Breaking it ends the session.
#[derive(Debug, Clone)]
pub struct Base {
    /// Center of the 2x2 tile footprint
    pub pos: Vec2,
    pub broken: bool,
}

impl Base {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, broken: false }
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(BASE_SIZE))
    }

    pub fn check_hit(&self, point: Vec2) -> bool {
        self.bounding_rect().contains_point(point)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionState {
    NotProtected,
    Protected,
    Blinking,
}

/// Turns the brick ring around the base into concrete for a while.
///
/// `NotProtected -> Protected -> Blinking -> NotProtected`. While blinking
/// the ring alternates between concrete and brick on each animator step and
/// ends as brick.
#[derive(Debug, Clone)]
pub struct FieldProtector {
    ring: Vec<(i32, i32)>,
    state: ProtectionState,
    protect_timer: Timer,
    blink_timer: Timer,
    blink_animator: Animator,
    shown: usize,
}

impl FieldProtector {
    /// Protector for a 2x2 base whose top-left terrain cell is `(col, row)`.
    /// Ring cells outside `field` are dropped.
    pub fn new(
        field: &Field,
        (col, row): (i32, i32),
        protect_time: Duration,
        blink_time: Duration,
        now: Instant,
    ) -> Self {
        let ring = (row - 1..=row + 2)
            .flat_map(|r| (col - 1..=col + 2).map(move |c| (c, r)))
            .filter(|&(c, r)| !((col..=col + 1).contains(&c) && (row..=row + 1).contains(&r)))
            .filter(|&(c, r)| field.terrain().in_bounds(c, r))
            .collect();
        Self {
            ring,
            state: ProtectionState::NotProtected,
            protect_timer: Timer::new(protect_time, now),
            blink_timer: Timer::new(blink_time, now),
            blink_animator: Animator::looping(secs(PROTECT_BLINK_DELAY), 2, now),
            shown: 0,
        }
    }

    pub fn state(&self) -> ProtectionState {
        self.state
    }

    /// Terrain cells bordering the base
    pub fn ring(&self) -> &[(i32, i32)] {
        &self.ring
    }

    /// Wall the base in concrete; restarts the protection if already active
    pub fn activate(&mut self, field: &mut Field, now: Instant) {
        log::debug!("Base protection activated");
        self.state = ProtectionState::Protected;
        self.protect_timer.start(now);
        self.blink_timer.stop();
        self.set_ring(field, Cell::Concrete);
    }

    pub fn update(&mut self, field: &mut Field, now: Instant) {
        match self.state {
            ProtectionState::NotProtected => {}
            ProtectionState::Protected => {
                if self.protect_timer.tick(now) {
                    self.state = ProtectionState::Blinking;
                    self.blink_timer.start(now);
                    self.blink_animator.reset(now);
                    self.shown = 0;
                }
            }
            ProtectionState::Blinking => {
                if self.blink_timer.tick(now) {
                    self.state = ProtectionState::NotProtected;
                    self.set_ring(field, Cell::Brick);
                    log::debug!("Base protection expired");
                    return;
                }
                let frame = self.blink_animator.poll(now);
                if frame != self.shown {
                    self.shown = frame;
                    let cell = if frame == 0 { Cell::Concrete } else { Cell::Brick };
                    self.set_ring(field, cell);
                }
            }
        }
    }

    fn set_ring(&self, field: &mut Field, cell: Cell) {
        for &(col, row) in &self.ring {
            field.set_cell(col, row, cell);
        }
    }
}
