//! Rendering context
//!
//! The simulation never touches pixels. Anything drawable implements
//! `SceneNode` and describes itself to a `Canvas` supplied by the
//! presentation layer (a sprite blitter, a terminal dump, a test recorder).

use glam::Vec2;

use crate::consts::{BASE_SIZE, TILE_SIZE};
use crate::sim::{
    Base, Bonus, BonusKind, Cell, Direction, Explosion, Field, Fraction, Projectile, Rect,
    ScorePopup, Tank, TankColor, TankType,
};

/// Everything a renderer needs to pick a tank sprite
#[derive(Debug, Clone, PartialEq)]
pub struct TankSprite {
    pub rect: Rect,
    pub fraction: Fraction,
    pub tank_type: TankType,
    pub color: TankColor,
    pub direction: Direction,
    /// Track animation frame (0 or 1)
    pub move_frame: usize,
    /// Shield overlay frame while shielded
    pub shield_frame: Option<usize>,
    /// Sparkle frame while spawning (the tank itself is not drawn)
    pub spawn_frame: Option<usize>,
}

/// Drawing surface injected by the presentation layer
pub trait Canvas {
    fn draw_cell(&mut self, rect: Rect, cell: Cell);
    fn draw_tank(&mut self, sprite: &TankSprite);
    fn draw_projectile(&mut self, rect: Rect, direction: Direction);
    fn draw_bonus(&mut self, rect: Rect, kind: BonusKind);
    fn draw_base(&mut self, rect: Rect, broken: bool);
    fn draw_explosion(&mut self, center: Vec2, frame: usize, large: bool);
    fn draw_score(&mut self, pos: Vec2, score: u32);
    fn draw_game_over(&mut self, center: Vec2);
}

/// A drawable entity of the scene
pub trait SceneNode {
    fn bounding_rect(&self) -> Rect;
    fn render(&self, canvas: &mut dyn Canvas);
}

/// Draw terrain cells. The first pass draws everything tanks drive over or
/// into; the overlay pass draws foliage on top of tanks and shots.
pub fn render_terrain(field: &Field, canvas: &mut dyn Canvas, overlay: bool) {
    for (col, row, cell) in field.terrain().iter() {
        if cell == Cell::Free || cell.draws_over() != overlay {
            continue;
        }
        canvas.draw_cell(field.terrain().cell_rect(col, row), cell);
    }
}

impl SceneNode for Field {
    fn bounding_rect(&self) -> Rect {
        self.bounds()
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        render_terrain(self, canvas, false);
    }
}

impl SceneNode for Tank {
    fn bounding_rect(&self) -> Rect {
        Tank::bounding_rect(self)
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_tank(&self.sprite());
    }
}

impl SceneNode for Projectile {
    fn bounding_rect(&self) -> Rect {
        Projectile::bounding_rect(self)
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_projectile(Projectile::bounding_rect(self), self.direction);
    }
}

impl SceneNode for Bonus {
    fn bounding_rect(&self) -> Rect {
        Bonus::bounding_rect(self)
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_bonus(Bonus::bounding_rect(self), self.kind);
    }
}

impl SceneNode for Base {
    fn bounding_rect(&self) -> Rect {
        Base::bounding_rect(self)
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_base(Base::bounding_rect(self), self.broken);
    }
}

impl SceneNode for Explosion {
    fn bounding_rect(&self) -> Rect {
        let size = if self.large { BASE_SIZE * 2.0 } else { BASE_SIZE };
        Rect::centered(self.center, Vec2::splat(size))
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_explosion(self.center, self.frame(), self.large);
    }
}

impl SceneNode for ScorePopup {
    fn bounding_rect(&self) -> Rect {
        Rect::centered(self.pos, Vec2::new(TILE_SIZE * 2.0, TILE_SIZE))
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_score(self.pos, self.score);
    }
}
