//! Terrain grid and terrain collision
//!
//! The field owns both grids of the simulation: the destructible terrain at
//! tile resolution and the per-frame occupancy map at half-tile resolution.
//!
//! Collision against terrain is exact at sub-tile level: a half-brick only
//! blocks the half of its tile that still stands, so tanks and projectiles
//! are tested against the solid sub-rectangle of each cell rather than
//! against whole cells.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Direction, Rect};
use super::grid::{DiscreteMap, OccupancyMap};
use super::projectile::{Power, Projectile};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, OCCUPANCY_STEP, TILE_SIZE};
use crate::error::LevelError;

/// Terrain cell kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Free,
    Brick,
    BrickLeft,
    BrickRight,
    BrickTop,
    BrickBottom,
    Concrete,
    /// Foliage: passable, drawn over tanks
    Green,
    /// Ice: passable
    Skate,
}

impl Cell {
    pub const ALL: [Cell; 9] = [
        Cell::Free,
        Cell::Brick,
        Cell::BrickLeft,
        Cell::BrickRight,
        Cell::BrickTop,
        Cell::BrickBottom,
        Cell::Concrete,
        Cell::Green,
        Cell::Skate,
    ];

    /// Blocks tanks and stops projectiles
    pub fn solid(self) -> bool {
        self.is_brick() || self == Cell::Concrete
    }

    pub fn can_traverse(self) -> bool {
        matches!(self, Cell::Free | Cell::Skate | Cell::Green)
    }

    pub fn is_brick(self) -> bool {
        matches!(
            self,
            Cell::Brick | Cell::BrickLeft | Cell::BrickRight | Cell::BrickTop | Cell::BrickBottom
        )
    }

    /// Drawn after tanks and projectiles
    pub fn draws_over(self) -> bool {
        self == Cell::Green
    }

    pub fn from_symbol(symbol: char) -> Option<Cell> {
        Some(match symbol {
            '_' => Cell::Free,
            'B' => Cell::Brick,
            'C' => Cell::Concrete,
            'S' => Cell::Skate,
            'G' => Cell::Green,
            'l' => Cell::BrickLeft,
            'r' => Cell::BrickRight,
            't' => Cell::BrickTop,
            'b' => Cell::BrickBottom,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Free => '_',
            Cell::Brick => 'B',
            Cell::Concrete => 'C',
            Cell::Skate => 'S',
            Cell::Green => 'G',
            Cell::BrickLeft => 'l',
            Cell::BrickRight => 'r',
            Cell::BrickTop => 't',
            Cell::BrickBottom => 'b',
        }
    }

    /// Half-brick left standing after a whole brick is hit by a shot
    /// travelling in `direction`: the shot eats the near half, the half
    /// further along its path survives.
    pub fn surviving_half(direction: Direction) -> Cell {
        match direction {
            Direction::Up => Cell::BrickTop,
            Direction::Down => Cell::BrickBottom,
            Direction::Left => Cell::BrickLeft,
            Direction::Right => Cell::BrickRight,
        }
    }

    /// Cell after a projectile strikes it
    pub fn after_hit(self, direction: Direction, power: Power) -> Cell {
        match self {
            Cell::Brick => Cell::surviving_half(direction),
            Cell::BrickLeft | Cell::BrickRight | Cell::BrickTop | Cell::BrickBottom => Cell::Free,
            Cell::Concrete if power == Power::High => Cell::Free,
            other => other,
        }
    }

    /// Part of `cell_rect` that blocks, if any
    pub fn solid_rect(self, cell_rect: Rect) -> Option<Rect> {
        let Rect { x, y, w, h } = cell_rect;
        let (hw, hh) = (w / 2.0, h / 2.0);
        match self {
            Cell::Brick | Cell::Concrete => Some(cell_rect),
            Cell::BrickLeft => Some(Rect::new(x, y, hw, h)),
            Cell::BrickRight => Some(Rect::new(x + hw, y, hw, h)),
            Cell::BrickTop => Some(Rect::new(x, y, w, hh)),
            Cell::BrickBottom => Some(Rect::new(x, y + hh, w, hh)),
            Cell::Free | Cell::Green | Cell::Skate => None,
        }
    }
}

/// The playing field: terrain plus the per-frame occupancy map
#[derive(Debug, Clone)]
pub struct Field {
    terrain: DiscreteMap<Cell>,
    occupancy: OccupancyMap,
}

impl Field {
    /// Empty field of the standard size
    pub fn new(origin: Vec2) -> Self {
        Self::with_size(origin, FIELD_WIDTH, FIELD_HEIGHT)
    }

    pub fn with_size(origin: Vec2, width: usize, height: usize) -> Self {
        let per_tile = (TILE_SIZE / OCCUPANCY_STEP) as usize;
        Self {
            terrain: DiscreteMap::new(origin, TILE_SIZE, width, height, Cell::Free),
            occupancy: OccupancyMap::new(
                origin,
                OCCUPANCY_STEP,
                width * per_tile,
                height * per_tile,
            ),
        }
    }

    /// Build a standard-size field from level text.
    ///
    /// The level needs at least `FIELD_HEIGHT` lines of at least
    /// `FIELD_WIDTH` symbols; anything past that is ignored.
    pub fn load(level: &str, origin: Vec2) -> Result<Self, LevelError> {
        let mut field = Self::new(origin);
        let (width, height) = (field.width(), field.height());

        let lines: Vec<&str> = level.lines().take(height).collect();
        if lines.len() < height {
            return Err(LevelError::TooFewRows {
                expected: height,
                found: lines.len(),
            });
        }

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found < width {
                return Err(LevelError::ShortRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, symbol) in line.chars().take(width).enumerate() {
                let cell = Cell::from_symbol(symbol)
                    .ok_or(LevelError::UnknownSymbol { row, col, symbol })?;
                field.terrain.set(col as i32, row as i32, cell);
            }
        }

        log::info!("Loaded {}x{} level", width, height);
        Ok(field)
    }

    pub fn width(&self) -> usize {
        self.terrain.width()
    }

    pub fn height(&self) -> usize {
        self.terrain.height()
    }

    pub fn origin(&self) -> Vec2 {
        self.terrain.origin()
    }

    /// World rectangle of the playable area
    pub fn bounds(&self) -> Rect {
        self.terrain.bounds()
    }

    pub fn terrain(&self) -> &DiscreteMap<Cell> {
        &self.terrain
    }

    pub fn occupancy(&self) -> &OccupancyMap {
        &self.occupancy
    }

    pub fn occupancy_mut(&mut self) -> &mut OccupancyMap {
        &mut self.occupancy
    }

    /// World position of a cell corner (where 2x2 actors are centered)
    pub fn corner(&self, col: i32, row: i32) -> Vec2 {
        self.terrain.coord_of(col, row)
    }

    /// Terrain cell; outside the grid everything is concrete
    pub fn cell(&self, col: i32, row: i32) -> Cell {
        self.terrain.get(col, row).unwrap_or(Cell::Concrete)
    }

    pub fn set_cell(&mut self, col: i32, row: i32, cell: Cell) {
        self.terrain.set(col, row, cell);
    }

    /// True if any part of `rect` overlaps non-traversable terrain or lies
    /// outside the field.
    pub fn intersect_rect(&self, rect: &Rect) -> bool {
        self.terrain.span_of_rect(rect).iter().any(|(col, row)| {
            if !self.terrain.in_bounds(col, row) {
                return true;
            }
            self.cell(col, row)
                .solid_rect(self.terrain.cell_rect(col, row))
                .is_some_and(|solid| solid.intersects(rect))
        })
    }

    /// Resolve a projectile against terrain.
    ///
    /// Every sample point is evaluated. Each struck cell degrades once per
    /// call even when several samples land in it. Returns true if any sample
    /// hit solid terrain, including concrete that absorbed the shot intact.
    pub fn check_hit(&mut self, projectile: &Projectile) -> bool {
        let mut struck: Vec<(i32, i32)> = Vec::with_capacity(3);
        let mut hit = false;

        for point in projectile.sample_points() {
            let (col, row) = self.terrain.cell_of(point);
            let solid = self
                .cell(col, row)
                .solid_rect(self.terrain.cell_rect(col, row));
            if solid.is_some_and(|r| r.contains_point(point)) {
                hit = true;
                if !struck.contains(&(col, row)) {
                    struck.push((col, row));
                }
            }
        }

        for (col, row) in struck {
            let before = self.cell(col, row);
            let after = before.after_hit(projectile.direction, projectile.power);
            if after != before {
                log::debug!("Cell ({}, {}) {:?} -> {:?}", col, row, before, after);
                self.set_cell(col, row, after);
            }
        }

        hit
    }

    /// Level text for the current terrain (one line per row)
    pub fn to_level(&self) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for row in 0..self.height() as i32 {
            for col in 0..self.width() as i32 {
                out.push(self.cell(col, row).symbol());
            }
            out.push('\n');
        }
        out
    }
}
