//! Discrete grid maps
//!
//! A `DiscreteMap` lays a `width x height` lattice of square cells over world
//! space starting at `origin`. The terrain uses one at tile resolution; the
//! occupancy map uses one at half-tile resolution to arbitrate actor overlap.
//!
//! Cells are addressed as `(col, row)`. Columns and rows are signed so that
//! probes past the edges can be represented and answered with a sentinel.

use glam::Vec2;

use super::ActorId;
use super::geometry::Rect;

/// Inclusive cell range covered by a rectangle (may lie outside the grid)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub col_min: i32,
    pub col_max: i32,
    pub row_min: i32,
    pub row_max: i32,
}

impl CellSpan {
    pub fn iter(self) -> impl Iterator<Item = (i32, i32)> {
        (self.col_min..=self.col_max)
            .flat_map(move |col| (self.row_min..=self.row_max).map(move |row| (col, row)))
    }
}

/// Uniform grid of `T` over world space
#[derive(Debug, Clone)]
pub struct DiscreteMap<T> {
    origin: Vec2,
    step: f32,
    width: usize,
    height: usize,
    default_value: T,
    // column-major: cells[col * height + row]
    cells: Vec<T>,
}

impl<T: Copy + PartialEq> DiscreteMap<T> {
    pub fn new(origin: Vec2, step: f32, width: usize, height: usize, default_value: T) -> Self {
        Self {
            origin,
            step,
            width,
            height,
            default_value,
            cells: vec![default_value; width * height],
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// World rectangle covered by the whole grid
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.width as f32 * self.step,
            self.height as f32 * self.step,
        )
    }

    /// Reset every cell to the default value
    pub fn clear(&mut self) {
        self.cells.fill(self.default_value);
    }

    /// World position of the cell's top-left corner
    pub fn coord_of(&self, col: i32, row: i32) -> Vec2 {
        self.origin + Vec2::new(col as f32, row as f32) * self.step
    }

    /// Cell containing a world position (may be out of bounds)
    pub fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        let local = (pos - self.origin) / self.step;
        (local.x.floor() as i32, local.y.floor() as i32)
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    /// World rectangle of a single cell
    pub fn cell_rect(&self, col: i32, row: i32) -> Rect {
        let p = self.coord_of(col, row);
        Rect::new(p.x, p.y, self.step, self.step)
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        self.in_bounds(col, row)
            .then(|| col as usize * self.height + row as usize)
    }

    /// Cell value, `None` outside the grid
    pub fn get(&self, col: i32, row: i32) -> Option<T> {
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Write a cell; no-op outside the grid
    pub fn set(&mut self, col: i32, row: i32, value: T) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = value;
        }
    }

    /// Cells overlapped by `rect`, not clamped to the grid.
    ///
    /// Right and bottom edges are exclusive, so a rectangle ending exactly on
    /// a cell boundary does not reach into the next cell.
    pub fn span_of_rect(&self, rect: &Rect) -> CellSpan {
        let lo = (Vec2::new(rect.x, rect.y) - self.origin) / self.step;
        let hi = (Vec2::new(rect.right(), rect.bottom()) - self.origin) / self.step;
        let col_min = lo.x.floor() as i32;
        let row_min = lo.y.floor() as i32;
        let col_max = (hi.x.ceil() as i32 - 1).max(col_min);
        let row_max = (hi.y.ceil() as i32 - 1).max(row_min);
        CellSpan {
            col_min,
            col_max,
            row_min,
            row_max,
        }
    }

    /// Cells overlapped by `rect`, clamped to the grid
    pub fn cells_covered_by_rect(&self, rect: &Rect) -> impl Iterator<Item = (i32, i32)> + use<T> {
        let span = self.span_of_rect(rect);
        let clamped = CellSpan {
            col_min: span.col_min.max(0),
            col_max: span.col_max.min(self.width as i32 - 1),
            row_min: span.row_min.max(0),
            row_max: span.row_max.min(self.height as i32 - 1),
        };
        clamped.iter()
    }

    /// Iterate `(col, row, value)` over every cell
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, T)> + '_ {
        self.cells.iter().enumerate().map(move |(i, v)| {
            ((i / self.height) as i32, (i % self.height) as i32, *v)
        })
    }
}

/// Per-frame map of which actor claims each half-tile cell
#[derive(Debug, Clone)]
pub struct OccupancyMap {
    map: DiscreteMap<Option<ActorId>>,
}

impl OccupancyMap {
    pub fn new(origin: Vec2, step: f32, width: usize, height: usize) -> Self {
        Self {
            map: DiscreteMap::new(origin, step, width, height, None),
        }
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        self.map.cell_of(pos)
    }

    /// Claimant of a cell; `None` for free cells and outside the grid
    pub fn get(&self, col: i32, row: i32) -> Option<ActorId> {
        self.map.get(col, row).flatten()
    }

    /// Claimant of the cell containing a world position
    pub fn get_at(&self, pos: Vec2) -> Option<ActorId> {
        let (col, row) = self.map.cell_of(pos);
        self.get(col, row)
    }

    pub fn cells_covered_by_rect(&self, rect: &Rect) -> impl Iterator<Item = (i32, i32)> {
        self.map.cells_covered_by_rect(rect)
    }

    /// Claim every covered cell for `value`.
    ///
    /// With `only_if_empty` cells already claimed keep their first claimant.
    pub fn fill_rect(&mut self, rect: &Rect, value: Option<ActorId>, only_if_empty: bool) {
        let cells: Vec<_> = self.map.cells_covered_by_rect(rect).collect();
        for (col, row) in cells {
            if !only_if_empty || self.get(col, row).is_none() {
                self.map.set(col, row, value);
            }
        }
    }

    /// True if every covered cell holds one of `allowed`
    pub fn test_rect(&self, rect: &Rect, allowed: &[Option<ActorId>]) -> bool {
        self.map
            .cells_covered_by_rect(rect)
            .all(|(col, row)| allowed.contains(&self.get(col, row)))
    }
}
