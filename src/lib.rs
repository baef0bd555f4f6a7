//! Tank City - A top-down tank battle on a destructible tile grid
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (terrain, tanks, projectiles, AI)
//! - `render`: Rendering context trait implemented by the presentation layer
//! - `settings`: Data-driven gameplay tuning
//! - `levels`: Bundled level data

pub mod error;
pub mod levels;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{LevelError, SettingsError};
pub use render::{Canvas, SceneNode};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Terrain cell size in world units (one tile)
    pub const TILE_SIZE: f32 = 16.0;
    /// Occupancy cell size (half a tile)
    pub const OCCUPANCY_STEP: f32 = TILE_SIZE / 2.0;

    /// Field dimensions in terrain cells (13 blocks of 2x2 tiles)
    pub const FIELD_WIDTH: usize = 13 * 2;
    pub const FIELD_HEIGHT: usize = 13 * 2;
    /// Top-left corner of the field in world space
    pub const FIELD_ORIGIN: Vec2 = Vec2::new(40.0, 40.0);

    /// Tank footprint edge (slightly less than 2x2 tiles so tanks fit gaps)
    pub const TANK_SIZE: f32 = TILE_SIZE * 2.0 - 2.0;
    /// Tank speeds in world units per frame
    pub const TANK_SPEED_NORMAL: f32 = 2.0;
    pub const TANK_SPEED_FAST: f32 = 3.0;

    /// Projectile speed in world units per frame
    pub const PROJECTILE_SPEED: f32 = 8.0;
    /// Perpendicular offset of the side hit-sample points
    pub const PROJECTILE_SPREAD: f32 = TILE_SIZE / 2.0 - 1.0;
    /// Projectile footprint edge (for rendering and bounding box)
    pub const PROJECTILE_SIZE: f32 = 4.0;

    /// Bonus and base footprint edge (2x2 tiles)
    pub const BONUS_SIZE: f32 = TILE_SIZE * 2.0;
    pub const BASE_SIZE: f32 = TILE_SIZE * 2.0;

    /// Base location (terrain cell of its top-left corner)
    pub const BASE_CELL: (i32, i32) = (12, 24);
    /// Friendly spawn point (terrain cell corner the tank is centered on)
    pub const FRIEND_SPAWN_CORNER: (i32, i32) = (9, 25);
    /// Enemy spawn points (terrain cell corners)
    pub const ENEMY_SPAWN_CORNERS: [(i32, i32); 3] = [(1, 1), (13, 1), (25, 1)];

    /// Points awarded for picking up a bonus
    pub const BONUS_PICKUP_SCORE: u32 = 500;

    /// Animation timings (seconds)
    pub const EXPLOSION_FRAME_DELAY: f32 = 0.08;
    pub const SCORE_STAY_TIME: f32 = 1.0;
    pub const MOVE_ANIM_DELAY: f32 = 0.1;
    pub const BONUS_BLINK_DELAY: f32 = 0.5;
    pub const SHIELD_ANIM_DELAY: f32 = 0.04;
    pub const SPAWN_ANIM_DELAY: f32 = 0.1;
    pub const SPAWN_ANIM_FRAMES: usize = 4;
    pub const PROTECT_BLINK_DELAY: f32 = 1.0;

    /// Nominal frame time of the outer loop (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}

/// Snap a coordinate to the `step` lattice anchored at `origin`.
///
/// Rounds up when `toward_positive`, down otherwise.
#[inline]
pub fn snap_to_step(value: f32, origin: f32, step: f32, toward_positive: bool) -> f32 {
    let cells = (value - origin) / step;
    let snapped = if toward_positive {
        cells.ceil()
    } else {
        cells.floor()
    };
    origin + snapped * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_step() {
        assert_eq!(snap_to_step(45.0, 40.0, 8.0, true), 48.0);
        assert_eq!(snap_to_step(45.0, 40.0, 8.0, false), 40.0);
        // Already aligned values stay put in both directions
        assert_eq!(snap_to_step(56.0, 40.0, 8.0, true), 56.0);
        assert_eq!(snap_to_step(56.0, 40.0, 8.0, false), 56.0);
    }
}
