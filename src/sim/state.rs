//! Game session state
//!
//! `Game` owns every actor of a session explicitly: the field, the player,
//! the enemies with their AIs, projectiles, bonuses, the base and the
//! transient effects. Removal is always a plain edit of the owning `Vec`.

use std::time::Instant;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{ActorId, BASE_ID};
use super::ai::{Enemy, EnemyFleet};
use super::base::{Base, FieldProtector};
use super::bonus::{Bonus, BonusKind};
use super::effects::{Explosion, ScorePopup};
use super::field::Field;
use super::geometry::Direction;
use super::projectile::Projectile;
use super::tank::{Fraction, Tank, TankType};
use super::tick::{TickInput, tick};
use crate::consts::*;
use crate::error::LevelError;
use crate::render::{Canvas, SceneNode, render_terrain};
use crate::settings::{Settings, secs};

/// One play session
#[derive(Debug, Clone)]
pub struct Game {
    pub settings: Settings,
    /// Terrain as loaded, restored on restart
    level: Field,
    pub field: Field,
    pub player: Tank,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub bonuses: Vec<Bonus>,
    pub base: Base,
    pub protector: FieldProtector,
    pub fleet: EnemyFleet,
    pub explosions: Vec<Explosion>,
    pub popups: Vec<ScorePopup>,
    pub score: u32,
    pub(crate) game_over: bool,
    /// Commands queued for the next update
    pub(crate) input: TickInput,
    seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) next_id: ActorId,
    /// Frames simulated since the session started
    pub frame: u64,
}

impl Game {
    /// Start a session on the given level text
    pub fn new(level: &str, settings: Settings, seed: u64) -> Result<Self, LevelError> {
        Self::new_at(level, settings, seed, Instant::now())
    }

    pub fn new_at(
        level: &str,
        settings: Settings,
        seed: u64,
        now: Instant,
    ) -> Result<Self, LevelError> {
        let field = Field::load(level, FIELD_ORIGIN)?;
        Ok(Self::from_field(field, settings, seed, now))
    }

    /// Start a session on an already built field
    pub fn from_field(field: Field, settings: Settings, seed: u64, now: Instant) -> Self {
        let origin = field.origin();
        let (base_col, base_row) = BASE_CELL;
        let base = Base::new(field.corner(base_col + 1, base_row + 1));
        let protector = FieldProtector::new(
            &field,
            BASE_CELL,
            secs(settings.protect_time),
            secs(settings.protect_blink_time),
            now,
        );
        let fleet = EnemyFleet::new(
            ENEMY_SPAWN_CORNERS.map(|(c, r)| field.corner(c, r)),
            origin,
            &settings,
            now,
        );

        // Id 0 is the base's occupancy claim
        let player_id = BASE_ID + 1;
        let next_id = player_id + 1;
        let mut player = Tank::new(
            player_id,
            Fraction::Friend,
            TankType::Level1,
            Vec2::ZERO,
            origin,
            secs(settings.fire_cooldown),
            now,
        );
        player.respawn(
            Self::friend_spawn(&field),
            secs(settings.respawn_shield_time),
            now,
        );

        log::info!("New game (seed {})", seed);

        Self {
            level: field.clone(),
            field,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            bonuses: Vec::new(),
            base,
            protector,
            fleet,
            explosions: Vec::new(),
            popups: Vec::new(),
            score: 0,
            game_over: false,
            input: TickInput::default(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id,
            frame: 0,
            settings,
        }
    }

    /// Where the player (re)appears
    pub fn friend_spawn(field: &Field) -> Vec2 {
        let (col, row) = FRIEND_SPAWN_CORNER;
        field.corner(col, row)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Allocate a new actor id
    pub fn next_actor_id(&mut self) -> ActorId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop a random bonus on a random 2x2 tile square clear of terrain and
    /// the base. Returns the new bonus id, or `None` if no clear square
    /// turned up.
    pub fn spawn_random_bonus(&mut self) -> Option<ActorId> {
        const ATTEMPTS: usize = 32;
        let (width, height) = (self.field.width() as i32, self.field.height() as i32);
        if width < 2 || height < 2 {
            return None;
        }
        let kind = BonusKind::random(&mut self.rng);
        for _ in 0..ATTEMPTS {
            let col = self.rng.random_range(1..width);
            let row = self.rng.random_range(1..height);
            let bonus = Bonus::new(self.next_id, kind, self.field.corner(col, row));
            let rect = bonus.bounding_rect();
            if self.field.intersect_rect(&rect) || rect.intersects(&self.base.bounding_rect()) {
                continue;
            }
            let id = self.next_actor_id();
            log::debug!("Bonus {:?} placed at ({}, {})", kind, col, row);
            self.bonuses.push(bonus);
            return Some(id);
        }
        log::warn!("No clear square for a {:?} bonus", kind);
        None
    }

    /// Queue a player shot for the next update
    pub fn fire(&mut self) {
        self.input.fire = true;
    }

    /// Hold a movement direction for the next update.
    ///
    /// An update without a movement intent stops the player.
    pub fn move_intent(&mut self, direction: Direction) {
        self.input.move_intent = Some(direction);
    }

    /// Cycle the player through every tank type (debug command)
    pub fn switch_tank_type(&mut self) {
        self.switch_tank_type_at(Instant::now());
    }

    pub fn switch_tank_type_at(&mut self, now: Instant) {
        let next = self.player.tank_type().next_in_cycle();
        log::debug!("Player tank type -> {:?}", next);
        self.player.set_tank_type(next);
        self.player
            .activate_shield(secs(self.settings.shield_time), now);
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Advance one frame against the current wall clock
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Advance one frame; every timer in the frame observes `now`
    pub fn update_at(&mut self, now: Instant) {
        let input = std::mem::take(&mut self.input);
        tick(self, &input, now);
        self.frame += 1;
    }

    /// Start over on the level as loaded, keeping settings and seed
    pub fn restart(&mut self) {
        self.restart_at(Instant::now());
    }

    pub fn restart_at(&mut self, now: Instant) {
        log::info!("Restarting game (score was {})", self.score);
        *self = Self::from_field(self.level.clone(), self.settings.clone(), self.seed, now);
    }

    /// Draw the scene back to front
    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.field.render(canvas);
        self.base.render(canvas);
        self.player.render(canvas);
        for enemy in &self.enemies {
            enemy.tank.render(canvas);
        }
        for projectile in &self.projectiles {
            projectile.render(canvas);
        }
        for bonus in &self.bonuses {
            bonus.render(canvas);
        }
        render_terrain(&self.field, canvas, true);
        for explosion in &self.explosions {
            explosion.render(canvas);
        }
        for popup in &self.popups {
            popup.render(canvas);
        }
        if self.game_over {
            canvas.draw_game_over(self.field.bounds().center());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LEVEL_1;
    use crate::render::tests::RecordingCanvas;
    use crate::sim::Cell;

    #[test]
    fn test_new_game_layout() {
        let game = Game::new(LEVEL_1, Settings::default(), 1).expect("bundled level loads");
        assert_eq!(game.player.position, Game::friend_spawn(&game.field));
        assert!(game.player.shielded());
        assert_eq!(game.player.tank_type(), TankType::Level1);
        assert_ne!(game.player.id, BASE_ID);
        assert!(game.enemies.is_empty());
        assert_eq!(game.fleet.spawn_points().len(), 3);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_bad_level_is_fatal() {
        let err = Game::new("BBB\nCCC", Settings::default(), 1).unwrap_err();
        assert!(matches!(err, LevelError::TooFewRows { found: 2, .. }));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut game = Game::new(LEVEL_1, Settings::default(), 1).expect("level");
        let a = game.next_actor_id();
        let b = game.next_actor_id();
        assert_ne!(a, b);
        assert_ne!(a, game.player.id);
    }

    #[test]
    fn test_switch_tank_type_cycles_and_shields() {
        let now = Instant::now();
        let mut game = Game::new_at(LEVEL_1, Settings::default(), 1, now).expect("level");
        game.player.clear_shield();
        game.switch_tank_type_at(now);
        assert_eq!(game.player.tank_type(), TankType::Level2);
        assert!(game.player.shielded());
        for _ in 0..7 {
            game.switch_tank_type_at(now);
        }
        assert_eq!(game.player.tank_type(), TankType::Level1);
    }

    #[test]
    fn test_random_bonus_lands_on_clear_ground() {
        let mut game = Game::new(LEVEL_1, Settings::default(), 5).expect("level");
        for _ in 0..10 {
            let id = game.spawn_random_bonus().expect("level has open ground");
            let bonus = game.bonuses.last().expect("bonus placed");
            assert_eq!(bonus.id, id);
            assert!(!game.field.intersect_rect(&bonus.bounding_rect()));
            assert!(!bonus.bounding_rect().intersects(&game.base.bounding_rect()));
        }
        assert_eq!(game.bonuses.len(), 10);
    }

    #[test]
    fn test_random_bonus_needs_clear_ground() {
        let mut field = Field::new(FIELD_ORIGIN);
        for col in 0..field.width() as i32 {
            for row in 0..field.height() as i32 {
                field.set_cell(col, row, Cell::Concrete);
            }
        }
        let mut game = Game::from_field(field, Settings::default(), 1, Instant::now());
        let next = game.next_id;
        assert_eq!(game.spawn_random_bonus(), None);
        assert!(game.bonuses.is_empty());
        assert_eq!(game.next_id, next);
    }

    #[test]
    fn test_render_order() {
        let game = Game::new(LEVEL_1, Settings::default(), 1).expect("level");
        let mut canvas = RecordingCanvas::default();
        game.render(&mut canvas);
        let base = canvas.calls.iter().position(|c| *c == "base").expect("base drawn");
        let tank = canvas.calls.iter().position(|c| *c == "tank").expect("tank drawn");
        let first_overlay = canvas.calls.iter().position(|c| *c == "overlay").expect("level has foliage");
        let last_cell = canvas.calls.iter().rposition(|c| *c == "cell").expect("level has walls");
        assert!(last_cell < base);
        assert!(base < tank);
        assert!(tank < first_overlay);
        assert!(!canvas.calls.contains(&"game_over"));
    }
}
