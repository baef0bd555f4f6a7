//! Per-frame simulation update
//!
//! One call to `tick` advances the whole session by one frame. The phase
//! order is fixed:
//! 1. Rebuild the occupancy map from current footprints
//! 2. Base protector, explosions and score popups
//! 3. Player movement and fire
//! 4. Enemy spawning, AI, movement and fire; destroyed enemies removed
//! 5. Bonus pickups
//! 6. Projectile advance and hit resolution; spent shots removed
//!
//! Entities are only flagged while a collection is being walked and are
//! removed once the walk is over.

use std::time::Instant;

use super::ai::Enemy;
use super::bonus::{Bonus, BonusEffect, BonusKind};
use super::collision::{
    mark_projectile_collisions, projectile_hits_tank, projectile_target, settle, try_move,
};
use super::effects::{Explosion, ScorePopup};
use super::geometry::Direction;
use super::projectile::Projectile;
use super::state::Game;
use super::tank::Fraction;
use super::BASE_ID;
use crate::consts::BONUS_PICKUP_SCORE;
use crate::settings::secs;

/// Player commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Fire the player's gun
    pub fire: bool,
    /// Direction held this frame; `None` means the player let go
    pub move_intent: Option<Direction>,
}

/// Advance the game by one frame
pub fn tick(game: &mut Game, input: &TickInput, now: Instant) {
    populate_occupancy(game);

    game.protector.update(&mut game.field, now);
    game.explosions.retain_mut(|e| e.update(now));
    game.popups.retain_mut(|p| p.update(now));

    update_player(game, input, now);
    update_enemies(game, now);
    remove_destroyed_enemies(game, now);
    resolve_bonuses(game, now);
    resolve_projectiles(game, now);
}

/// Claim footprints: the base first, then the player, then active enemies.
/// Spawning enemies are not solid yet.
fn populate_occupancy(game: &mut Game) {
    let occupancy = game.field.occupancy_mut();
    occupancy.clear();
    occupancy.fill_rect(&game.base.bounding_rect(), Some(BASE_ID), true);
    occupancy.fill_rect(&game.player.bounding_rect(), Some(game.player.id), true);
    for enemy in game.enemies.iter().filter(|e| !e.tank.is_spawning) {
        occupancy.fill_rect(&enemy.tank.bounding_rect(), Some(enemy.tank.id), true);
    }
}

fn update_player(game: &mut Game, input: &TickInput, now: Instant) {
    game.player.update(now);
    if game.game_over {
        return;
    }

    match input.move_intent {
        Some(direction) => {
            try_move(&mut game.player, direction, &mut game.field);
        }
        None if game.player.moving => settle(&mut game.player, &mut game.field),
        None => {}
    }

    if input.fire && game.player.try_fire(now) {
        let id = game.next_actor_id();
        game.projectiles.push(Projectile::fired_by(id, &game.player));
    }
}

fn update_enemies(game: &mut Game, now: Instant) {
    if let Some(enemy) = game.fleet.update(
        &game.enemies,
        &game.settings,
        &mut game.rng,
        &mut game.next_id,
        now,
    ) {
        game.enemies.push(enemy);
    }

    let frozen = game.fleet.is_frozen(now);
    for Enemy { tank, ai } in game.enemies.iter_mut() {
        tank.update(now);
        let intent = ai.update(tank, &game.field, frozen, &mut game.rng, now);

        if intent.advance {
            let direction = tank.direction();
            if !try_move(tank, direction, &mut game.field) {
                ai.on_blocked();
            }
        }

        if intent.fire && tank.try_fire(now) {
            let id = game.next_id;
            game.next_id += 1;
            game.projectiles.push(Projectile::fired_by(id, tank));
        }
    }
}

/// Drop enemies flagged `to_destroy`: score, explosion, popup and the
/// carried bonus, if any
fn remove_destroyed_enemies(game: &mut Game, now: Instant) {
    if !game.enemies.iter().any(|e| e.tank.to_destroy) {
        return;
    }
    let (destroyed, alive): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut game.enemies)
        .into_iter()
        .partition(|e| e.tank.to_destroy);
    game.enemies = alive;

    for Enemy { tank, .. } in destroyed {
        let points = tank.tank_type().score();
        game.score += points;
        game.explosions.push(Explosion::new(tank.position, true, now));
        game.popups.extend(ScorePopup::new(tank.position, points, now));
        log::debug!("Enemy {} destroyed (+{})", tank.id, points);

        if tank.is_bonus {
            let kind = BonusKind::random(&mut game.rng);
            let id = game.next_actor_id();
            log::debug!("Enemy {} dropped {:?}", tank.id, kind);
            game.bonuses.push(Bonus::new(id, kind, tank.position));
        }
    }
}

fn resolve_bonuses(game: &mut Game, now: Instant) {
    if game.game_over || game.bonuses.is_empty() {
        return;
    }
    let player_rect = game.player.bounding_rect();
    let (taken, kept): (Vec<Bonus>, Vec<Bonus>) = std::mem::take(&mut game.bonuses)
        .into_iter()
        .partition(|b| b.bounding_rect().intersects(&player_rect));
    game.bonuses = kept;

    for bonus in taken {
        log::debug!("Picked up {:?}", bonus.kind);
        game.score += BONUS_PICKUP_SCORE;
        game.popups
            .extend(ScorePopup::new(bonus.pos, BONUS_PICKUP_SCORE, now));
        apply_bonus(game, bonus.kind, now);
    }
}

fn apply_bonus(game: &mut Game, kind: BonusKind, now: Instant) {
    let Some(effect) = kind.effect() else {
        log::warn!("Bonus {:?} has no effect, ignored", kind);
        return;
    };
    match effect {
        BonusEffect::KillAllEnemies => {
            for enemy in &mut game.enemies {
                enemy.tank.to_destroy = true;
            }
            remove_destroyed_enemies(game, now);
        }
        BonusEffect::Shield => {
            let duration = secs(game.settings.shield_time);
            game.player.activate_shield(duration, now);
        }
        BonusEffect::Upgrade => game.player.upgrade(false),
        BonusEffect::UpgradeMax => game.player.upgrade(true),
        BonusEffect::FreezeEnemies => game.fleet.freeze(now),
        BonusEffect::BaseShield => game.protector.activate(&mut game.field, now),
    }
}

fn resolve_projectiles(game: &mut Game, now: Instant) {
    if game.projectiles.is_empty() {
        return;
    }
    let mut projectiles = std::mem::take(&mut game.projectiles);
    for p in &mut projectiles {
        p.advance();
    }
    mark_projectile_collisions(&mut projectiles, game.field.occupancy());

    let bounds = game.field.bounds();
    for p in projectiles.iter_mut().filter(|p| !p.remove) {
        if !bounds.contains_point(p.pos) {
            p.remove = true;
            continue;
        }

        if game.field.check_hit(p) {
            p.remove = true;
            game.explosions.push(Explosion::new(p.pos, false, now));
            continue;
        }

        if !game.base.broken && game.base.check_hit(p.pos) {
            p.remove = true;
            game.base.broken = true;
            game.game_over = true;
            game.explosions.push(Explosion::new(game.base.pos, true, now));
            log::info!("Base destroyed, game over (score {})", game.score);
            continue;
        }

        let Some(target) = projectile_target(p, game.field.occupancy()) else {
            continue;
        };
        if target == BASE_ID {
            continue;
        }

        if target == game.player.id {
            if projectile_hits_tank(p, &game.player) {
                p.remove = true;
                if p.fraction == Fraction::Enemy {
                    hit_player(game, now);
                }
            }
            continue;
        }

        let Some(enemy) = game.enemies.iter_mut().find(|e| e.tank.id == target) else {
            continue;
        };
        if enemy.tank.is_spawning || !projectile_hits_tank(p, &enemy.tank) {
            continue;
        }
        p.remove = true;
        // Enemy shots stop at other enemies without harming them
        if p.fraction == Fraction::Friend {
            enemy.tank.hit = true;
            log::debug!("Enemy {} hit", enemy.tank.id);
        }
    }

    projectiles.retain(|p| !p.remove);
    game.projectiles = projectiles;
}

/// An enemy shot reached the player: the shield absorbs it, otherwise the
/// player is knocked back to the spawn point as a fresh level 1 tank
fn hit_player(game: &mut Game, now: Instant) {
    if game.player.shielded() {
        log::debug!("Shield absorbed a hit");
        return;
    }
    game.explosions
        .push(Explosion::new(game.player.position, true, now));
    let spawn = Game::friend_spawn(&game.field);
    let shield = secs(game.settings.respawn_shield_time);
    game.player.respawn(spawn, shield, now);
    log::debug!("Player destroyed, respawning");
}
