//! Bonus pickups

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ActorId;
use super::geometry::Rect;
use crate::consts::BONUS_SIZE;

/// Pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    Helmet,
    Timer,
    Shovel,
    Star,
    Grenade,
    Tank,
    Gun,
}

/// What a pickup does to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusEffect {
    KillAllEnemies,
    Shield,
    Upgrade,
    UpgradeMax,
    FreezeEnemies,
    BaseShield,
}

impl BonusKind {
    pub const ALL: [BonusKind; 7] = [
        BonusKind::Helmet,
        BonusKind::Timer,
        BonusKind::Shovel,
        BonusKind::Star,
        BonusKind::Grenade,
        BonusKind::Tank,
        BonusKind::Gun,
    ];

    /// Effect of picking this up; `None` for kinds with no behavior yet
    pub fn effect(self) -> Option<BonusEffect> {
        match self {
            BonusKind::Helmet => Some(BonusEffect::Shield),
            BonusKind::Timer => Some(BonusEffect::FreezeEnemies),
            BonusKind::Shovel => Some(BonusEffect::BaseShield),
            BonusKind::Star => Some(BonusEffect::Upgrade),
            BonusKind::Grenade => Some(BonusEffect::KillAllEnemies),
            BonusKind::Tank => Some(BonusEffect::UpgradeMax),
            BonusKind::Gun => None,
        }
    }

    pub fn random(rng: &mut impl Rng) -> BonusKind {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone)]
pub struct Bonus {
    pub id: ActorId,
    pub kind: BonusKind,
    /// Center of the footprint
    pub pos: Vec2,
}

impl Bonus {
    pub fn new(id: ActorId, kind: BonusKind, pos: Vec2) -> Self {
        Self { id, kind, pos }
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(BONUS_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_gun_has_no_effect() {
        assert_eq!(BonusKind::Gun.effect(), None);
        let defined = BonusKind::ALL.iter().filter(|k| k.effect().is_some()).count();
        assert_eq!(defined, 6);
    }

    #[test]
    fn test_random_kind_is_reproducible() {
        let mut a = Pcg32::seed_from_u64(3);
        let mut b = Pcg32::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(BonusKind::random(&mut a), BonusKind::random(&mut b));
        }
    }

    #[test]
    fn test_footprint_centered() {
        let b = Bonus::new(1, BonusKind::Star, Vec2::new(100.0, 100.0));
        let r = b.bounding_rect();
        assert_eq!((r.x, r.y, r.w, r.h), (84.0, 84.0, 32.0, 32.0));
    }
}
