//! Gameplay settings
//!
//! Tuning knobs for timers, spawning and AI. Loaded from JSON; any field
//! missing from the file keeps its default.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::sim::TankType;

/// Longest accepted timing in seconds
pub const MAX_TIMING_SECS: f32 = 3600.0;

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Enemy fleet ===
    /// Maximum number of live enemy tanks (spawning ones included)
    pub max_enemies: usize,
    /// Seconds between spawn attempts
    pub spawn_interval: f32,
    /// Seconds a freshly spawned enemy stays in the spawning state
    pub enemy_spawn_delay: f32,
    /// Probability that a spawned enemy carries a bonus
    pub bonus_carrier_chance: f64,
    /// Enemy types assigned to spawned tanks, cycled in order
    pub enemy_types: Vec<TankType>,

    // === Enemy AI ===
    /// Seconds between AI fire intents
    pub ai_fire_interval: f32,
    /// Shortest delay before an AI picks a new direction
    pub ai_direction_min: f32,
    /// Longest delay before an AI picks a new direction
    pub ai_direction_max: f32,

    // === Player ===
    /// Seconds between player shots
    pub fire_cooldown: f32,
    /// Shield granted after a respawn (seconds)
    pub respawn_shield_time: f32,

    // === Bonuses ===
    /// Shield granted by the helmet bonus (seconds)
    pub shield_time: f32,
    /// Enemy freeze granted by the timer bonus (seconds)
    pub freeze_time: f32,
    /// Concrete base wall duration from the shovel bonus (seconds)
    pub protect_time: f32,
    /// Blinking phase after the concrete wall expires (seconds)
    pub protect_blink_time: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_enemies: 4,
            spawn_interval: 3.0,
            enemy_spawn_delay: 1.0,
            bonus_carrier_chance: 0.2,
            enemy_types: vec![
                TankType::EnemySimple,
                TankType::EnemyFast,
                TankType::EnemyMiddle,
                TankType::EnemyHeavy,
            ],

            ai_fire_interval: 1.0,
            ai_direction_min: 0.3,
            ai_direction_max: 3.0,

            fire_cooldown: 0.5,
            respawn_shield_time: 3.0,

            shield_time: 10.0,
            freeze_time: 10.0,
            protect_time: 20.0,
            protect_blink_time: 10.0,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings (max enemies: {})", settings.max_enemies);
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_enemies == 0 {
            return Err(SettingsError::Invalid("max_enemies must be at least 1"));
        }
        if self.enemy_types.is_empty() {
            return Err(SettingsError::Invalid("enemy_types must not be empty"));
        }
        if self.enemy_types.iter().any(|t| !t.is_enemy()) {
            return Err(SettingsError::Invalid("enemy_types may only list enemy types"));
        }
        if !(0.0..=1.0).contains(&self.bonus_carrier_chance) {
            return Err(SettingsError::Invalid(
                "bonus_carrier_chance must be between 0.0 and 1.0",
            ));
        }
        if self.ai_direction_min <= 0.0 || self.ai_direction_min > self.ai_direction_max {
            return Err(SettingsError::Invalid(
                "ai direction delay range must be positive and ordered",
            ));
        }
        let timings = [
            self.ai_direction_min,
            self.ai_direction_max,
            self.spawn_interval,
            self.enemy_spawn_delay,
            self.ai_fire_interval,
            self.fire_cooldown,
            self.respawn_shield_time,
            self.shield_time,
            self.freeze_time,
            self.protect_time,
            self.protect_blink_time,
        ];
        // NaN and infinities fall outside the range too
        if timings.iter().any(|t| !(0.0..=MAX_TIMING_SECS).contains(t)) {
            return Err(SettingsError::Invalid(
                "timings must be finite, non-negative and at most one hour",
            ));
        }
        Ok(())
    }
}

/// Seconds to `Duration`, saturating on values no `Duration` can hold
#[inline]
pub fn secs(seconds: f32) -> Duration {
    Duration::try_from_secs_f32(seconds.max(0.0)).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "max_enemies": 6, "freeze_time": 4.5 }"#)
            .expect("valid settings");
        assert_eq!(settings.max_enemies, 6);
        assert_eq!(settings.freeze_time, 4.5);
        assert_eq!(settings.spawn_interval, Settings::default().spawn_interval);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            enemy_types: vec![TankType::EnemyHeavy],
            ..Default::default()
        };
        let json = settings.to_json().expect("serializable");
        let parsed = Settings::from_json(&json).expect("parsable");
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_rejects_zero_cap() {
        let err = Settings::from_json(r#"{ "max_enemies": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_rejects_friendly_enemy_type() {
        let err = Settings::from_json(r#"{ "enemy_types": ["Level1"] }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_rejects_inverted_direction_range() {
        let settings = Settings {
            ai_direction_min: 2.0,
            ai_direction_max: 1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_rejects_oversized_timing() {
        let err = Settings::from_json(r#"{ "freeze_time": 1e20 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(Settings::from_json(r#"{ "freeze_time": 3600.0 }"#).is_ok());
    }

    #[test]
    fn test_rejects_infinite_direction_bound() {
        // 1e39 does not fit an f32 and parses as infinity
        let err = Settings::from_json(r#"{ "ai_direction_max": 1e39 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        let settings = Settings {
            ai_direction_max: f32::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_secs_saturates() {
        assert_eq!(secs(1.5), Duration::from_millis(1500));
        assert_eq!(secs(-2.0), Duration::ZERO);
        assert_eq!(secs(1e20), Duration::MAX);
        assert_eq!(secs(f32::INFINITY), Duration::MAX);
    }
}
