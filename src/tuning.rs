//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be re-tuned from JSON
//! without touching the simulation. Defaults reproduce the shipped game.

use std::path::Path;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field}: spawn interval [{lo}, {hi}] must satisfy 0 < lo <= hi")]
    SpawnInterval { field: &'static str, lo: f32, hi: f32 },
    #[error("speed max {max} is below initial speed {initial}")]
    SpeedCeiling { initial: f32, max: f32 },
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
}

/// One scroll layer: two tiled segments of a single sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerTuning {
    pub sprite: String,
    /// Unscaled segment width
    pub segment_width: f32,
    pub scale: f32,
    pub y: f32,
    pub opacity: f32,
    /// Fraction of the game speed this layer scrolls at
    pub speed_factor: f32,
}

impl LayerTuning {
    /// Parallax background
    pub fn background() -> Self {
        Self {
            sprite: "chemical-bg".to_string(),
            segment_width: 1920.0,
            scale: 2.0,
            y: 0.0,
            opacity: 0.8,
            speed_factor: 0.05,
        }
    }

    /// Foreground platforms
    pub fn platforms() -> Self {
        Self {
            sprite: "platforms".to_string(),
            segment_width: 1280.0,
            scale: 4.0,
            y: 450.0,
            opacity: 1.0,
            speed_factor: 1.0,
        }
    }
}

/// Spawn parameters for one actor kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTuning {
    pub sprite: String,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub scale: f32,
    pub opacity: f32,
    /// Delay range (seconds) between consecutive spawns
    pub interval: (f32, f32),
}

impl SpawnTuning {
    pub fn enemy() -> Self {
        Self {
            sprite: "motobug".to_string(),
            spawn_x: 1950.0,
            spawn_y: 773.0,
            scale: 1.0,
            opacity: 1.0,
            interval: (0.5, 2.5),
        }
    }

    pub fn collectible() -> Self {
        Self {
            sprite: "ring".to_string(),
            spawn_x: 1950.0,
            spawn_y: 745.0,
            scale: 1.0,
            opacity: 1.0,
            interval: (0.5, 3.0),
        }
    }
}

/// Deserialize a partial JSON object on top of `base`
fn overlay<'de, D, T>(base: T, deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Serialize + DeserializeOwned,
{
    let patch = serde_json::Value::deserialize(deserializer)?;
    let mut merged = serde_json::to_value(base).map_err(D::Error::custom)?;
    match (&mut merged, patch) {
        (serde_json::Value::Object(fields), serde_json::Value::Object(overrides)) => {
            fields.extend(overrides);
        }
        (_, other) => {
            return Err(D::Error::custom(format!("expected an object, got {other}")));
        }
    }
    serde_json::from_value(merged).map_err(D::Error::custom)
}

fn background_layer<'de, D: Deserializer<'de>>(d: D) -> Result<LayerTuning, D::Error> {
    overlay(LayerTuning::background(), d)
}

fn platforms_layer<'de, D: Deserializer<'de>>(d: D) -> Result<LayerTuning, D::Error> {
    overlay(LayerTuning::platforms(), d)
}

fn enemy_spawn<'de, D: Deserializer<'de>>(d: D) -> Result<SpawnTuning, D::Error> {
    overlay(SpawnTuning::enemy(), d)
}

fn collectible_spawn<'de, D: Deserializer<'de>>(d: D) -> Result<SpawnTuning, D::Error> {
    overlay(SpawnTuning::collectible(), d)
}

/// Volume for each audio cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueVolumes {
    pub ambient: f32,
    pub effects: f32,
}

impl Default for CueVolumes {
    fn default() -> Self {
        Self {
            ambient: 0.08,
            effects: 0.1,
        }
    }
}

/// Complete gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speed ===
    pub initial_speed: f32,
    pub speed_increment: f32,
    pub max_speed: f32,
    /// Seconds between speed increments
    pub speed_period: f32,

    // === World ===
    pub gravity: f32,
    pub ground_y: f32,
    pub ground_width: f32,
    pub ground_height: f32,
    /// Actors left of this x are recycled
    pub exit_threshold: f32,
    #[serde(deserialize_with = "background_layer")]
    pub background: LayerTuning,
    #[serde(deserialize_with = "platforms_layer")]
    pub platforms: LayerTuning,

    // === Spawning ===
    #[serde(deserialize_with = "enemy_spawn")]
    pub enemy: SpawnTuning,
    #[serde(deserialize_with = "collectible_spawn")]
    pub collectible: SpawnTuning,

    // === Scoring ===
    pub enemy_points: u64,
    pub collectible_points: u64,
    /// Collision gate stays closed this long after a handled event
    pub gate_cooldown: f32,
    /// How long the score callout stays on screen
    pub callout_duration: f32,

    // === Audio ===
    pub volumes: CueVolumes,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_speed: 300.0,
            speed_increment: 50.0,
            max_speed: 3000.0,
            speed_period: 1.0,

            gravity: 3100.0,
            ground_y: 832.0,
            ground_width: 1920.0,
            ground_height: 300.0,
            exit_threshold: -100.0,
            background: LayerTuning::background(),
            platforms: LayerTuning::platforms(),

            enemy: SpawnTuning::enemy(),
            collectible: SpawnTuning::collectible(),

            enemy_points: 10,
            collectible_points: 1,
            gate_cooldown: 0.5,
            callout_duration: 1.0,

            volumes: CueVolumes::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string (missing fields keep defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.initial_speed <= 0.0 {
            return Err(TuningError::NotPositive {
                field: "initial_speed",
                value: self.initial_speed,
            });
        }
        // Speed never goes down during a run
        if self.speed_increment < 0.0 {
            return Err(TuningError::Negative {
                field: "speed_increment",
                value: self.speed_increment,
            });
        }
        if self.max_speed < self.initial_speed {
            return Err(TuningError::SpeedCeiling {
                initial: self.initial_speed,
                max: self.max_speed,
            });
        }

        for (field, (lo, hi)) in [
            ("enemy.interval", self.enemy.interval),
            ("collectible.interval", self.collectible.interval),
        ] {
            if !(lo > 0.0 && lo <= hi) {
                return Err(TuningError::SpawnInterval { field, lo, hi });
            }
        }

        let positives = [
            ("speed_period", self.speed_period),
            ("gate_cooldown", self.gate_cooldown),
            ("callout_duration", self.callout_duration),
            ("background.segment_width", self.background.segment_width),
            ("background.scale", self.background.scale),
            ("platforms.segment_width", self.platforms.segment_width),
            ("platforms.scale", self.platforms.scale),
            ("enemy.scale", self.enemy.scale),
            ("collectible.scale", self.collectible.scale),
        ];
        for (field, value) in positives {
            if value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.background.scale, 2.0);
        assert_eq!(tuning.platforms.segment_width, 1280.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "initial_speed": 400.0, "max_speed": 900.0 }"#)
            .expect("valid tuning");
        assert_eq!(tuning.initial_speed, 400.0);
        assert_eq!(tuning.max_speed, 900.0);
        assert_eq!(tuning.speed_increment, 50.0);
        assert_eq!(tuning.enemy.interval, (0.5, 2.5));
    }

    #[test]
    fn test_rejects_inverted_interval() {
        let mut tuning = Tuning::default();
        tuning.collectible.interval = (3.0, 0.5);
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::SpawnInterval { field: "collectible.interval", .. })
        ));
    }

    #[test]
    fn test_rejects_low_ceiling() {
        let err = Tuning::from_json(r#"{ "initial_speed": 500.0, "max_speed": 100.0 }"#);
        assert!(matches!(err, Err(TuningError::SpeedCeiling { .. })));
    }

    #[test]
    fn test_rejects_zero_scale() {
        let mut tuning = Tuning::default();
        tuning.platforms.scale = 0.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotPositive { field: "platforms.scale", .. })
        ));
    }

    #[test]
    fn test_rejects_negative_increment() {
        let err = Tuning::from_json(r#"{ "speed_increment": -50.0 }"#);
        assert!(matches!(
            err,
            Err(TuningError::Negative { field: "speed_increment", .. })
        ));

        // A flat ramp is allowed
        let flat = Tuning::from_json(r#"{ "speed_increment": 0.0 }"#).expect("valid tuning");
        assert_eq!(flat.speed_increment, 0.0);
    }

    #[test]
    fn test_rejects_non_positive_initial_speed() {
        for json in [r#"{ "initial_speed": 0.0 }"#, r#"{ "initial_speed": -300.0 }"#] {
            assert!(matches!(
                Tuning::from_json(json),
                Err(TuningError::NotPositive { field: "initial_speed", .. })
            ));
        }
    }

    #[test]
    fn test_partial_layer_keeps_its_own_defaults() {
        let tuning = Tuning::from_json(r#"{ "background": { "opacity": 0.5 } }"#)
            .expect("valid tuning");
        let expected = LayerTuning {
            opacity: 0.5,
            ..LayerTuning::background()
        };
        assert_eq!(tuning.background, expected);
        assert_eq!(tuning.platforms, LayerTuning::platforms());

        let tuning = Tuning::from_json(r#"{ "platforms": { "y": 500.0 } }"#)
            .expect("valid tuning");
        assert_eq!(tuning.platforms.sprite, "platforms");
        assert_eq!(tuning.platforms.y, 500.0);
        assert_eq!(tuning.platforms.speed_factor, 1.0);
    }

    #[test]
    fn test_partial_spawn_keeps_its_own_defaults() {
        let tuning = Tuning::from_json(
            r#"{ "collectible": { "interval": [1.0, 2.0], "scale": 1.5 } }"#,
        )
        .expect("valid tuning");
        assert_eq!(tuning.collectible.sprite, "ring");
        assert_eq!(tuning.collectible.spawn_y, 745.0);
        assert_eq!(tuning.collectible.interval, (1.0, 2.0));
        assert_eq!(tuning.collectible.scale, 1.5);
        assert_eq!(tuning.enemy, SpawnTuning::enemy());
    }

    #[test]
    fn test_layer_override_must_be_object() {
        assert!(matches!(
            Tuning::from_json(r#"{ "background": 3 }"#),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(TuningError::Parse(_))));
    }
}
