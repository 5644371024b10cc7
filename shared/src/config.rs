//! Controller configuration loaded from `controller.ron`.
//!
//! Every field has a default so a partial file only overrides what it names.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::{
    ANIMATOR_DAMP_TIME, GRAVITY, GROUNDED_PUSH, MAX_FALL_SPEED, RUN_SPEED, WALK_SPEED,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Physics layers the aim ray can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AimLayer {
    Character,
    Ground,
    Obstacle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub gravity: f32,
    pub grounded_push: f32,
    pub max_fall_speed: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            run_speed: RUN_SPEED,
            gravity: GRAVITY,
            grounded_push: GROUNDED_PUSH,
            max_fall_speed: MAX_FALL_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    /// Layers the cursor ray is tested against.
    pub layers: Vec<AimLayer>,
    /// `None` casts an unbounded ray.
    pub max_distance: Option<f32>,
    pub show_marker: bool,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            layers: vec![AimLayer::Ground, AimLayer::Obstacle],
            max_distance: None,
            show_marker: true,
        }
    }
}

impl AimConfig {
    pub fn ray_length(&self) -> f32 {
        self.max_distance.unwrap_or(f32::MAX)
    }
}

/// glTF clip indices (`#AnimationN`) for the character model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipIndices {
    pub idle: usize,
    pub walk_forward: usize,
    pub walk_backward: usize,
    pub walk_left: usize,
    pub walk_right: usize,
    pub run_forward: usize,
    pub run_backward: usize,
    pub run_left: usize,
    pub run_right: usize,
    pub fire: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterModelConfig {
    /// Asset path of the glTF file, without a label.
    pub path: String,
    pub clips: ClipIndices,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub damp_time: f32,
    /// `None` renders a plain capsule and skips the animation graph.
    pub model: Option<CharacterModelConfig>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            damp_time: ANIMATOR_DAMP_TIME,
            model: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position relative to the character.
    pub offset: Vec3,
    pub follow_rate: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 11.0, 8.0),
            follow_rate: 8.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub physics: bool,
    pub draw_aim: bool,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub movement: MovementTuning,
    pub aim: AimConfig,
    pub animation: AnimationConfig,
    pub camera: CameraConfig,
    pub debug: DebugConfig,
}

impl ControllerConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        if m.walk_speed < 0.0 || m.run_speed < 0.0 {
            return Err(ConfigError::Invalid("speeds must be non-negative".into()));
        }
        if m.run_speed < m.walk_speed {
            return Err(ConfigError::Invalid(format!(
                "run_speed ({}) is slower than walk_speed ({})",
                m.run_speed, m.walk_speed
            )));
        }
        if m.gravity < 0.0 || m.grounded_push < 0.0 {
            return Err(ConfigError::Invalid(
                "gravity and grounded_push are magnitudes and must be non-negative".into(),
            ));
        }
        if m.max_fall_speed <= 0.0 {
            return Err(ConfigError::Invalid("max_fall_speed must be positive".into()));
        }
        if self.animation.damp_time < 0.0 {
            return Err(ConfigError::Invalid("damp_time must be non-negative".into()));
        }
        if self.aim.layers.is_empty() {
            return Err(ConfigError::Invalid(
                "aim.layers is empty; the aim ray could never hit".into(),
            ));
        }
        if let Some(d) = self.aim.max_distance {
            if d <= 0.0 {
                return Err(ConfigError::Invalid("aim.max_distance must be positive".into()));
            }
        }
        Ok(())
    }
}
