//! Gameplay logic shared by the game client and its tests.
//!
//! Everything here is backend-agnostic: pure functions over Bevy math types plus the
//! components, resources and messages the client systems operate on.

pub mod actions;
pub mod aim;
pub mod animation;
pub mod config;
pub mod movement;
pub mod player;

pub use actions::{
    ActionMessage, ActionPhase, ActionSnapshot, CharacterAction, ControlState, FireRequested,
};
pub use aim::{AimMarker, AimSolution, LookState};
pub use animation::{AnimatorParams, BlendWeights, DampedFloat, FireTrigger};
pub use config::{AimLayer, ConfigError, ControllerConfig, MovementTuning};
pub use movement::MovementState;
pub use player::*;
