//! Player-related constants and marker types

use bevy::prelude::*;

/// Player height (for capsule)
pub const PLAYER_HEIGHT: f32 = 1.8;

/// Player radius (for capsule)
pub const PLAYER_RADIUS: f32 = 0.3;

/// Default walking speed (units per second)
pub const WALK_SPEED: f32 = 3.0;

/// Default running speed (units per second)
pub const RUN_SPEED: f32 = 6.0;

/// Gravity in m/s^2, applied downward while airborne
pub const GRAVITY: f32 = 9.81;

/// Downward velocity held while grounded so the controller keeps ground contact
pub const GROUNDED_PUSH: f32 = 0.5;

/// Fall speed cap in m/s
pub const MAX_FALL_SPEED: f32 = 50.0;

/// Animator parameter damping time in seconds
pub const ANIMATOR_DAMP_TIME: f32 = 0.1;

/// Spawn position for the player (slightly above the ground slab)
pub const SPAWN_POSITION: [f32; 3] = [0.0, 2.0, 0.0];

/// Marker for the player-controlled character
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Player;
