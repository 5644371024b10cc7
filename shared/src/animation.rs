//! Locomotion animation parameters
//!
//! The character's movement is reduced to a handful of animator parameters: damped
//! lateral/forward velocity for a directional blend, a running flag, and a fire trigger.

use bevy::prelude::*;

/// A float parameter that approaches its target over `damp_time` seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DampedFloat {
    pub value: f32,
}

impl DampedFloat {
    pub fn update(&mut self, target: f32, damp_time: f32, dt: f32) -> f32 {
        if damp_time <= 0.0 {
            self.value = target;
        } else {
            let t = 1.0 - (-dt / damp_time).exp();
            self.value += (target - self.value) * t;
        }
        self.value
    }
}

/// Animator parameters for one character.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimatorParams {
    /// How much the character moves toward its own right (-1..1).
    pub x_velocity: DampedFloat,
    /// How much the character moves toward its own forward (-1..1).
    pub z_velocity: DampedFloat,
    pub is_running: bool,
}

impl AnimatorParams {
    /// Feed this frame's planar movement direction and facing into the parameters.
    ///
    /// `right` and `forward` are the character's current local axes in world space.
    pub fn update(
        &mut self,
        planar_direction: Vec3,
        right: Vec3,
        forward: Vec3,
        running: bool,
        damp_time: f32,
        dt: f32,
    ) {
        let dir = planar_direction.normalize_or_zero();
        self.x_velocity.update(dir.dot(right), damp_time, dt);
        self.z_velocity.update(dir.dot(forward), damp_time, dt);
        self.is_running = running && dir != Vec3::ZERO;
    }
}

/// One-shot fire trigger; stays set until the animation driver consumes it.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireTrigger {
    pending: bool,
}

impl FireTrigger {
    pub fn set(&mut self) {
        self.pending = true;
    }

    pub fn is_set(&self) -> bool {
        self.pending
    }

    /// Returns `true` once per `set`.
    pub fn consume(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Weights for a five-clip directional blend; always sums to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlendWeights {
    pub idle: f32,
    pub forward: f32,
    pub backward: f32,
    pub left: f32,
    pub right: f32,
}

impl BlendWeights {
    pub fn from_velocity(x: f32, z: f32) -> Self {
        let x = x.clamp(-1.0, 1.0);
        let z = z.clamp(-1.0, 1.0);
        let mut w = Self {
            idle: (1.0 - x.abs() - z.abs()).max(0.0),
            forward: z.max(0.0),
            backward: (-z).max(0.0),
            left: (-x).max(0.0),
            right: x.max(0.0),
        };
        let total = w.idle + w.forward + w.backward + w.left + w.right;
        if total > 0.0 {
            w.idle /= total;
            w.forward /= total;
            w.backward /= total;
            w.left /= total;
            w.right /= total;
        } else {
            w.idle = 1.0;
        }
        w
    }

    pub fn sum(&self) -> f32 {
        self.idle + self.forward + self.backward + self.left + self.right
    }
}
