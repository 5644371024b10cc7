//! Character movement and gravity
//!
//! Produces the translation handed to the kinematic character controller each frame.

use bevy::prelude::*;

use crate::config::MovementTuning;

/// Per-character movement state carried between frames.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementState {
    /// This frame's world-space movement direction. Y carries vertical velocity while airborne.
    pub direction: Vec3,
    /// Signed vertical velocity in m/s (negative is down).
    pub vertical_velocity: f32,
}

impl MovementState {
    /// Movement direction with the vertical component dropped.
    pub fn planar_direction(&self) -> Vec3 {
        Vec3::new(self.direction.x, 0.0, self.direction.z)
    }

    pub fn is_moving(&self) -> bool {
        self.planar_direction().length_squared() > 0.0
    }
}

/// Map a 2D movement input to a world-space direction.
///
/// In Bevy: +X is right, +Y is up, -Z is forward, so stick-up moves toward -Z.
pub fn movement_direction(input: Vec2) -> Vec3 {
    Vec3::new(input.x, 0.0, -input.y)
}

/// Update vertical velocity for one frame.
///
/// Airborne: accelerate downward, capped at `max_fall_speed`, and carry the result in
/// `direction.y`. Grounded: hold a small downward push so the controller stays in contact.
pub fn apply_gravity(state: &mut MovementState, grounded: bool, tuning: &MovementTuning, dt: f32) {
    if grounded {
        state.vertical_velocity = -tuning.grounded_push;
    } else {
        state.vertical_velocity =
            (state.vertical_velocity - tuning.gravity * dt).max(-tuning.max_fall_speed);
        state.direction.y = state.vertical_velocity;
    }
}

/// Step one frame and return the controller translation, if any.
///
/// Returns `None` when grounded without movement input; the controller is not moved then.
pub fn step(
    state: &mut MovementState,
    input: Vec2,
    speed: f32,
    grounded: bool,
    tuning: &MovementTuning,
    dt: f32,
) -> Option<Vec3> {
    state.direction = movement_direction(input);
    apply_gravity(state, grounded, tuning, dt);

    if grounded && !state.is_moving() {
        return None;
    }

    Some(state.planar_direction() * speed * dt + Vec3::Y * state.vertical_velocity * dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn input_maps_to_world_axes() {
        assert_eq!(movement_direction(Vec2::new(0.0, 1.0)), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(movement_direction(Vec2::new(1.0, 0.0)), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(movement_direction(Vec2::ZERO), Vec3::ZERO);
    }

    #[test]
    fn grounded_idle_does_not_move() {
        let tuning = MovementTuning::default();
        let mut state = MovementState::default();
        assert_eq!(step(&mut state, Vec2::ZERO, tuning.walk_speed, true, &tuning, DT), None);
        assert_eq!(state.vertical_velocity, -tuning.grounded_push);
    }

    #[test]
    fn grounded_walk_moves_at_speed_with_push() {
        let tuning = MovementTuning::default();
        let mut state = MovementState::default();
        let t = step(&mut state, Vec2::new(1.0, 0.0), 4.0, true, &tuning, 0.5).unwrap();
        assert!((t.x - 2.0).abs() < 1e-6);
        assert_eq!(t.z, 0.0);
        assert!((t.y + tuning.grounded_push * 0.5).abs() < 1e-6);
    }

    #[test]
    fn grounded_push_does_not_accumulate() {
        let tuning = MovementTuning::default();
        let mut state = MovementState::default();
        for _ in 0..120 {
            step(&mut state, Vec2::ZERO, tuning.walk_speed, true, &tuning, DT);
        }
        assert_eq!(state.vertical_velocity, -tuning.grounded_push);
    }

    #[test]
    fn airborne_falls_without_input() {
        let tuning = MovementTuning::default();
        let mut state = MovementState::default();
        let t = step(&mut state, Vec2::ZERO, tuning.walk_speed, false, &tuning, DT).unwrap();
        assert!(t.y < 0.0);
        assert_eq!(t.x, 0.0);
        assert!((state.vertical_velocity + tuning.gravity * DT).abs() < 1e-6);
        assert_eq!(state.direction.y, state.vertical_velocity);
        // Vertical velocity doesn't count as locomotion
        assert!(!state.is_moving());
    }

    #[test]
    fn fall_speed_is_capped() {
        let tuning = MovementTuning::default();
        let mut state = MovementState::default();
        for _ in 0..10_000 {
            step(&mut state, Vec2::ZERO, 0.0, false, &tuning, DT);
        }
        assert_eq!(state.vertical_velocity, -tuning.max_fall_speed);
    }

    #[test]
    fn landing_resets_vertical_velocity() {
        let tuning = MovementTuning::default();
        let mut state = MovementState::default();
        for _ in 0..30 {
            step(&mut state, Vec2::ZERO, 0.0, false, &tuning, DT);
        }
        assert!(state.vertical_velocity < -1.0);
        step(&mut state, Vec2::ZERO, 0.0, true, &tuning, DT);
        assert_eq!(state.vertical_velocity, -tuning.grounded_push);
    }
}
