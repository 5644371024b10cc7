//! Mouse aiming
//!
//! Turns the point the cursor ray hit into a horizontal facing direction and an aim
//! marker position at the character's height.

use bevy::prelude::*;

/// Result of aiming at a world point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimSolution {
    /// Horizontal unit direction from the character toward the hit point.
    pub looking_direction: Dir3,
    /// Hit point lifted (or lowered) to the character's height.
    pub marker_position: Vec3,
    pub point: Vec3,
}

/// Last successful aim for a character.
#[derive(Component, Debug, Clone, Copy)]
pub struct LookState {
    pub looking_direction: Dir3,
    pub point: Option<Vec3>,
}

impl Default for LookState {
    fn default() -> Self {
        Self {
            looking_direction: Dir3::NEG_Z,
            point: None,
        }
    }
}

/// The entity moved to the aim point (IK/look target and on-ground reticle).
#[derive(Component, Debug, Clone, Copy)]
pub struct AimMarker {
    pub owner: Entity,
}

/// Aim at `hit_point` from `character_position`.
///
/// Returns `None` when the hit is straight above or below the character; there is no
/// horizontal direction to face then.
pub fn resolve(hit_point: Vec3, character_position: Vec3) -> Option<AimSolution> {
    let mut to_hit = hit_point - character_position;
    to_hit.y = 0.0;
    let looking_direction = Dir3::new(to_hit).ok()?;

    Some(AimSolution {
        looking_direction,
        marker_position: Vec3::new(hit_point.x, character_position.y, hit_point.z),
        point: hit_point,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_flattened_and_normalized() {
        let aim = resolve(Vec3::new(3.0, -1.0, 4.0), Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let dir = aim.looking_direction.as_vec3();
        assert_eq!(dir.y, 0.0);
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
        assert!((dir.z - 0.8).abs() < 1e-6);
    }

    #[test]
    fn marker_sits_at_character_height() {
        let aim = resolve(Vec3::new(5.0, 0.0, -2.0), Vec3::new(1.0, 0.9, 1.0)).unwrap();
        assert_eq!(aim.marker_position, Vec3::new(5.0, 0.9, -2.0));
        assert_eq!(aim.point, Vec3::new(5.0, 0.0, -2.0));
    }

    #[test]
    fn hit_directly_below_has_no_facing() {
        assert!(resolve(Vec3::new(2.0, 0.0, 2.0), Vec3::new(2.0, 0.9, 2.0)).is_none());
    }
}
