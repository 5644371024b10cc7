//! Third-person follow camera
//!
//! Sits at a fixed world-space offset from the player and looks at them. It is also the
//! camera the aim ray is cast from.

use bevy::prelude::*;
use gunner_shared::{ControllerConfig, Player, PLAYER_HEIGHT, SPAWN_POSITION};

/// Marker for the gameplay camera
#[derive(Component)]
pub struct FollowCamera;

/// Camera pose for a target position: `offset` away from it, looking at its chest.
pub fn follow_pose(target: Vec3, offset: Vec3) -> (Vec3, Quat) {
    let look_at = target + Vec3::Y * (PLAYER_HEIGHT * 0.25);
    let eye = target + offset;
    let rotation = Transform::from_translation(eye).looking_at(look_at, Vec3::Y).rotation;
    (eye, rotation)
}

pub fn spawn_camera(mut commands: Commands, config: Res<ControllerConfig>) {
    let (eye, rotation) = follow_pose(Vec3::from(SPAWN_POSITION), config.camera.offset);
    commands.spawn((
        FollowCamera,
        Camera3d::default(),
        Transform::from_translation(eye).with_rotation(rotation),
    ));
    commands.insert_resource(ClearColor(Color::srgb(0.52, 0.62, 0.72)));
}

/// Smoothly follow the player
pub fn update_camera(
    player_query: Query<&Transform, (With<Player>, Without<FollowCamera>)>,
    mut camera_query: Query<&mut Transform, (With<FollowCamera>, Without<Player>)>,
    config: Res<ControllerConfig>,
    time: Res<Time>,
) {
    let Ok(player_transform) = player_query.single() else {
        return;
    };
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let (target_pos, target_rot) = follow_pose(player_transform.translation, config.camera.offset);
    let t = 1.0_f32 - (-config.camera.follow_rate * time.delta_secs()).exp();
    camera_transform.translation = camera_transform.translation.lerp(target_pos, t);
    camera_transform.rotation = camera_transform.rotation.slerp(target_rot, t);
}
