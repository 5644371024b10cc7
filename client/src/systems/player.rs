//! Player character systems
//!
//! Spawning, per-frame movement through the kinematic character controller, and fire
//! requests.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use gunner_shared::movement;
use gunner_shared::{
    AimLayer, AimMarker, AnimatorParams, ControlState, ControllerConfig, FireRequested, FireTrigger,
    LookState, MovementState, Player, PLAYER_HEIGHT, PLAYER_RADIUS, SPAWN_POSITION,
};

use super::animation::{CharacterAssets, CharacterModelRoot, NeedsRigSetup};
use crate::physics::collider_groups;

/// Spawn the player, its visual model and its aim marker (once).
pub fn spawn_player(
    mut commands: Commands,
    existing: Query<(), With<Player>>,
    config: Res<ControllerConfig>,
    character_assets: Option<Res<CharacterAssets>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !existing.is_empty() {
        return;
    }

    let spawn = Vec3::from(SPAWN_POSITION);
    let player = commands
        .spawn((
            Player,
            Name::new("Player"),
            Transform::from_translation(spawn),
            Visibility::default(),
            Collider::capsule_y(PLAYER_HEIGHT * 0.5 - PLAYER_RADIUS, PLAYER_RADIUS),
            collider_groups(AimLayer::Character),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.02),
                snap_to_ground: Some(CharacterLength::Absolute(0.3)),
                ..default()
            },
            MovementState::default(),
            LookState::default(),
            AnimatorParams::default(),
            FireTrigger::default(),
        ))
        .id();

    // Our player origin is at the capsule center, so visuals are offset down to the feet.
    let model = match character_assets {
        Some(assets) => commands
            .spawn((
                CharacterModelRoot,
                NeedsRigSetup,
                SceneRoot(assets.scene.clone()),
                // glTF models face +Z; the character faces -Z.
                Transform::from_xyz(0.0, -PLAYER_HEIGHT * 0.5, 0.0)
                    .with_rotation(Quat::from_rotation_y(std::f32::consts::PI)),
            ))
            .id(),
        None => {
            let body = commands
                .spawn((
                    Mesh3d(meshes.add(Capsule3d::new(
                        PLAYER_RADIUS,
                        PLAYER_HEIGHT - 2.0 * PLAYER_RADIUS,
                    ))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: Color::srgb(0.2, 0.45, 0.8),
                        perceptual_roughness: 0.6,
                        ..default()
                    })),
                    Transform::default(),
                ))
                .id();
            // Small block on the front so facing is visible
            let nose = commands
                .spawn((
                    Mesh3d(meshes.add(Cuboid::new(0.15, 0.15, 0.3))),
                    MeshMaterial3d(materials.add(Color::srgb(0.9, 0.9, 0.2))),
                    Transform::from_xyz(0.0, PLAYER_HEIGHT * 0.25, -PLAYER_RADIUS),
                ))
                .id();
            commands.entity(body).add_child(nose);
            body
        }
    };
    commands.entity(player).add_child(model);

    let marker_visibility = if config.aim.show_marker {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    commands.spawn((
        AimMarker { owner: player },
        Name::new("Aim"),
        Mesh3d(meshes.add(Torus::new(0.18, 0.25))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.95, 0.2, 0.2),
            unlit: true,
            ..default()
        })),
        Transform::from_translation(spawn + Vec3::NEG_Z * 2.0),
        marker_visibility,
    ));

    info!("Player spawned at {:?}", spawn);
}

/// Move the player: input direction, gravity, then hand the translation to the controller.
pub fn apply_movement(
    time: Res<Time>,
    controls: Res<ControlState>,
    config: Res<ControllerConfig>,
    mut players: Query<
        (
            &mut KinematicCharacterController,
            Option<&KinematicCharacterControllerOutput>,
            &mut MovementState,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();
    let speed = controls.speed(&config.movement);

    for (mut controller, output, mut state) in players.iter_mut() {
        // No output yet means the controller hasn't moved; treat as airborne so we settle.
        let grounded = output.map(|o| o.grounded).unwrap_or(false);
        controller.translation = movement::step(
            &mut state,
            controls.move_input,
            speed,
            grounded,
            &config.movement,
            dt,
        );
    }
}

/// Shoot: arm the fire trigger on the player.
pub fn handle_fire_requests(
    mut requests: MessageReader<FireRequested>,
    mut triggers: Query<&mut FireTrigger, With<Player>>,
) {
    if requests.read().count() == 0 {
        return;
    }
    for mut trigger in triggers.iter_mut() {
        trigger.set();
    }
    debug!("Fire");
}
