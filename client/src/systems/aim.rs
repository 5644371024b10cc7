//! Mouse aim
//!
//! Casts a ray from the follow camera through the cursor against the aim layers and turns
//! the player toward the hit point.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use gunner_shared::aim;
use gunner_shared::{AimMarker, ControlState, ControllerConfig, LookState, Player};

use crate::camera::FollowCamera;
use crate::physics::aim_filter_groups;

pub fn aim_towards_cursor(
    controls: Res<ControlState>,
    config: Res<ControllerConfig>,
    rapier_context: ReadRapierContext,
    cameras: Query<(&Camera, &GlobalTransform), With<FollowCamera>>,
    mut players: Query<(Entity, &mut Transform, &mut LookState), With<Player>>,
    mut markers: Query<(&AimMarker, &mut Transform), Without<Player>>,
) {
    // Canceled aim skips the step like a miss does
    let Some(cursor) = controls.aim_input else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };
    let Ok(context) = rapier_context.single() else {
        return;
    };

    let filter = QueryFilter::new().groups(aim_filter_groups(&config.aim.layers));
    let hit = context
        .cast_ray(
            ray.origin,
            ray.direction.as_vec3(),
            config.aim.ray_length(),
            true,
            filter,
        )
        .map(|(_, distance)| ray.get_point(distance));

    apply_aim_hit(hit, &mut players, &mut markers);
}

/// Face each player toward `hit` and move its aim marker there.
///
/// A miss (`None`) leaves facing and marker where they were.
pub fn apply_aim_hit(
    hit: Option<Vec3>,
    players: &mut Query<(Entity, &mut Transform, &mut LookState), With<Player>>,
    markers: &mut Query<(&AimMarker, &mut Transform), Without<Player>>,
) {
    let Some(hit) = hit else {
        return;
    };

    for (entity, mut transform, mut look) in players.iter_mut() {
        let Some(solution) = aim::resolve(hit, transform.translation) else {
            continue;
        };
        transform.look_to(solution.looking_direction, Vec3::Y);
        look.looking_direction = solution.looking_direction;
        look.point = Some(solution.point);

        for (marker, mut marker_transform) in markers.iter_mut() {
            if marker.owner == entity {
                marker_transform.translation = solution.marker_position;
            }
        }
    }
}

/// Debug line from the player to the last aim point.
pub fn debug_draw_aim(mut gizmos: Gizmos, players: Query<(&Transform, &LookState), With<Player>>) {
    for (transform, look) in players.iter() {
        let Some(point) = look.point else {
            continue;
        };
        gizmos.line(transform.translation, point, Color::srgb(1.0, 0.3, 0.1));
        gizmos.sphere(point, 0.15, Color::srgb(1.0, 0.3, 0.1));
        gizmos.arrow(
            transform.translation,
            transform.translation + look.looking_direction.as_vec3(),
            Color::srgb(0.2, 1.0, 0.2),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stand-in for this frame's ray result
    #[derive(Resource)]
    struct RayHit(Option<Vec3>);

    fn aim_at_ray_hit(
        hit: Res<RayHit>,
        mut players: Query<(Entity, &mut Transform, &mut LookState), With<Player>>,
        mut markers: Query<(&AimMarker, &mut Transform), Without<Player>>,
    ) {
        apply_aim_hit(hit.0, &mut players, &mut markers);
    }

    fn aim_app(hit: Option<Vec3>) -> (App, Entity, Entity, Entity) {
        let mut app = App::new();
        app.insert_resource(RayHit(hit));
        app.add_systems(Update, aim_at_ray_hit);

        let player = app
            .world_mut()
            .spawn((
                Player,
                Transform::from_xyz(0.0, 1.0, 0.0),
                LookState::default(),
            ))
            .id();
        let marker = app
            .world_mut()
            .spawn((AimMarker { owner: player }, Transform::from_xyz(0.0, 1.0, -2.0)))
            .id();
        let foreign_marker = app
            .world_mut()
            .spawn((
                AimMarker {
                    owner: Entity::PLACEHOLDER,
                },
                Transform::from_xyz(9.0, 0.0, 9.0),
            ))
            .id();
        (app, player, marker, foreign_marker)
    }

    #[test]
    fn hit_turns_player_and_moves_its_marker() {
        let (mut app, player, marker, foreign_marker) = aim_app(Some(Vec3::new(3.0, 0.0, -4.0)));
        app.update();

        let transform = app.world().get::<Transform>(player).unwrap();
        let forward = transform.forward().as_vec3();
        assert!((forward - Vec3::new(0.6, 0.0, -0.8)).length() < 1e-5);
        // Facing only turns about Y
        assert!((transform.up().as_vec3() - Vec3::Y).length() < 1e-5);

        let look = app.world().get::<LookState>(player).unwrap();
        assert_eq!(look.point, Some(Vec3::new(3.0, 0.0, -4.0)));
        assert!((look.looking_direction.as_vec3() - forward).length() < 1e-5);

        let marker_pos = app.world().get::<Transform>(marker).unwrap().translation;
        assert_eq!(marker_pos, Vec3::new(3.0, 1.0, -4.0));
        let other = app.world().get::<Transform>(foreign_marker).unwrap().translation;
        assert_eq!(other, Vec3::new(9.0, 0.0, 9.0));
    }

    #[test]
    fn miss_changes_nothing() {
        let (mut app, player, marker, _) = aim_app(None);
        app.update();

        let transform = app.world().get::<Transform>(player).unwrap();
        assert_eq!(*transform, Transform::from_xyz(0.0, 1.0, 0.0));
        let look = app.world().get::<LookState>(player).unwrap();
        assert_eq!(look.point, None);
        assert_eq!(look.looking_direction, Dir3::NEG_Z);
        let marker_pos = app.world().get::<Transform>(marker).unwrap().translation;
        assert_eq!(marker_pos, Vec3::new(0.0, 1.0, -2.0));
    }

    #[test]
    fn hit_under_player_keeps_facing() {
        let (mut app, player, marker, _) = aim_app(Some(Vec3::new(0.0, 0.0, 0.0)));
        app.update();

        let transform = app.world().get::<Transform>(player).unwrap();
        assert_eq!(transform.rotation, Quat::IDENTITY);
        let marker_pos = app.world().get::<Transform>(marker).unwrap().translation;
        assert_eq!(marker_pos, Vec3::new(0.0, 1.0, -2.0));
    }
}
