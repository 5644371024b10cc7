//! World systems
//!
//! The arena: lights, the ground slab, perimeter walls and scattered crates. Everything
//! the aim ray can hit sits on the `Ground` or `Obstacle` layer.

use bevy::light::CascadeShadowConfigBuilder;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use gunner_shared::AimLayer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::physics::collider_groups;

/// Half the side length of the square arena
pub const ARENA_HALF_EXTENT: f32 = 30.0;

const WALL_HEIGHT: f32 = 2.5;
const WALL_THICKNESS: f32 = 1.0;
const CRATE_COUNT: usize = 16;
const CRATE_SEED: u64 = 0x6a75_6e6e_6572;
/// No crates this close to the spawn point
const SPAWN_CLEAR_RADIUS: f32 = 4.0;

/// Root entity for all world visuals
#[derive(Component)]
pub struct ArenaRoot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CratePlacement {
    pub position: Vec2,
    pub size: f32,
    pub yaw: f32,
}

/// Deterministic crate layout inside the arena, clear of the spawn point.
pub fn scatter_crates(seed: u64, count: usize) -> Vec<CratePlacement> {
    let mut rng = StdRng::seed_from_u64(seed);
    let limit = ARENA_HALF_EXTENT - WALL_THICKNESS - 2.0;
    let mut crates = Vec::with_capacity(count);
    while crates.len() < count {
        let position = Vec2::new(rng.gen_range(-limit..limit), rng.gen_range(-limit..limit));
        if position.length() < SPAWN_CLEAR_RADIUS {
            continue;
        }
        crates.push(CratePlacement {
            position,
            size: rng.gen_range(0.8..2.0),
            yaw: rng.gen_range(0.0..std::f32::consts::TAU),
        });
    }
    crates
}

pub fn spawn_world(
    mut commands: Commands,
    world_roots: Query<Entity, With<ArenaRoot>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !world_roots.is_empty() {
        return;
    }

    let root = commands
        .spawn((ArenaRoot, Transform::default(), Visibility::default()))
        .id();

    let sun = commands
        .spawn((
            DirectionalLight {
                illuminance: 12_000.0,
                shadows_enabled: true,
                color: Color::srgb(1.0, 0.97, 0.9),
                ..default()
            },
            CascadeShadowConfigBuilder {
                num_cascades: 2,
                maximum_distance: 60.0,
                first_cascade_far_bound: 15.0,
                ..default()
            }
            .build(),
            Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
        ))
        .id();
    commands.entity(root).add_child(sun);

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.85, 0.88, 0.95),
        brightness: 300.0,
        affects_lightmapped_meshes: true,
    });

    // --- Ground ---
    let ground = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(ARENA_HALF_EXTENT * 2.0, 1.0, ARENA_HALF_EXTENT * 2.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.35, 0.4, 0.33),
                perceptual_roughness: 0.95,
                ..default()
            })),
            Transform::from_xyz(0.0, -0.5, 0.0),
            Collider::cuboid(ARENA_HALF_EXTENT, 0.5, ARENA_HALF_EXTENT),
            collider_groups(AimLayer::Ground),
        ))
        .id();
    commands.entity(root).add_child(ground);

    // --- Perimeter walls ---
    let wall_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.6, 0.6, 0.65),
        perceptual_roughness: 0.9,
        ..default()
    });
    let edge = ARENA_HALF_EXTENT - WALL_THICKNESS * 0.5;
    let y = WALL_HEIGHT * 0.5;
    // Half extents of the north/south and east/west walls
    let ns_half = Vec3::new(ARENA_HALF_EXTENT, y, WALL_THICKNESS * 0.5);
    let ew_half = Vec3::new(WALL_THICKNESS * 0.5, y, ARENA_HALF_EXTENT);
    for (center, half) in [
        (Vec3::new(0.0, y, -edge), ns_half),
        (Vec3::new(0.0, y, edge), ns_half),
        (Vec3::new(-edge, y, 0.0), ew_half),
        (Vec3::new(edge, y, 0.0), ew_half),
    ] {
        let wall = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::from_size(half * 2.0))),
                MeshMaterial3d(wall_material.clone()),
                Transform::from_translation(center),
                Collider::cuboid(half.x, half.y, half.z),
                collider_groups(AimLayer::Obstacle),
            ))
            .id();
        commands.entity(root).add_child(wall);
    }

    // --- Crates ---
    let crate_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.4, 0.25),
        perceptual_roughness: 0.8,
        ..default()
    });
    let crates = scatter_crates(CRATE_SEED, CRATE_COUNT);
    for placement in &crates {
        let half = placement.size * 0.5;
        let entity = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::from_length(placement.size))),
                MeshMaterial3d(crate_material.clone()),
                Transform::from_xyz(placement.position.x, half, placement.position.y)
                    .with_rotation(Quat::from_rotation_y(placement.yaw)),
                Collider::cuboid(half, half, half),
                collider_groups(AimLayer::Obstacle),
            ))
            .id();
        commands.entity(root).add_child(entity);
    }

    info!("Spawned arena ({} crates)", crates.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_layout_is_deterministic() {
        assert_eq!(scatter_crates(7, 10), scatter_crates(7, 10));
    }

    #[test]
    fn crates_stay_in_arena_and_clear_spawn() {
        for c in scatter_crates(CRATE_SEED, 64) {
            assert!(c.position.length() >= SPAWN_CLEAR_RADIUS);
            assert!(c.position.x.abs() + c.size * 0.5 < ARENA_HALF_EXTENT - WALL_THICKNESS);
            assert!(c.position.y.abs() + c.size * 0.5 < ARENA_HALF_EXTENT - WALL_THICKNESS);
        }
    }
}
