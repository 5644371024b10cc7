//! Character animation
//!
//! Loads the character model and its clips, builds a blend graph (idle, walk and run
//! directional sets, fire), and drives clip weights from the player's animator parameters.

use bevy::animation::graph::{AnimationGraph, AnimationGraphHandle, AnimationNodeIndex};
use bevy::animation::AnimationClip;
use bevy::prelude::*;
use gunner_shared::{
    AnimatorParams, BlendWeights, ControlState, ControllerConfig, FireTrigger, MovementState,
    Player,
};

// =============================================================================
// COMPONENTS & RESOURCES
// =============================================================================

/// Graph nodes for one directional clip set
#[derive(Clone, Copy, Debug)]
pub struct DirectionalNodes {
    pub forward: AnimationNodeIndex,
    pub backward: AnimationNodeIndex,
    pub left: AnimationNodeIndex,
    pub right: AnimationNodeIndex,
}

impl DirectionalNodes {
    fn iter(&self) -> impl Iterator<Item = AnimationNodeIndex> {
        [self.forward, self.backward, self.left, self.right].into_iter()
    }
}

/// Loaded character model + animation graph
#[derive(Resource, Clone)]
pub struct CharacterAssets {
    pub scene: Handle<Scene>,
    pub animation_graph: Handle<AnimationGraph>,
    pub idle: AnimationNodeIndex,
    pub walk: DirectionalNodes,
    pub run: DirectionalNodes,
    pub fire: AnimationNodeIndex,
}

/// The entity we spawn `SceneRoot` onto for the character model
#[derive(Component)]
pub struct CharacterModelRoot;

/// Model spawned, but the glTF hierarchy (and its `AnimationPlayer`) may not exist yet
#[derive(Component)]
pub struct NeedsRigSetup;

/// The entity carrying the model's `AnimationPlayer`
#[derive(Component)]
pub struct CharacterAnimationRoot;

/// The Player entity that owns this rig (cached to avoid per-frame hierarchy walks)
#[derive(Component, Clone, Copy)]
pub struct RigOwner(pub Entity);

// =============================================================================
// ASSET LOADING
// =============================================================================

/// Load the character model and build its animation graph.
///
/// Without a configured model the resource is never inserted and the player is drawn as a
/// capsule.
pub fn setup_character_assets(
    mut commands: Commands,
    config: Res<ControllerConfig>,
    asset_server: Res<AssetServer>,
    mut animation_graphs: ResMut<Assets<AnimationGraph>>,
    mut loaded: Local<bool>,
) {
    // Runs on every resume
    if *loaded {
        return;
    }
    *loaded = true;

    let Some(model) = config.animation.model.as_ref() else {
        info!("No character model configured; using capsule");
        return;
    };

    let scene: Handle<Scene> = asset_server.load(format!("{}#Scene0", model.path));
    let clip = |index: usize| -> Handle<AnimationClip> {
        asset_server.load(format!("{}#Animation{}", model.path, index))
    };
    let clips = &model.clips;

    let mut graph = AnimationGraph::new();
    let locomotion = graph.add_blend(1.0, graph.root);
    let idle = graph.add_clip(clip(clips.idle), 1.0, locomotion);

    let walk_blend = graph.add_blend(1.0, locomotion);
    let walk = DirectionalNodes {
        forward: graph.add_clip(clip(clips.walk_forward), 1.0, walk_blend),
        backward: graph.add_clip(clip(clips.walk_backward), 1.0, walk_blend),
        left: graph.add_clip(clip(clips.walk_left), 1.0, walk_blend),
        right: graph.add_clip(clip(clips.walk_right), 1.0, walk_blend),
    };

    let run_blend = graph.add_blend(1.0, locomotion);
    let run = DirectionalNodes {
        forward: graph.add_clip(clip(clips.run_forward), 1.0, run_blend),
        backward: graph.add_clip(clip(clips.run_backward), 1.0, run_blend),
        left: graph.add_clip(clip(clips.run_left), 1.0, run_blend),
        right: graph.add_clip(clip(clips.run_right), 1.0, run_blend),
    };

    let fire = graph.add_clip(clip(clips.fire), 1.0, graph.root);

    commands.insert_resource(CharacterAssets {
        scene,
        animation_graph: animation_graphs.add(graph),
        idle,
        walk,
        run,
        fire,
    });

    info!("Loaded character assets from {}", model.path);
}

// =============================================================================
// RIG SETUP & ANIMATION
// =============================================================================

/// Once the model's scene is spawned, attach the graph to its `AnimationPlayer` and start
/// every looping clip (weights are driven per frame).
pub fn setup_character_rig(
    mut commands: Commands,
    assets: Option<Res<CharacterAssets>>,
    model_roots: Query<(Entity, &ChildOf), (With<CharacterModelRoot>, With<NeedsRigSetup>)>,
    children_q: Query<&Children>,
    mut anim_players: Query<&mut AnimationPlayer>,
) {
    let Some(assets) = assets else { return };

    for (model_root, child_of) in model_roots.iter() {
        let mut stack: Vec<Entity> = vec![model_root];
        let mut rig_root: Option<Entity> = None;
        while let Some(e) = stack.pop() {
            if anim_players.contains(e) {
                rig_root = Some(e);
                break;
            }
            if let Ok(children) = children_q.get(e) {
                stack.extend(children.iter());
            }
        }

        let Some(rig_root) = rig_root else {
            // Scene not spawned yet (assets still loading).
            continue;
        };
        let Ok(mut player) = anim_players.get_mut(rig_root) else {
            continue;
        };

        player.play(assets.idle).repeat().set_weight(1.0);
        for node in assets.walk.iter().chain(assets.run.iter()) {
            player.play(node).repeat().set_weight(0.0);
        }

        commands.entity(rig_root).insert((
            CharacterAnimationRoot,
            RigOwner(child_of.parent()),
            AnimationGraphHandle(assets.animation_graph.clone()),
        ));
        commands.entity(model_root).remove::<NeedsRigSetup>();
        info!("Character rig ready");
    }
}

/// Push this frame's movement into the animator parameters.
pub fn update_animator_params(
    time: Res<Time>,
    controls: Res<ControlState>,
    config: Res<ControllerConfig>,
    mut players: Query<(&MovementState, &Transform, &mut AnimatorParams), With<Player>>,
) {
    let dt = time.delta_secs();
    for (state, transform, mut params) in players.iter_mut() {
        params.update(
            state.planar_direction(),
            transform.right().as_vec3(),
            transform.forward().as_vec3(),
            controls.running,
            config.animation.damp_time,
            dt,
        );
    }
}

fn set_weight(player: &mut AnimationPlayer, node: AnimationNodeIndex, weight: f32) {
    match player.animation_mut(node) {
        Some(active) => {
            active.set_weight(weight);
        }
        None => {
            player.play(node).repeat().set_weight(weight);
        }
    }
}

/// Drive clip weights from animator parameters and play the fire clip when triggered.
pub fn drive_character_animation(
    assets: Option<Res<CharacterAssets>>,
    mut rigs: Query<(&RigOwner, &mut AnimationPlayer), With<CharacterAnimationRoot>>,
    mut owners: Query<(&AnimatorParams, &mut FireTrigger)>,
) {
    let Some(assets) = assets else { return };

    for (owner, mut player) in rigs.iter_mut() {
        let Ok((params, mut trigger)) = owners.get_mut(owner.0) else {
            continue;
        };

        let weights = BlendWeights::from_velocity(params.x_velocity.value, params.z_velocity.value);
        let (active, inactive) = if params.is_running {
            (assets.run, assets.walk)
        } else {
            (assets.walk, assets.run)
        };

        set_weight(&mut player, assets.idle, weights.idle);
        set_weight(&mut player, active.forward, weights.forward);
        set_weight(&mut player, active.backward, weights.backward);
        set_weight(&mut player, active.left, weights.left);
        set_weight(&mut player, active.right, weights.right);
        for node in inactive.iter() {
            set_weight(&mut player, node, 0.0);
        }

        if trigger.consume() {
            player.start(assets.fire);
        } else if player
            .animation(assets.fire)
            .is_some_and(|fire| fire.is_finished())
        {
            // A finished clip keeps its last pose at full weight until stopped
            player.stop(assets.fire);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::animation::AnimationPlugin;
    use bevy::asset::AssetPlugin;
    use bevy::time::TimeUpdateStrategy;
    use gunner_shared::config::{CharacterModelConfig, ClipIndices};

    use super::*;

    const FIRE_CLIP_SECS: f32 = 0.2;

    fn anim_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), AnimationPlugin));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app
    }

    fn directional(graph: &mut AnimationGraph, clip: &Handle<AnimationClip>) -> DirectionalNodes {
        DirectionalNodes {
            forward: graph.add_clip(clip.clone(), 1.0, graph.root),
            backward: graph.add_clip(clip.clone(), 1.0, graph.root),
            left: graph.add_clip(clip.clone(), 1.0, graph.root),
            right: graph.add_clip(clip.clone(), 1.0, graph.root),
        }
    }

    /// Graph where every node plays the same short clip.
    fn insert_test_assets(app: &mut App) -> CharacterAssets {
        let mut clip = AnimationClip::default();
        clip.set_duration(FIRE_CLIP_SECS);
        let clip = app
            .world_mut()
            .resource_mut::<Assets<AnimationClip>>()
            .add(clip);

        let mut graph = AnimationGraph::new();
        let idle = graph.add_clip(clip.clone(), 1.0, graph.root);
        let walk = directional(&mut graph, &clip);
        let run = directional(&mut graph, &clip);
        let fire = graph.add_clip(clip.clone(), 1.0, graph.root);
        let animation_graph = app
            .world_mut()
            .resource_mut::<Assets<AnimationGraph>>()
            .add(graph);

        let assets = CharacterAssets {
            scene: Handle::default(),
            animation_graph,
            idle,
            walk,
            run,
            fire,
        };
        app.insert_resource(assets.clone());
        assets
    }

    #[test]
    fn fire_clip_stops_once_finished() {
        let mut app = anim_app();
        let assets = insert_test_assets(&mut app);
        app.add_systems(Update, drive_character_animation);

        let mut trigger = FireTrigger::default();
        trigger.set();
        let owner = app
            .world_mut()
            .spawn((AnimatorParams::default(), trigger))
            .id();
        let rig = app
            .world_mut()
            .spawn((
                AnimationPlayer::default(),
                AnimationGraphHandle(assets.animation_graph.clone()),
                CharacterAnimationRoot,
                RigOwner(owner),
            ))
            .id();

        app.update();
        let player = app.world().get::<AnimationPlayer>(rig).unwrap();
        assert!(player.animation(assets.fire).is_some());
        assert!(!app.world().get::<FireTrigger>(owner).unwrap().is_set());

        // 100 ms per frame, well past the clip length
        for _ in 0..6 {
            app.update();
        }
        let player = app.world().get::<AnimationPlayer>(rig).unwrap();
        assert!(player.animation(assets.fire).is_none());
        // Locomotion keeps playing
        assert!(player.animation(assets.idle).is_some());
    }

    #[test]
    fn character_assets_built_once_across_resumes() {
        let mut app = anim_app();
        app.init_asset::<Scene>();
        let mut config = ControllerConfig::default();
        config.animation.model = Some(CharacterModelConfig {
            path: "models/soldier.glb".into(),
            clips: ClipIndices {
                idle: 0,
                walk_forward: 1,
                walk_backward: 2,
                walk_left: 3,
                walk_right: 4,
                run_forward: 5,
                run_backward: 6,
                run_left: 7,
                run_right: 8,
                fire: 9,
            },
        });
        app.insert_resource(config);
        app.add_systems(Update, setup_character_assets);

        app.update();
        app.update();
        assert!(app.world().contains_resource::<CharacterAssets>());
        assert_eq!(app.world().resource::<Assets<AnimationGraph>>().len(), 1);
    }
}
