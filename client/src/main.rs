//! Game client - a third-person character in a small arena
//!
//! WASD / left stick moves, Shift runs, the mouse aims, left click fires, Escape pauses.

mod camera;
mod input;
mod physics;
mod states;
mod systems;
mod ui;

use std::path::{Path, PathBuf};

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;
use gunner_shared::{ActionMessage, ActionSnapshot, ControlState, ControllerConfig, FireRequested};
use states::GameState;

/// Environment variable overriding the controller config path
const CONFIG_ENV: &str = "GUNNER_CONFIG";

/// Get the asset path - for bundled macOS apps, use path relative to executable
fn get_asset_path() -> String {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let bundled_assets = exe_dir.join("assets");
            if bundled_assets.exists() {
                info!("Using bundled assets at: {:?}", bundled_assets);
                return bundled_assets.to_string_lossy().to_string();
            }
        }
    }
    // Fall back to default "assets" folder (for development)
    "assets".to_string()
}

fn config_path(asset_path: &str) -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    let local = Path::new(asset_path).join("controller.ron");
    if local.exists() {
        return local;
    }
    // `cargo run` from the workspace root; Bevy resolves assets against the manifest dir too
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join(asset_path)
        .join("controller.ron")
}

fn load_config(path: &Path) -> ControllerConfig {
    match ControllerConfig::load(path) {
        Ok(config) => {
            info!("Loaded controller config from {:?}", path);
            config
        }
        Err(err) => {
            warn!("{err}; using default controller config");
            ControllerConfig::default()
        }
    }
}

fn main() {
    let asset_path = get_asset_path();

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Gunner".to_string(),
                    resolution: WindowResolution::new(1280, 720),
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: asset_path.clone(),
                ..default()
            }),
    );

    // Logging is up once DefaultPlugins are added
    let config = load_config(&config_path(&asset_path));

    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
    if config.debug.physics {
        app.add_plugins(RapierDebugRenderPlugin::default());
    }

    app.init_state::<GameState>();
    app.add_plugins(ui::PauseMenuPlugin);

    app.insert_resource(config);
    app.init_resource::<ControlState>();
    app.init_resource::<ActionSnapshot>();
    app.add_message::<ActionMessage>();
    app.add_message::<FireRequested>();

    app.add_systems(Startup, camera::spawn_camera);

    // The initial OnEnter runs before Startup, so the model assets load in the same chain
    // that spawns the player.
    app.add_systems(
        OnEnter(GameState::Playing),
        (
            systems::setup_character_assets,
            systems::spawn_world,
            systems::spawn_player,
        )
            .chain(),
    );

    // ORDER MATTERS: input -> movement -> aim (sets facing) -> animator params -> camera.
    app.add_systems(
        Update,
        (
            input::read_devices,
            input::apply_action_messages,
            systems::handle_fire_requests,
            systems::apply_movement,
            systems::aim_towards_cursor,
            systems::update_animator_params,
            systems::drive_character_animation,
            camera::update_camera,
        )
            .chain()
            .run_if(in_state(GameState::Playing)),
    );

    app.add_systems(Update, systems::setup_character_rig);
    app.add_systems(
        Update,
        systems::debug_draw_aim.run_if(|config: Res<ControllerConfig>| config.debug.draw_aim),
    );

    info!("Starting client");
    app.run();
}
