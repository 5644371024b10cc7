//! Pause menu (Escape)
//!
//! Pausing disables character controls and releases the cursor; resuming re-enables them
//! and confines the cursor to the window again.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

use super::styles::*;
use crate::input::{disable_controls, enable_controls};
use crate::states::GameState;

pub struct PauseMenuPlugin;

impl Plugin for PauseMenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(GameState::Paused),
            (spawn_pause_menu, disable_controls, release_cursor),
        );
        app.add_systems(OnExit(GameState::Paused), despawn_pause_menu);
        app.add_systems(OnEnter(GameState::Playing), (enable_controls, confine_cursor));
        app.add_systems(
            Update,
            (button_interactions, handle_pause_actions, handle_resume_key)
                .run_if(in_state(GameState::Paused)),
        );
        app.add_systems(Update, handle_escape_key.run_if(in_state(GameState::Playing)));
    }
}

/// Marker for the pause menu root
#[derive(Component)]
struct PauseMenuRoot;

/// Pause menu button actions
#[derive(Component, Clone, Copy)]
enum PauseButton {
    Resume,
    Exit,
}

fn spawn_pause_menu(mut commands: Commands) {
    commands
        .spawn((
            PauseMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(OVERLAY_BACKGROUND),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("PAUSED"),
                title_text_style(),
                TextColor(TEXT_COLOR),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
            ));

            spawn_button(parent, "RESUME", PauseButton::Resume);
            spawn_button(parent, "EXIT", PauseButton::Exit);

            parent.spawn((
                Text::new("Press ESC to resume"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(TEXT_MUTED),
                Node {
                    margin: UiRect::top(Val::Px(30.0)),
                    ..default()
                },
            ));
        });
}

fn spawn_button(parent: &mut ChildSpawnerCommands<'_>, text: &str, action: PauseButton) {
    parent
        .spawn((
            Button,
            action,
            button_style(),
            BackgroundColor(BUTTON_NORMAL),
            BorderRadius::all(Val::Px(4.0)),
        ))
        .with_children(|btn| {
            btn.spawn((Text::new(text), button_text_style(), TextColor(TEXT_COLOR)));
        });
}

fn despawn_pause_menu(mut commands: Commands, query: Query<Entity, With<PauseMenuRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

fn button_interactions(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut bg_color) in buttons.iter_mut() {
        *bg_color = match interaction {
            Interaction::Pressed => BackgroundColor(BUTTON_PRESSED),
            Interaction::Hovered => BackgroundColor(BUTTON_HOVERED),
            Interaction::None => BackgroundColor(BUTTON_NORMAL),
        };
    }
}

fn handle_pause_actions(
    buttons: Query<(&Interaction, &PauseButton), Changed<Interaction>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    for (interaction, action) in buttons.iter() {
        if *interaction == Interaction::Pressed {
            match action {
                PauseButton::Resume => next_state.set(GameState::Playing),
                PauseButton::Exit => {
                    info!("Exiting game...");
                    exit.write(AppExit::Success);
                }
            }
        }
    }
}

fn handle_escape_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        info!("Paused");
        next_state.set(GameState::Paused);
    }
}

fn handle_resume_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        info!("Resumed");
        next_state.set(GameState::Playing);
    }
}

fn release_cursor(
    windows: Query<Entity, With<PrimaryWindow>>,
    mut cursor_opts: Query<&mut CursorOptions>,
) {
    set_cursor_grab(&windows, &mut cursor_opts, CursorGrabMode::None);
}

/// The cursor stays visible while playing; it is the aim reticle.
fn confine_cursor(
    windows: Query<Entity, With<PrimaryWindow>>,
    mut cursor_opts: Query<&mut CursorOptions>,
) {
    set_cursor_grab(&windows, &mut cursor_opts, CursorGrabMode::Confined);
}

fn set_cursor_grab(
    windows: &Query<Entity, With<PrimaryWindow>>,
    cursor_opts: &mut Query<&mut CursorOptions>,
    mode: CursorGrabMode,
) {
    let Ok(window_entity) = windows.single() else {
        return;
    };
    if let Ok(mut cursor) = cursor_opts.get_mut(window_entity) {
        cursor.grab_mode = mode;
        cursor.visible = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use gunner_shared::{ActionSnapshot, ControlState};

    fn pause_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin);
        app.init_state::<GameState>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<ControlState>();
        app.init_resource::<ActionSnapshot>();
        app.add_systems(OnEnter(GameState::Paused), disable_controls);
        app.add_systems(OnEnter(GameState::Playing), enable_controls);
        app.add_systems(Update, handle_escape_key.run_if(in_state(GameState::Playing)));
        app.add_systems(Update, handle_resume_key.run_if(in_state(GameState::Paused)));
        app
    }

    fn tap_escape(app: &mut App) {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        app.update();
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.release(KeyCode::Escape);
            keys.clear();
        }
        // Apply the queued transition
        app.update();
    }

    #[test]
    fn escape_pauses_and_disables_controls() {
        let mut app = pause_app();
        app.update();
        app.world_mut().resource_mut::<ControlState>().running = true;

        tap_escape(&mut app);
        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::Paused);
        let controls = app.world().resource::<ControlState>();
        assert!(!controls.enabled);
        assert!(!controls.running);

        tap_escape(&mut app);
        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::Playing);
        assert!(app.world().resource::<ControlState>().enabled);
    }
}
