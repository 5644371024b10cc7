//! Player input handling
//!
//! Devices are sampled into an [`ActionSnapshot`] each frame and turned into action
//! messages; the messages drive [`ControlState`].

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use gunner_shared::actions::emit_transitions;
use gunner_shared::{ActionMessage, ActionSnapshot, ControlState, FireRequested};

/// Gamepad stick magnitude below which input is ignored
const GAMEPAD_DEAD_ZONE: f32 = 0.15;

fn key_axis(
    keyboard: &ButtonInput<KeyCode>,
    positive: [KeyCode; 2],
    negative: [KeyCode; 2],
) -> f32 {
    let pos = keyboard.any_pressed(positive) as i32 as f32;
    let neg = keyboard.any_pressed(negative) as i32 as f32;
    pos - neg
}

/// WASD / arrow keys as a normalized 2D vector (up is +Y)
fn keyboard_movement(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    Vec2::new(
        key_axis(
            keyboard,
            [KeyCode::KeyD, KeyCode::ArrowRight],
            [KeyCode::KeyA, KeyCode::ArrowLeft],
        ),
        key_axis(
            keyboard,
            [KeyCode::KeyW, KeyCode::ArrowUp],
            [KeyCode::KeyS, KeyCode::ArrowDown],
        ),
    )
    .normalize_or_zero()
}

fn stick_movement(stick: Vec2) -> Vec2 {
    if stick.length() < GAMEPAD_DEAD_ZONE {
        Vec2::ZERO
    } else {
        stick.clamp_length_max(1.0)
    }
}

/// Sample keyboard, mouse, gamepads and the primary window cursor, and emit the
/// resulting action transitions.
pub fn read_devices(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    gamepads: Query<&Gamepad>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut last: ResMut<ActionSnapshot>,
    mut actions: MessageWriter<ActionMessage>,
) {
    let mut movement = keyboard_movement(&keyboard);
    let mut run = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    let mut fire = mouse_button.just_pressed(MouseButton::Left);

    for gamepad in gamepads.iter() {
        if movement == Vec2::ZERO {
            movement = stick_movement(gamepad.left_stick());
        }
        run |= gamepad.pressed(GamepadButton::LeftThumb);
        fire |= gamepad.just_pressed(GamepadButton::RightTrigger2);
    }

    let aim = windows.single().ok().and_then(|w| w.cursor_position());

    let next = ActionSnapshot {
        movement,
        aim,
        run,
        fire,
    };
    for message in emit_transitions(&last, &next) {
        actions.write(message);
    }
    // Fire is an edge; don't carry it into the next comparison
    *last = ActionSnapshot { fire: false, ..next };
}

/// Fold action messages into the control state.
pub fn apply_action_messages(
    mut actions: MessageReader<ActionMessage>,
    mut controls: ResMut<ControlState>,
    mut fire: MessageWriter<FireRequested>,
) {
    for message in actions.read() {
        if controls.apply(message) {
            fire.write(FireRequested);
        }
    }
}

pub fn enable_controls(mut controls: ResMut<ControlState>) {
    controls.enable();
}

/// Drop held inputs and forget the last device snapshot, so keys still held on resume
/// are performed again.
pub fn disable_controls(mut controls: ResMut<ControlState>, mut last: ResMut<ActionSnapshot>) {
    controls.disable();
    *last = ActionSnapshot::default();
}
