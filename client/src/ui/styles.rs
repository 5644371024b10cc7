//! Shared UI styles

use bevy::prelude::*;

/// Dimmed overlay behind menus
pub const OVERLAY_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.6);

pub const BUTTON_NORMAL: Color = Color::srgb(0.14, 0.15, 0.17);
pub const BUTTON_HOVERED: Color = Color::srgb(0.22, 0.24, 0.28);
pub const BUTTON_PRESSED: Color = Color::srgb(0.85, 0.25, 0.2);

pub const TEXT_COLOR: Color = Color::srgb(0.92, 0.92, 0.9);
pub const TEXT_MUTED: Color = Color::srgb(0.55, 0.56, 0.58);

/// Standard button style
pub fn button_style() -> Node {
    Node {
        width: Val::Px(240.0),
        height: Val::Px(50.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        margin: UiRect::all(Val::Px(8.0)),
        ..default()
    }
}

pub fn button_text_style() -> TextFont {
    TextFont {
        font_size: 22.0,
        ..default()
    }
}

pub fn title_text_style() -> TextFont {
    TextFont {
        font_size: 64.0,
        ..default()
    }
}
