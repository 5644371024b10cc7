//! Character input actions
//!
//! Device state is sampled once per frame into an [`ActionSnapshot`]; the difference between
//! two snapshots becomes a stream of performed/canceled [`ActionMessage`]s, which
//! [`ControlState`] folds into the values the movement, aim and animation steps read.

use bevy::prelude::*;

use crate::config::MovementTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterAction {
    Movement,
    Aim,
    Run,
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Performed,
    Canceled,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ActionMessage {
    pub action: CharacterAction,
    pub phase: ActionPhase,
    /// Movement vector or cursor position; zero for buttons.
    pub value: Vec2,
}

impl ActionMessage {
    pub fn performed(action: CharacterAction, value: Vec2) -> Self {
        Self {
            action,
            phase: ActionPhase::Performed,
            value,
        }
    }

    pub fn canceled(action: CharacterAction) -> Self {
        Self {
            action,
            phase: ActionPhase::Canceled,
            value: Vec2::ZERO,
        }
    }
}

/// Fire was performed this frame while controls were enabled.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct FireRequested;

/// Device state for one frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionSnapshot {
    pub movement: Vec2,
    /// Cursor position in window coordinates; `None` when outside the window.
    pub aim: Option<Vec2>,
    pub run: bool,
    /// Edge: fire was pressed this frame.
    pub fire: bool,
}

/// Turn the change between two snapshots into action messages.
pub fn emit_transitions(prev: &ActionSnapshot, next: &ActionSnapshot) -> Vec<ActionMessage> {
    let mut out = Vec::new();

    if next.movement != prev.movement {
        if next.movement == Vec2::ZERO {
            out.push(ActionMessage::canceled(CharacterAction::Movement));
        } else {
            out.push(ActionMessage::performed(CharacterAction::Movement, next.movement));
        }
    }

    match (prev.aim, next.aim) {
        (_, Some(pos)) if prev.aim != Some(pos) => {
            out.push(ActionMessage::performed(CharacterAction::Aim, pos));
        }
        (Some(_), None) => out.push(ActionMessage::canceled(CharacterAction::Aim)),
        _ => {}
    }

    if next.run && !prev.run {
        out.push(ActionMessage::performed(CharacterAction::Run, Vec2::ZERO));
    } else if !next.run && prev.run {
        out.push(ActionMessage::canceled(CharacterAction::Run));
    }

    if next.fire {
        out.push(ActionMessage::performed(CharacterAction::Fire, Vec2::ZERO));
    }

    out
}

/// Current action values as seen by the character.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    pub move_input: Vec2,
    pub aim_input: Option<Vec2>,
    pub running: bool,
    pub enabled: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            move_input: Vec2::ZERO,
            aim_input: None,
            running: false,
            enabled: true,
        }
    }
}

impl ControlState {
    /// Apply one action message. Returns `true` when fire was performed.
    pub fn apply(&mut self, message: &ActionMessage) -> bool {
        if !self.enabled {
            return false;
        }
        let performed = message.phase == ActionPhase::Performed;
        match message.action {
            CharacterAction::Movement => {
                self.move_input = if performed { message.value } else { Vec2::ZERO };
            }
            CharacterAction::Aim => {
                self.aim_input = performed.then_some(message.value);
            }
            CharacterAction::Run => self.running = performed,
            CharacterAction::Fire => return performed,
        }
        false
    }

    pub fn speed(&self, tuning: &MovementTuning) -> f32 {
        if self.running {
            tuning.run_speed
        } else {
            tuning.walk_speed
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Turn controls off and drop any held values.
    pub fn disable(&mut self) {
        *self = Self {
            enabled: false,
            ..Self::default()
        };
    }
}
