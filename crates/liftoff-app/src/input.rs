//! Keyboard mapping
//!
//! Two layers: held movement keys drive the free camera's intent flags on
//! both press and release, while one-shot commands (launch, pause, reset,
//! camera mode) fire on press only.

use liftoff_sim::{CameraMode, MoveIntents};
use winit::keyboard::KeyCode;

/// One-shot action bound to a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Launch,
    TogglePause,
    Reset,
    SetMode(CameraMode),
}

/// Update movement intent flags for a key transition. Returns true when the
/// key is a movement key.
pub fn update_intents(intents: &mut MoveIntents, code: KeyCode, pressed: bool) -> bool {
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => intents.forward = pressed,
        KeyCode::KeyS | KeyCode::ArrowDown => intents.back = pressed,
        KeyCode::KeyA | KeyCode::ArrowLeft => intents.left = pressed,
        KeyCode::KeyD | KeyCode::ArrowRight => intents.right = pressed,
        KeyCode::KeyE => intents.up = pressed,
        KeyCode::KeyQ => intents.down = pressed,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => intents.fast = pressed,
        KeyCode::ControlLeft | KeyCode::ControlRight => intents.slow = pressed,
        _ => return false,
    }
    true
}

/// One-shot command bound to a key, if any
pub fn command_for(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::KeyL => Some(Command::Launch),
        KeyCode::KeyP => Some(Command::TogglePause),
        KeyCode::KeyR => Some(Command::Reset),
        KeyCode::Digit1 => Some(Command::SetMode(CameraMode::Free)),
        KeyCode::Digit2 => Some(Command::SetMode(CameraMode::Chase)),
        KeyCode::Digit3 => Some(Command::SetMode(CameraMode::Ground)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_set_and_clear_intents() {
        let mut intents = MoveIntents::default();

        assert!(update_intents(&mut intents, KeyCode::KeyW, true));
        assert!(intents.forward);

        assert!(update_intents(&mut intents, KeyCode::KeyW, false));
        assert!(!intents.forward);
    }

    #[test]
    fn modifiers_are_movement_keys() {
        let mut intents = MoveIntents::default();
        update_intents(&mut intents, KeyCode::ShiftLeft, true);
        update_intents(&mut intents, KeyCode::ControlRight, true);
        assert!(intents.fast);
        assert!(intents.slow);
    }

    #[test]
    fn command_keys_are_not_movement_keys() {
        let mut intents = MoveIntents::default();
        assert!(!update_intents(&mut intents, KeyCode::KeyL, true));
        assert_eq!(command_for(KeyCode::KeyL), Some(Command::Launch));
        assert_eq!(
            command_for(KeyCode::Digit2),
            Some(Command::SetMode(CameraMode::Chase))
        );
        assert_eq!(command_for(KeyCode::KeyZ), None);
    }
}
