//! Raw event to command translation

use super::{Key, RawEvent};
use crate::sim::{Command, GamePhase};

/// Maps key presses to commands, depending on the current phase.
///
/// Unknown keys and key releases are dropped without error.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputAdapter;

impl InputAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn translate(&self, event: &RawEvent, phase: GamePhase) -> Option<Command> {
        match *event {
            RawEvent::WindowClose => Some(Command::Quit),
            RawEvent::KeyUp(_) => None,
            RawEvent::KeyDown(key) => match (key, phase) {
                (Key::Escape, GamePhase::Playing) => Some(Command::ReturnToMenu),
                (Key::Escape, _) => Some(Command::Quit),
                (Key::Space, GamePhase::Playing) => Some(Command::Jump),
                (Key::Space, _) => Some(Command::Start),
                (Key::Up, GamePhase::Playing) => Some(Command::Jump),
                (Key::Backspace, GamePhase::GameOver) => Some(Command::ReturnToMenu),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHASES: [GamePhase; 3] = [GamePhase::Welcome, GamePhase::Playing, GamePhase::GameOver];

    #[test]
    fn test_escape_is_context_dependent() {
        let adapter = InputAdapter::new();
        let esc = RawEvent::KeyDown(Key::Escape);
        assert_eq!(adapter.translate(&esc, GamePhase::Playing), Some(Command::ReturnToMenu));
        assert_eq!(adapter.translate(&esc, GamePhase::Welcome), Some(Command::Quit));
        assert_eq!(adapter.translate(&esc, GamePhase::GameOver), Some(Command::Quit));
    }

    #[test]
    fn test_space_starts_or_jumps() {
        let adapter = InputAdapter::new();
        let space = RawEvent::KeyDown(Key::Space);
        assert_eq!(adapter.translate(&space, GamePhase::Welcome), Some(Command::Start));
        assert_eq!(adapter.translate(&space, GamePhase::GameOver), Some(Command::Start));
        assert_eq!(adapter.translate(&space, GamePhase::Playing), Some(Command::Jump));
    }

    #[test]
    fn test_window_close_always_quits() {
        let adapter = InputAdapter::new();
        for phase in PHASES {
            assert_eq!(adapter.translate(&RawEvent::WindowClose, phase), Some(Command::Quit));
        }
    }

    #[test]
    fn test_unrecognized_events_ignored() {
        let adapter = InputAdapter::new();
        for phase in PHASES {
            assert_eq!(adapter.translate(&RawEvent::KeyDown(Key::Other(65)), phase), None);
            assert_eq!(adapter.translate(&RawEvent::KeyUp(Key::Space), phase), None);
            assert_eq!(adapter.translate(&RawEvent::KeyUp(Key::Escape), phase), None);
        }
        assert_eq!(adapter.translate(&RawEvent::KeyDown(Key::Up), GamePhase::Welcome), None);
        assert_eq!(
            adapter.translate(&RawEvent::KeyDown(Key::Backspace), GamePhase::Playing),
            None
        );
    }

    #[test]
    fn test_backspace_leaves_game_over() {
        let adapter = InputAdapter::new();
        assert_eq!(
            adapter.translate(&RawEvent::KeyDown(Key::Backspace), GamePhase::GameOver),
            Some(Command::ReturnToMenu)
        );
    }
}
