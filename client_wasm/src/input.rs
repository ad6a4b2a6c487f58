//! Press-and-hold input mapping

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PourInput {
    Press,
    Release,
}

/// Keys that pour while held
pub fn is_pour_key(key: &str) -> bool {
    matches!(key, " " | "Spacebar" | "Enter")
}

/// Handle key down event. Auto-repeat does not restart a pour.
pub fn handle_key_down(key: &str, repeat: bool) -> Option<PourInput> {
    (is_pour_key(key) && !repeat).then_some(PourInput::Press)
}

/// Handle key up event
pub fn handle_key_up(key: &str) -> Option<PourInput> {
    is_pour_key(key).then_some(PourInput::Release)
}
