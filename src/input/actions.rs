//! Game action definitions

/// Everything the player can ask for.
///
/// Keyboard / gamepad (Xbox names):
/// - Left, Right / D-pad or left stick = move
/// - Space / A = jump
/// - Ctrl / X = fire
/// - P / Start = pause
/// - F = FPS overlay, E = entity dump
/// - Esc, Q / Select = quit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Fire,

    // System
    Pause,
    ToggleFps,
    DumpEntities,
    Quit,
}
