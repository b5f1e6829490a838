//! Key events delivered by the input surface.

/// A key press on the command input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Character typed.
    Char(char),
    /// Delete-left.
    Backspace,
    /// Submit the field.
    Enter,
    ArrowUp,
    ArrowDown,
    /// Prefix completion.
    Tab,
    /// Cancel the active menu.
    Escape,
}
