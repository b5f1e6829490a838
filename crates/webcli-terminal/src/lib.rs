//! Command interpreter for the web CLI.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name. The interpreter splits input
//! lines, resolves the command name, and dispatches `execute()`. Commands
//! that need something only the session owns (the output log, the weather
//! worker, the theme picker, the game) return a signal instead.

pub mod app_commands;
pub mod calc;
pub mod file_commands;
mod interpreter;
pub mod store;
pub mod system_commands;
pub mod text_commands;

/// Register application commands (calc, todo, weather, theme, dragon-slayer).
pub use app_commands::register_app_commands;
/// Register filesystem commands (ls, cd, mkdir, cp, find, tree, ...).
pub use file_commands::register_file_commands;
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (lines or signals).
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Shared mutable environment passed to every command.
pub use interpreter::Environment;
pub use interpreter::{has_flag, split_flags};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
/// Register system commands (clear, date, whoami, history, uname, fetch).
pub use system_commands::register_system_commands;
/// Register text commands (cat, echo, grep, wc, head, tail).
pub use text_commands::register_text_commands;

/// Register every built-in command into a registry.
pub fn register_builtins(reg: &mut CommandRegistry) {
    register_file_commands(reg);
    register_text_commands(reg);
    register_system_commands(reg);
    register_app_commands(reg);
}
