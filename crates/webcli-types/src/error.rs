//! Error types for the web CLI.

use std::io;

/// Errors produced by the web CLI.
///
/// The first five variants are the handler-level taxonomy. Their `Display`
/// output is the exact line the user sees, so handlers build the full
/// message (`cat: x: No such file or directory`) when constructing them.
#[derive(Debug, thiserror::Error)]
pub enum WebCliError {
    /// Missing or invalid arguments.
    #[error("{0}")]
    Usage(String),

    /// A path, file, or directory does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Expected a file but got a directory, or the reverse.
    #[error("{0}")]
    TypeMismatch(String),

    /// Malformed regular expression.
    #[error("{0}")]
    Pattern(String),

    /// Verb not present in the registry.
    #[error("bash: {0}: command not found")]
    UnknownCommand(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, WebCliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_is_verbatim() {
        let e = WebCliError::Usage("mkdir: missing operand".into());
        assert_eq!(format!("{e}"), "mkdir: missing operand");
    }

    #[test]
    fn not_found_error_is_verbatim() {
        let e = WebCliError::NotFound("cd: nope: No such file or directory".into());
        assert_eq!(format!("{e}"), "cd: nope: No such file or directory");
    }

    #[test]
    fn type_mismatch_error_is_verbatim() {
        let e = WebCliError::TypeMismatch("cat: docs: Is a directory".into());
        assert_eq!(format!("{e}"), "cat: docs: Is a directory");
    }

    #[test]
    fn unknown_command_display() {
        let e = WebCliError::UnknownCommand("frobnicate".into());
        assert_eq!(format!("{e}"), "bash: frobnicate: command not found");
    }

    #[test]
    fn config_error_display() {
        let e = WebCliError::Config("missing key".into());
        assert_eq!(format!("{e}"), "config error: missing key");
    }

    #[test]
    fn network_error_display() {
        let e = WebCliError::Network("timed out".into());
        assert_eq!(format!("{e}"), "network error: timed out");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: WebCliError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: WebCliError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: WebCliError = json_err.into();
        assert!(format!("{e}").contains("JSON error"));
    }

    #[test]
    fn error_is_debug() {
        let e = WebCliError::Pattern("grep: invalid pattern".into());
        assert!(format!("{e:?}").contains("Pattern"));
    }
}
