//! Foundation types for the web CLI.
//!
//! This crate holds the pieces every other crate agrees on: the error
//! taxonomy, styled output lines, key events from the input surface, and
//! the TOML configuration.

pub mod config;
pub mod error;
pub mod input;
pub mod output;
