//! Command trait, registry, and dispatch logic.
//!
//! A command line is split on whitespace (no quoting), the first token is
//! lower-cased into the verb, and the rest are handed to the registered
//! [`Command`]. Handlers never render anything themselves: they return
//! styled lines or a signal for the session to act on.

use std::collections::HashMap;

use webcli_types::error::{Result, WebCliError};
use webcli_types::output::{Line, Span, Style};
use webcli_vfs::FileTree;

use crate::store::KeyValueStore;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Styled lines, in order. May be empty.
    Lines(Vec<Line>),
    /// Command produced no visible output.
    None,
    /// Signal to clear the output log.
    Clear,
    /// Signal to fetch a weather report in the background.
    FetchWeather {
        /// `+`-joined city, as sent to the endpoint.
        city: String,
        /// Space-joined city, for messages.
        display: String,
    },
    /// Signal to open the theme picker.
    ThemeSelector,
    /// Signal to start the Dragon Slayer game.
    StartGame,
}

impl CommandOutput {
    /// A single result-styled line.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Lines(vec![Line::result(s)])
    }
}

/// Shared mutable environment passed to every command.
pub struct Environment<'a> {
    /// Current working directory, always normalized.
    pub cwd: String,
    /// Home directory (`cd`, `cd ~`).
    pub home: &'a str,
    pub user: &'a str,
    pub host: &'a str,
    /// The filesystem.
    pub tree: &'a mut FileTree,
    /// Previously submitted lines, oldest first.
    pub history: &'a [String],
    /// Persistence for todos and the theme preference.
    pub store: &'a mut dyn KeyValueStore,
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "ls \[-l\] \[path\]").
    fn usage(&self) -> &str;

    /// Command category for grouping in `help` output.
    fn category(&self) -> &str {
        "general"
    }

    /// Execute the command with the given arguments and environment.
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput>;
}

/// Registry of available commands with dispatch.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Whether `name` is a registered verb (or `help`).
    pub fn contains(&self, name: &str) -> bool {
        name == "help" || self.commands.contains_key(name)
    }

    /// Parse and execute a command line.
    ///
    /// Whitespace-only input yields [`CommandOutput::None`]. An unknown
    /// verb yields [`WebCliError::UnknownCommand`].
    pub fn execute(&self, line: &str, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            return Ok(CommandOutput::None);
        };
        let verb = first.to_lowercase();
        let args: Vec<&str> = tokens.collect();

        if verb == "help" {
            return self.help(&args);
        }

        match self.commands.get(&verb) {
            Some(cmd) => {
                log::debug!("dispatch {verb} {args:?} (cwd {})", env.cwd);
                cmd.execute(&args, env)
            },
            None => {
                log::debug!("unknown command: {verb}");
                Err(WebCliError::UnknownCommand(verb))
            },
        }
    }

    /// `help` needs the registry itself, so it is handled here.
    fn help(&self, args: &[&str]) -> Result<CommandOutput> {
        if let Some(name) = args.first() {
            let name = name.to_lowercase();
            if name == "help" {
                return Ok(CommandOutput::Lines(vec![
                    Line::result("Usage: help [command]"),
                    Line::result("  Display available commands or details of one command"),
                ]));
            }
            let cmd = self
                .commands
                .get(&name)
                .ok_or_else(|| WebCliError::NotFound(format!("help: no help for {name}")))?;
            return Ok(CommandOutput::Lines(vec![
                Line::result(format!("Usage: {}", cmd.usage())),
                Line::result(format!("  {}", cmd.description())),
                Line::result(format!("  Category: {}", cmd.category())),
            ]));
        }

        let mut lines = vec![Line::new(Style::Help, "Available commands:"), Line::blank()];
        let mut rows: Vec<(&str, &str)> = vec![("help [command]", "Display this help message")];
        rows.extend(self.commands.values().map(|c| (c.usage(), c.description())));
        rows.sort_by_key(|(usage, _)| *usage);
        for (usage, desc) in rows {
            lines.push(Line::from_spans(
                Style::Help,
                vec![
                    Span::plain("  "),
                    Span::styled(format!("{usage:<24}"), Style::HelpCommand),
                    Span::plain(desc),
                ],
            ));
        }
        Ok(CommandOutput::Lines(lines))
    }

    /// List registered commands as (name, description), sorted by name.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> = self
            .commands
            .values()
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }

    /// Registered verbs (and `help`) starting with `partial`, sorted.
    pub fn completions(&self, partial: &str) -> Vec<String> {
        let mut out: Vec<String> = self
            .commands
            .keys()
            .map(String::as_str)
            .chain(std::iter::once("help"))
            .filter(|name| name.starts_with(partial))
            .map(str::to_string)
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split arguments into short flags and operands.
///
/// A flag is any token that starts with `-` and has more characters after
/// it. A lone `-` is an operand.
pub fn split_flags<'a>(args: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    args.iter()
        .copied()
        .partition(|a| a.len() > 1 && a.starts_with('-'))
}

/// Whether a short option letter was given, alone or bundled (`-rf`).
pub fn has_flag(flags: &[&str], letter: char) -> bool {
    flags
        .iter()
        .filter(|f| !f.starts_with("--"))
        .any(|f| f[1..].contains(letter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    struct EchoCmd;
    impl Command for EchoCmd {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Print arguments"
        }
        fn usage(&self) -> &str {
            "echo [text...]"
        }
        fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
            Ok(CommandOutput::text(args.join(" ")))
        }
    }

    struct Named(&'static str);
    impl Command for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "desc"
        }
        fn usage(&self) -> &str {
            self.0
        }
        fn execute(&self, _: &[&str], _: &mut Environment<'_>) -> Result<CommandOutput> {
            Ok(CommandOutput::None)
        }
    }

    fn run(reg: &CommandRegistry, line: &str) -> Result<CommandOutput> {
        let mut tree = FileTree::seeded();
        let mut store = MemoryStore::new();
        let mut env = Environment {
            cwd: "/home/user".to_string(),
            home: "/home/user",
            user: "user",
            host: "webcli",
            tree: &mut tree,
            history: &[],
            store: &mut store,
        };
        reg.execute(line, &mut env)
    }

    fn text_of(out: CommandOutput) -> Vec<String> {
        match out {
            CommandOutput::Lines(lines) => lines.iter().map(Line::text).collect(),
            other => panic!("expected lines, got {other:?}"),
        }
    }

    #[test]
    fn dispatches_registered_verb() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd));
        assert_eq!(text_of(run(&reg, "echo hello world").unwrap()), ["hello world"]);
    }

    #[test]
    fn verb_is_case_insensitive() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd));
        assert_eq!(text_of(run(&reg, "ECHO hi").unwrap()), ["hi"]);
    }

    #[test]
    fn multiple_spaces_between_args() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd));
        assert_eq!(text_of(run(&reg, "echo   hello    world").unwrap()), ["hello world"]);
    }

    #[test]
    fn whitespace_only_input_returns_none() {
        let reg = CommandRegistry::new();
        assert_eq!(run(&reg, "   \t  ").unwrap(), CommandOutput::None);
    }

    #[test]
    fn unknown_command_error() {
        let reg = CommandRegistry::new();
        let err = run(&reg, "Frobnicate x").unwrap_err();
        assert_eq!(err.to_string(), "bash: frobnicate: command not found");
    }

    #[test]
    fn list_commands_sorted() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(Named("zeta")));
        reg.register(Box::new(Named("alpha")));
        reg.register(Box::new(Named("mid")));
        let names: Vec<&str> = reg.list_commands().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn register_replaces_existing() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(Named("dup")));
        reg.register(Box::new(Named("dup")));
        assert_eq!(reg.list_commands().len(), 1);
    }

    #[test]
    fn completions_prefix() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd));
        reg.register(Box::new(Named("head")));
        assert_eq!(reg.completions("ec"), ["echo"]);
        assert_eq!(reg.completions("he"), ["head", "help"]);
        assert!(reg.completions("xyz").is_empty());
    }

    #[test]
    fn help_lists_every_command() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd));
        reg.register(Box::new(Named("pwd")));
        let lines = text_of(run(&reg, "help").unwrap());
        assert_eq!(lines[0], "Available commands:");
        assert!(lines.iter().any(|l| l.contains("echo [text...]") && l.contains("Print arguments")));
        assert!(lines.iter().any(|l| l.contains("pwd")));
        assert!(lines.iter().any(|l| l.contains("help [command]")));
    }

    #[test]
    fn help_for_one_command() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd));
        let lines = text_of(run(&reg, "help echo").unwrap());
        assert_eq!(lines[0], "Usage: echo [text...]");
        let err = run(&reg, "help nope").unwrap_err();
        assert_eq!(err.to_string(), "help: no help for nope");
    }

    #[test]
    fn split_flags_partitions() {
        let (flags, ops) = split_flags(&["-l", "a", "-", "-rf", "b"]);
        assert_eq!(flags, ["-l", "-rf"]);
        assert_eq!(ops, ["a", "-", "b"]);
    }

    #[test]
    fn has_flag_bundled() {
        assert!(has_flag(&["-rf"], 'r'));
        assert!(has_flag(&["-n", "-v"], 'v'));
        assert!(!has_flag(&["-n"], 'v'));
        assert!(!has_flag(&["--verbose"], 'v'));
    }
}
