//! System commands: clear, date, whoami, history, uname, fetch.

use webcli_types::error::Result;
use webcli_types::output::{Line, Span, Style};

use crate::interpreter::{Command, CommandOutput, Environment};
use crate::store::THEME_KEY;

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clear the terminal screen"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Clear)
    }
}

// ---------------------------------------------------------------------------
// date
// ---------------------------------------------------------------------------

struct DateCmd;
impl Command for DateCmd {
    fn name(&self) -> &str {
        "date"
    }
    fn description(&self) -> &str {
        "Display current date and time"
    }
    fn usage(&self) -> &str {
        "date"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        let now = chrono::Local::now();
        Ok(CommandOutput::text(
            now.format("%a %b %d %Y %H:%M:%S").to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// whoami
// ---------------------------------------------------------------------------

struct WhoamiCmd;
impl Command for WhoamiCmd {
    fn name(&self) -> &str {
        "whoami"
    }
    fn description(&self) -> &str {
        "Display current user"
    }
    fn usage(&self) -> &str {
        "whoami"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::text(env.user))
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

struct HistoryCmd;
impl Command for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }
    fn description(&self) -> &str {
        "Show command history"
    }
    fn usage(&self) -> &str {
        "history"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if env.history.is_empty() {
            return Ok(CommandOutput::None);
        }
        let lines = env
            .history
            .iter()
            .enumerate()
            .map(|(i, cmd)| Line::result(format!("{:>4} {cmd}", i + 1)))
            .collect();
        Ok(CommandOutput::Lines(lines))
    }
}

// ---------------------------------------------------------------------------
// uname
// ---------------------------------------------------------------------------

struct UnameCmd;
impl Command for UnameCmd {
    fn name(&self) -> &str {
        "uname"
    }
    fn description(&self) -> &str {
        "Display system information"
    }
    fn usage(&self) -> &str {
        "uname [-a]"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.contains(&"-a") {
            Ok(CommandOutput::text(
                "WebCLI 1.0.0 web-terminal x86_64 Browser/OS",
            ))
        } else {
            Ok(CommandOutput::text("WebCLI"))
        }
    }
}

// ---------------------------------------------------------------------------
// fetch
// ---------------------------------------------------------------------------

const LOGO: &[&str] = &[
    "   _    _      _      ___ _    ___ ",
    "  | |  | |    | |    / __| |  |_ _|",
    "  | |/\\| | ___| |__ | (__| |__ | | ",
    "  |__/\\__|_/___|_.__|\\___|____|___|",
    "                                   ",
];

const LOGO_WIDTH: usize = 38;

/// Name field of the stored theme, if one was saved and parses.
fn saved_theme_name(env: &Environment<'_>) -> Option<String> {
    let raw = env.store.get(THEME_KEY)?;
    let value: serde_json::Value = serde_json::from_str(&raw).ok()?;
    value.get("name")?.as_str().map(str::to_string)
}

struct FetchCmd;
impl Command for FetchCmd {
    fn name(&self) -> &str {
        "fetch"
    }
    fn description(&self) -> &str {
        "Display system information with ASCII art"
    }
    fn usage(&self) -> &str {
        "fetch"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let date = chrono::Local::now().format("%-m/%-d/%Y").to_string();
        let mut info: Vec<Vec<Span>> = vec![
            vec![Span::styled(
                format!("{}@{}", env.user, env.host),
                Style::Command,
            )],
            vec![Span::plain("------------------")],
        ];
        let mut field = |label: &str, value: String| {
            info.push(vec![
                Span::styled(label.to_string(), Style::HelpCommand),
                Span::plain(format!(": {value}")),
            ]);
        };
        field("OS", std::env::consts::OS.to_string());
        field("Host", env.host.to_string());
        field("Shell", "webcli 1.0.0".to_string());
        field("Date", date);
        if let Some(theme) = saved_theme_name(env) {
            field("Theme", theme);
        }

        let rows = LOGO.len().max(info.len());
        let mut lines = Vec::with_capacity(rows);
        let mut info = info.into_iter();
        for i in 0..rows {
            let logo = LOGO.get(i).copied().unwrap_or("");
            let mut spans = vec![Span::styled(
                format!("{logo:<LOGO_WIDTH$}"),
                Style::Directory,
            )];
            spans.extend(info.next().unwrap_or_default());
            lines.push(Line::from_spans(Style::Result, spans));
        }
        Ok(CommandOutput::Lines(lines))
    }
}

/// Register system commands into a registry.
pub fn register_system_commands(reg: &mut crate::CommandRegistry) {
    reg.register(Box::new(ClearCmd));
    reg.register(Box::new(DateCmd));
    reg.register(Box::new(WhoamiCmd));
    reg.register(Box::new(HistoryCmd));
    reg.register(Box::new(UnameCmd));
    reg.register(Box::new(FetchCmd));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};
    use crate::{CommandOutput, CommandRegistry};
    use webcli_vfs::FileTree;

    fn setup() -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        register_system_commands(&mut reg);
        reg
    }

    fn exec_with(store: &mut MemoryStore, history: &[String], line: &str) -> CommandOutput {
        let reg = setup();
        let mut tree = FileTree::seeded();
        let mut env = Environment {
            cwd: "/home/user".to_string(),
            home: "/home/user",
            user: "alice",
            host: "devbox",
            tree: &mut tree,
            history,
            store,
        };
        reg.execute(line, &mut env).unwrap()
    }

    fn exec(line: &str) -> CommandOutput {
        exec_with(&mut MemoryStore::new(), &[], line)
    }

    fn text(out: CommandOutput) -> Vec<String> {
        match out {
            CommandOutput::Lines(lines) => lines.iter().map(Line::text).collect(),
            other => panic!("expected lines, got {other:?}"),
        }
    }

    #[test]
    fn clear_signals() {
        assert_eq!(exec("clear"), CommandOutput::Clear);
    }

    #[test]
    fn whoami_uses_configured_user() {
        assert_eq!(text(exec("whoami")), ["alice"]);
    }

    #[test]
    fn uname_variants() {
        assert_eq!(text(exec("uname")), ["WebCLI"]);
        assert_eq!(
            text(exec("uname -a")),
            ["WebCLI 1.0.0 web-terminal x86_64 Browser/OS"]
        );
    }

    #[test]
    fn history_is_numbered() {
        let history = vec!["pwd".to_string(), "ls -l".to_string()];
        let out = text(exec_with(&mut MemoryStore::new(), &history, "history"));
        assert_eq!(out, ["   1 pwd", "   2 ls -l"]);
    }

    #[test]
    fn history_empty_prints_nothing() {
        assert_eq!(exec("history"), CommandOutput::None);
    }

    #[test]
    fn date_has_year() {
        let out = text(exec("date"));
        let year = chrono::Local::now().format("%Y").to_string();
        assert!(out[0].contains(&year));
    }

    #[test]
    fn fetch_shows_logo_and_user() {
        let out = text(exec("fetch"));
        assert!(out[0].starts_with("   _    _"));
        assert!(out[0].ends_with("alice@devbox"));
        assert!(out.iter().any(|l| l.contains("Host: devbox")));
        assert!(!out.iter().any(|l| l.contains("Theme:")));
    }

    #[test]
    fn fetch_shows_saved_theme() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, r#"{"name":"Nord"}"#).unwrap();
        let out = text(exec_with(&mut store, &[], "fetch"));
        assert!(out.iter().any(|l| l.ends_with("Theme: Nord")));
    }

    #[test]
    fn fetch_ignores_corrupt_theme() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "{oops").unwrap();
        let out = text(exec_with(&mut store, &[], "fetch"));
        assert!(!out.iter().any(|l| l.contains("Theme:")));
    }
}
