//! Application commands: calc, todo, weather, theme, dragon-slayer.
//!
//! `weather`, `theme` and `dragon-slayer` only return a signal; the
//! session owns the network worker, the theme picker and the game.

use serde::{Deserialize, Serialize};

use webcli_types::error::{Result, WebCliError};
use webcli_types::output::{Line, Span, Style};

use crate::calc;
use crate::interpreter::{Command, CommandOutput, Environment};
use crate::store::{KeyValueStore, TODO_KEY};

// ---------------------------------------------------------------------------
// calc
// ---------------------------------------------------------------------------

struct CalcCmd;
impl Command for CalcCmd {
    fn name(&self) -> &str {
        "calc"
    }
    fn description(&self) -> &str {
        "Calculate mathematical expression"
    }
    fn usage(&self) -> &str {
        "calc [expression]"
    }
    fn category(&self) -> &str {
        "apps"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(WebCliError::Usage("Usage: calc [expression]".to_string()));
        }
        let expr = args.join(" ");
        match calc::eval_expr(&expr) {
            Ok(value) => Ok(CommandOutput::text(calc::format_number(value))),
            Err(msg) => Err(WebCliError::Usage(format!("Error: {msg}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// todo
// ---------------------------------------------------------------------------

/// One persisted todo entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

fn load_todos(store: &dyn KeyValueStore) -> Vec<Todo> {
    let Some(raw) = store.get(TODO_KEY) else {
        return Vec::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        log::warn!("ignoring corrupt todo list: {e}");
        Vec::new()
    })
}

fn save_todos(store: &mut dyn KeyValueStore, todos: &[Todo]) -> Result<()> {
    let json = serde_json::to_string(todos)?;
    store.set(TODO_KEY, &json)
}

/// 1-based id argument to a 0-based index into `len` entries.
fn todo_index(arg: Option<&&str>, len: usize) -> Option<usize> {
    let id: usize = arg?.parse().ok()?;
    (1..=len).contains(&id).then(|| id - 1)
}

struct TodoCmd;
impl Command for TodoCmd {
    fn name(&self) -> &str {
        "todo"
    }
    fn description(&self) -> &str {
        "Manage todo list"
    }
    fn usage(&self) -> &str {
        "todo [add|list|rm|done]"
    }
    fn category(&self) -> &str {
        "apps"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut todos = load_todos(&*env.store);
        match args.first().copied() {
            None | Some("list") => {
                if todos.is_empty() {
                    return Ok(CommandOutput::text(
                        "No todos found. Use \"todo add <task>\" to create one.",
                    ));
                }
                let mut lines = vec![Line::new(Style::Directory, "TODO List:")];
                for (i, todo) in todos.iter().enumerate() {
                    let (mark, style) = if todo.done {
                        ("[x]", Some(Style::GameSuccess))
                    } else {
                        ("[ ]", None)
                    };
                    lines.push(Line::from_spans(
                        Style::Result,
                        vec![
                            Span::plain(format!("{}. ", i + 1)),
                            Span {
                                text: format!("{mark} {}", todo.text),
                                style,
                            },
                        ],
                    ));
                }
                Ok(CommandOutput::Lines(lines))
            },
            Some("add") => {
                let text = args[1..].join(" ");
                if text.is_empty() {
                    return Err(WebCliError::Usage("Usage: todo add <task>".to_string()));
                }
                let msg = format!("Added task: \"{text}\"");
                todos.push(Todo { text, done: false });
                save_todos(env.store, &todos)?;
                Ok(CommandOutput::text(msg))
            },
            Some("rm") => {
                let idx = todo_index(args.get(1), todos.len())
                    .ok_or_else(|| WebCliError::Usage("Usage: todo rm <id>".to_string()))?;
                let removed = todos.remove(idx);
                save_todos(env.store, &todos)?;
                Ok(CommandOutput::text(format!(
                    "Removed task: \"{}\"",
                    removed.text
                )))
            },
            Some("done") => {
                let idx = todo_index(args.get(1), todos.len())
                    .ok_or_else(|| WebCliError::Usage("Usage: todo done <id>".to_string()))?;
                let todo = &mut todos[idx];
                todo.done = !todo.done;
                let msg = format!(
                    "Marked task as {}: \"{}\"",
                    if todo.done { "done" } else { "pending" },
                    todo.text
                );
                save_todos(env.store, &todos)?;
                Ok(CommandOutput::text(msg))
            },
            Some(_) => Err(WebCliError::Usage(
                "Usage: todo [add|list|rm|done] ...".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// weather
// ---------------------------------------------------------------------------

struct WeatherCmd;
impl Command for WeatherCmd {
    fn name(&self) -> &str {
        "weather"
    }
    fn description(&self) -> &str {
        "Check current weather"
    }
    fn usage(&self) -> &str {
        "weather [city]"
    }
    fn category(&self) -> &str {
        "apps"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(WebCliError::Usage("Usage: weather [city]".to_string()));
        }
        Ok(CommandOutput::FetchWeather {
            city: args.join("+"),
            display: args.join(" "),
        })
    }
}

// ---------------------------------------------------------------------------
// theme / dragon-slayer
// ---------------------------------------------------------------------------

struct ThemeCmd;
impl Command for ThemeCmd {
    fn name(&self) -> &str {
        "theme"
    }
    fn description(&self) -> &str {
        "Change terminal theme (use arrow keys to select)"
    }
    fn usage(&self) -> &str {
        "theme"
    }
    fn category(&self) -> &str {
        "apps"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::ThemeSelector)
    }
}

struct DragonSlayerCmd;
impl Command for DragonSlayerCmd {
    fn name(&self) -> &str {
        "dragon-slayer"
    }
    fn description(&self) -> &str {
        "Start the Dragon Slayer RPG game"
    }
    fn usage(&self) -> &str {
        "dragon-slayer"
    }
    fn category(&self) -> &str {
        "apps"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::StartGame)
    }
}

/// Register application commands into a registry.
pub fn register_app_commands(reg: &mut crate::CommandRegistry) {
    reg.register(Box::new(CalcCmd));
    reg.register(Box::new(TodoCmd));
    reg.register(Box::new(WeatherCmd));
    reg.register(Box::new(ThemeCmd));
    reg.register(Box::new(DragonSlayerCmd));
}
