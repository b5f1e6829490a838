//! The interactive session: one filesystem, one prompt, one output log.
//!
//! All input arrives through [`Session::key`] (the input surface) or
//! [`Session::submit`] (a whole line). What a submitted line means depends
//! on the current [`InputMode`]: a shell command, the player's name, a game
//! menu choice, or a theme pick.

use std::sync::Arc;
use std::time::Duration;

use webcli_net::{HttpClient, NetworkService};
use webcli_terminal::{
    CommandOutput, CommandRegistry, Environment, JsonFileStore, KeyValueStore, MemoryStore,
    register_builtins,
};
use webcli_types::config::WebCliConfig;
use webcli_types::error::Result;
use webcli_types::input::Key;
use webcli_types::output::{Line, OutputSink, Style};
use webcli_vfs::{FileTree, path};

use crate::game::{self, Game, GameState, Lcg, Prompt};
use crate::input::InputField;
use crate::output::{OutputLog, render_html};
use crate::theme::ThemeManager;
use crate::weather::WeatherWorker;

/// Free-text input the session is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    PlayerName,
}

/// Menu the session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuId {
    Game,
    Theme,
}

/// What the next submitted line means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Shell command.
    Normal,
    AwaitingInput(InputPurpose),
    AwaitingMenuChoice(MenuId),
}

const WELCOME: &[&str] = &[
    "===========================================================",
    "|         Welcome to Web-based CLI Terminal v1.0          |",
    "|                                                         |",
    "|  Type \"help\" to see available commands                  |",
    "===========================================================",
];

pub struct Session {
    config: WebCliConfig,
    tree: FileTree,
    cwd: String,
    registry: CommandRegistry,
    store: Box<dyn KeyValueStore>,
    output: OutputLog,
    input: InputField,
    themes: ThemeManager,
    game: Option<Game>,
    weather: WeatherWorker,
    mode: InputMode,
    game_seed: Option<u64>,
}

impl Session {
    /// Build a session and print the welcome banner.
    ///
    /// `net` is `None` for an offline session; `weather` then always
    /// reports the fallback.
    pub fn new(
        config: WebCliConfig,
        tree: FileTree,
        store: Box<dyn KeyValueStore>,
        net: Option<Arc<dyn NetworkService>>,
    ) -> Self {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);

        let cwd = if tree.dir(&config.home).is_some() {
            config.home.clone()
        } else {
            log::warn!("home {} is not a directory, starting at /", config.home);
            "/".to_string()
        };

        let mut themes = ThemeManager::new();
        themes.load_saved(&*store);

        let mut session = Self {
            input: InputField::new(config.history_limit),
            weather: WeatherWorker::new(net, config.weather.clone()),
            config,
            tree,
            cwd,
            registry,
            store,
            output: OutputLog::new(),
            themes,
            game: None,
            mode: InputMode::Normal,
            game_seed: None,
        };
        for line in WELCOME {
            session.output.push(Line::new(Style::Welcome, *line));
        }
        session.output.push(Line::blank());
        session
    }

    /// Build a session from configuration: fixture or seed tree, file or
    /// memory store, and a real HTTP client.
    pub fn from_config(config: WebCliConfig) -> Result<Self> {
        let tree = match &config.fixture {
            Some(file) => FileTree::load(file)?,
            None => FileTree::seeded(),
        };
        let store: Box<dyn KeyValueStore> = match &config.store_path {
            Some(file) => Box::new(JsonFileStore::open(file)),
            None => Box::new(MemoryStore::new()),
        };
        let timeout = Duration::from_secs(config.weather.timeout_secs);
        let net: Arc<dyn NetworkService> = Arc::new(HttpClient::new(timeout));
        Ok(Self::new(config, tree, store, Some(net)))
    }

    /// Seed the game's random generator (otherwise seeded from the clock).
    pub fn with_game_seed(mut self, seed: u64) -> Self {
        self.game_seed = Some(seed);
        self
    }

    // -- accessors ----------------------------------------------------------

    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    pub fn history(&self) -> &[String] {
        self.input.history()
    }

    pub fn themes(&self) -> &ThemeManager {
        &self.themes
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        &*self.store
    }

    /// State of the running game, if any.
    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref().map(|g| &g.state)
    }

    /// `user@host:~/dir$`
    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$",
            self.config.user,
            self.config.host,
            path::abbreviate_home(&self.cwd, &self.config.home)
        )
    }

    /// The whole log as the page's HTML.
    pub fn render_html(&self) -> String {
        self.output.lines().iter().map(render_html).collect()
    }

    // -- input surface ------------------------------------------------------

    /// Handle one key press on the input field.
    pub fn key(&mut self, key: Key) {
        if self.mode == InputMode::AwaitingMenuChoice(MenuId::Theme) {
            match key {
                Key::ArrowUp => {
                    let line = self.themes.move_up();
                    self.output.push(line);
                    return;
                },
                Key::ArrowDown => {
                    let line = self.themes.move_down();
                    self.output.push(line);
                    return;
                },
                Key::Escape => {
                    self.input.take();
                    self.cancel_theme_menu();
                    return;
                },
                Key::Enter if self.input.text().trim().is_empty() => {
                    self.input.take();
                    self.apply_theme(self.themes.cursor());
                    return;
                },
                _ => {},
            }
        }

        match key {
            Key::Char(c) => self.input.push_char(c),
            Key::Backspace => self.input.backspace(),
            Key::Enter => {
                let line = self.input.take();
                self.submit(&line);
            },
            Key::ArrowUp if self.mode == InputMode::Normal => self.input.history_up(),
            Key::ArrowDown if self.mode == InputMode::Normal => self.input.history_down(),
            Key::Tab if self.mode == InputMode::Normal => {
                let candidates = self.registry.completions(self.input.text());
                self.input.complete(&candidates);
            },
            Key::ArrowUp | Key::ArrowDown | Key::Tab | Key::Escape => {},
        }
    }

    /// Handle a submitted line according to the current mode.
    pub fn submit(&mut self, line: &str) {
        match self.mode {
            InputMode::Normal => self.run_command(line),
            InputMode::AwaitingInput(InputPurpose::PlayerName)
            | InputMode::AwaitingMenuChoice(MenuId::Game) => self.game_input(line),
            InputMode::AwaitingMenuChoice(MenuId::Theme) => self.theme_input(line),
        }
    }

    // -- background work ----------------------------------------------------

    /// Print finished weather reports. Returns how many lines were added.
    pub fn poll(&mut self) -> usize {
        let lines = self.weather.poll();
        let n = lines.len();
        self.output.extend_lines(lines);
        n
    }

    /// Lookups still in flight.
    pub fn weather_pending(&self) -> usize {
        self.weather.pending()
    }

    /// Block until one weather lookup finishes or `timeout` passes.
    pub fn wait_for_weather(&mut self, timeout: Duration) -> usize {
        let lines = self.weather.wait(timeout);
        let n = lines.len();
        self.output.extend_lines(lines);
        n
    }

    // -- modes --------------------------------------------------------------

    fn run_command(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let echo = format!("{} {line}", self.prompt());
        self.output.push(Line::command(echo));

        let mut env = Environment {
            cwd: self.cwd.clone(),
            home: &self.config.home,
            user: &self.config.user,
            host: &self.config.host,
            tree: &mut self.tree,
            history: self.input.history(),
            store: &mut *self.store,
        };
        let result = self.registry.execute(line, &mut env);
        self.cwd = env.cwd;
        self.input.record(line);

        match result {
            Ok(CommandOutput::Lines(lines)) => self.output.extend_lines(lines),
            Ok(CommandOutput::None) => {},
            Ok(CommandOutput::Clear) => self.output.clear(),
            Ok(CommandOutput::FetchWeather { city, display }) => {
                self.output
                    .push(Line::result(format!("Fetching weather for {city}...")));
                self.weather.spawn(&city, &display);
                self.poll();
            },
            Ok(CommandOutput::ThemeSelector) => {
                self.output.extend_lines(self.themes.selector_lines());
                self.mode = InputMode::AwaitingMenuChoice(MenuId::Theme);
            },
            Ok(CommandOutput::StartGame) => self.start_game(),
            Err(e) => self.output.push(Line::error(e.to_string())),
        }
    }

    fn start_game(&mut self) {
        let rng = match self.game_seed {
            Some(seed) => Lcg::new(seed),
            None => Lcg::from_time(),
        };
        let mut game = Game::new(Box::new(rng));
        let prompt = game.start(&mut self.output);
        self.game = Some(game);
        self.follow(prompt);
    }

    fn game_input(&mut self, line: &str) {
        let Some(game) = self.game.as_mut() else {
            self.mode = InputMode::Normal;
            return;
        };
        let text = line.trim();
        let prompt = if self.mode == InputMode::AwaitingInput(InputPurpose::PlayerName) {
            let name = if text.is_empty() { game::DEFAULT_NAME } else { text };
            self.output.push(Line::command(format!("> {name}")));
            game.set_name(name, &mut self.output)
        } else {
            self.output.push(Line::command(format!("> {text}")));
            game.choose(text, &mut self.output)
        };
        self.follow(prompt);
    }

    /// Switch mode to whatever the game asked for.
    fn follow(&mut self, prompt: Prompt) {
        self.mode = match prompt {
            Prompt::Name => InputMode::AwaitingInput(InputPurpose::PlayerName),
            Prompt::Choice => InputMode::AwaitingMenuChoice(MenuId::Game),
            Prompt::Finished => {
                self.game = None;
                InputMode::Normal
            },
        };
    }

    fn theme_input(&mut self, line: &str) {
        let choice = line.trim();
        self.output.push(Line::command(format!("> {choice}")));
        if choice.is_empty() || choice.eq_ignore_ascii_case("q") {
            self.cancel_theme_menu();
            return;
        }
        match self.themes.find(choice) {
            Some(idx) => self.apply_theme(idx),
            None => self
                .output
                .push(Line::error(format!("theme: unknown theme '{choice}'"))),
        }
    }

    fn apply_theme(&mut self, idx: usize) {
        match self.themes.apply(idx, &mut *self.store) {
            Ok(lines) => self.output.extend_lines(lines),
            Err(e) => {
                log::warn!("could not save theme: {e}");
                self.output.push(Line::error(format!("theme: {e}")));
            },
        }
        self.mode = InputMode::Normal;
    }

    fn cancel_theme_menu(&mut self) {
        self.output.extend_lines(ThemeManager::cancel_lines());
        self.mode = InputMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(
            WebCliConfig::default(),
            FileTree::seeded(),
            Box::new(MemoryStore::new()),
            None,
        )
    }

    fn type_line(s: &mut Session, line: &str) {
        for c in line.chars() {
            s.key(Key::Char(c));
        }
        s.key(Key::Enter);
    }

    fn last(s: &Session) -> String {
        s.output().lines().last().map(Line::text).unwrap_or_default()
    }

    #[test]
    fn welcome_banner_first() {
        let s = session();
        let texts = s.output().texts();
        assert_eq!(texts.len(), 6);
        assert_eq!(texts[1], "|         Welcome to Web-based CLI Terminal v1.0          |");
        assert_eq!(s.output().lines()[0].style, Style::Welcome);
    }

    #[test]
    fn prompt_abbreviates_home() {
        let mut s = session();
        assert_eq!(s.prompt(), "user@webcli:~$");
        s.submit("cd documents");
        assert_eq!(s.prompt(), "user@webcli:~/documents$");
        s.submit("cd /");
        assert_eq!(s.prompt(), "user@webcli:/$");
    }

    #[test]
    fn empty_line_is_ignored() {
        let mut s = session();
        let before = s.output().len();
        s.submit("   ");
        assert_eq!(s.output().len(), before);
        assert!(s.history().is_empty());
    }

    #[test]
    fn echo_then_result() {
        let mut s = session();
        s.submit("pwd");
        let texts = s.output().texts();
        assert_eq!(texts[texts.len() - 2], "user@webcli:~$ pwd");
        assert_eq!(texts[texts.len() - 1], "/home/user");
        assert_eq!(s.output().lines()[texts.len() - 2].style, Style::Command);
    }

    #[test]
    fn unknown_command_is_error_line() {
        let mut s = session();
        s.submit("frobnicate now");
        assert_eq!(last(&s), "bash: frobnicate: command not found");
        assert_eq!(s.history(), ["frobnicate now"]);
    }

    #[test]
    fn history_excludes_current_line() {
        let mut s = session();
        s.submit("pwd");
        s.submit("history");
        assert_eq!(last(&s), "   1 pwd");
    }

    #[test]
    fn clear_empties_log() {
        let mut s = session();
        s.submit("pwd");
        s.submit("clear");
        assert!(s.output().is_empty());
        assert_eq!(s.output().epoch(), 1);
    }

    #[test]
    fn keys_edit_and_walk_history() {
        let mut s = session();
        type_line(&mut s, "pwd");
        type_line(&mut s, "whoami");
        s.key(Key::ArrowUp);
        assert_eq!(s.input().text(), "whoami");
        s.key(Key::ArrowUp);
        assert_eq!(s.input().text(), "pwd");
        s.key(Key::ArrowDown);
        s.key(Key::ArrowDown);
        assert_eq!(s.input().text(), "");
    }

    #[test]
    fn tab_completes_unique_prefix() {
        let mut s = session();
        for c in "who".chars() {
            s.key(Key::Char(c));
        }
        s.key(Key::Tab);
        assert_eq!(s.input().text(), "whoami");
        s.key(Key::Backspace);
        for _ in 0..5 {
            s.key(Key::Backspace);
        }
        s.key(Key::Char('c'));
        s.key(Key::Tab);
        assert_eq!(s.input().text(), "c");
    }

    #[test]
    fn theme_menu_by_keys() {
        let mut s = session();
        s.submit("theme");
        assert_eq!(s.mode(), InputMode::AwaitingMenuChoice(MenuId::Theme));
        s.key(Key::ArrowDown);
        assert_eq!(last(&s), ">  2. Dracula");
        s.key(Key::Enter);
        assert_eq!(s.mode(), InputMode::Normal);
        assert_eq!(s.themes().active().name, "Dracula");
        assert!(s.output().texts().contains(&"Theme \"Dracula\" applied successfully!".to_string()));
        assert!(s.store().get(webcli_terminal::store::THEME_KEY).is_some());
    }

    #[test]
    fn theme_menu_by_name_and_cancel() {
        let mut s = session();
        s.submit("theme");
        s.submit("nope");
        assert_eq!(last(&s), "theme: unknown theme 'nope'");
        assert_eq!(s.mode(), InputMode::AwaitingMenuChoice(MenuId::Theme));
        s.submit("nord");
        assert_eq!(s.themes().active().name, "Nord");

        s.submit("theme");
        s.key(Key::Escape);
        assert_eq!(s.mode(), InputMode::Normal);
        assert!(s.output().texts().contains(&"Theme selection cancelled.".to_string()));
        assert_eq!(s.themes().active().name, "Nord");
    }

    #[test]
    fn saved_theme_restored_on_start() {
        let mut store = MemoryStore::new();
        let mut tm = ThemeManager::new();
        tm.apply(4, &mut store).unwrap();
        let s = Session::new(WebCliConfig::default(), FileTree::seeded(), Box::new(store), None);
        assert_eq!(s.themes().active().name, "Solarized Dark");
        assert_eq!(s.output().len(), 6);
    }

    #[test]
    fn game_modes() {
        let mut s = session().with_game_seed(1);
        s.submit("dragon-slayer");
        assert_eq!(s.mode(), InputMode::AwaitingInput(InputPurpose::PlayerName));
        s.submit("");
        assert!(s.output().texts().contains(&"> Dragonslayer".to_string()));
        assert_eq!(s.mode(), InputMode::AwaitingMenuChoice(MenuId::Game));
        assert_eq!(s.game().map(|g| g.player.name.as_str()), Some("Dragonslayer"));
        s.submit("0");
        assert_eq!(s.mode(), InputMode::Normal);
        assert!(s.game().is_none());
        // game input is not shell history
        assert_eq!(s.history(), ["dragon-slayer"]);
    }

    #[test]
    fn offline_weather_falls_back_immediately() {
        let mut s = session();
        s.submit("weather New York");
        let texts = s.output().texts();
        let n = texts.len();
        assert_eq!(texts[n - 4], "Fetching weather for New+York...");
        assert_eq!(texts[n - 1], "Weather in New York: [SUNNY], 25C");
        assert_eq!(s.weather_pending(), 0);
    }

    #[test]
    fn missing_home_starts_at_root() {
        let config = WebCliConfig {
            home: "/nowhere".to_string(),
            ..WebCliConfig::default()
        };
        let s = Session::new(config, FileTree::seeded(), Box::new(MemoryStore::new()), None);
        assert_eq!(s.cwd(), "/");
    }

    #[test]
    fn html_rendering_of_log() {
        let s = session();
        assert!(s.render_html().starts_with("<div class=\"output-line welcome-message\">"));
    }
}
