//! Color themes and the interactive theme picker.

use serde::{Deserialize, Serialize};
use webcli_terminal::store::{KeyValueStore, THEME_KEY};
use webcli_types::error::Result;
use webcli_types::output::{Line, Style};

/// The eight colors a theme sets, as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub background: String,
    pub header_bg: String,
    pub text: String,
    pub prompt: String,
    pub command: String,
    pub error: String,
    pub directory: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[allow(clippy::too_many_arguments)]
fn theme(
    name: &str,
    background: &str,
    header_bg: &str,
    text: &str,
    prompt: &str,
    command: &str,
    error: &str,
    directory: &str,
    file: &str,
) -> Theme {
    Theme {
        name: name.to_string(),
        colors: ThemeColors {
            background: background.to_string(),
            header_bg: header_bg.to_string(),
            text: text.to_string(),
            prompt: prompt.to_string(),
            command: command.to_string(),
            error: error.to_string(),
            directory: directory.to_string(),
            file: file.to_string(),
        },
    }
}

/// Built-in themes in menu order. The first is the default.
pub fn builtin_themes() -> Vec<Theme> {
    vec![
        theme("Default Dark", "#1e1e1e", "#323232", "#f0f0f0", "#4ec9b0", "#6c757d", "#ff6b6b", "#569cd6", "#9cdcfe"),
        theme("Dracula", "#282a36", "#44475a", "#f8f8f2", "#50fa7b", "#6272a4", "#ff5555", "#bd93f9", "#8be9fd"),
        theme("Monokai", "#272822", "#3e3d32", "#f8f8f2", "#a6e22e", "#75715e", "#f92672", "#66d9ef", "#e6db74"),
        theme("Nord", "#2e3440", "#3b4252", "#eceff4", "#88c0d0", "#4c566a", "#bf616a", "#81a1c1", "#8fbcbb"),
        theme("Solarized Dark", "#002b36", "#073642", "#839496", "#2aa198", "#586e75", "#dc322f", "#268bd2", "#b58900"),
        theme("One Dark", "#282c34", "#21252b", "#abb2bf", "#98c379", "#5c6370", "#e06c75", "#61afef", "#e5c07b"),
        theme("Gruvbox Dark", "#282828", "#3c3836", "#ebdbb2", "#b8bb26", "#928374", "#fb4934", "#83a598", "#fabd2f"),
        theme("Tokyo Night", "#1a1b26", "#24283b", "#a9b1d6", "#9ece6a", "#565f89", "#f7768e", "#7aa2f7", "#bb9af7"),
        theme("Cyberpunk", "#000b1e", "#0a1929", "#00ff9f", "#ff006e", "#00b4d8", "#ff0054", "#00ffff", "#ffbe0b"),
        theme("Light Mode", "#ffffff", "#f5f5f5", "#333333", "#0066cc", "#999999", "#cc0000", "#0066cc", "#006600"),
        theme("Matrix", "#000000", "#0d0d0d", "#00ff00", "#00ff00", "#008000", "#ff0000", "#00ff00", "#00cc00"),
        theme("Oceanic", "#1b2b34", "#343d46", "#cdd3de", "#5fb3b3", "#65737e", "#ec5f67", "#6699cc", "#99c794"),
    ]
}

/// Parse `#rrggbb` into an RGB triple.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Theme list, menu cursor and the theme currently in effect.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    themes: Vec<Theme>,
    cursor: usize,
    active: Theme,
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeManager {
    pub fn new() -> Self {
        let themes = builtin_themes();
        let active = themes[0].clone();
        Self {
            themes,
            cursor: 0,
            active,
        }
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn active(&self) -> &Theme {
        &self.active
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Activate the stored theme without printing anything.
    ///
    /// Any theme object is accepted, not only the built-ins. A corrupt
    /// entry is logged and the default stays active.
    pub fn load_saved(&mut self, store: &dyn KeyValueStore) {
        let Some(raw) = store.get(THEME_KEY) else {
            return;
        };
        match serde_json::from_str::<Theme>(&raw) {
            Ok(theme) => {
                if let Some(idx) = self.themes.iter().position(|t| t.name == theme.name) {
                    self.cursor = idx;
                }
                log::debug!("restored theme {}", theme.name);
                self.active = theme;
            },
            Err(e) => log::warn!("ignoring saved theme: {e}"),
        }
    }

    fn item_line(&self, idx: usize) -> Line {
        let selected = idx == self.cursor;
        let (arrow, style) = if selected {
            ("> ", Style::ThemeSelected)
        } else {
            ("  ", Style::ThemeItem)
        };
        Line::new(style, format!("{arrow}{:>2}. {}", idx + 1, self.themes[idx].name))
    }

    /// Header, instructions and the full list.
    pub fn selector_lines(&self) -> Vec<Line> {
        let rule = "═".repeat(52);
        let mut lines = vec![
            Line::blank(),
            Line::new(Style::ThemeHeader, format!("╔{rule}╗")),
            Line::new(Style::ThemeHeader, format!("║{:<52}║", "           THEME SELECTOR")),
            Line::new(Style::ThemeHeader, format!("╚{rule}╝")),
            Line::blank(),
            Line::new(
                Style::ThemeInstruction,
                "Use UP/DOWN Arrow Keys to navigate, Enter to apply, Esc to cancel",
            ),
            Line::new(
                Style::ThemeInstruction,
                "Or type a number or name and press Enter (q to cancel)",
            ),
            Line::blank(),
        ];
        lines.extend((0..self.themes.len()).map(|i| self.item_line(i)));
        lines
    }

    /// Move the cursor up, wrapping, and return the newly selected row.
    pub fn move_up(&mut self) -> Line {
        let n = self.themes.len();
        self.cursor = (self.cursor + n - 1) % n;
        self.item_line(self.cursor)
    }

    /// Move the cursor down, wrapping, and return the newly selected row.
    pub fn move_down(&mut self) -> Line {
        self.cursor = (self.cursor + 1) % self.themes.len();
        self.item_line(self.cursor)
    }

    /// Index for a typed choice: a 1-based number or a name, any case.
    pub fn find(&self, choice: &str) -> Option<usize> {
        let choice = choice.trim();
        if let Ok(n) = choice.parse::<usize>() {
            return (1..=self.themes.len()).contains(&n).then(|| n - 1);
        }
        self.themes
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(choice))
    }

    /// Activate and persist a theme, returning the confirmation lines.
    pub fn apply(&mut self, idx: usize, store: &mut dyn KeyValueStore) -> Result<Vec<Line>> {
        let Some(theme) = self.themes.get(idx).cloned() else {
            return Ok(vec![Line::error("Invalid theme selection.")]);
        };
        store.set(THEME_KEY, &serde_json::to_string(&theme)?)?;
        log::info!("theme set to {}", theme.name);
        let confirmation = format!("Theme \"{}\" applied successfully!", theme.name);
        self.cursor = idx;
        self.active = theme;
        Ok(vec![
            Line::blank(),
            Line::new(Style::ThemeApplied, confirmation),
            Line::blank(),
        ])
    }

    pub fn cancel_lines() -> Vec<Line> {
        vec![
            Line::blank(),
            Line::new(Style::ThemeCancelled, "Theme selection cancelled."),
            Line::blank(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webcli_terminal::store::MemoryStore;

    #[test]
    fn twelve_builtins_with_valid_colors() {
        let themes = builtin_themes();
        assert_eq!(themes.len(), 12);
        for t in &themes {
            for c in [&t.colors.background, &t.colors.header_bg, &t.colors.text, &t.colors.prompt] {
                assert!(parse_hex(c).is_some(), "{}: {c}", t.name);
            }
        }
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex("#ff0080"), Some((255, 0, 128)));
        assert_eq!(parse_hex("ff0080"), None);
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }

    #[test]
    fn colors_use_camel_case_keys() {
        let json = serde_json::to_string(&builtin_themes()[0]).unwrap();
        assert!(json.contains("\"headerBg\":\"#323232\""));
        assert!(json.contains("\"name\":\"Default Dark\""));
    }

    #[test]
    fn selector_marks_cursor() {
        let tm = ThemeManager::new();
        let lines = tm.selector_lines();
        let texts: Vec<String> = lines.iter().map(Line::text).collect();
        assert_eq!(texts[1].chars().count(), 54);
        assert_eq!(texts[2].chars().count(), 54);
        assert!(texts.contains(&">  1. Default Dark".to_string()));
        assert!(texts.contains(&"   2. Dracula".to_string()));
        assert!(texts.contains(&"  12. Oceanic".to_string()));
    }

    #[test]
    fn cursor_wraps() {
        let mut tm = ThemeManager::new();
        assert_eq!(tm.move_up().text(), "> 12. Oceanic");
        assert_eq!(tm.cursor(), 11);
        assert_eq!(tm.move_down().text(), ">  1. Default Dark");
        assert_eq!(tm.cursor(), 0);
    }

    #[test]
    fn find_by_number_or_name() {
        let tm = ThemeManager::new();
        assert_eq!(tm.find("4"), Some(3));
        assert_eq!(tm.find("nord"), Some(3));
        assert_eq!(tm.find(" Tokyo Night "), Some(7));
        assert_eq!(tm.find("0"), None);
        assert_eq!(tm.find("13"), None);
        assert_eq!(tm.find("Solarized"), None);
    }

    #[test]
    fn apply_persists_and_reloads() {
        let mut store = MemoryStore::new();
        let mut tm = ThemeManager::new();
        let lines = tm.apply(1, &mut store).unwrap();
        assert_eq!(lines[1].text(), "Theme \"Dracula\" applied successfully!");
        assert_eq!(tm.active().name, "Dracula");

        let mut fresh = ThemeManager::new();
        fresh.load_saved(&store);
        assert_eq!(fresh.active().name, "Dracula");
        assert_eq!(fresh.cursor(), 1);
    }

    #[test]
    fn corrupt_saved_theme_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "{not json").unwrap();
        let mut tm = ThemeManager::new();
        tm.load_saved(&store);
        assert_eq!(tm.active().name, "Default Dark");
    }

    #[test]
    fn custom_saved_theme_is_accepted() {
        let mut store = MemoryStore::new();
        let mut custom = builtin_themes()[3].clone();
        custom.name = "Mine".to_string();
        store
            .set(THEME_KEY, &serde_json::to_string(&custom).unwrap())
            .unwrap();
        let mut tm = ThemeManager::new();
        tm.load_saved(&store);
        assert_eq!(tm.active(), &custom);
        assert_eq!(tm.cursor(), 0);
    }
}
