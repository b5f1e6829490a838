//! Styled output lines.
//!
//! Handlers never produce markup. A line is a sequence of spans, each with
//! an optional style, and the line itself carries the class of output it
//! belongs to (command echo, result, error, game text, ...). Renderers map
//! styles to CSS classes or terminal colors.

/// Output class of a line or span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Echo of a submitted input line.
    Command,
    /// Normal command output.
    Result,
    /// Error output.
    Error,
    /// Start-up banner.
    Welcome,
    /// `help` table rows.
    Help,
    /// Verb column of the `help` table.
    HelpCommand,
    Directory,
    File,
    /// Highlighted `grep` match.
    Match,
    GameBanner,
    GameLocation,
    GameStory,
    GameDescription,
    GameQuestion,
    GameHint,
    GameOption,
    GameNpc,
    GameSuccess,
    GameCombat,
    GameEnemy,
    GamePlayer,
    GameReward,
    GameStats,
    GameGold,
    GameVictory,
    GameDefeat,
    GameDragon,
    ThemeHeader,
    ThemeInstruction,
    ThemeItem,
    ThemeSelected,
    ThemeApplied,
    ThemeCancelled,
}

impl Style {
    /// CSS class used by the HTML page.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Command => "output-command",
            Self::Result => "output-result",
            Self::Error => "output-error",
            Self::Welcome => "welcome-message",
            Self::Help => "help-table",
            Self::HelpCommand => "help-command",
            Self::Directory => "directory",
            Self::File => "file",
            Self::Match => "grep-match",
            Self::GameBanner => "game-banner",
            Self::GameLocation => "game-location",
            Self::GameStory => "game-story",
            Self::GameDescription => "game-description",
            Self::GameQuestion => "game-question",
            Self::GameHint => "game-hint",
            Self::GameOption => "game-option",
            Self::GameNpc => "game-npc",
            Self::GameSuccess => "game-success",
            Self::GameCombat => "game-combat",
            Self::GameEnemy => "game-enemy",
            Self::GamePlayer => "game-player",
            Self::GameReward => "game-reward",
            Self::GameStats => "game-stats",
            Self::GameGold => "game-gold",
            Self::GameVictory => "game-victory",
            Self::GameDefeat => "game-defeat",
            Self::GameDragon => "game-dragon",
            Self::ThemeHeader => "theme-header",
            Self::ThemeInstruction => "theme-instruction",
            Self::ThemeItem => "theme-item",
            Self::ThemeSelected => "theme-selected",
            Self::ThemeApplied => "theme-applied",
            Self::ThemeCancelled => "theme-cancelled",
        }
    }
}

/// A run of text inside a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    /// `None` inherits the line style.
    pub style: Option<Style>,
}

impl Span {
    /// Unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    /// Text with its own style.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
        }
    }
}

/// One line of the output log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub style: Style,
    pub spans: Vec<Span>,
}

impl Line {
    /// A line consisting of one unstyled span.
    pub fn new(style: Style, text: impl Into<String>) -> Self {
        Self {
            style,
            spans: vec![Span::plain(text)],
        }
    }

    /// A line built from pre-styled spans.
    pub fn from_spans(style: Style, spans: Vec<Span>) -> Self {
        Self { style, spans }
    }

    pub fn result(text: impl Into<String>) -> Self {
        Self::new(Style::Result, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Style::Error, text)
    }

    pub fn command(text: impl Into<String>) -> Self {
        Self::new(Style::Command, text)
    }

    /// An empty result line.
    pub fn blank() -> Self {
        Self::new(Style::Result, "")
    }

    /// Plain text of the line with styling stripped.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Accept-only destination for output lines.
pub trait OutputSink {
    /// Append one line.
    fn push(&mut self, line: Line);

    /// Append several lines in order.
    fn extend_lines(&mut self, lines: Vec<Line>) {
        for line in lines {
            self.push(line);
        }
    }
}

impl OutputSink for Vec<Line> {
    fn push(&mut self, line: Line) {
        Vec::push(self, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_text_concatenates_spans() {
        let line = Line::from_spans(
            Style::Result,
            vec![Span::plain("a"), Span::styled("foo", Style::Match), Span::plain("b")],
        );
        assert_eq!(line.text(), "afoob");
    }

    #[test]
    fn css_classes_match_page() {
        assert_eq!(Style::Command.css_class(), "output-command");
        assert_eq!(Style::Error.css_class(), "output-error");
        assert_eq!(Style::Result.css_class(), "output-result");
    }

    #[test]
    fn vec_is_a_sink() {
        let mut out: Vec<Line> = Vec::new();
        out.extend_lines(vec![Line::result("1"), Line::error("2")]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].style, Style::Error);
    }

    #[test]
    fn blank_line_is_empty_result() {
        let line = Line::blank();
        assert_eq!(line.style, Style::Result);
        assert!(line.text().is_empty());
    }
}
