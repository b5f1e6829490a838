//! ANSI rendering of the session's output log.

use std::io::{self, Write};

use webcli_shell::theme::{ThemeColors, parse_hex};
use webcli_shell::{InputMode, Session};
use webcli_types::output::{Line, Style};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Theme color used for a style.
fn color_for(style: Style, colors: &ThemeColors) -> &str {
    match style {
        Style::Command => &colors.command,
        Style::Error | Style::GameDefeat | Style::GameEnemy | Style::GameDragon => &colors.error,
        Style::Directory
        | Style::HelpCommand
        | Style::GameBanner
        | Style::GameLocation
        | Style::ThemeHeader => &colors.directory,
        Style::File | Style::Match | Style::GameGold | Style::GameNpc => &colors.file,
        Style::Welcome
        | Style::GameSuccess
        | Style::GameVictory
        | Style::GameReward
        | Style::ThemeSelected
        | Style::ThemeApplied => &colors.prompt,
        _ => &colors.text,
    }
}

fn fg(hex: &str) -> String {
    match parse_hex(hex) {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m"),
        None => String::new(),
    }
}

fn paint_line(line: &Line, colors: &ThemeColors) -> String {
    let base = fg(color_for(line.style, colors));
    let mut out = base.clone();
    for span in &line.spans {
        match span.style {
            Some(style) => {
                out.push_str(&fg(color_for(style, colors)));
                if style == Style::Match {
                    out.push_str(BOLD);
                }
                out.push_str(&span.text);
                out.push_str(RESET);
                out.push_str(&base);
            },
            None => out.push_str(&span.text),
        }
    }
    out.push_str(RESET);
    out
}

/// Prints log lines not yet shown. Repaints from scratch after `clear`.
#[derive(Debug, Default)]
pub struct Painter {
    printed: usize,
    epoch: u64,
}

impl Painter {
    pub fn flush(&mut self, session: &Session, out: &mut impl Write) -> io::Result<()> {
        let log = session.output();
        if log.epoch() != self.epoch {
            self.epoch = log.epoch();
            self.printed = 0;
            out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        let colors = &session.themes().active().colors;
        for line in &log.lines()[self.printed.min(log.len())..] {
            writeln!(out, "{}", paint_line(line, colors))?;
        }
        self.printed = log.len();
        out.flush()
    }

    /// Print the prompt for the current input mode, without a newline.
    pub fn prompt(&self, session: &Session, out: &mut impl Write) -> io::Result<()> {
        let colors = &session.themes().active().colors;
        let prompt = match session.mode() {
            InputMode::Normal => session.prompt(),
            _ => ">".to_string(),
        };
        write!(out, "{}{prompt}{RESET} ", fg(&colors.prompt))?;
        out.flush()
    }
}
