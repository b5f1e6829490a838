//! The command input field: editable text plus a walkable history.

/// Single-line input with submitted-line history.
///
/// The history cursor ranges over `0..=history.len()`; the one-past-end
/// position means "not browsing" and shows an empty field.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    text: String,
    history: Vec<String>,
    cursor: usize,
    /// Maximum history entries kept. Zero keeps everything.
    limit: usize,
}

impl InputField {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    /// Return the field content and leave it empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    /// Submitted lines, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Append a submitted line and reset browsing.
    ///
    /// Blank lines are not recorded.
    pub fn record(&mut self, line: &str) {
        let line = line.trim();
        if !line.is_empty() {
            self.history.push(line.to_string());
            if self.limit > 0 && self.history.len() > self.limit {
                let excess = self.history.len() - self.limit;
                self.history.drain(..excess);
            }
        }
        self.cursor = self.history.len();
    }

    /// Step back one entry. Stays put at the oldest entry.
    pub fn history_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.text = self.history[self.cursor].clone();
        }
    }

    /// Step forward one entry. Past the newest, the field is cleared.
    pub fn history_down(&mut self) {
        if self.cursor + 1 < self.history.len() {
            self.cursor += 1;
            self.text = self.history[self.cursor].clone();
        } else {
            self.cursor = self.history.len();
            self.text.clear();
        }
    }

    /// Replace the field with the only candidate, if there is exactly one.
    pub fn complete(&mut self, candidates: &[String]) -> bool {
        match candidates {
            [only] => {
                self.text = only.clone();
                true
            },
            _ => false,
        }
    }
}
