//! The session's output log and its HTML rendering.

use webcli_types::output::{Line, OutputSink};

/// Append-only log of output lines, cleared by `clear`.
///
/// Every clear bumps `epoch`, so a front end that prints incrementally can
/// tell that the lines it already showed are gone.
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    lines: Vec<Line>,
    epoch: u64,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.epoch += 1;
    }

    /// Plain text of every line.
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(Line::text).collect()
    }
}

impl OutputSink for OutputLog {
    fn push(&mut self, line: Line) {
        self.lines.push(line);
    }
}

fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Render one line as the page's `<div class="output-line ...">` element.
pub fn render_html(line: &Line) -> String {
    let mut html = format!("<div class=\"output-line {}\">", line.style.css_class());
    for span in &line.spans {
        match span.style {
            Some(style) => {
                html.push_str("<span class=\"");
                html.push_str(style.css_class());
                html.push_str("\">");
                escape_html(&span.text, &mut html);
                html.push_str("</span>");
            },
            None => escape_html(&span.text, &mut html),
        }
    }
    html.push_str("</div>");
    html
}
