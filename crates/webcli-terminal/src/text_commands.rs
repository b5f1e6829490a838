//! Text commands: cat, echo, grep, wc, head, tail.
//!
//! File operands are resolved as paths relative to the current directory.

use regex::RegexBuilder;

use webcli_types::error::{Result, WebCliError};
use webcli_types::output::{Line, Span, Style};

use crate::interpreter::{Command, CommandOutput, Environment, has_flag, split_flags};

/// Content of the file at `name`, or the `verb:`-prefixed lookup error.
fn read_file<'e>(env: &'e Environment<'_>, verb: &str, name: &str) -> Result<&'e str> {
    let node = env.tree.resolve(&env.cwd, name).ok_or_else(|| {
        WebCliError::NotFound(format!("{verb}: {name}: No such file or directory"))
    })?;
    node.content()
        .ok_or_else(|| WebCliError::TypeMismatch(format!("{verb}: {name}: Is a directory")))
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

const CAT_HELP: &[&str] = &[
    "Usage: cat [OPTION]... [FILE]...",
    "Concatenate FILE(s) to standard output.",
    "",
    "Options:",
    "  -n    number all output lines",
    "  -E    display $ at end of each line",
    "  -T    display TAB characters as ^I",
    "  -A    equivalent to -ET",
    "  -s    suppress repeated empty output lines",
];

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Display file contents"
    }
    fn usage(&self) -> &str {
        "cat [-n] [-E] [-T] [-A] [-s] [file...]"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.contains(&"--help") {
            return Ok(CommandOutput::Lines(
                CAT_HELP.iter().map(|l| Line::result(*l)).collect(),
            ));
        }

        let (flags, files) = split_flags(args);
        if files.is_empty() {
            return Ok(CommandOutput::Lines(vec![
                Line::error("cat: missing file operand"),
                Line::result("Try 'cat --help' for more information."),
            ]));
        }

        let show_all = has_flag(&flags, 'A');
        let number = has_flag(&flags, 'n');
        let ends = show_all || has_flag(&flags, 'E') || has_flag(&flags, 'e');
        let tabs = show_all || has_flag(&flags, 'T') || has_flag(&flags, 't');
        let squeeze = has_flag(&flags, 's');

        let mut out = Vec::new();
        for (i, name) in files.iter().enumerate() {
            match read_file(env, "cat", name) {
                Ok(content) => {
                    let mut kept: Vec<&str> = Vec::new();
                    for line in content.split('\n') {
                        let blank = line.trim().is_empty();
                        if squeeze
                            && blank
                            && kept.last().is_some_and(|prev| prev.trim().is_empty())
                        {
                            continue;
                        }
                        kept.push(line);
                    }
                    for (n, line) in kept.iter().enumerate() {
                        let mut text = if tabs {
                            line.replace('\t', "^I")
                        } else {
                            (*line).to_string()
                        };
                        if ends {
                            text.push('$');
                        }
                        if number {
                            text = format!("{:>6}  {text}", n + 1);
                        }
                        out.push(Line::result(text));
                    }
                },
                Err(e) => out.push(Line::error(e.to_string())),
            }
            if i + 1 < files.len() {
                out.push(Line::result(""));
            }
        }
        Ok(CommandOutput::Lines(out))
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Display text"
    }
    fn usage(&self) -> &str {
        "echo [-n] [-e] [text...]"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.contains(&"--help") {
            return Ok(CommandOutput::Lines(vec![
                Line::result("Usage: echo [SHORT-OPTION]... [STRING]..."),
                Line::result("Echo the STRING(s) to standard output."),
                Line::result(""),
                Line::result("  -n    do not output the trailing newline"),
                Line::result("  -e    enable interpretation of backslash escapes"),
            ]));
        }

        let is_option = |a: &&str| matches!(*a, "-n" | "-e" | "-ne" | "-en");
        let interpret = args.iter().any(|a| is_option(a) && a.contains('e'));
        let text = args
            .iter()
            .copied()
            .filter(|a| !is_option(a))
            .collect::<Vec<_>>()
            .join(" ");
        let text = if interpret { unescape(&text) } else { text };

        Ok(CommandOutput::Lines(
            text.split('\n').map(Line::result).collect(),
        ))
    }
}

/// Interpret `\n \t \r \' \" \\`. Unknown escapes are kept as written.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(q @ ('\'' | '"' | '\\')) => out.push(q),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// grep
// ---------------------------------------------------------------------------

struct GrepCmd;
impl Command for GrepCmd {
    fn name(&self) -> &str {
        "grep"
    }
    fn description(&self) -> &str {
        "Search for patterns in files"
    }
    fn usage(&self) -> &str {
        "grep [-i] [-n] [-v] [pattern] [file]"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (flags, operands) = split_flags(args);
        let [pattern, file, ..] = operands[..] else {
            return Ok(CommandOutput::Lines(vec![
                Line::error("grep: missing operand"),
                Line::result("Usage: grep [pattern] [file]"),
            ]));
        };
        let ignore_case = has_flag(&flags, 'i');
        let numbered = has_flag(&flags, 'n');
        let invert = has_flag(&flags, 'v');

        let content = read_file(env, "grep", file)?;
        let re = RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()
            .map_err(|e| {
                log::debug!("grep: bad pattern {pattern:?}: {e}");
                WebCliError::Pattern("grep: invalid pattern".to_string())
            })?;

        let mut out = Vec::new();
        for (i, line) in content.split('\n').enumerate() {
            if re.is_match(line) == invert {
                continue;
            }
            let mut spans = Vec::new();
            if numbered {
                spans.push(Span::plain(format!("{}:", i + 1)));
            }
            if invert {
                spans.push(Span::plain(line));
            } else {
                let mut last = 0;
                for m in re.find_iter(line).filter(|m| !m.is_empty()) {
                    if m.start() > last {
                        spans.push(Span::plain(&line[last..m.start()]));
                    }
                    spans.push(Span::styled(m.as_str(), Style::Match));
                    last = m.end();
                }
                if last < line.len() || spans.is_empty() {
                    spans.push(Span::plain(&line[last..]));
                }
            }
            out.push(Line::from_spans(Style::Result, spans));
        }

        if out.is_empty() {
            return Err(WebCliError::NotFound("grep: no matches found".to_string()));
        }
        Ok(CommandOutput::Lines(out))
    }
}

// ---------------------------------------------------------------------------
// wc
// ---------------------------------------------------------------------------

struct WcCmd;
impl Command for WcCmd {
    fn name(&self) -> &str {
        "wc"
    }
    fn description(&self) -> &str {
        "Count lines, words, and characters"
    }
    fn usage(&self) -> &str {
        "wc [-l] [-w] [-c] [file]"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (flags, operands) = split_flags(args);
        let name = *operands
            .first()
            .ok_or_else(|| WebCliError::Usage("wc: missing file operand".to_string()))?;
        let content = read_file(env, "wc", name)?;

        let lines = has_flag(&flags, 'l');
        let words = has_flag(&flags, 'w');
        let chars = has_flag(&flags, 'c');
        let all = !lines && !words && !chars;

        let mut out = String::new();
        if all || lines {
            out.push_str(&format!("{:>8}", content.split('\n').count()));
        }
        if all || words {
            out.push_str(&format!("{:>8}", content.split_whitespace().count()));
        }
        if all || chars {
            out.push_str(&format!("{:>8}", content.encode_utf16().count()));
        }
        out.push(' ');
        out.push_str(name);
        Ok(CommandOutput::text(out))
    }
}

// ---------------------------------------------------------------------------
// head / tail
// ---------------------------------------------------------------------------

/// Parsed `[-n N] file` arguments. `count` is `None` when `N` has no
/// leading digits.
struct SliceArgs<'a> {
    count: Option<i64>,
    file: Option<&'a str>,
}

/// Leading integer of `s`: optional whitespace and sign, then digits.
/// Anything after the digits is ignored, so `2x` and `3.5` read as 2 and 3.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = rest[..digits]
        .bytes()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    Some(if negative { -value } else { value })
}

fn parse_slice_args<'a>(args: &[&'a str]) -> SliceArgs<'a> {
    let mut parsed = SliceArgs {
        count: Some(10),
        file: None,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if *arg == "-n" {
            if let Some(n) = iter.next() {
                parsed.count = leading_int(n);
            }
        } else if !arg.starts_with('-') {
            parsed.file = Some(arg);
        }
    }
    parsed
}

#[derive(Clone, Copy)]
enum End {
    Head,
    Tail,
}

/// Start offset for `slice(k)` semantics: negative `k` counts from the end.
fn slice_offset(k: i64, len: usize) -> usize {
    if k < 0 {
        len.saturating_sub(k.unsigned_abs() as usize)
    } else {
        (k as usize).min(len)
    }
}

/// Lines kept by `head -n N` (`lines[0..N]`) or `tail -n N` (`lines[-N..]`).
///
/// A missing count selects nothing for `head` and everything for `tail`.
/// `tail -n 0` prints every line and `tail -n -K` skips the first `K`.
fn select<'l>(lines: &'l [&'l str], count: Option<i64>, end: End) -> &'l [&'l str] {
    let len = lines.len();
    match (end, count) {
        (End::Head, None) => &[],
        (End::Head, Some(n)) => &lines[..slice_offset(n, len)],
        (End::Tail, None) => lines,
        (End::Tail, Some(n)) => &lines[slice_offset(n.saturating_neg(), len)..],
    }
}

fn slice_lines(
    verb: &str,
    end: End,
    args: &[&str],
    env: &Environment<'_>,
) -> Result<CommandOutput> {
    let parsed = parse_slice_args(args);
    let name = parsed
        .file
        .ok_or_else(|| WebCliError::Usage(format!("{verb}: missing file operand")))?;
    let content = read_file(env, verb, name)?;
    let lines: Vec<&str> = content.split('\n').collect();
    let selected = select(&lines, parsed.count, end);
    Ok(CommandOutput::Lines(
        selected.iter().map(|l| Line::result(*l)).collect(),
    ))
}

struct HeadCmd;
impl Command for HeadCmd {
    fn name(&self) -> &str {
        "head"
    }
    fn description(&self) -> &str {
        "Display first lines of a file"
    }
    fn usage(&self) -> &str {
        "head [-n N] [file]"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        slice_lines("head", End::Head, args, env)
    }
}

struct TailCmd;
impl Command for TailCmd {
    fn name(&self) -> &str {
        "tail"
    }
    fn description(&self) -> &str {
        "Display last lines of a file"
    }
    fn usage(&self) -> &str {
        "tail [-n N] [file]"
    }
    fn category(&self) -> &str {
        "text"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        slice_lines("tail", End::Tail, args, env)
    }
}

/// Register text commands into a registry.
pub fn register_text_commands(reg: &mut crate::CommandRegistry) {
    reg.register(Box::new(CatCmd));
    reg.register(Box::new(EchoCmd));
    reg.register(Box::new(GrepCmd));
    reg.register(Box::new(WcCmd));
    reg.register(Box::new(HeadCmd));
    reg.register(Box::new(TailCmd));
}
