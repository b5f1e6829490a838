//! Filesystem commands: ls, pwd, cd, mkdir, touch, rm, cp, mv, find, tree.
//!
//! Mutating commands operate on entries of the current directory only;
//! operands are entry names, not paths.

use webcli_types::error::{Result, WebCliError};
use webcli_types::output::{Line, Span, Style};
use webcli_vfs::{Entries, VNode, path};

use crate::interpreter::{Command, CommandOutput, Environment, has_flag, split_flags};

/// Entries of the current directory.
pub(crate) fn here<'e>(env: &'e Environment<'_>, verb: &str) -> Result<&'e Entries> {
    env.tree
        .dir(&env.cwd)
        .ok_or_else(|| WebCliError::NotFound(format!("{verb}: cannot access directory")))
}

fn here_mut<'e>(env: &'e mut Environment<'_>, verb: &str) -> Result<&'e mut Entries> {
    env.tree
        .dir_mut(&env.cwd)
        .ok_or_else(|| WebCliError::NotFound(format!("{verb}: cannot access directory")))
}

/// Reject names that could not be looked up again as a single segment.
fn check_entry_name(verb: &str, what: &str, name: &str) -> Result<()> {
    if name.contains('/') || name == "." || name == ".." {
        return Err(WebCliError::Usage(format!(
            "{verb}: cannot {what} '{name}': Invalid argument"
        )));
    }
    Ok(())
}

fn entry_style(node: &VNode) -> Style {
    if node.is_dir() {
        Style::Directory
    } else {
        Style::File
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn usage(&self) -> &str {
        "ls [-l] [-a] [path]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (flags, operands) = split_flags(args);
        let long = has_flag(&flags, 'l');

        let entries: Vec<(&str, &VNode)> = match operands.first() {
            None => here(env, "ls")?.iter().map(|(n, v)| (n.as_str(), v)).collect(),
            Some(target) => {
                let node = env.tree.resolve(&env.cwd, target).ok_or_else(|| {
                    WebCliError::NotFound(format!(
                        "ls: cannot access '{target}': No such file or directory"
                    ))
                })?;
                match node.entries() {
                    Some(entries) => entries.iter().map(|(n, v)| (n.as_str(), v)).collect(),
                    None => vec![(*target, node)],
                }
            },
        };

        if entries.is_empty() {
            return Ok(CommandOutput::None);
        }

        if long {
            let date = chrono::Local::now().format("%-m/%-d/%Y").to_string();
            let lines = entries
                .iter()
                .map(|(name, node)| {
                    let kind = if node.is_dir() { 'd' } else { '-' };
                    Line::from_spans(
                        Style::Result,
                        vec![
                            Span::plain(format!(
                                "{kind}rwxr-xr-x  1 user user {:>8} {date} ",
                                node.size()
                            )),
                            Span::styled(*name, entry_style(node)),
                        ],
                    )
                })
                .collect();
            return Ok(CommandOutput::Lines(lines));
        }

        let mut spans = Vec::with_capacity(entries.len() * 2);
        for (i, (name, node)) in entries.iter().enumerate() {
            if i > 0 {
                spans.push(Span::plain("  "));
            }
            let suffix = if node.is_dir() { "/" } else { "" };
            spans.push(Span::styled(format!("{name}{suffix}"), entry_style(node)));
        }
        Ok(CommandOutput::Lines(vec![Line::from_spans(Style::Result, spans)]))
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Print working directory"
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::text(env.cwd.clone()))
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Change directory"
    }
    fn usage(&self) -> &str {
        "cd [dir]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let target = match args.first() {
            None | Some(&"~") => env.home.to_string(),
            Some(&".") => env.cwd.clone(),
            Some(&"..") => path::parent(&env.cwd).to_string(),
            Some(&"/") => "/".to_string(),
            Some(arg) => {
                let expanded = match arg.strip_prefix("~/") {
                    Some(rest) => path::join(env.home, rest),
                    None => (*arg).to_string(),
                };
                let abs = path::absolute(&env.cwd, &expanded);
                match env.tree.lookup(&abs) {
                    Some(node) if node.is_dir() => abs,
                    _ => {
                        return Err(WebCliError::NotFound(format!(
                            "cd: {arg}: No such file or directory"
                        )));
                    },
                }
            },
        };
        log::debug!("cd {} -> {target}", env.cwd);
        env.cwd = target;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// mkdir
// ---------------------------------------------------------------------------

struct MkdirCmd;
impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn description(&self) -> &str {
        "Create a new directory"
    }
    fn usage(&self) -> &str {
        "mkdir [name]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (_, operands) = split_flags(args);
        let name = *operands
            .first()
            .ok_or_else(|| WebCliError::Usage("mkdir: missing operand".to_string()))?;
        check_entry_name("mkdir", "create directory", name)?;

        let dir = here_mut(env, "mkdir")?;
        if dir.contains_key(name) {
            return Err(WebCliError::Usage(format!(
                "mkdir: cannot create directory '{name}': File exists"
            )));
        }
        dir.insert(name.to_string(), VNode::empty_dir());
        log::debug!("mkdir {}/{name}", env.cwd);
        Ok(CommandOutput::text(format!("Created directory: {name}")))
    }
}

// ---------------------------------------------------------------------------
// touch
// ---------------------------------------------------------------------------

struct TouchCmd;
impl Command for TouchCmd {
    fn name(&self) -> &str {
        "touch"
    }
    fn description(&self) -> &str {
        "Create a new file"
    }
    fn usage(&self) -> &str {
        "touch [file]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (_, operands) = split_flags(args);
        let name = *operands
            .first()
            .ok_or_else(|| WebCliError::Usage("touch: missing file operand".to_string()))?;
        check_entry_name("touch", "touch", name)?;

        let dir = here_mut(env, "touch")?;
        if dir.contains_key(name) {
            return Ok(CommandOutput::text(format!("File already exists: {name}")));
        }
        dir.insert(name.to_string(), VNode::file(""));
        log::debug!("touch {}/{name}", env.cwd);
        Ok(CommandOutput::text(format!("Created file: {name}")))
    }
}

// ---------------------------------------------------------------------------
// rm
// ---------------------------------------------------------------------------

struct RmCmd;
impl Command for RmCmd {
    fn name(&self) -> &str {
        "rm"
    }
    fn description(&self) -> &str {
        "Remove file or directory"
    }
    fn usage(&self) -> &str {
        "rm [-r] [file/dir]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (flags, operands) = split_flags(args);
        let recursive = has_flag(&flags, 'r') || has_flag(&flags, 'R');
        let name = *operands
            .first()
            .ok_or_else(|| WebCliError::Usage("rm: missing operand".to_string()))?;

        let dir = here_mut(env, "rm")?;
        match dir.get(name) {
            None => {
                return Err(WebCliError::NotFound(format!(
                    "rm: cannot remove '{name}': No such file or directory"
                )));
            },
            Some(node) if node.is_dir() && !recursive => {
                return Err(WebCliError::TypeMismatch(format!(
                    "rm: cannot remove '{name}': Is a directory (use -r for recursive)"
                )));
            },
            Some(_) => {},
        }
        dir.remove(name);
        log::debug!("rm {}/{name}", env.cwd);
        Ok(CommandOutput::text(format!("Removed: {name}")))
    }
}

// ---------------------------------------------------------------------------
// cp / mv
// ---------------------------------------------------------------------------

/// Validate `verb src dest` operands; returns `Err` output lines on misuse.
fn two_operands<'a>(
    verb: &str,
    operands: &[&'a str],
) -> std::result::Result<(&'a str, &'a str), CommandOutput> {
    match operands {
        [src, dest, ..] => Ok((*src, *dest)),
        _ => Err(CommandOutput::Lines(vec![
            Line::error(format!("{verb}: missing file operand")),
            Line::result(format!("Usage: {verb} [source] [destination]")),
        ])),
    }
}

struct CpCmd;
impl Command for CpCmd {
    fn name(&self) -> &str {
        "cp"
    }
    fn description(&self) -> &str {
        "Copy files or directories"
    }
    fn usage(&self) -> &str {
        "cp [-r] [source] [dest]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (flags, operands) = split_flags(args);
        let recursive = has_flag(&flags, 'r') || has_flag(&flags, 'R');
        let (src, dest) = match two_operands("cp", &operands) {
            Ok(pair) => pair,
            Err(out) => return Ok(out),
        };
        check_entry_name("cp", "create", dest)?;

        let dir = here_mut(env, "cp")?;
        let node = dir.get(src).ok_or_else(|| {
            WebCliError::NotFound(format!(
                "cp: cannot stat '{src}': No such file or directory"
            ))
        })?;
        if node.is_dir() && !recursive {
            return Err(WebCliError::TypeMismatch(format!(
                "cp: -r not specified; omitting directory '{src}'"
            )));
        }
        let copy = node.clone();
        dir.insert(dest.to_string(), copy);
        log::debug!("cp {src} -> {dest} in {}", env.cwd);
        Ok(CommandOutput::text(format!("'{src}' -> '{dest}'")))
    }
}

struct MvCmd;
impl Command for MvCmd {
    fn name(&self) -> &str {
        "mv"
    }
    fn description(&self) -> &str {
        "Move/rename files or directories"
    }
    fn usage(&self) -> &str {
        "mv [source] [dest]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (_, operands) = split_flags(args);
        let (src, dest) = match two_operands("mv", &operands) {
            Ok(pair) => pair,
            Err(out) => return Ok(out),
        };
        check_entry_name("mv", "move to", dest)?;

        let dir = here_mut(env, "mv")?;
        let Some(node) = dir.remove(src) else {
            return Err(WebCliError::NotFound(format!(
                "mv: cannot stat '{src}': No such file or directory"
            )));
        };
        // Insert under `dest`, then drop `src`. An existing `dest` keeps its
        // slot and a new one is appended. When the two names are equal the
        // drop wins, so the entry is gone.
        if src != dest {
            dir.insert(dest.to_string(), node);
        }
        log::debug!("mv {src} -> {dest} in {}", env.cwd);
        Ok(CommandOutput::text(format!("'{src}' -> '{dest}'")))
    }
}

// ---------------------------------------------------------------------------
// find
// ---------------------------------------------------------------------------

struct FindCmd;
impl Command for FindCmd {
    fn name(&self) -> &str {
        "find"
    }
    fn description(&self) -> &str {
        "Search for files in directory"
    }
    fn usage(&self) -> &str {
        "find [name]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let needle = args.first().copied().unwrap_or("");
        let mut results = Vec::new();
        find_recursive(here(env, "find")?, ".", needle, &mut results);
        if results.is_empty() {
            return Ok(CommandOutput::text("find: no files found"));
        }
        Ok(CommandOutput::Lines(
            results.into_iter().map(Line::result).collect(),
        ))
    }
}

/// Depth-first, in insertion order; a directory is listed before its children.
fn find_recursive(entries: &Entries, prefix: &str, needle: &str, results: &mut Vec<String>) {
    for (name, node) in entries.iter() {
        let full = format!("{prefix}/{name}");
        if name.contains(needle) {
            results.push(full.clone());
        }
        if let Some(children) = node.entries() {
            find_recursive(children, &full, needle, results);
        }
    }
}

// ---------------------------------------------------------------------------
// tree
// ---------------------------------------------------------------------------

struct TreeCmd;
impl Command for TreeCmd {
    fn name(&self) -> &str {
        "tree"
    }
    fn description(&self) -> &str {
        "Display directory tree"
    }
    fn usage(&self) -> &str {
        "tree"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut lines = vec![Line::result(".")];
        tree_recursive(here(env, "tree")?, "", &mut lines);
        Ok(CommandOutput::Lines(lines))
    }
}

fn tree_recursive(entries: &Entries, prefix: &str, lines: &mut Vec<Line>) {
    let count = entries.len();
    for (i, (name, node)) in entries.iter().enumerate() {
        let is_last = i == count - 1;
        let connector = if is_last { "└── " } else { "├── " };
        lines.push(Line::from_spans(
            Style::Result,
            vec![
                Span::plain(format!("{prefix}{connector}")),
                Span::styled(name.as_str(), entry_style(node)),
            ],
        ));
        if let Some(children) = node.entries() {
            let child_prefix = if is_last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };
            tree_recursive(children, &child_prefix, lines);
        }
    }
}

/// Register filesystem commands into a registry.
pub fn register_file_commands(reg: &mut crate::CommandRegistry) {
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(PwdCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(MkdirCmd));
    reg.register(Box::new(TouchCmd));
    reg.register(Box::new(RmCmd));
    reg.register(Box::new(CpCmd));
    reg.register(Box::new(MvCmd));
    reg.register(Box::new(FindCmd));
    reg.register(Box::new(TreeCmd));
}
