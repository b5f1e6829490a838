//! Syntactic path handling.
//!
//! Nothing here touches the tree. `..` pops the previous segment of the
//! path string, so `/a/file.txt/..` normalizes to `/a` whether or not
//! `file.txt` is a directory. `.` and `~` are ordinary names at this
//! level; `cd` gives them meaning before a path gets here.

/// Join `input` onto `cwd` unless it is already absolute.
pub fn join(cwd: &str, input: &str) -> String {
    if input.starts_with('/') {
        input.to_string()
    } else if cwd.ends_with('/') {
        format!("{cwd}{input}")
    } else {
        format!("{cwd}/{input}")
    }
}

/// Normalize an absolute path: drop empty segments, pop on `..`.
///
/// The result always starts with `/`, never ends with one (except the
/// root itself) and never contains `//` or `..`.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" => {},
            ".." => {
                parts.pop();
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Normalized absolute form of `input` relative to `cwd`.
pub fn absolute(cwd: &str, input: &str) -> String {
    normalize(&join(cwd, input))
}

/// Non-empty segments of a path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Parent of a normalized path. The root is its own parent.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}

/// Replace a leading `home` with `~`, only at a segment boundary.
///
/// `/home/user` becomes `~` and `/home/user/docs` becomes `~/docs`, but
/// `/home/username` is left alone.
pub fn abbreviate_home(path: &str, home: &str) -> String {
    if path == home {
        return "~".to_string();
    }
    match path.strip_prefix(home) {
        Some(rest) if rest.starts_with('/') && home != "/" => format!("~{rest}"),
        _ => path.to_string(),
    }
}
