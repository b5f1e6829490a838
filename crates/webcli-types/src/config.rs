//! Runtime configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, WebCliError};

/// Top-level configuration. Every key is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebCliConfig {
    /// User name shown in the prompt and by `whoami`.
    pub user: String,
    /// Host name shown in the prompt.
    pub host: String,
    /// Home directory: initial cwd and target of `cd` / `cd ~`.
    pub home: String,
    /// Maximum history entries kept (0 = unbounded).
    pub history_limit: usize,
    /// JSON tree replacing the built-in seed.
    pub fixture: Option<PathBuf>,
    /// JSON file backing the key-value store. `None` keeps it in memory.
    pub store_path: Option<PathBuf>,
    pub weather: WeatherConfig,
}

impl Default for WebCliConfig {
    fn default() -> Self {
        Self {
            user: "user".to_string(),
            host: "webcli".to_string(),
            home: "/home/user".to_string(),
            history_limit: 0,
            fixture: None,
            store_path: None,
            weather: WeatherConfig::default(),
        }
    }
}

/// `[weather]` table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL; the city is appended as a path segment.
    pub endpoint: String,
    /// Query string appended after `?`.
    pub query: String,
    /// Connect and read timeout.
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://wttr.in".to_string(),
            query: "0AT".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Percent-encode one path segment. Unreserved characters and the `+`
/// word separator pass through; everything else is encoded per UTF-8 byte.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'+' => {
                out.push(char::from(b));
            },
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

impl WeatherConfig {
    /// Full request URL for a `+`-joined city argument.
    pub fn url_for(&self, city: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let city = encode_segment(city);
        if self.query.is_empty() {
            format!("{base}/{city}")
        } else {
            format!("{base}/{city}?{}", self.query)
        }
    }
}

impl WebCliConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&text)
            .map_err(|e| WebCliError::Config(format!("{}: {e}", path.display())))?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if !self.home.starts_with('/') {
            return Err(WebCliError::Config(format!(
                "home must be an absolute path, got '{}'",
                self.home
            )));
        }
        if self.user.is_empty() || self.user.contains(char::is_whitespace) {
            return Err(WebCliError::Config(format!(
                "invalid user name '{}'",
                self.user
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let cfg = WebCliConfig::default();
        assert_eq!(cfg.user, "user");
        assert_eq!(cfg.host, "webcli");
        assert_eq!(cfg.home, "/home/user");
        assert_eq!(cfg.history_limit, 0);
        assert!(cfg.fixture.is_none());
        assert!(cfg.store_path.is_none());
        assert_eq!(cfg.weather.endpoint, "https://wttr.in");
        assert_eq!(cfg.weather.query, "0AT");
        assert_eq!(cfg.weather.timeout_secs, 10);
    }

    #[test]
    fn empty_string_gives_defaults() {
        let cfg = WebCliConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, WebCliConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = WebCliConfig::from_toml_str(
            r#"
user = "alice"
history_limit = 50

[weather]
timeout_secs = 3
"#,
        )
        .unwrap();
        assert_eq!(cfg.user, "alice");
        assert_eq!(cfg.host, "webcli");
        assert_eq!(cfg.history_limit, 50);
        assert_eq!(cfg.weather.timeout_secs, 3);
        assert_eq!(cfg.weather.endpoint, "https://wttr.in");
    }

    #[test]
    fn relative_home_rejected() {
        let err = WebCliConfig::from_toml_str(r#"home = "home/user""#).unwrap_err();
        assert!(matches!(err, WebCliError::Config(_)));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = WebCliConfig::from_toml_str("user = [").unwrap_err();
        assert!(matches!(err, WebCliError::TomlParse(_)));
    }

    #[test]
    fn weather_url() {
        let w = WeatherConfig::default();
        assert_eq!(w.url_for("New+York"), "https://wttr.in/New+York?0AT");
        let bare = WeatherConfig {
            endpoint: "http://localhost:8080/".into(),
            query: String::new(),
            timeout_secs: 1,
        };
        assert_eq!(bare.url_for("Paris"), "http://localhost:8080/Paris");
    }

    #[test]
    fn weather_url_encodes_city() {
        let w = WeatherConfig::default();
        assert_eq!(w.url_for("a#b?c"), "https://wttr.in/a%23b%3Fc?0AT");
        assert_eq!(w.url_for("S\u{e3}o+Paulo"), "https://wttr.in/S%C3%A3o+Paulo?0AT");
        assert_eq!(w.url_for("50%"), "https://wttr.in/50%25?0AT");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"box\"\nstore_path = \"/tmp/store.json\"").unwrap();
        let cfg = WebCliConfig::load(file.path()).unwrap();
        assert_eq!(cfg.host, "box");
        assert_eq!(cfg.store_path, Some(PathBuf::from("/tmp/store.json")));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WebCliConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, WebCliError::Io(_)));
    }
}
