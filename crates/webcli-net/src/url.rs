//! Just enough URL parsing for `http://` and `https://` GETs.

use std::fmt;

use webcli_types::error::{Result, WebCliError};

/// A parsed absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    /// Always starts with `/`.
    pub path: String,
    pub query: Option<String>,
}

impl Url {
    /// Parse an absolute `scheme://host[:port][/path][?query]` URL.
    ///
    /// Fragments are dropped.
    pub fn parse(input: &str) -> Result<Self> {
        let (scheme, rest) = input
            .split_once("://")
            .ok_or_else(|| WebCliError::Network(format!("not an absolute URL: {input}")))?;
        let scheme = scheme.to_ascii_lowercase();

        let rest = rest.split('#').next().unwrap_or_default();
        let (authority, path_and_query) = match rest.find(['/', '?']) {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };
        if authority.is_empty() {
            return Err(WebCliError::Network(format!("missing host in URL: {input}")));
        }

        let (host, port) = match authority.rsplit_once(':') {
            Some((h, p)) => {
                let port = p
                    .parse::<u16>()
                    .map_err(|_| WebCliError::Network(format!("bad port in URL: {input}")))?;
                (h.to_string(), Some(port))
            },
            None => (authority.to_string(), None),
        };

        let (path, query) = match path_and_query.split_once('?') {
            Some((p, q)) => (p, Some(q.to_string())),
            None => (path_and_query, None),
        };
        let path = if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        };

        Ok(Self {
            scheme,
            host,
            port,
            path,
            query,
        })
    }

    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }

    /// Port to connect to, falling back to the scheme default.
    pub fn effective_port(&self) -> u16 {
        self.port
            .unwrap_or(if self.is_https() { 443 } else { 80 })
    }

    /// Request target for the status line.
    pub fn request_target(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// Resolve a redirect `Location` against this URL.
    pub fn join(&self, location: &str) -> Result<Self> {
        if location.contains("://") {
            return Self::parse(location);
        }
        let mut next = self.clone();
        let (path, query) = match location.split_once('?') {
            Some((p, q)) => (p, Some(q.to_string())),
            None => (location, None),
        };
        next.path = if path.starts_with('/') {
            path.to_string()
        } else {
            let dir = match self.path.rfind('/') {
                Some(i) => &self.path[..=i],
                None => "/",
            };
            format!("{dir}{path}")
        };
        next.query = query;
        Ok(next)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(p) = self.port {
            write!(f, ":{p}")?;
        }
        write!(f, "{}", self.request_target())
    }
}
