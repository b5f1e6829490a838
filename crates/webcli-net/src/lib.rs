//! Network boundary for the web CLI.
//!
//! The shell only needs one thing from the network: a blocking GET that
//! returns a status code and a body. [`NetworkService`] is that seam, so
//! tests can substitute a canned implementation and the binary can use
//! [`HttpClient`].

mod http;
mod url;

pub use http::{HttpClient, parse_response};
pub use url::Url;

use webcli_types::error::Result;

/// A fetched HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code (e.g. 200, 404).
    pub status_code: u16,
    /// Header (name, value) pairs. Names are lower-cased.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        http::find_header(&self.headers, name)
    }
}

/// Blocking HTTP access.
///
/// Implementations are shared with a background worker, hence the
/// `Send + Sync` bound.
pub trait NetworkService: Send + Sync {
    /// Perform a GET and return the final response (after redirects).
    fn http_get(&self, url: &str) -> Result<HttpResponse>;
}
