//! Minimal blocking HTTP/1.1 GET client.
//!
//! Plain HTTP goes straight over `std::net::TcpStream`. HTTPS is wrapped
//! in a rustls client stream when the `tls-rustls` feature is enabled and
//! rejected otherwise.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
#[cfg(feature = "tls-rustls")]
use std::sync::Arc;
use std::time::Duration;

use webcli_types::error::{Result, WebCliError};

use crate::{HttpResponse, NetworkService, Url};

/// Maximum response body size (2 MB).
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: u8 = 5;

/// Blocking HTTP(S) client.
pub struct HttpClient {
    timeout: Duration,
    #[cfg(feature = "tls-rustls")]
    tls: Arc<rustls::ClientConfig>,
}

impl HttpClient {
    /// Client with the given connect/read timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            #[cfg(feature = "tls-rustls")]
            tls: Arc::new(tls_config()),
        }
    }

    /// Connect, send GET, read and parse one response.
    fn do_request(&self, url: &Url) -> Result<HttpResponse> {
        let stream = self.tcp_connect(&url.host, url.effective_port())?;
        if url.is_https() {
            self.https_request(stream, url)
        } else {
            let mut stream = stream;
            send_request(&mut stream, url)?;
            parse_response(&read_response(&mut stream)?)
        }
    }

    #[cfg(feature = "tls-rustls")]
    fn https_request(&self, stream: TcpStream, url: &Url) -> Result<HttpResponse> {
        let sni = rustls_pki_types::ServerName::try_from(url.host.clone())
            .map_err(|e| WebCliError::Network(format!("invalid server name: {e}")))?;
        let conn = rustls::ClientConnection::new(Arc::clone(&self.tls), sni)
            .map_err(|e| WebCliError::Network(format!("TLS init: {e}")))?;
        let mut tls = rustls::StreamOwned::new(conn, stream);
        send_request(&mut tls, url)?;
        parse_response(&read_response(&mut tls)?)
    }

    #[cfg(not(feature = "tls-rustls"))]
    fn https_request(&self, _stream: TcpStream, url: &Url) -> Result<HttpResponse> {
        Err(WebCliError::Network(format!(
            "TLS not available for {}",
            url.host
        )))
    }

    /// Open a TCP connection with connect and read timeouts.
    fn tcp_connect(&self, host: &str, port: u16) -> Result<TcpStream> {
        let addr = format!("{host}:{port}")
            .to_socket_addrs()
            .map_err(|e| WebCliError::Network(format!("DNS resolution failed: {e}")))?
            .next()
            .ok_or_else(|| WebCliError::Network(format!("no addresses for {host}:{port}")))?;

        let stream = TcpStream::connect_timeout(&addr, self.timeout)
            .map_err(|e| WebCliError::Network(format!("TCP connect failed: {e}")))?;
        stream
            .set_read_timeout(Some(self.timeout))
            .map_err(|e| WebCliError::Network(format!("set read timeout: {e}")))?;
        Ok(stream)
    }
}

impl NetworkService for HttpClient {
    fn http_get(&self, url: &str) -> Result<HttpResponse> {
        let mut current = Url::parse(url)?;
        if current.scheme != "http" && current.scheme != "https" {
            return Err(WebCliError::Network(format!(
                "unsupported scheme: {}",
                current.scheme
            )));
        }

        for _ in 0..MAX_REDIRECTS {
            log::debug!("GET {current}");
            let resp = self.do_request(&current)?;
            if is_redirect(resp.status_code)
                && let Some(location) = resp.header("location")
            {
                current = current.join(location)?;
                continue;
            }
            return Ok(resp);
        }

        Err(WebCliError::Network("too many redirects".to_string()))
    }
}

#[cfg(feature = "tls-rustls")]
fn tls_config() -> rustls::ClientConfig {
    let roots = rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth()
}

/// Send an HTTP/1.1 GET request.
fn send_request(stream: &mut impl Write, url: &Url) -> Result<()> {
    let default_port = if url.is_https() { 443 } else { 80 };
    let host_header = match url.port {
        Some(p) if p != default_port => format!("{}:{p}", url.host),
        _ => url.host.clone(),
    };
    let target = url.request_target();

    // wttr.in picks its plain-text renderer from the user agent.
    let request = format!(
        "GET {target} HTTP/1.1\r\n\
         Host: {host_header}\r\n\
         User-Agent: curl/8.0 webcli/1.0\r\n\
         Accept: text/plain, */*\r\n\
         Connection: close\r\n\
         \r\n"
    );

    stream
        .write_all(request.as_bytes())
        .and_then(|()| stream.flush())
        .map_err(|e| WebCliError::Network(format!("send request: {e}")))
}

/// Read the entire response until EOF or until the read timeout fires.
fn read_response(stream: &mut impl Read) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                if buf.len() + n > MAX_BODY_SIZE + 4096 {
                    return Err(WebCliError::Network("response too large".to_string()));
                }
                buf.extend_from_slice(&chunk[..n]);
            },
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut =>
            {
                break;
            },
            // Servers that close without close_notify.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && !buf.is_empty() => break,
            Err(e) => {
                return Err(WebCliError::Network(format!("read response: {e}")));
            },
        }
    }
    Ok(buf)
}

/// Parse raw bytes into status code, headers, and body.
pub fn parse_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = find_subsequence(data, b"\r\n\r\n").ok_or_else(|| {
        WebCliError::Network("malformed HTTP response: no header terminator".to_string())
    })?;

    let header_str = std::str::from_utf8(&data[..header_end])
        .map_err(|_| WebCliError::Network("non-UTF-8 headers".to_string()))?;
    let mut lines = header_str.split("\r\n");

    let status_line = lines
        .next()
        .ok_or_else(|| WebCliError::Network("empty response".to_string()))?;
    let status_code = parse_status_line(status_line)?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
        .collect();

    let raw_body = &data[header_end + 4..];
    let body = if find_header(&headers, "transfer-encoding").is_some_and(|v| v.contains("chunked"))
    {
        decode_chunked(raw_body)?
    } else if let Some(cl) = find_header(&headers, "content-length") {
        let len: usize = cl
            .parse()
            .map_err(|_| WebCliError::Network("bad Content-Length".to_string()))?;
        if len > MAX_BODY_SIZE {
            return Err(WebCliError::Network(
                "response body exceeds 2 MB limit".to_string(),
            ));
        }
        raw_body[..raw_body.len().min(len)].to_vec()
    } else {
        raw_body.to_vec()
    };

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

/// Parse the status code out of `HTTP/1.x NNN reason`.
fn parse_status_line(line: &str) -> Result<u16> {
    let mut parts = line.splitn(3, ' ');
    match (parts.next(), parts.next()) {
        (Some(version), Some(code)) if version.starts_with("HTTP/") => code
            .parse()
            .map_err(|_| WebCliError::Network(format!("bad status code in: {line}"))),
        _ => Err(WebCliError::Network(format!("bad status line: {line}"))),
    }
}

/// Case-insensitive header lookup.
pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    let name_lower = name.to_lowercase();
    headers
        .iter()
        .find(|(k, _)| *k == name_lower)
        .map(|(_, v)| v.as_str())
}

/// Decode a chunked transfer-encoded body.
fn decode_chunked(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut pos = 0;

    while let Some(i) = find_subsequence(&data[pos..], b"\r\n") {
        let line_end = pos + i;
        let size_line = std::str::from_utf8(&data[pos..line_end])
            .map_err(|_| WebCliError::Network("bad chunk size".to_string()))?;
        // Chunk extensions follow `;`.
        let size_str = size_line.split(';').next().unwrap_or_default().trim();
        let chunk_size = usize::from_str_radix(size_str, 16)
            .map_err(|_| WebCliError::Network("bad chunk size".to_string()))?;

        if chunk_size == 0 {
            break;
        }

        let chunk_start = line_end + 2;
        let chunk_end = chunk_start + chunk_size;
        if chunk_end > data.len() {
            result.extend_from_slice(&data[chunk_start..]);
            break;
        }
        if result.len() + chunk_size > MAX_BODY_SIZE {
            return Err(WebCliError::Network(
                "chunked body exceeds 2 MB limit".to_string(),
            ));
        }

        result.extend_from_slice(&data[chunk_start..chunk_end]);
        pos = (chunk_end + 2).min(data.len());
    }

    Ok(result)
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    /// Serve `responses` in order, one per accepted connection.
    fn serve(responses: Vec<String>) -> (u16, std::thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = std::thread::spawn(move || {
            for resp in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(resp.as_bytes());
                let _ = stream.flush();
            }
        });
        (port, handle)
    }

    #[test]
    fn parse_simple_response() {
        let raw = b"HTTP/1.1 200 OK\r\n\
                     Content-Type: text/plain\r\n\
                     Content-Length: 5\r\n\
                     \r\n\
                     Sunny and more";
        let resp = parse_response(raw).unwrap();
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.header("content-type"), Some("text/plain"));
        assert_eq!(resp.body, b"Sunny");
    }

    #[test]
    fn parse_without_content_length() {
        let raw = b"HTTP/1.1 200 OK\r\n\r\nhello world";
        assert_eq!(parse_response(raw).unwrap().body, b"hello world");
    }

    #[test]
    fn parse_chunked_response() {
        let raw = b"HTTP/1.1 200 OK\r\n\
                     Transfer-Encoding: chunked\r\n\
                     \r\n\
                     5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n";
        assert_eq!(parse_response(raw).unwrap().body, b"hello world");
    }

    #[test]
    fn decode_chunked_with_extension() {
        assert_eq!(decode_chunked(b"5;ext=val\r\nhello\r\n0\r\n\r\n").unwrap(), b"hello");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_response(b"no header terminator").is_err());
        assert!(parse_response(b"garbage\r\n\r\n").is_err());
    }

    #[test]
    fn oversized_content_length_rejected() {
        let header = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_SIZE + 1
        );
        let err = parse_response(header.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("2 MB"));
    }

    #[test]
    fn status_line_parsing() {
        assert_eq!(parse_status_line("HTTP/1.1 404 Not Found").unwrap(), 404);
        assert_eq!(parse_status_line("HTTP/1.0 301 Moved Permanently").unwrap(), 301);
        assert!(parse_status_line("HTTP/1.1 abc").is_err());
    }

    #[test]
    fn redirect_codes() {
        assert!(is_redirect(301));
        assert!(is_redirect(308));
        assert!(!is_redirect(200));
        assert!(!is_redirect(404));
    }

    #[test]
    fn unsupported_scheme_rejected() {
        let client = HttpClient::new(Duration::from_secs(1));
        let err = client.http_get("ftp://example.com/file").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn get_from_local_server() {
        let (port, handle) = serve(vec![
            "HTTP/1.1 200 OK\r\nContent-Length: 11\r\n\r\nLondon: +9C".to_string(),
        ]);
        let client = HttpClient::new(Duration::from_secs(5));
        let resp = client
            .http_get(&format!("http://127.0.0.1:{port}/London?0AT"))
            .unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.text(), "London: +9C");
        handle.join().unwrap();
    }

    #[test]
    fn follows_relative_redirect() {
        let (port, handle) = serve(vec![
            "HTTP/1.1 302 Found\r\nLocation: /moved\r\nContent-Length: 0\r\n\r\n".to_string(),
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok".to_string(),
        ]);
        let client = HttpClient::new(Duration::from_secs(5));
        let resp = client
            .http_get(&format!("http://127.0.0.1:{port}/start"))
            .unwrap();
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.text(), "ok");
        handle.join().unwrap();
    }

    #[test]
    fn error_status_is_returned_not_raised() {
        let (port, handle) = serve(vec![
            "HTTP/1.1 503 Unavailable\r\nContent-Length: 0\r\n\r\n".to_string(),
        ]);
        let client = HttpClient::new(Duration::from_secs(5));
        let resp = client.http_get(&format!("http://127.0.0.1:{port}/")).unwrap();
        assert_eq!(resp.status_code, 503);
        assert!(!resp.is_success());
        handle.join().unwrap();
    }
}
