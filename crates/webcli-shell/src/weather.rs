//! Background weather lookups.
//!
//! `weather` never blocks the prompt. The fetch runs on its own thread and
//! the rendered report comes back over a channel; the session drains it
//! from `poll`. Any failure is shown together with a canned report.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use webcli_net::NetworkService;
use webcli_types::config::WeatherConfig;
use webcli_types::error::{Result, WebCliError};
use webcli_types::output::{Line, Style};

/// GET the report for a `+`-joined city.
pub fn fetch(net: &dyn NetworkService, config: &WeatherConfig, city: &str) -> Result<String> {
    let url = config.url_for(city);
    log::info!("fetching weather from {url}");
    let resp = net.http_get(&url)?;
    if !resp.is_success() {
        log::warn!("weather service returned {}", resp.status_code);
        return Err(WebCliError::Network("Weather service unavailable".into()));
    }
    let text = resp.text();
    if text.trim().is_empty() {
        return Err(WebCliError::Network("Empty response".into()));
    }
    Ok(text)
}

/// Short reason shown after `Error:`.
fn reason(err: &WebCliError) -> String {
    match err {
        WebCliError::Network(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Lines printed for a finished lookup.
pub fn report_lines(display: &str, result: &Result<String>) -> Vec<Line> {
    match result {
        Ok(body) => body.trim_end().lines().map(Line::result).collect(),
        Err(e) => {
            log::warn!("weather lookup for {display} failed, using fallback: {e}");
            vec![
                Line::error(format!("Error: {}", reason(e))),
                Line::new(Style::GameDescription, "Falling back to simulation:"),
                Line::new(
                    Style::GameSuccess,
                    format!("Weather in {display}: [SUNNY], 25C"),
                ),
            ]
        },
    }
}

/// Runs lookups off the input thread and collects their reports.
pub struct WeatherWorker {
    tx: Sender<Vec<Line>>,
    rx: Receiver<Vec<Line>>,
    net: Option<Arc<dyn NetworkService>>,
    config: WeatherConfig,
    pending: usize,
}

impl WeatherWorker {
    pub fn new(net: Option<Arc<dyn NetworkService>>, config: WeatherConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            net,
            config,
            pending: 0,
        }
    }

    /// Lookups started but not yet drained.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Start a lookup. Without a network service the fallback report is
    /// queued right away.
    pub fn spawn(&mut self, city: &str, display: &str) {
        self.pending += 1;
        let Some(net) = self.net.as_ref().map(Arc::clone) else {
            let err = WebCliError::Network("network unavailable".into());
            let _ = self.tx.send(report_lines(display, &Err(err)));
            return;
        };

        let tx = self.tx.clone();
        let config = self.config.clone();
        let city = city.to_string();
        let owned_display = display.to_string();
        let spawned = std::thread::Builder::new()
            .name("weather".into())
            .spawn(move || {
                let result = fetch(net.as_ref(), &config, &city);
                // The session may be gone by now; nothing to report to then.
                let _ = tx.send(report_lines(&owned_display, &result));
            });
        if let Err(e) = spawned {
            let err = WebCliError::Network(format!("cannot start lookup: {e}"));
            let _ = self.tx.send(report_lines(display, &Err(err)));
        }
    }

    /// Reports of every finished lookup, in completion order.
    pub fn poll(&mut self) -> Vec<Line> {
        let mut lines = Vec::new();
        while let Ok(report) = self.rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            lines.extend(report);
        }
        lines
    }

    /// Block until one outstanding lookup finishes or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Vec<Line> {
        if self.pending == 0 {
            return Vec::new();
        }
        match self.rx.recv_timeout(timeout) {
            Ok(report) => {
                self.pending -= 1;
                report
            },
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webcli_net::HttpResponse;

    struct Canned(u16, &'static str);
    impl NetworkService for Canned {
        fn http_get(&self, _url: &str) -> Result<HttpResponse> {
            Ok(HttpResponse {
                status_code: self.0,
                headers: Vec::new(),
                body: self.1.as_bytes().to_vec(),
            })
        }
    }

    struct Offline;
    impl NetworkService for Offline {
        fn http_get(&self, _url: &str) -> Result<HttpResponse> {
            Err(WebCliError::Network("connection refused".into()))
        }
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::text).collect()
    }

    #[test]
    fn success_body() {
        let cfg = WeatherConfig::default();
        let r = fetch(&Canned(200, "Paris\n+18C\n"), &cfg, "Paris");
        assert_eq!(texts(&report_lines("Paris", &r)), ["Paris", "+18C"]);
    }

    #[test]
    fn bad_status_falls_back() {
        let cfg = WeatherConfig::default();
        let r = fetch(&Canned(503, "busy"), &cfg, "New+York");
        let lines = report_lines("New York", &r);
        assert_eq!(
            texts(&lines),
            [
                "Error: Weather service unavailable",
                "Falling back to simulation:",
                "Weather in New York: [SUNNY], 25C",
            ]
        );
        assert_eq!(lines[0].style, Style::Error);
    }

    #[test]
    fn blank_body_falls_back() {
        let cfg = WeatherConfig::default();
        let r = fetch(&Canned(200, "  \n"), &cfg, "Oslo");
        assert_eq!(texts(&report_lines("Oslo", &r))[0], "Error: Empty response");
    }

    #[test]
    fn transport_error_falls_back() {
        let cfg = WeatherConfig::default();
        let r = fetch(&Offline, &cfg, "Rome");
        assert_eq!(texts(&report_lines("Rome", &r))[0], "Error: connection refused");
    }

    #[test]
    fn worker_delivers_report() {
        let net: Arc<dyn NetworkService> = Arc::new(Canned(200, "sunny"));
        let mut w = WeatherWorker::new(Some(net), WeatherConfig::default());
        w.spawn("Lima", "Lima");
        assert_eq!(w.pending(), 1);
        let lines = w.wait(Duration::from_secs(5));
        assert_eq!(texts(&lines), ["sunny"]);
        assert_eq!(w.pending(), 0);
        assert!(w.poll().is_empty());
    }

    #[test]
    fn worker_without_network_queues_fallback() {
        let mut w = WeatherWorker::new(None, WeatherConfig::default());
        w.spawn("Cairo", "Cairo");
        let lines = w.poll();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].text(), "Weather in Cairo: [SUNNY], 25C");
        assert_eq!(w.pending(), 0);
    }
}
