//! Web CLI terminal entry point.
//!
//! Reads lines from stdin, feeds them to the session as key presses and
//! prints the output log with the active theme's colors. The config file
//! comes from the first argument or `WEBCLI_CONFIG`.

mod render;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::Result;

use render::Painter;
use webcli_shell::Session;
use webcli_types::config::WebCliConfig;
use webcli_types::input::Key;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn load_config() -> Result<WebCliConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WEBCLI_CONFIG").ok())
        .map(PathBuf::from);
    match path {
        Some(path) => Ok(WebCliConfig::load(&path)?),
        None => Ok(WebCliConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let timeout = Duration::from_secs(config.weather.timeout_secs.max(1));
    log::info!("Starting web CLI as {}@{}", config.user, config.host);
    let mut session = Session::from_config(config)?;

    let (tx, rx) = mpsc::channel::<String>();
    std::thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    },
                    Err(e) => {
                        log::warn!("stdin: {e}");
                        break;
                    },
                }
            }
        })?;

    let mut stdout = io::stdout();
    let mut painter = Painter::default();
    painter.flush(&session, &mut stdout)?;
    painter.prompt(&session, &mut stdout)?;

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                for c in line.chars() {
                    session.key(Key::Char(c));
                }
                session.key(Key::Enter);
                painter.flush(&session, &mut stdout)?;
                painter.prompt(&session, &mut stdout)?;
            },
            Err(RecvTimeoutError::Timeout) => {
                if session.poll() > 0 {
                    println!();
                    painter.flush(&session, &mut stdout)?;
                    painter.prompt(&session, &mut stdout)?;
                }
            },
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // Input closed; let outstanding lookups report before exiting.
    while session.weather_pending() > 0 {
        if session.wait_for_weather(timeout) == 0 {
            break;
        }
    }
    println!();
    painter.flush(&session, &mut stdout)?;
    log::info!("Shutting down");
    Ok(())
}
