//! Logging setup
//!
//! Logs go through `tracing`. One-shot commands log to stderr; the TUI logs
//! to a file so output does not tear the screen. `RUST_LOG` overrides the
//! verbosity chosen from `-v` flags.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the TUI log inside the log directory
pub const LOG_FILE_NAME: &str = "skillport.log";

/// Where log lines are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to `skillport.log` inside this directory
    File(PathBuf),
    /// Discard everything
    Off,
}

/// Filter directive for a `-v` count
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "skillport=warn",
        1 => "skillport=info",
        _ => "skillport=debug",
    }
}

/// Installs the global subscriber
///
/// Installing twice is harmless: the second call keeps the first subscriber.
pub fn init(verbose: u8, target: LogTarget) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    match target {
        LogTarget::Stderr => {
            let _ = registry
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init();
        }
        LogTarget::File(dir) => {
            fs::create_dir_all(&dir)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE_NAME))?;
            let _ = registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init();
        }
        LogTarget::Off => {}
    }
    Ok(())
}

/// Like [`init`], but a log target that cannot be opened only disables
/// logging; returns the target actually in use
pub fn init_or_disable(verbose: u8, target: LogTarget) -> LogTarget {
    match init(verbose, target.clone()) {
        Ok(()) => target,
        Err(err) => {
            eprintln!("warning: logging disabled: {}", err);
            LogTarget::Off
        }
    }
}
