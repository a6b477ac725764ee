//! Subscriber setup for programs that embed stacks.
//!
//! Only available with the `logging` feature. The stacks crates themselves
//! emit `tracing` events and never install a subscriber.

use std::str::FromStr;
use std::sync::Once;

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events the level filter applies to.
pub const TARGETS: [&str; 3] = ["stacks_core", "stacks_bundler", "stacks_check"];

static INIT: Once = Once::new();

/// Verbosity of the stacks crates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    /// Bundles written and checks finished.
    #[default]
    Info,
    /// Resolved paths, external packages and cache decisions.
    Debug,
    Trace,
}

impl LogLevel {
    fn level(self) -> Option<Level> {
        match self {
            LogLevel::Silent => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }

    /// `EnvFilter` directives enabling this level for every stacks crate and
    /// nothing else.
    pub fn directives(self) -> String {
        match self.level() {
            None => "off".to_string(),
            Some(level) => {
                let level = level.as_str().to_lowercase();
                TARGETS
                    .iter()
                    .map(|target| format!("{target}={level}"))
                    .collect::<Vec<_>>()
                    .join(",")
            }
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("silent") || s.eq_ignore_ascii_case("off") {
            return Ok(LogLevel::Silent);
        }
        if s.eq_ignore_ascii_case("warning") {
            return Ok(LogLevel::Warn);
        }
        match s.parse::<Level>() {
            Ok(Level::ERROR) => Ok(LogLevel::Error),
            Ok(Level::WARN) => Ok(LogLevel::Warn),
            Ok(Level::INFO) => Ok(LogLevel::Info),
            Ok(Level::DEBUG) => Ok(LogLevel::Debug),
            Ok(Level::TRACE) => Ok(LogLevel::Trace),
            Err(_) => Err(format!("Invalid log level: {s}")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level() {
            None => f.write_str("off"),
            Some(level) => f.write_str(&level.as_str().to_lowercase()),
        }
    }
}

/// Compact, timestamp-free subscriber writing to `writer`.
pub fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(writer),
    )
}

/// Install a global stderr subscriber at `level`.
///
/// Only the first call in a process (this or [`init_logging_from_env`]) has
/// an effect.
///
/// ```rust,no_run
/// use stacks_core::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    INIT.call_once(|| {
        subscriber(EnvFilter::new(level.directives()), std::io::stderr).init();
    });
}

/// Like [`init_logging`], with the filter taken from `RUST_LOG`.
///
/// An unset or unparsable `RUST_LOG` falls back to [`LogLevel::Info`].
pub fn init_logging_from_env() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.directives()));
        subscriber(filter, std::io::stderr).init();
    });
}
