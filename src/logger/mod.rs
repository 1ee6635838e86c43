//! Level-dispatch logging wrapper.
//!
//! Thin by design: conditional printing, prefix composition, and color
//! decoration around the redaction engine. There is no transport,
//! buffering, batching, or persistence; a log call either renders one line
//! to the shared sink or is dropped by the level filter.

mod format;

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex, OnceLock};

use serde::{Deserialize, Serialize};

use crate::redact;
use crate::value::Value;
use crate::{Error, Result};

/// Log severity, ordered from most to least severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Failures the operator must see.
    Error,
    /// Suspicious conditions that do not stop the caller.
    Warn,
    /// Routine operational messages.
    #[default]
    Info,
    /// Detail for diagnosing behavior.
    Debug,
    /// Very fine-grained detail.
    Trace,
}

impl Level {
    /// Returns the fixed uppercase tag for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }

    /// Parses a level name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the string names no known
    /// level.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(Error::InvalidInput(format!("unknown log level: {s}"))),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Configuration for the logging wrapper.
///
/// Hosts can embed this in their own config files; every field has a
/// default, so partial tables deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Most verbose level that is printed.
    pub level: Level,
    /// Whether messages and values are redacted before rendering.
    pub redact: bool,
    /// Whether level tags carry ANSI color.
    pub color: bool,
    /// Whether each line starts with a local timestamp.
    pub timestamps: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            redact: true,
            color: true,
            timestamps: true,
        }
    }
}

impl LoggerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum printed level.
    #[must_use]
    pub const fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enables or disables redaction.
    ///
    /// Disabling is intended for local debugging only; the default keeps
    /// every message and value going through the redaction engine.
    #[must_use]
    pub const fn with_redaction(mut self, redact: bool) -> Self {
        self.redact = redact;
        self
    }

    /// Enables or disables ANSI color.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Enables or disables timestamp decoration.
    #[must_use]
    pub const fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Builds a configuration from the process environment.
    ///
    /// `SCRUBLOG_LEVEL` selects the level (unparseable values fall back to
    /// the default), `SCRUBLOG_REDACT=0|false|off` disables redaction, and
    /// a set `NO_COLOR` disables color.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = std::env::var("SCRUBLOG_LEVEL") {
            if let Ok(level) = Level::parse(&level) {
                config.level = level;
            }
        }
        if let Ok(redact) = std::env::var("SCRUBLOG_REDACT") {
            config.redact = !matches!(redact.trim(), "0" | "false" | "off");
        }
        if std::env::var_os("NO_COLOR").is_some() {
            config.color = false;
        }
        config
    }
}

/// Thread-safe shared sink for rendered lines.
#[derive(Clone)]
struct SharedSink {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedSink {
    fn stderr() -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(io::stderr()))),
        }
    }

    fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    /// A logger must not fail its caller: poisoned locks and write errors
    /// drop the line.
    fn write_line(&self, line: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
        }
    }
}

/// The logging wrapper around the redaction engine.
pub struct Logger {
    config: LoggerConfig,
    prefixes: Vec<String>,
    sink: SharedSink,
}

impl Logger {
    /// Creates a logger writing to stderr.
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config,
            prefixes: Vec::new(),
            sink: SharedSink::stderr(),
        }
    }

    /// Creates a logger configured from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(LoggerConfig::from_env())
    }

    /// Creates a logger writing to the given sink.
    #[must_use]
    pub fn with_writer(config: LoggerConfig, writer: Box<dyn Write + Send>) -> Self {
        Self {
            config,
            prefixes: Vec::new(),
            sink: SharedSink::from_writer(writer),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Derives a child logger with one more prefix segment, sharing the
    /// sink and configuration.
    #[must_use]
    pub fn child(&self, prefix: impl Into<String>) -> Self {
        let mut prefixes = self.prefixes.clone();
        prefixes.push(prefix.into());
        Self {
            config: self.config.clone(),
            prefixes,
            sink: self.sink.clone(),
        }
    }

    /// Whether a message at `level` would be printed.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.config.level
    }

    /// Logs a message with auxiliary values at the given level.
    pub fn log(&self, level: Level, message: &str, args: &[Value]) {
        if !self.enabled(level) {
            return;
        }
        let line = if self.config.redact {
            let (message, args) = redact::sanitize_call(message, args);
            format::format_line(
                level,
                &self.prefixes,
                &message,
                &args,
                self.config.color,
                self.config.timestamps,
            )
        } else {
            format::format_line(
                level,
                &self.prefixes,
                message,
                args,
                self.config.color,
                self.config.timestamps,
            )
        };
        self.sink.write_line(&line);
    }

    /// Logs at [`Level::Error`].
    pub fn error(&self, message: &str, args: &[Value]) {
        self.log(Level::Error, message, args);
    }

    /// Logs at [`Level::Warn`].
    pub fn warn(&self, message: &str, args: &[Value]) {
        self.log(Level::Warn, message, args);
    }

    /// Logs at [`Level::Info`].
    pub fn info(&self, message: &str, args: &[Value]) {
        self.log(Level::Info, message, args);
    }

    /// Logs at [`Level::Debug`].
    pub fn debug(&self, message: &str, args: &[Value]) {
        self.log(Level::Debug, message, args);
    }

    /// Logs at [`Level::Trace`].
    pub fn trace(&self, message: &str, args: &[Value]) {
        self.log(Level::Trace, message, args);
    }
}

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Installs the process-wide logger.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] when the global logger was
/// already installed, or was lazily constructed by an earlier call to
/// [`global`].
pub fn init_global(config: LoggerConfig) -> Result<()> {
    GLOBAL_LOGGER
        .set(Logger::new(config))
        .map_err(|_logger| Error::AlreadyInitialized("global logger"))
}

/// Returns the process-wide logger, constructing it from the environment
/// on first use.
pub fn global() -> &'static Logger {
    GLOBAL_LOGGER.get_or_init(Logger::from_env)
}
