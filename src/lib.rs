//! # Scrublog
//!
//! Logging utility with automatic redaction of sensitive values.
//!
//! Every message and argument passes through a redaction engine before it
//! reaches the sink: a pattern scrubber rewrites secret-shaped substrings
//! (bearer tokens, `key=value` pairs, numeric codes, long hex and base64
//! runs, emails), and a structural sanitizer walks arbitrary values,
//! masking sensitive object properties by key. The sanitizer is safe on
//! adversarial input: cyclic graphs terminate, unreadable nodes degrade to
//! a masked placeholder, and opaque foreign objects pass through untouched.
//!
//! ## Example
//!
//! ```rust
//! use scrublog::{Level, Logger, LoggerConfig, Value};
//!
//! let logger = Logger::new(LoggerConfig::new().with_level(Level::Debug));
//! let attempt = Value::object(vec![
//!     ("email", Value::from("user@example.com")),
//!     ("password", Value::from("hunter2")),
//! ]);
//! // Prints the email partially masked and the password as "***".
//! logger.warn("login rejected", &[attempt]);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod logger;
pub mod redact;
pub mod value;

// Re-exports for convenience
pub use logger::{Level, Logger, LoggerConfig, global, init_global};
pub use redact::{KeyClass, MASK, sanitize, sanitize_call, scrub};
pub use value::{Number, Opaque, Value};

/// Error type for scrublog operations.
///
/// The redaction engine itself has no failure mode: anomalies inside
/// [`sanitize`] degrade toward more-redacted output, never toward an
/// error and never toward raw data. Errors exist only at the
/// configuration seam around the wrapper.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A log level string names no known level
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A process-wide component was initialized twice.
    ///
    /// Raised when:
    /// - [`init_global`] runs after the global logger was already
    ///   installed, or after an earlier [`global`] call constructed it
    ///   lazily
    #[error("{0} already initialized")]
    AlreadyInitialized(&'static str),
}

/// Result type alias for scrublog operations.
pub type Result<T> = std::result::Result<T, Error>;
