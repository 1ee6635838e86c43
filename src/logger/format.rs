//! Log line formatting.
//!
//! Timestamp, colored level tag, prefix segments, message, then the
//! rendered argument values. Pure string assembly; the caller decides what
//! reaches the sink.

use std::fmt::Write as _;

use chrono::Local;

use crate::value::Value;

use super::Level;

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

const fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => RED,
        Level::Warn => YELLOW,
        Level::Info => GREEN,
        Level::Debug => CYAN,
        Level::Trace => DIM,
    }
}

/// Assembles one log line. Writes into a `String`, so it cannot fail.
pub(super) fn format_line(
    level: Level,
    prefixes: &[String],
    message: &str,
    args: &[Value],
    color: bool,
    timestamps: bool,
) -> String {
    let mut line = String::new();
    if timestamps {
        let _ = write!(line, "{} ", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"));
    }
    if color {
        let _ = write!(line, "{}[{level:<5}]{RESET}", level_color(level));
    } else {
        let _ = write!(line, "[{level:<5}]");
    }
    for prefix in prefixes {
        let _ = write!(line, " [{prefix}]");
    }
    let _ = write!(line, " {message}");
    for arg in args {
        let _ = write!(line, " {arg}");
    }
    line
}
