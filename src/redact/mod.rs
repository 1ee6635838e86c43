//! The redaction engine.
//!
//! Two layers, applied before any value reaches a sink:
//!
//! - [`scrub`] rewrites a single string, replacing secret-shaped substrings
//!   (bearer tokens, `key=value` pairs, numeric codes, long hex or base64
//!   runs, emails) with masked equivalents.
//! - [`sanitize`] walks an arbitrary value graph, applies key-based rules at
//!   each object property, falls back to [`scrub`] for string leaves, and
//!   rebuilds an equivalent tree. A per-call visited set bounds the walk, so
//!   cyclic input terminates instead of recursing forever.
//!
//! Both are pure synchronous transforms with no configuration, no I/O, and
//! no failure mode visible to callers: anything unexpected degrades toward
//! more redaction, never toward raw data.

mod rules;
mod sanitize;
mod scrub;

pub use rules::{KeyClass, classify_key, partial_mask};
pub use sanitize::{sanitize, sanitize_call};
pub use scrub::scrub;

/// Placeholder written in place of a fully masked value.
pub const MASK: &str = "***";
