//! Key-based redaction rules.
//!
//! A redaction decision driven by the *name* of an object property rather
//! than the shape of its value. Keys are classified case-insensitively
//! against three fixed classes; each class carries its own transform.

use crate::value::{Number, Value};

use super::MASK;

/// Keys whose value is replaced outright with the placeholder.
const SECRET_KEYS: &[&str] = &[
    "password",
    "pass",
    "pwd",
    "passwd",
    "secret",
    "token",
    "auth",
    "authorization",
    "api_key",
    "apikey",
    "access_token",
    "refresh_token",
    "private_key",
    "credential",
    "credentials",
];

/// Keys that label one-time and verification codes.
const NUMERIC_CODE_KEYS: &[&str] = &["code", "otp", "2fa", "two_factor", "verification_code"];

/// Keys that name account identifiers worth keeping partially readable.
const IDENTIFIER_KEYS: &[&str] = &["email", "username", "user", "login", "account"];

/// The sensitive-name class a property key falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// Secret-like: the whole value is replaced with the placeholder.
    Secret,
    /// Code-like: numbers are zeroed, strings take the full mask.
    NumericCode,
    /// Identifier-like: strings get the identifier-preserving mask.
    Identifier,
}

/// Classifies a property key against the sensitive-name classes,
/// case-insensitively. Returns `None` for keys with no rule.
#[must_use]
pub fn classify_key(key: &str) -> Option<KeyClass> {
    let key = key.to_ascii_lowercase();
    if SECRET_KEYS.contains(&key.as_str()) {
        Some(KeyClass::Secret)
    } else if NUMERIC_CODE_KEYS.contains(&key.as_str()) {
        Some(KeyClass::NumericCode)
    } else if IDENTIFIER_KEYS.contains(&key.as_str()) {
        Some(KeyClass::Identifier)
    } else {
        None
    }
}

/// Applies the class transform to a property value.
///
/// Returns `None` when the class does not decide this value shape (a
/// composite under a code-like or identifier-like key), in which case the
/// caller recurses normally.
pub(crate) fn apply(class: KeyClass, value: &Value) -> Option<Value> {
    match (class, value) {
        (KeyClass::Secret, _) => Some(Value::String(MASK.to_string())),
        (KeyClass::NumericCode, Value::Number(_)) => Some(Value::Number(Number::zero())),
        (KeyClass::NumericCode, Value::String(_)) => Some(Value::String(MASK.to_string())),
        (KeyClass::Identifier, Value::String(s)) => Some(Value::String(partial_mask(s))),
        _ => None,
    }
}

/// Identifier-preserving obfuscation.
///
/// Only the first character survives; for email-shaped strings the domain
/// survives too (`user@example.com` becomes `u***@example.com`,
/// `johndoe` becomes `j***`). Applied to identifier-class values whether
/// or not they are actually email-shaped.
#[must_use]
pub fn partial_mask(text: &str) -> String {
    match text.split_once('@') {
        Some((local, domain)) => local
            .chars()
            .next()
            .map_or_else(|| format!("***@{domain}"), |c| format!("{c}***@{domain}")),
        None => text
            .chars()
            .next()
            .map_or_else(|| MASK.to_string(), |c| format!("{c}***")),
    }
}
