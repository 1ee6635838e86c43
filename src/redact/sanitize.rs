//! Structural sanitization of value trees and graphs.
//!
//! Walks an arbitrary [`Value`], applies key-based rules at object
//! properties, scrubs string leaves, and rebuilds an equivalent tree with
//! sensitive data removed. The traversal carries a per-call set of entered
//! node identities, so self-referential input terminates in time
//! proportional to the number of distinct nodes instead of recursing
//! forever.

use std::collections::HashSet;
use std::rc::Rc;

use crate::value::{ArrayRef, ObjectRef, Value};

use super::scrub::scrub;
use super::{MASK, rules};

/// Identities of the composite nodes entered by the current traversal.
///
/// Lives for one top-level sanitize call. Nodes are removed again on the
/// way out, so a node shared by sibling branches is revisited normally and
/// only a true ancestor reference counts as a cycle.
struct VisitedSet(HashSet<usize>);

impl VisitedSet {
    fn new() -> Self {
        Self(HashSet::new())
    }

    /// Marks a node as entered. Returns `false` if it is already on the
    /// current path.
    fn enter(&mut self, id: usize) -> bool {
        self.0.insert(id)
    }

    fn leave(&mut self, id: usize) {
        self.0.remove(&id);
    }
}

/// Sanitizes a value, returning a redacted copy.
///
/// Never panics on a well-formed graph and never returns raw data when a
/// node cannot be processed: cyclic branches collapse to empty containers
/// and unreadable nodes degrade to the full-mask placeholder.
#[must_use]
pub fn sanitize(value: &Value) -> Value {
    let mut visited = VisitedSet::new();
    sanitize_value(value, &mut visited)
}

/// Sanitizes one log call: the message goes through [`scrub`], each
/// auxiliary value through [`sanitize`].
#[must_use]
pub fn sanitize_call(message: &str, args: &[Value]) -> (String, Vec<Value>) {
    (scrub(message), args.iter().map(sanitize).collect())
}

fn sanitize_value(value: &Value, visited: &mut VisitedSet) -> Value {
    match value {
        // Scalars carry no key context here; numeric zeroing only applies
        // at a code-like object property. Opaque foreign objects are not
        // decomposed.
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Opaque(_) => value.clone(),
        Value::String(text) => Value::String(scrub(text)),
        Value::Array(items) => sanitize_array(items, visited),
        Value::Object(entries) => sanitize_object(entries, visited),
    }
}

fn sanitize_array(items: &ArrayRef, visited: &mut VisitedSet) -> Value {
    let id = Rc::as_ptr(items) as usize;
    if !visited.enter(id) {
        tracing::trace!("cycle detected in array, truncating branch");
        return Value::array(Vec::new());
    }
    let out = items.try_borrow().map_or_else(
        |_| {
            tracing::debug!("array unreadable during sanitize, masking subtree");
            Value::String(MASK.to_string())
        },
        |elements| {
            Value::array(
                elements
                    .iter()
                    .map(|element| sanitize_value(element, visited))
                    .collect::<Vec<_>>(),
            )
        },
    );
    visited.leave(id);
    out
}

fn sanitize_object(entries: &ObjectRef, visited: &mut VisitedSet) -> Value {
    let id = Rc::as_ptr(entries) as usize;
    if !visited.enter(id) {
        tracing::trace!("cycle detected in object, truncating branch");
        return Value::object(Vec::<(String, Value)>::new());
    }
    let out = entries.try_borrow().map_or_else(
        |_| {
            tracing::debug!("object unreadable during sanitize, masking subtree");
            Value::String(MASK.to_string())
        },
        |properties| {
            Value::object(
                properties
                    .iter()
                    .map(|(key, value)| (key.clone(), sanitize_property(key, value, visited)))
                    .collect::<Vec<_>>(),
            )
        },
    );
    visited.leave(id);
    out
}

/// A key-class rule decides the property value outright when it can;
/// everything else recurses through the normal walk.
fn sanitize_property(key: &str, value: &Value, visited: &mut VisitedSet) -> Value {
    rules::classify_key(key)
        .and_then(|class| rules::apply(class, value))
        .unwrap_or_else(|| sanitize_value(value, visited))
}
