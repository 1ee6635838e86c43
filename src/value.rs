//! The universal value model for log arguments.
//!
//! A [`Value`] is whatever a caller hands to the logger alongside a message:
//! a scalar, a string, an array, a string-keyed object, or an opaque foreign
//! object the engine cannot safely decompose. Arrays and objects are shared
//! nodes (`Rc<RefCell<..>>`), so a value graph can alias and even reference
//! itself. The redaction engine is required to survive such graphs, which is
//! why identity (not just structure) is part of this model.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Shared handle to an array node.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared handle to an object node. Entries keep insertion order.
pub type ObjectRef = Rc<RefCell<Vec<(String, Value)>>>;

/// A numeric value.
///
/// Integers and floats are kept apart so that large integers survive a
/// round trip through the sanitizer without being coerced to floating
/// point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
}

impl Number {
    /// The zero used when a numeric code is redacted.
    #[must_use]
    pub const fn zero() -> Self {
        Self::Int(0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

/// An opaque foreign object carried through the engine by reference.
///
/// The sanitizer passes these through unchanged: reflection-style
/// extraction of arbitrary host objects is exactly the kind of unbounded
/// traversal the engine refuses to do.
#[derive(Clone)]
pub struct Opaque {
    type_name: &'static str,
    inner: Rc<dyn Any>,
}

impl Opaque {
    /// Wraps a host object.
    pub fn new<T: Any>(inner: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Rc::new(inner),
        }
    }

    /// Returns the type name of the wrapped object.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Attempts to view the wrapped object as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque(<{}>)", self.type_name)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A value passed to the logger.
#[derive(Clone)]
pub enum Value {
    /// Null or absence.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(Number),
    /// A string.
    String(String),
    /// An ordered sequence of values. Shared; may participate in cycles.
    Array(ArrayRef),
    /// String-keyed entries in insertion order. Shared; may participate in
    /// cycles.
    Object(ObjectRef),
    /// An unrecognized foreign object, passed through untouched.
    Opaque(Opaque),
}

impl Value {
    /// Builds an array node from the given elements.
    pub fn array<I: IntoIterator<Item = Self>>(items: I) -> Self {
        Self::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Builds an object node from the given entries, keeping their order.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Object(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// Wraps a host object as an opaque value.
    pub fn opaque<T: Any>(inner: T) -> Self {
        Self::Opaque(Opaque::new(inner))
    }

    /// Returns the string slice if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is numeric.
    #[must_use]
    pub const fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the shared array handle if this is an array.
    #[must_use]
    pub const fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the shared object handle if this is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a key on an object node and clones the value.
    ///
    /// Returns `None` for non-objects, missing keys, and objects that are
    /// currently mutably borrowed.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Self> {
        let entries = self.as_object()?;
        let entries = entries.try_borrow().ok()?;
        entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Converts a `serde_json` value into a fresh value tree.
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => Self::Number(n.as_i64().map_or_else(
                || Number::Float(n.as_f64().unwrap_or(0.0)),
                Number::Int,
            )),
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => Self::array(items.iter().map(Self::from_json)),
            serde_json::Value::Object(map) => {
                Self::object(map.iter().map(|(k, v)| (k.clone(), Self::from_json(v))))
            },
        }
    }

    /// Converts this value into a `serde_json` value.
    ///
    /// Cyclic branches collapse to empty containers, unreadable nodes to
    /// `null`, and opaque objects to a `"<type name>"` marker string, so
    /// the conversion always terminates.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut seen = HashSet::new();
        self.to_json_inner(&mut seen)
    }

    fn to_json_inner(&self, seen: &mut HashSet<usize>) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(Number::Int(n)) => serde_json::Value::from(*n),
            Self::Number(Number::Float(n)) => {
                serde_json::Number::from_f64(*n).map_or(serde_json::Value::Null, serde_json::Value::Number)
            },
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => {
                let id = Rc::as_ptr(items) as usize;
                if !seen.insert(id) {
                    return serde_json::Value::Array(Vec::new());
                }
                let json = items.try_borrow().map_or(serde_json::Value::Null, |vec| {
                    serde_json::Value::Array(vec.iter().map(|v| v.to_json_inner(seen)).collect())
                });
                seen.remove(&id);
                json
            },
            Self::Object(entries) => {
                let id = Rc::as_ptr(entries) as usize;
                if !seen.insert(id) {
                    return serde_json::Value::Object(serde_json::Map::new());
                }
                let json = entries.try_borrow().map_or(serde_json::Value::Null, |vec| {
                    serde_json::Value::Object(
                        vec.iter()
                            .map(|(k, v)| (k.clone(), v.to_json_inner(seen)))
                            .collect(),
                    )
                });
                seen.remove(&id);
                json
            },
            Self::Opaque(opaque) => serde_json::Value::String(format!("<{}>", opaque.type_name())),
        }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, seen: &mut HashSet<usize>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) => {
                let id = Rc::as_ptr(items) as usize;
                if !seen.insert(id) {
                    return f.write_str("[..]");
                }
                let Ok(vec) = items.try_borrow() else {
                    seen.remove(&id);
                    return f.write_str("[..]");
                };
                f.write_str("[")?;
                for (i, item) in vec.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.write(f, seen)?;
                }
                seen.remove(&id);
                f.write_str("]")
            },
            Self::Object(entries) => {
                let id = Rc::as_ptr(entries) as usize;
                if !seen.insert(id) {
                    return f.write_str("{..}");
                }
                let Ok(vec) = entries.try_borrow() else {
                    seen.remove(&id);
                    return f.write_str("{..}");
                };
                f.write_str("{")?;
                for (i, (key, value)) in vec.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: ")?;
                    value.write(f, seen)?;
                }
                seen.remove(&id);
                f.write_str("}")
            },
            Self::Opaque(opaque) => write!(f, "<{}>", opaque.type_name()),
        }
    }
}

/// Renders the value in a compact JSON-like form. Cyclic branches render
/// as `[..]` or `{..}` instead of recursing.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seen = HashSet::new();
        self.write(f, &mut seen)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Structural equality. Shared nodes short-circuit on identity; comparing
/// two distinct cyclic graphs is not supported.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Self::Opaque(a), Self::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(Number::Int(i64::from(n)))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(Number::Int(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(Number::Int(i64::from(n)))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(Number::Float(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl FromIterator<Self> for Value {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::array(iter)
    }
}

impl FromIterator<(String, Self)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Self)>>(iter: I) -> Self {
        Self::object(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i64), Value::Number(Number::Int(42)));
        assert_eq!(Value::from(2.5), Value::Number(Number::Float(2.5)));
        assert_eq!(Value::from("hi"), Value::String("hi".to_string()));
    }

    #[test]
    fn test_object_get() {
        let value = Value::object(vec![("name", Value::from("ada")), ("age", Value::from(36))]);
        assert_eq!(value.get("name"), Some(Value::from("ada")));
        assert_eq!(value.get("missing"), None);
        assert_eq!(Value::Null.get("name"), None);
    }

    #[test]
    fn test_json_round_trip_preserves_shape() {
        let json = serde_json::json!({
            "user": {"name": "ada", "active": true},
            "attempts": [1, 2, 3],
            "big": 9_007_199_254_740_993i64,
            "ratio": 0.5,
            "note": null,
        });
        let value = Value::from_json(&json);
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn test_large_integer_survives_round_trip() {
        let value = Value::from(i64::MAX);
        assert_eq!(value.to_json(), serde_json::json!(i64::MAX));
    }

    #[test]
    fn test_to_json_truncates_cycle() {
        let list = Value::array(vec![Value::from(1)]);
        if let Value::Array(items) = &list {
            items.borrow_mut().push(list.clone());
        }
        let json = list.to_json();
        assert_eq!(json, serde_json::json!([1, []]));
    }

    #[test]
    fn test_display_is_compact_json_like() {
        let value = Value::object(vec![
            ("id", Value::from(7)),
            ("tags", Value::array(vec![Value::from("a"), Value::from("b")])),
        ]);
        assert_eq!(value.to_string(), r#"{"id": 7, "tags": ["a", "b"]}"#);
    }

    #[test]
    fn test_display_terminates_on_cycle() {
        let node = Value::object(vec![("next", Value::Null)]);
        if let Value::Object(entries) = &node {
            entries.borrow_mut()[0].1 = node.clone();
        }
        assert_eq!(node.to_string(), r#"{"next": {..}}"#);
    }

    #[test]
    fn test_opaque_passes_identity_not_structure() {
        let value = Value::opaque(std::time::Duration::from_secs(1));
        let Value::Opaque(opaque) = &value else {
            panic!("expected opaque");
        };
        assert!(opaque.type_name().contains("Duration"));
        assert_eq!(
            opaque.downcast_ref::<std::time::Duration>(),
            Some(&std::time::Duration::from_secs(1))
        );
        // Two wrappers around equal payloads are still distinct objects.
        assert_ne!(value, Value::opaque(std::time::Duration::from_secs(1)));
    }

    #[test]
    fn test_shared_node_equality_shortcut() {
        let shared = Value::array(vec![Value::from(1)]);
        let left = Value::array(vec![shared.clone()]);
        let right = Value::array(vec![shared]);
        assert_eq!(left, right);
    }
}
