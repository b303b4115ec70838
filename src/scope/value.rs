//! Tagged state values stored in a scope.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Named arguments passed to an agent, ordered by key.
pub type Arguments = BTreeMap<String, StateValue>;

/// A value held under a scope key.
///
/// Values carry an explicit kind so that a read asking for a number never
/// silently receives text. Serializes to plain JSON (no tag).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StateValue {
    /// Free text, the usual output of a model call.
    Text(String),
    /// Any numeric value; integers are stored as `f64`.
    Number(f64),
    /// A flag.
    Boolean(bool),
    /// Arrays, objects and null.
    Structured(Value),
}

/// The kind tag of a [`StateValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`StateValue::Text`]
    Text,
    /// [`StateValue::Number`]
    Number,
    /// [`StateValue::Boolean`]
    Boolean,
    /// [`StateValue::Structured`]
    Structured,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Structured => write!(f, "structured"),
        }
    }
}

impl StateValue {
    /// The kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Number(_) => ValueKind::Number,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Structured(_) => ValueKind::Structured,
        }
    }

    /// Borrow the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The number, if this is a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The flag, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to a JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Structured(v) => v.clone(),
        }
    }

    /// Render for prompts and logs: text as-is, everything else as JSON.
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Structured(v) => v.to_string(),
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Value> for StateValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Bool(b) => Self::Boolean(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Structured(Value::Number(n)),
            },
            other => Self::Structured(other),
        }
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for StateValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for StateValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Types a stored value can be converted into on read.
pub trait FromStateValue: Sized {
    /// The kind reported in a mismatch error.
    const KIND: ValueKind;

    /// Convert, or `None` if the value cannot satisfy this type.
    fn from_state(value: &StateValue) -> Option<Self>;
}

impl FromStateValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn from_state(value: &StateValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl FromStateValue for f64 {
    const KIND: ValueKind = ValueKind::Number;

    fn from_state(value: &StateValue) -> Option<Self> {
        value.as_number()
    }
}

impl FromStateValue for i64 {
    const KIND: ValueKind = ValueKind::Number;

    fn from_state(value: &StateValue) -> Option<Self> {
        value
            .as_number()
            .filter(|n| n.fract() == 0.0)
            .map(|n| n as i64)
    }
}

impl FromStateValue for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn from_state(value: &StateValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromStateValue for Value {
    const KIND: ValueKind = ValueKind::Structured;

    fn from_state(value: &StateValue) -> Option<Self> {
        Some(value.to_json())
    }
}

impl FromStateValue for StateValue {
    const KIND: ValueKind = ValueKind::Structured;

    fn from_state(value: &StateValue) -> Option<Self> {
        Some(value.clone())
    }
}

/// A default supplied to [`crate::AgenticScope::read_state`].
///
/// The default fixes the type the read returns, so `"fallback"` reads text
/// and `0.0` reads a number.
pub trait StateDefault {
    /// The type returned by the read.
    type Output: FromStateValue;

    /// Turn the default into the returned type.
    fn into_output(self) -> Self::Output;
}

impl StateDefault for &str {
    type Output = String;

    fn into_output(self) -> String {
        self.to_string()
    }
}

macro_rules! identity_default {
    ($($ty:ty),*) => {
        $(
            impl StateDefault for $ty {
                type Output = $ty;

                fn into_output(self) -> $ty {
                    self
                }
            }
        )*
    };
}

identity_default!(String, f64, i64, bool, Value, StateValue);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_tags() {
        assert_eq!(StateValue::from("a").kind(), ValueKind::Text);
        assert_eq!(StateValue::from(0.5).kind(), ValueKind::Number);
        assert_eq!(StateValue::from(true).kind(), ValueKind::Boolean);
        assert_eq!(StateValue::from(json!([1, 2])).kind(), ValueKind::Structured);
    }

    #[test]
    fn test_from_json_normalizes_scalars() {
        assert_eq!(StateValue::from(json!("x")), StateValue::Text("x".into()));
        assert_eq!(StateValue::from(json!(3)), StateValue::Number(3.0));
        assert_eq!(StateValue::from(json!(false)), StateValue::Boolean(false));
        assert_eq!(StateValue::from(json!(null)), StateValue::Structured(Value::Null));
    }

    #[test]
    fn test_render() {
        assert_eq!(StateValue::from("plain").render(), "plain");
        assert_eq!(StateValue::from(2.0).render(), "2");
        assert_eq!(StateValue::from(0.85).render(), "0.85");
        assert_eq!(StateValue::from(json!({"a": 1})).render(), "{\"a\":1}");
    }

    #[test]
    fn test_strict_conversions() {
        let text = StateValue::from("0.9");
        assert_eq!(f64::from_state(&text), None);
        assert_eq!(String::from_state(&text), Some("0.9".to_string()));

        let number = StateValue::from(2.5);
        assert_eq!(i64::from_state(&number), None);
        assert_eq!(i64::from_state(&StateValue::from(4)), Some(4));
        assert_eq!(Value::from_state(&number), Some(json!(2.5)));
    }

    #[test]
    fn test_serializes_untagged() {
        let value = StateValue::from("story");
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"story\"");
        let value = StateValue::from(0.8);
        assert_eq!(serde_json::to_string(&value).unwrap(), "0.8");
    }
}
