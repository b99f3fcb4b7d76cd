//! The value model fed to [`DiffPresenter::diff_as_object`](crate::DiffPresenter::diff_as_object).

use std::fmt;
use std::sync::Arc;

/// A value to be canonicalized and diffed.
#[derive(Clone, Debug)]
pub enum Value {
    /// The absent value, rendered as `nil`.
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// A string. Multi-line strings are diffed line by line; single-line
    /// strings are diffed as their quoted literal.
    Str(String),
    /// A bare name, rendered with a leading colon (`:name`).
    Symbol(String),
    /// An ordered sequence.
    List(Vec<Value>),
    /// Key/value pairs. Insertion order is kept here but never reaches the
    /// rendered output: pairs are sorted by key when canonicalized.
    Map(Vec<(Value, Value)>),
    /// An opaque object that describes itself through [`Inspect`].
    Object(Arc<dyn Inspect>),
}

impl Value {
    /// Construct a [`Value::Symbol`].
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    /// Construct a [`Value::Map`] from any iterator of pairs.
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Construct a [`Value::List`] from any iterator of values.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Wrap an [`Inspect`] implementor as a [`Value::Object`].
    pub fn object(object: impl Inspect + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Returns `true` for strings.
    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Returns `true` for integers and floats.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// The string contents, if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Values compare equal when their canonical representations match.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::canonical::inspect(self) == crate::canonical::inspect(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::canonical::inspect(self))
    }
}

/// A type that can describe itself for diff output.
///
/// Implementors provide either a complete custom description through
/// [`Inspect::describe_self`], or a list of fields from which a generic
/// `#<TypeName field=value, ...>` dump is built.
pub trait Inspect: fmt::Debug + Send + Sync {
    /// The name shown in the generic dump.
    fn type_name(&self) -> &str;

    /// Named fields shown in the generic dump.
    fn fields(&self) -> Vec<(String, Value)> {
        Vec::new()
    }

    /// A custom description. May span multiple lines.
    fn describe_self(&self) -> Option<String> {
        None
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::list(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::list(items),
            serde_json::Value::Object(map) => Value::map(map),
        }
    }
}
