//! Declared value types of entity properties.

use serde::{Deserialize, Serialize};

/// Declared type of a property value, as reported by the backend in the
/// `type` field.
///
/// The backend reports Go type names (`%T`), so the wire strings look like
/// `int64` or `[]interface {}`. Anything not in the fixed set is kept verbatim
/// in [`ValueKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueKind {
    String,
    Int64,
    Bool,
    Time,
    List,
    Null,
    Other(String),
}

impl Default for ValueKind {
    fn default() -> Self {
        ValueKind::Other(String::new())
    }
}

impl ValueKind {
    /// Parses a wire type string. Never fails: unknown strings become `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "string" => ValueKind::String,
            "int64" => ValueKind::Int64,
            "bool" => ValueKind::Bool,
            "time.Time" => ValueKind::Time,
            "[]interface {}" => ValueKind::List,
            "<nil>" => ValueKind::Null,
            other => ValueKind::Other(other.to_string()),
        }
    }

    /// Returns the wire type string.
    pub fn as_wire(&self) -> &str {
        match self {
            ValueKind::String => "string",
            ValueKind::Int64 => "int64",
            ValueKind::Bool => "bool",
            ValueKind::Time => "time.Time",
            ValueKind::List => "[]interface {}",
            ValueKind::Null => "<nil>",
            ValueKind::Other(raw) => raw,
        }
    }

    /// True for types the badge table knows about.
    pub fn is_known(&self) -> bool {
        !matches!(self, ValueKind::Other(_))
    }
}

impl From<String> for ValueKind {
    fn from(raw: String) -> Self {
        ValueKind::parse(&raw)
    }
}

impl From<ValueKind> for String {
    fn from(kind: ValueKind) -> Self {
        kind.as_wire().to_string()
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}
