//! Tool arguments: the loosely typed JSON mapping a caller sends, and the
//! typed values tool routes parse it into.

use crate::error::ToolError;
use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::fmt;

/// Lookback window used by `get_clients` when the caller omits it (24h).
pub const DEFAULT_TIMESPAN_SECS: u64 = 86400;

/// Argument mapping of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Accept the `arguments` member of a call. Absent and `null` mean no
    /// arguments; anything other than an object is rejected.
    pub fn from_value(value: Option<Value>) -> Result<Self, ToolError> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Object(map)) => Ok(Self(map)),
            Some(other) => Err(ToolError::invalid_params(format!(
                "Tool arguments must be an object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// A required value counts as present unless it is absent, `null` or an
    /// empty string.
    pub fn is_present(&self, key: &str) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Parse the mapping into a typed per-tool record. Unknown keys are ignored.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ToolError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| ToolError::invalid_params(format!("Invalid arguments: {e}")))
    }
}

pub(crate) fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A scalar argument coerced to text: identifiers (organization id, network
/// id, serial) and raw endpoints. Strings are kept as-is; numbers and
/// booleans are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident(String);

impl Ident {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier encoded as one URL path segment.
    pub fn segment(&self) -> String {
        urlencoding::encode(self.as_str()).into_owned()
    }
}

impl<'de> Deserialize<'de> for Ident {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdentVisitor;

        impl Visitor<'_> for IdentVisitor {
            type Value = Ident;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-empty string or number identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Ident, E> {
                if v.is_empty() {
                    return Err(E::invalid_value(de::Unexpected::Str(v), &self));
                }
                Ok(Ident(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Ident, E> {
                Ok(Ident(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Ident, E> {
                Ok(Ident(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Ident, E> {
                Ok(Ident(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Ident, E> {
                Ok(Ident(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdentVisitor)
    }
}

/// Client lookback window in seconds, passed to the upstream verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Timespan {
    Number(Number),
    Text(String),
}

impl Default for Timespan {
    fn default() -> Self {
        Timespan::Number(Number::from(DEFAULT_TIMESPAN_SECS))
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timespan::Number(n) => write!(f, "{n}"),
            Timespan::Text(s) => f.write_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Timespan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(Timespan::Number(n)),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Timespan::Text(s.trim().to_string())),
                _ => Err(de::Error::custom(format!("timespan must be a number, got {s:?}"))),
            },
            other => Err(de::Error::custom(format!(
                "timespan must be a number, got {}",
                type_name(&other)
            ))),
        }
    }
}
