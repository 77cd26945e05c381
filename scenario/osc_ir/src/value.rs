//! Typed parameter values.
//!
//! A `ParameterDeclaration` carries its value as raw text; `ParameterType::parse`
//! turns that text into a `Value` once, at declaration time.

use std::fmt;

/// Declared type of a scenario parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum ParameterType {
    Integer,
    Double,
    String,
    UnsignedInt,
    UnsignedShort,
    Boolean,
    DateTime,
}

impl ParameterType {
    /// Document spelling of the type.
    pub fn name(self) -> &'static str {
        match self {
            ParameterType::Integer => "integer",
            ParameterType::Double => "double",
            ParameterType::String => "string",
            ParameterType::UnsignedInt => "unsignedInt",
            ParameterType::UnsignedShort => "unsignedShort",
            ParameterType::Boolean => "boolean",
            ParameterType::DateTime => "dateTime",
        }
    }

    /// Parse `raw` as a value of this type.
    ///
    /// `DateTime` values are kept verbatim; no calendar validation happens here.
    pub fn parse(self, raw: &str) -> Result<Value, ParseValueError> {
        let fail = || ParseValueError {
            expected: self,
            raw: raw.to_string(),
        };
        match self {
            ParameterType::Integer => raw.parse().map(Value::Integer).map_err(|_| fail()),
            ParameterType::Double => raw.parse().map(Value::Double).map_err(|_| fail()),
            ParameterType::String => Ok(Value::String(raw.to_string())),
            ParameterType::UnsignedInt => raw.parse().map(Value::UnsignedInt).map_err(|_| fail()),
            ParameterType::UnsignedShort => {
                raw.parse().map(Value::UnsignedShort).map_err(|_| fail())
            }
            ParameterType::Boolean => match raw {
                "true" | "1" => Ok(Value::Boolean(true)),
                "false" | "0" => Ok(Value::Boolean(false)),
                _ => Err(fail()),
            },
            ParameterType::DateTime => Ok(Value::DateTime(raw.to_string())),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Double(f64),
    String(String),
    UnsignedInt(u32),
    UnsignedShort(u16),
    Boolean(bool),
    DateTime(String),
}

impl Value {
    /// The type this value was declared with.
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Value::Integer(_) => ParameterType::Integer,
            Value::Double(_) => ParameterType::Double,
            Value::String(_) => ParameterType::String,
            Value::UnsignedInt(_) => ParameterType::UnsignedInt,
            Value::UnsignedShort(_) => ParameterType::UnsignedShort,
            Value::Boolean(_) => ParameterType::Boolean,
            Value::DateTime(_) => ParameterType::DateTime,
        }
    }

    /// Numeric view of the value, `None` for strings, booleans and timestamps.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            Value::UnsignedInt(v) => Some(f64::from(*v)),
            Value::UnsignedShort(v) => Some(f64::from(*v)),
            Value::String(_) | Value::Boolean(_) | Value::DateTime(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) | Value::DateTime(v) => f.write_str(v),
            Value::UnsignedInt(v) => write!(f, "{v}"),
            Value::UnsignedShort(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
        }
    }
}

/// Raw parameter text that does not parse as its declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseValueError {
    pub expected: ParameterType,
    pub raw: String,
}

impl fmt::Display for ParseValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a valid {}", self.raw, self.expected)
    }
}

impl std::error::Error for ParseValueError {}

/// A number written literally or as a `$name` parameter reference.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum Scalar {
    Literal(f64),
    Parameter(String),
}

impl Scalar {
    /// Create a parameter reference. A leading `$` is optional.
    pub fn parameter(name: impl Into<String>) -> Self {
        Scalar::Parameter(name.into())
    }

    /// Name of the referenced parameter without its `$` sigil.
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            Scalar::Literal(_) => None,
            Scalar::Parameter(name) => Some(name.strip_prefix('$').unwrap_or(name)),
        }
    }

    pub fn literal(&self) -> Option<f64> {
        match self {
            Scalar::Literal(v) => Some(*v),
            Scalar::Parameter(_) => None,
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Literal(value)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
