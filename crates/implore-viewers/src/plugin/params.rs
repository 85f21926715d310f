//! Attribute and parameter declarations for visualization types.
//!
//! A visualization type declares the data columns it needs ([`AttributeSpec`])
//! and the dataset-independent settings a user may adjust ([`ParameterSpec`]).
//! Both are typed with the closed [`ValueType`] tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag shared by attribute and parameter declarations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Any number; accepts integer and float columns
    Numeric,

    /// 64-bit signed integer
    Integer,

    /// 64-bit floating point
    Float,

    /// Free text
    String,

    /// Boolean flag
    Boolean,
}

impl ValueType {
    /// Get a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueType::Numeric => "numeric",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
        }
    }

    /// Check if a value is compatible with this type
    pub fn is_compatible_with(&self, value: &ParameterValue) -> bool {
        match (self, value) {
            (ValueType::Numeric, ParameterValue::Int(_) | ParameterValue::Float(_)) => true,
            (ValueType::Integer, ParameterValue::Int(_)) => true,
            (ValueType::Float, ParameterValue::Float(_)) => true,
            (ValueType::String, ParameterValue::String(_)) => true,
            (ValueType::Boolean, ParameterValue::Bool(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Runtime parameter value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ParameterValue {
    /// Try to extract as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(v) => Some(*v),
            ParameterValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to extract as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParameterValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to extract as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to extract as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Int(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

/// A data column a visualization needs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct AttributeSpec {
    /// Display label (e.g., "x-axis")
    pub name: String,

    /// Accepted column type
    pub value_type: ValueType,

    /// Binding key (e.g., "xAxis")
    pub variable: String,
}

impl AttributeSpec {
    pub fn new(
        name: impl Into<String>,
        value_type: ValueType,
        variable: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            variable: variable.into(),
        }
    }

    /// Shorthand for the common numeric attribute
    pub fn numeric(name: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::new(name, ValueType::Numeric, variable)
    }
}

/// A user-adjustable, dataset-independent setting
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ParameterSpec {
    /// Display label (e.g., "Small Multiples?")
    pub name: String,

    /// Parameter type
    pub value_type: ValueType,

    /// Binding key (e.g., "smallMultiples")
    pub variable: String,

    /// Default value
    pub default: ParameterValue,
}

impl ParameterSpec {
    /// Create a parameter spec; the default is checked when the descriptor is built
    pub fn new(
        name: impl Into<String>,
        value_type: ValueType,
        variable: impl Into<String>,
        default: impl Into<ParameterValue>,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            variable: variable.into(),
            default: default.into(),
        }
    }

    /// Create a new float parameter spec
    pub fn float(name: impl Into<String>, variable: impl Into<String>, default: f64) -> Self {
        Self::new(name, ValueType::Float, variable, default)
    }

    /// Create a new integer parameter spec
    pub fn integer(name: impl Into<String>, variable: impl Into<String>, default: i64) -> Self {
        Self::new(name, ValueType::Integer, variable, default)
    }

    /// Create a new boolean parameter spec
    pub fn boolean(name: impl Into<String>, variable: impl Into<String>, default: bool) -> Self {
        Self::new(name, ValueType::Boolean, variable, default)
    }

    /// Create a new string parameter spec
    pub fn string(
        name: impl Into<String>,
        variable: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self::new(name, ValueType::String, variable, default.into())
    }

    /// Whether the declared default matches the declared type
    pub fn default_is_valid(&self) -> bool {
        self.value_type.is_compatible_with(&self.default)
    }
}
