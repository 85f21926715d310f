//! Attribute and parameter bindings of one viewer
//!
//! A binding is the pair of [`AttributeMap`] (which dataset column feeds each
//! declared attribute) and [`ParameterMap`] (the current value of each declared
//! parameter). Raw editor input is converted with [`parse_parameter_value`] and
//! [`parse_attribute_value`]; a failed parse never touches the stored value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::dataset::DatasetAttribute;
use crate::error::{ParseError, ParseResult};
use crate::plugin::{
    AttributeSpec, ParameterSpec, ParameterValue, ValueType, VisualizationDescriptor,
};

/// Raw value of a single editor control
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(untagged)]
pub enum RawInput {
    /// Text field, number field or select option value
    Text(String),

    /// Checkbox state
    Checked(bool),
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        RawInput::Text(value.to_string())
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        RawInput::Text(value)
    }
}

impl From<bool> for RawInput {
    fn from(value: bool) -> Self {
        RawInput::Checked(value)
    }
}

/// Maps each attribute variable to a dataset attribute index, or unset
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMap {
    indices: HashMap<String, Option<usize>>,
}

impl AttributeMap {
    /// A map with every declared attribute unset
    pub fn unbound(specs: &[AttributeSpec]) -> Self {
        Self {
            indices: specs.iter().map(|s| (s.variable.clone(), None)).collect(),
        }
    }

    /// Bound dataset index for a variable, if set
    pub fn get(&self, variable: &str) -> Option<usize> {
        self.indices.get(variable).copied().flatten()
    }

    /// Whether the variable has a bound column
    pub fn is_set(&self, variable: &str) -> bool {
        self.get(variable).is_some()
    }

    /// Whether the variable is declared in this map
    pub fn contains(&self, variable: &str) -> bool {
        self.indices.contains_key(variable)
    }

    /// Look up the bound dataset attribute for a variable
    pub fn resolve<'a>(
        &self,
        variable: &str,
        attributes: &'a [DatasetAttribute],
    ) -> Option<&'a DatasetAttribute> {
        self.get(variable).and_then(|i| attributes.get(i))
    }

    /// Bind a variable after checking the column against the declaration
    pub fn bind(
        &mut self,
        spec: &AttributeSpec,
        index: usize,
        attributes: &[DatasetAttribute],
    ) -> ParseResult<()> {
        let attribute = attributes.get(index).ok_or(ParseError::IndexOutOfRange {
            index,
            len: attributes.len(),
        })?;

        if !is_attribute_compatible(attribute.value_type(), spec.value_type) {
            return Err(ParseError::IncompatibleAttribute {
                name: attribute.name.clone(),
                actual: attribute.value_type(),
                expected: spec.value_type,
            });
        }

        self.indices.insert(spec.variable.clone(), Some(index));
        Ok(())
    }

    /// Iterate over `(variable, index)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<usize>)> {
        self.indices.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Maps each parameter variable to its current value
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterMap {
    values: HashMap<String, ParameterValue>,
}

impl ParameterMap {
    /// Get a parameter value by variable
    pub fn get(&self, variable: &str) -> Option<&ParameterValue> {
        self.values.get(variable)
    }

    pub fn get_bool(&self, variable: &str) -> Option<bool> {
        self.get(variable).and_then(ParameterValue::as_bool)
    }

    pub fn get_int(&self, variable: &str) -> Option<i64> {
        self.get(variable).and_then(ParameterValue::as_int)
    }

    pub fn get_float(&self, variable: &str) -> Option<f64> {
        self.get(variable).and_then(ParameterValue::as_float)
    }

    pub fn get_str(&self, variable: &str) -> Option<&str> {
        self.get(variable).and_then(ParameterValue::as_str)
    }

    /// Get a boolean parameter or return a default
    pub fn get_bool_or(&self, variable: &str, default: bool) -> bool {
        self.get_bool(variable).unwrap_or(default)
    }

    /// Replace a value that already passed type checking
    pub(crate) fn set(&mut self, spec: &ParameterSpec, value: ParameterValue) {
        debug_assert!(spec.value_type.is_compatible_with(&value));
        self.values.insert(spec.variable.clone(), value);
    }

    /// Iterate over `(variable, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build a parameter map holding every declared default
pub fn initialize_parameter_map(descriptor: &VisualizationDescriptor) -> ParameterMap {
    let mut map = ParameterMap::default();
    for spec in descriptor.parameters() {
        map.set(spec, spec.default.clone());
    }
    map
}

/// Convert a raw editor value to the declared parameter type
pub fn parse_parameter_value(raw: &RawInput, declared: ValueType) -> ParseResult<ParameterValue> {
    match (declared, raw) {
        (ValueType::Boolean, RawInput::Checked(checked)) => Ok(ParameterValue::Bool(*checked)),
        (ValueType::Boolean, RawInput::Text(text)) => parse_flag(text)
            .map(ParameterValue::Bool)
            .ok_or_else(|| invalid(text, declared)),
        (ValueType::String, RawInput::Text(text)) => Ok(ParameterValue::String(text.clone())),
        (ValueType::String, RawInput::Checked(checked)) => {
            Ok(ParameterValue::String(checked.to_string()))
        }
        (ValueType::Integer, RawInput::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(ParameterValue::Int)
            .map_err(|_| invalid(text, declared)),
        (ValueType::Float | ValueType::Numeric, RawInput::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(ParameterValue::Float)
            .ok_or_else(|| invalid(text, declared)),
        (ValueType::Integer | ValueType::Float | ValueType::Numeric, RawInput::Checked(_)) => {
            Err(ParseError::UnexpectedFlag { expected: declared })
        }
    }
}

/// Convert a selected option value to a dataset attribute index
pub fn parse_attribute_value(
    raw: &RawInput,
    attributes: &[DatasetAttribute],
) -> ParseResult<usize> {
    let text = match raw {
        RawInput::Text(text) => text,
        RawInput::Checked(checked) => {
            return Err(ParseError::NotAnIndex {
                raw: checked.to_string(),
            })
        }
    };

    let index = text
        .trim()
        .parse::<usize>()
        .map_err(|_| ParseError::NotAnIndex { raw: text.clone() })?;

    if index >= attributes.len() {
        return Err(ParseError::IndexOutOfRange {
            index,
            len: attributes.len(),
        });
    }
    Ok(index)
}

/// Whether a dataset column of `actual` type may feed an attribute declared as `declared`.
///
/// `numeric` accepts integer and float columns; every other type needs an exact match.
pub fn is_attribute_compatible(actual: ValueType, declared: ValueType) -> bool {
    match declared {
        ValueType::Numeric => matches!(
            actual,
            ValueType::Numeric | ValueType::Integer | ValueType::Float
        ),
        _ => actual == declared,
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "checked" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}

fn invalid(text: &str, expected: ValueType) -> ParseError {
    ParseError::InvalidValue {
        raw: text.to_string(),
        expected,
    }
}
