//! Editor form description
//!
//! [`EditorForm`] describes the controls for one viewer's binding without
//! drawing anything: one selector per declared attribute (offering only
//! compatible columns) and one typed control per declared parameter. The UI
//! layer renders it and hands the raw values back as [`EditorInputs`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::binding::{is_attribute_compatible, AttributeMap, ParameterMap, RawInput};
use crate::config::EditorConfig;
use crate::dataset::DatasetAttribute;
use crate::error::ParseError;
use crate::instance::ViewerId;
use crate::plugin::{ParameterValue, ValueType, VisualizationDescriptor};

/// Identifies one editor field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "variable", rename_all = "lowercase")]
pub enum FieldRef {
    Attribute(String),
    Parameter(String),
}

impl FieldRef {
    pub fn variable(&self) -> &str {
        match self {
            FieldRef::Attribute(v) | FieldRef::Parameter(v) => v,
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Attribute(v) => write!(f, "attribute '{}'", v),
            FieldRef::Parameter(v) => write!(f, "parameter '{}'", v),
        }
    }
}

/// A parse failure attached to the field it came from
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: FieldRef,
    pub error: ParseError,
}

/// Raw values submitted from an editor, keyed by variable.
///
/// A variable without an entry keeps its current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorInputs {
    pub attributes: HashMap<String, RawInput>,
    pub parameters: HashMap<String, RawInput>,
}

impl EditorInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, variable: impl Into<String>, raw: impl Into<RawInput>) -> Self {
        self.attributes.insert(variable.into(), raw.into());
        self
    }

    pub fn parameter(mut self, variable: impl Into<String>, raw: impl Into<RawInput>) -> Self {
        self.parameters.insert(variable.into(), raw.into());
        self
    }
}

/// One selectable dataset column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeOption {
    /// Index into the dataset attribute list (the option value)
    pub index: usize,
    pub name: String,
}

/// Column selector for one declared attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSelector {
    pub variable: String,
    pub label: String,
    pub declared: ValueType,
    pub options: Vec<AttributeOption>,
    pub selected: Option<usize>,
    pub error: Option<String>,
}

/// Input widget kind for a parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlKind {
    Number { step: f64 },
    Checkbox,
    Text,
}

/// Input control for one declared parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterControl {
    pub variable: String,
    pub label: String,
    pub declared: ValueType,
    pub kind: ControlKind,
    /// Current value as the control shows it
    pub value: RawInput,
    pub error: Option<String>,
}

/// Description of a viewer's editor form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorForm {
    pub viewer_id: ViewerId,
    /// Host element id (e.g., "element-viewer-editor-<uuid>")
    pub element_id: String,
    /// Descriptor display name
    pub title: String,
    pub attributes: Vec<AttributeSelector>,
    pub parameters: Vec<ParameterControl>,
}

impl EditorForm {
    pub(crate) fn build(
        viewer_id: ViewerId,
        descriptor: &VisualizationDescriptor,
        dataset: &[DatasetAttribute],
        attribute_map: &AttributeMap,
        parameter_map: &ParameterMap,
        config: &EditorConfig,
    ) -> Self {
        let attributes = descriptor
            .attributes()
            .iter()
            .map(|spec| AttributeSelector {
                variable: spec.variable.clone(),
                label: spec.name.clone(),
                declared: spec.value_type,
                options: dataset
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| is_attribute_compatible(a.value_type(), spec.value_type))
                    .map(|(index, a)| AttributeOption {
                        index,
                        name: a.name.clone(),
                    })
                    .collect(),
                selected: attribute_map.get(&spec.variable),
                error: None,
            })
            .collect();

        let parameters = descriptor
            .parameters()
            .iter()
            .map(|spec| {
                let current = parameter_map.get(&spec.variable).unwrap_or(&spec.default);
                ParameterControl {
                    variable: spec.variable.clone(),
                    label: spec.name.clone(),
                    declared: spec.value_type,
                    kind: control_kind(spec.value_type, config),
                    value: display_value(current),
                    error: None,
                }
            })
            .collect();

        Self {
            viewer_id,
            element_id: format!("{}-editor-{}", config.element_prefix, viewer_id),
            title: descriptor.name().to_string(),
            attributes,
            parameters,
        }
    }

    /// The raw values the form currently shows
    pub fn inputs(&self) -> EditorInputs {
        EditorInputs {
            attributes: self
                .attributes
                .iter()
                .filter_map(|a| {
                    a.selected
                        .map(|index| (a.variable.clone(), RawInput::Text(index.to_string())))
                })
                .collect(),
            parameters: self
                .parameters
                .iter()
                .map(|p| (p.variable.clone(), p.value.clone()))
                .collect(),
        }
    }

    /// Attach error messages to the controls they belong to
    pub fn annotate(&mut self, errors: &[FieldError]) {
        for field_error in errors {
            let message = Some(field_error.error.to_string());
            match &field_error.field {
                FieldRef::Attribute(variable) => {
                    if let Some(selector) =
                        self.attributes.iter_mut().find(|a| &a.variable == variable)
                    {
                        selector.error = message;
                    }
                }
                FieldRef::Parameter(variable) => {
                    if let Some(control) =
                        self.parameters.iter_mut().find(|p| &p.variable == variable)
                    {
                        control.error = message;
                    }
                }
            }
        }
    }

    /// Whether any control carries an error
    pub fn has_errors(&self) -> bool {
        self.attributes.iter().any(|a| a.error.is_some())
            || self.parameters.iter().any(|p| p.error.is_some())
    }
}

fn control_kind(value_type: ValueType, config: &EditorConfig) -> ControlKind {
    match value_type {
        ValueType::Float | ValueType::Numeric => ControlKind::Number {
            step: config.float_step,
        },
        ValueType::Integer => ControlKind::Number {
            step: config.integer_step as f64,
        },
        ValueType::Boolean => ControlKind::Checkbox,
        ValueType::String => ControlKind::Text,
    }
}

fn display_value(value: &ParameterValue) -> RawInput {
    match value {
        ParameterValue::Bool(b) => RawInput::Checked(*b),
        ParameterValue::Int(i) => RawInput::Text(i.to_string()),
        // Display for f64 is the shortest text that parses back to the same value
        ParameterValue::Float(f) => RawInput::Text(f.to_string()),
        ParameterValue::String(s) => RawInput::Text(s.clone()),
    }
}
