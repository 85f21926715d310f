//! Visualization types and the render plugin boundary.
//!
//! A visualization type is declared once as an immutable
//! [`VisualizationDescriptor`] and shared by every viewer that uses it.
//! Drawing is delegated to an injected [`RenderRoutine`].
//!
//! # Key Components
//!
//! - [`VisualizationDescriptor`]: declared attributes, parameters and render routine
//! - [`RenderRoutine`]: the trait render plugins implement
//! - [`RenderContext`]: read-only inputs lent to a routine for one call
//! - [`VisualizationRegistry`]: catalog of descriptors keyed by type
//!
//! # Example
//!
//! ```ignore
//! let descriptor = VisualizationDescriptor::new(
//!     "density",
//!     "Density",
//!     vec![AttributeSpec::numeric("Value", "value")],
//!     vec![ParameterSpec::integer("Bins", "bins", 20)],
//!     render_fn(|ctx, viewport| {
//!         viewport.write(&format!("{} selections", ctx.selections.size()));
//!         Ok(())
//!     }),
//! )?;
//! ```

pub mod builtins;
pub mod params;
pub mod registry;

pub use params::{AttributeSpec, ParameterSpec, ParameterValue, ValueType};
pub use registry::VisualizationRegistry;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::binding::{AttributeMap, ParameterMap};
use crate::dataset::{DatasetAttribute, Selections};
use crate::error::{DescriptorError, PluginError};
use crate::viewport::Viewport;

/// Read-only inputs for one render call.
///
/// Everything is borrowed, so a routine cannot keep references past the call.
pub struct RenderContext<'a> {
    pub selections: &'a dyn Selections,
    pub attributes: &'a [DatasetAttribute],
    pub attribute_map: &'a AttributeMap,
    pub parameter_map: &'a ParameterMap,
}

impl<'a> RenderContext<'a> {
    /// Dataset attribute bound to an attribute variable
    pub fn attribute(&self, variable: &str) -> Option<&'a DatasetAttribute> {
        self.attribute_map.resolve(variable, self.attributes)
    }

    /// Like [`RenderContext::attribute`], failing when the variable is unbound
    pub fn require_attribute(&self, variable: &str) -> Result<&'a DatasetAttribute, PluginError> {
        self.attribute(variable)
            .ok_or_else(|| format!("attribute '{}' is not bound", variable).into())
    }
}

/// The trait render plugins implement.
///
/// A routine gets exclusive write access to the viewport and read-only
/// access to everything else. Returned errors are caught by the viewer.
pub trait RenderRoutine: Send + Sync {
    fn render(
        &self,
        ctx: &RenderContext<'_>,
        viewport: &mut dyn Viewport,
    ) -> Result<(), PluginError>;
}

struct FnRoutine<F>(F);

impl<F> RenderRoutine for FnRoutine<F>
where
    F: Fn(&RenderContext<'_>, &mut dyn Viewport) -> Result<(), PluginError> + Send + Sync,
{
    fn render(
        &self,
        ctx: &RenderContext<'_>,
        viewport: &mut dyn Viewport,
    ) -> Result<(), PluginError> {
        (self.0)(ctx, viewport)
    }
}

/// Wrap a closure as a shared render routine
pub fn render_fn<F>(f: F) -> Arc<dyn RenderRoutine>
where
    F: Fn(&RenderContext<'_>, &mut dyn Viewport) -> Result<(), PluginError> + Send + Sync + 'static,
{
    Arc::new(FnRoutine(f))
}

/// Immutable declaration of a visualization type
#[derive(Clone)]
pub struct VisualizationDescriptor {
    key: String,
    name: String,
    attributes: Vec<AttributeSpec>,
    parameters: Vec<ParameterSpec>,
    render: Arc<dyn RenderRoutine>,
}

impl VisualizationDescriptor {
    /// Build a descriptor, checking variable uniqueness and parameter defaults
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        attributes: Vec<AttributeSpec>,
        mut parameters: Vec<ParameterSpec>,
        render: Arc<dyn RenderRoutine>,
    ) -> Result<Self, DescriptorError> {
        let mut seen = HashSet::new();
        for spec in &attributes {
            if !seen.insert(spec.variable.as_str()) {
                return Err(DescriptorError::DuplicateAttribute(spec.variable.clone()));
            }
        }

        let mut seen = HashSet::new();
        for spec in &parameters {
            if !seen.insert(spec.variable.as_str()) {
                return Err(DescriptorError::DuplicateParameter(spec.variable.clone()));
            }
            if !spec.default_is_valid() {
                return Err(DescriptorError::DefaultTypeMismatch {
                    variable: spec.variable.clone(),
                    expected: spec.value_type,
                });
            }
        }

        // Numeric parameters hold floats so editor text parses back to the same value
        for spec in &mut parameters {
            if spec.value_type != ValueType::Numeric {
                continue;
            }
            if let ParameterValue::Int(i) = spec.default {
                spec.default = ParameterValue::Float(i as f64);
            }
        }

        Ok(Self {
            key: key.into(),
            name: name.into(),
            attributes,
            parameters,
            render,
        })
    }

    /// Registry key (e.g., "histogram")
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name (e.g., "Histogram")
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn attribute(&self, variable: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.variable == variable)
    }

    pub fn parameter(&self, variable: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.variable == variable)
    }

    /// The injected render routine
    pub fn routine(&self) -> &dyn RenderRoutine {
        self.render.as_ref()
    }
}

impl fmt::Debug for VisualizationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualizationDescriptor")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
