//! Viewer instances
//!
//! A [`ViewerInstance`] is one configured viewer: a shared descriptor, the
//! host's read-only dataset and selections, and the binding it owns
//! exclusively. It produces its editor form, commits edited values field by
//! field and calls the descriptor's render routine behind a failure boundary.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use uuid::Uuid;

use crate::binding::{
    initialize_parameter_map, parse_attribute_value, parse_parameter_value, AttributeMap,
    ParameterMap,
};
use crate::config::EditorConfig;
use crate::dataset::{DatasetAttribute, Selections};
use crate::editor::{EditorForm, EditorInputs, FieldError, FieldRef};
use crate::error::RenderError;
use crate::plugin::{RenderContext, VisualizationDescriptor};
use crate::viewport::Viewport;

/// Unique identifier of a viewer instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerId(Uuid);

impl ViewerId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ViewerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Result of a render attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// The routine completed
    Rendered,
    /// Nothing to render; a placeholder is shown
    Placeholder,
    /// The routine failed; the viewport shows the failure placeholder
    Failed(RenderError),
}

impl RenderOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered)
    }

    pub fn error(&self) -> Option<&RenderError> {
        match self {
            RenderOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// What a commit changed and which fields were rejected
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReport {
    /// Fields whose value was replaced
    pub updated: Vec<FieldRef>,
    /// Fields that kept their previous value because the input did not parse
    pub errors: Vec<FieldError>,
    /// Outcome of the render that follows every commit
    pub render: RenderOutcome,
}

impl CommitReport {
    /// No field was rejected
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// One configured viewer
pub struct ViewerInstance {
    id: ViewerId,
    descriptor: Arc<VisualizationDescriptor>,
    attributes: Arc<[DatasetAttribute]>,
    selections: Arc<dyn Selections>,
    attribute_map: AttributeMap,
    parameter_map: ParameterMap,
    created_at: String,
}

impl ViewerInstance {
    /// Create a viewer with default parameters and no bound attributes
    pub fn create(
        descriptor: Arc<VisualizationDescriptor>,
        attributes: Arc<[DatasetAttribute]>,
        selections: Arc<dyn Selections>,
    ) -> Self {
        let attribute_map = AttributeMap::unbound(descriptor.attributes());
        let parameter_map = initialize_parameter_map(&descriptor);
        Self {
            id: ViewerId::new(),
            descriptor,
            attributes,
            selections,
            attribute_map,
            parameter_map,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn id(&self) -> ViewerId {
        self.id
    }

    pub fn descriptor(&self) -> &Arc<VisualizationDescriptor> {
        &self.descriptor
    }

    pub fn attribute_map(&self) -> &AttributeMap {
        &self.attribute_map
    }

    pub fn parameter_map(&self) -> &ParameterMap {
        &self.parameter_map
    }

    pub fn dataset_attributes(&self) -> &[DatasetAttribute] {
        &self.attributes
    }

    /// Creation timestamp (RFC 3339)
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Host element id for this viewer's chart (e.g., "element-viewer-<uuid>")
    pub fn element_id(&self, config: &EditorConfig) -> String {
        format!("{}-{}", config.element_prefix, self.id)
    }

    /// Describe the editor form with default settings
    pub fn render_editor(&self) -> EditorForm {
        self.render_editor_with(&EditorConfig::default())
    }

    /// Describe the editor form
    pub fn render_editor_with(&self, config: &EditorConfig) -> EditorForm {
        EditorForm::build(
            self.id,
            &self.descriptor,
            &self.attributes,
            &self.attribute_map,
            &self.parameter_map,
            config,
        )
    }

    /// Apply edited values field by field, then render.
    ///
    /// A field whose input fails to parse keeps its previous value and is
    /// reported in [`CommitReport::errors`]; the other fields are still applied.
    pub fn commit_edits(
        &mut self,
        inputs: &EditorInputs,
        viewport: &mut dyn Viewport,
    ) -> CommitReport {
        let descriptor = Arc::clone(&self.descriptor);
        let mut updated = Vec::new();
        let mut errors = Vec::new();

        for spec in descriptor.attributes() {
            let Some(raw) = inputs.attributes.get(&spec.variable) else {
                continue;
            };
            let field = FieldRef::Attribute(spec.variable.clone());
            let result = parse_attribute_value(raw, &self.attributes)
                .and_then(|index| self.attribute_map.bind(spec, index, &self.attributes));
            match result {
                Ok(()) => updated.push(field),
                Err(error) => {
                    tracing::warn!("Viewer {}: rejected {}: {}", self.id, field, error);
                    errors.push(FieldError { field, error });
                }
            }
        }

        for spec in descriptor.parameters() {
            let Some(raw) = inputs.parameters.get(&spec.variable) else {
                continue;
            };
            let field = FieldRef::Parameter(spec.variable.clone());
            match parse_parameter_value(raw, spec.value_type) {
                Ok(value) => {
                    self.parameter_map.set(spec, value);
                    updated.push(field);
                }
                Err(error) => {
                    tracing::warn!("Viewer {}: rejected {}: {}", self.id, field, error);
                    errors.push(FieldError { field, error });
                }
            }
        }

        tracing::debug!(
            "Viewer {}: committed {} fields, {} rejected",
            self.id,
            updated.len(),
            errors.len()
        );

        let render = self.render(viewport);
        CommitReport {
            updated,
            errors,
            render,
        }
    }

    /// Close the editor without applying anything
    pub fn discard_edits(&self) {
        tracing::trace!("Viewer {}: edits discarded", self.id);
    }

    /// Run the descriptor's render routine into `viewport`.
    ///
    /// Failures (returned errors and panics) never propagate: the viewport is
    /// cleared, shows the failure placeholder, and the error is returned in
    /// the outcome.
    pub fn render(&self, viewport: &mut dyn Viewport) -> RenderOutcome {
        let ctx = RenderContext {
            selections: self.selections.as_ref(),
            attributes: &self.attributes,
            attribute_map: &self.attribute_map,
            parameter_map: &self.parameter_map,
        };
        let routine = self.descriptor.routine();

        let result = panic::catch_unwind(AssertUnwindSafe(|| routine.render(&ctx, &mut *viewport)));
        let message = match result {
            Ok(Ok(())) => return RenderOutcome::Rendered,
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        let error = RenderError {
            viewer: self.id,
            descriptor: self.descriptor.name().to_string(),
            message,
        };
        tracing::error!("{}", error);

        viewport.clear();
        viewport.show_failure(&error);
        RenderOutcome::Failed(error)
    }
}

impl fmt::Debug for ViewerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewerInstance")
            .field("id", &self.id)
            .field("descriptor", &self.descriptor.key())
            .field("attribute_map", &self.attribute_map)
            .field("parameter_map", &self.parameter_map)
            .finish_non_exhaustive()
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
