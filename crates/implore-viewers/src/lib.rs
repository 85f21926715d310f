//! implore-viewers - Element viewers for tabular scientific data
//!
//! This crate lets a host present interchangeable, user-configurable
//! visualizations ("element viewers") over a shared dataset. A visualization
//! type is declared once; users bind dataset columns and parameter values to
//! instances of it through a generated editor form.
//!
//! # Key Components
//!
//! - **VisualizationDescriptor**: immutable declaration of a visualization type
//! - **VisualizationRegistry**: catalog of descriptors (scatterplot, histogram, testplot)
//! - **AttributeMap / ParameterMap**: the binding owned by each viewer
//! - **ViewerInstance**: one configured viewer; editor form, commits, rendering
//! - **ViewerCollection**: ordered viewers with a single active viewer
//! - **ViewerEvent**: `viewer-added`, `viewer-removed`, `viewer-activated`
//!
//! # Failure handling
//!
//! Editor fields are parsed one at a time; a bad field keeps its previous value
//! and never blocks the others. Render routines run behind a boundary that
//! turns errors and panics into a failure placeholder in the viewport.

pub mod binding;
pub mod collection;
pub mod config;
pub mod dataset;
pub mod editor;
pub mod error;
pub mod events;
pub mod instance;
pub mod plugin;
pub mod viewport;

pub use binding::{
    initialize_parameter_map, is_attribute_compatible, parse_attribute_value,
    parse_parameter_value, AttributeMap, ParameterMap, RawInput,
};
pub use collection::ViewerCollection;
pub use config::{CollectionConfig, EditorConfig, ViewerConfig};
pub use dataset::{DataColumn, DatasetAttribute, Selection, SelectionSet, Selections};
pub use editor::{
    AttributeOption, AttributeSelector, ControlKind, EditorForm, EditorInputs, FieldError,
    FieldRef, ParameterControl,
};
pub use error::*;
pub use events::{EventHub, ViewerEvent, ViewerListener};
pub use instance::{CommitReport, RenderOutcome, ViewerId, ViewerInstance};
pub use plugin::{
    render_fn, AttributeSpec, ParameterSpec, ParameterValue, RenderContext, RenderRoutine,
    ValueType, VisualizationDescriptor, VisualizationRegistry,
};
pub use viewport::{BufferViewport, Viewport, ViewportState};

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
