//! Error types for implore-viewers
//!
//! Provides error handling for:
//! - Editor field parsing
//! - Plugin render failures
//! - Collection bookkeeping (unknown viewers, bad indices)
//! - Descriptor and registry construction
//! - Configuration loading

use thiserror::Error;

use crate::instance::ViewerId;
use crate::plugin::ValueType;

/// Main error type for viewer operations
#[derive(Error, Debug)]
pub enum ViewerError {
    /// A single editor field could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A plugin render routine failed
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    /// Collection operation referenced a missing viewer or index
    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),

    /// Descriptor failed validation
    #[error("Invalid descriptor: {0}")]
    Descriptor(#[from] DescriptorError),

    /// Registry lookup or registration failed
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A raw editor value that does not fit its declared type.
///
/// Parse errors are always local to one field: the field keeps its
/// previous value and the remaining fields are still committed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("'{raw}' is not a valid {expected} value")]
    InvalidValue { raw: String, expected: ValueType },

    #[error("a checkbox state cannot be used as a {expected} value")]
    UnexpectedFlag { expected: ValueType },

    #[error("'{raw}' is not an attribute index")]
    NotAnIndex { raw: String },

    #[error("attribute index {index} is out of range ({len} attributes)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("attribute '{name}' has type {actual}, expected {expected}")]
    IncompatibleAttribute {
        name: String,
        actual: ValueType,
        expected: ValueType,
    },
}

/// A plugin render routine failed for one viewer.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("viewer {viewer} ({descriptor}) failed to render: {message}")]
pub struct RenderError {
    pub viewer: ViewerId,
    pub descriptor: String,
    pub message: String,
}

/// Errors related to the viewer collection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    /// No viewer with this id is part of the collection
    #[error("Viewer not found: {0}")]
    UnknownViewer(ViewerId),

    /// Index outside `0..len`
    #[error("Index {index} out of bounds for collection of {len} viewers")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Errors raised while building a visualization descriptor
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescriptorError {
    #[error("duplicate attribute variable '{0}'")]
    DuplicateAttribute(String),

    #[error("duplicate parameter variable '{0}'")]
    DuplicateParameter(String),

    #[error("default for parameter '{variable}' does not match type {expected}")]
    DefaultTypeMismatch { variable: String, expected: ValueType },
}

/// Errors related to the descriptor registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Visualization type not found: {0}")]
    NotFound(String),

    #[error("Visualization type already registered: {0}")]
    Duplicate(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Missing value: {0}")]
    Missing(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error type returned by plugin render routines
pub type PluginError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Result type alias for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Result type alias for editor field parsing
pub type ParseResult<T> = Result<T, ParseError>;
