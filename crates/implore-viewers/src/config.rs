//! Configuration for implore-viewers
//!
//! Placeholder texts, activation behavior and editor control settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Engine-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Collection behavior
    pub collection: CollectionConfig,
    /// Editor form settings
    pub editor: EditorConfig,
}

/// Collection behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Shown in the viewport when the collection has no viewers
    pub no_viewer_message: String,
    /// Activate every viewer as it is added
    pub activate_on_add: bool,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            no_viewer_message: "No viewer available!".to_string(),
            activate_on_add: false,
        }
    }
}

/// Editor form configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Prefix for generated element ids
    pub element_prefix: String,
    /// Step of float number inputs
    pub float_step: f64,
    /// Step of integer number inputs
    pub integer_step: i64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            element_prefix: "element-viewer".to_string(),
            float_step: 0.1,
            integer_step: 1,
        }
    }
}

impl ViewerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor.element_prefix.trim().is_empty() {
            return Err(ConfigError::Missing("editor.element_prefix".to_string()));
        }

        if !(self.editor.float_step.is_finite() && self.editor.float_step > 0.0) {
            return Err(ConfigError::OutOfRange(
                "editor.float_step must be a positive number".to_string(),
            ));
        }

        if self.editor.integer_step < 1 {
            return Err(ConfigError::OutOfRange(
                "editor.integer_step must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
