//! Registry of visualization types.
//!
//! The registry is filled at startup and then only read: viewers look up a
//! descriptor by key when they are created and keep the shared `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use super::{builtins, VisualizationDescriptor};
use crate::error::{RegistryError, ViewerResult};

/// Catalog of visualization descriptors keyed by type
pub struct VisualizationRegistry {
    descriptors: Vec<Arc<VisualizationDescriptor>>,
    by_key: HashMap<String, usize>,
}

impl VisualizationRegistry {
    /// Create a registry with the built-in types registered.
    pub fn builtin() -> ViewerResult<Self> {
        let mut registry = Self::empty();
        for descriptor in builtins::all()? {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            descriptors: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// Register a descriptor under its key.
    pub fn register(
        &mut self,
        descriptor: Arc<VisualizationDescriptor>,
    ) -> Result<(), RegistryError> {
        let key = descriptor.key().to_string();
        if self.by_key.contains_key(&key) {
            return Err(RegistryError::Duplicate(key));
        }

        self.by_key.insert(key, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Get a descriptor by its key.
    pub fn get(&self, key: &str) -> Option<&Arc<VisualizationDescriptor>> {
        self.by_key.get(key).map(|&index| &self.descriptors[index])
    }

    /// Like [`VisualizationRegistry::get`], returning a shared handle or an error
    pub fn lookup(&self, key: &str) -> Result<Arc<VisualizationDescriptor>, RegistryError> {
        self.get(key)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }

    /// List all descriptors in registration order.
    pub fn list_all(&self) -> impl Iterator<Item = &Arc<VisualizationDescriptor>> {
        self.descriptors.iter()
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Search descriptors by key or name (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<&Arc<VisualizationDescriptor>> {
        let query_lower = query.to_lowercase();
        self.descriptors
            .iter()
            .filter(|d| {
                d.key().to_lowercase().contains(&query_lower)
                    || d.name().to_lowercase().contains(&query_lower)
            })
            .collect()
    }
}

impl Default for VisualizationRegistry {
    fn default() -> Self {
        Self::empty()
    }
}
