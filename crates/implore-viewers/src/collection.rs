//! Viewer collection with a single active viewer
//!
//! The collection keeps viewers in insertion order and tracks which one is
//! active. Its state is either empty (no viewers, nothing active) or
//! `Active(i)` with `i` a valid index; every operation preserves that.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Receiver;

use crate::config::ViewerConfig;
use crate::editor::{EditorForm, EditorInputs};
use crate::error::{CollectionError, CollectionResult};
use crate::events::{EventHub, ViewerEvent};
use crate::instance::{panic_message, CommitReport, RenderOutcome, ViewerId, ViewerInstance};
use crate::viewport::Viewport;

/// Ordered set of viewers with one active viewer
pub struct ViewerCollection {
    items: Vec<ViewerInstance>,
    active: Option<usize>,
    config: ViewerConfig,
    events: EventHub,
}

impl ViewerCollection {
    /// Create an empty collection with default configuration
    pub fn new() -> Self {
        Self::with_config(ViewerConfig::default())
    }

    pub fn with_config(config: ViewerConfig) -> Self {
        Self {
            items: Vec::new(),
            active: None,
            config,
            events: EventHub::new(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Register a listener for lifecycle events
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: Fn(&ViewerEvent, &ViewerCollection) + Send + Sync + 'static,
    {
        self.events.add_listener(Box::new(listener));
    }

    /// Receive lifecycle events over a channel
    pub fn subscribe(&mut self) -> Receiver<ViewerEvent> {
        self.events.subscribe()
    }

    /// Append a viewer and return its index.
    ///
    /// The viewer becomes active when `make_active` is set, when
    /// `activate_on_add` is configured, or when it is the first viewer.
    pub fn add(&mut self, instance: ViewerInstance, make_active: bool) -> usize {
        let id = instance.id();
        let descriptor = instance.descriptor().name().to_string();
        self.items.push(instance);
        let index = self.items.len() - 1;

        let activate =
            make_active || self.config.collection.activate_on_add || self.active.is_none();
        if activate {
            self.active = Some(index);
        }

        tracing::debug!("Added viewer {} ({}) at index {}", id, descriptor, index);
        self.publish(ViewerEvent::Added {
            viewer: id,
            descriptor,
            index,
        });
        if activate {
            self.publish_activated(index);
        }
        index
    }

    /// Remove a viewer by id.
    ///
    /// If it was active, its predecessor becomes active (or the new first
    /// viewer when it was at index 0); an empty collection has no active viewer.
    pub fn remove(&mut self, id: ViewerId) -> CollectionResult<ViewerInstance> {
        let index = self
            .index_of(id)
            .ok_or(CollectionError::UnknownViewer(id))?;
        let previously_active = self.active_viewer_id();

        let removed = self.items.remove(index);
        self.active = match self.active {
            _ if self.items.is_empty() => None,
            Some(active) if active == index => Some(index.saturating_sub(1)),
            Some(active) if active > index => Some(active - 1),
            other => other,
        };

        tracing::debug!("Removed viewer {} from index {}", id, index);
        self.publish(ViewerEvent::Removed {
            viewer: id,
            descriptor: removed.descriptor().name().to_string(),
            index,
        });

        if let Some(active) = self.active {
            if self.active_viewer_id() != previously_active {
                self.publish_activated(active);
            }
        }
        Ok(removed)
    }

    /// Activate a viewer by id and return its index
    pub fn set_active(&mut self, id: ViewerId) -> CollectionResult<usize> {
        let index = self
            .index_of(id)
            .ok_or(CollectionError::UnknownViewer(id))?;
        self.set_active_index(index)?;
        Ok(index)
    }

    /// Activate the viewer at `index`.
    ///
    /// Returns `Ok(false)` when it is already active. Index 0 is a valid target.
    pub fn set_active_index(&mut self, index: usize) -> CollectionResult<bool> {
        if index >= self.items.len() {
            return Err(CollectionError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        if self.active == Some(index) {
            return Ok(false);
        }

        self.active = Some(index);
        tracing::debug!("Activated viewer at index {}", index);
        self.publish_activated(index);
        Ok(true)
    }

    /// The active viewer, if any
    pub fn active(&self) -> Option<&ViewerInstance> {
        self.active.and_then(|i| self.items.get(i))
    }

    pub fn active_mut(&mut self) -> Option<&mut ViewerInstance> {
        match self.active {
            Some(i) => self.items.get_mut(i),
            None => None,
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Position of a viewer in insertion order
    pub fn index_of(&self, id: ViewerId) -> Option<usize> {
        self.items.iter().position(|v| v.id() == id)
    }

    pub fn get(&self, id: ViewerId) -> Option<&ViewerInstance> {
        self.items.iter().find(|v| v.id() == id)
    }

    pub fn get_mut(&mut self, id: ViewerId) -> Option<&mut ViewerInstance> {
        self.items.iter_mut().find(|v| v.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewerInstance> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the active viewer, or the "no viewer" placeholder when empty.
    ///
    /// Never fails: a broken render routine leaves its failure placeholder in
    /// the viewport and the error in the outcome.
    pub fn render_viewer(&self, viewport: &mut dyn Viewport) -> RenderOutcome {
        viewport.clear();
        match self.active() {
            Some(viewer) => viewer.render(viewport),
            None => {
                viewport.show_placeholder(&self.config.collection.no_viewer_message);
                RenderOutcome::Placeholder
            }
        }
    }

    /// Editor form for a viewer, using the collection's editor settings
    pub fn render_editor(&self, id: ViewerId) -> CollectionResult<EditorForm> {
        self.get(id)
            .map(|v| v.render_editor_with(&self.config.editor))
            .ok_or(CollectionError::UnknownViewer(id))
    }

    /// Commit edits to a viewer and render it into `viewport`
    pub fn commit_edits(
        &mut self,
        id: ViewerId,
        inputs: &EditorInputs,
        viewport: &mut dyn Viewport,
    ) -> CollectionResult<CommitReport> {
        let viewer = self.get_mut(id).ok_or(CollectionError::UnknownViewer(id))?;
        Ok(viewer.commit_edits(inputs, viewport))
    }

    fn active_viewer_id(&self) -> Option<ViewerId> {
        self.active().map(ViewerInstance::id)
    }

    fn publish_activated(&mut self, index: usize) {
        if let Some(viewer) = self.items.get(index) {
            let event = ViewerEvent::Activated {
                viewer: viewer.id(),
                descriptor: viewer.descriptor().name().to_string(),
                index,
            };
            self.publish(event);
        }
    }

    fn publish(&mut self, event: ViewerEvent) {
        // Listeners are out of the hub while they run; a panic must not lose them
        let listeners = self.events.take_listeners();
        for listener in &listeners {
            let this = &*self;
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener(&event, this))) {
                tracing::error!(
                    "Listener for {} panicked: {}",
                    event.name(),
                    panic_message(payload.as_ref())
                );
            }
        }
        self.events.restore_listeners(listeners);
        self.events.forward(&event);
    }
}

impl Default for ViewerCollection {
    fn default() -> Self {
        Self::new()
    }
}
