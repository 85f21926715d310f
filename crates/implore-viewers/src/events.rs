//! Viewer lifecycle notifications
//!
//! A collection announces `viewer-added`, `viewer-removed` and
//! `viewer-activated` to listeners registered on it, and to any number of
//! channel subscribers. Events are published only after the mutation they
//! describe has been applied.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::collection::ViewerCollection;
use crate::instance::ViewerId;

/// Events emitted by a viewer collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ViewerEvent {
    #[serde(rename = "viewer-added")]
    Added {
        viewer: ViewerId,
        descriptor: String,
        index: usize,
    },
    #[serde(rename = "viewer-removed")]
    Removed {
        viewer: ViewerId,
        descriptor: String,
        index: usize,
    },
    #[serde(rename = "viewer-activated")]
    Activated {
        viewer: ViewerId,
        descriptor: String,
        index: usize,
    },
}

impl ViewerEvent {
    /// Event name as announced to hosts
    pub fn name(&self) -> &'static str {
        match self {
            ViewerEvent::Added { .. } => "viewer-added",
            ViewerEvent::Removed { .. } => "viewer-removed",
            ViewerEvent::Activated { .. } => "viewer-activated",
        }
    }

    /// The viewer the event is about
    pub fn viewer(&self) -> ViewerId {
        match self {
            ViewerEvent::Added { viewer, .. }
            | ViewerEvent::Removed { viewer, .. }
            | ViewerEvent::Activated { viewer, .. } => *viewer,
        }
    }

    /// Index of the viewer (for `Removed`, the index it had before removal)
    pub fn index(&self) -> usize {
        match self {
            ViewerEvent::Added { index, .. }
            | ViewerEvent::Removed { index, .. }
            | ViewerEvent::Activated { index, .. } => *index,
        }
    }
}

/// Callback invoked with each event and the collection in its post-mutation state
pub type ViewerListener = Box<dyn Fn(&ViewerEvent, &ViewerCollection) + Send + Sync>;

/// Listener and channel fan-out for one collection
#[derive(Default)]
pub struct EventHub {
    listeners: Vec<ViewerListener>,
    subscribers: Vec<Sender<ViewerEvent>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; listeners run in registration order
    pub fn add_listener(&mut self, listener: ViewerListener) {
        self.listeners.push(listener);
    }

    /// Open a channel that receives every subsequent event
    pub fn subscribe(&mut self) -> Receiver<ViewerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Move the listeners out so they can borrow the collection while running
    pub(crate) fn take_listeners(&mut self) -> Vec<ViewerListener> {
        std::mem::take(&mut self.listeners)
    }

    pub(crate) fn restore_listeners(&mut self, listeners: Vec<ViewerListener>) {
        self.listeners = listeners;
    }

    /// Deliver to channel subscribers, dropping those whose receiver is gone
    pub(crate) fn forward(&mut self, event: &ViewerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
