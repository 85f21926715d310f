//! Output surfaces for rendered viewers
//!
//! The engine treats a viewport as a write-only sink. Hosts implement
//! [`Viewport`] on whatever they draw into; [`BufferViewport`] keeps the
//! output in memory and is what the demo binary and tests use.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// A surface a render routine may draw into
pub trait Viewport {
    /// Identifier of the host element (e.g., a DOM element id)
    fn element_id(&self) -> &str;

    /// Drop everything drawn so far
    fn clear(&mut self);

    /// Append a fragment of rendered output
    fn write(&mut self, fragment: &str);

    /// Show an informational placeholder instead of a chart
    fn show_placeholder(&mut self, message: &str);

    /// Show the failure placeholder for a render error
    fn show_failure(&mut self, error: &RenderError);
}

/// What a viewport currently presents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "content", rename_all = "snake_case")]
pub enum ViewportState {
    Blank,
    Drawn(Vec<String>),
    Placeholder(String),
    Failed(String),
}

/// In-memory viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferViewport {
    element_id: String,
    state: ViewportState,
}

impl BufferViewport {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            state: ViewportState::Blank,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Fragments drawn since the last clear
    pub fn fragments(&self) -> &[String] {
        match &self.state {
            ViewportState::Drawn(fragments) => fragments,
            _ => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, ViewportState::Failed(_))
    }
}

impl Viewport for BufferViewport {
    fn element_id(&self) -> &str {
        &self.element_id
    }

    fn clear(&mut self) {
        self.state = ViewportState::Blank;
    }

    fn write(&mut self, fragment: &str) {
        match &mut self.state {
            ViewportState::Drawn(fragments) => fragments.push(fragment.to_string()),
            state => *state = ViewportState::Drawn(vec![fragment.to_string()]),
        }
    }

    fn show_placeholder(&mut self, message: &str) {
        self.state = ViewportState::Placeholder(message.to_string());
    }

    fn show_failure(&mut self, error: &RenderError) {
        self.state = ViewportState::Failed(error.to_string());
    }
}
