//! Error types for report builder operations.

use thiserror::Error;

use crate::ElementId;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur while editing the canvas.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Element not found on the canvas.
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    /// A palette drop carried a payload that could not be understood.
    #[error("Invalid drag payload: {0}")]
    InvalidPayload(String),

    /// A configuration edit was rejected.
    #[error("Invalid configuration for `{key}`: {reason}")]
    InvalidConfig {
        /// Field key that was edited.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A configuration edit arrived while no panel was open.
    #[error("No configuration panel is open")]
    NoPanelOpen,

    /// A drag or resize was started while another one is active.
    #[error("Another interaction is already in progress on {0}")]
    InteractionInProgress(ElementId),

    /// Every element id has been handed out.
    #[error("No element ids left after {0}")]
    IdsExhausted(ElementId),

    /// Canvas serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by key/value storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend is not available in this environment.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the write (e.g. quota exceeded).
    #[error("Storage write failed for `{key}`: {reason}")]
    WriteFailed {
        /// Key being written.
        key: String,
        /// Backend-provided reason.
        reason: String,
    },
}

/// Errors raised while saving or loading reports and templates.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Stored JSON could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Nothing is stored under the given key.
    #[error("Nothing saved under `{0}`")]
    NotFound(String),

    /// No template with the given name exists.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// A stored element could not be turned back into a canvas element.
    #[error("Invalid stored element: {0}")]
    InvalidElement(String),

    /// Rebuilding the canvas failed.
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
