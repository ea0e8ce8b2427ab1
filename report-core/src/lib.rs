//! # Report Builder Core
//!
//! Model and controller for a drag-and-drop report canvas.
//! Compiles to WASM for use in the browser.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              report-core.wasm               │
//! ├─────────────────────────────────────────────┤
//! │  Canvas Model    │  Report Builder          │
//! │  - Elements      │  - Selection / panel     │
//! │  - Geometry      │  - Drag and resize       │
//! │  - Config bags   │  - Undo / redo history   │
//! ├─────────────────────────────────────────────┤
//! │  Persistence     │  Rendering               │
//! │  - Saved report  │  - Editor markup         │
//! │  - Templates     │  - Preview markup        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Markup is always derived from the [`Canvas`]; the DOM is never the
//! source of truth.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod canvas;
mod clock;
pub mod config;
pub mod dialog;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod factory;
pub mod history;
pub mod interaction;
pub mod panel;
pub mod persistence;
pub mod render;
pub mod storage;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use builder::ReportBuilder;
pub use canvas::Canvas;
pub use clock::current_timestamp_ms;
pub use config::BuilderConfig;
pub use dialog::{Dialogs, Platform, ScriptedDialogs, ShareRequest};
pub use document::{ReportDocument, ReportElement, TemplateDocument, TemplateElement};
pub use element::{ComponentType, ConfigBag, ConfigValue, Element, ElementId, Geometry};
pub use error::{CanvasError, CanvasResult, PersistenceError, StorageError};
pub use event::{BuilderEvent, PointerTarget};
pub use factory::{DragPayload, ElementFactory, Placeholder};
pub use history::{History, HistoryEntry};
pub use interaction::{Interaction, InteractionController, ResizeHandle, SizeLimits};
pub use panel::{ConfigPanel, Field, FieldKind, FieldView, PanelSchema, PanelView};
pub use persistence::{ExportFormat, ShareOutcome};
pub use render::RenderMode;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// Report core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
