//! User actions the builder can receive.

use serde::{Deserialize, Serialize};

use crate::interaction::ResizeHandle;
use crate::{ConfigValue, ElementId};

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "part", rename_all = "snake_case")]
pub enum PointerTarget {
    /// The element header (starts a move).
    Header {
        /// Element owning the header.
        element: ElementId,
    },
    /// A corner handle (starts a resize).
    Handle {
        /// Element owning the handle.
        element: ElementId,
        /// Which corner.
        handle: ResizeHandle,
    },
}

/// All input events the builder can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuilderEvent {
    /// Palette item dropped on the canvas.
    Drop {
        /// JSON drag payload (`{"type": ..., "component": ...}`).
        payload: String,
        /// Drop X in canvas coordinates.
        x: f32,
        /// Drop Y in canvas coordinates.
        y: f32,
    },
    /// Click on the canvas surface.
    Click {
        /// X in canvas coordinates.
        x: f32,
        /// Y in canvas coordinates.
        y: f32,
    },
    /// Select an element directly.
    Select {
        /// Element to select.
        element: ElementId,
    },
    /// Pointer pressed on an element part.
    PointerDown {
        /// Part that was pressed.
        target: PointerTarget,
        /// X in canvas coordinates.
        x: f32,
        /// Y in canvas coordinates.
        y: f32,
    },
    /// Pointer moved.
    PointerMove {
        /// X in canvas coordinates.
        x: f32,
        /// Y in canvas coordinates.
        y: f32,
    },
    /// Pointer released.
    PointerUp,
    /// Title entered edit mode.
    BeginTitleEdit {
        /// Element whose title is edited.
        element: ElementId,
    },
    /// Title edit finished.
    CommitTitle {
        /// Element whose title was edited.
        element: ElementId,
        /// New title text.
        title: String,
    },
    /// Move one step towards the front.
    BringForward {
        /// Element to move.
        element: ElementId,
    },
    /// Move one step towards the back.
    SendBackward {
        /// Element to move.
        element: ElementId,
    },
    /// Delete an element.
    Delete {
        /// Element to delete.
        element: ElementId,
    },
    /// Edit a field of the open configuration panel.
    EditConfig {
        /// Field key.
        key: String,
        /// New value.
        value: ConfigValue,
    },
    /// Pick a color from the metric swatch.
    PickSwatch {
        /// Hex color.
        color: String,
    },
    /// Undo the last change.
    Undo,
    /// Redo the last undone change.
    Redo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_use_snake_case_tags() {
        let json = r#"[
            {"type":"drop","payload":"{\"type\":\"metric\",\"component\":\"Revenue\"}","x":10,"y":20},
            {"type":"pointer_down","target":{"part":"handle","element":1,"handle":"nw"},"x":0,"y":0},
            {"type":"pointer_up"},
            {"type":"edit_config","key":"showLegend","value":true},
            {"type":"undo"}
        ]"#;
        let events: Vec<BuilderEvent> = serde_json::from_str(json).expect("parse");
        assert_eq!(events.len(), 5);
        assert_eq!(
            events[1],
            BuilderEvent::PointerDown {
                target: PointerTarget::Handle {
                    element: ElementId::new(1),
                    handle: ResizeHandle::Nw,
                },
                x: 0.0,
                y: 0.0,
            }
        );
        assert_eq!(
            events[3],
            BuilderEvent::EditConfig {
                key: "showLegend".into(),
                value: ConfigValue::Bool(true),
            }
        );
    }
}
