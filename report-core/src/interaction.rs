//! Pointer-driven move and resize.
//!
//! Only one interaction can be active at a time. Every pointer-move
//! recomputes geometry from the press position and the geometry captured at
//! press time.

use serde::{Deserialize, Serialize};

use crate::{Canvas, CanvasError, CanvasResult, ElementId, Geometry};

/// One of the four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    /// Top-right corner.
    Ne,
    /// Top-left corner.
    Nw,
    /// Bottom-right corner.
    Se,
    /// Bottom-left corner.
    Sw,
}

impl ResizeHandle {
    /// All handles, in the order they are rendered.
    pub const ALL: [Self; 4] = [Self::Se, Self::Ne, Self::Sw, Self::Nw];

    /// CSS class suffix for the handle.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ne => "ne",
            Self::Nw => "nw",
            Self::Se => "se",
            Self::Sw => "sw",
        }
    }

    const fn north(self) -> bool {
        matches!(self, Self::Ne | Self::Nw)
    }

    const fn west(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }
}

/// Current pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    /// No pointer interaction in progress.
    #[default]
    Idle,
    /// Moving an element by its header.
    Dragging {
        /// Element being moved.
        id: ElementId,
        /// Pointer position at press.
        start: (f32, f32),
        /// Geometry at press.
        origin: Geometry,
    },
    /// Resizing an element by a corner handle.
    Resizing {
        /// Element being resized.
        id: ElementId,
        /// Handle that was pressed.
        handle: ResizeHandle,
        /// Pointer position at press.
        start: (f32, f32),
        /// Geometry at press.
        origin: Geometry,
    },
}

impl Interaction {
    /// Element the interaction targets, if any.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } => Some(*id),
        }
    }

    /// Whether an interaction is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Minimum element size enforced by resizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    /// Minimum width.
    pub min_width: f32,
    /// Minimum height.
    pub min_height: f32,
}

/// Geometry after dragging `origin` by the pointer delta.
#[must_use]
pub fn drag_geometry(origin: Geometry, dx: f32, dy: f32) -> Geometry {
    Geometry {
        left: origin.left + dx,
        top: origin.top + dy,
        ..origin
    }
}

/// Geometry after pulling `handle` by the pointer delta, clamped to `limits`.
///
/// West and north handles keep the opposite edge fixed by shifting the
/// origin by exactly the amount the clamped size changed.
#[must_use]
pub fn resize_geometry(
    origin: Geometry,
    handle: ResizeHandle,
    dx: f32,
    dy: f32,
    limits: SizeLimits,
) -> Geometry {
    let mut next = origin;
    if handle.west() {
        next.width = (origin.width - dx).max(limits.min_width);
        next.left = origin.left + (origin.width - next.width);
    } else {
        next.width = (origin.width + dx).max(limits.min_width);
    }
    if handle.north() {
        next.height = (origin.height - dy).max(limits.min_height);
        next.top = origin.top + (origin.height - next.height);
    } else {
        next.height = (origin.height + dy).max(limits.min_height);
    }
    next
}

/// Drives move/resize interactions against a canvas.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: Interaction,
    limits: SizeLimits,
}

impl InteractionController {
    /// Create an idle controller.
    #[must_use]
    pub fn new(limits: SizeLimits) -> Self {
        Self {
            state: Interaction::Idle,
            limits,
        }
    }

    /// The current interaction.
    #[must_use]
    pub fn state(&self) -> Interaction {
        self.state
    }

    /// Start moving `id` from pointer position `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if another interaction is active or the element is
    /// not on the canvas.
    pub fn begin_drag(&mut self, canvas: &Canvas, id: ElementId, x: f32, y: f32) -> CanvasResult<()> {
        self.ensure_idle()?;
        let origin = canvas
            .get_element(id)
            .ok_or(CanvasError::ElementNotFound(id))?
            .geometry;
        self.state = Interaction::Dragging {
            id,
            start: (x, y),
            origin,
        };
        tracing::debug!(%id, x, y, "drag started");
        Ok(())
    }

    /// Start resizing `id` with `handle` from pointer position `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if another interaction is active or the element is
    /// not on the canvas.
    pub fn begin_resize(
        &mut self,
        canvas: &Canvas,
        id: ElementId,
        handle: ResizeHandle,
        x: f32,
        y: f32,
    ) -> CanvasResult<()> {
        self.ensure_idle()?;
        let origin = canvas
            .get_element(id)
            .ok_or(CanvasError::ElementNotFound(id))?
            .geometry;
        self.state = Interaction::Resizing {
            id,
            handle,
            start: (x, y),
            origin,
        };
        tracing::debug!(%id, handle = handle.as_str(), "resize started");
        Ok(())
    }

    /// Apply a pointer move to the active interaction.
    ///
    /// Returns the updated geometry, or `None` when idle or when the target
    /// element has disappeared.
    pub fn pointer_move(&mut self, canvas: &mut Canvas, x: f32, y: f32) -> Option<Geometry> {
        let (id, next) = match self.state {
            Interaction::Idle => return None,
            Interaction::Dragging { id, start, origin } => {
                (id, drag_geometry(origin, x - start.0, y - start.1))
            }
            Interaction::Resizing {
                id,
                handle,
                start,
                origin,
            } => (
                id,
                resize_geometry(origin, handle, x - start.0, y - start.1, self.limits),
            ),
        };
        let element = canvas.get_element_mut(id)?;
        element.geometry = next;
        Some(next)
    }

    /// Finish the active interaction.
    ///
    /// Returns the element to commit, or `None` if nothing was active or the
    /// element is gone.
    pub fn pointer_up(&mut self, canvas: &Canvas) -> Option<ElementId> {
        let id = self.state.target()?;
        self.state = Interaction::Idle;
        if canvas.contains(id) {
            tracing::debug!(%id, "interaction committed");
            Some(id)
        } else {
            tracing::warn!(%id, "interaction target vanished before release");
            None
        }
    }

    /// Drop any active interaction without committing.
    pub fn cancel(&mut self) {
        self.state = Interaction::Idle;
    }

    fn ensure_idle(&self) -> CanvasResult<()> {
        match self.state.target() {
            Some(active) => Err(CanvasError::InteractionInProgress(active)),
            None => Ok(()),
        }
    }
}
