//! Markup derived from the canvas model.
//!
//! Rendering is a pure function of the canvas, so undo/redo only has to
//! swap the model and render again.

use std::fmt::Write as _;

use crate::factory::{placeholder, Placeholder};
use crate::interaction::ResizeHandle;
use crate::{Canvas, Element, ElementId};

/// Markup shown when the canvas has no elements.
pub const EMPTY_STATE_HTML: &str = "<div class=\"empty-state\"><div class=\"empty-state-icon\">📊</div><h2>Start Building Your Report</h2><p>Drag components from the left sidebar to begin</p></div>";

/// How elements are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Editable canvas: header actions, resize handles, selection.
    Editor {
        /// Element drawn as selected.
        selected: Option<ElementId>,
    },
    /// Read-only preview without controls.
    Preview,
}

/// Render the editable canvas.
#[must_use]
pub fn render_canvas(canvas: &Canvas, selected: Option<ElementId>) -> String {
    render(canvas, RenderMode::Editor { selected })
}

/// Render a read-only preview of the report.
#[must_use]
pub fn render_preview(canvas: &Canvas) -> String {
    let mut out = String::from("<div class=\"preview-content\">");
    out.push_str(&render(canvas, RenderMode::Preview));
    out.push_str("</div>");
    out
}

/// Render the canvas contents in the given mode.
#[must_use]
pub fn render(canvas: &Canvas, mode: RenderMode) -> String {
    if canvas.is_empty() {
        return EMPTY_STATE_HTML.to_string();
    }
    let mut out = String::new();
    for element in canvas.elements() {
        render_element(&mut out, element, mode);
    }
    out
}

fn render_element(out: &mut String, element: &Element, mode: RenderMode) {
    let editor = matches!(mode, RenderMode::Editor { .. });
    let selected = matches!(mode, RenderMode::Editor { selected: Some(id) } if id == element.id);
    let g = element.geometry;

    out.push_str("<div class=\"canvas-element");
    if selected {
        out.push_str(" selected");
    }
    let _ = write!(
        out,
        "\" id=\"{}\" data-type=\"{}\" data-component=\"{}\"",
        element.id,
        element.kind,
        escape_html(&element.component)
    );
    for (key, value) in &element.config {
        let _ = write!(
            out,
            " data-{}=\"{}\"",
            attribute_name(key),
            escape_html(&value.to_attribute())
        );
    }
    if editor {
        let _ = write!(
            out,
            " style=\"left: {}px; top: {}px; width: {}px; height: {}px;\">",
            g.left, g.top, g.width, g.height
        );
    } else {
        let _ = write!(
            out,
            " style=\"position: relative; margin-bottom: 24px; width: {}px; height: {}px;\">",
            g.width, g.height
        );
    }

    out.push_str("<div class=\"element-content\"><div class=\"element-header\">");
    let _ = write!(
        out,
        "<div class=\"element-title\"{}>{}</div>",
        if editor { " contenteditable=\"true\"" } else { "" },
        escape_html(&element.title)
    );
    if editor {
        out.push_str(concat!(
            "<div class=\"element-actions\">",
            "<button class=\"element-action\" title=\"Bring Forward\">↑</button>",
            "<button class=\"element-action\" title=\"Send Backward\">↓</button>",
            "<button class=\"element-action\" title=\"Delete\">✕</button>",
            "</div>"
        ));
    }
    out.push_str("</div>");
    render_placeholder(out, &placeholder(element.kind, &element.component));
    out.push_str("</div>");

    if editor {
        for handle in ResizeHandle::ALL {
            let _ = write!(out, "<div class=\"resize-handle {}\"></div>", handle.as_str());
        }
    }
    out.push_str("</div>");
}

fn render_placeholder(out: &mut String, body: &Placeholder) {
    match body {
        Placeholder::Metric { value, label } => {
            let _ = write!(
                out,
                "<div class=\"metric-placeholder\"><div class=\"metric-value\">{value}</div><div class=\"metric-label\">{}</div></div>",
                escape_html(label)
            );
        }
        Placeholder::Chart { icon, label } => {
            let _ = write!(
                out,
                "<div class=\"chart-placeholder\"><div class=\"chart-icon\">{icon}</div><div>{}</div></div>",
                escape_html(label)
            );
        }
        Placeholder::Filter { icon, text } => {
            let _ = write!(
                out,
                "<div class=\"filter-placeholder\"><span>{icon}</span><span>{}</span></div>",
                escape_html(text)
            );
        }
        Placeholder::Columns { labels } => {
            let _ = write!(
                out,
                "<div class=\"layout-placeholder\"><div class=\"layout-grid\" style=\"grid-template-columns: repeat({}, 1fr);\">",
                labels.len()
            );
            for label in labels {
                let _ = write!(out, "<div class=\"layout-column\">{label}</div>");
            }
            out.push_str("</div></div>");
        }
        Placeholder::Divider => {
            out.push_str("<div class=\"layout-placeholder layout-divider\"></div>");
        }
        Placeholder::Label(text) => {
            let _ = write!(
                out,
                "<div class=\"layout-placeholder\">{}</div>",
                escape_html(text)
            );
        }
    }
}

/// Convert a camelCase config key into its `data-*` attribute suffix.
fn attribute_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else if c.is_ascii_alphanumeric() || c == '-' {
            name.push(c);
        }
    }
    name
}

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
