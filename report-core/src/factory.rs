//! Element factory: turns palette drops into canvas elements.

use serde::{Deserialize, Serialize};

use crate::{BuilderConfig, CanvasError, CanvasResult, ComponentType, Element, ElementId, Geometry};

/// Payload carried from a palette item to the canvas on drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    /// Component type name.
    #[serde(rename = "type")]
    pub kind: ComponentType,
    /// Component display name.
    pub component: String,
}

impl DragPayload {
    /// Parse the JSON string carried on the drag-data channel.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidPayload`] for malformed JSON, unknown
    /// component types or an empty component name.
    pub fn parse(json: &str) -> CanvasResult<Self> {
        let payload: Self =
            serde_json::from_str(json).map_err(|e| CanvasError::InvalidPayload(e.to_string()))?;
        if payload.component.trim().is_empty() {
            return Err(CanvasError::InvalidPayload("empty component name".into()));
        }
        Ok(payload)
    }
}

/// Body content rendered inside an element below its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// Numeric stub and label.
    Metric {
        /// Stub value.
        value: &'static str,
        /// Label under the value.
        label: String,
    },
    /// Chart icon and label.
    Chart {
        /// Icon glyph.
        icon: &'static str,
        /// Label under the icon.
        label: String,
    },
    /// Filter icon and text.
    Filter {
        /// Icon glyph.
        icon: &'static str,
        /// Text next to the icon.
        text: String,
    },
    /// Multi-column grid stub.
    Columns {
        /// Column labels.
        labels: Vec<&'static str>,
    },
    /// Horizontal divider.
    Divider,
    /// Plain layout label.
    Label(String),
}

/// Builds elements with sequential ids.
#[derive(Debug, Clone)]
pub struct ElementFactory {
    last_id: u64,
    width: f32,
    height: f32,
}

impl Default for ElementFactory {
    fn default() -> Self {
        Self::new(&BuilderConfig::default())
    }
}

impl ElementFactory {
    /// Create a factory that sizes elements per `config`.
    #[must_use]
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            last_id: 0,
            width: config.default_width,
            height: config.default_height,
        }
    }

    /// Create an element at the drop position with the next id.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::IdsExhausted`] once the id space is used up.
    pub fn create(
        &mut self,
        kind: ComponentType,
        component: &str,
        x: f32,
        y: f32,
    ) -> CanvasResult<Element> {
        self.last_id = self
            .last_id
            .checked_add(1)
            .ok_or(CanvasError::IdsExhausted(ElementId::new(self.last_id)))?;
        let geometry = Geometry {
            left: x,
            top: y,
            width: self.width,
            height: self.height,
        };
        Ok(Element::new(ElementId::new(self.last_id), kind, component, geometry))
    }

    /// Ensure ids issued later are strictly greater than `id`.
    pub fn observe(&mut self, id: ElementId) {
        self.last_id = self.last_id.max(id.value());
    }

    /// Last id handed out (or observed).
    #[must_use]
    pub fn last_id(&self) -> u64 {
        self.last_id
    }
}

/// Describe the placeholder body for a component.
#[must_use]
pub fn placeholder(kind: ComponentType, component: &str) -> Placeholder {
    match kind {
        ComponentType::Metric => Placeholder::Metric {
            value: "$0",
            label: component.to_string(),
        },
        ComponentType::Chart => Placeholder::Chart {
            icon: chart_icon(component),
            label: component.to_string(),
        },
        ComponentType::Filter => Placeholder::Filter {
            icon: filter_icon(component),
            text: format!("{component} Filter"),
        },
        ComponentType::Layout => match component {
            "Two Column" => Placeholder::Columns {
                labels: vec!["Column 1", "Column 2"],
            },
            "Three Column" => Placeholder::Columns {
                labels: vec!["Col 1", "Col 2", "Col 3"],
            },
            "Divider" => Placeholder::Divider,
            other => Placeholder::Label(other.to_string()),
        },
    }
}

/// Icon for a chart component.
#[must_use]
pub fn chart_icon(component: &str) -> &'static str {
    match component {
        "Line Chart" => "📈",
        "Pie Chart" => "🥧",
        "Area Chart" => "📉",
        "Table" => "📋",
        "KPI Card" => "🎯",
        "Heatmap" => "🔥",
        "Funnel Chart" => "🔻",
        _ => "📊",
    }
}

/// Icon for a filter component.
#[must_use]
pub fn filter_icon(component: &str) -> &'static str {
    match component {
        "Date Range" => "📅",
        "Channel" => "📺",
        "Country & Region" => "🌍",
        "Device Type" => "📱",
        "Product Category" => "🏷️",
        _ => "🔍",
    }
}
