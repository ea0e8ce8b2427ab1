//! Canvas elements - the building blocks of a report.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix used when an element id is rendered as a DOM/document id.
const ID_PREFIX: &str = "element-";

/// Sequential identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    /// Create an id from its sequence number.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The sequence number of this id.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Parse an id from either `element-N` or a bare `N`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.strip_prefix(ID_PREFIX)
            .unwrap_or(s)
            .parse::<u64>()
            .ok()
            .map(Self)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ID_PREFIX}{}", self.0)
    }
}

/// The kind of component an element represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    /// A single KPI value.
    Metric,
    /// A chart or table.
    Chart,
    /// A filter control.
    Filter,
    /// A layout block (columns, divider).
    Layout,
}

impl ComponentType {
    /// All component types in palette order.
    pub const ALL: [Self; 4] = [Self::Metric, Self::Chart, Self::Filter, Self::Layout];

    /// Lowercase name used in payloads and markup.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Chart => "chart",
            Self::Filter => "filter",
            Self::Layout => "layout",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown component type `{s}`"))
    }
}

/// Position and size of an element in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Pixels from the canvas left edge.
    pub left: f32,
    /// Pixels from the canvas top edge.
    pub top: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Geometry {
    /// Check if a point (in canvas coordinates) is within this rectangle.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }
}

/// A single value in an element's configuration bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Checkbox state.
    Bool(bool),
    /// Raw input value.
    Text(String),
    /// Multi-select choices.
    List(Vec<String>),
}

impl ConfigValue {
    /// Render as the string stored in a `data-*` attribute.
    #[must_use]
    pub fn to_attribute(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(","),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Type-specific configuration attached to an element.
pub type ConfigBag = BTreeMap<String, ConfigValue>;

/// A report element placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Component type.
    #[serde(rename = "type")]
    pub kind: ComponentType,
    /// Palette display name, e.g. `Line Chart`.
    pub component: String,
    /// Editable header title.
    pub title: String,
    /// Position and size.
    pub geometry: Geometry,
    /// Configuration written by the panel.
    #[serde(default)]
    pub config: ConfigBag,
}

impl Element {
    /// Create an element with an empty configuration bag.
    #[must_use]
    pub fn new(id: ElementId, kind: ComponentType, component: impl Into<String>, geometry: Geometry) -> Self {
        let component = component.into();
        Self {
            id,
            kind,
            title: component.clone(),
            component,
            geometry,
            config: ConfigBag::new(),
        }
    }

    /// Look up a configuration value.
    #[must_use]
    pub fn config_value(&self, key: &str) -> Option<&ConfigValue> {
        self.config.get(key)
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.geometry.contains_point(x, y)
    }
}
