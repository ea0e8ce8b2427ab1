//! Configuration panel: per-type forms that edit an element's config bag.
//!
//! A panel is opened against exactly one element. Edits are accepted only
//! for fields of that panel's form, and are validated against the field
//! kind before anything is written.

use serde::Serialize;

use crate::{CanvasError, CanvasResult, ComponentType, ConfigValue, Element, ElementId};

/// One option of a select field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// Stored value.
    pub value: &'static str,
    /// Displayed label.
    pub label: &'static str,
}

impl Choice {
    /// A choice whose label is its value.
    #[must_use]
    pub const fn plain(value: &'static str) -> Self {
        Self { value, label: value }
    }

    /// A choice with a distinct label.
    #[must_use]
    pub const fn labeled(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Input widget of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single choice.
    Select {
        /// Allowed choices.
        options: &'static [Choice],
    },
    /// Several choices.
    MultiSelect {
        /// Allowed choices.
        options: &'static [Choice],
    },
    /// Integer input with bounds.
    Number {
        /// Inclusive minimum.
        min: i64,
        /// Inclusive maximum.
        max: i64,
    },
    /// Free text.
    Text {
        /// Hint shown when empty.
        placeholder: &'static str,
    },
    /// Boolean toggle.
    Checkbox,
    /// Fixed palette of colors.
    ColorSwatch {
        /// Allowed hex colors.
        choices: &'static [&'static str],
    },
    /// Free `#rrggbb` color.
    Color,
}

/// A form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Key written into the config bag.
    pub key: &'static str,
    /// Label shown next to the input.
    pub label: &'static str,
    /// Input widget.
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Initial value (`"true"`/`""` for checkboxes, comma-separated for
    /// multi-selects).
    pub default: &'static str,
}

impl Field {
    /// Value shown when the element has not stored one yet.
    #[must_use]
    pub fn default_value(&self) -> ConfigValue {
        match self.kind {
            FieldKind::Checkbox => ConfigValue::Bool(self.default == "true"),
            FieldKind::MultiSelect { .. } => ConfigValue::List(
                self.default
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => ConfigValue::Text(self.default.to_string()),
        }
    }

    /// Coerce and validate an input for this field.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] if the value does not fit.
    pub fn coerce(&self, input: ConfigValue) -> CanvasResult<ConfigValue> {
        let invalid = |reason: String| CanvasError::InvalidConfig {
            key: self.key.to_string(),
            reason,
        };
        match (self.kind, input) {
            (FieldKind::Checkbox, ConfigValue::Bool(b)) => Ok(ConfigValue::Bool(b)),
            (FieldKind::Checkbox, ConfigValue::Text(s)) => match s.as_str() {
                "true" => Ok(ConfigValue::Bool(true)),
                "false" => Ok(ConfigValue::Bool(false)),
                _ => Err(invalid(format!("`{s}` is not a boolean"))),
            },
            (FieldKind::Select { options }, ConfigValue::Text(s)) => {
                if options.iter().any(|c| c.value == s) {
                    Ok(ConfigValue::Text(s))
                } else {
                    Err(invalid(format!("`{s}` is not an option")))
                }
            }
            (FieldKind::MultiSelect { .. }, ConfigValue::Text(s)) => {
                self.coerce(ConfigValue::List(vec![s]))
            }
            (FieldKind::MultiSelect { options }, ConfigValue::List(items)) => {
                let bad = items
                    .iter()
                    .find(|i| !options.iter().any(|c| c.value == i.as_str()));
                if let Some(bad) = bad {
                    return Err(invalid(format!("`{bad}` is not an option")));
                }
                Ok(ConfigValue::List(items))
            }
            // a cleared input is stored as typed
            (FieldKind::Number { .. }, ConfigValue::Text(s)) if s.trim().is_empty() => {
                Ok(ConfigValue::Text(s))
            }
            (FieldKind::Number { min, max }, ConfigValue::Text(s)) => {
                let n: i64 = s
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("`{s}` is not a whole number")))?;
                if (min..=max).contains(&n) {
                    Ok(ConfigValue::Text(s))
                } else {
                    Err(invalid(format!("{n} is outside {min}..={max}")))
                }
            }
            (FieldKind::Text { .. }, ConfigValue::Text(s)) => Ok(ConfigValue::Text(s)),
            (FieldKind::ColorSwatch { choices }, ConfigValue::Text(s)) => {
                if choices.iter().any(|c| *c == s) {
                    Ok(ConfigValue::Text(s))
                } else {
                    Err(invalid(format!("`{s}` is not a swatch color")))
                }
            }
            (FieldKind::Color, ConfigValue::Text(s)) => {
                if is_hex_color(&s) {
                    Ok(ConfigValue::Text(s))
                } else {
                    Err(invalid(format!("`{s}` is not a #rrggbb color")))
                }
            }
            (_, other) => Err(invalid(format!("unexpected value {other:?}"))),
        }
    }
}

/// A titled group of fields for one component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelSchema {
    /// Group heading.
    pub title: &'static str,
    /// Fields in display order.
    pub fields: &'static [Field],
}

impl PanelSchema {
    /// Look up a field by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Colors offered by the metric swatch, default first.
pub const SWATCH_COLORS: &[&str] = &[
    "#2563eb", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4",
];

/// Chart variants offered by the chart panel.
pub const CHART_TYPES: &[Choice] = &[
    Choice::plain("Line Chart"),
    Choice::plain("Bar Chart"),
    Choice::plain("Pie Chart"),
    Choice::plain("Area Chart"),
    Choice::plain("Table"),
    Choice::plain("KPI Card"),
    Choice::plain("Heatmap"),
    Choice::plain("Funnel Chart"),
];

const METRIC_TYPES: &[Choice] = &[
    Choice::plain("Revenue"),
    Choice::plain("Orders"),
    Choice::plain("AOV"),
    Choice::plain("Conversion Rate"),
    Choice::plain("Returning Customer Rate"),
    Choice::plain("CAC"),
    Choice::plain("ROAS"),
    Choice::plain("CTR"),
    Choice::plain("Profit"),
];

const FORMATS: &[Choice] = &[
    Choice::labeled("currency", "₹ Currency"),
    Choice::labeled("percentage", "% Percentage"),
    Choice::labeled("number", "Number"),
];

const CHART_METRICS: &[Choice] = &[
    Choice::plain("Revenue"),
    Choice::plain("Orders"),
    Choice::plain("AOV"),
    Choice::plain("Conversion Rate"),
    Choice::plain("Profit"),
];

const X_AXES: &[Choice] = &[
    Choice::plain("Date"),
    Choice::plain("Channel"),
    Choice::plain("Country"),
    Choice::plain("Product Category"),
];

const Y_AXES: &[Choice] = &[
    Choice::plain("Revenue"),
    Choice::plain("Orders"),
    Choice::plain("Conversion Rate"),
];

const DATE_RANGES: &[Choice] = &[
    Choice::plain("Last 7 days"),
    Choice::plain("Last 30 days"),
    Choice::plain("Last 90 days"),
    Choice::plain("Last year"),
];

const COLOR_THEMES: &[Choice] = &[
    Choice::plain("Default Blue"),
    Choice::plain("Green"),
    Choice::plain("Orange"),
    Choice::plain("Purple"),
    Choice::plain("Red"),
];

const FILTER_TYPES: &[Choice] = &[
    Choice::plain("Date Range"),
    Choice::plain("Channel"),
    Choice::plain("Country & Region"),
    Choice::plain("Device Type"),
    Choice::plain("Product Category"),
];

static METRIC_PANEL: PanelSchema = PanelSchema {
    title: "Metric Settings",
    fields: &[
        Field {
            key: "metricType",
            label: "Metric Type",
            kind: FieldKind::Select {
                options: METRIC_TYPES,
            },
            default: "Revenue",
        },
        Field {
            key: "format",
            label: "Format",
            kind: FieldKind::Select { options: FORMATS },
            default: "currency",
        },
        Field {
            key: "decimals",
            label: "Decimal Places",
            kind: FieldKind::Number { min: 0, max: 10 },
            default: "2",
        },
        Field {
            key: "showComparison",
            label: "Show Comparison (WoW, MoM)",
            kind: FieldKind::Checkbox,
            default: "",
        },
        Field {
            key: "color",
            label: "Color",
            kind: FieldKind::ColorSwatch {
                choices: SWATCH_COLORS,
            },
            default: "#2563eb",
        },
    ],
};

static CHART_PANEL: PanelSchema = PanelSchema {
    title: "Chart Settings",
    fields: &[
        Field {
            key: "chartType",
            label: "Chart Type",
            kind: FieldKind::Select {
                options: CHART_TYPES,
            },
            default: "Line Chart",
        },
        Field {
            key: "metrics",
            label: "Select Metrics",
            kind: FieldKind::MultiSelect {
                options: CHART_METRICS,
            },
            default: "",
        },
        Field {
            key: "xAxis",
            label: "X-Axis",
            kind: FieldKind::Select { options: X_AXES },
            default: "Date",
        },
        Field {
            key: "yAxis",
            label: "Y-Axis",
            kind: FieldKind::Select { options: Y_AXES },
            default: "Revenue",
        },
        Field {
            key: "dateRange",
            label: "Date Range",
            kind: FieldKind::Select {
                options: DATE_RANGES,
            },
            default: "Last 7 days",
        },
        Field {
            key: "showLegend",
            label: "Show Legend",
            kind: FieldKind::Checkbox,
            default: "true",
        },
        Field {
            key: "colorTheme",
            label: "Color Theme",
            kind: FieldKind::Select {
                options: COLOR_THEMES,
            },
            default: "Default Blue",
        },
    ],
};

static FILTER_PANEL: PanelSchema = PanelSchema {
    title: "Filter Settings",
    fields: &[
        Field {
            key: "filterType",
            label: "Filter Type",
            kind: FieldKind::Select {
                options: FILTER_TYPES,
            },
            default: "Date Range",
        },
        Field {
            key: "defaultValue",
            label: "Default Value",
            kind: FieldKind::Text {
                placeholder: "Enter default value",
            },
            default: "",
        },
        Field {
            key: "allowMultiSelect",
            label: "Allow Multi-Select",
            kind: FieldKind::Checkbox,
            default: "",
        },
        Field {
            key: "chainFilters",
            label: "Chain with Other Filters",
            kind: FieldKind::Checkbox,
            default: "",
        },
    ],
};

static LAYOUT_PANEL: PanelSchema = PanelSchema {
    title: "Layout Settings",
    fields: &[
        Field {
            key: "gridSpacing",
            label: "Grid Spacing",
            kind: FieldKind::Number { min: 0, max: 50 },
            default: "16",
        },
        Field {
            key: "backgroundColor",
            label: "Background Color",
            kind: FieldKind::Color,
            default: "#ffffff",
        },
        Field {
            key: "borderRadius",
            label: "Border Radius",
            kind: FieldKind::Number { min: 0, max: 20 },
            default: "8",
        },
        Field {
            key: "padding",
            label: "Padding",
            kind: FieldKind::Number { min: 0, max: 50 },
            default: "16",
        },
    ],
};

/// Form definition for a component type.
#[must_use]
pub fn schema_for(kind: ComponentType) -> &'static PanelSchema {
    match kind {
        ComponentType::Metric => &METRIC_PANEL,
        ComponentType::Chart => &CHART_PANEL,
        ComponentType::Filter => &FILTER_PANEL,
        ComponentType::Layout => &LAYOUT_PANEL,
    }
}

/// A field together with the value it currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    /// Field definition.
    pub field: &'static Field,
    /// Stored value, or the field default.
    pub value: ConfigValue,
}

/// Rendered panel state for the selected element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    /// Element being configured.
    pub target: ElementId,
    /// Group heading.
    pub title: &'static str,
    /// Fields with current values.
    pub fields: Vec<FieldView>,
}

/// A configuration panel bound to one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigPanel {
    target: ElementId,
    schema: &'static PanelSchema,
}

impl ConfigPanel {
    /// Open the panel for `element`.
    #[must_use]
    pub fn open(element: &Element) -> Self {
        Self {
            target: element.id,
            schema: schema_for(element.kind),
        }
    }

    /// Element this panel edits.
    #[must_use]
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// Form definition in use.
    #[must_use]
    pub fn schema(&self) -> &'static PanelSchema {
        self.schema
    }

    /// Current field values for `element`.
    #[must_use]
    pub fn view(&self, element: &Element) -> PanelView {
        let fields = self
            .schema
            .fields
            .iter()
            .map(|field| FieldView {
                field,
                value: element
                    .config_value(field.key)
                    .cloned()
                    .unwrap_or_else(|| field.default_value()),
            })
            .collect();
        PanelView {
            target: self.target,
            title: self.schema.title,
            fields,
        }
    }

    /// Validate an edit and write it onto `element`.
    ///
    /// Returns the value that was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if `element` is not this panel's target, the key is
    /// not one of this panel's fields, or the value is invalid.
    pub fn apply(
        &self,
        element: &mut Element,
        key: &str,
        input: ConfigValue,
    ) -> CanvasResult<ConfigValue> {
        if element.id != self.target {
            return Err(CanvasError::InvalidConfig {
                key: key.to_string(),
                reason: format!("panel is bound to {}, not {}", self.target, element.id),
            });
        }
        let field = self.schema.field(key).ok_or_else(|| CanvasError::InvalidConfig {
            key: key.to_string(),
            reason: format!("not a field of {}", self.schema.title),
        })?;
        let value = field.coerce(input)?;
        element.config.insert(field.key.to_string(), value.clone());
        Ok(value)
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}
