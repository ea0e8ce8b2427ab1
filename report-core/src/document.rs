//! Serialized report and template documents.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Canvas, ComponentType, ConfigBag, Element, ElementId, Geometry};

/// Storage key of the saved report.
pub const REPORT_KEY: &str = "savedReport";

/// Storage key of the template list.
pub const TEMPLATES_KEY: &str = "templates";

/// One element of a saved report, including its configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportElement {
    /// Element identifier (`element-N`).
    pub id: String,
    /// Component type.
    #[serde(rename = "type")]
    pub kind: ComponentType,
    /// Component display name.
    pub component: String,
    /// Header title; older saves may omit it.
    #[serde(default)]
    pub title: Option<String>,
    /// Left offset in pixels.
    pub left: f32,
    /// Top offset in pixels.
    pub top: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Configuration bag.
    #[serde(default)]
    pub data: ConfigBag,
}

impl From<&Element> for ReportElement {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id.to_string(),
            kind: element.kind,
            component: element.component.clone(),
            title: Some(element.title.clone()),
            left: element.geometry.left,
            top: element.geometry.top,
            width: element.geometry.width,
            height: element.geometry.height,
            data: element.config.clone(),
        }
    }
}

impl ReportElement {
    /// Convert document to runtime element.
    ///
    /// # Errors
    ///
    /// Returns error string if the id is not of the form `element-N`.
    pub fn into_element(self) -> Result<Element, String> {
        let id = ElementId::parse(&self.id).ok_or_else(|| format!("bad element id `{}`", self.id))?;
        let geometry = Geometry {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
        };
        let mut element = Element::new(id, self.kind, self.component, geometry);
        if let Some(title) = self.title {
            element.title = title;
        }
        element.config = self.data;
        Ok(element)
    }
}

/// A saved report: every element with its configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Elements in stacking order.
    pub elements: Vec<ReportElement>,
    /// Save time in milliseconds since epoch.
    pub timestamp: u64,
}

impl ReportDocument {
    /// Build a document from the canvas.
    #[must_use]
    pub fn from_canvas(canvas: &Canvas, timestamp: u64) -> Self {
        Self {
            elements: canvas.elements().map(ReportElement::from).collect(),
            timestamp,
        }
    }

    /// Rebuild the canvas this document describes.
    ///
    /// # Errors
    ///
    /// Returns error string if any element cannot be materialized or two
    /// elements share an id.
    pub fn into_canvas(self) -> Result<Canvas, String> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        let mut elements = Vec::with_capacity(self.elements.len());
        for stored in self.elements {
            let element = stored.into_element()?;
            if !seen.insert(element.id) {
                return Err(format!("duplicate element id `{}`", element.id));
            }
            elements.push(element);
        }
        Ok(Canvas::from_elements(elements))
    }
}

/// One element of a template: layout only, no configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateElement {
    /// Component type.
    #[serde(rename = "type")]
    pub kind: ComponentType,
    /// Component display name.
    pub component: String,
    /// Left offset in pixels.
    pub left: f32,
    /// Top offset in pixels.
    pub top: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl From<&Element> for TemplateElement {
    fn from(element: &Element) -> Self {
        Self {
            kind: element.kind,
            component: element.component.clone(),
            left: element.geometry.left,
            top: element.geometry.top,
            width: element.geometry.width,
            height: element.geometry.height,
        }
    }
}

impl TemplateElement {
    /// Geometry described by this template element.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        Geometry {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
        }
    }
}

/// A named, reusable report layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    /// Name chosen by the user.
    pub name: String,
    /// Elements in stacking order.
    pub elements: Vec<TemplateElement>,
    /// Save time in milliseconds since epoch.
    pub timestamp: u64,
}

impl TemplateDocument {
    /// Build a template from the canvas.
    #[must_use]
    pub fn from_canvas(name: impl Into<String>, canvas: &Canvas, timestamp: u64) -> Self {
        Self {
            name: name.into(),
            elements: canvas.elements().map(TemplateElement::from).collect(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigValue;

    fn sample_canvas() -> Canvas {
        let mut el = Element::new(
            ElementId::new(3),
            ComponentType::Metric,
            "Revenue",
            Geometry {
                left: 40.0,
                top: 60.0,
                width: 320.0,
                height: 180.0,
            },
        );
        el.title = "Net revenue".into();
        el.config.insert("format".into(), ConfigValue::from("currency"));
        Canvas::from_elements(vec![el])
    }

    #[test]
    fn report_document_wire_format() {
        let doc = ReportDocument::from_canvas(&sample_canvas(), 1_700_000_000_000);
        let json: serde_json::Value = serde_json::to_value(&doc).expect("serialize");
        let first = &json["elements"][0];
        assert_eq!(first["id"], "element-3");
        assert_eq!(first["type"], "metric");
        assert_eq!(first["component"], "Revenue");
        assert_eq!(first["left"], 40.0);
        assert_eq!(first["data"]["format"], "currency");
        assert_eq!(json["timestamp"], 1_700_000_000_000_u64);
    }

    #[test]
    fn report_document_rebuilds_canvas() {
        let canvas = sample_canvas();
        let doc = ReportDocument::from_canvas(&canvas, 0);
        assert_eq!(doc.into_canvas().expect("valid"), canvas);
    }

    #[test]
    fn report_element_without_title_uses_component() {
        let json = r#"{"id":"element-9","type":"filter","component":"Channel","left":0,"top":0,"width":200,"height":150}"#;
        let el: ReportElement = serde_json::from_str(json).expect("parse");
        let element = el.into_element().expect("valid");
        assert_eq!(element.title, "Channel");
        assert!(element.config.is_empty());
    }

    #[test]
    fn report_element_rejects_bad_id() {
        let json = r#"{"id":"widget","type":"filter","component":"Channel","left":0,"top":0,"width":200,"height":150}"#;
        let el: ReportElement = serde_json::from_str(json).expect("parse");
        assert!(el.into_element().is_err());
    }

    #[test]
    fn report_document_rejects_duplicate_ids() {
        let json = r#"{"elements":[
            {"id":"element-1","type":"metric","component":"Revenue","left":0,"top":0,"width":300,"height":200},
            {"id":"element-1","type":"chart","component":"Table","left":320,"top":0,"width":300,"height":200}
        ],"timestamp":0}"#;
        let doc: ReportDocument = serde_json::from_str(json).expect("parse");
        let err = doc.into_canvas().expect_err("duplicate ids");
        assert!(err.contains("element-1"));
    }

    #[test]
    fn template_drops_configuration() {
        let doc = TemplateDocument::from_canvas("Weekly", &sample_canvas(), 5);
        let json = serde_json::to_value(&doc).expect("serialize");
        assert_eq!(json["name"], "Weekly");
        assert!(json["elements"][0].get("data").is_none());
        assert!(json["elements"][0].get("id").is_none());
        assert_eq!(json["elements"][0]["width"], 320.0);
    }
}
