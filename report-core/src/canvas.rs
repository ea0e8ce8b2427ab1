//! The report canvas: placed elements in stacking order.

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult, Element, ElementId};

/// All elements on the canvas, back to front.
///
/// The canvas is the normalized model of the report; markup is derived from
/// it by [`crate::render`], and history snapshots clone it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    /// Elements in stacking order (last is frontmost).
    elements: Vec<Element>,
}

impl Canvas {
    /// Create an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a canvas from elements already in stacking order.
    #[must_use]
    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Add an element on top of the stack.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Remove an element from the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn remove_element(&mut self, id: ElementId) -> CanvasResult<Element> {
        let index = self.index_of(id)?;
        Ok(self.elements.remove(index))
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get_element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Whether an element with this id is on the canvas.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.get_element(id).is_some()
    }

    /// Elements back to front.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Elements back to front, as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    /// Highest element id on the canvas.
    #[must_use]
    pub fn max_id(&self) -> Option<ElementId> {
        self.elements.iter().map(|e| e.id).max()
    }

    /// Find the frontmost element at the given canvas coordinates.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.contains_point(x, y))
            .map(|e| e.id)
    }

    /// Move an element one step towards the front.
    ///
    /// Returns `false` if it is already frontmost.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn bring_forward(&mut self, id: ElementId) -> CanvasResult<bool> {
        let index = self.index_of(id)?;
        if index + 1 >= self.elements.len() {
            return Ok(false);
        }
        self.elements.swap(index, index + 1);
        Ok(true)
    }

    /// Move an element one step towards the back.
    ///
    /// Returns `false` if it is already backmost.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn send_backward(&mut self, id: ElementId) -> CanvasResult<bool> {
        let index = self.index_of(id)?;
        if index == 0 {
            return Ok(false);
        }
        self.elements.swap(index, index - 1);
        Ok(true)
    }

    /// Get the number of elements on the canvas.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the canvas is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize the canvas to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string(self).map_err(CanvasError::Serialization)
    }

    /// Deserialize a canvas from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        serde_json::from_str(json).map_err(CanvasError::Serialization)
    }

    fn index_of(&self, id: ElementId) -> CanvasResult<usize> {
        self.elements
            .iter()
            .position(|e| e.id == id)
            .ok_or(CanvasError::ElementNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentType, Geometry};

    fn element(id: u64, left: f32, top: f32) -> Element {
        Element::new(
            ElementId::new(id),
            ComponentType::Metric,
            "Revenue",
            Geometry {
                left,
                top,
                width: 200.0,
                height: 150.0,
            },
        )
    }

    #[test]
    fn test_canvas_add_remove() {
        let mut canvas = Canvas::new();
        assert!(canvas.is_empty());

        let id = canvas.add_element(element(1, 0.0, 0.0));
        assert_eq!(canvas.element_count(), 1);
        assert!(canvas.get_element(id).is_some());

        canvas.remove_element(id).expect("should remove");
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_remove_missing_element_fails() {
        let mut canvas = Canvas::new();
        let result = canvas.remove_element(ElementId::new(9));
        assert!(matches!(result, Err(CanvasError::ElementNotFound(id)) if id.value() == 9));
    }

    #[test]
    fn test_element_at_prefers_frontmost() {
        let mut canvas = Canvas::new();
        canvas.add_element(element(1, 0.0, 0.0));
        canvas.add_element(element(2, 100.0, 100.0));

        assert_eq!(canvas.element_at(150.0, 120.0), Some(ElementId::new(2)));
        assert_eq!(canvas.element_at(10.0, 10.0), Some(ElementId::new(1)));
        assert_eq!(canvas.element_at(500.0, 500.0), None);
    }

    #[test]
    fn test_reorder_bounds() {
        let mut canvas = Canvas::new();
        canvas.add_element(element(1, 0.0, 0.0));
        canvas.add_element(element(2, 0.0, 0.0));
        canvas.add_element(element(3, 0.0, 0.0));

        assert!(!canvas.bring_forward(ElementId::new(3)).expect("exists"));
        assert!(!canvas.send_backward(ElementId::new(1)).expect("exists"));

        assert!(canvas.bring_forward(ElementId::new(1)).expect("exists"));
        let order: Vec<u64> = canvas.elements().map(|e| e.id.value()).collect();
        assert_eq!(order, vec![2, 1, 3]);

        assert!(canvas.send_backward(ElementId::new(3)).expect("exists"));
        let order: Vec<u64> = canvas.elements().map(|e| e.id.value()).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let mut canvas = Canvas::new();
        canvas.add_element(element(4, 1.0, 2.0));
        canvas.add_element(element(2, 3.0, 4.0));
        let json = canvas.to_json().expect("serialize");
        let back = Canvas::from_json(&json).expect("deserialize");
        assert_eq!(back, canvas);
        assert_eq!(back.max_id(), Some(ElementId::new(4)));
    }
}
