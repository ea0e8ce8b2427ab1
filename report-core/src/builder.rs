//! The report builder controller.
//!
//! [`ReportBuilder`] owns the canvas, the selection, the open configuration
//! panel, the pointer interaction and the undo history. Every mutation goes
//! through it so that each committed change is followed by exactly one
//! history snapshot.

use crate::dialog::{Dialogs, Platform};
use crate::document::{ReportDocument, TemplateDocument};
use crate::event::{BuilderEvent, PointerTarget};
use crate::factory::{DragPayload, ElementFactory};
use crate::history::History;
use crate::interaction::{InteractionController, ResizeHandle, SizeLimits};
use crate::panel::{ConfigPanel, PanelView};
use crate::persistence::{self, ExportFormat, ShareOutcome};
use crate::render;
use crate::storage::KeyValueStorage;
use crate::{
    BuilderConfig, Canvas, CanvasError, CanvasResult, ComponentType, ConfigValue, Element,
    ElementId, PersistenceError,
};

/// Controller for one report under construction.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    config: BuilderConfig,
    canvas: Canvas,
    factory: ElementFactory,
    selected: Option<ElementId>,
    panel: Option<ConfigPanel>,
    interaction: InteractionController,
    editing_title: Option<ElementId>,
    history: History<Canvas>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl ReportBuilder {
    /// Create a builder with an empty canvas and one history entry.
    #[must_use]
    pub fn new(config: BuilderConfig) -> Self {
        let mut builder = Self {
            config,
            canvas: Canvas::new(),
            factory: ElementFactory::new(&config),
            selected: None,
            panel: None,
            interaction: InteractionController::new(SizeLimits {
                min_width: config.min_width,
                min_height: config.min_height,
            }),
            editing_title: None,
            history: History::new(config.history_limit),
        };
        builder.save_state();
        builder
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// The canvas model.
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Undo history.
    #[must_use]
    pub fn history(&self) -> &History<Canvas> {
        &self.history
    }

    /// Currently selected element.
    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// Current state of the configuration panel, if one is open.
    #[must_use]
    pub fn panel_view(&self) -> Option<PanelView> {
        let panel = self.panel?;
        let element = self.canvas.get_element(panel.target())?;
        Some(panel.view(element))
    }

    // -----------------------------------------------------------------------
    // Element factory
    // -----------------------------------------------------------------------

    /// Handle a palette drop carrying a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidPayload`] if the payload is malformed;
    /// the canvas is left untouched.
    pub fn drop_payload(&mut self, payload: &str, x: f32, y: f32) -> CanvasResult<ElementId> {
        let payload = DragPayload::parse(payload).inspect_err(|e| {
            tracing::warn!("Rejected drop: {e}");
        })?;
        self.drop_component(payload.kind, &payload.component, x, y)
    }

    /// Create a component at the drop position, select it and snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::IdsExhausted`] if no new id can be issued; the
    /// canvas is left untouched.
    pub fn drop_component(
        &mut self,
        kind: ComponentType,
        component: &str,
        x: f32,
        y: f32,
    ) -> CanvasResult<ElementId> {
        let element = self.factory.create(kind, component, x, y)?;
        let id = self.canvas.add_element(element);
        tracing::debug!(%id, %kind, component, "Element created");
        self.select_unchecked(id);
        self.save_state();
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Select an element and open its configuration panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not on the canvas.
    pub fn select(&mut self, id: ElementId) -> CanvasResult<()> {
        if !self.canvas.contains(id) {
            return Err(CanvasError::ElementNotFound(id));
        }
        self.select_unchecked(id);
        Ok(())
    }

    /// Clear the selection and close the panel.
    pub fn deselect(&mut self) {
        if let Some(id) = self.selected.take() {
            tracing::debug!(%id, "Deselected");
        }
        self.panel = None;
    }

    /// Handle a click on the canvas: select the frontmost element under the
    /// point, or deselect when the click hits empty canvas.
    pub fn click(&mut self, x: f32, y: f32) -> Option<ElementId> {
        match self.canvas.element_at(x, y) {
            Some(id) => {
                self.select_unchecked(id);
                Some(id)
            }
            None => {
                self.deselect();
                None
            }
        }
    }

    fn select_unchecked(&mut self, id: ElementId) {
        if self.selected != Some(id) {
            tracing::debug!(%id, previous = ?self.selected, "Selected");
        }
        self.selected = Some(id);
        self.panel = self.canvas.get_element(id).map(ConfigPanel::open);
    }

    // -----------------------------------------------------------------------
    // Move / resize
    // -----------------------------------------------------------------------

    /// Pointer pressed on an element header.
    ///
    /// Returns `false` without starting a drag while that element's title
    /// is being edited.
    ///
    /// # Errors
    ///
    /// Returns an error if another interaction is active or the element is
    /// not on the canvas.
    pub fn begin_drag(&mut self, id: ElementId, x: f32, y: f32) -> CanvasResult<bool> {
        if self.editing_title == Some(id) {
            return Ok(false);
        }
        self.interaction.begin_drag(&self.canvas, id, x, y)?;
        self.select_unchecked(id);
        Ok(true)
    }

    /// Pointer pressed on a resize handle.
    ///
    /// # Errors
    ///
    /// Returns an error if another interaction is active or the element is
    /// not on the canvas.
    pub fn begin_resize(&mut self, id: ElementId, handle: ResizeHandle, x: f32, y: f32) -> CanvasResult<()> {
        self.interaction.begin_resize(&self.canvas, id, handle, x, y)
    }

    /// Pointer moved; updates the active drag or resize.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.interaction.pointer_move(&mut self.canvas, x, y);
    }

    /// Pointer released; commits the active interaction with a snapshot.
    ///
    /// Returns the element that was committed.
    pub fn pointer_up(&mut self) -> Option<ElementId> {
        let id = self.interaction.pointer_up(&self.canvas)?;
        self.save_state();
        Some(id)
    }

    // -----------------------------------------------------------------------
    // Header actions
    // -----------------------------------------------------------------------

    /// Mark an element's title as being edited (suppresses header drags).
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not on the canvas.
    pub fn begin_title_edit(&mut self, id: ElementId) -> CanvasResult<()> {
        if !self.canvas.contains(id) {
            return Err(CanvasError::ElementNotFound(id));
        }
        self.editing_title = Some(id);
        Ok(())
    }

    /// Store an edited title and snapshot if it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not on the canvas or a drag or
    /// resize is in progress.
    pub fn commit_title(&mut self, id: ElementId, title: &str) -> CanvasResult<()> {
        self.ensure_no_interaction()?;
        if self.editing_title == Some(id) {
            self.editing_title = None;
        }
        let element = self
            .canvas
            .get_element_mut(id)
            .ok_or(CanvasError::ElementNotFound(id))?;
        if element.title != title {
            element.title = title.to_string();
            self.save_state();
        }
        Ok(())
    }

    /// Move an element one step towards the front.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not on the canvas.
    pub fn bring_forward(&mut self, id: ElementId) -> CanvasResult<bool> {
        let moved = self.canvas.bring_forward(id)?;
        if moved {
            self.save_state();
        }
        Ok(moved)
    }

    /// Move an element one step towards the back.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not on the canvas.
    pub fn send_backward(&mut self, id: ElementId) -> CanvasResult<bool> {
        let moved = self.canvas.send_backward(id)?;
        if moved {
            self.save_state();
        }
        Ok(moved)
    }

    /// Delete an element, clearing the selection if it was selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not on the canvas.
    pub fn delete_element(&mut self, id: ElementId) -> CanvasResult<Element> {
        let removed = self.canvas.remove_element(id)?;
        if self.selected == Some(id) {
            self.deselect();
        }
        if self.editing_title == Some(id) {
            self.editing_title = None;
        }
        tracing::debug!(%id, remaining = self.canvas.element_count(), "Element deleted");
        self.save_state();
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Configuration panel
    // -----------------------------------------------------------------------

    /// Apply an edit from the open configuration panel and snapshot.
    ///
    /// Returns the value that was stored.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoPanelOpen`] when nothing is selected,
    /// [`CanvasError::InteractionInProgress`] during a drag or resize, or an
    /// error if the key is not a field of the open panel or the value is
    /// invalid.
    pub fn edit_config(&mut self, key: &str, value: ConfigValue) -> CanvasResult<ConfigValue> {
        self.ensure_no_interaction()?;
        let panel = self.panel.ok_or(CanvasError::NoPanelOpen)?;
        let id = panel.target();
        let element = self
            .canvas
            .get_element_mut(id)
            .ok_or(CanvasError::ElementNotFound(id))?;
        let stored = panel.apply(element, key, value).inspect_err(|e| {
            tracing::warn!(%id, "Rejected config edit: {e}");
        })?;
        tracing::debug!(%id, key, value = ?stored, "Config updated");
        self.save_state();
        Ok(stored)
    }

    /// Edits that snapshot must not interleave with an uncommitted move.
    fn ensure_no_interaction(&self) -> CanvasResult<()> {
        match self.interaction.state().target() {
            Some(id) => Err(CanvasError::InteractionInProgress(id)),
            None => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Snapshot the canvas into history.
    pub fn save_state(&mut self) {
        self.history.save_state(self.canvas.clone());
    }

    /// Restore the previous snapshot. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Restore the next snapshot. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    fn restore(&mut self, snapshot: Canvas) {
        self.interaction.cancel();
        self.canvas = snapshot;
        if let Some(max) = self.canvas.max_id() {
            self.factory.observe(max);
        }
        if self.editing_title.is_some_and(|id| !self.canvas.contains(id)) {
            self.editing_title = None;
        }
        match self.selected {
            Some(id) if self.canvas.contains(id) => self.select_unchecked(id),
            Some(_) => self.deselect(),
            None => {}
        }
        tracing::debug!(
            index = ?self.history.index(),
            elements = self.canvas.element_count(),
            "Restored snapshot"
        );
    }

    // -----------------------------------------------------------------------
    // Reports, templates, export
    // -----------------------------------------------------------------------

    /// Start over after the user confirms. Returns whether it happened.
    pub fn new_report(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        if !dialogs.confirm("Create a new report? All unsaved changes will be lost.") {
            return false;
        }
        self.replace_canvas(Canvas::new(), true);
        tracing::info!("Started a new report");
        true
    }

    /// Save the canvas as the report.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails.
    pub fn save_report(
        &self,
        storage: &mut dyn KeyValueStorage,
        dialogs: &mut dyn Dialogs,
    ) -> Result<ReportDocument, PersistenceError> {
        let document = persistence::save_report(storage, &self.canvas)?;
        dialogs.alert("Report saved successfully!");
        Ok(document)
    }

    /// Replace the canvas with the saved report and snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is saved or the save is unreadable.
    pub fn load_report(&mut self, storage: &dyn KeyValueStorage) -> Result<(), PersistenceError> {
        let canvas = persistence::load_report(storage)?
            .into_canvas()
            .map_err(PersistenceError::InvalidElement)?;
        tracing::info!(elements = canvas.element_count(), "Report loaded");
        self.replace_canvas(canvas, false);
        Ok(())
    }

    /// Prompt for a name and save the layout as a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template list cannot be updated.
    pub fn save_as_template(
        &self,
        storage: &mut dyn KeyValueStorage,
        dialogs: &mut dyn Dialogs,
    ) -> Result<Option<TemplateDocument>, PersistenceError> {
        persistence::save_as_template(storage, dialogs, &self.canvas)
    }

    /// Saved templates, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the template list is unreadable.
    pub fn templates(
        &self,
        storage: &dyn KeyValueStorage,
    ) -> Result<Vec<TemplateDocument>, PersistenceError> {
        persistence::load_templates(storage)
    }

    /// Rebuild the canvas from a saved template with fresh ids and default
    /// configuration, then snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if no template has that name or no new ids are left.
    pub fn apply_template(
        &mut self,
        storage: &dyn KeyValueStorage,
        name: &str,
    ) -> Result<usize, PersistenceError> {
        let template = persistence::find_template(storage, name)?;
        let mut canvas = Canvas::new();
        for item in &template.elements {
            let mut element = self
                .factory
                .create(item.kind, &item.component, item.left, item.top)?;
            element.geometry = item.geometry();
            canvas.add_element(element);
        }
        let count = canvas.element_count();
        tracing::info!(name, elements = count, "Template applied");
        self.replace_canvas(canvas, false);
        Ok(count)
    }

    /// Run the export prompt.
    pub fn export_report(&self, dialogs: &mut dyn Dialogs) -> Option<ExportFormat> {
        persistence::export_report(dialogs)
    }

    /// Share the report link.
    pub fn share_report(&self, platform: &mut dyn Platform, dialogs: &mut dyn Dialogs) -> ShareOutcome {
        persistence::share_report(platform, dialogs)
    }

    fn replace_canvas(&mut self, canvas: Canvas, reset_history: bool) {
        self.interaction.cancel();
        self.deselect();
        self.editing_title = None;
        self.canvas = canvas;
        if let Some(max) = self.canvas.max_id() {
            self.factory.observe(max);
        }
        if reset_history {
            self.history.reset();
        }
        self.save_state();
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Editable canvas markup.
    #[must_use]
    pub fn render(&self) -> String {
        render::render_canvas(&self.canvas, self.selected)
    }

    /// Read-only preview markup.
    #[must_use]
    pub fn preview(&self) -> String {
        render::render_preview(&self.canvas)
    }

    // -----------------------------------------------------------------------
    // Event dispatch
    // -----------------------------------------------------------------------

    /// Apply one input event.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying operation; the builder state is
    /// unchanged when an event is rejected.
    pub fn apply_event(&mut self, event: BuilderEvent) -> CanvasResult<()> {
        match event {
            BuilderEvent::Drop { payload, x, y } => {
                self.drop_payload(&payload, x, y)?;
            }
            BuilderEvent::Click { x, y } => {
                self.click(x, y);
            }
            BuilderEvent::Select { element } => self.select(element)?,
            BuilderEvent::PointerDown { target, x, y } => match target {
                PointerTarget::Header { element } => {
                    self.begin_drag(element, x, y)?;
                }
                PointerTarget::Handle { element, handle } => {
                    self.begin_resize(element, handle, x, y)?;
                }
            },
            BuilderEvent::PointerMove { x, y } => self.pointer_move(x, y),
            BuilderEvent::PointerUp => {
                self.pointer_up();
            }
            BuilderEvent::BeginTitleEdit { element } => self.begin_title_edit(element)?,
            BuilderEvent::CommitTitle { element, title } => self.commit_title(element, &title)?,
            BuilderEvent::BringForward { element } => {
                self.bring_forward(element)?;
            }
            BuilderEvent::SendBackward { element } => {
                self.send_backward(element)?;
            }
            BuilderEvent::Delete { element } => {
                self.delete_element(element)?;
            }
            BuilderEvent::EditConfig { key, value } => {
                self.edit_config(&key, value)?;
            }
            BuilderEvent::PickSwatch { color } => {
                self.edit_config("color", ConfigValue::Text(color))?;
            }
            BuilderEvent::Undo => {
                self.undo();
            }
            BuilderEvent::Redo => {
                self.redo();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::ScriptedDialogs;
    use crate::render::EMPTY_STATE_HTML;
    use crate::storage::MemoryStorage;

    fn builder() -> ReportBuilder {
        ReportBuilder::default()
    }

    #[test]
    fn new_builder_has_one_snapshot() {
        let b = builder();
        assert_eq!(b.history().len(), 1);
        assert_eq!(b.history().index(), Some(0));
        assert_eq!(b.render(), EMPTY_STATE_HTML);
    }

    #[test]
    fn drop_creates_selects_and_snapshots() {
        let mut b = builder();
        let id = b
            .drop_payload(r#"{"type":"metric","component":"Revenue"}"#, 40.0, 50.0)
            .expect("valid drop");
        assert_eq!(b.selected(), Some(id));
        assert_eq!(b.history().len(), 2);
        let view = b.panel_view().expect("panel open");
        assert_eq!(view.target, id);
        assert_eq!(view.title, "Metric Settings");
    }

    #[test]
    fn malformed_drop_changes_nothing() {
        let mut b = builder();
        assert!(b.drop_payload("{", 0.0, 0.0).is_err());
        assert!(b.canvas().is_empty());
        assert_eq!(b.history().len(), 1);
    }

    #[test]
    fn clicking_empty_canvas_deselects() {
        let mut b = builder();
        let id = b.drop_component(ComponentType::Chart, "Line Chart", 0.0, 0.0).expect("drop");
        assert_eq!(b.click(10.0, 10.0), Some(id));
        assert_eq!(b.click(900.0, 900.0), None);
        assert_eq!(b.selected(), None);
        assert!(b.panel_view().is_none());
    }

    #[test]
    fn selecting_switches_panel() {
        let mut b = builder();
        let metric = b.drop_component(ComponentType::Metric, "Revenue", 0.0, 0.0).expect("drop");
        let filter = b.drop_component(ComponentType::Filter, "Channel", 400.0, 0.0).expect("drop");
        assert_eq!(b.selected(), Some(filter));
        b.select(metric).expect("select");
        assert_eq!(b.panel_view().map(|v| v.title), Some("Metric Settings"));
        assert!(b.select(ElementId::new(99)).is_err());
        assert_eq!(b.selected(), Some(metric));
    }

    #[test]
    fn config_edit_requires_panel() {
        let mut b = builder();
        let err = b.edit_config("decimals", "2".into()).expect_err("no selection");
        assert!(matches!(err, CanvasError::NoPanelOpen));
    }

    #[test]
    fn config_edits_snapshot_and_undo() {
        let mut b = builder();
        let id = b.drop_component(ComponentType::Chart, "Pie Chart", 0.0, 0.0).expect("drop");
        b.edit_config("showLegend", ConfigValue::Bool(false)).expect("edit");
        assert_eq!(b.history().len(), 3);
        assert!(b.undo());
        let element = b.canvas().get_element(id).expect("still there");
        assert!(element.config.is_empty());
        // the restored element is still selected and the panel reflects it
        assert_eq!(b.selected(), Some(id));
        let view = b.panel_view().expect("panel");
        let legend = view
            .fields
            .iter()
            .find(|f| f.field.key == "showLegend")
            .expect("legend field");
        assert_eq!(legend.value, ConfigValue::Bool(true));
    }

    #[test]
    fn swatch_pick_stores_color() {
        let mut b = builder();
        let id = b.drop_component(ComponentType::Metric, "Revenue", 0.0, 0.0).expect("drop");
        b.apply_event(BuilderEvent::PickSwatch {
            color: "#10b981".into(),
        })
        .expect("swatch color");
        let element = b.canvas().get_element(id).expect("element");
        assert_eq!(element.config_value("color"), Some(&ConfigValue::from("#10b981")));
        assert!(b.render().contains("data-color=\"#10b981\""));
    }

    #[test]
    fn rejected_config_edit_does_not_snapshot() {
        let mut b = builder();
        b.drop_component(ComponentType::Layout, "Divider", 0.0, 0.0).expect("drop");
        assert!(b.edit_config("padding", "500".into()).is_err());
        assert_eq!(b.history().len(), 2);
    }

    #[test]
    fn drag_commits_on_release() {
        let mut b = builder();
        let id = b.drop_component(ComponentType::Metric, "Orders", 100.0, 100.0).expect("drop");
        assert!(b.begin_drag(id, 110.0, 105.0).expect("begin"));
        b.pointer_move(160.0, 125.0);
        assert_eq!(b.history().len(), 2, "moves do not snapshot");
        assert_eq!(b.pointer_up(), Some(id));
        assert_eq!(b.history().len(), 3);
        let g = b.canvas().get_element(id).expect("element").geometry;
        assert!((g.left - 150.0).abs() < f32::EPSILON);
        assert!((g.top - 120.0).abs() < f32::EPSILON);
    }

    #[test]
    fn drag_is_suppressed_while_editing_title() {
        let mut b = builder();
        let id = b.drop_component(ComponentType::Metric, "Orders", 0.0, 0.0).expect("drop");
        b.begin_title_edit(id).expect("edit");
        assert!(!b.begin_drag(id, 0.0, 0.0).expect("no error"));
        assert_eq!(b.pointer_up(), None);
        b.commit_title(id, "Weekly orders").expect("commit");
        assert_eq!(b.canvas().get_element(id).map(|e| e.title.as_str()), Some("Weekly orders"));
        assert!(b.begin_drag(id, 0.0, 0.0).expect("drag allowed again"));
    }

    #[test]
    fn unchanged_title_does_not_snapshot() {
        let mut b = builder();
        let id = b.drop_component(ComponentType::Metric, "Orders", 0.0, 0.0).expect("drop");
        b.commit_title(id, "Orders").expect("commit");
        assert_eq!(b.history().len(), 2);
    }

    #[test]
    fn reorder_snapshots_only_when_moved() {
        let mut b = builder();
        let first = b.drop_component(ComponentType::Metric, "A", 0.0, 0.0).expect("drop");
        let second = b.drop_component(ComponentType::Metric, "B", 0.0, 0.0).expect("drop");
        assert!(!b.bring_forward(second).expect("exists"));
        assert_eq!(b.history().len(), 3);
        assert!(b.bring_forward(first).expect("exists"));
        assert_eq!(b.history().len(), 4);
        let order: Vec<_> = b.canvas().elements().map(|e| e.id).collect();
        assert_eq!(order, vec![second, first]);
    }

    #[test]
    fn deleting_last_element_restores_empty_state() {
        let mut b = builder();
        let id = b.drop_component(ComponentType::Filter, "Channel", 0.0, 0.0).expect("drop");
        b.delete_element(id).expect("delete");
        assert_eq!(b.selected(), None);
        assert!(b.panel_view().is_none());
        assert_eq!(b.render(), EMPTY_STATE_HTML);
    }

    #[test]
    fn undo_past_creation_clears_selection() {
        let mut b = builder();
        b.drop_component(ComponentType::Metric, "Revenue", 0.0, 0.0).expect("drop");
        assert!(b.undo());
        assert!(b.canvas().is_empty());
        assert_eq!(b.selected(), None);
        assert!(!b.undo());
    }

    #[test]
    fn edits_are_refused_mid_interaction() {
        let mut b = builder();
        let id = b.drop_component(ComponentType::Metric, "Orders", 0.0, 0.0).expect("drop");
        b.begin_drag(id, 0.0, 0.0).expect("begin");
        b.pointer_move(40.0, 40.0);
        let err = b.edit_config("decimals", "3".into()).expect_err("mid-drag edit");
        assert!(matches!(err, CanvasError::InteractionInProgress(target) if target == id));
        assert!(b.commit_title(id, "Renamed").is_err());
        assert_eq!(b.history().len(), 2);

        assert_eq!(b.pointer_up(), Some(id));
        assert_eq!(b.history().len(), 3);
        b.edit_config("decimals", "3".into()).expect("edit after release");
        b.commit_title(id, "Renamed").expect("title after release");
        assert_eq!(b.history().len(), 5);
    }

    #[test]
    fn exhausted_ids_reject_drops_without_panicking() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                crate::document::REPORT_KEY,
                r#"{"elements":[{"id":"element-18446744073709551615","type":"metric","component":"Revenue","left":0,"top":0,"width":300,"height":200}],"timestamp":0}"#,
            )
            .expect("seed");
        let mut b = builder();
        b.load_report(&storage).expect("load");
        let history_len = b.history().len();

        let err = b
            .drop_component(ComponentType::Metric, "X", 0.0, 0.0)
            .expect_err("no ids left");
        assert!(matches!(err, CanvasError::IdsExhausted(_)));
        assert!(b
            .drop_payload(r#"{"type":"chart","component":"Table"}"#, 0.0, 0.0)
            .is_err());
        assert_eq!(b.canvas().element_count(), 1);
        assert_eq!(b.history().len(), history_len);
    }

    #[test]
    fn duplicate_ids_in_saved_report_are_rejected() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                crate::document::REPORT_KEY,
                r#"{"elements":[
                    {"id":"element-1","type":"metric","component":"Revenue","left":0,"top":0,"width":300,"height":200},
                    {"id":"element-1","type":"filter","component":"Channel","left":320,"top":0,"width":300,"height":200}
                ],"timestamp":0}"#,
            )
            .expect("seed");
        let mut b = builder();
        b.drop_component(ComponentType::Chart, "Table", 0.0, 0.0).expect("drop");
        let err = b.load_report(&storage).expect_err("duplicate ids");
        assert!(matches!(err, PersistenceError::InvalidElement(_)));
        assert_eq!(b.canvas().element_count(), 1);
        assert_eq!(b.canvas().elements().next().map(|e| e.kind), Some(ComponentType::Chart));
    }

    #[test]
    fn ids_keep_increasing_after_undo() {
        let mut b = builder();
        let first = b.drop_component(ComponentType::Metric, "Revenue", 0.0, 0.0).expect("drop");
        b.undo();
        let second = b.drop_component(ComponentType::Metric, "Revenue", 0.0, 0.0).expect("drop");
        assert!(second > first);
    }

    #[test]
    fn new_report_requires_confirmation() {
        let mut b = builder();
        b.drop_component(ComponentType::Metric, "Revenue", 0.0, 0.0).expect("drop");
        let mut declined = ScriptedDialogs::new().with_confirm(false);
        assert!(!b.new_report(&mut declined));
        assert_eq!(b.canvas().element_count(), 1);

        let mut accepted = ScriptedDialogs::new().with_confirm(true);
        assert!(b.new_report(&mut accepted));
        assert!(b.canvas().is_empty());
        assert_eq!(b.history().len(), 1);
        assert_eq!(b.selected(), None);
    }

    #[test]
    fn save_and_load_report_roundtrip() {
        let mut storage = MemoryStorage::new();
        let mut dialogs = ScriptedDialogs::new();
        let mut b = builder();
        let id = b.drop_component(ComponentType::Metric, "Revenue", 5.0, 6.0).expect("drop");
        b.edit_config("format", "percentage".into()).expect("edit");
        b.save_report(&mut storage, &mut dialogs).expect("save");
        assert_eq!(dialogs.alerts, vec!["Report saved successfully!".to_string()]);

        let mut other = builder();
        other.load_report(&storage).expect("load");
        let loaded = other.canvas().get_element(id).expect("same id");
        assert_eq!(loaded.config_value("format"), Some(&ConfigValue::from("percentage")));
        let next = other.drop_component(ComponentType::Chart, "Table", 0.0, 0.0).expect("drop");
        assert!(next > id);
    }

    #[test]
    fn template_roundtrip_uses_fresh_ids_and_no_config() {
        let mut storage = MemoryStorage::new();
        let mut b = builder();
        b.drop_component(ComponentType::Metric, "Revenue", 5.0, 6.0).expect("drop");
        b.edit_config("decimals", "4".into()).expect("edit");
        let mut dialogs = ScriptedDialogs::new().with_prompt(Some("Sales"));
        b.save_as_template(&mut storage, &mut dialogs)
            .expect("save")
            .expect("named");

        let count = b.apply_template(&storage, "Sales").expect("apply");
        assert_eq!(count, 1);
        let element = b.canvas().elements().next().expect("one element");
        assert_eq!(element.id.value(), 2);
        assert!(element.config.is_empty());
        assert!((element.geometry.left - 5.0).abs() < f32::EPSILON);
        assert!(b.apply_template(&storage, "Missing").is_err());
    }

    #[test]
    fn events_dispatch_to_operations() {
        let mut b = builder();
        let events = vec![
            BuilderEvent::Drop {
                payload: r#"{"type":"chart","component":"Bar Chart"}"#.into(),
                x: 0.0,
                y: 0.0,
            },
            BuilderEvent::PointerDown {
                target: PointerTarget::Handle {
                    element: ElementId::new(1),
                    handle: ResizeHandle::Se,
                },
                x: 300.0,
                y: 200.0,
            },
            BuilderEvent::PointerMove { x: 350.0, y: 260.0 },
            BuilderEvent::PointerUp,
            BuilderEvent::EditConfig {
                key: "chartType".into(),
                value: "Heatmap".into(),
            },
        ];
        for event in events {
            b.apply_event(event).expect("event applies");
        }
        let element = b.canvas().get_element(ElementId::new(1)).expect("element");
        assert!((element.geometry.width - 350.0).abs() < f32::EPSILON);
        assert!((element.geometry.height - 260.0).abs() < f32::EPSILON);
        assert_eq!(b.history().len(), 4);
        b.apply_event(BuilderEvent::Undo).expect("undo");
        assert!(b
            .apply_event(BuilderEvent::PickSwatch {
                color: "#000000".into()
            })
            .is_err());
        b.apply_event(BuilderEvent::Redo).expect("redo");
        assert_eq!(b.history().index(), Some(3));
    }
}
