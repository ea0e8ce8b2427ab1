//! WebAssembly bindings for report-core.
//!
//! Exposes [`ReportBuilder`] to JavaScript, backed by `localStorage` and the
//! browser's `confirm`/`prompt`/`alert` dialogs.

use wasm_bindgen::prelude::*;

use crate::dialog::{Dialogs, Platform, ShareRequest};
use crate::storage::KeyValueStorage;
use crate::{BuilderConfig, BuilderEvent, ReportBuilder, StorageError};

/// Initialize the report builder WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// `window.localStorage` as key/value storage.
struct LocalStorage(web_sys::Storage);

impl LocalStorage {
    fn open() -> Result<Self, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?
            .local_storage()
            .ok()
            .flatten()
            .map(Self)
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

fn js_reason(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(js_reason(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0
            .set_item(key, value)
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                reason: js_reason(&e),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.0
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(js_reason(&e)))
    }
}

/// Browser dialogs and navigator share/clipboard.
struct Browser {
    window: Option<web_sys::Window>,
}

impl Browser {
    fn new() -> Self {
        Self {
            window: web_sys::window(),
        }
    }

    fn navigator_method(&self, path: &[&str]) -> Option<(JsValue, js_sys::Function)> {
        let (method, objects) = path.split_last()?;
        let mut target: JsValue = self.window.as_ref()?.navigator().into();
        for name in objects {
            target = js_sys::Reflect::get(&target, &JsValue::from_str(name)).ok()?;
        }
        let function = js_sys::Reflect::get(&target, &JsValue::from_str(method))
            .ok()?
            .dyn_into::<js_sys::Function>()
            .ok()?;
        Some((target, function))
    }
}

impl Dialogs for Browser {
    fn confirm(&mut self, message: &str) -> bool {
        self.window
            .as_ref()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn prompt(&mut self, message: &str, default: Option<&str>) -> Option<String> {
        let window = self.window.as_ref()?;
        window
            .prompt_with_message_and_default(message, default.unwrap_or(""))
            .ok()
            .flatten()
    }

    fn alert(&mut self, message: &str) {
        if let Some(window) = &self.window {
            let _ = window.alert_with_message(message);
        }
    }
}

impl Platform for Browser {
    fn current_url(&self) -> String {
        self.window
            .as_ref()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default()
    }

    fn can_share(&self) -> bool {
        self.navigator_method(&["share"]).is_some()
    }

    fn share(&mut self, request: &ShareRequest) {
        let Some((navigator, share)) = self.navigator_method(&["share"]) else {
            return;
        };
        let data = js_sys::Object::new();
        for (key, value) in [
            ("title", &request.title),
            ("text", &request.text),
            ("url", &request.url),
        ] {
            let _ = js_sys::Reflect::set(&data, &JsValue::from_str(key), &JsValue::from_str(value));
        }
        if let Err(e) = share.call1(&navigator, &data) {
            tracing::warn!("navigator.share failed: {}", js_reason(&e));
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        let Some((clipboard, write_text)) = self.navigator_method(&["clipboard", "writeText"])
        else {
            tracing::warn!("Clipboard API unavailable");
            return;
        };
        if let Err(e) = write_text.call1(&clipboard, &JsValue::from_str(text)) {
            tracing::warn!("clipboard.writeText failed: {}", js_reason(&e));
        }
    }
}

/// Report builder instance for WASM.
#[wasm_bindgen]
pub struct WasmReportBuilder {
    builder: ReportBuilder,
}

#[wasm_bindgen]
impl WasmReportBuilder {
    /// Create a new builder with an empty canvas.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: ReportBuilder::new(BuilderConfig::default()),
        }
    }

    /// Apply one input event serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if parsing fails or the event is rejected.
    #[wasm_bindgen(js_name = applyEventJson)]
    pub fn apply_event_json(&mut self, json: &str) -> Result<(), String> {
        let event: BuilderEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        self.builder.apply_event(event).map_err(|e| e.to_string())
    }

    /// Editor markup for the canvas.
    #[must_use]
    pub fn render(&self) -> String {
        self.builder.render()
    }

    /// Preview markup for the canvas.
    #[must_use]
    pub fn preview(&self) -> String {
        self.builder.preview()
    }

    /// Get the canvas model as JSON.
    #[wasm_bindgen(js_name = getCanvasJson)]
    #[must_use]
    pub fn get_canvas_json(&self) -> String {
        self.builder.canvas().to_json().unwrap_or_default()
    }

    /// Get the open configuration panel as JSON (`null` when closed).
    #[wasm_bindgen(js_name = getPanelJson)]
    #[must_use]
    pub fn get_panel_json(&self) -> String {
        serde_json::to_string(&self.builder.panel_view()).unwrap_or_default()
    }

    /// Undo the last change.
    pub fn undo(&mut self) -> bool {
        self.builder.undo()
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> bool {
        self.builder.redo()
    }

    /// Whether undo is available.
    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.builder.history().can_undo()
    }

    /// Whether redo is available.
    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.builder.history().can_redo()
    }

    /// Start a new report after confirmation.
    #[wasm_bindgen(js_name = newReport)]
    pub fn new_report(&mut self) -> bool {
        self.builder.new_report(&mut Browser::new())
    }

    /// Save the report to `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns an error string if storage is unavailable or full.
    #[wasm_bindgen(js_name = saveReport)]
    pub fn save_report(&self) -> Result<(), String> {
        let mut storage = LocalStorage::open().map_err(|e| e.to_string())?;
        self.builder
            .save_report(&mut storage, &mut Browser::new())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    /// Load the saved report from `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns an error string if nothing is saved or the save is unreadable.
    #[wasm_bindgen(js_name = loadReport)]
    pub fn load_report(&mut self) -> Result<(), String> {
        let storage = LocalStorage::open().map_err(|e| e.to_string())?;
        self.builder.load_report(&storage).map_err(|e| e.to_string())
    }

    /// Prompt for a name and save the layout as a template.
    ///
    /// # Errors
    ///
    /// Returns an error string if storage fails.
    #[wasm_bindgen(js_name = saveAsTemplate)]
    pub fn save_as_template(&self) -> Result<bool, String> {
        let mut storage = LocalStorage::open().map_err(|e| e.to_string())?;
        self.builder
            .save_as_template(&mut storage, &mut Browser::new())
            .map(|saved| saved.is_some())
            .map_err(|e| e.to_string())
    }

    /// Replace the canvas with a saved template.
    ///
    /// # Errors
    ///
    /// Returns an error string if no template has that name.
    #[wasm_bindgen(js_name = applyTemplate)]
    pub fn apply_template(&mut self, name: &str) -> Result<usize, String> {
        let storage = LocalStorage::open().map_err(|e| e.to_string())?;
        self.builder
            .apply_template(&storage, name)
            .map_err(|e| e.to_string())
    }

    /// Run the export prompt. Returns the chosen format, if any.
    #[wasm_bindgen(js_name = exportReport)]
    #[must_use]
    pub fn export_report(&self) -> Option<String> {
        self.builder
            .export_report(&mut Browser::new())
            .map(|format| format.to_string())
    }

    /// Share the report link.
    #[wasm_bindgen(js_name = shareReport)]
    pub fn share_report(&self) {
        let mut browser = Browser::new();
        let mut dialogs = Browser::new();
        self.builder.share_report(&mut browser, &mut dialogs);
    }
}

impl Default for WasmReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
