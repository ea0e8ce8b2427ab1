//! Saving reports and templates, plus the export/share stubs.

use std::fmt;
use std::str::FromStr;

use crate::clock::current_timestamp_ms;
use crate::dialog::{Dialogs, Platform, ShareRequest};
use crate::document::{ReportDocument, TemplateDocument, REPORT_KEY, TEMPLATES_KEY};
use crate::storage::KeyValueStorage;
use crate::{Canvas, PersistenceError};

/// Write the canvas as the saved report, replacing any previous save.
///
/// # Errors
///
/// Returns an error if serialization or the storage write fails.
pub fn save_report(
    storage: &mut dyn KeyValueStorage,
    canvas: &Canvas,
) -> Result<ReportDocument, PersistenceError> {
    let document = ReportDocument::from_canvas(canvas, current_timestamp_ms());
    let json = serde_json::to_string(&document)?;
    storage.set(REPORT_KEY, &json)?;
    tracing::info!(elements = document.elements.len(), "Report saved");
    Ok(document)
}

/// Read the saved report.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] if nothing was saved, or an error
/// if the stored JSON is unreadable.
pub fn load_report(storage: &dyn KeyValueStorage) -> Result<ReportDocument, PersistenceError> {
    let json = storage
        .get(REPORT_KEY)?
        .ok_or_else(|| PersistenceError::NotFound(REPORT_KEY.to_string()))?;
    Ok(serde_json::from_str(&json)?)
}

/// Read every saved template, oldest first.
///
/// # Errors
///
/// Returns an error if the stored list is unreadable.
pub fn load_templates(
    storage: &dyn KeyValueStorage,
) -> Result<Vec<TemplateDocument>, PersistenceError> {
    match storage.get(TEMPLATES_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

/// Append a template to the stored list (names are not deduplicated).
///
/// Returns the number of stored templates.
///
/// # Errors
///
/// Returns an error if the list cannot be read or written.
pub fn append_template(
    storage: &mut dyn KeyValueStorage,
    template: TemplateDocument,
) -> Result<usize, PersistenceError> {
    let mut templates = load_templates(storage)?;
    tracing::info!(name = %template.name, elements = template.elements.len(), "Template saved");
    templates.push(template);
    storage.set(TEMPLATES_KEY, &serde_json::to_string(&templates)?)?;
    Ok(templates.len())
}

/// Find the most recently saved template called `name`.
///
/// # Errors
///
/// Returns [`PersistenceError::TemplateNotFound`] if none matches.
pub fn find_template(
    storage: &dyn KeyValueStorage,
    name: &str,
) -> Result<TemplateDocument, PersistenceError> {
    load_templates(storage)?
        .into_iter()
        .rev()
        .find(|t| t.name == name)
        .ok_or_else(|| PersistenceError::TemplateNotFound(name.to_string()))
}

/// Prompt for a name and save the canvas layout as a template.
///
/// Returns the saved template, or `None` if the prompt was cancelled or
/// left empty.
///
/// # Errors
///
/// Returns an error if the template list cannot be updated.
pub fn save_as_template(
    storage: &mut dyn KeyValueStorage,
    dialogs: &mut dyn Dialogs,
    canvas: &Canvas,
) -> Result<Option<TemplateDocument>, PersistenceError> {
    let Some(name) = dialogs
        .prompt("Enter template name:", None)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
    else {
        return Ok(None);
    };
    let template = TemplateDocument::from_canvas(name, canvas, current_timestamp_ms());
    append_template(storage, template.clone())?;
    dialogs.alert(&format!("Template \"{}\" saved successfully!", template.name));
    Ok(Some(template))
}

/// Export file formats offered by the export prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Portable Document Format.
    Pdf,
    /// PNG image.
    Png,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pdf => "PDF",
            Self::Png => "PNG",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PDF" => Ok(Self::Pdf),
            "PNG" => Ok(Self::Png),
            other => Err(format!("unsupported export format `{other}`")),
        }
    }
}

/// Ask for an export format and acknowledge it.
///
/// No file is produced; the returned format is what the user chose, or
/// `None` if they cancelled or typed something unsupported.
pub fn export_report(dialogs: &mut dyn Dialogs) -> Option<ExportFormat> {
    let answer = dialogs.prompt("Export as (PDF/PNG):", Some("PDF"))?;
    match answer.parse::<ExportFormat>() {
        Ok(format) => {
            dialogs.alert(&format!("{format} export functionality would be implemented here."));
            Some(format)
        }
        Err(e) => {
            tracing::warn!("Export declined: {e}");
            None
        }
    }
}

/// How a report link was shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed to the native share surface.
    Shared(ShareRequest),
    /// Copied to the clipboard.
    Copied(String),
}

/// Share the report link via the platform, falling back to the clipboard.
pub fn share_report(platform: &mut dyn Platform, dialogs: &mut dyn Dialogs) -> ShareOutcome {
    let url = platform.current_url();
    if platform.can_share() {
        let request = ShareRequest {
            title: "Report Builder".to_string(),
            text: "Check out this report!".to_string(),
            url,
        };
        platform.share(&request);
        ShareOutcome::Shared(request)
    } else {
        platform.copy_to_clipboard(&url);
        dialogs.alert("Report link copied to clipboard!");
        ShareOutcome::Copied(url)
    }
}
