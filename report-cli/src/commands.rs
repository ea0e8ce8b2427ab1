//! Subcommand execution against file storage.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use report_core::persistence::{self, ShareOutcome};
use report_core::{BuilderEvent, FileStorage, ReportBuilder, ScriptedDialogs};

use crate::{CliConfig, CliPlatform, Command};

/// Run one subcommand, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if storage cannot be opened, an input file is
/// unreadable, or the requested report/template does not exist.
pub fn run(config: &CliConfig, command: &Command, out: &mut dyn Write) -> Result<()> {
    let mut storage = FileStorage::open(&config.data_dir)
        .with_context(|| format!("Failed to open data directory {}", config.data_dir.display()))?;

    match command {
        Command::Replay {
            events,
            save,
            template,
            preview,
        } => replay(config, &mut storage, events, *save, template.as_deref(), *preview, out),
        Command::Show => {
            let document = persistence::load_report(&storage).context("No report to show")?;
            writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
            Ok(())
        }
        Command::Templates => {
            let templates = persistence::load_templates(&storage)?;
            if templates.is_empty() {
                writeln!(out, "No templates saved.")?;
            }
            for template in templates {
                writeln!(out, "{}\t{} elements", template.name, template.elements.len())?;
            }
            Ok(())
        }
        Command::FromTemplate { name } => {
            let mut builder = ReportBuilder::new(config.builder);
            let count = builder
                .apply_template(&storage, name)
                .with_context(|| format!("Failed to apply template \"{name}\""))?;
            let mut dialogs = ScriptedDialogs::new();
            builder.save_report(&mut storage, &mut dialogs)?;
            writeln!(out, "Rebuilt report from \"{name}\" with {count} elements.")?;
            print_alerts(&dialogs, out)
        }
        Command::Preview => {
            let mut builder = ReportBuilder::new(config.builder);
            builder.load_report(&storage).context("No report to preview")?;
            writeln!(out, "{}", builder.preview())?;
            Ok(())
        }
        Command::Export { format } => {
            let builder = ReportBuilder::new(config.builder);
            let mut dialogs = ScriptedDialogs::accepting();
            if let Some(answer) = format {
                dialogs = dialogs.with_prompt(Some(answer));
            }
            if builder.export_report(&mut dialogs).is_none() {
                writeln!(out, "Export cancelled.")?;
            }
            print_alerts(&dialogs, out)
        }
        Command::Share { url, native } => {
            let builder = ReportBuilder::new(config.builder);
            let mut platform = CliPlatform::new(url.as_str(), *native);
            let mut dialogs = ScriptedDialogs::new();
            match builder.share_report(&mut platform, &mut dialogs) {
                ShareOutcome::Shared(request) => {
                    writeln!(out, "Shared \"{}\": {}", request.title, request.url)?;
                }
                ShareOutcome::Copied(text) => writeln!(out, "{text}")?,
            }
            print_alerts(&dialogs, out)
        }
    }
}

fn replay(
    config: &CliConfig,
    storage: &mut FileStorage,
    path: &Path,
    save: bool,
    template: Option<&str>,
    preview: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    let events: Vec<BuilderEvent> =
        serde_json::from_str(&json).with_context(|| format!("Invalid events in {}", path.display()))?;

    let mut builder = ReportBuilder::new(config.builder);
    let mut rejected = 0usize;
    for (index, event) in events.into_iter().enumerate() {
        if let Err(e) = builder.apply_event(event) {
            tracing::warn!(index, "Event rejected: {e}");
            rejected += 1;
        }
    }
    tracing::info!(
        elements = builder.canvas().element_count(),
        rejected,
        "Replay finished"
    );

    let mut dialogs = ScriptedDialogs::new();
    if save {
        builder.save_report(storage, &mut dialogs)?;
    }
    if let Some(name) = template {
        dialogs = dialogs.with_prompt(Some(name));
        builder.save_as_template(storage, &mut dialogs)?;
    }

    let markup = if preview {
        builder.preview()
    } else {
        builder.render()
    };
    writeln!(out, "{markup}")?;
    print_alerts(&dialogs, out)
}

fn print_alerts(dialogs: &ScriptedDialogs, out: &mut dyn Write) -> Result<()> {
    for alert in &dialogs.alerts {
        writeln!(out, "{alert}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const EVENTS: &str = r#"[
        {"type":"drop","payload":"{\"type\":\"metric\",\"component\":\"Revenue\"}","x":20,"y":20},
        {"type":"edit_config","key":"format","value":"percentage"},
        {"type":"drop","payload":"{\"type\":\"chart\",\"component\":\"Bar Chart\"}","x":340,"y":20},
        {"type":"delete","element":42}
    ]"#;

    fn setup() -> (tempfile::TempDir, CliConfig, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let events = dir.path().join("events.json");
        std::fs::write(&events, EVENTS).expect("write events");
        let config = CliConfig {
            data_dir: dir.path().join("data"),
            ..CliConfig::default()
        };
        (dir, config, events)
    }

    fn run_to_string(config: &CliConfig, command: &Command) -> Result<String> {
        let mut out = Vec::new();
        run(config, command, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn replay_saves_report_and_template() {
        let (_dir, config, events) = setup();
        let output = run_to_string(
            &config,
            &Command::Replay {
                events,
                save: true,
                template: Some("KPIs".to_string()),
                preview: false,
            },
        )
        .expect("replay");
        assert!(output.contains("id=\"element-2\""));
        assert!(output.contains("Report saved successfully!"));
        assert!(output.contains("Template \"KPIs\" saved successfully!"));

        let listing = run_to_string(&config, &Command::Templates).expect("templates");
        assert_eq!(listing.trim(), "KPIs\t2 elements");

        let shown = run_to_string(&config, &Command::Show).expect("show");
        assert!(shown.contains("\"percentage\""));
    }

    #[test]
    fn from_template_replaces_saved_report() {
        let (_dir, config, events) = setup();
        run_to_string(
            &config,
            &Command::Replay {
                events,
                save: false,
                template: Some("KPIs".to_string()),
                preview: true,
            },
        )
        .expect("replay");
        assert!(run_to_string(&config, &Command::Preview).is_err());

        let output = run_to_string(
            &config,
            &Command::FromTemplate {
                name: "KPIs".to_string(),
            },
        )
        .expect("from template");
        assert!(output.contains("with 2 elements"));

        let preview = run_to_string(&config, &Command::Preview).expect("preview");
        assert!(preview.contains("preview-content"));
        assert!(!preview.contains("resize-handle"));
    }

    #[test]
    fn missing_template_is_an_error() {
        let (_dir, config, _events) = setup();
        let err = run_to_string(
            &config,
            &Command::FromTemplate {
                name: "Nope".to_string(),
            },
        )
        .expect_err("unknown template");
        assert!(err.to_string().contains("Nope"));
    }

    #[test]
    fn export_and_share_stubs() {
        let (_dir, config, _events) = setup();
        let export = run_to_string(&config, &Command::Export { format: None }).expect("export");
        assert_eq!(export.trim(), "PDF export functionality would be implemented here.");

        let cancelled = run_to_string(
            &config,
            &Command::Export {
                format: Some("gif".to_string()),
            },
        )
        .expect("export");
        assert_eq!(cancelled.trim(), "Export cancelled.");

        let share = run_to_string(
            &config,
            &Command::Share {
                url: "https://reports.example/r/7".to_string(),
                native: false,
            },
        )
        .expect("share");
        assert!(share.contains("Report link copied to clipboard!"));
    }
}
