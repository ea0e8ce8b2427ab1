//! # Report Builder CLI
//!
//! Command-line host for the report builder core.
//!
//! Reports and templates live in a data directory (one JSON file per
//! storage key), so a layout built in one invocation can be previewed,
//! templated and shared from the next.
//!
//! ## Usage
//!
//! ```bash
//! report-builder replay events.json --save --template "Weekly KPIs"
//! report-builder templates
//! report-builder from-template "Weekly KPIs"
//! report-builder preview
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Builder configuration and data directory
//! - `commands::run` - Executes one subcommand against file storage
//! - `CliPlatform` - Share surface that only knows the report URL

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use report_core::{BuilderConfig, Platform, ShareRequest};

/// Command-line arguments for report-builder.
#[derive(Debug, Clone, Parser)]
#[command(name = "report-builder")]
#[command(about = "Build, template and preview dashboard reports")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding the saved report and templates
    #[arg(long, env = "REPORT_DATA_DIR", default_value = ".report-builder", global = true)]
    pub data_dir: PathBuf,

    /// Maximum number of undo snapshots kept
    #[arg(long, env = "REPORT_HISTORY_LIMIT", default_value = "50", global = true)]
    pub history_limit: usize,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// report-builder subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Apply a JSON array of builder events to an empty report
    Replay {
        /// Path to the events file
        events: PathBuf,
        /// Save the resulting report
        #[arg(long)]
        save: bool,
        /// Also save the layout as a template with this name
        #[arg(long)]
        template: Option<String>,
        /// Print preview markup instead of editor markup
        #[arg(long)]
        preview: bool,
    },
    /// Print the saved report JSON
    Show,
    /// List saved templates
    Templates,
    /// Rebuild the report from a template and save it
    FromTemplate {
        /// Template name
        name: String,
    },
    /// Print preview markup for the saved report
    Preview,
    /// Run the export prompt
    Export {
        /// Answer to the format prompt (PDF or PNG); defaults to PDF
        #[arg(long)]
        format: Option<String>,
    },
    /// Share the report link
    Share {
        /// Link to share
        #[arg(long, env = "REPORT_URL")]
        url: String,
        /// Pretend a native share surface is available
        #[arg(long)]
        native: bool,
    },
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Builder configuration.
    pub builder: BuilderConfig,
    /// Storage directory.
    pub data_dir: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            builder: BuilderConfig::default(),
            data_dir: PathBuf::from(".report-builder"),
        }
    }
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            builder: BuilderConfig::default().with_history_limit(args.history_limit),
            data_dir: args.data_dir.clone(),
        }
    }
}

/// Share surface for the terminal.
///
/// There is no clipboard; "copying" records the text so it can be printed.
#[derive(Debug, Clone)]
pub struct CliPlatform {
    url: String,
    native: bool,
    /// Text placed on the clipboard.
    pub clipboard: Option<String>,
    /// Requests handed to the share surface.
    pub shared: Vec<ShareRequest>,
}

impl CliPlatform {
    /// Create a platform reporting `url` as the current page.
    #[must_use]
    pub fn new(url: impl Into<String>, native: bool) -> Self {
        Self {
            url: url.into(),
            native,
            clipboard: None,
            shared: Vec::new(),
        }
    }
}

impl Platform for CliPlatform {
    fn current_url(&self) -> String {
        self.url.clone()
    }

    fn can_share(&self) -> bool {
        self.native
    }

    fn share(&mut self, request: &ShareRequest) {
        tracing::debug!(url = %request.url, "share requested");
        self.shared.push(request.clone());
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }
}
