//! Tunable limits for the report builder.

use serde::{Deserialize, Serialize};

/// Default number of history entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Smallest width a resize may produce.
pub const MIN_ELEMENT_WIDTH: f32 = 200.0;

/// Smallest height a resize may produce.
pub const MIN_ELEMENT_HEIGHT: f32 = 150.0;

/// Builder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Maximum number of history entries.
    pub history_limit: usize,
    /// Minimum element width in pixels.
    pub min_width: f32,
    /// Minimum element height in pixels.
    pub min_height: f32,
    /// Width of a freshly dropped element.
    pub default_width: f32,
    /// Height of a freshly dropped element.
    pub default_height: f32,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            min_width: MIN_ELEMENT_WIDTH,
            min_height: MIN_ELEMENT_HEIGHT,
            default_width: 300.0,
            default_height: 200.0,
        }
    }

    /// Override the history limit (at least one entry is always kept).
    #[must_use]
    pub const fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = if limit == 0 { 1 } else { limit };
        self
    }
}
