//! User dialogs and platform share surfaces used by persistence/export.
//!
//! Hosts provide implementations: the browser maps these to
//! `confirm`/`prompt`/`alert` and `navigator.share`, the CLI to scripted
//! answers.

use std::collections::VecDeque;

/// Blocking user dialogs.
pub trait Dialogs {
    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;

    /// Ask for a line of text; `None` when cancelled.
    fn prompt(&mut self, message: &str, default: Option<&str>) -> Option<String>;

    /// Show an acknowledgement.
    fn alert(&mut self, message: &str);
}

/// Content handed to a platform share surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    /// Share sheet title.
    pub title: String,
    /// Message body.
    pub text: String,
    /// Link being shared.
    pub url: String,
}

/// Platform integration for sharing.
pub trait Platform {
    /// URL of the current report.
    fn current_url(&self) -> String;

    /// Whether a native share surface exists.
    fn can_share(&self) -> bool;

    /// Open the native share surface.
    fn share(&mut self, request: &ShareRequest);

    /// Put text on the clipboard.
    fn copy_to_clipboard(&mut self, text: &str);
}

/// Dialogs answered from queued responses, recording every alert.
///
/// When the queues run dry, confirmations fall back to
/// `default_confirm` and prompts to their default value (if
/// `accept_prompt_defaults`) or cancellation.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDialogs {
    confirms: VecDeque<bool>,
    prompts: VecDeque<Option<String>>,
    /// Answer used when no confirmation is queued.
    pub default_confirm: bool,
    /// Whether unanswered prompts accept their default value.
    pub accept_prompt_defaults: bool,
    /// Alerts shown so far.
    pub alerts: Vec<String>,
}

impl ScriptedDialogs {
    /// Create dialogs that decline everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create dialogs that confirm everything and accept prompt defaults.
    #[must_use]
    pub fn accepting() -> Self {
        Self {
            default_confirm: true,
            accept_prompt_defaults: true,
            ..Self::default()
        }
    }

    /// Queue an answer for the next confirmation.
    #[must_use]
    pub fn with_confirm(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }

    /// Queue an answer for the next prompt (`None` cancels).
    #[must_use]
    pub fn with_prompt(mut self, answer: Option<&str>) -> Self {
        self.prompts.push_back(answer.map(str::to_string));
        self
    }
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&mut self, message: &str) -> bool {
        let answer = self.confirms.pop_front().unwrap_or(self.default_confirm);
        tracing::debug!(text = message, answer, "confirm");
        answer
    }

    fn prompt(&mut self, message: &str, default: Option<&str>) -> Option<String> {
        let answer = self.prompts.pop_front().unwrap_or_else(|| {
            if self.accept_prompt_defaults {
                default.map(str::to_string)
            } else {
                None
            }
        });
        tracing::debug!(text = message, ?answer, "prompt");
        answer
    }

    fn alert(&mut self, message: &str) {
        tracing::debug!(text = message, "alert");
        self.alerts.push(message.to_string());
    }
}
