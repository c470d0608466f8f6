use serde::{Deserialize, Serialize};

use super::suggestion::SuggestedAction;

/// Whether an email's body may be forwarded to the conversational assistant.
/// Derived per selection, never cached across emails; `override_granted` is
/// a session-scoped grant that resets to the remote-reported value whenever
/// a different email is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyStatus {
    pub can_see_body: bool,
    pub blocked_reason: Option<String>,
    pub override_granted: bool,
}

impl PrivacyStatus {
    /// Default-closed gate used when the remote status cannot be fetched.
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            can_see_body: false,
            blocked_reason: Some(reason.into()),
            override_granted: false,
        }
    }

    /// True when body content may go to the assistant, either because the
    /// gate is open or because the user granted an override.
    pub fn body_allowed(&self) -> bool {
        self.can_see_body || self.override_granted
    }
}

/// An assistant-proposed action awaiting explicit user confirmation. Never
/// persisted; at most one exists per email context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    pub action: SuggestedAction,
    pub reason: String,
    pub label_id: Option<String>,
    pub label_name: Option<String>,
    pub task_title: Option<String>,
}
