//! The remote mailbox/task store the engine talks to. This crate owns no
//! transport; hosts implement [`MailStore`] over whatever wire they have.
//! Errors on this seam are opaque remote text, already formatted for
//! surfacing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::core::attention::{AttentionItem, DismissReason};
use crate::core::email::{AnalysisAudit, InboxSummary, PinnedItem, TaskLink};
use crate::core::privacy::{PendingAction, PrivacyStatus};
use crate::core::suggestion::{ActionSuggestion, RuleSuggestion};

/// Everything a fresh analysis run produced upstream.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub rule_suggestions: Vec<RuleSuggestion>,
    pub action_suggestions: Vec<ActionSuggestion>,
    pub attention_items: Vec<AttentionItem>,
    pub task_links: HashMap<String, TaskLink>,
    pub audit: AnalysisAudit,
}

/// Full detail for one email. `stale` means the underlying item no longer
/// exists upstream (deleted or moved by an external actor).
#[derive(Debug, Clone)]
pub struct EmailDetail {
    pub body: String,
    pub thread_id: Option<String>,
    pub stale: bool,
    pub stale_message: Option<String>,
}

/// Assistant reply to a conversational turn about an email.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub reply: String,
    pub pending_action: Option<PendingAction>,
    pub privacy_status: Option<PrivacyStatus>,
    pub stale: bool,
    pub stale_message: Option<String>,
}

/// Asynchronous operations against the remote system of record. All may
/// fail; the error string is remote-provided context suitable for display.
pub trait MailStore {
    async fn fetch_inbox_summary(
        &self,
        account: &str,
        cursor: Option<&str>,
    ) -> Result<InboxSummary, String>;

    async fn fetch_pending_rule_suggestions(
        &self,
        account: &str,
    ) -> Result<Vec<RuleSuggestion>, String>;

    async fn fetch_pending_action_suggestions(
        &self,
        account: &str,
    ) -> Result<Vec<ActionSuggestion>, String>;

    async fn fetch_labels(&self, account: &str) -> Result<HashMap<String, String>, String>;

    async fn run_analysis(&self, account: &str, limit: usize) -> Result<AnalysisOutcome, String>;

    async fn decide_rule_suggestion(
        &self,
        account: &str,
        rule_id: &str,
        approved: bool,
    ) -> Result<(), String>;

    async fn decide_action_suggestion(
        &self,
        account: &str,
        suggestion_id: &str,
        approved: bool,
    ) -> Result<(), String>;

    async fn dismiss_attention_item(
        &self,
        account: &str,
        email_id: &str,
        reason: DismissReason,
    ) -> Result<(), String>;

    async fn snooze_attention_item(
        &self,
        account: &str,
        email_id: &str,
        until: DateTime<Utc>,
    ) -> Result<(), String>;

    async fn fetch_email_detail(&self, account: &str, email_id: &str)
    -> Result<EmailDetail, String>;

    async fn fetch_privacy_status(
        &self,
        account: &str,
        email_id: &str,
    ) -> Result<PrivacyStatus, String>;

    async fn pin_email(&self, account: &str, item: &PinnedItem) -> Result<(), String>;

    async fn unpin_email(&self, account: &str, email_id: &str) -> Result<(), String>;

    async fn execute_action(
        &self,
        account: &str,
        email_id: &str,
        action: &PendingAction,
    ) -> Result<(), String>;

    async fn chat_about_email(
        &self,
        account: &str,
        email_id: &str,
        message: &str,
        override_privacy: bool,
    ) -> Result<ChatReply, String>;

    async fn track_email_view(&self, account: &str, email_id: &str) -> Result<(), String>;
}
