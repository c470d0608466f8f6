use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one message in the inbox listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailSummary {
    pub id: String,
    pub thread_id: String,
    pub subject: String,
    pub from: String,
    pub date: Option<NaiveDateTime>,
    pub snippet: String,
    pub unread: bool,
}

/// Snapshot of recent message metadata plus the cursor for the next page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxSummary {
    pub emails: Vec<EmailSummary>,
    pub next_cursor: Option<String>,
}

impl InboxSummary {
    /// Append a follow-up page: existing messages stay in place, incoming
    /// ones already present (by id) are skipped, and the cursor moves to the
    /// new page's.
    pub fn append_page(&mut self, page: InboxSummary) {
        let known: std::collections::HashSet<&str> =
            self.emails.iter().map(|e| e.id.as_str()).collect();
        let mut fresh: Vec<EmailSummary> = page
            .emails
            .into_iter()
            .filter(|e| !known.contains(e.id.as_str()))
            .collect();
        self.emails.append(&mut fresh);
        self.next_cursor = page.next_cursor;
    }
}

/// Summary of the task linked to an email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskLink {
    pub task_id: String,
    pub title: String,
    pub status: String,
}

/// An email the user pinned to keep in view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedItem {
    pub email_id: String,
    pub subject: String,
    pub from: String,
    pub pinned_at: DateTime<Utc>,
}

/// Record of the most recent analysis run. One slot per account; each run
/// overwrites the last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisAudit {
    pub ran_at: DateTime<Utc>,
    pub emails_analyzed: u32,
    pub rule_suggestions: u32,
    pub action_suggestions: u32,
    pub attention_items: u32,
}

impl AnalysisAudit {
    pub fn summary(&self) -> String {
        format!(
            "Analyzed {} emails: {} rule suggestions, {} action suggestions, {} need attention",
            self.emails_analyzed,
            self.rule_suggestions,
            self.action_suggestions,
            self.attention_items,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> EmailSummary {
        EmailSummary {
            id: id.to_string(),
            thread_id: format!("t-{}", id),
            subject: "Subject".to_string(),
            from: "someone@example.com".to_string(),
            date: None,
            snippet: String::new(),
            unread: true,
        }
    }

    #[test]
    fn append_page_skips_known_ids_and_moves_cursor() {
        let mut inbox = InboxSummary {
            emails: vec![summary("m1"), summary("m2")],
            next_cursor: Some("page2".to_string()),
        };

        inbox.append_page(InboxSummary {
            emails: vec![summary("m2"), summary("m3")],
            next_cursor: None,
        });

        let ids: Vec<&str> = inbox.emails.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
        assert_eq!(inbox.next_cursor, None);
    }
}
