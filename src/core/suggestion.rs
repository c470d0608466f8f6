use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Mailbox-side action a suggestion (or an assistant proposal) asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    Archive,
    Delete,
    Star,
    MarkImportant,
    Label,
    CreateTask,
}

impl SuggestedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Delete => "delete",
            Self::Star => "star",
            Self::MarkImportant => "mark_important",
            Self::Label => "label",
            Self::CreateTask => "create_task",
        }
    }
}

/// Candidate filter rule produced by an analysis run. `rule_id` is present
/// once the server has persisted the suggestion; ephemeral suggestions carry
/// none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSuggestion {
    pub rule_id: Option<String>,
    pub field: String,
    pub operator: String,
    pub value: String,
    pub category: String,
    pub order: i32,
    pub confidence: Confidence,
    pub reason: String,
    pub examples: Vec<String>,
    pub email_count: u32,
}

impl RuleSuggestion {
    /// Dedup key across fetches: the persisted id when the server has one,
    /// otherwise the rule pattern itself.
    pub fn pattern_key(&self) -> String {
        match &self.rule_id {
            Some(id) => format!("id:{}", id),
            None => format!("{}|{}|{}", self.field, self.operator, self.value),
        }
    }
}

/// One suggested action against one email. `number` is the 1-based position
/// shown to the user; the reconciler keeps it contiguous with list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSuggestion {
    pub number: u32,
    pub suggestion_id: Option<String>,
    pub email_id: String,
    pub action: SuggestedAction,
    pub confidence: Confidence,
    pub rationale: String,
    pub label_id: Option<String>,
    pub label_name: Option<String>,
    pub task_title: Option<String>,
}

impl ActionSuggestion {
    /// Dedup key across fetches: the persisted id when the server has one,
    /// otherwise the target email.
    pub fn identity_key(&self) -> &str {
        self.suggestion_id.as_deref().unwrap_or(&self.email_id)
    }
}
