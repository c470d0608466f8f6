use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::suggestion::Confidence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// How the upstream analyzer decided the email needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMethod {
    Pattern,
    Model,
}

/// Why the user dismissed an attention item. Persisted with the dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissReason {
    Handled,
    NotActionable,
    FalsePositive,
}

impl DismissReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Handled => "handled",
            Self::NotActionable => "not_actionable",
            Self::FalsePositive => "false_positive",
        }
    }
}

/// Task data the analyzer extracted from the email, if it found any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTask {
    pub title: String,
    pub priority: Option<String>,
    pub due: Option<NaiveDate>,
}

/// A message flagged by upstream analysis as needing user action. Created by
/// an analysis run; leaves the cache through dismissal, snooze, or the stale
/// cascade, and never transitions back to active within this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionItem {
    pub email_id: String,
    pub thread_id: String,
    pub urgency: Urgency,
    pub reason: String,
    pub confidence: Confidence,
    pub analysis_method: AnalysisMethod,
    pub matched_role: Option<String>,
    pub labels: Vec<String>,
    pub extracted_task: Option<ExtractedTask>,
}
