use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::attention::AttentionItem;
use crate::core::email::{AnalysisAudit, InboxSummary, PinnedItem, TaskLink};
use crate::core::suggestion::{ActionSuggestion, RuleSuggestion};
use crate::engine::reconcile;

/// Everything cached for one account. Accounts are fully isolated; nothing
/// in here ever crosses to another account's record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountCache {
    pub inbox_summary: Option<InboxSummary>,
    pub rule_suggestions: Vec<RuleSuggestion>,
    pub action_suggestions: Vec<ActionSuggestion>,
    pub attention_items: Vec<AttentionItem>,
    pub available_labels: HashMap<String, String>,
    pub email_task_links: HashMap<String, TaskLink>,
    pub pinned_items: Vec<PinnedItem>,
    pub last_analysis_audit: Option<AnalysisAudit>,
    pub loaded: bool,
}

/// Shallow-merge update: only the fields set here are written, everything
/// else in the cache is left untouched.
#[derive(Debug, Default)]
pub struct CachePatch {
    pub inbox_summary: Option<InboxSummary>,
    pub rule_suggestions: Option<Vec<RuleSuggestion>>,
    pub action_suggestions: Option<Vec<ActionSuggestion>>,
    pub attention_items: Option<Vec<AttentionItem>>,
    pub available_labels: Option<HashMap<String, String>>,
    pub email_task_links: Option<HashMap<String, TaskLink>>,
    pub pinned_items: Option<Vec<PinnedItem>>,
    pub last_analysis_audit: Option<AnalysisAudit>,
    pub loaded: Option<bool>,
}

/// Keyed container of per-account caches. Every component reads and writes
/// through `get`/`update`; the settle pass in `update` is the single place
/// the action-suggestion numbering invariant is enforced.
#[derive(Debug, Default)]
pub struct CacheStore {
    accounts: HashMap<String, AccountCache>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache record for `account`, created empty on first access. Touching
    /// one account never affects another's record.
    pub fn get(&mut self, account: &str) -> &AccountCache {
        self.accounts.entry(account.to_string()).or_default()
    }

    /// Apply a shallow-merge patch and return the settled snapshot.
    pub fn update(&mut self, account: &str, patch: CachePatch) -> &AccountCache {
        let cache = self.accounts.entry(account.to_string()).or_default();

        if let Some(v) = patch.inbox_summary {
            cache.inbox_summary = Some(v);
        }
        if let Some(v) = patch.rule_suggestions {
            cache.rule_suggestions = v;
        }
        if let Some(v) = patch.action_suggestions {
            cache.action_suggestions = v;
        }
        if let Some(v) = patch.attention_items {
            cache.attention_items = v;
        }
        if let Some(v) = patch.available_labels {
            cache.available_labels = v;
        }
        if let Some(v) = patch.email_task_links {
            cache.email_task_links = v;
        }
        if let Some(v) = patch.pinned_items {
            cache.pinned_items = v;
        }
        if let Some(v) = patch.last_analysis_audit {
            cache.last_analysis_audit = Some(v);
        }
        if let Some(v) = patch.loaded {
            cache.loaded = v;
        }

        // Settle pass: numbers must match 1..N in list order after every
        // mutation, whatever the patch touched.
        reconcile::renumber(&mut cache.action_suggestions);

        cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::suggestion::{ActionSuggestion, Confidence, SuggestedAction};

    fn action(email_id: &str, number: u32) -> ActionSuggestion {
        ActionSuggestion {
            number,
            suggestion_id: None,
            email_id: email_id.to_string(),
            action: SuggestedAction::Archive,
            confidence: Confidence::Medium,
            rationale: String::new(),
            label_id: None,
            label_name: None,
            task_title: None,
        }
    }

    #[test]
    fn get_creates_empty_record() {
        let mut store = CacheStore::new();
        let cache = store.get("personal");
        assert!(!cache.loaded);
        assert!(cache.rule_suggestions.is_empty());
        assert!(cache.action_suggestions.is_empty());
        assert!(cache.attention_items.is_empty());
        assert!(cache.pinned_items.is_empty());
        assert!(cache.inbox_summary.is_none());
    }

    #[test]
    fn update_touches_only_patched_fields() {
        let mut store = CacheStore::new();
        store.update(
            "personal",
            CachePatch {
                loaded: Some(true),
                ..Default::default()
            },
        );
        store.update(
            "personal",
            CachePatch {
                action_suggestions: Some(vec![action("m1", 7)]),
                ..Default::default()
            },
        );

        let cache = store.get("personal");
        assert!(cache.loaded);
        assert_eq!(cache.action_suggestions.len(), 1);
    }

    #[test]
    fn update_renumbers_action_suggestions() {
        let mut store = CacheStore::new();
        let cache = store.update(
            "personal",
            CachePatch {
                action_suggestions: Some(vec![action("m1", 9), action("m2", 3), action("m3", 3)]),
                ..Default::default()
            },
        );
        let numbers: Vec<u32> = cache.action_suggestions.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn accounts_are_isolated() {
        let mut store = CacheStore::new();
        store.update(
            "personal",
            CachePatch {
                action_suggestions: Some(vec![action("m1", 1)]),
                loaded: Some(true),
                ..Default::default()
            },
        );

        let church = store.get("church");
        assert!(!church.loaded);
        assert!(church.action_suggestions.is_empty());

        // And populating the second account leaves the first alone.
        store.update(
            "church",
            CachePatch {
                action_suggestions: Some(vec![action("c1", 1), action("c2", 2)]),
                ..Default::default()
            },
        );
        assert_eq!(store.get("personal").action_suggestions.len(), 1);
    }
}
