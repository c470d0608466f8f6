//! Stable merges of freshly fetched analysis results into the cached lists.
//! Existing entries stay first and keep their order; incoming entries are
//! appended only when their key is new. The authoritative refetch after an
//! analysis run overwrites these lists, so the merge only has to be a good
//! immediately-visible approximation.

use std::collections::HashSet;

use crate::core::attention::AttentionItem;
use crate::core::suggestion::{ActionSuggestion, RuleSuggestion};

/// Reassign `number` fields to match list order, 1-based. Chat-driven
/// approval-by-number depends on this staying contiguous.
pub fn renumber(suggestions: &mut [ActionSuggestion]) {
    for (i, suggestion) in suggestions.iter_mut().enumerate() {
        suggestion.number = (i + 1) as u32;
    }
}

/// Merge incoming rule suggestions into the cached list, keyed by pattern.
/// Example lists on appended suggestions are capped at `max_examples`.
pub fn merge_rule_suggestions(
    existing: &[RuleSuggestion],
    incoming: Vec<RuleSuggestion>,
    max_examples: usize,
) -> Vec<RuleSuggestion> {
    let mut known: HashSet<String> = existing.iter().map(|s| s.pattern_key()).collect();
    let mut merged = existing.to_vec();
    for mut suggestion in incoming {
        if !known.insert(suggestion.pattern_key()) {
            continue;
        }
        suggestion.examples.truncate(max_examples);
        merged.push(suggestion);
    }
    merged
}

/// Merge incoming action suggestions into the cached list, keyed by
/// identity, then renumber.
pub fn merge_action_suggestions(
    existing: &[ActionSuggestion],
    incoming: Vec<ActionSuggestion>,
) -> Vec<ActionSuggestion> {
    let mut known: HashSet<String> = existing
        .iter()
        .map(|s| s.identity_key().to_string())
        .collect();
    let mut merged = existing.to_vec();
    for suggestion in incoming {
        if !known.insert(suggestion.identity_key().to_string()) {
            continue;
        }
        merged.push(suggestion);
    }
    renumber(&mut merged);
    merged
}

/// Merge incoming attention items into the cached list, one per email.
pub fn merge_attention_items(
    existing: &[AttentionItem],
    incoming: Vec<AttentionItem>,
) -> Vec<AttentionItem> {
    let mut known: HashSet<String> = existing.iter().map(|i| i.email_id.clone()).collect();
    let mut merged = existing.to_vec();
    for item in incoming {
        if !known.insert(item.email_id.clone()) {
            continue;
        }
        merged.push(item);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attention::{AnalysisMethod, Urgency};
    use crate::core::suggestion::{Confidence, SuggestedAction};

    fn rule(field: &str, value: &str, rule_id: Option<&str>) -> RuleSuggestion {
        RuleSuggestion {
            rule_id: rule_id.map(str::to_string),
            field: field.to_string(),
            operator: "contains".to_string(),
            value: value.to_string(),
            category: "newsletter".to_string(),
            order: 0,
            confidence: Confidence::High,
            reason: String::new(),
            examples: Vec::new(),
            email_count: 4,
        }
    }

    fn action(email_id: &str, suggestion_id: Option<&str>) -> ActionSuggestion {
        ActionSuggestion {
            number: 0,
            suggestion_id: suggestion_id.map(str::to_string),
            email_id: email_id.to_string(),
            action: SuggestedAction::Archive,
            confidence: Confidence::Medium,
            rationale: String::new(),
            label_id: None,
            label_name: None,
            task_title: None,
        }
    }

    fn attention(email_id: &str) -> AttentionItem {
        AttentionItem {
            email_id: email_id.to_string(),
            thread_id: format!("t-{}", email_id),
            urgency: Urgency::Medium,
            reason: String::new(),
            confidence: Confidence::Medium,
            analysis_method: AnalysisMethod::Pattern,
            matched_role: None,
            labels: Vec::new(),
            extracted_task: None,
        }
    }

    #[test]
    fn rule_merge_is_existing_first_and_appends_only_new_patterns() {
        let existing = vec![rule("from", "news@a.com", None)];
        let incoming = vec![
            rule("from", "news@a.com", None), // same pattern, dropped
            rule("subject", "invoice", None),
        ];

        let merged = merge_rule_suggestions(&existing, incoming, 3);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].value, "news@a.com");
        assert_eq!(merged[1].value, "invoice");
    }

    #[test]
    fn rule_merge_prefers_persisted_id_as_key() {
        // Same pattern but a different persisted id is a different suggestion.
        let existing = vec![rule("from", "news@a.com", Some("r1"))];
        let incoming = vec![rule("from", "news@a.com", Some("r2"))];

        let merged = merge_rule_suggestions(&existing, incoming, 3);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn rule_merge_caps_examples_on_appended_suggestions() {
        let mut incoming = rule("from", "news@a.com", None);
        incoming.examples = vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()];

        let merged = merge_rule_suggestions(&[], vec![incoming], 3);
        assert_eq!(merged[0].examples.len(), 3);
    }

    #[test]
    fn action_merge_is_idempotent() {
        let batch = vec![action("m1", Some("s1")), action("m2", None)];

        let once = merge_action_suggestions(&[], batch.clone());
        let twice = merge_action_suggestions(&once, batch);
        assert_eq!(once, twice);
    }

    #[test]
    fn action_merge_renumbers_contiguously() {
        let existing = merge_action_suggestions(&[], vec![action("m1", None), action("m2", None)]);
        let merged = merge_action_suggestions(&existing, vec![action("m3", None)]);

        let numbers: Vec<u32> = merged.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(merged[2].email_id, "m3");
    }

    #[test]
    fn renumber_after_removal_stays_contiguous() {
        let mut list = merge_action_suggestions(
            &[],
            vec![action("m1", None), action("m2", None), action("m3", None)],
        );
        list.remove(1);
        renumber(&mut list);

        let numbers: Vec<u32> = list.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(list[1].email_id, "m3");
    }

    #[test]
    fn attention_merge_dedups_by_email_id() {
        let existing = vec![attention("m1")];
        let merged = merge_attention_items(&existing, vec![attention("m1"), attention("m2")]);

        let ids: Vec<&str> = merged.iter().map(|i| i.email_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }
}
