use crate::engine::store::{CachePatch, CacheStore};

/// Transient notice surfaced when a cached reference turned out to be gone
/// upstream. `next_selection` is computed from the pre-removal attention
/// ordering so the caller can move focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleNotice {
    pub email_id: String,
    pub message: String,
    pub next_selection: Option<String>,
}

/// Drop every cache entry referencing `email_id`. Removing an id that is
/// already absent is a no-op, so a dismissal racing a stale signal for the
/// same item settles cleanly whichever lands second.
pub(crate) fn purge_from_cache(store: &mut CacheStore, account: &str, email_id: &str) {
    let cache = store.get(account);
    let attention: Vec<_> = cache
        .attention_items
        .iter()
        .filter(|item| item.email_id != email_id)
        .cloned()
        .collect();
    let pinned: Vec<_> = cache
        .pinned_items
        .iter()
        .filter(|item| item.email_id != email_id)
        .cloned()
        .collect();

    store.update(
        account,
        CachePatch {
            attention_items: Some(attention),
            pinned_items: Some(pinned),
            ..Default::default()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attention::{AnalysisMethod, AttentionItem, Urgency};
    use crate::core::email::PinnedItem;
    use crate::core::suggestion::Confidence;

    fn attention(email_id: &str) -> AttentionItem {
        AttentionItem {
            email_id: email_id.to_string(),
            thread_id: format!("t-{}", email_id),
            urgency: Urgency::High,
            reason: String::new(),
            confidence: Confidence::High,
            analysis_method: AnalysisMethod::Model,
            matched_role: None,
            labels: Vec::new(),
            extracted_task: None,
        }
    }

    fn pinned(email_id: &str) -> PinnedItem {
        PinnedItem {
            email_id: email_id.to_string(),
            subject: "Pinned".to_string(),
            from: "someone@example.com".to_string(),
            pinned_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn purge_removes_from_every_collection() {
        let mut store = CacheStore::new();
        store.update(
            "personal",
            CachePatch {
                attention_items: Some(vec![attention("m1"), attention("m2")]),
                pinned_items: Some(vec![pinned("m1")]),
                ..Default::default()
            },
        );

        purge_from_cache(&mut store, "personal", "m1");

        let cache = store.get("personal");
        assert_eq!(cache.attention_items.len(), 1);
        assert_eq!(cache.attention_items[0].email_id, "m2");
        assert!(cache.pinned_items.is_empty());
    }

    #[test]
    fn purge_of_absent_id_is_a_no_op() {
        let mut store = CacheStore::new();
        store.update(
            "personal",
            CachePatch {
                attention_items: Some(vec![attention("m1")]),
                ..Default::default()
            },
        );

        purge_from_cache(&mut store, "personal", "gone");
        assert_eq!(store.get("personal").attention_items.len(), 1);
    }
}
