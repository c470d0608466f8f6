pub mod command;
pub mod navigate;
pub mod pending;
pub mod reconcile;
pub mod stale;
pub mod store;

use std::collections::HashMap;
use std::collections::HashSet;

use chrono::{Duration, Utc};

use crate::config::EngineConfig;
use crate::core::attention::DismissReason;
use crate::core::email::{AnalysisAudit, InboxSummary, PinnedItem};
use crate::core::privacy::{PendingAction, PrivacyStatus};
use crate::core::suggestion::ActionSuggestion;
use crate::error::EngineError;
use crate::remote::MailStore;

use command::ParsedCommand;
use pending::PendingGate;
use stale::StaleNotice;
use store::{AccountCache, CachePatch, CacheStore};

/// Per-account record of the email currently open for detailed viewing.
/// The stale cascade clears the whole thing when the open email disappears
/// upstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewContext {
    pub selected: Option<String>,
    pub body: Option<String>,
    pub thread_id: Option<String>,
    pub privacy: Option<PrivacyStatus>,
    pub pending: PendingGate,
}

/// Which action suggestions a batch approval covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalSelection {
    All,
    Numbers(Vec<u32>),
}

/// Aggregate outcome of a batch approval. Individual persistence failures
/// land in `errors`; unmatched numbers are reported alongside the numbers
/// that were valid at the time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalReport {
    pub approved: usize,
    pub failed: usize,
    pub unmatched: Vec<u32>,
    pub valid_numbers: Vec<u32>,
    pub errors: Vec<String>,
}

impl ApprovalReport {
    /// One banner-sized line covering successes, failures, and unmatched
    /// numbers.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.approved > 0 {
            parts.push(format!("Approved {} suggestion(s)", self.approved));
        }
        if self.failed > 0 {
            parts.push(format!("{} failed to persist", self.failed));
        }
        if !self.unmatched.is_empty() {
            let wanted: Vec<String> = self.unmatched.iter().map(|n| format!("#{}", n)).collect();
            let valid: Vec<String> = self
                .valid_numbers
                .iter()
                .map(|n| n.to_string())
                .collect();
            parts.push(format!(
                "no suggestion {} (valid: {})",
                wanted.join(", "),
                if valid.is_empty() {
                    "none".to_string()
                } else {
                    valid.join(", ")
                },
            ));
        }
        if parts.is_empty() {
            "Nothing to approve".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Result of opening an email for detailed viewing.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    Opened { privacy: PrivacyStatus },
    Stale(StaleNotice),
}

/// Result of one conversational turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// Assistant replied. `proposed` is true when the reply put an action in
    /// the pending slot.
    Reply { text: String, proposed: bool },
    /// The message parsed as a batch-approval command and was handled
    /// without the assistant.
    Approval(ApprovalReport),
    /// The email under discussion no longer exists upstream.
    Stale(StaleNotice),
}

/// The reconciliation engine: one shared cache store, one view context per
/// account, one remote handle. Account and email ids are captured at call
/// time, so a completion always lands in the cache it was requested for.
pub struct Engine<S> {
    remote: S,
    cache: CacheStore,
    views: HashMap<String, ViewContext>,
    config: EngineConfig,
}

impl<S: MailStore> Engine<S> {
    pub fn new(remote: S) -> Self {
        Self::with_config(remote, EngineConfig::default())
    }

    pub fn with_config(remote: S, config: EngineConfig) -> Self {
        Self {
            remote,
            cache: CacheStore::new(),
            views: HashMap::new(),
            config,
        }
    }

    pub fn remote(&self) -> &S {
        &self.remote
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cache snapshot for `account`, created empty on first touch.
    pub fn cache(&mut self, account: &str) -> &AccountCache {
        self.cache.get(account)
    }

    /// View context for `account`, created empty on first touch.
    pub fn view(&mut self, account: &str) -> &ViewContext {
        self.views.entry(account.to_string()).or_default()
    }

    /// Authoritative load of the pending suggestion lists, plus a
    /// non-critical label-table refresh. Marks the account loaded.
    pub async fn load_account(&mut self, account: &str) -> Result<(), EngineError> {
        let rules = self
            .remote
            .fetch_pending_rule_suggestions(account)
            .await
            .map_err(EngineError::Fetch)?;
        let actions = self
            .remote
            .fetch_pending_action_suggestions(account)
            .await
            .map_err(EngineError::Fetch)?;

        let labels = match self.remote.fetch_labels(account).await {
            Ok(labels) => Some(labels),
            Err(e) => {
                log::debug!("label lookup failed for {}: {}", account, e);
                None
            }
        };

        log::info!(
            "Loaded {}: {} rule suggestions, {} action suggestions",
            account,
            rules.len(),
            actions.len()
        );

        self.cache.update(
            account,
            CachePatch {
                rule_suggestions: Some(rules),
                action_suggestions: Some(actions),
                available_labels: labels,
                loaded: Some(true),
                ..Default::default()
            },
        );
        Ok(())
    }

    /// Fetch inbox metadata. Without a cursor the summary is replaced; with
    /// one, the page is appended to what is already cached.
    pub async fn refresh_inbox(
        &mut self,
        account: &str,
        cursor: Option<&str>,
    ) -> Result<(), EngineError> {
        let page = self
            .remote
            .fetch_inbox_summary(account, cursor)
            .await
            .map_err(EngineError::Fetch)?;

        let summary = if cursor.is_some() {
            let mut current = self
                .cache
                .get(account)
                .inbox_summary
                .clone()
                .unwrap_or(InboxSummary {
                    emails: Vec::new(),
                    next_cursor: None,
                });
            current.append_page(page);
            current
        } else {
            page
        };

        self.cache.update(
            account,
            CachePatch {
                inbox_summary: Some(summary),
                ..Default::default()
            },
        );
        Ok(())
    }

    /// One full analysis run: fetch the new batch, merge it into the cache
    /// for immediate visibility, then refetch the authoritative pending
    /// lists and overwrite. The overwrite is the convergence step; the merge
    /// only has to be a reasonable approximation.
    pub async fn run_analysis(&mut self, account: &str) -> Result<AnalysisAudit, EngineError> {
        let outcome = self
            .remote
            .run_analysis(account, self.config.analysis_limit)
            .await
            .map_err(EngineError::Fetch)?;

        let cache = self.cache.get(account).clone();
        let rules = reconcile::merge_rule_suggestions(
            &cache.rule_suggestions,
            outcome.rule_suggestions,
            self.config.max_suggestion_examples,
        );
        let actions =
            reconcile::merge_action_suggestions(&cache.action_suggestions, outcome.action_suggestions);
        let attention =
            reconcile::merge_attention_items(&cache.attention_items, outcome.attention_items);
        let mut links = cache.email_task_links;
        links.extend(outcome.task_links);

        self.cache.update(
            account,
            CachePatch {
                rule_suggestions: Some(rules),
                action_suggestions: Some(actions),
                attention_items: Some(attention),
                email_task_links: Some(links),
                last_analysis_audit: Some(outcome.audit.clone()),
                ..Default::default()
            },
        );

        let rules = self
            .remote
            .fetch_pending_rule_suggestions(account)
            .await
            .map_err(EngineError::Fetch)?;
        let actions = self
            .remote
            .fetch_pending_action_suggestions(account)
            .await
            .map_err(EngineError::Fetch)?;
        self.cache.update(
            account,
            CachePatch {
                rule_suggestions: Some(rules),
                action_suggestions: Some(actions),
                loaded: Some(true),
                ..Default::default()
            },
        );

        log::info!("Analysis for {}: {}", account, outcome.audit.summary());
        Ok(outcome.audit)
    }

    /// Decide one rule suggestion. Optimistic: the suggestion leaves the
    /// cache immediately, then the decision is persisted. A persistence
    /// failure is surfaced without restoring the suggestion; the next
    /// authoritative refetch re-converges.
    pub async fn decide_rule(
        &mut self,
        account: &str,
        pattern_key: &str,
        approved: bool,
    ) -> Result<(), EngineError> {
        let cache = self.cache.get(account);
        let Some(pos) = cache
            .rule_suggestions
            .iter()
            .position(|s| s.pattern_key() == pattern_key)
        else {
            return Ok(());
        };
        let suggestion = cache.rule_suggestions[pos].clone();
        let mut rules = cache.rule_suggestions.clone();
        rules.remove(pos);

        self.cache.update(
            account,
            CachePatch {
                rule_suggestions: Some(rules),
                ..Default::default()
            },
        );

        if let Some(rule_id) = &suggestion.rule_id {
            self.remote
                .decide_rule_suggestion(account, rule_id, approved)
                .await
                .map_err(|message| EngineError::Persist {
                    what: "rule decision",
                    message,
                })?;
        }
        Ok(())
    }

    /// Decide one action suggestion by its displayed number. Optimistic,
    /// same convergence story as `decide_rule`.
    pub async fn decide_action(
        &mut self,
        account: &str,
        number: u32,
        approved: bool,
    ) -> Result<(), EngineError> {
        let cache = self.cache.get(account);
        let Some(pos) = cache.action_suggestions.iter().position(|s| s.number == number) else {
            return Ok(());
        };
        let suggestion = cache.action_suggestions[pos].clone();
        let mut actions = cache.action_suggestions.clone();
        actions.remove(pos);

        self.cache.update(
            account,
            CachePatch {
                action_suggestions: Some(actions),
                ..Default::default()
            },
        );

        if let Some(id) = &suggestion.suggestion_id {
            self.remote
                .decide_action_suggestion(account, id, approved)
                .await
                .map_err(|message| EngineError::Persist {
                    what: "action decision",
                    message,
                })?;
        }
        Ok(())
    }

    /// Batch-approve action suggestions. Matched suggestions are removed
    /// optimistically in one pass, then each decision is persisted;
    /// individual failures are collected, not fatal. Unmatched numbers are
    /// reported together with the numbers that were valid.
    pub async fn approve(&mut self, account: &str, selection: ApprovalSelection) -> ApprovalReport {
        let suggestions = self.cache.get(account).action_suggestions.clone();
        let valid_numbers: Vec<u32> = suggestions.iter().map(|s| s.number).collect();

        let mut targets: Vec<ActionSuggestion> = Vec::new();
        let mut unmatched: Vec<u32> = Vec::new();
        match selection {
            ApprovalSelection::All => targets = suggestions.clone(),
            ApprovalSelection::Numbers(numbers) => {
                let mut seen = HashSet::new();
                for n in numbers {
                    if !seen.insert(n) {
                        continue;
                    }
                    match suggestions.iter().find(|s| s.number == n) {
                        Some(s) => targets.push(s.clone()),
                        None => unmatched.push(n),
                    }
                }
            }
        }

        let mut report = ApprovalReport {
            unmatched,
            valid_numbers,
            ..Default::default()
        };

        if !targets.is_empty() {
            let target_keys: HashSet<String> = targets
                .iter()
                .map(|s| s.identity_key().to_string())
                .collect();
            let remaining: Vec<ActionSuggestion> = suggestions
                .into_iter()
                .filter(|s| !target_keys.contains(s.identity_key()))
                .collect();
            self.cache.update(
                account,
                CachePatch {
                    action_suggestions: Some(remaining),
                    ..Default::default()
                },
            );
        }

        for target in &targets {
            match &target.suggestion_id {
                Some(id) => match self
                    .remote
                    .decide_action_suggestion(account, id, true)
                    .await
                {
                    Ok(()) => report.approved += 1,
                    Err(e) => {
                        report.failed += 1;
                        report
                            .errors
                            .push(format!("#{} {}: {}", target.number, target.action.as_str(), e));
                    }
                },
                // Ephemeral suggestion, nothing persisted server-side to
                // decide against.
                None => report.approved += 1,
            }
        }

        if report.failed > 0 {
            log::warn!(
                "Batch approval for {}: {} approved, {} failed",
                account,
                report.approved,
                report.failed
            );
        }
        report
    }

    /// Dismiss an attention item. Pessimistic: the dismissal is persisted
    /// first and the item is removed from the cache only on success.
    /// Returns the id to select next, computed on the pre-removal ordering.
    pub async fn dismiss_attention(
        &mut self,
        account: &str,
        email_id: &str,
        reason: DismissReason,
    ) -> Result<Option<String>, EngineError> {
        let ids: Vec<String> = self
            .cache
            .get(account)
            .attention_items
            .iter()
            .map(|i| i.email_id.clone())
            .collect();
        if !ids.iter().any(|id| id == email_id) {
            return Ok(None);
        }
        let next = navigate::next_after_removal(&ids, email_id);

        self.remote
            .dismiss_attention_item(account, email_id, reason)
            .await
            .map_err(|message| EngineError::Persist {
                what: "attention dismissal",
                message,
            })?;

        self.remove_attention_item(account, email_id);
        Ok(next)
    }

    /// Snooze an attention item for `hours` (engine default when `None`).
    /// Pessimistic like `dismiss_attention`; re-appearance after the window
    /// is the server's job.
    pub async fn snooze_attention(
        &mut self,
        account: &str,
        email_id: &str,
        hours: Option<i64>,
    ) -> Result<Option<String>, EngineError> {
        let ids: Vec<String> = self
            .cache
            .get(account)
            .attention_items
            .iter()
            .map(|i| i.email_id.clone())
            .collect();
        if !ids.iter().any(|id| id == email_id) {
            return Ok(None);
        }
        let next = navigate::next_after_removal(&ids, email_id);

        let until = Utc::now() + Duration::hours(hours.unwrap_or(self.config.default_snooze_hours));
        self.remote
            .snooze_attention_item(account, email_id, until)
            .await
            .map_err(|message| EngineError::Persist {
                what: "attention snooze",
                message,
            })?;

        self.remove_attention_item(account, email_id);
        Ok(next)
    }

    fn remove_attention_item(&mut self, account: &str, email_id: &str) {
        let remaining: Vec<_> = self
            .cache
            .get(account)
            .attention_items
            .iter()
            .filter(|i| i.email_id != email_id)
            .cloned()
            .collect();
        self.cache.update(
            account,
            CachePatch {
                attention_items: Some(remaining),
                ..Default::default()
            },
        );
    }

    /// Open an email for detailed viewing. A stale flag on the detail fetch
    /// triggers the cascade instead. The privacy gate is recomputed from the
    /// remote status, so any session override resets to what the server
    /// reports.
    pub async fn select_email(
        &mut self,
        account: &str,
        email_id: &str,
    ) -> Result<SelectOutcome, EngineError> {
        let detail = self
            .remote
            .fetch_email_detail(account, email_id)
            .await
            .map_err(EngineError::Fetch)?;

        if detail.stale {
            let notice = self.handle_stale(account, email_id, detail.stale_message).await;
            return Ok(SelectOutcome::Stale(notice));
        }

        let privacy = match self.remote.fetch_privacy_status(account, email_id).await {
            Ok(status) => status,
            Err(e) => {
                log::warn!("privacy status unavailable for {}: {}", email_id, e);
                PrivacyStatus::blocked("privacy status unavailable")
            }
        };

        if let Err(e) = self.remote.track_email_view(account, email_id).await {
            log::debug!("view tracking failed for {}: {}", email_id, e);
        }

        let view = self.views.entry(account.to_string()).or_default();
        *view = ViewContext {
            selected: Some(email_id.to_string()),
            body: Some(detail.body),
            thread_id: detail.thread_id,
            privacy: Some(privacy.clone()),
            pending: PendingGate::Idle,
        };

        Ok(SelectOutcome::Opened { privacy })
    }

    /// Session-scoped grant letting the assistant see the open email's body.
    /// Lasts until a different email is selected.
    pub fn grant_privacy_override(&mut self, account: &str) -> Result<(), EngineError> {
        let view = self.views.entry(account.to_string()).or_default();
        if view.selected.is_none() {
            return Err(EngineError::NoSelection);
        }
        match view.privacy.as_mut() {
            Some(status) => status.override_granted = true,
            None => {
                view.privacy = Some(PrivacyStatus {
                    can_see_body: false,
                    blocked_reason: None,
                    override_granted: true,
                })
            }
        }
        Ok(())
    }

    /// Pin an email. Persisted first, then reflected in the cache.
    pub async fn pin_email(&mut self, account: &str, item: PinnedItem) -> Result<(), EngineError> {
        self.remote
            .pin_email(account, &item)
            .await
            .map_err(|message| EngineError::Persist {
                what: "pin",
                message,
            })?;

        let mut pinned = self.cache.get(account).pinned_items.clone();
        pinned.retain(|p| p.email_id != item.email_id);
        pinned.push(item);
        self.cache.update(
            account,
            CachePatch {
                pinned_items: Some(pinned),
                ..Default::default()
            },
        );
        Ok(())
    }

    /// Unpin an email. Persisted first; removing an id that is not pinned
    /// is a no-op locally.
    pub async fn unpin_email(&mut self, account: &str, email_id: &str) -> Result<(), EngineError> {
        self.remote
            .unpin_email(account, email_id)
            .await
            .map_err(|message| EngineError::Persist {
                what: "unpin",
                message,
            })?;

        let pinned: Vec<_> = self
            .cache
            .get(account)
            .pinned_items
            .iter()
            .filter(|p| p.email_id != email_id)
            .cloned()
            .collect();
        self.cache.update(
            account,
            CachePatch {
                pinned_items: Some(pinned),
                ..Default::default()
            },
        );
        Ok(())
    }

    /// One conversational turn. Approval commands are handled locally and
    /// never reach the assistant; everything else goes out with the
    /// account/email ids captured here, and the reply is applied to that
    /// context even if the user has since navigated away.
    pub async fn chat(&mut self, account: &str, message: &str) -> Result<ChatOutcome, EngineError> {
        match command::parse(message) {
            ParsedCommand::ApproveAll => {
                let report = self.approve(account, ApprovalSelection::All).await;
                return Ok(ChatOutcome::Approval(report));
            }
            ParsedCommand::ApproveNumbers(numbers) => {
                let report = self
                    .approve(account, ApprovalSelection::Numbers(numbers))
                    .await;
                return Ok(ChatOutcome::Approval(report));
            }
            ParsedCommand::NoMatch => {}
        }

        let (email_id, override_privacy) = {
            let view = self.views.entry(account.to_string()).or_default();
            let Some(id) = view.selected.clone() else {
                return Err(EngineError::NoSelection);
            };
            // A new turn clears any stale proposal before the reply can set
            // a fresh one.
            view.pending.cancel();
            let granted = view.privacy.as_ref().is_some_and(|p| p.override_granted);
            (id, granted)
        };

        let reply = self
            .remote
            .chat_about_email(account, &email_id, message, override_privacy)
            .await
            .map_err(EngineError::Fetch)?;

        if reply.stale {
            let notice = self.handle_stale(account, &email_id, reply.stale_message).await;
            return Ok(ChatOutcome::Stale(notice));
        }

        let view = self.views.entry(account.to_string()).or_default();
        let mut proposed = false;
        if view.selected.as_deref() == Some(email_id.as_str()) {
            if let Some(status) = reply.privacy_status {
                let granted = view.privacy.as_ref().is_some_and(|p| p.override_granted);
                view.privacy = Some(PrivacyStatus {
                    override_granted: granted || status.override_granted,
                    ..status
                });
            }
            if let Some(action) = reply.pending_action {
                view.pending.propose(action);
                proposed = true;
            }
        }

        Ok(ChatOutcome::Reply {
            text: reply.reply,
            proposed,
        })
    }

    /// Execute the outstanding proposal, then clear the slot. The proposal
    /// stays put if execution fails.
    pub async fn confirm_pending(
        &mut self,
        account: &str,
    ) -> Result<Option<PendingAction>, EngineError> {
        let (email_id, action) = {
            let view = self.views.entry(account.to_string()).or_default();
            let Some(id) = view.selected.clone() else {
                return Err(EngineError::NoSelection);
            };
            let Some(action) = view.pending.proposed().cloned() else {
                return Ok(None);
            };
            (id, action)
        };

        self.remote
            .execute_action(account, &email_id, &action)
            .await
            .map_err(|message| EngineError::Persist {
                what: "pending action",
                message,
            })?;

        self.views.entry(account.to_string()).or_default().pending.cancel();
        Ok(Some(action))
    }

    /// Discard the outstanding proposal without a side effect.
    pub fn cancel_pending(&mut self, account: &str) -> Option<PendingAction> {
        self.views.entry(account.to_string()).or_default().pending.take()
    }

    /// The stale cascade: best-effort "handled" dismissal upstream, removal
    /// from every collection that can reference the id, and a full view
    /// clear when the stale email is the open one. The cascade always
    /// completes; its own persistence failures are swallowed.
    async fn handle_stale(
        &mut self,
        account: &str,
        email_id: &str,
        message: Option<String>,
    ) -> StaleNotice {
        log::info!("stale reference {} in {}; cascading cleanup", email_id, account);

        if let Err(e) = self
            .remote
            .dismiss_attention_item(account, email_id, DismissReason::Handled)
            .await
        {
            log::debug!("best-effort dismissal of stale {} failed: {}", email_id, e);
        }

        let ids: Vec<String> = self
            .cache
            .get(account)
            .attention_items
            .iter()
            .map(|i| i.email_id.clone())
            .collect();
        let next_selection = navigate::next_after_removal(&ids, email_id);

        stale::purge_from_cache(&mut self.cache, account, email_id);

        let view = self.views.entry(account.to_string()).or_default();
        if view.selected.as_deref() == Some(email_id) {
            *view = ViewContext::default();
        }

        StaleNotice {
            email_id: email_id.to_string(),
            message: message
                .unwrap_or_else(|| "This email no longer exists in your mailbox".to_string()),
            next_selection,
        }
    }
}
