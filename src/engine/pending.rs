use crate::core::privacy::PendingAction;

/// One-slot confirm/cancel gate for an assistant-proposed action. Only one
/// proposal is ever outstanding per email context; proposing again replaces
/// the slot rather than stacking.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PendingGate {
    #[default]
    Idle,
    Proposed(PendingAction),
}

impl PendingGate {
    /// Put a proposal in the slot, returning whatever it replaced.
    pub fn propose(&mut self, action: PendingAction) -> Option<PendingAction> {
        let previous = self.take();
        *self = Self::Proposed(action);
        previous
    }

    /// Empty the slot, handing back the proposal if there was one.
    pub fn take(&mut self) -> Option<PendingAction> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Proposed(action) => Some(action),
        }
    }

    /// Discard any outstanding proposal without a side effect.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn proposed(&self) -> Option<&PendingAction> {
        match self {
            Self::Idle => None,
            Self::Proposed(action) => Some(action),
        }
    }

    pub fn is_proposed(&self) -> bool {
        matches!(self, Self::Proposed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::suggestion::SuggestedAction;

    fn proposal(reason: &str) -> PendingAction {
        PendingAction {
            action: SuggestedAction::Archive,
            reason: reason.to_string(),
            label_id: None,
            label_name: None,
            task_title: None,
        }
    }

    #[test]
    fn propose_replaces_rather_than_stacks() {
        let mut gate = PendingGate::default();
        assert_eq!(gate.propose(proposal("first")), None);

        let replaced = gate.propose(proposal("second"));
        assert_eq!(replaced.unwrap().reason, "first");
        assert_eq!(gate.proposed().unwrap().reason, "second");
    }

    #[test]
    fn take_empties_the_slot() {
        let mut gate = PendingGate::default();
        gate.propose(proposal("only"));

        assert_eq!(gate.take().unwrap().reason, "only");
        assert!(!gate.is_proposed());
        assert_eq!(gate.take(), None);
    }

    #[test]
    fn cancel_discards_silently() {
        let mut gate = PendingGate::default();
        gate.propose(proposal("doomed"));
        gate.cancel();
        assert_eq!(gate, PendingGate::Idle);
    }
}
