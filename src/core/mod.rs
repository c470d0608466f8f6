pub mod attention;
pub mod email;
pub mod privacy;
pub mod suggestion;

pub use attention::{AnalysisMethod, AttentionItem, DismissReason, ExtractedTask, Urgency};
pub use email::{AnalysisAudit, EmailSummary, InboxSummary, PinnedItem, TaskLink};
pub use privacy::{PendingAction, PrivacyStatus};
pub use suggestion::{ActionSuggestion, Confidence, RuleSuggestion, SuggestedAction};
