use serde::{Deserialize, Serialize};

fn default_analysis_limit() -> usize {
    25
}

fn default_snooze_hours() -> i64 {
    24
}

fn default_max_examples() -> usize {
    3
}

/// Tunables for the triage engine. Hosts typically deserialize this from
/// their own settings store; `Default` matches the shipped behavior.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EngineConfig {
    /// How many recent emails an analysis run may look at.
    #[serde(default = "default_analysis_limit")]
    pub analysis_limit: usize,
    /// Snooze window applied when the caller does not pick one.
    #[serde(default = "default_snooze_hours")]
    pub default_snooze_hours: i64,
    /// Cap on the example list carried by each rule suggestion.
    #[serde(default = "default_max_examples")]
    pub max_suggestion_examples: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analysis_limit: default_analysis_limit(),
            default_snooze_hours: default_snooze_hours(),
            max_suggestion_examples: default_max_examples(),
        }
    }
}
