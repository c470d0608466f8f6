pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod remote;

pub use config::EngineConfig;
pub use engine::command::{ParsedCommand, parse};
pub use engine::navigate::next_after_removal;
pub use engine::pending::PendingGate;
pub use engine::stale::StaleNotice;
pub use engine::store::{AccountCache, CachePatch, CacheStore};
pub use engine::{
    ApprovalReport, ApprovalSelection, ChatOutcome, Engine, SelectOutcome, ViewContext,
};
pub use error::EngineError;
pub use remote::{AnalysisOutcome, ChatReply, EmailDetail, MailStore};
