//! Migration rules: which overridden members changed and what to say about it.

pub mod config;
pub mod registry;

pub use config::RulesFile;
pub use registry::{RuleEntry, RuleTable, RuleTableBuilder, REMOVED_NOTE_PREFIX};
