//! Rule tables loaded from TOML.
//!
//! # Example
//!
//! ```toml
//! [[signature_change]]
//! type = "ModItem"
//! member = "Update"
//! note = "Update now takes a double"
//!
//! [[removed]]
//! type = "ModItem"
//! member = "OldHook"
//! note = "Use NewHook instead"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::registry::{RuleTable, RuleTableBuilder};
use crate::error::Result;

/// Root of a rules file. Both sections are optional.
#[derive(Debug, Deserialize, Default)]
pub struct RulesFile {
    #[serde(default)]
    pub signature_change: Vec<SignatureChangeRule>,

    #[serde(default)]
    pub removed: Vec<RemovedRule>,
}

/// A `[[signature_change]]` entry.
#[derive(Debug, Deserialize)]
pub struct SignatureChangeRule {
    #[serde(rename = "type")]
    pub declaring_type: String,
    pub member: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// A `[[removed]]` entry. The note is required.
#[derive(Debug, Deserialize)]
pub struct RemovedRule {
    #[serde(rename = "type")]
    pub declaring_type: String,
    pub member: String,
    pub note: String,
}

impl RulesFile {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Feed every entry into `builder`, signature changes first.
    pub fn register_into(&self, builder: &mut RuleTableBuilder) {
        for rule in &self.signature_change {
            builder.declare_signature_change(&rule.declaring_type, &rule.member, rule.note.as_deref());
        }
        for rule in &self.removed {
            builder.declare_removed(&rule.declaring_type, &rule.member, &rule.note);
        }
    }

    pub fn into_table(self) -> Result<RuleTable> {
        let mut builder = RuleTableBuilder::new();
        self.register_into(&mut builder);
        builder.build()
    }
}

impl RuleTable {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        RulesFile::from_toml_str(content)?.into_table()
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
