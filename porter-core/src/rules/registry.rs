//! Migration rules for stale overrides.
//!
//! Rules are collected with a [`RuleTableBuilder`] and frozen into a
//! [`RuleTable`] before any source is rewritten. The table is plain immutable
//! data, so one instance can be shared by every file in a parallel run.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PorterError, Result};
use crate::semantic::SemanticFacade;

/// Prefix put in front of the note of a removed-member rule.
pub const REMOVED_NOTE_PREFIX: &str = "Note: Removed. ";

/// One migration rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Type the rule applies to; also matches overrides in derived types.
    pub declaring_type: String,
    /// Simple name of the overridden member.
    pub member_name: String,
    /// Explanation left on rewritten declarations.
    pub note: Option<String>,
    /// Whether the override's signature should be rebuilt from the base.
    /// Rules without it only leave their note.
    pub signature_changed: bool,
}

impl RuleEntry {
    /// The member's signature changed; overrides get rebuilt from the base.
    pub fn signature_change(
        declaring_type: impl Into<String>,
        member_name: impl Into<String>,
        note: Option<&str>,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            member_name: member_name.into(),
            note: note.map(str::to_string),
            signature_changed: true,
        }
    }

    /// The member is gone; overrides keep their signature and get the note.
    pub fn removed(
        declaring_type: impl Into<String>,
        member_name: impl Into<String>,
        note: &str,
    ) -> Self {
        let note = note.trim();
        Self {
            declaring_type: declaring_type.into(),
            member_name: member_name.into(),
            note: (!note.is_empty()).then(|| format!("{}{}", REMOVED_NOTE_PREFIX, note)),
            signature_changed: false,
        }
    }

    /// The note, if it has any content.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().filter(|n| !n.trim().is_empty())
    }

    fn label(&self) -> String {
        format!("{}.{}", self.declaring_type, self.member_name)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |message: &str| PorterError::InvalidRule {
            declaring_type: self.declaring_type.clone(),
            member_name: self.member_name.clone(),
            message: message.to_string(),
        };

        if self.declaring_type.trim().is_empty() {
            return Err(invalid("declaring type is empty"));
        }
        if self.member_name.trim().is_empty() {
            return Err(invalid("member name is empty"));
        }
        if !self.signature_changed && self.note().is_none() {
            return Err(invalid("removed members need a note"));
        }
        Ok(())
    }
}

/// Collects rules; append-only.
#[derive(Clone, Debug, Default)]
pub struct RuleTableBuilder {
    entries: Vec<RuleEntry>,
}

impl RuleTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: RuleEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn declare_signature_change(
        &mut self,
        declaring_type: &str,
        member_name: &str,
        note: Option<&str>,
    ) -> &mut Self {
        self.register(RuleEntry::signature_change(declaring_type, member_name, note))
    }

    pub fn declare_removed(&mut self, declaring_type: &str, member_name: &str, note: &str) -> &mut Self {
        self.register(RuleEntry::removed(declaring_type, member_name, note))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate every rule and freeze the table.
    ///
    /// Fails on malformed rules and on two rules naming the same member of the
    /// same type. Rules that only collide through inheritance can't be seen
    /// here; [`RuleTable::find`] reports those.
    pub fn build(self) -> Result<RuleTable> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut by_member: HashMap<String, Vec<usize>> = HashMap::new();

        for (index, entry) in self.entries.iter().enumerate() {
            entry.validate()?;
            if !seen.insert((entry.declaring_type.clone(), entry.member_name.clone())) {
                return Err(PorterError::DuplicateRule {
                    declaring_type: entry.declaring_type.clone(),
                    member_name: entry.member_name.clone(),
                });
            }
            by_member
                .entry(entry.member_name.clone())
                .or_default()
                .push(index);
        }

        info!(rules = self.entries.len(), "Rule table built");

        Ok(RuleTable {
            entries: self.entries,
            by_member,
        })
    }
}

/// Frozen set of migration rules.
#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    entries: Vec<RuleEntry>,
    by_member: HashMap<String, Vec<usize>>,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleEntry> {
        self.entries.iter()
    }

    /// The rule for member `member_name` of `containing_type`.
    ///
    /// A rule applies when its member name matches and its declaring type is
    /// `containing_type` or one of its ancestors. More than one applicable rule
    /// is an error: the table itself is ambiguous.
    pub fn find(
        &self,
        facade: &dyn SemanticFacade,
        containing_type: &str,
        member_name: &str,
    ) -> Result<Option<&RuleEntry>> {
        let Some(indices) = self.by_member.get(member_name) else {
            return Ok(None);
        };

        let matches: Vec<&RuleEntry> = indices
            .iter()
            .map(|&i| &self.entries[i])
            .filter(|entry| {
                facade.same_type(containing_type, &entry.declaring_type)
                    || facade.is_ancestor(containing_type, &entry.declaring_type)
            })
            .collect();

        match matches.as_slice() {
            [] => Ok(None),
            [entry] => {
                debug!(
                    containing_type,
                    member = member_name,
                    rule = %entry.label(),
                    "Rule matched"
                );
                Ok(Some(*entry))
            }
            _ => Err(PorterError::AmbiguousRule {
                containing_type: containing_type.to_string(),
                member_name: member_name.to_string(),
                candidates: matches.iter().map(|e| e.label()).collect(),
            }),
        }
    }
}
