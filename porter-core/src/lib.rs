//! Porter Core - rule-driven reconciliation of stale override signatures.
//!
//! When a framework changes the signature or accessibility of an overridable
//! member, every override of it in downstream code goes stale. This crate
//! finds those overrides, matches them against a table of migration rules and
//! rewrites their signatures to match the framework's current API, leaving a
//! short note next to each rewrite. Formatting, comments and bodies are kept
//! byte for byte.
//!
//! # Features
//!
//! - **Lossless syntax tree**: C# sources parsed with tree-sitter render back
//!   to the exact input
//! - **Rule tables**: built in code or loaded from TOML, frozen before use
//! - **Semantic model**: framework API loaded from TOML or JSON
//! - **Parallel rewriting**: independent files processed with Rayon
//!
//! # Usage
//!
//! ```no_run
//! use porter_core::{pipeline, ApiModel, RuleTable, SourceFile};
//! use std::path::Path;
//!
//! let api = ApiModel::from_path(Path::new("api.toml"))?;
//! let rules = RuleTable::from_path(Path::new("rules.toml"))?;
//!
//! let files = vec![SourceFile::from_path_and_source("MyItem.cs", "class MyItem : ModItem { }")];
//! for result in pipeline::rewrite_files_parallel(&files, &api, &rules, Some(4)) {
//!     println!("{}: changed={}", result.path, result.changed);
//! }
//! # Ok::<(), porter_core::PorterError>(())
//! ```

pub mod engine;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod rules;
pub mod semantic;
pub mod syntax;
pub mod types;

pub use engine::{rewrite_unit, OverrideRewriter};
pub use error::{PorterError, Result};
pub use rules::{RuleEntry, RuleTable, RuleTableBuilder};
pub use semantic::{ApiModel, SemanticFacade, SemanticModel};
pub use types::{RewriteResult, SourceFile};
