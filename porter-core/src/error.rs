//! Error types for porter-core.

use thiserror::Error;

/// Result type alias for porter-core operations.
pub type Result<T> = std::result::Result<T, PorterError>;

/// Errors that can occur while building rule tables or rewriting sources.
#[derive(Error, Debug)]
pub enum PorterError {
    /// Two registered rules target the exact same member of the same type.
    #[error("Duplicate rule for {declaring_type}.{member_name}")]
    DuplicateRule {
        /// Type named by both rules.
        declaring_type: String,
        /// Member named by both rules.
        member_name: String,
    },

    /// More than one rule applies to a single override.
    ///
    /// The rule table is ambiguous; this is never a per-file condition.
    #[error(
        "Ambiguous rules for {containing_type}.{member_name}: matched {}",
        candidates.join(", ")
    )]
    AmbiguousRule {
        /// Type containing the override being reconciled.
        containing_type: String,
        /// Name of the override.
        member_name: String,
        /// `Type.Member` of every matching rule.
        candidates: Vec<String>,
    },

    /// A rule was declared with missing or empty required fields.
    #[error("Invalid rule for {declaring_type}.{member_name}: {message}")]
    InvalidRule {
        /// Type named by the rule.
        declaring_type: String,
        /// Member named by the rule.
        member_name: String,
        /// What is wrong with it.
        message: String,
    },

    /// Source could not be turned into a syntax tree.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },

    /// No frontend for the requested source language.
    #[error("Unsupported language: {language}")]
    UnsupportedLanguage {
        /// Language name as requested.
        language: String,
    },

    /// Configuration file has an extension we do not know how to read.
    #[error("Unsupported configuration format: {path}")]
    UnsupportedFormat {
        /// Path of the offending file.
        path: String,
    },

    /// IO error reading configuration files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error for API models.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error for rule tables and API models.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
