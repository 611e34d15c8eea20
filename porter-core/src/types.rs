//! Input and output records of the rewrite pipeline.

use serde::{Deserialize, Serialize};

/// A source file handed to the pipeline. The caller does the reading.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub source: String,
    /// Frontend to use; guessed from the path when empty.
    #[serde(default)]
    pub language: String,
}

impl SourceFile {
    pub fn new(path: String, source: String, language: String) -> Self {
        Self {
            path,
            source,
            language,
        }
    }

    /// A file whose language follows from its extension.
    pub fn from_path_and_source(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
            language: String::new(),
        }
    }
}

/// Result of rewriting a file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RewriteResult {
    pub path: String,
    pub success: bool,
    /// Rewritten source; `None` on failure.
    pub source: Option<String>,
    /// Whether the output differs from the input.
    pub changed: bool,
    pub error: Option<String>,
}

impl RewriteResult {
    /// Create a successful result.
    pub fn ok(path: impl Into<String>, original: &str, rewritten: String) -> Self {
        Self {
            path: path.into(),
            success: true,
            changed: rewritten != original,
            source: Some(rewritten),
            error: None,
        }
    }

    /// Create a failed result.
    pub fn err(path: impl Into<String>, error: String) -> Self {
        Self {
            path: path.into(),
            success: false,
            source: None,
            changed: false,
            error: Some(error),
        }
    }
}
