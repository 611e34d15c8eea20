//! Source frontends.
//!
//! Each frontend turns source text into the lossless
//! [`CompilationUnit`](crate::syntax::CompilationUnit) the rewriter works on.

use crate::error::{PorterError, Result};
use crate::syntax::CompilationUnit;

pub mod csharp;

mod helpers;

/// Parse source code for a specific language.
pub fn parse_source(source: &str, language: &str) -> Result<CompilationUnit> {
    match language.to_lowercase().as_str() {
        "csharp" | "cs" | "c#" => csharp::parse(source),
        _ => Err(PorterError::UnsupportedLanguage {
            language: language.to_string(),
        }),
    }
}

/// Get supported languages.
pub fn supported_languages() -> &'static [&'static str] {
    &["csharp", "cs", "c#"]
}

/// Guess the language from a file path.
pub fn language_for_path(path: &str) -> Option<&'static str> {
    match std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())?
    {
        "cs" => Some("csharp"),
        _ => None,
    }
}
