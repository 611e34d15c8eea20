//! Parse, rewrite and render whole files.
//!
//! Files are independent: each gets its own [`SemanticModel`] over the shared
//! [`ApiModel`], and the frozen [`RuleTable`] is read from every worker.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::engine::rewrite_unit;
use crate::error::{PorterError, Result};
use crate::parser::{language_for_path, parse_source};
use crate::rules::RuleTable;
use crate::semantic::{ApiModel, SemanticModel};
use crate::syntax::SourceText;
use crate::types::{RewriteResult, SourceFile};

/// Rewrite one source text and return the new text.
pub fn rewrite_text(source: &str, language: &str, api: &ApiModel, rules: &RuleTable) -> Result<String> {
    let unit = parse_source(source, language)?;
    let model = SemanticModel::new(api, &unit);
    let rewritten = rewrite_unit(unit, &model, rules)?;
    Ok(rewritten.to_source())
}

/// Rewrite one file, reporting failures in the result instead of returning them.
pub fn rewrite_source(file: &SourceFile, api: &ApiModel, rules: &RuleTable) -> RewriteResult {
    let language = if file.language.is_empty() {
        match language_for_path(&file.path) {
            Some(language) => language,
            None => {
                let err = PorterError::UnsupportedLanguage {
                    language: file.path.clone(),
                };
                return RewriteResult::err(file.path.clone(), err.to_string());
            }
        }
    } else {
        file.language.as_str()
    };

    match rewrite_text(&file.source, language, api, rules) {
        Ok(rewritten) => {
            let result = RewriteResult::ok(file.path.clone(), &file.source, rewritten);
            debug!(path = %file.path, changed = result.changed, "File rewritten");
            result
        }
        Err(e) => {
            warn!(path = %file.path, error = %e, "Failed to rewrite file");
            RewriteResult::err(file.path.clone(), e.to_string())
        }
    }
}

/// Rewrite many files in parallel using rayon.
///
/// Results come back in input order, one per file.
pub fn rewrite_files_parallel(
    files: &[SourceFile],
    api: &ApiModel,
    rules: &RuleTable,
    num_threads: Option<usize>,
) -> Vec<RewriteResult> {
    let pool = match num_threads {
        Some(n) if n > 0 => rayon::ThreadPoolBuilder::new().num_threads(n).build().ok(),
        _ => None,
    };

    let rewrite_fn = |file: &SourceFile| rewrite_source(file, api, rules);

    match pool {
        Some(pool) => pool.install(|| files.par_iter().map(rewrite_fn).collect()),
        None => files.par_iter().map(rewrite_fn).collect(),
    }
}
