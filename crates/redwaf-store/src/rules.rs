//! Rule-file reading for the fixed inspection categories

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::{Result, StoreError};

/// Inspection categories, one rule file and one store set each.
/// Order here is the seeding order.
pub const RULE_CATEGORIES: &[&str] = &["url", "args", "post", "cookie", "user-agent", "whiteurl"];

/// Read the rule file for a category: one pattern per line, trimmed,
/// blank lines dropped, source order preserved
///
/// A missing file yields an empty list; the category's store set is still
/// rewritten (to empty) so stale rules never survive a seed.
///
/// # Errors
///
/// Returns `RuleFile` only when the file exists but cannot be read.
pub fn read_rule_file(dir: &Path, category: &str) -> Result<Vec<String>> {
    let path = dir.join(category);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(StoreError::RuleFile { path, source }),
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
