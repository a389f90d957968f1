//! Conflict Validator
//!
//! Sibling labels are unique after trimming and case-folding.

use crate::domain::{ItemId, Node, TreeError, TreeResult};

pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Whether some sibling other than `exclude` already uses `candidate`.
/// Blank labels never match anything.
pub fn has_sibling_with_name(siblings: &[Node], candidate: &str, exclude: Option<&ItemId>) -> bool {
    let wanted = normalize_label(candidate);
    if wanted.is_empty() {
        return false;
    }
    siblings
        .iter()
        .filter(|s| exclude != Some(&s.id))
        .any(|s| normalize_label(&s.label) == wanted)
}

/// Trim a user-supplied label, rejecting blank ones.
pub fn validate_label(label: &str) -> TreeResult<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(TreeError::InvalidInput("label must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
