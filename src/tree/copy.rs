//! Subtree duplication
//!
//! Deep clones with fresh ids at every level and `(copy)` labels that do not
//! collide with the destination siblings.

use std::sync::Arc;

use crate::domain::{Item, ItemId, Node};

use super::conflict::has_sibling_with_name;

/// `"<base> (copy)"`, or `"<base> (copy N)"` for the lowest N >= 2 that is
/// free among `siblings`. Gaps in an existing numbered series are reused.
pub fn copy_label(base: &str, siblings: &[Node]) -> String {
    let base = base.trim();
    let first = format!("{base} (copy)");
    if !has_sibling_with_name(siblings, &first, None) {
        return first;
    }
    (2..)
        .map(|n| format!("{base} (copy {n})"))
        .find(|candidate| !has_sibling_with_name(siblings, candidate, None))
        .unwrap_or(first)
}

/// `base` itself when free, otherwise the next copy label.
pub fn available_label(base: &str, siblings: &[Node]) -> String {
    if has_sibling_with_name(siblings, base, None) {
        copy_label(base, siblings)
    } else {
        base.trim().to_string()
    }
}

/// Deep clone with a transient id on every node and no server timestamps.
pub fn clone_with_fresh_ids(item: &Item) -> Item {
    let mut copy = if item.is_folder() {
        let children = item
            .children()
            .iter()
            .map(|c| Arc::new(clone_with_fresh_ids(c)))
            .collect();
        item.with_children(children)
    } else {
        item.clone()
    };
    copy.id = ItemId::transient();
    copy.created_at = None;
    copy.updated_at = None;
    copy
}

/// Fresh-id clone of `item` labelled with the next free copy label.
pub fn duplicate_subtree(item: &Item, siblings: &[Node]) -> Item {
    let mut copy = clone_with_fresh_ids(item);
    copy.label = copy_label(&item.label, siblings);
    copy
}
