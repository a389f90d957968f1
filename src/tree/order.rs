//! Ordering Policy
//!
//! Canonical sibling order: folders, then notes, then tasks; within a type,
//! alphabetical by label, ignoring case. Accented letters sort with their
//! base letter and Han characters by their pinyin reading. Stored order
//! carries no meaning, so every writer re-sorts and every reader may re-sort
//! freely.

use std::cmp::Ordering;
use std::sync::Arc;

use pinyin::ToPinyin;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::{Item, ItemType, Node};

/// Collation key of a label. Labels compare by `primary` (base letters),
/// then `secondary` (accents), then the raw label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LabelKey {
    primary: String,
    secondary: String,
    raw: String,
}

impl LabelKey {
    pub fn new(label: &str) -> Self {
        let mut primary = String::with_capacity(label.len());
        let mut secondary = String::with_capacity(label.len());
        for c in label.nfkd() {
            if let Some(reading) = c.to_pinyin() {
                primary.push_str(reading.plain());
                secondary.push_str(reading.plain());
                continue;
            }
            let lower = c.to_lowercase();
            if !is_combining_mark(c) {
                primary.extend(lower.clone());
            }
            secondary.extend(lower);
        }
        Self {
            primary,
            secondary,
            raw: label.to_string(),
        }
    }
}

/// Locale-aware, case-insensitive label comparison. Total: labels that
/// collate equal fall back to their raw text.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    LabelKey::new(a).cmp(&LabelKey::new(b))
}

pub fn compare(a: &Item, b: &Item) -> Ordering {
    a.item_type()
        .cmp(&b.item_type())
        .then_with(|| compare_labels(&a.label, &b.label))
}

fn sort_key(item: &Item) -> (ItemType, LabelKey) {
    (item.item_type(), LabelKey::new(&item.label))
}

/// Sort a sibling list into canonical order.
pub fn order(mut siblings: Vec<Node>) -> Vec<Node> {
    siblings.sort_by_cached_key(|n| sort_key(n));
    siblings
}

/// Canonical order applied at every level. Nodes whose subtree is already
/// canonical are reused as-is.
pub fn canonicalize(nodes: &[Node]) -> Vec<Node> {
    let rebuilt = nodes
        .iter()
        .map(|node| {
            if node.is_folder() {
                let children = canonicalize(node.children());
                let unchanged = children
                    .iter()
                    .zip(node.children())
                    .all(|(a, b)| Arc::ptr_eq(a, b));
                if unchanged {
                    node.clone()
                } else {
                    Arc::new(node.with_children(children))
                }
            } else {
                node.clone()
            }
        })
        .collect();
    order(rebuilt)
}
