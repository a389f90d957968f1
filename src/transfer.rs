//! Import / Export
//!
//! JSON documents holding either a single item or an array of items.
//! Imported items always get fresh local ids; whatever ids the document
//! carries are ignored.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Item, ItemId, Node, Tree, TreeError, TreeResult};
use crate::tree::{has_sibling_with_name, order, validate_label};

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Many(Vec<Node>),
    One(Node),
}

/// Parse and validate an import document. Labels are trimmed and must be
/// non-empty and unique among their siblings within the document.
pub fn parse_items(json: &str) -> TreeResult<Vec<Node>> {
    let document: Document = serde_json::from_str(json)
        .map_err(|e| TreeError::InvalidInput(format!("not an item or list of items: {e}")))?;
    let nodes = match document {
        Document::Many(nodes) => nodes,
        Document::One(node) => vec![node],
    };
    let prepared = prepare(&nodes)?;
    debug!(items = prepared.iter().map(|n| n.count()).sum::<usize>(), "parsed import document");
    Ok(prepared)
}

fn prepare(nodes: &[Node]) -> TreeResult<Vec<Node>> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let label = validate_label(&node.label)?;
        if has_sibling_with_name(&out, &label, None) {
            return Err(TreeError::NameConflict { label });
        }
        let mut item = node.with_children(prepare(node.children())?);
        item.id = ItemId::transient();
        item.label = label;
        item.created_at = None;
        item.updated_at = None;
        out.push(Arc::new(item));
    }
    Ok(order(out))
}

/// Pretty-printed array of every root item.
pub fn export_tree(tree: &Tree) -> TreeResult<String> {
    serde_json::to_string_pretty(tree).map_err(|e| TreeError::InvalidInput(e.to_string()))
}

/// Pretty-printed single item with its subtree.
pub fn export_item(item: &Item) -> TreeResult<String> {
    serde_json::to_string_pretty(item).map_err(|e| TreeError::InvalidInput(e.to_string()))
}
