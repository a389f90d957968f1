//! Tree Value
//!
//! The root-level sequence of items. Cloning a tree is cheap: it copies the
//! root vector of shared nodes, never the nodes themselves.

use serde::{Deserialize, Serialize};

use super::item::{ItemId, Node};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    roots: Vec<Node>,
}

impl Tree {
    pub fn new(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<Node> {
        self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of items, counted recursively.
    pub fn item_count(&self) -> usize {
        self.roots.iter().map(|n| n.count()).sum()
    }

    /// Every id in depth-first order.
    pub fn ids(&self) -> Vec<ItemId> {
        fn collect(nodes: &[Node], out: &mut Vec<ItemId>) {
            for node in nodes {
                out.push(node.id.clone());
                collect(node.children(), out);
            }
        }
        let mut out = Vec::new();
        collect(&self.roots, &mut out);
        out
    }
}

impl From<Vec<Node>> for Tree {
    fn from(roots: Vec<Node>) -> Self {
        Self::new(roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;
    use std::sync::Arc;

    #[test]
    fn test_counts_and_ids() {
        let tree = Tree::new(vec![
            Arc::new(Item::folder(
                "a",
                "A",
                vec![Arc::new(Item::note("n", "N", "")), Arc::new(Item::folder("b", "B", vec![]))],
            )),
            Arc::new(Item::folder("c", "C", vec![])),
        ]);
        assert_eq!(tree.item_count(), 4);
        let ids: Vec<String> = tree.ids().iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["a", "n", "b", "c"]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let tree = Tree::new(vec![Arc::new(Item::folder("a", "A", vec![]))]);
        let json = serde_json::to_value(&tree).unwrap();
        assert!(json.is_array());
        let back: Tree = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }
}
