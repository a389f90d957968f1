//! Tree Traversal Primitives
//!
//! Pure recursive lookups. There are no parent pointers; parents are found by
//! walking down from the roots. Missing ids yield the empty result for the
//! shape (`None`, empty path, `false`), never a panic.

use crate::domain::{ItemId, Node};

/// Where an item lives: its parent (`None` at root level), the exact sibling
/// list holding it and its index within that list.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub parent: Option<&'a Node>,
    pub siblings: &'a [Node],
    pub index: usize,
}

impl<'a> Placement<'a> {
    pub fn parent_id(&self) -> Option<&'a ItemId> {
        self.parent.map(|p| &p.id)
    }
}

/// Depth-first search for an id.
pub fn find_by_id<'a>(nodes: &'a [Node], id: &ItemId) -> Option<&'a Node> {
    for node in nodes {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_by_id(node.children(), id) {
            return Some(found);
        }
    }
    None
}

pub fn contains(nodes: &[Node], id: &ItemId) -> bool {
    find_by_id(nodes, id).is_some()
}

pub fn find_parent_and_siblings<'a>(nodes: &'a [Node], id: &ItemId) -> Option<Placement<'a>> {
    fn walk<'a>(
        nodes: &'a [Node],
        parent: Option<&'a Node>,
        id: &ItemId,
    ) -> Option<Placement<'a>> {
        if let Some(index) = nodes.iter().position(|n| &n.id == id) {
            return Some(Placement {
                parent,
                siblings: nodes,
                index,
            });
        }
        nodes
            .iter()
            .filter(|n| n.is_folder())
            .find_map(|n| walk(n.children(), Some(n), id))
    }
    walk(nodes, None, id)
}

/// Ancestors from the root down to the item, inclusive. Empty if absent.
pub fn get_path(nodes: &[Node], id: &ItemId) -> Vec<Node> {
    fn walk(nodes: &[Node], id: &ItemId, path: &mut Vec<Node>) -> bool {
        for node in nodes {
            path.push(node.clone());
            if &node.id == id || walk(node.children(), id, path) {
                return true;
            }
            path.pop();
        }
        false
    }
    let mut path = Vec::new();
    if walk(nodes, id, &mut path) {
        path
    } else {
        Vec::new()
    }
}

/// True when `target` is `ancestor` itself or lies anywhere below it.
/// Non-folders have no descendants, so only the exact id matches them.
pub fn is_self_or_descendant(nodes: &[Node], ancestor: &ItemId, target: &ItemId) -> bool {
    if ancestor == target {
        return true;
    }
    match find_by_id(nodes, ancestor) {
        Some(node) => contains(node.children(), target),
        None => false,
    }
}

/// Render items as an indented list using recursive DFS.
/// Returns (node, depth) pairs in display order; children of folders that
/// are not expanded are skipped.
pub fn flatten_visible<F>(nodes: &[Node], is_expanded: F) -> Vec<(Node, usize)>
where
    F: Fn(&ItemId) -> bool,
{
    fn collect<F: Fn(&ItemId) -> bool>(
        nodes: &[Node],
        depth: usize,
        is_expanded: &F,
        result: &mut Vec<(Node, usize)>,
    ) {
        for node in crate::tree::order(nodes.to_vec()) {
            let open = node.is_folder() && is_expanded(&node.id);
            result.push((node.clone(), depth));
            if open {
                collect(node.children(), depth + 1, is_expanded, result);
            }
        }
    }

    let mut result = Vec::new();
    collect(nodes, 0, &is_expanded, &mut result);
    result
}
