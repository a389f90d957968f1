//! Structural Mutators
//!
//! Pure functions from a tree to a new tree. Inputs are never modified; only
//! the path from the root to the edited sibling list is reallocated, every
//! other subtree is shared with the input.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Item, ItemId, Node, Tree};

use super::order::order;

// Rebuilds the path down to the sibling list holding `id` and hands that
// list, plus the item's index, to `edit`. `None` when the id is absent.
fn edit_siblings_of(
    nodes: &[Node],
    id: &ItemId,
    edit: &mut dyn FnMut(&mut Vec<Node>, usize),
) -> Option<Vec<Node>> {
    if let Some(pos) = nodes.iter().position(|n| &n.id == id) {
        let mut out = nodes.to_vec();
        edit(&mut out, pos);
        return Some(out);
    }
    for (i, node) in nodes.iter().enumerate() {
        if !node.is_folder() {
            continue;
        }
        if let Some(children) = edit_siblings_of(node.children(), id, edit) {
            let mut out = nodes.to_vec();
            out[i] = Arc::new(node.with_children(children));
            return Some(out);
        }
    }
    None
}

/// Insert `item` under the folder `parent`, or at root level when `parent`
/// is `None`. An absent or non-folder parent leaves the tree unchanged;
/// callers validate first.
pub fn insert(tree: &Tree, parent: Option<&ItemId>, item: Node) -> Tree {
    let Some(parent) = parent else {
        let mut roots = tree.roots().to_vec();
        roots.push(item);
        return Tree::new(order(roots));
    };

    let mut item = Some(item);
    let edited = edit_siblings_of(tree.roots(), parent, &mut |siblings, pos| {
        let folder = siblings[pos].clone();
        if !folder.is_folder() {
            return;
        }
        if let Some(item) = item.take() {
            let mut children = folder.children().to_vec();
            children.push(item);
            siblings[pos] = Arc::new(folder.with_children(order(children)));
        }
    });
    match edited {
        Some(roots) if item.is_none() => Tree::new(roots),
        _ => tree.clone(),
    }
}

/// Remove the item (and its subtree) wherever it occurs.
pub fn delete(tree: &Tree, id: &ItemId) -> Tree {
    let edited = edit_siblings_of(tree.roots(), id, &mut |siblings, pos| {
        siblings.remove(pos);
    });
    Tree::new(edited.unwrap_or_else(|| tree.roots().to_vec()))
}

/// Replace the item with `f(item)`, re-sorting its siblings.
pub fn update<F>(tree: &Tree, id: &ItemId, f: F) -> Tree
where
    F: FnOnce(&Item) -> Item,
{
    let mut f = Some(f);
    let edited = edit_siblings_of(tree.roots(), id, &mut |siblings, pos| {
        if let Some(f) = f.take() {
            let next = f(&siblings[pos]);
            siblings[pos] = Arc::new(next);
            let sorted = order(std::mem::take(siblings));
            *siblings = sorted;
        }
    });
    edited.map(Tree::new).unwrap_or_else(|| tree.clone())
}

/// Replace only the label. Conflict-freedom is the caller's job.
pub fn rename(tree: &Tree, id: &ItemId, label: &str) -> Tree {
    update(tree, id, |item| item.with_label(label))
}

/// Swap ids (and server timestamps) for the confirmed items in `confirmed`,
/// keyed by the id currently in the tree. Untouched subtrees are shared.
pub fn reassign_ids(tree: &Tree, confirmed: &HashMap<ItemId, Item>) -> Tree {
    fn walk(nodes: &[Node], confirmed: &HashMap<ItemId, Item>) -> Option<Vec<Node>> {
        let mut changed = false;
        let out: Vec<Node> = nodes
            .iter()
            .map(|node| {
                let children = if node.is_folder() {
                    walk(node.children(), confirmed)
                } else {
                    None
                };
                let server = confirmed.get(&node.id);
                if server.is_none() && children.is_none() {
                    return node.clone();
                }
                changed = true;
                let mut next = match children {
                    Some(children) => node.with_children(children),
                    None => (**node).clone(),
                };
                if let Some(server) = server {
                    next.id = server.id.clone();
                    next.created_at = server.created_at;
                    next.updated_at = server.updated_at;
                }
                Arc::new(next)
            })
            .collect();
        changed.then_some(out)
    }
    walk(tree.roots(), confirmed)
        .map(Tree::new)
        .unwrap_or_else(|| tree.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::find_by_id;

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    fn sample() -> Tree {
        Tree::new(vec![
            Arc::new(Item::folder(
                "A",
                "A",
                vec![Arc::new(Item::folder("B", "B", vec![])), Arc::new(Item::note("n", "Note", ""))],
            )),
            Arc::new(Item::folder("C", "C", vec![Arc::new(Item::task("t", "Task", false))])),
        ])
    }

    #[test]
    fn test_insert_at_root_reorders() {
        let tree = sample();
        let next = insert(&tree, None, Arc::new(Item::folder("0", "0 first", vec![])));
        assert_eq!(next.roots()[0].id, id("0"));
        assert_eq!(next.roots().len(), 3);
        assert_eq!(tree.roots().len(), 2);
    }

    #[test]
    fn test_insert_shares_untouched_subtrees() {
        let tree = sample();
        let next = insert(&tree, Some(&id("B")), Arc::new(Item::note("x", "X", "")));

        assert!(Arc::ptr_eq(&tree.roots()[1], &next.roots()[1]));
        let old_a = &tree.roots()[0];
        let new_a = &next.roots()[0];
        assert!(!Arc::ptr_eq(old_a, new_a));
        assert!(Arc::ptr_eq(&old_a.children()[1], &new_a.children()[1]));
        assert_eq!(find_by_id(next.roots(), &id("B")).unwrap().children().len(), 1);
    }

    #[test]
    fn test_insert_into_missing_or_non_folder_is_noop() {
        let tree = sample();
        let item = Arc::new(Item::note("x", "X", ""));
        assert_eq!(insert(&tree, Some(&id("nope")), item.clone()), tree);
        assert_eq!(insert(&tree, Some(&id("n")), item), tree);
    }

    #[test]
    fn test_delete_nested_and_missing() {
        let tree = sample();
        let before = tree.clone();
        let next = delete(&tree, &id("n"));
        assert!(find_by_id(next.roots(), &id("n")).is_none());
        assert_eq!(tree, before);

        let same = delete(&tree, &id("missing"));
        assert_eq!(same, tree);
    }

    #[test]
    fn test_delete_removes_subtree() {
        let next = delete(&sample(), &id("A"));
        assert_eq!(next.item_count(), 2);
        assert!(find_by_id(next.roots(), &id("B")).is_none());
    }

    #[test]
    fn test_rename_only_touches_label() {
        let tree = sample();
        let next = rename(&tree, &id("t"), "Renamed");
        let task = find_by_id(next.roots(), &id("t")).unwrap();
        assert_eq!(task.label, "Renamed");
        assert_eq!(task.completed(), Some(false));
        assert_eq!(find_by_id(tree.roots(), &id("t")).unwrap().label, "Task");
    }

    #[test]
    fn test_rename_resorts_siblings() {
        let tree = sample();
        let next = rename(&tree, &id("A"), "Z");
        assert_eq!(next.roots()[0].id, id("C"));
        assert_eq!(next.roots()[1].id, id("A"));
    }

    #[test]
    fn test_reassign_ids() {
        let tree = insert(&sample(), Some(&id("C")), Arc::new(Item::note("tmp-1", "New", "")));
        let mut server = Item::note("srv-9", "New", "");
        server.created_at = Some(chrono::Utc::now());
        let confirmed = HashMap::from([(id("tmp-1"), server)]);

        let next = reassign_ids(&tree, &confirmed);
        let item = find_by_id(next.roots(), &id("srv-9")).unwrap();
        assert!(item.created_at.is_some());
        assert!(find_by_id(next.roots(), &id("tmp-1")).is_none());
        assert!(Arc::ptr_eq(&tree.roots()[0], &next.roots()[0]));
    }
}
