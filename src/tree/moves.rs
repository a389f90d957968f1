//! Drop/Move Validator
//!
//! Decides whether a drag-drop or cut-paste move is legal and computes the
//! resulting tree in one step.

use crate::domain::{ItemId, MoveError, Node, Tree};

use super::conflict::has_sibling_with_name;
use super::mutate::{delete, insert};
use super::traverse::{find_by_id, find_parent_and_siblings, is_self_or_descendant};

/// Sibling list a move into `target` would land in: the target folder's
/// children, or the roots for `None`.
pub fn destination_siblings<'a>(tree: &'a Tree, target: Option<&ItemId>) -> Result<&'a [Node], MoveError> {
    match target {
        None => Ok(tree.roots()),
        Some(target) => {
            let folder =
                find_by_id(tree.roots(), target).ok_or_else(|| MoveError::InvalidTarget(target.clone()))?;
            if !folder.is_folder() {
                return Err(MoveError::NotAFolder(target.clone()));
            }
            Ok(folder.children())
        }
    }
}

/// Validate moving `dragged` into `target` (root level for `None`) and
/// return the tree after the move. Removal and insertion are combined;
/// no intermediate tree escapes.
pub fn plan_move(tree: &Tree, dragged: &ItemId, target: Option<&ItemId>) -> Result<Tree, MoveError> {
    if target == Some(dragged) {
        return Err(MoveError::SelfDrop);
    }
    let node = find_by_id(tree.roots(), dragged).ok_or_else(|| MoveError::NotFound(dragged.clone()))?;

    let siblings = destination_siblings(tree, target)?;
    if target.is_none() && !node.is_folder() {
        return Err(MoveError::RootConstraint);
    }
    if let Some(target) = target {
        if is_self_or_descendant(tree.roots(), dragged, target) {
            return Err(MoveError::CycleDetected);
        }
    }
    if has_sibling_with_name(siblings, &node.label, Some(dragged)) {
        return Err(MoveError::NameConflict {
            label: node.label.clone(),
        });
    }

    let node = node.clone();
    let without = delete(tree, dragged);
    Ok(insert(&without, target, node))
}

/// Whether `id` already sits directly inside `parent` (root for `None`).
pub fn is_in_parent(tree: &Tree, id: &ItemId, parent: Option<&ItemId>) -> bool {
    find_parent_and_siblings(tree.roots(), id).is_some_and(|p| p.parent_id() == parent)
}

/// Index of `id` within its canonically ordered sibling list.
pub fn index_in_parent(tree: &Tree, id: &ItemId) -> Option<usize> {
    let placement = find_parent_and_siblings(tree.roots(), id)?;
    super::order::order(placement.siblings.to_vec())
        .iter()
        .position(|n| &n.id == id)
}
