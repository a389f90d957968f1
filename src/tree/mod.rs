//! Tree Utilities
//!
//! Pure helpers over [`Tree`](crate::domain::Tree) values:
//! - order: canonical sibling order
//! - traverse: lookups, ancestor paths, cycle detection, display flattening
//! - mutate: insert / delete / rename with structural sharing
//! - conflict: sibling name collisions
//! - moves: drag-drop and cut-paste validation
//! - copy: subtree duplication

mod conflict;
mod copy;
mod moves;
mod mutate;
mod order;
mod traverse;

pub use conflict::{has_sibling_with_name, normalize_label, validate_label};
pub use copy::{available_label, clone_with_fresh_ids, copy_label, duplicate_subtree};
pub use moves::{destination_siblings, index_in_parent, is_in_parent, plan_move};
pub use mutate::{delete, insert, reassign_ids, rename, update};
pub use order::{canonicalize, compare, compare_labels, order, LabelKey};
pub use traverse::{
    contains, find_by_id, find_parent_and_siblings, flatten_visible, get_path, is_self_or_descendant,
    Placement,
};
