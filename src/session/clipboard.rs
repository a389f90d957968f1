//! Clipboard
//!
//! At most one entry. The snapshot is an immutable node, so later edits to
//! the tree never leak into it.

use crate::domain::{ItemId, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    Copy,
    Cut,
}

#[derive(Debug, Clone)]
pub struct Clipboard {
    snapshot: Node,
    mode: ClipboardMode,
}

impl Clipboard {
    pub fn copy(snapshot: Node) -> Self {
        Self {
            snapshot,
            mode: ClipboardMode::Copy,
        }
    }

    pub fn cut(snapshot: Node) -> Self {
        Self {
            snapshot,
            mode: ClipboardMode::Cut,
        }
    }

    pub fn snapshot(&self) -> &Node {
        &self.snapshot
    }

    pub fn mode(&self) -> ClipboardMode {
        self.mode
    }

    /// Id of the item a cut will move. `None` for copies.
    pub fn cut_source(&self) -> Option<&ItemId> {
        match self.mode {
            ClipboardMode::Cut => Some(&self.snapshot.id),
            ClipboardMode::Copy => None,
        }
    }

    pub(crate) fn with_snapshot(&self, snapshot: Node) -> Self {
        Self {
            snapshot,
            mode: self.mode,
        }
    }
}

/// Outcome of a paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// The cut item was moved into the destination.
    Moved,
    /// A fresh copy was created with this id.
    Pasted(ItemId),
    /// Cut item pasted back into its own parent; nothing happened.
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;
    use std::sync::Arc;

    #[test]
    fn test_cut_source() {
        let node = Arc::new(Item::note("n", "N", ""));
        assert_eq!(Clipboard::copy(node.clone()).cut_source(), None);
        let cut = Clipboard::cut(node);
        assert_eq!(cut.cut_source(), Some(&ItemId::from("n")));
        assert_eq!(cut.mode(), ClipboardMode::Cut);
    }
}
