//! Drag State
//!
//! The single drag source plus the target currently hovered. Cleared on every
//! drag end, whatever the outcome.

use crate::domain::ItemId;

/// Where a dragged item would land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Become a child of this folder.
    Folder(ItemId),
    /// Top level.
    Root,
}

impl DropTarget {
    pub fn folder_id(&self) -> Option<&ItemId> {
        match self {
            DropTarget::Folder(id) => Some(id),
            DropTarget::Root => None,
        }
    }
}

impl From<Option<ItemId>> for DropTarget {
    fn from(target: Option<ItemId>) -> Self {
        target.map_or(DropTarget::Root, DropTarget::Folder)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    source: Option<ItemId>,
    hovered: Option<DropTarget>,
    /// Whether the hovered target would accept the drop.
    hover_valid: bool,
}

impl DragState {
    pub fn source(&self) -> Option<&ItemId> {
        self.source.as_ref()
    }

    pub fn hovered(&self) -> Option<&DropTarget> {
        self.hovered.as_ref()
    }

    pub fn hover_valid(&self) -> bool {
        self.hover_valid
    }

    pub fn is_dragging(&self) -> bool {
        self.source.is_some()
    }

    pub(crate) fn start(&mut self, source: ItemId) {
        *self = Self {
            source: Some(source),
            ..Self::default()
        };
    }

    pub(crate) fn set_hover(&mut self, target: DropTarget, valid: bool) {
        self.hovered = Some(target);
        self.hover_valid = valid;
    }

    /// Reset and hand back the source, if any.
    pub(crate) fn finish(&mut self) -> Option<ItemId> {
        std::mem::take(self).source
    }

    pub(crate) fn remap_source(&mut self, from: &ItemId, to: &ItemId) {
        if self.source.as_ref() == Some(from) {
            self.source = Some(to.clone());
        }
    }
}
