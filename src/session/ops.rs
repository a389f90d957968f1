//! Session operations: CRUD, clipboard, drag-drop, undo/redo, import/export.
//!
//! Every check runs before anything is committed, so a rejected call never
//! changes local state or reaches the network.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{ItemDraft, ItemId, ItemPatch, ItemType, Node, Tree, TreeError, TreeResult};
use crate::repository::{Persistence, TreeCache};
use crate::transfer;
use crate::tree;

use super::clipboard::{Clipboard, ClipboardMode, PasteOutcome};
use super::drag::DropTarget;
use super::pending::{PendingOp, PersistRequest};
use super::quota::check_quota;
use super::TreeSession;

/// Where an import lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Replace the whole tree. Not undoable.
    ReplaceAll,
    /// Insert under the selected folder (or the folder holding the selected
    /// item), or at root level without a selection.
    IntoSelection,
}

fn rejected(action: &'static str) -> impl Fn(&TreeError) {
    move |e| info!(action, error = %e, "operation rejected")
}

impl<P: Persistence, C: TreeCache> TreeSession<P, C> {
    // -- create ---------------------------------------------------------------

    pub fn begin_add_item(&mut self, draft: ItemDraft, parent: Option<&ItemId>) -> TreeResult<PendingOp> {
        self.stage_add(draft, parent).map(|(_, op)| op)
    }

    fn stage_add(&mut self, draft: ItemDraft, parent: Option<&ItemId>) -> TreeResult<(ItemId, PendingOp)> {
        let label = tree::validate_label(&draft.label)?;
        let current = self.history.present();
        let siblings = tree::destination_siblings(current, parent)?;
        if parent.is_none() && draft.item_type != ItemType::Folder {
            return Err(TreeError::RootConstraintViolation);
        }
        if tree::has_sibling_with_name(siblings, &label, None) {
            return Err(TreeError::NameConflict { label });
        }
        check_quota(self.config.item_limit, current.item_count(), 1)?;

        let node: Node = Arc::new(ItemDraft { label, ..draft }.into_item(ItemId::transient()));
        let next = tree::insert(current, parent, node.clone());
        let local = node.id.clone();
        let op = self.commit(
            next,
            PersistRequest::Create {
                parent: parent.cloned(),
                items: vec![node],
            },
        );
        self.place_new(&local, parent);
        Ok((local, op))
    }

    /// Create an item under `parent` (root level for `None`). Returns the
    /// server-assigned id.
    pub async fn add_item(&mut self, draft: ItemDraft, parent: Option<&ItemId>) -> TreeResult<ItemId> {
        let (local, op) = self.stage_add(draft, parent).inspect_err(rejected("add_item"))?;
        self.run(op).await?;
        Ok(self.resolve(&local))
    }

    // New items become selected and their folder opens.
    fn place_new(&mut self, id: &ItemId, parent: Option<&ItemId>) {
        self.selection = Some(id.clone());
        if let Some(parent) = parent {
            self.expansion.set(parent.clone(), true);
            self.persist_expansion();
        }
    }

    /// Clone `id` with all its descendants next to the original, labelled
    /// `(copy)`, `(copy 2)`, ... Returns the new item's server id.
    pub async fn duplicate_item(&mut self, id: &ItemId) -> TreeResult<ItemId> {
        let (local, op) = self.stage_duplicate(id).inspect_err(rejected("duplicate_item"))?;
        self.run(op).await?;
        Ok(self.resolve(&local))
    }

    fn stage_duplicate(&mut self, id: &ItemId) -> TreeResult<(ItemId, PendingOp)> {
        let current = self.history.present();
        let placement =
            tree::find_parent_and_siblings(current.roots(), id).ok_or_else(|| TreeError::NotFound(id.clone()))?;
        let source = &placement.siblings[placement.index];
        check_quota(self.config.item_limit, current.item_count(), source.count())?;

        let copy: Node = Arc::new(tree::duplicate_subtree(source, placement.siblings));
        let parent = placement.parent_id().cloned();
        let next = tree::insert(current, parent.as_ref(), copy.clone());
        let local = copy.id.clone();
        debug!(source = %id, label = %copy.label, items = copy.count(), "duplicating subtree");
        let op = self.commit(
            next,
            PersistRequest::Create {
                parent: parent.clone(),
                items: vec![copy],
            },
        );
        self.place_new(&local, parent.as_ref());
        Ok((local, op))
    }

    // -- update ---------------------------------------------------------------

    /// `None` when the label is unchanged.
    pub fn begin_rename_item(&mut self, id: &ItemId, label: &str) -> TreeResult<Option<PendingOp>> {
        let label = tree::validate_label(label)?;
        let current = self.history.present();
        let placement =
            tree::find_parent_and_siblings(current.roots(), id).ok_or_else(|| TreeError::NotFound(id.clone()))?;
        if placement.siblings[placement.index].label == label {
            return Ok(None);
        }
        if tree::has_sibling_with_name(placement.siblings, &label, Some(id)) {
            return Err(TreeError::NameConflict { label });
        }
        let next = tree::rename(current, id, &label);
        Ok(Some(self.commit(
            next,
            PersistRequest::Update {
                id: id.clone(),
                patch: ItemPatch::label(label),
            },
        )))
    }

    pub async fn rename_item(&mut self, id: &ItemId, label: &str) -> TreeResult<()> {
        if let Some(op) = self.begin_rename_item(id, label).inspect_err(rejected("rename_item"))? {
            self.run(op).await?;
        }
        Ok(())
    }

    /// Replace the rich-text payload of a note or task.
    pub async fn update_content(&mut self, id: &ItemId, content: &str) -> TreeResult<()> {
        let op = self.stage_content(id, content).inspect_err(rejected("update_content"))?;
        if let Some(op) = op {
            self.run(op).await?;
        }
        Ok(())
    }

    fn stage_content(&mut self, id: &ItemId, content: &str) -> TreeResult<Option<PendingOp>> {
        let current = self.history.present();
        let node = tree::find_by_id(current.roots(), id).ok_or_else(|| TreeError::NotFound(id.clone()))?;
        match node.content() {
            None => return Err(TreeError::InvalidInput("folders have no content".to_string())),
            Some(existing) if existing == content => return Ok(None),
            Some(_) => {}
        }
        let patch = ItemPatch::content(content);
        let next = tree::update(current, id, |item| patch.apply(item));
        Ok(Some(self.commit(next, PersistRequest::Update { id: id.clone(), patch })))
    }

    /// Flip a task's completion flag. Returns the new value.
    pub async fn toggle_completed(&mut self, id: &ItemId) -> TreeResult<bool> {
        let (done, op) = self.stage_toggle(id).inspect_err(rejected("toggle_completed"))?;
        self.run(op).await?;
        Ok(done)
    }

    fn stage_toggle(&mut self, id: &ItemId) -> TreeResult<(bool, PendingOp)> {
        let current = self.history.present();
        let node = tree::find_by_id(current.roots(), id).ok_or_else(|| TreeError::NotFound(id.clone()))?;
        let done = !node
            .completed()
            .ok_or_else(|| TreeError::InvalidInput("only tasks can be completed".to_string()))?;
        let patch = ItemPatch::completed(done);
        let next = tree::update(current, id, |item| patch.apply(item));
        Ok((done, self.commit(next, PersistRequest::Update { id: id.clone(), patch })))
    }

    // -- delete ---------------------------------------------------------------

    pub fn begin_delete_item(&mut self, id: &ItemId) -> TreeResult<PendingOp> {
        let current = self.history.present();
        if !tree::contains(current.roots(), id) {
            return Err(TreeError::NotFound(id.clone()));
        }
        let next = tree::delete(current, id);
        let op = self.commit(next, PersistRequest::Delete { id: id.clone() });
        // Selection, cut source and drag source inside the removed subtree go.
        self.tidy();
        Ok(op)
    }

    pub async fn delete_item(&mut self, id: &ItemId) -> TreeResult<()> {
        let op = self.begin_delete_item(id).inspect_err(rejected("delete_item"))?;
        self.run(op).await?;
        Ok(())
    }

    // -- move -----------------------------------------------------------------

    /// `None` when `id` already sits directly in `target`.
    pub fn begin_move_item(&mut self, id: &ItemId, target: Option<&ItemId>) -> TreeResult<Option<PendingOp>> {
        let current = self.history.present();
        if tree::is_in_parent(current, id, target) {
            debug!(%id, "item already in target, nothing to move");
            return Ok(None);
        }
        let next = tree::plan_move(current, id, target)?;
        let new_index = tree::index_in_parent(&next, id).unwrap_or(0);
        Ok(Some(self.commit(
            next,
            PersistRequest::Move {
                id: id.clone(),
                new_parent: target.cloned(),
                new_index,
            },
        )))
    }

    /// Move `id` into the folder `target`, or to root level for `None`.
    pub async fn move_item(&mut self, id: &ItemId, target: Option<&ItemId>) -> TreeResult<()> {
        if let Some(op) = self.begin_move_item(id, target).inspect_err(rejected("move_item"))? {
            self.run(op).await?;
        }
        Ok(())
    }

    // -- drag & drop ----------------------------------------------------------

    pub fn begin_drag(&mut self, id: &ItemId) -> TreeResult<()> {
        if self.find(id).is_none() {
            return Err(TreeError::NotFound(id.clone()));
        }
        debug!(%id, "drag started");
        self.drag.start(id.clone());
        Ok(())
    }

    /// Record the hovered target. Returns whether dropping there would be
    /// accepted.
    pub fn hover(&mut self, target: DropTarget) -> bool {
        let Some(source) = self.drag.source() else {
            return false;
        };
        let valid = tree::plan_move(self.history.present(), source, target.folder_id()).is_ok();
        self.drag.set_hover(target, valid);
        valid
    }

    /// Finish the drag by moving the source onto `target`. The drag state
    /// is cleared whatever happens.
    pub async fn drop_on(&mut self, target: DropTarget) -> TreeResult<()> {
        let Some(source) = self.drag.finish() else {
            return Err(TreeError::InvalidInput("no drag in progress".to_string()));
        };
        debug!(%source, ?target, "dropped");
        self.move_item(&source, target.folder_id()).await
    }

    pub fn end_drag(&mut self) {
        if let Some(source) = self.drag.finish() {
            debug!(%source, "drag ended without drop");
        }
    }

    // -- clipboard ------------------------------------------------------------

    pub fn copy_item(&mut self, id: &ItemId) -> TreeResult<()> {
        let node = self.find(id).cloned().ok_or_else(|| TreeError::NotFound(id.clone()))?;
        debug!(%id, "copied to clipboard");
        self.clipboard = Some(Clipboard::copy(node));
        Ok(())
    }

    pub fn cut_item(&mut self, id: &ItemId) -> TreeResult<()> {
        let node = self.find(id).cloned().ok_or_else(|| TreeError::NotFound(id.clone()))?;
        debug!(%id, "cut to clipboard");
        self.clipboard = Some(Clipboard::cut(node));
        Ok(())
    }

    pub fn clear_clipboard(&mut self) {
        self.clipboard = None;
    }

    /// Paste into the folder `target`, or root level for `None`. A cut is a
    /// move and empties the clipboard; a copy creates a fresh clone and the
    /// clipboard keeps it.
    pub async fn paste_item(&mut self, target: Option<&ItemId>) -> TreeResult<PasteOutcome> {
        let Some(entry) = self.clipboard.clone() else {
            return Err(TreeError::InvalidInput("clipboard is empty".to_string()));
        };
        match entry.mode() {
            ClipboardMode::Cut => self.paste_cut(&entry, target).await,
            ClipboardMode::Copy => self.paste_copy(&entry, target).await,
        }
    }

    async fn paste_cut(&mut self, entry: &Clipboard, target: Option<&ItemId>) -> TreeResult<PasteOutcome> {
        let source = entry.snapshot().id.clone();
        let current = self.history.present();
        if !tree::contains(current.roots(), &source) {
            self.clipboard = None;
            let err = TreeError::NotFound(source);
            rejected("paste_item")(&err);
            return Err(err);
        }
        if tree::is_in_parent(current, &source, target) {
            info!(%source, "cut item pasted into its own parent");
            self.clipboard = None;
            return Ok(PasteOutcome::Unchanged);
        }
        let op = self
            .begin_move_item(&source, target)
            .inspect_err(rejected("paste_item"))?;
        self.clipboard = None;
        if let Some(op) = op {
            self.run(op).await?;
        }
        Ok(PasteOutcome::Moved)
    }

    async fn paste_copy(&mut self, entry: &Clipboard, target: Option<&ItemId>) -> TreeResult<PasteOutcome> {
        let (local, op) = self
            .stage_paste_copy(entry.snapshot(), target)
            .inspect_err(rejected("paste_item"))?;
        self.run(op).await?;
        Ok(PasteOutcome::Pasted(self.resolve(&local)))
    }

    fn stage_paste_copy(&mut self, snapshot: &Node, target: Option<&ItemId>) -> TreeResult<(ItemId, PendingOp)> {
        let current = self.history.present();
        let siblings = tree::destination_siblings(current, target)?;
        if target.is_none() && !snapshot.is_folder() {
            return Err(TreeError::RootConstraintViolation);
        }
        check_quota(self.config.item_limit, current.item_count(), snapshot.count())?;

        let mut copy = tree::clone_with_fresh_ids(snapshot);
        copy.label = tree::available_label(&snapshot.label, siblings);
        let copy: Node = Arc::new(copy);
        let next = tree::insert(current, target, copy.clone());
        let local = copy.id.clone();
        let op = self.commit(
            next,
            PersistRequest::Create {
                parent: target.cloned(),
                items: vec![copy],
            },
        );
        self.place_new(&local, target);
        Ok((local, op))
    }

    // -- history --------------------------------------------------------------

    /// Step back one change and push the resulting tree to the server.
    /// Returns false when there was nothing to undo.
    pub async fn undo(&mut self) -> TreeResult<bool> {
        let before = self.history.present().clone();
        if !self.history.undo() {
            return Ok(false);
        }
        info!(past = self.history.past_len(), "undo");
        self.push_whole_tree(before).await?;
        Ok(true)
    }

    pub async fn redo(&mut self) -> TreeResult<bool> {
        let before = self.history.present().clone();
        if !self.history.redo() {
            return Ok(false);
        }
        info!(future = self.history.future_len(), "redo");
        self.push_whole_tree(before).await?;
        Ok(true)
    }

    async fn push_whole_tree(&mut self, before: Tree) -> TreeResult<()> {
        self.tidy();
        self.persist_local();
        let present = self.history.present().clone();
        let op = self.track(PersistRequest::ReplaceTree { tree: present }, before);
        self.run(op).await?;
        Ok(())
    }

    // -- import / export ------------------------------------------------------

    /// Import a JSON document holding one item or an array of items.
    /// Returns how many items were added.
    pub async fn import_json(&mut self, json: &str, mode: ImportMode) -> TreeResult<usize> {
        let (count, op) = self.stage_import(json, mode).inspect_err(rejected("import_json"))?;
        self.run(op).await?;
        Ok(count)
    }

    fn stage_import(&mut self, json: &str, mode: ImportMode) -> TreeResult<(usize, PendingOp)> {
        let nodes = transfer::parse_items(json)?;
        let count: usize = nodes.iter().map(|n| n.count()).sum();

        match mode {
            ImportMode::ReplaceAll => {
                if nodes.iter().any(|n| !n.is_folder()) {
                    return Err(TreeError::RootConstraintViolation);
                }
                check_quota(self.config.item_limit, 0, count)?;
                let before = self.history.present().clone();
                let next = Tree::new(tree::canonicalize(&nodes));
                info!(items = count, "replacing tree from import");
                self.history.reset(next.clone());
                self.tidy();
                self.persist_local();
                let op = self.track(PersistRequest::ReplaceTree { tree: next }, before);
                Ok((count, op))
            }
            ImportMode::IntoSelection => {
                let current = self.history.present();
                // A selected note or task imports next to itself.
                let target = self.selection.as_ref().and_then(|id| {
                    let placement = tree::find_parent_and_siblings(current.roots(), id)?;
                    let node = &placement.siblings[placement.index];
                    if node.is_folder() {
                        Some(node.id.clone())
                    } else {
                        placement.parent_id().cloned()
                    }
                });
                let siblings = tree::destination_siblings(current, target.as_ref())?;
                if target.is_none() && nodes.iter().any(|n| !n.is_folder()) {
                    return Err(TreeError::RootConstraintViolation);
                }
                if let Some(clash) = nodes
                    .iter()
                    .find(|n| tree::has_sibling_with_name(siblings, &n.label, None))
                {
                    return Err(TreeError::NameConflict {
                        label: clash.label.clone(),
                    });
                }
                check_quota(self.config.item_limit, current.item_count(), count)?;

                let next = nodes
                    .iter()
                    .fold(current.clone(), |acc, n| tree::insert(&acc, target.as_ref(), n.clone()));
                info!(items = count, parent = ?target, "importing items");
                let op = self.commit(
                    next,
                    PersistRequest::Create {
                        parent: target.clone(),
                        items: nodes,
                    },
                );
                if let Some(target) = &target {
                    self.expansion.set(target.clone(), true);
                    self.persist_expansion();
                }
                Ok((count, op))
            }
        }
    }

    /// Pretty JSON of one item's subtree, or of the whole tree for `None`.
    pub fn export_json(&self, id: Option<&ItemId>) -> TreeResult<String> {
        match id {
            Some(id) => {
                let node = self.find(id).ok_or_else(|| TreeError::NotFound(id.clone()))?;
                transfer::export_item(node)
            }
            None => transfer::export_tree(self.tree()),
        }
    }
}
