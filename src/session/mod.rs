//! Tree Session Controller
//!
//! Owns the canonical tree (inside the undo history), the selection, the
//! expansion set, the clipboard and the drag state. Every structural change
//! is validated with the pure helpers in [`crate::tree`], applied locally and
//! committed, then sent to the [`Persistence`] collaborator. A failed request
//! is reverted, or reconciled by a full re-fetch when other changes were
//! committed in between.
//!
//! Mutating methods come in two forms: `begin_*` applies the change and
//! returns the [`PendingOp`]; the async form also dispatches and settles it.

mod clipboard;
mod drag;
mod expansion;
mod ops;
mod pending;
mod quota;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::domain::{Item, ItemDraft, ItemId, Node, Tree, TreeError, TreeResult};
use crate::history::History;
use crate::repository::{load_snapshot, store_snapshot, Persistence, TreeCache};
use crate::sync::{TabChannel, TabId, TabSubscription};
use crate::tree;

pub use clipboard::{Clipboard, ClipboardMode, PasteOutcome};
pub use drag::{DragState, DropTarget};
pub use expansion::ExpansionSet;
pub use ops::ImportMode;
pub use pending::{DispatchFailure, OpId, OpState, Outcome, PendingOp, PersistRequest};
pub use quota::check_quota;

pub struct TreeSession<P, C> {
    persistence: P,
    cache: C,
    config: SessionConfig,
    history: History<Tree>,
    selection: Option<ItemId>,
    expansion: ExpansionSet,
    clipboard: Option<Clipboard>,
    drag: DragState,
    tabs: Option<TabSubscription>,
    // Server items confirmed while ops are in flight, keyed by the id the
    // local tree held (transient for creates). Requests and revert
    // snapshots built before confirmation are resolved through it.
    resolved: HashMap<ItemId, Item>,
    // Ops handed out but not yet settled.
    in_flight: HashSet<OpId>,
    // Revision of the last reset from the server; older ops were discarded.
    baseline: u64,
    next_op: u64,
}

impl<P: Persistence, C: TreeCache> TreeSession<P, C> {
    /// Start from whatever the cache holds. Call [`reload`](Self::reload)
    /// to fetch the server tree.
    pub fn new(persistence: P, cache: C, config: SessionConfig) -> Self {
        let tree = match load_snapshot::<Tree, _>(&cache, &config.cache_keys.tree) {
            Ok(Some(tree)) => Tree::new(tree::canonicalize(tree.roots())),
            Ok(None) => Tree::default(),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable cached tree");
                Tree::default()
            }
        };
        let expansion = match load_snapshot::<ExpansionSet, _>(&cache, &config.cache_keys.expansion) {
            Ok(set) => set.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable cached expansion set");
                ExpansionSet::default()
            }
        };
        info!(items = tree.item_count(), "session started from cache");

        let mut history = History::with_limit(Tree::default(), config.history_limit);
        history.reset(tree);
        let baseline = history.revision();
        Self {
            persistence,
            cache,
            config,
            history,
            selection: None,
            expansion,
            clipboard: None,
            drag: DragState::default(),
            tabs: None,
            resolved: HashMap::new(),
            in_flight: HashSet::new(),
            baseline,
            next_op: 0,
        }
    }

    /// Join a cross-tab channel.
    pub fn with_tabs(mut self, channel: &TabChannel) -> Self {
        let subscription = channel.subscribe();
        debug!(channel = channel.name(), tab = %subscription.tab_id(), "joined tab channel");
        self.tabs = Some(subscription);
        self
    }

    // -- accessors ----------------------------------------------------------

    pub fn tree(&self) -> &Tree {
        self.history.present()
    }

    pub fn history(&self) -> &History<Tree> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn find(&self, id: &ItemId) -> Option<&Node> {
        tree::find_by_id(self.tree().roots(), id)
    }

    pub fn selection(&self) -> Option<&ItemId> {
        self.selection.as_ref()
    }

    pub fn selected_item(&self) -> Option<&Node> {
        self.selection.as_ref().and_then(|id| self.find(id))
    }

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn expansion(&self) -> &ExpansionSet {
        &self.expansion
    }

    pub fn tab_id(&self) -> Option<TabId> {
        self.tabs.as_ref().map(|t| t.tab_id())
    }

    /// Rows in display order with their depth; collapsed folders hide
    /// their children.
    pub fn visible_rows(&self) -> Vec<(Node, usize)> {
        tree::flatten_visible(self.tree().roots(), |id| self.expansion.is_expanded(id))
    }

    // -- selection & expansion ----------------------------------------------

    pub fn select(&mut self, id: Option<&ItemId>) -> TreeResult<()> {
        if let Some(id) = id {
            if self.find(id).is_none() {
                return Err(TreeError::NotFound(id.clone()));
            }
        }
        self.selection = id.cloned();
        Ok(())
    }

    pub fn is_expanded(&self, id: &ItemId) -> bool {
        self.expansion.is_expanded(id)
    }

    pub fn toggle_expanded(&mut self, id: &ItemId) -> TreeResult<bool> {
        self.require_folder(id)?;
        let expanded = self.expansion.toggle(id);
        self.persist_expansion();
        Ok(expanded)
    }

    pub fn set_expanded(&mut self, id: &ItemId, expanded: bool) -> TreeResult<()> {
        self.require_folder(id)?;
        self.expansion.set(id.clone(), expanded);
        self.persist_expansion();
        Ok(())
    }

    /// Forget expansion entries of folders that no longer exist.
    pub fn prune_expansion(&mut self) -> usize {
        let removed = self.expansion.prune(self.history.present());
        if removed > 0 {
            debug!(removed, "pruned expansion entries");
            self.persist_expansion();
        }
        removed
    }

    fn require_folder(&self, id: &ItemId) -> TreeResult<()> {
        match self.find(id) {
            Some(node) if node.is_folder() => Ok(()),
            Some(_) => Err(TreeError::NotAFolder(id.clone())),
            None => Err(TreeError::NotFound(id.clone())),
        }
    }

    // -- reconciliation -------------------------------------------------------

    /// Replace local state with the server tree. Not undoable; history is
    /// reset. On failure local state is left as it was.
    pub async fn reload(&mut self) -> TreeResult<()> {
        let fetched = self.persistence.fetch_tree().await.map_err(|e| {
            warn!(error = %e, "failed to fetch tree");
            TreeError::from(e)
        })?;
        let tree = Tree::new(tree::canonicalize(fetched.roots()));
        info!(items = tree.item_count(), "tree reloaded from server");
        self.history.reset(tree);
        self.baseline = self.history.revision();
        self.prune_resolved();
        self.tidy();
        self.persist_local();
        Ok(())
    }

    /// Reload when another tab announced a change since the last poll.
    pub async fn poll_signals(&mut self) -> TreeResult<bool> {
        let foreign = self.tabs.as_mut().is_some_and(|t| t.drain_foreign());
        if !foreign {
            return Ok(false);
        }
        info!("tree changed in another tab, reloading");
        self.reload().await?;
        Ok(true)
    }

    // -- pending operations ----------------------------------------------------

    /// Commit `next` to history and open a pending op for `request`.
    fn commit(&mut self, next: Tree, request: PersistRequest) -> PendingOp {
        let before = self.history.present().clone();
        self.history.commit(next);
        self.persist_local();
        self.track(request, before)
    }

    /// Open a pending op for a change already applied to history.
    fn track(&mut self, request: PersistRequest, before: Tree) -> PendingOp {
        self.next_op += 1;
        let op = PendingOp::new(OpId(self.next_op), request, before, self.history.revision());
        self.in_flight.insert(op.id);
        debug!(op = %op.id, kind = op.request.kind(), "optimistic change applied");
        op
    }

    fn resolve(&self, id: &ItemId) -> ItemId {
        self.resolved
            .get(id)
            .map(|server| server.id.clone())
            .unwrap_or_else(|| id.clone())
    }

    fn release(&mut self, op: &PendingOp) {
        self.in_flight.remove(&op.id);
        if self.in_flight.is_empty() && !self.resolved.is_empty() {
            debug!(entries = self.resolved.len(), "no ops in flight, dropping resolved ids");
            self.resolved.clear();
        }
    }

    // Keep only entries an in-flight op may still need and that still
    // resolve in the present tree.
    fn prune_resolved(&mut self) {
        if self.in_flight.is_empty() {
            self.resolved.clear();
            return;
        }
        let roots = self.history.present().roots();
        self.resolved.retain(|_, server| tree::contains(roots, &server.id));
    }

    /// Number of ops handed out and not yet settled.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Number of transient ids kept for requests built before confirmation.
    pub fn resolved_len(&self) -> usize {
        self.resolved.len()
    }

    /// Send the op's request. Does not touch local state.
    pub async fn dispatch(&self, op: &PendingOp) -> Result<Outcome, DispatchFailure> {
        match &op.request {
            PersistRequest::Create { parent, items } => {
                let parent = parent.as_ref().map(|p| self.resolve(p));
                self.dispatch_create(parent, items).await
            }
            PersistRequest::Update { id, patch } => {
                let item = self.persistence.update_item(&self.resolve(id), patch).await?;
                Ok(Outcome::Updated(item))
            }
            PersistRequest::Delete { id } => {
                self.persistence.delete_item(&self.resolve(id)).await?;
                Ok(Outcome::Deleted)
            }
            PersistRequest::Move {
                id,
                new_parent,
                new_index,
            } => {
                let parent = new_parent.as_ref().map(|p| self.resolve(p));
                self.persistence
                    .move_item(&self.resolve(id), parent.as_ref(), *new_index)
                    .await?;
                Ok(Outcome::Moved)
            }
            PersistRequest::ReplaceTree { tree } => {
                let stored = self.persistence.replace_tree(tree).await?;
                Ok(Outcome::Replaced(stored))
            }
        }
    }

    // Roots first, then each child under its parent's server id.
    async fn dispatch_create(
        &self,
        parent: Option<ItemId>,
        items: &[Node],
    ) -> Result<Outcome, DispatchFailure> {
        let mut confirmed: HashMap<ItemId, Item> = HashMap::new();
        let mut stack: Vec<(Option<ItemId>, Node)> =
            items.iter().rev().map(|n| (parent.clone(), n.clone())).collect();

        while let Some((parent, node)) = stack.pop() {
            let draft = ItemDraft::from_item(&node);
            let created = self
                .persistence
                .create_item(parent.as_ref(), &draft)
                .await
                .map_err(|error| DispatchFailure {
                    error,
                    server_touched: !confirmed.is_empty(),
                })?;
            for child in node.children().iter().rev() {
                stack.push((Some(created.id.clone()), child.clone()));
            }
            confirmed.insert(node.id.clone(), created);
        }
        Ok(Outcome::Created(confirmed))
    }

    /// Confirm or revert `op` according to `result`. Failures surface as
    /// [`TreeError::Network`] after local state has been reconciled.
    pub async fn settle(
        &mut self,
        op: &mut PendingOp,
        result: Result<Outcome, DispatchFailure>,
    ) -> TreeResult<Outcome> {
        if !op.is_pending() {
            return Err(TreeError::InvalidInput(format!("{} was already settled", op.id)));
        }
        match result {
            Ok(outcome) => {
                self.confirm(op, &outcome).await;
                op.state = OpState::Confirmed;
                debug!(op = %op.id, kind = op.request.kind(), "server confirmed change");
                if let Some(tabs) = &self.tabs {
                    tabs.notify_changed();
                }
                self.release(op);
                Ok(outcome)
            }
            Err(failure) => {
                op.state = OpState::Reverted;
                warn!(op = %op.id, kind = op.request.kind(), error = %failure.error, "server rejected change");
                self.revert(op, failure.server_touched).await;
                self.release(op);
                Err(failure.error.into())
            }
        }
    }

    async fn run(&mut self, mut op: PendingOp) -> TreeResult<Outcome> {
        let result = self.dispatch(&op).await;
        self.settle(&mut op, result).await
    }

    async fn confirm(&mut self, op: &PendingOp, outcome: &Outcome) {
        if op.revision < self.baseline {
            // A reload dropped this op's local change; the server now has it.
            if let Outcome::Created(confirmed) = outcome {
                self.adopt_server_ids(confirmed);
            }
            debug!(op = %op.id, "change confirmed after a reload, reloading");
            if let Err(e) = self.reload().await {
                warn!(error = %e, "reload after late confirmation failed");
            }
            return;
        }
        match outcome {
            Outcome::Created(confirmed) => self.adopt_server_ids(confirmed),
            Outcome::Updated(server) => {
                let id = server.id.clone();
                let updated_at = server.updated_at;
                self.history.amend(|t| {
                    if tree::contains(t.roots(), &id) {
                        tree::update(t, &id, |item| Item {
                            updated_at,
                            ..item.clone()
                        })
                    } else {
                        t.clone()
                    }
                });
                self.resolved.insert(id, server.clone());
                self.persist_local();
            }
            Outcome::Deleted | Outcome::Moved => {}
            Outcome::Replaced(stored) => {
                if self.history.revision() == op.revision {
                    let stored = Tree::new(tree::canonicalize(stored.roots()));
                    self.history.amend(|_| stored);
                    self.tidy();
                    self.persist_local();
                } else if self.history.present().ids().iter().any(ItemId::is_transient) {
                    debug!(op = %op.id, "replaced tree superseded locally, reloading");
                    if let Err(e) = self.reload().await {
                        warn!(error = %e, "reload after replace failed");
                    }
                }
            }
        }
    }

    fn adopt_server_ids(&mut self, confirmed: &HashMap<ItemId, Item>) {
        self.history.map_all(|t| tree::reassign_ids(t, confirmed));
        for (local, server) in confirmed {
            if self.selection.as_ref() == Some(local) {
                self.selection = Some(server.id.clone());
            }
            self.expansion.rename(local, &server.id);
            self.drag.remap_source(local, &server.id);
            self.resolved.insert(local.clone(), server.clone());
        }
        let cut = self
            .clipboard
            .as_ref()
            .and_then(|c| c.cut_source())
            .and_then(|source| confirmed.get(source))
            .and_then(|server| tree::find_by_id(self.history.present().roots(), &server.id))
            .cloned();
        if let Some(node) = cut {
            self.clipboard = self.clipboard.as_ref().map(|c| c.with_snapshot(node));
        }
        self.persist_local();
    }

    async fn revert(&mut self, op: &PendingOp, server_touched: bool) {
        let replace = matches!(op.request, PersistRequest::ReplaceTree { .. });
        if server_touched || replace || self.history.revision() != op.revision {
            info!(op = %op.id, "reconciling failed change by full reload");
            if let Err(e) = self.reload().await {
                warn!(error = %e, "reload after failed change also failed");
            }
            return;
        }
        info!(op = %op.id, kind = op.request.kind(), "reverting optimistic change");
        // Creates confirmed after this op began are kept under their server ids.
        let before = tree::reassign_ids(&op.before, &self.resolved);
        self.history.commit(before);
        self.tidy();
        self.persist_local();
    }

    // Drop references that no longer resolve in the present tree.
    fn tidy(&mut self) {
        let roots = self.history.present().roots();
        if self.selection.as_ref().is_some_and(|id| !tree::contains(roots, id)) {
            self.selection = None;
        }
        let cut_gone = self
            .clipboard
            .as_ref()
            .and_then(|c| c.cut_source())
            .is_some_and(|id| !tree::contains(roots, id));
        if cut_gone {
            debug!("cut source vanished, clipboard cleared");
            self.clipboard = None;
        }
        if self.drag.source().is_some_and(|id| !tree::contains(roots, id)) {
            self.drag.finish();
        }
    }

    // -- local cache ------------------------------------------------------------

    fn persist_local(&self) {
        if let Err(e) = store_snapshot(&self.cache, &self.config.cache_keys.tree, self.history.present()) {
            warn!(error = %e, "failed to cache tree");
        }
        self.persist_expansion();
    }

    fn persist_expansion(&self) {
        if let Err(e) = store_snapshot(&self.cache, &self.config.cache_keys.expansion, &self.expansion) {
            warn!(error = %e, "failed to cache expansion set");
        }
    }
}
