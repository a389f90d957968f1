//! In-memory Persistence
//!
//! A server double holding the tree behind a mutex. Clones share state, so
//! several sessions ("tabs") can talk to the same store. Every call is
//! recorded, and failures can be injected to exercise revert paths.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{Item, ItemDraft, ItemId, ItemPatch, Node, Tree};
use crate::tree;

use super::error::{PersistResult, PersistenceError};
use super::traits::Persistence;

/// A request as seen by the server double.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchTree,
    Create { parent: Option<ItemId>, label: String },
    Update { id: ItemId, patch: ItemPatch },
    Delete { id: ItemId },
    Move { id: ItemId, new_parent: Option<ItemId>, new_index: usize },
    ReplaceTree,
}

#[derive(Default)]
struct ServerState {
    tree: Tree,
    next_id: u64,
    calls: Vec<Call>,
    failures_pending: usize,
    // Requests still allowed through before `failures_pending` kicks in.
    grace: usize,
    offline: bool,
}

impl ServerState {
    fn assign_id(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId::new(format!("item-{}", self.next_id))
    }

    fn check_available(&mut self) -> PersistResult<()> {
        if self.offline {
            return Err(PersistenceError::Unavailable("server offline".to_string()));
        }
        if self.failures_pending > 0 && self.grace > 0 {
            self.grace -= 1;
        } else if self.failures_pending > 0 {
            self.failures_pending -= 1;
            return Err(PersistenceError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }

    // Server-side ids for anything that arrives without one.
    fn adopt(&mut self, nodes: &[Node]) -> Vec<Node> {
        let now = Utc::now();
        nodes
            .iter()
            .map(|node| {
                let children = self.adopt(node.children());
                let mut item = node.with_children(children);
                if item.id.is_empty() || item.id.is_transient() {
                    item.id = self.assign_id();
                    item.created_at = Some(now);
                    item.updated_at = Some(now);
                }
                Arc::new(item)
            })
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct MemoryPersistence {
    state: Arc<Mutex<ServerState>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server pre-loaded with `tree`.
    pub fn with_tree(tree: Tree) -> Self {
        let mut state = ServerState::default();
        let roots = state.adopt(tree.roots());
        state.tree = Tree::new(tree::canonicalize(&roots));
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn tree(&self) -> Tree {
        self.state.lock().await.tree.clone()
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.state.lock().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    /// Make the next `count` requests fail.
    pub async fn fail_next(&self, count: usize) {
        self.fail_after(0, count).await;
    }

    /// Let `successes` requests through, then fail the following `count`.
    pub async fn fail_after(&self, successes: usize, count: usize) {
        let mut state = self.state.lock().await;
        state.grace = successes;
        state.failures_pending = count;
    }

    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }
}

fn not_found(id: &ItemId) -> PersistenceError {
    PersistenceError::Status {
        status: 404,
        message: format!("item {id} not found"),
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn fetch_tree(&self) -> PersistResult<Tree> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::FetchTree);
        state.check_available()?;
        Ok(state.tree.clone())
    }

    async fn create_item(&self, parent: Option<&ItemId>, draft: &ItemDraft) -> PersistResult<Item> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::Create {
            parent: parent.cloned(),
            label: draft.label.clone(),
        });
        state.check_available()?;

        if let Some(parent) = parent {
            let folder = tree::find_by_id(state.tree.roots(), parent).ok_or_else(|| not_found(parent))?;
            if !folder.is_folder() {
                return Err(PersistenceError::Status {
                    status: 400,
                    message: format!("{parent} is not a folder"),
                });
            }
        }

        let now = Utc::now();
        let mut item = draft.clone().into_item(state.assign_id());
        item.created_at = Some(now);
        item.updated_at = Some(now);
        debug!(id = %item.id, "memory store created item");
        state.tree = tree::insert(&state.tree, parent, Arc::new(item.clone()));
        Ok(item)
    }

    async fn update_item(&self, id: &ItemId, patch: &ItemPatch) -> PersistResult<Item> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::Update {
            id: id.clone(),
            patch: patch.clone(),
        });
        state.check_available()?;

        let existing = tree::find_by_id(state.tree.roots(), id).ok_or_else(|| not_found(id))?;
        let mut updated = patch.apply(existing);
        updated.updated_at = Some(Utc::now());
        let stored = updated.clone();
        state.tree = tree::update(&state.tree, id, move |_| stored);
        Ok(updated)
    }

    async fn delete_item(&self, id: &ItemId) -> PersistResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::Delete { id: id.clone() });
        state.check_available()?;

        if !tree::contains(state.tree.roots(), id) {
            return Err(not_found(id));
        }
        state.tree = tree::delete(&state.tree, id);
        Ok(())
    }

    async fn move_item(
        &self,
        id: &ItemId,
        new_parent: Option<&ItemId>,
        new_index: usize,
    ) -> PersistResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::Move {
            id: id.clone(),
            new_parent: new_parent.cloned(),
            new_index,
        });
        state.check_available()?;

        let moved = tree::plan_move(&state.tree, id, new_parent).map_err(|e| PersistenceError::Status {
            status: 409,
            message: e.to_string(),
        })?;
        state.tree = moved;
        Ok(())
    }

    async fn replace_tree(&self, tree: &Tree) -> PersistResult<Tree> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::ReplaceTree);
        state.check_available()?;

        let roots = state.adopt(tree.roots());
        state.tree = Tree::new(tree::canonicalize(&roots));
        Ok(state.tree.clone())
    }
}
