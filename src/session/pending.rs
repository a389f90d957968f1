//! Pending Operations
//!
//! Every network-backed mutation is applied locally first and then tracked as
//! a `PendingOp` until the server answers: `Pending -> Confirmed | Reverted`.

use std::collections::HashMap;
use std::fmt;

use crate::domain::{Item, ItemId, ItemPatch, Node, Tree};
use crate::repository::PersistenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(pub(crate) u64);

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpState {
    Pending,
    Confirmed,
    Reverted,
}

/// What has to be told to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistRequest {
    /// Create each subtree under `parent`, root first, then children.
    Create { parent: Option<ItemId>, items: Vec<Node> },
    Update { id: ItemId, patch: ItemPatch },
    Delete { id: ItemId },
    Move { id: ItemId, new_parent: Option<ItemId>, new_index: usize },
    ReplaceTree { tree: Tree },
}

impl PersistRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            PersistRequest::Create { .. } => "create",
            PersistRequest::Update { .. } => "update",
            PersistRequest::Delete { .. } => "delete",
            PersistRequest::Move { .. } => "move",
            PersistRequest::ReplaceTree { .. } => "replace-tree",
        }
    }
}

/// Successful server answer for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Server items keyed by the local (transient) id they replace.
    Created(HashMap<ItemId, Item>),
    Updated(Item),
    Deleted,
    Moved,
    Replaced(Tree),
}

/// A failed dispatch. `server_touched` is set when part of a multi-request
/// operation had already been applied remotely, so a plain revert would
/// leave the two sides apart.
#[derive(Debug)]
pub struct DispatchFailure {
    pub error: PersistenceError,
    pub server_touched: bool,
}

impl From<PersistenceError> for DispatchFailure {
    fn from(error: PersistenceError) -> Self {
        Self {
            error,
            server_touched: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PendingOp {
    pub(crate) id: OpId,
    pub(crate) request: PersistRequest,
    /// Tree before the optimistic change.
    pub(crate) before: Tree,
    /// History revision right after the optimistic change.
    pub(crate) revision: u64,
    pub(crate) state: OpState,
}

impl PendingOp {
    pub(crate) fn new(id: OpId, request: PersistRequest, before: Tree, revision: u64) -> Self {
        Self {
            id,
            request,
            before,
            revision,
            state: OpState::Pending,
        }
    }

    pub fn id(&self) -> OpId {
        self.id
    }

    pub fn request(&self) -> &PersistRequest {
        &self.request
    }

    pub fn before(&self) -> &Tree {
        &self.before
    }

    pub fn state(&self) -> OpState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == OpState::Pending
    }

    /// Local id of the first item this op creates, if it creates any.
    pub fn created_id(&self) -> Option<&ItemId> {
        match &self.request {
            PersistRequest::Create { items, .. } => items.first().map(|n| &n.id),
            _ => None,
        }
    }
}
