//! Repository Layer - Core Traits
//!
//! Abstract interfaces for the collaborators the engine talks to.
//! Implementations can use HTTP, files, in-memory maps, etc.

use async_trait::async_trait;

use crate::domain::{Item, ItemDraft, ItemId, ItemPatch, Tree};

use super::error::{CacheError, PersistResult};

/// Server-side source of truth for the tree.
///
/// All operations are async; timeouts and retries belong to the
/// implementation, the engine never retries on its own.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// `GET /items`: the whole tree.
    async fn fetch_tree(&self) -> PersistResult<Tree>;

    /// `POST /items[/:parentId]`: returns the item with its server id.
    async fn create_item(&self, parent: Option<&ItemId>, draft: &ItemDraft) -> PersistResult<Item>;

    /// `PATCH /items/:id`
    async fn update_item(&self, id: &ItemId, patch: &ItemPatch) -> PersistResult<Item>;

    /// `DELETE /items/:id`
    async fn delete_item(&self, id: &ItemId) -> PersistResult<()>;

    /// `PATCH /items/:id/move`
    async fn move_item(
        &self,
        id: &ItemId,
        new_parent: Option<&ItemId>,
        new_index: usize,
    ) -> PersistResult<()>;

    /// `PUT /items/tree`: bulk replace, returns the stored tree.
    async fn replace_tree(&self, tree: &Tree) -> PersistResult<Tree>;
}

/// Local key/value cache holding serialized snapshots.
pub trait TreeCache: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn write(&self, key: &str, value: &str) -> Result<(), CacheError>;
}
