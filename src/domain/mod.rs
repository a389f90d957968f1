//! Domain Layer
//!
//! Core entities and error kinds.
//! This layer has no collaborator dependencies (serde, chrono and uuid only).

mod error;
mod item;
mod tree;

pub use error::{MoveError, TreeError, TreeResult};
pub use item::{Item, ItemDraft, ItemId, ItemKind, ItemPatch, ItemType, Node, TRANSIENT_ID_PREFIX};
pub use tree::Tree;
