//! Note Tree
//!
//! Tree state engine for a folder / note / task organizer.
//!
//! ## Layers
//! - **domain**: items, the tree value and error kinds
//! - **tree**: pure ordering, traversal, mutation and validation helpers
//! - **history**: bounded undo/redo
//! - **repository**: persistence and cache collaborators
//! - **sync**: cross-tab change signals
//! - **session**: the stateful controller tying it all together
//! - **transfer**: JSON import/export
//! - **config**: engine configuration

pub mod config;
pub mod domain;
pub mod history;
pub mod repository;
pub mod session;
pub mod sync;
pub mod transfer;
pub mod tree;

use std::path::Path;

pub use config::{EngineConfig, SessionConfig};
pub use domain::{Item, ItemDraft, ItemId, ItemKind, ItemType, MoveError, Node, Tree, TreeError, TreeResult};
pub use history::History;
pub use repository::{FileCache, HttpPersistence, MemoryCache, MemoryPersistence, Persistence, TreeCache};
pub use session::{DropTarget, ImportMode, PasteOutcome, TreeSession};
pub use sync::TabChannel;

pub const APP_NAME: &str = "NoteTree";

/// Install the rolling file logger under `log_dir`.
pub fn init_logging(log_dir: impl AsRef<Path>) -> Result<(), rolling_logger::LoggerError> {
    rolling_logger::init_logger(log_dir, APP_NAME)
}
