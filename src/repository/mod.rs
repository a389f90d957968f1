//! Repository Layer
//!
//! Collaborator abstractions and implementations.

mod cache;
mod error;
mod http;
mod memory;
mod traits;

pub use cache::{load_snapshot, store_snapshot, FileCache, MemoryCache};
pub use error::{CacheError, PersistResult, PersistenceError};
pub use http::HttpPersistence;
pub use memory::{Call, MemoryPersistence};
pub use traits::{Persistence, TreeCache};
