//! Domain Errors
//!
//! Every rejected tree operation is reported as a distinguishable value.
//! All kinds except `Network` are detected before any local mutation.

use super::item::ItemId;

pub type TreeResult<T> = Result<T, TreeError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("item not found: {0}")]
    NotFound(ItemId),

    #[error("not a folder: {0}")]
    NotAFolder(ItemId),

    #[error("an item cannot be moved into itself or one of its descendants")]
    CycleDetected,

    #[error("an item named \"{label}\" already exists here")]
    NameConflict { label: String },

    #[error("item limit of {limit} reached")]
    QuotaExceeded { limit: usize },

    #[error("only folders can be placed at the top level")]
    RootConstraintViolation,

    #[error("network error: {0}")]
    Network(String),
}

impl TreeError {
    /// True for errors raised by local validation, before anything changed.
    pub fn is_local(&self) -> bool {
        !matches!(self, TreeError::Network(_))
    }
}

/// Reasons a drag-drop or cut-paste move is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("an item cannot be dropped onto itself")]
    SelfDrop,

    #[error("item not found: {0}")]
    NotFound(ItemId),

    #[error("drop target not found: {0}")]
    InvalidTarget(ItemId),

    #[error("drop target is not a folder: {0}")]
    NotAFolder(ItemId),

    #[error("only folders can be placed at the top level")]
    RootConstraint,

    #[error("an item cannot be moved into one of its descendants")]
    CycleDetected,

    #[error("an item named \"{label}\" already exists in the destination")]
    NameConflict { label: String },
}

impl From<MoveError> for TreeError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::SelfDrop | MoveError::CycleDetected => TreeError::CycleDetected,
            MoveError::NotFound(id) | MoveError::InvalidTarget(id) => TreeError::NotFound(id),
            MoveError::NotAFolder(id) => TreeError::NotAFolder(id),
            MoveError::RootConstraint => TreeError::RootConstraintViolation,
            MoveError::NameConflict { label } => TreeError::NameConflict { label },
        }
    }
}
