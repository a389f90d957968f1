//! Item-count quota

use tracing::debug;

use crate::domain::{TreeError, TreeResult};

/// Reject when `current + adding` would exceed `limit`. `None` is unlimited.
pub fn check_quota(limit: Option<usize>, current: usize, adding: usize) -> TreeResult<()> {
    let Some(limit) = limit else {
        return Ok(());
    };
    if current.saturating_add(adding) > limit {
        debug!(limit, current, adding, "item quota exceeded");
        return Err(TreeError::QuotaExceeded { limit });
    }
    Ok(())
}
