//! Storage-layer error model.

use thiserror::Error;

use medledger_core::{ItemId, OrderId};

/// Failure surfaced by a storage collaborator.
///
/// `Unavailable` and `DeadlineExceeded` are transient and drive the retry
/// wrapper; everything else surfaces immediately.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// Internal lock poisoning (a writer panicked mid-update).
    #[error("storage lock poisoned")]
    Poisoned,

    #[error("storage operation failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<StorageError>,
    },
}

impl StorageError {
    /// Whether retrying the operation could reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StorageError::Unavailable(_) | StorageError::DeadlineExceeded(_)
        )
    }
}
