//! Engine-level error: domain or storage, surfaced to the caller.

use thiserror::Error;

use medledger_core::DomainError;
use medledger_store::StorageError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
