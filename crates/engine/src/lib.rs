//! Composition root: loads the catalog and order book from storage, keeps
//! them consistent as live updates arrive, and exposes the operations the
//! UI collaborator calls.

pub mod error;
pub mod replenisher;

pub use error::EngineError;
pub use replenisher::Replenisher;
