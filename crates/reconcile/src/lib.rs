//! Reconciliation engine.
//!
//! Two distinct, non-interchangeable outputs over the same loaded state:
//! the read-only purchasing preview (auto-suggestions merged with the
//! pending order's manual entries) and the mutating submission merge that
//! decides what actually gets persisted.

pub mod preview;
pub mod submit;

pub use preview::preview;
pub use submit::{SubmissionPlan, SubmissionTarget, submission_merge};
