//! CommentLens Store
//!
//! Persistence collaborator for analysis results.
//!
//! Provides:
//! - The `CommentStore` contract used by batch and reprocessing runs
//! - A PostgREST-backed store for production
//! - An in-memory store for local runs and tests
//! - Analysis job records for tracking background runs

pub mod memory;
pub mod rest;
pub mod store;

pub use memory::MemoryCommentStore;
pub use rest::{RestCommentStore, StoreConfig};
pub use store::{AnalysisJob, AnalysisUpdate, CommentStore, JobKind, StoredComment};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::store::{AnalysisJob, AnalysisUpdate, CommentStore, StoredComment};
    pub use crate::{MemoryCommentStore, RestCommentStore};
}
