//! CommentLens Service
//!
//! HTTP front end for comment analysis: single and batch analysis,
//! single-axis queries, reprocessing of unanalyzed comments and metrics.

pub mod batch;
pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use batch::{BatchCoordinator, BatchOutcome};
pub use cli::Cli;
pub use config::ServiceConfig;
pub use routes::create_router;
pub use state::AppState;
