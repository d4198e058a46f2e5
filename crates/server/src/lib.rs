//! HTTP API server for cookbooks and data bags.
//!
//! This crate provides the HTTP surface:
//! - Cookbook manifest upload (merge) and retrieval
//! - Cookbook file download streaming
//! - Data bag and item CRUD
//! - Health and Prometheus metrics

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod url;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use url::PublicUrls;
