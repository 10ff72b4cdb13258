//! # jobstash API
//!
//! HTTP interface over the file-backed record store.
//!
//! ## Routes
//!
//! ```text
//! POST /jobs           - Submit a job result
//! GET  /jobs           - List job results (optional ?status= / ?label=)
//! GET  /jobs/ids       - Sorted job identifiers
//! GET  /jobs/urls      - Resource URL of every job result
//! GET  /jobs/{job_id}  - First job result with that identifier
//! POST /sweep          - Run a retention sweep now
//! GET  /health         - Health check with storage status
//! GET  /livez          - Liveness probe
//! ```
//!
//! Every store call touches the filesystem, so handlers run them on the
//! blocking thread pool.

pub mod error;
pub mod http;
pub mod server;
pub mod state;
pub mod sweeper;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::{InterfaceConfig, InterfaceServer};
pub use state::{AppState, RetentionSettings};
pub use sweeper::spawn_periodic_sweep;
