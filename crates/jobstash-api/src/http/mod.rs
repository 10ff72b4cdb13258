//! HTTP interface module.
//!
//! Provides REST API endpoints for:
//! - Job result submission and lookup
//! - Manual retention sweeps
//! - Health checks and monitoring

pub mod handlers;
pub mod routes;

pub(crate) mod monitoring;
