//! Service layer for business logic
//!
//! This module provides the query orchestration shared between the
//! HTTP API and the RPC front-end.

mod counters;
mod query_service;

pub use counters::ServiceCounters;
pub use query_service::{QueryService, ServiceStatus, MAX_BATCH_SIZE};
