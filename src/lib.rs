//! ipquery - A high-performance IP geolocation query service
//!
//! This library provides the core functionality for the ipquery service:
//! query orchestration with a TTL cache in front of a pluggable lookup
//! backend, exposed over HTTP and a framed RPC protocol.
//!
//! # Architecture
//! - `lookup`: Address classification and lookup backends (MaxMind, mock)
//! - `cache`: Expiring query cache with background sweeping
//! - `service`: Query orchestration and service counters
//! - `api`: HTTP services (actix-web)
//! - `rpc`: Length-prefixed JSON RPC over TCP
//! - `config`: Configuration management
//! - `system`: Logging initialization

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod lookup;
pub mod rpc;
pub mod service;
pub mod system;
pub mod utils;
