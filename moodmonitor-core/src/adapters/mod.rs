//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB and in-memory backends for KeyValueStore
//! - Demo health source and mood endpoint
//! - HTTP client for MoodSyncEndpoint

pub mod demo;
pub mod duckdb;
pub mod http;
pub mod memory;
