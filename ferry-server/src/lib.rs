//! Ferry Server Library
//!
//! This library exposes the server's internal modules for integration testing.

pub mod connection;
pub mod connection_tracker;
pub mod constants;
pub mod files;
pub mod handlers;
