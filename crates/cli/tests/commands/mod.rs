//! Command-level integration tests

pub mod active_sync;
pub mod listing;
