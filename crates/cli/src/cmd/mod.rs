//! CLI command implementations

pub mod active_sync;
pub mod projects;
