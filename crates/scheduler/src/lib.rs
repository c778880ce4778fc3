//! Change-coalescing scheduler for isosceles
//!
//! This crate provides:
//! - Per-project batch state (sliding cooldown, minimum run spacing)
//! - The single-owner decision loop that fires batches
//! - Sync execution through an external transfer command

pub mod batch;
pub mod executor;
pub mod scheduler;

// Re-exports
pub use batch::{BatchState, Phase, Timing};
pub use executor::{RsyncExecutor, SyncExecutor};
pub use scheduler::Scheduler;
