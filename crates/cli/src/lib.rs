//! Isosceles CLI library
//!
//! Exposes the active-sync pieces so they can be driven from tests.

pub mod cmd;
pub mod display;
pub mod locks;
pub mod orchestrator;
pub mod shutdown;
