//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates. Host applications can depend on `drive-sync-workspace`
//! and enable `desktop-shims` to get the reqwest/OS-backed service façade
//! without wiring each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
