//! Expiration Module
//!
//! Time-bucketed expiration lists and the manager that sweeps them in the
//! background.

mod list;
mod manager;

#[cfg(test)]
mod property_tests;

pub use list::{ExpiresList, GcCallback};
pub use manager::{GcManager, DEFAULT_GC_INTERVAL};
