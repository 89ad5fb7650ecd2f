//! Configuration types for Ferry.
//!
//! This crate provides the configuration used by the `ferry` tool, read
//! from `.ferry/config.yaml` files with `FERRY_*` environment overrides.

pub mod env;
pub mod loader;
pub mod types;

#[cfg(test)]
mod integration_test;

pub use env::*;
pub use loader::*;
pub use types::*;
