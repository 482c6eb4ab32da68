//! Integration test utilities for the voice tracker
//!
//! Spawns the real Axum application on a local port with the in-memory
//! store and drives it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
