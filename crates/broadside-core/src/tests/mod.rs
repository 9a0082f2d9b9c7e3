//! Crate-level test suites.
//!
//! - `scenarios.rs`: end-to-end battles with hand-checked results
//! - `determinism.rs`: seeded runs reproduce exactly
//! - `properties.rs`: damage invariants under arbitrary inputs
//! - `helpers.rs`: factories shared with the unit tests in each module

pub mod helpers;
mod properties;
