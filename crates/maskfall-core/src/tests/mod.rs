//! Engine-level test suites.
//!
//! - `helpers.rs`: engine factories and input scripting
//! - `integration.rs`: end-to-end scenarios through the public engine surface
//! - `determinism.rs`: same seed and same inputs give the same state hash

mod helpers;
mod integration;
