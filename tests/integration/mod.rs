//! Integration tests module
//!
//! Runs the `octocheese` binary against a local wiremock server standing in
//! for both the GitHub REST API and PyPI.

pub mod cli;
pub mod common;
pub mod sync;
