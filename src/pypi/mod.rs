//! PyPI integration
//!
//! This module provides functionality for interacting with PyPI to:
//! - Fetch the files published for every version of a project
//! - Download distribution files for re-upload to GitHub

pub mod client;
pub mod types;

pub use client::PyPiClient;
pub use types::{FileDescriptor, IndexReleaseMap};
