//! Core utilities for OctoCheese
//!
//! Leaf types shared by the release synchronization code: the error taxonomy,
//! the redacting [`Secret`] wrapper, tag/version handling and config paths.

pub mod core;

pub use core::error::{OctoError, OctoResult};
pub use core::error_help::{format_error_with_help, ErrorHelp};
pub use core::secret::Secret;
