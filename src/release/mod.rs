//! Keeping one GitHub release in step with its PyPI version
//!
//! - [`message`]: release body text
//! - [`staleness`]: whether an existing release is settled and left alone
//! - [`checksum`]: SHA-256 verification of downloaded files
//! - [`updater`]: create/edit the release and upload missing files

pub mod checksum;
pub mod message;
pub mod staleness;
pub mod updater;

pub use message::compose;
pub use staleness::StalenessPolicy;
pub use updater::{ReleaseAction, ReleaseUpdater, SyncReport};
