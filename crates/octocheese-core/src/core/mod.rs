pub mod error;
pub mod error_help;
pub mod path;
pub mod secret;
pub mod version;

pub use error::{OctoError, OctoResult};
pub use secret::Secret;
