//! User-facing error rendering.
//!
//! Errors reaching the top of the binary are printed either as a short message
//! with an actionable hint, or (with `--traceback`) with the full debug detail
//! and source chain for diagnostics.

use crate::core::error::OctoError;
use std::error::Error as _;
use std::fmt::Write as _;

/// Suggestions for resolving an error
pub trait ErrorHelp {
    /// A hint telling the user how to fix the problem, if there is one.
    fn help(&self) -> Option<&'static str>;
}

impl ErrorHelp for OctoError {
    fn help(&self) -> Option<&'static str> {
        match self {
            OctoError::Authentication(_) => Some(
                "Check the token passed with --token or the GITHUB_TOKEN environment variable.",
            ),
            OctoError::InvalidRepository(_) => Some(
                "Pass --repo as <owner>/<name> or https://github.com/<owner>/<name>.",
            ),
            OctoError::NotFound(_) => {
                Some("Make sure the repository exists and the token can access it.")
            }
            OctoError::Config(_) | OctoError::Yaml(_) => {
                Some("Fix or remove the configuration file and try again.")
            }
            OctoError::Http(_) => Some("Check your network connection and try again."),
            OctoError::RateLimited { .. } => {
                Some("Wait for the rate limit to reset, or use a token with a higher quota.")
            }
            _ => None,
        }
    }
}

/// Format an error for the console.
///
/// With `traceback` set the `Debug` representation and every `source()` in the
/// chain are included; otherwise only the message and a hint are shown.
pub fn format_error_with_help(err: &OctoError, traceback: bool) -> String {
    let mut out = format!("Error: {}", err);

    if traceback {
        let _ = write!(out, "\n\n{:?}", err);
        let mut source = err.source();
        while let Some(cause) = source {
            let _ = write!(out, "\n  caused by: {}", cause);
            source = cause.source();
        }
    }

    if let Some(help) = err.help() {
        let _ = write!(out, "\n\nhelp: {}", help);
    }

    out
}
