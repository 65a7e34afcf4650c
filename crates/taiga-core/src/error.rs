//! Shared error types for the Taiga workspace.
//!
//! Subsystem-specific errors (configuration, spawning) live next to the
//! subsystems that produce them; this module holds only the errors that
//! cross the controller boundary.

use std::error::Error;
use std::fmt;

/// Errors from controller input validation.
///
/// These are recovered locally and surfaced to the controller as a
/// validation message; no session state changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputError {
    /// Dimension text did not match `"<int>x<int>"`.
    InvalidDimensions {
        /// The offending input, verbatim.
        input: String,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { input } => {
                write!(f, "invalid dimensions {input:?}: expected text like \"800x600\"")
            }
        }
    }
}

impl Error for InputError {}
