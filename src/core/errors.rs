/*!
 * Error Types
 * Rust-side failures with thiserror, miette and serde support
 *
 * Table operations never return these: they speak legacy [`ErrorCode`]s.
 * `ShimError` covers what happens around the table (bootstrap,
 * configuration, collaborator setup).
 */

use super::codes::ErrorCode;
use crate::core::data_structures::InlineString;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bootstrap and configuration errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ShimError {
    #[error("Unable to obtain STiK flag semaphore")]
    #[diagnostic(
        code(lifecycle::semaphore_unavailable),
        help("Another transport module already owns the flag semaphore. Tear it down first.")
    )]
    SemaphoreUnavailable(InlineString),

    #[error("Semaphore {0} does not exist")]
    #[diagnostic(
        code(lifecycle::semaphore_missing),
        help("The semaphore was never created or has already been destroyed.")
    )]
    SemaphoreMissing(InlineString),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(config::invalid),
        help("Check STIK_* environment variables or the JSON configuration.")
    )]
    Configuration(InlineString),

    #[error("Driver magic mismatch")]
    #[diagnostic(
        code(table::bad_magic),
        help("The header does not start with the STiK driver magic.")
    )]
    BadMagic,

    #[error("No capability table named {0}")]
    #[diagnostic(
        code(table::not_found),
        help("Only the TRANSPORT_TCPIP table is provided.")
    )]
    TableNotFound(InlineString),

    #[error("Transport call failed: {0}")]
    #[diagnostic(code(table::call_failed))]
    Transport(ErrorCode),
}

impl ShimError {
    #[inline]
    pub fn configuration(msg: impl Into<InlineString>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<ErrorCode> for ShimError {
    fn from(code: ErrorCode) -> Self {
        ShimError::Transport(code)
    }
}

impl From<serde_json::Error> for ShimError {
    fn from(err: serde_json::Error) -> Self {
        ShimError::Configuration(err.to_string().into())
    }
}

/// Common result type for bootstrap operations
pub type ShimResult<T> = Result<T, ShimError>;
