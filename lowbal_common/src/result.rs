//! Result type alias shared across the workspace.
//!
//! Defaults the error type to `LowbalError`, so functions can simply return
//! `Result<T>`.
use crate::error::LowbalError;

/// Workspace-wide `Result` alias with `LowbalError` as the default error.
pub type Result<T, E = LowbalError> = std::result::Result<T, E>;
