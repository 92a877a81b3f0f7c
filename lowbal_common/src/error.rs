//! Error type shared between client and server.
//!
//! The `LowbalError` enum unifies I/O, serialization, channel communication and
//! domain validation failures, allowing crates to propagate a single error type.
use std::io;

use thiserror::Error;

use crate::session::SessionId;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum LowbalError {
    /// I/O error originating from the standard library or sockets.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Asking price that is zero, negative or not a finite number.
    #[error("Invalid price: {0} (expected a finite amount greater than zero)")]
    InvalidPrice(f64),

    /// A session field was given a value the record cannot hold.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidField {
        /// Name of the rejected field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A field required to draft an offer is empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// No negotiation tab with this id is held by the store.
    #[error("Negotiation {0} not found")]
    SessionNotFound(SessionId),

    /// Channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Generic formatting/protocol error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),
}
