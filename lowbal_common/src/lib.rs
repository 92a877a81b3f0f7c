//!
//! Negotiation engine shared by the Lowbal server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `LowbalError` used across the workspace.
//! - `result` — handy `Result<T, LowbalError>` alias.
//! - `category` — listing categories and label parsing.
//! - `pricing` — the counter-offer pricing rule.
//! - `message` — negotiation message templates.
//! - `session` — negotiation records and partial updates.
//! - `store` — the in-memory negotiation store.
//! - `negotiation` — drafting an offer for a stored negotiation.
//! - `deals` — completed deals and savings statistics.
//! - `command` — JSON request/response payloads exchanged between client and server.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod result;
pub mod category;
pub mod pricing;
pub mod message;
pub mod session;
pub mod store;
pub mod negotiation;
pub mod deals;
pub mod command;
pub mod net;

pub use error::LowbalError;
pub use result::Result;
pub use command::{Request, Response};
pub use category::Category;
