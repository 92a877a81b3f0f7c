//! Shared protocol types used by client and server.
//!
//! Every connection carries exactly one `Request` followed by one `Response`,
//! each encoded as a single line of JSON.
use std::io::{BufRead, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::deals::{CompletedDeal, DealOutcome, SavingsStats};
use crate::error::LowbalError;
use crate::message::MessageRequest;
use crate::pricing::{PriceQuote, PriceQuoteRequest};
use crate::result::Result;
use crate::session::{ChatMessage, MessageKind, NegotiationStatus, NegotiationTab, SessionId, TabUpdate};

/// Command sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    /// Compute a counter-offer without touching any negotiation.
    Quote(PriceQuoteRequest),
    /// Pick a negotiation message without touching any negotiation.
    Message(MessageRequest),
    /// Open a new negotiation.
    Create,
    /// Change fields of a negotiation.
    Update {
        /// Target negotiation.
        id: SessionId,
        /// Fields to change.
        update: TabUpdate,
    },
    /// Add a message to a negotiation's history.
    AppendMessage {
        /// Target negotiation.
        id: SessionId,
        /// Author of the message.
        kind: MessageKind,
        /// Message text.
        content: String,
    },
    /// Draft a counter-offer and message for a negotiation, after a processing delay.
    GenerateOffer {
        /// Target negotiation.
        id: SessionId,
    },
    /// Move a negotiation's progress one step forward.
    AdvanceProgress {
        /// Target negotiation.
        id: SessionId,
    },
    /// Close a negotiation, optionally recording a completed deal.
    Close {
        /// Target negotiation.
        id: SessionId,
        /// What the buyer reports.
        #[serde(default)]
        outcome: DealOutcome,
    },
    /// List negotiations.
    List {
        /// Only negotiations with this status.
        #[serde(default)]
        status: Option<NegotiationStatus>,
    },
    /// Savings dashboard figures.
    Stats,
}

impl Request {
    /// Creates a quote request.
    pub fn quote(original_price: f64, platform: &str, category: Option<Category>) -> Self {
        Request::Quote(PriceQuoteRequest::new(original_price, platform, category))
    }
}

/// Reply sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Response {
    /// Result of [`Request::Quote`].
    Quote(PriceQuote),
    /// Result of [`Request::Message`].
    Message(String),
    /// A single negotiation after the requested change.
    Tab(NegotiationTab),
    /// Result of [`Request::List`].
    Tabs(Vec<NegotiationTab>),
    /// Result of [`Request::AppendMessage`].
    ChatMessage(ChatMessage),
    /// Result of [`Request::Close`]; `None` when no deal was recorded.
    Deal(Option<CompletedDeal>),
    /// Result of [`Request::Stats`].
    Stats(SavingsStats),
    /// The request failed; contains the error text.
    Error(String),
}

impl From<LowbalError> for Response {
    fn from(err: LowbalError) -> Self {
        Response::Error(err.to_string())
    }
}

/// Writes `value` as one line of JSON.
pub fn write_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()?;
    Ok(())
}

/// Reads one line of JSON into `T`.
pub fn read_line<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> Result<T> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(LowbalError::Format(String::from("connection closed before a line was read")));
    }
    Ok(serde_json::from_str(line.trim_end())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_request_json_shape() {
        let json = serde_json::to_value(Request::quote(50.0, "eBay", None)).unwrap();
        assert_eq!(json["command"], "quote");
        assert_eq!(json["original_price"], 50.0);
        assert_eq!(json["platform"], "eBay");

        let close: Request = serde_json::from_str(r#"{"command":"close","id":3}"#).unwrap();
        assert_eq!(
            close,
            Request::Close {
                id: 3,
                outcome: DealOutcome::default()
            }
        );
    }

    #[test]
    fn test_empty_category_label_selects_platform_fallback() {
        let quote: Request = serde_json::from_str(
            r#"{"command":"quote","original_price":50,"platform":"eBay","category":""}"#,
        )
        .unwrap();
        let Request::Quote(quote) = quote else {
            panic!("expected a quote request");
        };
        assert_eq!(quote.category, None);
        assert_eq!(
            crate::pricing::PricingKey::resolve(&quote),
            crate::pricing::PricingKey::Platform(crate::pricing::PlatformTier::BargainClassified)
        );

        let message: Request = serde_json::from_str(
            r#"{"command":"message","title":"Desk","original_price":80,"offer":60,"platform":"eBay","category":"  "}"#,
        )
        .unwrap();
        assert!(matches!(message, Request::Message(MessageRequest { category: None, .. })));

        let update: Request =
            serde_json::from_str(r#"{"command":"update","id":2,"update":{"category":""}}"#).unwrap();
        assert_eq!(
            update,
            Request::Update {
                id: 2,
                update: TabUpdate::default()
            }
        );

        let named: Request = serde_json::from_str(
            r#"{"command":"quote","original_price":50,"platform":"eBay","category":"furniture"}"#,
        )
        .unwrap();
        assert_eq!(named, Request::quote(50.0, "eBay", Some(Category::Furniture)));
    }

    #[test]
    fn test_response_json_shape() {
        let json = serde_json::to_value(Response::Message(String::from("hi"))).unwrap();
        assert_eq!(json["kind"], "message");
        assert_eq!(json["data"], "hi");
    }

    #[test]
    fn test_line_framing() {
        let mut buf = Vec::new();
        write_line(&mut buf, &Request::Stats).unwrap();
        assert_eq!(buf.last(), Some(&b'\n'));
        let parsed: Request = read_line(&mut Cursor::new(buf)).unwrap();
        assert_eq!(parsed, Request::Stats);
    }

    #[test]
    fn test_read_line_on_closed_stream() {
        let result: Result<Request> = read_line(&mut Cursor::new(Vec::new()));
        assert!(matches!(result, Err(LowbalError::Format(_))));
    }

    #[test]
    fn test_errors_become_error_responses() {
        let response = Response::from(LowbalError::SessionNotFound(8));
        assert_eq!(response, Response::Error(String::from("Negotiation 8 not found")));
    }
}
