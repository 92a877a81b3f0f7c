//! Command-line arguments for the Lowbal client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, Subcommand};
use lowbal_common::Category;
use lowbal_common::deals::DealOutcome;
use lowbal_common::message::MessageRequest;
use lowbal_common::net::{COMMAND_PORT, DEFAULT_HOST};
use lowbal_common::session::{MessageKind, NegotiationStatus, SessionId, TabUpdate};
use lowbal_common::{Request, pricing::PriceQuoteRequest};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server IP address (IPv4 or IPv6) where the negotiation service is running.
    #[clap(long, default_value = DEFAULT_HOST)]
    pub server_ip: String,

    /// Server command port.
    #[clap(long, default_value_t = COMMAND_PORT)]
    pub port: u16,

    /// What to do.
    #[command(subcommand)]
    pub action: Action,
}

/// Client actions. Each maps to a single server request.
#[derive(Debug, Subcommand)]
pub enum Action {
    /// Suggest a counter-offer for a listing.
    Quote {
        /// Listed asking price.
        #[clap(long)]
        price: f64,
        /// Marketplace the listing is on.
        #[clap(long, default_value = "")]
        platform: String,
        /// Listing category; unknown labels count as `general`.
        #[clap(long)]
        category: Option<String>,
        /// Compute locally instead of asking the server.
        #[clap(long)]
        local: bool,
    },
    /// Draft a negotiation message proposing an offer.
    Message {
        /// Listing title.
        #[clap(long)]
        title: String,
        /// Listed asking price.
        #[clap(long)]
        price: f64,
        /// Offer to propose.
        #[clap(long)]
        offer: f64,
        /// Marketplace the listing is on.
        #[clap(long, default_value = "")]
        platform: String,
        /// Extra context for the seller.
        #[clap(long, default_value = "")]
        notes: String,
        /// Listing category; unknown labels count as `general`.
        #[clap(long)]
        category: Option<String>,
        /// Compute locally instead of asking the server.
        #[clap(long)]
        local: bool,
    },
    /// Open a new negotiation.
    New,
    /// Change fields of a negotiation.
    Update {
        /// Negotiation id.
        #[clap(long)]
        id: SessionId,
        /// Listing title.
        #[clap(long)]
        title: Option<String>,
        /// Listing category; unknown labels count as `general`.
        #[clap(long)]
        category: Option<String>,
        /// Marketplace the listing is on.
        #[clap(long)]
        platform: Option<String>,
        /// Listed asking price.
        #[clap(long)]
        price: Option<f64>,
        /// Most you are willing to pay.
        #[clap(long)]
        max_budget: Option<f64>,
        /// Negotiation status.
        #[clap(long, value_enum)]
        status: Option<NegotiationStatus>,
    },
    /// Record a message in a negotiation.
    Say {
        /// Negotiation id.
        #[clap(long)]
        id: SessionId,
        /// Author of the message.
        #[clap(long, value_enum, default_value_t = MessageKind::User)]
        kind: MessageKind,
        /// Message text.
        content: String,
    },
    /// Generate a counter-offer and message for a negotiation.
    Offer {
        /// Negotiation id.
        #[clap(long)]
        id: SessionId,
    },
    /// Move a negotiation's progress forward.
    Progress {
        /// Negotiation id.
        #[clap(long)]
        id: SessionId,
    },
    /// Close a negotiation.
    Close {
        /// Negotiation id.
        #[clap(long)]
        id: SessionId,
        /// The purchase went through.
        #[clap(long)]
        deal_closed: bool,
        /// Price actually paid.
        #[clap(long)]
        final_price: Option<f64>,
    },
    /// List negotiations.
    List {
        /// Only negotiations with this status.
        #[clap(long, value_enum)]
        status: Option<NegotiationStatus>,
    },
    /// Show savings statistics.
    Stats,
}

/// Resolves an optional category label given on the command line.
fn category(label: &Option<String>) -> Option<Category> {
    label.as_deref().and_then(Category::from_label)
}

impl Action {
    /// Builds the request this action sends.
    pub fn to_request(&self) -> Request {
        match self {
            Action::Quote {
                price,
                platform,
                category: label,
                ..
            } => Request::Quote(PriceQuoteRequest::new(*price, platform, category(label))),
            Action::Message {
                title,
                price,
                offer,
                platform,
                notes,
                category: label,
                ..
            } => Request::Message(MessageRequest {
                title: title.clone(),
                original_price: *price,
                offer: *offer,
                platform: platform.clone(),
                notes: notes.clone(),
                category: category(label),
            }),
            Action::New => Request::Create,
            Action::Update {
                id,
                title,
                category: label,
                platform,
                price,
                max_budget,
                status,
            } => Request::Update {
                id: *id,
                update: TabUpdate {
                    title: title.clone(),
                    category: category(label),
                    platform: platform.clone(),
                    original_price: *price,
                    max_budget: *max_budget,
                    current_offer: None,
                    status: *status,
                    progress: None,
                },
            },
            Action::Say { id, kind, content } => Request::AppendMessage {
                id: *id,
                kind: *kind,
                content: content.clone(),
            },
            Action::Offer { id } => Request::GenerateOffer { id: *id },
            Action::Progress { id } => Request::AdvanceProgress { id: *id },
            Action::Close {
                id,
                deal_closed,
                final_price,
            } => Request::Close {
                id: *id,
                outcome: DealOutcome {
                    deal_closed: *deal_closed,
                    final_price: *final_price,
                },
            },
            Action::List { status } => Request::List { status: *status },
            Action::Stats => Request::Stats,
        }
    }

    /// Returns `true` if the action should be computed without a server.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Action::Quote { local: true, .. } | Action::Message { local: true, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_action_builds_quote_request() {
        let args = Args::parse_from([
            "lowbal_client",
            "quote",
            "--price",
            "15000",
            "--platform",
            "Craigslist",
            "--category",
            "cars",
        ]);
        assert_eq!(args.server_ip, "127.0.0.1");
        assert!(!args.action.is_local());
        assert_eq!(
            args.action.to_request(),
            Request::quote(15_000.0, "Craigslist", Some(Category::Cars))
        );
    }

    #[test]
    fn test_close_action_carries_outcome() {
        let args = Args::parse_from([
            "lowbal_client",
            "close",
            "--id",
            "4",
            "--deal-closed",
            "--final-price",
            "600",
        ]);
        assert_eq!(
            args.action.to_request(),
            Request::Close {
                id: 4,
                outcome: DealOutcome {
                    deal_closed: true,
                    final_price: Some(600.0),
                },
            }
        );
    }

    #[test]
    fn test_say_defaults_to_user_kind() {
        let args = Args::parse_from(["lowbal_client", "say", "--id", "2", "Is it available?"]);
        match args.action.to_request() {
            Request::AppendMessage { kind, content, .. } => {
                assert_eq!(kind, MessageKind::User);
                assert_eq!(content, "Is it available?");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_local_flag() {
        let args = Args::parse_from(["lowbal_client", "quote", "--price", "50", "--local"]);
        assert!(args.action.is_local());
    }
}
