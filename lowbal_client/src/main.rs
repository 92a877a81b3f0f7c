//! Lowbal Client — a command-line front end for the negotiation server. Each invocation
//! sends one request over TCP and prints the server's answer. Quotes and messages can also
//! be computed locally with `--local`, without a running server.
//!
//! Usage example (CLI):
//! ```bash
//! lowbal_client quote --price 15000 --platform Craigslist --category cars
//! lowbal_client new
//! lowbal_client update --id 1 --title "2015 Honda Civic" --platform Craigslist --price 15000 --category cars
//! lowbal_client offer --id 1
//! lowbal_client close --id 1 --deal-closed --final-price 12500
//! ```
#![warn(missing_docs)]
mod args;
mod sender;

use crate::args::Args;
use crate::sender::CommandSender;
use clap::Parser;
use log::error;
use lowbal_common::message::{format_amount, select_message};
use lowbal_common::net::addr;
use lowbal_common::pricing::counter_offer;
use lowbal_common::session::NegotiationTab;
use lowbal_common::{LowbalError, Request, Response, Result};

fn main() -> Result<(), LowbalError> {
    init_logger();
    let args = Args::parse();
    let request = args.action.to_request();

    let response = if args.action.is_local() {
        compute_locally(request)
    } else {
        let server_ip = args.server_ip.trim().replace('"', "");
        CommandSender::send_request(&addr(&server_ip, args.port), &request)?
    };

    if let Response::Error(text) = &response {
        error!("Server error: {}", text);
        return Err(LowbalError::Format(text.clone()));
    }
    print_response(&response)?;
    Ok(())
}

/// Answers the stateless requests without a server.
fn compute_locally(request: Request) -> Response {
    match request {
        Request::Quote(quote) => counter_offer(&quote)
            .map(Response::Quote)
            .unwrap_or_else(Response::from),
        Request::Message(message) => Response::Message(select_message(&message)),
        other => Response::Error(format!("{:?} needs a running server", other)),
    }
}

fn print_response(response: &Response) -> Result<()> {
    match response {
        Response::Quote(quote) => println!(
            "Suggested offer: ${} ({:.1}% off, rounded down to ${})",
            format_amount(quote.offer_price),
            quote.percentage * 100.0,
            format_amount(quote.increment)
        ),
        Response::Message(message) => println!("{}", message),
        Response::Tab(tab) => print_tab(tab),
        Response::Tabs(tabs) if tabs.is_empty() => println!("No negotiations."),
        Response::Tabs(tabs) => tabs.iter().for_each(print_tab),
        Response::ChatMessage(message) => {
            println!("[{}] {}: {}", message.id, message.kind, message.content)
        }
        Response::Deal(Some(deal)) => println!(
            "Deal closed: saved ${} ({}% off {})",
            format_amount(deal.savings),
            deal.savings_percentage,
            deal.title
        ),
        Response::Deal(None) => println!("Negotiation closed."),
        Response::Stats(stats) => println!("{}", serde_json::to_string_pretty(stats)?),
        Response::Error(text) => println!("Error: {}", text),
    }
    Ok(())
}

fn print_tab(tab: &NegotiationTab) {
    let category = tab
        .category
        .map(|c| c.display_name().to_string())
        .unwrap_or_else(|| String::from("-"));
    let offer = tab
        .current_offer
        .map(format_amount)
        .unwrap_or_else(|| String::from("-"));
    println!(
        "#{} [{}] {} | {} on {} | asking ${} | offer ${} | progress {}%",
        tab.id,
        tab.status,
        if tab.title.is_empty() { "(untitled)" } else { tab.title.as_str() },
        category,
        if tab.platform.is_empty() { "-" } else { tab.platform.as_str() },
        format_amount(tab.original_price),
        offer,
        tab.progress
    );
    if let Some(last) = tab.messages.last() {
        println!("    {}: {}", last.kind, last.content);
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowbal_common::Category;

    #[test]
    fn test_local_quote() {
        match compute_locally(Request::quote(50.0, "eBay", None)) {
            Response::Quote(quote) => assert!(quote.offer_price == 30.0 || quote.offer_price == 40.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_local_quote_rejects_zero_price() {
        assert!(matches!(
            compute_locally(Request::quote(0.0, "eBay", Some(Category::Cars))),
            Response::Error(_)
        ));
    }

    #[test]
    fn test_stateful_requests_need_server() {
        assert!(matches!(compute_locally(Request::Create), Response::Error(_)));
    }
}
