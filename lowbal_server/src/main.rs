//! Lowbal negotiation server.
//!
//! This binary serves negotiation commands over TCP. Internally, it wires together three
//! main building blocks:
//!
//! - `CommandReceiver` — accepts TCP connections, decodes one JSON `Request` per
//!   connection and forwards it to the main loop together with a reply channel.
//! - `Negotiations` — the session store, deal ledger and random generator. It is owned by
//!   the main loop thread alone, so no locks guard it.
//! - `OfferAssistant` — drafts counter-offers on a background thread and releases each
//!   draft after a simulated processing delay.
//!
//! Concurrency and shutdown:
//! - Crossbeam `select!` multiplexes incoming requests, delayed drafts and the shutdown
//!   signal.
//! - A delayed draft is applied only if its negotiation is still open when it arrives;
//!   otherwise the waiting client is told the negotiation no longer exists.
//! - Ctrl+C triggers a shutdown signal; dropping the job channel stops the assistant.
//!
//! Network protocol (high‑level):
//! - Bind address: `127.0.0.1:7878` unless overridden on the command line.
//! - Client sends one newline-terminated JSON request and reads one JSON response line.
#![warn(missing_docs)]
use crate::args::Args;
use crate::assistant::{AssistantEvent, OfferAssistant, OfferJob};
use crate::receiver::{CommandReceiver, Envelope};
use crate::state::{Dispatch, Negotiations};
use clap::Parser;
use crossbeam_channel::{Receiver, Sender, bounded, select, unbounded};
use log::{error, info, warn};
use lowbal_common::LowbalError;
use lowbal_common::Result;
use std::thread;

mod args;
mod assistant;
mod receiver;
mod state;

fn main() -> Result<(), LowbalError> {
    init_logger();
    let args = Args::parse();

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down server...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| LowbalError::Format(format!("Failed to set Ctrl+C handler: {}", e)))?;

    let (request_tx, request_rx) = unbounded::<Envelope>();
    let receiver = CommandReceiver::new(&args.bind_addr())?;
    info!("Listening for commands on {}", receiver.local_addr()?);
    thread::spawn(move || {
        if let Err(e) = receiver.receive_loop_with_channel(request_tx) {
            error!("Receiver loop failed: {:?}", e);
        }
    });

    let (event_tx, event_rx) = unbounded::<AssistantEvent>();
    let (job_tx, assistant) = OfferAssistant::start(args.assistant_config(), event_tx);
    let mut negotiations = Negotiations::new(args.seed);

    serve(&mut negotiations, &request_rx, &event_rx, &job_tx, &shutdown_rx);

    drop(job_tx);
    if assistant.join().is_err() {
        error!("Offer assistant panicked");
    }
    info!(
        "Server stopped with {} open negotiation(s)",
        negotiations.store().len()
    );
    Ok(())
}

/// Main loop: runs until shutdown or until the request or event channel disconnects.
fn serve(
    negotiations: &mut Negotiations,
    requests: &Receiver<Envelope>,
    events: &Receiver<AssistantEvent>,
    jobs: &Sender<OfferJob>,
    shutdown: &Receiver<()>,
) {
    loop {
        select! {
            recv(requests) -> msg => match msg {
                Ok((request, reply)) => match negotiations.handle(request) {
                    Dispatch::Reply(response) => {
                        if reply.send(response).is_err() {
                            warn!("Client disconnected before its reply was sent");
                        }
                    }
                    Dispatch::Defer(tab) => {
                        let id = tab.id;
                        if let Err(e) = jobs.send(OfferJob { tab, reply }) {
                            error!("Failed to queue offer for negotiation {}: {}", id, e);
                        }
                    }
                },
                Err(e) => {
                    error!("Request channel closed: {}", e);
                    break;
                }
            },

            recv(events) -> event => match event {
                Ok(AssistantEvent::Drafted { session_id, draft, reply }) => {
                    let response = negotiations.complete_offer(session_id, draft);
                    if reply.send(response).is_err() {
                        warn!("Client for negotiation {} disconnected before the offer arrived", session_id);
                    }
                }
                Err(e) => {
                    error!("Offer assistant channel closed: {}", e);
                    break;
                }
            },

            recv(shutdown) -> _ => break,
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
