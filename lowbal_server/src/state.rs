//! Server-side negotiation state.
//!
//! `Negotiations` owns the session store, the deal ledger and the random
//! generator used for stateless quotes and messages. It lives on the main loop
//! thread only; requests reach it through channels and are answered
//! synchronously, except offer generation, which is deferred to the assistant.

use log::{info, warn};
use lowbal_common::command::{Request, Response};
use lowbal_common::deals::DealLedger;
use lowbal_common::message::select_message_with;
use lowbal_common::negotiation::{OfferDraft, missing_field};
use lowbal_common::pricing::counter_offer_with;
use lowbal_common::result::Result;
use lowbal_common::session::{NegotiationTab, SessionId};
use lowbal_common::store::SessionStore;
use lowbal_common::LowbalError;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// What the main loop must do with a request.
#[derive(Debug)]
pub enum Dispatch {
    /// Answer right away.
    Reply(Response),
    /// Hand the tab snapshot to the assistant and answer once the draft arrives.
    Defer(NegotiationTab),
}

/// State owned by the main loop.
pub struct Negotiations {
    store: SessionStore,
    ledger: DealLedger,
    rng: StdRng,
}

impl Negotiations {
    /// Creates empty state; `seed` makes quotes and messages reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            store: SessionStore::new(),
            ledger: DealLedger::new(),
            rng,
        }
    }

    /// Read access to the store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Executes `request` against the owned state.
    pub fn handle(&mut self, request: Request) -> Dispatch {
        match request {
            Request::GenerateOffer { id } => match self.offer_snapshot(id) {
                Ok(tab) => Dispatch::Defer(tab),
                Err(e) => Dispatch::Reply(e.into()),
            },
            other => Dispatch::Reply(self.respond(other).unwrap_or_else(Response::from)),
        }
    }

    fn respond(&mut self, request: Request) -> Result<Response> {
        let response = match request {
            Request::Quote(quote) => Response::Quote(counter_offer_with(&quote, &mut self.rng)?),
            Request::Message(message) => {
                Response::Message(select_message_with(&message, &mut self.rng))
            }
            Request::Create => Response::Tab(self.store.create().clone()),
            Request::Update { id, update } => Response::Tab(self.store.update(id, &update)?.clone()),
            Request::AppendMessage { id, kind, content } => {
                Response::ChatMessage(self.store.append_message(id, kind, &content)?.clone())
            }
            Request::AdvanceProgress { id } => {
                Response::Tab(self.store.advance_progress(id)?.clone())
            }
            Request::Close { id, outcome } => {
                Response::Deal(self.ledger.close_tab(&mut self.store, id, &outcome)?)
            }
            Request::List { status } => {
                Response::Tabs(self.store.list(status).into_iter().cloned().collect())
            }
            Request::Stats => Response::Stats(self.ledger.stats(&self.store)),
            Request::GenerateOffer { id } => {
                return Err(LowbalError::Format(format!(
                    "offer generation for {} must be deferred",
                    id
                )));
            }
        };
        Ok(response)
    }

    /// Validates a tab for drafting and returns a snapshot of it.
    fn offer_snapshot(&self, id: SessionId) -> Result<NegotiationTab> {
        let tab = self
            .store
            .get(id)
            .ok_or(LowbalError::SessionNotFound(id))?;
        if let Some(field) = missing_field(tab) {
            return Err(LowbalError::MissingField(field));
        }
        Ok(tab.clone())
    }

    /// Applies a delayed draft if its tab is still open.
    pub fn complete_offer(&mut self, id: SessionId, draft: Result<OfferDraft>) -> Response {
        if !self.store.contains(id) {
            warn!("Negotiation {} closed before its offer was ready; draft discarded", id);
            return LowbalError::SessionNotFound(id).into();
        }
        match draft.and_then(|draft| self.store.apply_offer(&draft).cloned()) {
            Ok(tab) => {
                info!("Negotiation {}: offer delivered", id);
                Response::Tab(tab)
            }
            Err(e) => e.into(),
        }
    }
}
