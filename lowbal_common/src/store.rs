//! In-memory negotiation session store.
//!
//! `SessionStore` is an explicitly owned collection of [`NegotiationTab`]s keyed
//! by [`SessionId`]. It performs no synchronization; the owner decides how it is
//! shared (the server keeps it on a single thread of control).
//!
//! Every mutation builds the next version of a record from a copy, validates it
//! and only then replaces the stored record, so an update either applies fully
//! or leaves the store untouched.

use std::collections::HashMap;

use chrono::Utc;
use log::{debug, info};

use crate::error::LowbalError;
use crate::negotiation::OfferDraft;
use crate::result::Result;
use crate::session::{
    ChatMessage, MAX_PROGRESS, MessageKind, NegotiationStatus, NegotiationTab, PROGRESS_STEP,
    SessionId, TabUpdate,
};

/// Owned collection of negotiation tabs.
#[derive(Debug)]
pub struct SessionStore {
    tabs: HashMap<SessionId, NegotiationTab>,
    next_id: SessionId,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            tabs: HashMap::new(),
            next_id: 1,
        }
    }

    /// Number of tabs held.
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns `true` if no tabs are held.
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Creates a new tab with default field values.
    pub fn create(&mut self) -> &NegotiationTab {
        let id = self.next_id;
        self.next_id = id + 1;
        info!("Negotiation {} created", id);
        self.tabs
            .entry(id)
            .or_insert_with(|| NegotiationTab::new(id, Utc::now()))
    }

    /// Looks a tab up by id.
    pub fn get(&self, id: SessionId) -> Option<&NegotiationTab> {
        self.tabs.get(&id)
    }

    /// Returns `true` while the tab has not been removed.
    pub fn contains(&self, id: SessionId) -> bool {
        self.tabs.contains_key(&id)
    }

    fn require(&self, id: SessionId) -> Result<&NegotiationTab> {
        self.tabs.get(&id).ok_or(LowbalError::SessionNotFound(id))
    }

    /// Validates `next` and swaps it in for the stored record with the same id.
    fn replace(&mut self, mut next: NegotiationTab) -> Result<&NegotiationTab> {
        next.validate()?;
        next.last_activity = Utc::now();
        let id = next.id;
        self.tabs.insert(id, next);
        self.require(id)
    }

    /// Applies a partial update to a tab.
    pub fn update(&mut self, id: SessionId, update: &TabUpdate) -> Result<&NegotiationTab> {
        let next = update.applied_to(self.require(id)?);
        debug!("Negotiation {} updated: {:?}", id, update);
        self.replace(next)
    }

    /// Appends a message to a tab's history.
    pub fn append_message(
        &mut self,
        id: SessionId,
        kind: MessageKind,
        content: &str,
    ) -> Result<&ChatMessage> {
        let mut next = self.require(id)?.clone();
        let message_id = next.next_message_id();
        next.messages.push(ChatMessage {
            id: message_id,
            kind,
            content: String::from(content),
            timestamp: Utc::now(),
        });
        let tab = self.replace(next)?;
        tab.messages
            .last()
            .ok_or_else(|| LowbalError::Format(String::from("message history is empty")))
    }

    /// Moves a tab's progress one step forward, capped at 100.
    pub fn advance_progress(&mut self, id: SessionId) -> Result<&NegotiationTab> {
        let mut next = self.require(id)?.clone();
        next.progress = next.progress.saturating_add(PROGRESS_STEP).min(MAX_PROGRESS);
        self.replace(next)
    }

    /// Stores a drafted counter-offer and its message on the tab it was drafted for.
    pub fn apply_offer(&mut self, draft: &OfferDraft) -> Result<&NegotiationTab> {
        let mut next = self.require(draft.session_id)?.clone();
        next.current_offer = Some(draft.quote.offer_price);
        let message_id = next.next_message_id();
        next.messages.push(ChatMessage {
            id: message_id,
            kind: MessageKind::Ai,
            content: draft.message.clone(),
            timestamp: Utc::now(),
        });
        info!(
            "Negotiation {}: offer {} applied",
            draft.session_id, draft.quote.offer_price
        );
        self.replace(next)
    }

    /// Removes a tab, returning its final state.
    pub fn remove(&mut self, id: SessionId) -> Result<NegotiationTab> {
        let tab = self.tabs.remove(&id).ok_or(LowbalError::SessionNotFound(id))?;
        info!("Negotiation {} removed", id);
        Ok(tab)
    }

    /// Lists tabs in creation order, optionally only those with `status`.
    pub fn list(&self, status: Option<NegotiationStatus>) -> Vec<&NegotiationTab> {
        let mut tabs: Vec<&NegotiationTab> = self
            .tabs
            .values()
            .filter(|tab| status.is_none_or(|s| tab.status == s))
            .collect();
        tabs.sort_by_key(|tab| tab.id);
        tabs
    }

    /// Number of tabs with status `active`.
    pub fn active_count(&self) -> usize {
        self.tabs
            .values()
            .filter(|tab| tab.status == NegotiationStatus::Active)
            .count()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::pricing::{DiscountRange, PriceQuote};

    #[test]
    fn test_create_assigns_increasing_ids() {
        let mut store = SessionStore::new();
        let a = store.create().id;
        let b = store.create().id;
        assert!(b > a);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_replaces_fields_and_touches_activity() {
        let mut store = SessionStore::new();
        let id = store.create().id;
        let before = store.get(id).unwrap().last_activity;
        let update = TabUpdate {
            title: Some(String::from("PS5 console")),
            category: Some(Category::Gadgets),
            original_price: Some(450.0),
            ..TabUpdate::default()
        };
        let tab = store.update(id, &update).unwrap();
        assert_eq!(tab.title, "PS5 console");
        assert_eq!(tab.category, Some(Category::Gadgets));
        assert!(tab.last_activity >= before);
    }

    #[test]
    fn test_invalid_update_leaves_record_untouched() {
        let mut store = SessionStore::new();
        let id = store.create().id;
        store
            .update(
                id,
                &TabUpdate {
                    title: Some(String::from("Sofa")),
                    ..TabUpdate::default()
                },
            )
            .unwrap();
        let before = store.get(id).unwrap().clone();

        let bad = TabUpdate {
            title: Some(String::from("Couch")),
            original_price: Some(-5.0),
            ..TabUpdate::default()
        };
        assert!(store.update(id, &bad).is_err());
        assert_eq!(store.get(id).unwrap(), &before);
    }

    #[test]
    fn test_unknown_id_is_reported() {
        let mut store = SessionStore::new();
        assert!(matches!(
            store.update(99, &TabUpdate::default()),
            Err(LowbalError::SessionNotFound(99))
        ));
        assert!(matches!(store.remove(99), Err(LowbalError::SessionNotFound(99))));
    }

    #[test]
    fn test_append_message_numbers_messages() {
        let mut store = SessionStore::new();
        let id = store.create().id;
        assert_eq!(store.append_message(id, MessageKind::User, "hi").unwrap().id, 1);
        let second = store
            .append_message(id, MessageKind::Seller, "lowest is 500")
            .unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(second.kind, MessageKind::Seller);
        assert_eq!(store.get(id).unwrap().messages.len(), 2);
    }

    #[test]
    fn test_advance_progress_caps_at_one_hundred() {
        let mut store = SessionStore::new();
        let id = store.create().id;
        for _ in 0..10 {
            store.advance_progress(id).unwrap();
        }
        assert_eq!(store.get(id).unwrap().progress, MAX_PROGRESS);
        let mut store = SessionStore::new();
        let id = store.create().id;
        assert_eq!(store.advance_progress(id).unwrap().progress, 15);
    }

    #[test]
    fn test_list_filters_by_status_in_creation_order() {
        let mut store = SessionStore::new();
        let a = store.create().id;
        let b = store.create().id;
        let c = store.create().id;
        store
            .update(
                b,
                &TabUpdate {
                    status: Some(NegotiationStatus::Completed),
                    ..TabUpdate::default()
                },
            )
            .unwrap();
        let all: Vec<SessionId> = store.list(None).iter().map(|t| t.id).collect();
        assert_eq!(all, vec![a, b, c]);
        let active: Vec<SessionId> = store
            .list(Some(NegotiationStatus::Active))
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(active, vec![a, c]);
        assert_eq!(store.active_count(), 2);
    }

    #[test]
    fn test_apply_offer_sets_offer_and_ai_message() {
        let mut store = SessionStore::new();
        let id = store.create().id;
        let draft = OfferDraft {
            session_id: id,
            quote: PriceQuote {
                offer_price: 700.0,
                percentage: 0.2,
                range: DiscountRange { lo: 0.15, hi: 0.3 },
                increment: 50.0,
            },
            message: String::from("Would you consider $700?"),
        };
        let tab = store.apply_offer(&draft).unwrap();
        assert_eq!(tab.current_offer, Some(700.0));
        assert_eq!(tab.messages[0].kind, MessageKind::Ai);

        store.remove(id).unwrap();
        assert!(store.apply_offer(&draft).is_err());
    }
}
