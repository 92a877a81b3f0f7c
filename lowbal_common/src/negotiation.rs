//! Offer drafting for a negotiation tab.
//!
//! Drafting checks that the tab carries everything the pricing rule and the
//! message selector need, then produces an [`OfferDraft`]. The draft is a
//! plain value: it can be computed away from the store (for example after a
//! simulated processing delay) and applied later with
//! [`crate::store::SessionStore::apply_offer`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LowbalError;
use crate::message::{MessageRequest, select_message_with};
use crate::pricing::{PriceQuote, PriceQuoteRequest, counter_offer_with};
use crate::result::Result;
use crate::session::{NegotiationTab, SessionId};

/// Counter-offer and message computed for one tab, not yet applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferDraft {
    /// Tab the draft was computed for.
    pub session_id: SessionId,
    /// Pricing result.
    pub quote: PriceQuote,
    /// Message proposing the offer.
    pub message: String,
}

/// Returns the name of the first required field that is empty.
pub fn missing_field(tab: &NegotiationTab) -> Option<&'static str> {
    if tab.title.trim().is_empty() {
        Some("title")
    } else if tab.original_price <= 0.0 {
        Some("original_price")
    } else if tab.platform.trim().is_empty() {
        Some("platform")
    } else if tab.category.is_none() {
        Some("category")
    } else {
        None
    }
}

/// Computes a counter-offer and a matching message for `tab`.
pub fn draft_offer<R: Rng + ?Sized>(tab: &NegotiationTab, rng: &mut R) -> Result<OfferDraft> {
    if let Some(field) = missing_field(tab) {
        return Err(LowbalError::MissingField(field));
    }

    let request = PriceQuoteRequest::new(tab.original_price, &tab.platform, tab.category);
    let quote = counter_offer_with(&request, rng)?;
    let message = select_message_with(
        &MessageRequest {
            title: tab.title.clone(),
            original_price: tab.original_price,
            offer: quote.offer_price,
            platform: tab.platform.clone(),
            notes: String::new(),
            category: tab.category,
        },
        rng,
    );

    Ok(OfferDraft {
        session_id: tab.id,
        quote,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn filled_tab() -> NegotiationTab {
        let mut tab = NegotiationTab::new(4, Utc::now());
        tab.title = String::from("Trek mountain bike");
        tab.original_price = 900.0;
        tab.platform = String::from("OfferUp");
        tab.category = Some(Category::Motorcycles);
        tab
    }

    #[test]
    fn test_draft_offer_for_complete_tab() {
        let mut rng = StdRng::seed_from_u64(21);
        let draft = draft_offer(&filled_tab(), &mut rng).unwrap();
        assert_eq!(draft.session_id, 4);
        assert!(draft.quote.offer_price < 900.0);
        assert!(draft.message.contains(&format!("${:.0}", draft.quote.offer_price)));
    }

    #[test]
    fn test_missing_fields_are_reported_in_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut tab = filled_tab();
        tab.category = None;
        assert!(matches!(
            draft_offer(&tab, &mut rng),
            Err(LowbalError::MissingField("category"))
        ));
        tab.platform.clear();
        assert_eq!(missing_field(&tab), Some("platform"));
        tab.original_price = 0.0;
        assert_eq!(missing_field(&tab), Some("original_price"));
        tab.title = String::from("  ");
        assert_eq!(missing_field(&tab), Some("title"));
    }
}
