//! Negotiation session records.
//!
//! A `NegotiationTab` holds everything known about one negotiation: the
//! listing, the current counter-offer, progress and the message history.
//! Records are plain values owned by [`crate::store::SessionStore`]; a
//! [`TabUpdate`] describes a partial change that the store applies as a whole
//! record replacement.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::category::Category;
use crate::error::LowbalError;
use crate::result::Result;

/// Identifier of a negotiation tab.
pub type SessionId = u64;

/// Largest value of [`NegotiationTab::progress`].
pub const MAX_PROGRESS: u8 = 100;
/// Progress added by one "update progress" action.
pub const PROGRESS_STEP: u8 = 15;

/// Lifecycle state of a negotiation.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NegotiationStatus {
    #[default]
    Active,
    Completed,
    Closed,
}

/// Author of a chat message.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MessageKind {
    User,
    Ai,
    Seller,
}

/// One entry of a negotiation's message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Identifier, unique within its tab.
    pub id: u64,
    /// Who wrote the message.
    pub kind: MessageKind,
    /// Message text.
    pub content: String,
    /// When the message was added.
    pub timestamp: DateTime<Utc>,
}

/// A single negotiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationTab {
    /// Store-assigned identifier.
    pub id: SessionId,
    /// Listing title.
    pub title: String,
    /// Listing category, if chosen.
    pub category: Option<Category>,
    /// Marketplace name.
    pub platform: String,
    /// Listed asking price.
    pub original_price: f64,
    /// Most the buyer is willing to pay.
    pub max_budget: Option<f64>,
    /// Latest counter-offer.
    pub current_offer: Option<f64>,
    /// Lifecycle state.
    pub status: NegotiationStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last change.
    pub last_activity: DateTime<Utc>,
    /// Completion estimate in percent.
    pub progress: u8,
    /// Message history, oldest first.
    pub messages: Vec<ChatMessage>,
}

impl NegotiationTab {
    /// Creates an empty, active negotiation.
    pub fn new(id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: String::new(),
            category: None,
            platform: String::new(),
            original_price: 0.0,
            max_budget: None,
            current_offer: None,
            status: NegotiationStatus::Active,
            created_at: now,
            last_activity: now,
            progress: 0,
            messages: Vec::new(),
        }
    }

    /// Id for the next appended message.
    pub fn next_message_id(&self) -> u64 {
        self.messages.last().map(|m| m.id + 1).unwrap_or(1)
    }

    /// Checks the invariants a stored record must satisfy.
    pub fn validate(&self) -> Result<()> {
        check_amount("original_price", self.original_price)?;
        if let Some(budget) = self.max_budget {
            check_amount("max_budget", budget)?;
        }
        if let Some(offer) = self.current_offer {
            check_amount("current_offer", offer)?;
        }
        if self.progress > MAX_PROGRESS {
            return Err(LowbalError::InvalidField {
                field: "progress",
                reason: format!("{} exceeds {}", self.progress, MAX_PROGRESS),
            });
        }
        Ok(())
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(LowbalError::InvalidField {
            field,
            reason: format!("{} is not a non-negative amount", value),
        });
    }
    Ok(())
}

/// Partial change to a negotiation. `None` leaves a field untouched.
///
/// Updates only set values: an optional field such as `category`,
/// `max_budget` or `current_offer` cannot be cleared back to `None` once set.
/// An empty `category` label is read as `None` and so changes nothing.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::category::deserialize_label")]
    pub category: Option<Category>,
    pub platform: Option<String>,
    pub original_price: Option<f64>,
    pub max_budget: Option<f64>,
    pub current_offer: Option<f64>,
    pub status: Option<NegotiationStatus>,
    pub progress: Option<u8>,
}

impl TabUpdate {
    /// Returns a copy of `tab` with this update applied.
    pub fn applied_to(&self, tab: &NegotiationTab) -> NegotiationTab {
        let mut next = tab.clone();
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(category) = self.category {
            next.category = Some(category);
        }
        if let Some(platform) = &self.platform {
            next.platform = platform.clone();
        }
        if let Some(price) = self.original_price {
            next.original_price = price;
        }
        if self.max_budget.is_some() {
            next.max_budget = self.max_budget;
        }
        if self.current_offer.is_some() {
            next.current_offer = self.current_offer;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(progress) = self.progress {
            next.progress = progress;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tab_defaults() {
        let now = Utc::now();
        let tab = NegotiationTab::new(3, now);
        assert_eq!(tab.status, NegotiationStatus::Active);
        assert_eq!(tab.progress, 0);
        assert_eq!(tab.created_at, tab.last_activity);
        assert!(tab.messages.is_empty());
        assert!(tab.validate().is_ok());
    }

    #[test]
    fn test_update_touches_only_given_fields() {
        let tab = NegotiationTab::new(1, Utc::now());
        let update = TabUpdate {
            title: Some(String::from("Oak dining table")),
            original_price: Some(640.0),
            ..TabUpdate::default()
        };
        let next = update.applied_to(&tab);
        assert_eq!(next.title, "Oak dining table");
        assert_eq!(next.original_price, 640.0);
        assert_eq!(next.platform, tab.platform);
        assert_eq!(next.category, None);
    }

    #[test]
    fn test_update_cannot_clear_optional_fields() {
        let mut tab = NegotiationTab::new(1, Utc::now());
        tab.category = Some(Category::Cars);
        tab.max_budget = Some(9_000.0);
        tab.current_offer = Some(8_500.0);

        let update: TabUpdate =
            serde_json::from_str(r#"{"category":"","max_budget":null,"current_offer":null}"#).unwrap();
        assert_eq!(update, TabUpdate::default());
        let next = update.applied_to(&tab);
        assert_eq!(next.category, Some(Category::Cars));
        assert_eq!(next.max_budget, Some(9_000.0));
        assert_eq!(next.current_offer, Some(8_500.0));
    }

    #[test]
    fn test_validate_rejects_negative_and_out_of_range_fields() {
        let mut tab = NegotiationTab::new(1, Utc::now());
        tab.original_price = -1.0;
        assert!(matches!(
            tab.validate(),
            Err(LowbalError::InvalidField { field: "original_price", .. })
        ));

        let mut tab = NegotiationTab::new(1, Utc::now());
        tab.progress = 101;
        assert!(matches!(
            tab.validate(),
            Err(LowbalError::InvalidField { field: "progress", .. })
        ));
    }

    #[test]
    fn test_status_and_kind_labels() {
        assert_eq!(NegotiationStatus::Completed.to_string(), "completed");
        assert_eq!("SELLER".parse::<MessageKind>().unwrap(), MessageKind::Seller);
        assert_eq!(serde_json::to_string(&MessageKind::Ai).unwrap(), "\"ai\"");
    }
}
