//! Completed deals and savings statistics.
//!
//! Closing a negotiation always removes its tab from the store. When the buyer
//! reports a closed deal at a final price below the asking price, the deal is
//! recorded in the `DealLedger`, which also derives the savings dashboard
//! figures: totals, averages, success rate and progress towards the next
//! savings milestone.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::result::Result;
use crate::session::SessionId;
use crate::store::SessionStore;

/// Savings milestones, in increasing order.
pub const MILESTONES: [f64; 6] = [1_000.0, 2_500.0, 5_000.0, 10_000.0, 25_000.0, 50_000.0];
/// Milestone used once every entry of [`MILESTONES`] is passed.
pub const FINAL_MILESTONE: f64 = 100_000.0;

/// What the buyer reports when closing a negotiation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealOutcome {
    /// Whether the purchase went through.
    pub deal_closed: bool,
    /// Price actually paid.
    pub final_price: Option<f64>,
}

/// A negotiation that ended in a purchase below the asking price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedDeal {
    /// Id of the closed negotiation.
    pub id: SessionId,
    /// Listing title.
    pub title: String,
    /// Listing category.
    pub category: Option<Category>,
    /// Marketplace name.
    pub platform: String,
    /// Listed asking price.
    pub original_price: f64,
    /// Price actually paid.
    pub final_price: f64,
    /// `original_price - final_price`.
    pub savings: f64,
    /// Savings as a rounded percentage of the asking price.
    pub savings_percentage: u32,
    /// When the deal was recorded.
    pub completed_at: DateTime<Utc>,
    /// Whether the purchase went through.
    pub deal_closed: bool,
}

/// Aggregate figures for the savings dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsStats {
    /// Sum of savings over all deals.
    pub total_savings: f64,
    /// Number of recorded deals.
    pub total_deals: usize,
    /// Rounded mean savings per deal, 0 without deals.
    pub average_savings: f64,
    /// Negotiations still marked active.
    pub active_negotiations: usize,
    /// Rounded percentage of deals that closed, 0 without deals.
    pub success_rate: u32,
    /// Smallest milestone above `total_savings`.
    pub next_milestone: f64,
    /// Percentage of `next_milestone` reached.
    pub milestone_progress: f64,
}

/// Returns the smallest milestone strictly above `total_savings`.
pub fn next_milestone(total_savings: f64) -> f64 {
    MILESTONES
        .iter()
        .copied()
        .find(|m| *m > total_savings)
        .unwrap_or(FINAL_MILESTONE)
}

/// Record of completed deals, newest first.
#[derive(Debug, Default)]
pub struct DealLedger {
    deals: Vec<CompletedDeal>,
}

impl DealLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded deals, newest first.
    pub fn deals(&self) -> &[CompletedDeal] {
        &self.deals
    }

    /// Removes the tab from `store` and records a deal when `outcome` reports one.
    ///
    /// Outcomes without a final price, or with a final price that is not below
    /// the asking price, close the tab without recording anything.
    pub fn close_tab(
        &mut self,
        store: &mut SessionStore,
        id: SessionId,
        outcome: &DealOutcome,
    ) -> Result<Option<CompletedDeal>> {
        let tab = store.remove(id)?;

        let final_price = match outcome.final_price {
            Some(price) if outcome.deal_closed && price > 0.0 && price < tab.original_price => price,
            _ => return Ok(None),
        };

        let savings = tab.original_price - final_price;
        let deal = CompletedDeal {
            id,
            title: tab.title,
            category: tab.category,
            platform: tab.platform,
            original_price: tab.original_price,
            final_price,
            savings,
            savings_percentage: (savings / tab.original_price * 100.0).round() as u32,
            completed_at: Utc::now(),
            deal_closed: true,
        };
        info!(
            "Deal {} recorded: saved {} ({}% off)",
            id, deal.savings, deal.savings_percentage
        );
        self.deals.insert(0, deal.clone());
        Ok(Some(deal))
    }

    /// Computes dashboard figures over the ledger and the open negotiations.
    pub fn stats(&self, store: &SessionStore) -> SavingsStats {
        let total_savings: f64 = self.deals.iter().map(|d| d.savings).sum();
        let total_deals = self.deals.len();
        let (average_savings, success_rate) = if total_deals > 0 {
            let closed = self.deals.iter().filter(|d| d.deal_closed).count();
            (
                (total_savings / total_deals as f64).round(),
                (closed as f64 / total_deals as f64 * 100.0).round() as u32,
            )
        } else {
            (0.0, 0)
        };
        let next_milestone = next_milestone(total_savings);

        SavingsStats {
            total_savings,
            total_deals,
            average_savings,
            active_negotiations: store.active_count(),
            success_rate,
            next_milestone,
            milestone_progress: total_savings * 100.0 / next_milestone,
        }
    }
}
