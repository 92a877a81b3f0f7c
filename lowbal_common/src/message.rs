//! Negotiation message selection.
//!
//! Messages are picked uniformly at random from a fixed per-category template
//! list, with the listing title and the offer interpolated. Categories without
//! a dedicated list use the generic one.

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::category::Category;

type Template = fn(&str, &str) -> String;

const REAL_ESTATE: [Template; 3] = [
    |title, offer| {
        format!(
            "Hi! I'm very interested in your property at {title}. I have pre-approval for financing and can close quickly. \
             Based on recent comparables in the area, would you consider ${offer}? I'm ready to move forward immediately if we can agree on this price."
        )
    },
    |_, offer| {
        format!(
            "Hello! Your property looks perfect for what I'm looking for. I'm a qualified buyer with financing already arranged. \
             Given the current market conditions, would you be open to ${offer}? I can provide proof of funds and close on your timeline."
        )
    },
    |_, offer| {
        format!(
            "Hi there! I'm interested in purchasing your property. I've been pre-approved and can offer a quick, smooth closing. \
             Based on my research of the area, would you consider accepting ${offer}? Happy to discuss terms that work for both of us."
        )
    },
];

const CARS: [Template; 3] = [
    |title, offer| {
        format!(
            "Hi! I'm very interested in your {title}. I've been looking for exactly this model and I'm ready to purchase immediately. \
             Based on current market values and the condition, would you consider ${offer}? I can come see it this week and complete the purchase with cash/financing."
        )
    },
    |title, offer| {
        format!(
            "Hello! Your {title} looks great and exactly what I've been searching for. I have financing pre-approved and can complete the purchase quickly. \
             Given the mileage and market conditions, would you be open to ${offer}? I'm available to view it at your convenience."
        )
    },
    |title, offer| {
        format!(
            "Hi there! I'm interested in your {title}. I'm a serious buyer with cash/financing ready. \
             Based on similar vehicles in the area, would you consider ${offer}? I can arrange to see it this weekend and finalize everything if we can agree on the price."
        )
    },
];

const ELECTRONICS: [Template; 3] = [
    |title, offer| {
        format!(
            "Hi! I'm very interested in your {title}. I've been looking for this exact model and I'm ready to purchase today. \
             Based on current market prices, would you consider ${offer}? I can pick it up immediately with cash if we can agree on this price."
        )
    },
    |title, offer| {
        format!(
            "Hello! Your {title} is exactly what I need. I'm ready to buy today and can pick it up at your convenience. \
             Given the current retail prices, would you be open to ${offer}? Happy to complete the transaction quickly."
        )
    },
    |title, offer| {
        format!(
            "Hi there! I'm interested in purchasing your {title}. I'm a serious buyer and can pick it up today with cash. \
             Based on similar listings, would you consider accepting ${offer}? I can come get it whenever works for you."
        )
    },
];

const FURNITURE: [Template; 3] = [
    |title, offer| {
        format!(
            "Hi! I'm very interested in your {title}. I'm moving into a new place and this would be perfect. \
             Based on similar pieces I've seen, would you consider ${offer}? I can arrange pickup this week and handle all the moving logistics."
        )
    },
    |title, offer| {
        format!(
            "Hello! Your {title} looks exactly like what I've been searching for. I'm ready to purchase and can handle pickup/delivery. \
             Given the current market, would you be open to ${offer}? I can come get it at your convenience."
        )
    },
    |title, offer| {
        format!(
            "Hi there! I'm interested in your {title}. I have a truck and can pick it up immediately. \
             Based on similar furniture listings, would you consider ${offer}? Happy to work with your schedule for pickup."
        )
    },
];

const GENERIC: [Template; 3] = [
    |title, offer| {
        format!(
            "Hi! I'm very interested in your {title}. Based on similar listings I've seen, would you consider ${offer}? \
             I'm ready to pick it up/move forward today if we can agree on this price."
        )
    },
    |title, offer| {
        format!(
            "Hello! Your {title} looks great. I've been researching the market and wondering if you'd be open to ${offer}? \
             Happy to arrange pickup at your convenience if this works for you."
        )
    },
    |title, offer| {
        format!(
            "Hi there! I'm interested in purchasing your {title}. Would you consider accepting ${offer}? \
             I'm a serious buyer and can complete the transaction quickly if we can agree on this."
        )
    },
];

/// Everything a message may mention about the negotiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRequest {
    /// Listing title.
    pub title: String,
    /// Listed asking price.
    pub original_price: f64,
    /// Counter-offer to propose.
    pub offer: f64,
    /// Marketplace name.
    pub platform: String,
    /// Free-form buyer notes.
    #[serde(default)]
    pub notes: String,
    /// Listing category.
    #[serde(default, deserialize_with = "crate::category::deserialize_label")]
    pub category: Option<Category>,
}

fn templates_for(category: Option<Category>) -> &'static [Template] {
    match category {
        Some(Category::RealEstate) => &REAL_ESTATE,
        Some(Category::Cars) => &CARS,
        Some(Category::Electronics) => &ELECTRONICS,
        Some(Category::Furniture) => &FURNITURE,
        _ => &GENERIC,
    }
}

/// Formats a monetary amount as whole dollars.
pub fn format_amount(amount: f64) -> String {
    format!("{:.0}", amount)
}

/// Picks one message for `request` using `rng`.
pub fn select_message_with<R: Rng + ?Sized>(request: &MessageRequest, rng: &mut R) -> String {
    let templates = templates_for(request.category);
    let offer = format_amount(request.offer);
    let template = templates.choose(rng).copied().unwrap_or(GENERIC[0]);
    debug!(
        "Selected message for {:?} listing '{}' on {}",
        request.category, request.title, request.platform
    );
    template(&request.title, &offer)
}

/// Picks one message using the thread-local random generator.
pub fn select_message(request: &MessageRequest) -> String {
    select_message_with(request, &mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn request(category: Option<Category>) -> MessageRequest {
        MessageRequest {
            title: String::from("2015 Honda Civic"),
            original_price: 15_000.0,
            offer: 12_500.0,
            platform: String::from("Craigslist"),
            notes: String::new(),
            category,
        }
    }

    #[test]
    fn test_message_mentions_offer() {
        let mut rng = StdRng::seed_from_u64(3);
        for category in [None, Some(Category::Cars), Some(Category::RealEstate)] {
            let message = select_message_with(&request(category), &mut rng);
            assert!(message.contains("$12500"), "{}", message);
        }
    }

    #[test]
    fn test_non_real_estate_messages_mention_title() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..30 {
            let message = select_message_with(&request(Some(Category::Cars)), &mut rng);
            assert!(message.contains("2015 Honda Civic"));
        }
    }

    #[test]
    fn test_categories_without_templates_use_generic_list() {
        assert_eq!(templates_for(Some(Category::Gadgets)).len(), GENERIC.len());
        let generic: Vec<String> = GENERIC.iter().map(|t| t("x", "1")).collect();
        let gadgets: Vec<String> = templates_for(Some(Category::Gadgets))
            .iter()
            .map(|t| t("x", "1"))
            .collect();
        assert_eq!(generic, gadgets);
    }

    #[test]
    fn test_selection_covers_every_template() {
        let mut rng = StdRng::seed_from_u64(9);
        let seen: HashSet<String> = (0..200)
            .map(|_| select_message_with(&request(Some(Category::Furniture)), &mut rng))
            .collect();
        assert_eq!(seen.len(), FURNITURE.len());
    }

    #[test]
    fn test_template_wording_is_fixed() {
        assert_eq!(
            CARS[1]("Civic", "9000"),
            "Hello! Your Civic looks great and exactly what I've been searching for. I have financing pre-approved and can complete the purchase quickly. \
             Given the mileage and market conditions, would you be open to $9000? I'm available to view it at your convenience."
        );
        assert!(CARS[2]("Civic", "9000").contains("a serious buyer with cash/financing ready."));
        assert!(FURNITURE[1]("Sofa", "300").contains("can handle pickup/delivery."));
        assert!(GENERIC[0]("Lamp", "40").ends_with("I'm ready to pick it up/move forward today if we can agree on this price."));
    }

    #[test]
    fn test_format_amount_drops_fraction() {
        assert_eq!(format_amount(285_000.0), "285000");
        assert_eq!(format_amount(40.0), "40");
    }
}
