//! Counter-offer pricing rule.
//!
//! A counter-offer is the asking price reduced by a percentage drawn uniformly
//! from a discount range, then floored to a magnitude-dependent increment:
//!
//! - the range comes from one table keyed by [`PricingKey`]; the key is the
//!   listing category when one is given, otherwise a platform tier derived
//!   from the platform name and the asking price;
//! - the increment is chosen from the *reduced* price (500 above 10 000,
//!   100 above 1 000, 50 above 100, 10 otherwise).
//!
//! Randomness is injected through any [`rand::Rng`], so a seeded generator
//! gives reproducible offers. [`counter_offer`] uses the thread-local rng.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::LowbalError;
use crate::result::Result;

/// Platforms whose large listings get a gentler discount.
const HIGH_VALUE_PLATFORMS: [&str; 2] = ["Zillow", "Facebook"];
/// Platforms whose cheap listings tolerate a steeper discount.
const CLASSIFIED_PLATFORMS: [&str; 2] = ["eBay", "Craigslist"];
/// Asking price above which a high-value platform listing counts as large.
const HIGH_VALUE_THRESHOLD: f64 = 5000.0;
/// Asking price below which a classified listing counts as a bargain.
const BARGAIN_THRESHOLD: f64 = 500.0;

/// Half-open `[lo, hi)` range of discount fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountRange {
    /// Smallest discount, inclusive.
    pub lo: f64,
    /// Largest discount, exclusive.
    pub hi: f64,
}

impl DiscountRange {
    const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Draws one discount fraction uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.lo..self.hi)
    }

    /// Returns `true` if `percentage` lies inside the range.
    pub fn contains(&self, percentage: f64) -> bool {
        percentage >= self.lo && percentage < self.hi
    }
}

/// Discount class of a platform listing, used when no category is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformTier {
    /// Zillow or Facebook listing priced above 5 000.
    HighValue,
    /// eBay or Craigslist listing priced below 500.
    BargainClassified,
    /// Everything else.
    Standard,
}

impl PlatformTier {
    /// Classifies a platform name together with the asking price.
    ///
    /// Names are matched exactly: `"zillow"` is not `"Zillow"`.
    pub fn classify(platform: &str, original_price: f64) -> Self {
        if HIGH_VALUE_PLATFORMS.iter().any(|name| *name == platform) && original_price > HIGH_VALUE_THRESHOLD {
            PlatformTier::HighValue
        } else if CLASSIFIED_PLATFORMS.iter().any(|name| *name == platform) && original_price < BARGAIN_THRESHOLD {
            PlatformTier::BargainClassified
        } else {
            PlatformTier::Standard
        }
    }
}

/// Key into the discount table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingKey {
    /// Explicit listing category; the platform is ignored.
    Category(Category),
    /// Platform tier fallback.
    Platform(PlatformTier),
}

impl PricingKey {
    /// Picks the key for a request: the category if present, else the platform tier.
    pub fn resolve(request: &PriceQuoteRequest) -> Self {
        match request.category {
            Some(category) => PricingKey::Category(category),
            None => PricingKey::Platform(PlatformTier::classify(
                &request.platform,
                request.original_price,
            )),
        }
    }

    /// Discount range for this key.
    pub fn discount_range(&self) -> DiscountRange {
        match self {
            PricingKey::Category(Category::RealEstate) => DiscountRange::new(0.02, 0.07),
            PricingKey::Category(Category::Cars) => DiscountRange::new(0.10, 0.25),
            PricingKey::Category(Category::Motorcycles) => DiscountRange::new(0.08, 0.20),
            PricingKey::Category(Category::Electronics) => DiscountRange::new(0.15, 0.35),
            PricingKey::Category(Category::Gadgets) => DiscountRange::new(0.12, 0.30),
            PricingKey::Category(Category::Furniture) => DiscountRange::new(0.20, 0.45),
            PricingKey::Category(Category::General) => DiscountRange::new(0.15, 0.30),
            PricingKey::Platform(PlatformTier::HighValue) => DiscountRange::new(0.10, 0.20),
            PricingKey::Platform(PlatformTier::BargainClassified) => DiscountRange::new(0.20, 0.30),
            PricingKey::Platform(PlatformTier::Standard) => DiscountRange::new(0.15, 0.25),
        }
    }
}

/// Input to the pricing rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuoteRequest {
    /// Listed asking price.
    pub original_price: f64,
    /// Marketplace name, consulted only when `category` is `None`.
    pub platform: String,
    /// Listing category.
    #[serde(default, deserialize_with = "crate::category::deserialize_label")]
    pub category: Option<Category>,
}

impl PriceQuoteRequest {
    /// Creates a new request.
    pub fn new(original_price: f64, platform: &str, category: Option<Category>) -> Self {
        Self {
            original_price,
            platform: String::from(platform),
            category,
        }
    }
}

/// Output of the pricing rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Suggested purchase price, a multiple of `increment`.
    pub offer_price: f64,
    /// Discount fraction that was drawn.
    pub percentage: f64,
    /// Range the percentage was drawn from.
    pub range: DiscountRange,
    /// Rounding increment applied to the reduced price.
    pub increment: f64,
}

/// Rounding increment for a reduced price.
pub fn rounding_increment(reduced: f64) -> f64 {
    if reduced > 10_000.0 {
        500.0
    } else if reduced > 1_000.0 {
        100.0
    } else if reduced > 100.0 {
        50.0
    } else {
        10.0
    }
}

/// Floors `reduced` to its own rounding increment.
pub fn round_down(reduced: f64) -> f64 {
    let increment = rounding_increment(reduced);
    (reduced / increment).floor() * increment
}

/// Deterministic half of the rule: applies a known discount fraction and rounds.
pub fn apply_discount(original_price: f64, percentage: f64) -> f64 {
    round_down(original_price * (1.0 - percentage))
}

/// Rejects prices that are not finite or not strictly positive.
pub fn validate_price(original_price: f64) -> Result<()> {
    if !original_price.is_finite() || original_price <= 0.0 {
        return Err(LowbalError::InvalidPrice(original_price));
    }
    Ok(())
}

/// Computes a counter-offer drawing the discount from `rng`.
pub fn counter_offer_with<R: Rng + ?Sized>(
    request: &PriceQuoteRequest,
    rng: &mut R,
) -> Result<PriceQuote> {
    validate_price(request.original_price)?;

    let key = PricingKey::resolve(request);
    let range = key.discount_range();
    let percentage = range.sample(rng);
    let reduced = request.original_price * (1.0 - percentage);
    let increment = rounding_increment(reduced);
    let offer_price = round_down(reduced);

    debug!(
        "Counter-offer {:?}: {} -> {} ({:.2}% off, step {})",
        key,
        request.original_price,
        offer_price,
        percentage * 100.0,
        increment
    );

    Ok(PriceQuote {
        offer_price,
        percentage,
        range,
        increment,
    })
}

/// Computes a counter-offer using the thread-local random generator.
pub fn counter_offer(request: &PriceQuoteRequest) -> Result<PriceQuote> {
    counter_offer_with(request, &mut rand::rng())
}
