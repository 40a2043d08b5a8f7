//! Attribute normalizers mapping raw contractor data onto a 0-100 scale.

use serde::{Deserialize, Serialize};

use super::domain::PriceTier;

const EXPERIENCE_SATURATION_YEARS: f64 = 20.0;
const REVIEW_SATURATION_COUNT: f64 = 500.0;
const SLOWEST_SCORED_WEEKS: f64 = 6.0;

/// Experience saturates at twenty years in business.
pub fn normalize_experience(years: u32) -> f64 {
    (f64::from(years) / EXPERIENCE_SATURATION_YEARS).min(1.0) * 100.0
}

/// Log-scaled review volume, saturating at 500 reviews. One review or fewer
/// carries no signal.
pub fn normalize_reviews(review_count: u32) -> f64 {
    if review_count <= 1 {
        return 0.0;
    }
    (f64::from(review_count).ln() / REVIEW_SATURATION_COUNT.ln()).min(1.0) * 100.0
}

/// Linear remap of a 1-5 star rating.
pub fn normalize_rating(rating: f64) -> f64 {
    (rating - 1.0) / 4.0 * 100.0
}

/// One week scores 100; six weeks or longer scores 0.
pub fn normalize_speed(speed_weeks: u32) -> f64 {
    ((SLOWEST_SCORED_WEEKS - f64::from(speed_weeks)) / (SLOWEST_SCORED_WEEKS - 1.0)).max(0.0)
        * 100.0
}

/// Score assigned to each pricing band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub budget: f64,
    pub standard: f64,
    pub premium: f64,
    pub unknown: f64,
}

impl PriceTable {
    pub fn score(&self, tier: PriceTier) -> f64 {
        match tier {
            PriceTier::Budget => self.budget,
            PriceTier::Standard => self.standard,
            PriceTier::Premium => self.premium,
            PriceTier::Unknown => self.unknown,
        }
    }
}

/// Price normalization tables and the emphasis threshold that selects between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceConfig {
    /// Cheaper is better; used when the caller cares about price.
    pub value_table: PriceTable,
    /// Pricier reads as higher quality; used when price is de-emphasized.
    pub quality_table: PriceTable,
    pub inversion_threshold: f64,
    /// Price weight assumed by the normalizer when the request omits one.
    pub default_weight: f64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            value_table: PriceTable {
                budget: 100.0,
                standard: 70.0,
                premium: 40.0,
                unknown: 50.0,
            },
            quality_table: PriceTable {
                budget: 60.0,
                standard: 80.0,
                premium: 100.0,
                unknown: 50.0,
            },
            inversion_threshold: 0.2,
            default_weight: 0.1,
        }
    }
}

/// Categorical price score.
///
/// Deliberate behavioral branch: below the inversion threshold the quality
/// table applies, so a `$$$` band outscores `$` for callers who have said
/// price barely matters.
pub fn normalize_price(tier: PriceTier, price_weight: f64, config: &PriceConfig) -> f64 {
    if price_weight < config.inversion_threshold {
        config.quality_table.score(tier)
    } else {
        config.value_table.score(tier)
    }
}
