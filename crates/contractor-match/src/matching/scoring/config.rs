use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::matching::normalize::PriceConfig;

/// Tuning tables for the scoring pipeline. Every field falls back to the
/// production defaults when omitted from a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub pricing: PriceConfig,
    pub specialist_multiplier: f64,
    pub generalist_vertical: String,
    pub generalist_multiplier: f64,
    pub specialized_categories: BTreeSet<String>,
    pub negative_flags: BTreeSet<String>,
    pub flag_penalty: f64,
    pub score_cap: f64,
    pub shortlist_size: usize,
    pub final_size: usize,
    pub adjustment_bound: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pricing: PriceConfig::default(),
            specialist_multiplier: 1.2,
            generalist_vertical: "handyman".to_string(),
            generalist_multiplier: 0.8,
            specialized_categories: ["roofing", "siding"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            negative_flags: ["limited_roofing_experience", "newer_company", "premium_pricing"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            flag_penalty: 0.9,
            score_cap: 100.0,
            shortlist_size: 5,
            final_size: 3,
            adjustment_bound: 5.0,
        }
    }
}
