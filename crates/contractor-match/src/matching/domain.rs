use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a candidate, unique across the pool for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Ordered pricing band advertised by a contractor.
///
/// Serialized as the familiar `$`, `$$`, `$$$` markers; anything else
/// (including an empty band) reads as [`PriceTier::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PriceTier {
    Budget,
    Standard,
    Premium,
    Unknown,
}

impl PriceTier {
    pub fn from_band(band: &str) -> Self {
        match band.trim() {
            "$" => Self::Budget,
            "$$" => Self::Standard,
            "$$$" => Self::Premium,
            _ => Self::Unknown,
        }
    }

    pub fn band(&self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Standard => "$$",
            Self::Premium => "$$$",
            Self::Unknown => "",
        }
    }
}

impl From<String> for PriceTier {
    fn from(value: String) -> Self {
        Self::from_band(&value)
    }
}

impl From<PriceTier> for String {
    fn from(value: PriceTier) -> Self {
        value.band().to_string()
    }
}

fn default_speed_weeks() -> u32 {
    4
}

/// Contractor attributes as supplied by the candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub vertical: String,
    pub years_in_business: u32,
    pub rating: f64,
    pub review_count: u32,
    pub service_area: String,
    #[serde(default = "unknown_tier")]
    pub pricing_band: PriceTier,
    #[serde(default = "default_speed_weeks")]
    pub speed_weeks: u32,
    #[serde(default)]
    pub licenses: Vec<String>,
    #[serde(default)]
    pub flags: BTreeSet<String>,
}

fn unknown_tier() -> PriceTier {
    PriceTier::Unknown
}

impl Candidate {
    pub fn serves(&self, locale: &str) -> bool {
        self.service_area.to_lowercase() == locale.to_lowercase()
    }
}

/// Scored attribute names recognised in a weight mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Experience,
    Reviews,
    Rating,
    Price,
    Speed,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Experience,
        Attribute::Reviews,
        Attribute::Rating,
        Attribute::Price,
        Attribute::Speed,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Experience => "experience",
            Attribute::Reviews => "reviews",
            Attribute::Rating => "rating",
            Attribute::Price => "price",
            Attribute::Speed => "speed",
        }
    }
}

/// User-supplied weight mapping. Weights need not sum to one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(pub BTreeMap<String, f64>);

impl Weights {
    /// Aggregation weight for an attribute; absent keys contribute nothing.
    pub fn get(&self, attribute: Attribute) -> f64 {
        self.0.get(attribute.key()).copied().unwrap_or(0.0)
    }

    /// Price weight as seen by the price normalizer, which substitutes
    /// `fallback` when the caller did not mention price at all.
    pub fn price_emphasis(&self, fallback: f64) -> f64 {
        self.0
            .get(Attribute::Price.key())
            .copied()
            .unwrap_or(fallback)
    }
}

impl<const N: usize> From<[(&str, f64); N]> for Weights {
    fn from(entries: [(&str, f64); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }
}

/// Inbound scoring request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub city: String,
    pub project_type: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub weights: Weights,
}

/// The five attribute scores on the common 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedComponents {
    pub experience: f64,
    pub reviews: f64,
    pub rating: f64,
    pub price: f64,
    pub speed: f64,
}

impl NormalizedComponents {
    pub fn value(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Experience => self.experience,
            Attribute::Reviews => self.reviews,
            Attribute::Rating => self.rating,
            Attribute::Price => self.price,
            Attribute::Speed => self.speed,
        }
    }
}

/// Shortlist entry: the candidate, its rounded base score and the components
/// that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseScoreRecord {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub base_score: f64,
    pub components: NormalizedComponents,
}

/// Final ranked entry returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScoreRecord {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub score: f64,
    pub reasoning: String,
}

impl AsRef<Candidate> for BaseScoreRecord {
    fn as_ref(&self) -> &Candidate {
        &self.candidate
    }
}

impl AsRef<Candidate> for FinalScoreRecord {
    fn as_ref(&self) -> &Candidate {
        &self.candidate
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub top_contractors: Vec<FinalScoreRecord>,
}

/// Round to one decimal place for display and transport.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
