//! Candidate pool sources: the built-in Salt Lake City roster and CSV imports.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{Candidate, CandidateId, PriceTier};

/// The five contractors the service ships with.
pub fn seed_candidates() -> Vec<Candidate> {
    vec![
        seed(
            "c1",
            "NorthPeak Roofing",
            "roofing",
            (18, 4.7, 312),
            "$$$",
            2,
            &["UT-ROOF-44121"],
            &[],
        ),
        seed(
            "c2",
            "Beehive Home Repair",
            "handyman",
            (6, 4.4, 128),
            "$$",
            3,
            &["UT-GEN-99812"],
            &["limited_roofing_experience"],
        ),
        seed(
            "c3",
            "Wasatch Elite Exteriors",
            "siding",
            (12, 4.8, 205),
            "$$$",
            4,
            &["UT-EXT-77421"],
            &["premium_pricing"],
        ),
        seed(
            "c4",
            "Granite Peak Roofing Co.",
            "roofing",
            (9, 4.5, 164),
            "$$",
            3,
            &["UT-ROOF-55210"],
            &[],
        ),
        seed(
            "c5",
            "QuickFix Pros",
            "roofing",
            (3, 4.2, 59),
            "$",
            2,
            &["UT-ROOF-12003"],
            &["newer_company"],
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    name: &str,
    vertical: &str,
    (years_in_business, rating, review_count): (u32, f64, u32),
    band: &str,
    speed_weeks: u32,
    licenses: &[&str],
    flags: &[&str],
) -> Candidate {
    Candidate {
        id: CandidateId::from(id),
        name: name.to_string(),
        vertical: vertical.to_string(),
        years_in_business,
        rating,
        review_count,
        service_area: "Salt Lake City".to_string(),
        pricing_band: PriceTier::from_band(band),
        speed_weeks,
        licenses: licenses.iter().map(|license| license.to_string()).collect(),
        flags: flags.iter().map(|flag| flag.to_string()).collect(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read candidate file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid candidate CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("candidate {id} has rating {rating} outside 1-5")]
    RatingOutOfRange { id: String, rating: f64 },
}

/// Loads a candidate pool from CSV. List columns are `;`-separated.
pub struct CandidateCsvImporter;

impl CandidateCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Candidate>, CatalogImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Candidate>, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut candidates = Vec::new();
        for row in csv_reader.deserialize::<CandidateRow>() {
            let row = row?;
            if !(1.0..=5.0).contains(&row.rating) {
                return Err(CatalogImportError::RatingOutOfRange {
                    id: row.id,
                    rating: row.rating,
                });
            }
            candidates.push(row.into_candidate());
        }

        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    id: String,
    name: String,
    vertical: String,
    years_in_business: u32,
    rating: f64,
    review_count: u32,
    service_area: String,
    #[serde(default)]
    pricing_band: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    speed_weeks: Option<u32>,
    #[serde(default)]
    licenses: String,
    #[serde(default)]
    flags: String,
}

impl CandidateRow {
    fn into_candidate(self) -> Candidate {
        Candidate {
            id: CandidateId(self.id),
            name: self.name,
            vertical: self.vertical,
            years_in_business: self.years_in_business,
            rating: self.rating,
            review_count: self.review_count,
            service_area: self.service_area,
            pricing_band: PriceTier::from_band(&self.pricing_band),
            speed_weeks: self.speed_weeks.unwrap_or(4),
            licenses: split_list(&self.licenses).collect(),
            flags: split_list(&self.flags).collect::<BTreeSet<_>>(),
        }
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
