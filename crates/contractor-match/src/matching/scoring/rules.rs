use crate::matching::domain::Candidate;
use super::config::ScoringConfig;
use super::{AdjustmentKind, ScoreAdjustment};

pub(crate) fn category_adjustment(
    candidate: &Candidate,
    project_type: &str,
    config: &ScoringConfig,
) -> Option<ScoreAdjustment> {
    let vertical = candidate.vertical.to_lowercase();
    let project_type = project_type.to_lowercase();

    if vertical == project_type {
        return Some(ScoreAdjustment {
            kind: AdjustmentKind::SpecialistMatch,
            factor: config.specialist_multiplier,
            notes: format!("{} specialist for {} work", candidate.vertical, project_type),
        });
    }

    let generalist = vertical == config.generalist_vertical.to_lowercase();
    let specialized = config
        .specialized_categories
        .iter()
        .any(|category| category.to_lowercase() == project_type);

    if generalist && specialized {
        return Some(ScoreAdjustment {
            kind: AdjustmentKind::GeneralistPenalty,
            factor: config.generalist_multiplier,
            notes: format!("{} taking specialized {} work", candidate.vertical, project_type),
        });
    }

    None
}

pub(crate) fn flag_adjustments(candidate: &Candidate, config: &ScoringConfig) -> Vec<ScoreAdjustment> {
    candidate
        .flags
        .iter()
        .filter(|flag| config.negative_flags.contains(flag.as_str()))
        .map(|flag| ScoreAdjustment {
            kind: AdjustmentKind::NegativeFlag(flag.clone()),
            factor: config.flag_penalty,
            notes: format!("flagged {flag}"),
        })
        .collect()
}
