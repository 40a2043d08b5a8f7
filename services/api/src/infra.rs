use contractor_match::config::{CatalogConfig, RefinerConfig};
use contractor_match::error::AppError;
use contractor_match::matching::{
    seed_candidates, CandidateCsvImporter, InMemoryCandidateRepository, OfflineRefiner,
    OpenAiRefiner, Refiner,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Candidate pool from the configured CSV, or the built-in roster.
pub(crate) fn build_repository(
    config: &CatalogConfig,
) -> Result<InMemoryCandidateRepository, AppError> {
    let candidates = match &config.candidates_csv {
        Some(path) => {
            let candidates = CandidateCsvImporter::from_path(path)?;
            info!(path = %path.display(), count = candidates.len(), "loaded candidate pool");
            candidates
        }
        None => seed_candidates(),
    };

    Ok(InMemoryCandidateRepository::new(candidates)?)
}

/// Hosted refiner when credentials are present; otherwise every request is
/// answered from base scores.
pub(crate) fn build_refiner(config: &RefinerConfig, offline: bool) -> Arc<dyn Refiner> {
    if offline {
        return Arc::new(OfflineRefiner);
    }

    let refiner = OpenAiRefiner::new(config);
    if !refiner.is_configured() {
        warn!("OPENAI_API_KEY not set; qualitative refinement disabled");
        return Arc::new(OfflineRefiner);
    }

    info!(model = %config.model, "qualitative refinement enabled");
    Arc::new(refiner)
}

pub(crate) fn parse_weight(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse weight '{value}' ({err})"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("weight '{key}' must be a non-negative number"));
    }
    Ok((key.trim().to_ascii_lowercase(), value))
}
