use crate::infra::{build_refiner, build_repository, parse_weight};
use clap::Args;
use contractor_match::config::AppConfig;
use contractor_match::error::AppError;
use contractor_match::matching::{MatchService, ScoreRequest, ScoreResponse, Weights};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// City the project is located in
    #[arg(long)]
    pub(crate) city: String,
    /// Project category, e.g. roofing or siding
    #[arg(long)]
    pub(crate) project_type: String,
    /// Free-text notes passed to the qualitative refiner
    #[arg(long, default_value = "")]
    pub(crate) notes: String,
    /// Attribute weight as KEY=VALUE (experience, reviews, rating, price, speed)
    #[arg(long = "weight", value_parser = parse_weight)]
    pub(crate) weights: Vec<(String, f64)>,
    /// Skip the qualitative refiner and print base scores
    #[arg(long)]
    pub(crate) offline: bool,
    /// Emit the response as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        city,
        project_type,
        notes,
        weights,
        offline,
        json,
    } = args;

    let config = AppConfig::load()?;
    let repository = Arc::new(build_repository(&config.catalog)?);
    let refiner = build_refiner(&config.refiner, offline);
    let service = MatchService::new(repository, refiner, config.scoring, config.refiner.timeout);

    let request = ScoreRequest {
        city,
        project_type,
        notes,
        weights: Weights(weights.into_iter().collect()),
    };
    let response = service.score(request.clone()).await?;

    if json {
        let rendered = serde_json::to_string_pretty(&response)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        render_response(&request, &response);
    }

    Ok(())
}

fn render_response(request: &ScoreRequest, response: &ScoreResponse) {
    println!(
        "Top contractors for {} in {}",
        request.project_type, request.city
    );
    if response.top_contractors.is_empty() {
        println!("  No contractors serve this area.");
        return;
    }

    for (index, record) in response.top_contractors.iter().enumerate() {
        let candidate = &record.candidate;
        println!(
            "{:>2}. {:<28} {:>5.1}  {} | {} yrs | {:.1}★ ({} reviews) | {} | {} wk",
            index + 1,
            candidate.name,
            record.score,
            candidate.vertical,
            candidate.years_in_business,
            candidate.rating,
            candidate.review_count,
            if candidate.pricing_band.band().is_empty() {
                "?"
            } else {
                candidate.pricing_band.band()
            },
            candidate.speed_weeks,
        );
        if !record.reasoning.is_empty() {
            println!("      {}", record.reasoning);
        }
    }
}
