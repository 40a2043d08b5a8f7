use std::fmt::Write;

use crate::matching::domain::BaseScoreRecord;

use super::refiner::RefinementContext;

pub(crate) fn system_prompt(context: &RefinementContext) -> String {
    let bound = context.adjustment_bound;
    format!(
        "You are an expert contractor evaluation assistant.\n\n\
Your role is to make small qualitative adjustments (±{bound} points maximum) to pre-calculated \
base scores and provide reasoning.\n\n\
You will receive contractor candidates with their base scores already calculated using \
mathematical normalization. Your job is to:\n\n\
1. Select the top {selections} contractors from the candidates\n\
2. Make a ±{bound} point adjustment to each base score based on qualitative factors\n\
3. Provide brief reasoning for each adjustment\n\
4. NEVER exceed ±{bound} points from the base score\n\
5. NEVER EXCEED 100 POINTS for score\n\n\
Focus on qualitative aspects like:\n\
- Warranty reputation\n\
- Customer service quality\n\
- Special expertise\n\
- Risk factors\n\
- User-specific preferences in their notes\n",
        selections = context.max_selections,
    )
}

pub(crate) fn user_prompt(shortlist: &[BaseScoreRecord], context: &RefinementContext) -> String {
    let request = &context.request;
    let bound = context.adjustment_bound;

    let mut candidates = String::new();
    for record in shortlist {
        let candidate = &record.candidate;
        let flags = if candidate.flags.is_empty() {
            "None".to_string()
        } else {
            candidate
                .flags
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = write!(
            candidates,
            "\nContractor ID: {id}\n\
Name: {name}\n\
Base Score: {base:.1} (calculated using deterministic normalization)\n\
Details: {vertical}, {years} yrs, {rating}/5 rating, {reviews} reviews, {band} pricing, {weeks} weeks\n\
Licenses: {licenses}\n\
Flags: {flags}\n---\n",
            id = candidate.id,
            name = candidate.name,
            base = record.base_score,
            vertical = candidate.vertical,
            years = candidate.years_in_business,
            rating = candidate.rating,
            reviews = candidate.review_count,
            band = candidate.pricing_band.band(),
            weeks = candidate.speed_weeks,
            licenses = candidate.licenses.join(", "),
        );
    }

    let weights = serde_json::to_string(&request.weights).unwrap_or_else(|_| "{}".to_string());
    let example_base = 85.2;

    format!(
        "\nUSER REQUEST:\n\
City: {city}\n\
Project Type: {project_type}\n\
Notes: {notes}\n\
User Weights: {weights}\n\n\
CANDIDATES WITH CALCULATED BASE SCORES:\n{candidates}\n\
TASK: Select the top {selections} contractors and provide a ±{bound} point adjustment to their \
base scores based on qualitative factors and user notes.\n\n\
RULES:\n\
1. Your final score MUST be within ±{bound} points of the base score\n\
2. If base score is {example_base:.1}, your final score must be between {low:.1} and {high:.1}\n\
3. Consider user notes for qualitative adjustments\n\
4. Provide brief reasoning for the adjustment\n\n\
Format as JSON with ALL contractor details:\n{shape}\n\n\
IMPORTANT: Include ALL contractor details exactly as provided, don't modify the data.\n",
        city = request.city,
        project_type = request.project_type,
        notes = request.notes,
        selections = context.max_selections,
        low = example_base - bound,
        high = example_base + bound,
        shape = OUTPUT_SHAPE,
    )
}

pub(crate) const OUTPUT_SHAPE: &str = r#"{
  "top_contractors": [
    {
      "id": "contractor_id",
      "name": "contractor_name",
      "vertical": "contractor_vertical",
      "years_in_business": years_as_number,
      "rating": rating_as_number,
      "review_count": review_count_as_number,
      "service_area": "service_area",
      "pricing_band": "pricing_band",
      "speed_weeks": speed_weeks_as_number,
      "licenses": ["license1", "license2"],
      "flags": ["flag1", "flag2"],
      "score": final_score_within_bound,
      "reasoning": "Brief reason for the adjustment from base score"
    }
  ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::{
        Candidate, CandidateId, NormalizedComponents, PriceTier, ScoreRequest, Weights,
    };

    fn context() -> RefinementContext {
        RefinementContext {
            request: ScoreRequest {
                city: "Salt Lake City".to_string(),
                project_type: "roofing".to_string(),
                notes: "Prefer a long workmanship warranty".to_string(),
                weights: Weights::from([("rating", 0.3), ("price", 0.1)]),
            },
            adjustment_bound: 5.0,
            max_selections: 3,
        }
    }

    fn shortlist() -> Vec<BaseScoreRecord> {
        [("c4", "Granite Peak Roofing Co.", 85.995), ("c5", "QuickFix Pros", 67.09)]
            .into_iter()
            .map(|(id, name, base_score)| BaseScoreRecord {
                candidate: Candidate {
                    id: CandidateId::from(id),
                    name: name.to_string(),
                    vertical: "roofing".to_string(),
                    years_in_business: 9,
                    rating: 4.5,
                    review_count: 164,
                    service_area: "Salt Lake City".to_string(),
                    pricing_band: PriceTier::Standard,
                    speed_weeks: 3,
                    licenses: vec![format!("UT-ROOF-{id}")],
                    flags: ["newer_company".to_string()].into_iter().collect(),
                },
                base_score,
                components: NormalizedComponents::default(),
            })
            .collect()
    }

    #[test]
    fn user_prompt_lists_every_candidate_with_rounded_base() {
        let prompt = user_prompt(&shortlist(), &context());

        assert!(prompt.contains("Contractor ID: c4"));
        assert!(prompt.contains("Contractor ID: c5"));
        assert!(prompt.contains("Base Score: 86.0"));
        assert!(prompt.contains("Base Score: 67.1"));
        assert!(prompt.contains("roofing, 9 yrs, 4.5/5 rating, 164 reviews, $$ pricing, 3 weeks"));
        assert!(prompt.contains("Licenses: UT-ROOF-c4"));
        assert!(prompt.contains("Flags: newer_company"));
    }

    #[test]
    fn user_prompt_carries_request_and_bound() {
        let prompt = user_prompt(&shortlist(), &context());

        assert!(prompt.contains("City: Salt Lake City"));
        assert!(prompt.contains("Project Type: roofing"));
        assert!(prompt.contains("Notes: Prefer a long workmanship warranty"));
        assert!(prompt.contains(r#"User Weights: {"price":0.1,"rating":0.3}"#));
        assert!(prompt.contains("Select the top 3 contractors"));
        assert!(prompt.contains("±5 points of the base score"));
        assert!(prompt.contains("between 80.2 and 90.2"));
        assert!(prompt.contains(OUTPUT_SHAPE));
    }

    #[test]
    fn system_prompt_follows_context_limits() {
        let mut context = context();
        context.max_selections = 2;
        context.adjustment_bound = 3.0;

        let prompt = system_prompt(&context);
        assert!(prompt.contains("Select the top 2 contractors"));
        assert!(prompt.contains("NEVER exceed ±3 points"));
        assert!(prompt.contains("NEVER EXCEED 100 POINTS"));
    }
}
