use crate::{error::AppResult, services::providers::TextGenerator};

/// Number of movies asked for per request
pub const RECOMMENDATION_COUNT: usize = 5;

pub const SYSTEM_PROMPT: &str = "You are a helpful movie recommendation assistant. \
Always format responses with 'Movie Title (Year) - Description' format.";

/// Builds the user instruction for a mood description
///
/// Every excluded title is listed so the model does not repeat earlier suggestions.
pub fn build_prompt(description: &str, exclude: &[String]) -> String {
    let exclusion = if exclude.is_empty() {
        String::new()
    } else {
        format!(
            " Do NOT recommend any of these movies: {}.",
            exclude.join(", ")
        )
    };

    format!(
        "Recommend exactly {count} different movies based on this description: {description}.{exclusion} \
         Format each recommendation EXACTLY like this, one per line:\n\
         Movie Title (Year) - Brief description in 1-2 sentences.\n\
         Use this exact format with the movie title, then year in parentheses, then a dash, then description.",
        count = RECOMMENDATION_COUNT,
    )
}

/// Asks the generator for recommendations and returns the trimmed reply text
pub async fn request_recommendations(
    generator: &dyn TextGenerator,
    description: &str,
    exclude: &[String],
) -> AppResult<String> {
    let prompt = build_prompt(description, exclude);

    tracing::info!(
        excluded = exclude.len(),
        "Requesting movie recommendations"
    );

    let reply = generator
        .generate(SYSTEM_PROMPT, &prompt)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Recommendation request failed"))?;

    Ok(reply.trim().to_string())
}
