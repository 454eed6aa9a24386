//! Generated user reviews for listings that ship without any

use serde::Deserialize;

use crate::catalog::{CatalogEntry, Review};
use crate::config::GenAiConfig;
use crate::genai::{decode_exact, GenAiError, GenerationRequest, Schema, TextGenerator};
use crate::images;

/// Reviews requested per listing
pub const REVIEW_COUNT: usize = 3;

/// Display format for review dates (month/day/year, no padding)
const DATE_FORMAT: &str = "%-m/%-d/%Y";

const PROMPT_TEMPLATE: &str = r#"Generate {count} user reviews for the app "{name}".
Include a user name, a realistic rating (1-5), and a short review text."#;

#[derive(Debug, Deserialize)]
struct GeneratedReview {
    user: String,
    rating: f64,
    text: String,
}

fn review_schema() -> Schema {
    Schema::array_of(Schema::object(&[
        ("user", Schema::String),
        ("rating", Schema::Number),
        ("text", Schema::String),
    ]))
}

fn review_request(app_name: &str) -> GenerationRequest {
    GenerationRequest {
        prompt: PROMPT_TEMPLATE
            .replace("{count}", &REVIEW_COUNT.to_string())
            .replace("{name}", app_name),
        schema: review_schema(),
    }
}

/// Round to a whole star and clamp into 1..=5
fn star_rating(raw: f64) -> u8 {
    if raw.is_finite() {
        raw.round().clamp(1.0, 5.0) as u8
    } else {
        1
    }
}

fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

fn into_review(review: GeneratedReview, index: usize, date: &str) -> Review {
    Review {
        id: format!("review-{}", index),
        user: review.user,
        avatar: images::avatar_url(index),
        rating: star_rating(review.rating),
        text: review.text,
        date: date.to_string(),
    }
}

/// Generate reviews, surfacing the failure reason.
///
/// All or nothing: fewer than [`REVIEW_COUNT`] records is an error.
pub async fn try_generate_reviews<G: TextGenerator + ?Sized>(
    config: &GenAiConfig,
    generator: &G,
    app_name: &str,
) -> Result<Vec<Review>, GenAiError> {
    if !config.enabled {
        return Err(GenAiError::Disabled);
    }

    let text = generator.generate(config, &review_request(app_name)).await?;
    let records: Vec<GeneratedReview> = decode_exact(&text, REVIEW_COUNT)?;

    let date = today();
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(i, r)| into_review(r, i, &date))
        .collect())
}

/// Three generated reviews for `app_name`, or none on any failure
pub async fn generate_reviews<G: TextGenerator + ?Sized>(
    config: &GenAiConfig,
    generator: &G,
    app_name: &str,
) -> Vec<Review> {
    if !config.enabled {
        tracing::debug!("Skipping review generation for {:?}: service disabled", app_name);
        return Vec::new();
    }

    match try_generate_reviews(config, generator, app_name).await {
        Ok(reviews) => reviews,
        Err(e) => {
            tracing::warn!("Error generating reviews for {:?}: {}", app_name, e);
            Vec::new()
        }
    }
}

/// Reviews to show on a listing's detail view.
///
/// Listings that already carry reviews are returned as-is and never reach
/// the generator.
pub async fn reviews_for<G: TextGenerator + ?Sized>(
    config: &GenAiConfig,
    generator: &G,
    entry: &CatalogEntry,
) -> Vec<Review> {
    if !entry.reviews.is_empty() {
        return entry.reviews.clone();
    }
    generate_reviews(config, generator, &entry.name).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::genai::testing::{enabled_config, ScriptedGenerator};

    fn sample_reply(count: usize) -> String {
        let items: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "user": format!("Reviewer {}", i),
                    "rating": 4,
                    "text": "Works great."
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    #[test]
    fn test_star_rating() {
        assert_eq!(star_rating(4.4), 4);
        assert_eq!(star_rating(4.5), 5);
        assert_eq!(star_rating(0.0), 1);
        assert_eq!(star_rating(9.0), 5);
        assert_eq!(star_rating(f64::NAN), 1);
    }

    #[tokio::test]
    async fn test_generates_three_reviews() {
        let generator = ScriptedGenerator::replying(&sample_reply(3));
        let reviews = generate_reviews(&enabled_config(), &generator, "Calm").await;

        assert_eq!(reviews.len(), REVIEW_COUNT);
        for (i, review) in reviews.iter().enumerate() {
            assert_eq!(review.id, format!("review-{}", i));
            assert_eq!(review.avatar, format!("https://picsum.photos/seed/user{}/50", i));
            assert_eq!(review.user, format!("Reviewer {}", i));
            assert_eq!(review.rating, 4);
            assert!(!review.date.is_empty());
        }
        assert!(generator.prompts.lock().unwrap()[0].contains("\"Calm\""));
    }

    #[tokio::test]
    async fn test_partial_batch_is_discarded() {
        for count in [1, 2] {
            let generator = ScriptedGenerator::replying(&sample_reply(count));
            let reviews = generate_reviews(&enabled_config(), &generator, "Calm").await;
            assert!(reviews.is_empty(), "{} reviews should be discarded", count);
        }
    }

    #[tokio::test]
    async fn test_failure_yields_empty() {
        let generator = ScriptedGenerator::failing();
        assert!(generate_reviews(&enabled_config(), &generator, "Calm").await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_never_calls_service() {
        let generator = ScriptedGenerator::replying(&sample_reply(3));
        let entry = Catalog::builtin().get("6").unwrap();
        assert!(reviews_for(&GenAiConfig::disabled(), &generator, entry).await.is_empty());
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_existing_reviews_skip_generation() {
        let generator = ScriptedGenerator::replying(&sample_reply(3));
        let mut entry = Catalog::builtin().get("1").unwrap().clone();
        entry.reviews = vec![Review {
            id: "r1".to_string(),
            user: "Ana".to_string(),
            avatar: images::avatar_url(0),
            rating: 5,
            text: "Love it".to_string(),
            date: "1/2/2025".to_string(),
        }];

        let reviews = reviews_for(&enabled_config(), &generator, &entry).await;
        assert_eq!(reviews, entry.reviews);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_reviews_trigger_generation() {
        let generator = ScriptedGenerator::replying(&sample_reply(3));
        let entry = Catalog::builtin().get("2").unwrap();
        let reviews = reviews_for(&enabled_config(), &generator, entry).await;
        assert_eq!(reviews.len(), 3);
        assert_eq!(generator.calls(), 1);
    }
}
