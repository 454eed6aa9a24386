//! AI app suggestions for a search query
//!
//! Asks the generative service for fictional listings related to the query
//! and reshapes them into synthetic [`CatalogEntry`] values.

use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::catalog::CatalogEntry;
use crate::config::GenAiConfig;
use crate::genai::{decode_exact, GenAiError, GenerationRequest, Schema, TextGenerator};
use crate::images;

/// Listings requested per search
pub const SUGGESTION_COUNT: usize = 4;

const PROMPT_TEMPLATE: &str = r#"Generate {count} realistic but fictional mobile app ideas based on the search query: "{query}".
Return a list of app details including name, developer, category, rating (3.5-5.0), downloads, description, shortDescription, and 3 hypothetical tags.
Make them sound like real store listings."#;

/// One record as the service returns it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedApp {
    name: String,
    developer: String,
    category: String,
    rating: f64,
    downloads: String,
    description: String,
    short_description: String,
    tags: Vec<String>,
}

fn suggestion_schema() -> Schema {
    Schema::array_of(Schema::object(&[
        ("name", Schema::String),
        ("developer", Schema::String),
        ("category", Schema::String),
        ("rating", Schema::Number),
        ("downloads", Schema::String),
        ("description", Schema::String),
        ("shortDescription", Schema::String),
        ("tags", Schema::array_of(Schema::String)),
    ]))
}

fn suggestion_request(query: &str) -> GenerationRequest {
    GenerationRequest {
        prompt: PROMPT_TEMPLATE
            .replace("{count}", &SUGGESTION_COUNT.to_string())
            .replace("{query}", query),
        schema: suggestion_schema(),
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Turn a generated record into a synthetic listing.
///
/// `batch_stamp` is shared by the whole response, so ids are unique within
/// one batch but not across batches minted in the same millisecond.
fn into_entry(app: GeneratedApp, batch_stamp: u128, index: usize) -> CatalogEntry {
    let seed = images::image_seed(&app.name);
    let rating = if app.rating.is_finite() {
        app.rating.clamp(1.0, 5.0) as f32
    } else {
        1.0
    };

    CatalogEntry {
        id: format!("ai-{}-{}", batch_stamp, index),
        icon_url: images::icon_url(&seed),
        screenshots: images::generated_screenshots(&seed),
        name: app.name,
        developer: app.developer,
        category: app.category,
        rating,
        downloads: app.downloads,
        description: app.description,
        short_description: app.short_description,
        reviews: Vec::new(),
        is_ai_generated: Some(true),
        tags: Some(app.tags),
    }
}

/// Fetch and reshape suggestions, surfacing the failure reason
pub async fn try_suggest_apps<G: TextGenerator + ?Sized>(
    config: &GenAiConfig,
    generator: &G,
    query: &str,
) -> Result<Vec<CatalogEntry>, GenAiError> {
    if !config.enabled {
        return Err(GenAiError::Disabled);
    }
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let text = generator.generate(config, &suggestion_request(query)).await?;
    let records: Vec<GeneratedApp> = decode_exact(&text, SUGGESTION_COUNT)?;

    let stamp = now_millis();
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(i, app)| into_entry(app, stamp, i))
        .collect())
}

/// Synthetic listings for `query`, or nothing if the query is blank, the
/// service is disabled or the call fails for any reason.
pub async fn suggest_apps<G: TextGenerator + ?Sized>(
    config: &GenAiConfig,
    generator: &G,
    query: &str,
) -> Vec<CatalogEntry> {
    if !config.enabled {
        tracing::debug!("Skipping AI suggestions for {:?}: service disabled", query);
        return Vec::new();
    }
    if query.trim().is_empty() {
        tracing::debug!("Skipping AI suggestions: blank query");
        return Vec::new();
    }

    match try_suggest_apps(config, generator, query).await {
        Ok(entries) => {
            tracing::info!("Generated {} AI suggestions for {:?}", entries.len(), query);
            entries
        }
        Err(e) => {
            tracing::warn!("Error generating apps for {:?}: {}", query, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::testing::{enabled_config, ScriptedGenerator};
    use std::collections::HashSet;

    fn sample_reply(count: usize) -> String {
        let items: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "name": format!("Beat Lab {}!", i),
                    "developer": "Fictional Studio",
                    "category": "Music & Audio",
                    "rating": 4.2,
                    "downloads": "10K+",
                    "description": "Make beats anywhere.",
                    "shortDescription": "Pocket drum machine",
                    "tags": ["Music", "Beats", "Creative"]
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    #[tokio::test]
    async fn test_successful_batch() {
        let generator = ScriptedGenerator::replying(&sample_reply(4));
        let entries = suggest_apps(&enabled_config(), &generator, "music").await;

        assert_eq!(entries.len(), SUGGESTION_COUNT);
        let ids: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), SUGGESTION_COUNT);

        for (i, entry) in entries.iter().enumerate() {
            assert!(entry.id.starts_with("ai-"));
            assert!(entry.id.ends_with(&format!("-{}", i)));
            assert!(entry.is_synthetic());
            assert!(entry.reviews.is_empty());
            assert!(!entry.icon_url.is_empty());
            assert_eq!(entry.screenshots.len(), 3);
            assert!(entry.screenshots.iter().all(|s| !s.is_empty()));
        }

        assert_eq!(entries[1].icon_url, "https://picsum.photos/seed/BeatLab1/200");
        assert_eq!(
            entries[1].screenshots[0],
            "https://picsum.photos/seed/BeatLab11/300/600"
        );
        assert_eq!(entries[0].short_description, "Pocket drum machine");
        assert_eq!(entries[0].tags(), &["Music", "Beats", "Creative"]);
    }

    #[tokio::test]
    async fn test_prompt_embeds_query() {
        let generator = ScriptedGenerator::replying(&sample_reply(4));
        suggest_apps(&enabled_config(), &generator, "pixel art").await;
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"pixel art\""));
        assert!(prompts[0].starts_with("Generate 4 "));
    }

    #[tokio::test]
    async fn test_disabled_never_calls_service() {
        let generator = ScriptedGenerator::replying(&sample_reply(4));
        let entries = suggest_apps(&GenAiConfig::disabled(), &generator, "music").await;
        assert!(entries.is_empty());
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_query_never_calls_service() {
        let generator = ScriptedGenerator::replying(&sample_reply(4));
        for query in ["", "   ", "\t\n"] {
            assert!(suggest_apps(&enabled_config(), &generator, query).await.is_empty());
            let direct = try_suggest_apps(&enabled_config(), &generator, query).await.unwrap();
            assert!(direct.is_empty());
        }
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_query_trimmed_in_prompt() {
        let generator = ScriptedGenerator::replying(&sample_reply(4));
        suggest_apps(&enabled_config(), &generator, "  chess  ").await;
        assert!(generator.prompts.lock().unwrap()[0].contains("\"chess\""));
    }

    #[tokio::test]
    async fn test_failure_yields_empty() {
        let generator = ScriptedGenerator::failing();
        assert!(suggest_apps(&enabled_config(), &generator, "music").await.is_empty());
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_payload_yields_empty() {
        let generator = ScriptedGenerator::replying(r#"[{"name":"Only a name"}]"#);
        assert!(suggest_apps(&enabled_config(), &generator, "music").await.is_empty());

        let generator = ScriptedGenerator::replying("not json at all");
        assert!(suggest_apps(&enabled_config(), &generator, "music").await.is_empty());
    }

    #[tokio::test]
    async fn test_short_batch_rejected_and_surplus_trimmed() {
        let short = ScriptedGenerator::replying(&sample_reply(2));
        let result = try_suggest_apps(&enabled_config(), &short, "music").await;
        assert!(matches!(result, Err(GenAiError::Count { expected: 4, actual: 2 })));

        let long = ScriptedGenerator::replying(&sample_reply(6));
        assert_eq!(suggest_apps(&enabled_config(), &long, "music").await.len(), 4);
    }

    #[tokio::test]
    async fn test_rating_coerced_into_range() {
        let reply = sample_reply(4).replace("4.2", "7.5");
        let generator = ScriptedGenerator::replying(&reply);
        let entries = suggest_apps(&enabled_config(), &generator, "music").await;
        assert!(entries.iter().all(|e| e.rating == 5.0));
    }

    #[tokio::test]
    async fn test_each_call_repeats_request() {
        let generator = ScriptedGenerator::replying(&sample_reply(4));
        suggest_apps(&enabled_config(), &generator, "music").await;
        suggest_apps(&enabled_config(), &generator, "music").await;
        assert_eq!(generator.calls(), 2);
    }
}
