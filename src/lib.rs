//! Storefront Core - app marketplace catalog with AI-generated filler
//!
//! Local catalog search plus suggestions and reviews generated by the
//! Gemini API, merged per view with stale results discarded.

pub mod catalog;
pub mod config;
pub mod genai;
pub mod images;
pub mod install;
pub mod render;
pub mod reviews;
pub mod search;
pub mod session;
pub mod storefront;
pub mod suggest;

pub use catalog::{Catalog, CatalogEntry, Review, CATEGORIES};
pub use config::GenAiConfig;
pub use genai::{GeminiClient, GenAiError, GenerationRequest, Schema, TextGenerator};
pub use install::{InstallState, Installation, INSTALL_DELAY};
pub use reviews::{generate_reviews, reviews_for, REVIEW_COUNT};
pub use search::filter_catalog;
pub use session::{DetailView, Loadable, RequestGeneration, SearchSession, Ticket};
pub use storefront::Storefront;
pub use suggest::{suggest_apps, SUGGESTION_COUNT};
