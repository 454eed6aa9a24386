//! Marketplace catalog - listing and review types plus the built-in dataset
//!
//! The built-in catalog is assembled once per process and shared read-only.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Category tabs shown above the home listing
pub const CATEGORIES: &[&str] = &["For you", "Top charts", "Kids", "Categories"];

/// Home page section sizes
pub const FEATURED_COUNT: usize = 4;
pub const RECOMMENDED_COUNT: usize = 6;
pub const TOP_CHARTS_COUNT: usize = 9;

/// A single user review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub user: String,
    pub avatar: String,
    pub rating: u8,
    pub text: String,
    /// Display date, stamped when the review was created
    pub date: String,
}

/// One marketplace listing, either built-in or AI generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub developer: String,
    pub category: String,
    pub icon_url: String,
    pub rating: f32,
    pub downloads: String,
    pub description: String,
    pub short_description: String,
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ai_generated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CatalogEntry {
    /// Whether this entry came from the generative service
    pub fn is_synthetic(&self) -> bool {
        self.is_ai_generated.unwrap_or(false)
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}

/// Read-only collection of listings
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    entries: builtin_entries(),
});

impl Catalog {
    /// The catalog compiled into the binary
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn categories(&self) -> &'static [&'static str] {
        CATEGORIES
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The first `n` entries in catalog order (fewer if the catalog is short)
    pub fn head(&self, n: usize) -> &[CatalogEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn featured(&self) -> &[CatalogEntry] {
        self.head(FEATURED_COUNT)
    }

    pub fn recommended(&self) -> &[CatalogEntry] {
        self.head(RECOMMENDED_COUNT)
    }

    /// Ranked listing; rank is position + 1
    pub fn top_charts(&self) -> &[CatalogEntry] {
        self.head(TOP_CHARTS_COUNT)
    }
}

struct Seed {
    id: &'static str,
    name: &'static str,
    developer: &'static str,
    category: &'static str,
    image: &'static str,
    rating: f32,
    downloads: &'static str,
    short_description: &'static str,
    description: &'static str,
    screenshots: &'static [&'static str],
    tags: [&'static str; 3],
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "1",
        name: "Instagram",
        developer: "Instagram",
        category: "Social",
        image: "insta",
        rating: 4.5,
        downloads: "1B+",
        short_description: "Bringing you closer to the people and things you love.",
        description: "Instagram (from Meta) allows you to create and share your photos, stories, and videos with the friends and followers you care about. Connect with friends, share what you're up to, or see what's new from others all over the world.",
        screenshots: &["insta1", "insta2", "insta3"],
        tags: ["Social", "Photo", "Video"],
    },
    Seed {
        id: "2",
        name: "Candy Crush Saga",
        developer: "King",
        category: "Puzzle",
        image: "candy",
        rating: 4.6,
        downloads: "1B+",
        short_description: "Master the legendary match 3 puzzle game from King!",
        description: "Start playing Candy Crush Saga today – a legendary puzzle game loved by millions of players around the world. Switch and match Candies in this tasty puzzle adventure to progress to the next level for that sweet winning feeling!",
        screenshots: &["candy1", "candy2"],
        tags: ["Puzzle", "Match 3", "Casual"],
    },
    Seed {
        id: "3",
        name: "Spotify: Music and Podcasts",
        developer: "Spotify AB",
        category: "Music & Audio",
        image: "spotify",
        rating: 4.4,
        downloads: "1B+",
        short_description: "Listen to songs, play podcasts, create playlists and discover music you love.",
        description: "With the Spotify music and podcast app, you can play millions of songs, albums and original podcasts for free. Stream music and podcasts, discover albums, playlists or even single songs for free on your mobile or tablet.",
        screenshots: &["spotify1", "spotify2"],
        tags: ["Music", "Streaming", "Podcasts"],
    },
    Seed {
        id: "4",
        name: "Duolingo: Language Lessons",
        developer: "Duolingo",
        category: "Education",
        image: "duo",
        rating: 4.7,
        downloads: "100M+",
        short_description: "Learn a new language with the world’s most downloaded education app!",
        description: "Duolingo is the fun, free app for learning 40+ languages through quick, bite-sized lessons. Practice speaking, reading, listening, and writing to build your vocabulary and grammar skills.",
        screenshots: &["duo1", "duo2"],
        tags: ["Education", "Language", "Free"],
    },
    Seed {
        id: "5",
        name: "Subway Surfers",
        developer: "SYBO Games",
        category: "Arcade",
        image: "subway",
        rating: 4.6,
        downloads: "1B+",
        short_description: "DASH as fast as you can! DODGE the oncoming trains!",
        description: "Help Jake, Tricky & Fresh escape from the grumpy Inspector and his dog. Grind trains with your cool crew. Colorful and vivid HD graphics! Hoverboard Surfing! Paint powered jetpack!",
        screenshots: &["sub1", "sub2"],
        tags: ["Arcade", "Runner", "Action"],
    },
    Seed {
        id: "6",
        name: "Calm",
        developer: "Calm.com",
        category: "Health & Fitness",
        image: "calm",
        rating: 4.3,
        downloads: "50M+",
        short_description: "Sleep, Meditate, Relax.",
        description: "Calm is the #1 app for sleep and meditation. Join the millions experiencing lower stress, less anxiety, and more restful sleep with our guided meditations, Sleep Stories, breathing programs, masterclasses, and relaxing music.",
        screenshots: &["calm1", "calm2"],
        tags: ["Health", "Meditation", "Sleep"],
    },
];

fn builtin_entries() -> Vec<CatalogEntry> {
    SEEDS
        .iter()
        .map(|s| CatalogEntry {
            id: s.id.to_string(),
            name: s.name.to_string(),
            developer: s.developer.to_string(),
            category: s.category.to_string(),
            icon_url: crate::images::icon_url(s.image),
            rating: s.rating,
            downloads: s.downloads.to_string(),
            description: s.description.to_string(),
            short_description: s.short_description.to_string(),
            screenshots: s
                .screenshots
                .iter()
                .map(|seed| crate::images::screenshot_url(seed))
                .collect(),
            reviews: Vec::new(),
            is_ai_generated: None,
            tags: Some(s.tags.iter().map(|t| t.to_string()).collect()),
        })
        .collect()
}
