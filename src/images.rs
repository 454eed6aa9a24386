//! Placeholder image references
//!
//! Every icon, screenshot and avatar is an opaque picsum.photos URL derived
//! from a seed string, so the same seed always yields the same picture.

use regex::Regex;
use std::sync::LazyLock;

const IMAGE_HOST: &str = "https://picsum.photos/seed";

/// Screenshots attached to each generated listing
pub const GENERATED_SCREENSHOTS: usize = 3;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Derive an image seed from a display name.
///
/// Strips everything but ASCII letters and digits. Names that strip down to
/// nothing fall back to `app` so the URL still resolves.
pub fn image_seed(name: &str) -> String {
    let seed = NON_ALNUM.replace_all(name, "");
    if seed.is_empty() {
        "app".to_string()
    } else {
        seed.into_owned()
    }
}

pub fn icon_url(seed: &str) -> String {
    format!("{}/{}/200", IMAGE_HOST, seed)
}

pub fn screenshot_url(seed: &str) -> String {
    format!("{}/{}/300/600", IMAGE_HOST, seed)
}

pub fn avatar_url(index: usize) -> String {
    format!("{}/user{}/50", IMAGE_HOST, index)
}

/// Numbered screenshots for a generated listing: `<seed>1`, `<seed>2`, ...
pub fn generated_screenshots(seed: &str) -> Vec<String> {
    (1..=GENERATED_SCREENSHOTS)
        .map(|n| screenshot_url(&format!("{}{}", seed, n)))
        .collect()
}
