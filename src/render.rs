//! Plain-terminal rendering of listings, search results and detail pages

use colored::Colorize;
use std::fmt::Write;

use crate::catalog::{Catalog, CatalogEntry, Review};
use crate::install::InstallState;
use crate::session::{DetailView, Loadable, SearchSession};

pub const NO_AI_RESULTS: &str = "No AI results found. Try a different query!";
pub const APP_NOT_FOUND: &str = "App not found";

fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// One-line card: name, developer, rating and download label
pub fn wide_card(entry: &CatalogEntry) -> String {
    let mut line = format!(
        "[{}] {}  {}  {:.1}★  {}",
        entry.id,
        entry.name.bold(),
        entry.developer.green(),
        entry.rating,
        entry.downloads
    );
    if entry.is_synthetic() {
        line.push_str(&format!("  {}", "AI".purple()));
    }
    line
}

pub fn home(catalog: &Catalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", catalog.categories().join("  |  ").dimmed());

    let _ = writeln!(out, "\n{}", "Featured Apps".bold());
    for entry in catalog.featured() {
        let _ = writeln!(out, "  {}  {}", entry.name.bold(), entry.short_description.dimmed());
    }

    let _ = writeln!(out, "\n{}", "Recommended for you".bold());
    for entry in catalog.recommended() {
        let _ = writeln!(out, "  {}", wide_card(entry));
    }

    let _ = writeln!(out, "\n{}", "Top Charts".bold());
    for (rank, entry) in catalog.top_charts().iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {}  {}  {:.1}★",
            rank + 1,
            entry.name,
            entry.category.dimmed(),
            entry.rating
        );
    }
    out
}

pub fn search_local(session: &SearchSession) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Search results for \"{}\"", session.query);
    if !session.local.is_empty() {
        let _ = writeln!(out, "\n{}", "INSTALLED & AVAILABLE".dimmed());
        for entry in &session.local {
            let _ = writeln!(out, "  {}", wide_card(entry));
        }
    }
    out
}

/// AI section of a search; blank queries have none
pub fn search_suggestions(session: &SearchSession) -> String {
    let mut out = String::new();
    if session.is_blank() {
        return out;
    }
    let _ = writeln!(out, "\n{} {}", "✦ AI Generated Suggestions".purple(), "(Gemini)".dimmed());
    match &session.suggestions {
        Loadable::Loading => {
            let _ = writeln!(out, "  loading...");
        }
        Loadable::Ready(entries) if entries.is_empty() => {
            let _ = writeln!(out, "  {}", NO_AI_RESULTS);
        }
        Loadable::Ready(entries) => {
            for entry in entries {
                let _ = writeln!(out, "  {}", wide_card(entry));
                let _ = writeln!(out, "      {}", entry.short_description.dimmed());
            }
        }
    }
    out
}

pub fn detail_header(view: &DetailView) -> String {
    let entry = &view.entry;
    let mut out = String::new();
    let _ = writeln!(out, "{}", entry.name.bold());
    let _ = writeln!(out, "{}", entry.developer.green());
    let _ = writeln!(
        out,
        "{:.1}★   {} downloads   {}",
        entry.rating, entry.downloads, entry.category
    );
    let _ = writeln!(out, "[ {} ]", install_label(view.install.state()));
    let _ = writeln!(out, "\n{}", "About this app".bold());
    let _ = writeln!(out, "{}", entry.description);
    if !entry.tags().is_empty() {
        let _ = writeln!(out, "{}", entry.tags().join(" · ").dimmed());
    }
    let _ = writeln!(out, "\nIcon: {}", entry.icon_url);
    for shot in &entry.screenshots {
        let _ = writeln!(out, "Screenshot: {}", shot);
    }
    out
}

pub fn install_label(state: InstallState) -> String {
    match state {
        InstallState::Installed => state.label().green().to_string(),
        _ => state.label().to_string(),
    }
}

fn review(review: &Review) -> String {
    format!(
        "  {}  {}  {}\n    {}",
        review.user.bold(),
        stars(review.rating).yellow(),
        review.date.dimmed(),
        review.text
    )
}

pub fn reviews(view: &DetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", "Ratings and reviews".bold());
    match &view.reviews {
        Loadable::Loading => {
            let _ = writeln!(out, "  loading...");
        }
        Loadable::Ready(items) if items.is_empty() => {
            let _ = writeln!(out, "  No reviews yet.");
        }
        Loadable::Ready(items) => {
            for item in items {
                let _ = writeln!(out, "{}", review(item));
            }
        }
    }
    out
}
