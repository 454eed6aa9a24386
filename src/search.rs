//! Local catalog search - case-insensitive substring match over name,
//! category and tags

use crate::catalog::CatalogEntry;

/// Filter `entries` down to those matching `query`.
///
/// An empty (or all-whitespace) query matches nothing; the caller shows the
/// AI suggestions section on its own in that case.
pub fn filter_catalog<'a>(query: &str, entries: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    entries
        .iter()
        .filter(|entry| matches_entry(&needle, entry))
        .collect()
}

/// `needle` must already be lowercased
fn matches_entry(needle: &str, entry: &CatalogEntry) -> bool {
    entry.name.to_lowercase().contains(needle)
        || entry.category.to_lowercase().contains(needle)
        || entry
            .tags()
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn names(results: &[&CatalogEntry]) -> Vec<String> {
        results.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_music_matches_spotify_only() {
        let results = filter_catalog("music", Catalog::builtin().entries());
        assert_eq!(names(&results), vec!["Spotify: Music and Podcasts"]);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let entries = Catalog::builtin().entries();
        assert!(filter_catalog("", entries).is_empty());
        assert!(filter_catalog("   ", entries).is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let entries = Catalog::builtin().entries();
        assert_eq!(names(&filter_catalog("CANDY", entries)), vec!["Candy Crush Saga"]);
        assert_eq!(names(&filter_catalog("sLeEp", entries)), vec!["Calm"]);
    }

    #[test]
    fn test_matches_category() {
        let results = filter_catalog("fitness", Catalog::builtin().entries());
        assert_eq!(names(&results), vec!["Calm"]);
    }

    #[test]
    fn test_description_not_searched() {
        // "trains" only appears in Subway Surfers' description
        assert!(filter_catalog("trains", Catalog::builtin().entries()).is_empty());
    }

    #[test]
    fn test_results_are_matching_subset() {
        let entries = Catalog::builtin().entries();
        for query in ["a", "o", "pu", "1", "social", "zzz", "&"] {
            let needle = query.to_lowercase();
            for result in filter_catalog(query, entries) {
                assert!(entries.iter().any(|e| e.id == result.id));
                assert!(matches_entry(&needle, result), "{} should match {}", result.name, query);
            }
        }
    }

    #[test]
    fn test_preserves_catalog_order() {
        let results = filter_catalog("a", Catalog::builtin().entries());
        let ids: Vec<&str> = results.iter().map(|e| e.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
