//! Search-seed generators.
//!
//! Terms are spliced into the query template as given. No percent-encoding
//! is applied, so a term containing spaces or `&` yields a URL the host may
//! not be able to fetch.

use crate::context::SeedGenerator;

/// Web search seeds, first result page only (`start=0`).
pub struct GoogleSeeds;

impl SeedGenerator for GoogleSeeds {
    fn name(&self) -> &'static str {
        "google"
    }

    fn seeds(&self, terms: &[String]) -> Vec<String> {
        terms
            .iter()
            .map(|term| format!("http://www.google.com/search?q={}&start=0", term))
            .collect()
    }
}

/// Wiki full-text search seeds.
pub struct WikipediaSeeds;

impl SeedGenerator for WikipediaSeeds {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    fn seeds(&self, terms: &[String]) -> Vec<String> {
        terms
            .iter()
            .map(|term| {
                format!(
                    "http://en.wikipedia.org/w/index.php?search={}&fulltext=Advanced+search",
                    term
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_google_seeds_one_per_term_in_order() {
        let seeds = GoogleSeeds.seeds(&terms(&["rust", "html parser", "rust"]));
        assert_eq!(
            seeds,
            vec![
                "http://www.google.com/search?q=rust&start=0",
                "http://www.google.com/search?q=html parser&start=0",
                "http://www.google.com/search?q=rust&start=0",
            ]
        );
    }

    #[test]
    fn test_wikipedia_seeds_keep_terms_verbatim() {
        let seeds = WikipediaSeeds.seeds(&terms(&["a&b", "ü"]));
        assert_eq!(
            seeds,
            vec![
                "http://en.wikipedia.org/w/index.php?search=a&b&fulltext=Advanced+search",
                "http://en.wikipedia.org/w/index.php?search=ü&fulltext=Advanced+search",
            ]
        );
    }

    #[test]
    fn test_no_terms_no_seeds() {
        assert!(GoogleSeeds.seeds(&[]).is_empty());
        assert!(WikipediaSeeds.seeds(&[]).is_empty());
    }
}
