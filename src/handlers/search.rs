//! Search-result listing extractors.
//!
//! The two sites are deliberately asymmetric: web search results feed the
//! crawl, wiki results are reported and the branch ends there.

use url::Url;

use crate::context::{FetchedPage, HandlerOutput, PageHandler};
use crate::error::Result;
use crate::query::{attr, attr_eq, attr_or_empty, children_named, find_all};
use crate::tree::parse_tree;

const RESULT_LINK_CLASS: &str = "l";
const WIKI_RESULTS_CLASS: &str = "mw-search-results";
const WIKI_ORIGIN: &str = "http://en.wikipedia.org";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    pub href: String,
    pub title: Option<String>,
}

/// Follows every result anchor (`<a class="l">`) of a web search listing.
pub struct GoogleResults;

impl GoogleResults {
    pub fn extract(&self, page: &FetchedPage) -> Vec<ExtractedLink> {
        let tree = parse_tree(&page.text());
        find_all(&tree, "a")
            .filter(|a| attr_eq(a, "class", RESULT_LINK_CLASS))
            .map(|a| ExtractedLink {
                href: attr_or_empty(a, "href").to_string(),
                title: attr(a, "title").map(str::to_string),
            })
            .collect()
    }
}

impl PageHandler for GoogleResults {
    fn name(&self) -> &'static str {
        "google"
    }

    fn handle(&self, page: &FetchedPage) -> Result<HandlerOutput> {
        let links = self.extract(page);
        log::debug!("{} search results on {}", links.len(), page.source_url);

        Ok(HandlerOutput::continue_with(
            Vec::new(),
            links.into_iter().map(|link| link.href).collect(),
        ))
    }
}

/// Reports `title: url` for every entry of a wiki search listing.
pub struct WikipediaResults;

impl WikipediaResults {
    /// One link per `<li>` child of a results list that holds an anchor.
    pub fn extract(&self, page: &FetchedPage) -> Vec<ExtractedLink> {
        let tree = parse_tree(&page.text());
        let mut links = Vec::new();

        for list in find_all(&tree, "ul").filter(|ul| attr_eq(ul, "class", WIKI_RESULTS_CLASS)) {
            for item in children_named(list, "li") {
                match find_all(item, "a").next() {
                    Some(anchor) => links.push(ExtractedLink {
                        href: attr_or_empty(anchor, "href").to_string(),
                        title: attr(anchor, "title").map(str::to_string),
                    }),
                    None => log::debug!("Skipping search entry without a link"),
                }
            }
        }

        links
    }
}

impl PageHandler for WikipediaResults {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    fn handle(&self, page: &FetchedPage) -> Result<HandlerOutput> {
        let origin = Url::parse(WIKI_ORIGIN)?;
        let emitted = self
            .extract(page)
            .into_iter()
            .map(|link| {
                let absolute = origin
                    .join(&link.href)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| format!("{}{}", WIKI_ORIGIN, link.href));
                format!("{}: {}", link.title.unwrap_or_default(), absolute)
            })
            .collect();

        Ok(HandlerOutput::terminal(emitted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content: &str) -> FetchedPage {
        FetchedPage::new(content, "http://www.google.com/search?q=rust&start=0")
    }

    #[test]
    fn test_google_results_filter_on_class() {
        let content = r#"<a href="a" class="l">A</a><a href="b" class="x">B</a><a href="c">C</a>"#;
        let output = GoogleResults.handle(&page(content)).unwrap();
        assert_eq!(output.next_urls(), ["a"]);
        assert!(output.emitted.is_empty());
        assert!(!output.is_terminal());
    }

    #[test]
    fn test_google_results_nested_anchors() {
        let content = r#"<ol><li><h3><a class="l" href="http://one/" title="One">1</a></h3></li>
            <li><h3><a class="l" href="http://two/">2</a></h3></li></ol>"#;
        let links = GoogleResults.extract(&page(content));
        assert_eq!(
            links,
            vec![
                ExtractedLink {
                    href: "http://one/".into(),
                    title: Some("One".into())
                },
                ExtractedLink {
                    href: "http://two/".into(),
                    title: None
                },
            ]
        );
    }

    #[test]
    fn test_wikipedia_results_emit_absolute_lines() {
        let content = r#"<ul class="mw-search-results">
            <li><a href="/wiki/Rust" title="Rust">Rust</a></li>
            <li><div class="heading"><a href="/wiki/Rust_(language)" title="Rust (language)">R</a></div></li>
            <li>no link here</li>
            </ul>"#;
        let output = WikipediaResults.handle(&page(content)).unwrap();
        assert_eq!(
            output.emitted,
            vec![
                "Rust: http://en.wikipedia.org/wiki/Rust",
                "Rust (language): http://en.wikipedia.org/wiki/Rust_(language)",
            ]
        );
        assert!(output.is_terminal());
    }

    #[test]
    fn test_wikipedia_results_ignore_other_lists() {
        let content = r#"<ul class="mw-search-results-other"><li><a href="/wiki/X" title="X">X</a></li></ul>
            <ul><li><a href="/wiki/Y" title="Y">Y</a></li></ul>"#;
        let output = WikipediaResults.handle(&page(content)).unwrap();
        assert!(output.emitted.is_empty());
        assert!(output.next_urls().is_empty());
    }

    #[test]
    fn test_wikipedia_results_missing_title_is_empty() {
        let content = r#"<ul class="mw-search-results"><li><a href="/wiki/Z">Z</a></li></ul>"#;
        let output = WikipediaResults.handle(&page(content)).unwrap();
        assert_eq!(output.emitted, vec![": http://en.wikipedia.org/wiki/Z"]);
    }
}
