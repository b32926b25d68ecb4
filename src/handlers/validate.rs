//! Markup validation through an external validator's SOAP 1.2 interface.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::context::{anchor_hrefs, FetchedPage, HandlerOutput, PageHandler};
use crate::error::{HandlerError, Result};
use crate::fetch::Fetcher;
use crate::query::find_all_ns;
use crate::tree::{parse_tree, ElementNode};

pub const SOAP_ENVELOPE_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
pub const MARKUP_VALIDATOR_NS: &str = "http://www.w3.org/2005/10/markup-validator";

// Anything before the envelope (XML declaration, stray output) is discarded.
static ENVELOPE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<[a-z_][a-z0-9_.-]*:envelope\b").expect("envelope pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub checked_url: String,
    pub error_count: u32,
    pub warning_count: u32,
}

impl ValidationResult {
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }
}

/// Validates each page against the service, reports the counts, and keeps
/// crawling through the page's own anchors whatever the service says.
pub struct Validator {
    fetcher: Arc<dyn Fetcher>,
    endpoint: String,
}

impl Validator {
    pub fn new(fetcher: Arc<dyn Fetcher>, endpoint: impl Into<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
        }
    }

    pub fn check_url(&self, page_url: &str) -> String {
        format!("{}?output=soap12&uri={}", self.endpoint, page_url)
    }

    pub fn info_url(&self, page_url: &str) -> String {
        format!("{}?uri={}", self.endpoint, page_url)
    }

    /// One blocking lookup against the service.
    pub fn validate(&self, page_url: &str) -> Result<ValidationResult> {
        let body = self.fetcher.get(&self.check_url(page_url))?;
        parse_response(&body, page_url)
    }

    fn report(&self, result: &ValidationResult) -> Vec<String> {
        let mut lines = vec![
            format!("Results for URL: {}", result.checked_url),
            format!("Errors: {}", result.error_count),
            format!("Warnings: {}", result.warning_count),
        ];
        if !result.is_clean() {
            lines.push(format!("Further info: {}", self.info_url(&result.checked_url)));
        }
        lines
    }
}

impl PageHandler for Validator {
    fn name(&self) -> &'static str {
        "validator"
    }

    fn handle(&self, page: &FetchedPage) -> Result<HandlerOutput> {
        let emitted = match self.validate(&page.source_url) {
            Ok(result) => self.report(&result),
            Err(e) => {
                log::warn!("Validation of {} failed: {}", page.source_url, e);
                Vec::new()
            }
        };

        let tree = parse_tree(&page.text());
        Ok(HandlerOutput::continue_with(emitted, anchor_hrefs(&tree)))
    }
}

/// Reads the error and warning counts out of a SOAP validation response.
pub fn parse_response(body: &str, checked_url: &str) -> Result<ValidationResult> {
    let start = ENVELOPE_START
        .find(body)
        .ok_or_else(|| HandlerError::ServiceUnavailable(checked_url.to_string()))?
        .start();
    let tree = parse_tree(&body[start..]);

    if find_all_ns(&tree, SOAP_ENVELOPE_NS, "body").is_empty() {
        return Err(HandlerError::Parse("response has no SOAP body".to_string()));
    }

    Ok(ValidationResult {
        checked_url: checked_url.to_string(),
        error_count: read_count(&tree, "errorcount")?,
        warning_count: read_count(&tree, "warningcount")?,
    })
}

fn read_count(tree: &ElementNode, field: &str) -> Result<u32> {
    let node = find_all_ns(tree, MARKUP_VALIDATOR_NS, field)
        .into_iter()
        .next()
        .ok_or_else(|| HandlerError::Parse(format!("missing {}", field)))?;

    let text = node.text();
    text.trim()
        .parse()
        .map_err(|_| HandlerError::Parse(format!("{} is not a number: {:?}", field, text.trim())))
}
