//! The boundary between handlers and the host crawler.
//!
//! The host hands every handler a [`FetchedPage`] and gets back a
//! [`HandlerOutput`]: the lines the handler emitted plus either a new frontier
//! or the terminal signal. Nothing else crosses the boundary.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::{attr, find_all};
use crate::tree::ElementNode;

/// One fetched page plus what the host learned while fetching it.
/// Read-only to handlers.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub raw_content: Vec<u8>,
    pub source_url: String,
    pub status_code: u16,
    /// `Content-Type` header as sent, parameters included.
    pub content_type: Option<String>,
}

impl FetchedPage {
    /// A page served with status 200 and no declared content type.
    pub fn new(raw_content: impl Into<Vec<u8>>, source_url: impl Into<String>) -> Self {
        Self {
            raw_content: raw_content.into(),
            source_url: source_url.into(),
            status_code: 200,
            content_type: None,
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Media type without parameters, lowercased (`text/html` for
    /// `text/html; charset=UTF-8`).
    pub fn mime_type(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|mime| mime.trim().to_ascii_lowercase())
            .filter(|mime| !mime.is_empty())
    }

    /// Content as text; invalid UTF-8 sequences become U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw_content)
    }
}

/// What the host should do after a handler returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "urls")]
pub enum Frontier {
    /// Fetch these URLs next, in order.
    Continue(Vec<String>),
    /// End this crawl branch.
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerOutput {
    pub emitted: Vec<String>,
    pub frontier: Frontier,
}

impl HandlerOutput {
    pub fn terminal(emitted: Vec<String>) -> Self {
        Self {
            emitted,
            frontier: Frontier::Terminal,
        }
    }

    pub fn continue_with(emitted: Vec<String>, urls: Vec<String>) -> Self {
        Self {
            emitted,
            frontier: Frontier::Continue(urls),
        }
    }

    /// The next-URL list; empty for a terminal result.
    pub fn next_urls(&self) -> &[String] {
        match &self.frontier {
            Frontier::Continue(urls) => urls,
            Frontier::Terminal => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.frontier, Frontier::Terminal)
    }
}

/// Logic invoked once per fetched page.
pub trait PageHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn handle(&self, page: &FetchedPage) -> Result<HandlerOutput>;
}

/// Logic invoked once at crawl start to turn search terms into seed URLs.
pub trait SeedGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    fn seeds(&self, terms: &[String]) -> Vec<String>;
}

/// Every `a@href` in the tree, in document order. Anchors without an
/// `href` contribute nothing.
pub fn anchor_hrefs(tree: &ElementNode) -> Vec<String> {
    find_all(tree, "a")
        .filter_map(|a| attr(a, "href"))
        .map(str::to_string)
        .collect()
}
