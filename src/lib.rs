//! Page handlers for a crawling engine.
//!
//! Handlers turn search terms into seed URLs, or take one fetched page,
//! coerce its markup into an element tree, extract what they care about and
//! hand the host the next URLs to crawl (or tell it to stop).

pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod host;
pub mod output;
pub mod query;
pub mod registry;
pub mod tree;

pub use config::CrawlConfig;
pub use context::{anchor_hrefs, FetchedPage, Frontier, HandlerOutput, PageHandler, SeedGenerator};
pub use error::{HandlerError, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use host::{Host, PageReport};
pub use tree::{parse_tree, Child, ElementNode};
