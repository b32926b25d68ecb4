//! Name-based lookup of handlers, so a crawl can be configured with strings.

use std::sync::Arc;

use crate::config::CrawlConfig;
use crate::context::{PageHandler, SeedGenerator};
use crate::error::{HandlerError, Result};
use crate::fetch::Fetcher;
use crate::handlers::{
    Chain, GoogleResults, GoogleSeeds, MetaDump, RawOutput, TitleDump, Validator, WikipediaResults,
    WikipediaSeeds, XmlDump,
};

pub const PAGE_HANDLERS: &[&str] = &[
    "source",
    "xmlsource",
    "meta",
    "title",
    "google",
    "wikipedia",
    "validator",
];

pub const SEED_GENERATORS: &[&str] = &["google", "wikipedia"];

/// Builds the page handler registered under `name`.
///
/// A comma-separated list (`title,meta`) builds a [`Chain`] running each
/// named handler in turn. `fetcher` is only consulted by handlers that make
/// side lookups.
pub fn page_handler(
    name: &str,
    config: &CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
) -> Result<Arc<dyn PageHandler>> {
    if !name.contains(',') {
        return single_handler(name.trim(), config, fetcher);
    }

    let members = name
        .split(',')
        .map(|member| single_handler(member.trim(), config, Arc::clone(&fetcher)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Arc::new(Chain(members)))
}

fn single_handler(
    name: &str,
    config: &CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
) -> Result<Arc<dyn PageHandler>> {
    let handler: Arc<dyn PageHandler> = match name {
        "source" => Arc::new(RawOutput),
        "xmlsource" => Arc::new(XmlDump),
        "meta" => Arc::new(MetaDump),
        "title" => Arc::new(TitleDump),
        "google" => Arc::new(GoogleResults),
        "wikipedia" => Arc::new(WikipediaResults),
        "validator" => Arc::new(Validator::new(fetcher, config.validator_endpoint.clone())),
        other => return Err(HandlerError::UnknownHandler(other.to_string())),
    };
    Ok(handler)
}

pub fn seed_generator(name: &str) -> Result<Arc<dyn SeedGenerator>> {
    match name {
        "google" => Ok(Arc::new(GoogleSeeds)),
        "wikipedia" => Ok(Arc::new(WikipediaSeeds)),
        other => Err(HandlerError::UnknownSeedGenerator(other.to_string())),
    }
}
