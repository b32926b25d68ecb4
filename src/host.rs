//! A small breadth-first crawl driver for running handlers against live pages.
//!
//! Fetching, scheduling, dedup and limits live here and nowhere else; handlers
//! only ever see one [`FetchedPage`] at a time.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use url::Url;

use crate::config::CrawlConfig;
use crate::context::{FetchedPage, HandlerOutput, PageHandler};
use crate::error::{HandlerError, Result};

/// What one handler invocation produced, as seen by the host.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub url: String,
    pub depth: usize,
    pub status_code: u16,
    pub emitted: Vec<String>,
    /// Frontier after resolution against the page URL.
    pub next_urls: Vec<String>,
    pub terminal: bool,
}

pub struct Host {
    client: reqwest::Client,
    handler: Arc<dyn PageHandler>,
    config: CrawlConfig,
}

impl Host {
    pub fn new(handler: Arc<dyn PageHandler>, config: CrawlConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            handler,
            config,
        })
    }

    /// Crawls from `seeds` until the frontier is exhausted or a limit is hit.
    ///
    /// Pages of one depth are processed together, up to `concurrency` at a
    /// time; a failed fetch or handler drops that branch only.
    pub async fn crawl(&self, seeds: Vec<String>) -> Vec<PageReport> {
        let mut visited = HashSet::new();
        let mut reports = Vec::new();
        let mut attempted = 0usize;

        let mut level: Vec<String> = seeds
            .into_iter()
            .filter_map(|seed| match Url::parse(&seed) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    log::warn!("Skipping invalid seed {}: {}", seed, e);
                    None
                }
            })
            .filter(|url| visited.insert(url.clone()))
            .collect();

        log::info!(
            "Starting crawl with handler '{}' from {} seed(s)",
            self.handler.name(),
            level.len()
        );
        log::info!(
            "Max depth: {}, Max pages: {}",
            self.config.max_depth,
            self.config.max_pages
        );

        let mut depth = 0usize;
        while !level.is_empty() && attempted < self.config.max_pages {
            let budget = self.config.max_pages - attempted;
            let batch: Vec<String> = level.into_iter().take(budget).collect();
            attempted += batch.len();
            log::info!("Crawling {} page(s) at depth {}", batch.len(), depth);

            let results: Vec<(String, Result<(u16, HandlerOutput)>)> = stream::iter(batch)
                .map(|url| async move {
                    let output = self.visit(&url).await;
                    (url, output)
                })
                .buffered(self.config.concurrency.max(1))
                .collect()
                .await;

            let mut next = Vec::new();
            for (url, result) in results {
                match result {
                    Ok((status_code, output)) => {
                        let resolved = resolve_frontier(&url, output.next_urls());
                        if depth < self.config.max_depth {
                            next.extend(
                                resolved
                                    .iter()
                                    .filter(|link| visited.insert((*link).clone()))
                                    .cloned(),
                            );
                        }
                        reports.push(PageReport {
                            terminal: output.is_terminal(),
                            url,
                            depth,
                            status_code,
                            emitted: output.emitted,
                            next_urls: resolved,
                        });
                    }
                    Err(e) => log::error!("Failed to crawl {}: {}", url, e),
                }
            }

            level = next;
            depth += 1;

            if !level.is_empty() && attempted < self.config.max_pages {
                log::debug!("Waiting {:?} before next round", self.config.delay);
                tokio::time::sleep(self.config.delay).await;
            }
        }

        reports
    }

    async fn visit(&self, url: &str) -> Result<(u16, HandlerOutput)> {
        log::debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                HandlerError::Timeout(self.config.timeout.as_secs())
            } else {
                HandlerError::Http(e)
            }
        })?;

        let status_code = response.status().as_u16();
        if !response.status().is_success() {
            log::warn!("Non-success status code {} for {}", status_code, url);
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await?;
        let mut page = FetchedPage::new(body.to_vec(), url).with_status(status_code);
        if let Some(content_type) = content_type {
            page = page.with_content_type(content_type);
        }
        let handler = Arc::clone(&self.handler);

        // The handler may block on its own lookups.
        let output = tokio::task::spawn_blocking(move || handler.handle(&page))
            .await
            .map_err(|e| HandlerError::TaskFailed(e.to_string()))??;

        Ok((status_code, output))
    }
}

/// Resolves a handler's frontier against the page it came from.
///
/// Entries that do not resolve to an http(s) URL are dropped; fragments are
/// stripped so `#top` links do not refetch the page.
pub fn resolve_frontier(base: &str, urls: &[String]) -> Vec<String> {
    let Ok(base) = Url::parse(base) else {
        log::debug!("Cannot resolve frontier against {}", base);
        return Vec::new();
    };

    urls.iter()
        .filter_map(|href| match base.join(href.trim()) {
            Ok(mut url) if matches!(url.scheme(), "http" | "https") => {
                url.set_fragment(None);
                Some(url.to_string())
            }
            Ok(url) => {
                log::debug!("Dropping non-http link {}", url);
                None
            }
            Err(e) => {
                log::debug!("Dropping unresolvable link {}: {}", href, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_frontier_relative_and_absolute() {
        let resolved = resolve_frontier(
            "http://example.com/dir/page.html",
            &strings(&["other.html", "/root", "https://x.test/a#frag", " spaced.html "]),
        );
        assert_eq!(
            resolved,
            vec![
                "http://example.com/dir/other.html",
                "http://example.com/root",
                "https://x.test/a",
                "http://example.com/dir/spaced.html",
            ]
        );
    }

    #[test]
    fn test_resolve_frontier_drops_non_http() {
        let resolved = resolve_frontier(
            "http://example.com/",
            &strings(&["mailto:a@b.c", "javascript:void(0)", "ftp://f/"]),
        );
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolve_frontier_bad_base() {
        assert!(resolve_frontier("not a url", &strings(&["/a"])).is_empty());
    }

    #[tokio::test]
    async fn test_crawl_skips_invalid_seeds_without_fetching() {
        let host = Host::new(
            Arc::new(crate::handlers::RawOutput),
            CrawlConfig::default(),
        )
        .unwrap();
        let reports = host.crawl(strings(&["not a url", ""])).await;
        assert!(reports.is_empty());
    }
}
