//! The blocking fetch capability handlers may use for side lookups.

use std::time::Duration;

use crate::config::CrawlConfig;
use crate::error::{HandlerError, Result};

/// Synchronous GET returning the response body as text.
pub trait Fetcher: Send + Sync {
    fn get(&self, url: &str) -> Result<String>;
}

/// [`Fetcher`] backed by a blocking reqwest client with a bounded timeout.
///
/// Must not be called from inside an async runtime thread; the host runs
/// handlers on the blocking pool.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<String> {
        log::debug!("Fetching: {}", url);

        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                HandlerError::Timeout(self.timeout.as_secs())
            } else {
                HandlerError::Http(e)
            }
        })?;

        if !response.status().is_success() {
            log::warn!("Non-success status code {} from {}", response.status(), url);
        }

        Ok(response.text()?)
    }
}
