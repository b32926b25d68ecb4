use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; crawl-handlers/0.2; +https://validator.w3.org/services)";

pub const DEFAULT_VALIDATOR_ENDPOINT: &str = "http://validator.w3.org/check";

/// Settings shared by the host crawl loop and handlers that reach out to
/// the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    pub timeout: Duration,
    pub user_agent: String,
    /// Pause between crawl rounds.
    pub delay: Duration,
    pub max_depth: usize,
    pub max_pages: usize,
    /// Page invocations allowed in flight at once.
    pub concurrency: usize,
    pub validator_endpoint: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            delay: Duration::from_millis(1000),
            max_depth: 2,
            max_pages: 10,
            concurrency: 4,
            validator_endpoint: DEFAULT_VALIDATOR_ENDPOINT.to_string(),
        }
    }
}

impl CrawlConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_limits(mut self, max_depth: usize, max_pages: usize) -> Self {
        self.max_depth = max_depth;
        self.max_pages = max_pages;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_validator_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.validator_endpoint = endpoint.into();
        self
    }
}
