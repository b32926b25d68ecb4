use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crawl_handlers::registry::{self, PAGE_HANDLERS, SEED_GENERATORS};
use crawl_handlers::{output, CrawlConfig, Fetcher, HandlerError, Host, HttpFetcher};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "crawl-handlers")]
#[command(about = "Run page handlers over a crawl", long_about = None)]
struct Args {
    /// Start URLs, or search terms when --seeds is given
    #[arg(required = true)]
    args: Vec<String>,

    /// Page handler: source, xmlsource, meta, title, google, wikipedia, validator;
    /// comma-separate names (title,meta) to run several on each page
    #[arg(long, default_value = "title")]
    handler: String,

    /// Seed generator turning the arguments into start URLs: google, wikipedia
    #[arg(long)]
    seeds: Option<String>,

    /// Output format: text, json, or csv
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Request timeout in seconds
    #[arg(short, long, default_value = "30")]
    timeout: u64,

    /// Custom user agent
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long)]
    quiet: bool,

    /// Delay between crawl rounds in milliseconds
    #[arg(short, long, default_value = "1000")]
    delay: u64,

    /// Maximum crawl depth
    #[arg(long, default_value = "2")]
    max_depth: usize,

    /// Maximum number of pages to crawl
    #[arg(long, default_value = "10")]
    max_pages: usize,

    /// Pages handled at once
    #[arg(long, default_value = "4")]
    concurrency: usize,

    /// Markup validator endpoint used by the validator handler
    #[arg(long, default_value = crawl_handlers::config::DEFAULT_VALIDATOR_ENDPOINT)]
    validator_endpoint: String,

    /// Save output to file
    #[arg(short, long)]
    output: Option<String>,
}

impl Args {
    fn config(&self) -> CrawlConfig {
        let mut config = CrawlConfig::default()
            .with_timeout(Duration::from_secs(self.timeout))
            .with_delay(Duration::from_millis(self.delay))
            .with_limits(self.max_depth, self.max_pages)
            .with_concurrency(self.concurrency)
            .with_validator_endpoint(self.validator_endpoint.clone());
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .filter_module("html5ever", log::LevelFilter::Warn)
        .filter_module("selectors", log::LevelFilter::Warn)
        .init();

    log::info!("crawl-handlers v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Page handlers: {}", PAGE_HANDLERS.join(", "));
    log::debug!("Seed generators: {}", SEED_GENERATORS.join(", "));

    let config = args.config();

    let seeds = match &args.seeds {
        Some(name) => {
            let generator = registry::seed_generator(name)?;
            let seeds = generator.seeds(&args.args);
            log::info!("Generated {} seed URL(s) with '{}'", seeds.len(), generator.name());
            seeds
        }
        None => {
            for url in &args.args {
                if let Err(e) = Url::parse(url) {
                    return Err(HandlerError::InvalidUrl(format!("{}: {}", url, e)).into());
                }
            }
            args.args.clone()
        }
    };

    // The blocking client behind the fetcher has to be dropped outside the
    // async runtime, so both it and the handler are owned out here.
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config)?);
    let handler = registry::page_handler(&args.handler, &config, Arc::clone(&fetcher))?;

    let runtime = tokio::runtime::Runtime::new()?;
    let reports = runtime.block_on(async {
        let host = Host::new(Arc::clone(&handler), config)?;
        Ok::<_, HandlerError>(host.crawl(seeds).await)
    })?;
    drop(runtime);

    let output_str = output::render(&reports, &args.format)?;

    // Write to file or stdout
    if let Some(output_file) = &args.output {
        std::fs::write(output_file, &output_str)?;
        log::info!("Output saved to: {}", output_file);
    } else if !args.quiet {
        print!("{}", output_str);
    }

    log::info!("Handled {} page(s)", reports.len());
    Ok(())
}
