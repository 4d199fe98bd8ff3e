use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use watchexchange_scraper::config::Config;
use watchexchange_scraper::parser::TitleParser;
use watchexchange_scraper::pipeline::{run_once, RunSummary};
use watchexchange_scraper::reddit::RedditClient;

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    if let Err(e) = init_tracing() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Fatal error: {e:#}");
            std::process::exit(1);
        }
    };

    let result = run(&config).await;
    if let Err(e) = &result {
        error!("Fatal error: {e:#}");
    }

    // The next run is started by an external scheduler.
    info!(
        idle_secs = config.idle_interval.as_secs(),
        "Idling before exit"
    );
    tokio::time::sleep(config.idle_interval).await;

    if result.is_err() {
        std::process::exit(1);
    }
}

fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn run(config: &Config) -> Result<RunSummary> {
    info!(
        subreddit = %config.subreddit,
        limit = config.fetch_limit,
        "Starting watchexchange-scraper"
    );

    let reddit = RedditClient::new(config).context("Failed to build Reddit client")?;
    run_once(config, &reddit, &TitleParser::default()).await
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,watchexchange_scraper=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
