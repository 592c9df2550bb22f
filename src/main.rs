// Listing extraction CLI
//
// Reads listing URLs from the command line (or a JSON array on stdin),
// renders them through the remote browser named by BROWSERLESS_URL, and
// prints the extracted records as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use std::io::Read;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use kodegen_tools_listingscrape::{ChromiumBackend, ScrapeConfig, scrape_batch, scrape_single};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ScrapeConfig::from_env().context("Failed to load configuration")?;
    let urls = read_urls()?;
    let backend = ChromiumBackend::new();

    let output = if urls.len() == 1 {
        let url = urls.into_iter().next().unwrap_or_default();
        scrape_single(&backend, &config, url)
            .await
            .map(|record| serde_json::to_string_pretty(&record))
    } else {
        scrape_batch(&backend, &config, urls)
            .await
            .map(|response| serde_json::to_string_pretty(&response))
    };

    match output {
        Ok(json) => {
            println!("{}", json.context("Failed to serialize output")?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("{e}");
            println!("{}", serde_json::to_string(&e.to_response())?);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// URLs from argv, or a JSON array of strings on stdin when argv is empty
fn read_urls() -> Result<Vec<String>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return Ok(args);
    }

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read urls from stdin")?;
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&input).context("stdin must be a JSON array of url strings")
}
