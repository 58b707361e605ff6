use std::error::Error;
use std::time::Duration;

use clap::Parser;
use dotenv::dotenv;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hacktoberfest_issues_lib::{
    Args, IssueSearcher, LanguageRegistry, SearchConfig, SearchResultSet,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays usable for --json
    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenv().ok();

    let mut config = SearchConfig::from_env()?;
    if let Some(path) = &args.languages_file {
        config = config.with_languages(LanguageRegistry::from_file(path)?);
    }

    if args.list_languages {
        for language in config.languages.all_languages() {
            println!("{}", language);
        }
        return Ok(());
    }

    if let Some(url) = &args.api_url {
        config = config.with_api_base_url(url.as_str());
    }
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if args.all_time {
        config = config.with_recency_filter(false);
    }

    let searcher = IssueSearcher::new(config)?;
    let filters = args.filters();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(format!("Searching GitHub issues (page {})", filters.page));

    let outcome = if args.validate {
        searcher.search_validated(&filters).await
    } else {
        searcher.search(&filters).await
    };
    pb.finish_and_clear();

    let results = match outcome {
        Ok(results) => results,
        Err(e) => {
            error!("Search failed: {}", e);
            return Err(e.into());
        }
    };
    info!("Search returned {} issues", results.total_count);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_listing(&results);
    }
    Ok(())
}

fn print_listing(results: &SearchResultSet) {
    if results.is_empty() {
        println!("No matching issues found. Try fewer filters or another language.");
        return;
    }

    println!(
        "{} issues ({} reported by GitHub)\n",
        results.total_count, results.provider_total
    );
    for issue in &results.items {
        println!("{}", issue.title);
        println!("  {}  {}", issue.repository_name, issue.issue_url);
        if let Some(updated) = issue.updated_at {
            println!("  updated {}", updated.format("%Y-%m-%d"));
        }
        if !issue.labels.is_empty() {
            println!("  labels: {}", issue.labels.join(", "));
        }
        println!("  {}\n", issue.body_excerpt.replace('\n', " "));
    }
}
