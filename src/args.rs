use std::path::PathBuf;

use clap::Parser;

use crate::query::{SearchFilters, DEFAULT_PER_PAGE, MAX_PER_PAGE};

/// Find open GitHub issues created this year, filtered by language, labels
/// and discussion activity. Handy for picking a Hacktoberfest contribution.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = "Search GitHub for fresh, open issues to contribute to. Results are limited to issues created since January 1st of the current year."
)]
pub struct Args {
    /// Repository language, e.g. "Rust" or "C++".
    #[clap(short, long)]
    pub language: Option<String>,

    /// Issue label to require. Repeat for several labels.
    #[clap(short = 'L', long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Only issues with at least this many comments.
    #[clap(short = 'c', long, value_name = "NUM")]
    pub min_comments: Option<u32>,

    /// Result page to fetch, starting at 1.
    #[clap(short, long, default_value = "1")]
    pub page: u32,

    /// Results per page.
    #[clap(short = 'n', long, default_value_t = DEFAULT_PER_PAGE,
        value_parser = clap::value_parser!(u32).range(1..=MAX_PER_PAGE as i64))]
    pub per_page: u32,

    /// Reject languages that are not in the supported list.
    #[clap(long)]
    pub validate: bool,

    /// Keep issues last updated before this year.
    #[clap(long)]
    pub all_time: bool,

    /// Request timeout in seconds.
    #[clap(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// GitHub REST API root.
    #[clap(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Newline separated list replacing the built-in languages.
    #[clap(long, value_name = "FILE")]
    pub languages_file: Option<PathBuf>,

    /// Print the supported languages and exit.
    #[clap(long)]
    pub list_languages: bool,

    /// Print results as JSON.
    #[clap(long)]
    pub json: bool,

    /// Enable debug logging.
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn filters(&self) -> SearchFilters {
        let mut filters = SearchFilters::default()
            .labels(self.labels.iter().cloned())
            .page(self.page)
            .per_page(self.per_page);
        if let Some(language) = &self.language {
            filters = filters.language(language.clone());
        }
        if let Some(min) = self.min_comments {
            filters = filters.min_comments(min);
        }
        filters
    }
}
