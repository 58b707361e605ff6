//! # Hacktoberfest Issues
//!
//! Finds fresh, open GitHub issues to contribute to. The library builds a
//! GitHub issue search query from a small set of filters, runs it with a
//! single request, and reshapes the response into display-ready records that
//! a web page, a CLI or an AI tool can render directly.
//!
//! ## Main Components
//!
//! - [`QueryBuilder`]: turns [`SearchFilters`] into an encoded [`SearchQuery`]
//! - [`IssueSearcher`]: sends the query and classifies failures as [`SearchError`]
//! - [`ResultNormalizer`]: maps raw items into [`NormalizedIssue`]s
//! - [`LanguageRegistry`]: the supported language names
//!
//! ## Example
//!
//! ```no_run
//! use hacktoberfest_issues_lib::{IssueSearcher, SearchConfig, SearchFilters};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let searcher = IssueSearcher::new(SearchConfig::from_env()?)?;
//!
//!     let filters = SearchFilters::default()
//!         .language("Rust")
//!         .label("good first issue");
//!     let results = searcher.search_validated(&filters).await?;
//!
//!     for issue in &results.items {
//!         println!("{} ({})", issue.title, issue.repository_name);
//!     }
//!     Ok(())
//! }
//! ```

mod args;
mod config;
mod error;
mod issue_searcher;
mod languages;
mod normalize;
mod query;

pub use crate::args::Args;
pub use crate::config::SearchConfig;
pub use crate::error::{Result, SearchError};
pub use crate::issue_searcher::IssueSearcher;
pub use crate::languages::LanguageRegistry;
pub use crate::normalize::{
    NormalizedIssue, ResultNormalizer, SearchResultSet, MISSING_BODY_PLACEHOLDER,
};
pub use crate::query::{QueryBuilder, SearchFilters, SearchQuery, DEFAULT_PER_PAGE, MAX_PER_PAGE};
