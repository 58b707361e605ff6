use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::normalize::{ResultNormalizer, SearchResultSet};
use crate::query::{clamp_page, clamp_per_page, QueryBuilder, SearchFilters, SearchQuery};

/// Runs issue searches against the GitHub REST API.
///
/// Each call performs exactly one request. Failures are returned as
/// [`SearchError`] without retrying.
pub struct IssueSearcher {
    client: Client,
    config: SearchConfig,
}

impl IssueSearcher {
    /// Create a new IssueSearcher from validated settings
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.check()?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(IssueSearcher { client, config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Build the query for `filters` and run it
    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchResultSet> {
        let query = QueryBuilder::build(filters);
        self.execute(&query, filters.page, filters.per_page).await
    }

    /// Like [`IssueSearcher::search`], rejecting languages outside the registry first
    pub async fn search_validated(&self, filters: &SearchFilters) -> Result<SearchResultSet> {
        self.config.languages.validate(filters)?;
        self.search(filters).await
    }

    /// Send an already built query and normalize the response.
    ///
    /// `page` is raised to at least 1 and `per_page` is clamped to
    /// `1..=MAX_PER_PAGE` before the request goes out.
    pub async fn execute(
        &self,
        query: &SearchQuery,
        page: u32,
        per_page: u32,
    ) -> Result<SearchResultSet> {
        let page = clamp_page(page);
        let per_page = clamp_per_page(per_page);
        let url = format!(
            "{}/search/issues?q={}&page={}&per_page={}",
            self.config.api_base_url, query, page, per_page
        );

        debug!("Requesting URL: {}", url);
        let mut request = self
            .client
            .get(&url)
            .header("Accept", self.config.accept.as_str())
            .header("X-GitHub-Api-Version", self.config.api_version.as_str());
        if let Some(token) = &self.config.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = provider_message(&body).unwrap_or_else(|| {
                format!("GitHub API request failed with status {}", status.as_u16())
            });
            warn!("Search failed with {}: {}", status, message);
            return Err(SearchError::RemoteApi {
                status: status.as_u16(),
                message,
            });
        }

        let json: Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                SearchError::MalformedResponse(format!("body is not JSON: {}", e))
            } else {
                self.classify(e)
            }
        })?;

        let items = json
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                warn!("No 'items' array found in search response");
                SearchError::MalformedResponse("missing 'items' array".to_string())
            })?;
        let provider_total = json
            .get("total_count")
            .and_then(Value::as_u64)
            .unwrap_or(items.len() as u64);

        let result = ResultNormalizer::new(&self.config).normalize(items, provider_total);
        info!(
            "Found {} issues on page {} ({} reported by GitHub)",
            result.total_count, page, provider_total
        );
        Ok(result)
    }

    fn classify(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::Timeout(self.config.timeout)
        } else {
            SearchError::Transport(err)
        }
    }
}

/// `message` field of a GitHub error body, if any
fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
}
