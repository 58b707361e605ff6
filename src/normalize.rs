use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::SearchConfig;

pub const MISSING_BODY_PLACEHOLDER: &str = "No description provided.";
const ELLIPSIS: &str = "...";

/// Display-ready view of one issue search hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedIssue {
    pub title: String,
    pub issue_url: String,
    /// `owner/repo`
    pub repository_name: String,
    pub repository_url: String,
    /// `None` when the provider sent no parseable timestamp
    pub updated_at: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
    pub body_excerpt: String,
}

/// Uniform result handed back to every caller.
///
/// `total_count` always equals `items.len()`. The provider's own total is kept
/// separately in `provider_total`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultSet {
    pub total_count: usize,
    pub provider_total: u64,
    pub items: Vec<NormalizedIssue>,
}

impl SearchResultSet {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Reshapes raw `items` from the search API into [`NormalizedIssue`]s.
///
/// `owner/repo` is taken from `repository_url` after the configured
/// `<api_base_url>/repos/` prefix. URLs from any other host still resolve
/// when they contain a `/repos/` segment (GitHub Enterprise, mirrors);
/// anything else yields an empty name and link.
pub struct ResultNormalizer<'a> {
    repo_prefix: String,
    web_base_url: &'a str,
    excerpt_len: usize,
    recency_filter: bool,
}

impl<'a> ResultNormalizer<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self {
            repo_prefix: config.repository_api_prefix(),
            web_base_url: &config.web_base_url,
            excerpt_len: config.body_excerpt_len,
            recency_filter: config.recency_filter,
        }
    }

    pub fn normalize(&self, raw_items: &[Value], provider_total: u64) -> SearchResultSet {
        self.normalize_for_year(raw_items, provider_total, Utc::now().year())
    }

    /// Same as [`ResultNormalizer::normalize`] with an explicit current year
    pub fn normalize_for_year(
        &self,
        raw_items: &[Value],
        provider_total: u64,
        current_year: i32,
    ) -> SearchResultSet {
        let items: Vec<NormalizedIssue> = raw_items
            .iter()
            .map(|item| self.normalize_item(item))
            .filter(|issue| {
                !self.recency_filter
                    || issue
                        .updated_at
                        .is_some_and(|updated| updated.year() == current_year)
            })
            .collect();

        if items.len() < raw_items.len() {
            debug!(
                "Recency filter dropped {} of {} items",
                raw_items.len() - items.len(),
                raw_items.len()
            );
        }

        SearchResultSet {
            total_count: items.len(),
            provider_total,
            items,
        }
    }

    pub fn normalize_item(&self, item: &Value) -> NormalizedIssue {
        let repository_name = self.repository_name(str_field(item, "repository_url"));
        let repository_url = if repository_name.is_empty() {
            String::new()
        } else {
            format!("{}/{}", self.web_base_url, repository_name)
        };

        NormalizedIssue {
            title: str_field(item, "title").to_string(),
            issue_url: str_field(item, "html_url").to_string(),
            repository_name,
            repository_url,
            updated_at: parse_timestamp(str_field(item, "updated_at")),
            labels: label_names(item),
            body_excerpt: excerpt(
                item.get("body").and_then(Value::as_str),
                self.excerpt_len,
            ),
        }
    }

    fn repository_name(&self, repository_url: &str) -> String {
        repository_url
            .strip_prefix(&self.repo_prefix)
            .or_else(|| repository_url.split_once("/repos/").map(|(_, rest)| rest))
            .map(|rest| rest.trim_matches('/').to_string())
            .unwrap_or_default()
    }
}

fn str_field<'v>(item: &'v Value, key: &str) -> &'v str {
    item.get(key).and_then(Value::as_str).unwrap_or("")
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn label_names(item: &Value) -> Vec<String> {
    item.get("labels")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(|label| match label {
                    Value::String(name) => Some(name.clone()),
                    other => other.get("name").and_then(Value::as_str).map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn excerpt(body: Option<&str>, max_chars: usize) -> String {
    let body = match body.map(str::trim) {
        Some(body) if !body.is_empty() => body,
        _ => return MISSING_BODY_PLACEHOLDER.to_string(),
    };

    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return body.chars().take(max_chars).collect();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = body.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
