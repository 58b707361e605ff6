use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 20;

/// Filter options supplied by a caller (web form, CLI flags, tool arguments).
///
/// Every field is optional when deserializing; `minComments` and `perPage`
/// are accepted as aliases, and paging values are clamped on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub language: Option<String>,
    pub labels: Vec<String>,
    #[serde(alias = "minComments")]
    pub min_comments: Option<u32>,
    #[serde(deserialize_with = "clamped_page")]
    pub page: u32,
    #[serde(alias = "perPage", deserialize_with = "clamped_per_page")]
    pub per_page: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            language: None,
            labels: Vec::new(),
            min_comments: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl SearchFilters {
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn min_comments(mut self, min: u32) -> Self {
        self.min_comments = Some(min);
        self
    }

    /// Page numbers start at 1; 0 is treated as 1
    pub fn page(mut self, page: u32) -> Self {
        self.page = clamp_page(page);
        self
    }

    /// Clamped to `1..=MAX_PER_PAGE`
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = clamp_per_page(per_page);
        self
    }
}

/// Page number as sent to GitHub, never below 1
pub fn clamp_page(page: u32) -> u32 {
    page.max(1)
}

/// Page size as sent to GitHub, within `1..=MAX_PER_PAGE`
pub fn clamp_per_page(per_page: u32) -> u32 {
    per_page.clamp(1, MAX_PER_PAGE)
}

fn clamped_page<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    u32::deserialize(deserializer).map(clamp_page)
}

fn clamped_per_page<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    u32::deserialize(deserializer).map(clamp_per_page)
}

/// Encoded `q` parameter for the GitHub issue search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SearchQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turns [`SearchFilters`] into a GitHub search query string.
///
/// Every query is anchored to open issues created since January 1st of the
/// current year. Clauses are joined with `+` and each `key:value` colon is
/// sent as `%3A`.
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn build(filters: &SearchFilters) -> SearchQuery {
        Self::build_for_date(filters, Utc::now().date_naive())
    }

    /// Same as [`QueryBuilder::build`] with an explicit "today"
    pub fn build_for_date(filters: &SearchFilters, today: NaiveDate) -> SearchQuery {
        let mut clauses = vec![
            clause("state", "open"),
            clause("type", "issue"),
            clause("created", &format!(">{}", start_of_year(today).format("%Y-%m-%d"))),
        ];

        if let Some(language) = filters.language.as_deref() {
            clauses.push(clause("language", &encode_language(language)));
        }

        if !filters.labels.is_empty() {
            let labels = filters
                .labels
                .iter()
                .map(|label| encode_label(label))
                .collect::<Vec<_>>()
                .join(",");
            clauses.push(clause("label", &labels));
        }

        if let Some(min) = filters.min_comments {
            clauses.push(clause("comments", &format!(">={}", min)));
        }

        SearchQuery(clauses.join("+"))
    }
}

fn clause(key: &str, value: &str) -> String {
    format!("{}%3A{}", key, value)
}

fn start_of_year(today: NaiveDate) -> NaiveDate {
    // January 1st exists in every year chrono can represent
    today.with_ordinal(1).unwrap_or(today)
}

/// Percent-encode characters that would otherwise change the meaning of
/// the URL (`%`, `#`, `&`) or of the query (`+`)
fn escape_reserved(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('#', "%23")
        .replace('&', "%26")
        .replace('+', "%2B")
}

fn encode_language(language: &str) -> String {
    escape_reserved(language).to_lowercase()
}

fn encode_label(label: &str) -> String {
    let label = escape_reserved(&label.to_lowercase());
    if label.contains(' ') {
        format!("\"{}\"", label)
    } else {
        label
    }
}
