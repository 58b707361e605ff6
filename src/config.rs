use std::env;
use std::time::Duration;

use tracing::warn;

use crate::error::{Result, SearchError};
use crate::languages::LanguageRegistry;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_WEB_BASE_URL: &str = "https://github.com";
pub const DEFAULT_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_ACCEPT: &str = "application/vnd.github+json";
pub const DEFAULT_USER_AGENT: &str = "hacktoberfest-issues";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_BODY_EXCERPT_LEN: usize = 200;

/// Settings for the issue search core, built once at startup.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// REST API root, without a trailing slash
    pub api_base_url: String,
    /// Public web root used to build repository links
    pub web_base_url: String,
    pub api_version: String,
    pub accept: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Bearer token; requests are anonymous without one
    pub token: Option<String>,
    /// Maximum length of a body excerpt, in characters
    pub body_excerpt_len: usize,
    /// Keep only issues updated during the current year
    pub recency_filter: bool,
    pub languages: LanguageRegistry,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            web_base_url: DEFAULT_WEB_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            token: None,
            body_excerpt_len: DEFAULT_BODY_EXCERPT_LEN,
            recency_filter: true,
            languages: LanguageRegistry::default(),
        }
    }
}

impl SearchConfig {
    /// Defaults overridden by `GITHUB_API_URL`, `GITHUB_TOKEN`,
    /// `SEARCH_TIMEOUT_SECS` and `SEARCH_RECENT_ONLY`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("GITHUB_API_URL") {
            if !url.trim().is_empty() {
                config = config.with_api_base_url(url.trim());
            }
        }

        config.token = match env::var("GITHUB_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Some(token.trim().to_string()),
            _ => {
                warn!("GITHUB_TOKEN not set; searching anonymously with a lower rate limit");
                None
            }
        };

        if let Ok(secs) = env::var("SEARCH_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                SearchError::InvalidConfig(format!("SEARCH_TIMEOUT_SECS is not a number: '{}'", secs))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        if let Ok(flag) = env::var("SEARCH_RECENT_ONLY") {
            config.recency_filter = parse_bool(&flag).ok_or_else(|| {
                SearchError::InvalidConfig(format!("SEARCH_RECENT_ONLY is not a boolean: '{}'", flag))
            })?;
        }

        config.check()?;
        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_web_base_url(mut self, url: impl Into<String>) -> Self {
        self.web_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_body_excerpt_len(mut self, len: usize) -> Self {
        self.body_excerpt_len = len;
        self
    }

    pub fn with_recency_filter(mut self, enabled: bool) -> Self {
        self.recency_filter = enabled;
        self
    }

    pub fn with_languages(mut self, languages: LanguageRegistry) -> Self {
        self.languages = languages;
        self
    }

    /// Prefix stripped from `repository_url` to get `owner/repo`
    pub fn repository_api_prefix(&self) -> String {
        format!("{}/repos/", self.api_base_url)
    }

    /// Sanity checks run before a client is built
    pub fn check(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(SearchError::InvalidConfig("timeout must be positive".into()));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(SearchError::InvalidConfig(format!(
                "API base URL must be http(s): '{}'",
                self.api_base_url
            )));
        }
        if self.body_excerpt_len < 4 {
            return Err(SearchError::InvalidConfig(
                "body excerpt length must be at least 4 characters".into(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
