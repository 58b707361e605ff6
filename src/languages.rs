use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SearchError};
use crate::query::SearchFilters;

const BUILTIN_LANGUAGES: &str = include_str!("../data/languages.txt");

/// Read-only list of language names accepted as a search filter.
///
/// Built once at startup and shared by reference; lookups are exact and
/// case-sensitive.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    names: Vec<String>,
    index: HashSet<String>,
}

impl LanguageRegistry {
    /// Build a registry from names, dropping duplicates but keeping first-seen order
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = HashSet::new();
        let mut ordered = Vec::new();
        for name in names {
            let name = name.into();
            if index.insert(name.clone()) {
                ordered.push(name);
            }
        }
        Self {
            names: ordered,
            index,
        }
    }

    /// Parse a newline separated list. Blank lines and `#` comments are ignored.
    pub fn parse(contents: &str) -> Self {
        Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load a replacement list from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SearchError::InvalidConfig(format!(
                "cannot read language list '{}': {}",
                path.display(),
                e
            ))
        })?;
        let registry = Self::parse(&contents);
        if registry.is_empty() {
            return Err(SearchError::InvalidConfig(format!(
                "language list '{}' is empty",
                path.display()
            )));
        }
        debug!("Loaded {} languages from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn all_languages(&self) -> &[String] {
        &self.names
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Reject filters naming a language outside the registry
    pub fn validate(&self, filters: &SearchFilters) -> Result<()> {
        match filters.language.as_deref() {
            Some(language) if !self.is_valid(language) => Err(SearchError::Validation {
                language: language.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::parse(BUILTIN_LANGUAGES)
    }
}
