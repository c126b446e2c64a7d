//! Query value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A research query submitted by a client (Value Object)
///
/// Always non-empty once constructed; surrounding whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query {
    content: String,
}

impl Query {
    /// Try to create a new query, rejecting empty or whitespace-only input
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyQuery);
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Query {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Query::try_new(value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims_content() {
        let q = Query::try_new("  What is quantum computing?  ").unwrap();
        assert_eq!(q.content(), "What is quantum computing?");
        assert_eq!(q.word_count(), 4);
    }

    #[test]
    fn test_empty_query_rejected() {
        assert_eq!(Query::try_new(""), Err(DomainError::EmptyQuery));
        assert_eq!(Query::try_new(" \n\t"), Err(DomainError::EmptyQuery));
    }

    #[test]
    fn test_query_deserialize_validates() {
        let q: Query = serde_json::from_str("\"Latest AI safety developments\"").unwrap();
        assert_eq!(q.to_string(), "Latest AI safety developments");
        assert!(serde_json::from_str::<Query>("\"   \"").is_err());
    }
}
