// Keyword queries and the contains / does-not-contain split.
//
// A query is a comma-separated list. Each term is trimmed and lowercased;
// matching is a case-insensitive substring test against the post text.

use std::collections::HashSet;

use crate::dataset::models::Post;
use crate::error::{EngineError, Result};
use crate::stats::welch::MIN_SAMPLE_SIZE;

/// Fewest posts with defined engagement a group needs for a variance.
pub const MIN_GROUP_SIZE: usize = MIN_SAMPLE_SIZE;

/// Normalized keyword terms in the order they were supplied.
///
/// Duplicates are kept, and so are terms that are empty after trimming:
/// each term produces exactly one output row, even if that row is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordQuery {
    terms: Vec<String>,
}

impl KeywordQuery {
    pub fn parse(input: &str) -> Self {
        let terms = input
            .split(',')
            .map(|term| term.trim().to_lowercase())
            .collect();
        Self { terms }
    }

    /// Drop repeated terms, keeping the first occurrence of each.
    pub fn deduplicated(self) -> Self {
        let mut seen = HashSet::new();
        let terms = self
            .terms
            .into_iter()
            .filter(|term| seen.insert(term.clone()))
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Check a single normalized term.
pub fn validate_keyword(keyword: &str) -> Result<()> {
    if keyword.trim().is_empty() {
        return Err(EngineError::InvalidKeyword {
            keyword: keyword.to_string(),
            reason: "keyword is empty".to_string(),
        });
    }
    Ok(())
}

/// Posts split by whether their text contains a keyword.
///
/// Both sides hold every matching post, including those with undefined
/// engagement; the `engagement_*` accessors drop the undefined ones.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    pub keyword: String,
    pub with_keyword: Vec<&'a Post>,
    pub without_keyword: Vec<&'a Post>,
}

impl<'a> Partition<'a> {
    pub fn engagement_true(&self) -> Vec<f64> {
        defined(&self.with_keyword)
    }

    pub fn engagement_false(&self) -> Vec<f64> {
        defined(&self.without_keyword)
    }

    /// Fail with `InsufficientSample` unless both sides have at least
    /// `MIN_GROUP_SIZE` posts with defined engagement.
    pub fn require_samples(&self) -> Result<()> {
        let count_true = self.with_keyword.iter().filter(|p| p.engagement.is_some()).count();
        let count_false = self
            .without_keyword
            .iter()
            .filter(|p| p.engagement.is_some())
            .count();
        if count_true < MIN_GROUP_SIZE || count_false < MIN_GROUP_SIZE {
            return Err(EngineError::InsufficientSample {
                keyword: self.keyword.clone(),
                count_true,
                count_false,
                minimum: MIN_GROUP_SIZE,
            });
        }
        Ok(())
    }
}

/// Split `posts` on case-insensitive containment of `keyword`.
pub fn partition<'a>(posts: &'a [Post], keyword: &str) -> Result<Partition<'a>> {
    validate_keyword(keyword)?;
    let needle = keyword.to_lowercase();

    let (with_keyword, without_keyword): (Vec<&Post>, Vec<&Post>) = posts
        .iter()
        .partition(|post| post.text.to_lowercase().contains(&needle));

    Ok(Partition {
        keyword: keyword.to_string(),
        with_keyword,
        without_keyword,
    })
}

fn defined(posts: &[&Post]) -> Vec<f64> {
    posts.iter().filter_map(|p| p.engagement).collect()
}
