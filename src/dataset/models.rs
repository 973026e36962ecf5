// Data models for posts flowing through the engine.
//
// RawPost is what the loader hands over: counters may be missing. Post is a
// validated record with its derived engagement. Dataset is the ranked
// collection plus the records that were rejected on the way in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RowError;

/// One input record before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    /// Zero-based position in the input file
    pub row: usize,
    pub text: String,
    pub favorite_count: Option<f64>,
    pub view_count: Option<f64>,
    /// Any other columns, passed through unmodified
    #[serde(default)]
    pub extra: BTreeMap<String, Value>,
}

impl RawPost {
    /// Convenience constructor for a record with both counters present.
    pub fn new(row: usize, text: impl Into<String>, favorite_count: f64, view_count: f64) -> Self {
        Self {
            row,
            text: text.into(),
            favorite_count: Some(favorite_count),
            view_count: Some(view_count),
            extra: BTreeMap::new(),
        }
    }
}

/// Field names `Post` serializes itself. A pass-through column with one of
/// these names would shadow the real field in JSON output.
pub const RESERVED_FIELDS: [&str; 5] =
    ["row", "text", "favorite_count", "view_count", "engagement"];

/// A validated post with its derived engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub row: usize,
    pub text: String,
    pub favorite_count: f64,
    pub view_count: f64,
    /// favorite_count / view_count; None when view_count is zero
    pub engagement: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A record dropped during engagement computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub row: usize,
    pub error: RowError,
}

/// Posts ranked by engagement, highest first.
///
/// Posts with undefined engagement sit at the end in their input order.
/// Rejected records are kept so callers can report them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub posts: Vec<Post>,
    pub rejected: Vec<RejectedRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// The `n` most engaging posts (fewer if the dataset is smaller).
    pub fn top(&self, n: usize) -> &[Post] {
        &self.posts[..n.min(self.posts.len())]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    /// The top `n` posts plus every rejected record, for JSON output.
    pub fn top_view(&self, n: usize) -> TopPosts<'_> {
        TopPosts {
            total: self.posts.len(),
            posts: self.top(n),
            rejected: &self.rejected,
        }
    }

    /// Number of posts whose engagement is defined.
    pub fn with_engagement(&self) -> usize {
        self.posts.iter().filter(|p| p.engagement.is_some()).count()
    }

    /// Number of posts with zero views (engagement undefined).
    pub fn missing_engagement(&self) -> usize {
        self.posts.len() - self.with_engagement()
    }
}

/// The head of a ranked dataset.
#[derive(Debug, Clone, Serialize)]
pub struct TopPosts<'a> {
    /// Number of posts in the whole dataset
    pub total: usize,
    pub posts: &'a [Post],
    pub rejected: &'a [RejectedRecord],
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}
