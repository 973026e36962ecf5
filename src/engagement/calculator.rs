// Engagement calculator: favorites per view, and the ranked view of a dataset.
//
// A post with zero views has no defined engagement. It stays in the dataset
// (sorted after every defined value) but never contributes to a mean or a
// variance downstream.

use std::cmp::Ordering;

use tracing::{info, warn};

use std::collections::BTreeMap;

use serde_json::Value;

use crate::dataset::models::{Dataset, Post, RawPost, RejectedRecord, RESERVED_FIELDS};
use crate::error::{EngineError, Result};

/// Engagement of a single post: `favorites / views`.
///
/// Returns `DivisionUndefined` when `views` is zero.
pub fn engagement_ratio(favorites: f64, views: f64) -> Result<f64> {
    if views == 0.0 {
        return Err(EngineError::DivisionUndefined);
    }
    Ok(favorites / views)
}

/// Validate raw rows, derive engagement, and rank the result.
///
/// Rows missing a counter, carrying a negative or non-finite one, or whose
/// ratio overflows are dropped and listed in `Dataset::rejected`; the rest of
/// the batch is unaffected. Pass-through columns named like a `Post` field
/// are discarded so the derived values win.
pub fn compute_engagement(rows: Vec<RawPost>) -> Dataset {
    let mut posts = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for raw in rows {
        match validate(&raw) {
            Ok((favorite_count, view_count)) => posts.push(Post {
                row: raw.row,
                text: raw.text,
                favorite_count,
                view_count,
                engagement: None,
                extra: without_reserved(raw.extra),
            }),
            Err(e) => {
                warn!(row = raw.row, error = %e, "Dropping malformed record");
                rejected.push(RejectedRecord {
                    row: raw.row,
                    error: (&e).into(),
                });
            }
        }
    }

    let posts = rerank(posts);

    info!(
        posts = posts.len(),
        rejected = rejected.len(),
        undefined = posts.iter().filter(|p| p.engagement.is_none()).count(),
        "Computed engagement"
    );

    Dataset { posts, rejected }
}

/// Recompute engagement on already-validated posts and sort them.
///
/// Any existing engagement value is overwritten, so calling this twice gives
/// the same result as calling it once.
pub fn rerank(mut posts: Vec<Post>) -> Vec<Post> {
    for post in &mut posts {
        post.engagement = engagement_ratio(post.favorite_count, post.view_count).ok();
        post.extra.retain(|key, _| !RESERVED_FIELDS.contains(&key.as_str()));
    }
    // sort_by is stable: equal engagements keep their input order
    posts.sort_by(|a, b| compare_engagement_desc(a.engagement, b.engagement));
    posts
}

/// Descending order with undefined values last.
fn compare_engagement_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn validate(raw: &RawPost) -> Result<(f64, f64)> {
    let favorites = check_counter(raw.row, "favorite_count", raw.favorite_count)?;
    let views = check_counter(raw.row, "view_count", raw.view_count)?;
    if views > 0.0 && !(favorites / views).is_finite() {
        return Err(EngineError::malformed(
            raw.row,
            "engagement",
            "favorites per view overflows",
        ));
    }
    Ok((favorites, views))
}

fn without_reserved(mut extra: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    extra.retain(|key, _| !RESERVED_FIELDS.contains(&key.as_str()));
    extra
}

fn check_counter(row: usize, field: &str, value: Option<f64>) -> Result<f64> {
    match value {
        None => Err(EngineError::malformed(row, field, "missing")),
        Some(v) if !v.is_finite() => Err(EngineError::malformed(row, field, "not finite")),
        Some(v) if v < 0.0 => Err(EngineError::malformed(row, field, "negative")),
        // Normalize -0.0 so it can't sort apart from 0.0
        Some(v) => Ok(v + 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_zero_views_is_undefined() {
        assert!(matches!(
            engagement_ratio(5.0, 0.0),
            Err(EngineError::DivisionUndefined)
        ));
    }

    #[test]
    fn test_ratio_basic() {
        let e = engagement_ratio(5.0, 50.0).unwrap();
        assert!((e - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_sorts_last_in_input_order() {
        let rows = vec![
            RawPost::new(0, "no views a", 3.0, 0.0),
            RawPost::new(1, "low", 1.0, 100.0),
            RawPost::new(2, "no views b", 0.0, 0.0),
            RawPost::new(3, "high", 50.0, 100.0),
        ];
        let dataset = compute_engagement(rows);
        let order: Vec<usize> = dataset.iter().map(|p| p.row).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_missing_counter_is_rejected() {
        let mut raw = RawPost::new(0, "missing views", 3.0, 10.0);
        raw.view_count = None;
        let dataset = compute_engagement(vec![raw, RawPost::new(1, "fine", 1.0, 10.0)]);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.rejected.len(), 1);
        assert_eq!(dataset.rejected[0].row, 0);
    }

    #[test]
    fn test_overflowing_ratio_is_rejected() {
        let dataset = compute_engagement(vec![
            RawPost::new(0, "huge", 1e300, 1e-10),
            RawPost::new(1, "fine", 1.0, 10.0),
        ]);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.rejected[0].row, 0);
        assert!(dataset.iter().all(|p| p.engagement.is_some_and(f64::is_finite)));
    }

    #[test]
    fn test_reserved_pass_through_columns_are_dropped() {
        let mut raw = RawPost::new(0, "hello", 10.0, 100.0);
        raw.extra.insert("engagement".into(), Value::String("0.9".into()));
        raw.extra.insert("row".into(), Value::from(42));
        raw.extra.insert("lang".into(), Value::String("en".into()));
        let dataset = compute_engagement(vec![raw]);

        let post = &dataset.posts[0];
        assert_eq!(post.extra.keys().collect::<Vec<_>>(), ["lang"]);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(post).unwrap()).unwrap();
        assert_eq!(json["engagement"], 0.1);
        assert_eq!(json["row"], 0);
    }

    #[test]
    fn test_negative_counter_is_rejected() {
        let dataset = compute_engagement(vec![RawPost::new(0, "negative", -1.0, 10.0)]);
        assert!(dataset.is_empty());
        assert_eq!(dataset.rejected.len(), 1);
    }
}
