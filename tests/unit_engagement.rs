// Unit tests for the engagement calculator and keyword partitioner.
//
// Covers the engagement definition, ranking order and stability, the
// rejected-record policy, and keyword query parsing.

use resonance::compute_engagement;
use resonance::dataset::models::RawPost;
use resonance::engagement::calculator::rerank;
use resonance::engagement::keywords::{partition, KeywordQuery};
use resonance::error::ErrorKind;

fn post(row: usize, text: &str, fav: f64, views: f64) -> RawPost {
    RawPost::new(row, text, fav, views)
}

// ============================================================
// Engagement definition
// ============================================================

#[test]
fn engagement_is_favorites_per_view() {
    let dataset = compute_engagement(vec![post(0, "a", 7.0, 140.0), post(1, "b", 3.0, 9.0)]);
    for p in dataset.iter() {
        let expected = p.favorite_count / p.view_count;
        assert!((p.engagement.unwrap() - expected).abs() < 1e-15);
    }
}

#[test]
fn zero_views_leaves_engagement_undefined() {
    let dataset = compute_engagement(vec![post(0, "unseen", 4.0, 0.0)]);
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.posts[0].engagement, None);
    assert_eq!(dataset.missing_engagement(), 1);
    assert!(dataset.rejected.is_empty());
}

#[test]
fn zero_favorites_is_defined_zero() {
    let dataset = compute_engagement(vec![post(0, "ignored", 0.0, 50.0)]);
    assert_eq!(dataset.posts[0].engagement, Some(0.0));
}

// ============================================================
// Ranking
// ============================================================

#[test]
fn ranked_descending() {
    let dataset = compute_engagement(vec![
        post(0, "mid", 5.0, 100.0),
        post(1, "top", 50.0, 100.0),
        post(2, "low", 1.0, 100.0),
    ]);
    let texts: Vec<&str> = dataset.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, ["top", "mid", "low"]);
}

#[test]
fn equal_engagement_keeps_input_order() {
    let dataset = compute_engagement(vec![
        post(0, "first", 10.0, 100.0),
        post(1, "better", 9.0, 10.0),
        post(2, "second", 5.0, 50.0),
        post(3, "third", 20.0, 200.0),
    ]);
    let rows: Vec<usize> = dataset.iter().map(|p| p.row).collect();
    assert_eq!(rows, [1, 0, 2, 3]);
}

#[test]
fn rerank_is_idempotent() {
    let dataset = compute_engagement(vec![
        post(0, "a", 1.0, 3.0),
        post(1, "b", 0.0, 0.0),
        post(2, "c", 2.0, 3.0),
    ]);
    let again = rerank(dataset.posts.clone());
    assert_eq!(again, dataset.posts);
}

#[test]
fn rerank_overwrites_stale_engagement() {
    let mut dataset = compute_engagement(vec![post(0, "a", 1.0, 4.0)]);
    dataset.posts[0].engagement = Some(99.0);
    let fixed = rerank(dataset.posts);
    assert_eq!(fixed[0].engagement, Some(0.25));
}

#[test]
fn top_is_bounded_by_len() {
    let dataset = compute_engagement(vec![post(0, "a", 1.0, 4.0), post(1, "b", 1.0, 2.0)]);
    assert_eq!(dataset.top(10).len(), 2);
    assert_eq!(dataset.top(1)[0].row, 1);
}

// ============================================================
// Malformed records
// ============================================================

#[test]
fn malformed_records_are_dropped_and_reported() {
    let mut missing_fav = post(1, "no favorites column value", 0.0, 10.0);
    missing_fav.favorite_count = None;
    let dataset = compute_engagement(vec![
        post(0, "ok", 1.0, 10.0),
        missing_fav,
        post(2, "nan views", 1.0, f64::NAN),
        post(3, "also ok", 2.0, 10.0),
    ]);
    assert_eq!(dataset.len(), 2);
    let rejected_rows: Vec<usize> = dataset.rejected.iter().map(|r| r.row).collect();
    assert_eq!(rejected_rows, [1, 2]);
    assert!(dataset
        .rejected
        .iter()
        .all(|r| r.error.kind == ErrorKind::MalformedInput));
}

// ============================================================
// Keyword queries and partitions
// ============================================================

#[test]
fn query_preserves_order_and_duplicates() {
    let query = KeywordQuery::parse("Launch, bug ,launch");
    assert_eq!(query.terms(), ["launch", "bug", "launch"]);
    assert_eq!(query.len(), 3);
}

#[test]
fn partitions_are_complementary() {
    let dataset = compute_engagement(vec![
        post(0, "Shipping the launch today", 9.0, 100.0),
        post(1, "bug hunt", 2.0, 100.0),
        post(2, "LAUNCH party", 7.0, 0.0),
        post(3, "quiet day", 1.0, 100.0),
    ]);
    let split = partition(&dataset.posts, "launch").unwrap();
    assert_eq!(split.with_keyword.len() + split.without_keyword.len(), dataset.len());
    assert_eq!(
        split.engagement_true().len() + split.engagement_false().len(),
        dataset.with_engagement()
    );
    assert_eq!(split.with_keyword.len(), 2);
    assert_eq!(split.engagement_true(), vec![0.09]);
}

#[test]
fn keyword_matches_inside_words() {
    let dataset = compute_engagement(vec![post(0, "#RustLang rocks", 1.0, 2.0)]);
    let split = partition(&dataset.posts, "rust").unwrap();
    assert_eq!(split.with_keyword.len(), 1);
}
