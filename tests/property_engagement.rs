// Property tests for ranking, partitioning, and FDR correction.

use proptest::prelude::*;

use resonance::compute_engagement;
use resonance::dataset::models::RawPost;
use resonance::engagement::calculator::rerank;
use resonance::engagement::keywords::partition;
use resonance::stats::fdr::correct;

fn raw_posts() -> impl Strategy<Value = Vec<RawPost>> {
    let words = prop::sample::select(vec!["rust", "go", "launch", "bug", "day", "RUST"]);
    let text = prop::collection::vec(words, 0..4).prop_map(|w| w.join(" "));
    let post = (text, 0u32..50, 0u32..50);
    prop::collection::vec(post, 0..40).prop_map(|posts| {
        posts
            .into_iter()
            .enumerate()
            .map(|(row, (text, fav, views))| RawPost::new(row, text, fav as f64, views as f64))
            .collect()
    })
}

proptest! {
    #[test]
    fn ranking_is_descending_and_stable(posts in raw_posts()) {
        let dataset = compute_engagement(posts);
        for pair in dataset.posts.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            match (a.engagement, b.engagement) {
                (Some(x), Some(y)) => {
                    prop_assert!(x >= y);
                    if x == y {
                        prop_assert!(a.row < b.row);
                    }
                }
                (None, None) => prop_assert!(a.row < b.row),
                (Some(_), None) => {}
                (None, Some(_)) => prop_assert!(false, "undefined engagement ranked above defined"),
            }
        }
    }

    #[test]
    fn ranking_is_idempotent(posts in raw_posts()) {
        let dataset = compute_engagement(posts);
        prop_assert_eq!(rerank(dataset.posts.clone()), dataset.posts);
    }

    #[test]
    fn engagement_is_undefined_exactly_at_zero_views(posts in raw_posts()) {
        let dataset = compute_engagement(posts);
        for post in dataset.iter() {
            prop_assert_eq!(post.engagement.is_none(), post.view_count == 0.0);
        }
    }

    #[test]
    fn partition_covers_every_post(
        posts in raw_posts(),
        keyword in prop::sample::select(vec!["rust", "go", "bug", "la", "zzz"]),
    ) {
        let dataset = compute_engagement(posts);
        let split = partition(&dataset.posts, keyword).unwrap();
        prop_assert_eq!(split.with_keyword.len() + split.without_keyword.len(), dataset.len());
        prop_assert_eq!(
            split.engagement_true().len() + split.engagement_false().len(),
            dataset.with_engagement()
        );
        for post in &split.with_keyword {
            prop_assert!(post.text.to_lowercase().contains(keyword));
        }
        for post in &split.without_keyword {
            prop_assert!(!post.text.to_lowercase().contains(keyword));
        }
    }

    #[test]
    fn bh_is_bounded_and_monotone(raw in prop::collection::vec(0.0f64..=1.0, 0..50)) {
        let corrected = correct(&raw);
        prop_assert_eq!(corrected.len(), raw.len());

        for (&c, &p) in corrected.iter().zip(&raw) {
            prop_assert!(c <= 1.0);
            // Scaling by n / rank can round an ulp below the raw value
            prop_assert!(c + 1e-12 >= p);
        }

        let mut order: Vec<usize> = (0..raw.len()).collect();
        order.sort_by(|&a, &b| raw[a].total_cmp(&raw[b]));
        for pair in order.windows(2) {
            prop_assert!(corrected[pair[0]] <= corrected[pair[1]]);
        }
    }

    #[test]
    fn bh_ignores_input_order(raw in prop::collection::vec(0.0f64..=1.0, 1..30)) {
        let corrected = correct(&raw);
        let reversed: Vec<f64> = raw.iter().rev().copied().collect();
        let mut back = correct(&reversed);
        back.reverse();
        prop_assert_eq!(corrected, back);
    }
}
