// Keyword engagement pipeline: partition -> test -> correct -> assemble.
//
// Each keyword only reads the shared, already-ranked dataset, so the
// partition and test steps fan out across rayon's pool. The FDR correction
// is the join point: it runs once every keyword has its raw p-value.

use rayon::prelude::*;
use tracing::{debug, info};

use super::report::{assemble, KeywordComparison, KeywordReport};
use crate::dataset::models::{Dataset, Post};
use crate::engagement::keywords::{partition, KeywordQuery};
use crate::stats::fdr;
use crate::stats::welch::{mean, welch_t_test};

/// Parse `query` and compare engagement with and without each keyword.
///
/// Rows come back in the order the keywords were written, duplicates
/// included.
pub fn compute_keyword_engagement(dataset: &Dataset, query: &str) -> KeywordReport {
    analyze_keywords(dataset, &KeywordQuery::parse(query))
}

/// Run the comparison for an already-parsed query.
pub fn analyze_keywords(dataset: &Dataset, query: &KeywordQuery) -> KeywordReport {
    let comparisons: Vec<KeywordComparison> = query
        .terms()
        .par_iter()
        .map(|keyword| compare_keyword(&dataset.posts, keyword))
        .collect();

    // Only keywords with a raw p-value take part in the correction.
    let (positions, raw): (Vec<usize>, Vec<f64>) = comparisons
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.test.map(|t| (i, t.pvalue)))
        .unzip();
    let adjusted = fdr::correct(&raw);

    let mut corrected = vec![None; comparisons.len()];
    for (&i, &p) in positions.iter().zip(&adjusted) {
        corrected[i] = Some(p);
    }

    let tested = raw.len();
    let results = assemble(comparisons, &corrected);

    info!(
        keywords = results.len(),
        tested,
        failed = results.len() - tested,
        "Keyword engagement analysis complete"
    );

    KeywordReport {
        results,
        tested,
        posts_with_engagement: dataset.with_engagement(),
        posts_missing_engagement: dataset.missing_engagement(),
    }
}

/// Partition on one keyword and run the Welch test, capturing any failure.
pub fn compare_keyword(posts: &[Post], keyword: &str) -> KeywordComparison {
    let split = match partition(posts, keyword) {
        Ok(split) => split,
        Err(e) => {
            debug!(keyword, error = %e, "Keyword rejected");
            return KeywordComparison::failed(keyword, e.into());
        }
    };

    let engagement_true = split.engagement_true();
    let engagement_false = split.engagement_false();

    let mut comparison = KeywordComparison {
        keyword: keyword.to_string(),
        engagement_true: mean(&engagement_true),
        engagement_false: mean(&engagement_false),
        count_true: engagement_true.len(),
        count_false: engagement_false.len(),
        test: None,
        error: None,
    };

    let outcome = split
        .require_samples()
        .and_then(|()| welch_t_test(&engagement_true, &engagement_false));

    match outcome {
        Ok(test) => {
            debug!(
                keyword,
                t = test.statistic,
                df = test.df,
                pvalue = test.pvalue,
                "Compared keyword groups"
            );
            comparison.test = Some(test);
        }
        Err(e) => {
            debug!(keyword, error = %e, "Keyword comparison skipped");
            comparison.error = Some(e.into());
        }
    }

    comparison
}
