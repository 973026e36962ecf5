// Keyword result rows and report assembly.
//
// Every requested keyword yields one row, in query order. A row either
// carries a corrected p-value or an error explaining why it has none.

use serde::{Deserialize, Serialize};

use crate::error::RowError;
use crate::stats::welch::WelchTest;

/// Per-keyword outcome before the batch-level correction.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordComparison {
    pub keyword: String,
    pub engagement_true: Option<f64>,
    pub engagement_false: Option<f64>,
    pub count_true: usize,
    pub count_false: usize,
    pub test: Option<WelchTest>,
    pub error: Option<RowError>,
}

impl KeywordComparison {
    /// A keyword that failed before any group could be formed.
    pub fn failed(keyword: &str, error: RowError) -> Self {
        Self {
            keyword: keyword.to_string(),
            engagement_true: None,
            engagement_false: None,
            count_true: 0,
            count_false: 0,
            test: None,
            error: Some(error),
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordResult {
    pub keyword: String,
    /// Mean engagement of posts containing the keyword
    pub engagement_true: Option<f64>,
    /// Mean engagement of posts not containing it
    pub engagement_false: Option<f64>,
    pub count_true: usize,
    pub count_false: usize,
    pub t_statistic: Option<f64>,
    pub raw_pvalue: Option<f64>,
    /// Benjamini–Hochberg adjusted across the query
    pub corrected_pvalue: Option<f64>,
    pub error: Option<RowError>,
}

impl KeywordResult {
    /// Whether the corrected p-value is at or below `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.corrected_pvalue.is_some_and(|p| p <= alpha)
    }

    /// Difference in mean engagement, keyword minus rest.
    pub fn lift(&self) -> Option<f64> {
        Some(self.engagement_true? - self.engagement_false?)
    }
}

/// The full answer to a keyword query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    pub results: Vec<KeywordResult>,
    /// Number of keywords included in the FDR correction
    pub tested: usize,
    pub posts_with_engagement: usize,
    pub posts_missing_engagement: usize,
}

impl KeywordReport {
    /// Rows whose corrected p-value is at or below `alpha`, in query order.
    pub fn significant(&self, alpha: f64) -> Vec<&KeywordResult> {
        self.results.iter().filter(|r| r.is_significant(alpha)).collect()
    }

    /// Rows that carry an error, in query order.
    pub fn failed(&self) -> Vec<&KeywordResult> {
        self.results.iter().filter(|r| r.error.is_some()).collect()
    }
}

/// Zip per-keyword comparisons with their corrected p-values.
///
/// `corrected` is aligned with `comparisons`; `None` marks a keyword that was
/// left out of the correction.
pub fn assemble(
    comparisons: Vec<KeywordComparison>,
    corrected: &[Option<f64>],
) -> Vec<KeywordResult> {
    debug_assert_eq!(comparisons.len(), corrected.len());

    comparisons
        .into_iter()
        .zip(corrected.iter().copied())
        .map(|(c, corrected_pvalue)| KeywordResult {
            keyword: c.keyword,
            engagement_true: c.engagement_true,
            engagement_false: c.engagement_false,
            count_true: c.count_true,
            count_false: c.count_false,
            t_statistic: c.test.map(|t| t.statistic).filter(|t| t.is_finite()),
            raw_pvalue: c.test.map(|t| t.pvalue),
            corrected_pvalue,
            error: c.error,
        })
        .collect()
}
