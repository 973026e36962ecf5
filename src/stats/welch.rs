// Welch's unequal-variance two-sample t-test.
//
// Degrees of freedom follow the Welch–Satterthwaite approximation. The two
// zero-variance cases are resolved explicitly. Anything that would produce a
// NaN (non-finite input, overflowing variance) is an error instead.

use serde::{Deserialize, Serialize};

use super::distribution::t_two_sided_pvalue;
use crate::error::{EngineError, Result};

/// Fewest values a sample needs for an unbiased variance.
pub const MIN_SAMPLE_SIZE: usize = 2;

/// Outcome of a two-sided Welch t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WelchTest {
    /// t statistic (first sample minus second)
    pub statistic: f64,
    /// Welch–Satterthwaite degrees of freedom
    pub df: f64,
    /// Two-sided p-value in [0, 1]
    pub pvalue: f64,
}

/// Summary statistics of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSummary {
    pub n: usize,
    pub mean: f64,
    /// Unbiased (n - 1) variance
    pub variance: f64,
}

impl SampleSummary {
    /// Summarize a sample of at least two values.
    pub fn of(sample: &[f64]) -> Option<Self> {
        let n = sample.len();
        if n < MIN_SAMPLE_SIZE {
            return None;
        }
        // Summing a constant sample can drift by an ulp; keep it exact so
        // the zero-variance cases below are detected.
        if sample.iter().all(|&x| x == sample[0]) {
            return Some(Self {
                n,
                mean: sample[0],
                variance: 0.0,
            });
        }
        let mean = mean(sample)?;
        let variance = sample.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        Some(Self { n, mean, variance })
    }

    fn standard_error_sq(&self) -> f64 {
        self.variance / self.n as f64
    }
}

/// Arithmetic mean, or None for an empty sample.
pub fn mean(sample: &[f64]) -> Option<f64> {
    if sample.is_empty() {
        return None;
    }
    Some(sample.iter().sum::<f64>() / sample.len() as f64)
}

/// Run Welch's t-test on two samples of at least two values each.
pub fn welch_t_test(sample1: &[f64], sample2: &[f64]) -> Result<WelchTest> {
    let (Some(s1), Some(s2)) = (SampleSummary::of(sample1), SampleSummary::of(sample2)) else {
        return Err(EngineError::SampleTooSmall {
            len_first: sample1.len(),
            len_second: sample2.len(),
            minimum: MIN_SAMPLE_SIZE,
        });
    };
    if let Some(bad) = sample1.iter().chain(sample2).find(|x| !x.is_finite()) {
        return Err(EngineError::non_finite(format!("sample contains {bad}")));
    }

    let se1 = s1.standard_error_sq();
    let se2 = s2.standard_error_sq();
    let se_sq = se1 + se2;
    let diff = s1.mean - s2.mean;

    if se_sq == 0.0 {
        // Both samples are constant. Equal constants are indistinguishable;
        // different constants are perfectly separated.
        let df = (s1.n + s2.n - 2) as f64;
        return Ok(if diff == 0.0 {
            WelchTest {
                statistic: 0.0,
                df,
                pvalue: 1.0,
            }
        } else {
            WelchTest {
                statistic: diff.signum() * f64::INFINITY,
                df,
                pvalue: 0.0,
            }
        });
    }

    let statistic = diff / se_sq.sqrt();
    let df = se_sq.powi(2)
        / (se1.powi(2) / (s1.n - 1) as f64 + se2.powi(2) / (s2.n - 1) as f64);
    if statistic.is_nan() || df.is_nan() {
        return Err(EngineError::non_finite(format!(
            "variance overflowed (t = {statistic}, df = {df})"
        )));
    }
    let pvalue = t_two_sided_pvalue(statistic, df)?;

    Ok(WelchTest {
        statistic,
        df,
        pvalue,
    })
}

/// Raw two-sided p-value comparing the keyword group with the rest.
pub fn compare(group_true: &[f64], group_false: &[f64]) -> Result<f64> {
    welch_t_test(group_true, group_false).map(|test| test.pvalue)
}
