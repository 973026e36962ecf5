// Hypothesis testing: t distribution, Welch's t-test, and FDR correction.

pub mod distribution;
pub mod fdr;
pub mod welch;
