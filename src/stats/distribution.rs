// Student's t distribution tail probabilities, via statrs.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{EngineError, Result};

/// Two-sided p-value P(|T| >= |t|) for Student's t with `df` degrees of freedom.
///
/// An infinite `t` gives 0 and `t == 0` gives 1. A NaN statistic or a
/// non-positive `df` is an error rather than a NaN probability.
pub fn t_two_sided_pvalue(t: f64, df: f64) -> Result<f64> {
    if t.is_nan() {
        return Err(EngineError::non_finite("t statistic is NaN"));
    }
    if t.is_infinite() {
        return Ok(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| EngineError::non_finite(format!("degrees of freedom {df}: {e}")))?;
    let p = 2.0 * dist.sf(t.abs());
    if p.is_nan() {
        return Err(EngineError::non_finite(format!("p-value for t = {t}, df = {df}")));
    }
    Ok(p.clamp(0.0, 1.0))
}
