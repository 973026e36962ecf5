// Unit tests for the statistical comparator and the FDR corrector.

use resonance::stats::fdr::correct;
use resonance::stats::welch::{compare, mean, welch_t_test, SampleSummary};

// ============================================================
// Welch t-test
// ============================================================

#[test]
fn welch_matches_reference_pvalue() {
    // Reference: scipy.stats.ttest_ind(a, b, equal_var=False)
    let a = [0.12, 0.15, 0.11, 0.18, 0.14];
    let b = [0.05, 0.07, 0.06, 0.04, 0.08, 0.05];
    let test = welch_t_test(&a, &b).unwrap();
    assert!((test.statistic - 5.986_302_773).abs() < 1e-6);
    assert!((test.df - 5.884_897_745).abs() < 1e-6);
    assert!((test.pvalue - 0.001_047_441).abs() < 1e-8);
}

#[test]
fn welch_cauchy_case() {
    // n = 2 each, one constant sample: df = 1, t = -1, p = 0.5
    let test = welch_t_test(&[0.0, 0.0], &[0.0, 2.0]).unwrap();
    assert!((test.df - 1.0).abs() < 1e-12);
    assert!((test.statistic + 1.0).abs() < 1e-12);
    assert!((test.pvalue - 0.5).abs() < 1e-10);
}

#[test]
fn identical_groups_have_pvalue_one() {
    let p = compare(&[0.1, 0.2, 0.3], &[0.1, 0.2, 0.3]).unwrap();
    assert!((p - 1.0).abs() < 1e-12);
}

#[test]
fn pvalue_is_a_probability() {
    let samples: [&[f64]; 4] = [
        &[0.01, 0.02, 0.5],
        &[1e-9, 2e-9],
        &[0.3, 0.3, 0.31, 0.29],
        &[10.0, 11.0, 12.0, 100.0],
    ];
    for a in samples {
        for b in samples {
            let p = compare(a, b).unwrap();
            assert!((0.0..=1.0).contains(&p), "p = {p} for {a:?} vs {b:?}");
        }
    }
}

#[test]
fn sample_summary_requires_two_values() {
    assert!(SampleSummary::of(&[1.0]).is_none());
    let s = SampleSummary::of(&[1.0, 3.0]).unwrap();
    assert_eq!(s.n, 2);
    assert!((s.mean - 2.0).abs() < 1e-15);
    assert!((s.variance - 2.0).abs() < 1e-15);
}

#[test]
fn mean_of_empty_is_none() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[0.5]), Some(0.5));
}

// ============================================================
// Benjamini–Hochberg
// ============================================================

#[test]
fn bh_two_keyword_scenario() {
    let corrected = correct(&[0.01, 0.04]);
    assert!((corrected[0] - 0.02).abs() < 1e-12);
    assert!((corrected[1] - 0.04).abs() < 1e-12);
}

#[test]
fn bh_reference_values() {
    // Reference: statsmodels multipletests(p, method="fdr_bh")
    let raw = [0.001, 0.008, 0.039, 0.041, 0.042, 0.06, 0.074, 0.205];
    let expected = [0.008, 0.032, 0.0672, 0.0672, 0.0672, 0.08, 0.084_571_428_571, 0.205];
    let corrected = correct(&raw);
    for (c, e) in corrected.iter().zip(expected) {
        assert!((c - e).abs() < 1e-9, "got {corrected:?}");
    }
}

#[test]
fn bh_ties_share_a_value() {
    let corrected = correct(&[0.02, 0.02, 0.02]);
    assert!(corrected.iter().all(|&c| (c - 0.02).abs() < 1e-12));
}
