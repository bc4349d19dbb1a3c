// =============================================================================
// Statistical Inference
// =============================================================================
//
// This module provides tools for statistical inference on OLS results:
//   - P-values: Test if coefficients are significantly different from zero
//   - Confidence intervals: Range estimates for true parameter values
//   - The overall F-test for a regression
//
// FOR STUDENTS:
// -------------
// Statistical inference tells us how confident we can be in our estimates.
//
// Example: You regress height on weight and get β_weight = 0.3.
// But how reliable is this estimate?
//   - p-value < 0.05 → The effect is statistically significant
//   - 95% CI = [0.25, 0.35] → 95% of intervals built this way cover the true slope
//
// IMPORTANT CAVEATS:
// - Statistical significance ≠ practical significance
// - With large samples, tiny effects become "significant"
// - Always consider the magnitude of effects, not just p-values
//
// =============================================================================

use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

// =============================================================================
// P-Value Calculation
// =============================================================================

/// Calculate two-tailed p-value from a t-statistic.
///
/// Uses Student's t-distribution with `df` degrees of freedom, which is the
/// exact sampling distribution of β̂ / se(β̂) under Gaussian errors.
///
/// # Arguments
/// * `t` - The t-statistic (coefficient / standard_error)
/// * `df` - Residual degrees of freedom (n - p)
///
/// # Interpretation
/// - p < 0.05: Traditionally "significant" at 5% level
/// - p < 0.01: "Highly significant" at 1% level
/// - p < 0.001: "Very highly significant"
///
/// An infinite t (zero standard error, e.g. noise-free data) gives p = 0.
pub fn pvalue_t(t: f64, df: f64) -> f64 {
    if t.is_nan() || !(df > 0.0) {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }

    let t_dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => d,
        Err(_) => return f64::NAN,
    };

    // Two-tailed test
    2.0 * (1.0 - t_dist.cdf(t.abs()))
}

/// Upper-tail p-value of an F statistic with (`df1`, `df2`) degrees of freedom.
///
/// Used for the overall regression test: do all slopes equal zero?
pub fn pvalue_f(f: f64, df1: f64, df2: f64) -> f64 {
    if f.is_nan() || !(df1 > 0.0) || !(df2 > 0.0) {
        return f64::NAN;
    }
    if f.is_infinite() {
        return 0.0;
    }
    if f <= 0.0 {
        return 1.0;
    }

    let f_dist = match FisherSnedecor::new(df1, df2) {
        Ok(d) => d,
        Err(_) => return f64::NAN,
    };
    1.0 - f_dist.cdf(f)
}

// =============================================================================
// Confidence Intervals
// =============================================================================

/// Two-sided critical value t_{1-α/2, df} for a `confidence` level.
///
/// Returns NaN for invalid inputs.
pub fn t_critical(df: f64, confidence: f64) -> f64 {
    if !(df > 0.0) || !(confidence > 0.0 && confidence < 1.0) {
        return f64::NAN;
    }
    let t_dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => d,
        Err(_) => return f64::NAN,
    };
    let alpha = 1.0 - confidence;
    t_dist.inverse_cdf(1.0 - alpha / 2.0)
}

/// Calculate confidence interval using t-distribution.
///
/// # Arguments
/// * `estimate` - Point estimate (coefficient value)
/// * `std_error` - Standard error of the estimate
/// * `df` - Degrees of freedom
/// * `confidence` - Confidence level (e.g., 0.95 for 95% CI)
///
/// # Returns
/// (lower_bound, upper_bound)
///
/// # Interpretation
/// A 95% CI means: If we repeated this analysis many times,
/// 95% of the intervals would contain the true parameter value.
pub fn confidence_interval_t(
    estimate: f64,
    std_error: f64,
    df: f64,
    confidence: f64,
) -> (f64, f64) {
    if !estimate.is_finite() || !std_error.is_finite() || std_error < 0.0 {
        return (f64::NAN, f64::NAN);
    }

    let margin = t_critical(df, confidence) * std_error;
    (estimate - margin, estimate + margin)
}

// =============================================================================
// Significance Stars (for summary tables)
// =============================================================================

/// Get significance stars for a p-value.
///
/// Returns a string of stars indicating significance level:
/// - "***" : p < 0.001
/// - "**"  : p < 0.01
/// - "*"   : p < 0.05
/// - "."   : p < 0.1
/// - ""    : p >= 0.1 (or NaN)
pub fn significance_stars(pvalue: f64) -> &'static str {
    if pvalue < 0.001 {
        "***"
    } else if pvalue < 0.01 {
        "**"
    } else if pvalue < 0.05 {
        "*"
    } else if pvalue < 0.1 {
        "."
    } else {
        ""
    }
}

// =============================================================================
// Tests
// =============================================================================
