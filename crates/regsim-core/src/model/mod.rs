// =============================================================================
// Linear Model Fitting
// =============================================================================
//
// The user-facing fitter: Dataset + response + terms → FitResult.
//
//     1. Build X (ones column + one column per term) from complete rows
//     2. Solve OLS (see solvers/ols.rs)
//     3. Inference on each coefficient:
//
//          σ̂²      = RSS / df               df = n − terms − 1
//          se(β̂ⱼ)  = √(σ̂² [(X'X)⁻¹]ⱼⱼ)
//          t       = β̂ⱼ / se(β̂ⱼ)
//          p       = 2·P(T_df > |t|)
//          CI      = β̂ⱼ ± t_{1−α/2, df} · se(β̂ⱼ)
//
//     4. Whole-model statistics: R², adjusted R², F-test of all slopes = 0
//
// READING AN INTERACTION MODEL
// ----------------------------
// For outcome ~ covariate * category_indicator:
//
//     (Intercept)                     baseline of the reference group (d = 0)
//     covariate                       slope in the reference group
//     category_indicator              intercept shift for the d = 1 group
//     covariate:category_indicator    slope difference for the d = 1 group
//
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Field, Sample};
use crate::describe::{describe, Describe};
use crate::design::build_design_matrix;
use crate::error::{RegSimError, Result};
use crate::formula::{parse_formula, ModelSpec};
use crate::inference::{confidence_interval_t, pvalue_f, pvalue_t};
use crate::solvers::fit_ols;

// =============================================================================
// Configuration
// =============================================================================

/// Options for `fit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Confidence level for coefficient intervals, in (0, 1).
    /// Default: 0.95
    pub confidence_level: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

impl FitConfig {
    pub fn with_confidence_level(confidence_level: f64) -> Self {
        Self { confidence_level }
    }

    fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(RegSimError::InvalidConfiguration(format!(
                "confidence_level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Results
// =============================================================================

/// Inference for one coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermEstimate {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl TermEstimate {
    /// Whether the confidence interval covers `value`.
    pub fn ci_contains(&self, value: f64) -> bool {
        self.ci_lower <= value && value <= self.ci_upper
    }
}

/// Everything a fit produces. Owns its data; holds no reference to the
/// dataset it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// Response field
    pub response: Field,
    /// Predictor terms, in coefficient order after the intercept
    pub spec: ModelSpec,
    /// Intercept first, then one entry per term
    pub terms: Vec<TermEstimate>,
    /// σ̂ = √(RSS / df)
    pub residual_std_error: f64,
    /// Residual degrees of freedom
    pub df_resid: usize,
    /// Rows used in the fit
    pub n_obs: usize,
    /// Rows dropped for missing values
    pub excluded_rows: usize,
    pub confidence_level: f64,
    /// NaN when the response is constant
    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// Overall F statistic; `None` for an intercept-only model or a
    /// constant response
    pub f_statistic: Option<f64>,
    pub f_pvalue: Option<f64>,
    /// Five-number summary (and more) of the residuals
    pub residuals: Describe,
}

impl FitResult {
    /// Look up a coefficient by name, e.g. `"covariate:category_indicator"`.
    pub fn term(&self, name: &str) -> Option<&TermEstimate> {
        self.terms.iter().find(|t| t.name == name)
    }

    pub fn intercept(&self) -> &TermEstimate {
        &self.terms[0]
    }

    /// Point estimates in coefficient order.
    pub fn coefficients(&self) -> Vec<f64> {
        self.terms.iter().map(|t| t.estimate).collect()
    }

    pub fn term_names(&self) -> Vec<&str> {
        self.terms.iter().map(|t| t.name.as_str()).collect()
    }

    /// Number of slope terms (excludes the intercept).
    pub fn df_model(&self) -> usize {
        self.spec.len()
    }

    /// Fitted value for one sample; `None` if a predictor it needs is missing.
    pub fn predict(&self, sample: &Sample) -> Option<f64> {
        let mut value = self.intercept().estimate;
        for (term, estimate) in self.spec.terms().iter().zip(&self.terms[1..]) {
            value += estimate.estimate * term.evaluate(sample)?;
        }
        Some(value)
    }
}

// =============================================================================
// Fitting
// =============================================================================

/// Fit `response ~ spec` by ordinary least squares.
///
/// # Errors
/// - `InvalidConfiguration` for a confidence level outside (0, 1) or a
///   response that is also a predictor
/// - `RankDeficiency` if two terms are the same column by construction, or
///   the design matrix is numerically rank deficient
/// - `InsufficientData` if the dataset is empty or fewer than terms + 2 rows
///   are complete
///
/// Rows with missing values are excluded and counted, not treated as errors.
pub fn fit(
    dataset: &Dataset,
    response: Field,
    spec: &ModelSpec,
    config: &FitConfig,
) -> Result<FitResult> {
    config.validate()?;
    spec.check_structure()?;

    let design = build_design_matrix(dataset, response, spec)?;
    if design.excluded_rows > 0 {
        log::warn!(
            "excluded {} of {} rows with missing values",
            design.excluded_rows,
            dataset.len()
        );
    }

    let n = design.nrows();
    let p = design.ncols();
    if n <= p {
        return Err(RegSimError::InsufficientData(format!(
            "{} complete rows for {} coefficients ({} excluded for missing values); \
             residual degrees of freedom would be {}",
            n,
            p,
            design.excluded_rows,
            n as i64 - p as i64
        )));
    }

    let ols = fit_ols(&design.y, &design.x)?;

    // -------------------------------------------------------------------------
    // Coefficient inference
    // -------------------------------------------------------------------------
    let df_resid = n - p;
    let df = df_resid as f64;
    let sigma2 = ols.rss / df;
    let sigma = sigma2.sqrt();

    let terms: Vec<TermEstimate> = design
        .column_names
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let estimate = ols.coefficients[j];
            let std_error = (sigma2 * ols.covariance_unscaled[[j, j]]).max(0.0).sqrt();
            let t_value = estimate / std_error;
            let (ci_lower, ci_upper) =
                confidence_interval_t(estimate, std_error, df, config.confidence_level);
            TermEstimate {
                name: name.clone(),
                estimate,
                std_error,
                t_value,
                p_value: pvalue_t(t_value, df),
                ci_lower,
                ci_upper,
            }
        })
        .collect();

    // -------------------------------------------------------------------------
    // Whole-model statistics
    // -------------------------------------------------------------------------
    // mss = Σ(ŷᵢ − ȳ)² over the fitted values
    let y_mean = design.y.mean().unwrap_or(0.0);
    let tss: f64 = design.y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
    let mss: f64 = ols.fitted_values.iter().map(|&fi| (fi - y_mean).powi(2)).sum();
    let k = spec.len();

    let (r_squared, adj_r_squared, f_statistic, f_pvalue) = if tss > 0.0 {
        let r_squared = mss / (mss + ols.rss);
        let adj_r_squared = 1.0 - (1.0 - r_squared) * (n as f64 - 1.0) / df;
        if k > 0 {
            let f = (mss / k as f64) / sigma2;
            (r_squared, adj_r_squared, Some(f), Some(pvalue_f(f, k as f64, df)))
        } else {
            (r_squared, adj_r_squared, None, None)
        }
    } else {
        log::warn!("response is constant; R² and the F-test are undefined");
        (f64::NAN, f64::NAN, None, None)
    };

    log::debug!(
        "fit {} ~ {} terms: n = {}, df = {}, sigma = {:.6}, R² = {:.4}",
        response,
        k,
        n,
        df_resid,
        sigma,
        r_squared
    );

    Ok(FitResult {
        response,
        spec: spec.clone(),
        terms,
        residual_std_error: sigma,
        df_resid,
        n_obs: n,
        excluded_rows: design.excluded_rows,
        confidence_level: config.confidence_level,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_pvalue,
        residuals: describe(&ols.residuals.to_vec()),
    })
}

/// Fit from an R-style formula, e.g. `"outcome ~ covariate * category_indicator"`.
pub fn fit_formula(dataset: &Dataset, formula: &str, config: &FitConfig) -> Result<FitResult> {
    let parsed = parse_formula(formula)?;
    fit(dataset, parsed.response, &parsed.spec, config)
}

/// `outcome ~ covariate + category_indicator + covariate:category_indicator`,
/// the model the generator draws from.
pub fn generating_model() -> ModelSpec {
    ModelSpec::full_interaction(Field::Covariate, Field::CategoryIndicator)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CategoryCoding;
    use crate::formula::Term;
    use crate::simulate::{generate, GeneratorConfig, OutcomeParams};
    use approx::assert_abs_diff_eq;

    fn coding() -> CategoryCoding {
        CategoryCoding::new([("A", 1), ("B", 0)]).unwrap()
    }

    /// Ten points on y = 1 + 2x with alternating ±0.5 noise.
    fn line_dataset() -> Dataset {
        let samples = (0..10)
            .map(|i| {
                let x = i as f64;
                let noise = if i % 2 == 0 { 0.5 } else { -0.5 };
                let (label, d) = if i < 5 { ("A", 1) } else { ("B", 0) };
                Sample::new(label, d, Some(x), Some(1.0 + 2.0 * x + noise))
            })
            .collect();
        Dataset::new(coding(), samples).unwrap()
    }

    #[test]
    fn test_simple_regression_inference() {
        let spec = ModelSpec::new(vec![Term::Field(Field::Covariate)]);
        let result = fit(&line_dataset(), Field::Outcome, &spec, &FitConfig::default()).unwrap();

        assert_eq!(result.term_names(), vec!["(Intercept)", "covariate"]);
        assert_eq!(result.df_resid, 8);
        assert_eq!(result.n_obs, 10);
        assert_eq!(result.excluded_rows, 0);

        let slope = result.term("covariate").unwrap();
        assert_abs_diff_eq!(slope.t_value, slope.estimate / slope.std_error, epsilon = 1e-12);
        assert!(slope.ci_lower < slope.estimate && slope.estimate < slope.ci_upper);
        assert!(slope.p_value < 1e-6);

        // Simple regression: F = t² for the slope
        let f = result.f_statistic.unwrap();
        assert_abs_diff_eq!(f, slope.t_value.powi(2), epsilon = 1e-6 * f);
        assert_abs_diff_eq!(result.f_pvalue.unwrap(), slope.p_value, epsilon = 1e-10);
        assert!(result.r_squared > 0.95 && result.r_squared <= 1.0);
        assert!(result.adj_r_squared < result.r_squared);
    }

    /// R's `cars` data: stopping distance (ft) against speed (mph).
    fn cars_dataset() -> Dataset {
        let speed = [
            4, 4, 7, 7, 8, 9, 10, 10, 10, 11, 11, 12, 12, 12, 12, 13, 13, 13, 13, 14, 14, 14, 14,
            15, 15, 15, 16, 16, 17, 17, 17, 18, 18, 18, 18, 19, 19, 19, 20, 20, 20, 20, 20, 22,
            23, 24, 24, 24, 24, 25,
        ];
        let dist = [
            2, 10, 4, 22, 16, 10, 18, 26, 34, 17, 28, 14, 20, 24, 28, 26, 34, 34, 46, 26, 36, 60,
            80, 20, 26, 54, 32, 40, 32, 40, 50, 42, 56, 76, 84, 36, 46, 68, 32, 48, 52, 56, 64,
            66, 54, 70, 92, 93, 120, 85,
        ];
        let samples = speed
            .iter()
            .zip(dist.iter())
            .map(|(&x, &y)| Sample::new("A", 1, Some(f64::from(x)), Some(f64::from(y))))
            .collect();
        Dataset::new(coding(), samples).unwrap()
    }

    #[test]
    fn test_matches_r_lm_on_cars() {
        // summary(lm(dist ~ speed, cars)) and confint(...)
        let result = fit_formula(&cars_dataset(), "outcome ~ covariate", &FitConfig::default()).unwrap();
        assert_eq!(result.df_resid, 48);

        let intercept = result.intercept();
        assert_abs_diff_eq!(intercept.estimate, -17.5791, epsilon = 1e-4);
        assert_abs_diff_eq!(intercept.std_error, 6.7584, epsilon = 1e-4);
        assert_abs_diff_eq!(intercept.t_value, -2.601, epsilon = 1e-3);
        assert_abs_diff_eq!(intercept.p_value, 0.01232, epsilon = 1e-5);
        assert_abs_diff_eq!(intercept.ci_lower, -31.1679, epsilon = 1e-4);
        assert_abs_diff_eq!(intercept.ci_upper, -3.9903, epsilon = 1e-4);

        let speed = result.term("covariate").unwrap();
        assert_abs_diff_eq!(speed.estimate, 3.9324, epsilon = 1e-4);
        assert_abs_diff_eq!(speed.std_error, 0.4155, epsilon = 1e-4);
        assert_abs_diff_eq!(speed.t_value, 9.464, epsilon = 1e-3);
        assert_abs_diff_eq!(speed.p_value, 1.49e-12, epsilon = 1e-13);
        assert_abs_diff_eq!(speed.ci_lower, 3.0970, epsilon = 1e-4);
        assert_abs_diff_eq!(speed.ci_upper, 4.7679, epsilon = 1e-4);

        assert_abs_diff_eq!(result.residual_std_error, 15.38, epsilon = 5e-3);
        assert_abs_diff_eq!(result.r_squared, 0.6511, epsilon = 1e-4);
        assert_abs_diff_eq!(result.adj_r_squared, 0.6438, epsilon = 1e-4);
        assert_abs_diff_eq!(result.f_statistic.unwrap(), 89.57, epsilon = 1e-2);
    }

    #[test]
    fn test_constant_response_has_undefined_fit_statistics() {
        let samples = (0..10)
            .map(|i| {
                let (label, d) = if i % 2 == 0 { ("A", 1) } else { ("B", 0) };
                Sample::new(label, d, Some(i as f64), Some(5.0))
            })
            .collect();
        let ds = Dataset::new(coding(), samples).unwrap();

        let result = fit_formula(&ds, "outcome ~ covariate", &FitConfig::default()).unwrap();
        assert_abs_diff_eq!(result.intercept().estimate, 5.0, epsilon = 1e-10);
        assert!(result.r_squared.is_nan());
        assert!(result.adj_r_squared.is_nan());
        assert_eq!(result.f_statistic, None);
        assert_eq!(result.f_pvalue, None);
        assert!(!result.to_string().contains("F-statistic"));
    }

    #[test]
    fn test_generator_with_flat_outcome() {
        let config = GeneratorConfig::default()
            .with_outcome(OutcomeParams::new(170.0, 0.0, 0.0, 0.0))
            .with_outcome_sigma(0.0);
        let ds = generate(&config).unwrap();
        let result = fit(&ds, Field::Outcome, &generating_model(), &FitConfig::default()).unwrap();
        assert!(result.r_squared.is_nan());
        assert_eq!(result.f_statistic, None);
    }

    #[test]
    fn test_intercept_only_is_the_mean() {
        let ds = line_dataset();
        let result = fit(&ds, Field::Outcome, &ModelSpec::default(), &FitConfig::default()).unwrap();
        let ys: Vec<f64> = ds.column(Field::Outcome).into_iter().flatten().collect();
        let mean = ys.iter().sum::<f64>() / ys.len() as f64;
        assert_abs_diff_eq!(result.intercept().estimate, mean, epsilon = 1e-10);
        assert_eq!(result.f_statistic, None);
        assert_eq!(result.df_resid, 9);
    }

    #[test]
    fn test_confidence_level_controls_width() {
        let spec = generating_model();
        let ds = generate(&GeneratorConfig::default()).unwrap();
        let narrow = fit(&ds, Field::Outcome, &spec, &FitConfig::with_confidence_level(0.80)).unwrap();
        let wide = fit(&ds, Field::Outcome, &spec, &FitConfig::with_confidence_level(0.99)).unwrap();
        for (a, b) in narrow.terms.iter().zip(&wide.terms) {
            assert_eq!(a.estimate, b.estimate);
            assert!(a.ci_upper - a.ci_lower < b.ci_upper - b.ci_lower);
        }
    }

    #[test]
    fn test_invalid_confidence_level() {
        let ds = line_dataset();
        for level in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let err = fit(&ds, Field::Outcome, &generating_model(), &FitConfig::with_confidence_level(level));
            assert!(matches!(err, Err(RegSimError::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn test_zero_noise_recovers_coefficients() {
        let config = GeneratorConfig::default().with_outcome_sigma(0.0);
        let ds = generate(&config).unwrap();
        let result = fit(&ds, Field::Outcome, &generating_model(), &FitConfig::default()).unwrap();
        for (estimate, truth) in result.coefficients().iter().zip(config.outcome.as_array()) {
            assert_abs_diff_eq!(*estimate, truth, epsilon = 1e-8);
        }
        assert!(result.residual_std_error < 1e-9);
    }

    #[test]
    fn test_missing_covariate_excluded() {
        let ds = generate(&GeneratorConfig::default()).unwrap();
        let mut samples = ds.samples().to_vec();
        samples[7].covariate = None;
        let with_gap = Dataset::new(ds.coding().clone(), samples).unwrap();

        let result = fit(&with_gap, Field::Outcome, &generating_model(), &FitConfig::default()).unwrap();
        assert_eq!(result.excluded_rows, 1);
        assert_eq!(result.n_obs, 199);
        assert_eq!(result.df_resid, 195);
    }

    #[test]
    fn test_self_interaction_is_rank_deficient() {
        let ds = generate(&GeneratorConfig::default()).unwrap();
        let spec = ModelSpec::new(vec![
            Term::Field(Field::Covariate),
            Term::Field(Field::CategoryIndicator),
            Term::Interaction(Field::CategoryIndicator, Field::CategoryIndicator),
        ]);
        let err = fit(&ds, Field::Outcome, &spec, &FitConfig::default()).unwrap_err();
        assert!(matches!(err, RegSimError::RankDeficiency(_)));
    }

    #[test]
    fn test_single_group_indicator_is_rank_deficient() {
        // Every row in group A: the indicator column equals the intercept
        let samples = (0..10)
            .map(|i| Sample::new("A", 1, Some(i as f64), Some(2.0 * i as f64 + (i % 3) as f64)))
            .collect();
        let ds = Dataset::new(coding(), samples).unwrap();
        let err = fit(&ds, Field::Outcome, &generating_model(), &FitConfig::default()).unwrap_err();
        assert!(matches!(err, RegSimError::RankDeficiency(_)));
    }

    #[test]
    fn test_insufficient_data() {
        let samples = vec![
            Sample::new("A", 1, Some(1.0), Some(2.0)),
            Sample::new("B", 0, Some(2.0), Some(3.0)),
            Sample::new("B", 0, Some(3.0), Some(5.0)),
            Sample::new("A", 1, Some(4.0), Some(4.0)),
        ];
        let ds = Dataset::new(coding(), samples).unwrap();
        let err = fit(&ds, Field::Outcome, &generating_model(), &FitConfig::default()).unwrap_err();
        assert!(matches!(err, RegSimError::InsufficientData(_)));
    }

    #[test]
    fn test_predict_matches_generating_line() {
        let config = GeneratorConfig::default().with_outcome_sigma(0.0);
        let ds = generate(&config).unwrap();
        let result = fit(&ds, Field::Outcome, &generating_model(), &FitConfig::default()).unwrap();

        let s = Sample::new("A", 1, Some(95.0), None);
        assert_abs_diff_eq!(
            result.predict(&s).unwrap(),
            config.outcome.mean_outcome(95.0, 1.0),
            epsilon = 1e-8
        );
        assert_eq!(result.predict(&Sample::new("A", 1, None, None)), None);
    }

    #[test]
    fn test_fit_formula_matches_spec() {
        let ds = generate(&GeneratorConfig::default()).unwrap();
        let a = fit_formula(&ds, "outcome ~ covariate * category_indicator", &FitConfig::default()).unwrap();
        let b = fit(&ds, Field::Outcome, &generating_model(), &FitConfig::default()).unwrap();
        assert_eq!(a, b);
    }
}
