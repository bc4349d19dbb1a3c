// =============================================================================
// Linear Model Solvers
// =============================================================================
//
// We want coefficients β that best explain the relationship
//
//     E[Y] = Xβ
//
// where:
//   - Y is the response variable (what we're predicting)
//   - X is the design matrix (intercept column plus predictors)
//   - β is the coefficient vector (what we're solving for)
//
// With constant-variance Gaussian errors the maximum-likelihood answer is
// ordinary least squares, which has a closed form: no iteration, no
// convergence checks. See `ols.rs`.
//
// =============================================================================

mod ols;

pub use ols::{fit_ols, matrix_rank, OlsResult};
