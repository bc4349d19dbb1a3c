// =============================================================================
// OLS: Ordinary Least Squares
// =============================================================================
//
// Find β minimizing the sum of squared residuals:
//
//     β̂ = argmin ‖y − Xβ‖²
//
// The textbook answer is the normal equations (X'X)β = X'y. Forming X'X
// squares the condition number, so instead we factor X directly:
//
//     X = QR         (Householder QR, Q orthonormal n×p, R upper triangular p×p)
//     Rβ = Q'y       (back substitution)
//     (X'X)⁻¹ = R⁻¹R⁻ᵀ
//
// The last identity gives the unscaled covariance used for standard errors:
//
//     Var(β̂) = σ² (X'X)⁻¹
//
// RANK
// ----
// If a column of X is a linear combination of the others, β is not
// identifiable and any "solution" is arbitrary. We compute the singular
// values of X and count those above
//
//     tol = max(n, p) · ε · s_max
//
// (the LAPACK/NumPy default). Rank below p is an error, never a silent fit.
//
// =============================================================================

use ndarray::{Array1, Array2};
use nalgebra::DMatrix;

use crate::convert::{to_array1, to_array2, to_dmatrix, to_dvector};
use crate::error::{RegSimError, Result};

/// Results of an OLS solve.
#[derive(Debug, Clone)]
pub struct OlsResult {
    /// Estimated coefficients β̂ (one per column of X)
    pub coefficients: Array1<f64>,

    /// Fitted values Xβ̂
    pub fitted_values: Array1<f64>,

    /// Residuals y − Xβ̂
    pub residuals: Array1<f64>,

    /// Residual sum of squares
    pub rss: f64,

    /// The (X'X)⁻¹ matrix: Var(β̂) = σ² × (X'X)⁻¹
    pub covariance_unscaled: Array2<f64>,

    /// Numerical rank of X (equals the column count on success)
    pub rank: usize,
}

/// Numerical rank of `x` from its singular values.
pub fn matrix_rank(x: &DMatrix<f64>) -> usize {
    let (n, p) = x.shape();
    if n == 0 || p == 0 {
        return 0;
    }
    let singular_values = x.clone().svd(false, false).singular_values;
    let s_max = singular_values.max();
    if s_max <= 0.0 {
        return 0;
    }
    let tol = n.max(p) as f64 * f64::EPSILON * s_max;
    singular_values.iter().filter(|&&s| s > tol).count()
}

/// Fit y = Xβ + ε by least squares.
///
/// `x` should already contain an intercept column if one is wanted.
///
/// # Errors
/// - `DimensionMismatch` if `x` and `y` disagree on the number of rows
/// - `InsufficientData` if there are not more rows than columns
/// - `RankDeficiency` if `x` does not have full column rank
pub fn fit_ols(y: &Array1<f64>, x: &Array2<f64>) -> Result<OlsResult> {
    // -------------------------------------------------------------------------
    // Step 0: Validate inputs
    // -------------------------------------------------------------------------
    let n = y.len();
    let p = x.ncols();

    if x.nrows() != n {
        return Err(RegSimError::DimensionMismatch(format!(
            "X has {} rows but y has {} elements",
            x.nrows(),
            n
        )));
    }
    if p == 0 {
        return Err(RegSimError::DimensionMismatch("X has no columns".to_string()));
    }
    if n <= p {
        return Err(RegSimError::InsufficientData(format!(
            "{} observations for {} coefficients leaves no residual degrees of freedom",
            n, p
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(RegSimError::InvalidConfiguration(
            "design matrix and response must be finite".to_string(),
        ));
    }

    let x_nalg = to_dmatrix(x);
    let y_nalg = to_dvector(y);

    // -------------------------------------------------------------------------
    // Step 1: Rank check
    // -------------------------------------------------------------------------
    let rank = matrix_rank(&x_nalg);
    if rank < p {
        return Err(RegSimError::RankDeficiency(format!(
            "design matrix has rank {} but {} columns; \
             at least one column is a linear combination of the others",
            rank, p
        )));
    }

    // -------------------------------------------------------------------------
    // Step 2: QR solve
    // -------------------------------------------------------------------------
    let qr = x_nalg.clone().qr();
    let q = qr.q();
    let r = qr.r();
    let qty = q.transpose() * &y_nalg;

    let beta = r.solve_upper_triangular(&qty).ok_or_else(|| {
        RegSimError::RankDeficiency("R factor is singular".to_string())
    })?;
    let r_inv = r
        .solve_upper_triangular(&DMatrix::identity(p, p))
        .ok_or_else(|| RegSimError::RankDeficiency("R factor is singular".to_string()))?;
    let xtx_inv = &r_inv * r_inv.transpose();

    // -------------------------------------------------------------------------
    // Step 3: Fitted values and residuals
    // -------------------------------------------------------------------------
    let fitted = &x_nalg * &beta;
    let residuals = &y_nalg - &fitted;
    let rss = residuals.norm_squared();

    log::debug!("OLS solved: n = {}, p = {}, rss = {:.6}", n, p, rss);

    Ok(OlsResult {
        coefficients: to_array1(&beta),
        fitted_values: to_array1(&fitted),
        residuals: to_array1(&residuals),
        rss,
        covariance_unscaled: to_array2(&xtx_inv),
        rank,
    })
}

// =============================================================================
// Tests
// =============================================================================
