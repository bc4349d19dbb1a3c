// =============================================================================
// OLS Results
// =============================================================================
//
// Python view of a FitResult, with statsmodels-style attribute names
// (params, bse, tvalues, pvalues, conf_int, ...).
// =============================================================================

use pyo3::prelude::*;
use numpy::{IntoPyArray, PyArray1, PyArray2};
use ndarray::{Array1, Array2};

use regsim_core::FitResult;

use crate::dataset_py::PyDataset;

/// Results from fitting a linear model.
#[pyclass(name = "FitResults")]
#[derive(Clone)]
pub struct PyFitResults {
    pub(crate) inner: FitResult,
}

impl PyFitResults {
    fn column(&self, value: impl Fn(&regsim_core::TermEstimate) -> f64) -> Array1<f64> {
        self.inner.terms.iter().map(value).collect()
    }
}

#[pymethods]
impl PyFitResults {
    /// Estimated coefficients, intercept first.
    #[getter]
    fn params<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.column(|t| t.estimate).into_pyarray_bound(py)
    }

    /// Standard errors.
    #[getter]
    fn bse<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.column(|t| t.std_error).into_pyarray_bound(py)
    }

    #[getter]
    fn tvalues<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.column(|t| t.t_value).into_pyarray_bound(py)
    }

    /// Two-tailed p-values from Student's t with `df_resid` degrees of freedom.
    #[getter]
    fn pvalues<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.column(|t| t.p_value).into_pyarray_bound(py)
    }

    /// Confidence intervals at the level chosen when fitting.
    ///
    /// Returns an array of shape (n_params, 2): [lower, upper].
    fn conf_int<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        let terms = &self.inner.terms;
        Array2::from_shape_fn((terms.len(), 2), |(i, j)| {
            if j == 0 {
                terms[i].ci_lower
            } else {
                terms[i].ci_upper
            }
        })
        .into_pyarray_bound(py)
    }

    #[getter]
    fn term_names(&self) -> Vec<String> {
        self.inner.terms.iter().map(|t| t.name.clone()).collect()
    }

    #[getter]
    fn df_resid(&self) -> usize {
        self.inner.df_resid
    }

    #[getter]
    fn df_model(&self) -> usize {
        self.inner.df_model()
    }

    #[getter]
    fn nobs(&self) -> usize {
        self.inner.n_obs
    }

    /// Rows dropped because a field the model uses was missing.
    #[getter]
    fn excluded_rows(&self) -> usize {
        self.inner.excluded_rows
    }

    #[getter]
    fn confidence_level(&self) -> f64 {
        self.inner.confidence_level
    }

    /// Residual standard error σ̂.
    #[getter]
    fn resid_std_err(&self) -> f64 {
        self.inner.residual_std_error
    }

    #[getter]
    fn rsquared(&self) -> f64 {
        self.inner.r_squared
    }

    #[getter]
    fn rsquared_adj(&self) -> f64 {
        self.inner.adj_r_squared
    }

    /// Overall F statistic; None for an intercept-only model.
    #[getter]
    fn fvalue(&self) -> Option<f64> {
        self.inner.f_statistic
    }

    #[getter]
    fn f_pvalue(&self) -> Option<f64> {
        self.inner.f_pvalue
    }

    /// Fitted values for every row of `dataset`; NaN where a predictor is missing.
    fn predict<'py>(&self, py: Python<'py>, dataset: &PyDataset) -> Bound<'py, PyArray1<f64>> {
        dataset
            .inner
            .samples()
            .iter()
            .map(|s| self.inner.predict(s).unwrap_or(f64::NAN))
            .collect::<Array1<f64>>()
            .into_pyarray_bound(py)
    }

    /// R-style summary table.
    fn summary(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "FitResults(terms={}, nobs={}, df_resid={}, excluded_rows={})",
            self.inner.terms.len(),
            self.inner.n_obs,
            self.inner.df_resid,
            self.inner.excluded_rows
        )
    }
}
