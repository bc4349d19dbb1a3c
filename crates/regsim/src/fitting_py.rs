// =============================================================================
// Linear Model Fitting (Python Bindings)
// =============================================================================

use pyo3::prelude::*;

use regsim_core::{fit_formula, FitConfig};

use crate::dataset_py::PyDataset;
use crate::results_py::PyFitResults;
use crate::to_py_err;

/// Fit an OLS model from an R-style formula.
///
/// Parameters
/// ----------
/// dataset : Dataset
/// formula : str
///     e.g. "outcome ~ covariate * category_indicator". The intercept is
///     always included.
/// confidence_level : float
///     Level for `conf_int()`; must be in (0, 1).
///
/// Rows with a missing value in any field the formula uses are dropped and
/// counted in `excluded_rows`.
#[pyfunction]
#[pyo3(signature = (dataset, formula, confidence_level=0.95))]
pub fn fit_py(dataset: &PyDataset, formula: &str, confidence_level: f64) -> PyResult<PyFitResults> {
    let config = FitConfig::with_confidence_level(confidence_level);
    let result = fit_formula(&dataset.inner, formula, &config).map_err(to_py_err)?;
    Ok(PyFitResults { inner: result })
}
