// =============================================================================
// CSV Import / Export (Python Bindings)
// =============================================================================

use pyo3::prelude::*;
use pyo3::types::PyDict;

use regsim_core::{read_csv_path, write_csv_path};

use crate::dataset_py::{coding_from_dict, PyDataset};
use crate::to_py_err;

/// Read a CSV written by `write_csv`.
///
/// `coding` is the `{label: indicator}` map every row must agree with; it
/// is never inferred from the file.
#[pyfunction]
pub fn read_csv_py(path: &str, coding: &Bound<'_, PyDict>) -> PyResult<PyDataset> {
    let coding = coding_from_dict(coding)?;
    let inner = read_csv_path(path, &coding).map_err(to_py_err)?;
    Ok(PyDataset { inner })
}

/// Write `dataset` as CSV with header `category,category_indicator,covariate,outcome`.
#[pyfunction]
pub fn write_csv_py(dataset: &PyDataset, path: &str) -> PyResult<()> {
    write_csv_path(&dataset.inner, path).map_err(to_py_err)
}
