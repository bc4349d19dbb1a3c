// =============================================================================
// Descriptive Statistics (Python Bindings)
// =============================================================================

use pyo3::prelude::*;
use pyo3::types::PyDict;

use regsim_core::{describe_dataset, Describe, Field};

use crate::dataset_py::PyDataset;
use crate::to_py_err;

fn describe_dict<'py>(py: Python<'py>, d: &Describe) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("count", d.count)?;
    dict.set_item("mean", d.mean)?;
    dict.set_item("median", d.median)?;
    dict.set_item("variance", d.variance)?;
    dict.set_item("std_dev", d.std_dev)?;
    dict.set_item("min", d.min)?;
    dict.set_item("q1", d.q1)?;
    dict.set_item("q3", d.q3)?;
    dict.set_item("max", d.max)?;
    Ok(dict)
}

/// Descriptive statistics of one field.
///
/// Returns `{"groups": {label: stats, ...}, "all": stats}`. Each `stats`
/// dict holds count, mean, median, variance, std_dev, min, q1, q3 and max;
/// group entries also carry the indicator and the number of missing values.
#[pyfunction]
#[pyo3(signature = (dataset, field="covariate"))]
pub fn describe_py<'py>(
    py: Python<'py>,
    dataset: &PyDataset,
    field: &str,
) -> PyResult<Bound<'py, PyDict>> {
    let field: Field = field.parse().map_err(to_py_err)?;

    let desc = describe_dataset(&dataset.inner, field);

    let groups = PyDict::new_bound(py);
    for group in &desc.groups {
        let dict = describe_dict(py, &group.stats)?;
        dict.set_item("indicator", group.indicator)?;
        dict.set_item("missing", group.missing)?;
        groups.set_item(&group.label, dict)?;
    }

    let out = PyDict::new_bound(py);
    out.set_item("groups", groups)?;
    out.set_item("all", describe_dict(py, &desc.all)?)?;
    Ok(out)
}
