// =============================================================================
// Dataset and Generator (Python Bindings)
// =============================================================================
//
// - Dataset: read-only view of a regsim-core Dataset with numpy columns
// - generate_py: seeded two-group generator
//
// Missing numeric values cross the boundary as NaN in both directions.
// =============================================================================

use pyo3::prelude::*;
use pyo3::exceptions::PyValueError;
use pyo3::types::PyDict;
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use ndarray::Array1;

use regsim_core::{
    generate, CategoryCoding, Dataset, GeneratorConfig, GroupSpec, OutcomeParams, Sample,
};

use crate::to_py_err;

/// Read a `{label: indicator}` dict into a coding, keeping insertion order.
pub(crate) fn coding_from_dict(coding: &Bound<'_, PyDict>) -> PyResult<CategoryCoding> {
    let mut pairs: Vec<(String, u8)> = Vec::with_capacity(coding.len());
    for (label, indicator) in coding.iter() {
        pairs.push((label.extract()?, indicator.extract()?));
    }
    CategoryCoding::new(pairs).map_err(to_py_err)
}

fn nan_to_none(v: f64) -> Option<f64> {
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

fn column_array(dataset: &Dataset, values: impl Fn(&Sample) -> Option<f64>) -> Array1<f64> {
    dataset
        .samples()
        .iter()
        .map(|s| values(s).unwrap_or(f64::NAN))
        .collect()
}

/// A simulated or imported dataset.
///
/// Columns come back as numpy arrays; missing values are NaN.
#[pyclass(name = "Dataset")]
#[derive(Clone)]
pub struct PyDataset {
    pub(crate) inner: Dataset,
}

#[pymethods]
impl PyDataset {
    /// Build a dataset from columns.
    ///
    /// Parameters
    /// ----------
    /// category : list[str]
    ///     Group label per row.
    /// coding : dict[str, int]
    ///     Label → indicator map with exactly two entries, values 0 and 1.
    /// covariate, outcome : numpy.ndarray
    ///     Numeric columns; NaN marks a missing value.
    #[staticmethod]
    fn from_columns(
        category: Vec<String>,
        coding: &Bound<'_, PyDict>,
        covariate: PyReadonlyArray1<f64>,
        outcome: PyReadonlyArray1<f64>,
    ) -> PyResult<Self> {
        let coding = coding_from_dict(coding)?;
        let covariate = covariate.as_array();
        let outcome = outcome.as_array();
        let n = category.len();
        if covariate.len() != n || outcome.len() != n {
            return Err(PyValueError::new_err(format!(
                "column lengths differ: category {}, covariate {}, outcome {}",
                n,
                covariate.len(),
                outcome.len()
            )));
        }

        let mut samples = Vec::with_capacity(n);
        for (i, label) in category.into_iter().enumerate() {
            let indicator = coding.indicator(&label).ok_or_else(|| {
                PyValueError::new_err(format!("row {}: unknown category '{}'", i, label))
            })?;
            samples.push(Sample::new(
                label,
                indicator,
                nan_to_none(covariate[i]),
                nan_to_none(outcome[i]),
            ));
        }
        let inner = Dataset::new(coding, samples).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Group label per row.
    #[getter]
    fn category(&self) -> Vec<String> {
        self.inner.samples().iter().map(|s| s.category.clone()).collect()
    }

    /// 0/1 indicator per row.
    #[getter]
    fn category_indicator<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<u8>> {
        self.inner
            .samples()
            .iter()
            .map(|s| s.category_indicator)
            .collect::<Array1<u8>>()
            .into_pyarray_bound(py)
    }

    #[getter]
    fn covariate<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        column_array(&self.inner, |s| s.covariate).into_pyarray_bound(py)
    }

    #[getter]
    fn outcome<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        column_array(&self.inner, |s| s.outcome).into_pyarray_bound(py)
    }

    /// The label → indicator map as (label, indicator) pairs.
    #[getter]
    fn coding(&self) -> Vec<(String, u8)> {
        self.inner.coding().levels().to_vec()
    }

    /// Rows per group, in coding order.
    fn group_sizes(&self) -> Vec<(String, usize)> {
        self.inner.group_sizes()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        let groups: Vec<String> = self
            .inner
            .coding()
            .levels()
            .iter()
            .map(|(label, ind)| format!("{}={}", label, ind))
            .collect();
        format!("Dataset(rows={}, coding={{{}}})", self.inner.len(), groups.join(", "))
    }
}

// =============================================================================
// generate_py
// =============================================================================

/// Simulate a two-group dataset.
///
/// Defaults reproduce the classic teaching example: 200 rows, group "A"
/// (indicator 1, mean 100) and group "B" (indicator 0, mean 80), covariate
/// sd 10, outcome = 170 + 0.3·x + 15·d − 0.1·x·d + N(0, 3²), seed 1000.
///
/// Parameters
/// ----------
/// groups : list[tuple[str, int, float, float]], optional
///     (label, indicator, mean, sd) per group, in allocation order.
#[pyfunction]
#[pyo3(signature = (total_count=200, groups=None, intercept=170.0, slope_covariate=0.3, slope_category=15.0, slope_interaction=-0.1, outcome_sigma=3.0, seed=1000))]
#[allow(clippy::too_many_arguments)]
pub fn generate_py(
    total_count: usize,
    groups: Option<Vec<(String, u8, f64, f64)>>,
    intercept: f64,
    slope_covariate: f64,
    slope_category: f64,
    slope_interaction: f64,
    outcome_sigma: f64,
    seed: u64,
) -> PyResult<PyDataset> {
    let mut config = GeneratorConfig::default()
        .with_total_count(total_count)
        .with_outcome(OutcomeParams::new(
            intercept,
            slope_covariate,
            slope_category,
            slope_interaction,
        ))
        .with_outcome_sigma(outcome_sigma)
        .with_seed(seed);
    if let Some(groups) = groups {
        config = config.with_groups(
            groups
                .into_iter()
                .map(|(label, indicator, mean, sd)| GroupSpec::new(label, indicator, mean, sd))
                .collect(),
        );
    }

    let inner = generate(&config).map_err(to_py_err)?;
    Ok(PyDataset { inner })
}
