// =============================================================================
// Design Matrix Construction
// =============================================================================
//
// Turns a Dataset plus a ModelSpec into the numeric pieces OLS needs:
//
//     X = [ 1  t₁(row)  t₂(row)  ... ]     one row per complete observation
//     y = response(row)
//
// where each tⱼ is a raw field value or the product of two fields.
//
// MISSING VALUES
// --------------
// A row missing the response or any field a term reads is dropped, never
// filled in. The number of dropped rows travels with the matrix so the fit
// can report it.
//
// =============================================================================

use ndarray::{Array1, Array2};

use crate::dataset::{Dataset, Field, Sample};
use crate::error::{RegSimError, Result};
use crate::formula::ModelSpec;

/// Name of the leading column of ones.
pub const INTERCEPT_NAME: &str = "(Intercept)";

/// Numeric model inputs for the complete rows of a dataset.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    /// n × (terms + 1), intercept first
    pub x: Array2<f64>,
    /// Response for the same n rows
    pub y: Array1<f64>,
    /// `(Intercept)` followed by one name per term
    pub column_names: Vec<String>,
    /// Dataset row index of each design-matrix row
    pub included_rows: Vec<usize>,
    /// Rows dropped for missing values
    pub excluded_rows: usize,
}

impl DesignMatrix {
    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }
}

/// Intercept plus term values for one row; `None` if anything is missing.
fn design_row(sample: &Sample, response: Field, spec: &ModelSpec) -> Option<(Vec<f64>, f64)> {
    let y = sample.value(response)?;
    let mut row = Vec::with_capacity(spec.len() + 1);
    row.push(1.0);
    for term in spec.terms() {
        row.push(term.evaluate(sample)?);
    }
    Some((row, y))
}

/// Build the design matrix and response vector.
///
/// # Errors
/// - `InsufficientData` if the dataset is empty
/// - `InvalidConfiguration` if the response is also used as a predictor
pub fn build_design_matrix(
    dataset: &Dataset,
    response: Field,
    spec: &ModelSpec,
) -> Result<DesignMatrix> {
    if dataset.is_empty() {
        return Err(RegSimError::InsufficientData("dataset is empty".to_string()));
    }
    if spec.fields().contains(&response) {
        return Err(RegSimError::InvalidConfiguration(format!(
            "response '{}' cannot also be a predictor",
            response
        )));
    }

    let p = spec.len() + 1;
    let mut values: Vec<f64> = Vec::with_capacity(dataset.len() * p);
    let mut y: Vec<f64> = Vec::with_capacity(dataset.len());
    let mut included_rows = Vec::with_capacity(dataset.len());

    for (i, sample) in dataset.samples().iter().enumerate() {
        if let Some((row, yi)) = design_row(sample, response, spec) {
            values.extend(row);
            y.push(yi);
            included_rows.push(i);
        }
    }

    let n = y.len();
    let x = Array2::from_shape_vec((n, p), values)
        .map_err(|e| RegSimError::DimensionMismatch(e.to_string()))?;

    let mut column_names = Vec::with_capacity(p);
    column_names.push(INTERCEPT_NAME.to_string());
    column_names.extend(spec.terms().iter().map(|t| t.name()));

    Ok(DesignMatrix {
        x,
        y: Array1::from_vec(y),
        column_names,
        excluded_rows: dataset.len() - n,
        included_rows,
    })
}

// =============================================================================
// Tests
// =============================================================================
