// =============================================================================
// RegSim Python Bindings
// =============================================================================
//
// This module creates the bridge between Rust and Python using PyO3.
// It wraps the pure Rust code from `regsim-core` and exposes it as
// a Python module that can be imported with `import regsim`.
//
// HOW THIS WORKS:
// ---------------
// 1. PyO3 lets us define Python classes and functions in Rust
// 2. When Python imports the module, it loads the compiled Rust code
// 3. Python objects get converted to/from Rust types automatically
//
// STRUCTURE:
// ----------
// - dataset_py:  Dataset class and the seeded generator
// - fitting_py:  formula-based OLS fitting
// - results_py:  FitResults class (params, bse, pvalues, conf_int, summary)
// - io_py:       CSV import / export
// - describe_py: descriptive statistics per group
//
// FOR MAINTAINERS:
// ----------------
// When adding new functionality:
// 1. Implement the logic in `regsim-core` first
// 2. Create a Python wrapper here that calls the Rust code
// 3. Add it to the module in the `_regsim` function at the bottom
//
// =============================================================================

use pyo3::prelude::*;
use pyo3::exceptions::PyValueError;

use regsim_core::RegSimError;

mod dataset_py;
pub mod describe_py;
mod fitting_py;
mod io_py;
mod results_py;

pub use dataset_py::{generate_py, PyDataset};
pub use fitting_py::fit_py;
pub use io_py::{read_csv_py, write_csv_py};
pub use results_py::PyFitResults;

/// Every core error surfaces in Python as ValueError with the same message.
pub(crate) fn to_py_err(e: RegSimError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// =============================================================================
// Module Registration
// =============================================================================

/// RegSim: simulated two-group data and OLS fitting with a Rust backend
///
/// This is the internal Rust module. Users should import from the
/// Python wrapper: `import regsim`
#[pymodule]
fn _regsim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDataset>()?;
    m.add_class::<PyFitResults>()?;

    m.add_function(wrap_pyfunction!(generate_py, m)?)?;
    m.add_function(wrap_pyfunction!(fit_py, m)?)?;
    m.add_function(wrap_pyfunction!(read_csv_py, m)?)?;
    m.add_function(wrap_pyfunction!(write_csv_py, m)?)?;
    m.add_function(wrap_pyfunction!(describe_py::describe_py, m)?)?;

    Ok(())
}
