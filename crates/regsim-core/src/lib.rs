// =============================================================================
// RegSim Core Library
// =============================================================================
//
// Pure Rust core for simulating a two-group teaching dataset and fitting it
// with ordinary least squares. No Python code involved.
//
// STRUCTURE:
// ----------
//   - dataset:   Sample / Dataset / CategoryCoding (explicit label → 0/1 map)
//   - simulate:  Seeded generator for the covariate and outcome columns
//   - formula:   Terms, ModelSpec and an R-style formula parser
//   - design:    Dataset → design matrix, excluding incomplete rows
//   - solvers:   QR-based OLS with a numerical rank check
//   - inference: p-values, critical values, confidence intervals
//   - model:     The linear fitter tying the above together
//   - describe:  Central tendency and dispersion, overall or per group
//   - summary:   R-style text rendering of a fit
//   - io:        CSV export / import
//   - error:     Error types used throughout the library
//
// A TYPICAL SESSION:
// ------------------
//
//     let data = generate(&GeneratorConfig::default())?;
//     let fit  = fit_formula(&data, "outcome ~ covariate * category_indicator",
//                            &FitConfig::default())?;
//     println!("{}", fit);
//
// FOR MAINTAINERS:
// ----------------
// When adding new functionality:
//   1. Add it to the appropriate module (or create a new one)
//   2. Write tests in that module (see existing tests for examples)
//   3. Re-export public items here so users can access them easily
//   4. Update the Python bindings in the `regsim` crate
//
// =============================================================================

pub mod convert;
pub mod dataset;
pub mod describe;
pub mod design;
pub mod error;
pub mod formula;
pub mod inference;
pub mod io;
pub mod model;
pub mod simulate;
pub mod solvers;
pub mod summary;

// Users can write `use regsim_core::generate` instead of
// `use regsim_core::simulate::generate`
pub use dataset::{CategoryCoding, Dataset, Field, Sample};
pub use describe::{
    describe, describe_by_group, describe_dataset, describe_field, Describe, FieldDescription,
    GroupDescribe,
};
pub use design::{build_design_matrix, DesignMatrix, INTERCEPT_NAME};
pub use error::{RegSimError, Result};
pub use formula::{parse_formula, ModelSpec, ParsedFormula, Term};
pub use inference::{confidence_interval_t, pvalue_f, pvalue_t, t_critical};
pub use io::{from_csv_str, read_csv, read_csv_path, to_csv_string, write_csv, write_csv_path};
pub use model::{fit, fit_formula, generating_model, FitConfig, FitResult, TermEstimate};
pub use simulate::{generate, GeneratorConfig, GroupSpec, OutcomeParams};
pub use solvers::{fit_ols, OlsResult};
