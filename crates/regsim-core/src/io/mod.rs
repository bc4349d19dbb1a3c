// =============================================================================
// Tabular Export / Import
// =============================================================================
//
// A Dataset on disk is a comma-delimited file with a fixed header:
//
//     category,category_indicator,covariate,outcome
//     A,1,104.2818391,186.5063914
//     B,0,,160.2112027          <- missing covariate is an empty field
//
// Floats are written with shortest round-trip formatting, so exporting,
// importing and exporting again reproduces the first file byte for byte.
//
// The coding is never guessed from the file. The caller supplies it, and
// every row must agree with it.
//
// =============================================================================

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::dataset::{check_row, CategoryCoding, Dataset, Field, Sample};
use crate::error::{RegSimError, Result};

/// Column names in file order.
pub const HEADER: [&str; 4] = [
    "category",
    Field::CategoryIndicator.name(),
    Field::Covariate.name(),
    Field::Outcome.name(),
];

// =============================================================================
// Export
// =============================================================================

/// Write `dataset` as CSV with a header row.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    if dataset.is_empty() {
        // serde only emits the header alongside the first record
        wtr.write_record(HEADER)?;
    }
    for sample in dataset.samples() {
        wtr.serialize(sample)?;
    }
    wtr.flush()?;
    log::debug!("wrote {} rows", dataset.len());
    Ok(())
}

pub fn to_csv_string(dataset: &Dataset) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    String::from_utf8(buf).map_err(|e| RegSimError::Parse {
        line: 0,
        message: e.to_string(),
    })
}

pub fn write_csv_path(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    write_csv(dataset, file)
}

// =============================================================================
// Import
// =============================================================================

/// Read a CSV written by [`write_csv`], validating every row against `coding`.
///
/// # Errors
/// - `Parse` for a wrong header, a malformed value, an unknown category
///   label or an indicator that disagrees with `coding` (with the 1-based
///   line number)
/// - `Csv` / `Io` for reader failures
pub fn read_csv<R: Read>(reader: R, coding: &CategoryCoding) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    check_header(&headers)?;

    let mut samples = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        let sample: Sample = record
            .deserialize(Some(&headers))
            .map_err(|e| RegSimError::Parse {
                line,
                message: e.to_string(),
            })?;
        if [sample.covariate, sample.outcome]
            .iter()
            .flatten()
            .any(|v| !v.is_finite())
        {
            return Err(RegSimError::Parse {
                line,
                message: "numeric values must be finite".to_string(),
            });
        }
        check_row(coding, &sample).map_err(|message| RegSimError::Parse { line, message })?;
        samples.push(sample);
    }

    log::debug!("read {} rows", samples.len());
    Dataset::new(coding.clone(), samples)
}

pub fn from_csv_str(text: &str, coding: &CategoryCoding) -> Result<Dataset> {
    read_csv(text.as_bytes(), coding)
}

pub fn read_csv_path(path: impl AsRef<Path>, coding: &CategoryCoding) -> Result<Dataset> {
    let file = File::open(path)?;
    read_csv(file, coding)
}

fn check_header(headers: &StringRecord) -> Result<()> {
    let expected = HEADER;
    if headers.iter().ne(expected.iter().copied()) {
        return Err(RegSimError::Parse {
            line: 1,
            message: format!(
                "expected header '{}', found '{}'",
                expected.join(","),
                headers.iter().collect::<Vec<_>>().join(",")
            ),
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
