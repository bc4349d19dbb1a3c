// =============================================================================
// Dataset: Typed Two-Group Table
// =============================================================================
//
// One row per individual, with a fixed schema:
//
//     category | category_indicator | covariate | outcome
//     ---------+--------------------+-----------+--------
//     "A"      | 1                  | 103.2     | 211.7
//     "B"      | 0                  | 78.9      | 193.4
//
// THE REFERENCE-GROUP HAZARD
// --------------------------
// Statistical packages that turn a text column into 0/1 dummies usually pick
// the reference level alphabetically. Relabel the groups and the sign of every
// category coefficient silently flips. Here the label → indicator mapping is a
// required, validated input (`CategoryCoding`) and every row is checked
// against it, so there is no default ordering to get wrong.
//
// Numeric fields are `Option<f64>`: `None` is a missing value. Missing values
// only arise from imported or hand-built tables; the generator never makes them.
//
// =============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RegSimError, Result};

// =============================================================================
// Fields
// =============================================================================

/// Numeric fields that model terms may refer to.
///
/// `category` is not one of them; categories enter a model through
/// `CategoryIndicator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CategoryIndicator,
    Covariate,
    Outcome,
}

impl Field {
    /// All numeric fields, in column order.
    pub const ALL: [Field; 3] = [Field::CategoryIndicator, Field::Covariate, Field::Outcome];

    /// Column name as it appears in formulas and CSV headers.
    pub const fn name(&self) -> &'static str {
        match self {
            Field::CategoryIndicator => "category_indicator",
            Field::Covariate => "covariate",
            Field::Outcome => "outcome",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = RegSimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "category_indicator" => Ok(Field::CategoryIndicator),
            "covariate" => Ok(Field::Covariate),
            "outcome" => Ok(Field::Outcome),
            other => Err(RegSimError::UnknownField(other.to_string())),
        }
    }
}

// =============================================================================
// Category Coding
// =============================================================================

/// Explicit bijection between the two category labels and {0, 1}.
///
/// Labels keep the order the caller gave them; that order is used wherever
/// groups are listed (generation, group sizes, descriptive summaries).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCoding {
    levels: Vec<(String, u8)>,
}

impl CategoryCoding {
    /// Build a coding from `(label, indicator)` pairs.
    ///
    /// Requires exactly two pairs with distinct, non-empty labels whose
    /// indicators are 0 and 1 (in either order).
    ///
    /// # Example
    /// ```
    /// use regsim_core::CategoryCoding;
    /// let coding = CategoryCoding::new([("A", 1), ("B", 0)]).unwrap();
    /// assert_eq!(coding.indicator("A"), Some(1));
    /// assert_eq!(coding.reference_label(), "B");
    /// ```
    pub fn new<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<String>,
    {
        let levels: Vec<(String, u8)> = pairs
            .into_iter()
            .map(|(label, indicator)| (label.into(), indicator))
            .collect();

        if levels.len() != 2 {
            return Err(RegSimError::InvalidConfiguration(format!(
                "category coding needs exactly 2 labels, got {}",
                levels.len()
            )));
        }
        if levels.iter().any(|(label, _)| label.trim().is_empty()) {
            return Err(RegSimError::InvalidConfiguration(
                "category labels must be non-empty".to_string(),
            ));
        }
        if levels[0].0 == levels[1].0 {
            return Err(RegSimError::InvalidConfiguration(format!(
                "category labels must be distinct, got '{}' twice",
                levels[0].0
            )));
        }
        let mut indicators = [levels[0].1, levels[1].1];
        indicators.sort_unstable();
        if indicators != [0, 1] {
            return Err(RegSimError::InvalidConfiguration(format!(
                "category indicators must be 0 and 1, got {} and {}",
                levels[0].1, levels[1].1
            )));
        }

        Ok(Self { levels })
    }

    /// Indicator assigned to `label`, if the label is known.
    pub fn indicator(&self, label: &str) -> Option<u8> {
        self.levels
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, indicator)| indicator)
    }

    /// Label carrying `indicator`, if any.
    pub fn label(&self, indicator: u8) -> Option<&str> {
        self.levels
            .iter()
            .find(|&&(_, i)| i == indicator)
            .map(|(label, _)| label.as_str())
    }

    /// The label coded 0, i.e. the group absorbed by the intercept.
    pub fn reference_label(&self) -> &str {
        // Validated in `new`: exactly one level has indicator 0.
        self.label(0).unwrap_or(self.levels[0].0.as_str())
    }

    /// Labels in caller order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|(label, _)| label.as_str())
    }

    /// `(label, indicator)` pairs in caller order.
    pub fn levels(&self) -> &[(String, u8)] {
        &self.levels
    }
}

// =============================================================================
// Sample
// =============================================================================

/// One individual.
///
/// Field names double as CSV column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub category: String,
    pub category_indicator: u8,
    pub covariate: Option<f64>,
    pub outcome: Option<f64>,
}

impl Sample {
    pub fn new(
        category: impl Into<String>,
        category_indicator: u8,
        covariate: Option<f64>,
        outcome: Option<f64>,
    ) -> Self {
        Self {
            category: category.into(),
            category_indicator,
            covariate,
            outcome,
        }
    }

    /// Numeric value of `field`, `None` if missing.
    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::CategoryIndicator => Some(f64::from(self.category_indicator)),
            Field::Covariate => self.covariate,
            Field::Outcome => self.outcome,
        }
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Ordered, immutable collection of samples sharing one category coding.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    coding: CategoryCoding,
    samples: Vec<Sample>,
}

impl Dataset {
    /// Assemble a dataset, checking every row against `coding`.
    ///
    /// Fails with `InvalidConfiguration` if a row's label is not in the
    /// coding or its indicator disagrees with it.
    pub fn new(coding: CategoryCoding, samples: Vec<Sample>) -> Result<Self> {
        for (row, sample) in samples.iter().enumerate() {
            check_row(&coding, sample).map_err(|msg| {
                RegSimError::InvalidConfiguration(format!("row {}: {}", row, msg))
            })?;
        }
        Ok(Self { coding, samples })
    }

    pub fn coding(&self) -> &CategoryCoding {
        &self.coding
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Value of `field` in row `row`; `None` if the row is out of range or the
    /// value is missing.
    pub fn value(&self, row: usize, field: Field) -> Option<f64> {
        self.samples.get(row).and_then(|s| s.value(field))
    }

    /// Whole column of `field`, preserving missing values.
    pub fn column(&self, field: Field) -> Vec<Option<f64>> {
        self.samples.iter().map(|s| s.value(field)).collect()
    }

    /// Samples whose category is `label`, in dataset order.
    pub fn samples_in<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Sample> + 'a {
        self.samples.iter().filter(move |s| s.category == label)
    }

    /// Row count per label, in coding order.
    pub fn group_sizes(&self) -> Vec<(String, usize)> {
        self.coding
            .labels()
            .map(|label| (label.to_string(), self.samples_in(label).count()))
            .collect()
    }
}

/// Validate one row against a coding; returns a message on failure.
pub(crate) fn check_row(coding: &CategoryCoding, sample: &Sample) -> std::result::Result<(), String> {
    match coding.indicator(&sample.category) {
        None => Err(format!(
            "unknown category '{}' (coding has: {})",
            sample.category,
            coding.labels().collect::<Vec<_>>().join(", ")
        )),
        Some(expected) if expected != sample.category_indicator => Err(format!(
            "category '{}' has indicator {} but the coding maps it to {}",
            sample.category, sample.category_indicator, expected
        )),
        Some(_) => Ok(()),
    }
}

// =============================================================================
// Tests
// =============================================================================
