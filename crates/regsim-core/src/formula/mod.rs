//! Model terms and R-style formula parsing.
//!
//! A model is an ordered list of terms over the dataset's numeric fields.
//! It can be built directly or parsed from a formula such as
//! `"outcome ~ covariate * category_indicator"`.

use std::collections::HashSet;
use std::fmt;

use crate::dataset::{Field, Sample};
use crate::error::{RegSimError, Result};

/// One design-matrix column (the intercept is implicit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    /// Raw field value.
    Field(Field),
    /// Elementwise product of two fields.
    Interaction(Field, Field),
}

impl Term {
    /// Column name: `covariate`, or `covariate:category_indicator`.
    pub fn name(&self) -> String {
        match self {
            Term::Field(f) => f.name().to_string(),
            Term::Interaction(a, b) => format!("{}:{}", a.name(), b.name()),
        }
    }

    /// Fields this term reads.
    pub fn fields(&self) -> Vec<Field> {
        match *self {
            Term::Field(f) => vec![f],
            Term::Interaction(a, b) if a == b => vec![a],
            Term::Interaction(a, b) => vec![a, b],
        }
    }

    /// Term value for one row; `None` if any input is missing.
    pub fn evaluate(&self, sample: &Sample) -> Option<f64> {
        match *self {
            Term::Field(f) => sample.value(f),
            Term::Interaction(a, b) => Some(sample.value(a)? * sample.value(b)?),
        }
    }

    /// Identity under formula algebra: `a:b` ≡ `b:a` and `a:a` ≡ `a`.
    fn canonical(&self) -> (Field, Option<Field>) {
        match *self {
            Term::Field(f) => (f, None),
            Term::Interaction(a, b) if a == b => (a, None),
            Term::Interaction(a, b) => (a.min(b), Some(a.max(b))),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Ordered predictor specification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelSpec {
    terms: Vec<Term>,
}

impl ModelSpec {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    /// `a + b + a:b`
    pub fn full_interaction(a: Field, b: Field) -> Self {
        Self::new(vec![Term::Field(a), Term::Field(b), Term::Interaction(a, b)])
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Distinct fields referenced by any term, in first-use order.
    pub fn fields(&self) -> Vec<Field> {
        let mut seen = Vec::new();
        for field in self.terms.iter().flat_map(|t| t.fields()) {
            if !seen.contains(&field) {
                seen.push(field);
            }
        }
        seen
    }

    /// Reject specs whose columns are identical by construction.
    ///
    /// `x + x`, `x:z + z:x` and `x + x:x` all describe the same column twice,
    /// which can never be estimated.
    pub fn check_structure(&self) -> Result<()> {
        let mut seen: HashSet<(Field, Option<Field>)> = HashSet::new();
        for term in &self.terms {
            if !seen.insert(term.canonical()) {
                return Err(RegSimError::RankDeficiency(format!(
                    "term '{}' duplicates an earlier term",
                    term
                )));
            }
        }
        Ok(())
    }
}

/// Result of parsing a formula.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFormula {
    pub response: Field,
    pub spec: ModelSpec,
}

/// Parse a two-way interaction factor list like `a:b` or `a*b`.
fn parse_pair(term: &str, sep: char) -> Result<(Field, Field)> {
    let factors: Vec<&str> = term.split(sep).map(str::trim).collect();
    if factors.len() != 2 {
        return Err(RegSimError::FormulaError(format!(
            "only two-way interactions are supported: '{}'",
            term
        )));
    }
    Ok((factors[0].parse()?, factors[1].parse()?))
}

/// Append a main effect unless it is already present.
fn push_main(terms: &mut Vec<Term>, field: Field) {
    if !terms.contains(&Term::Field(field)) {
        terms.push(Term::Field(field));
    }
}

/// Append `a:b` unless `a:b` or `b:a` is already present.
///
/// A self-interaction `a:a` is always appended so `a + a:a` still fails the
/// structural check.
fn push_interaction(terms: &mut Vec<Term>, a: Field, b: Field) {
    let term = Term::Interaction(a, b);
    let repeated = a != b
        && terms
            .iter()
            .any(|t| matches!(t, Term::Interaction(..)) && t.canonical() == term.canonical());
    if !repeated {
        terms.push(term);
    }
}

/// Parse a formula string into a response field and model spec.
///
/// Handles:
/// - Main effects: `covariate`
/// - Pure interactions: `covariate:category_indicator`
/// - Full interactions: `a*b` = `a + b + a:b`
/// - An explicit `1` (the intercept is always present)
///
/// Repeated main effects and repeated two-field interactions (`a:b + b:a`,
/// `a:b + a*b`) collapse to their first occurrence. Self-interactions are
/// kept as written so that `x + x:x` reaches the rank check.
///
/// # Example
/// ```
/// use regsim_core::formula::{parse_formula, Term};
/// use regsim_core::Field;
/// let parsed = parse_formula("outcome ~ covariate * category_indicator").unwrap();
/// assert_eq!(parsed.response, Field::Outcome);
/// assert_eq!(parsed.spec.terms()[2], Term::Interaction(Field::Covariate, Field::CategoryIndicator));
/// ```
pub fn parse_formula(formula: &str) -> Result<ParsedFormula> {
    let parts: Vec<&str> = formula.split('~').collect();
    if parts.len() != 2 {
        return Err(RegSimError::FormulaError(format!(
            "formula must contain exactly one '~': {}",
            formula
        )));
    }

    let response: Field = parts[0].trim().parse()?;
    let rhs = parts[1].trim();

    if rhs.starts_with("0 +") || rhs.starts_with("0+") || rhs.ends_with("-1") || rhs.ends_with("- 1") {
        return Err(RegSimError::FormulaError(
            "models without an intercept are not supported".to_string(),
        ));
    }

    let mut terms: Vec<Term> = Vec::new();

    for raw in rhs.split('+').map(str::trim) {
        if raw.is_empty() {
            return Err(RegSimError::FormulaError(format!(
                "empty term in formula: {}",
                formula
            )));
        }
        if raw == "1" {
            continue;
        }

        if raw.contains('*') {
            let (a, b) = parse_pair(raw, '*')?;
            push_main(&mut terms, a);
            push_main(&mut terms, b);
            push_interaction(&mut terms, a, b);
        } else if raw.contains(':') {
            let (a, b) = parse_pair(raw, ':')?;
            push_interaction(&mut terms, a, b);
        } else {
            push_main(&mut terms, raw.parse()?);
        }
    }

    if terms.iter().flat_map(|t| t.fields()).any(|f| f == response) {
        return Err(RegSimError::FormulaError(format!(
            "response '{}' also appears as a predictor",
            response
        )));
    }

    Ok(ParsedFormula {
        response,
        spec: ModelSpec::new(terms),
    })
}
