// =============================================================================
// Descriptive Statistics
// =============================================================================
//
// Central tendency and dispersion for a column, overall or per group:
//
//   - mean, median               (where is the data?)
//   - variance, std_dev          (how spread out? sample versions, n − 1)
//   - min, q1, q3, max           (five-number summary with the median)
//
// Quartiles use statrs' order statistics (R's type-8, median-unbiased
// estimator), so they may differ slightly from R's default `quantile()`
// on small samples.
//
// =============================================================================

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Max, Median, Min, OrderStatistics};

use crate::dataset::{Dataset, Field};

/// Summary of one numeric sample. Every statistic is NaN when `count == 0`;
/// the variance and standard deviation are NaN when `count < 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub q3: f64,
    pub max: f64,
}

impl Describe {
    /// Interquartile range q3 − q1.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Range max − min.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Describe a slice of values. Non-finite values are the caller's concern.
pub fn describe(values: &[f64]) -> Describe {
    if values.is_empty() {
        return Describe {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            variance: f64::NAN,
            std_dev: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
        };
    }

    let mut data = Data::new(values.to_vec());
    let variance = data.variance().unwrap_or(f64::NAN);

    Describe {
        count: values.len(),
        mean: data.mean().unwrap_or(f64::NAN),
        median: data.median(),
        variance,
        std_dev: variance.sqrt(),
        min: data.min(),
        q1: data.lower_quartile(),
        q3: data.upper_quartile(),
        max: data.max(),
    }
}

/// Per-group summary of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDescribe {
    pub label: String,
    pub indicator: u8,
    /// Rows in the group whose value is missing
    pub missing: usize,
    pub stats: Describe,
}

/// Describe `field` separately for each category, in coding order.
///
/// Missing values are skipped and counted.
pub fn describe_by_group(dataset: &Dataset, field: Field) -> Vec<GroupDescribe> {
    dataset
        .coding()
        .levels()
        .iter()
        .map(|(label, indicator)| {
            let column: Vec<Option<f64>> = dataset.samples_in(label).map(|s| s.value(field)).collect();
            let values: Vec<f64> = column.iter().flatten().copied().collect();
            GroupDescribe {
                label: label.clone(),
                indicator: *indicator,
                missing: column.len() - values.len(),
                stats: describe(&values),
            }
        })
        .collect()
}

/// Describe `field` over the whole dataset, skipping missing values.
pub fn describe_field(dataset: &Dataset, field: Field) -> Describe {
    let values: Vec<f64> = dataset.column(field).into_iter().flatten().collect();
    describe(&values)
}

/// Per-group summaries with the whole-dataset summary kept beside them, so
/// a group label never shadows the overall entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescription {
    pub groups: Vec<GroupDescribe>,
    pub all: Describe,
}

/// [`describe_by_group`] and [`describe_field`] for one field.
pub fn describe_dataset(dataset: &Dataset, field: Field) -> FieldDescription {
    FieldDescription {
        groups: describe_by_group(dataset, field),
        all: describe_field(dataset, field),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CategoryCoding, Sample};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_describe_basic() {
        let d = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(d.count, 8);
        assert_abs_diff_eq!(d.mean, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.median, 4.5, epsilon = 1e-12);
        // Sample variance: Σ(x − 5)² / 7 = 32 / 7
        assert_abs_diff_eq!(d.variance, 32.0 / 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.std_dev, (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_eq!(d.min, 2.0);
        assert_eq!(d.max, 9.0);
        assert_eq!(d.range(), 7.0);
        assert!(d.q1 <= d.median && d.median <= d.q3);
        assert!(d.iqr() >= 0.0);
    }

    #[test]
    fn test_describe_odd_median() {
        let d = describe(&[3.0, 1.0, 2.0]);
        assert_abs_diff_eq!(d.median, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_describe_empty_and_single() {
        let empty = describe(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());

        let one = describe(&[42.0]);
        assert_eq!(one.mean, 42.0);
        assert_eq!(one.median, 42.0);
        assert!(one.variance.is_nan());
    }

    #[test]
    fn test_describe_by_group() {
        let ds = Dataset::new(
            CategoryCoding::new([("A", 1), ("B", 0)]).unwrap(),
            vec![
                Sample::new("A", 1, Some(10.0), None),
                Sample::new("A", 1, Some(20.0), None),
                Sample::new("B", 0, Some(1.0), None),
                Sample::new("B", 0, None, None),
                Sample::new("B", 0, Some(3.0), None),
            ],
        )
        .unwrap();

        let groups = describe_by_group(&ds, Field::Covariate);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "A");
        assert_eq!(groups[0].indicator, 1);
        assert_abs_diff_eq!(groups[0].stats.mean, 15.0, epsilon = 1e-12);
        assert_eq!(groups[1].missing, 1);
        assert_eq!(groups[1].stats.count, 2);
        assert_abs_diff_eq!(groups[1].stats.mean, 2.0, epsilon = 1e-12);

        let overall = describe_field(&ds, Field::Covariate);
        assert_eq!(overall.count, 4);
        assert_abs_diff_eq!(overall.mean, 8.5, epsilon = 1e-12);

        let outcome = describe_field(&ds, Field::Outcome);
        assert_eq!(outcome.count, 0);
    }

    #[test]
    fn test_group_labelled_all_keeps_overall_summary() {
        let ds = Dataset::new(
            CategoryCoding::new([("all", 1), ("rest", 0)]).unwrap(),
            vec![
                Sample::new("all", 1, Some(1.0), None),
                Sample::new("rest", 0, Some(3.0), None),
                Sample::new("rest", 0, Some(5.0), None),
            ],
        )
        .unwrap();

        let desc = describe_dataset(&ds, Field::Covariate);
        assert_eq!(desc.groups[0].label, "all");
        assert_eq!(desc.groups[0].stats.count, 1);
        assert_eq!(desc.all.count, 3);
        assert_abs_diff_eq!(desc.all.mean, 3.0, epsilon = 1e-12);

        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["all"]["count"], 3);
        assert_eq!(json["groups"][0]["label"], "all");
        assert_eq!(json["groups"][0]["stats"]["count"], 1);
    }
}
