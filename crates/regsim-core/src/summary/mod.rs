// =============================================================================
// Fit Summary
// =============================================================================
//
// Renders a FitResult as the familiar R `summary(lm(...))` table:
//
//     Call:
//     outcome ~ covariate + category_indicator + covariate:category_indicator
//
//     Residuals:
//          Min       1Q   Median       3Q      Max
//      ...
//
//     Coefficients:
//                     Estimate  Std. Error  t value  Pr(>|t|)      2.5 %   97.5 %
//     (Intercept)     ...
//     ---
//     Signif. codes:  0 '***' 0.001 '**' 0.01 '*' 0.05 '.' 0.1 ' ' 1
//
//     Residual standard error: ... on ... degrees of freedom
//     Multiple R-squared: ...,  Adjusted R-squared: ...
//     F-statistic: ... on ... and ... DF,  p-value: ...
//
// =============================================================================

use std::fmt;

use crate::dataset::Field;
use crate::formula::ModelSpec;
use crate::inference::significance_stars;
use crate::model::FitResult;

/// p-values below this print as "<2.2e-16".
const P_FLOOR: f64 = 2.2e-16;

/// `response ~ term + term + ...`, with `1` for an intercept-only model.
pub fn formula_text(response: Field, spec: &ModelSpec) -> String {
    let rhs = if spec.is_empty() {
        "1".to_string()
    } else {
        spec.terms()
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(" + ")
    };
    format!("{} ~ {}", response, rhs)
}

/// p-value column text.
pub fn format_pvalue(p: f64) -> String {
    if p.is_nan() {
        "NaN".to_string()
    } else if p < P_FLOOR {
        format!("<{:.1e}", P_FLOOR)
    } else if p < 1e-4 {
        format!("{:.2e}", p)
    } else {
        format!("{:.4}", p)
    }
}

fn percent_label(q: f64) -> String {
    // 0.025 -> "2.5 %", 0.975 -> "97.5 %"
    let pct = format!("{:.3}", q * 100.0);
    let pct = pct.trim_end_matches('0').trim_end_matches('.');
    format!("{} %", pct)
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Call:")?;
        writeln!(f, "{}", formula_text(self.response, &self.spec))?;
        writeln!(f)?;

        // ---------------------------------------------------------------------
        // Residual quantiles
        // ---------------------------------------------------------------------
        let r = &self.residuals;
        writeln!(f, "Residuals:")?;
        writeln!(f, "{:>10} {:>10} {:>10} {:>10} {:>10}", "Min", "1Q", "Median", "3Q", "Max")?;
        writeln!(
            f,
            "{:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            r.min, r.q1, r.median, r.q3, r.max
        )?;
        writeln!(f)?;

        // ---------------------------------------------------------------------
        // Coefficient table
        // ---------------------------------------------------------------------
        let alpha = 1.0 - self.confidence_level;
        let name_width = self
            .terms
            .iter()
            .map(|t| t.name.len())
            .max()
            .unwrap_or(0)
            .max(11);

        writeln!(f, "Coefficients:")?;
        writeln!(
            f,
            "{:<w$} {:>12} {:>12} {:>9} {:>10}     {:>12} {:>12}",
            "",
            "Estimate",
            "Std. Error",
            "t value",
            "Pr(>|t|)",
            percent_label(alpha / 2.0),
            percent_label(1.0 - alpha / 2.0),
            w = name_width
        )?;
        for t in &self.terms {
            writeln!(
                f,
                "{:<w$} {:>12.5} {:>12.5} {:>9.3} {:>10} {:<4} {:>12.5} {:>12.5}",
                t.name,
                t.estimate,
                t.std_error,
                t.t_value,
                format_pvalue(t.p_value),
                significance_stars(t.p_value),
                t.ci_lower,
                t.ci_upper,
                w = name_width
            )?;
        }
        writeln!(f, "---")?;
        writeln!(f, "Signif. codes:  0 '***' 0.001 '**' 0.01 '*' 0.05 '.' 0.1 ' ' 1")?;
        writeln!(f)?;

        // ---------------------------------------------------------------------
        // Whole-model statistics
        // ---------------------------------------------------------------------
        writeln!(
            f,
            "Residual standard error: {:.4} on {} degrees of freedom",
            self.residual_std_error, self.df_resid
        )?;
        if self.excluded_rows > 0 {
            let noun = if self.excluded_rows == 1 { "observation" } else { "observations" };
            writeln!(f, "  ({} {} deleted due to missingness)", self.excluded_rows, noun)?;
        }
        writeln!(
            f,
            "Multiple R-squared: {:.4},  Adjusted R-squared: {:.4}",
            self.r_squared, self.adj_r_squared
        )?;
        if let (Some(fstat), Some(p)) = (self.f_statistic, self.f_pvalue) {
            writeln!(
                f,
                "F-statistic: {:.2} on {} and {} DF,  p-value: {}",
                fstat,
                self.df_model(),
                self.df_resid,
                format_pvalue(p)
            )?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::model::{fit, generating_model, FitConfig};
    use crate::simulate::{generate, GeneratorConfig};

    #[test]
    fn test_formula_text() {
        assert_eq!(
            formula_text(Field::Outcome, &generating_model()),
            "outcome ~ covariate + category_indicator + covariate:category_indicator"
        );
        assert_eq!(formula_text(Field::Outcome, &ModelSpec::default()), "outcome ~ 1");
    }

    #[test]
    fn test_format_pvalue() {
        assert_eq!(format_pvalue(0.04321), "0.0432");
        assert_eq!(format_pvalue(1.5e-6), "1.50e-6");
        assert_eq!(format_pvalue(0.0), "<2.2e-16");
        assert_eq!(format_pvalue(f64::NAN), "NaN");
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(percent_label(0.025), "2.5 %");
        assert_eq!(percent_label(0.975), "97.5 %");
        assert_eq!(percent_label(0.05), "5 %");
    }

    #[test]
    fn test_summary_sections() {
        let ds = generate(&GeneratorConfig::default()).unwrap();
        let mut samples = ds.samples().to_vec();
        samples[0].outcome = None;
        let ds = Dataset::new(ds.coding().clone(), samples).unwrap();

        let result = fit(&ds, Field::Outcome, &generating_model(), &FitConfig::default()).unwrap();
        let text = result.to_string();

        assert!(text.contains("outcome ~ covariate + category_indicator"));
        assert!(text.contains("Residuals:"));
        assert!(text.contains("(Intercept)"));
        assert!(text.contains("covariate:category_indicator"));
        assert!(text.contains("2.5 %"));
        assert!(text.contains("97.5 %"));
        assert!(text.contains("Signif. codes"));
        assert!(text.contains("on 195 degrees of freedom"));
        assert!(text.contains("(1 observation deleted due to missingness)"));
        assert!(text.contains("F-statistic:"));
        // Intercept of ~170 with sigma 3 is overwhelmingly significant
        let intercept_line = text.lines().find(|l| l.starts_with("(Intercept)")).unwrap();
        assert!(intercept_line.contains("***"));
    }
}
