//! Named exogenous columns shared by series, models and the ensemble.

use crate::error::{ForecastError, Result};
use std::collections::BTreeMap;

/// Covariate columns keyed by name.
///
/// A `BTreeMap` keeps the column order stable, which fixes the order of the
/// corresponding regression coefficients.
pub type Covariates = BTreeMap<String, Vec<f64>>;

/// Slice every covariate column to `start..end`.
pub fn slice_covariates(covariates: &Covariates, start: usize, end: usize) -> Result<Covariates> {
    covariates
        .iter()
        .map(|(name, values)| {
            values
                .get(start..end)
                .map(|s| (name.clone(), s.to_vec()))
                .ok_or(ForecastError::IndexOutOfBounds {
                    index: end,
                    size: values.len(),
                })
        })
        .collect()
}

/// Check that each of `names` is present with at least `len` values.
pub fn validate_covariates(covariates: &Covariates, names: &[String], len: usize) -> Result<()> {
    for name in names {
        let values = covariates.get(name).ok_or_else(|| {
            ForecastError::InvalidParameter(format!("missing covariate '{}'", name))
        })?;
        if values.len() < len {
            return Err(ForecastError::InsufficientData {
                needed: len,
                got: values.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Covariates {
        let mut c = Covariates::new();
        c.insert("b".to_string(), vec![1.0, 2.0, 3.0, 4.0]);
        c.insert("a".to_string(), vec![5.0, 6.0, 7.0, 8.0]);
        c
    }

    #[test]
    fn columns_iterate_in_name_order() {
        let names: Vec<_> = sample().keys().cloned().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn slicing_applies_to_every_column() {
        let sliced = slice_covariates(&sample(), 1, 3).unwrap();
        assert_eq!(sliced["a"], vec![6.0, 7.0]);
        assert_eq!(sliced["b"], vec![2.0, 3.0]);
        assert!(slice_covariates(&sample(), 2, 9).is_err());
    }

    #[test]
    fn validation_reports_missing_and_short_columns() {
        let c = sample();
        assert!(validate_covariates(&c, &["a".to_string()], 4).is_ok());
        assert!(matches!(
            validate_covariates(&c, &["z".to_string()], 1),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            validate_covariates(&c, &["a".to_string()], 5),
            Err(ForecastError::InsufficientData { needed: 5, got: 4 })
        ));
    }
}
