use log::debug;
use polars::prelude::*;

use crate::error::{HeartRiskError, Result};
use crate::records::{FEATURES, TARGET};

/// Fail early when the input lacks one of the required columns.
pub fn check_columns(df: &DataFrame) -> Result<()> {
    let names = df.get_column_names();
    for required in FEATURES.iter().chain(std::iter::once(&TARGET)) {
        if !names.contains(required) {
            return Err(HeartRiskError::MissingColumn {
                column: required.to_string(),
            });
        }
    }
    Ok(())
}

pub fn missing_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|s| s.null_count()).sum()
}

/// Drop exact duplicate rows, keeping the first occurrence in input order.
pub fn drop_duplicates(df: DataFrame) -> Result<DataFrame> {
    let before = df.height();
    let deduped = df
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;
    debug!("dropped {} duplicate rows", before - deduped.height());
    Ok(deduped)
}

/// Replace missing feature values with the column median.
pub fn impute_median(df: DataFrame) -> Result<DataFrame> {
    let fills: Vec<Expr> = FEATURES
        .iter()
        .map(|name| col(name).fill_null(col(name).median()))
        .collect();

    Ok(df.lazy().with_columns(fills).collect()?)
}

/// Keep only the schema columns, drop duplicates, and optionally impute.
/// Imputation can turn distinct rows into equal ones, so duplicates are
/// dropped again afterwards.
pub fn clean(df: DataFrame, impute: bool) -> Result<DataFrame> {
    check_columns(&df)?;
    let mut columns: Vec<&str> = FEATURES.to_vec();
    columns.push(TARGET);
    let df = df.select(columns)?;

    let df = drop_duplicates(df)?;
    if impute {
        let missing = missing_count(&df);
        if missing > 0 {
            debug!("imputing {} missing values by column median", missing);
        }
        drop_duplicates(impute_median(df)?)
    } else {
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ages: &[Option<f64>], targets: &[i32]) -> DataFrame {
        let mut columns = Vec::new();
        for name in FEATURES {
            if name == "age" {
                columns.push(Series::new(name, ages.to_vec()));
            } else {
                columns.push(Series::new(name, vec![1.0f64; ages.len()]));
            }
        }
        columns.push(Series::new(TARGET, targets.to_vec()));
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_drop_duplicates_keeps_first_in_order() {
        let df = frame(
            &[Some(50.0), Some(40.0), Some(50.0), Some(60.0)],
            &[1, 0, 1, 0],
        );
        let cleaned = drop_duplicates(df).unwrap();
        let ages: Vec<Option<f64>> = cleaned
            .column("age")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ages, vec![Some(50.0), Some(40.0), Some(60.0)]);
    }

    #[test]
    fn test_rows_differing_only_in_label_are_kept() {
        let df = frame(&[Some(50.0), Some(50.0)], &[1, 0]);
        assert_eq!(drop_duplicates(df).unwrap().height(), 2);
    }

    #[test]
    fn test_impute_median_fills_missing() {
        let df = frame(&[Some(40.0), None, Some(60.0), Some(50.0)], &[0, 1, 0, 1]);
        let cleaned = impute_median(df).unwrap();
        assert_eq!(missing_count(&cleaned), 0);
        let ages = cleaned.column("age").unwrap().f64().unwrap();
        assert_eq!(ages.get(1), Some(50.0));
    }

    #[test]
    fn test_clean_leaves_no_duplicates_or_missing() {
        let df = frame(
            &[Some(40.0), None, Some(40.0), None, Some(70.0)],
            &[0, 1, 0, 1, 1],
        );
        let cleaned = clean(df, true).unwrap();
        assert_eq!(cleaned.height(), 3);
        assert_eq!(missing_count(&cleaned), 0);
        let height = cleaned.height();
        assert_eq!(drop_duplicates(cleaned).unwrap().height(), height);
    }

    #[test]
    fn test_rows_equal_after_imputation_are_deduplicated() {
        let df = frame(&[Some(50.0), None], &[1, 1]);
        let cleaned = clean(df, true).unwrap();
        assert_eq!(cleaned.height(), 1);
        let ages = cleaned.column("age").unwrap().f64().unwrap();
        assert_eq!(ages.get(0), Some(50.0));
        let height = cleaned.height();
        assert_eq!(drop_duplicates(cleaned).unwrap().height(), height);
    }

    #[test]
    fn test_clean_without_impute_keeps_missing() {
        let df = frame(&[Some(40.0), None], &[0, 1]);
        let cleaned = clean(df, false).unwrap();
        assert_eq!(missing_count(&cleaned), 1);
    }

    #[test]
    fn test_clean_empty_is_valid() {
        let df = frame(&[], &[]);
        let cleaned = clean(df, true).unwrap();
        assert_eq!(cleaned.height(), 0);
    }

    #[test]
    fn test_clean_rejects_missing_column() {
        let df = df!("age" => &[1.0f64]).unwrap();
        let err = clean(df, true).unwrap_err();
        assert!(matches!(err, HeartRiskError::MissingColumn { .. }));
    }
}
