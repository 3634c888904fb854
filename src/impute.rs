//! Mean imputation of non-finite values.
//!
//! The regression paths cannot tolerate `NaN` or `±inf` in their design
//! matrices, so selected fields are imputed with the field mean over the
//! finite observations. The transform is pure: the input dataset is never
//! mutated, and the same input always yields the same output.

use crate::dataset::{DataError, Dataset, Record};

/// Replace non-finite values in `fields` with each field's mean over its
/// finite values.
///
/// A field whose values are all non-finite has no defined mean; its values
/// fall back to 0.0. Fields outside `fields` pass through untouched.
///
/// # Errors
///
/// [`DataError::UnknownField`] if any requested field is not in the dataset.
pub fn impute(dataset: &Dataset, fields: &[&str]) -> Result<Dataset, DataError> {
    let mut replacements = Vec::with_capacity(fields.len());

    for &field in fields {
        let column = dataset.column(field)?;
        let finite: Vec<f64> = column.into_iter().filter(|v| v.is_finite()).collect();
        let fill = if finite.is_empty() {
            0.0
        } else {
            finite.iter().sum::<f64>() / finite.len() as f64
        };
        replacements.push((field, fill));
    }

    let records = dataset
        .records()
        .iter()
        .map(|record| {
            let mut values: std::collections::BTreeMap<String, f64> = record
                .fields()
                .map(|f| (f.to_string(), record.value(f).unwrap_or(f64::NAN)))
                .collect();

            for &(field, fill) in &replacements {
                let entry = values.get_mut(field).expect("field validated above");
                if !entry.is_finite() {
                    *entry = fill;
                }
            }

            Record::new(record.region.clone(), values)
        })
        .collect();

    Ok(dataset.with_records(records))
}
