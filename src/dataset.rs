//! In-memory panel dataset: one record per region, a fixed set of named
//! numeric fields, and pure projection/filter operations.
//!
//! The dataset is an immutable snapshot. Construction (reading a source file,
//! renaming columns, dropping rows without a valid identifier) is the
//! loader's job; the analysis engine only consumes a finished `Dataset`.
//! Missing or undefined observations are carried as non-finite `f64` values
//! (`NaN`, `±inf`) and handled downstream by [`crate::impute`].

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// The dependent variable of the panel: gross regional product.
pub const TARGET_FIELD: &str = "grp";

/// Candidate independent variables, in presentation order.
pub const CANDIDATE_FIELDS: [&str; 7] = [
    "assets",
    "investments",
    "employment",
    "enterprises",
    "income",
    "new_assets",
    "retail",
];

/// All numeric fields of the panel (target plus candidates).
pub const NUMERIC_FIELDS: [&str; 8] = [
    "grp",
    "assets",
    "investments",
    "employment",
    "enterprises",
    "income",
    "new_assets",
    "retail",
];

/// Errors raised when a dataset cannot be constructed or queried.
#[derive(Debug, Error)]
pub enum DataError {
    /// The dataset has no records; there is nothing to analyze.
    #[error("dataset contains no records")]
    Empty,

    /// A requested field is not part of the dataset's field set.
    #[error("unknown field `{0}`")]
    UnknownField(String),

    /// A record's field set differs from the rest of the dataset.
    #[error("record `{region}` does not match the dataset field set")]
    FieldMismatch { region: String },
}

/// One row of the panel: a region label plus its numeric observations.
///
/// Region labels are not required to be unique.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Region label, e.g. an oblast name.
    pub region: String,
    values: BTreeMap<String, f64>,
}

impl Record {
    /// Create a record from a region label and its field values.
    pub fn new(region: impl Into<String>, values: BTreeMap<String, f64>) -> Self {
        Self {
            region: region.into(),
            values,
        }
    }

    /// Look up a single field value.
    pub fn value(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }

    /// Iterate over the record's field names.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Immutable snapshot of the cleaned panel.
///
/// Invariant: every record carries exactly the same field set, enforced at
/// construction. The snapshot is recreated per analysis request; nothing is
/// cached or shared across requests.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    records: Vec<Record>,
    fields: Vec<String>,
}

impl Dataset {
    /// Build a dataset from records, validating the shared-field invariant.
    ///
    /// # Errors
    ///
    /// - [`DataError::Empty`] if `records` is empty
    /// - [`DataError::FieldMismatch`] if any record's field set differs from
    ///   the first record's
    pub fn new(records: Vec<Record>) -> Result<Self, DataError> {
        let first = records.first().ok_or(DataError::Empty)?;
        let fields: Vec<String> = first.values.keys().cloned().collect();

        for record in &records[1..] {
            let same = record.values.len() == fields.len()
                && record.values.keys().zip(&fields).all(|(a, b)| a == b);
            if !same {
                return Err(DataError::FieldMismatch {
                    region: record.region.clone(),
                });
            }
        }

        Ok(Self { records, fields })
    }

    /// Number of records (regions) in the panel.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the panel holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records, in their original row order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The shared field set, sorted by name.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether `field` is part of the dataset's field set.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Region labels in row order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.region.as_str())
    }

    /// Extract a full column of values for one field, in row order.
    ///
    /// # Errors
    ///
    /// [`DataError::UnknownField`] if the field is not in the field set.
    pub fn column(&self, field: &str) -> Result<Vec<f64>, DataError> {
        if !self.has_field(field) {
            return Err(DataError::UnknownField(field.to_string()));
        }
        Ok(self
            .records
            .iter()
            .map(|r| r.value(field).unwrap_or(f64::NAN))
            .collect())
    }

    /// Replace the records wholesale, keeping the field set.
    ///
    /// Internal constructor used by imputation, which already upholds the
    /// shared-field invariant.
    pub(crate) fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            records,
            fields: self.fields.clone(),
        }
    }

    /// Filter/compare operation: project the requested regions down to the
    /// requested fields.
    ///
    /// Pure projection, no statistics. Row order of the dataset is preserved;
    /// regions not present in the panel are silently absent from the result,
    /// and a region label that occurs twice yields two slices.
    ///
    /// # Errors
    ///
    /// [`DataError::UnknownField`] if any requested field is unknown.
    pub fn compare(&self, regions: &[&str], fields: &[&str]) -> Result<Vec<RegionSlice>, DataError> {
        for field in fields {
            if !self.has_field(field) {
                return Err(DataError::UnknownField((*field).to_string()));
            }
        }

        let slices = self
            .records
            .iter()
            .filter(|r| regions.contains(&r.region.as_str()))
            .map(|r| RegionSlice {
                region: r.region.clone(),
                values: fields
                    .iter()
                    .map(|&f| (f.to_string(), r.value(f).unwrap_or(f64::NAN)))
                    .collect(),
            })
            .collect();

        Ok(slices)
    }
}

/// One region restricted to a requested subset of fields.
///
/// Serializes flat, as `{"region": ..., "<field>": ...}` with only the
/// requested fields present.
#[derive(Debug, Clone, Serialize)]
pub struct RegionSlice {
    /// Region label.
    pub region: String,
    /// Requested field values.
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl RegionSlice {
    /// Look up a projected field value.
    pub fn value(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }
}
