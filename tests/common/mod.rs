//! Shared panel builders for integration tests.

use std::collections::BTreeMap;

use regiostat::dataset::{Dataset, Record};

/// Build a dataset from parallel columns, labelling rows `R00`, `R01`, ...
pub fn panel_from_columns(columns: &[(&str, &[f64])]) -> Dataset {
    let n = columns[0].1.len();
    let regions: Vec<String> = (0..n).map(|i| format!("R{i:02}")).collect();
    let region_refs: Vec<&str> = regions.iter().map(String::as_str).collect();
    labeled_panel(&region_refs, columns)
}

/// Build a dataset with explicit region labels.
pub fn labeled_panel(regions: &[&str], columns: &[(&str, &[f64])]) -> Dataset {
    let records = regions
        .iter()
        .enumerate()
        .map(|(i, &region)| {
            let values: BTreeMap<String, f64> = columns
                .iter()
                .map(|&(name, col)| (name.to_string(), col[i]))
                .collect();
            Record::new(region, values)
        })
        .collect();
    Dataset::new(records).expect("valid test dataset")
}

/// Panel of three mutually near-orthogonal variables plus a `grp` target.
///
/// Incommensurate sine frequencies keep pairwise correlations close to zero
/// for moderate `n`.
pub fn independent_panel(n: usize) -> Dataset {
    let x1: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin()).collect();
    let x2: Vec<f64> = (0..n).map(|i| (i as f64 * 0.53).cos()).collect();
    let x3: Vec<f64> = (0..n).map(|i| (i as f64 * 0.71 + 0.9).sin()).collect();
    let grp: Vec<f64> = (0..n)
        .map(|i| 4.0 + 2.0 * x1[i] - 1.5 * x2[i] + 0.5 * x3[i])
        .collect();

    panel_from_columns(&[("x1", &x1), ("x2", &x2), ("x3", &x3), ("grp", &grp)])
}
