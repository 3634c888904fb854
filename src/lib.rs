//! Multicollinearity diagnostics and OLS modelling over a small fixed panel
//! of regional economic indicators.
//!
//! The crate is the statistical engine behind a regional-economy dashboard:
//! pairwise Pearson correlations, Variance Inflation Factor diagnostics,
//! ordinary-least-squares fitting with mean imputation of missing values, and
//! point prediction from fitted coefficients. Dataset acquisition and result
//! serialization belong to the surrounding service layer; every operation
//! here is a pure function of an in-memory [`dataset::Dataset`] snapshot.
//!
//! # Example
//!
//! ```rust,ignore
//! use regiostat::prelude::*;
//!
//! let dataset = loader::load()?; // external loader's job
//!
//! let corr = correlation_matrix(&dataset, &NUMERIC_FIELDS)?;
//! let vif = vif_report(&dataset, &CANDIDATE_FIELDS)?;
//!
//! // Model on the three least collinear candidates.
//! let chosen = vif.least_collinear(3);
//! let outcome = fit_model(&dataset, TARGET_FIELD, &chosen)?;
//!
//! let prediction = predict(outcome.model(), &request_values);
//! println!("predicted grp = {}", prediction.value);
//! ```

pub mod correlation;
pub mod dataset;
pub mod error;
pub mod impute;
pub mod model;
pub mod ols;
pub mod predict;
pub mod vif;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::correlation::{correlation_matrix, CorrelationMatrix};
    pub use crate::dataset::{
        DataError, Dataset, Record, RegionSlice, CANDIDATE_FIELDS, NUMERIC_FIELDS, TARGET_FIELD,
    };
    pub use crate::error::AnalysisError;
    pub use crate::impute::impute;
    pub use crate::model::{fit_model, Coefficient, FitOutcome, FittedModel, RegionFit};
    pub use crate::predict::{predict, Prediction};
    pub use crate::vif::{vif_report, VifEntry, VifReport, DEGENERATE_VIF};
}

pub use crate::correlation::{correlation_matrix, CorrelationMatrix};
pub use crate::dataset::{DataError, Dataset, Record, RegionSlice};
pub use crate::error::AnalysisError;
pub use crate::impute::impute;
pub use crate::model::{fit_model, FitOutcome, FittedModel};
pub use crate::predict::{predict, Prediction};
pub use crate::vif::{vif_report, VifReport, DEGENERATE_VIF};
