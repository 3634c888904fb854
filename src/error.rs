//! Crate-level error taxonomy for the analysis API.
//!
//! Two failure classes cross the API boundary:
//!
//! - **No data to analyze**: the supplied dataset is empty or lacks a
//!   requested field. Hard failure; there is nothing to render.
//! - **Computation fault**: a malformed request shape reached the solver
//!   (mismatched row counts between design and target). Surfaced with an
//!   explanatory message, never retried.
//!
//! Degenerate fits and degenerate VIF diagnostics are deliberately *not*
//! errors: they are recovered locally into renderable fallback values
//! ([`crate::model::FitOutcome::Degenerate`], [`crate::vif::DEGENERATE_VIF`]).

use thiserror::Error;

use crate::dataset::DataError;
use crate::ols::OlsError;

/// Error surfaced by the analysis operations.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The dataset is unusable: empty, or missing a requested field.
    #[error("no data to analyze: {0}")]
    Data(#[from] DataError),

    /// An internal numerical fault from a malformed request shape.
    #[error("computation fault: {0}")]
    Computation(#[from] OlsError),
}
