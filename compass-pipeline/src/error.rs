//! Analysis error and warning taxonomy.
//!
//! Fatal conditions get named variants. Data-quality findings are a separate
//! non-fatal type that travels alongside results so callers can inspect them
//! without the run aborting.

use std::fmt;

use compass_core::registry::UnknownCountryError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The requested focus country is not in the registry. Nothing is
    /// computed.
    #[error(transparent)]
    UnknownCountry(#[from] UnknownCountryError),

    /// An output-integrity invariant failed while assembling rows, e.g. a
    /// minimum cost present for an item whose cheapest country resolved to
    /// no-data. Halting is deliberate: the alternative is shipping corrupted
    /// numbers.
    #[error("Output integrity violation: {0}")]
    Computation(String),
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Non-fatal findings about the snapshot, collected during a run and
/// returned with the results.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum DataQualityWarning {
    /// One barcode grouped under more than one hierarchy.
    DuplicateItem {
        item_barcode: String,
        group_count: usize,
    },
    /// An observation carried a non-positive latest cost; it is excluded
    /// from comparisons and minimums.
    NonPositiveCost {
        country: String,
        item_barcode: String,
        cost_latest: f64,
    },
    /// Observations referenced a country outside the registry and were
    /// excluded from the pivot.
    UnrecognizedCountry { country: String, observations: usize },
    /// No item survived the comparability gate for the focus country.
    NoComparableItems { focus_country: String },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::DuplicateItem {
                item_barcode,
                group_count,
            } => write!(
                f,
                "item {} appears under {} distinct hierarchies",
                item_barcode, group_count
            ),
            DataQualityWarning::NonPositiveCost {
                country,
                item_barcode,
                cost_latest,
            } => write!(
                f,
                "non-positive cost {} for item {} in {}",
                cost_latest, item_barcode, country
            ),
            DataQualityWarning::UnrecognizedCountry {
                country,
                observations,
            } => write!(
                f,
                "{} observations for unrecognized country {}",
                observations, country
            ),
            DataQualityWarning::NoComparableItems { focus_country } => write!(
                f,
                "no items were comparable for focus country {}",
                focus_country
            ),
        }
    }
}
