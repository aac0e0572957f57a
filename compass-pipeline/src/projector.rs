//! Final report projection.
//!
//! Selects, rounds, and flattens the selected candidates into the externally
//! visible rows. Projection is also the output-integrity checkpoint: a
//! candidate whose optional fields are in an impossible combination (a
//! minimum cost without a cheapest country, a selected row without a focus
//! cost) indicates a stage-wiring bug, and the run halts rather than emit
//! the corrupted row.

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{CheapestCountry, ItemComparison};

/// One country column pair in a projected row.
#[derive(Clone, Debug, Serialize)]
pub struct ProjectedComparison {
    pub country: String,
    /// Percentage, rounded to 2 decimals: -20.0 means 20% cheaper.
    /// `None` when the country had no usable cost.
    pub price_change_pct: Option<f64>,
    pub price_segment: String,
}

/// The externally visible analysis row.
#[derive(Clone, Debug, Serialize)]
pub struct ProjectedRow {
    pub item_barcode: String,
    pub department: String,
    pub section: String,
    pub family: String,
    pub subfamily: String,
    pub brand: String,
    pub brand_principal: String,
    pub focus_country: String,
    pub focus_cost: f64,
    pub focus_sales_qty: f64,
    /// One entry per non-focus registry country, in registry order.
    pub comparisons: Vec<ProjectedComparison>,
    /// Registry code of the cheapest alternative, or `NO_DATA`.
    pub cheapest_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cost_other_countries: Option<f64>,
    pub min_cost_segment: String,
    pub cost_opportunity_amount: f64,
}

/// Round to two decimals for reporting.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Project the ordered selection into report rows.
///
/// The input order (opportunity descending, barcode ascending) is preserved.
pub fn project_rows(
    candidates: &[ItemComparison],
    focus_code: &str,
) -> AnalysisResult<Vec<ProjectedRow>> {
    candidates
        .iter()
        .map(|candidate| project_row(candidate, focus_code))
        .collect()
}

fn project_row(candidate: &ItemComparison, focus_code: &str) -> AnalysisResult<ProjectedRow> {
    let barcode = &candidate.item_barcode;

    let focus_cost = candidate
        .focus_cost
        .filter(|cost| *cost > 0.0)
        .ok_or_else(|| {
            AnalysisError::Computation(format!(
                "selected item {} has no usable focus cost",
                barcode
            ))
        })?;
    let focus_sales_qty = candidate.focus_sales_qty.ok_or_else(|| {
        AnalysisError::Computation(format!("selected item {} has no focus sales volume", barcode))
    })?;

    let cheapest = candidate.cheapest_country.as_ref().ok_or_else(|| {
        AnalysisError::Computation(format!("item {} reached projection unresolved", barcode))
    })?;
    // A minimum without a cheapest country (or the reverse) means an absence
    // sentinel leaked through a numeric field somewhere upstream.
    match (cheapest, candidate.min_cost_other) {
        (CheapestCountry::Country(_), Some(_)) | (CheapestCountry::NoData, None) => {}
        (CheapestCountry::NoData, Some(min)) => {
            return Err(AnalysisError::Computation(format!(
                "item {} has minimum cost {} but no cheapest country",
                barcode, min
            )));
        }
        (CheapestCountry::Country(code), None) => {
            return Err(AnalysisError::Computation(format!(
                "item {} resolved {} as cheapest without a minimum cost",
                barcode, code
            )));
        }
    }

    let min_cost_segment = candidate.min_cost_segment.ok_or_else(|| {
        AnalysisError::Computation(format!("item {} has no minimum-cost segment", barcode))
    })?;

    let opportunity = candidate.cost_opportunity.ok_or_else(|| {
        AnalysisError::Computation(format!("item {} has no opportunity amount", barcode))
    })?;
    if opportunity < 0.0 {
        return Err(AnalysisError::Computation(format!(
            "item {} has negative opportunity {}",
            barcode, opportunity
        )));
    }

    let comparisons = candidate
        .comparisons
        .iter()
        .map(|comparison| ProjectedComparison {
            country: comparison.country.clone(),
            price_change_pct: comparison.price_change_pct.map(|pct| round2(pct * 100.0)),
            price_segment: comparison.segment.comparison_label(focus_code),
        })
        .collect();

    Ok(ProjectedRow {
        item_barcode: candidate.item_barcode.clone(),
        department: candidate.hierarchy.department.clone(),
        section: candidate.hierarchy.section.clone(),
        family: candidate.hierarchy.family.clone(),
        subfamily: candidate.hierarchy.subfamily.clone(),
        brand: candidate.hierarchy.brand.clone(),
        brand_principal: candidate.hierarchy.brand_principal.clone(),
        focus_country: focus_code.to_string(),
        focus_cost: round2(focus_cost),
        focus_sales_qty: round2(focus_sales_qty),
        comparisons,
        cheapest_country: cheapest.as_code().to_string(),
        min_cost_other_countries: candidate.min_cost_other.map(round2),
        min_cost_segment: min_cost_segment.benchmark_label().to_string(),
        cost_opportunity_amount: round2(opportunity),
    })
}
