use std::collections::BTreeMap;

use compass_core::segments::PriceSegment;
use serde::Serialize;

use crate::candidate_pipeline::HasRequestId;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Optional scoping a caller can apply to one analysis run.
#[derive(Clone, Debug, Default)]
pub struct AnalysisFilters {
    /// Drop rows whose savings opportunity falls below this amount.
    pub min_opportunity: Option<f64>,
    /// Restrict the analysis to these departments.
    pub departments: Option<Vec<String>>,
}

/// One benchmark run: a focus country over one observation snapshot.
#[derive(Clone, Debug)]
pub struct AnalysisQuery {
    pub request_id: String,
    /// Registry code of the baseline country. Validated against the registry
    /// before the pipeline runs.
    pub focus_country: String,
    /// Label of the snapshot under analysis; defaulted when left empty.
    pub snapshot_label: String,
    pub filters: Option<AnalysisFilters>,
}

impl HasRequestId for AnalysisQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Candidate types
// ---------------------------------------------------------------------------

/// Aggregated metrics for one country on one item. A country with no
/// observation for an item simply has no entry; absence is never encoded
/// as zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CountryMetrics {
    pub cost_latest: f64,
    pub cost_mean: f64,
    pub sales_qty: f64,
    pub profit: f64,
    pub sales_amt: f64,
}

impl CountryMetrics {
    /// Latest cost when usable for comparison. Non-positive costs are data
    /// defects (flagged upstream) and count as absent here.
    pub fn valid_cost(&self) -> Option<f64> {
        (self.cost_latest > 0.0).then_some(self.cost_latest)
    }
}

/// Merchandise hierarchy of an item. Functionally determined by the barcode
/// in clean data; a barcode seen under two hierarchies produces two records
/// and a duplicate-item warning.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ItemHierarchy {
    pub department: String,
    pub section: String,
    pub family: String,
    pub subfamily: String,
    pub brand: String,
    pub brand_principal: String,
}

/// One country's price comparison against the focus country.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CountryComparison {
    pub country: String,
    /// Relative change versus the focus cost; `None` when the country has no
    /// usable cost for the item.
    pub price_change_pct: Option<f64>,
    pub segment: PriceSegment,
}

/// Cheapest-alternative outcome for one item.
///
/// `NoData` exists defensively: the comparability gate already removes items
/// where every other country is silent, but the resolver still models the
/// state rather than smuggling a sentinel number through the output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum CheapestCountry {
    Country(String),
    NoData,
}

impl CheapestCountry {
    pub fn as_code(&self) -> &str {
        match self {
            CheapestCountry::Country(code) => code,
            CheapestCountry::NoData => "NO_DATA",
        }
    }
}

/// A candidate item flowing through the benchmark pipeline.
///
/// The source fills identity and the per-country metrics map; hydrators and
/// scorers populate the remaining fields stage by stage, which is why they
/// start as `None`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ItemComparison {
    pub item_barcode: String,
    pub hierarchy: ItemHierarchy,
    /// Aggregated metrics keyed by country code; a missing key means the
    /// country never observed the item.
    pub metrics: BTreeMap<String, CountryMetrics>,

    // Populated by FocusMetricsHydrator
    pub focus_cost: Option<f64>,
    pub focus_sales_qty: Option<f64>,

    // Populated by PriceComparisonScorer, in registry order
    pub comparisons: Vec<CountryComparison>,

    // Populated by CheapestCountryScorer
    pub min_cost_other: Option<f64>,
    pub cheapest_country: Option<CheapestCountry>,
    pub min_cost_segment: Option<PriceSegment>,

    // Populated by OpportunityScorer
    pub cost_opportunity: Option<f64>,
}

impl ItemComparison {
    /// Metrics for one country, if it observed the item.
    pub fn metrics_for(&self, code: &str) -> Option<&CountryMetrics> {
        self.metrics.get(code)
    }

    /// Usable cost for one country, if any.
    pub fn valid_cost_for(&self, code: &str) -> Option<f64> {
        self.metrics.get(code).and_then(CountryMetrics::valid_cost)
    }
}
