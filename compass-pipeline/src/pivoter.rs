//! Long-to-wide reshaping of the observation snapshot.
//!
//! Groups per-country-per-item rows by (barcode, hierarchy) and reduces each
//! group into one wide record holding a metrics block per observing country.
//! All reducers are associative and commutative (max, sum, mean via
//! sum-and-count), so the pivot is safe under any merge order.
//!
//! Diagnostics are collected, not thrown: duplicate barcodes, non-positive
//! costs, and unrecognized country codes all surface as warnings in the
//! outcome while the pivot itself proceeds.

use std::collections::{BTreeMap, HashMap};

use compass_core::registry::CountryRegistry;

use crate::error::DataQualityWarning;
use crate::observation_loader::RawObservation;
use crate::types::{CountryMetrics, ItemHierarchy};

/// One wide record per (barcode, hierarchy) group.
#[derive(Clone, Debug, Default)]
pub struct WideItemRecord {
    pub item_barcode: String,
    pub hierarchy: ItemHierarchy,
    /// Metrics keyed by country code; countries without observations for the
    /// item have no entry.
    pub metrics: BTreeMap<String, CountryMetrics>,
}

/// Pivot output: wide records plus the diagnostics gathered along the way.
#[derive(Debug, Default)]
pub struct PivotOutcome {
    pub records: Vec<WideItemRecord>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Running reduction for one (group, country) cell.
#[derive(Clone, Debug, Default)]
struct MetricsAccumulator {
    cost_latest_max: Option<f64>,
    cost_mean_sum: f64,
    rows: usize,
    sales_qty: f64,
    profit: f64,
    sales_amt: f64,
}

impl MetricsAccumulator {
    fn absorb(&mut self, observation: &RawObservation) {
        // Max is the documented deterministic pick for duplicated latest
        // costs; averaging would invent a price nobody reported.
        self.cost_latest_max = Some(match self.cost_latest_max {
            Some(current) => current.max(observation.cost_latest),
            None => observation.cost_latest,
        });
        self.cost_mean_sum += observation.cost_mean;
        self.rows += 1;
        self.sales_qty += observation.sales_qty;
        self.profit += observation.profit;
        self.sales_amt += observation.sales_amt;
    }

    fn finish(self) -> CountryMetrics {
        CountryMetrics {
            cost_latest: self.cost_latest_max.unwrap_or_default(),
            cost_mean: self.cost_mean_sum / self.rows.max(1) as f64,
            sales_qty: self.sales_qty,
            profit: self.profit,
            sales_amt: self.sales_amt,
        }
    }
}

/// Pivot a snapshot into wide records, one per (barcode, hierarchy) group.
pub fn pivot_observations(
    observations: &[RawObservation],
    registry: &CountryRegistry,
) -> PivotOutcome {
    let mut warnings = Vec::new();
    let mut unrecognized: BTreeMap<String, usize> = BTreeMap::new();
    let mut groups: HashMap<(String, ItemHierarchy), BTreeMap<String, MetricsAccumulator>> =
        HashMap::new();

    for observation in observations {
        if !registry.contains(&observation.country) {
            *unrecognized.entry(observation.country.clone()).or_insert(0) += 1;
            continue;
        }
        if observation.cost_latest <= 0.0 {
            warnings.push(DataQualityWarning::NonPositiveCost {
                country: observation.country.clone(),
                item_barcode: observation.item_barcode.clone(),
                cost_latest: observation.cost_latest,
            });
        }
        groups
            .entry((observation.item_barcode.clone(), observation.hierarchy()))
            .or_default()
            .entry(observation.country.clone())
            .or_default()
            .absorb(observation);
    }

    let mut records: Vec<WideItemRecord> = groups
        .into_iter()
        .map(|((item_barcode, hierarchy), by_country)| WideItemRecord {
            item_barcode,
            hierarchy,
            metrics: by_country
                .into_iter()
                .map(|(country, accumulator)| (country, accumulator.finish()))
                .collect(),
        })
        .collect();
    // Deterministic output order regardless of input order or hash seeds.
    records.sort_by(|a, b| {
        a.item_barcode
            .cmp(&b.item_barcode)
            .then_with(|| a.hierarchy.cmp(&b.hierarchy))
    });

    // A barcode spread across groups means its hierarchy is inconsistent in
    // the source; surface it instead of merging or dropping either side.
    let mut groups_per_barcode: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &records {
        *groups_per_barcode.entry(&record.item_barcode).or_insert(0) += 1;
    }
    for (item_barcode, group_count) in groups_per_barcode {
        if group_count > 1 {
            log::warn!(
                "item {} groups under {} distinct hierarchies",
                item_barcode,
                group_count
            );
            warnings.push(DataQualityWarning::DuplicateItem {
                item_barcode: item_barcode.to_string(),
                group_count,
            });
        }
    }

    for (country, count) in unrecognized {
        log::warn!(
            "excluded {} observations for unrecognized country {}",
            count,
            country
        );
        warnings.push(DataQualityWarning::UnrecognizedCountry {
            country,
            observations: count,
        });
    }

    PivotOutcome { records, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(
        country: &str,
        barcode: &str,
        department: &str,
        cost_latest: f64,
        cost_mean: f64,
        sales_qty: f64,
    ) -> RawObservation {
        RawObservation {
            country: country.into(),
            item_barcode: barcode.into(),
            department: department.into(),
            section: "SECTION".into(),
            family: "FAMILY".into(),
            subfamily: "SUBFAMILY".into(),
            brand: "BRAND".into(),
            brand_principal: "PRINCIPAL".into(),
            cost_latest,
            cost_mean,
            sales_qty,
            profit: 10.0,
            sales_amt: 100.0,
        }
    }

    #[test]
    fn one_record_per_item_with_one_block_per_country() {
        let registry = CountryRegistry::builtin();
        let observations = vec![
            observation("KSA", "111", "GROCERY", 100.0, 98.0, 50.0),
            observation("UAE", "111", "GROCERY", 80.0, 81.0, 30.0),
            observation("KSA", "222", "GROCERY", 45.0, 44.0, 200.0),
        ];
        let outcome = pivot_observations(&observations, &registry);

        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.warnings.is_empty());

        let first = &outcome.records[0];
        assert_eq!(first.item_barcode, "111");
        assert_eq!(first.metrics.len(), 2);
        assert!((first.metrics["KSA"].cost_latest - 100.0).abs() < 1e-9);
        assert!((first.metrics["UAE"].cost_latest - 80.0).abs() < 1e-9);
        // Absent country data stays absent, never zero.
        assert!(!first.metrics.contains_key("EGYPT"));
    }

    #[test]
    fn duplicate_rows_reduce_with_max_mean_and_sum() {
        let registry = CountryRegistry::builtin();
        let observations = vec![
            observation("KSA", "111", "GROCERY", 100.0, 90.0, 50.0),
            observation("KSA", "111", "GROCERY", 95.0, 110.0, 25.0),
        ];
        let outcome = pivot_observations(&observations, &registry);
        assert_eq!(outcome.records.len(), 1);

        let metrics = &outcome.records[0].metrics["KSA"];
        // cost_latest takes the max, not an average.
        assert!((metrics.cost_latest - 100.0).abs() < 1e-9);
        assert!((metrics.cost_mean - 100.0).abs() < 1e-9);
        assert!((metrics.sales_qty - 75.0).abs() < 1e-9);
        assert!((metrics.profit - 20.0).abs() < 1e-9);
        assert!((metrics.sales_amt - 200.0).abs() < 1e-9);
    }

    #[test]
    fn conflicting_hierarchies_produce_two_records_and_a_warning() {
        let registry = CountryRegistry::builtin();
        let observations = vec![
            observation("KSA", "111", "GROCERY", 100.0, 98.0, 50.0),
            observation("UAE", "111", "FMCG", 80.0, 81.0, 30.0),
        ];
        let outcome = pivot_observations(&observations, &registry);

        assert_eq!(outcome.records.len(), 2, "must not merge or drop either side");
        assert!(outcome.warnings.iter().any(|w| matches!(
            w,
            DataQualityWarning::DuplicateItem { item_barcode, group_count }
                if item_barcode == "111" && *group_count == 2
        )));
    }

    #[test]
    fn non_positive_costs_are_flagged_but_still_pivoted() {
        let registry = CountryRegistry::builtin();
        let observations = vec![observation("KSA", "111", "GROCERY", 0.0, 0.0, 50.0)];
        let outcome = pivot_observations(&observations, &registry);

        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.records[0].metrics["KSA"].valid_cost().is_none());
        assert!(outcome.warnings.iter().any(|w| matches!(
            w,
            DataQualityWarning::NonPositiveCost { country, .. } if country == "KSA"
        )));
    }

    #[test]
    fn unrecognized_countries_are_excluded_and_reported() {
        let registry = CountryRegistry::builtin();
        let observations = vec![
            observation("KSA", "111", "GROCERY", 100.0, 98.0, 50.0),
            observation("MARS", "111", "GROCERY", 1.0, 1.0, 1.0),
            observation("MARS", "222", "GROCERY", 1.0, 1.0, 1.0),
        ];
        let outcome = pivot_observations(&observations, &registry);

        assert_eq!(outcome.records.len(), 1);
        assert!(!outcome.records[0].metrics.contains_key("MARS"));
        assert!(outcome.warnings.iter().any(|w| matches!(
            w,
            DataQualityWarning::UnrecognizedCountry { country, observations }
                if country == "MARS" && *observations == 2
        )));
    }

    #[test]
    fn output_order_is_stable_across_input_orders() {
        let registry = CountryRegistry::builtin();
        let mut observations = vec![
            observation("KSA", "333", "GROCERY", 10.0, 10.0, 1.0),
            observation("KSA", "111", "GROCERY", 10.0, 10.0, 1.0),
            observation("KSA", "222", "GROCERY", 10.0, 10.0, 1.0),
        ];
        let forward = pivot_observations(&observations, &registry);
        observations.reverse();
        let backward = pivot_observations(&observations, &registry);

        let barcodes = |outcome: &PivotOutcome| {
            outcome
                .records
                .iter()
                .map(|r| r.item_barcode.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(barcodes(&forward), vec!["111", "222", "333"]);
        assert_eq!(barcodes(&forward), barcodes(&backward));
    }
}
