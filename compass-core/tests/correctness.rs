//! Correctness tests for compass-core.
//!
//! Validates that:
//! 1. Band boundaries sit exactly where reporting expects them
//! 2. Cheapest-country resolution is deterministic and order-stable
//! 3. Opportunity arithmetic composes with resolution without going negative

use std::collections::HashMap;

use compass_core::registry::CountryRegistry;
use compass_core::segments::PriceSegment;
use compass_core::{classify, cost_opportunity, relative_change, resolve_cheapest};

fn cost_map(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|&(c, v)| (c.to_string(), v)).collect()
}

// ---------------------------------------------------------------------------
// Banding
// ---------------------------------------------------------------------------

#[test]
fn classification_is_a_total_function_over_the_bands() {
    // One representative per band plus every boundary.
    let cases = [
        (-0.5, PriceSegment::Cheaper),
        (-1e-9, PriceSegment::Cheaper),
        (0.0, PriceSegment::Within10),
        (0.05, PriceSegment::Within10),
        (0.10, PriceSegment::Within10),
        (0.17, PriceSegment::Within25),
        (0.25, PriceSegment::Within25),
        (0.33, PriceSegment::Within50),
        (0.50, PriceSegment::Within50),
        (0.51, PriceSegment::Above50),
        (7.0, PriceSegment::Above50),
    ];
    for (change, expected) in cases {
        assert_eq!(classify(change), expected, "change {}", change);
    }
}

#[test]
fn banding_composes_with_relative_change() {
    // UAE at 80 vs KSA at 100 is a 20% saving.
    assert_eq!(classify(relative_change(80.0, 100.0)), PriceSegment::Cheaper);
    // EGYPT at 120 vs KSA at 100 lands in the 10-25% band.
    assert_eq!(
        classify(relative_change(120.0, 100.0)),
        PriceSegment::Within25
    );
}

// ---------------------------------------------------------------------------
// Cheapest resolution
// ---------------------------------------------------------------------------

#[test]
fn resolution_is_independent_of_cost_storage_order() {
    let registry = CountryRegistry::builtin();
    let forward = cost_map(&[("UAE", 64.0), ("EGYPT", 64.0), ("OMAN", 91.0)]);
    let reversed = cost_map(&[("OMAN", 91.0), ("EGYPT", 64.0), ("UAE", 64.0)]);

    let pick = |map: &HashMap<String, f64>| {
        resolve_cheapest(&registry, "KSA", |c| map.get(&c.code).copied())
            .map(|(country, cost)| (country.code.clone(), cost))
    };

    assert_eq!(pick(&forward), pick(&reversed));
    assert_eq!(pick(&forward).unwrap().0, "UAE");
}

#[test]
fn resolution_is_idempotent() {
    let registry = CountryRegistry::builtin();
    let map = cost_map(&[("QATAR", 12.5), ("BAHRAIN", 12.5), ("IRAQ", 30.0)]);
    let first = resolve_cheapest(&registry, "EGYPT", |c| map.get(&c.code).copied())
        .map(|(country, cost)| (country.code.clone(), cost));
    for _ in 0..10 {
        let again = resolve_cheapest(&registry, "EGYPT", |c| map.get(&c.code).copied())
            .map(|(country, cost)| (country.code.clone(), cost));
        assert_eq!(first, again);
    }
}

// ---------------------------------------------------------------------------
// Opportunity composition
// ---------------------------------------------------------------------------

#[test]
fn resolved_minimum_never_produces_negative_opportunity() {
    let registry = CountryRegistry::builtin();
    let snapshots = [
        cost_map(&[("UAE", 80.0), ("EGYPT", 120.0)]),
        cost_map(&[("UAE", 150.0), ("EGYPT", 160.0)]),
        cost_map(&[("IRAQ", 100.0)]),
    ];
    for map in &snapshots {
        if let Some((_, min_cost)) =
            resolve_cheapest(&registry, "KSA", |c| map.get(&c.code).copied())
        {
            for focus_cost in [0.0, 50.0, 100.0, 200.0] {
                for qty in [0.0, 1.0, 50.0] {
                    assert!(cost_opportunity(focus_cost, min_cost, qty) >= 0.0);
                }
            }
        }
    }
}

#[test]
fn reference_scenario_resolves_end_to_end() {
    // Roster costs {KSA: 100, UAE: 80, EGYPT: 120}, focus KSA, 50 units sold.
    let registry = CountryRegistry::builtin();
    let map = cost_map(&[("KSA", 100.0), ("UAE", 80.0), ("EGYPT", 120.0)]);

    let (cheapest, min_cost) =
        resolve_cheapest(&registry, "KSA", |c| map.get(&c.code).copied()).unwrap();
    assert_eq!(cheapest.code, "UAE");
    assert!((min_cost - 80.0).abs() < 1e-9);
    assert_eq!(classify(relative_change(min_cost, 100.0)), PriceSegment::Cheaper);
    assert!((cost_opportunity(100.0, min_cost, 50.0) - 1000.0).abs() < 1e-9);
}
