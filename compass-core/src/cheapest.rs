//! Cheapest-alternative resolution.
//!
//! Finds the minimum-cost country other than the focus country. Absence is
//! modeled with `Option`, not with an oversized sentinel value: countries
//! without a usable cost simply do not participate in the fold, and an item
//! where no other country has a cost resolves to `None`.

use crate::registry::{Country, CountryRegistry};

/// Resolve the cheapest non-focus country for one item.
///
/// `cost_of` supplies the usable cost for a country, or `None` when the
/// country has no observation for the item. The fold walks the registry in
/// declaration order and only replaces the current best on a strictly lower
/// cost, so ties resolve to the earliest declared country regardless of how
/// the costs are stored. Non-finite costs are ignored; they would otherwise
/// poison the comparison.
pub fn resolve_cheapest<'a, F>(
    registry: &'a CountryRegistry,
    focus_code: &'a str,
    cost_of: F,
) -> Option<(&'a Country, f64)>
where
    F: Fn(&Country) -> Option<f64>,
{
    let mut best: Option<(&Country, f64)> = None;
    for country in registry.others(focus_code) {
        let Some(cost) = cost_of(country) else {
            continue;
        };
        if !cost.is_finite() {
            continue;
        }
        match best {
            Some((_, current)) if cost >= current => {}
            _ => best = Some((country, cost)),
        }
    }
    best
}
