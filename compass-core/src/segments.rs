//! Price-band classification.
//!
//! A relative change is banded into one of five segments plus `NotAvailable`
//! for countries with no usable cost. Upper bounds are inclusive: a change of
//! exactly 0.10 is still `Within10`, and a change of exactly 0 is `Within10`,
//! not `Cheaper`. Both boundary placements are load-bearing for reporting
//! parity and are pinned by tests.

use serde::Serialize;

/// Relative price band for one country versus the focus country.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PriceSegment {
    /// The other country is cheaper than the focus country.
    Cheaper,
    /// More expensive by 0-10%.
    Within10,
    /// More expensive by 10-25%.
    Within25,
    /// More expensive by 25-50%.
    Within50,
    /// More expensive by over 50%.
    Above50,
    /// No cost observed for the other country.
    NotAvailable,
}

/// Relative change of another country's cost versus the focus cost.
pub fn relative_change(other_cost: f64, focus_cost: f64) -> f64 {
    other_cost / focus_cost - 1.0
}

/// Band a relative change.
pub fn classify(change: f64) -> PriceSegment {
    if change < 0.0 {
        PriceSegment::Cheaper
    } else if change <= 0.10 {
        PriceSegment::Within10
    } else if change <= 0.25 {
        PriceSegment::Within25
    } else if change <= 0.50 {
        PriceSegment::Within50
    } else {
        PriceSegment::Above50
    }
}

impl PriceSegment {
    /// Label for the per-country comparison columns, e.g. `Cheaper at KSA`.
    pub fn comparison_label(&self, focus_code: &str) -> String {
        match self {
            PriceSegment::Cheaper => format!("Cheaper at {}", focus_code),
            other => other.expensive_label().to_string(),
        }
    }

    /// Label for the focus-vs-minimum gap, e.g. `Cheaper elsewhere`.
    pub fn benchmark_label(&self) -> &'static str {
        match self {
            PriceSegment::Cheaper => "Cheaper elsewhere",
            other => other.expensive_label(),
        }
    }

    /// Shared labels for the non-cheaper bands. The cheaper band renders
    /// differently per context, so both public methods handle it first.
    fn expensive_label(&self) -> &'static str {
        match self {
            PriceSegment::Cheaper => "Cheaper",
            PriceSegment::Within10 => "Expensive by 0-10%",
            PriceSegment::Within25 => "Expensive by 10-25%",
            PriceSegment::Within50 => "Expensive by 25-50%",
            PriceSegment::Above50 => "Expensive by >50%",
            PriceSegment::NotAvailable => "Not available",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_change_is_cheaper() {
        assert_eq!(classify(-0.05), PriceSegment::Cheaper);
        assert_eq!(classify(-1.0), PriceSegment::Cheaper);
    }

    #[test]
    fn zero_change_falls_in_the_first_expensive_band() {
        // Exactly equal costs are "Expensive by 0-10%", not "Cheaper".
        assert_eq!(classify(0.0), PriceSegment::Within10);
    }

    #[test]
    fn upper_bounds_are_inclusive() {
        assert_eq!(classify(0.10), PriceSegment::Within10);
        assert_eq!(classify(0.25), PriceSegment::Within25);
        assert_eq!(classify(0.50), PriceSegment::Within50);
    }

    #[test]
    fn values_just_above_a_bound_move_to_the_next_band() {
        assert_eq!(classify(0.100001), PriceSegment::Within25);
        assert_eq!(classify(0.250001), PriceSegment::Within50);
        assert_eq!(classify(0.500001), PriceSegment::Above50);
        assert_eq!(classify(3.0), PriceSegment::Above50);
    }

    #[test]
    fn mid_band_values_classify_as_expected() {
        assert_eq!(classify(0.05), PriceSegment::Within10);
        assert_eq!(classify(0.20), PriceSegment::Within25);
        assert_eq!(classify(0.40), PriceSegment::Within50);
    }

    #[test]
    fn relative_change_matches_ratio_minus_one() {
        assert!((relative_change(80.0, 100.0) - (-0.20)).abs() < 1e-12);
        assert!((relative_change(120.0, 100.0) - 0.20).abs() < 1e-12);
        assert!((relative_change(100.0, 100.0)).abs() < 1e-12);
    }

    #[test]
    fn labels_render_for_both_contexts() {
        assert_eq!(PriceSegment::Cheaper.comparison_label("KSA"), "Cheaper at KSA");
        assert_eq!(PriceSegment::Cheaper.benchmark_label(), "Cheaper elsewhere");
        assert_eq!(
            PriceSegment::Within25.comparison_label("KSA"),
            "Expensive by 10-25%"
        );
        assert_eq!(PriceSegment::Within25.benchmark_label(), "Expensive by 10-25%");
        assert_eq!(
            PriceSegment::NotAvailable.comparison_label("KSA"),
            "Not available"
        );
    }
}
