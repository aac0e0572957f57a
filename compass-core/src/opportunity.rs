//! Cost opportunity arithmetic.

/// Notional saving from aligning the focus country's unit cost to the
/// cheapest alternative, holding observed focus sales volume fixed.
///
/// The volume-held-fixed assumption deliberately ignores price elasticity of
/// demand; the figure is an upper-bound alignment estimate, not a forecast.
/// Returns 0 unless the focus cost, the sales volume, and the gap are all
/// positive, so the result is never negative.
pub fn cost_opportunity(focus_cost: f64, min_other_cost: f64, focus_sales_qty: f64) -> f64 {
    if focus_cost > 0.0 && focus_sales_qty > 0.0 && focus_cost > min_other_cost {
        (focus_cost - min_other_cost) * focus_sales_qty
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saving_scales_gap_by_volume() {
        // (100 - 80) x 50 = 1,000
        assert!((cost_opportunity(100.0, 80.0, 50.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn zero_when_focus_is_already_cheapest() {
        assert_eq!(cost_opportunity(80.0, 100.0, 50.0), 0.0);
        assert_eq!(cost_opportunity(80.0, 80.0, 50.0), 0.0);
    }

    #[test]
    fn zero_without_positive_volume() {
        assert_eq!(cost_opportunity(100.0, 80.0, 0.0), 0.0);
        assert_eq!(cost_opportunity(100.0, 80.0, -5.0), 0.0);
    }

    #[test]
    fn zero_without_positive_focus_cost() {
        assert_eq!(cost_opportunity(0.0, 80.0, 50.0), 0.0);
        assert_eq!(cost_opportunity(-10.0, 80.0, 50.0), 0.0);
    }

    #[test]
    fn never_negative_across_sign_combinations() {
        let values = [-20.0, 0.0, 15.0, 100.0];
        for &focus in &values {
            for &min in &values {
                for &qty in &values {
                    assert!(
                        cost_opportunity(focus, min, qty) >= 0.0,
                        "opportunity({}, {}, {}) went negative",
                        focus,
                        min,
                        qty
                    );
                }
            }
        }
    }
}
