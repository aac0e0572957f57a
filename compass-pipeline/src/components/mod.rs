pub mod cheapest_country_scorer;
pub mod comparable_cost_filter;
pub mod focus_metrics_hydrator;
pub mod low_opportunity_filter;
pub mod opportunity_scorer;
pub mod opportunity_selector;
pub mod price_comparison_scorer;
pub mod scope_filter;
pub mod snapshot_pivot_source;
pub mod snapshot_stamp_query_hydrator;
pub mod summary_log_side_effect;
