/// Strip the module path from a fully qualified type name.
///
/// `"compass_pipeline::components::opportunity_scorer::OpportunityScorer"`
/// becomes `"OpportunityScorer"`.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
