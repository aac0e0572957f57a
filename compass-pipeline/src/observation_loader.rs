//! CSV observation loader.
//!
//! Parses the long-form snapshot table into `RawObservation` structs.
//! Expected CSV columns:
//!   country, item_barcode, department, section, family, subfamily, brand,
//!   brand_principal, cost_latest, cost_mean, sales_qty, profit, sales_amt
//!
//! One row per (item, country). A country that never observed an item simply
//! has no row for it.

use serde::Deserialize;
use std::io::Read;

use crate::types::ItemHierarchy;

/// One source row: a single country's view of a single item.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObservation {
    pub country: String,
    pub item_barcode: String,
    pub department: String,
    pub section: String,
    pub family: String,
    pub subfamily: String,
    pub brand: String,
    pub brand_principal: String,
    pub cost_latest: f64,
    pub cost_mean: f64,
    pub sales_qty: f64,
    pub profit: f64,
    pub sales_amt: f64,
}

impl RawObservation {
    /// The hierarchy fields as a grouping key.
    pub fn hierarchy(&self) -> ItemHierarchy {
        ItemHierarchy {
            department: self.department.clone(),
            section: self.section.clone(),
            family: self.family.clone(),
            subfamily: self.subfamily.clone(),
            brand: self.brand.clone(),
            brand_principal: self.brand_principal.clone(),
        }
    }
}

/// Load observations from a CSV reader.
pub fn load_observations<R: Read>(reader: R) -> Result<Vec<RawObservation>, String> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut observations = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let observation: RawObservation =
            result.map_err(|e| format!("CSV parse error at line {}: {}", line_num + 2, e))?;
        observations.push(observation);
    }

    Ok(observations)
}

/// Load observations from a CSV file path.
pub fn load_observations_file(path: &str) -> Result<Vec<RawObservation>, String> {
    let file =
        std::fs::File::open(path).map_err(|e| format!("Failed to open '{}': {}", path, e))?;
    load_observations(file)
}
