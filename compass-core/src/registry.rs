//! Ordered country roster.
//!
//! The roster is configuration data, not code: every component that needs
//! per-country behavior iterates this registry instead of enumerating
//! countries by hand, so extending the roster is a one-line data change.
//! Declaration order is significant (it is the canonical tie-break order
//! used by the cheapest-country resolution) and is never re-sorted.

use serde::Serialize;
use thiserror::Error;

/// A single roster entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Country {
    /// Symbolic identifier used throughout the data and the output, e.g. `KSA`.
    pub code: String,
    /// Stable integer key carried from the upstream master data.
    pub numeric_key: u32,
    /// Human-readable name for reports.
    pub display_name: String,
}

#[derive(Debug, Error)]
#[error("Unknown country code: {0}")]
pub struct UnknownCountryError(pub String);

/// Failure modes when building a registry from a custom roster.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Duplicate country code: {0}")]
    DuplicateCode(String),

    #[error("Duplicate numeric key: {0}")]
    DuplicateKey(u32),

    #[error("Roster must contain at least one country")]
    Empty,
}

/// Built-in roster: (code, numeric key, display name).
const BUILTIN_ROSTER: &[(&str, u32, &str)] = &[
    ("KSA", 1, "Saudi Arabia"),
    ("UAE", 2, "United Arab Emirates"),
    ("EGYPT", 3, "Egypt"),
    ("KUWAIT", 4, "Kuwait"),
    ("QATAR", 5, "Qatar"),
    ("BAHRAIN", 6, "Bahrain"),
    ("OMAN", 7, "Oman"),
    ("JORDAN", 8, "Jordan"),
    ("LEBANON", 9, "Lebanon"),
    ("IRAQ", 10, "Iraq"),
];

/// Immutable, ordered roster of countries.
#[derive(Clone, Debug)]
pub struct CountryRegistry {
    countries: Vec<Country>,
}

impl CountryRegistry {
    /// The production roster.
    pub fn builtin() -> Self {
        let countries = BUILTIN_ROSTER
            .iter()
            .map(|&(code, numeric_key, display_name)| Country {
                code: code.to_string(),
                numeric_key,
                display_name: display_name.to_string(),
            })
            .collect();
        Self { countries }
    }

    /// Build a registry from an explicit roster, preserving its order.
    ///
    /// Codes and numeric keys must each be unique.
    pub fn from_entries(countries: Vec<Country>) -> Result<Self, RosterError> {
        if countries.is_empty() {
            return Err(RosterError::Empty);
        }
        for (i, country) in countries.iter().enumerate() {
            for earlier in &countries[..i] {
                if earlier.code == country.code {
                    return Err(RosterError::DuplicateCode(country.code.clone()));
                }
                if earlier.numeric_key == country.numeric_key {
                    return Err(RosterError::DuplicateKey(country.numeric_key));
                }
            }
        }
        Ok(Self { countries })
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Countries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    /// Countries in declaration order, excluding the focus country.
    pub fn others<'a>(&'a self, focus_code: &'a str) -> impl Iterator<Item = &'a Country> {
        self.countries.iter().filter(move |c| c.code != focus_code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.countries.iter().any(|c| c.code == code)
    }

    /// Resolve a code to its roster entry.
    pub fn lookup(&self, code: &str) -> Result<&Country, UnknownCountryError> {
        self.countries
            .iter()
            .find(|c| c.code == code)
            .ok_or_else(|| UnknownCountryError(code.to_string()))
    }
}
