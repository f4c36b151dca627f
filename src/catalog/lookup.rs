//! Name-keyed reference tables: appliance wattages and location sun-hours.

use indexmap::IndexMap;
use serde::Serialize;

/// Appliance name to default wattage (W), in administrator order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ApplianceCatalog(IndexMap<String, f64>);

impl ApplianceCatalog {
    pub fn new(entries: IndexMap<String, f64>) -> Self {
        Self(entries)
    }

    /// Default wattage for `name`, or `None` if the appliance is not listed.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Default wattage for `name`; unlisted appliances draw 0 W.
    pub fn wattage_or_zero(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, watts)| (name.as_str(), *watts))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Location name to average daily sun-hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LocationCatalog(IndexMap<String, f64>);

impl LocationCatalog {
    pub fn new(entries: IndexMap<String, f64>) -> Self {
        Self(entries)
    }

    /// Sun-hours for `name`, or `None` for an unknown or empty location.
    pub fn sun_hours(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, hours)| (name.as_str(), *hours))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
