//! API response types.

use serde::Serialize;

use crate::catalog::{ApplianceCatalog, LocationCatalog, RuleCatalog};

/// What a client needs to build a load profile form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    /// Appliance name to default wattage (W), in catalog order.
    pub appliances: ApplianceCatalog,
    /// Location name to average daily sun-hours.
    pub locations: LocationCatalog,
    pub backup_options: Vec<f64>,
}

impl From<&RuleCatalog> for CatalogResponse {
    fn from(catalog: &RuleCatalog) -> Self {
        Self {
            appliances: catalog.appliances().clone(),
            locations: catalog.locations().clone(),
            backup_options: catalog.backup_options().to_vec(),
        }
    }
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
