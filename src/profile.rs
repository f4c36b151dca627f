//! Declared household load: appliance selections, custom appliances,
//! location, and requested backup duration.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::catalog::ApplianceCatalog;
use crate::config::ConfigError;

/// Rejected load profile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Parse(#[from] ConfigError),
    #[error("customAppliances[{index}] (\"{name}\"): wattage must be a finite number >= 0, got {wattage}")]
    InvalidWattage {
        index: usize,
        name: String,
        wattage: f64,
    },
    #[error("backupHours must be a finite number >= 0, got {0}")]
    InvalidBackupHours(f64),
}

/// An appliance the user typed in that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomAppliance {
    /// Handle for later edits; assigned by [`LoadProfile::add_custom_appliance`]
    /// or, for loaded documents, by [`LoadProfile::assign_custom_ids`].
    #[serde(default)]
    pub id: u32,
    pub name: String,
    /// Draw of one unit (W).
    pub wattage: f64,
    pub quantity: u32,
}

/// Partial edit applied by [`LoadProfile::update_custom_appliance`].
#[derive(Debug, Clone, Default)]
pub struct CustomApplianceUpdate {
    pub name: Option<String>,
    pub wattage: Option<f64>,
    pub quantity: Option<u32>,
}

/// The user's declared load.
///
/// Owned by the caller; the sizing engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LoadProfile {
    /// Optional display name, used to tell batch rows apart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Catalog appliance name to quantity.
    #[serde(alias = "appliances")]
    pub selections: IndexMap<String, u32>,
    pub custom_appliances: Vec<CustomAppliance>,
    /// Key into the location catalog; `None` or empty means unset.
    pub location: Option<String>,
    pub backup_hours: f64,
}

impl LoadProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the quantity of a catalog appliance. Zero keeps the entry listed.
    pub fn set_quantity(&mut self, name: impl Into<String>, quantity: u32) {
        self.selections.insert(name.into(), quantity);
    }

    /// Appends a custom appliance and returns its id.
    pub fn add_custom_appliance(
        &mut self,
        name: impl Into<String>,
        wattage: f64,
        quantity: u32,
    ) -> u32 {
        let id = self
            .custom_appliances
            .iter()
            .map(|a| a.id)
            .max()
            .map_or(1, |max| max + 1);
        self.custom_appliances.push(CustomAppliance {
            id,
            name: name.into(),
            wattage,
            quantity,
        });
        id
    }

    /// Applies `update` to the custom appliance with `id`.
    ///
    /// Returns `false` if no such appliance exists.
    pub fn update_custom_appliance(&mut self, id: u32, update: CustomApplianceUpdate) -> bool {
        let Some(appliance) = self.custom_appliances.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        if let Some(name) = update.name {
            appliance.name = name;
        }
        if let Some(wattage) = update.wattage {
            appliance.wattage = wattage;
        }
        if let Some(quantity) = update.quantity {
            appliance.quantity = quantity;
        }
        true
    }

    /// Removes the custom appliance with `id`, returning whether it existed.
    pub fn remove_custom_appliance(&mut self, id: u32) -> bool {
        let before = self.custom_appliances.len();
        self.custom_appliances.retain(|a| a.id != id);
        self.custom_appliances.len() != before
    }

    /// Gives every custom appliance a distinct non-zero id.
    ///
    /// Documents may omit `id` (read as 0) or repeat one; those entries are
    /// renumbered after the highest id already present. Valid ids are kept.
    pub fn assign_custom_ids(&mut self) {
        let mut next = self
            .custom_appliances
            .iter()
            .map(|a| a.id)
            .max()
            .unwrap_or(0);
        let mut seen = HashSet::new();
        for appliance in &mut self.custom_appliances {
            if appliance.id == 0 || !seen.insert(appliance.id) {
                next += 1;
                appliance.id = next;
                seen.insert(next);
            }
        }
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = Some(location.into());
    }

    pub fn set_backup_hours(&mut self, hours: f64) {
        self.backup_hours = hours;
    }

    /// Clears every selection, custom appliance, location, and backup choice.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The chosen location, treating an empty string as unset.
    pub fn location_name(&self) -> Option<&str> {
        self.location.as_deref().filter(|name| !name.is_empty())
    }

    /// Total simultaneous draw (W).
    ///
    /// An empty profile draws `+0.0`. Selections not in `appliances` count
    /// as 0 W. A custom appliance with a negative or NaN wattage contributes
    /// nothing, so the total is never negative even for an unvalidated
    /// profile.
    pub fn total_wattage(&self, appliances: &ApplianceCatalog) -> f64 {
        let selected: f64 = self
            .selections
            .iter()
            .map(|(name, &quantity)| {
                let watts = appliances.get(name).unwrap_or_else(|| {
                    warn!(appliance = %name, "appliance not in catalog, counted as 0 W");
                    0.0
                });
                watts * f64::from(quantity)
            })
            .fold(0.0, |acc, w| acc + w);

        let custom: f64 = self
            .custom_appliances
            .iter()
            .map(|a| a.wattage.max(0.0) * f64::from(a.quantity))
            .fold(0.0, |acc, w| acc + w);

        selected + custom
    }

    /// Checks the numeric fields a caller may have filled in by hand.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ProfileError`].
    pub fn validate(&self) -> Result<(), ProfileError> {
        for (index, a) in self.custom_appliances.iter().enumerate() {
            if !a.wattage.is_finite() || a.wattage < 0.0 {
                return Err(ProfileError::InvalidWattage {
                    index,
                    name: a.name.clone(),
                    wattage: a.wattage,
                });
            }
        }
        if !self.backup_hours.is_finite() || self.backup_hours < 0.0 {
            return Err(ProfileError::InvalidBackupHours(self.backup_hours));
        }
        Ok(())
    }

    /// Parses and validates a profile file (`.json` or TOML).
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if the file is unreadable, unparsable, or invalid.
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let mut profile: Self = read_document(path, "profile")?;
        profile.validate()?;
        profile.assign_custom_ids();
        Ok(profile)
    }
}

/// Several profiles sized in one run (`[[profiles]]` in TOML).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileBatch {
    pub profiles: Vec<LoadProfile>,
}

impl ProfileBatch {
    /// Parses a batch file and validates every profile in it.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] for the first unreadable or invalid entry.
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let mut batch: Self = read_document(path, "batch")?;
        for profile in &mut batch.profiles {
            profile.validate()?;
            profile.assign_custom_ids();
        }
        Ok(batch)
    }
}

fn read_document<T: DeserializeOwned>(path: &Path, field: &str) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::new(field, format!("cannot read \"{}\": {e}", path.display()))
    })?;
    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content).map_err(|e| ConfigError::new(field, e.to_string()))
    } else {
        toml::from_str(&content).map_err(|e| ConfigError::new(field, e.to_string()))
    }
}
