//! Validated, immutable rule catalog consumed by the sizing engine.
//!
//! A [`RuleCatalog`] can only be obtained through validation, so the engine
//! never re-checks rules per call. Rule sequences keep the order the
//! administrator stored them in; list position is precedence.

mod lookup;
mod rules;

use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{CatalogConfig, ConfigError};
use crate::recommend::Package;

pub use lookup::{ApplianceCatalog, LocationCatalog};
pub use rules::{Banded, BatteryRule, InverterRule, PanelRule, RuleSet, WattBand};

/// Catalog load failure. Sizing must not be attempted after one of these.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document could not be read or parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The document parsed but breaks one or more rule constraints.
    #[error("catalog rejected with {} error(s):\n{}", .0.len(), list_errors(.0))]
    Invalid(Vec<ConfigError>),
}

fn list_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Suspicious but usable catalog content, reported once on load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogWarning {
    #[error(
        "battery band {band} has no tier with minBackupHours = 0; \
         its lowest tier ({lowest_threshold} h) is used as the baseline"
    )]
    NoBaselineTier { band: WattBand, lowest_threshold: f64 },
    #[error("backup option {hours} h is below the lowest battery tier of every band")]
    BackupOptionBelowAllTiers { hours: f64 },
}

/// Immutable inverter, battery, and panel rules plus lookup tables.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    appliances: ApplianceCatalog,
    locations: LocationCatalog,
    backup_options: Vec<f64>,
    inverter_rules: RuleSet<InverterRule>,
    battery_rules: RuleSet<BatteryRule>,
    panel_rules: RuleSet<PanelRule>,
    packages: Vec<Package>,
    warnings: Vec<CatalogWarning>,
}

impl RuleCatalog {
    /// Validates `config` and freezes it into a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] listing every violated constraint.
    pub fn from_config(config: CatalogConfig) -> Result<Self, CatalogError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(CatalogError::Invalid(errors));
        }

        let warnings = collect_warnings(&config);
        for w in &warnings {
            warn!("{w}");
        }
        info!(
            appliances = config.appliances.len(),
            locations = config.locations.len(),
            inverter_rules = config.inverter_rules.len(),
            battery_rules = config.battery_rules.len(),
            panel_rules = config.panel_rules.len(),
            packages = config.packages.len(),
            "rule catalog loaded"
        );

        Ok(Self {
            appliances: ApplianceCatalog::new(config.appliances),
            locations: LocationCatalog::new(config.locations),
            backup_options: config.backup_options,
            inverter_rules: non_empty(config.inverter_rules, "inverterRules")?,
            battery_rules: non_empty(config.battery_rules, "batteryRules")?,
            panel_rules: non_empty(config.panel_rules, "panelRules")?,
            packages: config.packages,
            warnings,
        })
    }

    /// Reads, parses, and validates a catalog file (`.json` or TOML).
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file is unreadable, unparsable, or invalid.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        Self::from_config(CatalogConfig::from_path(path)?)
    }

    /// Builds a catalog from a built-in preset.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, CatalogError> {
        Self::from_config(CatalogConfig::from_preset(name)?)
    }

    pub fn appliances(&self) -> &ApplianceCatalog {
        &self.appliances
    }

    pub fn locations(&self) -> &LocationCatalog {
        &self.locations
    }

    pub fn backup_options(&self) -> &[f64] {
        &self.backup_options
    }

    /// Inverter rules in stored (precedence) order.
    pub fn inverter_rules(&self) -> &RuleSet<InverterRule> {
        &self.inverter_rules
    }

    /// Battery rules in stored order.
    pub fn battery_rules(&self) -> &RuleSet<BatteryRule> {
        &self.battery_rules
    }

    /// Panel rules in stored (precedence) order.
    pub fn panel_rules(&self) -> &RuleSet<PanelRule> {
        &self.panel_rules
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }
}

impl TryFrom<CatalogConfig> for RuleCatalog {
    type Error = CatalogError;

    fn try_from(config: CatalogConfig) -> Result<Self, Self::Error> {
        Self::from_config(config)
    }
}

fn non_empty<R>(rules: Vec<R>, field: &str) -> Result<RuleSet<R>, CatalogError> {
    RuleSet::new(rules)
        .ok_or_else(|| CatalogError::Invalid(vec![ConfigError::new(field, "must not be empty")]))
}

/// Distinct battery bands in first-appearance order, with the lowest tier
/// threshold seen in each.
fn battery_band_floors(rules: &[BatteryRule]) -> Vec<(WattBand, f64)> {
    let mut bands: Vec<(WattBand, f64)> = Vec::new();
    for rule in rules {
        let band = rule.band();
        match bands.iter_mut().find(|(b, _)| *b == band) {
            Some((_, lowest)) => *lowest = lowest.min(rule.min_backup_hours),
            None => bands.push((band, rule.min_backup_hours)),
        }
    }
    bands
}

fn collect_warnings(config: &CatalogConfig) -> Vec<CatalogWarning> {
    let floors = battery_band_floors(&config.battery_rules);
    let mut warnings: Vec<CatalogWarning> = floors
        .iter()
        .filter(|(_, lowest)| *lowest > 0.0)
        .map(|&(band, lowest_threshold)| CatalogWarning::NoBaselineTier {
            band,
            lowest_threshold,
        })
        .collect();

    for &hours in &config.backup_options {
        if !floors.is_empty() && floors.iter().all(|(_, lowest)| hours < *lowest) {
            warnings.push(CatalogWarning::BackupOptionBelowAllTiers { hours });
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery(min: f64, max: f64, hours: f64) -> BatteryRule {
        BatteryRule {
            min_watts: min,
            max_watts: max,
            min_backup_hours: hours,
            battery_ah: 100.0,
            battery_voltage: 12.0,
        }
    }

    #[test]
    fn standard_catalog_loads_without_warnings() {
        let catalog = RuleCatalog::from_preset("standard").expect("standard should load");
        assert!(catalog.warnings().is_empty(), "{:?}", catalog.warnings());
        assert_eq!(catalog.inverter_rules().len(), 7);
        assert_eq!(catalog.appliances().get("tv"), Some(150.0));
        assert_eq!(catalog.locations().sun_hours("Lagos"), Some(5.0));
    }

    #[test]
    fn invalid_config_is_rejected_with_all_errors() {
        let mut cfg = CatalogConfig::standard();
        cfg.inverter_rules[0].max_watts = 0.0;
        cfg.battery_rules[0].battery_voltage = -12.0;
        let err = RuleCatalog::from_config(cfg).unwrap_err();
        match &err {
            CatalogError::Invalid(errors) => assert_eq!(errors.len(), 2),
            CatalogError::Config(e) => panic!("unexpected parse error: {e}"),
        }
        let rendered = err.to_string();
        assert!(rendered.contains("2 error(s)"));
        assert!(rendered.contains("inverterRules[0].minWatts"));
        assert!(rendered.contains("batteryRules[0].batteryVoltage"));
    }

    #[test]
    fn unknown_preset_surfaces_config_error() {
        let err = RuleCatalog::from_preset("bogus").unwrap_err();
        assert!(matches!(err, CatalogError::Config(ref e) if e.field == "preset"));
    }

    #[test]
    fn rule_order_is_preserved() {
        let mut cfg = CatalogConfig::standard();
        cfg.inverter_rules.reverse();
        let catalog = RuleCatalog::from_config(cfg).expect("reversed catalog is still valid");
        assert_eq!(catalog.inverter_rules()[0].kva, 15.0);
    }

    #[test]
    fn band_without_baseline_tier_is_warned() {
        let mut cfg = CatalogConfig::standard();
        cfg.battery_rules = vec![
            battery(0.0, 1000.0, 0.0),
            battery(1000.0, 2000.0, 4.0),
            battery(1000.0, 2000.0, 12.0),
        ];
        let catalog = RuleCatalog::from_config(cfg).expect("warnings are not fatal");
        assert_eq!(
            catalog.warnings(),
            [CatalogWarning::NoBaselineTier {
                band: WattBand::new(1000.0, 2000.0),
                lowest_threshold: 4.0,
            }]
        );
    }

    #[test]
    fn backup_option_below_every_tier_is_warned() {
        let mut cfg = CatalogConfig::standard();
        cfg.backup_options = vec![2.0, 8.0];
        cfg.battery_rules = vec![battery(0.0, 1000.0, 4.0), battery(1000.0, 5000.0, 6.0)];
        let catalog = RuleCatalog::from_config(cfg).expect("warnings are not fatal");
        assert!(
            catalog
                .warnings()
                .contains(&CatalogWarning::BackupOptionBelowAllTiers { hours: 2.0 })
        );
        assert!(
            !catalog
                .warnings()
                .contains(&CatalogWarning::BackupOptionBelowAllTiers { hours: 8.0 })
        );
    }
}
