//! Rule catalog documents (TOML or JSON) and the built-in preset.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{BatteryRule, InverterRule, PanelRule};
use crate::recommend::Package;

/// Administrator-edited catalog document, exactly as deserialised.
///
/// Nothing here is trusted yet: run [`CatalogConfig::validate`] or build a
/// [`crate::catalog::RuleCatalog`] (which validates) before sizing anything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogConfig {
    /// Appliance name to default wattage (W).
    #[serde(alias = "defaultWattages")]
    pub appliances: IndexMap<String, f64>,
    /// Location name to average daily sun-hours.
    pub locations: IndexMap<String, f64>,
    /// Backup durations (hours) offered to the user. Informational only.
    pub backup_options: Vec<f64>,
    pub inverter_rules: Vec<InverterRule>,
    pub battery_rules: Vec<BatteryRule>,
    pub panel_rules: Vec<PanelRule>,
    /// Off-the-shelf packages offered alongside the computed system.
    pub packages: Vec<Package>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Field path (e.g., `"batteryRules[2].minWatts"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn inverter(min_watts: f64, max_watts: f64, kva: f64) -> InverterRule {
    InverterRule {
        min_watts,
        max_watts,
        kva,
    }
}

fn battery(
    min_watts: f64,
    max_watts: f64,
    min_backup_hours: f64,
    battery_ah: f64,
    battery_voltage: f64,
) -> BatteryRule {
    BatteryRule {
        min_watts,
        max_watts,
        min_backup_hours,
        battery_ah,
        battery_voltage,
    }
}

fn panel(
    min_watts: f64,
    max_watts: f64,
    average_daily_use_hours: f64,
    panel_count: u32,
    single_panel_wattage: f64,
) -> PanelRule {
    PanelRule {
        min_watts,
        max_watts,
        average_daily_use_hours,
        panel_count,
        single_panel_wattage,
    }
}

impl CatalogConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["standard"];

    /// Returns the standard residential catalog.
    ///
    /// Mirrors `catalogs/standard.toml`.
    pub fn standard() -> Self {
        let appliances = [
            ("tv", 150.0),
            ("fan", 75.0),
            ("fridge", 200.0),
            ("freezer", 300.0),
            ("light_bulb", 15.0),
            ("laptop", 65.0),
            ("phone_charger", 10.0),
            ("decoder", 25.0),
            ("washing_machine", 500.0),
            ("microwave", 1000.0),
            ("pressing_iron", 1000.0),
            ("air_conditioner", 750.0),
            ("water_pump", 750.0),
        ];
        let locations = [
            ("Lagos", 5.0),
            ("Abuja", 6.0),
            ("Kano", 7.0),
            ("Port Harcourt", 4.5),
            ("Ibadan", 5.5),
            ("Enugu", 5.0),
        ];

        Self {
            appliances: appliances
                .into_iter()
                .map(|(name, watts)| (name.to_string(), watts))
                .collect(),
            locations: locations
                .into_iter()
                .map(|(name, hours)| (name.to_string(), hours))
                .collect(),
            backup_options: vec![2.0, 4.0, 6.0, 8.0, 12.0, 24.0],
            inverter_rules: vec![
                inverter(0.0, 1000.0, 1.5),
                inverter(1000.0, 2000.0, 2.5),
                inverter(2000.0, 3000.0, 3.5),
                inverter(3000.0, 5000.0, 5.0),
                inverter(5000.0, 7000.0, 7.5),
                inverter(7000.0, 10_000.0, 10.0),
                inverter(10_000.0, 1_000_000.0, 15.0),
            ],
            battery_rules: vec![
                battery(0.0, 500.0, 0.0, 100.0, 12.0),
                battery(0.0, 500.0, 6.0, 200.0, 12.0),
                battery(0.0, 500.0, 12.0, 200.0, 24.0),
                battery(500.0, 1000.0, 0.0, 200.0, 12.0),
                battery(500.0, 1000.0, 6.0, 200.0, 24.0),
                battery(500.0, 1000.0, 12.0, 400.0, 24.0),
                battery(1000.0, 2000.0, 0.0, 200.0, 24.0),
                battery(1000.0, 2000.0, 6.0, 400.0, 24.0),
                battery(1000.0, 2000.0, 12.0, 400.0, 48.0),
                battery(2000.0, 3000.0, 0.0, 200.0, 48.0),
                battery(2000.0, 3000.0, 6.0, 400.0, 48.0),
                battery(2000.0, 3000.0, 12.0, 600.0, 48.0),
                battery(3000.0, 5000.0, 0.0, 400.0, 48.0),
                battery(3000.0, 5000.0, 6.0, 600.0, 48.0),
                battery(3000.0, 5000.0, 12.0, 800.0, 48.0),
                battery(5000.0, 10_000.0, 0.0, 600.0, 48.0),
                battery(5000.0, 10_000.0, 6.0, 1000.0, 48.0),
                battery(5000.0, 10_000.0, 12.0, 1400.0, 48.0),
                battery(10_000.0, 1_000_000.0, 0.0, 1000.0, 48.0),
                battery(10_000.0, 1_000_000.0, 6.0, 1600.0, 48.0),
                battery(10_000.0, 1_000_000.0, 12.0, 2400.0, 48.0),
            ],
            panel_rules: vec![
                panel(0.0, 500.0, 4.0, 2, 350.0),
                panel(500.0, 1000.0, 4.0, 4, 350.0),
                panel(1000.0, 2000.0, 5.0, 6, 450.0),
                panel(2000.0, 3000.0, 5.0, 8, 450.0),
                panel(3000.0, 5000.0, 6.0, 12, 550.0),
                panel(5000.0, 10_000.0, 6.0, 20, 550.0),
                panel(10_000.0, 1_000_000.0, 6.0, 32, 550.0),
            ],
            packages: vec![
                Package {
                    id: "starter".into(),
                    title: "Starter 1.5kVA".into(),
                    inverter: "1.5kVA / 12V pure sine wave".into(),
                    battery: "1 x 200Ah tubular".into(),
                    panel: "2 x 350W mono".into(),
                    price: "850,000".into(),
                    description: "Lights, fans, TV and phone charging through the night.".into(),
                    ideal_for: "Flats and small shops".into(),
                    inverter_kva: 1.5,
                },
                Package {
                    id: "home".into(),
                    title: "Home 3.5kVA".into(),
                    inverter: "3.5kVA / 24V hybrid".into(),
                    battery: "2 x 200Ah tubular".into(),
                    panel: "6 x 450W mono".into(),
                    price: "2,300,000".into(),
                    description: "Adds a fridge and a washing machine to the everyday load."
                        .into(),
                    ideal_for: "Two to three bedroom homes".into(),
                    inverter_kva: 3.5,
                },
                Package {
                    id: "family".into(),
                    title: "Family 5.0kVA".into(),
                    inverter: "5kVA / 48V hybrid".into(),
                    battery: "5kWh lithium".into(),
                    panel: "10 x 550W mono".into(),
                    price: "4,100,000".into(),
                    description: "Runs a freezer and a 1HP air conditioner alongside the home."
                        .into(),
                    ideal_for: "Large homes".into(),
                    inverter_kva: 5.0,
                },
                Package {
                    id: "premium".into(),
                    title: "Premium 10.0kVA".into(),
                    inverter: "10kVA / 48V hybrid".into(),
                    battery: "15kWh lithium".into(),
                    panel: "20 x 550W mono".into(),
                    price: "9,800,000".into(),
                    description: "Whole-house backup including pumps and multiple ACs.".into(),
                    ideal_for: "Duplexes and offices".into(),
                    inverter_kva: 10.0,
                },
            ],
        }
    }

    /// Loads a catalog from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "standard" => Ok(Self::standard()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a catalog file, choosing JSON for `.json` and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or does not parse.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("catalog", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Parses a catalog from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Parses a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the JSON is invalid or contains unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::new("json", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the catalog is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (name, watts) in &self.appliances {
            if name.trim().is_empty() {
                errors.push(ConfigError::new("appliances", "names must not be empty"));
            }
            check_non_negative(&mut errors, &format!("appliances.{name}"), *watts);
        }

        for (name, hours) in &self.locations {
            if name.trim().is_empty() {
                errors.push(ConfigError::new("locations", "names must not be empty"));
            }
            check_positive(&mut errors, &format!("locations.{name}"), *hours);
        }

        for (i, hours) in self.backup_options.iter().enumerate() {
            check_positive(&mut errors, &format!("backupOptions[{i}]"), *hours);
        }

        if self.inverter_rules.is_empty() {
            errors.push(ConfigError::new("inverterRules", "must not be empty"));
        }
        for (i, rule) in self.inverter_rules.iter().enumerate() {
            let at = format!("inverterRules[{i}]");
            check_band(&mut errors, &at, rule.min_watts, rule.max_watts);
            check_non_negative(&mut errors, &format!("{at}.kva"), rule.kva);
        }

        if self.battery_rules.is_empty() {
            errors.push(ConfigError::new("batteryRules", "must not be empty"));
        }
        for (i, rule) in self.battery_rules.iter().enumerate() {
            let at = format!("batteryRules[{i}]");
            check_band(&mut errors, &at, rule.min_watts, rule.max_watts);
            check_non_negative(
                &mut errors,
                &format!("{at}.minBackupHours"),
                rule.min_backup_hours,
            );
            check_non_negative(&mut errors, &format!("{at}.batteryAh"), rule.battery_ah);
            check_non_negative(
                &mut errors,
                &format!("{at}.batteryVoltage"),
                rule.battery_voltage,
            );
        }

        if self.panel_rules.is_empty() {
            errors.push(ConfigError::new("panelRules", "must not be empty"));
        }
        for (i, rule) in self.panel_rules.iter().enumerate() {
            let at = format!("panelRules[{i}]");
            check_band(&mut errors, &at, rule.min_watts, rule.max_watts);
            check_non_negative(
                &mut errors,
                &format!("{at}.averageDailyUseHours"),
                rule.average_daily_use_hours,
            );
            check_non_negative(
                &mut errors,
                &format!("{at}.singlePanelWattage"),
                rule.single_panel_wattage,
            );
        }

        let mut seen = HashSet::new();
        for (i, pkg) in self.packages.iter().enumerate() {
            if pkg.id.trim().is_empty() {
                errors.push(ConfigError::new(format!("packages[{i}].id"), "must not be empty"));
            } else if !seen.insert(pkg.id.as_str()) {
                errors.push(ConfigError::new(
                    format!("packages[{i}].id"),
                    format!("duplicate package id \"{}\"", pkg.id),
                ));
            }
            check_non_negative(
                &mut errors,
                &format!("packages[{i}].inverterKva"),
                pkg.inverter_kva,
            );
        }

        errors
    }
}

fn check_non_negative(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ConfigError::new(field, format!("must be a finite number >= 0, got {value}")));
    }
}

fn check_positive(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(ConfigError::new(field, format!("must be a finite number > 0, got {value}")));
    }
}

/// `maxWatts` may be `+inf` (TOML `inf`) to mark an open-ended top band.
fn check_band(errors: &mut Vec<ConfigError>, at: &str, min_watts: f64, max_watts: f64) {
    let before = errors.len();
    check_non_negative(errors, &format!("{at}.minWatts"), min_watts);
    if max_watts.is_nan() || max_watts < 0.0 {
        errors.push(ConfigError::new(
            format!("{at}.maxWatts"),
            format!("must be a number >= 0, got {max_watts}"),
        ));
    }
    if errors.len() == before && min_watts >= max_watts {
        errors.push(ConfigError::new(
            format!("{at}.minWatts"),
            format!("must be < {at}.maxWatts ({min_watts} >= {max_watts})"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_preset_valid() {
        let cfg = CatalogConfig::standard();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "standard should be valid: {errors:?}");
    }

    #[test]
    fn shipped_catalog_matches_standard_preset() {
        let shipped = CatalogConfig::from_toml_str(include_str!("../catalogs/standard.toml"))
            .expect("catalogs/standard.toml should parse");
        assert_eq!(shipped, CatalogConfig::standard());
    }

    #[test]
    fn from_preset_unknown() {
        let err = CatalogConfig::from_preset("nonexistent").unwrap_err();
        assert_eq!(err.field, "preset");
        assert!(err.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in CatalogConfig::PRESETS {
            let cfg = CatalogConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(CatalogConfig::validate).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
backupOptions = [4, 8]

[appliances]
tv = 150
fan = 75

[locations]
Lagos = 5

[[inverterRules]]
minWatts = 0
maxWatts = 1000
kva = 1.5

[[inverterRules]]
minWatts = 1000
maxWatts = inf
kva = 2.5

[[batteryRules]]
minWatts = 0
maxWatts = 1000
minBackupHours = 0
batteryAh = 100
batteryVoltage = 12

[[panelRules]]
minWatts = 0
maxWatts = 1000
averageDailyUseHours = 4
panelCount = 2
singlePanelWattage = 350
"#;
        let cfg = CatalogConfig::from_toml_str(toml).expect("valid TOML should parse");
        assert_eq!(cfg.appliances.get("tv"), Some(&150.0));
        assert_eq!(cfg.inverter_rules.len(), 2);
        assert!(cfg.inverter_rules[1].max_watts.is_infinite());
        assert!(cfg.packages.is_empty());
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn json_accepts_default_wattages_alias() {
        let json = r#"{
            "defaultWattages": {"tv": 150},
            "locations": {"Lagos": 5},
            "backupOptions": [4],
            "inverterRules": [{"minWatts": 0, "maxWatts": 1000, "kva": 1.5}],
            "batteryRules": [{"minWatts": 0, "maxWatts": 1000, "minBackupHours": 0, "batteryAh": 100, "batteryVoltage": 12}],
            "panelRules": [{"minWatts": 0, "maxWatts": 1000, "averageDailyUseHours": 4, "panelCount": 2, "singlePanelWattage": 350}]
        }"#;
        let cfg = CatalogConfig::from_json_str(json).expect("valid JSON should parse");
        assert_eq!(cfg.appliances.get("tv"), Some(&150.0));
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
bogusField = true
"#;
        assert!(CatalogConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_inverted_band() {
        let mut cfg = CatalogConfig::standard();
        cfg.inverter_rules[1].min_watts = 2000.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "inverterRules[1].minWatts"));
    }

    #[test]
    fn validation_catches_equal_bounds() {
        let mut cfg = CatalogConfig::standard();
        cfg.panel_rules[0].max_watts = cfg.panel_rules[0].min_watts;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "panelRules[0].minWatts"));
    }

    #[test]
    fn validation_catches_negative_fields() {
        let mut cfg = CatalogConfig::standard();
        cfg.battery_rules[3].battery_ah = -1.0;
        cfg.appliances.insert("heater".into(), -5.0);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "batteryRules[3].batteryAh"));
        assert!(errors.iter().any(|e| e.field == "appliances.heater"));
    }

    #[test]
    fn validation_catches_empty_rule_sequences() {
        let cfg = CatalogConfig::default();
        let errors = cfg.validate();
        for field in ["inverterRules", "batteryRules", "panelRules"] {
            assert!(errors.iter().any(|e| e.field == field), "{field} should be reported");
        }
    }

    #[test]
    fn validation_requires_positive_sun_hours_and_backup_options() {
        let mut cfg = CatalogConfig::standard();
        cfg.locations.insert("Nowhere".into(), 0.0);
        cfg.backup_options.push(0.0);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "locations.Nowhere"));
        assert!(errors.iter().any(|e| e.field == "backupOptions[6]"));
    }

    #[test]
    fn validation_catches_duplicate_package_ids() {
        let mut cfg = CatalogConfig::standard();
        let dup = cfg.packages[0].clone();
        cfg.packages.push(dup);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "packages[4].id"));
    }

    #[test]
    fn validation_reports_every_violation() {
        let mut cfg = CatalogConfig::standard();
        cfg.inverter_rules[0].kva = f64::NAN;
        cfg.panel_rules[2].single_panel_wattage = -350.0;
        assert_eq!(cfg.validate().len(), 2);
    }
}
