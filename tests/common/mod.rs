//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use solar_sizer::catalog::{BatteryRule, InverterRule, PanelRule, RuleCatalog};
use solar_sizer::config::CatalogConfig;
use solar_sizer::profile::LoadProfile;

/// The built-in standard catalog.
pub fn standard_catalog() -> RuleCatalog {
    RuleCatalog::from_preset("standard").expect("standard preset should load")
}

/// Path to a file shipped in the repository.
pub fn repo_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

/// Standard catalog with its rule tables replaced.
pub fn catalog_with_rules(
    inverter_rules: Vec<InverterRule>,
    battery_rules: Vec<BatteryRule>,
    panel_rules: Vec<PanelRule>,
) -> RuleCatalog {
    let mut cfg = CatalogConfig::standard();
    cfg.inverter_rules = inverter_rules;
    cfg.battery_rules = battery_rules;
    cfg.panel_rules = panel_rules;
    RuleCatalog::from_config(cfg).expect("fixture catalog should be valid")
}

pub fn inverter(min_watts: f64, max_watts: f64, kva: f64) -> InverterRule {
    InverterRule {
        min_watts,
        max_watts,
        kva,
    }
}

/// Battery tier at 48 V.
pub fn battery(
    min_watts: f64,
    max_watts: f64,
    min_backup_hours: f64,
    battery_ah: f64,
) -> BatteryRule {
    BatteryRule {
        min_watts,
        max_watts,
        min_backup_hours,
        battery_ah,
        battery_voltage: 48.0,
    }
}

/// Panel rule with 5 daily use hours and 450 W panels.
pub fn panel(min_watts: f64, max_watts: f64, panel_count: u32) -> PanelRule {
    PanelRule {
        min_watts,
        max_watts,
        average_daily_use_hours: 5.0,
        panel_count,
        single_panel_wattage: 450.0,
    }
}

/// A profile drawing exactly `watts` through one custom appliance.
pub fn flat_load(watts: f64, backup_hours: f64) -> LoadProfile {
    let mut profile = LoadProfile::new();
    profile.add_custom_appliance("load", watts, 1);
    profile.set_backup_hours(backup_hours);
    profile
}
