//! User-facing sizing summary: result plus the profile context around it.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::catalog::RuleCatalog;
use crate::profile::LoadProfile;
use crate::recommend::{PackageMatch, recommend_packages};
use crate::sizing::{SizingResult, compute_sizing};

/// What a user sees after submitting a load profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub result: SizingResult,
    pub location: Option<String>,
    /// Average daily sun-hours of `location`, if the catalog knows it.
    pub sun_hours: Option<f64>,
    pub backup_hours: f64,
    pub packages: Vec<PackageMatch>,
}

/// Sizes `profile` and gathers everything the summary screen shows.
///
/// # Arguments
///
/// * `profile` - Validated load profile
/// * `catalog` - Rule catalog supplying sun-hours and packages
pub fn size_profile(profile: &LoadProfile, catalog: &RuleCatalog) -> SizingReport {
    let result = compute_sizing(profile, catalog);
    let location = profile.location_name().map(str::to_owned);
    let sun_hours = location.as_deref().and_then(|name| {
        let hours = catalog.locations().sun_hours(name);
        if hours.is_none() {
            warn!(location = name, "location not in catalog");
        }
        hours
    });

    SizingReport {
        label: profile.label.clone(),
        result,
        location,
        sun_hours,
        backup_hours: profile.backup_hours,
        packages: recommend_packages(result.inverter_size_kva, catalog.packages()),
    }
}

impl fmt::Display for SizingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            writeln!(f, "=== {label} ===")?;
        }
        let location = match (&self.location, self.sun_hours) {
            (Some(name), Some(hours)) => format!("{name} ({hours} sun-hours)"),
            (Some(name), None) => format!("{name} (unknown)"),
            (None, _) => "not set".to_string(),
        };
        writeln!(f, "Location:                {location}")?;
        writeln!(f, "Backup required:         {} h", self.backup_hours)?;
        write!(f, "{}", self.result)?;

        if !self.packages.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Packages ---")?;
            for (i, m) in self.packages.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                write!(
                    f,
                    "[{}] {} ({}, {})",
                    m.level, m.package.title, m.package.price, m.package.ideal_for
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::RecommendationLevel;

    fn standard() -> RuleCatalog {
        RuleCatalog::from_preset("standard").expect("standard loads")
    }

    #[test]
    fn report_carries_location_context() {
        let mut profile = LoadProfile::new();
        profile.set_quantity("tv", 1);
        profile.set_location("Lagos");
        profile.set_backup_hours(4.0);

        let report = size_profile(&profile, &standard());
        assert_eq!(report.location.as_deref(), Some("Lagos"));
        assert_eq!(report.sun_hours, Some(5.0));
        assert_eq!(report.backup_hours, 4.0);
        assert_eq!(report.packages[0].package.id, "starter");
        assert_eq!(report.packages[0].level, RecommendationLevel::Recommended);
    }

    #[test]
    fn unknown_location_has_no_sun_hours() {
        let mut profile = LoadProfile::new();
        profile.set_location("Atlantis");
        let report = size_profile(&profile, &standard());
        assert_eq!(report.location.as_deref(), Some("Atlantis"));
        assert_eq!(report.sun_hours, None);
        assert!(report.to_string().contains("Atlantis (unknown)"));
    }

    #[test]
    fn display_renders_summary_and_packages() {
        let mut profile = LoadProfile::new();
        profile.label = Some("Flat 3".into());
        profile.set_quantity("fridge", 1);
        profile.set_quantity("light_bulb", 4);
        profile.set_location("Kano");
        profile.set_backup_hours(6.0);

        let rendered = size_profile(&profile, &standard()).to_string();
        assert!(rendered.starts_with("=== Flat 3 ==="));
        assert!(rendered.contains("Kano (7 sun-hours)"));
        assert!(rendered.contains("Total appliance wattage: 260 W"));
        assert!(rendered.contains("~1.5 kVA"));
        assert!(rendered.contains("~200 Ah @ 12V"));
        assert!(rendered.contains("2 x 350W panels"));
        assert!(rendered.contains("[recommended] Starter 1.5kVA"));
    }

    #[test]
    fn report_serialises_camel_case() {
        let report = size_profile(&LoadProfile::new(), &standard());
        let json = serde_json::to_value(&report).expect("report serialises");
        assert!(json.get("label").is_none());
        assert_eq!(json["backupHours"], 0.0);
        assert_eq!(json["result"]["inverterSizeKva"], 1.5);
        assert_eq!(json["packages"][0]["level"], "recommended");
    }
}
