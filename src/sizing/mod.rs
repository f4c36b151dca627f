//! The sizing engine: load profile plus rule catalog in, equipment figures out.
//!
//! [`compute_sizing`] is pure. It reads the catalog by reference and never
//! fails for a validated catalog; out-of-range loads land on the last
//! configured rule of each category.

mod result;
mod select;

use tracing::debug;

use crate::catalog::RuleCatalog;
use crate::profile::LoadProfile;

pub use result::{POWER_FACTOR, SizingResult};
pub use select::{Match, RuleSelection, Selected, select_banded, select_battery};

/// Sizes the inverter, battery bank, and panel array for `profile`.
///
/// # Arguments
///
/// * `profile` - Declared load and requested backup hours
/// * `catalog` - Validated rule catalog
///
/// # Returns
///
/// The derived `SizingResult`. Loads outside every band use the last rule
/// of each category.
///
/// # Examples
///
/// ```
/// use solar_sizer::catalog::RuleCatalog;
/// use solar_sizer::profile::LoadProfile;
/// use solar_sizer::sizing::compute_sizing;
///
/// let catalog = RuleCatalog::from_preset("standard").unwrap();
/// let mut profile = LoadProfile::new();
/// profile.set_quantity("tv", 1);
/// profile.set_backup_hours(4.0);
///
/// let result = compute_sizing(&profile, &catalog);
/// assert_eq!(result.total_wattage, 150.0);
/// assert_eq!(result.inverter_size_kva, 1.5);
/// ```
pub fn compute_sizing(profile: &LoadProfile, catalog: &RuleCatalog) -> SizingResult {
    let total_wattage = profile.total_wattage(catalog.appliances());
    let selection = RuleSelection::resolve(catalog, total_wattage, profile.backup_hours);

    debug!(
        total_wattage,
        backup_hours = profile.backup_hours,
        inverter_rule = selection.inverter.index,
        inverter_match = ?selection.inverter.kind,
        battery_rule = selection.battery.index,
        battery_match = ?selection.battery.kind,
        panel_rule = selection.panel.index,
        panel_match = ?selection.panel.kind,
        "rules selected"
    );

    SizingResult::from_selection(total_wattage, &selection)
}
