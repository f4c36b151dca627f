//! Final equipment figures derived from the selected rules.

use std::fmt;

use serde::Serialize;

use super::select::RuleSelection;

/// Assumed inverter power factor for kVA to kW conversion.
pub const POWER_FACTOR: f64 = 0.8;

/// Recommended inverter, battery bank, and panel array for one load.
///
/// Derived on every call, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingResult {
    /// Simultaneous draw of every declared appliance (W).
    pub total_wattage: f64,
    pub daily_energy_wh: f64,
    pub daily_energy_kwh: f64,
    /// Real power rating, rounded to two decimals (kW).
    pub inverter_size_kw: f64,
    pub inverter_size_kva: f64,
    pub battery_capacity_wh: f64,
    pub battery_capacity_ah: f64,
    pub battery_voltage: f64,
    pub panel_count: u32,
    pub single_panel_wattage: f64,
}

impl SizingResult {
    /// Turns the chosen rules into final figures for `total_wattage`.
    pub fn from_selection(total_wattage: f64, selection: &RuleSelection<'_>) -> Self {
        let inverter = selection.inverter.rule;
        let battery = selection.battery.rule;
        let panel = selection.panel.rule;

        let daily_energy_wh = total_wattage * panel.average_daily_use_hours;

        Self {
            total_wattage,
            daily_energy_wh,
            daily_energy_kwh: daily_energy_wh / 1000.0,
            inverter_size_kw: round_to_hundredths(inverter.kva * POWER_FACTOR),
            inverter_size_kva: inverter.kva,
            battery_capacity_wh: battery.battery_ah * battery.battery_voltage,
            battery_capacity_ah: battery.battery_ah,
            battery_voltage: battery.battery_voltage,
            panel_count: panel.panel_count,
            single_panel_wattage: panel.single_panel_wattage,
        }
    }

    /// Installed panel capacity (W).
    pub fn array_wattage(&self) -> f64 {
        f64::from(self.panel_count) * self.single_panel_wattage
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl fmt::Display for SizingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Load Summary ---")?;
        writeln!(f, "Total appliance wattage: {} W", self.total_wattage)?;
        writeln!(f, "Daily energy use:        {:.2} kWh", self.daily_energy_kwh)?;
        writeln!(f, "--- Recommended System ---")?;
        writeln!(
            f,
            "Inverter:                ~{:.1} kVA ({:.2} kW)",
            self.inverter_size_kva, self.inverter_size_kw
        )?;
        writeln!(
            f,
            "Battery bank:            ~{} Ah @ {}V ({:.0} Wh)",
            self.battery_capacity_ah, self.battery_voltage, self.battery_capacity_wh
        )?;
        write!(
            f,
            "Solar panels:            {} x {}W panels",
            self.panel_count, self.single_panel_wattage
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn kw_is_rounded_to_two_decimals() {
        assert_eq!(round_to_hundredths(1.5 * POWER_FACTOR), 1.2);
        assert_eq!(round_to_hundredths(3.33 * POWER_FACTOR), 2.66);
        assert_relative_eq!(round_to_hundredths(7.5 * POWER_FACTOR), 6.0);
    }

    #[test]
    fn display_lists_every_component() {
        let result = SizingResult {
            total_wattage: 150.0,
            daily_energy_wh: 600.0,
            daily_energy_kwh: 0.6,
            inverter_size_kw: 1.2,
            inverter_size_kva: 1.5,
            battery_capacity_wh: 1200.0,
            battery_capacity_ah: 100.0,
            battery_voltage: 12.0,
            panel_count: 2,
            single_panel_wattage: 350.0,
        };
        let rendered = result.to_string();
        assert!(rendered.contains("Total appliance wattage: 150 W"));
        assert!(rendered.contains("0.60 kWh"));
        assert!(rendered.contains("~1.5 kVA"));
        assert!(rendered.contains("~100 Ah @ 12V"));
        assert!(rendered.contains("2 x 350W panels"));
        assert_eq!(result.array_wattage(), 700.0);
    }
}
