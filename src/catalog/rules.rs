//! Sizing rule rows for the inverter, battery, and panel categories.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Half-open wattage range `[min_watts, max_watts)`.
///
/// A load exactly equal to `max_watts` belongs to the next band, never to
/// this one.
///
/// # Examples
///
/// ```
/// use solar_sizer::catalog::WattBand;
///
/// let band = WattBand::new(0.0, 1000.0);
/// assert!(band.contains(999.9));
/// assert!(!band.contains(1000.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WattBand {
    /// Inclusive lower bound (W).
    pub min_watts: f64,
    /// Exclusive upper bound (W).
    pub max_watts: f64,
}

impl WattBand {
    pub fn new(min_watts: f64, max_watts: f64) -> Self {
        Self {
            min_watts,
            max_watts,
        }
    }

    /// Returns `true` when `watts >= min_watts && watts < max_watts`.
    pub fn contains(&self, watts: f64) -> bool {
        watts >= self.min_watts && watts < self.max_watts
    }
}

impl fmt::Display for WattBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) W", self.min_watts, self.max_watts)
    }
}

/// A rule row keyed by a wattage band.
///
/// Implemented by every rule category so the containment scan can be
/// shared between them.
pub trait Banded {
    /// Wattage band this rule applies to.
    fn band(&self) -> WattBand;
}

/// Maps a wattage band to one recommended inverter rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InverterRule {
    pub min_watts: f64,
    pub max_watts: f64,
    /// Recommended inverter apparent power (kVA).
    pub kva: f64,
}

/// Maps a wattage band and a minimum backup duration to a battery bank.
///
/// Several rules may share one band at different `min_backup_hours`
/// thresholds ("tiers"); the longer the required backup, the bigger the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BatteryRule {
    pub min_watts: f64,
    pub max_watts: f64,
    /// Smallest requested backup duration (hours) this tier serves.
    pub min_backup_hours: f64,
    /// Bank capacity (Ah).
    pub battery_ah: f64,
    /// Bank nominal voltage (V).
    pub battery_voltage: f64,
}

/// Maps a wattage band to a fixed panel array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PanelRule {
    pub min_watts: f64,
    pub max_watts: f64,
    /// Assumed hours per day the declared load runs, used for energy figures.
    pub average_daily_use_hours: f64,
    pub panel_count: u32,
    /// Rating of one panel (W).
    pub single_panel_wattage: f64,
}

/// A rule sequence that holds at least one rule.
///
/// The last rule doubles as the open-ended ceiling for loads no band
/// contains, so it must always exist.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet<R>(Vec<R>);

impl<R> RuleSet<R> {
    /// Wraps `rules`, or returns `None` if the sequence is empty.
    pub fn new(rules: Vec<R>) -> Option<Self> {
        (!rules.is_empty()).then_some(Self(rules))
    }

    /// The final rule in stored order.
    pub fn last_rule(&self) -> &R {
        // non-empty by construction
        &self.0[self.0.len() - 1]
    }
}

impl<R> Deref for RuleSet<R> {
    type Target = [R];

    fn deref(&self) -> &[R] {
        &self.0
    }
}

macro_rules! impl_banded {
    ($($rule:ty),*) => {
        $(
            impl Banded for $rule {
                fn band(&self) -> WattBand {
                    WattBand::new(self.min_watts, self.max_watts)
                }
            }
        )*
    };
}

impl_banded!(InverterRule, BatteryRule, PanelRule);
