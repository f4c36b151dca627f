//! Per-category rule selection.
//!
//! Inverter and panel rules use a first-match containment scan in stored
//! order. Battery rules are narrowed by band, then the highest tier the
//! requested backup still satisfies wins. Every path ends on some rule:
//! when nothing matches, the last configured rule is the ceiling.

use serde::Serialize;

use crate::catalog::{Banded, BatteryRule, InverterRule, PanelRule, RuleCatalog, RuleSet};

/// How a rule was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Match {
    /// First rule in stored order whose band contains the load.
    InBand,
    /// Highest battery tier whose threshold the requested backup meets.
    Tier,
    /// Baseline tier of the band; the requested backup is below every tier.
    Baseline,
    /// No band contains the load; the last rule of the sequence.
    LastRule,
}

/// A chosen rule with its position in the catalog sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selected<'a, R> {
    pub rule: &'a R,
    /// Index into the stored (unsorted) rule sequence.
    pub index: usize,
    pub kind: Match,
}

impl<'a, R> Selected<'a, R> {
    fn last_of(rules: &'a RuleSet<R>) -> Self {
        Self {
            rule: rules.last_rule(),
            index: rules.len() - 1,
            kind: Match::LastRule,
        }
    }
}

/// Returns the first rule whose band contains `watts`, else the last rule.
pub fn select_banded<R: Banded>(rules: &RuleSet<R>, watts: f64) -> Selected<'_, R> {
    rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.band().contains(watts))
        .map_or_else(
            || Selected::last_of(rules),
            |(index, rule)| Selected {
                rule,
                index,
                kind: Match::InBand,
            },
        )
}

/// Picks the battery tier for `watts` and `backup_hours`.
///
/// 1. Keep rules whose band contains `watts` (none: last rule overall).
/// 2. Stable-sort them by `min_backup_hours`, highest first.
/// 3. Take the first with `min_backup_hours <= backup_hours`.
/// 4. Otherwise take the band's zero-threshold tier, or its lowest tier if
///    the band has no zero-threshold rule. Tied thresholds keep catalog order.
pub fn select_battery(
    rules: &RuleSet<BatteryRule>,
    watts: f64,
    backup_hours: f64,
) -> Selected<'_, BatteryRule> {
    let mut in_band: Vec<(usize, &BatteryRule)> = rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| rule.band().contains(watts))
        .collect();
    in_band.sort_by(|(_, a), (_, b)| b.min_backup_hours.total_cmp(&a.min_backup_hours));

    let Some(&(last_index, lowest)) = in_band.last() else {
        return Selected::last_of(rules);
    };

    if let Some(&(index, rule)) = in_band
        .iter()
        .find(|(_, rule)| rule.min_backup_hours <= backup_hours)
    {
        return Selected {
            rule,
            index,
            kind: Match::Tier,
        };
    }

    // thresholds are non-negative, so a zero tier is always the lowest;
    // ties resolve to the earliest rule in catalog order
    let (index, rule) = in_band
        .iter()
        .copied()
        .find(|(_, rule)| rule.min_backup_hours == lowest.min_backup_hours)
        .unwrap_or((last_index, lowest));
    Selected {
        rule,
        index,
        kind: Match::Baseline,
    }
}

/// The inverter, battery, and panel rules chosen for one load.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSelection<'a> {
    pub inverter: Selected<'a, InverterRule>,
    pub battery: Selected<'a, BatteryRule>,
    pub panel: Selected<'a, PanelRule>,
}

impl<'a> RuleSelection<'a> {
    /// Runs the three independent selection passes.
    pub fn resolve(catalog: &'a RuleCatalog, total_wattage: f64, backup_hours: f64) -> Self {
        Self {
            inverter: select_banded(catalog.inverter_rules(), total_wattage),
            battery: select_battery(catalog.battery_rules(), total_wattage, backup_hours),
            panel: select_banded(catalog.panel_rules(), total_wattage),
        }
    }
}
