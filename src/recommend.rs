//! Off-the-shelf packages ranked against a computed inverter size.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A pre-built system the installer sells, listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Package {
    pub id: String,
    pub title: String,
    pub inverter: String,
    pub battery: String,
    pub panel: String,
    /// Display price, kept as text (currency formatting is the catalog's).
    pub price: String,
    pub description: String,
    pub ideal_for: String,
    /// Inverter rating the package is built around (kVA).
    pub inverter_kva: f64,
}

/// How well a package fits the recommended inverter size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLevel {
    /// Covers the load without more than 2 kVA of headroom.
    Recommended,
    /// Covers the load with room to grow.
    Upgrade,
    /// Smaller than the recommended inverter.
    Basic,
}

impl RecommendationLevel {
    /// Width of the "right size" window above the required rating (kVA).
    pub const HEADROOM_KVA: f64 = 2.0;

    /// Classifies a package rated `package_kva` against `required_kva`.
    pub fn classify(required_kva: f64, package_kva: f64) -> Self {
        if required_kva <= package_kva && required_kva > package_kva - Self::HEADROOM_KVA {
            Self::Recommended
        } else if required_kva <= package_kva {
            Self::Upgrade
        } else {
            Self::Basic
        }
    }
}

impl fmt::Display for RecommendationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Recommended => "recommended",
            Self::Upgrade => "upgrade",
            Self::Basic => "basic",
        })
    }
}

/// A catalog package paired with its fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMatch {
    pub level: RecommendationLevel,
    pub package: Package,
}

/// Classifies every package against `required_kva`.
///
/// Packages stay in catalog order, each tagged with its level.
///
/// # Arguments
///
/// * `required_kva` - Inverter rating from the sizing result
/// * `packages` - Catalog packages in stored order
///
/// # Returns
///
/// One `PackageMatch` per package, in the same order as `packages`.
pub fn recommend_packages(required_kva: f64, packages: &[Package]) -> Vec<PackageMatch> {
    packages
        .iter()
        .map(|package| PackageMatch {
            level: RecommendationLevel::classify(required_kva, package.inverter_kva),
            package: package.clone(),
        })
        .collect()
}
