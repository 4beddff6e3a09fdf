//! Pricing configurations for the two calculators in use.
//!
//! The legacy project page and the newer `calculadora` page price a renovation
//! with different tier tables and fee formulas. Each is a named
//! [`PricingConfig`] of the same cost model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lowest quality tier with its own table entry.
pub const MIN_QUALITY_TIER: i32 = 1;
/// Highest quality tier with its own table entry.
pub const MAX_QUALITY_TIER: i32 = 5;
/// Tier whose constants are used when a requested tier has no entry.
pub const DEFAULT_QUALITY_TIER: i32 = 3;

fn tier_index(tier: i32) -> Option<usize> {
    if (MIN_QUALITY_TIER..=MAX_QUALITY_TIER).contains(&tier) {
        usize::try_from(tier - MIN_QUALITY_TIER).ok()
    } else {
        None
    }
}

/// Per-tier values for quality levels 1..=5.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityTable(pub [f64; 5]);

impl QualityTable {
    /// Value for `tier`, falling back to the tier-3 entry.
    pub fn get(&self, tier: i32) -> f64 {
        lookup_or_default(self, tier, DEFAULT_QUALITY_TIER)
    }
}

/// Look up `tier` in `table`, using `default_tier` when `tier` is outside 1..=5.
///
/// If `default_tier` is itself out of range the middle entry is returned, so
/// the lookup is total.
pub fn lookup_or_default(table: &QualityTable, tier: i32, default_tier: i32) -> f64 {
    let idx = tier_index(tier)
        .or_else(|| tier_index(default_tier))
        .unwrap_or(2);
    table.0[idx]
}

/// Which calculator a configuration reproduces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingVariant {
    /// Project page calculator (`/[projectSlug]`).
    Legacy,
    /// Newer calculator page (`/calculadora/[projectSlug]`).
    #[default]
    V2,
}

impl fmt::Display for PricingVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingVariant::Legacy => f.write_str("legacy"),
            PricingVariant::V2 => f.write_str("v2"),
        }
    }
}

/// Unknown variant name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown pricing variant: {0} (expected `legacy` or `v2`)")]
pub struct ParseVariantError(pub String);

impl FromStr for PricingVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(PricingVariant::Legacy),
            "v2" => Ok(PricingVariant::V2),
            other => Err(ParseVariantError(other.to_string())),
        }
    }
}

/// How the interior-design line is priced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteriorDesignRule {
    /// €/m² of built area per tier.
    PerM2 { rate: QualityTable },
    /// Fraction of the materials line.
    MaterialsShare { share: f64 },
}

/// How the furniture line is priced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FurnitureRule {
    /// €/m² of built area per tier.
    PerM2 { rate: QualityTable },
    /// €/m² base plus a per-tier logistics fee plus a markup on the base.
    WithLogistics {
        rate: QualityTable,
        logistics: QualityTable,
        markup: f64,
    },
}

/// How architecture fees are priced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArchitectureRule {
    /// €/m² of built area per tier.
    PerM2 { rate: QualityTable },
    /// Flat fee per tier.
    Flat { fee: QualityTable },
}

/// Deed registration fee on purchase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistrationRule {
    /// Fixed amount regardless of price.
    Flat { fee: f64 },
    /// Base amount plus notary and registry rates on the purchase price.
    Scaled {
        base: f64,
        notary_rate: f64,
        registry_rate: f64,
    },
}

impl RegistrationRule {
    /// Registration fee for a purchase at `price`.
    pub fn fee(&self, price: f64) -> f64 {
        match *self {
            RegistrationRule::Flat { fee } => fee,
            RegistrationRule::Scaled {
                base,
                notary_rate,
                registry_rate,
            } => base + price * notary_rate + price * registry_rate,
        }
    }

    /// Part of the fee that does not depend on price.
    pub fn fixed_part(&self) -> f64 {
        match *self {
            RegistrationRule::Flat { fee } => fee,
            RegistrationRule::Scaled { base, .. } => base,
        }
    }

    /// Combined rate applied to the purchase price.
    pub fn proportional_rate(&self) -> f64 {
        match *self {
            RegistrationRule::Flat { .. } => 0.0,
            RegistrationRule::Scaled {
                notary_rate,
                registry_rate,
                ..
            } => notary_rate + registry_rate,
        }
    }
}

/// Complete set of constants one calculator prices a project with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub variant: PricingVariant,
    /// Construction work, €/m² (`obra`).
    pub construction_m2: QualityTable,
    /// Materials, €/m² (`calidadCoste`).
    pub materials_m2: QualityTable,
    pub interior_design: InteriorDesignRule,
    pub furniture: FurnitureRule,
    pub architecture: ArchitectureRule,
    pub registration: RegistrationRule,
    /// Building permit, €/m².
    pub permit_rate_m2: f64,
    /// Municipal gains tax (plusvalía) as a fraction of the sale price.
    pub plusvalia_rate: f64,
    /// Flat surcharge on interior design for classic-style homes.
    pub classic_surcharge: f64,
    pub terrace_rate_m2: f64,
    pub awning_cost: f64,
    pub sale_admin_fee: f64,
    pub holding_cost: f64,
    /// VAT applied on top of brokerage fees.
    pub vat_rate: f64,
    /// Property transfer tax (ITP) as a fraction of the purchase price.
    pub transfer_tax_rate: f64,
}

impl PricingConfig {
    /// Constants of the legacy project page.
    pub fn legacy() -> Self {
        Self {
            variant: PricingVariant::Legacy,
            construction_m2: QualityTable([350.0, 420.0, 560.0, 700.0, 900.0]),
            materials_m2: QualityTable([300.0, 400.0, 512.0, 650.0, 850.0]),
            interior_design: InteriorDesignRule::PerM2 {
                rate: QualityTable([40.0, 50.0, 59.1, 75.0, 95.0]),
            },
            furniture: FurnitureRule::PerM2 {
                rate: QualityTable([60.0, 80.0, 101.7, 130.0, 170.0]),
            },
            architecture: ArchitectureRule::PerM2 {
                rate: QualityTable([25.0, 32.0, 38.3, 48.0, 60.0]),
            },
            registration: RegistrationRule::Flat { fee: 1530.0 },
            permit_rate_m2: 34.2,
            plusvalia_rate: 0.0027,
            ..Self::shared()
        }
    }

    /// Constants of the newer calculator page.
    pub fn v2() -> Self {
        Self {
            variant: PricingVariant::V2,
            construction_m2: QualityTable([437.0, 540.0, 631.0, 631.0, 631.0]),
            materials_m2: QualityTable([392.0, 484.0, 545.0, 900.0, 1149.0]),
            interior_design: InteriorDesignRule::MaterialsShare { share: 0.15 },
            furniture: FurnitureRule::WithLogistics {
                rate: QualityTable([27.0, 36.0, 86.0, 108.0, 146.0]),
                logistics: QualityTable([800.0, 800.0, 900.0, 1600.0, 1800.0]),
                markup: 0.11,
            },
            architecture: ArchitectureRule::Flat {
                fee: QualityTable([3630.0, 3630.0, 6050.0, 12100.0, 18150.0]),
            },
            registration: RegistrationRule::Scaled {
                base: 145.2,
                notary_rate: 0.0008,
                registry_rate: 0.0005,
            },
            permit_rate_m2: 42.21,
            plusvalia_rate: 0.00267,
            ..Self::shared()
        }
    }

    pub fn for_variant(variant: PricingVariant) -> Self {
        match variant {
            PricingVariant::Legacy => Self::legacy(),
            PricingVariant::V2 => Self::v2(),
        }
    }

    // Constants both calculators agree on; the tier tables are overwritten.
    fn shared() -> Self {
        let zero = QualityTable([0.0; 5]);
        Self {
            variant: PricingVariant::V2,
            construction_m2: zero,
            materials_m2: zero,
            interior_design: InteriorDesignRule::PerM2 { rate: zero },
            furniture: FurnitureRule::PerM2 { rate: zero },
            architecture: ArchitectureRule::Flat { fee: zero },
            registration: RegistrationRule::Flat { fee: 0.0 },
            permit_rate_m2: 0.0,
            plusvalia_rate: 0.0,
            classic_surcharge: 790.0,
            terrace_rate_m2: 36.5,
            awning_cost: 2500.0,
            sale_admin_fee: 800.0,
            holding_cost: 2490.0,
            vat_rate: 0.21,
            transfer_tax_rate: 0.02,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self::for_variant(PricingVariant::default())
    }
}
