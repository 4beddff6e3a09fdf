#![deny(warnings)]

//! Core domain models for the flip calculator.
//!
//! This crate defines the serializable input parameter set, the pricing
//! configurations of both calculators, the derived cost and profitability
//! records, and the margin classifications applied to them.

pub mod params;
pub mod pricing;
pub mod results;

pub use params::{
    validate_parameters, validate_prices, ProjectParameters, SnapshotError, ValidationError,
    DEFAULT_PROJECT_MONTHS,
};
pub use pricing::{
    lookup_or_default, ArchitectureRule, FurnitureRule, InteriorDesignRule, ParseVariantError,
    PricingConfig, PricingVariant, QualityTable, RegistrationRule, DEFAULT_QUALITY_TIER,
    MAX_QUALITY_TIER, MIN_QUALITY_TIER,
};
pub use results::{
    is_low_margin, AcquisitionBreakdown, CommitteeRecommendation, CostBreakdown, IrrBand,
    MarginBand, MarginVerdict, ProfitabilityResult, ProjectAnalysis, ACCEPTABLE_IRR_PCT,
    COMMITTEE_BUY_MARGIN_PCT, COMMITTEE_NEGOTIATE_MARGIN_PCT, OPPORTUNITY_MARGIN_PCT,
    STRONG_IRR_PCT, TIGHT_MARGIN_PCT,
};
