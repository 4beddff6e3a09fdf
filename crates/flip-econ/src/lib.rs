#![deny(warnings)]

//! Financial computation engine for renovation flips.
//!
//! Every function here is pure: the same [`ProjectParameters`] and
//! [`PricingConfig`] always give the same records, and degenerate inputs
//! (zero prices, empty areas, same-day sales) produce zeros instead of
//! errors or non-finite values.
//!
//! ```
//! use flip_core::{PricingConfig, ProjectParameters};
//! let analysis = flip_econ::evaluate(&ProjectParameters::default(), &PricingConfig::v2());
//! assert!(analysis.profitability.margin.is_finite());
//! ```

pub mod acquisition;
pub mod costs;
pub mod inverse;
pub mod portfolio;
pub mod profitability;
pub mod sensitivity;
pub mod suggest;

pub use acquisition::{brokerage_fee_with_vat, brokerage_rate_with_vat, compute_acquisition};
pub use costs::compute_costs;
pub use inverse::{break_even_sale_price, investment_base, max_purchase_price, required_sale_price};
pub use portfolio::{
    filter_entries, project_metrics, sort_entries, summarize, PortfolioEntry, PortfolioTotals, ProjectMetrics,
    SortDirection, SortKey,
};
pub use profitability::{
    annualized_return, compute_profitability, project_days, project_interest, DAYS_PER_MONTH,
};
pub use sensitivity::{
    cell_margin_pct, price_variance_matrix, sweep_quality, QualityScenario, VarianceCell,
    VarianceMatrix, VarianceRow, PRICE_VARIATIONS_PCT, SWEEP_QUALITY_TIERS,
    SWEEP_TARGET_MARGINS_PCT,
};
pub use suggest::{resolve_sale_price, suggest_sale_price, SUGGESTED_MARKUP};

use flip_core::{
    CommitteeRecommendation, IrrBand, MarginVerdict, PricingConfig, ProjectAnalysis,
    ProjectParameters,
};
use tracing::debug;

/// Run the cost, acquisition and profitability models for `params` and
/// classify the resulting margin and return.
pub fn evaluate(params: &ProjectParameters, config: &PricingConfig) -> ProjectAnalysis {
    let costs = compute_costs(params, config, params.quality);
    let acquisition = compute_acquisition(
        params.purchase_price,
        params.purchase_brokerage,
        params.purchase_brokerage_pct,
        config,
    );
    let profitability = compute_profitability(params, &costs, &acquisition, config);
    let margin = profitability.margin;
    debug!(
        variant = %config.variant,
        quality = params.quality,
        margin,
        roi = profitability.roi,
        tir = profitability.tir,
        "project evaluated"
    );
    ProjectAnalysis {
        verdict: MarginVerdict::from_margin(margin),
        recommendation: CommitteeRecommendation::from_margin(margin),
        irr_band: IrrBand::from_tir(profitability.tir),
        costs,
        acquisition,
        profitability,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_close, reference_params};
    use flip_core::PricingVariant;

    #[test]
    fn legacy_reference_analysis() {
        let a = evaluate(&reference_params(), &PricingConfig::legacy());
        assert_close(a.costs.hard_costs, 194_782.4);
        assert_close(a.acquisition.total, 1_087_830.0);
        let expected_total = 1_087_830.0 + a.costs.total_costs;
        assert_close(a.profitability.total_investment, expected_total);
        // 1 065 000 + 1 530 registration + 21 300 ITP, plus 213 847.4 of costs.
        assert_close(a.profitability.total_investment, 1_301_677.4);
        assert_close(a.profitability.margin, 15.0151625);
        assert_eq!(a.verdict, MarginVerdict::Tight);
        assert_eq!(a.recommendation, CommitteeRecommendation::Negotiate);
        let expected_margin = (1_600_000.0 - 58_080.0 - expected_total) / 1_600_000.0 * 100.0;
        assert_close(a.profitability.margin, expected_margin);
        assert_eq!(a.verdict, MarginVerdict::from_margin(expected_margin));
        assert_eq!(
            a.recommendation,
            CommitteeRecommendation::from_margin(expected_margin)
        );
    }

    #[test]
    fn variants_price_the_same_project_differently() {
        let p = reference_params();
        let legacy = evaluate(&p, &PricingConfig::for_variant(PricingVariant::Legacy));
        let v2 = evaluate(&p, &PricingConfig::for_variant(PricingVariant::V2));
        assert_ne!(legacy.costs.total_costs, v2.costs.total_costs);
        assert_ne!(legacy.acquisition.registration, v2.acquisition.registration);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let p = reference_params();
        let cfg = PricingConfig::v2();
        assert_eq!(evaluate(&p, &cfg), evaluate(&p, &cfg));
    }

    #[test]
    fn empty_form_does_not_panic() {
        let p = ProjectParameters {
            built_area_m2: 0.0,
            common_area_m2: 0.0,
            purchase_price: 0.0,
            sale_price: 0.0,
            ..reference_params()
        };
        let a = evaluate(&p, &PricingConfig::v2());
        assert_eq!(a.profitability.margin, 0.0);
        assert_eq!(a.profitability.tir, 0.0);
        assert_eq!(a.profitability.total_area_m2, 1.0);
        assert_eq!(a.verdict, MarginVerdict::DoNotProceed);
    }
}
