//! Inverse solvers: the sale price needed for a target margin, and the highest
//! purchase price that still reaches it.
//!
//! Margin is `(ventaNeta - inversionTotal) / precioVenta`. Sale-side brokerage
//! and plusvalía scale with the sale price, everything else is held fixed, so
//! the equation is linear in the unknown price and is solved in closed form.

use flip_core::{PricingConfig, ProjectParameters};
use tracing::debug;

use crate::acquisition::{brokerage_fee_with_vat, brokerage_rate_with_vat, compute_acquisition};
use crate::costs::compute_costs;
use crate::profitability::project_interest;

/// Investment that does not depend on the sale price: acquisition, costs
/// without plusvalía, and interest, for `params` priced at `quality`.
pub fn investment_base(params: &ProjectParameters, config: &PricingConfig, quality: i32) -> f64 {
    let costs = compute_costs(params, config, quality);
    let acquisition = compute_acquisition(
        params.purchase_price,
        params.purchase_brokerage,
        params.purchase_brokerage_pct,
        config,
    );
    acquisition.total
        + costs.price_independent_costs()
        + project_interest(params.debt, params.interest_rate_pct)
}

/// Sale price at which a project with `investment_base` reaches
/// `target_margin_pct`.
///
/// The plusvalía rate of `config` is part of the denominator. Returns 0 when
/// the target is unreachable (denominator ≤ 0) or the result is not finite.
pub fn required_sale_price(
    config: &PricingConfig,
    investment_base: f64,
    target_margin_pct: f64,
    sale_brokerage: bool,
    sale_brokerage_pct: f64,
) -> f64 {
    let commission = brokerage_rate_with_vat(sale_brokerage, sale_brokerage_pct, config.vat_rate);
    let denominator = 1.0 - commission - config.plusvalia_rate - target_margin_pct / 100.0;
    if !(denominator > 0.0) {
        debug!(target_margin_pct, denominator, "target margin unreachable");
        return 0.0;
    }
    let price = investment_base / denominator;
    if price.is_finite() {
        price
    } else {
        0.0
    }
}

/// Lowest sale price with no loss for `params` at its own quality tier.
pub fn break_even_sale_price(params: &ProjectParameters, config: &PricingConfig) -> f64 {
    required_sale_price(
        config,
        investment_base(params, config, params.quality),
        0.0,
        params.sale_brokerage,
        params.sale_brokerage_pct,
    )
}

/// Highest purchase price that still reaches `target_margin_pct` at the
/// current sale price.
///
/// Negative results are clamped to 0.
pub fn max_purchase_price(
    params: &ProjectParameters,
    config: &PricingConfig,
    target_margin_pct: f64,
) -> f64 {
    let costs = compute_costs(params, config, params.quality);
    let sale_fee = brokerage_fee_with_vat(
        params.sale_price,
        params.sale_brokerage,
        params.sale_brokerage_pct,
        config.vat_rate,
    );
    let net_sale = params.sale_price - sale_fee;
    let required_profit = params.sale_price * target_margin_pct / 100.0;
    let max_investment = net_sale - required_profit;

    // What is left for the purchase itself and its price-proportional fees.
    let envelope = max_investment
        - costs.total_costs
        - project_interest(params.debt, params.interest_rate_pct)
        - config.registration.fixed_part();
    let divisor = 1.0
        + brokerage_rate_with_vat(
            params.purchase_brokerage,
            params.purchase_brokerage_pct,
            config.vat_rate,
        )
        + config.transfer_tax_rate
        + config.registration.proportional_rate();

    let price = envelope / divisor;
    if price.is_finite() {
        price.max(0.0)
    } else {
        0.0
    }
}
