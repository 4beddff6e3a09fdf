//! Profit, margin, ROI and annualized return of a project.

use chrono::NaiveDate;
use flip_core::{
    AcquisitionBreakdown, CostBreakdown, PricingConfig, ProfitabilityResult, ProjectParameters,
};
use tracing::trace;

use crate::acquisition::brokerage_fee_with_vat;

/// Average days per month used to turn a day count into months.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Flat half-year interest on `debt` at an annual `rate_pct`.
///
/// This is a fixed approximation, not an amortization schedule.
pub fn project_interest(debt: f64, rate_pct: f64) -> f64 {
    debt * (rate_pct / 100.0) / 2.0
}

/// Calendar days between purchase and sale, at least 1.
pub fn project_days(purchase: NaiveDate, sale: NaiveDate) -> i64 {
    (sale - purchase).num_days().max(1)
}

/// Annualized compounding return (%) of turning `total_investment` into
/// `net_sale` over `months`.
///
/// Not a cash-flow IRR: there are no interim flows. Returns 0 when either
/// amount is not positive or the result is not finite.
pub fn annualized_return(net_sale: f64, total_investment: f64, months: f64) -> f64 {
    if !(total_investment > 0.0 && net_sale > 0.0) {
        return 0.0;
    }
    let raw = ((net_sale / total_investment).powf(12.0 / months) - 1.0) * 100.0;
    if raw.is_finite() {
        raw
    } else {
        trace!(net_sale, total_investment, months, "non-finite annualized return clamped");
        0.0
    }
}

/// `num / den`, or 0 when `den` is 0 or the quotient is not finite.
pub(crate) fn ratio_or_zero(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    let r = num / den;
    if r.is_finite() {
        r
    } else {
        0.0
    }
}

/// Combine costs and acquisition with the sale side of `params`.
///
/// Never fails: degenerate inputs (zero prices, same-day sale) produce zeros
/// rather than NaN or infinities.
pub fn compute_profitability(
    params: &ProjectParameters,
    costs: &CostBreakdown,
    acquisition: &AcquisitionBreakdown,
    config: &PricingConfig,
) -> ProfitabilityResult {
    let sale_brokerage_fee = brokerage_fee_with_vat(
        params.sale_price,
        params.sale_brokerage,
        params.sale_brokerage_pct,
        config.vat_rate,
    );
    let net_sale = params.sale_price - sale_brokerage_fee;
    let interest = project_interest(params.debt, params.interest_rate_pct);
    let total_investment = acquisition.total + costs.total_costs + interest;
    let net_profit = net_sale - total_investment;

    let roi = if total_investment > 0.0 {
        net_profit / total_investment * 100.0
    } else {
        0.0
    };
    let margin = if params.sale_price > 0.0 {
        net_profit / params.sale_price * 100.0
    } else {
        0.0
    };

    let days = project_days(params.purchase_date, params.sale_date);
    let months = days as f64 / DAYS_PER_MONTH;
    let area = params.total_area_m2();

    ProfitabilityResult {
        sale_brokerage_fee,
        net_sale,
        interest,
        total_investment,
        net_profit,
        roi,
        margin,
        equity_required: acquisition.total + costs.total_costs - params.debt,
        total_area_m2: area,
        purchase_per_m2: ratio_or_zero(params.purchase_price, area),
        investment_per_m2: ratio_or_zero(total_investment, area),
        sale_per_m2: ratio_or_zero(params.sale_price, area),
        profit_per_m2: ratio_or_zero(net_profit, area),
        tir: annualized_return(net_sale, total_investment, months),
        project_months: months,
        project_days: days,
    }
}
