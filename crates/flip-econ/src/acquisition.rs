//! Purchase-side costs.

use flip_core::{AcquisitionBreakdown, PricingConfig};

/// Brokerage rate including VAT as a fraction of the price, 0 when no broker is used.
pub fn brokerage_rate_with_vat(enabled: bool, pct: f64, vat_rate: f64) -> f64 {
    if enabled {
        pct / 100.0 * (1.0 + vat_rate)
    } else {
        0.0
    }
}

/// Brokerage fee on `price` including VAT.
pub fn brokerage_fee_with_vat(price: f64, enabled: bool, pct: f64, vat_rate: f64) -> f64 {
    let base = if enabled { price * (pct / 100.0) } else { 0.0 };
    base * (1.0 + vat_rate)
}

/// Total cost of acquiring a property at `purchase_price`.
pub fn compute_acquisition(
    purchase_price: f64,
    brokerage: bool,
    brokerage_pct: f64,
    config: &PricingConfig,
) -> AcquisitionBreakdown {
    let brokerage_fee =
        brokerage_fee_with_vat(purchase_price, brokerage, brokerage_pct, config.vat_rate);
    let registration = config.registration.fee(purchase_price);
    let itp = purchase_price * config.transfer_tax_rate;
    AcquisitionBreakdown {
        brokerage_fee,
        registration,
        itp,
        total: purchase_price + brokerage_fee + registration + itp,
    }
}
