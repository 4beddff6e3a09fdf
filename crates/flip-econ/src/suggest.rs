//! Suggested sale price for a fresh purchase price.

/// Multiple of the purchase price proposed as sale price.
pub const SUGGESTED_MARKUP: f64 = 1.6;

/// `purchase_price * 1.6`, rounded to the nearest thousand euros.
///
/// Non-finite or non-positive prices suggest 0.
pub fn suggest_sale_price(purchase_price: f64) -> f64 {
    if !(purchase_price.is_finite() && purchase_price > 0.0) {
        return 0.0;
    }
    (purchase_price * SUGGESTED_MARKUP / 1000.0).round() * 1000.0
}

/// Sale price to show after the purchase price changed: the user's own value
/// once they have edited it, the suggestion otherwise.
pub fn resolve_sale_price(purchase_price: f64, current_sale: f64, user_overridden: bool) -> f64 {
    if user_overridden {
        current_sale
    } else {
        suggest_sale_price(purchase_price)
    }
}
