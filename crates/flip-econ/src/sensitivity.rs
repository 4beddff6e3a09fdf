//! What-if tables: required prices per quality tier, and margin over a grid
//! of purchase and sale price variations.

use flip_core::{MarginBand, PricingConfig, ProjectParameters};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inverse::{investment_base, required_sale_price};

/// Tiers compared in the quality sweep. Tier 1 is not part of the table.
pub const SWEEP_QUALITY_TIERS: [i32; 4] = [2, 3, 4, 5];
/// Fixed target margins (%) shown for every tier next to the user's target.
pub const SWEEP_TARGET_MARGINS_PCT: [f64; 3] = [13.0, 15.0, 20.0];
/// Variations (%) applied to both axes of the price matrix.
pub const PRICE_VARIATIONS_PCT: [f64; 5] = [-10.0, -5.0, 0.0, 5.0, 10.0];

/// One row of the quality comparison table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityScenario {
    pub quality: i32,
    /// Investment before sale-price-dependent costs.
    pub investment_base: f64,
    pub required_price_13: f64,
    pub required_price_15: f64,
    pub required_price_20: f64,
    /// Required sale price at the user's target margin.
    pub required_price_target: f64,
    /// Net profit when selling at `required_price_target`.
    pub expected_profit: f64,
}

/// Price each tier of [`SWEEP_QUALITY_TIERS`] and solve for the sale price
/// reaching 13 %, 15 %, 20 % and `target_margin_pct`.
pub fn sweep_quality(
    params: &ProjectParameters,
    config: &PricingConfig,
    target_margin_pct: f64,
) -> Vec<QualityScenario> {
    let solve = |base: f64, target: f64| {
        required_sale_price(
            config,
            base,
            target,
            params.sale_brokerage,
            params.sale_brokerage_pct,
        )
    };

    let scenarios: Vec<QualityScenario> = SWEEP_QUALITY_TIERS
        .iter()
        .map(|&quality| {
            let base = investment_base(params, config, quality);
            let [p13, p15, p20] = SWEEP_TARGET_MARGINS_PCT.map(|t| solve(base, t));
            let target_price = solve(base, target_margin_pct);
            let expected_profit = if target_price > 0.0 {
                let at_target = params.with_quality(quality).with_sale_price(target_price);
                crate::evaluate(&at_target, config).profitability.net_profit
            } else {
                0.0
            };
            QualityScenario {
                quality,
                investment_base: base,
                required_price_13: p13,
                required_price_15: p15,
                required_price_20: p20,
                required_price_target: target_price,
                expected_profit,
            }
        })
        .collect();
    debug!(
        tiers = scenarios.len(),
        target_margin_pct, "quality sweep built"
    );
    scenarios
}

/// One purchase/sale combination of the price matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VarianceCell {
    pub purchase_price: f64,
    pub sale_price: f64,
    pub purchase_variation_pct: f64,
    pub sale_variation_pct: f64,
    /// Margin over sale price, clamped to [-100, 100].
    pub margin_pct: f64,
    pub band: MarginBand,
    /// The unvaried purchase and sale prices.
    pub is_base: bool,
}

/// Cells sharing one purchase price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VarianceRow {
    pub purchase_price: f64,
    pub variation_pct: f64,
    pub cells: Vec<VarianceCell>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VarianceMatrix {
    /// Column headers, in the order cells appear within each row.
    pub sale_prices: Vec<f64>,
    pub rows: Vec<VarianceRow>,
}

/// Margin (%) of selling at `sale` after buying at `purchase` with
/// `total_costs` on top, clamped to [-100, 100]. NaN maps to 0.
pub fn cell_margin_pct(purchase: f64, sale: f64, total_costs: f64) -> f64 {
    let margin = (sale - (purchase + total_costs)) / sale * 100.0;
    if margin.is_nan() {
        0.0
    } else {
        margin.clamp(-100.0, 100.0)
    }
}

fn varied_prices(base: f64) -> Vec<(f64, f64)> {
    PRICE_VARIATIONS_PCT
        .iter()
        .map(|&pct| (pct, (base * (1.0 + pct / 100.0)).round()))
        .filter(|&(_, price)| price.is_finite() && price > 0.0)
        .collect()
}

/// Margin grid over [`PRICE_VARIATIONS_PCT`] of both prices.
///
/// Prices are rounded to whole euros. Variations that give a price ≤ 0 are
/// left out, so a non-positive base price yields an empty axis.
pub fn price_variance_matrix(base_purchase: f64, base_sale: f64, total_costs: f64) -> VarianceMatrix {
    let purchases = varied_prices(base_purchase);
    let sales = varied_prices(base_sale);

    let rows: Vec<VarianceRow> = purchases
        .iter()
        .map(|&(purchase_pct, purchase)| VarianceRow {
            purchase_price: purchase,
            variation_pct: purchase_pct,
            cells: sales
                .iter()
                .map(|&(sale_pct, sale)| {
                    let margin_pct = cell_margin_pct(purchase, sale, total_costs);
                    VarianceCell {
                        purchase_price: purchase,
                        sale_price: sale,
                        purchase_variation_pct: purchase_pct,
                        sale_variation_pct: sale_pct,
                        margin_pct,
                        band: MarginBand::from_margin(margin_pct),
                        is_base: purchase_pct == 0.0 && sale_pct == 0.0,
                    }
                })
                .collect(),
        })
        .collect();

    debug!(
        rows = rows.len(),
        columns = sales.len(),
        "price variance matrix built"
    );
    VarianceMatrix {
        sale_prices: sales.into_iter().map(|(_, price)| price).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate;
    use crate::test_support::{assert_close, reference_params};
    use proptest::prelude::*;

    #[test]
    fn sweep_covers_tiers_two_to_five() {
        let rows = sweep_quality(&reference_params(), &PricingConfig::v2(), 15.0);
        let tiers: Vec<i32> = rows.iter().map(|r| r.quality).collect();
        assert_eq!(tiers, vec![2, 3, 4, 5]);
        assert!(rows.windows(2).all(|w| w[0].investment_base < w[1].investment_base));
    }

    #[test]
    fn sweep_prices_grow_with_target() {
        for row in sweep_quality(&reference_params(), &PricingConfig::legacy(), 17.5) {
            assert!(row.required_price_13 < row.required_price_15);
            assert!(row.required_price_15 < row.required_price_target);
            assert!(row.required_price_target < row.required_price_20);
        }
    }

    #[test]
    fn sweep_profit_matches_target_margin() {
        let p = reference_params();
        let cfg = PricingConfig::v2();
        for row in sweep_quality(&p, &cfg, 15.0) {
            assert_close(row.required_price_15, row.required_price_target);
            let margin = row.expected_profit / row.required_price_target * 100.0;
            assert!((margin - 15.0).abs() < 1e-6, "tier {} margin {}", row.quality, margin);
            let a = evaluate(&p.with_quality(row.quality).with_sale_price(row.required_price_target), &cfg);
            assert_eq!(a.profitability.net_profit, row.expected_profit);
        }
    }

    #[test]
    fn unreachable_target_gives_zero_price_and_profit() {
        let rows = sweep_quality(&reference_params(), &PricingConfig::v2(), 99.0);
        assert!(rows
            .iter()
            .all(|r| r.required_price_target == 0.0 && r.expected_profit == 0.0));
    }

    #[test]
    fn matrix_axes_and_base_cell() {
        let m = price_variance_matrix(1_065_000.0, 1_600_000.0, 250_000.0);
        assert_eq!(m.rows.len(), 5);
        assert_eq!(
            m.sale_prices,
            vec![1_440_000.0, 1_520_000.0, 1_600_000.0, 1_680_000.0, 1_760_000.0]
        );
        let base: Vec<&VarianceCell> = m
            .rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter(|c| c.is_base)
            .collect();
        assert_eq!(base.len(), 1);
        assert_eq!(base[0].purchase_price, 1_065_000.0);
        assert_eq!(base[0].sale_price, 1_600_000.0);
        assert_close(base[0].margin_pct, (1_600_000.0 - 1_315_000.0) / 1_600_000.0 * 100.0);
        assert_eq!(base[0].band, MarginBand::Excellent);
    }

    #[test]
    fn matrix_prices_are_rounded() {
        let m = price_variance_matrix(101_111.0, 202_223.0, 0.0);
        assert!(m.sale_prices.iter().all(|p| p.fract() == 0.0));
        assert!(m.rows.iter().all(|r| r.purchase_price.fract() == 0.0));
    }

    #[test]
    fn non_positive_base_prices_drop_out() {
        let m = price_variance_matrix(0.0, 1_000_000.0, 10.0);
        assert!(m.rows.is_empty());
        let m = price_variance_matrix(500_000.0, -1.0, 10.0);
        assert_eq!(m.rows.len(), 5);
        assert!(m.sale_prices.is_empty());
        assert!(m.rows.iter().all(|r| r.cells.is_empty()));
    }

    #[test]
    fn margin_is_clamped() {
        assert_eq!(cell_margin_pct(1_000_000.0, 100.0, 0.0), -100.0);
        assert_eq!(cell_margin_pct(f64::NAN, 100.0, 0.0), 0.0);
        assert_close(cell_margin_pct(80.0, 100.0, 10.0), 10.0);
    }

    proptest! {
        #[test]
        fn matrix_cells_are_positive_and_bounded(
            purchase in -2_000_000.0f64..5_000_000.0,
            sale in -2_000_000.0f64..8_000_000.0,
            costs in -1_000_000.0f64..2_000_000.0,
        ) {
            let m = price_variance_matrix(purchase, sale, costs);
            for cell in m.rows.iter().flat_map(|r| r.cells.iter()) {
                prop_assert!(cell.purchase_price > 0.0);
                prop_assert!(cell.sale_price > 0.0);
                prop_assert!((-100.0..=100.0).contains(&cell.margin_pct));
            }
        }
    }
}
