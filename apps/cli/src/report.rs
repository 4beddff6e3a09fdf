//! Per-scenario evaluation and its text rendering.

use std::fmt;

use flip_core::{
    is_low_margin, validate_parameters, validate_prices, PricingConfig, PricingVariant,
    ProjectAnalysis, ProjectParameters,
};
use flip_econ::{
    break_even_sale_price, max_purchase_price, price_variance_matrix, resolve_sale_price,
    sweep_quality, PortfolioEntry, QualityScenario, VarianceMatrix,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::format::{format_eur, format_pct};
use crate::scenario::Scenario;

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub description: Option<String>,
    pub variant: PricingVariant,
    pub target_margin_pct: f64,
    pub parameters: ProjectParameters,
    pub analysis: ProjectAnalysis,
    pub low_margin_warning: bool,
    pub break_even_sale_price: f64,
    pub max_purchase_price: f64,
    pub quality_sweep: Vec<QualityScenario>,
    pub price_matrix: VarianceMatrix,
    /// Validation messages; the figures are computed regardless.
    pub warnings: Vec<String>,
}

pub fn build_report(scenario: &Scenario) -> ScenarioReport {
    let config = PricingConfig::for_variant(scenario.variant);
    let mut params = scenario.parameters.clone();
    params.sale_price = resolve_sale_price(
        params.purchase_price,
        params.sale_price,
        scenario.sale_price_overridden,
    );

    let mut warnings = Vec::new();
    for check in [
        validate_parameters(&params),
        validate_prices(params.purchase_price, params.sale_price),
    ] {
        if let Err(e) = check {
            warn!(scenario = %scenario.name, error = %e, "suspicious parameters");
            warnings.push(e.to_string());
        }
    }

    let analysis = flip_econ::evaluate(&params, &config);
    let target = scenario.target_margin_pct;
    info!(
        scenario = %scenario.name,
        variant = %config.variant,
        margin = analysis.profitability.margin,
        "scenario evaluated"
    );

    ScenarioReport {
        name: scenario.name.clone(),
        description: scenario.description.clone(),
        variant: scenario.variant,
        target_margin_pct: target,
        low_margin_warning: is_low_margin(analysis.profitability.margin),
        break_even_sale_price: break_even_sale_price(&params, &config),
        max_purchase_price: max_purchase_price(&params, &config, target),
        quality_sweep: sweep_quality(&params, &config, target),
        price_matrix: price_variance_matrix(
            params.purchase_price,
            params.sale_price,
            analysis.costs.total_costs,
        ),
        analysis,
        parameters: params,
        warnings,
    }
}

impl ScenarioReport {
    pub fn portfolio_entry(&self) -> PortfolioEntry {
        let config = PricingConfig::for_variant(self.variant);
        PortfolioEntry {
            name: self.name.clone(),
            description: self.description.clone(),
            metrics: Some(flip_econ::project_metrics(&self.parameters, &config)),
        }
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.analysis;
        let c = &a.costs;
        let q = &a.acquisition;
        let p = &a.profitability;

        writeln!(f, "== {} [{}] ==", self.name, self.variant)?;
        for w in &self.warnings {
            writeln!(f, "  aviso: {w}")?;
        }
        writeln!(f, "Adquisición")?;
        writeln!(f, "  precio compra        {:>16}", format_eur(self.parameters.purchase_price))?;
        writeln!(f, "  honorarios compra    {:>16}", format_eur(q.brokerage_fee))?;
        writeln!(f, "  inscripción          {:>16}", format_eur(q.registration))?;
        writeln!(f, "  ITP                  {:>16}", format_eur(q.itp))?;
        writeln!(f, "  total adquisición    {:>16}", format_eur(q.total))?;
        writeln!(f, "Reforma (calidad {})", c.quality)?;
        writeln!(f, "  hard costs           {:>16}", format_eur(c.hard_costs))?;
        writeln!(f, "  soft costs           {:>16}", format_eur(c.soft_costs))?;
        writeln!(f, "  total gastos         {:>16}", format_eur(c.total_costs))?;
        writeln!(f, "Venta")?;
        writeln!(f, "  precio venta         {:>16}", format_eur(self.parameters.sale_price))?;
        writeln!(f, "  honorarios venta     {:>16}", format_eur(p.sale_brokerage_fee))?;
        writeln!(f, "  venta neta           {:>16}", format_eur(p.net_sale))?;
        writeln!(f, "Resultado")?;
        writeln!(f, "  interés proyecto     {:>16}", format_eur(p.interest))?;
        writeln!(f, "  inversión total      {:>16}", format_eur(p.total_investment))?;
        writeln!(f, "  equity necesario     {:>16}", format_eur(p.equity_required))?;
        writeln!(f, "  beneficio neto       {:>16}", format_eur(p.net_profit))?;
        writeln!(
            f,
            "  margen {}  ROI {}  TIR {} ({} días)",
            format_pct(p.margin),
            format_pct(p.roi),
            format_pct(p.tir),
            p.project_days
        )?;
        writeln!(
            f,
            "  €/m²: compra {}  inversión {}  venta {}",
            format_eur(p.purchase_per_m2),
            format_eur(p.investment_per_m2),
            format_eur(p.sale_per_m2)
        )?;
        writeln!(
            f,
            "  veredicto {}  comité {}{}",
            a.verdict.label(),
            a.recommendation.label(),
            if self.low_margin_warning {
                " (margen bajo)"
            } else {
                ""
            }
        )?;
        writeln!(f, "  precio break-even    {:>16}", format_eur(self.break_even_sale_price))?;
        writeln!(
            f,
            "  compra máxima al {}  {:>12}",
            format_pct(self.target_margin_pct),
            format_eur(self.max_purchase_price)
        )?;

        writeln!(f, "Precio de venta necesario por calidad")?;
        writeln!(
            f,
            "  {:>3} {:>14} {:>14} {:>14} {:>14} {:>14}",
            "Q",
            "13%",
            "15%",
            "20%",
            format_pct(self.target_margin_pct),
            "beneficio"
        )?;
        for s in &self.quality_sweep {
            writeln!(
                f,
                "  {:>3} {:>14} {:>14} {:>14} {:>14} {:>14}",
                s.quality,
                format_eur(s.required_price_13),
                format_eur(s.required_price_15),
                format_eur(s.required_price_20),
                format_eur(s.required_price_target),
                format_eur(s.expected_profit)
            )?;
        }

        writeln!(f, "Margen por precio de compra (filas) y venta (columnas)")?;
        write!(f, "  {:>14}", "")?;
        for sale in &self.price_matrix.sale_prices {
            write!(f, " {:>14}", format_eur(*sale))?;
        }
        writeln!(f)?;
        for row in &self.price_matrix.rows {
            write!(f, "  {:>14}", format_eur(row.purchase_price))?;
            for cell in &row.cells {
                let mark = if cell.is_base { "*" } else { " " };
                write!(f, " {:>13}{mark}", format_pct(cell.margin_pct))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::load_scenario;
    use flip_core::{CommitteeRecommendation, MarginVerdict};
    use std::path::PathBuf;

    fn asset(name: &str) -> Scenario {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets/scenarios")
            .join(name);
        load_scenario(&path).unwrap()
    }

    #[test]
    fn reference_scenario_is_tight() {
        let r = build_report(&asset("serrano_legacy.yaml"));
        assert!(r.warnings.is_empty(), "{:?}", r.warnings);
        let p = &r.analysis.profitability;
        assert!((p.margin - 15.015).abs() < 0.01, "{}", p.margin);
        assert_eq!(r.analysis.verdict, MarginVerdict::Tight);
        assert_eq!(r.analysis.recommendation, CommitteeRecommendation::Negotiate);
        assert!(!r.low_margin_warning);
        assert!(r.break_even_sale_price < r.parameters.sale_price);
        // A 16 % target is not reached at the current price.
        assert!(r.max_purchase_price < r.parameters.purchase_price);
        assert_eq!(r.quality_sweep.len(), 4);
        assert_eq!(r.price_matrix.rows.len(), 5);
    }

    #[test]
    fn suggested_sale_price_replaces_missing_agreement() {
        let r = build_report(&asset("chamberi_suggested.yaml"));
        assert_eq!(r.parameters.sale_price, 872_000.0);
    }

    #[test]
    fn invalid_inputs_become_warnings() {
        let mut s = asset("serrano_legacy.yaml");
        s.parameters.quality = 9;
        s.parameters.sale_price = 0.0;
        let r = build_report(&s);
        assert_eq!(r.warnings.len(), 2);
        assert_eq!(r.analysis.profitability.margin, 0.0);
        assert!(r.price_matrix.sale_prices.is_empty());
    }

    #[test]
    fn text_report_uses_spanish_formatting() {
        let text = build_report(&asset("serrano_legacy.yaml")).to_string();
        assert!(text.contains("Serrano 12"));
        assert!(text.contains("1.600.000\u{a0}€"));
        assert!(text.contains("1.087.830\u{a0}€"));
        assert!(text.contains("AJUSTADO"));
        assert!(text.contains("NEGOCIAR"));
    }

    #[test]
    fn portfolio_entry_keeps_location() {
        let entry = build_report(&asset("goya_v2.yaml")).portfolio_entry();
        let metrics = entry.metrics.unwrap();
        assert_eq!(metrics.address, "Calle de Goya 48");
        assert_eq!(metrics.total_area_m2, 226.5);
    }
}
