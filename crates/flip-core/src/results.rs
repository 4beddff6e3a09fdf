//! Derived records and the business classifications applied to them.
//!
//! Nothing here is stored on its own; every record is recomputed from a
//! [`crate::ProjectParameters`] whenever an input changes.

use serde::{Deserialize, Serialize};

/// Margin (%) from which a project is flagged as an opportunity.
pub const OPPORTUNITY_MARGIN_PCT: f64 = 16.0;
/// Margin (%) from which a project is flagged as tight rather than rejected.
pub const TIGHT_MARGIN_PCT: f64 = 13.0;

/// Margin (%) from which the investment committee is asked to buy.
pub const COMMITTEE_BUY_MARGIN_PCT: f64 = 18.0;
/// Margin (%) from which the investment committee is asked to negotiate.
/// Below it a submission carries a low-margin warning.
pub const COMMITTEE_NEGOTIATE_MARGIN_PCT: f64 = 14.0;

/// Annualized return (%) shown as strong.
pub const STRONG_IRR_PCT: f64 = 30.0;
/// Annualized return (%) shown as acceptable.
pub const ACCEPTABLE_IRR_PCT: f64 = 20.0;

/// Renovation hard and soft costs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Tier the tables were read with (may be out of range; see fallback).
    #[serde(rename = "calidad")]
    pub quality: i32,
    #[serde(rename = "obra")]
    pub construction: f64,
    #[serde(rename = "calidadCoste")]
    pub materials: f64,
    #[serde(rename = "interiorismo")]
    pub interior_design: f64,
    #[serde(rename = "mobiliario")]
    pub furniture: f64,
    #[serde(rename = "terrazaCost")]
    pub terrace: f64,
    #[serde(rename = "toldoCost")]
    pub awning: f64,
    pub extras: f64,
    #[serde(rename = "hardCosts")]
    pub hard_costs: f64,
    #[serde(rename = "arquitectura")]
    pub architecture: f64,
    #[serde(rename = "permisoConstruccion")]
    pub building_permit: f64,
    #[serde(rename = "gastosVenta")]
    pub sale_admin: f64,
    #[serde(rename = "costosTenencia")]
    pub holding_costs: f64,
    /// Municipal gains tax, proportional to the sale price.
    pub plusvalia: f64,
    #[serde(rename = "softCosts")]
    pub soft_costs: f64,
    #[serde(rename = "totalGastos")]
    pub total_costs: f64,
}

impl CostBreakdown {
    /// Total costs minus the sale-price-dependent plusvalía.
    pub fn price_independent_costs(&self) -> f64 {
        self.total_costs - self.plusvalia
    }
}

/// Cost of buying the property.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionBreakdown {
    /// Buy-side brokerage including VAT.
    #[serde(rename = "honorarioCompra")]
    pub brokerage_fee: f64,
    #[serde(rename = "inscripcionEscritura")]
    pub registration: f64,
    /// Property transfer tax.
    pub itp: f64,
    #[serde(rename = "totalAdquisicion")]
    pub total: f64,
}

/// Profit, margin and return figures for a project.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityResult {
    /// Sell-side brokerage including VAT.
    #[serde(rename = "honorariosVenta")]
    pub sale_brokerage_fee: f64,
    #[serde(rename = "ventaNeta")]
    pub net_sale: f64,
    /// Flat half-year interest on the debt.
    #[serde(rename = "interesProyecto")]
    pub interest: f64,
    #[serde(rename = "inversionTotal")]
    pub total_investment: f64,
    #[serde(rename = "beneficioNeto")]
    pub net_profit: f64,
    /// Net profit over total investment, in percent.
    pub roi: f64,
    /// Net profit over sale price, in percent.
    #[serde(rename = "margen")]
    pub margin: f64,
    /// Own funds needed beyond the debt.
    #[serde(rename = "equityNecesario")]
    pub equity_required: f64,
    #[serde(rename = "m2Totales")]
    pub total_area_m2: f64,
    #[serde(rename = "euroM2Compra")]
    pub purchase_per_m2: f64,
    #[serde(rename = "euroM2Inversion")]
    pub investment_per_m2: f64,
    #[serde(rename = "euroM2Venta")]
    pub sale_per_m2: f64,
    #[serde(rename = "beneficioM2")]
    pub profit_per_m2: f64,
    /// Annualized compounding return, in percent.
    pub tir: f64,
    #[serde(rename = "mesesProyecto")]
    pub project_months: f64,
    #[serde(rename = "diasProyecto")]
    pub project_days: i64,
}

/// Headline verdict shown next to the margin (16 % / 13 % cutoffs).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarginVerdict {
    #[serde(rename = "OPORTUNIDAD")]
    Opportunity,
    #[serde(rename = "AJUSTADO")]
    Tight,
    #[serde(rename = "NO HACER")]
    DoNotProceed,
}

impl MarginVerdict {
    pub fn from_margin(margin_pct: f64) -> Self {
        if margin_pct >= OPPORTUNITY_MARGIN_PCT {
            MarginVerdict::Opportunity
        } else if margin_pct >= TIGHT_MARGIN_PCT {
            MarginVerdict::Tight
        } else {
            MarginVerdict::DoNotProceed
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarginVerdict::Opportunity => "OPORTUNIDAD",
            MarginVerdict::Tight => "AJUSTADO",
            MarginVerdict::DoNotProceed => "NO HACER",
        }
    }

    pub fn is_viable(self) -> bool {
        self == MarginVerdict::Opportunity
    }
}

/// Recommendation attached to an investment-committee submission
/// (18 % / 14 % cutoffs, distinct from the verdict cutoffs).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommitteeRecommendation {
    #[serde(rename = "comprar")]
    Buy,
    #[serde(rename = "negociar")]
    Negotiate,
    #[serde(rename = "rechazar")]
    Reject,
}

impl CommitteeRecommendation {
    pub fn from_margin(margin_pct: f64) -> Self {
        if margin_pct >= COMMITTEE_BUY_MARGIN_PCT {
            CommitteeRecommendation::Buy
        } else if margin_pct >= COMMITTEE_NEGOTIATE_MARGIN_PCT {
            CommitteeRecommendation::Negotiate
        } else {
            CommitteeRecommendation::Reject
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CommitteeRecommendation::Buy => "COMPRAR",
            CommitteeRecommendation::Negotiate => "NEGOCIAR",
            CommitteeRecommendation::Reject => "RECHAZAR",
        }
    }
}

/// True when a committee submission should carry the low-margin warning.
pub fn is_low_margin(margin_pct: f64) -> bool {
    margin_pct.is_nan() || margin_pct < COMMITTEE_NEGOTIATE_MARGIN_PCT
}

/// Display band for the annualized return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrBand {
    Strong,
    Acceptable,
    Weak,
}

impl IrrBand {
    pub fn from_tir(tir_pct: f64) -> Self {
        if tir_pct >= STRONG_IRR_PCT {
            IrrBand::Strong
        } else if tir_pct >= ACCEPTABLE_IRR_PCT {
            IrrBand::Acceptable
        } else {
            IrrBand::Weak
        }
    }
}

/// Colour band of a sensitivity-matrix cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginBand {
    SevereLoss,
    Loss,
    SlightLoss,
    Thin,
    Fair,
    Good,
    Excellent,
}

impl MarginBand {
    pub fn from_margin(margin_pct: f64) -> Self {
        match margin_pct {
            m if m >= 15.0 => MarginBand::Excellent,
            m if m >= 10.0 => MarginBand::Good,
            m if m >= 5.0 => MarginBand::Fair,
            m if m >= 0.0 => MarginBand::Thin,
            m if m >= -5.0 => MarginBand::SlightLoss,
            m if m >= -10.0 => MarginBand::Loss,
            _ => MarginBand::SevereLoss,
        }
    }
}

/// Everything computed for one parameter set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    pub costs: CostBreakdown,
    pub acquisition: AcquisitionBreakdown,
    pub profitability: ProfitabilityResult,
    pub verdict: MarginVerdict,
    pub recommendation: CommitteeRecommendation,
    pub irr_band: IrrBand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_cutoffs() {
        assert_eq!(MarginVerdict::from_margin(16.0), MarginVerdict::Opportunity);
        assert_eq!(MarginVerdict::from_margin(15.99), MarginVerdict::Tight);
        assert_eq!(MarginVerdict::from_margin(13.0), MarginVerdict::Tight);
        assert_eq!(MarginVerdict::from_margin(12.99), MarginVerdict::DoNotProceed);
        assert_eq!(MarginVerdict::from_margin(f64::NAN), MarginVerdict::DoNotProceed);
        assert!(MarginVerdict::Opportunity.is_viable());
        assert_eq!(MarginVerdict::DoNotProceed.label(), "NO HACER");
    }

    #[test]
    fn committee_cutoffs_differ_from_verdict() {
        assert_eq!(CommitteeRecommendation::from_margin(18.0), CommitteeRecommendation::Buy);
        assert_eq!(CommitteeRecommendation::from_margin(17.0), CommitteeRecommendation::Negotiate);
        assert_eq!(CommitteeRecommendation::from_margin(14.0), CommitteeRecommendation::Negotiate);
        assert_eq!(CommitteeRecommendation::from_margin(13.5), CommitteeRecommendation::Reject);
        // 17 % is an opportunity for the verdict but only a negotiation for the committee.
        assert_eq!(MarginVerdict::from_margin(17.0), MarginVerdict::Opportunity);
        assert!(is_low_margin(13.9));
        assert!(!is_low_margin(14.0));
        assert!(is_low_margin(f64::NAN));
    }

    #[test]
    fn labels_match_wire_names() {
        let v = serde_json::to_string(&MarginVerdict::DoNotProceed).unwrap();
        assert_eq!(v, "\"NO HACER\"");
        let r = serde_json::to_string(&CommitteeRecommendation::Negotiate).unwrap();
        assert_eq!(r, "\"negociar\"");
        assert_eq!(CommitteeRecommendation::Buy.label(), "COMPRAR");
    }

    #[test]
    fn irr_and_margin_bands() {
        assert_eq!(IrrBand::from_tir(30.0), IrrBand::Strong);
        assert_eq!(IrrBand::from_tir(25.0), IrrBand::Acceptable);
        assert_eq!(IrrBand::from_tir(0.0), IrrBand::Weak);

        assert_eq!(MarginBand::from_margin(15.0), MarginBand::Excellent);
        assert_eq!(MarginBand::from_margin(9.9), MarginBand::Fair);
        assert_eq!(MarginBand::from_margin(0.0), MarginBand::Thin);
        assert_eq!(MarginBand::from_margin(-5.0), MarginBand::SlightLoss);
        assert_eq!(MarginBand::from_margin(-10.0), MarginBand::Loss);
        assert_eq!(MarginBand::from_margin(-100.0), MarginBand::SevereLoss);
        assert!(MarginBand::Excellent > MarginBand::Good);
    }

    #[test]
    fn breakdown_uses_snapshot_keys() {
        let c = CostBreakdown {
            total_costs: 10.0,
            plusvalia: 4.0,
            ..Default::default()
        };
        assert_eq!(c.price_independent_costs(), 6.0);
        let v: serde_json::Value = serde_json::to_value(&c).unwrap();
        assert_eq!(v["totalGastos"], serde_json::Value::from(10.0));
        assert!(v.get("calidadCoste").is_some());
    }
}
