//! Input parameter set for one project evaluation.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::pricing::{MAX_QUALITY_TIER, MIN_QUALITY_TIER};

/// Months between purchase and sale assumed for a fresh project.
pub const DEFAULT_PROJECT_MONTHS: u32 = 7;

/// Everything the engine needs to price one project.
///
/// Field names on the wire are the keys of the stored calculator snapshot.
/// Keys the engine does not use (address, comments, ...) are kept in
/// [`ProjectParameters::extra`] so a snapshot decodes and re-encodes without
/// losing data. Missing keys take the values of [`ProjectParameters::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectParameters {
    /// Constructed area in m².
    #[serde(rename = "m2Construidos")]
    pub built_area_m2: f64,
    /// Share of common areas in m².
    #[serde(rename = "m2ZZCC")]
    pub common_area_m2: f64,
    #[serde(rename = "terrazaM2")]
    pub terrace_m2: f64,
    /// Classic-style home; adds a flat interior-design surcharge.
    #[serde(rename = "esClasico")]
    pub classic_style: bool,
    /// Awning or pergola to install.
    #[serde(rename = "toldoPergola")]
    pub awning: bool,

    #[serde(rename = "precioCompra")]
    pub purchase_price: f64,
    #[serde(rename = "fechaCompra")]
    pub purchase_date: NaiveDate,
    #[serde(rename = "intermediacionCompra")]
    pub purchase_brokerage: bool,
    /// Buy-side brokerage fee in percent (before VAT).
    #[serde(rename = "porcentajeIntermediacionCompra")]
    pub purchase_brokerage_pct: f64,

    #[serde(rename = "precioVenta")]
    pub sale_price: f64,
    #[serde(rename = "fechaVenta")]
    pub sale_date: NaiveDate,
    #[serde(rename = "intermediacionVenta")]
    pub sale_brokerage: bool,
    /// Sell-side brokerage fee in percent (before VAT).
    #[serde(rename = "porcentajeIntermediacionVenta")]
    pub sale_brokerage_pct: f64,

    /// Renovation quality tier, nominally 1..=5.
    #[serde(rename = "calidad")]
    pub quality: i32,
    /// Ad-hoc additional hard cost.
    pub extras: f64,

    /// Debt principal.
    #[serde(rename = "deuda")]
    pub debt: f64,
    /// Annual interest rate in percent.
    #[serde(rename = "interesFinanciero")]
    pub interest_rate_pct: f64,

    /// Snapshot keys outside the engine's inputs.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for ProjectParameters {
    fn default() -> Self {
        Self {
            built_area_m2: 158.0,
            common_area_m2: 11.0,
            terrace_m2: 2.0,
            classic_style: false,
            awning: false,
            purchase_price: 1_065_000.0,
            purchase_date: NaiveDate::default(),
            purchase_brokerage: false,
            purchase_brokerage_pct: 3.0,
            sale_price: 1_600_000.0,
            sale_date: NaiveDate::default(),
            sale_brokerage: true,
            sale_brokerage_pct: 3.0,
            quality: 3,
            extras: 0.0,
            debt: 500_000.0,
            interest_rate_pct: 6.25,
            extra: BTreeMap::new(),
        }
    }
}

impl ProjectParameters {
    /// Default parameters for a project bought on `purchase_date` and sold
    /// [`DEFAULT_PROJECT_MONTHS`] later.
    pub fn starting_on(purchase_date: NaiveDate) -> Self {
        let sale_date = purchase_date
            .checked_add_months(Months::new(DEFAULT_PROJECT_MONTHS))
            .unwrap_or(purchase_date);
        Self {
            purchase_date,
            sale_date,
            ..Self::default()
        }
    }

    /// Built plus common area, never below 1 m² so per-m² ratios stay finite.
    pub fn total_area_m2(&self) -> f64 {
        let total = self.built_area_m2 + self.common_area_m2;
        if total.is_finite() {
            total.max(1.0)
        } else {
            1.0
        }
    }

    pub fn with_quality(&self, quality: i32) -> Self {
        Self {
            quality,
            ..self.clone()
        }
    }

    pub fn with_sale_price(&self, sale_price: f64) -> Self {
        Self {
            sale_price,
            ..self.clone()
        }
    }

    pub fn with_purchase_price(&self, purchase_price: f64) -> Self {
        Self {
            purchase_price,
            ..self.clone()
        }
    }

    /// Decode a stored calculator snapshot.
    pub fn from_snapshot_json(json: &str) -> Result<Self, SnapshotError> {
        let params: Self = serde_json::from_str(json)?;
        debug!(extra_keys = params.extra.len(), "decoded project snapshot");
        Ok(params)
    }

    /// Encode as a calculator snapshot document.
    pub fn to_snapshot_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Snapshot encode/decode failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed project snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a parameter set is not a sensible project.
///
/// The engine prices any input; these errors exist for callers that want to
/// warn about transient or out-of-range form values.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Quality outside the tables; the engine prices it as tier 3.
    #[error("quality {0} is outside [1, 5]; tier 3 costs will be used")]
    QualityOutOfRange(i32),
    #[error("{0} is not a finite number")]
    NonFinite(&'static str),
    #[error("{0} must not be negative")]
    NegativeMoney(&'static str),
    #[error("built area must be > 0")]
    NonPositiveArea,
    #[error("{0} must not be negative")]
    NegativeArea(&'static str),
    #[error("{0} = {1} is outside [0, 100]")]
    PercentOutOfRange(&'static str, f64),
    #[error("sale date {sale} is before purchase date {purchase}")]
    SaleBeforePurchase {
        purchase: NaiveDate,
        sale: NaiveDate,
    },
    /// Purchase and sale price must both be positive for the solvers.
    #[error("introduce precios válidos: purchase and sale price must be > 0")]
    InvalidPrices,
}

/// Validate the numeric fields of a parameter set.
pub fn validate_parameters(p: &ProjectParameters) -> Result<(), ValidationError> {
    let numbers = [
        ("m2Construidos", p.built_area_m2),
        ("m2ZZCC", p.common_area_m2),
        ("terrazaM2", p.terrace_m2),
        ("precioCompra", p.purchase_price),
        ("porcentajeIntermediacionCompra", p.purchase_brokerage_pct),
        ("precioVenta", p.sale_price),
        ("porcentajeIntermediacionVenta", p.sale_brokerage_pct),
        ("extras", p.extras),
        ("deuda", p.debt),
        ("interesFinanciero", p.interest_rate_pct),
    ];
    if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
        return Err(ValidationError::NonFinite(*name));
    }
    if !(MIN_QUALITY_TIER..=MAX_QUALITY_TIER).contains(&p.quality) {
        return Err(ValidationError::QualityOutOfRange(p.quality));
    }
    if p.built_area_m2 <= 0.0 {
        return Err(ValidationError::NonPositiveArea);
    }
    if p.common_area_m2 < 0.0 {
        return Err(ValidationError::NegativeArea("m2ZZCC"));
    }
    if p.terrace_m2 < 0.0 {
        return Err(ValidationError::NegativeArea("terrazaM2"));
    }
    for (name, v) in [
        ("precioCompra", p.purchase_price),
        ("precioVenta", p.sale_price),
        ("extras", p.extras),
        ("deuda", p.debt),
        ("interesFinanciero", p.interest_rate_pct),
    ] {
        if v < 0.0 {
            return Err(ValidationError::NegativeMoney(name));
        }
    }
    for (name, v) in [
        ("porcentajeIntermediacionCompra", p.purchase_brokerage_pct),
        ("porcentajeIntermediacionVenta", p.sale_brokerage_pct),
    ] {
        if !(0.0..=100.0).contains(&v) {
            return Err(ValidationError::PercentOutOfRange(name, v));
        }
    }
    if p.sale_date < p.purchase_date {
        return Err(ValidationError::SaleBeforePurchase {
            purchase: p.purchase_date,
            sale: p.sale_date,
        });
    }
    Ok(())
}

/// Check the pair of prices the inverse solvers are driven from.
pub fn validate_prices(purchase_price: f64, sale_price: f64) -> Result<(), ValidationError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(purchase_price) && valid(sale_price) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPrices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn starting_on_sets_seven_month_window() {
        let p = ProjectParameters::starting_on(date(2025, 1, 31));
        assert_eq!(p.purchase_date, date(2025, 1, 31));
        assert_eq!(p.sale_date, date(2025, 8, 31));
        assert_eq!(p.quality, 3);
        assert!(validate_parameters(&p).is_ok());
    }

    #[test]
    fn total_area_never_below_one() {
        let mut p = ProjectParameters::default();
        assert_eq!(p.total_area_m2(), 169.0);
        p.built_area_m2 = 0.0;
        p.common_area_m2 = 0.0;
        assert_eq!(p.total_area_m2(), 1.0);
        p.built_area_m2 = f64::NAN;
        assert_eq!(p.total_area_m2(), 1.0);
    }

    #[test]
    fn snapshot_roundtrip_keeps_unknown_keys() {
        let json = r#"{
            "ciudad": "Madrid",
            "direccion": "Calle Serrano 12",
            "m2Construidos": 120,
            "m2ZZCC": 8.5,
            "terrazaM2": 0,
            "esClasico": true,
            "toldoPergola": false,
            "precioCompra": 750000,
            "fechaCompra": "2025-02-01",
            "intermediacionCompra": true,
            "porcentajeIntermediacionCompra": 2,
            "precioVenta": 1100000,
            "fechaVenta": "2025-10-01",
            "intermediacionVenta": true,
            "porcentajeIntermediacionVenta": 3,
            "calidad": 4,
            "extras": 1500,
            "deuda": 0,
            "interesFinanciero": 0,
            "comentarios": [{"id": 1, "texto": "ok", "autor": "ana", "fecha": "01/02/2025"}]
        }"#;
        let p = ProjectParameters::from_snapshot_json(json).unwrap();
        assert_eq!(p.built_area_m2, 120.0);
        assert_eq!(p.quality, 4);
        assert!(p.classic_style);
        assert_eq!(p.purchase_date, date(2025, 2, 1));
        assert_eq!(p.extra.get("ciudad"), Some(&Value::from("Madrid")));
        assert!(p.extra.contains_key("comentarios"));

        let encoded = p.to_snapshot_json().unwrap();
        let back = ProjectParameters::from_snapshot_json(&encoded).unwrap();
        assert_eq!(back, p);

        let original: Value = serde_json::from_str(json).unwrap();
        let reencoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(original["direccion"], reencoded["direccion"]);
        assert_eq!(original["comentarios"], reencoded["comentarios"]);
        assert_eq!(reencoded["m2ZZCC"], Value::from(8.5));
    }

    #[test]
    fn partial_snapshot_merges_over_defaults() {
        let p = ProjectParameters::from_snapshot_json(r#"{"precioCompra": 900000}"#).unwrap();
        assert_eq!(p.purchase_price, 900_000.0);
        assert_eq!(p.sale_price, ProjectParameters::default().sale_price);
        assert!(p.extra.is_empty());
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        let err = ProjectParameters::from_snapshot_json(r#"{"fechaCompra": "mañana"}"#);
        assert!(matches!(err, Err(SnapshotError::Json(_))));
    }

    #[test]
    fn validation_catches_bad_inputs() {
        let ok = ProjectParameters::starting_on(date(2025, 1, 1));

        let p = ok.with_quality(7);
        assert_eq!(validate_parameters(&p), Err(ValidationError::QualityOutOfRange(7)));

        let p = ok.with_sale_price(f64::INFINITY);
        assert_eq!(validate_parameters(&p), Err(ValidationError::NonFinite("precioVenta")));

        let p = ok.with_purchase_price(-1.0);
        assert_eq!(validate_parameters(&p), Err(ValidationError::NegativeMoney("precioCompra")));

        let mut p = ok.clone();
        p.built_area_m2 = 0.0;
        assert_eq!(validate_parameters(&p), Err(ValidationError::NonPositiveArea));

        let mut p = ok.clone();
        p.sale_brokerage_pct = 150.0;
        assert!(matches!(
            validate_parameters(&p),
            Err(ValidationError::PercentOutOfRange("porcentajeIntermediacionVenta", _))
        ));

        let mut p = ok.clone();
        p.sale_date = date(2024, 12, 1);
        assert!(matches!(
            validate_parameters(&p),
            Err(ValidationError::SaleBeforePurchase { .. })
        ));
    }

    #[test]
    fn price_pair_validation() {
        assert!(validate_prices(1.0, 2.0).is_ok());
        assert_eq!(validate_prices(0.0, 2.0), Err(ValidationError::InvalidPrices));
        assert_eq!(validate_prices(1.0, f64::NAN), Err(ValidationError::InvalidPrices));
    }

    proptest! {
        #[test]
        fn engine_fields_survive_json(
            built in 1u32..1_000,
            price in 0u32..5_000_000,
            quality in -3i32..9,
            brokerage in any::<bool>(),
        ) {
            let mut p = ProjectParameters::default();
            p.built_area_m2 = f64::from(built);
            p.purchase_price = f64::from(price);
            p.quality = quality;
            p.sale_brokerage = brokerage;
            let back = ProjectParameters::from_snapshot_json(&p.to_snapshot_json().unwrap()).unwrap();
            prop_assert_eq!(back, p);
        }
    }
}
