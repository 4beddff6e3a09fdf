//! Headline metrics for a list of projects: totals, search and ordering.

use std::cmp::Ordering;

use flip_core::{PricingConfig, ProjectParameters};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-project figures shown in a project list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    #[serde(rename = "precioCompra")]
    pub purchase_price: f64,
    #[serde(rename = "precioVenta")]
    pub sale_price: f64,
    #[serde(rename = "inversionTotal")]
    pub total_investment: f64,
    #[serde(rename = "beneficioNeto")]
    pub net_profit: f64,
    #[serde(rename = "margen")]
    pub margin: f64,
    pub roi: f64,
    #[serde(rename = "m2Totales")]
    pub total_area_m2: f64,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "direccion")]
    pub address: String,
}

fn extra_str(params: &ProjectParameters, key: &str) -> String {
    params
        .extra
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Evaluate `params` and keep the list columns.
pub fn project_metrics(params: &ProjectParameters, config: &PricingConfig) -> ProjectMetrics {
    let p = crate::evaluate(params, config).profitability;
    ProjectMetrics {
        purchase_price: params.purchase_price,
        sale_price: params.sale_price,
        total_investment: p.total_investment,
        net_profit: p.net_profit,
        margin: p.margin,
        roi: p.roi,
        total_area_m2: p.total_area_m2,
        city: extra_str(params, "ciudad"),
        address: extra_str(params, "direccion"),
    }
}

/// A named project; `metrics` is `None` when it has no calculator data yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub metrics: Option<ProjectMetrics>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    /// All entries, with or without metrics.
    pub projects: usize,
    pub total_investment: f64,
    pub total_profit: f64,
    /// Mean margin over entries that have metrics; 0 if none do.
    pub average_margin: f64,
}

pub fn summarize(entries: &[PortfolioEntry]) -> PortfolioTotals {
    let with_metrics: Vec<&ProjectMetrics> =
        entries.iter().filter_map(|e| e.metrics.as_ref()).collect();
    let average_margin = if with_metrics.is_empty() {
        0.0
    } else {
        with_metrics.iter().map(|m| m.margin).sum::<f64>() / with_metrics.len() as f64
    };
    let totals = PortfolioTotals {
        projects: entries.len(),
        total_investment: with_metrics.iter().map(|m| m.total_investment).sum(),
        total_profit: with_metrics.iter().map(|m| m.net_profit).sum(),
        average_margin,
    };
    debug!(
        projects = totals.projects,
        with_metrics = with_metrics.len(),
        "portfolio summarized"
    );
    totals
}

/// Case-insensitive search over name, description, city and address.
///
/// A blank query keeps every entry.
pub fn filter_entries<'a>(entries: &'a [PortfolioEntry], query: &str) -> Vec<&'a PortfolioEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return entries.iter().collect();
    }
    let hit = |s: &str| s.to_lowercase().contains(&query);
    entries
        .iter()
        .filter(|e| {
            hit(&e.name)
                || e.description.as_deref().is_some_and(hit)
                || e
                    .metrics
                    .as_ref()
                    .is_some_and(|m| hit(&m.city) || hit(&m.address))
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Investment,
    Profit,
    Margin,
    Roi,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortKey {
    // Entries without metrics sort as if every figure were 0.
    fn figure(self, entry: &PortfolioEntry) -> f64 {
        let Some(m) = entry.metrics.as_ref() else {
            return 0.0;
        };
        match self {
            SortKey::Name => 0.0,
            SortKey::Investment => m.total_investment,
            SortKey::Profit => m.net_profit,
            SortKey::Margin => m.margin,
            SortKey::Roi => m.roi,
        }
    }

    fn compare(self, a: &PortfolioEntry, b: &PortfolioEntry) -> Ordering {
        match self {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            _ => self.figure(a).total_cmp(&self.figure(b)),
        }
    }
}

/// Stable sort of `entries` by `key`.
pub fn sort_entries(entries: &mut [PortfolioEntry], key: SortKey, direction: SortDirection) {
    entries.sort_by(|a, b| {
        let ord = key.compare(a, b);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
