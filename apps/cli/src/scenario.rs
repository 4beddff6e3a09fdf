//! YAML scenario files.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use flip_core::{PricingVariant, ProjectParameters};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_target_margin() -> f64 {
    15.0
}

fn default_true() -> bool {
    true
}

/// One project to evaluate, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variant: PricingVariant,
    /// User target for the quality sweep and the maximum purchase price.
    #[serde(default = "default_target_margin")]
    pub target_margin_pct: f64,
    /// When false the stored sale price is replaced by the suggested one.
    #[serde(default = "default_true")]
    pub sale_price_overridden: bool,
    /// Calculator snapshot; missing keys take the default project values.
    #[serde(default)]
    pub parameters: ProjectParameters,
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text).context("invalid scenario YAML")?;
        Ok(scenario)
    }

    /// Fill in dates when the file has none, counting from `today`.
    pub fn with_dates_from(mut self, today: NaiveDate) -> Self {
        let unset = NaiveDate::default();
        if self.parameters.purchase_date == unset && self.parameters.sale_date == unset {
            let fresh = ProjectParameters::starting_on(today);
            self.parameters.purchase_date = fresh.purchase_date;
            self.parameters.sale_date = fresh.sale_date;
        }
        self
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    Scenario::from_yaml(&text).with_context(|| format!("parsing scenario {}", path.display()))
}
