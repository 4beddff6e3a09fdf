#![deny(warnings)]

//! Headless CLI: evaluates flip scenarios and prints a report per project,
//! plus a portfolio summary when several are given.

mod format;
mod report;
mod scenario;

use anyhow::{bail, Context, Result};
use chrono::Local;
use flip_core::PricingVariant;
use flip_econ::{sort_entries, summarize, SortDirection, SortKey};
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, Subscriber};
use tracing_subscriber::EnvFilter;

use crate::format::{format_eur, format_pct};
use crate::report::{build_report, ScenarioReport};
use crate::scenario::{load_scenario, Scenario};

#[derive(Debug, Default)]
struct CliArgs {
    scenarios: Vec<PathBuf>,
    variant: Option<PricingVariant>,
    target: Option<f64>,
    json: bool,
    suggest_sale: bool,
    version: bool,
}

fn parse_args<I: Iterator<Item = String>>(mut it: I) -> Result<CliArgs> {
    let mut args = CliArgs::default();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => {
                let path = it.next().context("--scenario needs a file path")?;
                args.scenarios.push(PathBuf::from(path));
            }
            "--variant" => {
                let v = it.next().context("--variant needs `legacy` or `v2`")?;
                args.variant = Some(v.parse()?);
            }
            "--target" => {
                let t = it.next().context("--target needs a margin in %")?;
                args.target = Some(
                    t.parse()
                        .with_context(|| format!("invalid target margin: {t}"))?,
                );
            }
            "--json" => args.json = true,
            "--suggest-sale" => args.suggest_sale = true,
            "--version" => args.version = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

fn default_scenario() -> Scenario {
    Scenario {
        name: "Proyecto por defecto".to_string(),
        description: None,
        variant: PricingVariant::default(),
        target_margin_pct: 15.0,
        sale_price_overridden: true,
        parameters: Default::default(),
    }
}

fn apply_overrides(mut s: Scenario, args: &CliArgs) -> Scenario {
    if let Some(v) = args.variant {
        s.variant = v;
    }
    if let Some(t) = args.target {
        s.target_margin_pct = t;
    }
    if args.suggest_sale {
        s.sale_price_overridden = false;
    }
    s.with_dates_from(Local::now().date_naive())
}

fn print_portfolio(reports: &[ScenarioReport]) {
    let mut entries: Vec<_> = reports.iter().map(|r| r.portfolio_entry()).collect();
    let totals = summarize(&entries);
    sort_entries(&mut entries, SortKey::Margin, SortDirection::Descending);

    println!("== Cartera ({} proyectos) ==", totals.projects);
    for e in &entries {
        if let Some(m) = &e.metrics {
            println!(
                "  {:<32} {:>16} {:>16} {:>8} {:>8}",
                e.name,
                format_eur(m.total_investment),
                format_eur(m.net_profit),
                format_pct(m.margin),
                format_pct(m.roi)
            );
        }
    }
    println!(
        "  inversión total {} | beneficio total {} | margen medio {}",
        format_eur(totals.total_investment),
        format_eur(totals.total_profit),
        format_pct(totals.average_margin)
    );
}

/// Log to stderr, keeping stdout for the report. Levels come from `filter` alone.
fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(log_subscriber(filter))
        .context("installing log subscriber")?;

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!(
            "{} {} ({})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("FLIP_GIT_SHA")
        );
        return Ok(());
    }
    info!(scenarios = args.scenarios.len(), variant = ?args.variant, "starting CLI");

    let scenarios = if args.scenarios.is_empty() {
        vec![default_scenario()]
    } else {
        args.scenarios
            .iter()
            .map(|p| load_scenario(p))
            .collect::<Result<Vec<_>>>()?
    };
    let reports: Vec<ScenarioReport> = scenarios
        .into_iter()
        .map(|s| build_report(&apply_overrides(s, &args)))
        .collect();

    if args.json {
        let doc = if reports.len() > 1 {
            let entries: Vec<_> = reports.iter().map(|r| r.portfolio_entry()).collect();
            json!({ "projects": reports, "portfolio": summarize(&entries) })
        } else {
            json!({ "projects": reports })
        };
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    for r in &reports {
        println!("{r}");
    }
    if reports.len() > 1 {
        print_portfolio(&reports);
    }
    Ok(())
}
