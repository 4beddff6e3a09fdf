//! es-ES presentation of money and percentages.
//!
//! Matches the browser's `Intl.NumberFormat('es-ES')`: `.` groups thousands
//! (only from five integer digits on), `,` separates decimals, and the euro
//! sign follows the amount after a no-break space.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const NBSP: char = '\u{a0}';

fn group_thousands(int: &str) -> String {
    if int.len() < 5 {
        return int.to_string();
    }
    let mut out = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `value` rounded half away from zero to `decimals` places, es-ES digits.
/// Non-finite values render as `-`.
pub fn format_number(value: f64, decimals: u32) -> String {
    let Some(d) = Decimal::from_f64(value) else {
        return "-".to_string();
    };
    let mut rounded = d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    let text = rounded.abs().to_string();
    let (int, frac) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let mut out = String::new();
    if rounded.is_sign_negative() {
        out.push('-');
    }
    out.push_str(&group_thousands(int));
    if let Some(frac) = frac {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Whole euros: `1.600.000 €`.
pub fn format_eur(value: f64) -> String {
    format!("{}{NBSP}€", format_number(value, 0))
}

/// Percentage with one decimal: `15,3%`.
pub fn format_pct(value: f64) -> String {
    format!("{}%", format_number(value, 1))
}
