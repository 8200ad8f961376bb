// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{fold_pt, MONTH_COUNT, MONTH_NAMES};
use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;

pub const MASKED_VALUE: &str = "R$ ••••••";

/// Parse a monetary amount as typed by the user. Both "1234.56" and the
/// pt-BR "1234,56" are accepted.
pub fn parse_money(s: &str) -> Result<Decimal> {
    let normalized = s.trim().replace(',', ".");
    normalized
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}'", s))
}

/// Parse a percentage string from a rate schedule into a fraction.
/// Comma-decimal notation ("8,8048517942134"), blank and garbage are all
/// tolerated; anything unparseable derives as zero, never an error.
pub fn parse_rate(s: &str) -> Decimal {
    let normalized = s.trim().replace(',', ".");
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    normalized
        .parse::<Decimal>()
        .map(|pct| pct / Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

/// Resolve a month argument to a 0-based ledger index. Accepts a 1-based
/// number ("1".."13") or a pt-BR month name ("Janeiro", "janeiro proximo").
pub fn month_index(s: &str) -> Result<usize> {
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<usize>() {
        if (1..=MONTH_COUNT).contains(&n) {
            return Ok(n - 1);
        }
        anyhow::bail!("Month number {} out of range 1..{}", n, MONTH_COUNT);
    }
    let folded = fold_pt(trimmed);
    MONTH_NAMES
        .iter()
        .position(|name| fold_pt(name) == folded)
        .with_context(|| format!("Unknown month '{}'", s))
}

pub fn month_name(index: usize) -> &'static str {
    MONTH_NAMES.get(index).copied().unwrap_or("?")
}

/// Format a value as pt-BR currency: "R$ 1.234,56".
pub fn fmt_brl(d: &Decimal) -> String {
    let v = d.round_dp(2);
    let sign = if v.is_sign_negative() && !v.is_zero() {
        "-"
    } else {
        ""
    };
    let s = format!("{:.2}", v.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let int_grouped: String = grouped.chars().rev().collect();
    format!("{}R$ {},{}", sign, int_grouped, frac_part)
}

/// Currency display honoring the privacy mask.
pub fn fmt_brl_masked(d: &Decimal, masked: bool) -> String {
    if masked {
        MASKED_VALUE.to_string()
    } else {
        fmt_brl(d)
    }
}

/// Trailing moving average with the window truncated at the head of the
/// sequence, so early months average over what exists so far.
pub fn moving_average(values: &[Decimal], window: usize) -> Vec<Decimal> {
    let window = window.max(1);
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            let sum: Decimal = slice.iter().copied().sum();
            sum / Decimal::from(slice.len() as i64)
        })
        .collect()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
