// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::tables::parse_year;
use crate::models::MONTH_COUNT;
use crate::store;
use crate::utils::{maybe_print_json, month_index, month_name, parse_rate, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let year = parse_year(sub)?;
    let rates = store::load_rates(conn, year)?;
    if !maybe_print_json(json_flag, jsonl_flag, &rates)? {
        let rows: Vec<Vec<String>> = rates
            .into_iter()
            .map(|r| {
                let fraction = parse_rate(&r.value);
                let derived = if fraction == Decimal::ZERO && r.value.trim().is_empty() {
                    "-".to_string()
                } else {
                    format!("{:.4}%", fraction * Decimal::ONE_HUNDRED)
                };
                vec![r.month, r.value, derived]
            })
            .collect();
        let header = format!("Month ({})", year);
        println!(
            "{}",
            pretty_table(&[header.as_str(), "Alíquota", "Parsed"], rows)
        );
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = parse_year(sub)?;
    let month = month_index(sub.get_one::<String>("month").unwrap())?;
    let value = sub.get_one::<String>("value").unwrap().trim().to_string();

    conn.execute(
        "INSERT INTO rate_schedule(year, month_idx, value) VALUES (?1,?2,?3)
         ON CONFLICT(year, month_idx) DO UPDATE SET value=excluded.value",
        params![year, month as i64, value],
    )?;
    propagate_next_january(conn, year, month, &value)?;
    store::refresh(conn)?;
    println!("Alíquota {} / {} = '{}'", year, month_name(month), value);
    Ok(())
}

/// One-way write-through: the "Janeiro Próximo" slot of year Y is the same
/// calendar month as "Janeiro" of year Y+1, so editing the former overwrites
/// the latter. Nothing flows back.
pub fn propagate_next_january(
    conn: &Connection,
    year: i32,
    month: usize,
    value: &str,
) -> Result<()> {
    if month != MONTH_COUNT - 1 || !crate::db::YEARS.contains(&(year + 1)) {
        return Ok(());
    }
    conn.execute(
        "INSERT INTO rate_schedule(year, month_idx, value) VALUES (?1,0,?2)
         ON CONFLICT(year, month_idx) DO UPDATE SET value=excluded.value",
        params![year + 1, value],
    )?;
    Ok(())
}
