// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{fmt_brl, maybe_print_json, parse_money, pretty_table};
use anyhow::{bail, Result};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn parse_year(sub: &clap::ArgMatches) -> Result<i32> {
    let year: i32 = sub.get_one::<String>("year").unwrap().trim().parse()?;
    if !crate::db::YEARS.contains(&year) {
        bail!("Unknown fiscal year {} (expected one of 2025, 2026, 2027)", year);
    }
    Ok(year)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let year = parse_year(sub)?;
    let prices = store::load_prices(conn, year)?;
    if !maybe_print_json(json_flag, jsonl_flag, &prices)? {
        let rows: Vec<Vec<String>> = prices
            .into_iter()
            .map(|c| vec![c.name, fmt_brl(&c.value), format!("{}h", c.hours)])
            .collect();
        let header = format!("Course ({})", year);
        println!(
            "{}",
            pretty_table(&[header.as_str(), "Valor", "Horas"], rows)
        );
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = parse_year(sub)?;
    let name = sub.get_one::<String>("name").unwrap().trim();
    let value = parse_money(sub.get_one::<String>("value").unwrap())?;
    let n = conn.execute(
        "UPDATE price_tables SET value=?3 WHERE year=?1 AND name=?2",
        params![year, name, value.to_string()],
    )?;
    if n == 0 {
        bail!("Course '{}' not found in the {} table", name, year);
    }
    store::refresh(conn)?;
    println!("{} ({}) = {}", name, year, fmt_brl(&value));
    Ok(())
}
