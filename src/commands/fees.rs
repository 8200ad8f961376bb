// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::tables::parse_year;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};
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

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let year = parse_year(sub)?;
    let fees = store::load_fees(conn, year)?;
    if !maybe_print_json(json_flag, jsonl_flag, &fees)? {
        let rows: Vec<Vec<String>> = fees.into_iter().map(|f| vec![f.label, f.value]).collect();
        let header = format!("Fee ({})", year);
        println!("{}", pretty_table(&[header.as_str(), "Valor"], rows));
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = parse_year(sub)?;
    let label = sub.get_one::<String>("label").unwrap().trim();
    let value = sub.get_one::<String>("value").unwrap().trim();
    let n = conn.execute(
        "UPDATE fee_schedule SET value=?3 WHERE year=?1 AND label=?2",
        params![year, label, value],
    )?;
    if n == 0 {
        bail!("Fee '{}' not found in the {} schedule", label, year);
    }
    // The per-month honorários/INSS shares were locked in when the ledger was
    // seeded; editing a fee does not rewrite them.
    println!("{} ({}) = {}", label, year, value);
    Ok(())
}
