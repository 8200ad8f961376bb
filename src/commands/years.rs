// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::tables::parse_year;
use crate::models::Person;
use crate::store;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(conn)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => show(conn)?,
    }
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    println!(
        "Reference table: {} (ledger chain governed by {})",
        store::reference_year(conn, Person::Marcia)?,
        store::ledger_year(conn)?
    );
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = parse_year(sub)?;
    store::set_reference_year(conn, year)?;
    store::refresh(conn)?;
    println!("Reference table set to {}", year);
    Ok(())
}
