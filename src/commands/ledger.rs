// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::rows::{add_extra_row, delete_extra_row, set_extra_row};
use crate::models::{MonthLedger, Person};
use crate::store;
use crate::utils::{
    fmt_brl_masked, maybe_print_json, month_index, month_name, moving_average, parse_money,
    pretty_table,
};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("rows", sub)) => rows(conn, sub)?,
        Some(("set-simples", sub)) => set_simples(conn, sub)?,
        Some(("set-total", sub)) => set_total(conn, sub)?,
        Some(("add-row", sub)) => add_row(conn, sub)?,
        Some(("del-row", sub)) => del_row(conn, sub)?,
        Some(("report", sub)) => report(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn masked_flag(conn: &Connection, sub: &clap::ArgMatches) -> Result<bool> {
    Ok(sub.get_flag("masked") || store::masked_default(conn)?)
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let masked = masked_flag(conn, sub)?;
    let month_filter = sub
        .get_one::<String>("month")
        .map(|s| month_index(s))
        .transpose()?;

    let months = store::load_ledger(conn)?;
    let selected: Vec<&MonthLedger> = months
        .iter()
        .enumerate()
        .filter(|(i, _)| month_filter.map_or(true, |only| *i == only))
        .map(|(_, m)| m)
        .collect();

    if maybe_print_json(json_flag, jsonl_flag, &selected)? {
        return Ok(());
    }

    let mut data = Vec::new();
    for month in &selected {
        for entry in &month.entries {
            data.push(vec![
                month.month_name.clone(),
                entry.person.to_string(),
                fmt_brl_masked(&entry.faturamento, masked),
                fmt_brl_masked(&entry.honorarios, masked),
                fmt_brl_masked(&entry.inss, masked),
                fmt_brl_masked(&entry.simples, masked),
                fmt_brl_masked(&entry.valor_taxas, masked),
                fmt_brl_masked(&entry.valor_liquido, masked),
            ]);
        }
        data.push(vec![
            month.month_name.clone(),
            "Total".to_string(),
            fmt_brl_masked(&month.gross_net.bruto, masked),
            fmt_brl_masked(&month.contadora_honorarios, masked),
            fmt_brl_masked(&month.inss_total, masked),
            fmt_brl_masked(&month.simples_total, masked),
            fmt_brl_masked(
                &(month.contadora_honorarios + month.inss_total + month.simples_total),
                masked,
            ),
            fmt_brl_masked(&month.gross_net.liquido, masked),
        ]);
    }
    println!(
        "{}",
        pretty_table(
            &[
                "Month",
                "Person",
                "Faturamento",
                "Honorários",
                "INSS",
                "Simples",
                "Taxas",
                "Líquido",
            ],
            data,
        )
    );
    Ok(())
}

fn rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let masked = masked_flag(conn, sub)?;
    let month = month_index(sub.get_one::<String>("month").unwrap())?;
    let months = store::load_ledger(conn)?;
    let ledger = months
        .get(month)
        .with_context(|| format!("No ledger month at index {}", month))?;

    let len = ledger.extra_rows.max_len();
    let mut data = Vec::new();
    for row_idx in 0..len {
        let cell = |person: Person| {
            ledger
                .extra_rows
                .rows(person)
                .get(row_idx)
                .map(|v| fmt_brl_masked(v, masked))
                .unwrap_or_else(|| "-".to_string())
        };
        data.push(vec![
            row_idx.to_string(),
            cell(Person::Luciana),
            cell(Person::Marcia),
            cell(Person::Marcelo),
        ]);
    }
    let header = format!("Row ({})", month_name(month));
    println!(
        "{}",
        pretty_table(
            &[header.as_str(), "Luciana", "Márcia", "Marcelo"],
            data,
        )
    );
    Ok(())
}

fn set_simples(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let person = Person::from_str(sub.get_one::<String>("person").unwrap())?;
    let value = parse_money(sub.get_one::<String>("value").unwrap())?;

    // Only January's Simples is a free input; every later month is derived
    // from the previous month's revenue and rate.
    let n = conn.execute(
        "UPDATE ledger_entries SET simples=?2 WHERE month_idx=0 AND person=?1",
        params![person.as_str(), value.to_string()],
    )?;
    if n == 0 {
        bail!("No January ledger entry for {}", person);
    }
    store::refresh(conn)?;
    println!("Simples Janeiro ({}) = {}", person, value);
    Ok(())
}

fn set_total(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_index(sub.get_one::<String>("month").unwrap())?;
    let row: usize = sub
        .get_one::<String>("row")
        .unwrap()
        .trim()
        .parse()
        .context("Row index must be a non-negative number")?;
    let value = parse_money(sub.get_one::<String>("value").unwrap())?;

    let mut months = store::load_ledger(conn)?;
    let ledger = months
        .get_mut(month)
        .with_context(|| format!("No ledger month at index {}", month))?;
    set_extra_row(ledger, row, value);
    store::save_ledger(conn, &months)?;
    store::refresh(conn)?;
    println!(
        "Total individual {} row {} (Luciana) = {}",
        month_name(month),
        row,
        value
    );
    Ok(())
}

fn add_row(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_index(sub.get_one::<String>("month").unwrap())?;
    let mut months = store::load_ledger(conn)?;
    let ledger = months
        .get_mut(month)
        .with_context(|| format!("No ledger month at index {}", month))?;
    add_extra_row(ledger);
    let rows = ledger.extra_rows.max_len();
    store::save_ledger(conn, &months)?;
    store::refresh(conn)?;
    println!("{} now has {} individual-total rows", month_name(month), rows);
    Ok(())
}

fn del_row(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_index(sub.get_one::<String>("month").unwrap())?;
    let row: usize = sub
        .get_one::<String>("row")
        .unwrap()
        .trim()
        .parse()
        .context("Row index must be a non-negative number")?;
    let mut months = store::load_ledger(conn)?;
    let ledger = months
        .get_mut(month)
        .with_context(|| format!("No ledger month at index {}", month))?;
    delete_extra_row(ledger, row);
    store::save_ledger(conn, &months)?;
    store::refresh(conn)?;
    println!("Removed row {} from {}", row, month_name(month));
    Ok(())
}

#[derive(Serialize)]
pub struct ReportRow {
    pub month: String,
    pub bruto: String,
    pub liquido: String,
    pub bruto_mm3: String,
    pub liquido_mm3: String,
}

fn report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let masked = masked_flag(conn, sub)?;
    let months = store::load_ledger(conn)?;

    // Annual figures cover January..December; the preview slot stays out.
    let year_months = &months[..months.len().min(12)];
    let bruto_total: Decimal = year_months.iter().map(|m| m.gross_net.bruto).sum();
    let liquido_total: Decimal = year_months.iter().map(|m| m.gross_net.liquido).sum();
    let taxas_total: Decimal = year_months
        .iter()
        .flat_map(|m| m.entries.iter())
        .map(|e| e.valor_taxas)
        .sum();

    let brutos: Vec<Decimal> = year_months.iter().map(|m| m.gross_net.bruto).collect();
    let liquidos: Vec<Decimal> = year_months.iter().map(|m| m.gross_net.liquido).collect();
    let bruto_ma = moving_average(&brutos, 3);
    let liquido_ma = moving_average(&liquidos, 3);

    let data: Vec<ReportRow> = year_months
        .iter()
        .enumerate()
        .map(|(i, m)| ReportRow {
            month: m.month_name.clone(),
            bruto: fmt_brl_masked(&brutos[i], masked),
            liquido: fmt_brl_masked(&liquidos[i], masked),
            bruto_mm3: fmt_brl_masked(&bruto_ma[i], masked),
            liquido_mm3: fmt_brl_masked(&liquido_ma[i], masked),
        })
        .collect();

    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }

    println!(
        "Faturamento Bruto Anual:   {}",
        fmt_brl_masked(&bruto_total, masked)
    );
    println!(
        "Faturamento Líquido Anual: {}",
        fmt_brl_masked(&liquido_total, masked)
    );
    println!(
        "Total de Taxas e Impostos: {}",
        fmt_brl_masked(&taxas_total, masked)
    );
    let rows: Vec<Vec<String>> = data
        .into_iter()
        .map(|r| vec![r.month, r.bruto, r.liquido, r.bruto_mm3, r.liquido_mm3])
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Month", "Bruto", "Líquido", "Bruto MM3", "Líquido MM3"],
            rows,
        )
    );
    Ok(())
}
