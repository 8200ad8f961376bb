// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::sync::resolve_value;
use crate::models::Person;
use crate::store;
use crate::utils::month_name;
use anyhow::{bail, Result};
use rusqlite::Connection;
use serde_json::json;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ledger", sub)) => export_ledger(conn, sub),
        Some(("agenda", sub)) => export_agenda(conn, sub),
        _ => Ok(()),
    }
}

fn out_path(sub: &clap::ArgMatches, what: &str, fmt: &str) -> String {
    sub.get_one::<String>("out").cloned().unwrap_or_else(|| {
        format!(
            "cursobook-{}-{}.{}",
            what,
            chrono::Local::now().format("%Y-%m-%d"),
            fmt
        )
    })
}

fn export_ledger(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = out_path(sub, "ledger", &fmt);
    let months = store::load_ledger(conn)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(&out)?;
            wtr.write_record([
                "month",
                "person",
                "faturamento",
                "honorarios",
                "inss",
                "simples",
                "valor_taxas",
                "valor_liquido",
            ])?;
            for month in &months {
                for entry in &month.entries {
                    wtr.write_record([
                        month.month_name.as_str(),
                        entry.person.as_str(),
                        &entry.faturamento.to_string(),
                        &entry.honorarios.to_string(),
                        &entry.inss.to_string(),
                        &entry.simples.to_string(),
                        &entry.valor_taxas.to_string(),
                        &entry.valor_liquido.to_string(),
                    ])?;
                }
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(&out, serde_json::to_string_pretty(&months)?)?;
        }
        _ => {
            bail!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported ledger to {}", out);
    Ok(())
}

fn export_agenda(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let person = Person::from_str(sub.get_one::<String>("person").unwrap())?;
    if !person.has_agenda() {
        bail!("{} has no course agenda", person);
    }
    let out = out_path(sub, "agenda", &fmt);
    let agenda = store::load_agenda(conn, person)?;
    let prices = store::load_prices(conn, store::reference_year(conn, person)?)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(&out)?;
            wtr.write_record([
                "month", "id", "date", "location", "course", "status", "override", "value",
            ])?;
            for (idx, courses) in agenda.iter().enumerate() {
                for course in courses {
                    wtr.write_record([
                        month_name(idx),
                        course.id.as_str(),
                        course.date.as_str(),
                        course.location.as_str(),
                        course.course_name.as_str(),
                        course.status.as_str(),
                        &course
                            .override_value
                            .map(|v| v.to_string())
                            .unwrap_or_default(),
                        &resolve_value(course, &prices).to_string(),
                    ])?;
                }
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for (idx, courses) in agenda.iter().enumerate() {
                for course in courses {
                    items.push(json!({
                        "month": month_name(idx),
                        "id": course.id,
                        "date": course.date,
                        "location": course.location,
                        "course": course.course_name,
                        "status": course.status.as_str(),
                        "override": course.override_value,
                        "value": resolve_value(course, &prices),
                    }));
                }
            }
            std::fs::write(&out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            bail!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported {}'s agenda to {}", person, out);
    Ok(())
}
