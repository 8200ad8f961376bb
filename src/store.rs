// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Bridge between the SQLite tables and the in-memory ledger the engine
//! works on. The whole monthly sequence is loaded, derived and replaced as
//! one unit; no partial month is ever written back.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use crate::engine;
use crate::models::{
    CourseDefinition, CourseEntry, ExtraRows, FeeEntry, GrossNet, MonthLedger, Person,
    PersonFigures, RateEntry, Status, MONTH_COUNT, MONTH_NAMES, PERSONS,
};

fn parse_stored(s: &str, what: &str) -> Result<Decimal> {
    Decimal::from_str(s).with_context(|| format!("Invalid stored {} '{}'", what, s))
}

pub fn load_agenda(conn: &Connection, person: Person) -> Result<Vec<Vec<CourseEntry>>> {
    let mut months: Vec<Vec<CourseEntry>> = vec![Vec::new(); MONTH_COUNT];
    let mut stmt = conn.prepare(
        "SELECT id, month_idx, date_label, location, course_name, status, override_value
         FROM courses WHERE person=?1 ORDER BY month_idx, position, created_at",
    )?;
    let mut rows = stmt.query([person.as_str()])?;
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let month_idx: usize = r.get::<_, i64>(1)? as usize;
        let date: String = r.get(2)?;
        let location: String = r.get(3)?;
        let course_name: String = r.get(4)?;
        let status_s: String = r.get(5)?;
        let override_s: Option<String> = r.get(6)?;
        if month_idx >= MONTH_COUNT {
            continue;
        }
        let status = Status::from_str(&status_s).unwrap_or(Status::Agendado);
        let override_value = match override_s {
            Some(s) => Some(parse_stored(&s, "override value")?),
            None => None,
        };
        months[month_idx].push(CourseEntry {
            id,
            date,
            location,
            course_name,
            status,
            override_value,
        });
    }
    Ok(months)
}

pub fn load_prices(conn: &Connection, year: i32) -> Result<Vec<CourseDefinition>> {
    let mut stmt =
        conn.prepare("SELECT name, value, hours FROM price_tables WHERE year=?1 ORDER BY rowid")?;
    let mut rows = stmt.query([year])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let name: String = r.get(0)?;
        let value_s: String = r.get(1)?;
        let hours: i64 = r.get(2)?;
        out.push(CourseDefinition {
            value: parse_stored(&value_s, "course value")?,
            name,
            hours,
        });
    }
    Ok(out)
}

pub fn load_rates(conn: &Connection, year: i32) -> Result<Vec<RateEntry>> {
    let mut stmt =
        conn.prepare("SELECT month_idx, value FROM rate_schedule WHERE year=?1 ORDER BY month_idx")?;
    let mut rows = stmt.query([year])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let idx: usize = r.get::<_, i64>(0)? as usize;
        let value: String = r.get(1)?;
        out.push(RateEntry {
            month: MONTH_NAMES.get(idx).copied().unwrap_or("?").to_string(),
            value,
        });
    }
    Ok(out)
}

pub fn load_fees(conn: &Connection, year: i32) -> Result<Vec<FeeEntry>> {
    let mut stmt =
        conn.prepare("SELECT label, value FROM fee_schedule WHERE year=?1 ORDER BY position")?;
    let mut rows = stmt.query([year])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(FeeEntry {
            label: r.get(0)?,
            value: r.get(1)?,
        });
    }
    Ok(out)
}

pub fn load_ledger(conn: &Connection) -> Result<Vec<MonthLedger>> {
    let mut figures: HashMap<(usize, Person), PersonFigures> = HashMap::new();
    {
        let mut stmt = conn.prepare(
            "SELECT month_idx, person, faturamento, honorarios, inss, simples, valor_taxas, valor_liquido
             FROM ledger_entries",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            let idx: usize = r.get::<_, i64>(0)? as usize;
            let person_s: String = r.get(1)?;
            let Ok(person) = Person::from_str(&person_s) else {
                continue;
            };
            figures.insert(
                (idx, person),
                PersonFigures {
                    person,
                    faturamento: parse_stored(&r.get::<_, String>(2)?, "faturamento")?,
                    honorarios: parse_stored(&r.get::<_, String>(3)?, "honorários")?,
                    inss: parse_stored(&r.get::<_, String>(4)?, "INSS")?,
                    simples: parse_stored(&r.get::<_, String>(5)?, "Simples")?,
                    valor_taxas: parse_stored(&r.get::<_, String>(6)?, "valor taxas")?,
                    valor_liquido: parse_stored(&r.get::<_, String>(7)?, "valor líquido")?,
                },
            );
        }
    }

    let mut extras: HashMap<usize, ExtraRows> = HashMap::new();
    {
        let mut stmt = conn.prepare(
            "SELECT month_idx, person, amount FROM extra_rows ORDER BY month_idx, row_idx",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            let idx: usize = r.get::<_, i64>(0)? as usize;
            let person_s: String = r.get(1)?;
            let amount = parse_stored(&r.get::<_, String>(2)?, "row amount")?;
            let Ok(person) = Person::from_str(&person_s) else {
                continue;
            };
            extras
                .entry(idx)
                .or_default()
                .rows_mut(person)
                .push(amount);
        }
    }

    let mut months = Vec::with_capacity(MONTH_COUNT);
    for (idx, name) in MONTH_NAMES.iter().enumerate() {
        let entries: Vec<PersonFigures> = PERSONS
            .iter()
            .map(|p| {
                figures.get(&(idx, *p)).cloned().unwrap_or(PersonFigures {
                    person: *p,
                    faturamento: Decimal::ZERO,
                    honorarios: Decimal::ZERO,
                    inss: Decimal::ZERO,
                    simples: Decimal::ZERO,
                    valor_taxas: Decimal::ZERO,
                    valor_liquido: Decimal::ZERO,
                })
            })
            .collect();
        let extra_rows = extras.remove(&idx).unwrap_or_default();

        let simples_total = entries.iter().map(|e| e.simples).sum();
        let inss_total = entries.iter().map(|e| e.inss).sum();
        let contadora_honorarios = entries.iter().map(|e| e.honorarios).sum();
        let bruto: Decimal = entries.iter().map(|e| e.faturamento).sum();
        let liquido: Decimal = entries.iter().map(|e| e.valor_liquido).sum();

        months.push(MonthLedger {
            month_name: name.to_string(),
            entries,
            extra_rows,
            contadora_honorarios,
            inss_total,
            simples_total,
            valor_nota: bruto,
            gross_net: GrossNet { bruto, liquido },
        });
    }
    Ok(months)
}

/// Replace the stored ledger wholesale with a freshly derived one.
pub fn save_ledger(conn: &Connection, months: &[MonthLedger]) -> Result<()> {
    conn.execute("DELETE FROM ledger_entries", [])?;
    conn.execute("DELETE FROM extra_rows", [])?;

    let mut entry_stmt = conn.prepare(
        "INSERT INTO ledger_entries(month_idx, person, faturamento, honorarios, inss, simples, valor_taxas, valor_liquido)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
    )?;
    let mut row_stmt = conn.prepare(
        "INSERT INTO extra_rows(month_idx, person, row_idx, amount) VALUES (?1,?2,?3,?4)",
    )?;

    for (idx, month) in months.iter().enumerate() {
        for entry in &month.entries {
            entry_stmt.execute(params![
                idx as i64,
                entry.person.as_str(),
                entry.faturamento.to_string(),
                entry.honorarios.to_string(),
                entry.inss.to_string(),
                entry.simples.to_string(),
                entry.valor_taxas.to_string(),
                entry.valor_liquido.to_string(),
            ])?;
        }
        for person in PERSONS {
            for (row_idx, amount) in month.extra_rows.rows(person).iter().enumerate() {
                row_stmt.execute(params![
                    idx as i64,
                    person.as_str(),
                    row_idx as i64,
                    amount.to_string(),
                ])?;
            }
        }
    }
    Ok(())
}

pub fn reference_year(conn: &Connection, person: Person) -> Result<i32> {
    let key = match person {
        Person::Marcelo => "ref_year_marcelo",
        _ => "ref_year_marcia",
    };
    Ok(crate::db::setting_or(conn, key, "2025")?.parse().unwrap_or(2025))
}

/// Set the selected reference-price year. The two agenda persons always
/// share one selection, so both keys are written together.
pub fn set_reference_year(conn: &Connection, year: i32) -> Result<()> {
    crate::db::set_setting(conn, "ref_year_marcia", &year.to_string())?;
    crate::db::set_setting(conn, "ref_year_marcelo", &year.to_string())?;
    Ok(())
}

/// The fiscal year whose rate schedule governs the chain.
pub fn ledger_year(conn: &Connection) -> Result<i32> {
    Ok(crate::db::setting_or(conn, "ledger_year", "2025")?
        .parse()
        .unwrap_or(2025))
}

pub fn masked_default(conn: &Connection) -> Result<bool> {
    Ok(crate::db::setting_or(conn, "masked", "0")? == "1")
}

/// The full derivation pipeline: load calendars, price tables and the
/// governing rate schedule, synchronize revenue rows, run the chain
/// recalculation and persist the result. Invoked after every edit that can
/// change an input; there is no incremental path.
pub fn refresh(conn: &Connection) -> Result<()> {
    let marcia_agenda = load_agenda(conn, Person::Marcia)?;
    let marcelo_agenda = load_agenda(conn, Person::Marcelo)?;
    let marcia_prices = load_prices(conn, reference_year(conn, Person::Marcia)?)?;
    let marcelo_prices = load_prices(conn, reference_year(conn, Person::Marcelo)?)?;
    let rates = load_rates(conn, ledger_year(conn)?)?;
    let months = load_ledger(conn)?;

    let synced = engine::synchronize(
        &months,
        &marcia_agenda,
        &marcelo_agenda,
        &marcia_prices,
        &marcelo_prices,
    );
    let derived = engine::recalculate(&synced, &rates);
    save_ledger(conn, &derived)
}
