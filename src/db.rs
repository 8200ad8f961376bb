// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

use crate::models::{MONTH_COUNT, PERSONS};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("br.com.fiosepanos", "FiosEPanos", "cursobook"));

const SCHEMA_VERSION: i64 = 2;

/// Fiscal years with their own reference price table, rate schedule and fees.
pub const YEARS: [i32; 3] = [2025, 2026, 2027];

/// 2025 reference price table; 2026 and 2027 start as copies of it.
pub const BASE_COURSES: &[(&str, i64, i64)] = &[
    ("Bordados a Mão", 2484, 24),
    ("Macramê", 3312, 32),
    ("Tecelagem com Lã Crua", 5440, 40),
    ("Confecção com Lã Crua", 5440, 40),
    ("Lã", 5440, 40),
    ("CTI", 544, 4),
    ("Inclusão Digital", 2176, 16),
    ("Excel Básico", 3264, 24),
    ("Informática Básica", 4352, 32),
    ("Nota Fiscal Avulsa", 2176, 16),
    ("CTG", 1088, 8),
];

/// Marcelo teaches the informática catalog; Márcia teaches the rest.
pub const MARCELO_COURSE_NAMES: &[&str] = &[
    "Excel Básico",
    "Inclusão Digital",
    "Informática Básica",
    "Nota Fiscal Avulsa",
];

const RATES_2025: [&str; MONTH_COUNT] = [
    "8,7028063908953",
    "8,8048517942134",
    "8,7665007061742",
    "8,8335677660003",
    "8,8434224614769",
    "8,7998477326521",
    "9,1123222011099",
    "9,1843296566383",
    "9,1418151138393",
    "",
    "",
    "",
    "",
];

const FEES_2025: &[(&str, &str)] = &[
    ("Honorários 2024", "64200"),
    ("INSS", "43560"),
    ("Honorários 2025", "69000"),
    ("INSS 2025", "50094"),
];

const FEES_2026: &[(&str, &str)] = &[
    ("Honorários 2025", "64200"),
    ("INSS", "43560"),
    ("Honorários 2026", "69000"),
    ("INSS 2026", "50094"),
];

const FEES_2027: &[(&str, &str)] = &[
    ("Honorários 2026", "64200"),
    ("INSS", "43560"),
    ("Honorários 2027", "69000"),
    ("INSS 2027", "50094"),
];

/// Legacy short course names from early agendas, mapped to the full names.
const COURSE_NAME_MIGRATIONS: &[(&str, &str)] = &[
    ("Inclusão", "Inclusão Digital"),
    ("Excel", "Excel Básico"),
    ("Informática", "Informática Básica"),
    ("Tecelagem", "Tecelagem com Lã Crua"),
    ("Confecção", "Confecção com Lã Crua"),
    ("Bordado", "Bordados a Mão"),
    ("Nota Fiscal", "Nota Fiscal Avulsa"),
];

/// Fee labels in the 2026 schedule that predate the label roll-forward.
/// Ordered so a chained rename (2024 -> 2025 -> 2026) cannot cascade within
/// one migration run.
const FEE_LABEL_MIGRATIONS_2026: &[(&str, &str)] = &[
    ("Honorários 2025", "Honorários 2026"),
    ("Honorários 2024", "Honorários 2025"),
    ("INSS 2025", "INSS 2026"),
];

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("cursobook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    seed_if_empty(&conn)?;
    if migrate(&conn)? {
        crate::store::refresh(&conn)?;
    }
    Ok(conn)
}

/// Fresh, fully seeded in-memory database. Used by the test suite.
pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    init_schema(&mut conn)?;
    seed_if_empty(&conn)?;
    migrate(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS courses(
        id TEXT PRIMARY KEY,
        person TEXT NOT NULL,
        month_idx INTEGER NOT NULL,
        position INTEGER NOT NULL,
        date_label TEXT NOT NULL DEFAULT '',
        location TEXT NOT NULL DEFAULT '',
        course_name TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL,
        override_value TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_courses_slot ON courses(person, month_idx, position);

    CREATE TABLE IF NOT EXISTS price_tables(
        year INTEGER NOT NULL,
        name TEXT NOT NULL,
        value TEXT NOT NULL,
        hours INTEGER NOT NULL,
        UNIQUE(year, name)
    );

    CREATE TABLE IF NOT EXISTS rate_schedule(
        year INTEGER NOT NULL,
        month_idx INTEGER NOT NULL,
        value TEXT NOT NULL DEFAULT '',
        UNIQUE(year, month_idx)
    );

    CREATE TABLE IF NOT EXISTS fee_schedule(
        year INTEGER NOT NULL,
        position INTEGER NOT NULL,
        label TEXT NOT NULL,
        value TEXT NOT NULL,
        UNIQUE(year, position)
    );

    CREATE TABLE IF NOT EXISTS ledger_entries(
        month_idx INTEGER NOT NULL,
        person TEXT NOT NULL,
        faturamento TEXT NOT NULL DEFAULT '0',
        honorarios TEXT NOT NULL DEFAULT '0',
        inss TEXT NOT NULL DEFAULT '0',
        simples TEXT NOT NULL DEFAULT '0',
        valor_taxas TEXT NOT NULL DEFAULT '0',
        valor_liquido TEXT NOT NULL DEFAULT '0',
        UNIQUE(month_idx, person)
    );

    CREATE TABLE IF NOT EXISTS extra_rows(
        month_idx INTEGER NOT NULL,
        person TEXT NOT NULL,
        row_idx INTEGER NOT NULL,
        amount TEXT NOT NULL DEFAULT '0',
        UNIQUE(month_idx, person, row_idx)
    );
    "#,
    )?;
    Ok(())
}

fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", [key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn setting_or(conn: &Connection, key: &str, default: &str) -> Result<String> {
    Ok(get_setting(conn, key)?.unwrap_or_else(|| default.to_string()))
}

/// Monotonic id generator for agenda entries; ids stay stable across moves.
pub fn next_course_id(conn: &Connection) -> Result<String> {
    let n: i64 = setting_or(conn, "course_seq", "0")?.parse().unwrap_or(0);
    let next = n + 1;
    set_setting(conn, "course_seq", &next.to_string())?;
    Ok(format!("course-{:04}", next))
}

fn seed_if_empty(conn: &Connection) -> Result<()> {
    if get_setting(conn, "seeded")?.is_some() {
        return Ok(());
    }

    for year in YEARS {
        for (name, value, hours) in BASE_COURSES {
            conn.execute(
                "INSERT INTO price_tables(year, name, value, hours) VALUES (?1,?2,?3,?4)",
                params![year, name, value.to_string(), hours],
            )?;
        }
        for idx in 0..MONTH_COUNT {
            let value = if year == 2025 { RATES_2025[idx] } else { "" };
            conn.execute(
                "INSERT INTO rate_schedule(year, month_idx, value) VALUES (?1,?2,?3)",
                params![year, idx as i64, value],
            )?;
        }
        let fees: &[(&str, &str)] = match year {
            2025 => FEES_2025,
            2026 => FEES_2026,
            _ => FEES_2027,
        };
        for (pos, (label, value)) in fees.iter().enumerate() {
            conn.execute(
                "INSERT INTO fee_schedule(year, position, label, value) VALUES (?1,?2,?3,?4)",
                params![year, pos as i64, label, value],
            )?;
        }
    }

    seed_ledger(conn)?;

    // One empty slot per month for each agenda-bearing person.
    for person in PERSONS.iter().filter(|p| p.has_agenda()) {
        for idx in 0..MONTH_COUNT {
            let id = next_course_id(conn)?;
            conn.execute(
                "INSERT INTO courses(id, person, month_idx, position, status) VALUES (?1,?2,?3,0,?4)",
                params![id, person.as_str(), idx as i64, "Agendado"],
            )?;
        }
    }

    set_setting(conn, "ref_year_marcia", "2025")?;
    set_setting(conn, "ref_year_marcelo", "2025")?;
    set_setting(conn, "ledger_year", "2025")?;
    set_setting(conn, "masked", "0")?;
    set_setting(conn, "schema_version", &SCHEMA_VERSION.to_string())?;
    set_setting(conn, "seeded", "1")?;
    Ok(())
}

/// Seed the 13-month ledger. The fixed honorários/INSS shares come from the
/// 2025 fee schedule, divided by 100 and split three ways: month 0 from the
/// prior-year amounts, months 1+ from the current-year ones. These shares are
/// locked in at seeding; later fee edits do not touch them.
fn seed_ledger(conn: &Connection) -> Result<()> {
    let fee = |label: &str| -> Decimal {
        FEES_2025
            .iter()
            .find(|(l, _)| *l == label)
            .and_then(|(_, v)| v.parse::<Decimal>().ok())
            .unwrap_or(Decimal::ZERO)
    };
    let split = Decimal::ONE_HUNDRED * Decimal::from(3);
    let first_month = (fee("Honorários 2024") / split, fee("INSS") / split);
    let rest = (fee("Honorários 2025") / split, fee("INSS 2025") / split);

    for idx in 0..MONTH_COUNT {
        let (hon, inss) = if idx == 0 { first_month } else { rest };
        let taxas = hon + inss;
        for person in PERSONS {
            conn.execute(
                "INSERT INTO ledger_entries(month_idx, person, faturamento, honorarios, inss, simples, valor_taxas, valor_liquido)
                 VALUES (?1,?2,'0',?3,?4,'0',?5,?6)",
                params![
                    idx as i64,
                    person.as_str(),
                    hon.to_string(),
                    inss.to_string(),
                    taxas.to_string(),
                    (-taxas).to_string()
                ],
            )?;
            conn.execute(
                "INSERT INTO extra_rows(month_idx, person, row_idx, amount) VALUES (?1,?2,0,'0')",
                params![idx as i64, person.as_str()],
            )?;
        }
    }
    Ok(())
}

/// One-time data migrations for databases written by earlier releases:
/// legacy short course names, missing "Janeiro Próximo" rate slots, and the
/// 2026 fee-label roll-forward. Returns true when anything changed so the
/// caller can re-run the derivation pipeline.
pub fn migrate(conn: &Connection) -> Result<bool> {
    let version: i64 = setting_or(conn, "schema_version", "1")?.parse().unwrap_or(1);
    if version >= SCHEMA_VERSION {
        return Ok(false);
    }

    for (old, new) in COURSE_NAME_MIGRATIONS {
        conn.execute(
            "UPDATE courses SET course_name=?2 WHERE course_name=?1",
            params![old, new],
        )?;
        conn.execute(
            "UPDATE OR IGNORE price_tables SET name=?2 WHERE year=2026 AND name=?1",
            params![old, new],
        )?;
    }

    for year in YEARS {
        conn.execute(
            "INSERT OR IGNORE INTO rate_schedule(year, month_idx, value) VALUES (?1, ?2, '')",
            params![year, (MONTH_COUNT - 1) as i64],
        )?;
    }

    for (old, new) in FEE_LABEL_MIGRATIONS_2026 {
        conn.execute(
            "UPDATE fee_schedule SET label=?2 WHERE year=2026 AND label=?1",
            params![old, new],
        )?;
    }

    set_setting(conn, "schema_version", &SCHEMA_VERSION.to_string())?;
    Ok(true)
}
