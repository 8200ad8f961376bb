// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{next_course_id, MARCELO_COURSE_NAMES};
use crate::engine::sync::{resolve_value, yearly_total};
use crate::models::{CourseDefinition, Person, Status, STATUS_OPTIONS};
use crate::store;
use crate::utils::{
    fmt_brl, fmt_brl_masked, maybe_print_json, month_index, month_name, parse_money, pretty_table,
};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        Some(("del", sub)) => del(conn, sub)?,
        Some(("move", sub)) => move_entry(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("catalog", sub)) => catalog(conn, sub)?,
        Some(("total", sub)) => total(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn agenda_person(sub: &clap::ArgMatches) -> Result<Person> {
    let person = Person::from_str(sub.get_one::<String>("person").unwrap())?;
    if !person.has_agenda() {
        bail!(
            "{} has no course agenda; revenue is entered via 'ledger set-total'",
            person
        );
    }
    Ok(person)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let person = agenda_person(sub)?;
    let month = month_index(sub.get_one::<String>("month").unwrap())?;
    let date = sub.get_one::<String>("date").cloned().unwrap_or_default();
    let location = sub
        .get_one::<String>("location")
        .cloned()
        .unwrap_or_default();
    let course_name = sub.get_one::<String>("name").cloned().unwrap_or_default();
    let status = match sub.get_one::<String>("status") {
        Some(s) => Status::from_str(s)?,
        None => Status::Agendado,
    };
    let override_value = sub
        .get_one::<String>("value")
        .map(|s| parse_money(s))
        .transpose()?;

    let position: i64 = conn.query_row(
        "SELECT IFNULL(MAX(position),-1)+1 FROM courses WHERE person=?1 AND month_idx=?2",
        params![person.as_str(), month as i64],
        |r| r.get(0),
    )?;
    let id = next_course_id(conn)?;
    conn.execute(
        "INSERT INTO courses(id, person, month_idx, position, date_label, location, course_name, status, override_value)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        params![
            id,
            person.as_str(),
            month as i64,
            position,
            date,
            location,
            course_name,
            status.as_str(),
            override_value.map(|v| v.to_string()),
        ],
    )?;
    store::refresh(conn)?;
    println!("Added {} to {} / {}", id, person, month_name(month));
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let existing: Option<(String, String, String, String, Option<String>)> = conn
        .query_row(
            "SELECT date_label, location, course_name, status, override_value FROM courses WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                ))
            },
        )
        .optional()?;
    let (mut date, mut location, mut course_name, mut status_s, mut override_s) =
        existing.with_context(|| format!("Course '{}' not found", id))?;

    if let Some(v) = sub.get_one::<String>("date") {
        date = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("location") {
        location = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("name") {
        course_name = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("status") {
        status_s = Status::from_str(v)?.as_str().to_string();
    }
    if sub.get_flag("clear-value") {
        override_s = None;
    } else if let Some(v) = sub.get_one::<String>("value") {
        override_s = Some(parse_money(v)?.to_string());
    }

    conn.execute(
        "UPDATE courses SET date_label=?2, location=?3, course_name=?4, status=?5, override_value=?6 WHERE id=?1",
        params![id, date, location, course_name, status_s, override_s],
    )?;
    store::refresh(conn)?;
    println!("Updated {}", id);
    Ok(())
}

fn del(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let n = conn.execute("DELETE FROM courses WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Course '{}' not found", id);
    }
    store::refresh(conn)?;
    println!("Deleted {}", id);
    Ok(())
}

fn move_entry(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let month = month_index(sub.get_one::<String>("month").unwrap())?;
    let person_s: String = conn
        .query_row("SELECT person FROM courses WHERE id=?1", params![id], |r| {
            r.get(0)
        })
        .optional()?
        .with_context(|| format!("Course '{}' not found", id))?;

    let position: i64 = if let Some(before_id) = sub.get_one::<String>("before") {
        let target: Option<(String, i64, i64)> = conn
            .query_row(
                "SELECT person, month_idx, position FROM courses WHERE id=?1",
                params![before_id],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?;
        let (target_person, target_month, target_pos) =
            target.with_context(|| format!("Course '{}' not found", before_id))?;
        if target_person != person_s || target_month != month as i64 {
            bail!(
                "Target '{}' is not in {}'s {} agenda",
                before_id,
                person_s,
                month_name(month)
            );
        }
        conn.execute(
            "UPDATE courses SET position = position + 1 WHERE person=?1 AND month_idx=?2 AND position >= ?3",
            params![person_s, month as i64, target_pos],
        )?;
        target_pos
    } else {
        conn.query_row(
            "SELECT IFNULL(MAX(position),-1)+1 FROM courses WHERE person=?1 AND month_idx=?2",
            params![person_s, month as i64],
            |r| r.get(0),
        )?
    };

    conn.execute(
        "UPDATE courses SET month_idx=?2, position=?3 WHERE id=?1",
        params![id, month as i64, position],
    )?;
    store::refresh(conn)?;
    println!("Moved {} to {}", id, month_name(month));
    Ok(())
}

#[derive(Serialize)]
pub struct AgendaRow {
    pub month: String,
    pub id: String,
    pub date: String,
    pub location: String,
    pub course: String,
    pub status: String,
    pub value: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let person = agenda_person(sub)?;
    let month_filter = sub
        .get_one::<String>("month")
        .map(|s| month_index(s))
        .transpose()?;

    let prices = store::load_prices(conn, store::reference_year(conn, person)?)?;
    let agenda = store::load_agenda(conn, person)?;

    let mut data = Vec::new();
    for (idx, courses) in agenda.iter().enumerate() {
        if let Some(only) = month_filter {
            if idx != only {
                continue;
            }
        }
        for course in courses {
            data.push(AgendaRow {
                month: month_name(idx).to_string(),
                id: course.id.clone(),
                date: course.date.clone(),
                location: course.location.clone(),
                course: course.course_name.clone(),
                status: course.status.as_str().to_string(),
                value: fmt_brl(&resolve_value(course, &prices)),
            });
        }
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| vec![r.month, r.id, r.date, r.location, r.course, r.status, r.value])
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "ID", "Date", "Location", "Course", "Status", "Valor"],
                rows,
            )
        );
    }
    Ok(())
}

/// The course catalog a person can schedule from. Marcelo teaches the
/// informática courses; Márcia the handcraft ones.
pub fn catalog_for(person: Person, prices: &[CourseDefinition]) -> Vec<CourseDefinition> {
    prices
        .iter()
        .filter(|c| {
            let is_marcelo_course = MARCELO_COURSE_NAMES.contains(&c.name.as_str());
            match person {
                Person::Marcelo => is_marcelo_course,
                Person::Marcia => !is_marcelo_course,
                Person::Luciana => false,
            }
        })
        .cloned()
        .collect()
}

fn catalog(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let person = agenda_person(sub)?;
    let prices = store::load_prices(conn, store::reference_year(conn, person)?)?;
    let rows: Vec<Vec<String>> = catalog_for(person, &prices)
        .into_iter()
        .map(|c| vec![c.name, fmt_brl(&c.value), format!("{}h", c.hours)])
        .collect();
    println!("{}", pretty_table(&["Course", "Valor", "Horas"], rows));
    println!(
        "Statuses: {}",
        STATUS_OPTIONS
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

fn total(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let masked = sub.get_flag("masked") || store::masked_default(conn)?;
    let person = agenda_person(sub)?;
    let prices = store::load_prices(conn, store::reference_year(conn, person)?)?;
    let agenda = store::load_agenda(conn, person)?;
    let total = yearly_total(&agenda, &prices);
    println!("Total Anual ({}): {}", person, fmt_brl_masked(&total, masked));
    Ok(())
}
