// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Person, PERSONS};
use crate::store;
use crate::utils::{parse_rate, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut issues: Vec<Vec<String>> = Vec::new();

    let months = store::load_ledger(conn)?;
    let rates = store::load_rates(conn, store::ledger_year(conn)?)?;

    // 1) Derived-field invariants per person-month
    for month in &months {
        for entry in &month.entries {
            if entry.valor_taxas != entry.honorarios + entry.inss + entry.simples {
                issues.push(vec![
                    "taxas_mismatch".into(),
                    format!("{} / {}", month.month_name, entry.person),
                ]);
            }
            if entry.valor_liquido != entry.faturamento - entry.valor_taxas {
                issues.push(vec![
                    "liquido_mismatch".into(),
                    format!("{} / {}", month.month_name, entry.person),
                ]);
            }
        }
    }

    // 2) Chain rule: month i's Simples vs month i-1's revenue and rate
    for i in 1..months.len() {
        let prev_rate = parse_rate(rates.get(i - 1).map(|r| r.value.as_str()).unwrap_or(""));
        for entry in &months[i].entries {
            if let Some(prev) = months[i - 1].entry(entry.person) {
                if entry.simples != prev.faturamento * prev_rate {
                    issues.push(vec![
                        "chain_broken".into(),
                        format!("{} / {}", months[i].month_name, entry.person),
                    ]);
                }
            }
        }
    }

    // 3) Revenue must equal the row sum that feeds it
    for month in &months {
        for entry in &month.entries {
            if entry.faturamento != month.extra_rows.sum(entry.person) {
                issues.push(vec![
                    "stale_revenue".into(),
                    format!("{} / {}", month.month_name, entry.person),
                ]);
            }
        }
    }

    // 4) Row-list alignment across persons
    for month in &months {
        let lens: Vec<usize> = PERSONS
            .iter()
            .map(|p| month.extra_rows.rows(*p).len())
            .collect();
        if lens.iter().any(|l| *l != lens[0]) {
            issues.push(vec![
                "rows_misaligned".into(),
                format!("{} lengths {:?}", month.month_name, lens),
            ]);
        }
    }

    // 5) Agenda entries naming courses absent from the person's price table
    for person in [Person::Marcia, Person::Marcelo] {
        let prices = store::load_prices(conn, store::reference_year(conn, person)?)?;
        let agenda = store::load_agenda(conn, person)?;
        for courses in &agenda {
            for course in courses {
                if !course.course_name.is_empty()
                    && !prices.iter().any(|c| c.name == course.course_name)
                {
                    issues.push(vec![
                        "unknown_course".into(),
                        format!("{}: '{}' ({})", person, course.course_name, course.id),
                    ]);
                }
            }
        }
    }

    // 6) Negative rate fractions are almost certainly typos
    for (i, rate) in rates.iter().enumerate() {
        if parse_rate(&rate.value) < Decimal::ZERO {
            issues.push(vec![
                "negative_rate".into(),
                format!("month index {} ('{}')", i, rate.value),
            ]);
        }
    }

    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], issues));
    }
    Ok(())
}
