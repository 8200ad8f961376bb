// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use cursobook::cli::build_cli;
use cursobook::models::Person;
use cursobook::utils::parse_rate;
use cursobook::{commands, db, store};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Drive a CLI invocation against an open connection, the way main does.
fn run(conn: &Connection, args: &[&str]) -> Result<()> {
    let mut argv = vec!["cursobook"];
    argv.extend_from_slice(args);
    let m = build_cli().get_matches_from(argv);
    match m.subcommand() {
        Some(("course", sub)) => commands::courses::handle(conn, sub),
        Some(("table", sub)) => commands::tables::handle(conn, sub),
        Some(("rate", sub)) => commands::rates::handle(conn, sub),
        Some(("fee", sub)) => commands::fees::handle(conn, sub),
        Some(("year", sub)) => commands::years::handle(conn, sub),
        Some(("ledger", sub)) => commands::ledger::handle(conn, sub),
        Some(("export", sub)) => commands::exporter::handle(conn, sub),
        Some(("mask", sub)) => commands::mask::handle(conn, sub),
        Some(("doctor", _)) => commands::doctor::handle(conn),
        _ => Ok(()),
    }
}

#[test]
fn seeding_splits_fee_schedule_three_ways() -> Result<()> {
    let conn = db::open_in_memory()?;
    let months = store::load_ledger(&conn)?;
    assert_eq!(months.len(), 13);

    // January carries the prior-year amounts, later months the current ones.
    let jan = months[0].entry(Person::Luciana).unwrap();
    assert_eq!(jan.honorarios, d("214"));
    assert_eq!(jan.inss, d("145.2"));
    assert_eq!(jan.valor_taxas, d("359.2"));
    assert_eq!(jan.valor_liquido, d("-359.2"));

    let fev = months[1].entry(Person::Marcelo).unwrap();
    assert_eq!(fev.honorarios, d("230"));
    assert_eq!(fev.inss, d("166.98"));

    // Every month starts with one aligned zero row per person.
    for month in &months {
        assert_eq!(month.extra_rows.max_len(), 1);
    }
    Ok(())
}

#[test]
fn seeding_installs_2025_rate_schedule() -> Result<()> {
    let conn = db::open_in_memory()?;
    let rates = store::load_rates(&conn, 2025)?;
    assert_eq!(rates.len(), 13);
    assert_eq!(rates[0].value, "8,7028063908953");
    assert_eq!(rates[8].value, "9,1418151138393");
    assert!(rates[9].value.is_empty());
    assert!(rates[12].value.is_empty());

    // 2026 starts blank; it gets values only via edits and propagation.
    let next = store::load_rates(&conn, 2026)?;
    assert!(next.iter().all(|r| r.value.is_empty()));
    Ok(())
}

#[test]
fn course_edit_flows_into_next_months_simples() -> Result<()> {
    let conn = db::open_in_memory()?;
    let id: String = conn.query_row(
        "SELECT id FROM courses WHERE person='Márcia' AND month_idx=0",
        [],
        |r| r.get(0),
    )?;

    run(&conn, &["course", "set", "--id", &id, "--name", "Macramê"])?;

    let months = store::load_ledger(&conn)?;
    let jan = months[0].entry(Person::Marcia).unwrap();
    assert_eq!(jan.faturamento, d("3312"));

    let expected = d("3312") * parse_rate("8,7028063908953");
    let fev = months[1].entry(Person::Marcia).unwrap();
    assert_eq!(fev.simples, expected);
    assert_eq!(fev.valor_taxas, fev.honorarios + fev.inss + fev.simples);
    Ok(())
}

#[test]
fn cancelling_a_course_zeroes_its_row() -> Result<()> {
    let conn = db::open_in_memory()?;
    let id: String = conn.query_row(
        "SELECT id FROM courses WHERE person='Márcia' AND month_idx=0",
        [],
        |r| r.get(0),
    )?;
    run(
        &conn,
        &["course", "set", "--id", &id, "--name", "Macramê", "--value", "500"],
    )?;
    run(&conn, &["course", "set", "--id", &id, "--status", "cancelado"])?;

    let months = store::load_ledger(&conn)?;
    assert_eq!(months[0].extra_rows.marcia, vec![Decimal::ZERO]);
    assert_eq!(
        months[0].entry(Person::Marcia).unwrap().faturamento,
        Decimal::ZERO
    );
    Ok(())
}

#[test]
fn price_table_edit_reprices_the_agenda() -> Result<()> {
    let conn = db::open_in_memory()?;
    let id: String = conn.query_row(
        "SELECT id FROM courses WHERE person='Marcelo' AND month_idx=2",
        [],
        |r| r.get(0),
    )?;
    run(&conn, &["course", "set", "--id", &id, "--name", "Excel Básico"])?;
    run(
        &conn,
        &["table", "set", "--year", "2025", "--name", "Excel Básico", "--value", "4000"],
    )?;

    let months = store::load_ledger(&conn)?;
    assert_eq!(
        months[2].entry(Person::Marcelo).unwrap().faturamento,
        d("4000")
    );
    Ok(())
}

#[test]
fn manual_rows_and_january_simples_drive_the_chain() -> Result<()> {
    let conn = db::open_in_memory()?;
    run(
        &conn,
        &["ledger", "set-total", "--month", "1", "--row", "0", "--value", "10000"],
    )?;
    run(
        &conn,
        &["ledger", "set-simples", "--person", "Luciana", "--value", "1000"],
    )?;

    let months = store::load_ledger(&conn)?;
    let jan = months[0].entry(Person::Luciana).unwrap();
    assert_eq!(jan.faturamento, d("10000"));
    assert_eq!(jan.simples, d("1000"));

    let fev = months[1].entry(Person::Luciana).unwrap();
    assert_eq!(fev.simples, d("10000") * parse_rate("8,7028063908953"));
    Ok(())
}

#[test]
fn row_add_and_delete_survive_a_round_trip() -> Result<()> {
    let conn = db::open_in_memory()?;
    run(&conn, &["ledger", "add-row", "--month", "Maio"])?;

    let months = store::load_ledger(&conn)?;
    assert_eq!(months[4].extra_rows.max_len(), 2);

    run(&conn, &["ledger", "del-row", "--month", "Maio", "--row", "1"])?;
    let months = store::load_ledger(&conn)?;
    assert_eq!(months[4].extra_rows.max_len(), 1);
    Ok(())
}

#[test]
fn december_rate_propagates_to_next_january() -> Result<()> {
    let conn = db::open_in_memory()?;
    run(
        &conn,
        &["rate", "set", "--year", "2025", "--month", "13", "--value", "9,5"],
    )?;

    let next = store::load_rates(&conn, 2026)?;
    assert_eq!(next[0].value, "9,5");
    // Other 2026 slots stay blank, and nothing flows back into 2025.
    assert!(next[1..].iter().all(|r| r.value.is_empty()));
    assert_eq!(store::load_rates(&conn, 2025)?[0].value, "8,7028063908953");
    Ok(())
}

#[test]
fn last_supported_year_does_not_propagate() -> Result<()> {
    let conn = db::open_in_memory()?;
    run(
        &conn,
        &["rate", "set", "--year", "2027", "--month", "13", "--value", "7,0"],
    )?;
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM rate_schedule WHERE year=2028",
        [],
        |r| r.get(0),
    )?;
    assert_eq!(n, 0);
    Ok(())
}

#[test]
fn reference_year_is_shared_by_both_agendas() -> Result<()> {
    let conn = db::open_in_memory()?;
    assert_eq!(store::reference_year(&conn, Person::Marcia)?, 2025);

    run(&conn, &["year", "set", "--year", "2026"])?;
    assert_eq!(store::reference_year(&conn, Person::Marcia)?, 2026);
    assert_eq!(store::reference_year(&conn, Person::Marcelo)?, 2026);
    Ok(())
}

#[test]
fn mask_setting_round_trips() -> Result<()> {
    let conn = db::open_in_memory()?;
    assert!(!store::masked_default(&conn)?);
    run(&conn, &["mask", "on"])?;
    assert!(store::masked_default(&conn)?);
    run(&conn, &["mask", "off"])?;
    assert!(!store::masked_default(&conn)?);
    Ok(())
}

#[test]
fn luciana_has_no_agenda_commands() -> Result<()> {
    let conn = db::open_in_memory()?;
    let err = run(
        &conn,
        &["course", "add", "--person", "Luciana", "--month", "1"],
    );
    assert!(err.is_err());
    Ok(())
}

#[test]
fn fee_edit_does_not_rewrite_ledger_shares() -> Result<()> {
    let conn = db::open_in_memory()?;
    run(
        &conn,
        &["fee", "set", "--year", "2025", "--label", "Honorários 2025", "--value", "99000"],
    )?;
    let months = store::load_ledger(&conn)?;
    assert_eq!(months[1].entry(Person::Luciana).unwrap().honorarios, d("230"));
    Ok(())
}

#[test]
fn migration_renames_legacy_course_and_fee_labels() -> Result<()> {
    let mut conn = Connection::open_in_memory()?;
    db::init_schema(&mut conn)?;
    db::set_setting(&conn, "schema_version", "1")?;
    conn.execute_batch(
        r#"
        INSERT INTO courses(id, person, month_idx, position, course_name, status)
        VALUES ('course-0001', 'Márcia', 0, 0, 'Inclusão', 'Agendado');
        INSERT INTO fee_schedule(year, position, label, value) VALUES
            (2026, 0, 'Honorários 2024', '64200'),
            (2026, 1, 'INSS', '43560'),
            (2026, 2, 'Honorários 2025', '69000'),
            (2026, 3, 'INSS 2025', '50094');
        "#,
    )?;

    assert!(db::migrate(&conn)?);

    let name: String = conn.query_row(
        "SELECT course_name FROM courses WHERE id='course-0001'",
        [],
        |r| r.get(0),
    )?;
    assert_eq!(name, "Inclusão Digital");

    let labels: Vec<String> = store::load_fees(&conn, 2026)?
        .into_iter()
        .map(|f| f.label)
        .collect();
    assert_eq!(
        labels,
        vec!["Honorários 2025", "INSS", "Honorários 2026", "INSS 2026"]
    );

    // Every supported year gains the next-January rate slot.
    for year in db::YEARS {
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM rate_schedule WHERE year=?1 AND month_idx=12",
            [year],
            |r| r.get(0),
        )?;
        assert_eq!(n, 1);
    }

    // A second run is a no-op.
    assert!(!db::migrate(&conn)?);
    Ok(())
}

#[test]
fn doctor_passes_on_a_fresh_database() -> Result<()> {
    let conn = db::open_in_memory()?;
    run(&conn, &["ledger", "set-total", "--month", "1", "--row", "0", "--value", "5000"])?;
    run(&conn, &["doctor"])?;
    Ok(())
}
