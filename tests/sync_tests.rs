// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cursobook::engine::sync::{resolve_value, yearly_total};
use cursobook::engine::synchronize;
use cursobook::models::{
    CourseDefinition, CourseEntry, ExtraRows, GrossNet, MonthLedger, Person, PersonFigures, Status,
    MONTH_NAMES, PERSONS,
};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn course(name: &str, status: Status, override_value: Option<Decimal>) -> CourseEntry {
    CourseEntry {
        id: format!("course-{}", name.len()),
        date: String::new(),
        location: String::new(),
        course_name: name.to_string(),
        status,
        override_value,
    }
}

fn prices() -> Vec<CourseDefinition> {
    vec![
        CourseDefinition {
            name: "Macramê".to_string(),
            value: d("3312"),
            hours: 32,
        },
        CourseDefinition {
            name: "Excel Básico".to_string(),
            value: d("3264"),
            hours: 24,
        },
    ]
}

fn blank_month(name: &str) -> MonthLedger {
    MonthLedger {
        month_name: name.to_string(),
        entries: PERSONS
            .iter()
            .map(|p| PersonFigures {
                person: *p,
                faturamento: Decimal::ZERO,
                honorarios: Decimal::ZERO,
                inss: Decimal::ZERO,
                simples: Decimal::ZERO,
                valor_taxas: Decimal::ZERO,
                valor_liquido: Decimal::ZERO,
            })
            .collect(),
        extra_rows: ExtraRows::default(),
        contadora_honorarios: Decimal::ZERO,
        inss_total: Decimal::ZERO,
        simples_total: Decimal::ZERO,
        valor_nota: Decimal::ZERO,
        gross_net: GrossNet::default(),
    }
}

fn months(n: usize) -> Vec<MonthLedger> {
    (0..n).map(|i| blank_month(MONTH_NAMES[i])).collect()
}

#[test]
fn resolve_uses_price_table_by_name() {
    let entry = course("Macramê", Status::Agendado, None);
    assert_eq!(resolve_value(&entry, &prices()), d("3312"));
}

#[test]
fn resolve_prefers_manual_override() {
    let entry = course("Macramê", Status::Realizado, Some(d("2500")));
    assert_eq!(resolve_value(&entry, &prices()), d("2500"));
}

#[test]
fn resolve_unknown_or_blank_course_is_zero() {
    let unknown = course("Cerâmica", Status::Agendado, None);
    assert_eq!(resolve_value(&unknown, &prices()), Decimal::ZERO);
    let blank = course("", Status::Agendado, None);
    assert_eq!(resolve_value(&blank, &prices()), Decimal::ZERO);
}

#[test]
fn cancelled_and_refused_resolve_zero_even_with_override() {
    // Scenario C: the row survives in the calendar but contributes nothing.
    for status in [Status::Cancelado, Status::Recusado] {
        let entry = course("Macramê", status, Some(d("500")));
        assert_eq!(resolve_value(&entry, &prices()), Decimal::ZERO);
    }
}

#[test]
fn sync_builds_one_row_per_agenda_slot() {
    let m = months(2);
    let marcia: Vec<Vec<CourseEntry>> = vec![
        vec![
            course("Macramê", Status::Agendado, None),
            course("Macramê", Status::Cancelado, Some(d("500"))),
        ],
        vec![],
    ];
    let marcelo: Vec<Vec<CourseEntry>> = vec![
        vec![course("Excel Básico", Status::Realizado, None)],
        vec![],
    ];

    let out = synchronize(&m, &marcia, &marcelo, &prices(), &prices());
    assert_eq!(out[0].extra_rows.marcia, vec![d("3312"), Decimal::ZERO]);
    // Marcelo's single row is padded up to Márcia's two.
    assert_eq!(out[0].extra_rows.marcelo, vec![d("3264"), Decimal::ZERO]);
    assert_eq!(out[0].extra_rows.luciana, vec![Decimal::ZERO, Decimal::ZERO]);
}

#[test]
fn sync_preserves_luciana_rows() {
    let mut m = months(1);
    m[0].extra_rows.luciana = vec![d("1500"), d("250")];
    let marcia = vec![vec![course("Macramê", Status::Agendado, None)]];
    let marcelo = vec![vec![]];

    let out = synchronize(&m, &marcia, &marcelo, &prices(), &prices());
    assert_eq!(out[0].extra_rows.luciana, vec![d("1500"), d("250")]);
    assert_eq!(out[0].extra_rows.marcia, vec![d("3312"), Decimal::ZERO]);
}

#[test]
fn sync_pads_empty_month_to_one_row() {
    let m = months(1);
    let out = synchronize(&m, &[vec![]], &[vec![]], &prices(), &prices());
    for person in PERSONS {
        assert_eq!(out[0].extra_rows.rows(person), &vec![Decimal::ZERO]);
    }
}

#[test]
fn sync_leaves_months_beyond_agenda_untouched() {
    let mut m = months(3);
    m[2].extra_rows.marcia = vec![d("999")];
    let marcia = vec![vec![course("Macramê", Status::Agendado, None)]];
    let marcelo = vec![vec![]];

    let out = synchronize(&m, &marcia, &marcelo, &prices(), &prices());
    assert_eq!(out[1], m[1]);
    assert_eq!(out[2], m[2]);
}

#[test]
fn sync_only_touches_rows() {
    let mut m = months(1);
    m[0].entry_mut(Person::Marcia).unwrap().simples = d("42");
    let marcia = vec![vec![course("Macramê", Status::Agendado, None)]];

    let out = synchronize(&m, &marcia, &[vec![]], &prices(), &prices());
    assert_eq!(out[0].entry(Person::Marcia).unwrap().simples, d("42"));
    assert_eq!(out[0].month_name, m[0].month_name);
}

#[test]
fn yearly_total_skips_preview_month() {
    let mut agenda: Vec<Vec<CourseEntry>> = vec![Vec::new(); 13];
    agenda[0].push(course("Macramê", Status::Agendado, None));
    agenda[3].push(course("Macramê", Status::Cancelado, None));
    agenda[11].push(course("Excel Básico", Status::Realizado, Some(d("100"))));
    // Slot 13 is next January; it belongs to the following fiscal year.
    agenda[12].push(course("Macramê", Status::Agendado, None));

    assert_eq!(yearly_total(&agenda, &prices()), d("3412"));
}
