// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cursobook::engine::rows::{add_extra_row, delete_extra_row, set_extra_row};
use cursobook::models::{ExtraRows, GrossNet, MonthLedger, Person, PERSONS};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn month_with_rows(luciana: &[&str], marcia: &[&str], marcelo: &[&str]) -> MonthLedger {
    let to_rows = |vals: &[&str]| vals.iter().map(|v| d(v)).collect::<Vec<_>>();
    MonthLedger {
        month_name: "Janeiro".to_string(),
        entries: Vec::new(),
        extra_rows: ExtraRows {
            luciana: to_rows(luciana),
            marcia: to_rows(marcia),
            marcelo: to_rows(marcelo),
        },
        contadora_honorarios: Decimal::ZERO,
        inss_total: Decimal::ZERO,
        simples_total: Decimal::ZERO,
        valor_nota: Decimal::ZERO,
        gross_net: GrossNet::default(),
    }
}

#[test]
fn add_row_aligns_uneven_lists_first() {
    // Scenario D: lengths 2/1/0 all end up at 3 with the new row zeroed.
    let mut m = month_with_rows(&["100", "200"], &["300"], &[]);
    add_extra_row(&mut m);

    assert_eq!(m.extra_rows.luciana, vec![d("100"), d("200"), Decimal::ZERO]);
    assert_eq!(m.extra_rows.marcia, vec![d("300"), Decimal::ZERO, Decimal::ZERO]);
    assert_eq!(
        m.extra_rows.marcelo,
        vec![Decimal::ZERO, Decimal::ZERO, Decimal::ZERO]
    );
}

#[test]
fn delete_row_removes_same_index_everywhere() {
    let mut m = month_with_rows(&["1", "2", "3"], &["4", "5", "6"], &["7", "8", "9"]);
    delete_extra_row(&mut m, 1);

    assert_eq!(m.extra_rows.luciana, vec![d("1"), d("3")]);
    assert_eq!(m.extra_rows.marcia, vec![d("4"), d("6")]);
    assert_eq!(m.extra_rows.marcelo, vec![d("7"), d("9")]);
}

#[test]
fn delete_out_of_range_is_a_noop() {
    // Scenario E: nothing has index 5, so nothing changes.
    let mut m = month_with_rows(&["1", "2", "3"], &["4"], &[]);
    let before = m.clone();
    delete_extra_row(&mut m, 5);
    assert_eq!(m, before);
}

#[test]
fn delete_skips_lists_shorter_than_the_index() {
    let mut m = month_with_rows(&["1", "2", "3"], &["4"], &[]);
    delete_extra_row(&mut m, 2);

    assert_eq!(m.extra_rows.luciana, vec![d("1"), d("2")]);
    assert_eq!(m.extra_rows.marcia, vec![d("4")]);
    assert!(m.extra_rows.marcelo.is_empty());
}

#[test]
fn set_row_extends_luciana_with_zeros() {
    let mut m = month_with_rows(&["100"], &[], &[]);
    set_extra_row(&mut m, 3, d("750"));

    assert_eq!(
        m.extra_rows.luciana,
        vec![d("100"), Decimal::ZERO, Decimal::ZERO, d("750")]
    );
    // Only Luciana's list is manual; the others are the synchronizer's.
    assert!(m.extra_rows.marcia.is_empty());
    assert!(m.extra_rows.marcelo.is_empty());
}

#[test]
fn set_row_overwrites_in_place() {
    let mut m = month_with_rows(&["100", "200"], &[], &[]);
    set_extra_row(&mut m, 0, d("111"));
    assert_eq!(m.extra_rows.luciana, vec![d("111"), d("200")]);
}

#[test]
fn max_len_spans_all_persons() {
    let m = month_with_rows(&["1"], &["1", "2", "3"], &["1", "2"]);
    assert_eq!(m.extra_rows.max_len(), 3);
    for person in PERSONS {
        assert!(m.extra_rows.rows(person).len() <= 3);
    }
    assert_eq!(m.extra_rows.sum(Person::Marcia), d("6"));
}
