// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{MonthLedger, Person};
use rust_decimal::Decimal;

/// Set one of Luciana's individual-total rows, extending her list with zeros
/// up to the row index when it is shorter.
pub fn set_extra_row(month: &mut MonthLedger, row: usize, value: Decimal) {
    let rows = month.extra_rows.rows_mut(Person::Luciana);
    while rows.len() <= row {
        rows.push(Decimal::ZERO);
    }
    rows[row] = value;
}

/// Append a fresh zero row for all three persons, first padding the lists to
/// their common maximum so the new row lands at the same index everywhere.
pub fn add_extra_row(month: &mut MonthLedger) {
    let target = month.extra_rows.max_len();
    for person in crate::models::PERSONS {
        let rows = month.extra_rows.rows_mut(person);
        while rows.len() < target {
            rows.push(Decimal::ZERO);
        }
        rows.push(Decimal::ZERO);
    }
}

/// Remove the row at `row` from each person's list that is long enough;
/// shorter lists are left alone rather than treated as an error.
pub fn delete_extra_row(month: &mut MonthLedger, row: usize) {
    for person in crate::models::PERSONS {
        let rows = month.extra_rows.rows_mut(person);
        if row < rows.len() {
            rows.remove(row);
        }
    }
}
