// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CourseDefinition, CourseEntry, ExtraRows, MonthLedger};
use rust_decimal::Decimal;

/// Resolve the monetary value of one agenda entry: zero when the status
/// excludes it from revenue, otherwise the manual override, otherwise the
/// price-table value for its course name, otherwise zero.
pub fn resolve_value(entry: &CourseEntry, prices: &[CourseDefinition]) -> Decimal {
    if entry.status.excluded_from_revenue() {
        return Decimal::ZERO;
    }
    if let Some(v) = entry.override_value {
        return v;
    }
    prices
        .iter()
        .find(|c| c.name == entry.course_name)
        .map(|c| c.value)
        .unwrap_or(Decimal::ZERO)
}

/// Rebuild every month's individual-total rows from the two course agendas.
///
/// Márcia's and Marcelo's rows are regenerated one row per agenda slot, in
/// slot order, against their selected reference price tables. Luciana's rows
/// are manual and preserved as-is. All three lists are then padded with
/// zeros to a common length (at least one row) so row indices stay aligned.
///
/// Ledger months beyond the agenda length are returned unchanged; agenda
/// months beyond the ledger length are ignored. Nothing else in the month is
/// touched; callers run [`chain::recalculate`](crate::engine::recalculate)
/// afterwards.
pub fn synchronize(
    months: &[MonthLedger],
    marcia_agenda: &[Vec<CourseEntry>],
    marcelo_agenda: &[Vec<CourseEntry>],
    marcia_prices: &[CourseDefinition],
    marcelo_prices: &[CourseDefinition],
) -> Vec<MonthLedger> {
    months
        .iter()
        .enumerate()
        .map(|(i, month)| {
            if i >= marcia_agenda.len() {
                return month.clone();
            }
            let marcia_rows: Vec<Decimal> = marcia_agenda[i]
                .iter()
                .map(|c| resolve_value(c, marcia_prices))
                .collect();
            let marcelo_rows: Vec<Decimal> = marcelo_agenda
                .get(i)
                .map(|courses| {
                    courses
                        .iter()
                        .map(|c| resolve_value(c, marcelo_prices))
                        .collect()
                })
                .unwrap_or_default();
            let luciana_rows = month.extra_rows.luciana.clone();

            let num_rows = luciana_rows
                .len()
                .max(marcia_rows.len())
                .max(marcelo_rows.len())
                .max(1);

            let mut out = month.clone();
            out.extra_rows = ExtraRows {
                luciana: padded(luciana_rows, num_rows),
                marcia: padded(marcia_rows, num_rows),
                marcelo: padded(marcelo_rows, num_rows),
            };
            out
        })
        .collect()
}

/// Yearly agenda total over the first twelve months, honoring the exclusion
/// rule and override precedence. The "next January" slot does not count.
pub fn yearly_total(agenda: &[Vec<CourseEntry>], prices: &[CourseDefinition]) -> Decimal {
    agenda
        .iter()
        .take(12)
        .flat_map(|courses| courses.iter())
        .map(|c| resolve_value(c, prices))
        .sum()
}

fn padded(mut rows: Vec<Decimal>, len: usize) -> Vec<Decimal> {
    rows.resize(len, Decimal::ZERO);
    rows
}
