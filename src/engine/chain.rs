// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{GrossNet, MonthLedger, Person, RateEntry};
use crate::utils::parse_rate;
use rust_decimal::Decimal;

/// Re-derive the whole ledger, month by month in forward order.
///
/// Each person's faturamento is the sum of their individual-total rows for
/// that month. Simples for month i (i > 0) is the previous month's
/// already-recalculated faturamento times the previous month's rate; month 0
/// Simples is an independent stored input and is left untouched. Derived
/// fields and month aggregates are rebuilt from scratch.
///
/// The input is never mutated and the function is idempotent: running it on
/// its own output changes nothing.
pub fn recalculate(months: &[MonthLedger], rates: &[RateEntry]) -> Vec<MonthLedger> {
    let mut out: Vec<MonthLedger> = months.to_vec();

    for i in 0..out.len() {
        // Snapshot of the previous month's recalculated revenue, taken before
        // the current month is touched.
        let prev_revenue: Vec<(Person, Decimal)> = if i > 0 {
            out[i - 1]
                .entries
                .iter()
                .map(|e| (e.person, e.faturamento))
                .collect()
        } else {
            Vec::new()
        };
        let prev_rate = if i > 0 {
            parse_rate(rates.get(i - 1).map(|r| r.value.as_str()).unwrap_or(""))
        } else {
            Decimal::ZERO
        };

        let month = &mut out[i];
        let row_sums: Vec<(Person, Decimal)> = month
            .entries
            .iter()
            .map(|e| (e.person, month.extra_rows.sum(e.person)))
            .collect();

        for entry in &mut month.entries {
            if let Some((_, sum)) = row_sums.iter().find(|(p, _)| *p == entry.person) {
                entry.faturamento = *sum;
            }
            if i > 0 {
                // Missing previous-month record: leave Simples as-is.
                if let Some((_, prev_fat)) =
                    prev_revenue.iter().find(|(p, _)| *p == entry.person)
                {
                    entry.simples = *prev_fat * prev_rate;
                }
            }
            entry.valor_taxas = entry.honorarios + entry.inss + entry.simples;
            entry.valor_liquido = entry.faturamento - entry.valor_taxas;
        }

        month.simples_total = month.entries.iter().map(|e| e.simples).sum();
        month.inss_total = month.entries.iter().map(|e| e.inss).sum();
        month.contadora_honorarios = month.entries.iter().map(|e| e.honorarios).sum();
        let bruto: Decimal = month.entries.iter().map(|e| e.faturamento).sum();
        let liquido: Decimal = month.entries.iter().map(|e| e.valor_liquido).sum();
        month.valor_nota = bruto;
        month.gross_net = GrossNet { bruto, liquido };
    }

    out
}
