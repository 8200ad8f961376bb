// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ledger months: January through December plus the "next January" preview slot.
pub const MONTH_COUNT: usize = 13;

pub const MONTH_NAMES: [&str; MONTH_COUNT] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
    "Janeiro Próximo",
];

/// The three tracked persons. Márcia and Marcelo carry course agendas;
/// Luciana's revenue comes only from manually entered individual-total rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Person {
    Luciana,
    Marcia,
    Marcelo,
}

pub const PERSONS: [Person; 3] = [Person::Luciana, Person::Marcia, Person::Marcelo];

impl Person {
    pub fn as_str(&self) -> &'static str {
        match self {
            Person::Luciana => "Luciana",
            Person::Marcia => "Márcia",
            Person::Marcelo => "Marcelo",
        }
    }

    pub fn has_agenda(&self) -> bool {
        matches!(self, Person::Marcia | Person::Marcelo)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown person '{0}' (expected Luciana, Márcia or Marcelo)")]
pub struct ParsePersonError(String);

impl FromStr for Person {
    type Err = ParsePersonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_pt(s).as_str() {
            "luciana" => Ok(Person::Luciana),
            "marcia" => Ok(Person::Marcia),
            "marcelo" => Ok(Person::Marcelo),
            _ => Err(ParsePersonError(s.to_string())),
        }
    }
}

/// Lifecycle status of a scheduled course delivery. `Cancelado` and `Recusado`
/// entries keep their calendar slot but contribute nothing to revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Agendado,
    Analise,
    Aprovado,
    Cancelado,
    Confirmar,
    Execucao,
    Fechamento,
    Realizado,
    Recusado,
}

pub const STATUS_OPTIONS: [Status; 9] = [
    Status::Agendado,
    Status::Analise,
    Status::Aprovado,
    Status::Cancelado,
    Status::Confirmar,
    Status::Execucao,
    Status::Fechamento,
    Status::Realizado,
    Status::Recusado,
];

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Agendado => "Agendado",
            Status::Analise => "Análise",
            Status::Aprovado => "Aprovado",
            Status::Cancelado => "CANCELADO",
            Status::Confirmar => "Confirmar",
            Status::Execucao => "Execução",
            Status::Fechamento => "Fechamento",
            Status::Realizado => "Realizado",
            Status::Recusado => "RECUSADO",
        }
    }

    pub fn excluded_from_revenue(&self) -> bool {
        matches!(self, Status::Cancelado | Status::Recusado)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown status '{0}'")]
pub struct ParseStatusError(String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_pt(s).as_str() {
            "agendado" => Ok(Status::Agendado),
            "analise" => Ok(Status::Analise),
            "aprovado" => Ok(Status::Aprovado),
            "cancelado" => Ok(Status::Cancelado),
            "confirmar" => Ok(Status::Confirmar),
            "execucao" => Ok(Status::Execucao),
            "fechamento" => Ok(Status::Fechamento),
            "realizado" => Ok(Status::Realizado),
            "recusado" => Ok(Status::Recusado),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Lowercase and strip the pt-BR diacritics we actually use, so user input
/// like "execucao" or "MÁRCIA" matches.
pub fn fold_pt(s: &str) -> String {
    s.trim()
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'á' | 'â' | 'ã' | 'à' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            _ => c,
        })
        .collect()
}

/// One row of a reference price table: course name, value and duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDefinition {
    pub name: String,
    pub value: Decimal,
    pub hours: i64,
}

/// One scheduled course delivery inside a month of a person's agenda.
/// The id is stable across moves between months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseEntry {
    pub id: String,
    pub date: String,
    pub location: String,
    pub course_name: String,
    pub status: Status,
    pub override_value: Option<Decimal>,
}

/// One slot of a tax-rate (alíquota) schedule. The value is kept as the
/// user-entered comma-decimal percentage string; blank means "not known yet"
/// and derives as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub month: String,
    pub value: String,
}

/// A labelled annual amount (e.g. "Honorários 2025", "INSS 2025").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeEntry {
    pub label: String,
    pub value: String,
}

/// Per-person figures for one ledger month. `honorarios` and `inss` are the
/// fixed shares seeded from the fee schedule; `simples` is the chained tax;
/// `valor_taxas` and `valor_liquido` are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonFigures {
    pub person: Person,
    pub faturamento: Decimal,
    pub honorarios: Decimal,
    pub inss: Decimal,
    pub simples: Decimal,
    pub valor_taxas: Decimal,
    pub valor_liquido: Decimal,
}

/// The individual-total row lists for one month, index-aligned across the
/// three persons. Márcia's and Marcelo's rows are regenerated from their
/// agendas on every sync; Luciana's are manual and preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraRows {
    pub luciana: Vec<Decimal>,
    pub marcia: Vec<Decimal>,
    pub marcelo: Vec<Decimal>,
}

impl ExtraRows {
    pub fn rows(&self, person: Person) -> &Vec<Decimal> {
        match person {
            Person::Luciana => &self.luciana,
            Person::Marcia => &self.marcia,
            Person::Marcelo => &self.marcelo,
        }
    }

    pub fn rows_mut(&mut self, person: Person) -> &mut Vec<Decimal> {
        match person {
            Person::Luciana => &mut self.luciana,
            Person::Marcia => &mut self.marcia,
            Person::Marcelo => &mut self.marcelo,
        }
    }

    pub fn sum(&self, person: Person) -> Decimal {
        self.rows(person).iter().copied().sum()
    }

    pub fn max_len(&self) -> usize {
        self.luciana
            .len()
            .max(self.marcia.len())
            .max(self.marcelo.len())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GrossNet {
    pub bruto: Decimal,
    pub liquido: Decimal,
}

/// One month of the Faturamento ledger. The chain recalculator is the sole
/// writer of the derived fields; editors touch only month-0 `simples` and the
/// individual-total rows, then re-derive the whole sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthLedger {
    pub month_name: String,
    pub entries: Vec<PersonFigures>,
    pub extra_rows: ExtraRows,
    pub contadora_honorarios: Decimal,
    pub inss_total: Decimal,
    pub simples_total: Decimal,
    pub valor_nota: Decimal,
    pub gross_net: GrossNet,
}

impl MonthLedger {
    pub fn entry(&self, person: Person) -> Option<&PersonFigures> {
        self.entries.iter().find(|e| e.person == person)
    }

    pub fn entry_mut(&mut self, person: Person) -> Option<&mut PersonFigures> {
        self.entries.iter_mut().find(|e| e.person == person)
    }
}
