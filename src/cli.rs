// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn masked_flag(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("masked")
            .long("masked")
            .action(ArgAction::SetTrue)
            .help("Mask monetary values (privacy mode)"),
    )
}

fn person_arg() -> Arg {
    Arg::new("person")
        .long("person")
        .required(true)
        .help("Tracked person (Luciana, Márcia or Marcelo)")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .help("Month: 1-13 or a name (Janeiro .. Dezembro, Janeiro Próximo)")
}

fn year_arg() -> Arg {
    Arg::new("year")
        .long("year")
        .help("Fiscal year (2025, 2026 or 2027)")
}

pub fn build_cli() -> Command {
    Command::new("cursobook")
        .about("Course-agenda bookkeeping and monthly Faturamento ledger")
        .version(crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("course")
                .about("Manage course agendas")
                .subcommand(
                    Command::new("add")
                        .about("Add a course entry to a month")
                        .arg(person_arg())
                        .arg(month_arg().required(true))
                        .arg(Arg::new("date").long("date").help("Free-text date range"))
                        .arg(Arg::new("location").long("location"))
                        .arg(Arg::new("name").long("name").help("Course name"))
                        .arg(Arg::new("status").long("status"))
                        .arg(Arg::new("value").long("value").help("Manual value override")),
                )
                .subcommand(
                    Command::new("set")
                        .about("Update fields of a course entry")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("location").long("location"))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("status").long("status"))
                        .arg(Arg::new("value").long("value"))
                        .arg(
                            Arg::new("clear-value")
                                .long("clear-value")
                                .action(ArgAction::SetTrue)
                                .help("Drop the manual value override"),
                        ),
                )
                .subcommand(
                    Command::new("del")
                        .about("Delete a course entry")
                        .arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(
                    Command::new("move")
                        .about("Move a course entry to another month (id is preserved)")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(month_arg().required(true))
                        .arg(
                            Arg::new("before")
                                .long("before")
                                .help("Insert before this entry id"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List a person's agenda")
                        .arg(person_arg())
                        .arg(month_arg()),
                ))
                .subcommand(
                    Command::new("catalog")
                        .about("Courses available to a person, with reference values")
                        .arg(person_arg()),
                )
                .subcommand(
                    Command::new("total")
                        .about("Yearly agenda total (first 12 months)")
                        .arg(person_arg())
                        .arg(
                            Arg::new("masked")
                                .long("masked")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(
            Command::new("table")
                .about("Reference price tables")
                .subcommand(json_flags(
                    Command::new("list").arg(year_arg().required(true)),
                ))
                .subcommand(
                    Command::new("set")
                        .about("Set a course's reference value")
                        .arg(year_arg().required(true))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("rate")
                .about("Simples tax-rate schedules")
                .subcommand(json_flags(
                    Command::new("list").arg(year_arg().required(true)),
                ))
                .subcommand(
                    Command::new("set")
                        .about("Set a month's rate percentage (comma-decimal string)")
                        .arg(year_arg().required(true))
                        .arg(month_arg().required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("fee")
                .about("Annual fee schedules")
                .subcommand(json_flags(
                    Command::new("list").arg(year_arg().required(true)),
                ))
                .subcommand(
                    Command::new("set")
                        .arg(year_arg().required(true))
                        .arg(Arg::new("label").long("label").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("year")
                .about("Selected reference-price year for the agendas")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set").arg(year_arg().required(true))),
        )
        .subcommand(
            Command::new("ledger")
                .about("The monthly Faturamento ledger")
                .subcommand(masked_flag(json_flags(
                    Command::new("show")
                        .about("Show derived figures for one or all months")
                        .arg(month_arg()),
                )))
                .subcommand(masked_flag(
                    Command::new("rows")
                        .about("Show a month's individual-total rows")
                        .arg(month_arg().required(true)),
                ))
                .subcommand(
                    Command::new("set-simples")
                        .about("Set January's Simples for a person (root of the chain)")
                        .arg(person_arg())
                        .arg(Arg::new("value").long("value").required(true)),
                )
                .subcommand(
                    Command::new("set-total")
                        .about("Set one of Luciana's individual-total rows")
                        .arg(month_arg().required(true))
                        .arg(Arg::new("row").long("row").required(true).help("0-based row index"))
                        .arg(Arg::new("value").long("value").required(true)),
                )
                .subcommand(
                    Command::new("add-row")
                        .about("Append an individual-total row to a month")
                        .arg(month_arg().required(true)),
                )
                .subcommand(
                    Command::new("del-row")
                        .about("Delete an individual-total row from a month")
                        .arg(month_arg().required(true))
                        .arg(Arg::new("row").long("row").required(true)),
                )
                .subcommand(masked_flag(json_flags(
                    Command::new("report")
                        .about("Annual totals and monthly gross/net with 3-month moving average"),
                ))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data to CSV or JSON files")
                .subcommand(
                    Command::new("ledger")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").help("Output path")),
                )
                .subcommand(
                    Command::new("agenda")
                        .arg(person_arg())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out")),
                ),
        )
        .subcommand(
            Command::new("mask")
                .about("Default privacy masking for ledger output")
                .subcommand(Command::new("on"))
                .subcommand(Command::new("off"))
                .subcommand(Command::new("status")),
        )
        .subcommand(Command::new("doctor").about("Audit stored data for inconsistencies"))
}
