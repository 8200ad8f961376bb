// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::set_setting;
use crate::store;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("on", _)) => {
            set_setting(conn, "masked", "1")?;
            println!("Privacy mask on");
        }
        Some(("off", _)) => {
            set_setting(conn, "masked", "0")?;
            println!("Privacy mask off");
        }
        _ => {
            let state = if store::masked_default(conn)? {
                "on"
            } else {
                "off"
            };
            println!("Privacy mask is {}", state);
        }
    }
    Ok(())
}
