// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rd companies` and `rd delete` - stored result sets

use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::client_lifecycle::connect_or_start;
use crate::color;
use crate::output::{format_or_json, handle_list, OutputFormat};

#[derive(Args)]
pub struct DeleteArgs {
    pub company: String,
}

#[derive(Serialize)]
struct Deleted<'a> {
    company: &'a str,
    existed: bool,
}

pub async fn companies(format: OutputFormat) -> Result<()> {
    let client = connect_or_start().await?;
    let names = client.companies().await?;
    handle_list(format, &names, "No stored results", |names, out| {
        for name in names {
            let _ = writeln!(out, "{name}");
        }
    })
}

pub async fn delete(args: DeleteArgs, format: OutputFormat) -> Result<()> {
    let client = connect_or_start().await?;
    let existed = client.delete_results(&args.company).await?;
    let deleted = Deleted { company: &args.company, existed };
    format_or_json(format, &deleted, || println!("{}", render_delete(&args.company, existed)))
}

pub(crate) fn render_delete(company: &str, existed: bool) -> String {
    if existed {
        format!("Deleted results for '{}'", color::header(company))
    } else {
        format!("No results stored for '{}'", color::header(company))
    }
}

#[cfg(test)]
#[path = "company_tests.rs"]
mod tests;
