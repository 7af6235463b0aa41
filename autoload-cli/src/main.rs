mod options;

use anyhow::Result;
use autoload_core::prelude::*;
use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::debug;

use crate::options::{CliOptions, Command};

#[derive(Debug, Serialize)]
struct ResolveReport {
    name: String,
    found: bool,
    path: Option<PathBuf>,
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether every requested name was found.
fn run() -> Result<bool> {
    let options = CliOptions::parse();

    tracing_subscriber::fmt()
        .with_env_filter(options.log_level().filter())
        .with_writer(std::io::stderr)
        .init();

    let resolver = options.build_resolver()?;
    debug!(prefixes = resolver.prefixes().len(), "resolver ready");

    let (output, all_found) = match &options.command {
        Command::Resolve { names } => {
            let reports = resolve_all(&resolver, names);
            let all_found = reports.iter().all(|report| report.found);
            (serde_json::to_value(reports)?, all_found)
        }
        Command::Candidates { name } => (serde_json::to_value(resolver.candidates(name))?, true),
        Command::Prefixes => (prefix_table(&resolver), true),
    };

    if options.raw {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(all_found)
}

fn resolve_all(resolver: &Resolver, names: &[String]) -> Vec<ResolveReport> {
    names
        .iter()
        .map(|name| {
            let path = resolver.resolve(name).into_path();
            ResolveReport {
                name: name.clone(),
                found: path.is_some(),
                path,
            }
        })
        .collect()
}

fn prefix_table(resolver: &Resolver) -> Value {
    let mut table = serde_json::Map::new();
    for prefix in resolver.prefixes() {
        let directories = resolver.directories_for(&prefix);
        table.insert(prefix, json!(directories));
    }
    Value::Object(table)
}
