//! Batch entry point: read snapshot rows as a JSON array (file argument or
//! stdin), rebalance, print the report as JSON.
//!
//! Configuration comes from `SMARTSTOCK_*` environment variables. Rows carry a
//! `day` column unless `SMARTSTOCK_PERIOD_COLUMN` names another one (or `none`).

use std::io::Read;

use anyhow::Context;
use serde_json::Value;

use smartstock_engine::{ColumnMapping, Job, RebalanceConfig, RebalanceJob, parse_rows};

fn main() -> anyhow::Result<()> {
    smartstock_observability::init();

    let raw = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let rows: Vec<Value> = serde_json::from_str(&raw).context("input must be a JSON array of rows")?;

    let mapping = ColumnMapping::from_env()?;
    let config = RebalanceConfig::from_env()?;
    let table = parse_rows(&rows, &mapping)?;
    let report = RebalanceJob::new(table).with_config(config).run()?;

    tracing::info!(summary = %report.summary(), "rebalance complete");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
