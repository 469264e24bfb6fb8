//! EnviroControl inspect: report on the telemetry database.
//!
//! ```text
//! envirocontrol-inspect [DB_PATH] [EXPORT_CSV]
//! ```
//!
//! Prints the `readings` schema and the most recent rows.  With a second
//! argument, also dumps the whole table to that CSV file.  `DB_PATH`
//! defaults to `store.path` from the resolved configuration.

use anyhow::{Context, Result};
use log::info;

use envirocontrol::adapters::config_file;
use envirocontrol::store::SqliteStore;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args().skip(1);
    let config = config_file::resolve(None).context("loading configuration")?;
    let db_path = args.next().unwrap_or_else(|| config.store.path.clone());
    let export_path = args.next();

    let store = SqliteStore::open(&db_path).with_context(|| format!("opening {db_path}"))?;

    println!("Schema of `readings` in {db_path}:");
    for col in store.schema().context("reading schema")? {
        println!(
            "  {:>2}  {:<12} {:<8}{}{}",
            col.cid,
            col.name,
            col.decl_type,
            if col.not_null { " NOT NULL" } else { "" },
            if col.primary_key { " PRIMARY KEY" } else { "" },
        );
    }

    let total = store.count().context("counting rows")?;
    let latest = store
        .latest(config.store.latest_limit)
        .context("reading latest rows")?;
    println!();
    println!("Latest {} of {} readings:", latest.len(), total);
    println!("  {:>6}  {:<19}  {:>8}  {:>8}  {:>5}", "id", "timestamp", "temp", "humidity", "light");
    for row in &latest {
        println!(
            "  {:>6}  {:<19}  {:>8.2}  {:>8.2}  {:>5}",
            row.id, row.timestamp, row.temperature, row.humidity, row.light
        );
    }

    if let Some(path) = export_path {
        let rows = store
            .export_csv(&path)
            .with_context(|| format!("exporting to {path}"))?;
        info!("export complete");
        println!();
        println!("Exported {rows} rows to {path}");
    }

    Ok(())
}
