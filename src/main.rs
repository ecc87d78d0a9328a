// Batch entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config
// 3. Refresh the registry snapshot from the stats API (when enabled)
// 4. Load the registry and build the lookup index
// 5. Enrich every CSV table, one worker per table
// 6. Report aggregate counts

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use rosterlink::config;
use rosterlink::enrich;
use rosterlink::fetch;
use rosterlink::registry::{self, RegistryIndex};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "config loaded: registry={}, tables={}, fetch={}",
        config.paths.registry,
        config.paths.tables,
        if config.fetch.enabled { "on" } else { "off" }
    );

    let registry_path = PathBuf::from(&config.paths.registry);

    // A failed refresh is not fatal: the snapshot on disk still serves.
    if config.fetch.enabled {
        match fetch::fetch_registry(&config.fetch).await {
            Ok(records) => fetch::save_registry(&registry_path, &records)
                .context("failed to save registry snapshot")?,
            Err(e) => warn!("registry fetch failed ({e}); falling back to snapshot on disk"),
        }
    }

    let records =
        registry::load_registry(&registry_path).context("failed to load player registry")?;
    let index = Arc::new(RegistryIndex::build(&records));
    info!("indexed {} registry records", records.len());

    let tables = list_tables(&config.paths.tables)?;
    if tables.is_empty() {
        warn!("no CSV tables found under {}", config.paths.tables);
        return Ok(());
    }

    // Tables are independent and share only the read-only index: one
    // blocking worker per table.
    let mut workers = Vec::with_capacity(tables.len());
    for path in tables {
        let index = Arc::clone(&index);
        workers.push((
            path.clone(),
            tokio::task::spawn_blocking(move || enrich::enrich_file(&path, &index)),
        ));
    }

    let mut files = 0usize;
    let mut failed = 0usize;
    let mut total_rows = 0usize;
    let mut total_updated = 0usize;
    for (path, worker) in workers {
        files += 1;
        match worker.await.context("enrichment worker panicked")? {
            Ok(summary) => {
                total_rows += summary.total;
                total_updated += summary.updated;
            }
            Err(e) => {
                warn!("skipping {}: {e}", path.display());
                failed += 1;
            }
        }
    }

    info!(
        "done: {files} files ({failed} failed), {total_rows} rows, {total_updated} updated"
    );
    Ok(())
}

/// All CSV files directly under the tables directory, in name order.
fn list_tables(dir: &str) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read tables directory {dir}"))?;

    let mut tables: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    tables.sort();
    Ok(tables)
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rosterlink=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
